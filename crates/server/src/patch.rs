//! Application of JSON patch documents to flat DTOs.
//!
//! Targets are plain records of text fields, so a path is a single
//! `/field` segment. Operations run against a working copy and the result
//! is only handed back when every operation succeeded.

use api_types::{
    patch::{PatchDocument, PatchOperation},
    user::UserPut,
};
use serde_json::Value;
use thiserror::Error;

use crate::validation::FieldErrors;

/// A record a patch document can be applied to.
pub(crate) trait PatchTarget: Clone {
    /// JSON names of the patchable fields.
    const FIELDS: &'static [&'static str];

    fn get(&self, field: &str) -> Option<&str>;

    fn set(&mut self, field: &str, value: String);
}

impl PatchTarget for UserPut {
    const FIELDS: &'static [&'static str] = &["login", "firstName", "lastName"];

    fn get(&self, field: &str) -> Option<&str> {
        match field {
            "login" => Some(&self.login),
            "firstName" => Some(&self.first_name),
            "lastName" => Some(&self.last_name),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: String) {
        match field {
            "login" => self.login = value,
            "firstName" => self.first_name = value,
            "lastName" => self.last_name = value,
            _ => {}
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum PatchError {
    #[error("Operation {index} of the patch document is invalid: {message}")]
    InvalidOperation { index: usize, message: String },
    #[error("The path '{0}' is not a valid field path.")]
    InvalidPath(String),
    #[error("The target location specified by path segment '{0}' was not found.")]
    UnknownField(String),
    #[error("The value '{value}' is invalid for target location '{path}'.")]
    InvalidValue { path: String, value: String },
    #[error("The current value '{actual}' at path '{path}' is not equal to the test value '{expected}'.")]
    TestFailed {
        path: String,
        expected: String,
        actual: String,
    },
}

impl PatchError {
    fn path(&self) -> &str {
        match self {
            Self::InvalidOperation { .. } => "op",
            Self::InvalidPath(path)
            | Self::UnknownField(path)
            | Self::InvalidValue { path, .. }
            | Self::TestFailed { path, .. } => path,
        }
    }
}

impl From<PatchError> for FieldErrors {
    fn from(err: PatchError) -> Self {
        let field = err.path().trim_start_matches('/').to_string();
        FieldErrors::single(field, err.to_string())
    }
}

/// Decode the operations of a patch document. The document itself must
/// already be a JSON array; a member that is not a known operation fails
/// the whole document.
pub(crate) fn parse(operations: Vec<Value>) -> Result<PatchDocument, PatchError> {
    let operations = operations
        .into_iter()
        .enumerate()
        .map(|(index, operation)| {
            serde_json::from_value(operation).map_err(|err| PatchError::InvalidOperation {
                index,
                message: err.to_string(),
            })
        })
        .collect::<Result<_, _>>()?;
    Ok(PatchDocument { operations })
}

/// Apply every operation of `document` to a copy of `target`.
pub(crate) fn apply<T: PatchTarget>(document: &PatchDocument, target: &T) -> Result<T, PatchError> {
    let mut working = target.clone();
    for operation in &document.operations {
        tracing::debug!("applying {} on {}", operation.name(), operation.path());
        apply_operation(operation, &mut working)?;
    }
    Ok(working)
}

fn apply_operation<T: PatchTarget>(operation: &PatchOperation, target: &mut T) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
            let field = resolve::<T>(path)?;
            target.set(field, text(path, value)?);
        }
        PatchOperation::Remove { path } => {
            let field = resolve::<T>(path)?;
            target.set(field, String::new());
        }
        PatchOperation::Move { from, path } => {
            let source = resolve::<T>(from)?;
            let field = resolve::<T>(path)?;
            let value = current(target, source);
            target.set(source, String::new());
            target.set(field, value);
        }
        PatchOperation::Copy { from, path } => {
            let source = resolve::<T>(from)?;
            let field = resolve::<T>(path)?;
            let value = current(target, source);
            target.set(field, value);
        }
        PatchOperation::Test { path, value } => {
            let field = resolve::<T>(path)?;
            let expected = text(path, value)?;
            let actual = current(target, field);
            if actual != expected {
                return Err(PatchError::TestFailed {
                    path: path.clone(),
                    expected,
                    actual,
                });
            }
        }
    }
    Ok(())
}

fn current<T: PatchTarget>(target: &T, field: &str) -> String {
    target.get(field).unwrap_or_default().to_string()
}

/// Map `/field` onto one of the target's field names, ignoring case.
fn resolve<T: PatchTarget>(path: &str) -> Result<&'static str, PatchError> {
    let Some(segment) = path.strip_prefix('/') else {
        return Err(PatchError::InvalidPath(path.to_string()));
    };
    if segment.is_empty() || segment.contains('/') {
        return Err(PatchError::InvalidPath(path.to_string()));
    }

    T::FIELDS
        .iter()
        .copied()
        .find(|field| field.eq_ignore_ascii_case(segment))
        .ok_or_else(|| PatchError::UnknownField(segment.to_string()))
}

/// Text form of a patch value. `null` clears the field.
fn text(path: &str, value: &Value) -> Result<String, PatchError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(PatchError::InvalidValue {
            path: path.to_string(),
            value: other.to_string(),
        }),
    }
}
