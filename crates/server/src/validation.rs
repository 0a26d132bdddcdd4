//! Field level validation of request bodies.

use std::collections::BTreeMap;

use garde::Validate;
use heck::ToLowerCamelCase;
use serde::Serialize;

pub(crate) const LOGIN_FORMAT_MESSAGE: &str = "Login should contain only letters or digits";

/// Validation failures keyed by the JSON name of the offending field.
///
/// Serialized as `{"login": ["..."]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl From<garde::Report> for FieldErrors {
    fn from(report: garde::Report) -> Self {
        let mut errors = Self::new();
        for (path, error) in report.iter() {
            errors.add(path.to_string().to_lower_camel_case(), error.to_string());
        }
        errors
    }
}

/// Run the derived rules of a DTO.
pub(crate) fn validate<T>(value: &T) -> Result<(), FieldErrors>
where
    T: Validate<Context = ()>,
{
    value.validate().map_err(FieldErrors::from)
}

/// Logins are restricted to ASCII letters and digits. Only enforced when a
/// user is created.
pub(crate) fn is_letters_or_digits(login: &str) -> bool {
    login.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::user::{UserPost, UserPut};

    #[test]
    fn missing_login_is_reported() {
        let errors = validate(&UserPost::default()).unwrap_err();
        assert!(errors.get("login").is_some());
        assert!(errors.get("firstName").is_none());
    }

    #[test]
    fn post_names_are_optional() {
        let post = UserPost {
            login: "ada".to_string(),
            ..Default::default()
        };
        assert!(validate(&post).is_ok());
    }

    #[test]
    fn put_requires_every_field() {
        let put = UserPut {
            login: "ada".to_string(),
            ..Default::default()
        };
        let errors = validate(&put).unwrap_err();
        assert!(errors.get("login").is_none());
        assert!(errors.get("firstName").is_some());
        assert!(errors.get("lastName").is_some());
    }

    #[test]
    fn blank_values_are_reported() {
        let put = UserPut {
            login: "   ".to_string(),
            first_name: "\t".to_string(),
            last_name: "Lovelace".to_string(),
        };
        let errors = validate(&put).unwrap_err();
        assert!(errors.get("login").is_some());
        assert!(errors.get("firstName").is_some());
        assert!(errors.get("lastName").is_none());

        let post = UserPost {
            login: " ".to_string(),
            ..Default::default()
        };
        assert!(validate(&post).unwrap_err().get("login").is_some());
    }

    #[test]
    fn login_format() {
        assert!(is_letters_or_digits("ada1815"));
        assert!(!is_letters_or_digits("ada lovelace"));
        assert!(!is_letters_or_digits("ada.l"));
        assert!(!is_letters_or_digits("ada_l"));
    }

    #[test]
    fn errors_serialize_as_map() {
        let mut errors = FieldErrors::single("login", "first");
        errors.add("login", "second");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"login": ["first", "second"]}));
    }
}
