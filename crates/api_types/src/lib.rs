use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;
    use garde::Validate;

    /// Rejects empty and whitespace only strings.
    pub fn not_blank(value: &str, _: &()) -> garde::Result {
        if value.trim().is_empty() {
            return Err(garde::Error::new("value must not be blank"));
        }
        Ok(())
    }

    /// Public representation of a stored user.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserDto {
        pub id: Uuid,
        pub login: String,
        pub first_name: String,
        pub last_name: String,
    }

    /// Request body for `POST /api/users`.
    ///
    /// Missing members deserialize as empty strings, so a missing `login`
    /// is reported by validation rather than by the JSON decoder.
    #[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", default)]
    pub struct UserPost {
        #[garde(custom(not_blank))]
        pub login: String,
        #[garde(skip)]
        pub first_name: String,
        #[garde(skip)]
        pub last_name: String,
    }

    /// Request body for `PUT /api/users/{id}` and the shape a patch
    /// document is applied to. Every member is required.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase", default)]
    pub struct UserPut {
        #[garde(custom(not_blank))]
        pub login: String,
        #[garde(custom(not_blank))]
        pub first_name: String,
        #[garde(custom(not_blank))]
        pub last_name: String,
    }
}

pub mod pagination {
    use super::*;
    use serde::Deserializer;
    use std::num::IntErrorKind;

    /// Query string of `GET /api/users`.
    ///
    /// Values are signed so that out of range requests can be clamped
    /// instead of rejected.
    /// Values that do not parse are treated as absent and values out of
    /// range saturate, so a listing request is never rejected.
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageQuery {
        #[serde(default, deserialize_with = "lenient_integer")]
        pub page_number: Option<i64>,
        #[serde(default, deserialize_with = "lenient_integer")]
        pub page_size: Option<i64>,
    }

    fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_integer))
    }

    /// Parse a query integer, saturating on overflow.
    pub fn parse_integer(raw: &str) -> Option<i64> {
        match raw.trim().parse::<i64>() {
            Ok(value) => Some(value),
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow => Some(i64::MAX),
                IntErrorKind::NegOverflow => Some(i64::MIN),
                _ => None,
            },
        }
    }

    /// Metadata sent in the `X-Pagination` header.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Pagination {
        pub previous_page_link: Option<String>,
        pub next_page_link: Option<String>,
        pub total_count: usize,
        pub page_size: usize,
        pub current_page: usize,
        pub total_pages: usize,
    }
}

pub mod patch {
    use super::*;
    use serde_json::Value;

    /// A single JSON patch operation (RFC 6902 names).
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "op", rename_all = "lowercase")]
    pub enum PatchOperation {
        Add {
            path: String,
            #[serde(default)]
            value: Value,
        },
        Remove {
            path: String,
        },
        Replace {
            path: String,
            #[serde(default)]
            value: Value,
        },
        Move {
            from: String,
            path: String,
        },
        Copy {
            from: String,
            path: String,
        },
        Test {
            path: String,
            #[serde(default)]
            value: Value,
        },
    }

    impl PatchOperation {
        /// Target path of the operation.
        pub fn path(&self) -> &str {
            match self {
                Self::Add { path, .. }
                | Self::Remove { path }
                | Self::Replace { path, .. }
                | Self::Move { path, .. }
                | Self::Copy { path, .. }
                | Self::Test { path, .. } => path,
            }
        }

        pub fn name(&self) -> &'static str {
            match self {
                Self::Add { .. } => "add",
                Self::Remove { .. } => "remove",
                Self::Replace { .. } => "replace",
                Self::Move { .. } => "move",
                Self::Copy { .. } => "copy",
                Self::Test { .. } => "test",
            }
        }
    }

    /// Ordered list of operations, applied as a whole.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PatchDocument {
        pub operations: Vec<PatchOperation>,
    }
}

#[cfg(test)]
mod tests {
    use super::{pagination::parse_integer, user::not_blank};

    #[test]
    fn query_integers_parse_leniently() {
        assert_eq!(parse_integer("3"), Some(3));
        assert_eq!(parse_integer(" -2 "), Some(-2));
        assert_eq!(parse_integer("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_integer("-99999999999999999999"), Some(i64::MIN));
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("1.5"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(not_blank("ada", &()).is_ok());
        assert!(not_blank("", &()).is_err());
        assert!(not_blank("  \t", &()).is_err());
    }
}
