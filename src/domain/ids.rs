use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for one assessment run
    AssessmentId
);
uuid_id!(DatabaseId);
uuid_id!(TableId);
uuid_id!(MigrationJobId);
uuid_id!(ValidationResultId);

impl AssessmentId {
    /// Accepts only canonical UUID text, for ids arriving from users.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        let uuid = uuid::Uuid::parse_str(s.trim())?;
        Ok(Self(uuid.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let id1 = AssessmentId::new();
        let id2 = AssessmentId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn from_string_preserves_value() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = TableId::from_string(uuid_str);
        assert_eq!(id.as_str(), uuid_str);
    }

    #[test]
    fn display_shows_inner_value() {
        let id = DatabaseId::from_string("test-uuid");
        assert_eq!(format!("{}", id), "test-uuid");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = AssessmentId::from_string("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }

    mod parse {
        use super::*;

        #[test]
        fn accepts_uuid_and_normalizes_case() {
            let id = AssessmentId::parse(" 550E8400-E29B-41D4-A716-446655440000 ").unwrap();
            assert_eq!(id.as_str(), "550e8400-e29b-41d4-a716-446655440000");
        }

        #[test]
        fn rejects_non_uuid() {
            assert!(AssessmentId::parse("not-a-uuid").is_err());
        }
    }
}
