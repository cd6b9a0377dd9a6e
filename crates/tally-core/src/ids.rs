//! Branded ID newtypes for type safety.
//!
//! Users and tasks each get a distinct ID type implemented as a newtype
//! wrapper around `String`, so a task ID can never be passed where a user
//! ID is expected. Fresh IDs are prefixed UUID v7 strings (time-ordered),
//! e.g. `user_0194fdc2-...`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix applied to freshly generated IDs.
            pub const PREFIX: &'static str = $prefix;

            /// Generate a new ID: prefix + UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(format!(concat!($prefix, "_{}"), Uuid::now_v7()))
            }

            /// Wrap an existing string value.
            #[must_use]
            pub fn from_string(s: String) -> Self {
                Self(s)
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id! {
    /// Unique identifier for a registered user.
    UserId, "user"
}

branded_id! {
    /// Unique identifier for a task record.
    TaskId, "task"
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_has_prefix_and_valid_uuid() {
        let id = UserId::new();
        let raw = id.as_str().strip_prefix("user_").expect("prefix");
        let parsed = Uuid::parse_str(raw).expect("should be valid UUID");
        assert_eq!(parsed.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn task_id_has_prefix_and_valid_uuid() {
        let id = TaskId::new();
        let raw = id.as_str().strip_prefix("task_").expect("prefix");
        let parsed = Uuid::parse_str(raw).expect("should be valid UUID");
        assert_eq!(parsed.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(TaskId::new(), TaskId::new());
    }

    #[test]
    fn from_string_roundtrip() {
        let id = UserId::from_string("user_custom".to_owned());
        assert_eq!(id.as_str(), "user_custom");
        assert_eq!(id.into_inner(), "user_custom");
    }

    #[test]
    fn display_matches_inner() {
        let id = TaskId::from("task_display");
        assert_eq!(format!("{id}"), "task_display");
    }

    #[test]
    fn serde_is_transparent() {
        let id = UserId::from("user_serde");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user_serde\"");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn hash_and_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        let id = UserId::from("user_same");
        let _ = set.insert(id.clone());
        let _ = set.insert(id);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn default_creates_unique() {
        assert_ne!(UserId::default(), UserId::default());
    }
}
