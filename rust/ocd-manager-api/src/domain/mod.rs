//! Core domain models.
//!
//! Records owned by a user (habits, symptom logs, exercises, progress logs),
//! their create payloads and partial-update patches, and the declarative
//! validation applied to them before they reach the store.

/// Identifier of any stored row.
pub type RecordId = i64;

/// Declares a closed set of string values with a fixed wire/storage spelling.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// Every accepted value.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire and storage spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        stringify!($name),
                        other,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

pub(crate) use string_enum;

pub mod exercises;
pub mod habits;
pub mod progress;
pub mod symptoms;
pub mod users;
pub mod validation;

pub use exercises::*;
pub use habits::*;
pub use progress::*;
pub use symptoms::*;
pub use users::*;
pub use validation::{Rule, Validate, ValidationError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_enum_roundtrips_storage_spelling() {
        for freq in TargetFrequency::ALL {
            assert_eq!(freq.as_str().parse::<TargetFrequency>().unwrap(), *freq);
        }
        assert_eq!(
            "as-needed".parse::<TargetFrequency>().unwrap(),
            TargetFrequency::AsNeeded
        );
    }

    #[test]
    fn test_string_enum_rejects_unknown() {
        let err = "sometimes".parse::<Mood>().unwrap_err();
        assert!(err.contains("great, good, neutral, bad, terrible"));
    }

    #[test]
    fn test_string_enum_serde_uses_kebab_spelling() {
        let json = serde_json::to_string(&ExerciseCategory::IntrusiveThoughts).unwrap();
        assert_eq!(json, "\"intrusive-thoughts\"");
        let parsed: ExerciseCategory = serde_json::from_str("\"intrusive-thoughts\"").unwrap();
        assert_eq!(parsed, ExerciseCategory::IntrusiveThoughts);
    }
}
