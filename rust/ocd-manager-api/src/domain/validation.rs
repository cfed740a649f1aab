//! Declarative field validation.
//!
//! Each payload type lists its constraints as [`Rule`] values; [`Validate::validate`]
//! evaluates them in declaration order and reports the first violation. Nothing
//! is persisted until validation has passed.

use std::fmt;

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field the rule applies to (camelCase, as on the wire).
    pub field: &'static str,
    /// Human-readable message returned to the client.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Field constraint evaluated before any store mutation.
#[derive(Debug, Clone)]
pub enum Rule<'a> {
    /// String must contain a non-whitespace character.
    Required {
        field: &'static str,
        value: &'a str,
        message: &'static str,
    },
    /// String must be at least `min` characters long.
    MinLength {
        field: &'static str,
        value: &'a str,
        min: usize,
        message: &'static str,
    },
    /// String must look like an email address.
    Email {
        field: &'static str,
        value: &'a str,
        message: &'static str,
    },
    /// Integer must lie in `min..=max`.
    Range {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
        message: &'static str,
    },
    /// Number must be at least `min`.
    AtLeast {
        field: &'static str,
        value: f64,
        min: f64,
        message: &'static str,
    },
}

impl Rule<'_> {
    /// Check this rule.
    pub fn check(&self) -> Result<(), ValidationError> {
        let (field, message, ok) = match *self {
            Self::Required {
                field,
                value,
                message,
            } => (field, message, !value.trim().is_empty()),
            Self::MinLength {
                field,
                value,
                min,
                message,
            } => (field, message, value.chars().count() >= min),
            Self::Email {
                field,
                value,
                message,
            } => (field, message, is_email(value)),
            Self::Range {
                field,
                value,
                min,
                max,
                message,
            } => (field, message, (min..=max).contains(&value)),
            Self::AtLeast {
                field,
                value,
                min,
                message,
            } => (field, message, value.is_finite() && value >= min),
        };

        if ok {
            Ok(())
        } else {
            Err(ValidationError {
                field,
                message: message.to_string(),
            })
        }
    }
}

/// Types that carry declarative constraints.
pub trait Validate {
    /// Constraints in the order they should be reported.
    fn rules(&self) -> Vec<Rule<'_>>;

    /// Evaluate all rules, returning the first violation.
    fn validate(&self) -> Result<(), ValidationError> {
        self.rules().iter().try_for_each(Rule::check)
    }
}

/// Minimal structural email check: one `@`, non-empty local part, dotted domain.
fn is_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
