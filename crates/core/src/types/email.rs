//! Email address type used by the sign-in and registration forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Reasons an [`Email`] can be rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing was entered.
    #[error("Email is required")]
    Empty,
    /// Longer than the RFC 5321 limit.
    #[error("Email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Not shaped like `local@domain`.
    #[error("Enter a valid email address")]
    Malformed,
}

/// A trimmed, lowercased email address.
///
/// Only the shape is checked (`local@domain`, single `@`, no whitespace);
/// the backend decides whether the account exists.
///
/// ```
/// use foodio_core::Email;
///
/// let email = Email::parse("  Chef@Foodio.test ").unwrap();
/// assert_eq!(email.as_str(), "chef@foodio.test");
/// assert!(Email::parse("chef.foodio.test").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse and normalize an email address.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] when the input is blank, too long, or not of
    /// the form `local@domain`.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(EmailError::Malformed);
        }

        let (local, domain) = trimmed.split_once('@').ok_or(EmailError::Malformed)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(EmailError::Malformed);
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let email = Email::parse(" Customer@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "customer@example.com");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for input in ["no-at", "@example.com", "user@", "a@b@c", "us er@example.com"] {
            assert_eq!(Email::parse(input), Err(EmailError::Malformed), "{input}");
        }
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(EmailError::Empty.to_string(), "Email is required");
        assert_eq!(EmailError::Malformed.to_string(), "Enter a valid email address");
    }
}
