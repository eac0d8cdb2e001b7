//! Identities and the username rules they are registered under.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use super::{ChirpId, UserId};
use crate::constants::{limits, messages};

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("Invalid regex pattern defined in code"))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("{}", messages::BLANK_FIELD)]
    Blank,

    #[error("Ensure this field has no more than {max} characters.")]
    TooLong { max: usize },

    #[error("{}", messages::INVALID_USERNAME)]
    InvalidCharacters,
}

/// A username that passed registration validation: word characters plus
/// `.`, `@`, `+`, `-`, at most 30 characters. Comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        if raw.is_empty() {
            return Err(UsernameError::Blank);
        }

        if raw.chars().count() > limits::USERNAME_MAX_CHARS {
            return Err(UsernameError::TooLong {
                max: limits::USERNAME_MAX_CHARS,
            });
        }

        if !username_regex().is_match(raw) {
            return Err(UsernameError::InvalidCharacters);
        }

        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered identity. Carries no credential; the password hash
/// stays inside the repository layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// An identity together with the ids of the chirps it authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub identity: Identity,
    pub chirp_ids: Vec<ChirpId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_word_characters_and_symbols() {
        for name in ["TestUser", "user_1", "a.b", "me@host", "x+y", "dash-ed", "ünïcode"] {
            assert!(Username::parse(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_invalid_characters() {
        for name in ["5\t?:|", "has space", "semi;colon", "slash/", "new\nline"] {
            assert_eq!(
                Username::parse(name),
                Err(UsernameError::InvalidCharacters),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn enforces_length_in_characters() {
        assert!(Username::parse(&"a".repeat(30)).is_ok());
        assert_eq!(
            Username::parse(&"a".repeat(31)),
            Err(UsernameError::TooLong { max: 30 })
        );
        // 30 two-byte characters still fit.
        assert!(Username::parse(&"é".repeat(30)).is_ok());
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(Username::parse(""), Err(UsernameError::Blank));
    }

    #[test]
    fn is_case_sensitive() {
        assert_ne!(
            Username::parse("TestUser").unwrap(),
            Username::parse("testuser").unwrap()
        );
    }

    #[test]
    fn error_messages_match_wire_contract() {
        assert_eq!(
            UsernameError::InvalidCharacters.to_string(),
            "Enter a valid username."
        );
        assert_eq!(
            UsernameError::TooLong { max: 30 }.to_string(),
            "Ensure this field has no more than 30 characters."
        );
    }
}
