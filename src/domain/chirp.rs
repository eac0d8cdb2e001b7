//! Chirps: short, immutable, server-timestamped messages.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{ChirpId, UserId};
use crate::constants::{limits, messages};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChirpTextError {
    #[error("{}", messages::BLANK_FIELD)]
    Blank,

    #[error("Ensure this field has no more than {max} characters.")]
    TooLong { max: usize, actual: usize },
}

/// Chirp body, at most 140 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChirpText(String);

impl ChirpText {
    pub fn parse(raw: &str) -> Result<Self, ChirpTextError> {
        if raw.trim().is_empty() {
            return Err(ChirpTextError::Blank);
        }

        let actual = raw.chars().count();
        if actual > limits::CHIRP_MAX_CHARS {
            return Err(ChirpTextError::TooLong {
                max: limits::CHIRP_MAX_CHARS,
                actual,
            });
        }

        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chirp {
    pub id: ChirpId,
    /// Nullable in storage; always set when created through the chirp service.
    pub author: Option<UserId>,
    pub text: String,
    pub time_posted: DateTime<Utc>,
}
