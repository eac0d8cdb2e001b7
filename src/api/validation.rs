use axum::{Json, extract::rejection::JsonRejection};
use serde::Serialize;
use std::collections::BTreeMap;

use super::ApiError;
use crate::constants::messages;

/// Per-field validation messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Records "required" for a missing value. The returned string is only
    /// meaningful once [`FieldErrors::finish`] has succeeded.
    pub fn required(&mut self, field: &str, value: Option<String>) -> String {
        value.unwrap_or_else(|| {
            self.add(field, messages::REQUIRED_FIELD);
            String::new()
        })
    }

    /// Like [`FieldErrors::required`], also rejecting whitespace-only values.
    pub fn non_blank(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(v) if v.trim().is_empty() => {
                self.add(field, messages::BLANK_FIELD);
                v
            }
            other => self.required(field, other),
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ValidationError(self))
        }
    }
}

/// Unwraps a JSON body, turning any rejection into a 400.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(format!("JSON parse error - {}", rejection.body_text())))
}
