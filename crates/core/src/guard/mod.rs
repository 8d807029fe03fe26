//! Payload/path consistency checks for write endpoints.
//!
//! A write such as `PUT /items/{item_id}` carries the identifier twice, once
//! in the path and once in the body. [`PayloadGuard`] rejects the request when
//! the two disagree, so a caller cannot address one resource and write
//! another.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

/// One payload key that must agree with one path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRule {
    pub payload_key: String,
    pub path_key: String,
}

impl GuardRule {
    pub fn new(payload_key: impl Into<String>, path_key: impl Into<String>) -> Self {
        Self {
            payload_key: payload_key.into(),
            path_key: path_key.into(),
        }
    }

    /// `("id", path_key)`.
    pub fn id(path_key: impl Into<String>) -> Self {
        Self::new("id", path_key)
    }
}

impl<P: Into<String>, Q: Into<String>> From<(P, Q)> for GuardRule {
    fn from((payload_key, path_key): (P, Q)) -> Self {
        Self::new(payload_key, path_key)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardRejection {
    #[error("Payload field '{payload_key}' does not match path parameter '{path_key}'")]
    Mismatch {
        payload_key: String,
        path_key: String,
    },
    #[error("Route has no path parameter '{0}'")]
    MissingPathParameter(String),
}

static NULL: Value = Value::Null;

/// Decides whether a payload value agrees with a path value.
pub type Compare = fn(&Value, &str) -> bool;

/// Payload value must be a JSON string equal to the path value.
pub fn string_equals(payload: &Value, path: &str) -> bool {
    payload.as_str() == Some(path)
}

#[derive(Debug, Clone)]
pub struct PayloadGuard {
    rules: Vec<GuardRule>,
    compare: Compare,
}

impl PayloadGuard {
    pub fn new<I, T>(rules: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<GuardRule>,
    {
        Self {
            rules: rules.into_iter().map(Into::into).collect(),
            compare: string_equals,
        }
    }

    /// Guard with the single rule `("id", path_key)`.
    pub fn single(path_key: impl Into<String>) -> Self {
        Self::new([GuardRule::id(path_key)])
    }

    #[must_use]
    pub fn with_compare(mut self, compare: Compare) -> Self {
        self.compare = compare;
        self
    }

    pub fn rules(&self) -> &[GuardRule] {
        &self.rules
    }

    /// Passes only if every rule passes.
    ///
    /// A key missing from the payload (or a payload that is not an object)
    /// compares as `null`. A rule naming a path parameter the route does not
    /// have is reported as [`GuardRejection::MissingPathParameter`].
    pub fn check(
        &self,
        payload: &Value,
        path: &HashMap<String, String>,
    ) -> Result<(), GuardRejection> {
        for rule in &self.rules {
            let expected = path
                .get(&rule.path_key)
                .ok_or_else(|| GuardRejection::MissingPathParameter(rule.path_key.clone()))?;
            let actual = payload.get(&rule.payload_key).unwrap_or(&NULL);
            if !(self.compare)(actual, expected) {
                tracing::debug!(
                    payload_key = %rule.payload_key,
                    path_key = %rule.path_key,
                    "Payload does not match path"
                );
                return Err(GuardRejection::Mismatch {
                    payload_key: rule.payload_key.clone(),
                    path_key: rule.path_key.clone(),
                });
            }
        }
        Ok(())
    }
}
