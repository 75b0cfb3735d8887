use crate::error::{FitdashError, Result};
use std::fmt;

/// Prefix carried by the LLM provider's secret keys.
pub const DEFAULT_KEY_PREFIX: &str = "sk-";

/// A syntactically accepted LLM API key.
///
/// Construction is the only gate applied before the key is handed to
/// the model client: the trimmed key must be non-empty and carry the
/// expected prefix. Nothing here talks to the network, so an accepted
/// key can still be rejected by the provider later.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Accept a raw key string, trimming surrounding whitespace first.
    ///
    /// Returns [`FitdashError::InvalidApiKey`] when the trimmed key is
    /// empty or does not start with `expected_prefix`.
    pub fn parse(raw: &str, expected_prefix: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FitdashError::InvalidApiKey {
                reason: "key is empty".to_string(),
            });
        }
        if !trimmed.starts_with(expected_prefix) {
            return Err(FitdashError::InvalidApiKey {
                reason: format!("expected {expected_prefix} prefix"),
            });
        }
        Ok(ApiKey(trimmed.to_string()))
    }

    /// The accepted key, for handing to the model client.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Debug shows only the leading characters so keys stay out of logs.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(3).collect();
        write!(f, "ApiKey(\"{visible}...\")")
    }
}
