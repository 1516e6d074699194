use crate::error::{FaqError, Result};
use std::path::PathBuf;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

pub const DEFAULT_FALLBACK_MESSAGE: &str = "Sorry, I don't understand your question. Please try rephrasing or contact our support team for assistance.";

pub const THRESHOLD_ENV: &str = "FAQ_SIMILARITY_THRESHOLD";
pub const MIN_TOKEN_LEN_ENV: &str = "FAQ_MIN_TOKEN_LEN";
pub const STOPWORDS_PATH_ENV: &str = "FAQ_STOPWORDS_PATH";

/// Tunables for a single engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Minimum cosine similarity for a match to be accepted.
    pub similarity_threshold: f64,
    /// Tokens shorter than this are discarded during normalization.
    pub min_token_len: usize,
    pub fallback_message: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with any valid `FAQ_*` environment overrides.
    pub fn from_env() -> Self {
        Self {
            similarity_threshold: env_threshold(THRESHOLD_ENV, DEFAULT_SIMILARITY_THRESHOLD),
            min_token_len: env_len(MIN_TOKEN_LEN_ENV, DEFAULT_MIN_TOKEN_LEN),
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len;
        self
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.similarity_threshold)?;
        if self.min_token_len == 0 {
            return Err(FaqError::InvalidTokenLength);
        }
        Ok(())
    }
}

pub fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(FaqError::InvalidThreshold(threshold))
    }
}

/// Extra stop-word file configured through the environment, if any.
pub fn stopwords_path_from_env() -> Option<PathBuf> {
    std::env::var(STOPWORDS_PATH_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn env_threshold(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| validate_threshold(*value).is_ok())
        .unwrap_or(default)
}

fn env_len(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.similarity_threshold, 0.3);
        assert_eq!(config.min_token_len, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        for bad in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let config = EngineConfig::default().with_threshold(bad);
            assert!(matches!(
                config.validate(),
                Err(FaqError::InvalidThreshold(_))
            ));
        }
    }

    #[test]
    fn threshold_bounds_are_inclusive() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
    }

    #[test]
    fn rejects_zero_token_length() {
        let config = EngineConfig::default().with_min_token_len(0);
        assert!(matches!(
            config.validate(),
            Err(FaqError::InvalidTokenLength)
        ));
    }

    #[test]
    fn unset_env_keys_fall_back_to_defaults() {
        assert_eq!(
            env_threshold("FAQ_TEST_UNSET_THRESHOLD", DEFAULT_SIMILARITY_THRESHOLD),
            DEFAULT_SIMILARITY_THRESHOLD
        );
        assert_eq!(
            env_len("FAQ_TEST_UNSET_LEN", DEFAULT_MIN_TOKEN_LEN),
            DEFAULT_MIN_TOKEN_LEN
        );
    }
}
