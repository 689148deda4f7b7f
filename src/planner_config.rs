//! # Planner Configuration Module
//!
//! This module defines configuration structures for the meal planner:
//! where the recipe catalog comes from, retry and circuit breaker settings
//! for fetching it, and user-facing options such as language and clipboard
//! target. Values are read from the environment (optionally populated from
//! a `.env` file by the binary).

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;

use crate::planner_errors::PlannerError;

// Constants for planner configuration
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/Cholpon-Ishenbekova/recipe_second/refs/heads/main/recipes.json";
pub const DEFAULT_LANGUAGE: &str = "en";

pub const ENV_CATALOG_URL: &str = "MEAL_PLANNER_CATALOG_URL";
pub const ENV_CATALOG_FILE: &str = "MEAL_PLANNER_CATALOG_FILE";
pub const ENV_LANGUAGE: &str = "MEAL_PLANNER_LANG";
pub const ENV_CLIPBOARD_FILE: &str = "MEAL_PLANNER_CLIPBOARD_FILE";
pub const ENV_MAX_RETRIES: &str = "MEAL_PLANNER_MAX_RETRIES";
pub const ENV_TIMEOUT_SECS: &str = "MEAL_PLANNER_TIMEOUT_SECS";
pub const ENV_NO_PROXY: &str = "MEAL_PLANNER_NO_PROXY";

/// Recovery configuration for catalog fetches
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryConfig {
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Timeout for a single HTTP request in seconds
    pub request_timeout_secs: u64,
    /// Consecutive failed loads before the circuit opens
    pub circuit_breaker_threshold: u32,
    /// Time before an open circuit lets a trial load through, in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_retry_delay_ms: 500,
            max_retry_delay_ms: 5000,
            request_timeout_secs: 15,
            circuit_breaker_threshold: 3,
            circuit_breaker_reset_secs: 60,
        }
    }
}

impl RecoveryConfig {
    /// Delay before retry number `attempt` (0-based)
    ///
    /// Exponential backoff capped at `max_retry_delay_ms`, plus up to 25%
    /// random jitter so that reloads from several sessions do not line up.
    pub fn retry_delay<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let exponential = self
            .base_retry_delay_ms
            .saturating_mul(1u64 << attempt.min(16));
        let capped = exponential.min(self.max_retry_delay_ms);
        let jitter = if capped >= 4 { rng.gen_range(0..=capped / 4) } else { 0 };
        Duration::from_millis(capped + jitter)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn circuit_reset_after(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_reset_secs)
    }
}

/// Where the recipe catalog is read from
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    /// Remote JSON array fetched with an HTTP GET
    Http(String),
    /// Local JSON file, mostly for offline use and tests
    File(PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Http(url) => write!(f, "{url}"),
            CatalogSource::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}

/// Configuration structure for a planner session
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Catalog location
    pub source: CatalogSource,
    /// Language code for user-facing messages (e.g., "en", "fr")
    pub language: String,
    /// When set, clipboard exports are written to this file instead of stdout
    pub clipboard_file: Option<PathBuf>,
    /// Whether the HTTP client honours proxy environment variables
    pub use_system_proxy: bool,
    /// Recovery and error handling configuration
    pub recovery: RecoveryConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::Http(DEFAULT_CATALOG_URL.to_string()),
            language: DEFAULT_LANGUAGE.to_string(),
            clipboard_file: None,
            use_system_proxy: true,
            recovery: RecoveryConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self, PlannerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// `MEAL_PLANNER_CATALOG_FILE` takes precedence over
    /// `MEAL_PLANNER_CATALOG_URL`. Blank values count as unset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use meal_planner::planner_config::{CatalogSource, PlannerConfig};
    ///
    /// let config = PlannerConfig::from_lookup(|key| match key {
    ///     "MEAL_PLANNER_CATALOG_URL" => Some("http://localhost:8080/recipes.json".to_string()),
    ///     "MEAL_PLANNER_LANG" => Some("fr".to_string()),
    ///     _ => None,
    /// })?;
    ///
    /// assert_eq!(config.source, CatalogSource::Http("http://localhost:8080/recipes.json".into()));
    /// assert_eq!(config.language, "fr");
    /// # Ok::<(), meal_planner::planner_errors::PlannerError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PlannerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_CATALOG_FILE) {
            config.source = CatalogSource::File(PathBuf::from(path));
        } else if let Some(url) = get(ENV_CATALOG_URL) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(PlannerError::Config(format!(
                    "{ENV_CATALOG_URL} must be an http(s) URL, got '{url}'"
                )));
            }
            config.source = CatalogSource::Http(url);
        }

        if let Some(language) = get(ENV_LANGUAGE) {
            config.language = language;
        }
        config.clipboard_file = get(ENV_CLIPBOARD_FILE).map(PathBuf::from);

        if let Some(retries) = get(ENV_MAX_RETRIES) {
            config.recovery.max_retries = parse_number(ENV_MAX_RETRIES, &retries)?;
        }
        if let Some(timeout) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = parse_number(ENV_TIMEOUT_SECS, &timeout)?;
            if secs == 0 {
                return Err(PlannerError::Config(format!("{ENV_TIMEOUT_SECS} must be positive")));
            }
            config.recovery.request_timeout_secs = secs;
        }
        if let Some(flag) = get(ENV_NO_PROXY) {
            config.use_system_proxy = !matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, PlannerError> {
    value
        .parse()
        .map_err(|_| PlannerError::Config(format!("{key} must be a non-negative integer, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = PlannerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.source, CatalogSource::Http(DEFAULT_CATALOG_URL.to_string()));
        assert_eq!(config.language, "en");
        assert!(config.use_system_proxy);
    }

    #[test]
    fn test_catalog_file_takes_precedence() {
        let config = PlannerConfig::from_lookup(lookup_from(&[
            (ENV_CATALOG_URL, "https://example.org/recipes.json"),
            (ENV_CATALOG_FILE, "/tmp/recipes.json"),
        ]))
        .unwrap();
        assert_eq!(config.source, CatalogSource::File(PathBuf::from("/tmp/recipes.json")));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = PlannerConfig::from_lookup(lookup_from(&[(ENV_MAX_RETRIES, "many")])).unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));

        let err = PlannerConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "0")])).unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));

        let err = PlannerConfig::from_lookup(lookup_from(&[(ENV_CATALOG_URL, "ftp://x")])).unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = PlannerConfig::from_lookup(lookup_from(&[(ENV_LANGUAGE, "  "), (ENV_CLIPBOARD_FILE, "")])).unwrap();
        assert_eq!(config.language, DEFAULT_LANGUAGE);
        assert_eq!(config.clipboard_file, None);
    }

    #[test]
    fn test_retry_delay_is_capped_with_bounded_jitter() {
        let config = RecoveryConfig {
            base_retry_delay_ms: 100,
            max_retry_delay_ms: 1000,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);

        let first = config.retry_delay(0, &mut rng);
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(125));

        let late = config.retry_delay(10, &mut rng);
        assert!(late >= Duration::from_millis(1000) && late <= Duration::from_millis(1250));
    }
}
