//! # Planner Error Types Module
//!
//! This module defines the error types used by the catalog loader and the
//! planning operations. Application plumbing (session I/O, clipboard, main)
//! wraps these in `anyhow::Error` where it needs context.

/// Errors raised while fetching or decoding the recipe catalog
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Transport-level failures (DNS, connection refused, TLS)
    Network(String),
    /// The request did not complete within the configured timeout
    Timeout(String),
    /// The server answered with a non-success status code
    HttpStatus { status: u16, url: String },
    /// The body was not a JSON array of recipe records
    Parse(String),
    /// Local catalog file could not be read
    Io(String),
    /// Too many consecutive failures, requests are short-circuited
    CircuitOpen(String),
}

impl CatalogError {
    /// Whether another attempt might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Network(_) | CatalogError::Timeout(_) => true,
            CatalogError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            CatalogError::Parse(_) | CatalogError::Io(_) | CatalogError::CircuitOpen(_) => false,
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Network(msg) => write!(f, "Network error: {msg}"),
            CatalogError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            CatalogError::HttpStatus { status, url } => {
                write!(f, "HTTP error: {url} answered with status {status}")
            }
            CatalogError::Parse(msg) => write!(f, "Parse error: {msg}"),
            CatalogError::Io(msg) => write!(f, "I/O error: {msg}"),
            CatalogError::CircuitOpen(msg) => write!(f, "Circuit open: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::HttpStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

/// Errors raised by planning operations on a loaded collection
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// Toggle requested for an index past the end of the collection
    IndexOutOfRange { index: usize, len: usize },
    /// The catalog is still loading or failed to load
    CatalogUnavailable(String),
    /// Invalid configuration value
    Config(String),
}

impl std::fmt::Display for PlannerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlannerError::IndexOutOfRange { index, len } => {
                write!(f, "Index {index} is out of range for {len} recipes")
            }
            PlannerError::CatalogUnavailable(msg) => write!(f, "Catalog unavailable: {msg}"),
            PlannerError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for PlannerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::HttpStatus {
            status: 503,
            url: "http://localhost/recipes.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error: http://localhost/recipes.json answered with status 503"
        );

        let err = PlannerError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "Index 7 is out of range for 3 recipes");
    }

    #[test]
    fn test_transient_classification() {
        assert!(CatalogError::Timeout("slow".into()).is_transient());
        assert!(CatalogError::Network("refused".into()).is_transient());
        assert!(CatalogError::HttpStatus { status: 502, url: String::new() }.is_transient());
        assert!(CatalogError::HttpStatus { status: 429, url: String::new() }.is_transient());
        assert!(!CatalogError::HttpStatus { status: 404, url: String::new() }.is_transient());
        assert!(!CatalogError::Parse("not an array".into()).is_transient());
        assert!(!CatalogError::CircuitOpen("open".into()).is_transient());
    }
}
