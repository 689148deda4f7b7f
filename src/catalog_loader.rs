//! # Catalog Loader Module
//!
//! Fetches the recipe catalog from its configured source. HTTP sources are
//! retried with exponential backoff and jitter on transient failures, and
//! guarded by a [`CircuitBreaker`] across loads.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::catalog::{parse_catalog, RejectedRecord};
use crate::circuit_breaker::CircuitBreaker;
use crate::planner_config::{CatalogSource, PlannerConfig, RecoveryConfig};
use crate::planner_errors::CatalogError;
use crate::recipe_model::Recipe;

/// Summary of a completed load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// Catalog location, as displayed to the user
    pub source: String,
    /// Number of fetch attempts made
    pub attempts: u32,
    pub accepted: usize,
    pub rejected: Vec<RejectedRecord>,
    pub elapsed_ms: u128,
}

/// Loads the recipe catalog from HTTP or a local file
#[derive(Debug)]
pub struct CatalogLoader {
    source: CatalogSource,
    recovery: RecoveryConfig,
    client: reqwest::Client,
    breaker: CircuitBreaker,
}

impl CatalogLoader {
    /// Create a loader for the configured source
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Network` if the HTTP client cannot be built
    /// (e.g., no TLS backend available).
    pub fn new(config: &PlannerConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.recovery.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            source: config.source.clone(),
            recovery: config.recovery.clone(),
            client,
            breaker: CircuitBreaker::new(&config.recovery),
        })
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Fetch and parse the catalog
    ///
    /// Returns the valid recipes in catalog order, all unselected, together
    /// with a report of the load.
    pub async fn load(&self) -> Result<(Vec<Recipe>, LoadReport), CatalogError> {
        let started = Instant::now();
        self.breaker.check()?;

        let outcome = match &self.source {
            CatalogSource::Http(url) => self.fetch_with_retry(url).await,
            CatalogSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map(|body| (body, 1))
                .map_err(CatalogError::from),
        };

        let (body, attempts) = match outcome {
            Ok(fetched) => fetched,
            Err(e) => {
                self.breaker.record_failure();
                warn!(source = %self.source, error = %e, "Catalog load failed");
                return Err(e);
            }
        };

        let parsed = match parse_catalog(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.breaker.record_failure();
                warn!(source = %self.source, error = %e, "Catalog body could not be parsed");
                return Err(e);
            }
        };
        self.breaker.record_success();

        let report = LoadReport {
            source: self.source.to_string(),
            attempts,
            accepted: parsed.recipes.len(),
            rejected: parsed.rejected,
            elapsed_ms: started.elapsed().as_millis(),
        };
        info!(
            source = %report.source,
            attempts = report.attempts,
            accepted = report.accepted,
            rejected = report.rejected.len(),
            elapsed_ms = report.elapsed_ms as u64,
            "Catalog loaded"
        );

        Ok((parsed.recipes, report))
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<(String, u32), CatalogError> {
        let mut rng = StdRng::from_entropy();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(url).await {
                Ok(body) => return Ok((body, attempt)),
                Err(e) if e.is_transient() && attempt <= self.recovery.max_retries => {
                    let delay = self.recovery.retry_delay(attempt - 1, &mut rng);
                    warn!(
                        url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Catalog fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, CatalogError> {
        debug!(url, "Requesting catalog");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!(url, bytes = body.len(), "Catalog response received");
        Ok(body)
    }
}
