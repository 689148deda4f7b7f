//! # Circuit Breaker Module
//!
//! This module implements the circuit breaker pattern for catalog loads.
//! After repeated failed loads the breaker opens and further loads fail
//! fast until the reset timeout has elapsed.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::planner_config::RecoveryConfig;
use crate::planner_errors::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum BreakerState {
    Closed { failures: u32 },
    Open { since: Instant },
    HalfOpen,
}

/// Circuit breaker guarding catalog loads
///
/// # State Machine
///
/// - **Closed**: loads pass through, consecutive failures are counted
/// - **Open**: threshold reached, loads fail fast with `CatalogError::CircuitOpen`
/// - **Half-Open**: reset timeout elapsed, one trial load is let through;
///   success closes the circuit, failure opens it again
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    threshold: u32,
    reset_after: Duration,
}

impl CircuitBreaker {
    /// Create a closed circuit breaker from the recovery settings
    ///
    /// # Examples
    ///
    /// ```rust
    /// use meal_planner::circuit_breaker::CircuitBreaker;
    /// use meal_planner::planner_config::RecoveryConfig;
    ///
    /// let breaker = CircuitBreaker::new(&RecoveryConfig::default());
    /// assert!(breaker.check().is_ok());
    /// ```
    pub fn new(config: &RecoveryConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::Closed { failures: 0 }),
            threshold: config.circuit_breaker_threshold.max(1),
            reset_after: config.circuit_reset_after(),
        }
    }

    /// Ask permission for a load
    ///
    /// Moves an expired open circuit to half-open and lets the call through.
    pub fn check(&self) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            BreakerState::Open { since } => {
                let elapsed = since.elapsed();
                if elapsed >= self.reset_after {
                    log::info!("Catalog circuit half-open after {}s", elapsed.as_secs());
                    *state = BreakerState::HalfOpen;
                    Ok(())
                } else {
                    let remaining = self.reset_after - elapsed;
                    Err(CatalogError::CircuitOpen(format!(
                        "catalog loads suspended for another {}s",
                        remaining.as_secs().max(1)
                    )))
                }
            }
            BreakerState::Closed { .. } | BreakerState::HalfOpen => Ok(()),
        }
    }

    /// Record a failed load
    pub fn record_failure(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = match *state {
            BreakerState::Closed { failures } if failures + 1 < self.threshold => {
                BreakerState::Closed { failures: failures + 1 }
            }
            BreakerState::Open { since } => BreakerState::Open { since },
            _ => {
                log::warn!("Catalog circuit opened after repeated failures");
                BreakerState::Open { since: Instant::now() }
            }
        };
    }

    /// Record a successful load, closing the circuit
    pub fn record_success(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = BreakerState::Closed { failures: 0 };
    }

    pub fn is_open(&self) -> bool {
        matches!(
            *self.state.lock().unwrap_or_else(PoisonError::into_inner),
            BreakerState::Open { .. }
        )
    }
}
