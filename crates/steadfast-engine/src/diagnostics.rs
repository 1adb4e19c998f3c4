//! Diagnostics emitted while resolving elements and retrying actions.
//!
//! The resolver and executor never log directly. They report each step to a
//! [`DiagnosticSink`] handed to them at construction, so independent instances
//! never share an implicit global sink and tests can inspect what happened
//! without touching the filesystem.

use crate::document::ReadyState;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of one strategy within one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Resolved,
    Failed(String),
}

/// One (attempt, strategy) probe made by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionAttempt {
    pub description: String,
    pub attempt: u32,
    pub strategy_index: usize,
    pub strategy: String,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Resolution(ResolutionAttempt),

    /// No strategy matched in `attempt`; the next pass starts after `delay`.
    RetryScheduled {
        description: String,
        attempt: u32,
        delay: Duration,
    },

    /// Readiness probe between resolution attempts. Failures are informational.
    ReadinessProbe {
        description: String,
        state: Result<ReadyState, String>,
    },

    /// One invocation of a retried action.
    Action {
        description: String,
        attempt: u32,
        error: Option<String>,
    },
}

pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: &Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &Diagnostic) {
        match event {
            Diagnostic::Resolution(attempt) => match &attempt.outcome {
                AttemptOutcome::Resolved => info!(
                    description = %attempt.description,
                    attempt = attempt.attempt,
                    strategy_index = attempt.strategy_index,
                    strategy = %attempt.strategy,
                    "Resolved element"
                ),
                AttemptOutcome::Failed(reason) => debug!(
                    description = %attempt.description,
                    attempt = attempt.attempt,
                    strategy_index = attempt.strategy_index,
                    strategy = %attempt.strategy,
                    reason = %reason,
                    "Strategy failed"
                ),
            },
            Diagnostic::RetryScheduled {
                description,
                attempt,
                delay,
            } => warn!(
                description = %description,
                attempt = *attempt,
                delay_ms = delay.as_millis() as u64,
                "No strategy matched, retrying"
            ),
            Diagnostic::ReadinessProbe { description, state } => match state {
                Ok(state) => debug!(description = %description, ?state, "Document readiness"),
                Err(e) => debug!(description = %description, error = %e, "Readiness probe failed"),
            },
            Diagnostic::Action {
                description,
                attempt,
                error,
            } => match error {
                None => debug!(description = %description, attempt = *attempt, "Action succeeded"),
                Some(e) => warn!(
                    description = %description,
                    attempt = *attempt,
                    error = %e,
                    "Action attempt failed"
                ),
            },
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn resolution_attempts(&self) -> Vec<ResolutionAttempt> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Diagnostic::Resolution(attempt) => Some(attempt),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, event: &Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
