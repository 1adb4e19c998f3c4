//! Fallback-chain element resolution.
//!
//! Each call walks the strategy list in order and returns the first element that
//! is displayed and enabled. When a whole pass fails, the resolver waits
//! `retry_delay`, probes document readiness and starts another pass, up to
//! `max_attempts` passes.
//!
//! Every failing strategy pays its full `per_strategy_timeout`, so the worst case
//! for one call is
//! `max_attempts * (strategies * per_strategy_timeout) + (max_attempts - 1) * retry_delay`.
//! Strategy order is a preference, not a race: strategies never run concurrently.

use crate::config::ResolverSettings;
use crate::diagnostics::{AttemptOutcome, Diagnostic, DiagnosticSink, ResolutionAttempt, TracingSink};
use crate::document::{Document, DocumentError, ElementHandle};
use crate::error::HarnessError;
use crate::strategy::Strategy;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Full passes over the strategy list. Zero is treated as one.
    pub max_attempts: u32,
    pub per_strategy_timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            per_strategy_timeout: Duration::from_secs(10),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl From<&ResolverSettings> for ResolveOptions {
    fn from(settings: &ResolverSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            per_strategy_timeout: Duration::from_millis(settings.per_strategy_timeout_ms),
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
        }
    }
}

/// Resolves element descriptions against one borrowed document.
///
/// Holds no state between calls: every `resolve` searches from scratch.
pub struct ElementResolver<'a, D: Document + ?Sized> {
    document: &'a D,
    sink: Arc<dyn DiagnosticSink>,
}

impl<'a, D: Document + ?Sized> ElementResolver<'a, D> {
    pub fn new(document: &'a D, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { document, sink }
    }

    /// Resolver reporting through `tracing`.
    pub fn with_tracing(document: &'a D) -> Self {
        Self::new(document, Arc::new(TracingSink))
    }

    pub async fn resolve(
        &self,
        description: &str,
        strategies: &[Strategy],
        options: &ResolveOptions,
    ) -> Result<D::Handle, HarnessError> {
        if strategies.is_empty() {
            return Err(HarnessError::ElementNotFound {
                description: description.to_string(),
                attempts: 0,
                last_error: None,
            });
        }

        let max_attempts = options.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            for (index, strategy) in strategies.iter().enumerate() {
                match self.probe(strategy, options.per_strategy_timeout).await {
                    Ok(handle) => {
                        self.report(description, attempt, index, strategy, AttemptOutcome::Resolved);
                        return Ok(handle);
                    }
                    Err(e) => {
                        let reason = e.to_string();
                        self.report(
                            description,
                            attempt,
                            index,
                            strategy,
                            AttemptOutcome::Failed(reason.clone()),
                        );
                        last_error = Some(reason);
                    }
                }
            }

            if attempt < max_attempts {
                self.sink.record(&Diagnostic::RetryScheduled {
                    description: description.to_string(),
                    attempt,
                    delay: options.retry_delay,
                });
                tokio::time::sleep(options.retry_delay).await;
                self.probe_readiness(description).await;
            }
        }

        Err(HarnessError::ElementNotFound {
            description: description.to_string(),
            attempts: max_attempts,
            last_error,
        })
    }

    /// Wait for the strategy to yield a clickable element, then re-check it.
    async fn probe(&self, strategy: &Strategy, timeout: Duration) -> Result<D::Handle, DocumentError> {
        let handle = self.document.wait_until_clickable(strategy, timeout).await?;
        if handle.is_displayed().await? && handle.is_enabled().await? {
            Ok(handle)
        } else {
            Err(DocumentError::NotInteractable(strategy.to_string()))
        }
    }

    async fn probe_readiness(&self, description: &str) {
        let state = self.document.ready_state().await.map_err(|e| e.to_string());
        self.sink.record(&Diagnostic::ReadinessProbe {
            description: description.to_string(),
            state,
        });
    }

    fn report(
        &self,
        description: &str,
        attempt: u32,
        strategy_index: usize,
        strategy: &Strategy,
        outcome: AttemptOutcome,
    ) {
        self.sink.record(&Diagnostic::Resolution(ResolutionAttempt {
            description: description.to_string(),
            attempt,
            strategy_index,
            strategy: strategy.to_string(),
            outcome,
        }));
    }
}
