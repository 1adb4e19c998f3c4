//! Bounded retry around caller-supplied actions.
//!
//! The executor knows nothing about elements: the caller passes a closure that
//! performs the mutation or read (clear and type, click unless already selected,
//! select an option) and the executor re-runs it at a fixed delay until it
//! succeeds or the attempts run out. Error kinds are not distinguished.

use crate::config::ActionSettings;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::HarnessError;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOptions {
    /// Total invocations allowed. Zero is treated as one.
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl From<&ActionSettings> for ActionOptions {
    fn from(settings: &ActionSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
        }
    }
}

pub struct ActionExecutor {
    sink: Arc<dyn DiagnosticSink>,
}

impl ActionExecutor {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    pub fn with_tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Run `action` until it succeeds, at most `options.max_attempts` times.
    ///
    /// Returns the first successful output; after the last failure returns
    /// `ActionExecutionFailed` carrying the final error message.
    pub async fn execute<T, E, F, Fut>(
        &self,
        description: &str,
        mut action: F,
        options: &ActionOptions,
    ) -> Result<T, HarnessError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = options.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match action().await {
                Ok(output) => {
                    self.sink.record(&Diagnostic::Action {
                        description: description.to_string(),
                        attempt,
                        error: None,
                    });
                    return Ok(output);
                }
                Err(e) => {
                    last_error = e.to_string();
                    self.sink.record(&Diagnostic::Action {
                        description: description.to_string(),
                        attempt,
                        error: Some(last_error.clone()),
                    });
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(options.retry_delay).await;
            }
        }

        Err(HarnessError::ActionExecutionFailed {
            description: description.to_string(),
            attempts: max_attempts,
            last_error,
        })
    }
}

impl Default for ActionExecutor {
    fn default() -> Self {
        Self::with_tracing()
    }
}
