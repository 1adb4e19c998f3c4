use crate::strategy::Strategy;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};

/// Interval between lookups in the default `wait_until_clickable` loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("No element matches {0}")]
    NoSuchElement(String),

    #[error("Timed out after {timeout_ms}ms waiting for {strategy}: {last_error}")]
    Timeout {
        strategy: String,
        timeout_ms: u128,
        last_error: String,
    },

    #[error("Element matched by {0} is hidden or disabled")]
    NotInteractable(String),

    #[error("Element is no longer attached to the document")]
    StaleElement,

    #[error("Option '{0}' not found")]
    OptionNotFound(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Driver error: {0}")]
    Driver(String),
}

/// `document.readyState` as reported by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
    Other(String),
}

impl ReadyState {
    pub fn parse(state: &str) -> Self {
        match state {
            "loading" => ReadyState::Loading,
            "interactive" => ReadyState::Interactive,
            "complete" => ReadyState::Complete,
            other => ReadyState::Other(other.to_string()),
        }
    }
}

/// A located node in a live document.
///
/// Only the interactivity checks are required; the interaction methods are used
/// by the page layer and default to `NotSupported`.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    async fn is_displayed(&self) -> Result<bool, DocumentError>;

    async fn is_enabled(&self) -> Result<bool, DocumentError>;

    /// Selection state of a checkbox, radio button or option.
    async fn is_selected(&self) -> Result<bool, DocumentError> {
        Err(DocumentError::NotSupported("is_selected".into()))
    }

    async fn click(&self) -> Result<(), DocumentError> {
        Err(DocumentError::NotSupported("click".into()))
    }

    async fn clear(&self) -> Result<(), DocumentError> {
        Err(DocumentError::NotSupported("clear".into()))
    }

    async fn send_keys(&self, _text: &str) -> Result<(), DocumentError> {
        Err(DocumentError::NotSupported("send_keys".into()))
    }

    /// Select the `<option>` whose visible text equals `text`.
    async fn select_by_visible_text(&self, _text: &str) -> Result<(), DocumentError> {
        Err(DocumentError::NotSupported("select_by_visible_text".into()))
    }

    /// Current `value` property of a form control.
    async fn value(&self) -> Result<Option<String>, DocumentError> {
        Err(DocumentError::NotSupported("value".into()))
    }
}

/// The queryable document the resolver runs against.
///
/// Implementations own the browser session; resolvers and executors only borrow it.
#[async_trait]
pub trait Document: Send + Sync {
    type Handle: ElementHandle;

    /// Single immediate lookup. Fails when nothing matches.
    async fn find_element(&self, strategy: &Strategy) -> Result<Self::Handle, DocumentError>;

    /// Delay between lookups while waiting for an element.
    fn poll_interval(&self) -> Duration {
        DEFAULT_POLL_INTERVAL
    }

    /// Wait up to `timeout` for `strategy` to match an element that is both
    /// displayed and enabled.
    ///
    /// The lookup always runs at least once, so a zero timeout is a single probe.
    async fn wait_until_clickable(
        &self,
        strategy: &Strategy,
        timeout: Duration,
    ) -> Result<Self::Handle, DocumentError> {
        let deadline = Instant::now() + timeout;
        loop {
            let last_error = match self.find_element(strategy).await {
                Ok(handle) => {
                    if is_interactive(&handle).await {
                        return Ok(handle);
                    }
                    DocumentError::NotInteractable(strategy.to_string())
                }
                Err(e) => e,
            };

            let now = Instant::now();
            if now >= deadline {
                return Err(DocumentError::Timeout {
                    strategy: strategy.to_string(),
                    timeout_ms: timeout.as_millis(),
                    last_error: last_error.to_string(),
                });
            }
            sleep(self.poll_interval().min(deadline - now)).await;
        }
    }

    /// Best-effort page readiness probe.
    async fn ready_state(&self) -> Result<ReadyState, DocumentError> {
        Err(DocumentError::NotSupported("ready_state".into()))
    }

    async fn navigate(&self, _url: &str) -> Result<(), DocumentError> {
        Err(DocumentError::NotSupported("navigate".into()))
    }

    /// PNG screenshot of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, DocumentError> {
        Err(DocumentError::NotSupported("screenshot".into()))
    }
}

/// `true` when the element reports itself both displayed and enabled.
/// Errors from either check count as not interactive.
pub async fn is_interactive<H: ElementHandle + ?Sized>(handle: &H) -> bool {
    matches!(handle.is_displayed().await, Ok(true)) && matches!(handle.is_enabled().await, Ok(true))
}
