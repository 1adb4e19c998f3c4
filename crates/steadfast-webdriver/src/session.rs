use crate::capabilities::capabilities;
use crate::element::{WebDriverElement, element_error};
use async_trait::async_trait;
use fantoccini::error::{CmdError, NewSessionError};
use fantoccini::{Client, ClientBuilder, Locator};
use std::borrow::Cow;
use std::time::Duration;
use steadfast_engine::config::BrowserConfig;
use steadfast_engine::document::DEFAULT_POLL_INTERVAL;
use steadfast_engine::{Document, DocumentError, ReadyState, Strategy};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to connect to WebDriver at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: NewSessionError,
    },

    #[error("WebDriver command failed: {0}")]
    Command(#[from] CmdError),
}

pub struct WebDriverSession {
    client: Client,
    poll_interval: Duration,
}

impl WebDriverSession {
    /// Open a session on an already running driver.
    pub async fn connect(config: &BrowserConfig) -> Result<Self, SessionError> {
        info!(
            "Connecting to WebDriver at {} ({:?}, headless: {})...",
            config.webdriver_url, config.browser, config.headless
        );

        let client = ClientBuilder::native()
            .capabilities(capabilities(config))
            .connect(&config.webdriver_url)
            .await
            .map_err(|source| SessionError::Connect {
                url: config.webdriver_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn close(self) -> Result<(), SessionError> {
        info!("Closing WebDriver session");
        self.client.close().await?;
        Ok(())
    }
}

/// The WebDriver locator a strategy maps to. Strategies without a native
/// locator go through their CSS form.
#[derive(Debug, PartialEq, Eq)]
enum Selector<'a> {
    Id(&'a str),
    Css(Cow<'a, str>),
    XPath(&'a str),
    LinkText(&'a str),
}

impl<'a> Selector<'a> {
    fn for_strategy(strategy: &'a Strategy) -> Result<Self, DocumentError> {
        Ok(match strategy {
            Strategy::Id(id) => Selector::Id(id),
            Strategy::Css(css) => Selector::Css(Cow::Borrowed(css)),
            Strategy::XPath(xpath) => Selector::XPath(xpath),
            Strategy::LinkText(text) => Selector::LinkText(text),
            other => Selector::Css(Cow::Owned(other.to_css().ok_or_else(|| {
                DocumentError::NotSupported(format!("locator for {}", other))
            })?)),
        })
    }

    fn locator(&self) -> Locator<'_> {
        match self {
            Selector::Id(id) => Locator::Id(id),
            Selector::Css(css) => Locator::Css(css),
            Selector::XPath(xpath) => Locator::XPath(xpath),
            Selector::LinkText(text) => Locator::LinkText(text),
        }
    }
}

#[async_trait]
impl Document for WebDriverSession {
    type Handle = WebDriverElement;

    async fn find_element(&self, strategy: &Strategy) -> Result<WebDriverElement, DocumentError> {
        let selector = Selector::for_strategy(strategy)?;
        match self.client.find(selector.locator()).await {
            Ok(element) => Ok(WebDriverElement::new(element)),
            Err(e) if e.is_no_such_element() => Err(DocumentError::NoSuchElement(strategy.to_string())),
            Err(e) => Err(DocumentError::Driver(e.to_string())),
        }
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    async fn ready_state(&self) -> Result<ReadyState, DocumentError> {
        let value = self
            .client
            .execute("return document.readyState;", vec![])
            .await
            .map_err(|e| DocumentError::Driver(e.to_string()))?;
        let state = value.as_str().unwrap_or_default();
        debug!("document.readyState = {}", state);
        Ok(ReadyState::parse(state))
    }

    async fn navigate(&self, url: &str) -> Result<(), DocumentError> {
        info!("Navigating to: {}", url);
        self.client
            .goto(url)
            .await
            .map_err(|e| DocumentError::Driver(e.to_string()))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DocumentError> {
        self.client
            .screenshot()
            .await
            .map_err(|e| element_error(e, "screenshot"))
    }
}
