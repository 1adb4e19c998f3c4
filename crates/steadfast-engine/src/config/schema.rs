use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub resolver: ResolverSettings,
    #[serde(default)]
    pub actions: ActionSettings,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub artifacts: ArtifactSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_per_strategy_timeout_ms")]
    pub per_strategy_timeout_ms: u64,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            per_strategy_timeout_ms: default_per_strategy_timeout_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_per_strategy_timeout_ms() -> u64 {
    10000
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_poll_interval_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

/// Options for the WebDriver session. The driver itself must already be running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default)]
    pub browser: BrowserKind,
    #[serde(default)]
    pub headless: bool,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub window_size: Option<(u32, u32)>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            browser: BrowserKind::default(),
            headless: false,
            args: Vec::new(),
            window_size: None,
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSettings {
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_screenshot_on_failure")]
    pub screenshot_on_failure: bool,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            screenshot_dir: default_screenshot_dir(),
            log_dir: default_log_dir(),
            screenshot_on_failure: default_screenshot_on_failure(),
        }
    }
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("./screenshots")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_screenshot_on_failure() -> bool {
    true
}
