//! WebDriver session integration tests
//!
//! These tests need a chromedriver listening on STEADFAST_WEBDRIVER_URL
//! (default http://localhost:4444). They run sequentially via `#[serial]`.

use serial_test::serial;
use std::time::Duration;
use steadfast_engine::config::BrowserConfig;
use steadfast_engine::{
    Document, ElementHandle, ElementResolver, HarnessError, ReadyState, ResolveOptions, Strategy,
};
use steadfast_webdriver::WebDriverSession;

const FORM: &str = "data:text/html,<form>\
<input id='fname' name='First Name'>\
<input name='hidden' style='display:none'>\
<select name='country'><option>Austria</option><option>Canada</option></select>\
<button class='btn btn-submit' disabled>Go</button>\
</form>";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

async fn open() -> WebDriverSession {
    init_tracing();
    let config = BrowserConfig {
        webdriver_url: std::env::var("STEADFAST_WEBDRIVER_URL")
            .unwrap_or_else(|_| "http://localhost:4444".into()),
        headless: true,
        ..BrowserConfig::default()
    };
    let session = WebDriverSession::connect(&config)
        .await
        .expect("Failed to connect to WebDriver")
        .with_poll_interval(Duration::from_millis(100));
    session.navigate(FORM).await.expect("Navigation failed");
    session
}

fn quick() -> ResolveOptions {
    ResolveOptions {
        max_attempts: 2,
        per_strategy_timeout: Duration::from_millis(300),
        retry_delay: Duration::from_millis(100),
    }
}

#[tokio::test]
#[serial]
#[ignore] // Requires a running chromedriver
async fn test_resolve_and_fill() {
    let session = open().await;

    assert_eq!(session.ready_state().await.unwrap(), ReadyState::Complete);

    let resolver = ElementResolver::with_tracing(&session);
    let input = resolver
        .resolve(
            "First name",
            &[Strategy::id("missing"), Strategy::name("First Name")],
            &quick(),
        )
        .await
        .expect("Resolution failed");
    input.send_keys("Ada").await.unwrap();
    assert_eq!(input.value().await.unwrap().as_deref(), Some("Ada"));

    let select = resolver
        .resolve("Country", &[Strategy::name("country")], &quick())
        .await
        .unwrap();
    select.select_by_visible_text("Canada").await.unwrap();
    assert_eq!(select.value().await.unwrap().as_deref(), Some("Canada"));

    session.close().await.expect("Close failed");
}

#[tokio::test]
#[serial]
#[ignore] // Requires a running chromedriver
async fn test_hidden_and_disabled_are_not_resolved() {
    let session = open().await;
    let resolver = ElementResolver::with_tracing(&session);

    for (description, strategy) in [
        ("Hidden input", Strategy::name("hidden")),
        ("Disabled button", Strategy::class_name("btn-submit")),
    ] {
        let result = resolver.resolve(description, &[strategy], &quick()).await;
        assert!(
            matches!(result, Err(HarnessError::ElementNotFound { attempts: 2, .. })),
            "{} resolved unexpectedly",
            description
        );
    }

    let png = session.screenshot().await.unwrap();
    assert!(png.starts_with(b"\x89PNG"));

    session.close().await.expect("Close failed");
}
