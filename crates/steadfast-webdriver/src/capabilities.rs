use serde_json::{Map, Value, json};
use steadfast_engine::config::{BrowserConfig, BrowserKind};

/// W3C capabilities for a new session, with browser-specific launch args.
pub fn capabilities(config: &BrowserConfig) -> Map<String, Value> {
    let mut caps = Map::new();
    let mut args = Vec::new();

    match config.browser {
        BrowserKind::Chrome => {
            if config.headless {
                args.push("--headless=new".to_string());
                args.push("--disable-gpu".to_string());
            }
            if let Some((width, height)) = config.window_size {
                args.push(format!("--window-size={},{}", width, height));
            }
            args.extend(config.args.iter().cloned());

            caps.insert("browserName".to_string(), json!("chrome"));
            caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        }
        BrowserKind::Firefox => {
            if config.headless {
                args.push("--headless".to_string());
            }
            if let Some((width, height)) = config.window_size {
                args.push(format!("--width={}", width));
                args.push(format!("--height={}", height));
            }
            args.extend(config.args.iter().cloned());

            caps.insert("browserName".to_string(), json!("firefox"));
            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
        }
    }

    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(caps: &Map<String, Value>, key: &str) -> Vec<String> {
        caps[key]["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_chrome_headless_with_window_size() {
        let config = BrowserConfig {
            headless: true,
            window_size: Some((1280, 800)),
            args: vec!["--lang=en-US".into()],
            ..BrowserConfig::default()
        };

        let caps = capabilities(&config);

        assert_eq!(caps["browserName"], "chrome");
        assert_eq!(
            args(&caps, "goog:chromeOptions"),
            vec![
                "--headless=new",
                "--disable-gpu",
                "--window-size=1280,800",
                "--lang=en-US"
            ]
        );
    }

    #[test]
    fn test_firefox_headed_has_only_user_args() {
        let config = BrowserConfig {
            browser: BrowserKind::Firefox,
            args: vec!["-private".into()],
            ..BrowserConfig::default()
        };

        let caps = capabilities(&config);

        assert_eq!(caps["browserName"], "firefox");
        assert!(!caps.contains_key("goog:chromeOptions"));
        assert_eq!(args(&caps, "moz:firefoxOptions"), vec!["-private"]);
    }
}
