mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use steadfast_engine::TracingSink;
use steadfast_engine::config::{ConfigLoader, HarnessConfig};
use steadfast_engine::suite::{CaseFilter, SuiteDefinition, SuiteRunner};
use steadfast_webdriver::WebDriverSession;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "steadfast", version, about = "Resilient browser form tests")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to ./steadfast.yaml, then ~/.steadfast/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Run a suite against a WebDriver session
    Run {
        suite: PathBuf,

        /// Only run cases whose name contains this text
        #[arg(long)]
        filter: Option<String>,

        /// Only run cases carrying one of these tags
        #[arg(long)]
        tag: Vec<String>,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Parse and validate a suite without opening a browser
    Check { suite: PathBuf },
}

#[derive(clap::Args, Default)]
struct Overrides {
    /// WebDriver URL (e.g. http://localhost:9515)
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Run the browser headless
    #[arg(long)]
    headless: bool,

    #[arg(long)]
    screenshot_dir: Option<PathBuf>,

    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, config: &mut HarnessConfig) {
        if let Some(url) = self.webdriver_url {
            config.browser.webdriver_url = url;
        }
        if self.headless {
            config.browser.headless = true;
        }
        if let Some(dir) = self.screenshot_dir {
            config.artifacts.screenshot_dir = dir;
        }
        if let Some(dir) = self.log_dir {
            config.artifacts.log_dir = dir;
        }
    }
}

/// How a `run` ended, mapped onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    Passed,
    Failed,
    /// The filter selected no cases; no browser session was opened.
    NothingSelected,
}

impl From<RunOutcome> for ExitCode {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Passed => ExitCode::SUCCESS,
            RunOutcome::Failed => ExitCode::FAILURE,
            RunOutcome::NothingSelected => ExitCode::from(2),
        }
    }
}

async fn run_suite(
    config: &HarnessConfig,
    suite_path: &Path,
    filter: &CaseFilter,
) -> anyhow::Result<RunOutcome> {
    let suite = SuiteDefinition::load(suite_path)
        .await
        .with_context(|| format!("loading suite {}", suite_path.display()))?;

    if filter.select(&suite).is_empty() {
        eprintln!("No cases matched the filter");
        return Ok(RunOutcome::NothingSelected);
    }

    let session = WebDriverSession::connect(&config.browser)
        .await?
        .with_poll_interval(Duration::from_millis(config.resolver.poll_interval_ms));

    let report = SuiteRunner::new(&session, config, Arc::new(TracingSink))
        .run(&suite, filter)
        .await;

    if let Err(e) = session.close().await {
        warn!("Failed to close WebDriver session: {}", e);
    }

    println!("{}", report.summary());
    info!(
        passed = report.passed(),
        failed = report.failed(),
        "Suite finished"
    );

    Ok(if report.is_success() {
        RunOutcome::Passed
    } else {
        RunOutcome::Failed
    })
}

async fn check(suite_path: &Path) -> anyhow::Result<ExitCode> {
    let suite = SuiteDefinition::load(suite_path)
        .await
        .with_context(|| format!("checking suite {}", suite_path.display()))?;

    let runs: usize = suite.cases.iter().map(|c| c.runs().len()).sum();
    println!(
        "{}: {} field(s), {} case(s), {} run(s)",
        suite_path.display(),
        suite.page.fields.len(),
        suite.cases.len(),
        runs
    );
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        Command::Run {
            suite,
            filter,
            tag,
            overrides,
        } => {
            let mut config = ConfigLoader::load(args.config.as_deref()).await?;
            overrides.apply(&mut config);
            let _guard = logging::init(args.verbose, Some(&config.artifacts.log_dir))?;

            let filter = CaseFilter { name: filter, tags: tag };
            let outcome = run_suite(&config, &suite, &filter).await?;
            Ok(outcome.into())
        }
        Command::Check { suite } => {
            let _guard = logging::init(args.verbose, None)?;
            check(&suite).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_arguments() {
        let args = Args::try_parse_from([
            "steadfast",
            "run",
            "suites/registration.yaml",
            "--tag",
            "smoke",
            "--tag",
            "slow",
            "--headless",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.verbose, 2);
        match args.command {
            Command::Run {
                suite,
                tag,
                overrides,
                ..
            } => {
                assert_eq!(suite, PathBuf::from("suites/registration.yaml"));
                assert_eq!(tag, vec!["smoke", "slow"]);
                assert!(overrides.headless);
            }
            Command::Check { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn test_overrides_replace_config() {
        let mut config = HarnessConfig::default();
        Overrides {
            webdriver_url: Some("http://localhost:9515".into()),
            headless: true,
            screenshot_dir: Some(PathBuf::from("/tmp/shots")),
            log_dir: None,
        }
        .apply(&mut config);

        assert_eq!(config.browser.webdriver_url, "http://localhost:9515");
        assert!(config.browser.headless);
        assert_eq!(config.artifacts.screenshot_dir, PathBuf::from("/tmp/shots"));
        assert_eq!(config.artifacts.log_dir, PathBuf::from("./logs"));
    }

    #[tokio::test]
    async fn test_unmatched_filter_exits_before_connecting() {
        let dir = tempfile::TempDir::new().unwrap();
        let suite_path = dir.path().join("suite.yaml");
        std::fs::write(
            &suite_path,
            include_str!("../../../suites/registration.yaml"),
        )
        .unwrap();

        let mut config = HarnessConfig::default();
        // Nothing listens here, so any connection attempt would fail the test
        config.browser.webdriver_url = "http://127.0.0.1:9".into();
        let filter = CaseFilter {
            name: None,
            tags: vec!["no-such-tag".into()],
        };

        let outcome = run_suite(&config, &suite_path, &filter).await.unwrap();
        assert_eq!(outcome, RunOutcome::NothingSelected);
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut config = HarnessConfig::default();
        config.browser.headless = true;
        Overrides::default().apply(&mut config);
        assert!(config.browser.headless);
        assert_eq!(config.browser.webdriver_url, "http://localhost:4444");
    }
}
