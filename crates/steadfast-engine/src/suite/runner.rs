//! Runs suite cases against a live document.
//!
//! A failing step ends its case: the runner records the failure, optionally
//! captures a screenshot, and moves on to the next case or data row.

use super::definition::{CaseDefinition, CaseRun, Step, SuiteDefinition};
use super::report::{CaseOutcome, CaseReport, SuiteReport};
use crate::config::HarnessConfig;
use crate::diagnostics::DiagnosticSink;
use crate::document::{Document, DocumentError};
use crate::executor::{ActionExecutor, ActionOptions};
use crate::page::{FormPage, PageDefinition, PageError};
use crate::resolver::{ElementResolver, ResolveOptions};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("Navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: DocumentError,
    },

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("Expected {field} to be '{expected}', found '{actual}'")]
    Expectation {
        field: String,
        expected: String,
        actual: String,
    },
}

/// Selects which cases run. An empty filter runs everything.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    /// Substring of the case name.
    pub name: Option<String>,
    /// Case must carry at least one of these tags.
    pub tags: Vec<String>,
}

impl CaseFilter {
    pub fn matches(&self, case: &CaseDefinition) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .is_none_or(|needle| case.name.contains(needle));
        let tags_ok = self.tags.is_empty() || self.tags.iter().any(|t| case.tags.contains(t));
        name_ok && tags_ok
    }

    /// Cases of `suite` this filter selects, in suite order.
    pub fn select<'s>(&self, suite: &'s SuiteDefinition) -> Vec<&'s CaseDefinition> {
        suite.cases.iter().filter(|c| self.matches(c)).collect()
    }
}

struct StepFailure {
    step: Option<(usize, String)>,
    error: CaseError,
}

pub struct SuiteRunner<'a, D: Document + ?Sized> {
    document: &'a D,
    config: &'a HarnessConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl<'a, D: Document + ?Sized> SuiteRunner<'a, D> {
    pub fn new(document: &'a D, config: &'a HarnessConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            document,
            config,
            sink,
        }
    }

    pub async fn run(&self, suite: &SuiteDefinition, filter: &CaseFilter) -> SuiteReport {
        let mut report = SuiteReport::new(suite.name.clone());

        for case in filter.select(suite) {
            for run in case.runs() {
                info!(case = %run.label, url = %run.url, "Running case");
                let started = Instant::now();

                let outcome = match self.run_case(&suite.page, &run).await {
                    Ok(()) => {
                        info!(case = %run.label, "Case passed");
                        CaseOutcome::Passed
                    }
                    Err(failure) => {
                        error!(case = %run.label, error = %failure.error, "Case failed");
                        let screenshot = self.capture(&run).await;
                        CaseOutcome::Failed {
                            step: failure.step,
                            message: failure.error.to_string(),
                            screenshot,
                        }
                    }
                };

                report.push(CaseReport {
                    label: run.label.clone(),
                    outcome,
                    duration: started.elapsed(),
                });
            }
        }

        report
    }

    async fn run_case(&self, page: &PageDefinition, run: &CaseRun) -> Result<(), StepFailure> {
        self.document
            .navigate(&run.url)
            .await
            .map_err(|source| StepFailure {
                step: None,
                error: CaseError::Navigation {
                    url: run.url.clone(),
                    source,
                },
            })?;

        let form = FormPage::new(
            page,
            ElementResolver::new(self.document, self.sink.clone()),
            ActionExecutor::new(self.sink.clone()),
        )
        .with_resolve_options(ResolveOptions::from(&self.config.resolver))
        .with_action_options(ActionOptions::from(&self.config.actions));

        for (index, step) in run.steps.iter().enumerate() {
            debug!(case = %run.label, step = index + 1, "{}", step.summary());
            execute_step(&form, step)
                .await
                .map_err(|error| StepFailure {
                    step: Some((index + 1, step.summary())),
                    error,
                })?;
        }
        Ok(())
    }

    /// Save a screenshot for a failed run. Capture problems are logged, never raised.
    async fn capture(&self, run: &CaseRun) -> Option<PathBuf> {
        let artifacts = &self.config.artifacts;
        if !artifacts.screenshot_on_failure {
            return None;
        }

        let bytes = match self.document.screenshot().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(case = %run.label, error = %e, "Screenshot capture failed");
                return None;
            }
        };

        let path = artifacts.screenshot_dir.join(screenshot_name(run));
        if let Err(e) = tokio::fs::create_dir_all(&artifacts.screenshot_dir).await {
            warn!(dir = %artifacts.screenshot_dir.display(), error = %e, "Cannot create screenshot directory");
            return None;
        }
        match tokio::fs::write(&path, &bytes).await {
            Ok(()) => {
                info!(case = %run.label, path = %path.display(), "Saved failure screenshot");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot write screenshot");
                None
            }
        }
    }
}

async fn execute_step<D: Document + ?Sized>(
    form: &FormPage<'_, D>,
    step: &Step,
) -> Result<(), CaseError> {
    match step {
        Step::Fill { field, value } => form.fill(field, value).await?,
        Step::Check(field) => form.set_checked(field, true).await?,
        Step::Uncheck(field) => form.set_checked(field, false).await?,
        Step::Choose(field) => form.choose(field).await?,
        Step::Select { field, option } => form.select(field, option).await?,
        Step::Click(field) => form.click(field).await?,
        Step::ExpectValue { field, value } => {
            let actual = form.value_of(field).await?;
            if actual != *value {
                return Err(CaseError::Expectation {
                    field: field.clone(),
                    expected: value.clone(),
                    actual,
                });
            }
        }
        Step::ExpectChecked { field, checked } => {
            let actual = form.is_checked(field).await?;
            if actual != *checked {
                return Err(CaseError::Expectation {
                    field: field.clone(),
                    expected: checked.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// `<case>.png` or `<case>-<row>.png`, with anything outside `[A-Za-z0-9_-]` replaced.
fn screenshot_name(run: &CaseRun) -> String {
    let base: String = run
        .case_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    match run.row {
        Some(row) => format!("{}-{}.png", base, row),
        None => format!("{}.png", base),
    }
}
