use std::fmt::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Failed {
        /// 1-based index and summary of the failing step; `None` when the case
        /// failed before its first step (navigation).
        step: Option<(usize, String)>,
        message: String,
        screenshot: Option<PathBuf>,
    },
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub label: String,
    pub outcome: CaseOutcome,
    pub duration: Duration,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.outcome == CaseOutcome::Passed
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub name: Option<String>,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            cases: Vec::new(),
        }
    }

    pub fn push(&mut self, case: CaseReport) {
        self.cases.push(case);
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        if let Some(name) = &self.name {
            let _ = writeln!(out, "Suite: {}", name);
        }
        for case in &self.cases {
            match &case.outcome {
                CaseOutcome::Passed => {
                    let _ = writeln!(out, "PASS {} ({}ms)", case.label, case.duration.as_millis());
                }
                CaseOutcome::Failed {
                    step,
                    message,
                    screenshot,
                } => {
                    let _ = writeln!(out, "FAIL {} ({}ms)", case.label, case.duration.as_millis());
                    if let Some((index, summary)) = step {
                        let _ = writeln!(out, "  step {}: {}", index, summary);
                    }
                    let _ = writeln!(out, "  {}", message);
                    if let Some(path) = screenshot {
                        let _ = writeln!(out, "  screenshot: {}", path.display());
                    }
                }
            }
        }
        let _ = write!(
            out,
            "{} passed, {} failed, {} total",
            self.passed(),
            self.failed(),
            self.cases.len()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut report = SuiteReport::new(Some("registration".into()));
        report.push(CaseReport {
            label: "happy path".into(),
            outcome: CaseOutcome::Passed,
            duration: Duration::from_millis(12),
        });
        report.push(CaseReport {
            label: "signup[2]".into(),
            outcome: CaseOutcome::Failed {
                step: Some((3, "check newsletter".into())),
                message: "Element 'Newsletter' not found after 3 attempt(s)".into(),
                screenshot: Some(PathBuf::from("shots/signup-2.png")),
            },
            duration: Duration::from_millis(40),
        });

        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());

        let summary = report.summary();
        assert!(summary.starts_with("Suite: registration"));
        assert!(summary.contains("PASS happy path"));
        assert!(summary.contains("step 3: check newsletter"));
        assert!(summary.contains("screenshot: shots/signup-2.png"));
        assert!(summary.ends_with("1 passed, 1 failed, 2 total"));
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = SuiteReport::default();
        assert!(report.is_success());
        assert_eq!(report.summary(), "0 passed, 0 failed, 0 total");
    }
}
