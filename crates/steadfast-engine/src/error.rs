use thiserror::Error;

/// Terminal failures raised once a resolver or executor has exhausted its attempts.
///
/// An element that never existed and one that existed but never became
/// interactive both surface as `ElementNotFound`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HarnessError {
    #[error(
        "Element '{description}' not found after {attempts} attempt(s){}",
        cause_suffix(.last_error)
    )]
    ElementNotFound {
        description: String,
        attempts: u32,
        last_error: Option<String>,
    },

    #[error("Action '{description}' failed after {attempts} attempt(s): {last_error}")]
    ActionExecutionFailed {
        description: String,
        attempts: u32,
        last_error: String,
    },
}

fn cause_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(": {}", e),
        None => String::new(),
    }
}

impl HarnessError {
    pub fn description(&self) -> &str {
        match self {
            HarnessError::ElementNotFound { description, .. }
            | HarnessError::ActionExecutionFailed { description, .. } => description,
        }
    }
}
