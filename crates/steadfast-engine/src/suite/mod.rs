pub mod definition;
pub mod report;
pub mod runner;

pub use definition::{CaseDefinition, CaseRun, Step, SuiteDefinition};
pub use report::{CaseOutcome, CaseReport, SuiteReport};
pub use runner::{CaseError, CaseFilter, SuiteRunner};
