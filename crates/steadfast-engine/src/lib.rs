//! Resilient element resolution and action retry for browser-driven form tests.
//!
//! The two core pieces are independent: [`ElementResolver`] finds an
//! interactive element through an ordered fallback chain of [`Strategy`]s, and
//! [`ActionExecutor`] retries whatever the caller wants to do with it. Both run
//! against any [`Document`] implementation.

pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod executor;
pub mod page;
pub mod resolver;
pub mod strategy;
pub mod suite;

pub use diagnostics::{DiagnosticSink, RecordingSink, TracingSink};
pub use document::{Document, DocumentError, ElementHandle, ReadyState};
pub use error::HarnessError;
pub use executor::{ActionExecutor, ActionOptions};
pub use resolver::{ElementResolver, ResolveOptions};
pub use strategy::Strategy;
