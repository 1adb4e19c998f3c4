//! [`Document`](steadfast_engine::Document) over a W3C WebDriver session.
//!
//! The driver (chromedriver, geckodriver, a Selenium grid) must already be
//! listening; this crate only opens and closes sessions on it.

pub mod capabilities;
pub mod element;
pub mod session;

pub use element::WebDriverElement;
pub use session::{SessionError, WebDriverSession};
