use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use steadfast_engine::{DocumentError, ElementHandle};

/// A located element in a WebDriver session.
#[derive(Debug, Clone)]
pub struct WebDriverElement {
    element: Element,
}

impl WebDriverElement {
    pub(crate) fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn inner(&self) -> &Element {
        &self.element
    }
}

/// Map a command failure on an already located element.
pub(crate) fn element_error(error: CmdError, what: &str) -> DocumentError {
    if let CmdError::Standard(wd) = &error {
        match wd.error {
            ErrorStatus::StaleElementReference => return DocumentError::StaleElement,
            ErrorStatus::ElementNotInteractable | ErrorStatus::ElementClickIntercepted => {
                return DocumentError::NotInteractable(what.to_string());
            }
            _ => {}
        }
    }
    DocumentError::Driver(format!("{}: {}", what, error))
}

#[async_trait]
impl ElementHandle for WebDriverElement {
    async fn is_displayed(&self) -> Result<bool, DocumentError> {
        self.element
            .is_displayed()
            .await
            .map_err(|e| element_error(e, "is_displayed"))
    }

    async fn is_enabled(&self) -> Result<bool, DocumentError> {
        self.element
            .is_enabled()
            .await
            .map_err(|e| element_error(e, "is_enabled"))
    }

    async fn is_selected(&self) -> Result<bool, DocumentError> {
        self.element
            .is_selected()
            .await
            .map_err(|e| element_error(e, "is_selected"))
    }

    async fn click(&self) -> Result<(), DocumentError> {
        self.element
            .click()
            .await
            .map_err(|e| element_error(e, "click"))
    }

    async fn clear(&self) -> Result<(), DocumentError> {
        self.element
            .clear()
            .await
            .map_err(|e| element_error(e, "clear"))
    }

    async fn send_keys(&self, text: &str) -> Result<(), DocumentError> {
        self.element
            .send_keys(text)
            .await
            .map_err(|e| element_error(e, "send_keys"))
    }

    async fn select_by_visible_text(&self, text: &str) -> Result<(), DocumentError> {
        match self.element.select_by_label(text).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_no_such_element() => Err(DocumentError::OptionNotFound(text.to_string())),
            Err(e) => Err(element_error(e, "select")),
        }
    }

    async fn value(&self) -> Result<Option<String>, DocumentError> {
        self.element
            .prop("value")
            .await
            .map_err(|e| element_error(e, "value"))
    }
}
