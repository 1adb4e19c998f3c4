#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use steadfast_engine::{Document, DocumentError, ElementHandle, ReadyState, Strategy};

#[derive(Debug, Clone)]
pub struct ElementState {
    pub tag: String,
    pub displayed: bool,
    pub enabled: bool,
    pub selected: bool,
    pub value: String,
    pub options: Vec<String>,
    pub clicks: usize,
    /// Interactions fail with `StaleElement` while this is non-zero.
    pub flaky_interactions: usize,
}

#[derive(Debug, Clone)]
pub struct MockElement {
    state: Arc<Mutex<ElementState>>,
}

impl MockElement {
    fn with_tag(tag: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(ElementState {
                tag: tag.into(),
                displayed: true,
                enabled: true,
                selected: false,
                value: String::new(),
                options: Vec::new(),
                clicks: 0,
                flaky_interactions: 0,
            })),
        }
    }

    pub fn input(value: &str) -> Self {
        let el = Self::with_tag("input");
        el.state.lock().unwrap().value = value.into();
        el
    }

    pub fn checkbox(selected: bool) -> Self {
        let el = Self::with_tag("checkbox");
        el.state.lock().unwrap().selected = selected;
        el
    }

    pub fn radio(selected: bool) -> Self {
        let el = Self::with_tag("radio");
        el.state.lock().unwrap().selected = selected;
        el
    }

    pub fn select(options: &[&str]) -> Self {
        let el = Self::with_tag("select");
        {
            let mut state = el.state.lock().unwrap();
            state.options = options.iter().map(|o| o.to_string()).collect();
            state.value = options.first().map(|o| o.to_string()).unwrap_or_default();
        }
        el
    }

    pub fn button() -> Self {
        Self::with_tag("button")
    }

    pub fn hidden(self) -> Self {
        self.state.lock().unwrap().displayed = false;
        self
    }

    pub fn disabled(self) -> Self {
        self.state.lock().unwrap().enabled = false;
        self
    }

    pub fn flaky(self, failures: usize) -> Self {
        self.state.lock().unwrap().flaky_interactions = failures;
        self
    }

    pub fn state(&self) -> ElementState {
        self.state.lock().unwrap().clone()
    }

    pub fn same_as(&self, other: &MockElement) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn interact(&self) -> Result<std::sync::MutexGuard<'_, ElementState>, DocumentError> {
        let mut state = self.state.lock().unwrap();
        if state.flaky_interactions > 0 {
            state.flaky_interactions -= 1;
            return Err(DocumentError::StaleElement);
        }
        Ok(state)
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    async fn is_displayed(&self) -> Result<bool, DocumentError> {
        Ok(self.state.lock().unwrap().displayed)
    }

    async fn is_enabled(&self) -> Result<bool, DocumentError> {
        Ok(self.state.lock().unwrap().enabled)
    }

    async fn is_selected(&self) -> Result<bool, DocumentError> {
        Ok(self.interact()?.selected)
    }

    async fn click(&self) -> Result<(), DocumentError> {
        let mut state = self.interact()?;
        state.clicks += 1;
        if state.tag == "checkbox" {
            state.selected = !state.selected;
        } else if state.tag == "radio" {
            state.selected = true;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), DocumentError> {
        self.interact()?.value.clear();
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), DocumentError> {
        self.interact()?.value.push_str(text);
        Ok(())
    }

    async fn select_by_visible_text(&self, text: &str) -> Result<(), DocumentError> {
        let mut state = self.interact()?;
        if !state.options.iter().any(|o| o == text) {
            return Err(DocumentError::OptionNotFound(text.into()));
        }
        state.value = text.into();
        Ok(())
    }

    async fn value(&self) -> Result<Option<String>, DocumentError> {
        Ok(Some(self.interact()?.value.clone()))
    }
}

struct Entry {
    element: MockElement,
    /// Lookups that miss before the element "renders".
    misses: usize,
}

pub struct MockDocument {
    elements: Mutex<HashMap<Strategy, Entry>>,
    lookups: Mutex<Vec<Strategy>>,
    navigations: Mutex<Vec<String>>,
    ready_probes: AtomicUsize,
    ready_fails: bool,
    screenshot: Option<Vec<u8>>,
    unreachable: Vec<String>,
    poll_interval: Duration,
}

impl Default for MockDocument {
    fn default() -> Self {
        Self {
            elements: Mutex::new(HashMap::new()),
            lookups: Mutex::new(Vec::new()),
            navigations: Mutex::new(Vec::new()),
            ready_probes: AtomicUsize::new(0),
            ready_fails: false,
            screenshot: None,
            unreachable: Vec::new(),
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl MockDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(self, strategy: Strategy, element: MockElement) -> Self {
        self.with_delayed_element(strategy, element, 0)
    }

    pub fn with_delayed_element(self, strategy: Strategy, element: MockElement, misses: usize) -> Self {
        self.elements
            .lock()
            .unwrap()
            .insert(strategy, Entry { element, misses });
        self
    }

    pub fn with_failing_ready_probe(mut self) -> Self {
        self.ready_fails = true;
        self
    }

    pub fn with_screenshot(mut self, bytes: &[u8]) -> Self {
        self.screenshot = Some(bytes.to_vec());
        self
    }

    pub fn with_unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.into());
        self
    }

    pub fn lookups_for(&self, strategy: &Strategy) -> usize {
        self.lookups
            .lock()
            .unwrap()
            .iter()
            .filter(|s| *s == strategy)
            .count()
    }

    pub fn lookup_order(&self) -> Vec<Strategy> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn total_lookups(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn ready_probes(&self) -> usize {
        self.ready_probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Document for MockDocument {
    type Handle = MockElement;

    async fn find_element(&self, strategy: &Strategy) -> Result<MockElement, DocumentError> {
        self.lookups.lock().unwrap().push(strategy.clone());
        let mut elements = self.elements.lock().unwrap();
        match elements.get_mut(strategy) {
            Some(entry) if entry.misses > 0 => {
                entry.misses -= 1;
                Err(DocumentError::NoSuchElement(strategy.to_string()))
            }
            Some(entry) => Ok(entry.element.clone()),
            None => Err(DocumentError::NoSuchElement(strategy.to_string())),
        }
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    async fn ready_state(&self) -> Result<ReadyState, DocumentError> {
        self.ready_probes.fetch_add(1, Ordering::SeqCst);
        if self.ready_fails {
            Err(DocumentError::Driver("javascript disabled".into()))
        } else {
            Ok(ReadyState::Complete)
        }
    }

    async fn navigate(&self, url: &str) -> Result<(), DocumentError> {
        self.navigations.lock().unwrap().push(url.into());
        if self.unreachable.iter().any(|u| u == url) {
            return Err(DocumentError::Driver(format!("net::ERR_NAME_NOT_RESOLVED {}", url)));
        }
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DocumentError> {
        self.screenshot
            .clone()
            .ok_or_else(|| DocumentError::NotSupported("screenshot".into()))
    }
}
