//! Page object over a [`PageDefinition`].
//!
//! Every operation resolves its field from scratch and then runs the actual
//! interaction through the [`ActionExecutor`], since a freshly resolved handle
//! can still go stale or be mid-animation by the time it is used.

use super::definition::{FieldDefinition, FieldKind, PageDefinition};
use crate::document::{Document, DocumentError, ElementHandle};
use crate::error::HarnessError;
use crate::executor::{ActionExecutor, ActionOptions};
use crate::resolver::{ElementResolver, ResolveOptions};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{field}' is a {actual} field, expected {}", expected_kinds(.expected))]
    WrongKind {
        field: String,
        /// Every kind the operation accepts.
        expected: Vec<FieldKind>,
        actual: FieldKind,
    },

    #[error(transparent)]
    Harness(#[from] HarnessError),
}

fn expected_kinds(kinds: &[FieldKind]) -> String {
    let names: Vec<String> = kinds.iter().map(FieldKind::to_string).collect();
    match names.as_slice() {
        [single] => single.clone(),
        _ => format!("one of {}", names.join(", ")),
    }
}

pub struct FormPage<'a, D: Document + ?Sized> {
    definition: &'a PageDefinition,
    resolver: ElementResolver<'a, D>,
    executor: ActionExecutor,
    resolve_options: ResolveOptions,
    action_options: ActionOptions,
}

impl<'a, D: Document + ?Sized> FormPage<'a, D> {
    pub fn new(
        definition: &'a PageDefinition,
        resolver: ElementResolver<'a, D>,
        executor: ActionExecutor,
    ) -> Self {
        Self {
            definition,
            resolver,
            executor,
            resolve_options: ResolveOptions::default(),
            action_options: ActionOptions::default(),
        }
    }

    pub fn with_resolve_options(mut self, options: ResolveOptions) -> Self {
        self.resolve_options = options;
        self
    }

    pub fn with_action_options(mut self, options: ActionOptions) -> Self {
        self.action_options = options;
        self
    }

    pub fn definition(&self) -> &PageDefinition {
        self.definition
    }

    /// Clear a text field and type `text` into it.
    pub async fn fill(&self, field: &str, text: &str) -> Result<(), PageError> {
        let (def, handle) = self.locate(field, &[FieldKind::Text]).await?;
        let handle = &handle;
        self.executor
            .execute(
                &format!("type into {}", def.description),
                move || async move {
                    handle.clear().await?;
                    handle.send_keys(text).await?;
                    Ok::<(), DocumentError>(())
                },
                &self.action_options,
            )
            .await?;
        Ok(())
    }

    /// Bring a checkbox to `checked`, clicking only when its state differs.
    pub async fn set_checked(&self, field: &str, checked: bool) -> Result<(), PageError> {
        let (def, handle) = self.locate(field, &[FieldKind::Checkbox]).await?;
        let handle = &handle;
        let verb = if checked { "check" } else { "uncheck" };
        self.executor
            .execute(
                &format!("{} {}", verb, def.description),
                move || async move {
                    if handle.is_selected().await? != checked {
                        handle.click().await?;
                    }
                    Ok::<(), DocumentError>(())
                },
                &self.action_options,
            )
            .await?;
        Ok(())
    }

    /// Select a radio button unless it is already selected.
    pub async fn choose(&self, field: &str) -> Result<(), PageError> {
        let (def, handle) = self.locate(field, &[FieldKind::Radio]).await?;
        let handle = &handle;
        self.executor
            .execute(
                &format!("choose {}", def.description),
                move || async move {
                    if !handle.is_selected().await? {
                        handle.click().await?;
                    }
                    Ok::<(), DocumentError>(())
                },
                &self.action_options,
            )
            .await?;
        Ok(())
    }

    /// Pick the option of a `<select>` whose visible text is `option`.
    pub async fn select(&self, field: &str, option: &str) -> Result<(), PageError> {
        let (def, handle) = self.locate(field, &[FieldKind::Select]).await?;
        let handle = &handle;
        self.executor
            .execute(
                &format!("select '{}' in {}", option, def.description),
                move || async move { handle.select_by_visible_text(option).await },
                &self.action_options,
            )
            .await?;
        Ok(())
    }

    pub async fn click(&self, field: &str) -> Result<(), PageError> {
        let (def, handle) = self.locate(field, &[]).await?;
        let handle = &handle;
        self.executor
            .execute(
                &format!("click {}", def.description),
                move || async move { handle.click().await },
                &self.action_options,
            )
            .await?;
        Ok(())
    }

    /// Current value of a text or select field. Empty when the control has none.
    pub async fn value_of(&self, field: &str) -> Result<String, PageError> {
        let (def, handle) = self.locate(field, &[FieldKind::Text, FieldKind::Select]).await?;
        let handle = &handle;
        let value = self
            .executor
            .execute(
                &format!("read {}", def.description),
                move || async move { handle.value().await },
                &self.action_options,
            )
            .await?;
        Ok(value.unwrap_or_default())
    }

    pub async fn is_checked(&self, field: &str) -> Result<bool, PageError> {
        let (def, handle) = self
            .locate(field, &[FieldKind::Checkbox, FieldKind::Radio])
            .await?;
        let handle = &handle;
        let selected = self
            .executor
            .execute(
                &format!("read state of {}", def.description),
                move || async move { handle.is_selected().await },
                &self.action_options,
            )
            .await?;
        Ok(selected)
    }

    /// Look the field up and resolve it. An empty `kinds` accepts any kind.
    async fn locate(
        &self,
        field: &str,
        kinds: &[FieldKind],
    ) -> Result<(&'a FieldDefinition, D::Handle), PageError> {
        let def = self
            .definition
            .field(field)
            .ok_or_else(|| PageError::UnknownField(field.to_string()))?;

        if !kinds.is_empty() && !kinds.contains(&def.kind) {
            return Err(PageError::WrongKind {
                field: field.to_string(),
                expected: kinds.to_vec(),
                actual: def.kind,
            });
        }

        let handle = self
            .resolver
            .resolve(&def.description, &def.strategies, &self.resolve_options)
            .await?;
        Ok((def, handle))
    }
}
