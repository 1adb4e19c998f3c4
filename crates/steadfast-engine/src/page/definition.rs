use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Checkbox,
    Radio,
    Select,
    Button,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Select => "select",
            FieldKind::Button => "button",
        };
        f.write_str(name)
    }
}

/// One control on the page and the ordered ways to find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Human-readable label used in diagnostics and failures.
    pub description: String,
    pub kind: FieldKind,
    /// Most stable first.
    pub strategies: Vec<Strategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDefinition>,
}

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to parse definition: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to read definition: {0}")]
    Io(#[from] std::io::Error),

    #[error("Field '{0}' has no locator strategies")]
    NoStrategies(String),

    #[error("Case '{case}' refers to unknown field '{field}'")]
    UnknownField { case: String, field: String },

    #[error("Case '{case}' uses field '{field}' ({kind}) with an incompatible step")]
    IncompatibleStep {
        case: String,
        field: String,
        kind: FieldKind,
    },

    #[error(
        "Case '{case}' placeholder '{{{{{placeholder}}}}}' is not bound {}",
        row_clause(.row)
    )]
    UnboundPlaceholder {
        case: String,
        placeholder: String,
        /// 1-based data row; `None` when the case has no data rows at all.
        row: Option<usize>,
    },

    #[error("Duplicate case name '{0}'")]
    DuplicateCase(String),
}

fn row_clause(row: &Option<usize>) -> String {
    match row {
        Some(row) => format!("by data row {}", row),
        None => "(case has no data rows)".to_string(),
    }
}

impl PageDefinition {
    pub fn from_yaml(content: &str) -> Result<Self, DefinitionError> {
        let page: PageDefinition = serde_yaml::from_str(content)?;
        page.validate()?;
        Ok(page)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        for (name, field) in &self.fields {
            if field.strategies.is_empty() {
                return Err(DefinitionError::NoStrategies(name.clone()));
            }
        }
        Ok(())
    }
}
