use crate::page::{DefinitionError, FieldKind, PageDefinition};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// One interaction or assertion in a test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Fill { field: String, value: String },
    Check(String),
    Uncheck(String),
    Choose(String),
    Select { field: String, option: String },
    Click(String),
    ExpectValue { field: String, value: String },
    ExpectChecked { field: String, checked: bool },
}

impl Step {
    pub fn field(&self) -> &str {
        match self {
            Step::Fill { field, .. }
            | Step::Select { field, .. }
            | Step::ExpectValue { field, .. }
            | Step::ExpectChecked { field, .. } => field,
            Step::Check(field) | Step::Uncheck(field) | Step::Choose(field) | Step::Click(field) => {
                field
            }
        }
    }

    /// Free-text value carried by the step, if any.
    fn text(&self) -> Option<&str> {
        match self {
            Step::Fill { value, .. } | Step::ExpectValue { value, .. } => Some(value),
            Step::Select { option, .. } => Some(option),
            _ => None,
        }
    }

    fn accepts(&self, kind: FieldKind) -> bool {
        match self {
            Step::Fill { .. } => kind == FieldKind::Text,
            Step::Check(_) | Step::Uncheck(_) => kind == FieldKind::Checkbox,
            Step::Choose(_) => kind == FieldKind::Radio,
            Step::Select { .. } => kind == FieldKind::Select,
            Step::Click(_) => true,
            Step::ExpectValue { .. } => matches!(kind, FieldKind::Text | FieldKind::Select),
            Step::ExpectChecked { .. } => matches!(kind, FieldKind::Checkbox | FieldKind::Radio),
        }
    }

    /// Replace `{{key}}` placeholders in the step's text with row values.
    pub fn bind(&self, row: &BTreeMap<String, String>) -> Step {
        let sub = |s: &String| substitute(s, row);
        match self {
            Step::Fill { field, value } => Step::Fill {
                field: field.clone(),
                value: sub(value),
            },
            Step::Select { field, option } => Step::Select {
                field: field.clone(),
                option: sub(option),
            },
            Step::ExpectValue { field, value } => Step::ExpectValue {
                field: field.clone(),
                value: sub(value),
            },
            other => other.clone(),
        }
    }

    /// Human-readable summary used in reports.
    pub fn summary(&self) -> String {
        match self {
            Step::Fill { field, value } => format!("fill {} with '{}'", field, value),
            Step::Check(field) => format!("check {}", field),
            Step::Uncheck(field) => format!("uncheck {}", field),
            Step::Choose(field) => format!("choose {}", field),
            Step::Select { field, option } => format!("select '{}' in {}", option, field),
            Step::Click(field) => format!("click {}", field),
            Step::ExpectValue { field, value } => format!("expect {} = '{}'", field, value),
            Step::ExpectChecked { field, checked } => {
                format!("expect {} checked = {}", field, checked)
            }
        }
    }
}

/// Replace each `{{key}}` in `text` with its row value in a single left-to-right
/// pass. Inserted values are never rescanned; unknown keys are left as written.
fn substitute(text: &str, row: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &after[..end];
        match row.get(name) {
            Some(value) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Names inside `{{...}}` in `text`, in order of appearance.
fn placeholders(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                names.push(&after[..end]);
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
    names
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDefinition {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub steps: Vec<Step>,
    /// Parameter rows. Each row runs the case once with its values bound.
    #[serde(default)]
    pub data: Vec<BTreeMap<String, String>>,
}

/// A case with one data row bound into its steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRun {
    /// `name` for unparametrized cases, `name[row]` otherwise (1-based).
    pub label: String,
    pub case_name: String,
    pub row: Option<usize>,
    pub url: String,
    pub steps: Vec<Step>,
}

impl CaseDefinition {
    pub fn runs(&self) -> Vec<CaseRun> {
        if self.data.is_empty() {
            return vec![CaseRun {
                label: self.name.clone(),
                case_name: self.name.clone(),
                row: None,
                url: self.url.clone(),
                steps: self.steps.clone(),
            }];
        }

        self.data
            .iter()
            .enumerate()
            .map(|(index, row)| CaseRun {
                label: format!("{}[{}]", self.name, index + 1),
                case_name: self.name.clone(),
                row: Some(index + 1),
                url: substitute(&self.url, row),
                steps: self.steps.iter().map(|step| step.bind(row)).collect(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub page: PageDefinition,
    pub cases: Vec<CaseDefinition>,
}

impl SuiteDefinition {
    pub fn from_yaml(content: &str) -> Result<Self, DefinitionError> {
        let suite: SuiteDefinition = serde_yaml::from_str(content)?;
        suite.validate()?;
        Ok(suite)
    }

    pub async fn load(path: &Path) -> Result<Self, DefinitionError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&content)
    }

    /// Check that cases only reference known fields with compatible steps, and
    /// that every data row binds every placeholder the case uses.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        self.page.validate()?;

        let mut seen = HashSet::new();
        for case in &self.cases {
            if !seen.insert(case.name.as_str()) {
                return Err(DefinitionError::DuplicateCase(case.name.clone()));
            }

            for step in &case.steps {
                let field = self.page.field(step.field()).ok_or_else(|| {
                    DefinitionError::UnknownField {
                        case: case.name.clone(),
                        field: step.field().to_string(),
                    }
                })?;
                if !step.accepts(field.kind) {
                    return Err(DefinitionError::IncompatibleStep {
                        case: case.name.clone(),
                        field: step.field().to_string(),
                        kind: field.kind,
                    });
                }
            }

            let used: Vec<&str> = case
                .steps
                .iter()
                .filter_map(Step::text)
                .chain(std::iter::once(case.url.as_str()))
                .flat_map(placeholders)
                .collect();
            if case.data.is_empty() {
                if let Some(missing) = used.first() {
                    return Err(DefinitionError::UnboundPlaceholder {
                        case: case.name.clone(),
                        placeholder: missing.to_string(),
                        row: None,
                    });
                }
                continue;
            }
            for (index, row) in case.data.iter().enumerate() {
                if let Some(missing) = used.iter().find(|name| !row.contains_key(**name)) {
                    return Err(DefinitionError::UnboundPlaceholder {
                        case: case.name.clone(),
                        placeholder: missing.to_string(),
                        row: Some(index + 1),
                    });
                }
            }
        }
        Ok(())
    }
}
