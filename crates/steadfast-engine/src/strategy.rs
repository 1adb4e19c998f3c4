//! Query strategies: the alternative ways a single element can be located.
//!
//! A field is usually described by several strategies, ordered from the most
//! stable identifier (an `id` or `name`) down to the most structurally fragile
//! one (a positional XPath or CSS path). The resolver walks them in order.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Match on the `id` attribute.
    Id(String),
    /// Match on the `name` attribute.
    Name(String),
    /// Match on an arbitrary attribute value.
    Attribute { name: String, value: String },
    /// Match on a structural XPath expression.
    #[serde(rename = "xpath")]
    XPath(String),
    /// Match on a CSS selector.
    Css(String),
    /// Match on a single style class token.
    ClassName(String),
    /// Match an anchor by its visible text.
    LinkText(String),
}

impl Strategy {
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self::Name(value.into())
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::XPath(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::Css(value.into())
    }

    pub fn class_name(value: impl Into<String>) -> Self {
        Self::ClassName(value.into())
    }

    pub fn link_text(value: impl Into<String>) -> Self {
        Self::LinkText(value.into())
    }

    /// Short name of the strategy kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::Id(_) => "id",
            Strategy::Name(_) => "name",
            Strategy::Attribute { .. } => "attribute",
            Strategy::XPath(_) => "xpath",
            Strategy::Css(_) => "css",
            Strategy::ClassName(_) => "class",
            Strategy::LinkText(_) => "link",
        }
    }

    /// Equivalent CSS selector, for strategies that have one.
    ///
    /// `XPath` and `LinkText` cannot be expressed in CSS and return `None`.
    /// `Id` is rendered as an attribute selector so ids that are not valid
    /// CSS identifiers (leading digits, dots) still match.
    pub fn to_css(&self) -> Option<String> {
        match self {
            Strategy::Id(id) => Some(attribute_selector("id", "=", id)),
            Strategy::Name(name) => Some(attribute_selector("name", "=", name)),
            Strategy::Attribute { name, value } => Some(attribute_selector(name, "=", value)),
            Strategy::ClassName(class) => Some(attribute_selector("class", "~=", class)),
            Strategy::Css(selector) => Some(selector.clone()),
            Strategy::XPath(_) | Strategy::LinkText(_) => None,
        }
    }
}

fn attribute_selector(attribute: &str, operator: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[{}{}\"{}\"]", attribute, operator, escaped)
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Attribute { name, value } => write!(f, "attribute {}={:?}", name, value),
            Strategy::Id(v)
            | Strategy::Name(v)
            | Strategy::XPath(v)
            | Strategy::Css(v)
            | Strategy::ClassName(v)
            | Strategy::LinkText(v) => write!(f, "{}={:?}", self.kind(), v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_rendering() {
        assert_eq!(
            Strategy::id("fname").to_css().as_deref(),
            Some(r#"[id="fname"]"#)
        );
        assert_eq!(
            Strategy::name("First Name").to_css().as_deref(),
            Some(r#"[name="First Name"]"#)
        );
        assert_eq!(
            Strategy::class_name("form-input").to_css().as_deref(),
            Some(r#"[class~="form-input"]"#)
        );
        assert_eq!(
            Strategy::css("form > input:nth-of-type(1)").to_css().as_deref(),
            Some("form > input:nth-of-type(1)")
        );
        assert!(Strategy::xpath("//input[1]").to_css().is_none());
        assert!(Strategy::link_text("Home").to_css().is_none());
    }

    #[test]
    fn test_css_escapes_quotes() {
        let strategy = Strategy::attribute("placeholder", r#"Say "hi""#);
        assert_eq!(
            strategy.to_css().as_deref(),
            Some(r#"[placeholder="Say \"hi\""]"#)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Strategy::id("fname").to_string(), r#"id="fname""#);
        assert_eq!(
            Strategy::attribute("data-test", "first").to_string(),
            r#"attribute data-test="first""#
        );
    }

    #[test]
    fn test_yaml_shapes() {
        let yaml = r#"
- id: fname
- name: First Name
- attribute: { name: placeholder, value: First }
- xpath: //form/input[1]
- class_name: first-name
"#;
        let strategies: Vec<Strategy> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            strategies,
            vec![
                Strategy::id("fname"),
                Strategy::name("First Name"),
                Strategy::attribute("placeholder", "First"),
                Strategy::xpath("//form/input[1]"),
                Strategy::class_name("first-name"),
            ]
        );
    }
}
