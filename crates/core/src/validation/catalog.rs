//! Locale message catalogs.
//!
//! A catalog is a JSON document of message templates keyed by rule name,
//! with optional display names for fields:
//!
//! ```json
//! {
//!   "code": "zh_TW",
//!   "messages": { "required": "{_field_} 為必填", "min": "{_field_} 不能小於 0:{length} 個字元" },
//!   "names": { "tel": "電話" }
//! }
//! ```
//!
//! Templates may reference `{_field_}`, `{_value_}`, `{_rule_}` and the rule
//! parameter either by name (`{length}`) or by position (`0:{length}`).
//! Unknown placeholders are left in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Rule;

/// Built-in English templates, used when a catalog lacks a rule.
const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("required", "The {_field_} field is required"),
    ("email", "The {_field_} field must be a valid email"),
    ("min", "The {_field_} field must be at least 0:{length} characters"),
    ("max", "The {_field_} field may not be greater than 0:{length} characters"),
];

const GENERIC_MESSAGE: &str = "The {_field_} field is invalid";

/// A locale catalog failed to parse.
#[derive(Debug, Error)]
#[error("invalid locale catalog: {0}")]
pub struct LocaleParseError(#[from] serde_json::Error);

/// Localized validation message templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleCatalog {
    /// Locale code, e.g. `zh_TW`.
    pub code: String,
    /// Message templates keyed by rule name.
    #[serde(default)]
    pub messages: HashMap<String, String>,
    /// Field display names keyed by field key.
    #[serde(default)]
    pub names: HashMap<String, String>,
}

impl Default for LocaleCatalog {
    fn default() -> Self {
        Self {
            code: "en".to_string(),
            messages: DEFAULT_MESSAGES
                .iter()
                .map(|(rule, template)| ((*rule).to_string(), (*template).to_string()))
                .collect(),
            names: HashMap::new(),
        }
    }
}

impl LocaleCatalog {
    /// Parse a catalog from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid catalog document.
    pub fn from_json(json: &str) -> Result<Self, LocaleParseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Display name for a field key.
    #[must_use]
    pub fn field_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.names.get(field).map_or(field, String::as_str)
    }

    /// Render the failure message for `rule` on `field`.
    #[must_use]
    pub fn message(&self, field: &str, rule: &Rule, value: &str) -> String {
        let template = self
            .messages
            .get(rule.name())
            .map(String::as_str)
            .or_else(|| default_template(rule.name()))
            .unwrap_or(GENERIC_MESSAGE);

        let field_name = self.field_name(field);
        interpolate(template, |position, placeholder| match placeholder {
            "_field_" => Some(field_name.to_string()),
            "_value_" => Some(value.to_string()),
            "_rule_" => Some(rule.name().to_string()),
            name => rule
                .param()
                .filter(|(param, _)| position == Some(0) || *param == name)
                .map(|(_, n)| n.to_string()),
        })
    }
}

fn default_template(rule: &str) -> Option<&'static str> {
    DEFAULT_MESSAGES
        .iter()
        .find(|(name, _)| *name == rule)
        .map(|(_, template)| *template)
}

/// Replace `{name}` and `N:{name}` placeholders using `resolve`.
fn interpolate(template: &str, resolve: impl Fn(Option<usize>, &str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((head, tail)) = rest.split_once('{') {
        let Some((name, after)) = tail.split_once('}') else {
            break;
        };

        let (literal, position) = split_position(head);
        out.push_str(literal);
        if let Some(value) = resolve(position, name) {
            out.push_str(&value);
        } else {
            out.push_str(head.get(literal.len()..).unwrap_or_default());
            out.push('{');
            out.push_str(name);
            out.push('}');
        }
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Split a trailing `N:` positional marker off the text before a brace.
fn split_position(head: &str) -> (&str, Option<usize>) {
    let Some(stripped) = head.strip_suffix(':') else {
        return (head, None);
    };
    let literal = stripped.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = stripped.get(literal.len()..).unwrap_or_default();
    digits
        .parse::<usize>()
        .map_or((head, None), |position| (literal, Some(position)))
}
