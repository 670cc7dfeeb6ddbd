//! Persisted content values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from attribute key to a persisted raw value
pub type ContentBundle = BTreeMap<String, ContentValue>;

/// A persisted raw value
///
/// List items are nested bundles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ContentValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<ContentValue>),
    Bundle(ContentBundle),
}

impl ContentValue {
    /// Truthiness used by value resolution
    ///
    /// Empty text, zero, NaN, `false` and null are falsy. Lists and bundles
    /// are always truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            ContentValue::Null => false,
            ContentValue::Bool(b) => *b,
            ContentValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ContentValue::Text(s) => !s.is_empty(),
            ContentValue::List(_) | ContentValue::Bundle(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContentValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ContentValue]> {
        match self {
            ContentValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bundle(&self) -> Option<&ContentBundle> {
        match self {
            ContentValue::Bundle(bundle) => Some(bundle),
            _ => None,
        }
    }

    /// Render the value as control text
    pub fn to_text(&self) -> String {
        match self {
            ContentValue::Null => String::new(),
            ContentValue::Bool(b) => b.to_string(),
            ContentValue::Number(n) => format_number(*n),
            ContentValue::Text(s) => s.clone(),
            ContentValue::List(_) | ContentValue::Bundle(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::Text(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::Text(s)
    }
}

impl From<f64> for ContentValue {
    fn from(n: f64) -> Self {
        ContentValue::Number(n)
    }
}

impl From<bool> for ContentValue {
    fn from(b: bool) -> Self {
        ContentValue::Bool(b)
    }
}

impl From<ContentBundle> for ContentValue {
    fn from(bundle: ContentBundle) -> Self {
        ContentValue::Bundle(bundle)
    }
}

impl From<Vec<ContentValue>> for ContentValue {
    fn from(items: Vec<ContentValue>) -> Self {
        ContentValue::List(items)
    }
}
