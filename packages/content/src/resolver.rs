//! Layered value resolution.
//!
//! Effective value for a key: the override if truthy, else the persisted
//! value if truthy, else the descriptor default. A falsy value that was set
//! on purpose (`""`, `0`, `false`) falls through to the next layer.

use crate::attributes::AttributeDescriptor;
use crate::value::{ContentBundle, ContentValue};
use std::collections::BTreeMap;

/// Session-scoped edited values, shadowing the persisted bundle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideLayer {
    values: BTreeMap<String, ContentValue>,
}

impl OverrideLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: ContentValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContentValue)> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Effective values in descriptor declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedValues {
    entries: Vec<(String, ContentValue)>,
}

impl ResolvedValues {
    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Control text of a value, empty when the key is unknown
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(ContentValue::to_text).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve one key against the override and persisted layers
pub fn resolve_value(
    key: &str,
    bundle: &ContentBundle,
    overrides: &OverrideLayer,
    fallback: &ContentValue,
) -> ContentValue {
    overrides
        .get(key)
        .filter(|value| value.is_truthy())
        .or_else(|| bundle.get(key).filter(|value| value.is_truthy()))
        .unwrap_or(fallback)
        .clone()
}

/// Resolve every descriptor, in declaration order
pub fn resolve(
    bundle: &ContentBundle,
    overrides: &OverrideLayer,
    descriptors: &[AttributeDescriptor],
) -> ResolvedValues {
    let entries = descriptors
        .iter()
        .map(|descriptor| {
            let value = resolve_value(
                &descriptor.key,
                bundle,
                overrides,
                &descriptor.default_value,
            );
            (descriptor.key.clone(), value)
        })
        .collect();

    ResolvedValues { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors() -> Vec<AttributeDescriptor> {
        vec![
            AttributeDescriptor::raw_string("title", "Default title"),
            AttributeDescriptor::number("count", 7.0),
            AttributeDescriptor::raw_string("flag", "on"),
        ]
    }

    #[test]
    fn test_override_shadows_bundle() {
        let mut bundle = ContentBundle::new();
        bundle.insert("title".to_string(), ContentValue::from("Persisted"));
        let mut overrides = OverrideLayer::new();
        overrides.set("title", ContentValue::from("Edited"));

        let values = resolve(&bundle, &overrides, &descriptors());
        assert_eq!(values.get("title"), Some(&ContentValue::from("Edited")));
    }

    #[test]
    fn test_falsy_values_fall_through() {
        let mut bundle = ContentBundle::new();
        bundle.insert("title".to_string(), ContentValue::from("Persisted"));
        bundle.insert("count".to_string(), ContentValue::from(0.0));
        bundle.insert("flag".to_string(), ContentValue::from(false));

        let mut overrides = OverrideLayer::new();
        overrides.set("title", ContentValue::from(""));

        let values = resolve(&bundle, &overrides, &descriptors());
        assert_eq!(values.get("title"), Some(&ContentValue::from("Persisted")));
        assert_eq!(values.get("count"), Some(&ContentValue::from(7.0)));
        assert_eq!(values.get("flag"), Some(&ContentValue::from("on")));
    }

    #[test]
    fn test_declaration_order_kept() {
        let values = resolve(&ContentBundle::new(), &OverrideLayer::new(), &descriptors());
        let keys: Vec<&str> = values.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["title", "count", "flag"]);
        assert_eq!(values.text("count"), "7");
        assert_eq!(values.text("missing"), "");
    }
}
