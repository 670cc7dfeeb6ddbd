//! Typed attribute descriptors and the per-type strategy table.
//!
//! Every [`AttributeType`] maps to one [`AttributeStrategy`] with a uniform
//! `bind` / `read` / `write` interface:
//!
//! - `bind` renders the standalone control for an attribute
//! - `read` parses raw control text into a typed value, validating it
//! - `write` renders a value back into control text

use crate::error::{ContentError, ContentResult};
use crate::value::ContentValue;
use resonance_vdom::VNode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    RawString,
    Number,
    Image,
    Url,
    Color,
}

/// Type tag emitted in `{path}.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    RawString,
    Number,
    Image,
    Url,
    Color,
    Fields,
    Copy,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::RawString => "RawString",
            FieldType::Number => "Number",
            FieldType::Image => "Image",
            FieldType::Url => "Url",
            FieldType::Color => "Color",
            FieldType::Fields => "Fields",
            FieldType::Copy => "Copy",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AttributeType> for FieldType {
    fn from(ty: AttributeType) -> Self {
        match ty {
            AttributeType::RawString => FieldType::RawString,
            AttributeType::Number => FieldType::Number,
            AttributeType::Image => FieldType::Image,
            AttributeType::Url => FieldType::Url,
            AttributeType::Color => FieldType::Color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    pub key: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub default_value: ContentValue,
}

impl AttributeDescriptor {
    pub fn new(
        key: impl Into<String>,
        attribute_type: AttributeType,
        default_value: impl Into<ContentValue>,
    ) -> Self {
        Self {
            key: key.into(),
            attribute_type,
            default_value: default_value.into(),
        }
    }

    pub fn raw_string(key: impl Into<String>, default_value: impl Into<ContentValue>) -> Self {
        Self::new(key, AttributeType::RawString, default_value)
    }

    pub fn number(key: impl Into<String>, default_value: f64) -> Self {
        Self::new(key, AttributeType::Number, default_value)
    }

    pub fn image(key: impl Into<String>, default_value: impl Into<ContentValue>) -> Self {
        Self::new(key, AttributeType::Image, default_value)
    }

    pub fn url(key: impl Into<String>, default_value: impl Into<ContentValue>) -> Self {
        Self::new(key, AttributeType::Url, default_value)
    }

    pub fn color(key: impl Into<String>, default_value: impl Into<ContentValue>) -> Self {
        Self::new(key, AttributeType::Color, default_value)
    }

    pub fn strategy(&self) -> &'static dyn AttributeStrategy {
        strategy_for(self.attribute_type)
    }

    /// Reject descriptor sets with repeated keys
    pub fn validate_unique(descriptors: &[AttributeDescriptor]) -> ContentResult<()> {
        let mut seen = HashSet::new();
        for descriptor in descriptors {
            if !seen.insert(descriptor.key.as_str()) {
                return Err(ContentError::DuplicateDescriptor(descriptor.key.clone()));
            }
        }
        Ok(())
    }
}

/// Uniform behavior of one attribute type
pub trait AttributeStrategy: Sync {
    /// Control name carried by editable wrappers
    fn control(&self) -> &'static str;

    /// Render the standalone control
    fn bind(&self, key: &str, path: &str, value: &ContentValue, enabled: bool) -> VNode;

    /// Parse raw control text into a typed value
    fn read(&self, key: &str, raw: &str) -> ContentResult<ContentValue>;

    /// Render a value into control text
    fn write(&self, value: &ContentValue) -> String {
        value.to_text()
    }
}

struct RawStringStrategy;
struct NumberStrategy;
struct ImageStrategy;
struct UrlStrategy;
struct ColorStrategy;

static RAW_STRING: RawStringStrategy = RawStringStrategy;
static NUMBER: NumberStrategy = NumberStrategy;
static IMAGE: ImageStrategy = ImageStrategy;
static URL: UrlStrategy = UrlStrategy;
static COLOR: ColorStrategy = ColorStrategy;

pub fn strategy_for(attribute_type: AttributeType) -> &'static dyn AttributeStrategy {
    match attribute_type {
        AttributeType::RawString => &RAW_STRING,
        AttributeType::Number => &NUMBER,
        AttributeType::Image => &IMAGE,
        AttributeType::Url => &URL,
        AttributeType::Color => &COLOR,
    }
}

/// Labelled `input` shared by the scalar strategies
fn labelled_input(
    key: &str,
    path: &str,
    input_type: &str,
    value: String,
    enabled: bool,
) -> VNode {
    let mut input = VNode::element("input")
        .with_attr("type", input_type)
        .with_attr("name", format!("{}.value", path))
        .with_attr("value", value)
        .with_attr("data-resonance-path", path);
    if !enabled {
        input = input.with_attr("disabled", "disabled");
    }

    VNode::element("label")
        .with_attr("data-resonance-attribute", key)
        .with_child(VNode::element("span").with_child(VNode::text(key)))
        .with_child(input)
}

impl AttributeStrategy for RawStringStrategy {
    fn control(&self) -> &'static str {
        "text"
    }

    fn bind(&self, key: &str, path: &str, value: &ContentValue, enabled: bool) -> VNode {
        labelled_input(key, path, "text", self.write(value), enabled)
    }

    fn read(&self, _key: &str, raw: &str) -> ContentResult<ContentValue> {
        Ok(ContentValue::Text(raw.to_string()))
    }
}

impl AttributeStrategy for NumberStrategy {
    fn control(&self) -> &'static str {
        "number"
    }

    fn bind(&self, key: &str, path: &str, value: &ContentValue, enabled: bool) -> VNode {
        labelled_input(key, path, "number", self.write(value), enabled)
    }

    fn read(&self, key: &str, raw: &str) -> ContentResult<ContentValue> {
        raw.trim()
            .parse::<f64>()
            .map(ContentValue::Number)
            .map_err(|_| ContentError::invalid(key, format!("'{}' is not a number", raw)))
    }
}

impl AttributeStrategy for ImageStrategy {
    fn control(&self) -> &'static str {
        "image"
    }

    fn bind(&self, key: &str, path: &str, value: &ContentValue, enabled: bool) -> VNode {
        let source = self.write(value);
        let mut file_input = VNode::element("input")
            .with_attr("type", "file")
            .with_attr("accept", "image/*")
            .with_attr("name", format!("{}.imageFile", path))
            .with_attr("data-resonance-path", path);
        if !enabled {
            file_input = file_input.with_attr("disabled", "disabled");
        }

        let mut control = VNode::element("div")
            .with_attr("data-resonance-attribute", key)
            .with_child(VNode::element("span").with_child(VNode::text(key)));
        if !source.is_empty() {
            control = control.with_child(
                VNode::element("img")
                    .with_attr("src", source)
                    .with_attr("alt", key),
            );
        }
        control.with_child(file_input)
    }

    fn read(&self, _key: &str, raw: &str) -> ContentResult<ContentValue> {
        Ok(ContentValue::Text(raw.to_string()))
    }
}

impl AttributeStrategy for UrlStrategy {
    fn control(&self) -> &'static str {
        "url"
    }

    fn bind(&self, key: &str, path: &str, value: &ContentValue, enabled: bool) -> VNode {
        labelled_input(key, path, "url", self.write(value), enabled)
    }

    fn read(&self, key: &str, raw: &str) -> ContentResult<ContentValue> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ContentError::invalid(key, "URL is empty"));
        }
        let scheme: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect::<String>()
            .to_ascii_lowercase();
        if scheme.starts_with("javascript:") {
            return Err(ContentError::invalid(key, "javascript: URLs are not allowed"));
        }
        Ok(ContentValue::Text(trimmed.to_string()))
    }
}

impl AttributeStrategy for ColorStrategy {
    fn control(&self) -> &'static str {
        "color"
    }

    fn bind(&self, key: &str, path: &str, value: &ContentValue, enabled: bool) -> VNode {
        labelled_input(key, path, "color", self.write(value), enabled)
    }

    fn read(&self, key: &str, raw: &str) -> ContentResult<ContentValue> {
        let trimmed = raw.trim();
        let valid = trimmed
            .strip_prefix('#')
            .map(|hex| {
                matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
            })
            .unwrap_or(false);
        if valid {
            Ok(ContentValue::Text(trimmed.to_string()))
        } else {
            Err(ContentError::invalid(
                key,
                format!("'{}' is not a hex color", raw),
            ))
        }
    }
}
