//! Flattened field set and the field-naming contract.
//!
//! Scalars emit `{path}.value`, `{path}.name`, `{path}.id` and `{path}.type`.
//! A staged image adds `{path}.imageFile`. List containers emit `name`,
//! `type = "Fields"` and `id`, plus `{path}.fields[i].id` per item.

use crate::attributes::FieldType;
use crate::image::ImageFile;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryField {
    pub file_name: String,
    pub mime_type: String,
    #[serde(rename = "base64", with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Binary(BinaryField),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Binary(_) => None,
        }
    }
}

impl From<&ImageFile> for FieldValue {
    fn from(file: &ImageFile) -> Self {
        FieldValue::Binary(BinaryField {
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
            bytes: file.bytes.clone(),
        })
    }
}

/// Ordered key/value pairs; inserting an existing key replaces it in place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    entries: Vec<(String, FieldValue)>,
    index: HashMap<String, usize>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn insert_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, FieldValue::Text(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn extend(&mut self, other: FieldSet) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldSetVisitor;

        impl<'de> Visitor<'de> for FieldSetVisitor {
            type Value = FieldSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldSet, A::Error> {
                let mut fields = FieldSet::new();
                while let Some((key, value)) = access.next_entry::<String, FieldValue>()? {
                    fields.insert(key, value);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldSetVisitor)
    }
}

/// How `{path}.id` values are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdPolicy {
    /// A fresh id on every emission
    #[default]
    PerRender,
    /// One id per path for the emitter's lifetime
    Stable,
}

/// Writes fields following the naming contract
#[derive(Debug, Clone, Default)]
pub struct FieldEmitter {
    policy: IdPolicy,
    stable_ids: HashMap<String, String>,
}

impl FieldEmitter {
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            policy,
            stable_ids: HashMap::new(),
        }
    }

    pub fn policy(&self) -> IdPolicy {
        self.policy
    }

    fn field_id(&mut self, path: &str) -> String {
        match self.policy {
            IdPolicy::PerRender => Uuid::new_v4().to_string(),
            IdPolicy::Stable => self
                .stable_ids
                .entry(path.to_string())
                .or_insert_with(|| Uuid::new_v4().to_string())
                .clone(),
        }
    }

    /// Emit the four fields of one scalar value
    pub fn emit_value(
        &mut self,
        fields: &mut FieldSet,
        path: &str,
        name: &str,
        field_type: FieldType,
        value: impl Into<String>,
    ) {
        let id = self.field_id(path);
        fields.insert_text(format!("{}.value", path), value);
        fields.insert_text(format!("{}.name", path), name);
        fields.insert_text(format!("{}.id", path), id);
        fields.insert_text(format!("{}.type", path), field_type.as_str());
    }

    pub fn emit_image_file(&mut self, fields: &mut FieldSet, path: &str, file: &ImageFile) {
        fields.insert(format!("{}.imageFile", path), FieldValue::from(file));
    }

    /// Emit the container fields of a list
    pub fn emit_container(&mut self, fields: &mut FieldSet, path: &str, name: &str) {
        let id = self.field_id(path);
        fields.insert_text(format!("{}.name", path), name);
        fields.insert_text(format!("{}.type", path), FieldType::Fields.as_str());
        fields.insert_text(format!("{}.id", path), id);
    }

    pub fn emit_item_id(
        &mut self,
        fields: &mut FieldSet,
        list_path: &str,
        index: usize,
        synthetic_id: u64,
    ) {
        fields.insert_text(
            format!("{}.fields[{}].id", list_path, index),
            synthetic_id.to_string(),
        );
    }
}
