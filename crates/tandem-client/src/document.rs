//! Normalized document values.
//!
//! Collections store schema-less documents; on the client side a document
//! is a JSON object map with a stable text serialization used both on the
//! wire and when a document is supplied as a bind payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A schema-less document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document from its JSON text form.
    ///
    /// The text must decode to a JSON object.
    pub fn parse(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            Ok(_) => Err(Error::InvalidDocument(
                "JSON text is not an object".to_string(),
            )),
            Err(err) => Err(Error::InvalidDocument(err.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The stable JSON text form of this document.
    pub fn as_json(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_else(|_| "null".to_string())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_json())
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.fields)
    }
}

/// Coercion into a [`Document`], applied wherever a statement accepts
/// document input in object, value or JSON-text form.
pub trait IntoDocument {
    fn into_document(self) -> Result<Document>;
}

impl IntoDocument for Document {
    fn into_document(self) -> Result<Document> {
        Ok(self)
    }
}

impl IntoDocument for Map<String, Value> {
    fn into_document(self) -> Result<Document> {
        Ok(Document::from(self))
    }
}

impl IntoDocument for Value {
    fn into_document(self) -> Result<Document> {
        match self {
            Value::Object(fields) => Ok(Document { fields }),
            Value::String(text) => Document::parse(&text),
            other => Err(Error::InvalidDocument(format!(
                "cannot build a document from {other}"
            ))),
        }
    }
}

impl IntoDocument for &str {
    fn into_document(self) -> Result<Document> {
        Document::parse(self)
    }
}

impl IntoDocument for String {
    fn into_document(self) -> Result<Document> {
        Document::parse(&self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_accepts_object_text() {
        let doc = Document::parse(r#"{"name": "fred", "age": 21}"#).unwrap();
        assert_eq!(doc.get("name"), Some(&json!("fred")));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn parse_rejects_non_object_text() {
        assert!(matches!(
            Document::parse("[1, 2]"),
            Err(Error::InvalidDocument(_))
        ));
        assert!(matches!(
            Document::parse("not json"),
            Err(Error::InvalidDocument(_))
        ));
    }

    #[test]
    fn coercion_from_value() {
        let doc = json!({"a": 1}).into_document().unwrap();
        assert_eq!(doc.get("a"), Some(&json!(1)));
        assert!(json!(42).into_document().is_err());
    }

    #[test]
    fn display_is_stable_json() {
        let mut doc = Document::new();
        doc.insert("a", 1);
        assert_eq!(doc.to_string(), r#"{"a":1}"#);
    }
}
