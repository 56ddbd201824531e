//! Configuration documents
//!
//! A [`ConfigDocument`] is a configuration tree whose root is a mapping,
//! loaded from JSON or YAML text. Key order is preserved so that a migrated
//! document written back out diffs cleanly against its source.

use serde_json::{Map, Value as JsonValue};

use crate::error::DocumentError;

/// On-disk format of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

impl DocumentFormat {
    /// Guess format from a file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Configuration tree with a mapping root
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigDocument {
    root: Map<String, JsonValue>,
}

impl ConfigDocument {
    /// Create from a mapping
    #[inline]
    #[must_use]
    pub fn new(root: Map<String, JsonValue>) -> Self {
        Self { root }
    }

    /// Create from any JSON value
    ///
    /// # Errors
    /// Returns error if the value is not an object
    pub fn from_value(value: JsonValue) -> Result<Self, DocumentError> {
        match value {
            JsonValue::Object(root) => Ok(Self { root }),
            other => Err(DocumentError::NotAnObject(kind_of(&other))),
        }
    }

    /// Parse from JSON string
    ///
    /// # Errors
    /// Returns error if JSON is invalid or the root is not an object
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse from YAML string
    ///
    /// An empty YAML document is treated as an empty mapping.
    ///
    /// # Errors
    /// Returns error if YAML is invalid or the root is not an object
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        Self::from_value(value)
    }

    /// Parse in the given format
    ///
    /// # Errors
    /// Returns error if the text does not parse
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self, DocumentError> {
        match format {
            DocumentFormat::Json => Self::from_json(text),
            DocumentFormat::Yaml => Self::from_yaml(text),
        }
    }

    /// Root mapping
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Map<String, JsonValue> {
        &self.root
    }

    /// Root as a JSON value
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.root.clone())
    }

    /// Get a value by JSON pointer
    ///
    /// # Examples
    /// ```
    /// # use cfgmig_schema::ConfigDocument;
    /// let doc = ConfigDocument::from_json(r#"{"major": {"automerge": true}}"#).unwrap();
    /// assert_eq!(doc.get("/major/automerge"), Some(&serde_json::json!(true)));
    /// ```
    #[must_use]
    pub fn get(&self, pointer: &str) -> Option<&JsonValue> {
        let rest = pointer.strip_prefix('/')?;
        let (first, tail) = match rest.split_once('/') {
            Some((first, tail)) => (first, Some(tail)),
            None => (rest, None),
        };
        let value = self.root.get(&unescape(first))?;
        match tail {
            Some(tail) => value.pointer(&format!("/{tail}")),
            None => Some(value),
        }
    }

    /// Serialize to pretty JSON string
    ///
    /// # Errors
    /// Returns error if serialization fails (rare for JSON)
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(&self.root)
            .map_err(|e| DocumentError::Serialization(e.to_string()))
    }

    /// Serialize to YAML string
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        serde_yaml::to_string(&self.root).map_err(|e| DocumentError::Serialization(e.to_string()))
    }

    /// Serialize in the given format
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn render(&self, format: DocumentFormat) -> Result<String, DocumentError> {
        match format {
            DocumentFormat::Json => self.to_json(),
            DocumentFormat::Yaml => self.to_yaml(),
        }
    }
}

impl From<Map<String, JsonValue>> for ConfigDocument {
    fn from(root: Map<String, JsonValue>) -> Self {
        Self::new(root)
    }
}

impl TryFrom<JsonValue> for ConfigDocument {
    type Error = DocumentError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Human-readable JSON kind, for diagnostics
#[must_use]
pub fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn document_from_json() {
        let doc = ConfigDocument::from_json(r#"{"name": "test", "value": 42}"#).unwrap();
        assert_eq!(doc.get("/name"), Some(&json!("test")));
        assert_eq!(doc.get("/value"), Some(&json!(42)));
        assert_eq!(doc.get("/missing"), None);
    }

    #[test]
    fn document_rejects_non_object_root() {
        let err = ConfigDocument::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, DocumentError::NotAnObject("array")));
    }

    #[test]
    fn document_invalid_json() {
        assert!(ConfigDocument::from_json("not valid json").is_err());
    }

    #[test]
    fn document_from_yaml() {
        let doc = ConfigDocument::from_yaml("automerge: minor\nschedule:\n  - after 10pm\n").unwrap();
        assert_eq!(doc.get("/automerge"), Some(&json!("minor")));
        assert_eq!(doc.get("/schedule/0"), Some(&json!("after 10pm")));
    }

    #[test]
    fn document_empty_yaml_is_empty_mapping() {
        let doc = ConfigDocument::from_yaml("").unwrap();
        assert!(doc.root().is_empty());
    }

    #[test]
    fn document_preserves_key_order() {
        let doc = ConfigDocument::from_json(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<_> = doc.root().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn document_json_yaml_round_trip() {
        let doc = ConfigDocument::from_json(r#"{"extends": ["config:base"], "major": {"automerge": false}}"#)
            .unwrap();
        let yaml = doc.to_yaml().unwrap();
        let back = ConfigDocument::from_yaml(&yaml).unwrap();
        assert_eq!(doc, back);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("JSON"), Some(DocumentFormat::Json));
        assert_eq!(DocumentFormat::from_extension("yml"), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_extension("toml"), None);
    }
}
