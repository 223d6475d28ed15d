use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

fn default_primary_key() -> String {
    "id".to_string()
}

/// Declared type of a model attribute.
///
/// Deserializes from the type name used by the model layer (`String`, `Number`, `Date`,
/// `Boolean`, `Array`, case-insensitive). Unknown names are kept as [`AttributeType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeType {
    String,
    Number,
    Date,
    Boolean,
    Array,
    Other(String),
}

impl AttributeType {
    /// Parameter type advertised in OPTIONS descriptions.
    ///
    /// Dates and numbers both map to `integer`; anything unrecognized is a `string`.
    #[must_use]
    pub fn param_type(&self) -> &'static str {
        match self {
            AttributeType::Array => "array",
            AttributeType::Date | AttributeType::Number => "integer",
            AttributeType::Boolean => "boolean",
            AttributeType::String | AttributeType::Other(_) => "string",
        }
    }
}

impl From<String> for AttributeType {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "string" => AttributeType::String,
            "number" | "integer" => AttributeType::Number,
            "date" => AttributeType::Date,
            "boolean" | "bool" => AttributeType::Boolean,
            "array" => AttributeType::Array,
            _ => AttributeType::Other(name),
        }
    }
}

impl From<AttributeType> for String {
    fn from(kind: AttributeType) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => write!(f, "String"),
            AttributeType::Number => write!(f, "Number"),
            AttributeType::Date => write!(f, "Date"),
            AttributeType::Boolean => write!(f, "Boolean"),
            AttributeType::Array => write!(f, "Array"),
            AttributeType::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Metadata for a single model attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AttributeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attribute {
    #[must_use]
    pub fn new(kind: AttributeType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// An attribute with no declared type (advertised as `string`).
    #[must_use]
    pub fn untyped() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn param_type(&self) -> &'static str {
        self.kind
            .as_ref()
            .map_or("string", AttributeType::param_type)
    }
}

/// Display name, primary key and attributes of a model type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
}

impl ModelSchema {
    /// Create a schema with the default primary key `id` and no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: default_primary_key(),
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = key.into();
        self
    }

    /// Declare (or redeclare) an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Parse a schema from a YAML (or JSON) document.
    pub fn from_yaml_str(source: &str) -> anyhow::Result<Self> {
        let schema: ModelSchema = serde_yaml::from_str(source)?;
        if schema.name.trim().is_empty() {
            anyhow::bail!("model schema has an empty name");
        }
        Ok(schema)
    }
}
