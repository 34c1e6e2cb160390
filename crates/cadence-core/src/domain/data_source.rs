use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Data source identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSourceId(pub String);

impl DataSourceId {
    /// Create a data source id from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DataSourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Type accepted by a data source parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Free text
    String,
    /// Any JSON number
    Number,
    /// true / false
    Boolean,
}

/// Parameter accepted by a data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name
    pub name: String,

    /// Expected value type
    #[serde(rename = "type")]
    pub param_type: ParameterType,

    /// Human readable description
    #[serde(default)]
    pub description: String,

    /// Whether a query must supply it
    #[serde(default)]
    pub required: bool,

    /// Value used when the query omits it
    #[serde(default)]
    pub default_value: Option<Value>,
}

impl ParameterSpec {
    /// Create an optional parameter without a default
    pub fn new(name: impl Into<String>, param_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: String::new(),
            required: false,
            default_value: None,
        }
    }

    /// Mark the parameter as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a default value
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Capability metadata for a named data source. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceDescriptor {
    /// Unique identifier
    pub id: DataSourceId,

    /// Display name
    pub name: String,

    /// Description shown to users
    #[serde(default)]
    pub description: String,

    /// Accepted parameters, in display order
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,

    /// Attributes present on returned rows
    #[serde(default)]
    pub available_attributes: Vec<String>,
}

impl DataSourceDescriptor {
    /// Create a descriptor with no parameters or attributes
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: DataSourceId(id.into()),
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            available_attributes: Vec::new(),
        }
    }

    /// Append a parameter spec
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the available attributes
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Names of parameters a query must supply
    pub fn required_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }

    /// Whether rows from this source carry `attribute`
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.available_attributes.iter().any(|a| a == attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_parameters() {
        let descriptor = DataSourceDescriptor::new("books-api", "Books API")
            .with_parameter(ParameterSpec::new("author", ParameterType::String).required())
            .with_parameter(ParameterSpec::new("year", ParameterType::Number).with_default(2024))
            .with_attributes(["title", "author"]);

        let required: Vec<_> = descriptor.required_parameters().collect();
        assert_eq!(required, vec!["author"]);
        assert!(descriptor.has_attribute("title"));
        assert!(!descriptor.has_attribute("price"));
    }

    #[test]
    fn test_parameter_spec_serde() {
        let spec: ParameterSpec = serde_json::from_value(json!({
            "name": "genre",
            "type": "string",
            "required": true
        }))
        .unwrap();
        assert_eq!(spec.param_type, ParameterType::String);
        assert!(spec.required);
        assert!(spec.default_value.is_none());
    }
}
