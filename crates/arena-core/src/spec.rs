//! Parameter specifications and concrete configurations
//!
//! A [`ParameterSpec`] lists candidate values per parameter name, in the order
//! the parameters were declared. A [`Configuration`] assigns exactly one value
//! to every parameter of the spec it was expanded from.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A single parameter value (string, number, bool, ...)
pub type ParamValue = Value;

/// Errors raised while loading or validating a specification
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("Specification has no parameters")]
    Empty,
    #[error("Parameter '{0}' must map to an array of candidate values")]
    NotAnArray(String),
    #[error("Duplicate parameter '{0}'")]
    Duplicate(String),
    #[error("Failed to read specification: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid specification document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One named parameter and its ordered candidate values
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub values: Vec<ParamValue>,
}

/// Ordered mapping from parameter name to candidate values
///
/// Declaration order is significant: the first parameter is the outermost
/// loop of the cartesian expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSpec {
    params: Vec<Parameter>,
}

impl ParameterSpec {
    /// Create an empty specification
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion; replaces the candidates of an existing parameter
    pub fn with(mut self, name: &str, values: Vec<ParamValue>) -> Self {
        self.insert(name, values);
        self
    }

    /// Insert or replace a parameter, keeping its original position on replace
    pub fn insert(&mut self, name: &str, values: Vec<ParamValue>) {
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.values = values,
            None => self.params.push(Parameter {
                name: name.to_string(),
                values,
            }),
        }
    }

    /// Candidate values for a parameter
    pub fn values(&self, name: &str) -> Option<&[ParamValue]> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.values.as_slice())
    }

    /// Parameters in declaration order
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of configurations the spec expands to
    ///
    /// `None` when the count does not fit in a `usize`.
    pub fn combination_count(&self) -> Option<usize> {
        if self.params.is_empty() || self.params.iter().any(|p| p.values.is_empty()) {
            return Some(0);
        }
        self.params
            .iter()
            .try_fold(1usize, |acc, p| acc.checked_mul(p.values.len()))
    }

    /// Reject a spec that would silently expand to nothing because it has no parameters
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.params.is_empty() {
            return Err(SpecError::Empty);
        }
        Ok(())
    }

    /// Parse a JSON object document (`{"name": [values...]}`)
    pub fn from_json_str(json: &str) -> Result<Self, SpecError> {
        let raw: RawSpec = serde_json::from_str(json)?;
        raw.into_spec()
    }

    /// Load a JSON spec document from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SpecError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl Serialize for ParameterSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for p in &self.params {
            map.serialize_entry(&p.name, &p.values)?;
        }
        map.end()
    }
}

/// Order-preserving intermediate form of a spec document
struct RawSpec(Vec<(String, Value)>);

impl RawSpec {
    fn into_spec(self) -> Result<ParameterSpec, SpecError> {
        let mut spec = ParameterSpec::new();
        for (name, value) in self.0 {
            if spec.values(&name).is_some() {
                return Err(SpecError::Duplicate(name));
            }
            match value {
                Value::Array(values) => spec.insert(&name, values),
                _ => return Err(SpecError::NotAnArray(name)),
            }
        }
        Ok(spec)
    }
}

impl<'de> Deserialize<'de> for RawSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawVisitor;

        impl<'de> Visitor<'de> for RawVisitor {
            type Value = RawSpec;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping parameter names to candidate arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawSpec, A::Error> {
                let mut entries = Vec::new();
                while let Some((k, v)) = access.next_entry::<String, Value>()? {
                    entries.push((k, v));
                }
                Ok(RawSpec(entries))
            }
        }

        deserializer.deserialize_map(RawVisitor)
    }
}

impl<'de> Deserialize<'de> for ParameterSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawSpec::deserialize(deserializer)?
            .into_spec()
            .map_err(serde::de::Error::custom)
    }
}

/// One concrete value per parameter
///
/// Keys are kept sorted so that two configurations with the same assignments
/// always serialize to the same canonical key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(BTreeMap<String, ParamValue>);

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style assignment
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn set(&mut self, name: &str, value: ParamValue) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical serialization used to key combination ratings
    pub fn canonical_key(&self) -> String {
        // Map keys are sorted and values are plain JSON, so this cannot fail
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl FromIterator<(String, ParamValue)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Canonical key for a single parameter value
pub fn value_key(value: &ParamValue) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
