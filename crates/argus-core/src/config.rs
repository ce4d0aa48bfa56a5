//! Opaque key/value configuration payloads.
//!
//! A [`ConfigPayload`] travels down the chain on every reload. Each stage
//! reads only the keys it owns and forwards the payload untouched; the
//! base environment interprets the rest.

use indexmap::IndexMap;

use crate::error::WrapperError;

/// A single configuration value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Boolean flag.
    Bool(bool),
    /// String.
    Str(String),
}

impl ConfigValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
        }
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

/// Ordered key/value mapping passed to `reload_config`.
///
/// # Examples
///
/// ```
/// use argus_core::ConfigPayload;
///
/// let payload = ConfigPayload::new()
///     .with("num_targets", 4)
///     .with("enhanced_observation", "camera");
/// assert_eq!(payload.get_int("num_targets").unwrap(), Some(4));
/// assert_eq!(payload.get_str("enhanced_observation").unwrap(), Some("camera"));
/// assert_eq!(payload.get_int("num_cameras").unwrap(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigPayload {
    entries: IndexMap<String, ConfigValue>,
}

impl ConfigPayload {
    /// Empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Integers may be given as `i32` literals.
    pub fn with(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Integer lookup. Missing keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`WrapperError::InvalidArgument`] if the key holds another type.
    pub fn get_int(&self, key: &'static str) -> Result<Option<i64>, WrapperError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(ConfigValue::Int(v)) => Ok(Some(*v)),
            Some(other) => Err(type_mismatch(key, other, "int")),
        }
    }

    /// Boolean lookup. Missing keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`WrapperError::InvalidArgument`] if the key holds another type.
    pub fn get_bool(&self, key: &'static str) -> Result<Option<bool>, WrapperError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(ConfigValue::Bool(v)) => Ok(Some(*v)),
            Some(other) => Err(type_mismatch(key, other, "bool")),
        }
    }

    /// String lookup. Missing keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`WrapperError::InvalidArgument`] if the key holds another type.
    pub fn get_str(&self, key: &'static str) -> Result<Option<&str>, WrapperError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(ConfigValue::Str(v)) => Ok(Some(v.as_str())),
            Some(other) => Err(type_mismatch(key, other, "string")),
        }
    }
}

fn type_mismatch(key: &'static str, value: &ConfigValue, expected: &str) -> WrapperError {
    WrapperError::InvalidArgument {
        argument: key,
        value: format!("{value:?}"),
        expected: format!("{expected}, got {}", value.type_name()),
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookup_rejects_wrong_type() {
        let payload = ConfigPayload::new().with("num_targets", "four");
        let err = payload.get_int("num_targets").unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidArgument {
                argument: "num_targets",
                ..
            }
        ));
    }

    #[test]
    fn insertion_order_is_preserved() {
        let payload: ConfigPayload = [("b", 1), ("a", 2)].into_iter().collect();
        let keys: Vec<&str> = payload.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn insert_replaces_existing_value() {
        let mut payload = ConfigPayload::new().with("flag", false);
        payload.insert("flag", true);
        assert_eq!(payload.get_bool("flag").unwrap(), Some(true));
        assert_eq!(payload.len(), 1);
    }
}
