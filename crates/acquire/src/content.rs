//! Loaded content values

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Value a script registered as its export.
///
/// The loader never inspects it; callers downcast to whatever type their
/// script executor produces. Clones share the same allocation, and equality
/// is identity.
#[derive(Clone)]
pub struct ExportedValue(Arc<dyn Any + Send + Sync>);

impl ExportedValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl PartialEq for ExportedValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ExportedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExportedValue(..)")
    }
}

/// Content held by one cache entry
#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue {
    /// Plain text, or the acknowledgment of an injected stylesheet
    Raw(String),
    /// Response text that parsed as JSON
    Parsed(serde_json::Value),
    /// Export registered by an executed script
    Exported(ExportedValue),
}

impl ContentValue {
    /// Build a value from HTTP response text.
    ///
    /// Text that parses as JSON becomes [`ContentValue::Parsed`]; anything else
    /// stays [`ContentValue::Raw`].
    pub fn from_response(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => ContentValue::Parsed(value),
            Err(_) => ContentValue::Raw(text),
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            ContentValue::Raw(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_parsed(&self) -> Option<&serde_json::Value> {
        match self {
            ContentValue::Parsed(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_exported(&self) -> Option<&ExportedValue> {
        match self {
            ContentValue::Exported(value) => Some(value),
            _ => None,
        }
    }

    /// JSON rendering for display; exports render as a placeholder string
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ContentValue::Raw(text) => serde_json::Value::String(text.clone()),
            ContentValue::Parsed(value) => value.clone(),
            ContentValue::Exported(_) => serde_json::Value::String("<exported>".to_string()),
        }
    }
}

impl From<serde_json::Value> for ContentValue {
    fn from(value: serde_json::Value) -> Self {
        ContentValue::Parsed(value)
    }
}

impl From<String> for ContentValue {
    fn from(text: String) -> Self {
        ContentValue::Raw(text)
    }
}

impl From<&str> for ContentValue {
    fn from(text: &str) -> Self {
        ContentValue::Raw(text.to_string())
    }
}

impl From<ExportedValue> for ContentValue {
    fn from(value: ExportedValue) -> Self {
        ContentValue::Exported(value)
    }
}
