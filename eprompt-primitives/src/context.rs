//! Caller-supplied context values.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Mapping from field name to the value supplied for it.
pub type Context = BTreeMap<String, ContextValue>;

/// A single scalar context value.
///
/// Context maps arrive as JSON objects whose values are strings, numbers,
/// booleans, or `null`. Nested objects and arrays are rejected during
/// deserialization.
///
/// # Examples
///
/// ```
/// use eprompt_primitives::ContextValue;
///
/// let value: ContextValue = serde_json::from_str("42").unwrap();
/// assert_eq!(value.to_string(), "42");
/// assert!(ContextValue::text("   ").is_blank());
/// assert!(!ContextValue::from(false).is_blank());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ContextValue {
    /// Explicit `null`, treated as absent.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer or floating point number.
    Number(Number),
    /// Free-form text.
    Text(String),
}

impl ContextValue {
    /// Creates a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns `true` for `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` when the value counts as missing for a required field.
    ///
    /// `null`, the empty string, and whitespace-only strings are blank.
    /// Numbers and booleans are never blank, including `0` and `false`.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Returns `true` when the value is neither `null` nor the empty string.
    #[must_use]
    pub fn is_supplied(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(text) => !text.is_empty(),
            Self::Bool(_) | Self::Number(_) => true,
        }
    }
}

impl Display for ContextValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(flag) => Display::fmt(flag, f),
            Self::Number(number) => Display::fmt(number, f),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl<T> From<Option<T>> for ContextValue
where
    T: Into<ContextValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
