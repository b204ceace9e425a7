//! Variable values.
//!
//! A [`Value`] is the closed set of shapes a variable can take. Typed access
//! goes through [`FromValue`], which rejects mismatched shapes with
//! [`ComboError::TypeMismatch`] instead of casting.

use std::fmt;

use crate::error::{ComboError, Result};

/// A value held by a variable in an assignment.
///
/// # Example
///
/// ```
/// use comboforge_core::Value;
///
/// let v = Value::from(vec!["a", "c"]);
/// assert_eq!(v.type_name(), "selection");
/// assert!(v.is_selected());
/// assert!(!Value::Selection(vec![]).is_selected());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
    /// Subset of a multi-select domain, in domain order.
    Selection(Vec<Value>),
}

impl Value {
    /// Short name of the value's shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Text(_) => "text",
            Value::Selection(_) => "selection",
        }
    }

    /// Whether the value counts as "true/selected" for cardinality constraints.
    ///
    /// Booleans count when true, selections when non-empty; every other
    /// shape is a mandatory choice and always counts.
    pub fn is_selected(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Selection(items) => !items.is_empty(),
            Value::Int(_) | Value::Text(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_selection(&self) -> Option<&[Value]> {
        match self {
            Value::Selection(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
            Value::Selection(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Selection(items.into_iter().map(Into::into).collect())
    }
}

/// Fallible conversion out of a [`Value`].
///
/// `name` is only used to label the error.
pub trait FromValue: Sized {
    /// Shape expected by this conversion, used in error messages.
    const EXPECTED: &'static str;

    fn from_value(name: &str, value: &Value) -> Result<Self>;
}

fn mismatch(name: &str, expected: &'static str, value: &Value) -> ComboError {
    ComboError::TypeMismatch {
        name: name.to_string(),
        expected,
        found: value.type_name(),
    }
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(_name: &str, value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(name: &str, value: &Value) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| mismatch(name, Self::EXPECTED, value))
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(name: &str, value: &Value) -> Result<Self> {
        value
            .as_int()
            .ok_or_else(|| mismatch(name, Self::EXPECTED, value))
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "int";

    fn from_value(name: &str, value: &Value) -> Result<Self> {
        let i = i64::from_value(name, value)?;
        i32::try_from(i).map_err(|_| ComboError::TypeMismatch {
            name: name.to_string(),
            expected: "int (32-bit)",
            found: "int (64-bit)",
        })
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(name: &str, value: &Value) -> Result<Self> {
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| mismatch(name, Self::EXPECTED, value))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "selection";

    fn from_value(name: &str, value: &Value) -> Result<Self> {
        let items = value
            .as_selection()
            .ok_or_else(|| mismatch(name, Self::EXPECTED, value))?;
        items.iter().map(|v| T::from_value(name, v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_semantics() {
        assert!(Value::Bool(true).is_selected());
        assert!(!Value::Bool(false).is_selected());
        assert!(Value::Int(0).is_selected());
        assert!(Value::from("x").is_selected());
        assert!(!Value::Selection(vec![]).is_selected());
    }

    #[test]
    fn test_typed_extraction() {
        let sel = Value::from(vec!["a", "b"]);
        let items: Vec<String> = FromValue::from_value("m", &sel).unwrap();
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);

        assert_eq!(i32::from_value("n", &Value::Int(5)).unwrap(), 5);
        assert!(bool::from_value("n", &Value::Int(5)).is_err());
    }

    #[test]
    fn test_mismatch_reports_shapes() {
        let err = i64::from_value("flag", &Value::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            ComboError::TypeMismatch {
                name: "flag".to_string(),
                expected: "int",
                found: "bool",
            }
        );
    }

    #[test]
    fn test_i32_overflow_is_mismatch() {
        let big = Value::Int(i64::from(i32::MAX) + 1);
        assert!(matches!(
            i32::from_value("big", &big),
            Err(ComboError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }
}
