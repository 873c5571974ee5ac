//! Value enum for dynamic cell values.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dynamic value held in a node's data map.
///
/// Cells in a tree table are untyped field → value pairs; this enum covers
/// the value shapes the sorter and filter engine understand.
///
/// # Example
///
/// ```
/// use treegrid::value::Value;
///
/// let name = Value::from("Contoso");
/// let size = Value::from(1_000_000i64);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Date and time with timezone.
    DateTime(DateTime<Utc>),
    /// List of values (used by `in` and `between` match modes).
    List(Vec<Value>),
}

impl Value {
    /// Whether this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the inner string, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Borrow the inner list, if any.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Total ordering used by the sorter.
    ///
    /// Null sorts before every non-null value, numbers cross-compare
    /// numerically, and strings use natural ordering with numeric collation
    /// (`"item2" < "item10"`). Values of unrelated types fall back to a
    /// fixed type rank so ragged columns still order totally.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Value::Int(a), Value::Float(b)) => {
                (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Value::Float(a), Value::Int(b)) => {
                a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
            }
            (Value::String(a), Value::String(b)) => natural_cmp(a, b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => {
                for (va, vb) in a.iter().zip(b.iter()) {
                    let ord = va.compare(vb);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
            Value::DateTime(_) => 4,
            Value::List(_) => 5,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Natural string comparison with numeric collation.
///
/// Digit runs compare as whole numbers, alphabetic runs compare
/// case-insensitively. Strings that only differ in case or leading zeros
/// fall back to plain ordering so the result stays deterministic.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let av: Vec<char> = a.chars().collect();
    let bv: Vec<char> = b.chars().collect();
    let (mut i, mut j) = (0, 0);

    while i < av.len() && j < bv.len() {
        let (x, y) = (av[i], bv[j]);
        if x.is_ascii_digit() && y.is_ascii_digit() {
            let start_a = i;
            while i < av.len() && av[i].is_ascii_digit() {
                i += 1;
            }
            let start_b = j;
            while j < bv.len() && bv[j].is_ascii_digit() {
                j += 1;
            }
            let run_a: String = av[start_a..i].iter().collect();
            let run_b: String = bv[start_b..j].iter().collect();
            let num_a = run_a.trim_start_matches('0');
            let num_b = run_b.trim_start_matches('0');
            let ord = num_a
                .len()
                .cmp(&num_b.len())
                .then_with(|| num_a.cmp(num_b));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = x.to_lowercase().cmp(y.to_lowercase());
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    let remaining = (av.len() - i).cmp(&(bv.len() - j));
    if remaining != Ordering::Equal {
        remaining
    } else {
        a.cmp(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(Value::Null.compare(&Value::from(1)), Ordering::Less);
        assert_eq!(Value::from("a").compare(&Value::Null), Ordering::Greater);
        assert_eq!(Value::Null.compare(&Value::Null), Ordering::Equal);
    }

    #[test]
    fn test_numeric_cross_compare() {
        assert_eq!(Value::from(2).compare(&Value::from(10.0)), Ordering::Less);
        assert_eq!(Value::from(3.5).compare(&Value::from(3)), Ordering::Greater);
    }

    #[test]
    fn test_natural_string_order() {
        assert_eq!(natural_cmp("item2", "item10"), Ordering::Less);
        assert_eq!(natural_cmp("item10", "item10"), Ordering::Equal);
        assert_eq!(natural_cmp("Item2", "item10"), Ordering::Less);
        assert_eq!(natural_cmp("a2b3", "a2b10"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "abd"), Ordering::Less);
    }
}
