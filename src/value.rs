//! Dynamic values for tokens and finished parse trees.
//!
//! Token formatters may emit arbitrary caller-chosen data, and expression
//! builders may rewrite subtrees into arbitrary shapes, so the engine moves
//! everything around as one JSON-like sum type. `Map` keeps insertion order;
//! the structural comparator below treats it as an unordered key-set.

use std::borrow::Cow;

#[derive(Clone, PartialEq, Eq, Debug, derive_more::From)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl From<&str> for Value { fn from(s: &str) -> Value { Value::Str(s.to_string()) } }
impl From<char> for Value { fn from(c: char) -> Value { Value::Str(c.to_string()) } }

impl Value {
    /// Deep structural equality: lists compare element-wise in order, maps
    /// compare as unordered key-sets. This is the default deduplication
    /// predicate for parse results.
    pub fn structural_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structural_eq(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                // Vec-backed maps may hold duplicate keys, so containment is
                // checked in both directions.
                map_covered_by(a, b) && map_covered_by(b, a)
            }
            _ => false,
        }
    }

    /// The text a grammar terminal is matched against. Strings match their
    /// raw content; everything else matches its rendered form.
    pub(crate) fn match_text(&self) -> Cow<'_, str> {
        match self {
            Value::Str(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }
}

fn map_covered_by(a: &[(String, Value)], b: &[(String, Value)]) -> bool {
    a.iter().all(|(k, v)| {
        b.iter()
            .any(|(k2, v2)| k == k2 && v.structural_eq(v2))
    })
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> serde_json::Value {
        match v {
            Value::Unit => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(pairs) => serde_json::Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Value {
        match v {
            serde_json::Value::Null => Value::Unit,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // non-integral numbers keep their textual rendering
                None => Value::Str(n.to_string()),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(pairs) => {
                Value::Map(pairs.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/value.rs"]
mod tests_for_value;
