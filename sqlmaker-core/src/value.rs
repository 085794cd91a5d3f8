//! Value types for query descriptions and SQL parameters
//!
//! A query description is a tree of [`Value`]s. Containers are classified
//! once, when they are built: a container whose keys are exactly `"0"`
//! through `"n-1"` in ascending order is an ordered list, anything else is a
//! keyed map. The compilers downstream only ever switch on [`Value::shape`].

use crate::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{self, Display};

/// A single primitive value, the only thing ever bound to a placeholder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// String value
    String(String),
}

impl Scalar {
    /// Borrow the string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) => "integer",
            Scalar::String(_) => "string",
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "NULL"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::String(s) => write!(f, "{}", s),
        }
    }
}

/// Shape of a value as seen by the compilers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    OrderedList,
    KeyedMap,
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar => write!(f, "scalar"),
            Shape::OrderedList => write!(f, "ordered list"),
            Shape::KeyedMap => write!(f, "keyed map"),
        }
    }
}

/// An insertion-ordered map with unique string keys
///
/// Inserting a key that is already present replaces its value and keeps
/// the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedMap {
    entries: Vec<(String, Value)>,
}

impl KeyedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// The only entry of a map that must hold exactly one
    pub fn single(&self, context: &str) -> Result<(&str, &Value)> {
        match self.entries.as_slice() {
            [(k, v)] => Ok((k.as_str(), v)),
            entries => Err(Error::unknown_type(format!(
                "{} expects a map with exactly one entry, got {}",
                context,
                entries.len()
            ))),
        }
    }

    /// Whether the keys are exactly "0".."n-1" in order
    fn has_list_keys(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, (k, _))| *k == i.to_string())
    }
}

impl<K, V> FromIterator<(K, V)> for KeyedMap
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = KeyedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for KeyedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A node of a query description
///
/// `Map` cannot be built directly outside this crate. Maps come from
/// [`Value::from_entries`], `From<KeyedMap>` or `TryFrom<serde_json::Value>`,
/// which all turn positional keys into a `List`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    List(Vec<Value>),
    #[non_exhaustive]
    Map(KeyedMap),
}

impl Value {
    /// Build a container from key/value pairs, classifying it as a list
    /// when the keys are the positions `"0".."n-1"`.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map: KeyedMap = entries.into_iter().collect();
        if map.has_list_keys() {
            Value::List(map.entries.into_iter().map(|(_, v)| v).collect())
        } else {
            Value::Map(map)
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Value::Scalar(_) => Shape::Scalar,
            Value::List(_) => Shape::OrderedList,
            Value::Map(_) => Shape::KeyedMap,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&KeyedMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// True for containers without elements; scalars are never empty
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(_) => false,
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
        }
    }

    /// Short name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(s) => s.type_name(),
            Value::List(_) => "ordered list",
            Value::Map(_) => "keyed map",
        }
    }

    /// The scalar payload, or an error naming `context`
    pub fn expect_scalar(&self, context: &str) -> Result<&Scalar> {
        self.as_scalar().ok_or_else(|| {
            Error::unknown_type(format!(
                "{} expects a scalar, got {}",
                context,
                self.type_name()
            ))
        })
    }

    /// The string payload, or an error naming `context`
    pub fn expect_str(&self, context: &str) -> Result<&str> {
        self.as_str().ok_or_else(|| {
            Error::unknown_type(format!(
                "{} expects a string, got {}",
                context,
                self.type_name()
            ))
        })
    }

    /// The list payload, or an error naming `context`
    pub fn expect_list(&self, context: &str) -> Result<&[Value]> {
        self.as_list().ok_or_else(|| {
            Error::unknown_type(format!(
                "{} expects an ordered list, got {}",
                context,
                self.type_name()
            ))
        })
    }

    /// The map payload, or an error naming `context`
    pub fn expect_map(&self, context: &str) -> Result<&KeyedMap> {
        self.as_map().ok_or_else(|| {
            Error::unknown_type(format!(
                "{} expects a keyed map, got {}",
                context,
                self.type_name()
            ))
        })
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from($v: $ty) -> Self {
                    $body
                }
            }

            impl From<$ty> for Value {
                fn from(val: $ty) -> Self {
                    Value::Scalar(Scalar::from(val))
                }
            }
        )*
    };
}

impl_from_scalar! {
    () => |_v| Scalar::Null,
    bool => |v| Scalar::Bool(v),
    i8 => |v| Scalar::Int(i64::from(v)),
    i16 => |v| Scalar::Int(i64::from(v)),
    i32 => |v| Scalar::Int(i64::from(v)),
    i64 => |v| Scalar::Int(v),
    u8 => |v| Scalar::Int(i64::from(v)),
    u16 => |v| Scalar::Int(i64::from(v)),
    u32 => |v| Scalar::Int(i64::from(v)),
    String => |v| Scalar::String(v),
    &str => |v| Scalar::String(v.to_string()),
}

#[cfg(feature = "datetime-support")]
impl_from_scalar! {
    chrono::NaiveDate => |v| Scalar::String(v.to_string()),
    chrono::NaiveDateTime => |v| Scalar::String(v.to_string()),
}

#[cfg(feature = "uuid-support")]
impl_from_scalar! {
    uuid::Uuid => |v| Scalar::String(v.hyphenated().to_string()),
}

#[cfg(feature = "decimal-support")]
impl_from_scalar! {
    rust_decimal::Decimal => |v| Scalar::String(v.to_string()),
}

impl From<Scalar> for Value {
    fn from(val: Scalar) -> Self {
        Value::Scalar(val)
    }
}

/// Classifies the map: keys `"0".."n-1"` (or no keys) give a `List`
impl From<KeyedMap> for Value {
    fn from(map: KeyedMap) -> Self {
        Value::from_entries(map.entries)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(vals: Vec<T>) -> Self {
        Value::List(vals.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(val) => val.into(),
            None => Value::Scalar(Scalar::Null),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = Error;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        Ok(match json {
            Json::Null => Value::Scalar(Scalar::Null),
            Json::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Scalar(Scalar::Int(i)),
                None => {
                    return Err(Error::unknown_type(format!(
                        "number {} is not a 64-bit integer",
                        n
                    )))
                }
            },
            Json::String(s) => Value::Scalar(Scalar::String(s)),
            Json::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Json::Object(object) => {
                let entries = object
                    .into_iter()
                    .map(|(k, v)| Value::try_from(v).map(|v| (k, v)))
                    .collect::<Result<Vec<(String, Value)>>>()?;
                Value::from_entries(entries)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_creation() {
        assert_eq!(Value::from(42i32), Value::Scalar(Scalar::Int(42)));
        assert_eq!(Value::from(true), Value::Scalar(Scalar::Bool(true)));
        assert_eq!(
            Value::from("hello"),
            Value::Scalar(Scalar::String("hello".to_string()))
        );
        assert_eq!(Value::from(()), Value::Scalar(Scalar::Null));
        assert_eq!(Value::from(None::<i32>), Value::Scalar(Scalar::Null));
    }

    #[test]
    fn test_positional_keys_classify_as_list() {
        let value = Value::from_entries(vec![("0", "a"), ("1", "b")]);
        assert_eq!(value.shape(), Shape::OrderedList);
        assert_eq!(value, Value::from(vec!["a", "b"]));
    }

    #[test]
    fn test_out_of_order_keys_classify_as_map() {
        let value = Value::from_entries(vec![("1", "a"), ("0", "b")]);
        assert_eq!(value.shape(), Shape::KeyedMap);

        let value = Value::from_entries(vec![("0", "a"), ("2", "b")]);
        assert_eq!(value.shape(), Shape::KeyedMap);
    }

    #[test]
    fn test_empty_container_is_a_list() {
        let value = Value::from_entries(Vec::<(String, Value)>::new());
        assert_eq!(value.shape(), Shape::OrderedList);
        assert!(value.is_empty());
    }

    #[test]
    fn test_keyed_map_with_positional_keys_becomes_a_list() {
        let mut map = KeyedMap::new();
        map.insert("0", "a");
        map.insert("1", "b");
        let value = Value::from(map);
        assert_eq!(value.shape(), Shape::OrderedList);
        assert_eq!(value.as_list().map(|items| items.len()), Some(2));
        assert!(value.as_map().is_none());

        assert_eq!(Value::from(KeyedMap::new()).shape(), Shape::OrderedList);
    }

    #[test]
    fn test_map_keeps_insertion_order_and_overwrites_in_place() {
        let mut map = KeyedMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        assert_eq!(map.insert("b", 3), Some(Value::from(1)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(&Value::from(3)));
    }

    #[test]
    fn test_single_entry() {
        let map: KeyedMap = vec![("-in", 1)].into_iter().collect();
        assert_eq!(map.single("test").unwrap().0, "-in");

        let map: KeyedMap = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert!(map.single("test").unwrap_err().is_unknown_type());
    }

    #[test]
    fn test_json_conversion_preserves_key_order() {
        let value = Value::try_from(json!({ "name": "x", "id": 1, "0": true })).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["name", "id", "0"]);
    }

    #[test]
    fn test_json_object_with_positional_keys_is_a_list() {
        let value = Value::try_from(json!({ "0": "id", "1": "name" })).unwrap();
        assert_eq!(value, Value::from(vec!["id", "name"]));
    }

    #[test]
    fn test_json_float_is_rejected() {
        let err = Value::try_from(json!({ "price": 1.5 })).unwrap_err();
        assert!(err.is_unknown_type());
    }

    #[test]
    fn test_serialize_round_trips_through_json() {
        let value = Value::try_from(json!({ "id": [1, 2], "name": null })).unwrap();
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({ "id": [1, 2], "name": null })
        );
    }

    #[test]
    fn test_expect_helpers() {
        let value = Value::from(vec![1, 2]);
        assert_eq!(value.expect_list("test").unwrap().len(), 2);
        assert!(value.expect_map("test").unwrap_err().is_unknown_type());
        assert!(value.expect_str("test").unwrap_err().is_unknown_type());
    }
}
