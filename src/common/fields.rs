use super::value::Value;
use crate::monad::MonadError;
use itertools::Itertools;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;
use std::iter::FromIterator;

/// Insertion-ordered mapping from field name to value.
///
/// The name list is kept beside the value table so that iteration and
/// `unwrap` reproduce the construction order, and so that internal
/// bookkeeping stays distinguishable from the payload itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    names: Vec<String>,
    values: HashMap<String, Value>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Stores `value` under `name`. Re-inserting an existing name
    /// replaces the value in place without changing its position.
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<Value>,
    {
        let name = name.into();
        let value = value.into();
        if self.values.insert(name.clone(), value).is_some() {
            debug!("field {} replaced in place", name);
        } else {
            self.names.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let value = self.values.remove(name);
        if value.is_some() {
            self.names.retain(|n| n != name);
        }
        value
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|n| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.names
            .iter()
            .filter_map(move |n| self.values.get(n).map(|v| (n.as_str(), v)))
    }

    pub fn map_in_place<F>(&mut self, f: F)
    where
        F: Fn(&mut Value),
    {
        for value in self.values.values_mut() {
            f(value)
        }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, MonadError> {
        match value {
            serde_json::Value::Object(entries) => {
                let mut fields = Fields::new();
                for (name, value) in entries {
                    fields.insert(name, Value::try_from(value)?);
                }
                Ok(fields)
            }
            other => Err(MonadError::InvalidValue(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut entries = serde_json::Map::new();
        for (name, value) in self.iter() {
            entries.insert(name.to_string(), value.clone().into());
        }
        serde_json::Value::Object(entries)
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter()
                .map(|(name, value)| format!("{}: {}", name, value))
                .join(", ")
        )
    }
}

impl FromIterator<(String, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        let Fields { names, mut values } = self;
        let mut pairs = Vec::with_capacity(names.len());
        for name in names {
            if let Some(value) = values.remove(&name) {
                pairs.push((name, value));
            }
        }
        pairs.into_iter()
    }
}

impl Serialize for Fields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct FieldsVisitor;

impl<'de> Visitor<'de> for FieldsVisitor {
    type Value = Fields;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of field names to values")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Fields, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut fields = Fields::new();
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            fields.insert(name, value);
        }
        Ok(fields)
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// Builds a `Fields` from `name => value` pairs.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::common::Fields::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::common::Fields::new();
        $(fields.insert($name, $value);)+
        fields
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order() {
        let fields = fields! { "b" => 1, "a" => 2, "c" => 3 };
        let names: Vec<&str> = fields.names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);

        let pairs: Vec<(String, Value)> = fields.into_iter().collect();
        let names: Vec<&str> = pairs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_from_iterator() {
        let fields: Fields = vec![
            ("b".to_string(), Value::Integer(1)),
            ("a".to_string(), Value::Integer(2)),
        ]
        .into_iter()
        .collect();
        assert_eq!(fields, fields! { "b" => 1, "a" => 2 });
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut fields = fields! { "a" => 1, "b" => 2 };
        fields.insert("a", 233);
        let pairs: Vec<(&str, &Value)> = fields.iter().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("a", &Value::Integer(233)));
        assert_eq!(pairs[1], ("b", &Value::Integer(2)));
    }

    #[test]
    fn test_remove() {
        let mut fields = fields! { "a" => 1, "b" => 2 };
        assert_eq!(fields.remove("a"), Some(Value::Integer(1)));
        assert_eq!(fields.remove("a"), None);
        let names: Vec<&str> = fields.names().collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn test_map_in_place() {
        let mut fields = fields! { "a" => 1, "b" => 2 };
        fields.map_in_place(|value| {
            if let Value::Integer(i) = value {
                *i *= 10;
            }
        });
        assert_eq!(fields.get("a"), Some(&Value::Integer(10)));
        assert_eq!(fields.get("b"), Some(&Value::Integer(20)));
    }

    #[test]
    fn test_serde_preserves_order() {
        let fields = fields! { "b" => 1, "a" => "x" };
        let s = serde_json::to_string(&fields).expect("test_serde_preserves_order");
        assert_eq!(s, r#"{"b":1,"a":"x"}"#);
        let back: Fields = serde_json::from_str(&s).expect("test_serde_preserves_order");
        assert_eq!(back, fields);
    }

    #[test]
    fn test_from_json_requires_object() {
        let fields =
            Fields::from_json(serde_json::json!({"key": "value"})).expect("test_from_json");
        assert_eq!(fields.get("key"), Some(&Value::from("value")));

        let result = Fields::from_json(serde_json::json!([1, 2]));
        assert!(matches!(result, Err(MonadError::InvalidValue(_))));
    }

    #[test]
    fn test_display() {
        let fields = fields! { "a" => 1, "b" => "x" };
        assert_eq!(fields.to_string(), r#"{a: 1, b: "x"}"#);
    }
}
