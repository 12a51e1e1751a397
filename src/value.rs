use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Core value types for SQLite operations
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value the way a text template would interpolate it. Null is empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            // SQLite has no boolean storage class
            Value::Boolean(b) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(i64::from(*b))),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => {
                let text = std::str::from_utf8(t).map_err(|e| FromSqlError::Other(Box::new(e)))?;
                Value::Text(text.to_owned())
            }
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        })
    }
}

/// Ordered mapping from column name to value.
///
/// Rows come back from the store in result-column order; records handed to
/// `create`/`update` keep the order their keys were inserted in, which is the
/// column order of the generated statement. Keys are unique: inserting an
/// existing key replaces its value in place.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

/// Caller-built column/value input for write operations.
pub type Record = Row;

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Row::insert`]
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name`, returning the previous value if the key was already present.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name.to_string(), value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(key, _)| key == name)?;
        Some(self.fields.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (key, value) in iter {
            row.insert(&key.into(), value);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut row = Row::new()
            .with_value("title", "a")
            .with_value("content", "b");
        let previous = row.insert("title", "c");

        assert_eq!(previous, Some(Value::Text("a".into())));
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["title", "content"]);
        assert_eq!(row.get("title"), Some(&Value::Text("c".into())));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut row: Row = vec![("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(row.remove("b"), Some(Value::Integer(2)));
        assert_eq!(row.remove("b"), None);
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn option_converts_to_null() {
        let none: Option<i64> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn display_for_templates() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Integer(3).to_string(), "3");
        assert_eq!(Value::Text("Hello".into()).to_string(), "Hello");
        assert_eq!(Value::Boolean(true).to_string(), "true");
    }

    #[test]
    fn boolean_binds_as_integer() {
        let output = Value::Boolean(true).to_sql().unwrap();
        assert_eq!(
            output,
            ToSqlOutput::Owned(rusqlite::types::Value::Integer(1))
        );
    }

    #[test]
    fn invalid_utf8_text_is_rejected() {
        let result = Value::column_result(ValueRef::Text(&[0xff, 0xfe]));
        assert!(result.is_err());
    }
}
