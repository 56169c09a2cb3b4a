//! Value tree types: the data model shared by the parser, the serializer and
//! the store.
//!
//! Containers own their children directly. The grammar never produces
//! sharing, so every `List`/`Object` is reachable from the root through
//! exactly one path. `List` and `Object` tear themselves down iteratively, so
//! dropping a deeply nested tree does not recurse on the native stack.

use crate::hash::hash_str;
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

/// Immutable text plus its precomputed stable hash.
///
/// Equality and hashing use the hash only, so map lookups never compare the
/// full text.
#[derive(Clone)]
pub struct CVarString {
    text: String,
    hash: u64,
}

impl CVarString {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let hash = hash_str(&text);
        CVarString { text, hash }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl PartialEq for CVarString {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for CVarString {}

impl Hash for CVarString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for CVarString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.text, f)
    }
}

impl fmt::Display for CVarString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for CVarString {
    fn from(s: &str) -> Self {
        CVarString::new(s)
    }
}

impl From<String> for CVarString {
    fn from(s: String) -> Self {
        CVarString::new(s)
    }
}

/// Which variant a [`Value`] currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Int,
    Float,
    Bool,
    String,
    List,
    Object,
}

/// A single typed unit in the tree.
///
/// `Null` exists for programmatic construction only; the parser stores a JSON
/// `null` as `Int(0)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i32),
    Float(f32),
    Bool(bool),
    String(CVarString),
    List(List),
    Object(Object),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Object(_))
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

/// Scalars print in plain form (strings without quotes); containers print as
/// compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s.as_str()),
            other => crate::serializer::write_value(other, false, f),
        }
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(CVarString::new(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(CVarString::new(s))
    }
}

impl From<CVarString> for Value {
    fn from(s: CVarString) -> Self {
        Value::String(s)
    }
}

impl From<List> for Value {
    fn from(l: List) -> Self {
        Value::List(l)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

/// Ordered sequence of values. Iteration order is serialization order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    items: Vec<Value>,
}

impl List {
    pub fn new() -> Self {
        List::default()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Drop for List {
    fn drop(&mut self) {
        if self.items.iter().any(Value::is_container) {
            drain_iteratively(mem::take(&mut self.items));
        }
    }
}

/// Mapping from unique keys to values, kept in insertion order.
///
/// Equality ignores order: two objects are equal when they hold the same keys
/// with equal values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    entries: IndexMap<CVarString, Value>,
}

impl Object {
    pub fn new() -> Self {
        Object::default()
    }

    /// Insert `value` under `key`. An existing key keeps its position and has
    /// its value replaced; the previous value is returned.
    pub fn insert(&mut self, key: impl Into<CVarString>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(&CVarString::new(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(&CVarString::new(key))
    }

    pub(crate) fn get_or_insert_with(
        &mut self,
        key: CVarString,
        default: impl FnOnce() -> Value,
    ) -> &mut Value {
        self.entries.entry(key).or_insert_with(default)
    }

    /// Insert and return the entry's position. A repeated key keeps its
    /// original position.
    pub(crate) fn insert_full(&mut self, key: CVarString, value: Value) -> usize {
        self.entries.insert_full(key, value).0
    }

    pub(crate) fn get_index_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.entries.get_index_mut(index).map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&CVarString::new(key))
    }

    /// Remove `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(&CVarString::new(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, CVarString, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(CVarString::as_str)
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a CVarString, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, CVarString, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        if self.entries.values().any(Value::is_container) {
            let children = mem::take(&mut self.entries).into_values().collect();
            drain_iteratively(children);
        }
    }
}

/// Empty every container before it is dropped so that destruction never
/// recurses more than one level.
fn drain_iteratively(mut pending: Vec<Value>) {
    while let Some(mut value) = pending.pop() {
        match &mut value {
            Value::List(list) => pending.append(&mut list.items),
            Value::Object(object) => {
                pending.extend(mem::take(&mut object.entries).into_values());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_insert_overwrites_in_place() {
        let mut obj = Object::new();
        obj.insert("a", 1);
        obj.insert("b", 2);
        assert_eq!(obj.insert("a", 3), Some(Value::Int(1)));
        let keys: Vec<&str> = obj.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(obj.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn strings_compare_by_hash() {
        assert_eq!(CVarString::new("key"), CVarString::from("key".to_string()));
        assert_ne!(CVarString::new("key"), CVarString::new("Key"));
    }

    #[test]
    fn object_equality_ignores_order() {
        let mut a = Object::new();
        a.insert("x", 1);
        a.insert("y", true);
        let mut b = Object::new();
        b.insert("y", true);
        b.insert("x", 1);
        assert_eq!(a, b);
    }

    #[test]
    fn deep_tree_drops_without_overflow() {
        let mut value = Value::List(List::new());
        for _ in 0..200_000 {
            let mut outer = List::new();
            outer.push(value);
            value = Value::List(outer);
        }
        drop(value);
    }

    #[test]
    fn kind_reports_variant() {
        assert_eq!(Value::from(1).kind(), ValueKind::Int);
        assert_eq!(Value::from(1.5f32).kind(), ValueKind::Float);
        assert_eq!(Value::from("s").kind(), ValueKind::String);
        assert_eq!(Value::from(Object::new()).kind(), ValueKind::Object);
        assert_eq!(Value::Null.kind(), ValueKind::Null);
    }
}
