//! Console-variable store: a caller-owned value tree addressed by dotted keys.
//!
//! `graphics.window.width` names the entry `width` inside the object
//! `window` inside the root-level object `graphics`. Setting a key creates any
//! missing intermediate objects. A key whose intermediate segment already holds
//! a scalar or a list cannot be set; that is reported as `false`, not as an
//! error.

use crate::error::Result;
use crate::parser::{unserialize, unserialize_reader};
use crate::serializer;
use crate::value::{CVarString, Object, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

#[derive(Debug, Default)]
pub struct CVarStore {
    root: Object,
    /// Free-form descriptions keyed by normalized dotted path.
    descriptions: HashMap<String, String>,
}

impl CVarStore {
    pub fn new() -> Self {
        CVarStore::default()
    }

    /// Wrap an existing tree.
    pub fn from_root(root: Object) -> Self {
        CVarStore {
            root,
            descriptions: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Object {
        &self.root
    }

    pub fn into_root(self) -> Object {
        self.root
    }

    /// Set `key` to `value`, creating intermediate objects as needed. Returns
    /// `false` if an intermediate segment holds something other than an object
    /// or the key is empty.
    ///
    /// Overwriting a value of the same scalar kind keeps its description.
    /// Every newly created path starts without descriptions, and replacing a
    /// container or changing the kind drops the descriptions beneath the key.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> bool {
        let segments = split_key(key);
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };

        // Depth of the first segment this call creates, if any.
        let mut created = None;
        let mut table = &mut self.root;
        for (depth, segment) in parents.iter().enumerate() {
            if created.is_none() && !table.contains_key(segment) {
                created = Some(depth);
            }
            let node =
                table.get_or_insert_with(CVarString::new(*segment), || Value::Object(Object::new()));
            match node.as_object_mut() {
                Some(obj) => table = obj,
                None => {
                    tracing::debug!(key, segment, "intermediate segment is not an object");
                    return false;
                }
            }
        }

        let value = value.into();
        let kind = value.kind();
        match (created, table.insert(*last, value)) {
            (Some(depth), _) => self.forget_descriptions(&segments[..=depth], true),
            (None, None) => self.forget_descriptions(&segments, true),
            (None, Some(old)) if old.is_container() || old.kind() != kind => {
                self.forget_descriptions(&segments, false)
            }
            (None, Some(_)) => {}
        }
        true
    }

    /// Like [`CVarStore::set`], also recording a description for the key.
    pub fn set_described(&mut self, key: &str, description: &str, value: impl Into<Value>) -> bool {
        if !self.set(key, value) {
            return false;
        }
        self.descriptions
            .insert(split_key(key).join("."), description.to_string());
        true
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        let segments = split_key(key);
        let (last, parents) = segments.split_last()?;
        let mut table = &self.root;
        for segment in parents {
            table = table.get(segment)?.as_object()?;
        }
        table.get(last)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let segments = split_key(key);
        let (last, parents) = segments.split_last()?;
        let mut table = &mut self.root;
        for segment in parents {
            table = table.get_mut(segment)?.as_object_mut()?;
        }
        table.get_mut(last)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key)?.as_int()
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        self.get(key)?.as_float()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Description recorded for `key`, if the key exists and has one.
    pub fn description(&self, key: &str) -> Option<&str> {
        self.get(key)?;
        self.descriptions
            .get(&split_key(key).join("."))
            .map(String::as_str)
    }

    /// Replace the whole tree with the document in `text`. Descriptions are
    /// cleared. On error the store is left untouched.
    pub fn load_str(&mut self, text: &str) -> Result<()> {
        let root = unserialize(text)?;
        self.replace_root(root);
        Ok(())
    }

    pub fn load_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        let root = unserialize_reader(reader)?;
        self.replace_root(root);
        Ok(())
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading cvar file");
        self.load_reader(File::open(path)?)
    }

    pub fn save<W: Write>(&self, writer: &mut W, beautified: bool) -> Result<()> {
        serializer::serialize(writer, &self.root, beautified)
    }

    pub fn save_file(&self, path: impl AsRef<Path>, beautified: bool) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), beautified, "saving cvar file");
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer, beautified)?;
        writer.flush()?;
        Ok(())
    }

    pub fn to_string(&self, beautified: bool) -> String {
        serializer::to_string(&self.root, beautified)
    }

    /// Drop descriptions beneath `path`, and the one at `path` itself when
    /// `including_self` is set.
    fn forget_descriptions(&mut self, path: &[&str], including_self: bool) {
        let path = path.join(".");
        let prefix = format!("{path}.");
        self.descriptions.retain(|described, _| {
            !(described.starts_with(&prefix) || (including_self && *described == path))
        });
    }

    fn replace_root(&mut self, root: Object) {
        self.root = root;
        self.descriptions.clear();
    }
}

/// Split a dotted key into segments. A trailing `.` adds no segment; empty
/// interior segments are kept as real (empty) keys.
fn split_key(key: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = key.split('.').collect();
    if segments.last() == Some(&"") {
        segments.pop();
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_key_rules() {
        assert_eq!(split_key("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(split_key("a."), vec!["a"]);
        assert_eq!(split_key("a..b"), vec!["a", "", "b"]);
        assert!(split_key("").is_empty());
    }
}
