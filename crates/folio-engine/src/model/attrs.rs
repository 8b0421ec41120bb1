use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known attribute keys shared by block attributes and mark attributes.
pub mod keys {
    pub const ALIGN: &str = "align";
    pub const FONT_FAMILY: &str = "fontFamily";
    pub const FONT_SIZE: &str = "fontSize";
    pub const COLOR: &str = "color";
    pub const STYLE_ID: &str = "styleId";
    pub const BOLD: &str = "bold";
    pub const ITALIC: &str = "italic";
    pub const UNDERLINE: &str = "underline";
    pub const STRIKETHROUGH: &str = "strikethrough";
    pub const CATEGORY: &str = "category";
}

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// Attribute map for blocks and marks.
///
/// Backed by a `BTreeMap`, so equality and hashing are structural and do not
/// depend on the order fields were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attrs(BTreeMap<String, AttrValue>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_str)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(AttrValue::as_int)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(AttrValue::as_bool)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style `set`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.0.remove(key)
    }

    /// Copy of `self` with every field of `update` written over it.
    /// Fields `update` does not mention are preserved.
    pub fn merged(&self, update: &Attrs) -> Attrs {
        let mut merged = self.clone();
        for (key, value) in &update.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attrs(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = Attrs::new().with("color", "#ff0000").with("category", "textual");
        let b = Attrs::new().with("category", "textual").with("color", "#ff0000");

        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_respects_value_types() {
        let a = Attrs::new().with("size", 12_i64);
        let b = Attrs::new().with("size", "12");

        assert_ne!(a, b);
    }

    #[test]
    fn test_merged_preserves_untargeted_fields() {
        let existing = Attrs::new()
            .with("color", "#ff0000")
            .with("category", "textual")
            .with("author", "editor");
        let update = Attrs::new().with("color", "#00ff00");

        let merged = existing.merged(&update);

        assert_eq!(merged.get_str("color"), Some("#00ff00"));
        assert_eq!(merged.get_str("category"), Some("textual"));
        assert_eq!(merged.get_str("author"), Some("editor"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_typed_getters() {
        let attrs: Attrs = [("bold", AttrValue::Bool(true)), ("level", AttrValue::Int(2))]
            .into_iter()
            .collect();

        assert_eq!(attrs.get_bool("bold"), Some(true));
        assert_eq!(attrs.get_int("level"), Some(2));
        assert_eq!(attrs.get_str("bold"), None);
        assert!(!attrs.contains("italic"));
    }
}
