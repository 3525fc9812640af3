//! Translation table data model.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Placeholder name → substituted text, supplied per render call.
pub type VarsMap = HashMap<String, String>;

/// The shape of a JSON document did not match a translation table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid translation table at '{path}': {message}")]
pub struct ShapeError {
    /// Dotted path of the offending value (`<root>` for the document itself)
    pub path: String,
    pub message: String,
}

impl ShapeError {
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), message: message.into() }
    }
}

/// One entry of a [`LanguageTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationNode {
    /// Template string, possibly containing `{name}` placeholder tokens.
    Leaf(String),
    Tree(LanguageTree),
}

impl TranslationNode {
    #[must_use]
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(text) => Some(text),
            Self::Tree(_) => None,
        }
    }

    #[must_use]
    pub const fn as_tree(&self) -> Option<&LanguageTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Leaf(_) => None,
        }
    }

    /// Convert a JSON value into a node.
    ///
    /// Strings become leaves, numbers and booleans become leaves holding their
    /// JSON text, objects and arrays become sub-trees (arrays keyed by index).
    /// Returns `None` for `null`.
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(Self::Leaf(text.clone())),
            Value::Bool(_) | Value::Number(_) => Some(Self::Leaf(value.to_string())),
            Value::Array(items) => {
                let mut tree = LanguageTree::new();
                for (index, item) in items.iter().enumerate() {
                    if let Some(node) = Self::from_json(item) {
                        tree.insert(index.to_string(), node);
                    }
                }
                Some(Self::Tree(tree))
            }
            Value::Object(map) => {
                let mut tree = LanguageTree::new();
                for (segment, item) in map {
                    if let Some(node) = Self::from_json(item) {
                        tree.insert(segment.clone(), node);
                    }
                }
                Some(Self::Tree(tree))
            }
        }
    }
}

impl From<&str> for TranslationNode {
    fn from(text: &str) -> Self {
        Self::Leaf(text.to_string())
    }
}

impl From<String> for TranslationNode {
    fn from(text: String) -> Self {
        Self::Leaf(text)
    }
}

impl From<LanguageTree> for TranslationNode {
    fn from(tree: LanguageTree) -> Self {
        Self::Tree(tree)
    }
}

/// One language's nested key structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageTree {
    /// Segment → child node.
    entries: HashMap<String, TranslationNode>,
}

impl LanguageTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&TranslationNode> {
        self.entries.get(segment)
    }

    /// Insert an entry, returning the node previously stored under `segment`.
    pub fn insert(
        &mut self,
        segment: impl Into<String>,
        node: impl Into<TranslationNode>,
    ) -> Option<TranslationNode> {
        self.entries.insert(segment.into(), node.into())
    }

    pub fn remove(&mut self, segment: &str) -> Option<TranslationNode> {
        self.entries.remove(segment)
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, segment: impl Into<String>, node: impl Into<TranslationNode>) -> Self {
        self.insert(segment, node);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a tree from a JSON object.
    ///
    /// # Errors
    /// Returns a [`ShapeError`] if `value` is not an object.
    pub fn from_json(value: &Value) -> Result<Self, ShapeError> {
        if !value.is_object() {
            return Err(ShapeError::new("<root>", "expected an object of translation keys"));
        }
        match TranslationNode::from_json(value) {
            Some(TranslationNode::Tree(tree)) => Ok(tree),
            _ => Err(ShapeError::new("<root>", "expected an object of translation keys")),
        }
    }
}

impl IntoIterator for LanguageTree {
    type Item = (String, TranslationNode);
    type IntoIter = std::collections::hash_map::IntoIter<String, TranslationNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Language code → [`LanguageTree`].
///
/// Languages are independent of each other: there is no fallback between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct TranslationTable {
    /// Language code → tree.
    languages: HashMap<String, LanguageTree>,
}

impl TranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn language(&self, code: &str) -> Option<&LanguageTree> {
        self.languages.get(code)
    }

    #[must_use]
    pub fn contains_language(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    /// Mutable access to a language tree, creating it if absent.
    pub fn language_mut(&mut self, code: &str) -> &mut LanguageTree {
        self.languages.entry(code.to_string()).or_default()
    }

    pub fn insert(&mut self, code: impl Into<String>, tree: LanguageTree) -> Option<LanguageTree> {
        self.languages.insert(code.into(), tree)
    }

    #[must_use]
    pub fn with(mut self, code: impl Into<String>, tree: LanguageTree) -> Self {
        self.insert(code, tree);
        self
    }

    /// Language codes in sorted order.
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Build a table from a JSON object of language objects.
    ///
    /// # Errors
    /// Returns a [`ShapeError`] if the root or any language entry is not an object.
    pub fn from_json(value: &Value) -> Result<Self, ShapeError> {
        let Value::Object(map) = value else {
            return Err(ShapeError::new("<root>", "expected an object keyed by language code"));
        };

        let mut table = Self::new();
        for (code, tree) in map {
            let tree = LanguageTree::from_json(tree)
                .map_err(|e| ShapeError::new(code.clone(), e.message))?;
            table.insert(code.clone(), tree);
        }
        Ok(table)
    }
}

impl TryFrom<Value> for TranslationTable {
    type Error = ShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}
