//! Dotted key resolution over a language tree.

use crate::types::{
    LanguageTree,
    TranslationNode,
};

/// Walks a [`LanguageTree`] one key segment at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResolver {
    /// Never empty.
    separator: String,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self { separator: ".".to_string() }
    }
}

impl KeyResolver {
    /// An empty separator falls back to `"."`.
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        let separator = separator.into();
        if separator.is_empty() {
            tracing::debug!("Empty key separator, using '.'");
            return Self::default();
        }
        Self { separator }
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Resolve `key` to the leaf string it names.
    ///
    /// Returns `None` if any segment is absent, if an intermediate value is a
    /// leaf, or if the terminal value is a sub-tree.
    ///
    /// # Examples
    /// ```
    /// use live_i18n::resolver::KeyResolver;
    /// use live_i18n::types::LanguageTree;
    ///
    /// let tree = LanguageTree::new().with("a", LanguageTree::new().with("b", "Hi {n}"));
    /// let resolver = KeyResolver::default();
    ///
    /// assert_eq!(resolver.resolve(&tree, "a.b"), Some("Hi {n}"));
    /// assert_eq!(resolver.resolve(&tree, "a.c"), None);
    /// assert_eq!(resolver.resolve(&tree, "a"), None);
    /// ```
    #[must_use]
    pub fn resolve<'a>(&self, tree: &'a LanguageTree, key: &str) -> Option<&'a str> {
        let mut segments = key.split(self.separator.as_str());
        let mut node = tree.get(segments.next()?)?;

        for segment in segments {
            let TranslationNode::Tree(subtree) = node else {
                return None;
            };
            node = subtree.get(segment)?;
        }

        node.as_leaf()
    }
}
