//! Owner of the loaded translation table.

use crate::resolver::KeyResolver;
use crate::types::TranslationTable;

/// Holds the current [`TranslationTable`].
///
/// The table is only ever replaced as a whole, so a lookup never observes a
/// partially loaded table.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    /// Current table.
    table: TranslationTable,
    /// Splits keys into segments.
    resolver: KeyResolver,
}

impl TranslationStore {
    #[must_use]
    pub fn new(resolver: KeyResolver) -> Self {
        Self { table: TranslationTable::new(), resolver }
    }

    /// Replace the held table, returning the previous one.
    pub fn load(&mut self, table: TranslationTable) -> TranslationTable {
        tracing::debug!(languages = ?table.languages(), "Loading translation table");
        std::mem::replace(&mut self.table, table)
    }

    #[must_use]
    pub const fn table(&self) -> &TranslationTable {
        &self.table
    }

    #[must_use]
    pub const fn resolver(&self) -> &KeyResolver {
        &self.resolver
    }

    #[must_use]
    pub fn has_language(&self, language: &str) -> bool {
        self.table.contains_language(language)
    }

    /// Leaf string at `key` within `language`, or `None` if the language or
    /// any segment is absent.
    #[must_use]
    pub fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        let tree = self.table.language(language)?;
        self.resolver.resolve(tree, key)
    }
}
