//! Runtime diagnostics reported while resolving and rendering.
//!
//! None of these abort a render pass. They are handed to a [`DiagnosticSink`]
//! and the caller continues with a fallback (the key itself, an empty vars
//! map, or an unchanged language).

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Non-fatal failures of the translation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// `set_language` was given a code absent from the loaded table.
    #[error("Unknown language '{language}'")]
    UnknownLanguage { language: String },

    /// A key could not be resolved to a leaf string.
    #[error("Translation key '{key}' not found for language '{language}'")]
    MissingKey { key: String, language: String },

    /// The serialized vars attribute of a render target failed to parse.
    #[error("Malformed vars payload for key '{key}': {message}")]
    MalformedVars { key: String, message: String },
}

impl I18nError {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::MissingKey { .. } => Severity::Warning,
            Self::UnknownLanguage { .. } | Self::MalformedVars { .. } => Severity::Error,
        }
    }
}

/// Receiver of leveled diagnostics.
pub trait DiagnosticSink {
    /// Record one diagnostic. Must not fail or panic.
    fn report(&self, error: &I18nError);
}

/// Default sink: forwards every diagnostic to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, error: &I18nError) {
        match error {
            I18nError::UnknownLanguage { language } => {
                tracing::error!(language = %language, "{error}");
            }
            I18nError::MissingKey { key, language } => {
                tracing::warn!(key = %key, language = %language, "{error}");
            }
            I18nError::MalformedVars { key, .. } => {
                tracing::error!(key = %key, "{error}");
            }
        }
    }
}

/// Sink that keeps every diagnostic in memory.
///
/// Clones share the same buffer, so a clone can be handed to a controller
/// while the original is kept for inspection.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// Shared buffer, oldest first.
    records: Rc<RefCell<Vec<I18nError>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything reported so far, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<I18nError> {
        self.records.borrow().clone()
    }

    /// Drain the buffer.
    #[must_use]
    pub fn take(&self) -> Vec<I18nError> {
        self.records.borrow_mut().drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, error: &I18nError) {
        TracingSink.report(error);
        self.records.borrow_mut().push(error.clone());
    }
}
