//! live-i18n
//!
//! Resolves dotted keys against a multi-language translation table, fills in
//! `{name}` placeholders, and re-renders every annotated node of a document
//! tree (encapsulated sub-trees included) when the language changes.

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod dom;
pub mod input;
pub mod interpolate;
pub mod resolver;
pub mod store;
pub mod types;

mod test_utils;

pub use controller::LanguageController;
pub use diagnostics::{
    DiagnosticSink,
    I18nError,
};
pub use types::{
    LanguageTree,
    TranslationTable,
    VarsMap,
};
