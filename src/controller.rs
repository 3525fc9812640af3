//! Current-language state and re-rendering on language change.

use crate::config::I18nSettings;
use crate::diagnostics::{
    DiagnosticSink,
    I18nError,
    TracingSink,
};
use crate::dom::{
    DocumentTree,
    RenderTarget,
    ScanOptions,
    TreeScanner,
};
use crate::interpolate::interpolate;
use crate::resolver::KeyResolver;
use crate::store::TranslationStore;
use crate::types::{
    TranslationTable,
    VarsMap,
};

/// Language active when none is given.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Callback run after a successful language switch with `(previous, current)`.
pub type LanguageListener = Box<dyn FnMut(&str, &str)>;

/// Owns the translation table and the document, and renders one into the other.
///
/// Not reentrant: listeners and render callbacks cannot reach the controller.
pub struct LanguageController<D: DocumentTree> {
    /// Language used by `get` and `apply`.
    current_language: String,
    /// Loaded table and key resolver.
    store: TranslationStore,
    /// Tree that `apply` renders into.
    document: D,
    /// Finds render targets, entering encapsulated sub-trees.
    scanner: TreeScanner,
    /// Receives every diagnostic.
    sink: Box<dyn DiagnosticSink>,
    /// Called after each successful switch, in registration order.
    listeners: Vec<LanguageListener>,
}

impl<D: DocumentTree> LanguageController<D> {
    /// Controller over `document` with default settings and [`DEFAULT_LANGUAGE`].
    #[must_use]
    pub fn new(document: D) -> Self {
        Self::with_language(document, DEFAULT_LANGUAGE)
    }

    /// Controller starting in `initial_language`, which is not validated.
    #[must_use]
    pub fn with_language(document: D, initial_language: impl Into<String>) -> Self {
        Self {
            current_language: initial_language.into(),
            store: TranslationStore::default(),
            document,
            scanner: TreeScanner::default(),
            sink: Box::new(TracingSink),
            listeners: Vec::new(),
        }
    }

    /// Controller configured from `settings`, starting in its default language.
    #[must_use]
    pub fn from_settings(document: D, settings: &I18nSettings) -> Self {
        Self {
            current_language: settings.default_language.clone(),
            store: TranslationStore::new(KeyResolver::new(settings.key_separator.clone())),
            document,
            scanner: TreeScanner::new(ScanOptions::from(settings)),
            sink: Box::new(TracingSink),
            listeners: Vec::new(),
        }
    }

    /// Replace the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    #[must_use]
    pub fn current_language(&self) -> &str {
        &self.current_language
    }

    #[must_use]
    pub const fn store(&self) -> &TranslationStore {
        &self.store
    }

    #[must_use]
    pub const fn document(&self) -> &D {
        &self.document
    }

    pub const fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Give up the controller, returning the document.
    #[must_use]
    pub fn into_document(self) -> D {
        self.document
    }

    /// Replace the translation table. Does not render.
    pub fn load(&mut self, table: TranslationTable) {
        self.store.load(table);
    }

    /// Switch to `language` and re-render the document.
    ///
    /// A language absent from the loaded table is reported and leaves both
    /// the current language and the document untouched.
    pub fn set_language(&mut self, language: &str) {
        if !self.store.has_language(language) {
            self.sink.report(&I18nError::UnknownLanguage { language: language.to_string() });
            return;
        }

        let previous = std::mem::replace(&mut self.current_language, language.to_string());
        tracing::info!(from = %previous, to = %language, "Language changed");
        self.apply();

        for listener in &mut self.listeners {
            listener(&previous, language);
        }
    }

    /// Register a callback for successful language switches.
    pub fn subscribe(&mut self, listener: impl FnMut(&str, &str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Resolve `key` in the current language and fill in `vars`.
    ///
    /// A missing key is reported and returned verbatim.
    #[must_use]
    pub fn get(&self, key: &str, vars: &VarsMap) -> String {
        translate(&self.store, &self.current_language, &*self.sink, key, vars)
    }

    /// Re-render every render target of the document, including those inside
    /// nested encapsulated sub-trees.
    pub fn apply(&mut self) {
        let Self { current_language, store, document, scanner, sink, .. } = self;
        let sink = &**sink;
        let root = document.root();

        scanner.scan(document, root, sink, |doc, target: &RenderTarget<D::Node>| {
            let text = translate(store, current_language, sink, &target.key, &target.vars);
            if target.raw_markup {
                doc.set_markup(target.node, &text);
            } else {
                doc.set_text(target.node, &text);
            }
        });
    }
}

/// Resolve `key` in `language` and interpolate `vars`, falling back to the
/// key itself.
fn translate(
    store: &TranslationStore,
    language: &str,
    sink: &dyn DiagnosticSink,
    key: &str,
    vars: &VarsMap,
) -> String {
    match store.lookup(language, key) {
        Some(template) => interpolate(template, vars).into_owned(),
        None => {
            sink.report(&I18nError::MissingKey {
                key: key.to_string(),
                language: language.to_string(),
            });
            key.to_string()
        }
    }
}

impl<D: DocumentTree + std::fmt::Debug> std::fmt::Debug for LanguageController<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageController")
            .field("current_language", &self.current_language)
            .field("store", &self.store)
            .field("document", &self.document)
            .field("scanner", &self.scanner)
            .field("sink", &"<dyn DiagnosticSink>")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
