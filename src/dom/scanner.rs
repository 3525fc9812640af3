//! Discovery of render targets across encapsulated sub-trees.

use serde_json::Value;

use super::tree::DocumentTree;
use crate::config::I18nSettings;
use crate::diagnostics::{
    DiagnosticSink,
    I18nError,
};
use crate::types::VarsMap;

/// Attribute names and traversal bounds used by [`TreeScanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Attribute carrying the dotted key.
    pub key_attribute: String,
    /// Attribute carrying a JSON object of placeholder values.
    pub vars_attribute: String,
    /// Presence of this attribute opts a target into raw markup output.
    pub html_attribute: String,
    /// Deepest level of nested encapsulated roots that is still scanned.
    pub max_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&I18nSettings::default())
    }
}

impl From<&I18nSettings> for ScanOptions {
    fn from(settings: &I18nSettings) -> Self {
        Self {
            key_attribute: settings.attributes.key.clone(),
            vars_attribute: settings.attributes.vars.clone(),
            html_attribute: settings.attributes.html.clone(),
            max_depth: settings.max_shadow_depth,
        }
    }
}

/// An annotated node found during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget<N> {
    pub node: N,
    pub key: String,
    pub vars: VarsMap,
    /// Write the resolved string as markup instead of text.
    pub raw_markup: bool,
}

/// Counters of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Roots scanned, the starting root included.
    pub roots: usize,
    pub targets: usize,
    /// Encapsulated roots skipped for exceeding `max_depth`.
    pub skipped_roots: usize,
}

/// Walks a document and every encapsulated sub-tree reachable from it.
///
/// Holds no state between scans.
#[derive(Debug, Clone, Default)]
pub struct TreeScanner {
    /// Attribute names and depth bound.
    options: ScanOptions,
}

impl TreeScanner {
    #[must_use]
    pub const fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Invoke `render` for every render target below `root`.
    ///
    /// Roots are processed from an explicit stack: the targets of a root are
    /// rendered first, then its encapsulated roots are scanned in document
    /// order, depth first.
    pub fn scan<D, F>(
        &self,
        document: &mut D,
        root: D::Node,
        sink: &dyn DiagnosticSink,
        mut render: F,
    ) -> ScanSummary
    where
        D: DocumentTree + ?Sized,
        F: FnMut(&mut D, &RenderTarget<D::Node>),
    {
        let mut summary = ScanSummary::default();
        let mut worklist = vec![(root, 0_usize)];

        while let Some((current, depth)) = worklist.pop() {
            if depth > self.options.max_depth {
                tracing::warn!(
                    ?current,
                    depth,
                    max_depth = self.options.max_depth,
                    "Encapsulated sub-tree nested too deeply, skipped"
                );
                summary.skipped_roots += 1;
                continue;
            }
            summary.roots += 1;

            let targets = self.collect_targets(document, current, sink);
            for target in &targets {
                render(document, target);
            }
            summary.targets += targets.len();

            let nested: Vec<D::Node> = document
                .shadow_hosts(current)
                .into_iter()
                .filter_map(|host| document.shadow_root(host))
                .collect();
            worklist.extend(nested.into_iter().rev().map(|nested_root| (nested_root, depth + 1)));
        }

        tracing::debug!(
            roots = summary.roots,
            targets = summary.targets,
            skipped = summary.skipped_roots,
            "Scan finished"
        );
        summary
    }

    /// Render targets directly within `root`, in document order.
    ///
    /// A vars attribute that fails to decode is reported and replaced by an
    /// empty map.
    #[must_use]
    pub fn collect_targets<D>(
        &self,
        document: &D,
        root: D::Node,
        sink: &dyn DiagnosticSink,
    ) -> Vec<RenderTarget<D::Node>>
    where
        D: DocumentTree + ?Sized,
    {
        document
            .find_marked(root, &self.options.key_attribute)
            .into_iter()
            .filter_map(|node| {
                let key = document.attribute(node, &self.options.key_attribute)?.to_string();
                let vars = match document.attribute(node, &self.options.vars_attribute) {
                    None => VarsMap::new(),
                    Some(payload) => decode_vars(payload).unwrap_or_else(|e| {
                        sink.report(&I18nError::MalformedVars {
                            key: key.clone(),
                            message: e.to_string(),
                        });
                        VarsMap::new()
                    }),
                };
                let raw_markup = document.attribute(node, &self.options.html_attribute).is_some();
                Some(RenderTarget { node, key, vars, raw_markup })
            })
            .collect()
    }
}

/// Decode a serialized vars attribute.
///
/// The payload must be a JSON object; string values are used as is and any
/// other value is converted to its JSON text.
///
/// # Errors
/// Returns an error if `payload` is not a JSON object.
pub fn decode_vars(payload: &str) -> Result<VarsMap, serde_json::Error> {
    let map: serde_json::Map<String, Value> = serde_json::from_str(payload)?;
    Ok(map
        .into_iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
            (name, text)
        })
        .collect())
}
