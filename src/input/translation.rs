//! Translation file input.

use std::collections::HashSet;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::LazyLock;

use globset::Glob;
use ignore::WalkBuilder;
use serde_json::Value;
use thiserror::Error;

use crate::config::I18nSettings;
use crate::types::{
    LanguageTree,
    ShapeError,
    TranslationNode,
    TranslationTable,
};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read translation file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse translation file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected structure in {path:?}: {source}")]
    Shape {
        path: PathBuf,
        #[source]
        source: ShapeError,
    },

    #[error("Invalid translation file pattern: {0}")]
    Pattern(#[from] globset::Error),
}

/// Where a translation file belongs within a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    pub language: String,
    /// Segment the file content is nested under, if any.
    pub namespace: Option<String>,
}

/// ISO 639-1 primary language subtags plus common ISO 639-3 codes without a
/// two-letter form.
static PRIMARY_LANGUAGE_SUBTAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
        "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
        "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
        "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
        "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
        "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
        "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
        "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
        "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
        "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
        "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
        "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
        "yo", "za", "zh", "zu", "ast", "ceb", "ckb", "fil", "gsw", "haw", "hmn", "yue",
    ]
    .into_iter()
    .collect()
});

/// Check for a BCP 47 style language code (`en`, `pt-BR`, `zh_Hant_TW`) whose
/// primary subtag is a known language.
fn looks_like_language_code(text: &str) -> bool {
    let mut parts = text.split(['-', '_']);
    let Some(primary) = parts.next() else {
        return false;
    };
    if !PRIMARY_LANGUAGE_SUBTAGS.contains(primary) {
        return false;
    }
    parts.all(|part| (2..=4).contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Detect language and namespace from a translation file path.
///
/// # Examples
/// - `locales/en.json` → language `en`
/// - `locales/pt-BR.json` → language `pt-BR`
/// - `locales/en/common.json` → language `en`, namespace `common`
/// - `locales/common/en.json` → language `en`, namespace `common`
/// - `locales/app/ja.json` → language `ja`, namespace `app`
/// - `locales/shared/common.json` → `None`
#[must_use]
pub fn detect_location(file_path: &Path) -> Option<FileLocation> {
    let stem = file_path.file_stem()?.to_string_lossy().to_string();
    let parent = file_path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string());

    let common_parents = ["locales", "messages", "translations", "i18n", "lang", "langs"];
    let namespace_from = |name: Option<String>| {
        name.filter(|n| !common_parents.contains(&n.to_lowercase().as_str()))
    };

    if let Some(parent) = parent.as_deref()
        && looks_like_language_code(parent)
    {
        return Some(FileLocation { language: parent.to_string(), namespace: Some(stem) });
    }

    looks_like_language_code(&stem)
        .then(|| FileLocation { language: stem, namespace: namespace_from(parent) })
}

/// Read and parse one JSON file.
fn read_json(path: &Path) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| LoadError::Parse { path: path.to_path_buf(), source })
}

/// Load a single JSON file holding a whole table (`{ "en": {...}, "es": {...} }`).
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or is not shaped like a table.
pub fn load_table_file(path: &Path) -> Result<TranslationTable, LoadError> {
    let json = read_json(path)?;
    TranslationTable::from_json(&json)
        .map_err(|source| LoadError::Shape { path: path.to_path_buf(), source })
}

/// Find translation files below `root` matching the configured pattern.
///
/// # Errors
/// Returns an error if the pattern is not a valid glob.
pub fn find_translation_files(
    root: &Path,
    settings: &I18nSettings,
) -> Result<Vec<PathBuf>, LoadError> {
    let matcher = Glob::new(&settings.translation_files.file_pattern)?.compile_matcher();

    let mut found_files = Vec::new();
    for result in WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(root) else {
            continue;
        };
        if matcher.is_match(relative_path) {
            found_files.push(path.to_path_buf());
        }
    }

    found_files.sort();
    Ok(found_files)
}

/// Build a table from every translation file below `root`.
///
/// Each file contributes one language's keys, nested under its namespace if
/// the path has one. Files whose language cannot be detected are skipped.
/// Later files override earlier ones key by key.
///
/// # Errors
/// Returns the first read, parse or shape error.
pub fn load_translation_dir(
    root: &Path,
    settings: &I18nSettings,
) -> Result<TranslationTable, LoadError> {
    let mut table = TranslationTable::new();

    for path in find_translation_files(root, settings)? {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let Some(location) = detect_location(relative) else {
            tracing::warn!("Cannot detect language of translation file {:?}, skipped", path);
            continue;
        };

        let json = read_json(&path)?;
        let tree = LanguageTree::from_json(&json)
            .map_err(|source| LoadError::Shape { path: path.clone(), source })?;
        tracing::debug!(
            language = %location.language,
            namespace = ?location.namespace,
            keys = tree.len(),
            "Loaded translation file {:?}",
            path
        );

        let language = table.language_mut(&location.language);
        match location.namespace {
            Some(namespace) => merge_namespace(language, namespace, tree),
            None => merge_tree(language, tree),
        }
    }

    Ok(table)
}

/// Merge `tree` into `target` under the `namespace` segment.
fn merge_namespace(target: &mut LanguageTree, namespace: String, tree: LanguageTree) {
    let mut wrapper = LanguageTree::new();
    wrapper.insert(namespace, tree);
    merge_tree(target, wrapper);
}

/// Merge `source` into `target`, recursing where both sides hold sub-trees.
fn merge_tree(target: &mut LanguageTree, source: LanguageTree) {
    for (segment, incoming) in source {
        let merged = match (target.remove(&segment), incoming) {
            (Some(TranslationNode::Tree(mut existing)), TranslationNode::Tree(incoming)) => {
                merge_tree(&mut existing, incoming);
                TranslationNode::Tree(existing)
            }
            (_, incoming) => incoming,
        };
        target.insert(segment, merged);
    }
}
