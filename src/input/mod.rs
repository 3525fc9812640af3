//! Translation data sources.

pub mod translation;

pub use translation::{
    LoadError,
    load_table_file,
    load_translation_dir,
};
