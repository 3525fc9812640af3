//! Document collaborator and the scanner that walks it.

pub mod document;
pub mod scanner;
pub mod tree;

pub use document::{
    Document,
    NodeId,
};
pub use scanner::{
    RenderTarget,
    ScanOptions,
    ScanSummary,
    TreeScanner,
};
pub use tree::DocumentTree;
