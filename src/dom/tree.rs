//! Query and mutation surface the engine needs from a document.

use std::fmt::Debug;

/// A document-like tree whose nodes can host encapsulated sub-trees.
///
/// Queries never cross an encapsulation boundary: the descendants of a host's
/// encapsulated root are only reachable through [`shadow_root`](Self::shadow_root).
pub trait DocumentTree {
    type Node: Copy + Eq + Debug;

    /// The top-level root of the document.
    fn root(&self) -> Self::Node;

    /// Descendants of `root` carrying `attribute`, in document order.
    fn find_marked(&self, root: Self::Node, attribute: &str) -> Vec<Self::Node>;

    /// Descendants of `root` that host an encapsulated sub-tree, in document order.
    fn shadow_hosts(&self, root: Self::Node) -> Vec<Self::Node>;

    fn shadow_root(&self, host: Self::Node) -> Option<Self::Node>;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Replace the content of `node` with plain text.
    fn set_text(&mut self, node: Self::Node, text: &str);

    /// Replace the content of `node` with markup that is inserted unescaped.
    fn set_markup(&mut self, node: Self::Node, markup: &str);
}
