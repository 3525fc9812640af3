//! In-memory document with attachable shadow roots.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Deserialize;

use super::tree::DocumentTree;

/// Handle to a node of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Payload of an arena slot.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    /// Document root or shadow root.
    Fragment,
    /// Element with its attributes in insertion order.
    Element {
        /// Tag name.
        tag: String,
        /// `(name, value)` pairs, names unique.
        attributes: Vec<(String, String)>,
        /// Attached encapsulated root, if any.
        shadow_root: Option<NodeId>,
    },
    /// Plain text, escaped when serialized.
    Text(String),
    /// Raw markup, serialized without escaping.
    Markup(String),
}

/// One arena slot with its links.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    /// What the node is.
    kind: NodeKind,
    /// Parent in the light tree; `None` for roots and detached nodes.
    parent: Option<NodeId>,
    /// Children in document order.
    children: Vec<NodeId>,
    /// Host element, set only on shadow roots.
    host: Option<NodeId>,
}

impl NodeData {
    /// Detached node without children.
    const fn new(kind: NodeKind) -> Self {
        Self { kind, parent: None, children: Vec::new(), host: None }
    }
}

/// Arena-backed document tree.
///
/// Nodes are never freed, so a [`NodeId`] stays valid after its node is
/// detached. Content writes reuse an existing lone text node, which keeps the
/// arena size stable across repeated renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Slot 0 is the document root.
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: vec![NodeData::new(NodeKind::Fragment)] }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of arena slots, attached or not.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate a detached node.
    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// Slot for `id`, if allocated.
    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    /// Mutable slot for `id`, if allocated.
    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.push(NodeKind::Element { tag: tag.into(), attributes: Vec::new(), shadow_root: None })
    }

    /// Move `child` under `parent`, detaching it from its previous parent.
    ///
    /// Ignored if either node is unknown, if `parent` cannot have children, or
    /// if `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let can_parent = self
            .node(parent)
            .is_some_and(|n| matches!(n.kind, NodeKind::Fragment | NodeKind::Element { .. }));
        if !can_parent || self.node(child).is_none() || self.is_inclusive_ancestor(child, parent) {
            tracing::debug!(?parent, ?child, "Rejected append_child");
            return;
        }

        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.push(NodeKind::Text(text.into()));
        self.append_child(parent, id);
        id
    }

    /// Unlink `child` from its parent, if it has one.
    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.node(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    /// True if `ancestor` is `node` or lies on its parent chain, including
    /// through shadow hosts.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent.or(n.host));
        }
        false
    }

    /// Set or overwrite an attribute. Ignored for non-element nodes.
    pub fn set_attribute(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        let Some(NodeData { kind: NodeKind::Element { attributes, .. }, .. }) = self.node_mut(node)
        else {
            return;
        };
        let (name, value) = (name.into(), value.into());
        let Some(existing) = attributes.iter_mut().find(|(n, _)| *n == name) else {
            attributes.push((name, value));
            return;
        };
        existing.1 = value;
    }

    /// Value of attribute `name`, if `node` is an element carrying it.
    #[must_use]
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
            }
            _ => None,
        }
    }

    /// Attach an encapsulated root to `host`, returning it.
    ///
    /// Returns the existing root if one is already attached, and `None` if
    /// `host` is not an element.
    pub fn attach_shadow(&mut self, host: NodeId) -> Option<NodeId> {
        match &self.node(host)?.kind {
            NodeKind::Element { shadow_root: Some(root), .. } => return Some(*root),
            NodeKind::Element { .. } => {}
            _ => return None,
        }

        let root = self.push(NodeKind::Fragment);
        if let Some(data) = self.node_mut(root) {
            data.host = Some(host);
        }
        if let Some(NodeData { kind: NodeKind::Element { shadow_root, .. }, .. }) =
            self.node_mut(host)
        {
            *shadow_root = Some(root);
        }
        Some(root)
    }

    /// Encapsulated root attached to `host`.
    #[must_use]
    pub fn get_shadow_root(&self, host: NodeId) -> Option<NodeId> {
        match &self.node(host)?.kind {
            NodeKind::Element { shadow_root, .. } => *shadow_root,
            _ => None,
        }
    }

    /// Tag name of an element.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Children of `node` in document order; empty for unknown nodes.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |n| n.children.as_slice())
    }

    /// Descendants of `root` in document order, not entering shadow roots.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants { document: self, stack: self.children(root).iter().rev().copied().collect() }
    }

    /// Concatenated text and markup below `node`, not entering shadow roots.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .filter_map(|id| match &self.node(id)?.kind {
                NodeKind::Text(text) | NodeKind::Markup(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// First element whose `id` attribute equals `id`, searching shadow roots too.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut roots = vec![self.root()];
        while let Some(root) = roots.pop() {
            for node in self.descendants(root) {
                if self.get_attribute(node, "id") == Some(id) {
                    return Some(node);
                }
                if let Some(shadow) = self.get_shadow_root(node) {
                    roots.push(shadow);
                }
            }
        }
        None
    }

    /// Replace the content of element `node` with a single text or markup node.
    ///
    /// A lone text or markup child is rewritten in place. Any other children
    /// are detached and a new node is allocated.
    fn replace_children(&mut self, node: NodeId, kind: NodeKind) {
        let Some(data) = self.node(node) else {
            return;
        };
        if !matches!(data.kind, NodeKind::Element { .. }) {
            tracing::debug!(?node, "Content write ignored for non-element node");
            return;
        }

        let lone_child = match data.children.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        if let Some(only) = lone_child
            && let Some(child) = self.node_mut(only)
            && matches!(child.kind, NodeKind::Text(_) | NodeKind::Markup(_))
        {
            child.kind = kind;
            return;
        }

        let old_children = self.node_mut(node).map(|n| std::mem::take(&mut n.children));
        for child in old_children.into_iter().flatten() {
            if let Some(data) = self.node_mut(child) {
                data.parent = None;
            }
        }
        let content = self.push(kind);
        self.append_child(node, content);
    }

    /// Serialize the whole document as HTML.
    ///
    /// Shadow roots are written as declarative `<template shadowrootmode="open">`
    /// elements, text is escaped and markup is written as is.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    /// Serialize the children of `node` as HTML.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_html(child, &mut out);
        }
        out
    }

    /// Append the HTML of `node` and its subtree to `out`.
    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.node(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Markup(markup) => out.push_str(markup),
            NodeKind::Fragment => {
                for &child in &data.children {
                    self.write_html(child, out);
                }
            }
            NodeKind::Element { tag, attributes, shadow_root } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
                }
                out.push('>');
                if let Some(shadow) = shadow_root {
                    out.push_str(r#"<template shadowrootmode="open">"#);
                    self.write_html(*shadow, out);
                    out.push_str("</template>");
                }
                for &child in &data.children {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    /// Build a document from its JSON description.
    ///
    /// The description is an array of nodes; a node is either a string (text)
    /// or an object `{ "tag", "attributes", "text", "children", "shadow" }`.
    /// `text` is appended as a text child ahead of `children`.
    ///
    /// # Errors
    /// Returns an error if `json` is not a valid description.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let nodes: Vec<NodeSpec> = serde_json::from_str(json)?;
        let mut document = Self::new();
        let root = document.root();
        document.build(root, nodes);
        Ok(document)
    }

    /// Append the described `nodes` under `parent`.
    fn build(&mut self, parent: NodeId, nodes: Vec<NodeSpec>) {
        for spec in nodes {
            match spec {
                NodeSpec::Text(text) => {
                    self.append_text(parent, text);
                }
                NodeSpec::Element(element) => {
                    let id = self.append_element(parent, element.tag);
                    for (name, value) in element.attributes {
                        self.set_attribute(id, name, value);
                    }
                    if let Some(shadow_children) = element.shadow
                        && let Some(shadow) = self.attach_shadow(id)
                    {
                        self.build(shadow, shadow_children);
                    }
                    if let Some(text) = element.text {
                        self.append_text(id, text);
                    }
                    self.build(id, element.children);
                }
            }
        }
    }
}

/// One node of a JSON document description.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeSpec {
    /// Text node.
    Text(String),
    /// Element node.
    Element(ElementSpec),
}

/// Element of a JSON document description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ElementSpec {
    /// Tag name.
    tag: String,
    /// Attributes, written in name order.
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    /// Text content placed before `children`.
    #[serde(default)]
    text: Option<String>,
    /// Light-tree children.
    #[serde(default)]
    children: Vec<NodeSpec>,
    /// Children of an attached encapsulated root.
    #[serde(default)]
    shadow: Option<Vec<NodeSpec>>,
}

/// Escape `&`, `<` and `>`.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape text and `"` for a double-quoted attribute value.
fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Iterator returned by [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    /// Document being walked.
    document: &'a Document,
    /// Pending nodes, next on top.
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack.extend(self.document.children(id).iter().rev());
        Some(id)
    }
}

impl DocumentTree for Document {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        Self::root(self)
    }

    fn find_marked(&self, root: NodeId, attribute: &str) -> Vec<NodeId> {
        self.descendants(root).filter(|&id| self.get_attribute(id, attribute).is_some()).collect()
    }

    fn shadow_hosts(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root).filter(|&id| self.get_shadow_root(id).is_some()).collect()
    }

    fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.get_shadow_root(host)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get_attribute(node, name)
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.replace_children(node, NodeKind::Text(text.to_string()));
    }

    fn set_markup(&mut self, node: NodeId, markup: &str) {
        self.replace_children(node, NodeKind::Markup(markup.to_string()));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let header = doc.append_element(root, "h1");
        doc.set_attribute(header, "data-i18n", "title");
        let host = doc.append_element(root, "x-card");
        let shadow = doc.attach_shadow(host).unwrap();
        let inner = doc.append_element(shadow, "p");
        doc.set_attribute(inner, "data-i18n", "card.body");
        (doc, header, host, inner)
    }

    #[googletest::test]
    fn queries_do_not_cross_shadow_boundary() {
        let (doc, header, host, inner) = sample();

        expect_that!(doc.find_marked(doc.root(), "data-i18n"), elements_are![eq(&header)]);
        expect_that!(doc.shadow_hosts(doc.root()), elements_are![eq(&host)]);

        let shadow = doc.get_shadow_root(host).unwrap();
        expect_that!(doc.find_marked(shadow, "data-i18n"), elements_are![eq(&inner)]);
    }

    #[googletest::test]
    fn find_marked_is_in_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.append_element(root, "div");
        doc.set_attribute(outer, "data-i18n", "outer");
        let first = doc.append_element(outer, "span");
        doc.set_attribute(first, "data-i18n", "first");
        let second = doc.append_element(root, "span");
        doc.set_attribute(second, "data-i18n", "second");

        expect_that!(
            doc.find_marked(root, "data-i18n"),
            elements_are![eq(&outer), eq(&first), eq(&second)]
        );
    }

    #[googletest::test]
    fn attach_shadow_is_idempotent() {
        let (mut doc, header, host, _) = sample();
        let first = doc.get_shadow_root(host);

        expect_that!(doc.attach_shadow(host), eq(first));
        expect_that!(doc.attach_shadow(doc.root()), none());
        expect_that!(doc.get_shadow_root(header), none());
    }

    #[test]
    fn set_text_replaces_children_and_escapes() {
        let (mut doc, header, _, _) = sample();
        doc.append_text(header, "old");

        doc.set_text(header, "<b>Hi</b> & bye");

        assert_eq!(doc.text_content(header), "<b>Hi</b> & bye");
        assert_eq!(
            doc.inner_html(doc.root()).split("<x-card>").next().unwrap(),
            r#"<h1 data-i18n="title">&lt;b&gt;Hi&lt;/b&gt; &amp; bye</h1>"#
        );
    }

    #[test]
    fn set_markup_is_written_raw() {
        let (mut doc, header, _, _) = sample();

        doc.set_markup(header, "<b>Hi</b>");

        assert_eq!(doc.children(header).len(), 1);
        assert!(doc.to_html().starts_with(r#"<h1 data-i18n="title"><b>Hi</b></h1>"#));
    }

    #[test]
    fn serializes_shadow_roots_as_templates() {
        let (mut doc, _, _, inner) = sample();
        doc.set_text(inner, "Body");

        assert_eq!(
            doc.to_html(),
            concat!(
                r#"<h1 data-i18n="title"></h1>"#,
                r#"<x-card><template shadowrootmode="open">"#,
                r#"<p data-i18n="card.body">Body</p>"#,
                "</template></x-card>"
            )
        );
    }

    #[test]
    fn builds_from_json_description() {
        let doc = Document::from_json_str(
            r#"[
                { "tag": "h1", "attributes": { "id": "t", "data-i18n": "title" }, "children": ["Hello"] },
                { "tag": "x-outer", "shadow": [
                    { "tag": "x-inner", "attributes": { "id": "inner-host" }, "shadow": [
                        { "tag": "span", "attributes": { "id": "deep", "data-i18n": "deep.key" } }
                    ] }
                ] }
            ]"#,
        )
        .unwrap();

        let title = doc.element_by_id("t").unwrap();
        assert_eq!(doc.text_content(title), "Hello");
        let deep = doc.element_by_id("deep").unwrap();
        assert_eq!(doc.get_attribute(deep, "data-i18n"), Some("deep.key"));
        assert!(doc.find_marked(doc.root(), "data-i18n").len() == 1);
    }

    #[test]
    fn text_field_becomes_first_child() {
        let doc = Document::from_json_str(
            r#"[{ "tag": "p", "attributes": { "id": "p" }, "text": "hi", "children": [" there"] }]"#,
        )
        .unwrap();

        let p = doc.element_by_id("p").unwrap();
        assert_eq!(doc.text_content(p), "hi there");
        assert_eq!(doc.to_html(), r#"<p id="p">hi there</p>"#);
    }

    #[test]
    fn rejects_unknown_element_fields() {
        let result = Document::from_json_str(r#"[{ "tag": "p", "label": "nope" }]"#);

        assert!(result.is_err());
    }

    #[test]
    fn repeated_content_writes_keep_arena_size() {
        let (mut doc, header, _, _) = sample();
        doc.set_text(header, "first");
        let before = doc.node_count();

        for round in 0..1000 {
            if round % 2 == 0 {
                doc.set_markup(header, "<b>markup</b>");
            } else {
                doc.set_text(header, "text");
            }
        }

        assert_eq!(doc.node_count(), before);
        assert_eq!(doc.children(header).len(), 1);
        assert_eq!(doc.to_html().split("<x-card>").next().unwrap(), r#"<h1 data-i18n="title">text</h1>"#);
    }

    #[test]
    fn content_write_detaches_element_children() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.append_element(root, "div");
        let nested = doc.append_element(outer, "span");

        doc.set_text(outer, "flat");
        doc.set_text(outer, "again");

        assert_eq!(doc.text_content(outer), "again");
        assert_eq!(doc.children(outer).len(), 1);
        assert!(!doc.children(outer).contains(&nested));
        assert_eq!(doc.node_count(), 4);
    }

    #[test]
    fn append_child_rejects_cycles_through_shadow_roots() {
        let mut doc = Document::new();
        let root = doc.root();
        let host = doc.append_element(root, "x-host");
        let shadow = doc.attach_shadow(host).unwrap();
        let inner = doc.append_element(shadow, "div");

        doc.append_child(inner, host);

        assert_eq!(doc.children(root), &[host]);
        assert!(doc.children(inner).is_empty());
    }

    #[test]
    fn append_child_rejects_cycles() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.append_element(root, "div");
        let inner = doc.append_element(outer, "div");

        doc.append_child(inner, outer);
        doc.append_child(outer, outer);

        assert_eq!(doc.children(root), &[outer]);
        assert_eq!(doc.children(outer), &[inner]);
        assert!(doc.children(inner).is_empty());
    }

    #[test]
    fn append_child_moves_between_parents() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.append_element(root, "a");
        let b = doc.append_element(root, "b");
        let child = doc.append_element(a, "i");

        doc.append_child(b, child);

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[child]);
    }
}
