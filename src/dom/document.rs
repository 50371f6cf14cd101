use std::fmt::Write as _;

use crate::core::Viewport;
use crate::dom::node::Element;
use crate::dom::{NodeId, Selector};
use crate::error::{WidgetError, WidgetResult};

/// Void elements are serialized without a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// In-memory element tree standing in for the browser document.
///
/// Nodes live in an arena. Detached nodes keep their subtree and can be
/// re-attached later; [`Document::remove`] frees a subtree and its slots are
/// reused by later allocations. Passing a `NodeId` created by a different
/// document is a logic error and panics.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    free: Vec<NodeId>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body")],
            free: Vec::new(),
            body: NodeId::new(0),
        }
    }

    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Creates a detached element, reusing a freed slot when one is available.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        if let Some(id) = self.free.pop() {
            *self.element_mut(id) = Element::new(tag);
            return id;
        }
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Element::new(tag));
        id
    }

    /// Detaches `node` and frees it together with its subtree.
    ///
    /// Ids of removed nodes must not be used afterwards; their slots are
    /// handed out again by [`Document::create_element`]. Returns `false` for
    /// the body and for nodes that were already removed.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if node == self.body || self.element(node).removed {
            return false;
        }
        self.detach(node);
        let mut freed = self.descendants(node);
        freed.push(node);
        for id in freed {
            let element = self.element_mut(id);
            element.children.clear();
            element.parent = None;
            element.removed = true;
            self.free.push(id);
        }
        true
    }

    /// Frees every child subtree of `node`.
    pub fn remove_children(&mut self, node: NodeId) {
        for child in self.clear_children(node) {
            self.remove(child);
        }
    }

    /// Number of live elements, detached ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Number of arena slots allocated so far, freed ones included.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Creates an element and appends it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let child = self.create_element(tag);
        self.link(parent, child, None);
        child
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> WidgetResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` before `reference` (or at the end when `None`),
    /// detaching it from its previous parent first.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> WidgetResult<()> {
        if child == parent || self.is_ancestor(child, parent) {
            return Err(WidgetError::InvalidData(
                "cannot insert a node into its own subtree".to_owned(),
            ));
        }
        if child == self.body {
            return Err(WidgetError::InvalidData(
                "the body element cannot be re-parented".to_owned(),
            ));
        }
        if reference.is_some_and(|r| self.element(r).parent != Some(parent)) {
            return Err(WidgetError::InvalidData(
                "reference node is not a child of the parent".to_owned(),
            ));
        }
        self.detach(child);
        self.link(parent, child, reference);
        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let position = reference
            .and_then(|r| self.element(parent).children.iter().position(|c| *c == r))
            .unwrap_or(self.element(parent).children.len());
        self.element_mut(parent).children.insert(position, child);
        self.element_mut(child).parent = Some(parent);
    }

    /// Removes `node` from its parent. Returns `false` when it was already detached.
    pub fn detach(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.element(node).parent else {
            return false;
        };
        self.element_mut(parent).children.retain(|c| *c != node);
        self.element_mut(node).parent = None;
        true
    }

    /// Detaches every child of `node` and returns them in their previous order.
    pub fn clear_children(&mut self, node: NodeId) -> Vec<NodeId> {
        let children = std::mem::take(&mut self.element_mut(node).children);
        for child in &children {
            self.element_mut(*child).parent = None;
        }
        children
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).parent
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.element(node).children
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.element(node).tag
    }

    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.element(node).parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.element(id).parent;
        }
        false
    }

    /// Returns `node` followed by its ancestors up to the topmost one.
    #[must_use]
    pub fn ancestry(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = self.element(node).parent;
        while let Some(id) = current {
            path.push(id);
            current = self.element(id).parent;
        }
        path
    }

    /// Pre-order descendants of `node`, excluding `node` itself.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.element(node).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.element(id).children.iter().rev().copied());
        }
        out
    }

    /// First connected element with the given `id` attribute, in document order.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if self.attribute(self.body, "id") == Some(id) {
            return Some(self.body);
        }
        self.descendants(self.body)
            .into_iter()
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    /// Descendants of `scope` matching `selector`, in document order.
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> WidgetResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_all(scope, &selector))
    }

    pub fn query_selector(&self, scope: NodeId, selector: &str) -> WidgetResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .find(|node| selector.matches(self, *node)))
    }

    #[must_use]
    pub fn select_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| selector.matches(self, *node))
            .collect()
    }

    /// Direct children of `node` with the given tag.
    #[must_use]
    pub fn child_elements(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.element(node)
            .children
            .iter()
            .copied()
            .filter(|child| self.element(*child).tag.eq_ignore_ascii_case(tag))
            .collect()
    }

    #[must_use]
    pub fn first_child_element(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        self.child_elements(node, tag).into_iter().next()
    }

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).classes.contains(class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.element_mut(node).classes.insert(class.to_owned());
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.element_mut(node).classes.shift_remove(class);
    }

    /// Toggles `class` and returns whether it is present afterwards.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).attributes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        if name == "class" {
            return !self.element(node).classes.is_empty();
        }
        self.element(node).attributes.contains_key(name)
    }

    /// Sets an attribute. `class` replaces the whole class list.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let element = self.element_mut(node);
        if name == "class" {
            element.replace_classes(&value);
        } else {
            element.attributes.insert(name.to_owned(), value);
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let element = self.element_mut(node);
        if name == "class" {
            element.classes.clear();
        } else {
            element.attributes.shift_remove(name);
        }
    }

    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.element(node).text.as_deref()
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.element_mut(node).text = Some(text.into());
    }

    /// Concatenated own text of `node` and all its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.text(node).unwrap_or_default().to_owned();
        for child in self.descendants(node) {
            if let Some(text) = self.text(child) {
                out.push_str(text);
            }
        }
        out
    }

    /// Layout box of `node` in CSS pixels.
    #[must_use]
    pub fn size(&self, node: NodeId) -> Viewport {
        self.element(node).layout
    }

    pub fn set_size(&mut self, node: NodeId, width: u32, height: u32) {
        self.element_mut(node).layout = Viewport::new(width, height);
    }

    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let element = self.element(node);
        let _ = write!(out, "<{}", element.tag);
        if let Some(id) = element.attributes.get("id") {
            let _ = write!(out, " id=\"{}\"", escape(id));
        }
        if let Some(classes) = element.class_attribute() {
            let _ = write!(out, " class=\"{}\"", escape(&classes));
        }
        for (name, value) in element.attributes.iter().filter(|(k, _)| *k != "id") {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        out.push('>');
        if VOID_TAGS.contains(&element.tag.as_str()) {
            return;
        }
        if let Some(text) = &element.text {
            out.push_str(&escape(text));
        }
        for child in &element.children {
            self.write_html(*child, out);
        }
        let _ = write!(out, "</{}>", element.tag);
    }

    fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.index()]
    }

    fn element_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.nodes[node.index()]
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::Document;

    #[test]
    fn descendants_are_in_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append_element(body, "div");
        let a1 = doc.append_element(a, "span");
        let b = doc.append_element(body, "div");

        assert_eq!(doc.descendants(body), vec![a, a1, b]);
    }

    #[test]
    fn insert_before_rejects_cycles() {
        let mut doc = Document::new();
        let outer = doc.append_element(doc.body(), "div");
        let inner = doc.append_element(outer, "div");

        assert!(doc.append_child(inner, outer).is_err());
        assert_eq!(doc.parent(inner), Some(outer));
    }

    #[test]
    fn detached_nodes_are_invisible_to_id_lookup() {
        let mut doc = Document::new();
        let panel = doc.append_element(doc.body(), "div");
        doc.set_attribute(panel, "id", "panel");
        assert_eq!(doc.get_element_by_id("panel"), Some(panel));

        doc.detach(panel);
        assert_eq!(doc.get_element_by_id("panel"), None);
    }

    #[test]
    fn removed_subtrees_are_reused_by_new_elements() {
        let mut doc = Document::new();
        let list = doc.append_element(doc.body(), "ul");
        let item = doc.append_element(list, "li");
        doc.append_element(item, "a");
        assert_eq!(doc.capacity(), 4);

        assert!(doc.remove(item));
        assert!(!doc.remove(item));
        assert!(doc.children(list).is_empty());
        assert_eq!(doc.node_count(), 2);

        let again = doc.append_element(list, "li");
        doc.append_element(again, "a");
        assert_eq!(doc.capacity(), 4);
        assert_eq!(doc.node_count(), 4);
        assert_eq!(doc.outer_html(list), "<ul><li><a></a></li></ul>");
        assert!(!doc.remove(doc.body()));
    }

    #[test]
    fn outer_html_escapes_text_and_attributes() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.body(), "p");
        doc.set_attribute(p, "class", "note  warn");
        doc.set_attribute(p, "title", "a \"b\"");
        doc.set_text(p, "1 < 2 & 3");

        assert_eq!(
            doc.outer_html(p),
            "<p class=\"note warn\" title=\"a &quot;b&quot;\">1 &lt; 2 &amp; 3</p>"
        );
    }
}
