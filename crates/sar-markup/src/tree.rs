//! Arena-backed element tree.
//!
//! `MarkupTree` owns every node of one parsed fragment. Nodes refer to each other by
//! [`NodeId`], and removal only rewrites parent/child links, so the tree can be mutated
//! while a caller holds a list of ids gathered earlier.

use std::collections::BTreeMap;

/// Index of a node inside a [`MarkupTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Payload of a node.
#[derive(Debug, Clone)]
enum NodeData {
    /// The fragment root; holds top-level content.
    Root,
    /// An element with its lowercase tag name and attributes in source order.
    Element {
        /// Tag name.
        tag: String,
        /// Attribute name/value pairs.
        attrs: Vec<(String, String)>,
    },
    /// A run of character data, entities already decoded.
    Text(String),
}

/// A node slot in the arena.
#[derive(Debug, Clone)]
struct Slot {
    /// The node payload.
    data: NodeData,
    /// Parent node, or `None` for the root and for detached nodes.
    parent: Option<NodeId>,
    /// Child nodes in document order.
    children: Vec<NodeId>,
}

/// A parsed HTML fragment.
#[derive(Debug, Clone)]
pub struct MarkupTree {
    /// All nodes ever created; index 0 is the root.
    nodes: Vec<Slot>,
}

impl Default for MarkupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupTree {
    /// Creates a tree holding only an empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Slot {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Returns the root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends an element under `parent` and returns its id.
    pub fn append_element<'a>(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> NodeId {
        let data = NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        };
        self.append(parent, data)
    }

    /// Appends a text node under `parent` and returns its id.
    ///
    /// Adjacent text siblings are not merged; `text_content` concatenates them anyway.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeData::Text(text.to_string()))
    }

    /// Pushes a slot and links it as the last child of `parent`.
    fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Slot {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Returns the total number of slots, including detached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns the node's parent, or `None` for the root and detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Returns the node's children in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Returns the tag name if the node is an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Returns the text if the node is a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns an attribute value of an element.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Returns true if the node is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current == self.root()
    }

    /// Iterates over `id` and all its descendants in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Returns every attached element with the given tag, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&id| self.tag(id).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }

    /// Returns the hyperlinks (`a` elements) nested anywhere inside `id`, in document order.
    pub fn links_within(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .skip(1)
            .filter(|&node| self.tag(node) == Some("a"))
            .collect()
    }

    /// Returns the concatenated text of `id` and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|node| self.text(node))
            .collect()
    }

    /// Removes `id` from its parent's children.
    ///
    /// The node and its subtree stay in the arena, unreachable from the root. Returns
    /// false if the node was already detached or is the root.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return false;
        };
        self.nodes[parent.0].children.retain(|&child| child != id);
        true
    }

    /// Returns a structural view of an element, or `None` for text nodes and the root.
    pub fn element(&self, id: NodeId) -> Option<StructuralElement<'_>> {
        self.tag(id).map(|_| StructuralElement { tree: self, id })
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    /// The tree being walked.
    tree: &'a MarkupTree,
    /// Nodes still to visit (rightmost children pushed first).
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// A borrowed view of one element in a [`MarkupTree`].
#[derive(Debug, Clone, Copy)]
pub struct StructuralElement<'a> {
    /// The owning tree.
    tree: &'a MarkupTree,
    /// The element's id.
    id: NodeId,
}

impl<'a> StructuralElement<'a> {
    /// Returns the element's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the lowercase tag name.
    pub fn tag(&self) -> &'a str {
        self.tree.tag(self.id).unwrap_or_default()
    }

    /// Returns an attribute value.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.tree.attr(self.id, name)
    }

    /// Returns all attributes, keyed by name.
    pub fn attributes(&self) -> BTreeMap<&'a str, &'a str> {
        match &self.tree.nodes[self.id.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect(),
            _ => BTreeMap::new(),
        }
    }

    /// Returns the element's current text content.
    pub fn text_content(&self) -> String {
        self.tree.text_content(self.id)
    }

    /// Returns the element children (text nodes skipped).
    pub fn children(&self) -> impl Iterator<Item = StructuralElement<'a>> + 'a {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .filter_map(move |&child| tree.element(child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An empty attribute list.
    const NO_ATTRS: [(&str, &str); 0] = [];

    /// Builds `<p>one <a href="/x">two</a> three</p><p>four</p>`.
    fn sample() -> (MarkupTree, NodeId, NodeId, NodeId) {
        let mut tree = MarkupTree::new();
        let root = tree.root();
        let p1 = tree.append_element(root, "p", NO_ATTRS);
        tree.append_text(p1, "one ");
        let link = tree.append_element(p1, "a", [("href", "/x")]);
        tree.append_text(link, "two");
        tree.append_text(p1, " three");
        let p2 = tree.append_element(root, "P", NO_ATTRS);
        tree.append_text(p2, "four");
        (tree, p1, link, p2)
    }

    #[test]
    fn new_tree_is_empty() {
        let tree = MarkupTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.text_content(tree.root()), "");
    }

    #[test]
    fn find_by_tag_in_document_order() {
        let (tree, p1, _, p2) = sample();
        assert_eq!(tree.find_by_tag("p"), vec![p1, p2]);
    }

    #[test]
    fn tags_are_lowercased() {
        let (tree, _, _, p2) = sample();
        assert_eq!(tree.tag(p2), Some("p"));
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let (tree, p1, _, _) = sample();
        assert_eq!(tree.text_content(p1), "one two three");
        assert_eq!(tree.text_content(tree.root()), "one two threefour");
    }

    #[test]
    fn links_within_excludes_self() {
        let (tree, p1, link, _) = sample();
        assert_eq!(tree.links_within(p1), vec![link]);
        assert!(tree.links_within(link).is_empty());
    }

    #[test]
    fn attr_lookup() {
        let (tree, p1, link, _) = sample();
        assert_eq!(tree.attr(link, "href"), Some("/x"));
        assert_eq!(tree.attr(link, "HREF"), Some("/x"));
        assert_eq!(tree.attr(p1, "href"), None);
    }

    #[test]
    fn detach_removes_text_from_parent() {
        let (mut tree, p1, link, _) = sample();
        assert!(tree.detach(link));
        assert_eq!(tree.text_content(p1), "one  three");
        assert!(!tree.is_attached(link));
        // The detached subtree keeps its own content.
        assert_eq!(tree.text_content(link), "two");
    }

    #[test]
    fn detach_twice_is_noop() {
        let (mut tree, _, link, _) = sample();
        assert!(tree.detach(link));
        assert!(!tree.detach(link));
        assert!(!tree.detach(tree.root()));
    }

    #[test]
    fn ids_survive_detach() {
        let (mut tree, p1, link, p2) = sample();
        let paragraphs = tree.find_by_tag("p");
        tree.detach(link);
        assert_eq!(paragraphs, vec![p1, p2]);
        assert_eq!(tree.text_content(p2), "four");
    }

    #[test]
    fn detached_elements_are_not_found() {
        let (mut tree, p1, _, p2) = sample();
        tree.detach(p1);
        assert_eq!(tree.find_by_tag("p"), vec![p2]);
        assert!(tree.find_by_tag("a").is_empty());
    }

    #[test]
    fn structural_element_view() {
        let (tree, p1, link, _) = sample();
        let element = tree.element(p1).unwrap();
        assert_eq!(element.tag(), "p");
        assert_eq!(element.text_content(), "one two three");
        let children: Vec<_> = element.children().map(|c| c.id()).collect();
        assert_eq!(children, vec![link]);

        let anchor = tree.element(link).unwrap();
        assert_eq!(anchor.attributes().get("href"), Some(&"/x"));
        assert!(tree.element(tree.root()).is_none());
    }
}
