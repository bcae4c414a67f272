//! Arena-based DOM that html5ever parses into.
//!
//! All nodes live in one vector; links between them are indices. The DOM is
//! a short-lived intermediate: it exists only between parsing a fragment of
//! page markup and transforming it into a [`RichText`](crate::model::RichText).

use html5ever::{LocalName, QualName};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaNodeId(pub u32);

impl ArenaNodeId {
    /// Sentinel value for no node.
    pub const NONE: ArenaNodeId = ArenaNodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node payload in the arena DOM.
#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    Document,
    Element { name: QualName, attrs: Vec<Attribute> },
    Text(String),
    /// Comments and processing instructions; kept only so the tree builder
    /// has something to hold on to.
    Comment,
    Doctype,
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node in the arena DOM.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: ArenaNodeId,
    pub first_child: ArenaNodeId,
    pub last_child: ArenaNodeId,
    pub prev_sibling: ArenaNodeId,
    pub next_sibling: ArenaNodeId,
}

impl ArenaNode {
    fn new(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: ArenaNodeId::NONE,
            first_child: ArenaNodeId::NONE,
            last_child: ArenaNodeId::NONE,
            prev_sibling: ArenaNodeId::NONE,
            next_sibling: ArenaNodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
    document: ArenaNodeId,
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaDom {
    /// Create a new DOM holding only the document node.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: ArenaNodeId::NONE,
        };
        dom.document = dom.alloc(ArenaNodeData::Document);
        dom
    }

    fn alloc(&mut self, data: ArenaNodeData) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(ArenaNode::new(data));
        id
    }

    pub fn document(&self) -> ArenaNodeId {
        self.document
    }

    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        self.alloc(ArenaNodeData::Element { name, attrs })
    }

    pub fn create_text(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNodeData::Text(text))
    }

    pub fn create_comment(&mut self) -> ArenaNodeId {
        self.alloc(ArenaNodeData::Comment)
    }

    pub fn create_doctype(&mut self) -> ArenaNodeId {
        self.alloc(ArenaNodeData::Doctype)
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = ArenaNodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text to `parent`, merging into a trailing text node if present.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let ArenaNodeData::Text(existing) = &mut last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, target: ArenaNodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = ArenaNodeId::NONE;
            node.prev_sibling = ArenaNodeId::NONE;
            node.next_sibling = ArenaNodeId::NONE;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn children(&self, parent: ArenaNodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(ArenaNodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Find the first element with the given tag (depth-first, document order).
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if self.element_name(id).is_some_and(|n| n.as_ref() == tag) {
                return Some(id);
            }
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        None
    }

    /// Element local name (tag).
    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Attribute value on an element.
    pub fn get_attr(&self, id: ArenaNodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Content of a text node.
    pub fn text_content(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: ArenaNodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(ArenaNodeId::NONE);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use html5ever::ns;

    use super::*;

    fn qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    #[test]
    fn test_append_children() {
        let mut dom = ArenaDom::new();

        let parent = dom.create_element(qname("div"), vec![]);
        let child1 = dom.create_element(qname("p"), vec![]);
        let child2 = dom.create_element(qname("p"), vec![]);

        dom.append(dom.document(), parent);
        dom.append(parent, child1);
        dom.append(parent, child2);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
        assert_eq!(dom.find_by_tag("p"), Some(child1));
    }

    #[test]
    fn test_text_merging() {
        let mut dom = ArenaDom::new();

        let p = dom.create_element(qname("p"), vec![]);
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text_content(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_insert_before_and_detach() {
        let mut dom = ArenaDom::new();
        let div = dom.create_element(qname("div"), vec![]);
        dom.append(dom.document(), div);

        let b = dom.create_element(qname("b"), vec![]);
        dom.append(div, b);
        let a = dom.create_element(qname("a"), vec![]);
        dom.insert_before(b, a);

        assert_eq!(dom.children(div).collect::<Vec<_>>(), vec![a, b]);

        dom.detach(a);
        assert_eq!(dom.children(div).collect::<Vec<_>>(), vec![b]);
        assert_eq!(dom.get(b).unwrap().prev_sibling, ArenaNodeId::NONE);
    }

    #[test]
    fn test_attribute_lookup() {
        let mut dom = ArenaDom::new();
        let p = dom.create_element(
            qname("p"),
            vec![Attribute {
                name: qname("style"),
                value: "text-align: center".to_string(),
            }],
        );
        assert_eq!(dom.get_attr(p, "style"), Some("text-align: center"));
        assert_eq!(dom.get_attr(p, "class"), None);
    }
}
