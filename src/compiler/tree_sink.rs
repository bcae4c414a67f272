//! html5ever TreeSink that builds an [`ArenaDom`].

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId, Attribute};

/// Handle used by the tree builder to reference nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle(pub ArenaNodeId);

impl Default for NodeHandle {
    fn default() -> Self {
        NodeHandle(ArenaNodeId::NONE)
    }
}

/// TreeSink writing into an [`ArenaDom`].
///
/// The trait hands out `&self`, so the DOM sits behind a `RefCell`.
pub struct ArenaSink {
    dom: RefCell<ArenaDom>,
}

impl Default for ArenaSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaSink {
    pub fn new() -> Self {
        Self {
            dom: RefCell::new(ArenaDom::new()),
        }
    }

    /// Consume the sink and return the DOM.
    pub fn into_dom(self) -> ArenaDom {
        self.dom.into_inner()
    }
}

/// Attach a node or a run of text under `parent`.
fn attach(dom: &mut ArenaDom, parent: ArenaNodeId, child: NodeOrText<NodeHandle>) {
    match child {
        NodeOrText::AppendNode(node) => dom.append(parent, node.0),
        NodeOrText::AppendText(text) => dom.append_text(parent, &text),
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeHandle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // Page markup comes from an editable surface; be as lenient as a browser.
    }

    fn get_document(&self) -> Self::Handle {
        NodeHandle(self.dom.borrow().document())
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let dom = self.dom.borrow();
        match dom.get(target.0).map(|n| &n.data) {
            Some(ArenaNodeData::Element { name, .. }) => {
                // SAFETY: arena nodes are never removed or moved out of their
                // Vec slot's QualName once created, and the arena lives as long
                // as `self`. The RefCell guard hides that lifetime from the
                // borrow checker.
                unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) }
            }
            _ => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();
        NodeHandle(self.dom.borrow_mut().create_element(name, attrs))
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        NodeHandle(self.dom.borrow_mut().create_comment())
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        NodeHandle(self.dom.borrow_mut().create_comment())
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        attach(&mut self.dom.borrow_mut(), parent.0, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let parent = self
            .dom
            .borrow()
            .get(element.0)
            .map(|n| n.parent)
            .unwrap_or(ArenaNodeId::NONE);
        let target = if parent.is_some() {
            parent
        } else {
            prev_element.0
        };
        attach(&mut self.dom.borrow_mut(), target, child);
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut dom = self.dom.borrow_mut();
        let doc = dom.document();
        let doctype = dom.create_doctype();
        dom.append(doc, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut dom = self.dom.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node.0,
            NodeOrText::AppendText(text) => dom.create_text(text.to_string()),
        };
        dom.insert_before(sibling.0, node);
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut dom = self.dom.borrow_mut();
        if let Some(node) = dom.get_mut(target.0)
            && let ArenaNodeData::Element {
                attrs: existing, ..
            } = &mut node.data
        {
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(Attribute {
                        name: attr.name,
                        value: attr.value.to_string(),
                    });
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.dom.borrow_mut().detach(target.0);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut dom = self.dom.borrow_mut();
        let children: Vec<_> = dom.children(node.0).collect();
        for child in children {
            dom.detach(child);
            dom.append(new_parent.0, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use html5ever::driver::ParseOpts;
    use html5ever::parse_document;
    use html5ever::tendril::TendrilSink;

    use super::*;

    fn parse_html(html: &str) -> ArenaDom {
        parse_document(ArenaSink::new(), ParseOpts::default())
            .from_utf8()
            .one(html.as_bytes())
            .into_dom()
    }

    #[test]
    fn test_fragment_lands_in_body() {
        let dom = parse_html("<p>Hello</p>");

        let body = dom.find_by_tag("body").expect("should synthesize body");
        let p = dom.find_by_tag("p").expect("should find p");
        assert_eq!(dom.get(p).unwrap().parent, body);

        let text_id = dom.children(p).next().expect("p should have child");
        assert_eq!(dom.text_content(text_id), Some("Hello"));
    }

    #[test]
    fn test_misnested_markup_is_repaired() {
        // The adoption agency algorithm moves nodes around via
        // remove_from_parent / reparent_children.
        let dom = parse_html("<b>bold <i>both</b> italic</i>");
        let b = dom.find_by_tag("b").expect("b");
        let i = dom.find_by_tag("i").expect("i");
        assert_eq!(dom.get(i).unwrap().parent, b);
    }

    #[test]
    fn test_attributes_survive() {
        let dom = parse_html(r#"<div style="text-align: right">x</div>"#);
        let div = dom.find_by_tag("div").expect("div");
        assert_eq!(dom.get_attr(div, "style"), Some("text-align: right"));
    }
}
