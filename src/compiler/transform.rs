//! Transform an [`ArenaDom`] into [`RichText`].

use html5ever::LocalName;

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};
use crate::model::{Align, Marks, Node, NodeId, RichText, Role};

/// Pixels per indentation step, matching the synthesized `margin-left`.
pub const INDENT_STEP_PX: f32 = 40.0;

/// Deepest indentation a block can carry.
pub const MAX_INDENT: u8 = 8;

/// Elements whose subtree never contributes visible content.
fn is_hidden(local_name: &LocalName) -> bool {
    matches!(
        local_name.as_ref(),
        "head" | "script" | "style" | "template" | "title" | "meta" | "link" | "noscript"
    )
}

/// Map an HTML element to its semantic role.
fn map_element_to_role(local_name: &LocalName) -> Role {
    match local_name.as_ref() {
        "div" | "section" | "article" | "nav" | "header" | "footer" | "main" | "address"
        | "aside" | "figure" | "figcaption" | "details" | "summary" | "center" | "dl" | "dt"
        | "dd" | "table" | "tr" | "td" | "th" => Role::Container,

        "br" => Role::Break,
        "hr" => Role::Rule,
        "p" => Role::Paragraph,
        "pre" => Role::CodeBlock,
        "blockquote" => Role::BlockQuote,

        "h1" => Role::Heading(1),
        "h2" => Role::Heading(2),
        "h3" => Role::Heading(3),
        "h4" => Role::Heading(4),
        "h5" => Role::Heading(5),
        "h6" => Role::Heading(6),

        "ul" => Role::UnorderedList,
        "ol" => Role::OrderedList,
        "li" => Role::ListItem,

        "a" => Role::Link,

        "span" | "font" | "em" | "i" | "cite" | "var" | "dfn" | "strong" | "b" | "code"
        | "kbd" | "samp" | "tt" | "sup" | "sub" | "u" | "ins" | "s" | "strike" | "del"
        | "small" | "big" | "mark" | "abbr" | "time" | "q" | "label" | "bdi" | "bdo" | "img" => {
            Role::Inline
        }

        // Unknown elements behave like generic blocks.
        _ => Role::Container,
    }
}

/// Marks implied by the element itself.
fn tag_marks(local_name: &LocalName) -> Marks {
    match local_name.as_ref() {
        "strong" | "b" => Marks::BOLD,
        "em" | "i" | "cite" | "var" | "dfn" => Marks::ITALIC,
        "u" | "ins" => Marks::UNDERLINE,
        "s" | "strike" | "del" => Marks::STRIKETHROUGH,
        "code" | "kbd" | "samp" | "tt" => Marks::CODE,
        _ => Marks::NONE,
    }
}

/// Formatting recovered from an inline `style` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleHints {
    pub marks: Marks,
    pub align: Option<Align>,
    pub indent: u8,
}

/// Read the handful of declarations an editable surface writes into `style`.
pub fn parse_inline_style(style: &str) -> StyleHints {
    let mut hints = StyleHints::default();

    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = value
            .trim()
            .trim_end_matches("!important")
            .trim()
            .to_ascii_lowercase();

        match property.as_str() {
            "font-weight" => {
                let heavy = match value.as_str() {
                    "bold" | "bolder" => true,
                    other => other.parse::<u16>().is_ok_and(|w| w >= 600),
                };
                if heavy {
                    hints.marks.insert(Marks::BOLD);
                }
            }
            "font-style" if value == "italic" || value == "oblique" => {
                hints.marks.insert(Marks::ITALIC);
            }
            "text-decoration" | "text-decoration-line" => {
                if value.contains("underline") {
                    hints.marks.insert(Marks::UNDERLINE);
                }
                if value.contains("line-through") {
                    hints.marks.insert(Marks::STRIKETHROUGH);
                }
            }
            "font-family" if value.contains("monospace") => {
                hints.marks.insert(Marks::CODE);
            }
            "text-align" => {
                hints.align = value.parse().ok();
            }
            "margin-left" | "padding-left" => {
                if let Some(px) = parse_px(&value) {
                    let steps = (px / INDENT_STEP_PX).round().clamp(0.0, MAX_INDENT as f32);
                    hints.indent = hints.indent.max(steps as u8);
                }
            }
            _ => {}
        }
    }

    hints
}

fn parse_px(value: &str) -> Option<f32> {
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Collapse whitespace runs to single spaces the way rendered text does.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Layout context the children of a node are processed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Block,
    Inline,
    Preformatted,
}

/// Context for the transform operation.
struct TransformContext<'a> {
    dom: &'a ArenaDom,
    content: RichText,
}

impl<'a> TransformContext<'a> {
    fn new(dom: &'a ArenaDom) -> Self {
        Self {
            dom,
            content: RichText::new(),
        }
    }

    fn transform(mut self) -> RichText {
        let body = self.dom.find_by_tag("body").unwrap_or(self.dom.document());
        self.process_children(body, NodeId::ROOT, Flow::Block);
        self.content
    }

    fn process_children(&mut self, dom_parent: ArenaNodeId, parent: NodeId, flow: Flow) {
        for child_id in self.dom.children(dom_parent).collect::<Vec<_>>() {
            self.process_node(child_id, parent, flow);
        }
    }

    fn process_node(&mut self, dom_id: ArenaNodeId, parent: NodeId, flow: Flow) {
        let Some(node) = self.dom.get(dom_id) else {
            return;
        };

        match &node.data {
            ArenaNodeData::Text(text) => self.process_text(text, parent, flow),
            ArenaNodeData::Element { name, .. } => {
                if is_hidden(&name.local) {
                    return;
                }
                self.process_element(dom_id, &name.local, parent, flow);
            }
            ArenaNodeData::Document | ArenaNodeData::Comment | ArenaNodeData::Doctype => {}
        }
    }

    fn process_text(&mut self, text: &str, parent: NodeId, flow: Flow) {
        if flow == Flow::Preformatted {
            self.content.push_text(parent, text);
            return;
        }

        if text.trim().is_empty() {
            // Inter-element whitespace in a block context is layout, not content.
            if text.contains('\n') && flow == Flow::Block {
                return;
            }
            self.content.push_text(parent, " ");
            return;
        }

        self.content.push_text(parent, &collapse_whitespace(text));
    }

    fn process_element(
        &mut self,
        dom_id: ArenaNodeId,
        local_name: &LocalName,
        parent: NodeId,
        flow: Flow,
    ) {
        let role = map_element_to_role(local_name);
        let mut hints = self
            .dom
            .get_attr(dom_id, "style")
            .map(parse_inline_style)
            .unwrap_or_default();
        if hints.align.is_none() {
            hints.align = self
                .dom
                .get_attr(dom_id, "align")
                .and_then(|a| a.parse().ok());
        }
        if local_name.as_ref() == "center" {
            hints.align = Some(Align::Center);
        }

        match role {
            Role::Break | Role::Rule => {
                self.content.push_node(parent, Node::new(role));
            }
            Role::Inline => {
                let marks = tag_marks(local_name).union(hints.marks);
                let id = self.content.push_node(parent, Node::inline(marks));
                let child_flow = if flow == Flow::Preformatted {
                    Flow::Preformatted
                } else {
                    Flow::Inline
                };
                self.process_children(dom_id, id, child_flow);
            }
            Role::Link => {
                let id = self.content.push_node(parent, Node::new(Role::Link));
                if let Some(href) = self.dom.get_attr(dom_id, "href") {
                    self.content.set_href(id, href.to_string());
                }
                let target = self.wrap_marks(id, hints.marks);
                let child_flow = if flow == Flow::Preformatted {
                    Flow::Preformatted
                } else {
                    Flow::Inline
                };
                self.process_children(dom_id, target, child_flow);
            }
            _ => {
                let mut block = Node::new(role);
                block.align = hints.align;
                block.indent = hints.indent;
                let id = self.content.push_node(parent, block);
                let target = self.wrap_marks(id, hints.marks);
                let child_flow = if role == Role::CodeBlock || flow == Flow::Preformatted {
                    Flow::Preformatted
                } else {
                    Flow::Block
                };
                self.process_children(dom_id, target, child_flow);
            }
        }
    }

    /// Styled blocks and links get an inner inline node carrying the marks.
    fn wrap_marks(&mut self, id: NodeId, marks: Marks) -> NodeId {
        if marks.is_empty() {
            id
        } else {
            self.content.push_node(id, Node::inline(marks))
        }
    }
}

/// Transform a parsed DOM into a markup tree.
pub fn transform(dom: &ArenaDom) -> RichText {
    TransformContext::new(dom).transform()
}
