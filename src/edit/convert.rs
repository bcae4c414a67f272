//! Conversion between the markup tree and the flat block list.

use crate::compiler::MAX_INDENT;
use crate::model::{Align, Marks, Node, NodeId, RichText, Role};

use super::block::{Block, BlockKind, ListKind, Run};

/// Layout inherited from enclosing elements.
#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: BlockKind,
    align: Option<Align>,
    indent: u8,
}

/// Inline style inherited from enclosing elements.
#[derive(Debug, Clone, Default)]
struct Style {
    marks: Marks,
    href: Option<String>,
}

struct Flattener<'a> {
    content: &'a RichText,
    blocks: Vec<Block>,
    open: Option<Block>,
    lists: Vec<ListKind>,
}

impl<'a> Flattener<'a> {
    fn new(content: &'a RichText) -> Self {
        Self {
            content,
            blocks: Vec::new(),
            open: None,
            lists: Vec::new(),
        }
    }

    fn close(&mut self) {
        if let Some(mut block) = self.open.take() {
            block.normalize();
            self.blocks.push(block);
        }
    }

    fn open_block(&mut self, frame: Frame) -> &mut Block {
        self.open.get_or_insert_with(|| {
            let mut block = Block::new(frame.kind);
            block.align = frame.align;
            block.indent = frame.indent;
            block
        })
    }

    fn visit_children(&mut self, id: NodeId, frame: Frame, style: &Style) {
        let children: Vec<NodeId> = self.content.children(id).collect();
        for child in children {
            self.visit(child, frame, style);
        }
    }

    fn visit(&mut self, id: NodeId, frame: Frame, style: &Style) {
        let Some(node) = self.content.node(id) else {
            return;
        };

        match node.role {
            Role::Text => {
                let text = self.content.text(node.text);
                if text.is_empty() || (self.open.is_none() && text.trim().is_empty()) {
                    return;
                }
                let run = Run {
                    text: text.to_string(),
                    marks: style.marks,
                    href: style.href.clone(),
                };
                self.open_block(frame).runs.push(run);
            }
            Role::Inline => {
                let inner = Style {
                    marks: style.marks.union(node.marks),
                    href: style.href.clone(),
                };
                self.visit_children(id, frame, &inner);
            }
            Role::Link => {
                let inner = Style {
                    marks: style.marks,
                    href: self.content.href(id).map(str::to_string),
                };
                self.visit_children(id, frame, &inner);
            }
            Role::Break => {
                if frame.kind == BlockKind::Code {
                    self.open_block(frame).runs.push(Run::new("\n", style.marks));
                } else if self.open.is_some() {
                    self.close();
                } else {
                    self.open_block(frame);
                    self.close();
                }
            }
            Role::Rule => {
                self.close();
                self.blocks.push(Block::new(BlockKind::Rule));
            }
            Role::OrderedList | Role::UnorderedList => {
                self.close();
                self.lists.push(if node.role == Role::OrderedList {
                    ListKind::Ordered
                } else {
                    ListKind::Unordered
                });
                self.visit_children(id, frame, style);
                self.lists.pop();
                self.close();
            }
            Role::Root => self.visit_children(id, frame, style),
            role => self.visit_block(id, node, role, frame, style),
        }
    }

    fn visit_block(&mut self, id: NodeId, node: &Node, role: Role, frame: Frame, style: &Style) {
        self.close();

        let kind = match role {
            Role::Paragraph if frame.kind == BlockKind::Quote => BlockKind::Quote,
            Role::Paragraph => BlockKind::Paragraph,
            Role::Heading(level) => BlockKind::Heading(level),
            Role::BlockQuote => BlockKind::Quote,
            Role::CodeBlock => BlockKind::Code,
            Role::ListItem => {
                BlockKind::ListItem(self.lists.last().copied().unwrap_or(ListKind::Unordered))
            }
            _ => frame.kind,
        };
        let nesting = if role == Role::ListItem {
            self.lists.len().saturating_sub(1) as u8
        } else {
            0
        };
        let inner = Frame {
            kind,
            align: node.align.or(frame.align),
            indent: frame
                .indent
                .saturating_add(node.indent)
                .saturating_add(nesting)
                .min(MAX_INDENT),
        };

        let before = self.blocks.len();
        self.visit_children(id, inner, style);
        let produced = self.open.is_some() || self.blocks.len() > before;
        if !produced {
            self.open_block(inner);
        }
        self.close();
    }
}

/// Flatten a markup tree into blocks. Never returns an empty list.
pub fn blocks_from_rich_text(content: &RichText) -> Vec<Block> {
    let mut flattener = Flattener::new(content);
    let frame = Frame {
        kind: BlockKind::Line,
        align: None,
        indent: 0,
    };
    flattener.visit(NodeId::ROOT, frame, &Style::default());
    flattener.close();

    if flattener.blocks.is_empty() {
        flattener.blocks.push(Block::new(BlockKind::Line));
    }
    flattener.blocks
}

fn block_node(block: &Block, role: Role) -> Node {
    let mut node = Node::new(role);
    node.align = block.align;
    node.indent = block.indent;
    node
}

fn push_runs(content: &mut RichText, parent: NodeId, block: &Block) {
    if block.is_empty() {
        content.push_node(parent, Node::new(Role::Break));
        return;
    }
    for run in &block.runs {
        let mut target = parent;
        if let Some(href) = &run.href {
            target = content.push_node(target, Node::new(Role::Link));
            content.set_href(target, href.clone());
        }
        if !run.marks.is_empty() {
            target = content.push_node(target, Node::inline(run.marks));
        }
        content.push_text(target, &run.text);
    }
}

/// One open list level while rebuilding nested lists.
struct ListLevel {
    list: NodeId,
    kind: ListKind,
    last_item: Option<NodeId>,
}

/// Build a markup tree from blocks.
///
/// Runs of list items become (nested) lists; a single empty line becomes
/// empty content.
pub fn rich_text_from_blocks(blocks: &[Block]) -> RichText {
    let mut content = RichText::new();
    if blocks.len() == 1 && blocks[0].kind != BlockKind::Rule && blocks[0].is_empty() {
        return content;
    }

    let mut levels: Vec<ListLevel> = Vec::new();

    for block in blocks {
        let BlockKind::ListItem(kind) = block.kind else {
            levels.clear();
            let role = match block.kind {
                BlockKind::Line => Role::Container,
                BlockKind::Paragraph => Role::Paragraph,
                BlockKind::Heading(level) => Role::Heading(level),
                BlockKind::Quote => Role::BlockQuote,
                BlockKind::Code => Role::CodeBlock,
                BlockKind::Rule => Role::Rule,
                BlockKind::ListItem(_) => Role::ListItem,
            };
            let id = content.push_node(NodeId::ROOT, block_node(block, role));
            if role != Role::Rule {
                push_runs(&mut content, id, block);
            }
            continue;
        };

        let depth = usize::from(block.indent) + 1;
        levels.truncate(depth);
        if levels.len() == depth && levels[depth - 1].kind != kind {
            levels.pop();
        }
        while levels.len() < depth {
            let parent = levels
                .last()
                .and_then(|l| l.last_item.or(Some(l.list)))
                .unwrap_or(NodeId::ROOT);
            let role = match kind {
                ListKind::Ordered => Role::OrderedList,
                ListKind::Unordered => Role::UnorderedList,
            };
            let list = content.push_node(parent, Node::new(role));
            levels.push(ListLevel {
                list,
                kind,
                last_item: None,
            });
        }

        let Some(level) = levels.last_mut() else {
            continue;
        };
        let mut item = Node::new(Role::ListItem);
        item.align = block.align;
        let item_id = content.push_node(level.list, item);
        level.last_item = Some(item_id);
        push_runs(&mut content, item_id, block);
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(html: &str) -> Vec<BlockKind> {
        blocks_from_rich_text(&RichText::from_html(html))
            .iter()
            .map(|b| b.kind)
            .collect()
    }

    #[test]
    fn test_empty_content_is_one_line() {
        let blocks = blocks_from_rich_text(&RichText::new());
        assert_eq!(blocks, vec![Block::new(BlockKind::Line)]);
        assert!(rich_text_from_blocks(&blocks).is_empty());
    }

    #[test]
    fn test_block_kinds() {
        assert_eq!(
            kinds("<h2>a</h2><p>b</p><div>c</div><blockquote>d</blockquote><pre>e</pre><hr>"),
            vec![
                BlockKind::Heading(2),
                BlockKind::Paragraph,
                BlockKind::Line,
                BlockKind::Quote,
                BlockKind::Code,
                BlockKind::Rule,
            ]
        );
    }

    #[test]
    fn test_breaks_split_lines() {
        let blocks = blocks_from_rich_text(&RichText::from_html("a<br>b<div><br></div>c"));
        let texts: Vec<String> = blocks.iter().map(Block::text).collect();
        assert_eq!(texts, vec!["a", "b", "", "c"]);
    }

    #[test]
    fn test_marks_and_links_flatten_to_runs() {
        let blocks = blocks_from_rich_text(&RichText::from_html(
            r#"<p>x <b>y <i>z</i></b> <a href="/u">w</a></p>"#,
        ));
        let runs = &blocks[0].runs;
        assert_eq!(runs[0], Run::new("x ", Marks::NONE));
        assert_eq!(runs[1], Run::new("y ", Marks::BOLD));
        assert_eq!(runs[2], Run::new("z", Marks::BOLD.union(Marks::ITALIC)));
        assert_eq!(runs[4].href.as_deref(), Some("/u"));
    }

    #[test]
    fn test_nested_lists_roundtrip() {
        let html = "<ul><li>a<ol><li>b</li></ol></li><li>c</li></ul>";
        let blocks = blocks_from_rich_text(&RichText::from_html(html));
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].kind, BlockKind::ListItem(ListKind::Ordered));
        assert_eq!(blocks[1].indent, 1);

        let rebuilt = rich_text_from_blocks(&blocks);
        assert_eq!(rebuilt.to_html(), html);
    }

    #[test]
    fn test_layout_roundtrip() {
        let html = r#"<div style="text-align: center;">a</div><p style="margin-left: 40px;">b</p>"#;
        let blocks = blocks_from_rich_text(&RichText::from_html(html));
        assert_eq!(blocks[0].align, Some(Align::Center));
        assert_eq!(blocks[1].indent, 1);
        assert_eq!(rich_text_from_blocks(&blocks).to_html(), html);
    }
}
