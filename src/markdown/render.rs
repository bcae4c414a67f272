//! [`RichText`] → Markdown rendering.
//!
//! Pure string generation; the export layer decides where the output goes.

use crate::model::{Align, Marks, NodeId, RichText, Role};

use super::escape::{calculate_fence_length, calculate_inline_code_ticks, escape_markdown};

/// Tracks list context for numbering.
#[derive(Debug, Clone)]
struct ListContext {
    is_ordered: bool,
    counter: usize,
}

/// Whether block structure is kept or flattened onto one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Blocks,
    SingleLine,
}

/// Fenced-div name used for an aligned block.
fn align_fence(align: Option<Align>) -> Option<&'static str> {
    match align {
        Some(Align::Center) => Some("center"),
        Some(Align::Right) => Some("right"),
        _ => None,
    }
}

/// Context for rendering (pure string accumulation, no I/O).
pub struct RenderContext<'a> {
    content: &'a RichText,
    layout: Layout,
    output: String,
    line_prefix: String,
    list_stack: Vec<ListContext>,
    at_line_start: bool,
    has_line_content: bool,
    pending_newline: bool,
    last_block_role: Option<Role>,
}

impl<'a> RenderContext<'a> {
    /// Create a context that keeps block structure.
    pub fn new(content: &'a RichText) -> Self {
        Self::with_layout(content, Layout::Blocks)
    }

    /// Create a context that flattens everything onto a single line.
    pub fn single_line(content: &'a RichText) -> Self {
        Self::with_layout(content, Layout::SingleLine)
    }

    fn with_layout(content: &'a RichText, layout: Layout) -> Self {
        Self {
            content,
            layout,
            output: String::new(),
            line_prefix: String::new(),
            list_stack: Vec::new(),
            at_line_start: true,
            has_line_content: false,
            pending_newline: false,
            last_block_role: None,
        }
    }

    /// Render, consuming the context. The result is trimmed.
    pub fn render(mut self) -> String {
        for child_id in self.content.children(NodeId::ROOT) {
            self.walk_node(child_id);
        }
        collapse_blank_lines(self.output.trim())
    }

    fn ensure_line_started(&mut self) {
        if self.at_line_start {
            self.output.push_str(&self.line_prefix);
            self.at_line_start = false;
        }
    }

    fn write_newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
        self.has_line_content = false;
    }

    /// Two trailing spaces, then a newline.
    fn write_hard_break(&mut self) {
        if !self.at_line_start {
            self.output.push_str("  ");
        }
        self.write_newline();
    }

    fn flush_pending_blank_line(&mut self) {
        if self.pending_newline {
            if !self.at_line_start {
                self.write_newline();
            }
            self.write_newline();
            self.pending_newline = false;
        }
    }

    /// Start a block separated from the previous one by a blank line.
    fn start_block(&mut self) {
        self.flush_pending_blank_line();
        if !self.at_line_start {
            self.write_newline();
        }
        self.ensure_line_started();
    }

    fn end_block(&mut self, role: Role) {
        self.pending_newline = true;
        self.last_block_role = Some(role);
    }

    /// Start a line-level block (an editable surface's `<div>` line).
    fn start_line(&mut self) {
        self.flush_pending_blank_line();
        if !self.at_line_start {
            self.write_newline();
        }
    }

    fn end_line(&mut self) {
        if !self.at_line_start {
            self.write_newline();
        }
    }

    fn open_fence(&mut self, name: &str) {
        self.start_block();
        self.output.push_str("::: ");
        self.output.push_str(name);
        self.write_newline();
    }

    fn close_fence(&mut self, role: Role) {
        self.pending_newline = false;
        if !self.at_line_start {
            self.write_newline();
        }
        self.ensure_line_started();
        self.output.push_str(":::");
        self.end_block(role);
    }

    /// Separator between flattened blocks in single-line layout.
    fn separate(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with(' ') {
            self.output.push(' ');
        }
    }

    fn walk_node(&mut self, id: NodeId) {
        let Some(node) = self.content.node(id) else {
            return;
        };
        let role = node.role;

        if self.layout == Layout::SingleLine && (role.is_block() || role == Role::Break) {
            self.separate();
            self.walk_children(id);
            self.separate();
            return;
        }

        let fence = if role.is_block() {
            align_fence(node.align)
        } else {
            None
        };
        if let Some(name) = fence {
            self.open_fence(name);
        }

        match role {
            Role::Text => {
                if !node.text.is_empty() {
                    let text = self.content.text(node.text);
                    self.write_text(text);
                }
            }

            Role::Paragraph => {
                self.start_block();
                self.walk_children(id);
                self.end_block(role);
            }

            Role::Heading(level) => {
                self.start_block();
                for _ in 0..level {
                    self.output.push('#');
                }
                self.output.push(' ');
                self.walk_children(id);
                self.end_block(role);
            }

            Role::OrderedList | Role::UnorderedList => {
                if self.last_block_role == Some(role) && self.pending_newline {
                    // Keep adjacent lists of the same kind from merging.
                    self.start_block();
                    self.output.push_str("<!-- -->");
                    self.end_block(Role::Rule);
                }
                self.start_line();
                self.list_stack.push(ListContext {
                    is_ordered: role == Role::OrderedList,
                    counter: 0,
                });
                self.walk_children(id);
                self.list_stack.pop();
                self.end_block(role);
            }

            Role::ListItem => {
                if !self.at_line_start {
                    self.write_newline();
                }
                self.ensure_line_started();

                let bullet = match self.list_stack.last_mut() {
                    Some(list) => {
                        list.counter += 1;
                        if list.is_ordered {
                            format!("{}. ", list.counter)
                        } else {
                            "- ".to_string()
                        }
                    }
                    None => "- ".to_string(),
                };
                self.output.push_str(&bullet);

                let old_prefix = self.line_prefix.clone();
                self.line_prefix.push_str(&" ".repeat(bullet.len()));
                self.walk_children(id);
                self.line_prefix = old_prefix;
                self.pending_newline = false;
            }

            Role::BlockQuote => {
                self.start_line();
                let old_prefix = self.line_prefix.clone();
                self.line_prefix.push_str("> ");
                self.walk_children(id);
                self.line_prefix = old_prefix;
                self.end_block(role);
            }

            Role::CodeBlock => {
                self.start_block();
                let text = self.collect_text_verbatim(id);
                let fence_len = calculate_fence_length(&text, '`');
                let fence: String = std::iter::repeat_n('`', fence_len).collect();
                self.output.push_str(&fence);
                self.write_newline();
                for line in text.trim_end_matches('\n').lines() {
                    self.ensure_line_started();
                    self.output.push_str(line);
                    self.write_newline();
                }
                self.ensure_line_started();
                self.output.push_str(&fence);
                self.end_block(role);
            }

            Role::Container => {
                self.start_line();
                self.walk_children(id);
                self.end_line();
            }

            Role::Link => {
                let href = self.content.href(id).unwrap_or("").to_string();
                if href.is_empty() {
                    self.walk_children(id);
                } else {
                    self.ensure_line_started();
                    self.output.push('[');
                    self.walk_children(id);
                    self.output.push_str(&format!("]({})", href));
                    self.has_line_content = true;
                }
            }

            Role::Inline => self.walk_inline(id, node.marks),

            Role::Break => {
                if self.layout == Layout::Blocks {
                    self.write_hard_break();
                }
            }

            Role::Rule => {
                self.start_block();
                self.output.push_str("---");
                self.end_block(role);
            }

            Role::Root => self.walk_children(id),
        }

        if fence.is_some() {
            self.close_fence(role);
        }
    }

    fn walk_inline(&mut self, id: NodeId, marks: Marks) {
        let text = self.collect_text(id);
        if text.trim().is_empty() {
            self.walk_children(id);
            return;
        }

        if marks.contains(Marks::CODE) {
            self.ensure_line_started();
            let tick_count = calculate_inline_code_ticks(&text);
            let ticks: String = std::iter::repeat_n('`', tick_count).collect();
            let spacer = if text.starts_with('`') || text.ends_with('`') {
                " "
            } else {
                ""
            };
            self.output
                .push_str(&format!("{ticks}{spacer}{text}{spacer}{ticks}"));
            self.has_line_content = true;
            return;
        }

        // Underline and strikethrough have no standard Markdown form.
        let bold = marks.contains(Marks::BOLD);
        let italic = marks.contains(Marks::ITALIC);

        self.ensure_line_started();
        if bold {
            self.output.push_str("**");
        }
        if italic {
            self.output.push('*');
        }
        self.walk_children(id);
        if italic {
            self.output.push('*');
        }
        if bold {
            self.output.push_str("**");
        }
    }

    fn walk_children(&mut self, id: NodeId) {
        for child_id in self.content.children(id) {
            self.walk_node(child_id);
        }
    }

    fn write_text(&mut self, text: &str) {
        let has_leading = text.starts_with(char::is_whitespace);
        let has_trailing = text.ends_with(char::is_whitespace);

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            if self.has_line_content && !self.output.ends_with(' ') {
                self.output.push(' ');
            }
            return;
        }

        self.ensure_line_started();
        if has_leading && self.has_line_content && !self.output.ends_with(' ') {
            self.output.push(' ');
        }
        self.output.push_str(&escape_markdown(&words.join(" ")));
        self.has_line_content = true;
        if has_trailing {
            self.output.push(' ');
        }
    }

    fn collect_text(&self, id: NodeId) -> String {
        let raw = self.collect_text_verbatim(id);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text_verbatim(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text_recursive(id, &mut result);
        result
    }

    fn collect_text_recursive(&self, id: NodeId, result: &mut String) {
        let Some(node) = self.content.node(id) else {
            return;
        };
        match node.role {
            Role::Text => result.push_str(self.content.text(node.text)),
            Role::Break => result.push('\n'),
            _ => {}
        }
        for child_id in self.content.children(id) {
            self.collect_text_recursive(child_id, result);
        }
    }
}

/// Collapse runs of three or more newlines into one blank line.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(c);
    }
    out
}

/// Render content as Markdown blocks.
pub fn render_markdown(content: &RichText) -> String {
    RenderContext::new(content).render()
}

/// Render content as a single line of inline Markdown (used for titles).
pub fn render_inline_markdown(content: &RichText) -> String {
    let line = RenderContext::single_line(content).render();
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(html: &str) -> String {
        render_markdown(&RichText::from_html(html))
    }

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(md("<h1>Hi</h1><p>World</p>"), "# Hi\n\nWorld");
        assert_eq!(md("<h3>Deep</h3>"), "### Deep");
    }

    #[test]
    fn test_lists() {
        assert_eq!(md("<ul><li>one</li><li>two</li></ul>"), "- one\n- two");
        assert_eq!(md("<ol><li>a</li><li>b</li></ol>"), "1. a\n2. b");
    }

    #[test]
    fn test_emphasis_and_underline() {
        assert_eq!(md("<p><b>bold</b> and <i>it</i></p>"), "**bold** and *it*");
        assert_eq!(md("<p><u>under</u>line</p>"), "underline");
        assert_eq!(md("<p><strong><em>both</em></strong></p>"), "***both***");
    }

    #[test]
    fn test_line_breaks_and_rules() {
        assert_eq!(md("<p>a<br>b</p>"), "a  \nb");
        assert_eq!(md("<p>a</p><hr><p>b</p>"), "a\n\n---\n\nb");
    }

    #[test]
    fn test_div_lines() {
        assert_eq!(md("<div>one</div><div>two</div>"), "one\ntwo");
        assert_eq!(md("first<div>second</div>"), "first\nsecond");
    }

    #[test]
    fn test_aligned_blocks_are_fenced() {
        assert_eq!(
            md(r#"<div style="text-align: center;">mid</div>"#),
            "::: center\nmid\n:::"
        );
        assert_eq!(
            md(r#"<p style="text-align: right">r</p><p>x</p>"#),
            "::: right\nr\n:::\n\nx"
        );
    }

    #[test]
    fn test_quote_code_and_links() {
        assert_eq!(md("<blockquote>wise</blockquote>"), "> wise");
        assert_eq!(md("<pre>let x = 1;\n</pre>"), "```\nlet x = 1;\n```");
        assert_eq!(
            md(r#"<p><a href="https://example.com">site</a></p>"#),
            "[site](https://example.com)"
        );
        assert_eq!(md("<p>use <code>cargo</code></p>"), "use `cargo`");
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(md("<p>2 * 3 = [six]</p>"), "2 \\* 3 = \\[six\\]");
    }

    #[test]
    fn test_single_line_title() {
        let title = RichText::from_html("<div><b>Day</b> one</div><div>notes</div>");
        assert_eq!(render_inline_markdown(&title), "**Day** one notes");
    }
}
