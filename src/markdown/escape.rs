//! Markdown escaping helpers.

/// Whether `c` must be escaped given its position.
fn needs_escape(c: char, at_line_start: bool, next: Option<char>) -> bool {
    match c {
        '\\' | '*' | '_' | '[' | ']' | '`' | '|' | '<' | '>' => true,
        '#' => at_line_start,
        // Would open a bullet list item.
        '-' | '+' => at_line_start && next.is_none_or(|n| n == ' '),
        '!' => next == Some('['),
        _ => false,
    }
}

/// Escape characters with special meaning in Markdown.
///
/// Line-start-only markers (`#`, bullet `-`/`+`) are escaped only when they
/// begin a line.
///
/// # Examples
///
/// ```
/// use folio::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
/// assert_eq!(escape_markdown("a - b"), "a - b");
/// assert_eq!(escape_markdown("- b"), "\\- b");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    let mut chars = text.chars().peekable();
    let mut at_line_start = true;

    while let Some(c) = chars.next() {
        if needs_escape(c, at_line_start, chars.peek().copied()) {
            result.push('\\');
        }
        result.push(c);
        at_line_start = c == '\n';
    }

    result
}

/// Longest run of `ch` in `content`.
fn longest_run(content: &str, ch: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;
    for c in content.chars() {
        if c == ch {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    max_run
}

/// Smallest fence (at least 3 characters) that can wrap `content`.
///
/// ```
/// use folio::markdown::calculate_fence_length;
///
/// assert_eq!(calculate_fence_length("let x = 1;", '`'), 3);
/// assert_eq!(calculate_fence_length("```rust\ncode\n```", '`'), 4);
/// ```
pub fn calculate_fence_length(content: &str, fence_char: char) -> usize {
    longest_run(content, fence_char).max(2) + 1
}

/// Smallest backtick count that can delimit inline code.
pub fn calculate_inline_code_ticks(content: &str) -> usize {
    longest_run(content, '`') + 1
}
