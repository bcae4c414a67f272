//! Pure Markdown generation from [`RichText`](crate::model::RichText).
//!
//! - [`escape`]: string escaping and fence sizing
//! - [`render`]: tree → Markdown
//!
//! The rendering follows a fixed substitution table: headings become `#`
//! lines, paragraphs are separated by blank lines, lists use `-` or
//! numbered items, rules become `---`, line breaks end in two spaces, bold
//! and italic become `**`/`*`. Underline and strikethrough are dropped.
//! Centered and right-aligned blocks are wrapped in `::: center` /
//! `::: right` fenced divs.

mod escape;
mod render;

pub use escape::{calculate_fence_length, calculate_inline_code_ticks, escape_markdown};
pub use render::{RenderContext, render_inline_markdown, render_markdown};
