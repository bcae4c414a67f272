//! Pages, page sets and the notebook document.

use serde::{Deserialize, Serialize};

use super::RichText;

/// Pages shown side by side in one spread.
pub const PAGES_PER_SET: usize = 2;

/// One editable page: a title and a body.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub title: RichText,
    pub body: RichText,
}

impl Page {
    /// Create a page with empty title and body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a page from title and body markup.
    pub fn from_html(title: &str, body: &str) -> Self {
        Self {
            title: RichText::from_html(title),
            body: RichText::from_html(body),
        }
    }

    /// Plain title text (may be empty).
    pub fn plain_title(&self) -> String {
        self.title.plain_text()
    }

    /// Plain body text (may be empty).
    pub fn plain_body(&self) -> String {
        self.body.plain_text()
    }

    /// A page is blank when both its title and body are blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.title.is_blank() && self.body.is_blank()
    }
}

/// The notebook: an ordered, even-length list of pages.
#[derive(Debug, Clone)]
pub struct Document {
    pages: Vec<Page>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A fresh notebook with one empty page set.
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new(), Page::new()],
        }
    }

    /// Build a document from existing pages, padding to a whole set.
    ///
    /// An empty list yields the same shape as [`Document::new`].
    pub fn from_pages(mut pages: Vec<Page>) -> Self {
        if pages.is_empty() {
            return Self::new();
        }
        while pages.len() % PAGES_PER_SET != 0 {
            pages.push(Page::new());
        }
        Self { pages }
    }

    /// Number of pages (always even).
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of page sets.
    pub fn set_count(&self) -> usize {
        self.pages.len() / PAGES_PER_SET
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Page indices belonging to a set.
    pub fn set_indices(set: usize) -> [usize; PAGES_PER_SET] {
        [set * PAGES_PER_SET, set * PAGES_PER_SET + 1]
    }

    /// Append a trailing set of two empty pages and return its index.
    pub fn append_set(&mut self) -> usize {
        self.pages.push(Page::new());
        self.pages.push(Page::new());
        self.set_count() - 1
    }

    /// True if any page of the set has a non-blank title or body.
    pub fn set_has_content(&self, set: usize) -> bool {
        Self::set_indices(set)
            .iter()
            .filter_map(|&i| self.pages.get(i))
            .any(|p| !p.is_blank())
    }

    /// Non-blank pages with their document indices.
    pub fn non_blank_pages(&self) -> impl Iterator<Item = (usize, &Page)> {
        self.pages.iter().enumerate().filter(|(_, p)| !p.is_blank())
    }

    /// Markup snapshot of every page.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            pages: self
                .pages
                .iter()
                .map(|p| PageSnapshot {
                    title: p.title.to_html(),
                    body: p.body.to_html(),
                })
                .collect(),
        }
    }

    /// Rebuild a document from a markup snapshot.
    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> Self {
        Self::from_pages(
            snapshot
                .pages
                .iter()
                .map(|p| Page::from_html(&p.title, &p.body))
                .collect(),
        )
    }
}

/// Serializable markup form of a [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub pages: Vec<PageSnapshot>,
}

/// Serializable markup form of a [`Page`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "content")]
    pub body: String,
}
