//! Per-page image export.
//!
//! Each non-blank page is rebuilt as standalone markup inside an off-screen
//! frame that mirrors the live page's dimensions and typography, then handed
//! to a [`Rasterizer`]. Pages are rasterized strictly one at a time: the
//! rasterizer is borrowed mutably for each call and the next page does not
//! start until the previous one returned.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::model::{Document, Page};

use super::html_synth::synthesize_html;
use super::{Artifact, Delivery, data_url};

/// Typography of one region (title or body) of the page frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionStyle {
    pub padding: String,
    pub font_size: String,
    pub line_height: String,
    pub min_height: Option<String>,
}

impl Default for RegionStyle {
    fn default() -> Self {
        Self {
            padding: "16px 24px".to_string(),
            font_size: "16px".to_string(),
            line_height: "1.5".to_string(),
            min_height: None,
        }
    }
}

/// Dimensions and typography of the off-screen page used for rasterizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFrame {
    pub width: String,
    pub height: String,
    pub font_family: String,
    pub title: RegionStyle,
    pub body: RegionStyle,
    /// `border-top` of the divider between title and body.
    pub divider: String,
    pub divider_margin: String,
}

impl Default for PageFrame {
    fn default() -> Self {
        Self {
            width: "420px".to_string(),
            height: "594px".to_string(),
            font_family: "'Tiempos Text', serif".to_string(),
            title: RegionStyle {
                padding: "20px 24px 8px".to_string(),
                font_size: "22px".to_string(),
                line_height: "1.3".to_string(),
                min_height: Some("32px".to_string()),
            },
            body: RegionStyle::default(),
            divider: "1px solid #ccc".to_string(),
            divider_margin: "0 24px".to_string(),
        }
    }
}

impl PageFrame {
    /// Standalone markup for one page, styled like the live page.
    pub fn page_markup(&self, page: &Page) -> String {
        let title = &self.title;
        let body = &self.body;
        let min_height = title
            .min_height
            .as_deref()
            .map(|h| format!(" min-height: {h};"))
            .unwrap_or_default();

        format!(
            concat!(
                "<div style=\"width: {width}; height: {height}; display: flex; flex-direction: column; ",
                "font-family: {font}; background-color: white; border: 1px solid #ccc;\">",
                "<div style=\"padding: {tp}; font-size: {tfs}; line-height: {tlh}; flex-shrink: 0;{tmh} overflow-y: auto;\">{title_html}</div>",
                "<hr style=\"border: none; border-top: {divider}; margin: {dm}; flex-shrink: 0;\">",
                "<div style=\"padding: {bp}; font-size: {bfs}; line-height: {blh}; flex-grow: 1; overflow-y: auto;\">{body_html}</div>",
                "</div>"
            ),
            width = self.width,
            height = self.height,
            font = self.font_family,
            tp = title.padding,
            tfs = title.font_size,
            tlh = title.line_height,
            tmh = min_height,
            title_html = synthesize_html(&page.title),
            divider = self.divider,
            dm = self.divider_margin,
            bp = body.padding,
            bfs = body.font_size,
            blh = body.line_height,
            body_html = synthesize_html(&page.body),
        )
    }
}

/// Renders page markup to PNG bytes.
pub trait Rasterizer {
    fn rasterize(&mut self, markup: &str, frame: &PageFrame, scale: f32) -> Result<Vec<u8>>;
}

/// Which pages an image export produced and which it had to skip.
///
/// Indices are 0-based positions in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageExportSummary {
    pub produced: Vec<usize>,
    pub skipped: Vec<usize>,
    pub filenames: Vec<String>,
}

impl ImageExportSummary {
    /// True if every non-blank page became an image.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Settings for [`export_images`].
#[derive(Debug, Clone)]
pub struct ImageExportOptions<'a> {
    pub frame: &'a PageFrame,
    pub scale: f32,
    pub filename_prefix: &'a str,
}

/// Rasterize and deliver every non-blank page.
///
/// A page that fails to rasterize or deliver is logged and skipped; the
/// export carries on with the remaining pages. Returns `None` when every
/// page is blank.
pub fn export_images(
    document: &Document,
    options: &ImageExportOptions<'_>,
    rasterizer: &mut dyn Rasterizer,
    delivery: &mut dyn Delivery,
) -> Option<ImageExportSummary> {
    let pages: Vec<(usize, &Page)> = document.non_blank_pages().collect();
    if pages.is_empty() {
        return None;
    }

    tracing::info!(pages = pages.len(), "starting image export");
    let mut summary = ImageExportSummary::default();

    for (index, page) in pages {
        let number = index + 1;
        let markup = options.frame.page_markup(page);

        let png = match rasterizer.rasterize(&markup, options.frame, options.scale) {
            Ok(png) => png,
            Err(err) => {
                tracing::warn!(page = number, error = %err, "failed to render page to image");
                summary.skipped.push(index);
                continue;
            }
        };

        let filename = format!("{}{}.png", options.filename_prefix, number);
        let artifact = Artifact::data_url(&filename, "image/png", data_url("image/png", &png));
        match delivery.deliver(artifact) {
            Ok(()) => {
                summary.produced.push(index);
                summary.filenames.push(filename);
            }
            Err(err) => {
                tracing::warn!(page = number, error = %err, "failed to deliver page image");
                summary.skipped.push(index);
            }
        }
    }

    tracing::info!(
        produced = summary.produced.len(),
        skipped = summary.skipped.len(),
        "image export finished"
    );
    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::export::MemoryDelivery;

    /// Fails on markup containing "boom", otherwise returns the markup bytes.
    struct FakeRasterizer {
        calls: usize,
    }

    impl Rasterizer for FakeRasterizer {
        fn rasterize(&mut self, markup: &str, _frame: &PageFrame, scale: f32) -> Result<Vec<u8>> {
            self.calls += 1;
            assert_eq!(scale, 2.0);
            if markup.contains("boom") {
                return Err(Error::Rasterize {
                    page: self.calls,
                    reason: "canvas tainted".to_string(),
                });
            }
            Ok(vec![0x89, b'P', b'N', b'G'])
        }
    }

    fn options(frame: &PageFrame) -> ImageExportOptions<'_> {
        ImageExportOptions {
            frame,
            scale: 2.0,
            filename_prefix: "notebook_page_",
        }
    }

    #[test]
    fn test_page_markup_uses_frame() {
        let frame = PageFrame::default();
        let markup = frame.page_markup(&Page::from_html("T", "<p>B</p>"));
        assert!(markup.contains("width: 420px; height: 594px"));
        assert!(markup.contains("min-height: 32px;"));
        assert!(markup.contains(">T</div>"));
        assert!(markup.contains("<p>B</p>"));
    }

    #[test]
    fn test_failures_are_skipped() {
        let doc = Document::from_pages(vec![
            Page::from_html("one", ""),
            Page::new(),
            Page::from_html("boom", ""),
            Page::from_html("four", ""),
        ]);
        let frame = PageFrame::default();
        let mut rasterizer = FakeRasterizer { calls: 0 };
        let mut delivery = MemoryDelivery::new();

        let summary =
            export_images(&doc, &options(&frame), &mut rasterizer, &mut delivery).unwrap();

        assert_eq!(rasterizer.calls, 3);
        assert_eq!(summary.produced, vec![0, 3]);
        assert_eq!(summary.skipped, vec![2]);
        assert!(!summary.is_complete());
        assert_eq!(
            delivery.filenames(),
            vec!["notebook_page_1.png", "notebook_page_4.png"]
        );
    }

    #[test]
    fn test_nothing_to_export() {
        let frame = PageFrame::default();
        let mut rasterizer = FakeRasterizer { calls: 0 };
        let mut delivery = MemoryDelivery::new();
        assert!(
            export_images(&Document::new(), &options(&frame), &mut rasterizer, &mut delivery)
                .is_none()
        );
        assert_eq!(rasterizer.calls, 0);
    }
}
