//! The export menu: flush, filter, serialize, deliver and report.

use crate::Error;
use crate::export::{
    Artifact, ExportFormat, Exporter, ImageExportOptions, ImageExportSummary, MarkdownExporter,
    TextExporter, export_images, print_document,
};

use super::{NoticeLevel, PagedDocumentEditor};

const NOTHING_TO_EXPORT: &str = "Nothing to export. Please add some content first.";

/// What an export request ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Every page was blank; no file was produced.
    NothingToExport,
    Delivered { filename: String },
    /// The print document went to the print host.
    Printed,
    Images(ImageExportSummary),
    /// The export could not run or deliver; a notice says why.
    Failed,
}

impl PagedDocumentEditor {
    /// Export the whole notebook.
    pub fn export(&mut self, format: ExportFormat) -> ExportOutcome {
        self.flush();

        let pages = self.document.non_blank_pages().count();
        if pages == 0 {
            tracing::debug!(%format, "nothing to export");
            self.notify(NoticeLevel::Info, NOTHING_TO_EXPORT);
            return ExportOutcome::NothingToExport;
        }
        tracing::debug!(%format, pages, "exporting notebook");

        match format {
            ExportFormat::Text => {
                let exporter = TextExporter::with_filename(&self.config.export.text_filename);
                let artifact = exporter.export(&self.document);
                self.deliver(artifact)
            }
            ExportFormat::Markdown => {
                let exporter =
                    MarkdownExporter::with_filename(&self.config.export.markdown_filename);
                let artifact = exporter.export(&self.document);
                self.deliver(artifact)
            }
            ExportFormat::Pdf => self.print(),
            ExportFormat::Images => self.export_page_images(pages),
        }
    }

    /// Export menu selection by `data-format` value.
    ///
    /// Returns `None` for values the menu does not offer.
    pub fn export_menu_select(&mut self, data_format: &str) -> Option<ExportOutcome> {
        match data_format.parse::<ExportFormat>() {
            Ok(format) => Some(self.export(format)),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring export menu selection");
                None
            }
        }
    }

    fn deliver(&mut self, artifact: Option<Artifact>) -> ExportOutcome {
        let Some(artifact) = artifact else {
            self.notify(NoticeLevel::Info, NOTHING_TO_EXPORT);
            return ExportOutcome::NothingToExport;
        };
        let filename = artifact.filename.clone();
        match self.delivery.deliver(artifact) {
            Ok(()) => ExportOutcome::Delivered { filename },
            Err(err) => {
                tracing::error!(%filename, error = %err, "failed to deliver export");
                self.notify(NoticeLevel::Error, format!("Failed to save {filename}."));
                ExportOutcome::Failed
            }
        }
    }

    fn print(&mut self) -> ExportOutcome {
        let Some(html) = print_document(&self.document, &self.config.export.print_title) else {
            self.notify(NoticeLevel::Info, NOTHING_TO_EXPORT);
            return ExportOutcome::NothingToExport;
        };
        let Some(host) = self.print_host.as_mut() else {
            tracing::error!(error = %Error::PrintUnavailable, "PDF export failed");
            self.notify(
                NoticeLevel::Error,
                "Could not open print dialog. Please check browser settings or pop-up blockers.",
            );
            return ExportOutcome::Failed;
        };
        match host.print(&html) {
            Ok(()) => ExportOutcome::Printed,
            Err(err) => {
                tracing::error!(error = %err, "print host failed");
                self.notify(
                    NoticeLevel::Error,
                    "Failed to initiate PDF export via print dialog.",
                );
                ExportOutcome::Failed
            }
        }
    }

    fn export_page_images(&mut self, pages: usize) -> ExportOutcome {
        let Some(rasterizer) = self.rasterizer.as_mut() else {
            tracing::error!("no rasterizer for image export");
            self.notify(NoticeLevel::Error, "Image export library not loaded.");
            return ExportOutcome::Failed;
        };

        self.notices.push(super::Notice {
            level: NoticeLevel::Info,
            message: format!("Starting image export for {pages} pages..."),
        });

        let options = ImageExportOptions {
            frame: &self.config.export.frame,
            scale: self.config.export.raster_scale,
            filename_prefix: &self.config.export.image_prefix,
        };
        let summary = export_images(
            &self.document,
            &options,
            rasterizer.as_mut(),
            self.delivery.as_mut(),
        );

        let Some(summary) = summary else {
            self.notify(NoticeLevel::Info, NOTHING_TO_EXPORT);
            return ExportOutcome::NothingToExport;
        };
        for index in &summary.skipped {
            self.notify(
                NoticeLevel::Error,
                format!("Failed to render page {}.", index + 1),
            );
        }
        self.notify(NoticeLevel::Info, "Image export process finished.");
        ExportOutcome::Images(summary)
    }
}
