//! folio - export a saved notebook from the command line

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use folio::config::EditorConfig;
use folio::export::{
    Artifact, Delivery, DirectoryDelivery, ExportFormat, Exporter, MarkdownExporter,
    TextExporter, print_document,
};
use folio::model::{Document, DocumentSnapshot};

/// Filename of the print document written for `-f pdf`.
const PRINT_FILENAME: &str = "notebook_export.html";

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Export a paged notebook", long_about = None)]
#[command(after_help = "EXAMPLES:
    folio notes.json                Export notes.json as plain text
    folio notes.json -f md -o out   Export Markdown into out/
    folio notes.json -f pdf         Write a print-ready HTML document
    folio -i notes.json             Show notebook summary")]
struct Cli {
    /// Notebook snapshot (JSON: {\"pages\": [{\"title\": ..., \"body\": ...}]})
    #[arg(value_name = "NOTEBOOK")]
    input: PathBuf,

    /// Export format: txt, md or pdf
    #[arg(short, long, default_value = "txt")]
    format: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Editor configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show notebook summary without exporting
    #[arg(short, long)]
    info: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "error" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = if cli.info {
        show_info(&cli.input)
    } else {
        export(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load(path: &Path) -> folio::Result<Document> {
    let json = fs::read_to_string(path)?;
    let snapshot: DocumentSnapshot = serde_json::from_str(&json)?;
    Ok(Document::from_snapshot(&snapshot))
}

fn show_info(path: &Path) -> folio::Result<()> {
    let document = load(path)?;

    println!("File: {}", path.display());
    println!("Pages: {}", document.page_count());
    println!("Sets: {}", document.set_count());
    println!("Non-blank pages: {}", document.non_blank_pages().count());
    for (index, page) in document.non_blank_pages() {
        let title = page.plain_title();
        if title.is_empty() {
            println!("  {:>3}. (untitled)", index + 1);
        } else {
            println!("  {:>3}. {}", index + 1, title);
        }
    }

    Ok(())
}

fn export(cli: &Cli) -> folio::Result<()> {
    let config = match &cli.config {
        Some(path) => EditorConfig::from_json(&fs::read_to_string(path)?)?,
        None => EditorConfig::default(),
    };
    let format: ExportFormat = cli.format.parse()?;
    let document = load(&cli.input)?;

    let artifact = match format {
        ExportFormat::Text => {
            TextExporter::with_filename(&config.export.text_filename).export(&document)
        }
        ExportFormat::Markdown => {
            MarkdownExporter::with_filename(&config.export.markdown_filename).export(&document)
        }
        ExportFormat::Pdf => print_document(&document, &config.export.print_title)
            .map(|html| Artifact::text(PRINT_FILENAME, "text/html", html)),
        ExportFormat::Images => return Err(folio::Error::RasterizerUnavailable),
    };

    let Some(artifact) = artifact else {
        eprintln!("Nothing to export. Please add some content first.");
        return Ok(());
    };

    let mut delivery = DirectoryDelivery::new(cli.output.clone());
    delivery.deliver(artifact)?;

    if !cli.quiet {
        for path in delivery.written() {
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
