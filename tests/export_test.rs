//! Export tests.
//!
//! Exercises the exporters on documents and the editor's export menu end to
//! end, including blank-page filtering and delivery into a directory.

use std::fs;

use folio::config::EditorConfig;
use folio::editor::{EditorCollaborators, ExportOutcome, PagedDocumentEditor, SurfaceId};
use folio::export::{
    Delivery, DirectoryDelivery, ExportFormat, Exporter, MemoryDelivery, PAGE_BREAK,
    TextExporter, export_markdown, export_text, print_document,
};
use folio::model::{Document, DocumentSnapshot, Page};

// ============================================================================
// Document exporters
// ============================================================================

#[test]
fn test_markdown_heading_and_paragraph() {
    let doc = Document::from_pages(vec![Page::from_html("", "<h1>Hi</h1><p>World</p>")]);
    let md = export_markdown(&doc).unwrap();

    assert_eq!(md, "# Hi\n\nWorld");
    assert!(!md.contains("<h1>"));
    assert!(!md.contains("<p>"));
}

#[test]
fn test_markdown_pages_and_titles() {
    let doc = Document::from_pages(vec![
        Page::from_html("Groceries", "<ul><li>milk</li><li><b>eggs</b></li></ul>"),
        Page::new(),
        Page::from_html("Ideas", "<blockquote>think</blockquote>"),
        Page::new(),
    ]);
    let md = export_markdown(&doc).unwrap();

    assert_eq!(
        md,
        "# Groceries\n\n- milk\n- **eggs**\n\n---\n\n# Ideas\n\n> think"
    );
}

#[test]
fn test_whitespace_only_pages_are_blank() {
    let doc = Document::from_pages(vec![
        Page::from_html("   ", "<p>&nbsp; </p>"),
        Page::from_html(" ", "<div><br></div>"),
    ]);

    assert_eq!(doc.non_blank_pages().count(), 0);
    assert_eq!(export_text(&doc), None);
    assert_eq!(export_markdown(&doc), None);
    assert_eq!(print_document(&doc, "Notebook Export"), None);
}

#[test]
fn test_blank_pages_keep_numbering() {
    let doc = Document::from_pages(vec![
        Page::from_html("One", ""),
        Page::new(),
        Page::new(),
        Page::from_html("", "<p>four</p>"),
    ]);

    let text = export_text(&doc).unwrap();
    assert_eq!(text, "Title: One\n---\n\n\n=== Page 4 ===\n\n---\nfour");

    let html = print_document(&doc, "Notebook Export").unwrap();
    assert_eq!(html.matches(PAGE_BREAK).count(), 1);
    assert_eq!(html.matches("class=\"page-print\"").count(), 2);
}

#[test]
fn test_snapshot_round_trip() {
    let json = r#"{"pages": [{"title": "<b>T</b>", "body": "<p>x</p>"}]}"#;
    let snapshot: DocumentSnapshot = serde_json::from_str(json).unwrap();
    let doc = Document::from_snapshot(&snapshot);

    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.page(0).unwrap().plain_title(), "T");
    assert!(doc.page(1).unwrap().is_blank());

    let again = Document::from_snapshot(&doc.snapshot());
    assert_eq!(again.snapshot(), doc.snapshot());
}

// ============================================================================
// Export menu
// ============================================================================

#[test]
fn test_empty_notebook_produces_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = PagedDocumentEditor::open(
        EditorConfig::default(),
        EditorCollaborators::default().with_delivery(DirectoryDelivery::new(dir.path())),
    );

    for value in ["txt", "md", "pdf", "img"] {
        assert_eq!(
            editor.export_menu_select(value),
            Some(ExportOutcome::NothingToExport)
        );
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_export_menu_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = PagedDocumentEditor::open(
        EditorConfig::default(),
        EditorCollaborators::default().with_delivery(DirectoryDelivery::new(dir.path())),
    );
    editor.type_text("Hi");
    editor.focus(SurfaceId::body(0));
    editor.type_text("World");

    assert_eq!(
        editor.export(ExportFormat::Text),
        ExportOutcome::Delivered {
            filename: "notebook_export.txt".to_string()
        }
    );
    assert_eq!(
        editor.export(ExportFormat::Markdown),
        ExportOutcome::Delivered {
            filename: "notebook_export.md".to_string()
        }
    );

    let text = fs::read_to_string(dir.path().join("notebook_export.txt")).unwrap();
    assert_eq!(text, "Title: Hi\n---\nWorld");
    let md = fs::read_to_string(dir.path().join("notebook_export.md")).unwrap();
    assert_eq!(md, "# Hi\n\nWorld");
}

#[test]
fn test_configured_filenames() {
    let config =
        EditorConfig::from_json(r#"{"export": {"markdown_filename": "journal.md"}}"#).unwrap();
    let mut editor = PagedDocumentEditor::open(config, EditorCollaborators::default());
    editor.type_text("x");

    assert_eq!(
        editor.export(ExportFormat::Markdown),
        ExportOutcome::Delivered {
            filename: "journal.md".to_string()
        }
    );
}

#[test]
fn test_memory_delivery_collects_text() {
    let doc = Document::from_pages(vec![Page::from_html("T", "<p>b</p>")]);
    let mut delivery = MemoryDelivery::new();
    let artifact = TextExporter::new().export(&doc).unwrap();
    delivery.deliver(artifact).unwrap();

    assert_eq!(
        delivery.text("notebook_export.txt").as_deref(),
        Some("Title: T\n---\nb")
    );
}
