//! Document adapter.
//!
//! Produces `{n}pages` for PDF, `{n}paragraphs` for Word documents,
//! `{n}slides` for presentations and `{n}lines` for plain text. Any other
//! document yields the generic `document` token.

use super::ProbeError;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Token for documents that are recognized but not counted.
pub const GENERIC_TOKEN: &str = "document";

const WORD_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const SLIDES_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    Word,
    Slides,
    Text,
}

/// Describes a document. The extension decides the reader; `format` stands in
/// for it when the file has none.
pub fn describe(path: &Path, format: &str) -> Result<String, ProbeError> {
    match detect_kind(path, format) {
        Some(DocumentKind::Pdf) => count_pdf_pages(path).map(|n| format!("{}pages", n)),
        Some(DocumentKind::Word) => count_paragraphs(path).map(|n| format!("{}paragraphs", n)),
        Some(DocumentKind::Slides) => count_slides(path).map(|n| format!("{}slides", n)),
        Some(DocumentKind::Text) => count_lines(path).map(|n| format!("{}lines", n)),
        None => Ok(GENERIC_TOKEN.to_string()),
    }
}

fn detect_kind(path: &Path, format: &str) -> Option<DocumentKind> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());

    match ext.as_deref().unwrap_or(format) {
        "pdf" => Some(DocumentKind::Pdf),
        "docx" => Some(DocumentKind::Word),
        "pptx" => Some(DocumentKind::Slides),
        "txt" => Some(DocumentKind::Text),
        "office" => sniff_office(path),
        _ => None,
    }
}

/// Tells Word documents from presentations for extension-less ZIP containers.
fn sniff_office(path: &Path) -> Option<DocumentKind> {
    if let Ok(Some(kind)) = infer::get_from_path(path) {
        match kind.mime_type() {
            WORD_MIME => return Some(DocumentKind::Word),
            SLIDES_MIME => return Some(DocumentKind::Slides),
            _ => {}
        }
    }

    // infer only looks at the first few kilobytes; fall back to the directory.
    let archive = ZipArchive::new(File::open(path).ok()?).ok()?;
    if archive
        .file_names()
        .any(|name| name == "word/document.xml")
    {
        return Some(DocumentKind::Word);
    }
    if archive.file_names().any(is_slide_part) {
        return Some(DocumentKind::Slides);
    }
    None
}

fn count_pdf_pages(path: &Path) -> Result<usize, ProbeError> {
    let document = lopdf::Document::load(path)?;
    Ok(document.get_pages().len())
}

fn count_paragraphs(path: &Path) -> Result<usize, ProbeError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    Ok(["<w:p>", "<w:p ", "<w:p/>"]
        .iter()
        .map(|tag| xml.matches(tag).count())
        .sum())
}

fn count_slides(path: &Path) -> Result<usize, ProbeError> {
    let archive = ZipArchive::new(File::open(path)?)?;
    Ok(archive.file_names().filter(|name| is_slide_part(name)).count())
}

fn is_slide_part(name: &str) -> bool {
    name.starts_with("ppt/slides/slide") && name.ends_with(".xml")
}

fn count_lines(path: &Path) -> Result<usize, ProbeError> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).lines().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).expect("Failed to create zip");
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("Failed to start zip entry");
            writer
                .write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
        writer.finish().expect("Failed to finish zip");
    }

    #[test]
    fn test_text_lines() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("a.txt");
        fs::write(&path, "one\ntwo\nthree\n").expect("Failed to write file");

        assert_eq!(describe(&path, "txt").unwrap(), "3lines");
    }

    #[test]
    fn test_text_without_trailing_newline() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("b.txt");
        fs::write(&path, "one\ntwo").expect("Failed to write file");

        assert_eq!(describe(&path, "txt").unwrap(), "2lines");
    }

    #[test]
    fn test_docx_paragraphs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("letter.docx");
        write_zip(
            &path,
            &[(
                "word/document.xml",
                "<w:document><w:body><w:p><w:r><w:t>Hi</w:t></w:r></w:p>\
                 <w:p w:rsidR=\"1\"><w:pPr/></w:p><w:p/></w:body></w:document>",
            )],
        );

        assert_eq!(describe(&path, "office").unwrap(), "3paragraphs");
    }

    #[test]
    fn test_pptx_slides() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("deck.pptx");
        write_zip(
            &path,
            &[
                ("ppt/presentation.xml", "<p:presentation/>"),
                ("ppt/slides/slide1.xml", "<p:sld/>"),
                ("ppt/slides/slide2.xml", "<p:sld/>"),
                ("ppt/slides/_rels/slide1.xml.rels", "<Relationships/>"),
            ],
        );

        assert_eq!(describe(&path, "office").unwrap(), "2slides");
    }

    #[test]
    fn test_office_without_extension_is_sniffed() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("deck");
        write_zip(&path, &[("ppt/slides/slide1.xml", "<p:sld/>")]);

        assert_eq!(describe(&path, "office").unwrap(), "1slides");
    }

    #[test]
    fn test_unhandled_document_is_generic() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("bundle.zip");
        write_zip(&path, &[("readme.md", "# hi")]);

        assert_eq!(describe(&path, "office").unwrap(), GENERIC_TOKEN);

        let legacy = temp_dir.path().join("old.doc");
        fs::write(&legacy, b"\xD0\xCF\x11\xE0").expect("Failed to write file");
        assert_eq!(describe(&legacy, "doc").unwrap(), GENERIC_TOKEN);
    }

    fn write_pdf(path: &Path, pages: usize) {
        use lopdf::{Document, Object, dictionary};

        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                let page_id = document.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(595),
                        Object::Integer(842),
                    ],
                });
                Object::Reference(page_id)
            })
            .collect();

        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        document.save(path).expect("Failed to write pdf");
    }

    #[test]
    fn test_pdf_page_count() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("report.pdf");
        write_pdf(&path, 3);

        assert_eq!(describe(&path, "pdf").unwrap(), "3pages");
    }

    #[test]
    fn test_broken_pdf_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("broken.pdf");
        fs::write(&path, b"%PDF-1.4\nnot really").expect("Failed to write file");

        assert!(describe(&path, "pdf").is_err());
    }
}
