//! Document reader: loads body paragraphs from a `.docx` package.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::document::models::{Document, Paragraph};
use crate::document::styles::{attr_value, StyleSheet};
use crate::errors::MergeError;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// Opens a `.docx` file and returns its body paragraphs with resolved style names.
///
/// Only paragraphs that are direct children of the body are returned; table cells,
/// headers and footers are not. Paragraph text joins the paragraph's runs (including
/// hyperlink runs), with `w:tab` as `\t` and line breaks as `\n`.
pub fn load_document(path: &Path) -> Result<Document, MergeError> {
    let file = File::open(path).map_err(|e| MergeError::io(path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|source| MergeError::Zip {
        path: path.to_path_buf(),
        source,
    })?;

    let body_xml = read_part(&mut archive, DOCUMENT_PART, path)?.ok_or_else(|| {
        MergeError::InvalidDocument {
            path: path.to_path_buf(),
            reason: format!("missing {DOCUMENT_PART}"),
        }
    })?;

    let styles = match read_part(&mut archive, STYLES_PART, path)? {
        Some(xml) => StyleSheet::parse(&xml, path)?,
        None => StyleSheet::default(),
    };

    let document = parse_body(&body_xml, &styles, path)?;
    debug!(
        "Loaded {} paragraphs from {}",
        document.paragraphs.len(),
        path.display()
    );
    Ok(document)
}

fn read_part(
    archive: &mut ZipArchive<File>,
    name: &str,
    path: &Path,
) -> Result<Option<String>, MergeError> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(source) => {
            return Err(MergeError::Zip {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| MergeError::io(path, e))?;
    Ok(Some(xml))
}

/// Paragraph being accumulated, positioned by indices into the element stack.
struct OpenParagraph {
    /// Stack index of the `w:p` element.
    depth: usize,
    /// Stack index of the run currently contributing text, if any.
    run_depth: Option<usize>,
    style_id: Option<String>,
    text: String,
}

impl OpenParagraph {
    fn finish(self, styles: &StyleSheet) -> Paragraph {
        Paragraph {
            style_name: styles.resolve(self.style_id.as_deref()).to_string(),
            text: self.text,
        }
    }
}

/// Extracts body paragraphs from the XML of `word/document.xml`.
pub fn parse_body(xml: &str, styles: &StyleSheet, path: &Path) -> Result<Document, MergeError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut open: Option<OpenParagraph> = None;
    let mut paragraphs = Vec::new();

    loop {
        let event = reader.read_event().map_err(|source| MergeError::Xml {
            path: path.to_path_buf(),
            source,
        })?;

        match event {
            Event::Start(ref e) => {
                open_element(e, &stack, &mut open, path)?;
                stack.push(e.local_name().as_ref().to_vec());
            }
            Event::Empty(ref e) => {
                open_element(e, &stack, &mut open, path)?;
                // A self-closing <w:p/> opens and closes in one event
                if open.as_ref().is_some_and(|p| p.depth == stack.len()) {
                    if let Some(p) = open.take() {
                        paragraphs.push(p.finish(styles));
                    }
                }
            }
            Event::End(_) => {
                let closing = stack.len().saturating_sub(1);
                stack.pop();
                let closes_paragraph = open.as_ref().is_some_and(|p| p.depth == closing);
                if closes_paragraph {
                    if let Some(p) = open.take() {
                        paragraphs.push(p.finish(styles));
                    }
                } else if let Some(p) = open.as_mut() {
                    if p.run_depth == Some(closing) {
                        p.run_depth = None;
                    }
                }
            }
            Event::Text(ref e) => {
                if let Some(p) = open.as_mut() {
                    if in_run_text(&stack, p) {
                        let text = e.unescape().map_err(|source| MergeError::Xml {
                            path: path.to_path_buf(),
                            source,
                        })?;
                        p.text.push_str(&text);
                    }
                }
            }
            Event::CData(e) => {
                if let Some(p) = open.as_mut() {
                    if in_run_text(&stack, p) {
                        p.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Document::new(paragraphs))
}

/// Handles an element opening (`Start` or `Empty`) before it is pushed onto `stack`.
fn open_element(
    e: &BytesStart<'_>,
    stack: &[Vec<u8>],
    open: &mut Option<OpenParagraph>,
    path: &Path,
) -> Result<(), MergeError> {
    let name = e.local_name();
    let name = name.as_ref();
    let depth = stack.len();
    let parent = stack.last().map(Vec::as_slice);

    if open.is_none() {
        if name == b"p" && parent == Some(b"body".as_slice()) {
            *open = Some(OpenParagraph {
                depth,
                run_depth: None,
                style_id: None,
                text: String::new(),
            });
        }
        return Ok(());
    }
    let Some(p) = open.as_mut() else {
        return Ok(());
    };

    match name {
        b"pStyle" if depth == p.depth + 2 && parent == Some(b"pPr".as_slice()) => {
            p.style_id = attr_value(e, b"val", path)?;
        }
        b"r" => {
            let direct = depth == p.depth + 1;
            let in_hyperlink =
                depth == p.depth + 2 && parent == Some(b"hyperlink".as_slice());
            if direct || in_hyperlink {
                p.run_depth = Some(depth);
            }
        }
        b"tab" | b"ptab" if p.run_depth == Some(depth - 1) => p.text.push('\t'),
        b"cr" if p.run_depth == Some(depth - 1) => p.text.push('\n'),
        b"br" if p.run_depth == Some(depth - 1) => {
            // Page and column breaks carry no text
            let kind = attr_value(e, b"type", path)?;
            if kind.as_deref().map_or(true, |k| k == "textWrapping") {
                p.text.push('\n');
            }
        }
        b"noBreakHyphen" if p.run_depth == Some(depth - 1) => p.text.push('-'),
        _ => {}
    }

    Ok(())
}

// True when the innermost element is a `w:t` directly inside the contributing run.
fn in_run_text(stack: &[Vec<u8>], p: &OpenParagraph) -> bool {
    match (stack.last(), p.run_depth) {
        (Some(top), Some(run)) => top.as_slice() == b"t" && stack.len() == run + 2,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<w:body>{inner}<w:sectPr/></w:body>
</w:document>"#
        )
    }

    fn styles() -> StyleSheet {
        let xml = r#"<w:styles xmlns:w="x">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
</w:styles>"#;
        StyleSheet::parse(xml, Path::new("styles.xml")).unwrap()
    }

    fn parse(inner: &str) -> Vec<Paragraph> {
        parse_body(&body(inner), &styles(), Path::new("test.docx"))
            .unwrap()
            .paragraphs
    }

    #[test]
    fn test_runs_are_concatenated_with_styles_resolved() {
        let paragraphs = parse(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Exper</w:t></w:r><w:r><w:t>ience</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Built X </w:t></w:r><w:r><w:t>&amp; Y.</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            paragraphs,
            vec![
                Paragraph::new("Experience", "Heading 1"),
                Paragraph::new("Built X & Y.", "Normal"),
            ]
        );
    }

    #[test]
    fn test_tabs_breaks_and_hyperlinks() {
        let paragraphs = parse(
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t><w:br w:type="page"/></w:r><w:hyperlink r:id="rId9"><w:r><w:t>link</w:t></w:r></w:hyperlink></w:p>"#,
        );
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text, "a\tb\nclink");
    }

    #[test]
    fn test_empty_paragraph_is_kept() {
        let paragraphs = parse(r#"<w:p/><w:p><w:pPr/></w:p>"#);
        assert_eq!(
            paragraphs,
            vec![Paragraph::new("", "Normal"), Paragraph::new("", "Normal")]
        );
    }

    #[test]
    fn test_table_paragraphs_are_not_body_paragraphs() {
        let paragraphs = parse(
            r#"<w:p><w:r><w:t>before</w:t></w:r></w:p>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:p><w:r><w:t>after</w:t></w:r></w:p>"#,
        );
        let texts: Vec<&str> = paragraphs.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["before", "after"]);
    }

    #[test]
    fn test_run_properties_do_not_leak_into_text() {
        let paragraphs = parse(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>bold</w:t></w:r><w:ins><w:r><w:t>tracked</w:t></w:r></w:ins></w:p>"#,
        );
        assert_eq!(paragraphs[0].text, "bold");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("absent.docx")).unwrap_err();
        assert!(matches!(err, MergeError::Io { .. }));
    }

    #[test]
    fn test_non_zip_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();
        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, MergeError::Zip { .. }), "got {err:?}");
    }

    #[test]
    fn test_zip_without_document_part_is_invalid() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("readme.txt", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"hi").unwrap();
        zip.finish().unwrap();

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, MergeError::InvalidDocument { .. }), "got {err:?}");
    }
}
