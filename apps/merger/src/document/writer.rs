//! Document writer: renders final sections into a new `.docx` package.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use quick_xml::escape::escape;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::document::models::{Document, Paragraph};
use crate::document::styles::FALLBACK_STYLE_NAME;
use crate::errors::MergeError;
use crate::sections::FinalSections;

/// Style given to every section heading in the merged output.
pub const HEADING_STYLE: &str = "Heading 1";

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Turns the heading → content mapping into output paragraphs.
///
/// Each heading becomes a `Heading 1` paragraph followed by one body paragraph per
/// line of its content. Lines are trimmed; blank lines are dropped.
pub fn render_sections(sections: &FinalSections) -> Document {
    let mut paragraphs = Vec::new();
    for (heading, content) in sections {
        paragraphs.push(Paragraph::new(heading.as_str(), HEADING_STYLE));
        paragraphs.extend(
            content
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| Paragraph::new(line, FALLBACK_STYLE_NAME)),
        );
    }
    Document::new(paragraphs)
}

/// Renders `sections` and writes them to `path`, replacing any existing file.
pub fn write_sections(sections: &FinalSections, path: &Path) -> Result<(), MergeError> {
    write_document(&render_sections(sections), path)?;
    info!("Wrote {} sections to {}", sections.len(), path.display());
    Ok(())
}

/// Serializes `document` as a minimal `.docx` package at `path`.
pub fn write_document(document: &Document, path: &Path) -> Result<(), MergeError> {
    let file = File::create(path).map_err(|e| MergeError::io(path, e))?;
    let mut zip = ZipWriter::new(file);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", PACKAGE_RELS_XML.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
        ("word/document.xml", document_xml(document)),
        ("word/styles.xml", styles_xml(document)),
    ];

    for (name, xml) in parts {
        zip.start_file(name, SimpleFileOptions::default())
            .map_err(|source| MergeError::Zip {
                path: path.to_path_buf(),
                source,
            })?;
        zip.write_all(xml.as_bytes())
            .map_err(|e| MergeError::io(path, e))?;
    }

    zip.finish().map_err(|source| MergeError::Zip {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn document_xml(document: &Document) -> String {
    let mut body = String::new();
    for paragraph in &document.paragraphs {
        body.push_str("<w:p>");
        if paragraph.style_name != FALLBACK_STYLE_NAME {
            body.push_str(&format!(
                r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
                escape(&style_id(&paragraph.style_name))
            ));
        }
        if !paragraph.text.is_empty() {
            body.push_str("<w:r>");
            body.push_str(&run_content_xml(&paragraph.text));
            body.push_str("</w:r>");
        }
        body.push_str("</w:p>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{WORD_NS}"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
}

// Text inside a run: tabs and newlines have their own elements.
fn run_content_xml(text: &str) -> String {
    let mut xml = String::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        for (j, piece) in line.split('\t').enumerate() {
            if j > 0 {
                xml.push_str("<w:tab/>");
            }
            if !piece.is_empty() {
                xml.push_str(&format!(
                    r#"<w:t xml:space="preserve">{}</w:t>"#,
                    escape(piece)
                ));
            }
        }
    }
    xml
}

/// Declares `Normal` as the default style plus every other style the document uses.
fn styles_xml(document: &Document) -> String {
    let mut used: Vec<&str> = Vec::new();
    for paragraph in &document.paragraphs {
        let name = paragraph.style_name.as_str();
        if name != FALLBACK_STYLE_NAME && !used.contains(&name) {
            used.push(name);
        }
    }

    let mut styles = format!(
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="{FALLBACK_STYLE_NAME}"/><w:qFormat/></w:style>"#
    );
    for name in used {
        let (internal, run_props) = match heading_level(name) {
            Some(level) => (
                format!("heading {level}"),
                format!(
                    r#"<w:pPr><w:keepNext/><w:outlineLvl w:val="{}"/></w:pPr><w:rPr><w:b/><w:sz w:val="{}"/></w:rPr>"#,
                    level - 1,
                    heading_size(level)
                ),
            ),
            None => (name.to_string(), String::new()),
        };
        styles.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="{}"><w:name w:val="{}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>{}</w:style>"#,
            escape(&style_id(name)),
            escape(&internal),
            run_props
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{WORD_NS}">{styles}</w:styles>"#
    )
}

fn style_id(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn heading_level(name: &str) -> Option<u8> {
    name.strip_prefix("Heading ")
        .and_then(|level| level.parse::<u8>().ok())
        .filter(|level| (1..=9).contains(level))
}

// Half-points: 14pt for level 1, shrinking to the body size.
fn heading_size(level: u8) -> u32 {
    28u32.saturating_sub(2 * u32::from(level - 1)).max(22)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::reader::load_document;

    fn sections(pairs: &[(&str, &str)]) -> FinalSections {
        pairs
            .iter()
            .map(|(h, c)| (h.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn test_render_splits_lines_and_skips_empty_content() {
        let doc = render_sections(&sections(&[("A", "line1\nline2"), ("B", "")]));
        assert_eq!(
            doc.paragraphs,
            vec![
                Paragraph::new("A", "Heading 1"),
                Paragraph::new("line1", "Normal"),
                Paragraph::new("line2", "Normal"),
                Paragraph::new("B", "Heading 1"),
            ]
        );
    }

    #[test]
    fn test_render_drops_blank_lines_and_trims() {
        let doc = render_sections(&sections(&[("Skills", "  Rust  \n\n   \nSQL")]));
        let texts: Vec<&str> = doc.paragraphs.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["Skills", "Rust", "SQL"]);
    }

    #[test]
    fn test_written_document_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let input = sections(&[
            ("Experience", "Built <fast> & safe tools.\nLed\tteam"),
            ("Education", "BS CS."),
        ]);

        write_sections(&input, &path).unwrap();
        let doc = load_document(&path).unwrap();

        assert_eq!(
            doc.paragraphs,
            vec![
                Paragraph::new("Experience", "Heading 1"),
                Paragraph::new("Built <fast> & safe tools.", "Normal"),
                Paragraph::new("Led\tteam", "Normal"),
                Paragraph::new("Education", "Heading 1"),
                Paragraph::new("BS CS.", "Normal"),
            ]
        );
    }

    #[test]
    fn test_existing_output_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        std::fs::write(&path, b"stale bytes").unwrap();

        write_sections(&sections(&[("Summary", "Fresh.")]), &path).unwrap();
        let doc = load_document(&path).unwrap();
        assert_eq!(doc.paragraphs[1].text, "Fresh.");
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.docx");
        let err = write_sections(&sections(&[("A", "b")]), &path).unwrap_err();
        assert!(matches!(err, MergeError::Io { .. }));
    }

    #[test]
    fn test_run_content_xml_escapes_and_splits() {
        assert_eq!(
            run_content_xml("a<b\tc\nd"),
            r#"<w:t xml:space="preserve">a&lt;b</w:t><w:tab/><w:t xml:space="preserve">c</w:t><w:br/><w:t xml:space="preserve">d</w:t>"#
        );
    }

    #[test]
    fn test_heading_level_parsing() {
        assert_eq!(heading_level("Heading 1"), Some(1));
        assert_eq!(heading_level("Heading 9"), Some(9));
        assert_eq!(heading_level("Heading 10"), None);
        assert_eq!(heading_level("Title"), None);
    }
}
