//! Section extraction: splits one document's paragraphs into heading-keyed blocks.

use crate::document::{Document, Paragraph};
use crate::sections::SectionMap;

/// Style-name prefix that marks a heading paragraph. Case-sensitive.
pub const HEADING_STYLE_PREFIX: &str = "Heading";

/// A paragraph is a heading iff its style name starts with `Heading`.
pub fn is_heading(paragraph: &Paragraph) -> bool {
    paragraph.style_name.starts_with(HEADING_STYLE_PREFIX)
}

/// Groups the paragraphs of `document` under their preceding heading.
///
/// Rules:
/// - Content before the first heading has no section and is dropped.
/// - Each body paragraph contributes its trimmed text, blank ones included; a section's
///   block is those lines joined by `\n` and trimmed.
/// - A heading with no body paragraph before the next heading contributes nothing.
/// - A heading whose text trims to empty absorbs the content after it, which is dropped.
/// - A heading repeated within the document yields one block per occurrence.
pub fn extract_sections(document: &Document) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut heading: Option<String> = None;
    let mut lines: Vec<&str> = Vec::new();

    for paragraph in &document.paragraphs {
        if is_heading(paragraph) {
            flush(&mut sections, heading.take(), &lines);
            heading = Some(paragraph.text.trim().to_string());
            lines.clear();
        } else {
            lines.push(paragraph.text.trim());
        }
    }
    flush(&mut sections, heading, &lines);

    sections
}

fn flush(sections: &mut SectionMap, heading: Option<String>, lines: &[&str]) {
    match heading {
        Some(heading) if !heading.is_empty() && !lines.is_empty() => {
            sections
                .entry(heading)
                .or_default()
                .push(lines.join("\n").trim().to_string());
        }
        _ => {}
    }
}

/// Folds one document's sections into the accumulated map, extending each heading's
/// block list rather than replacing it.
pub fn absorb(mut acc: SectionMap, sections: SectionMap) -> SectionMap {
    for (heading, blocks) in sections {
        acc.entry(heading).or_default().extend(blocks);
    }
    acc
}
