//! Paragraph style resolution.
//!
//! Paragraphs reference styles by id (`w:pStyle w:val="Heading1"`); the name a reader
//! reports ("Heading 1") lives in `word/styles.xml`. Word stores built-in names in
//! lowercase ("heading 1") and presents them capitalized, so names are mapped to that
//! UI form here.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::MergeError;

/// Name reported when neither the paragraph nor the document names a default style.
pub const FALLBACK_STYLE_NAME: &str = "Normal";

/// Paragraph styles declared by a document, keyed by style id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    names: HashMap<String, String>,
    default_name: String,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            names: HashMap::new(),
            default_name: FALLBACK_STYLE_NAME.to_string(),
        }
    }
}

impl StyleSheet {
    /// Resolves a paragraph's style name from its optional `w:pStyle` id.
    /// Missing or unknown ids resolve to the default paragraph style.
    pub fn resolve(&self, style_id: Option<&str>) -> &str {
        style_id
            .and_then(|id| self.names.get(id))
            .map(String::as_str)
            .unwrap_or(&self.default_name)
    }

    /// Parses the paragraph styles out of a `word/styles.xml` part.
    pub fn parse(xml: &str, path: &Path) -> Result<Self, MergeError> {
        let mut reader = Reader::from_str(xml);
        let mut sheet = StyleSheet::default();

        // (id, name, is_default) of the paragraph style being read
        let mut current: Option<(String, Option<String>, bool)> = None;

        loop {
            let event = reader.read_event().map_err(|source| MergeError::Xml {
                path: path.to_path_buf(),
                source,
            })?;

            match event {
                Event::Start(ref e) if e.local_name().as_ref() == b"style" => {
                    let style_type = attr_value(e, b"type", path)?;
                    let is_paragraph = style_type.as_deref().map_or(true, |t| t == "paragraph");
                    current = match (is_paragraph, attr_value(e, b"styleId", path)?) {
                        (true, Some(id)) => {
                            let is_default = attr_value(e, b"default", path)?
                                .is_some_and(|v| is_on(&v));
                            Some((id, None, is_default))
                        }
                        _ => None,
                    };
                }
                Event::Start(ref e) | Event::Empty(ref e)
                    if e.local_name().as_ref() == b"name" =>
                {
                    if let Some((_, name, _)) = current.as_mut() {
                        *name = attr_value(e, b"val", path)?;
                    }
                }
                Event::End(ref e) if e.local_name().as_ref() == b"style" => {
                    if let Some((id, name, is_default)) = current.take() {
                        let name = name.map(|n| ui_style_name(&n)).unwrap_or_else(|| id.clone());
                        if is_default {
                            sheet.default_name = name.clone();
                        }
                        sheet.names.insert(id, name);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(sheet)
    }
}

/// Maps Word's lowercase built-in style names to the capitalized names users see.
/// Custom names pass through unchanged.
pub fn ui_style_name(internal: &str) -> String {
    if let Some(level) = internal.strip_prefix("heading ") {
        if level.len() == 1 && level.chars().all(|c| ('1'..='9').contains(&c)) {
            return format!("Heading {level}");
        }
    }
    match internal {
        "caption" => "Caption".to_string(),
        "footer" => "Footer".to_string(),
        "header" => "Header".to_string(),
        "title" => "Title".to_string(),
        "subtitle" => "Subtitle".to_string(),
        other => other.to_string(),
    }
}

/// Returns the unescaped value of the attribute whose local name is `local`,
/// ignoring its namespace prefix.
pub(crate) fn attr_value(
    element: &BytesStart<'_>,
    local: &[u8],
    path: &Path,
) -> Result<Option<String>, MergeError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|source| MergeError::XmlAttr {
            path: path.to_path_buf(),
            source,
        })?;
        if attr.key.local_name().as_ref() == local {
            let value = attr.unescape_value().map_err(|source| MergeError::Xml {
                path: path.to_path_buf(),
                source,
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

// OOXML on/off values.
fn is_on(value: &str) -> bool {
    matches!(value, "1" | "true" | "on")
}
