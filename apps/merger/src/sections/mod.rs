// Section handling: heading-keyed extraction per document, then cross-document merge.
// Maps are insertion-ordered so the merged output lists headings in first-seen order.

use indexmap::IndexMap;

pub mod extract;
pub mod merge;

pub use extract::{absorb, extract_sections};
pub use merge::merge_sections;

/// Heading → content blocks contributed by every document that has that heading.
pub type SectionMap = IndexMap<String, Vec<String>>;

/// Heading → the single text block written to the merged document.
pub type FinalSections = IndexMap<String, String>;
