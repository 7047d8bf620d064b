// Document format handling: the WordprocessingML (.docx) subset the merger reads and writes.
// Reading yields body paragraphs with resolved style names; writing emits a minimal package.

pub mod models;
pub mod reader;
pub mod styles;
pub mod writer;

pub use models::{Document, Paragraph};
pub use reader::load_document;
pub use writer::write_sections;
