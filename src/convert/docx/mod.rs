//! Built-in DOCX collaborators.
//!
//! [`DocxPackager`] writes a compiled node sequence as a minimal
//! WordprocessingML package and [`DocxExtractor`] turns a package back into
//! HTML for the Markdown renderer. Both work on in-memory bytes.

mod reader;
mod writer;

pub use reader::DocxExtractor;
pub use writer::DocxPackager;

/// Main document part inside the package.
const DOCUMENT_PART: &str = "word/document.xml";

/// Numbering definitions part.
const NUMBERING_PART: &str = "word/numbering.xml";

/// Relationships of the main document part.
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Numbering instance used for bullet items.
const BULLET_NUM_ID: u32 = 1;

/// Numbering instance shared by every numbered item.
const DECIMAL_NUM_ID: u32 = 2;
