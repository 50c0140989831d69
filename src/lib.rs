//! # docmd
//!
//! Bidirectional Markdown and DOCX conversion for Rust.
//!
//! Markdown is compiled into a sequence of block-level document nodes that a
//! packager turns into a DOCX file. Rich documents travel the other way as
//! HTML, which is parsed into a tree and rendered back to Markdown.
//!
//! ## Quick Start
//!
//! ```
//! use docmd::{html_to_markdown, markdown_to_nodes, DocumentNode};
//!
//! let markdown = html_to_markdown("<h1>Title</h1><ul><li>one</li><li>two</li></ul>");
//! assert_eq!(markdown, "# Title\n\n- one\n- two");
//!
//! let doc = markdown_to_nodes("# Title\n\nSome **bold** text");
//! assert_eq!(doc.nodes()[0], DocumentNode::heading(1, "Title"));
//! ```
//!
//! ## Features
//!
//! - **Format detection**: heuristic Markdown vs. rich-document scoring
//! - **Document model**: headings, rules, quotes, list items, code, styled runs
//! - **Tree-based rendering**: nested lists and tables survive HTML to Markdown
//! - **DOCX packaging**: built-in packager and extractor (feature `docx`)
//! - **Cleanup pipeline**: whitespace and entity normalization presets

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    strip_banner, ConversionInput, ConversionMode, ConversionOutput, ConversionState,
    ConvertOptions, Converter, DocumentPackager, Extraction, Fallback, HtmlExtractor, RequestId,
    Session, TargetFormat,
};
#[cfg(feature = "docx")]
pub use convert::{DocxExtractor, DocxPackager};
pub use detect::{
    detect, detect_format_from_bytes, detect_format_from_path, DetectedFormat, FormatDetector,
    HeuristicDetector, SourceFormat,
};
pub use error::{Error, Result};
pub use model::{BoldMarker, CompileWarning, CompiledDocument, DocumentNode, NodeKind, StyledRun};
pub use parser::MarkdownCompiler;
pub use render::{CleanupOptions, CleanupPreset, JsonFormat, RenderOptions};

use std::path::Path;

/// Render HTML as Markdown with default options.
///
/// The result is trimmed.
///
/// # Example
///
/// ```
/// use docmd::html_to_markdown;
///
/// assert_eq!(html_to_markdown("<p>Hello <strong>world</strong></p>"), "Hello **world**");
/// ```
pub fn html_to_markdown(html: &str) -> String {
    html_to_markdown_with_options(html, &RenderOptions::default())
}

/// Render HTML as Markdown with custom options.
///
/// # Example
///
/// ```
/// use docmd::{html_to_markdown_with_options, RenderOptions};
///
/// let options = RenderOptions::new().with_list_marker('*');
/// assert_eq!(html_to_markdown_with_options("<ul><li>a</li></ul>", &options), "* a");
/// ```
pub fn html_to_markdown_with_options(html: &str, options: &RenderOptions) -> String {
    render::to_markdown(html, options).trim().to_string()
}

/// Compile Markdown into document nodes.
pub fn markdown_to_nodes(markdown: &str) -> CompiledDocument {
    parser::compile(markdown)
}

/// Compile Markdown and render the nodes as an HTML fragment.
///
/// # Example
///
/// ```
/// use docmd::markdown_to_html;
///
/// assert_eq!(markdown_to_html("## Hi"), "<h2>Hi</h2>\n");
/// ```
pub fn markdown_to_html(markdown: &str) -> String {
    render::to_preview_html(markdown_to_nodes(markdown).nodes())
}

/// Compile Markdown into a JSON node dump.
pub fn markdown_to_json(markdown: &str, format: JsonFormat) -> Result<String> {
    render::to_json(&markdown_to_nodes(markdown), format)
}

/// Compile Markdown and package it as a DOCX file.
///
/// # Example
///
/// ```
/// let bytes = docmd::markdown_to_docx("# Report\n\n- first\n- second")?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok::<(), docmd::Error>(())
/// ```
#[cfg(feature = "docx")]
pub fn markdown_to_docx(markdown: &str) -> Result<Vec<u8>> {
    DocxPackager::new().pack(markdown_to_nodes(markdown).nodes())
}

/// Extract a DOCX file and render it as Markdown.
#[cfg(feature = "docx")]
pub fn docx_to_markdown(bytes: &[u8]) -> Result<String> {
    let extraction = DocxExtractor::new().extract(bytes)?;
    for message in &extraction.messages {
        log::warn!("docx: {}", message);
    }
    Ok(html_to_markdown(&extraction.html))
}

/// Convert a file, choosing the direction from its extension.
///
/// Markdown files become DOCX documents; DOCX and HTML files become Markdown.
///
/// # Example
///
/// ```no_run
/// use docmd::convert_file;
///
/// let output = convert_file("notes.md")?;
/// std::fs::write(output.suggested_file_name(), output.payload())?;
/// # Ok::<(), docmd::Error>(())
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConversionOutput> {
    Converter::new().convert_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_markdown_trims() {
        assert_eq!(html_to_markdown("\n<p>x</p>\n\n"), "x");
        assert_eq!(html_to_markdown(""), "");
    }

    #[test]
    fn test_markdown_to_nodes() {
        let doc = markdown_to_nodes("# A\n\n---\n\n1. one");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.count(NodeKind::Rule), 1);
    }

    #[test]
    fn test_markdown_to_json_compact() {
        let json = markdown_to_json("---", JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"nodes":[{"type":"rule"}]}"#);
    }

    #[cfg(feature = "docx")]
    #[test]
    fn test_docx_round_trip() {
        let bytes = markdown_to_docx("# Title\n\n- a\n- b\n\nplain **bold**").unwrap();
        let markdown = docx_to_markdown(&bytes).unwrap();
        assert_eq!(markdown, "# Title\n\n- a\n- b\n\nplain **bold**");
    }

    #[test]
    fn test_convert_file_rejects_extension() {
        let err = convert_file("image.png").unwrap_err();
        assert!(matches!(err, Error::UnsupportedExtension(ext) if ext == "png"));
    }
}
