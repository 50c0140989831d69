//! Input format detection.
//!
//! Free-form text is classified as Markdown or as HTML extracted from a rich
//! document. Raw bytes and file paths are sniffed into a [`SourceFormat`].

use crate::error::{Error, Result};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// Classification of free-form input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectedFormat {
    /// Markdown source
    Markdown,
    /// Rich-document content, usually HTML extracted from a DOCX file
    RichDoc,
    /// Nothing to classify (empty input)
    Unknown,
}

impl std::fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectedFormat::Markdown => write!(f, "Markdown"),
            DetectedFormat::RichDoc => write!(f, "DOC"),
            DetectedFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// Concrete format of a conversion source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Markdown text
    Markdown,
    /// HTML markup
    Html,
    /// Binary DOCX package
    Docx,
    /// Plain text without Markdown features or markup
    Text,
}

impl SourceFormat {
    /// The detected class this source belongs to.
    pub fn class(self) -> DetectedFormat {
        match self {
            SourceFormat::Markdown => DetectedFormat::Markdown,
            SourceFormat::Html | SourceFormat::Docx | SourceFormat::Text => {
                DetectedFormat::RichDoc
            }
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Markdown => write!(f, "Markdown"),
            SourceFormat::Html => write!(f, "HTML"),
            SourceFormat::Docx => write!(f, "DOCX"),
            SourceFormat::Text => write!(f, "plain text"),
        }
    }
}

/// A pluggable text classifier.
pub trait FormatDetector: Send + Sync {
    /// Classify the given text.
    fn detect(&self, text: &str) -> DetectedFormat;
}

/// Markdown feature patterns, checked in order.
const MARKDOWN_FEATURES: &[&str] = &[
    r"(?m)^#+\s+.+$",            // ATX heading
    r"(?m)^[*\-+]\s+.+$",        // unordered list item
    r"(?m)^\d+\.\s+.+$",         // ordered list item
    r"(?m)^>\s+.+$",             // blockquote
    r"(?ms)^`{3}.+`{3}",         // fenced code
    r"\[.+\]\(.+\)",             // link or image
    r"\*\*.+\*\*",               // bold
    r"__.+__",                   // bold, underscore form
    r"\*.+\*",                   // italic
    r"(?m)^(?:\|[^|\n]+)+\|$",   // pipe table row
];

fn feature_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        MARKDOWN_FEATURES
            .iter()
            .map(|p| Regex::new(p).expect("static pattern"))
            .collect()
    })
}

/// Heuristic detector scoring Markdown feature patterns.
///
/// Text that starts with `<` and contains a closing or self-closing tag is
/// HTML. Otherwise the number of matching Markdown features is counted; at
/// least `min_score` matches classify as Markdown, anything else falls back to
/// [`DetectedFormat::RichDoc`].
#[derive(Debug, Clone)]
pub struct HeuristicDetector {
    min_score: usize,
}

impl HeuristicDetector {
    /// Create a detector requiring a single feature match.
    pub fn new() -> Self {
        Self { min_score: 1 }
    }

    /// Require at least `min_score` distinct features (minimum 1).
    pub fn with_min_score(mut self, min_score: usize) -> Self {
        self.min_score = min_score.max(1);
        self
    }

    /// Number of distinct Markdown features found in `text`.
    pub fn score(&self, text: &str) -> usize {
        feature_patterns()
            .iter()
            .filter(|re| re.is_match(text))
            .count()
    }
}

impl Default for HeuristicDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatDetector for HeuristicDetector {
    fn detect(&self, text: &str) -> DetectedFormat {
        let input = text.trim();
        if input.is_empty() {
            return DetectedFormat::Unknown;
        }

        if is_html_markup(input) {
            return DetectedFormat::RichDoc;
        }

        let score = self.score(input);
        log::debug!("markdown feature score: {}", score);
        if score >= self.min_score {
            DetectedFormat::Markdown
        } else {
            DetectedFormat::RichDoc
        }
    }
}

/// Classify free-form text with the default heuristics.
///
/// # Example
/// ```
/// use docmd::detect::{detect, DetectedFormat};
///
/// assert_eq!(detect("# Title"), DetectedFormat::Markdown);
/// assert_eq!(detect("<p>Hi</p>"), DetectedFormat::RichDoc);
/// assert_eq!(detect("   "), DetectedFormat::Unknown);
/// ```
pub fn detect(text: &str) -> DetectedFormat {
    HeuristicDetector::new().detect(text)
}

/// Check if trimmed text is HTML markup: starts with `<` and contains a
/// closing or self-closing tag.
pub fn is_html_markup(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with('<') && (text.contains("</") || text.contains("/>"))
}

/// ZIP local file header, the container of DOCX packages.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// OLE compound file header used by legacy binary `.doc`.
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Detect the source format from bytes.
///
/// # Returns
/// * `Ok(SourceFormat::Docx)` for ZIP data
/// * `Ok(..)` for UTF-8 text, classified with [`detect`]
/// * `Err(Error::UnknownFormat)` for empty input or undecodable bytes
/// * `Err(Error::UnsupportedFormat)` for legacy binary `.doc`
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if data.starts_with(ZIP_MAGIC) {
        return Ok(SourceFormat::Docx);
    }
    if data.starts_with(OLE_MAGIC) {
        return Err(Error::UnsupportedFormat(
            "legacy binary .doc; save the document as .docx".to_string(),
        ));
    }

    let text = std::str::from_utf8(data).map_err(|_| Error::UnknownFormat)?;
    classify_text(text)
}

/// Classify text into a source format.
pub fn classify_text(text: &str) -> Result<SourceFormat> {
    match detect(text) {
        DetectedFormat::Unknown => Err(Error::UnknownFormat),
        DetectedFormat::Markdown => Ok(SourceFormat::Markdown),
        DetectedFormat::RichDoc if is_html_markup(text.trim()) => Ok(SourceFormat::Html),
        DetectedFormat::RichDoc => Ok(SourceFormat::Text),
    }
}

/// Detect the source format from a file extension.
///
/// # Example
/// ```
/// use docmd::detect::{format_from_extension, SourceFormat};
///
/// assert_eq!(format_from_extension("notes.MD").unwrap(), SourceFormat::Markdown);
/// assert_eq!(format_from_extension("report.docx").unwrap(), SourceFormat::Docx);
/// assert!(format_from_extension("scan.pdf").is_err());
/// ```
pub fn format_from_extension<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "md" | "markdown" => Ok(SourceFormat::Markdown),
        "docx" | "doc" => Ok(SourceFormat::Docx),
        "html" | "htm" => Ok(SourceFormat::Html),
        other => Err(Error::UnsupportedExtension(other.to_string())),
    }
}

/// Detect the source format of a file, trusting its extension first and its
/// content second.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let by_ext = format_from_extension(&path)?;
    if by_ext != SourceFormat::Docx {
        return Ok(by_ext);
    }

    let mut header = [0u8; 8];
    let mut file = File::open(path)?;
    let n = file.read(&mut header)?;
    match detect_format_from_bytes(&header[..n]) {
        Ok(SourceFormat::Docx) => Ok(SourceFormat::Docx),
        Err(e @ Error::UnsupportedFormat(_)) => Err(e),
        _ => Err(Error::UnsupportedFormat(
            "file has a .doc/.docx extension but is not a DOCX package".to_string(),
        )),
    }
}

/// Check if bytes look like a DOCX (ZIP) package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}
