//! Conversion orchestration.
//!
//! A [`Converter`] wires detection, compilation and rendering into a single
//! request: Markdown is compiled into document nodes and handed to a
//! [`DocumentPackager`], rich documents are turned into HTML by an
//! [`HtmlExtractor`] and rendered to Markdown. [`Session`] tracks the latest
//! request so that late results of superseded requests are dropped.
//!
//! # Example
//!
//! ```
//! use docmd::convert::{ConversionInput, ConversionMode, ConversionOutput, Converter};
//!
//! fn main() -> docmd::Result<()> {
//!     let converter = Converter::new();
//!     let output = converter.convert(
//!         ConversionInput::text("<h1>Title</h1><p>Body</p>"),
//!         ConversionMode::Auto,
//!     )?;
//!     assert_eq!(output, ConversionOutput::Markdown("# Title\n\nBody".to_string()));
//!     Ok(())
//! }
//! ```

#[cfg(feature = "docx")]
mod docx;
mod session;

#[cfg(feature = "docx")]
pub use docx::{DocxExtractor, DocxPackager};
pub use session::{ConversionState, RequestId, Session};

use std::path::Path;

use crate::detect::{
    detect_format_from_bytes, format_from_extension, is_html_markup, DetectedFormat,
    FormatDetector, HeuristicDetector, SourceFormat,
};
use crate::error::{Error, Result};
use crate::model::DocumentNode;
use crate::parser::MarkdownCompiler;
use crate::render::{to_html_document, to_markdown, to_preview_html, RenderOptions};

/// Shown when rich-document text arrives without an uploaded file.
const RICH_TEXT_MESSAGE: &str =
    "Converting rich-document text directly is not supported; import a .doc or .docx file instead";

/// Shown when packaging fails and the HTML document is offered instead.
const FALLBACK_MESSAGE: &str = "Could not package DOCX, offering HTML download instead";

/// MIME type of a packaged DOCX file.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Turns compiled document nodes into a binary document.
pub trait DocumentPackager: Send + Sync {
    /// Name used in error messages and logs.
    fn name(&self) -> &str;

    /// Package the nodes.
    fn pack(&self, nodes: &[DocumentNode]) -> Result<Vec<u8>>;
}

/// HTML produced from a binary document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Extracted HTML
    pub html: String,

    /// Advisory messages; logged, never treated as errors
    pub messages: Vec<String>,
}

/// Turns a binary document into HTML.
pub trait HtmlExtractor: Send + Sync {
    /// Name used in error messages and logs.
    fn name(&self) -> &str;

    /// Extract HTML from the document bytes.
    fn extract(&self, bytes: &[u8]) -> Result<Extraction>;
}

/// Format a conversion produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    /// Markdown text
    Markdown,
    /// Packaged DOCX document
    Docx,
    /// HTML document
    Html,
}

impl TargetFormat {
    /// The detected class this target belongs to.
    pub fn class(self) -> DetectedFormat {
        match self {
            TargetFormat::Markdown => DetectedFormat::Markdown,
            TargetFormat::Docx | TargetFormat::Html => DetectedFormat::RichDoc,
        }
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Markdown => "md",
            TargetFormat::Docx => "docx",
            TargetFormat::Html => "html",
        }
    }

    /// MIME type of the output.
    pub fn mime_type(self) -> &'static str {
        match self {
            TargetFormat::Markdown => "text/markdown",
            TargetFormat::Docx => DOCX_MIME_TYPE,
            TargetFormat::Html => "text/html",
        }
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetFormat::Markdown => write!(f, "Markdown"),
            TargetFormat::Docx => write!(f, "DOCX"),
            TargetFormat::Html => write!(f, "HTML"),
        }
    }
}

/// How the source and target formats are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionMode {
    /// Detect the source; Markdown goes to DOCX, rich documents to Markdown.
    #[default]
    Auto,

    /// User-selected formats.
    Explicit {
        /// Source format
        from: SourceFormat,
        /// Target format
        to: TargetFormat,
    },
}

/// Input of a conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionInput {
    /// Text typed or pasted by the user
    Text(String),

    /// An uploaded file
    File {
        /// File name, used for its extension
        name: String,
        /// File content
        bytes: Vec<u8>,
    },
}

impl ConversionInput {
    /// Create a text input.
    pub fn text(text: impl Into<String>) -> Self {
        ConversionInput::Text(text.into())
    }

    /// Create a file input.
    pub fn file(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        ConversionInput::File {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file input from disk.
    ///
    /// Only `.md`, `.markdown`, `.doc`, `.docx`, `.html` and `.htm` files are
    /// accepted.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        format_from_extension(path)?;
        let bytes = std::fs::read(path)?;
        Ok(Self::file(file_name(path), bytes))
    }

    /// Read a file input from disk asynchronously.
    #[cfg(feature = "async")]
    pub async fn from_path_async<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        format_from_extension(path)?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::file(file_name(path), bytes))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Download offered instead of a packaged document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// A standalone HTML document
    Html(String),
}

impl Fallback {
    /// User-facing explanation.
    pub fn message(&self) -> &'static str {
        FALLBACK_MESSAGE
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutput {
    /// Markdown rendered from a rich document
    Markdown(String),

    /// Document compiled from Markdown
    Document {
        /// Compiled nodes, in source order
        nodes: Vec<DocumentNode>,
        /// HTML preview of the nodes
        preview_html: String,
        /// Packaged document, absent for HTML targets or when packaging failed
        packed: Option<Vec<u8>>,
        /// Download offered when packaging failed
        fallback: Option<Fallback>,
    },

    /// Input returned unchanged because source and target formats match
    Echo(String),
}

impl ConversionOutput {
    /// Format of the downloadable payload.
    pub fn target_format(&self) -> TargetFormat {
        match self {
            ConversionOutput::Markdown(_) => TargetFormat::Markdown,
            ConversionOutput::Document {
                packed: Some(_), ..
            } => TargetFormat::Docx,
            ConversionOutput::Document { .. } => TargetFormat::Html,
            ConversionOutput::Echo(text) if is_html_markup(text.trim()) => TargetFormat::Html,
            ConversionOutput::Echo(_) => TargetFormat::Markdown,
        }
    }

    /// File name offered for download.
    pub fn suggested_file_name(&self) -> String {
        format!("converted.{}", self.target_format().extension())
    }

    /// MIME type of the downloadable payload.
    pub fn mime_type(&self) -> &'static str {
        self.target_format().mime_type()
    }

    /// The downloadable payload.
    pub fn payload(&self) -> &[u8] {
        match self {
            ConversionOutput::Markdown(text) | ConversionOutput::Echo(text) => text.as_bytes(),
            ConversionOutput::Document {
                packed: Some(bytes),
                ..
            } => bytes,
            ConversionOutput::Document {
                fallback: Some(Fallback::Html(html)),
                ..
            } => html.as_bytes(),
            ConversionOutput::Document { preview_html, .. } => preview_html.as_bytes(),
        }
    }

    /// Text shown to the user, if the output is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConversionOutput::Markdown(text) | ConversionOutput::Echo(text) => Some(text),
            ConversionOutput::Document { preview_html, .. } => Some(preview_html),
        }
    }

    /// Compiled nodes, for document outputs.
    pub fn nodes(&self) -> Option<&[DocumentNode]> {
        match self {
            ConversionOutput::Document { nodes, .. } => Some(nodes),
            _ => None,
        }
    }

    /// User-facing notice, set when packaging fell back to HTML.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ConversionOutput::Document {
                fallback: Some(fallback),
                ..
            } => Some(fallback.message()),
            _ => None,
        }
    }
}

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Options for rendering HTML to Markdown
    pub render: RenderOptions,

    /// Package DOCX targets; when off only the preview is produced
    pub package: bool,

    /// Remove a leading `<!-- ... -->` banner from text input
    pub strip_banner: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            package: true,
            strip_banner: true,
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Enable or disable packaging.
    pub fn with_packaging(mut self, package: bool) -> Self {
        self.package = package;
        self
    }

    /// Enable or disable banner removal.
    pub fn with_banner_stripping(mut self, strip: bool) -> Self {
        self.strip_banner = strip;
        self
    }
}

/// Source content after input resolution.
enum Source {
    Markdown(String),
    Html(String),
}

/// Runs conversion requests.
pub struct Converter {
    detector: Box<dyn FormatDetector>,
    compiler: MarkdownCompiler,
    packager: Option<Box<dyn DocumentPackager>>,
    extractor: Option<Box<dyn HtmlExtractor>>,
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with the heuristic detector and, with the `docx`
    /// feature, the built-in DOCX collaborators.
    pub fn new() -> Self {
        let converter = Self {
            detector: Box::new(HeuristicDetector::new()),
            compiler: MarkdownCompiler::new(),
            packager: None,
            extractor: None,
            options: ConvertOptions::default(),
        };

        #[cfg(feature = "docx")]
        let converter = converter
            .with_packager(DocxPackager::new())
            .with_extractor(DocxExtractor::new());

        converter
    }

    /// Replace the format detector.
    pub fn with_detector<D: FormatDetector + 'static>(mut self, detector: D) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Replace the document packager.
    pub fn with_packager<P: DocumentPackager + 'static>(mut self, packager: P) -> Self {
        self.packager = Some(Box::new(packager));
        self
    }

    /// Replace the HTML extractor.
    pub fn with_extractor<E: HtmlExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Some(Box::new(extractor));
        self
    }

    /// Set conversion options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.options.render = options;
        self
    }

    /// The conversion options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Classify free-form text with the configured detector.
    pub fn detect(&self, text: &str) -> DetectedFormat {
        self.detector.detect(text)
    }

    /// Convert one input.
    pub fn convert(&self, input: ConversionInput, mode: ConversionMode) -> Result<ConversionOutput> {
        let (source, target) = match input {
            ConversionInput::Text(text) => self.resolve_text(text, mode)?,
            ConversionInput::File { name, bytes } => self.resolve_file(&name, &bytes, mode)?,
        };

        let output = match (source, target) {
            (Source::Markdown(text), TargetFormat::Markdown) => ConversionOutput::Echo(text),
            (Source::Html(text), TargetFormat::Docx | TargetFormat::Html) => {
                ConversionOutput::Echo(text)
            }
            (Source::Markdown(markdown), target) => self.build_document(&markdown, target),
            (Source::Html(html), TargetFormat::Markdown) => {
                let markdown = to_markdown(&html, &self.options.render);
                ConversionOutput::Markdown(markdown.trim().to_string())
            }
        };

        log::info!(
            "converted to {} ({} bytes)",
            output.target_format(),
            output.payload().len()
        );
        Ok(output)
    }

    /// Convert a file on disk, choosing formats from its extension.
    pub fn convert_path<P: AsRef<Path>>(&self, path: P) -> Result<ConversionOutput> {
        self.convert(ConversionInput::from_path(path)?, ConversionMode::Auto)
    }

    /// Convert a file on disk, reading it asynchronously.
    #[cfg(feature = "async")]
    pub async fn convert_path_async<P: AsRef<Path>>(&self, path: P) -> Result<ConversionOutput> {
        let input = ConversionInput::from_path_async(path).await?;
        self.convert(input, ConversionMode::Auto)
    }

    /// Produce the text that represents an imported file.
    ///
    /// Markdown and HTML files are returned as-is. DOCX files are extracted to
    /// HTML behind a `<!-- Imported document: NAME -->` banner.
    pub fn import(&self, name: &str, bytes: &[u8]) -> Result<String> {
        match format_from_extension(name)? {
            SourceFormat::Docx => {
                let html = self.extract(name, bytes)?;
                Ok(format!("<!-- Imported document: {} -->\n{}", name, html))
            }
            _ => decode_text(bytes),
        }
    }

    fn resolve_text(&self, text: String, mode: ConversionMode) -> Result<(Source, TargetFormat)> {
        if text.trim().is_empty() {
            return Err(Error::DetectionAmbiguous);
        }

        let (from, to) = match mode {
            ConversionMode::Auto => match self.detector.detect(&text) {
                DetectedFormat::Unknown => return Err(Error::DetectionAmbiguous),
                DetectedFormat::Markdown => (SourceFormat::Markdown, TargetFormat::Docx),
                DetectedFormat::RichDoc => (SourceFormat::Html, TargetFormat::Markdown),
            },
            ConversionMode::Explicit { from, to } => (from, to),
        };
        log::debug!("text input resolved as {} -> {}", from, to);

        match from {
            SourceFormat::Markdown | SourceFormat::Text => Ok((Source::Markdown(text), to)),
            // Rich-document text is the HTML of an earlier import.
            SourceFormat::Html | SourceFormat::Docx => {
                let html = self.prepare_html(&text);
                if !is_html_markup(&html) {
                    return Err(Error::UnsupportedDirection(RICH_TEXT_MESSAGE.to_string()));
                }
                Ok((Source::Html(html), to))
            }
        }
    }

    fn resolve_file(
        &self,
        name: &str,
        bytes: &[u8],
        mode: ConversionMode,
    ) -> Result<(Source, TargetFormat)> {
        let declared = format_from_extension(name)?;
        let (from, to) = match mode {
            ConversionMode::Auto if declared == SourceFormat::Markdown => {
                (declared, TargetFormat::Docx)
            }
            ConversionMode::Auto => (declared, TargetFormat::Markdown),
            ConversionMode::Explicit { from, to } => (from, to),
        };
        log::debug!("file {} resolved as {} -> {}", name, from, to);

        match from {
            SourceFormat::Markdown | SourceFormat::Text => {
                Ok((Source::Markdown(decode_text(bytes)?), to))
            }
            SourceFormat::Html => {
                let html = self.prepare_html(&decode_text(bytes)?);
                Ok((Source::Html(html), to))
            }
            SourceFormat::Docx => {
                match detect_format_from_bytes(bytes) {
                    Ok(SourceFormat::Docx) => {}
                    Err(e @ Error::UnsupportedFormat(_)) => return Err(e),
                    _ => {
                        return Err(Error::UnsupportedFormat(format!(
                            "{} is not a DOCX package",
                            name
                        )))
                    }
                }
                Ok((Source::Html(self.extract(name, bytes)?), to))
            }
        }
    }

    fn extract(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let extractor = self
            .extractor
            .as_ref()
            .ok_or_else(|| Error::collaborator("extractor", "no HTML extractor configured"))?;

        let extraction = extractor.extract(bytes).map_err(|e| {
            if e.is_collaborator() {
                e
            } else {
                Error::collaborator(extractor.name(), e.to_string())
            }
        })?;

        for message in &extraction.messages {
            log::warn!("{} ({}): {}", extractor.name(), name, message);
        }
        Ok(extraction.html)
    }

    fn prepare_html(&self, text: &str) -> String {
        if self.options.strip_banner {
            strip_banner(text).to_string()
        } else {
            text.trim().to_string()
        }
    }

    fn build_document(&self, markdown: &str, target: TargetFormat) -> ConversionOutput {
        let nodes = self.compiler.compile(markdown).into_nodes();
        let preview_html = to_preview_html(&nodes);

        let (packed, fallback) = if target == TargetFormat::Docx && self.options.package {
            match self.package(&nodes) {
                Ok(bytes) => (Some(bytes), None),
                Err(e) => {
                    log::warn!("{}; {}", e, FALLBACK_MESSAGE);
                    let html = to_html_document(&nodes, "converted");
                    (None, Some(Fallback::Html(html)))
                }
            }
        } else {
            (None, None)
        };

        ConversionOutput::Document {
            nodes,
            preview_html,
            packed,
            fallback,
        }
    }

    fn package(&self, nodes: &[DocumentNode]) -> Result<Vec<u8>> {
        let packager = self
            .packager
            .as_ref()
            .ok_or_else(|| Error::collaborator("packager", "no document packager configured"))?;

        packager.pack(nodes).map_err(|e| {
            if e.is_collaborator() {
                e
            } else {
                Error::collaborator(packager.name(), e.to_string())
            }
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_text(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| Error::UnknownFormat)
}

/// Remove a leading `<!-- ... -->` comment and surrounding whitespace.
///
/// # Example
///
/// ```
/// use docmd::convert::strip_banner;
///
/// assert_eq!(strip_banner("<!-- Imported document: a.docx -->\n<p>x</p>"), "<p>x</p>");
/// assert_eq!(strip_banner("<p>x</p>"), "<p>x</p>");
/// ```
pub fn strip_banner(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("<!--") {
        if let Some(end) = rest.find("-->") {
            return rest[end + 3..].trim();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingPackager;

    impl DocumentPackager for FailingPackager {
        fn name(&self) -> &str {
            "failing"
        }

        fn pack(&self, _nodes: &[DocumentNode]) -> Result<Vec<u8>> {
            Err(Error::Other("disk full".into()))
        }
    }

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_packaging(false)
            .with_banner_stripping(false);

        assert!(!options.package);
        assert!(!options.strip_banner);
    }

    #[test]
    fn test_empty_input_is_ambiguous() {
        let err = Converter::new()
            .convert(ConversionInput::text("  \n"), ConversionMode::Auto)
            .unwrap_err();
        assert!(matches!(err, Error::DetectionAmbiguous));
    }

    #[test]
    fn test_plain_rich_text_is_unsupported() {
        let err = Converter::new()
            .convert(ConversionInput::text("just some words"), ConversionMode::Auto)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedDirection(_)));
        assert!(err.to_string().contains(".docx"));
    }

    #[test]
    fn test_same_format_echoes() {
        let output = Converter::new()
            .convert(
                ConversionInput::text("# Title"),
                ConversionMode::Explicit {
                    from: SourceFormat::Markdown,
                    to: TargetFormat::Markdown,
                },
            )
            .unwrap();
        assert_eq!(output, ConversionOutput::Echo("# Title".to_string()));
        assert_eq!(output.suggested_file_name(), "converted.md");
        assert!(output.nodes().is_none());
    }

    #[test]
    fn test_banner_stripped_before_rendering() {
        let output = Converter::new()
            .convert(
                ConversionInput::text("<!-- Imported document: a.docx -->\n<h2>Hi</h2>"),
                ConversionMode::Auto,
            )
            .unwrap();
        assert_eq!(output, ConversionOutput::Markdown("## Hi".to_string()));
        assert_eq!(output.mime_type(), "text/markdown");
    }

    #[test]
    fn test_packaging_failure_falls_back_to_html() {
        let output = Converter::new()
            .with_packager(FailingPackager)
            .convert(ConversionInput::text("# Title"), ConversionMode::Auto)
            .unwrap();

        match &output {
            ConversionOutput::Document {
                nodes,
                packed,
                fallback,
                ..
            } => {
                assert_eq!(nodes.len(), 1);
                assert!(packed.is_none());
                assert!(matches!(fallback, Some(Fallback::Html(html)) if html.contains("<h1>Title</h1>")));
            }
            other => panic!("unexpected output: {:?}", other),
        }
        assert_eq!(output.suggested_file_name(), "converted.html");
        assert_eq!(output.message(), Some(FALLBACK_MESSAGE));
    }

    #[test]
    fn test_markdown_to_html_target_skips_packaging() {
        let output = Converter::new()
            .with_packager(FailingPackager)
            .convert(
                ConversionInput::text("- a"),
                ConversionMode::Explicit {
                    from: SourceFormat::Markdown,
                    to: TargetFormat::Html,
                },
            )
            .unwrap();
        assert_eq!(output.target_format(), TargetFormat::Html);
        assert!(output.message().is_none());
        assert_eq!(output.as_text(), Some("<ul>\n<li>a</li>\n</ul>\n"));
    }

    #[test]
    fn test_unsupported_file_extension() {
        let err = Converter::new()
            .convert(
                ConversionInput::file("scan.pdf", b"%PDF".to_vec()),
                ConversionMode::Auto,
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedExtension(_)));
    }

    #[test]
    fn test_strip_banner() {
        assert_eq!(strip_banner("  <!-- x --> \n<p>a</p> "), "<p>a</p>");
        assert_eq!(strip_banner("<!-- unterminated"), "<!-- unterminated");
    }
}
