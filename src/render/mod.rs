//! Rendering: HTML to Markdown, compiled nodes to preview HTML and JSON.

pub mod cleanup;
mod html;
mod json;
pub mod markdown;
mod options;
mod result;
mod table;
pub mod visitor;

pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use html::{to_html_document, to_preview_html};
pub use json::{to_json, JsonFormat};
pub use markdown::{render, to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::RenderOptions;
pub use result::{RenderResult, RenderStats};
pub use table::TableData;
pub use visitor::{CompositeVisitor, DefaultVisitor, DocumentVisitor, VisitorAction};
