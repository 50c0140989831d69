//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

/// Result of rendering HTML, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered Markdown
    pub content: String,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: RenderStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of headings
    pub heading_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of list items
    pub list_item_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of images
    pub image_count: u32,

    /// Number of links
    pub link_count: u32,

    /// Number of code blocks
    pub code_block_count: u32,

    /// Number of block quotes
    pub blockquote_count: u32,

    /// Number of horizontal rules
    pub horizontal_rule_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count words and non-whitespace characters of the rendered text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count = text.split_whitespace().count() as u32;
        self.char_count = text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Total number of block elements rendered.
    pub fn block_count(&self) -> u32 {
        self.heading_count
            + self.paragraph_count
            + self.list_item_count
            + self.table_count
            + self.code_block_count
            + self.blockquote_count
            + self.horizontal_rule_count
    }
}
