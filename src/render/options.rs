//! Rendering options and configuration.

use super::{CleanupOptions, CleanupPreset};

/// Options for rendering HTML into Markdown.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Character to use for unordered list markers
    pub list_marker: char,

    /// Fence written around code blocks
    pub code_fence: String,

    /// Maximum heading level (1-6); deeper headings are clamped
    pub max_heading_level: u8,

    /// Escape `|` inside table cells
    pub escape_table_pipes: bool,

    /// Text cleanup applied after rendering
    pub cleanup: Option<CleanupOptions>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the list marker character (`-`, `*` or `+`).
    pub fn with_list_marker(mut self, marker: char) -> Self {
        if matches!(marker, '-' | '*' | '+') {
            self.list_marker = marker;
        }
        self
    }

    /// Set the code fence (three or more backticks or tildes).
    pub fn with_code_fence(mut self, fence: impl Into<String>) -> Self {
        self.code_fence = fence.into();
        self
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Enable or disable pipe escaping in table cells.
    pub fn with_table_pipe_escaping(mut self, escape: bool) -> Self {
        self.escape_table_pipes = escape;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(CleanupOptions::from_preset(preset));
        self
    }

    /// Disable the cleanup pipeline. The mandatory passes (non-breaking
    /// spaces and blank-line collapsing) still run.
    pub fn without_cleanup(mut self) -> Self {
        self.cleanup = None;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            list_marker: '-',
            code_fence: "```".to_string(),
            max_heading_level: 6,
            escape_table_pipes: true,
            cleanup: Some(CleanupOptions::standard()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.list_marker, '-');
        assert_eq!(options.code_fence, "```");
        assert_eq!(options.max_heading_level, 6);
        assert!(options.cleanup.is_some());
    }

    #[test]
    fn test_builder() {
        let options = RenderOptions::new()
            .with_list_marker('*')
            .with_list_marker('x')
            .with_max_heading(9)
            .without_cleanup();
        assert_eq!(options.list_marker, '*');
        assert_eq!(options.max_heading_level, 6);
        assert!(options.cleanup.is_none());
    }
}
