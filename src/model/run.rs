//! Inline text runs.

use serde::{Deserialize, Serialize};

/// Delimiter that produced a bold run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoldMarker {
    /// `**text**`
    Asterisks,
    /// `__text__`
    Underscores,
}

impl BoldMarker {
    /// The two-character delimiter written on each side of the run.
    pub fn delimiter(self) -> &'static str {
        match self {
            BoldMarker::Asterisks => "**",
            BoldMarker::Underscores => "__",
        }
    }
}

/// A span of text sharing one inline style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    /// The text content, without delimiters
    pub text: String,

    /// Bold text
    pub bold: bool,

    /// Delimiter the run was written with, for bold runs parsed from Markdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<BoldMarker>,
}

impl StyledRun {
    /// Create a plain run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            marker: None,
        }
    }

    /// Create a bold run with the default `**` delimiter.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::bold_with(text, BoldMarker::Asterisks)
    }

    /// Create a bold run written with the given delimiter.
    pub fn bold_with(text: impl Into<String>, marker: BoldMarker) -> Self {
        Self {
            text: text.into(),
            bold: true,
            marker: Some(marker),
        }
    }

    /// The run as it appears in Markdown source, delimiters included.
    pub fn source(&self) -> String {
        match (self.bold, self.marker) {
            (true, Some(marker)) => {
                let d = marker.delimiter();
                format!("{d}{}{d}", self.text)
            }
            (true, None) => format!("**{}**", self.text),
            (false, _) => self.text.clone(),
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_restores_delimiters() {
        assert_eq!(StyledRun::plain("a*b").source(), "a*b");
        assert_eq!(StyledRun::bold("x").source(), "**x**");
        assert_eq!(
            StyledRun::bold_with("x", BoldMarker::Underscores).source(),
            "__x__"
        );
    }

    #[test]
    fn test_marker_skipped_when_absent() {
        let json = serde_json::to_string(&StyledRun::plain("hi")).unwrap();
        assert_eq!(json, r#"{"text":"hi","bold":false}"#);
    }
}
