//! Block-level document nodes.

use super::StyledRun;
use serde::{Deserialize, Serialize};

/// A block-level unit of a compiled document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentNode {
    /// Heading with level 1-6
    Heading {
        /// Heading level (1-6)
        level: u8,
        /// Heading text
        text: String,
    },

    /// Horizontal rule
    Rule,

    /// Single-line block quote
    Quote {
        /// Quoted text
        text: String,
    },

    /// Unordered list item
    BulletItem {
        /// Item text
        text: String,
    },

    /// Ordered list item
    NumberedItem {
        /// Item text
        text: String,
        /// Rebuilt 1-based position among numbered items
        index: u32,
    },

    /// Fenced code block
    CodeBlock {
        /// Raw code, newline-joined
        text: String,
    },

    /// Paragraph of styled runs
    Paragraph {
        /// Inline runs in source order
        runs: Vec<StyledRun>,
    },
}

/// Discriminant of a [`DocumentNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Heading
    Heading,
    /// Horizontal rule
    Rule,
    /// Block quote
    Quote,
    /// Unordered list item
    BulletItem,
    /// Ordered list item
    NumberedItem,
    /// Fenced code block
    CodeBlock,
    /// Paragraph
    Paragraph,
}

impl DocumentNode {
    /// Create a heading node. The level is clamped to 1-6.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        DocumentNode::Heading {
            level: level.clamp(1, 6),
            text: text.into(),
        }
    }

    /// Create a paragraph holding a single plain run.
    pub fn paragraph(text: impl Into<String>) -> Self {
        DocumentNode::Paragraph {
            runs: vec![StyledRun::plain(text)],
        }
    }

    /// Get the node kind.
    pub fn kind(&self) -> NodeKind {
        match self {
            DocumentNode::Heading { .. } => NodeKind::Heading,
            DocumentNode::Rule => NodeKind::Rule,
            DocumentNode::Quote { .. } => NodeKind::Quote,
            DocumentNode::BulletItem { .. } => NodeKind::BulletItem,
            DocumentNode::NumberedItem { .. } => NodeKind::NumberedItem,
            DocumentNode::CodeBlock { .. } => NodeKind::CodeBlock,
            DocumentNode::Paragraph { .. } => NodeKind::Paragraph,
        }
    }

    /// Get plain text content of the node, without inline styling.
    pub fn plain_text(&self) -> String {
        match self {
            DocumentNode::Heading { text, .. }
            | DocumentNode::Quote { text }
            | DocumentNode::BulletItem { text }
            | DocumentNode::NumberedItem { text, .. }
            | DocumentNode::CodeBlock { text } => text.clone(),
            DocumentNode::Rule => String::new(),
            DocumentNode::Paragraph { runs } => runs.iter().map(|r| r.text.as_str()).collect(),
        }
    }

    /// Check if this is a list item.
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            DocumentNode::BulletItem { .. } | DocumentNode::NumberedItem { .. }
        )
    }

    /// Get the heading level (1-6) or None.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            DocumentNode::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_clamped() {
        assert_eq!(DocumentNode::heading(9, "x").heading_level(), Some(6));
        assert_eq!(DocumentNode::heading(0, "x").heading_level(), Some(1));
    }

    #[test]
    fn test_paragraph_plain_text() {
        let node = DocumentNode::Paragraph {
            runs: vec![
                StyledRun::plain("Hello "),
                StyledRun::bold("world"),
                StyledRun::plain("!"),
            ],
        };
        assert_eq!(node.plain_text(), "Hello world!");
        assert_eq!(node.kind(), NodeKind::Paragraph);
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&DocumentNode::NumberedItem {
            text: "a".into(),
            index: 2,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"numbered_item","text":"a","index":2}"#);

        let rule: DocumentNode = serde_json::from_str(r#"{"type":"rule"}"#).unwrap();
        assert_eq!(rule, DocumentNode::Rule);
    }
}
