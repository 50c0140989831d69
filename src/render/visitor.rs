//! Visitor pattern for customizing HTML to Markdown rendering.
//!
//! The renderer calls the visitor once per element kind, after the element's
//! content has been rendered to Markdown and before it is written out.
//!
//! # Example
//!
//! ```
//! use docmd::render::visitor::{DocumentVisitor, VisitorAction};
//! use docmd::render::TableData;
//!
//! struct CustomTableVisitor;
//!
//! impl DocumentVisitor for CustomTableVisitor {
//!     fn visit_table(&mut self, _table: &TableData) -> VisitorAction {
//!         VisitorAction::Replace("<!-- table omitted -->\n\n".to_string())
//!     }
//! }
//! ```

use super::TableData;

/// Action returned by visitor methods to control rendering behavior.
#[derive(Debug, Clone, Default)]
pub enum VisitorAction {
    /// Continue with default rendering.
    #[default]
    Continue,

    /// Replace the element with custom output.
    Replace(String),

    /// Skip this element entirely (produce no output).
    Skip,
}

impl VisitorAction {
    /// Check if this action indicates the element should be skipped.
    pub fn should_skip(&self) -> bool {
        matches!(self, VisitorAction::Skip)
    }

    /// Check if this action provides replacement content.
    pub fn is_replace(&self) -> bool {
        matches!(self, VisitorAction::Replace(_))
    }

    /// Get replacement content if available.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            VisitorAction::Replace(s) => Some(s),
            _ => None,
        }
    }
}

/// Trait for visiting elements during rendering.
///
/// All methods return `VisitorAction::Continue` by default. Replacement text
/// is written verbatim, so block replacements should end with a blank line.
pub trait DocumentVisitor: Send {
    /// Called before writing a heading.
    ///
    /// # Arguments
    /// * `text` - The rendered heading text
    /// * `level` - Heading level (1-6)
    fn visit_heading(&mut self, text: &str, level: u8) -> VisitorAction {
        let _ = (text, level);
        VisitorAction::Continue
    }

    /// Called before writing a paragraph.
    fn visit_paragraph(&mut self, text: &str) -> VisitorAction {
        let _ = text;
        VisitorAction::Continue
    }

    /// Called before writing a list item.
    ///
    /// # Arguments
    /// * `text` - The rendered item text
    /// * `ordered` - Whether the item belongs to an ordered list
    /// * `index` - 1-based position of the item within its list
    fn visit_list_item(&mut self, text: &str, ordered: bool, index: u32) -> VisitorAction {
        let _ = (text, ordered, index);
        VisitorAction::Continue
    }

    /// Called before writing a fenced code block.
    fn visit_code_block(&mut self, code: &str) -> VisitorAction {
        let _ = code;
        VisitorAction::Continue
    }

    /// Called before writing a block quote. `text` is the unprefixed content.
    fn visit_blockquote(&mut self, text: &str) -> VisitorAction {
        let _ = text;
        VisitorAction::Continue
    }

    /// Called before writing a table.
    fn visit_table(&mut self, table: &TableData) -> VisitorAction {
        let _ = table;
        VisitorAction::Continue
    }

    /// Called before writing a link.
    fn visit_link(&mut self, text: &str, href: &str) -> VisitorAction {
        let _ = (text, href);
        VisitorAction::Continue
    }

    /// Called before writing an image.
    fn visit_image(&mut self, src: &str, alt: &str) -> VisitorAction {
        let _ = (src, alt);
        VisitorAction::Continue
    }

    /// Called before writing a horizontal rule.
    fn visit_horizontal_rule(&mut self) -> VisitorAction {
        VisitorAction::Continue
    }
}

/// Default visitor that performs no customization.
#[derive(Debug, Clone, Default)]
pub struct DefaultVisitor;

impl DefaultVisitor {
    /// Create a new default visitor.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentVisitor for DefaultVisitor {}

/// Visitor that skips all images.
#[derive(Debug, Clone, Default)]
pub struct SkipImagesVisitor;

impl DocumentVisitor for SkipImagesVisitor {
    fn visit_image(&mut self, _src: &str, _alt: &str) -> VisitorAction {
        VisitorAction::Skip
    }
}

/// Visitor that writes tables as space-separated text lines.
#[derive(Debug, Clone, Default)]
pub struct SimpleTableVisitor;

impl DocumentVisitor for SimpleTableVisitor {
    fn visit_table(&mut self, table: &TableData) -> VisitorAction {
        let mut output = String::new();
        for row in std::iter::once(&table.header).chain(table.rows.iter()) {
            if row.is_empty() {
                continue;
            }
            output.push_str(&row.join(" | "));
            output.push('\n');
        }
        output.push('\n');
        VisitorAction::Replace(output)
    }
}

/// Visitor that writes links as their text only.
#[derive(Debug, Clone, Default)]
pub struct StripLinksVisitor;

impl DocumentVisitor for StripLinksVisitor {
    fn visit_link(&mut self, text: &str, _href: &str) -> VisitorAction {
        VisitorAction::Replace(text.to_string())
    }
}

/// Visitor that limits heading depth.
#[derive(Debug, Clone)]
pub struct MaxHeadingDepthVisitor {
    max_level: u8,
}

impl MaxHeadingDepthVisitor {
    /// Create a visitor that limits headings to the specified max level.
    pub fn new(max_level: u8) -> Self {
        Self {
            max_level: max_level.clamp(1, 6),
        }
    }
}

impl DocumentVisitor for MaxHeadingDepthVisitor {
    fn visit_heading(&mut self, text: &str, level: u8) -> VisitorAction {
        let effective_level = level.min(self.max_level);
        let prefix = "#".repeat(effective_level as usize);
        VisitorAction::Replace(format!("{} {}\n\n", prefix, text))
    }
}

/// Composite visitor that chains multiple visitors.
///
/// Visitors are called in order. The first visitor that returns
/// a non-Continue action determines the result.
pub struct CompositeVisitor {
    visitors: Vec<Box<dyn DocumentVisitor>>,
}

impl CompositeVisitor {
    /// Create a new composite visitor.
    pub fn new() -> Self {
        Self {
            visitors: Vec::new(),
        }
    }

    /// Add a visitor to the chain.
    pub fn with_visitor<V: DocumentVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    fn first_action<F>(&mut self, mut f: F) -> VisitorAction
    where
        F: FnMut(&mut dyn DocumentVisitor) -> VisitorAction,
    {
        for visitor in &mut self.visitors {
            let action = f(visitor.as_mut());
            if !matches!(action, VisitorAction::Continue) {
                return action;
            }
        }
        VisitorAction::Continue
    }
}

impl Default for CompositeVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentVisitor for CompositeVisitor {
    fn visit_heading(&mut self, text: &str, level: u8) -> VisitorAction {
        self.first_action(|v| v.visit_heading(text, level))
    }

    fn visit_paragraph(&mut self, text: &str) -> VisitorAction {
        self.first_action(|v| v.visit_paragraph(text))
    }

    fn visit_list_item(&mut self, text: &str, ordered: bool, index: u32) -> VisitorAction {
        self.first_action(|v| v.visit_list_item(text, ordered, index))
    }

    fn visit_code_block(&mut self, code: &str) -> VisitorAction {
        self.first_action(|v| v.visit_code_block(code))
    }

    fn visit_blockquote(&mut self, text: &str) -> VisitorAction {
        self.first_action(|v| v.visit_blockquote(text))
    }

    fn visit_table(&mut self, table: &TableData) -> VisitorAction {
        self.first_action(|v| v.visit_table(table))
    }

    fn visit_link(&mut self, text: &str, href: &str) -> VisitorAction {
        self.first_action(|v| v.visit_link(text, href))
    }

    fn visit_image(&mut self, src: &str, alt: &str) -> VisitorAction {
        self.first_action(|v| v.visit_image(src, alt))
    }

    fn visit_horizontal_rule(&mut self) -> VisitorAction {
        self.first_action(|v| v.visit_horizontal_rule())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_action_default() {
        let action = VisitorAction::default();
        assert!(matches!(action, VisitorAction::Continue));
    }

    #[test]
    fn test_visitor_action_should_skip() {
        assert!(!VisitorAction::Continue.should_skip());
        assert!(!VisitorAction::Replace("test".into()).should_skip());
        assert!(VisitorAction::Skip.should_skip());
    }

    #[test]
    fn test_visitor_action_replacement() {
        assert!(VisitorAction::Continue.replacement().is_none());
        assert_eq!(
            VisitorAction::Replace("hello".into()).replacement(),
            Some("hello")
        );
    }

    #[test]
    fn test_max_heading_depth_visitor() {
        let mut visitor = MaxHeadingDepthVisitor::new(2);
        let action = visitor.visit_heading("Deep Heading", 4);
        assert_eq!(action.replacement(), Some("## Deep Heading\n\n"));
    }

    #[test]
    fn test_simple_table_visitor() {
        let table = TableData {
            header: vec!["A".into(), "B".into()],
            rows: vec![vec!["1".into(), "2".into()]],
        };
        let action = SimpleTableVisitor.visit_table(&table);
        assert_eq!(action.replacement(), Some("A | B\n1 | 2\n\n"));
    }

    #[test]
    fn test_composite_visitor() {
        let mut composite = CompositeVisitor::new()
            .with_visitor(SkipImagesVisitor)
            .with_visitor(StripLinksVisitor)
            .with_visitor(DefaultVisitor);

        assert!(composite.visit_image("a.png", "").should_skip());
        assert_eq!(
            composite.visit_link("docs", "http://x").replacement(),
            Some("docs")
        );
        assert!(matches!(
            composite.visit_paragraph("text"),
            VisitorAction::Continue
        ));
    }
}
