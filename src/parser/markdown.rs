//! Markdown to document-node compiler.

use super::parse_inline;
use crate::model::{CompileWarning, CompiledDocument, DocumentNode};
use regex::Regex;

const FENCE: &str = "```";

/// Line-oriented Markdown compiler.
///
/// A single forward pass over the input lines. Each non-blank line yields one
/// node except fenced code, which consumes lines up to its closing fence.
pub struct MarkdownCompiler {
    heading: Regex,
    rule: Regex,
    quote: Regex,
    bullet: Regex,
    numbered: Regex,
}

impl MarkdownCompiler {
    /// Create a new compiler.
    pub fn new() -> Self {
        Self {
            heading: Regex::new(r"^(#{1,6})\s+(.+)$").expect("static pattern"),
            rule: Regex::new(r"^(?:\*{3,}|-{3,}|_{3,})$").expect("static pattern"),
            quote: Regex::new(r"^>\s+(.+)$").expect("static pattern"),
            bullet: Regex::new(r"^[*\-+]\s+(.+)$").expect("static pattern"),
            numbered: Regex::new(r"^\d+\.\s+(.+)$").expect("static pattern"),
        }
    }

    /// Compile Markdown into a node sequence.
    pub fn compile(&self, markdown: &str) -> CompiledDocument {
        let lines: Vec<&str> = markdown.lines().collect();
        let mut nodes = Vec::new();
        let mut warnings = Vec::new();
        let mut numbered_index = 0u32;

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i].trim();

            if line.is_empty() {
                i += 1;
                continue;
            }

            if let Some(caps) = self.heading.captures(line) {
                nodes.push(DocumentNode::heading(
                    caps[1].len() as u8,
                    caps[2].trim(),
                ));
                i += 1;
                continue;
            }

            if self.rule.is_match(line) {
                nodes.push(DocumentNode::Rule);
                i += 1;
                continue;
            }

            if let Some(caps) = self.quote.captures(line) {
                nodes.push(DocumentNode::Quote {
                    text: caps[1].to_string(),
                });
                i += 1;
                continue;
            }

            if let Some(caps) = self.bullet.captures(line) {
                nodes.push(DocumentNode::BulletItem {
                    text: caps[1].to_string(),
                });
                i += 1;
                continue;
            }

            if let Some(caps) = self.numbered.captures(line) {
                numbered_index += 1;
                nodes.push(DocumentNode::NumberedItem {
                    text: caps[1].to_string(),
                    index: numbered_index,
                });
                i += 1;
                continue;
            }

            if line.starts_with(FENCE) {
                let opened_at = i;
                i += 1;
                let mut body = Vec::new();
                while i < lines.len() && !lines[i].trim_start().starts_with(FENCE) {
                    body.push(lines[i]);
                    i += 1;
                }

                if i < lines.len() {
                    nodes.push(DocumentNode::CodeBlock {
                        text: body.join("\n").trim().to_string(),
                    });
                    i += 1;
                } else {
                    log::warn!(
                        "dropping unterminated code block opened on line {}",
                        opened_at + 1
                    );
                    warnings.push(CompileWarning::UnterminatedFence {
                        line: opened_at + 1,
                    });
                }
                continue;
            }

            nodes.push(DocumentNode::Paragraph {
                runs: parse_inline(line),
            });
            i += 1;
        }

        log::debug!("compiled {} markdown lines into {} nodes", lines.len(), nodes.len());
        CompiledDocument::new(nodes, warnings)
    }
}

impl Default for MarkdownCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile Markdown into a node sequence.
///
/// # Example
/// ```
/// use docmd::model::DocumentNode;
/// use docmd::parser::compile;
///
/// let doc = compile("# Title\n\n- item");
/// assert_eq!(doc.nodes()[0], DocumentNode::heading(1, "Title"));
/// assert!(doc.nodes()[1].is_list_item());
/// ```
pub fn compile(markdown: &str) -> CompiledDocument {
    MarkdownCompiler::new().compile(markdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, StyledRun};

    #[test]
    fn test_headings() {
        let doc = compile("# One\n###### Six\n####### Seven");
        assert_eq!(doc.nodes()[0], DocumentNode::heading(1, "One"));
        assert_eq!(doc.nodes()[1], DocumentNode::heading(6, "Six"));
        assert_eq!(doc.nodes()[2].kind(), NodeKind::Paragraph);
    }

    #[test]
    fn test_rules() {
        let doc = compile("***\n---\n___\n--");
        assert_eq!(doc.count(NodeKind::Rule), 3);
        assert_eq!(doc.nodes()[3], DocumentNode::paragraph("--"));
    }

    #[test]
    fn test_quotes_are_single_line() {
        let doc = compile("> first\n> second");
        assert_eq!(
            doc.nodes(),
            &[
                DocumentNode::Quote {
                    text: "first".into()
                },
                DocumentNode::Quote {
                    text: "second".into()
                },
            ]
        );
    }

    #[test]
    fn test_bullets() {
        let doc = compile("* a\n- b\n+ c");
        assert_eq!(doc.count(NodeKind::BulletItem), 3);
        assert_eq!(doc.nodes()[2].plain_text(), "c");
    }

    #[test]
    fn test_numbered_items_renumbered() {
        let doc = compile("5. five\n1. one\n\ntext\n\n9. nine");
        let indices: Vec<u32> = doc
            .nodes()
            .iter()
            .filter_map(|n| match n {
                DocumentNode::NumberedItem { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_code_block_verbatim() {
        let doc = compile("```rust\nfn main() {\n    # not a heading\n}\n```\nafter");
        assert_eq!(
            doc.nodes()[0],
            DocumentNode::CodeBlock {
                text: "fn main() {\n    # not a heading\n}".into()
            }
        );
        assert_eq!(doc.nodes()[1], DocumentNode::paragraph("after"));
    }

    #[test]
    fn test_unterminated_fence_dropped() {
        let doc = compile("```\ncode line");
        assert!(doc.is_empty());
        assert_eq!(
            doc.warnings(),
            &[CompileWarning::UnterminatedFence { line: 1 }]
        );
    }

    #[test]
    fn test_unterminated_fence_keeps_preceding_nodes() {
        let doc = compile("# Title\n```\nnever closed\n# swallowed");
        assert_eq!(doc.nodes(), &[DocumentNode::heading(1, "Title")]);
    }

    #[test]
    fn test_paragraph_runs() {
        let doc = compile("Some **bold** text.");
        assert_eq!(
            doc.nodes()[0],
            DocumentNode::Paragraph {
                runs: vec![
                    StyledRun::plain("Some "),
                    StyledRun::bold("bold"),
                    StyledRun::plain(" text."),
                ]
            }
        );
    }

    #[test]
    fn test_crlf_and_indentation() {
        let doc = compile("  # Title\r\n\r\n   - item\r\n");
        assert_eq!(doc.nodes()[0], DocumentNode::heading(1, "Title"));
        assert_eq!(
            doc.nodes()[1],
            DocumentNode::BulletItem {
                text: "item".into()
            }
        );
    }

    #[test]
    fn test_order_matches_source() {
        let kinds: Vec<NodeKind> = compile("# h\n---\n> q\n- b\n1. n\n```\nc\n```\np")
            .nodes()
            .iter()
            .map(|n| n.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Heading,
                NodeKind::Rule,
                NodeKind::Quote,
                NodeKind::BulletItem,
                NodeKind::NumberedItem,
                NodeKind::CodeBlock,
                NodeKind::Paragraph,
            ]
        );
    }
}
