//! The compiled representation of a Markdown document.

use super::{DocumentNode, NodeKind};
use serde::{Deserialize, Serialize};

/// Non-fatal issue found while compiling Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompileWarning {
    /// A code fence opened on `line` (1-based) was never closed; the block was dropped.
    UnterminatedFence {
        /// Line of the opening fence
        line: usize,
    },
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileWarning::UnterminatedFence { line } => {
                write!(f, "code fence opened on line {} is never closed", line)
            }
        }
    }
}

/// Ordered, read-only sequence of document nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledDocument {
    nodes: Vec<DocumentNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<CompileWarning>,
}

impl CompiledDocument {
    /// Create a document from already compiled nodes.
    pub fn new(nodes: Vec<DocumentNode>, warnings: Vec<CompileWarning>) -> Self {
        Self { nodes, warnings }
    }

    /// The nodes in source order.
    pub fn nodes(&self) -> &[DocumentNode] {
        &self.nodes
    }

    /// Warnings collected while compiling.
    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    /// Consume the document, returning its nodes.
    pub fn into_nodes(self) -> Vec<DocumentNode> {
        self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Count nodes of one kind.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind() == kind).count()
    }

    /// Plain text of all nodes, one block per paragraph.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .map(|n| n.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_plain_text() {
        let doc = CompiledDocument::new(
            vec![
                DocumentNode::heading(1, "Title"),
                DocumentNode::Rule,
                DocumentNode::paragraph("Body"),
            ],
            Vec::new(),
        );
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.count(NodeKind::Rule), 1);
        assert_eq!(doc.plain_text(), "Title\n\nBody");
    }

    #[test]
    fn test_warning_display() {
        let w = CompileWarning::UnterminatedFence { line: 4 };
        assert_eq!(w.to_string(), "code fence opened on line 4 is never closed");
    }
}
