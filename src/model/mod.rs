//! Document model types shared by the compiler, the renderers and the
//! packaging collaborators.
//!
//! A Markdown document compiles into an ordered sequence of block-level
//! [`DocumentNode`]s. The sequence is produced once per conversion and is
//! read-only afterwards; packagers consume it, they never edit it.

mod document;
mod node;
mod run;

pub use document::{CompileWarning, CompiledDocument};
pub use node::{DocumentNode, NodeKind};
pub use run::{BoldMarker, StyledRun};
