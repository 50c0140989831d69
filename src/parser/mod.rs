//! Markdown parsing module.
//!
//! Markdown is compiled line by line into a [`CompiledDocument`]; inline
//! content is split into bold and plain [`StyledRun`]s.
//!
//! [`CompiledDocument`]: crate::model::CompiledDocument
//! [`StyledRun`]: crate::model::StyledRun

mod inline;
mod markdown;

pub use inline::parse_inline;
pub use markdown::{compile, MarkdownCompiler};
