//! Inline span parsing.
//!
//! Only bold delimiters are recognized. Single `*`/`_` emphasis stays in
//! plain runs verbatim.

use crate::model::{BoldMarker, StyledRun};
use regex::Regex;
use std::sync::OnceLock;

fn bold_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*|__(.*?)__").expect("static pattern"))
}

/// Split a line into plain and bold runs.
///
/// Matches are found left to right without overlap. Joining
/// [`StyledRun::source`] over the result reproduces `line` exactly; joining
/// `text` reproduces it with the matched delimiters removed.
///
/// # Example
/// ```
/// use docmd::parser::parse_inline;
///
/// let runs = parse_inline("Some **bold** text.");
/// assert_eq!(runs.len(), 3);
/// assert!(runs[1].bold);
/// assert_eq!(runs[1].text, "bold");
/// ```
pub fn parse_inline(line: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut cursor = 0;

    for caps in bold_regex().captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if whole.start() > cursor {
            runs.push(StyledRun::plain(&line[cursor..whole.start()]));
        }

        let run = match (caps.get(1), caps.get(2)) {
            (Some(inner), _) => StyledRun::bold_with(inner.as_str(), BoldMarker::Asterisks),
            (None, Some(inner)) => StyledRun::bold_with(inner.as_str(), BoldMarker::Underscores),
            (None, None) => continue,
        };
        runs.push(run);
        cursor = whole.end();
    }

    if cursor < line.len() {
        runs.push(StyledRun::plain(&line[cursor..]));
    }

    if runs.is_empty() {
        runs.push(StyledRun::plain(line));
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_of(runs: &[StyledRun]) -> String {
        runs.iter().map(StyledRun::source).collect()
    }

    #[test]
    fn test_no_markers_single_plain_run() {
        let runs = parse_inline("just text with *italic*");
        assert_eq!(runs, vec![StyledRun::plain("just text with *italic*")]);
    }

    #[test]
    fn test_bold_in_middle() {
        let runs = parse_inline("Some **bold** text.");
        assert_eq!(
            runs,
            vec![
                StyledRun::plain("Some "),
                StyledRun::bold("bold"),
                StyledRun::plain(" text."),
            ]
        );
    }

    #[test]
    fn test_underscore_and_adjacent_runs() {
        let runs = parse_inline("__a__**b**");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].marker, Some(BoldMarker::Underscores));
        assert_eq!(runs[1].text, "b");
    }

    #[test]
    fn test_source_concatenation_reproduces_line() {
        for line in [
            "",
            "plain",
            "**all bold**",
            "x **a** y __b__ z",
            "**** empty bold",
            "unbalanced **open",
            "mixed **a__b** c__d__",
            "ünïcödé **wörds** ok",
        ] {
            assert_eq!(source_of(&parse_inline(line)), line, "{line:?}");
        }
    }

    #[test]
    fn test_unbalanced_marker_kept_plain() {
        let runs = parse_inline("unbalanced **open");
        assert_eq!(runs, vec![StyledRun::plain("unbalanced **open")]);
    }
}
