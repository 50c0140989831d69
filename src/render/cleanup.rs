//! Text cleanup passes applied to rendered Markdown.
//!
//! The free functions are the individual passes; [`CleanupPipeline`] runs the
//! ones enabled in [`CleanupOptions`] in a fixed order.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Non-breaking spaces and blank-line collapsing only
    Minimal,
    /// Minimal + trailing whitespace + Unicode NFC
    #[default]
    Standard,
    /// Standard + invisible character removal, plus residual tag stripping
    /// and entity decoding on unparsed text
    Aggressive,
}

/// Options for text cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Replace non-breaking spaces with plain spaces
    pub normalize_nbsp: bool,

    /// Remove trailing whitespace on every line
    pub trim_trailing_whitespace: bool,

    /// Remove any markup tags left in the text
    pub strip_residual_tags: bool,

    /// Decode the basic HTML entities
    pub decode_entities: bool,

    /// Remove zero-width characters, byte order marks, U+FFFD and
    /// Private Use Area characters
    pub remove_invisible: bool,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
            CleanupPreset::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: false,
            normalize_nbsp: true,
            trim_trailing_whitespace: false,
            strip_residual_tags: false,
            decode_entities: false,
            remove_invisible: false,
            max_consecutive_newlines: 2,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            trim_trailing_whitespace: true,
            ..Self::minimal()
        }
    }

    /// Aggressive cleanup options, for text that still carries markup.
    pub fn aggressive() -> Self {
        Self {
            strip_residual_tags: true,
            decode_entities: true,
            remove_invisible: true,
            ..Self::standard()
        }
    }

    /// The same options without the markup passes.
    ///
    /// Text that came out of an HTML parse has no tags left and its entities
    /// are already decoded, so running those passes again would remove
    /// literal `<...>` text and decode `&amp;lt;` twice.
    pub fn for_parsed_text(self) -> Self {
        Self {
            strip_residual_tags: false,
            decode_entities: false,
            ..self
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text cleanup pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        // Tags go before entities so that decoded `&lt;` is never stripped.
        // Both passes expect unparsed text.
        if self.options.strip_residual_tags {
            result = strip_tags(&result);
        }

        if self.options.decode_entities {
            result = decode_entities(&result);
        }

        if self.options.remove_invisible {
            result = remove_invisible_chars(&result);
        }

        if self.options.normalize_nbsp {
            result = normalize_nbsp(&result);
        }

        if self.options.trim_trailing_whitespace {
            result = trim_trailing_whitespace(&result);
        }

        if self.options.max_consecutive_newlines > 0 {
            result = limit_newlines(&result, self.options.max_consecutive_newlines);
        }

        result
    }
}

/// Remove every `<...>` tag.
pub fn strip_tags(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("static pattern"));
    re.replace_all(text, "").into_owned()
}

/// Decode `&lt; &gt; &amp; &quot; &#39;`.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Replace non-breaking spaces, literal or as `&nbsp;`, with plain spaces.
pub fn normalize_nbsp(text: &str) -> String {
    text.replace('\u{00A0}', " ").replace("&nbsp;", " ")
}

/// Collapse three or more consecutive newlines into one blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    limit_newlines(text, 2)
}

/// Remove zero-width characters, byte order marks, U+FFFD and Private Use
/// Area characters.
pub fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            !matches!(code, 0x200B..=0x200D | 0x2060 | 0xFEFF | 0xFFFD)
                && !(0xE000..=0xF8FF).contains(&code)
                && !(0xF0000..=0xFFFFD).contains(&code)
                && !(0x100000..=0x10FFFD).contains(&code)
        })
        .collect()
}

fn limit_newlines(text: &str, max: u8) -> String {
    let max = max as usize;
    let mut result = String::with_capacity(text.len());
    let mut run = 0;
    for c in text.chars() {
        if c == '\n' {
            run += 1;
            if run > max {
                continue;
            }
        } else {
            run = 0;
        }
        result.push(c);
    }
    result
}

fn trim_trailing_whitespace(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?m)[ \t]+$").expect("static pattern"));
    re.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("a <b>bold</b> <br/>c"), "a bold c");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(
            decode_entities("&lt;p&gt; &amp; &quot;q&quot; &#39;s&#39;"),
            "<p> & \"q\" 's'"
        );
    }

    #[test]
    fn test_strip_and_decode_idempotent_on_clean_markdown() {
        let clean = "# Title\n\nSome **bold** text and a [link](http://x).\n\n- a\n- b\n";
        let once = decode_entities(&strip_tags(clean));
        let twice = decode_entities(&strip_tags(&once));
        assert_eq!(once, clean);
        assert_eq!(twice, clean);
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb\n\nc\n"), "a\n\nb\n\nc\n");
    }

    #[test]
    fn test_normalize_nbsp() {
        assert_eq!(normalize_nbsp("a\u{00A0}b&nbsp;c"), "a b c");
    }

    #[test]
    fn test_standard_pipeline() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        let result = pipeline.process("e\u{0301}  \n\n\n\nnext\u{00A0}word");
        assert_eq!(result, "\u{00E9}\n\nnext word");
    }

    #[test]
    fn test_aggressive_pipeline() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Aggressive);
        assert_eq!(pipeline.process("<span>1 &lt; 2</span>"), "1 < 2");
    }

    #[test]
    fn test_limit_newlines() {
        assert_eq!(limit_newlines("a\n\n\n\nb\nc\n\n\n", 2), "a\n\nb\nc\n\n");
        assert_eq!(limit_newlines("a\n\n\nb", 1), "a\nb");
        assert_eq!(limit_newlines("no breaks", 2), "no breaks");
    }

    #[test]
    fn test_remove_invisible_chars() {
        assert_eq!(
            remove_invisible_chars("\u{FEFF}zero\u{200B}width\u{FFFD} \u{E001}ok"),
            "zerowidth ok"
        );
    }

    #[test]
    fn test_parsed_text_options_skip_markup_passes() {
        let options = CleanupOptions::aggressive().for_parsed_text();
        assert!(!options.strip_residual_tags);
        assert!(!options.decode_entities);
        assert!(options.remove_invisible);

        let pipeline = CleanupPipeline::new(options);
        assert_eq!(pipeline.process("Use <div> and &lt;"), "Use <div> and &lt;");
    }

    #[test]
    fn test_minimal_keeps_trailing_whitespace() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Minimal);
        assert_eq!(pipeline.process("a  \nb"), "a  \nb");
    }
}
