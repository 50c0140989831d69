//! Integration tests for format detection.

use std::io::Write;

use docmd::detect::{
    detect, detect_format_from_bytes, detect_format_from_path, DetectedFormat, FormatDetector,
    HeuristicDetector, SourceFormat,
};
use docmd::Error;

#[test]
fn test_every_markdown_feature_is_detected() {
    let samples = [
        "# Heading",
        "intro\n- bullet",
        "intro\n+ bullet",
        "1. first",
        "> quoted",
        "```\nlet x = 1;\n```",
        "see [docs](https://example.com)",
        "some **bold** text",
        "some *italic* text",
        "| a | b |",
    ];

    for sample in samples {
        assert_eq!(detect(sample), DetectedFormat::Markdown, "sample: {sample:?}");
    }
}

#[test]
fn test_markup_wins_over_markdown_lookalikes() {
    let html = r##"<p title="# not a heading">**still** html</p>"##;
    assert_eq!(detect(html), DetectedFormat::RichDoc);
    assert_eq!(detect("<br/>"), DetectedFormat::RichDoc);
}

#[test]
fn test_plain_prose_falls_back_to_rich_doc() {
    assert_eq!(detect("Dear reader, thanks."), DetectedFormat::RichDoc);
}

#[test]
fn test_blank_input_is_unknown() {
    assert_eq!(detect(""), DetectedFormat::Unknown);
    assert_eq!(detect("\n \t\n"), DetectedFormat::Unknown);
}

#[test]
fn test_custom_detector_is_pluggable() {
    struct AlwaysMarkdown;

    impl FormatDetector for AlwaysMarkdown {
        fn detect(&self, _text: &str) -> DetectedFormat {
            DetectedFormat::Markdown
        }
    }

    let detectors: Vec<Box<dyn FormatDetector>> =
        vec![Box::new(HeuristicDetector::new()), Box::new(AlwaysMarkdown)];
    let results: Vec<DetectedFormat> = detectors
        .iter()
        .map(|d| d.detect("plain words"))
        .collect();
    assert_eq!(
        results,
        vec![DetectedFormat::RichDoc, DetectedFormat::Markdown]
    );
}

#[test]
fn test_bytes_detection() {
    assert_eq!(
        detect_format_from_bytes(b"PK\x03\x04rest").unwrap(),
        SourceFormat::Docx
    );
    assert_eq!(
        detect_format_from_bytes(b"## Title").unwrap(),
        SourceFormat::Markdown
    );
    assert_eq!(
        detect_format_from_bytes(b"<p>x</p>").unwrap(),
        SourceFormat::Html
    );
    assert!(matches!(
        detect_format_from_bytes(b""),
        Err(Error::UnknownFormat)
    ));
    assert!(matches!(
        detect_format_from_bytes(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
        Err(Error::UnsupportedFormat(_))
    ));
    assert!(matches!(
        detect_format_from_bytes(&[0xFF, 0xFE, 0xFD]),
        Err(Error::UnknownFormat)
    ));
}

#[test]
fn test_path_detection() {
    let dir = tempfile::tempdir().unwrap();

    let md = dir.path().join("notes.md");
    std::fs::write(&md, "# Notes").unwrap();
    assert_eq!(detect_format_from_path(&md).unwrap(), SourceFormat::Markdown);

    let fake_docx = dir.path().join("report.docx");
    let mut file = std::fs::File::create(&fake_docx).unwrap();
    file.write_all(b"not a zip").unwrap();
    assert!(matches!(
        detect_format_from_path(&fake_docx),
        Err(Error::UnsupportedFormat(_))
    ));

    let pdf = dir.path().join("scan.pdf");
    std::fs::write(&pdf, "%PDF-1.7").unwrap();
    assert!(matches!(
        detect_format_from_path(&pdf),
        Err(Error::UnsupportedExtension(_))
    ));
}
