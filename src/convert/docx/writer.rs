//! DOCX packaging of compiled documents.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{BULLET_NUM_ID, DECIMAL_NUM_ID, DOCUMENT_PART, DOCUMENT_RELS_PART, NUMBERING_PART};
use crate::convert::DocumentPackager;
use crate::error::Result;
use crate::model::{DocumentNode, StyledRun};

const CODE_FONT: &str = "Courier New";

/// Writes document nodes as a `.docx` package.
///
/// Headings use the `Heading1`..`Heading6` styles, list items reference one
/// bullet and one decimal numbering definition, quotes are indented with a
/// left border and code blocks are shaded paragraphs in a fixed-width font.
#[derive(Debug, Clone, Default)]
pub struct DocxPackager {
    _private: (),
}

impl DocxPackager {
    /// Create a new packager.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build the `word/document.xml` part.
    pub fn document_xml(&self, nodes: &[DocumentNode]) -> String {
        let body: Vec<String> = nodes.iter().map(paragraph_xml).collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<w:body>
{}
<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>
</w:body>
</w:document>"#,
            body.join("\n")
        )
    }
}

impl DocumentPackager for DocxPackager {
    fn name(&self) -> &str {
        "docx"
    }

    fn pack(&self, nodes: &[DocumentNode]) -> Result<Vec<u8>> {
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", RELS_XML.to_string()),
            (DOCUMENT_PART, self.document_xml(nodes)),
            ("word/styles.xml", styles_xml()),
            (NUMBERING_PART, NUMBERING_XML.to_string()),
            (DOCUMENT_RELS_PART, DOCUMENT_RELS_XML.to_string()),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in parts {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
        }

        let bytes = zip.finish()?.into_inner();
        log::debug!("packed {} nodes into {} bytes of DOCX", nodes.len(), bytes.len());
        Ok(bytes)
    }
}

fn paragraph_xml(node: &DocumentNode) -> String {
    match node {
        DocumentNode::Heading { level, text } => format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading{}"/></w:pPr>{}</w:p>"#,
            level,
            run_xml(text, false)
        ),
        DocumentNode::Rule => {
            r#"<w:p><w:pPr><w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="auto"/></w:pBdr></w:pPr></w:p>"#
                .to_string()
        }
        DocumentNode::Quote { text } => format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Quote"/><w:pBdr><w:left w:val="single" w:sz="10" w:space="10" w:color="CCCCCC"/></w:pBdr><w:ind w:left="720"/></w:pPr>{}</w:p>"#,
            run_xml(text, false)
        ),
        DocumentNode::BulletItem { text } => list_item_xml(BULLET_NUM_ID, text),
        DocumentNode::NumberedItem { text, .. } => list_item_xml(DECIMAL_NUM_ID, text),
        DocumentNode::CodeBlock { text } => {
            let lines: Vec<String> = text
                .lines()
                .map(|line| format!(r#"<w:t xml:space="preserve">{}</w:t>"#, escape(line)))
                .collect();
            format!(
                r#"<w:p><w:pPr><w:pStyle w:val="Code"/><w:shd w:val="solid" w:color="F5F5F5" w:fill="F5F5F5"/></w:pPr><w:r><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/></w:rPr>{}</w:r></w:p>"#,
                lines.join("<w:br/>"),
                font = CODE_FONT
            )
        }
        DocumentNode::Paragraph { runs } => {
            let runs: String = runs.iter().map(styled_run_xml).collect();
            format!("<w:p>{}</w:p>", runs)
        }
    }
}

fn list_item_xml(num_id: u32, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="{}"/></w:numPr></w:pPr>{}</w:p>"#,
        num_id,
        run_xml(text, false)
    )
}

fn styled_run_xml(run: &StyledRun) -> String {
    run_xml(&run.text, run.bold)
}

fn run_xml(text: &str, bold: bool) -> String {
    if text.is_empty() {
        return String::new();
    }
    let properties = if bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!(
        r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        properties,
        escape(text)
    )
}

fn styles_xml() -> String {
    const HEADING_SIZES: [u32; 6] = [32, 28, 26, 24, 22, 22];

    let headings: String = HEADING_SIZES
        .iter()
        .enumerate()
        .map(|(i, size)| {
            format!(
                r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="{outline}"/></w:pPr><w:rPr><w:b/><w:sz w:val="{size}"/></w:rPr></w:style>
"#,
                level = i + 1,
                outline = i,
                size = size
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
{headings}<w:style w:type="paragraph" w:styleId="Quote"><w:name w:val="Quote"/><w:basedOn w:val="Normal"/><w:qFormat/><w:rPr><w:i/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Code"><w:name w:val="Code"/><w:basedOn w:val="Normal"/><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/><w:sz w:val="20"/></w:rPr></w:style>
</w:styles>"#,
        headings = headings,
        font = CODE_FONT
    )
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#;

// Bullet list is numId 1, the shared decimal list numId 2.
const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:abstractNum w:abstractNumId="1"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="260"/></w:pPr></w:lvl></w:abstractNum>
<w:abstractNum w:abstractNumId="2"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/><w:lvlJc w:val="start"/><w:pPr><w:ind w:left="720" w:hanging="260"/></w:pPr></w:lvl></w:abstractNum>
<w:num w:numId="1"><w:abstractNumId w:val="1"/></w:num>
<w:num w:numId="2"><w:abstractNumId w:val="2"/></w:num>
</w:numbering>"#;
