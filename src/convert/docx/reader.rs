//! DOCX to HTML extraction.

use std::collections::{BTreeSet, HashMap};
use std::io::{Cursor, Read, Seek};

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::{DOCUMENT_PART, DOCUMENT_RELS_PART, NUMBERING_PART};
use crate::convert::{Extraction, HtmlExtractor};
use crate::error::{Error, Result};

/// Fonts that mark a run as code.
const MONOSPACE_FONTS: &[&str] = &["courier", "consolas", "mono", "menlo"];

/// Elements that carry content this extractor cannot express.
const UNSUPPORTED_ELEMENTS: &[&str] = &[
    "drawing",
    "pict",
    "object",
    "oMath",
    "oMathPara",
    "footnoteReference",
    "endnoteReference",
    "commentReference",
];

/// Reads a `.docx` package and produces HTML.
///
/// Paragraph styles decide the HTML element: `HeadingN` and `Title` become
/// headings, `Quote` or an indented left-bordered paragraph a block quote,
/// `Code` or fixed-width runs a code block, and an empty bottom-bordered
/// paragraph a rule. Numbered paragraphs are grouped into `<ul>`/`<ol>`
/// according to `word/numbering.xml`. The first table row becomes the header.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor {
    _private: (),
}

impl DocxExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl HtmlExtractor for DocxExtractor {
    fn name(&self) -> &str {
        "docx"
    }

    fn extract(&self, bytes: &[u8]) -> Result<Extraction> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::collaborator("docx", format!("not a DOCX package: {}", e)))?;

        let document = read_part(&mut archive, DOCUMENT_PART)?.ok_or_else(|| {
            Error::collaborator("docx", format!("package has no {}", DOCUMENT_PART))
        })?;
        let numbering = match read_part(&mut archive, NUMBERING_PART)? {
            Some(xml) => parse_numbering(&xml)?,
            None => HashMap::new(),
        };
        let links = match read_part(&mut archive, DOCUMENT_RELS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let mut walker = DocumentWalker::new(numbering, links);
        walker.parse(&document)?;
        let extraction = walker.finish();

        log::debug!(
            "extracted {} bytes of HTML from DOCX ({} messages)",
            extraction.html.len(),
            extraction.messages.len()
        );
        Ok(extraction)
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

fn attr(element: &BytesStart, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .with_checks(false)
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Whether a toggle property such as `<w:b/>` is switched on.
fn toggle_on(element: &BytesStart) -> bool {
    !matches!(
        attr(element, b"val").as_deref(),
        Some("0") | Some("false") | Some("off") | Some("none")
    )
}

/// Map numbering instance ids to "is ordered".
fn parse_numbering(xml: &str) -> Result<HashMap<String, bool>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut formats: HashMap<String, String> = HashMap::new();
    let mut instances: HashMap<String, String> = HashMap::new();
    let mut current_abstract: Option<String> = None;
    let mut current_num: Option<String> = None;
    let mut in_first_level = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"abstractNum" => current_abstract = attr(&e, b"abstractNumId"),
                b"lvl" => in_first_level = attr(&e, b"ilvl").as_deref() == Some("0"),
                b"numFmt" if in_first_level => {
                    if let (Some(id), Some(format)) = (&current_abstract, attr(&e, b"val")) {
                        formats.entry(id.clone()).or_insert(format);
                    }
                }
                b"num" => current_num = attr(&e, b"numId"),
                b"abstractNumId" => {
                    if let (Some(num), Some(id)) = (&current_num, attr(&e, b"val")) {
                        instances.insert(num.clone(), id);
                    }
                }
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"abstractNum" => current_abstract = None,
                b"lvl" => in_first_level = false,
                b"num" => current_num = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(instances
        .into_iter()
        .filter_map(|(num, id)| formats.get(&id).map(|format| (num, format != "bullet")))
        .collect())
}

/// Map relationship ids to their targets.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(targets)
}

#[derive(Debug, Default)]
struct Run {
    text: String,
    bold: bool,
    italic: bool,
    monospace: bool,
    link: Option<String>,
}

impl Run {
    fn same_style(&self, other: &Run) -> bool {
        self.bold == other.bold && self.italic == other.italic && self.link == other.link
    }
}

#[derive(Debug, Default)]
struct Paragraph {
    style: Option<String>,
    num_id: Option<String>,
    left_border: bool,
    bottom_border: bool,
    indented: bool,
    runs: Vec<Run>,
}

impl Paragraph {
    fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Default)]
struct TableState {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Vec<String>,
}

#[derive(Debug)]
enum Block {
    Heading(u8, String),
    Paragraph(String),
    ListItem { ordered: bool, html: String },
    /// `styled` is set for paragraphs carrying a code paragraph style.
    Code { text: String, styled: bool },
    Quote(String),
    Rule,
    Table(Vec<Vec<String>>),
}

/// Streaming walk over `word/document.xml`.
struct DocumentWalker {
    numbering: HashMap<String, bool>,
    links: HashMap<String, String>,

    blocks: Vec<Block>,
    messages: BTreeSet<String>,

    paragraph: Option<Paragraph>,
    run: Option<Run>,
    link: Option<String>,
    tables: Vec<TableState>,

    in_paragraph_props: bool,
    in_run_props: bool,
    in_border: bool,
    in_text: bool,
}

impl DocumentWalker {
    fn new(numbering: HashMap<String, bool>, links: HashMap<String, String>) -> Self {
        Self {
            numbering,
            links,
            blocks: Vec::new(),
            messages: BTreeSet::new(),
            paragraph: None,
            run: None,
            link: None,
            tables: Vec::new(),
            in_paragraph_props: false,
            in_run_props: false,
            in_border: false,
            in_text: false,
        }
    }

    fn parse(&mut self, xml: &str) -> Result<()> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => self.open(&e, false),
                Event::Empty(e) => self.open(&e, true),
                Event::Text(t) => {
                    if self.in_text {
                        let text = t.unescape()?;
                        if let Some(run) = self.run.as_mut() {
                            run.text.push_str(&text);
                        }
                    }
                }
                Event::End(e) => self.close(e.local_name().as_ref()),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    fn open(&mut self, e: &BytesStart, empty: bool) {
        let name = e.local_name();
        let name = name.as_ref();

        match name {
            b"p" if !empty => self.paragraph = Some(Paragraph::default()),
            b"pPr" if !empty => self.in_paragraph_props = true,
            b"pBdr" if !empty => self.in_border = true,
            b"pStyle" if self.in_paragraph_props => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.style = attr(e, b"val");
                }
            }
            b"numId" if self.in_paragraph_props => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.num_id = attr(e, b"val").filter(|id| id != "0");
                }
            }
            b"left" | b"start" if self.in_border => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.left_border = has_border(e);
                }
            }
            b"bottom" if self.in_border => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.bottom_border = has_border(e);
                }
            }
            b"ind" if self.in_paragraph_props => {
                let left = attr(e, b"left").or_else(|| attr(e, b"start"));
                if let Some(p) = self.paragraph.as_mut() {
                    p.indented = left.and_then(|v| v.parse::<i64>().ok()).unwrap_or(0) > 0;
                }
            }
            b"r" if !empty => {
                self.run = Some(Run {
                    link: self.link.clone(),
                    ..Run::default()
                });
            }
            b"rPr" if !empty && self.run.is_some() => self.in_run_props = true,
            b"b" if self.in_run_props => {
                if let Some(run) = self.run.as_mut() {
                    run.bold = toggle_on(e);
                }
            }
            b"i" if self.in_run_props => {
                if let Some(run) = self.run.as_mut() {
                    run.italic = toggle_on(e);
                }
            }
            b"rFonts" if self.in_run_props => {
                let font = attr(e, b"ascii").unwrap_or_default().to_lowercase();
                if let Some(run) = self.run.as_mut() {
                    run.monospace = MONOSPACE_FONTS.iter().any(|m| font.contains(m));
                }
            }
            b"t" if !empty => self.in_text = true,
            b"br" | b"cr" => {
                if let Some(run) = self.run.as_mut() {
                    run.text.push('\n');
                }
            }
            b"tab" if !self.in_paragraph_props => {
                if let Some(run) = self.run.as_mut() {
                    run.text.push('\t');
                }
            }
            b"hyperlink" if !empty => {
                self.link = attr(e, b"id")
                    .and_then(|id| self.links.get(&id).cloned())
                    .or_else(|| attr(e, b"anchor").map(|a| format!("#{}", a)));
            }
            b"tbl" if !empty => self.tables.push(TableState::default()),
            b"tr" if !empty => {
                if let Some(table) = self.tables.last_mut() {
                    table.row.clear();
                }
            }
            b"tc" if !empty => {
                if let Some(table) = self.tables.last_mut() {
                    table.cell.clear();
                }
            }
            _ => {
                if let Ok(local) = std::str::from_utf8(name) {
                    if UNSUPPORTED_ELEMENTS.contains(&local) {
                        self.messages
                            .insert(format!("Unsupported element ignored: {}", local));
                    }
                }
            }
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"pPr" => self.in_paragraph_props = false,
            b"rPr" => self.in_run_props = false,
            b"pBdr" => self.in_border = false,
            b"r" => {
                if let (Some(run), Some(p)) = (self.run.take(), self.paragraph.as_mut()) {
                    if !run.text.is_empty() {
                        p.runs.push(run);
                    }
                }
            }
            b"hyperlink" => self.link = None,
            b"p" => {
                if let Some(p) = self.paragraph.take() {
                    self.finish_paragraph(p);
                }
            }
            b"tc" => {
                if let Some(table) = self.tables.last_mut() {
                    let cell = table.cell.join(" ");
                    table.row.push(cell);
                }
            }
            b"tr" => {
                if let Some(table) = self.tables.last_mut() {
                    if !table.row.is_empty() {
                        let row = std::mem::take(&mut table.row);
                        table.rows.push(row);
                    }
                }
            }
            b"tbl" => {
                if let Some(table) = self.tables.pop() {
                    self.finish_table(table);
                }
            }
            _ => {}
        }
    }

    fn finish_table(&mut self, table: TableState) {
        if table.rows.is_empty() {
            return;
        }
        match self.tables.last_mut() {
            // Tables inside a cell are flattened to their text.
            Some(parent) => {
                let text: Vec<String> = table.rows.into_iter().flatten().collect();
                parent.cell.push(text.join(" "));
            }
            None => self.blocks.push(Block::Table(table.rows)),
        }
    }

    fn finish_paragraph(&mut self, p: Paragraph) {
        if let Some(table) = self.tables.last_mut() {
            let html = inline_html(&p.runs);
            if !html.trim().is_empty() {
                table.cell.push(html);
            }
            return;
        }

        let text = p.text();
        let style = p.style.clone().unwrap_or_default();

        if text.trim().is_empty() {
            if p.bottom_border {
                self.blocks.push(Block::Rule);
            }
            return;
        }

        if let Some(level) = heading_level(&style) {
            let html = escape(text.trim()).into_owned();
            self.blocks.push(Block::Heading(level, html));
            return;
        }

        let code_style = matches!(
            style.to_ascii_lowercase().as_str(),
            "code" | "codeblock" | "htmlpreformatted" | "sourcecode"
        );
        if code_style {
            self.blocks.push(Block::Code { text, styled: true });
            return;
        }
        if p.runs.iter().all(|r| r.monospace || r.text.trim().is_empty()) {
            // Unstyled fixed-width lines are usually one paragraph per line.
            if let Some(Block::Code { text: code, styled: false }) = self.blocks.last_mut() {
                code.push('\n');
                code.push_str(&text);
            } else {
                self.blocks.push(Block::Code { text, styled: false });
            }
            return;
        }

        let html = inline_html(&p.runs);

        let quote_style = matches!(
            style.to_ascii_lowercase().as_str(),
            "quote" | "intensequote"
        );
        if quote_style || (p.left_border && p.indented) {
            self.blocks.push(Block::Quote(html));
            return;
        }

        if let Some(id) = p.num_id {
            let ordered = match self.numbering.get(&id) {
                Some(ordered) => *ordered,
                None => {
                    self.messages
                        .insert(format!("Numbering {} not defined; treated as a bullet list", id));
                    false
                }
            };
            self.blocks.push(Block::ListItem { ordered, html });
            return;
        }

        self.blocks.push(Block::Paragraph(html));
    }

    fn finish(self) -> Extraction {
        Extraction {
            html: blocks_to_html(&self.blocks),
            messages: self.messages.into_iter().collect(),
        }
    }
}

fn has_border(e: &BytesStart) -> bool {
    !matches!(attr(e, b"val").as_deref(), None | Some("nil") | Some("none"))
}

fn heading_level(style: &str) -> Option<u8> {
    let lower = style.to_ascii_lowercase();
    match lower.as_str() {
        "title" => return Some(1),
        "subtitle" => return Some(2),
        _ => {}
    }
    lower
        .strip_prefix("heading")
        .and_then(|n| n.trim().parse::<u8>().ok())
        .filter(|n| (1..=9).contains(n))
        .map(|n| n.min(6))
}

/// Render runs as inline HTML, merging neighbours with the same style.
fn inline_html(runs: &[Run]) -> String {
    let mut merged: Vec<Run> = Vec::new();
    for run in runs {
        match merged.last_mut() {
            Some(last) if last.same_style(run) => last.text.push_str(&run.text),
            _ => merged.push(Run {
                text: run.text.clone(),
                bold: run.bold,
                italic: run.italic,
                monospace: run.monospace,
                link: run.link.clone(),
            }),
        }
    }

    let mut html = String::new();
    for run in &merged {
        let mut text = escape(&run.text)
            .replace('\n', "<br>")
            .replace('\t', " ");
        let styled = !run.text.trim().is_empty();
        if run.italic && styled {
            text = format!("<em>{}</em>", text);
        }
        if run.bold && styled {
            text = format!("<strong>{}</strong>", text);
        }
        if let Some(ref href) = run.link {
            text = format!("<a href=\"{}\">{}</a>", escape(href), text);
        }
        html.push_str(&text);
    }
    html
}

fn blocks_to_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    let mut open_list: Option<bool> = None;

    for block in blocks {
        let list = match block {
            Block::ListItem { ordered, .. } => Some(*ordered),
            _ => None,
        };
        if list != open_list {
            close_list(&mut html, open_list);
            match list {
                Some(true) => html.push_str("<ol>\n"),
                Some(false) => html.push_str("<ul>\n"),
                None => {}
            }
            open_list = list;
        }

        match block {
            Block::Heading(level, text) => {
                html.push_str(&format!("<h{level}>{}</h{level}>\n", text));
            }
            Block::Paragraph(text) => html.push_str(&format!("<p>{}</p>\n", text)),
            Block::ListItem { html: item, .. } => {
                html.push_str(&format!("<li>{}</li>\n", item));
            }
            Block::Code { text: code, .. } => {
                html.push_str(&format!("<pre><code>{}</code></pre>\n", escape(code)));
            }
            Block::Quote(text) => {
                html.push_str(&format!("<blockquote><p>{}</p></blockquote>\n", text));
            }
            Block::Rule => html.push_str("<hr>\n"),
            Block::Table(rows) => html.push_str(&table_html(rows)),
        }
    }
    close_list(&mut html, open_list);

    html
}

fn close_list(html: &mut String, open: Option<bool>) {
    match open {
        Some(true) => html.push_str("</ol>\n"),
        Some(false) => html.push_str("</ul>\n"),
        None => {}
    }
}

fn table_html(rows: &[Vec<String>]) -> String {
    let mut html = String::from("<table>\n");
    if let Some((header, body)) = rows.split_first() {
        html.push_str("<thead><tr>");
        for cell in header {
            html.push_str(&format!("<th>{}</th>", cell));
        }
        html.push_str("</tr></thead>\n");

        if !body.is_empty() {
            html.push_str("<tbody>\n");
            for row in body {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str(&format!("<td>{}</td>", cell));
                }
                html.push_str("</tr>\n");
            }
            html.push_str("</tbody>\n");
        }
    }
    html.push_str("</table>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

    fn walk(body: &str, numbering: &[(&str, bool)], links: &[(&str, &str)]) -> Extraction {
        let xml = format!("<w:document {}><w:body>{}</w:body></w:document>", W, body);
        let numbering = numbering
            .iter()
            .map(|(id, ordered)| (id.to_string(), *ordered))
            .collect();
        let links = links
            .iter()
            .map(|(id, target)| (id.to_string(), target.to_string()))
            .collect();
        let mut walker = DocumentWalker::new(numbering, links);
        walker.parse(&xml).unwrap();
        walker.finish()
    }

    #[test]
    fn test_heading_and_bold_runs() {
        let out = walk(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Some </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>bold</w:t></w:r><w:r><w:t xml:space="preserve"> text.</w:t></w:r></w:p>"#,
            &[],
            &[],
        );
        assert_eq!(
            out.html,
            "<h2>Title</h2>\n<p>Some <strong>bold</strong> text.</p>\n"
        );
        assert!(out.messages.is_empty());
    }

    #[test]
    fn test_lists_grouped_by_numbering_format() {
        let out = walk(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>a</w:t></w:r></w:p>
<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>b</w:t></w:r></w:p>
<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="2"/></w:numPr></w:pPr><w:r><w:t>c</w:t></w:r></w:p>"#,
            &[("1", false), ("2", true)],
            &[],
        );
        assert_eq!(
            out.html,
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<ol>\n<li>c</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_unknown_numbering_reported() {
        let out = walk(
            r#"<w:p><w:pPr><w:numPr><w:numId w:val="7"/></w:numPr></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
            &[],
            &[],
        );
        assert_eq!(out.html, "<ul>\n<li>x</li>\n</ul>\n");
        assert_eq!(out.messages.len(), 1);
    }

    #[test]
    fn test_code_quote_and_rule() {
        let out = walk(
            r#"<w:p><w:pPr><w:pStyle w:val="Code"/></w:pPr><w:r><w:t>a &lt; b</w:t><w:br/><w:t>c</w:t></w:r></w:p>
<w:p><w:pPr><w:pBdr><w:left w:val="single" w:sz="10"/></w:pBdr><w:ind w:left="720"/></w:pPr><w:r><w:t>quoted</w:t></w:r></w:p>
<w:p><w:pPr><w:pBdr><w:bottom w:val="single" w:sz="6"/></w:pBdr></w:pPr></w:p>"#,
            &[],
            &[],
        );
        assert_eq!(
            out.html,
            "<pre><code>a &lt; b\nc</code></pre>\n<blockquote><p>quoted</p></blockquote>\n<hr>\n"
        );
    }

    #[test]
    fn test_code_styled_paragraphs_stay_separate() {
        let out = walk(
            r#"<w:p><w:pPr><w:pStyle w:val="Code"/></w:pPr><w:r><w:t>a</w:t></w:r></w:p>
<w:p><w:pPr><w:pStyle w:val="Code"/></w:pPr><w:r><w:t>b</w:t></w:r></w:p>"#,
            &[],
            &[],
        );
        assert_eq!(
            out.html,
            "<pre><code>a</code></pre>\n<pre><code>b</code></pre>\n"
        );
    }

    #[test]
    fn test_monospace_lines_merge_into_one_block() {
        let mono = r#"<w:rPr><w:rFonts w:ascii="Consolas"/></w:rPr>"#;
        let out = walk(
            &format!(
                r#"<w:p><w:r>{mono}<w:t>fn main() {{</w:t></w:r></w:p>
<w:p><w:r>{mono}<w:t>}}</w:t></w:r></w:p>
<w:p><w:pPr><w:pStyle w:val="Code"/></w:pPr><w:r><w:t>next</w:t></w:r></w:p>"#
            ),
            &[],
            &[],
        );
        assert_eq!(
            out.html,
            "<pre><code>fn main() {\n}</code></pre>\n<pre><code>next</code></pre>\n"
        );
    }

    #[test]
    fn test_table_first_row_is_header() {
        let out = walk(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:p><w:r><w:t>1</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>2</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
            &[],
            &[],
        );
        assert_eq!(
            out.html,
            "<table>\n<thead><tr><th>A</th><th>B</th></tr></thead>\n<tbody>\n<tr><td>1</td><td>2</td></tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn test_hyperlink_resolved_through_relationships() {
        let out = walk(
            r#"<w:p><w:r><w:t xml:space="preserve">See </w:t></w:r><w:hyperlink r:id="rId9"><w:r><w:t>docs</w:t></w:r></w:hyperlink></w:p>"#,
            &[],
            &[("rId9", "https://example.com")],
        );
        assert_eq!(
            out.html,
            "<p>See <a href=\"https://example.com\">docs</a></p>\n"
        );
    }

    #[test]
    fn test_drawing_reported() {
        let out = walk(
            r#"<w:p><w:r><w:drawing/></w:r><w:r><w:t>caption</w:t></w:r></w:p>"#,
            &[],
            &[],
        );
        assert_eq!(out.html, "<p>caption</p>\n");
        assert_eq!(out.messages, vec!["Unsupported element ignored: drawing"]);
    }

    #[test]
    fn test_parse_numbering() {
        let xml = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:abstractNum w:abstractNumId="1"><w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/></w:lvl></w:abstractNum>
<w:abstractNum w:abstractNumId="2"><w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/></w:lvl></w:abstractNum>
<w:num w:numId="1"><w:abstractNumId w:val="1"/></w:num>
<w:num w:numId="2"><w:abstractNumId w:val="2"/></w:num>
</w:numbering>"#;
        let map = parse_numbering(xml).unwrap();
        assert_eq!(map.get("1"), Some(&false));
        assert_eq!(map.get("2"), Some(&true));
    }

    #[test]
    fn test_not_a_package() {
        let err = DocxExtractor::new().extract(b"plain text").unwrap_err();
        assert!(err.is_collaborator());
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("Heading1"), Some(1));
        assert_eq!(heading_level("heading 3"), Some(3));
        assert_eq!(heading_level("Heading9"), Some(6));
        assert_eq!(heading_level("Title"), Some(1));
        assert_eq!(heading_level("Normal"), None);
    }
}
