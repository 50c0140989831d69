//! HTML to Markdown rendering.
//!
//! The input is parsed into a DOM with html5ever and walked once. Each element
//! kind maps to one Markdown construct, so nested lists, quotes and tables keep
//! their structure. Containers such as `div` and `span` are unwrapped and any
//! other unknown element contributes only its text.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::cleanup::{collapse_blank_lines, normalize_nbsp};
use super::visitor::{DefaultVisitor, DocumentVisitor, VisitorAction};
use super::{CleanupPipeline, RenderOptions, RenderResult, RenderStats, TableData};

/// Elements whose content never reaches the output.
const SKIPPED_ELEMENTS: &[&str] = &[
    "head", "script", "style", "title", "meta", "link", "template", "noscript",
];

/// Elements rendered as line-separated containers.
const CONTAINER_ELEMENTS: &[&str] = &[
    "div", "section", "article", "main", "header", "footer", "nav", "aside", "figure",
    "address", "details", "summary", "body", "html", "center",
];

/// Render HTML to Markdown with default options.
///
/// # Example
///
/// ```
/// let md = docmd::render::markdown::render("<h2>Notes</h2><p>Some <b>bold</b> text.</p>");
/// assert_eq!(md, "## Notes\n\nSome **bold** text.\n\n");
/// ```
pub fn render(html: &str) -> String {
    to_markdown(html, &RenderOptions::default())
}

/// Render HTML to Markdown.
pub fn to_markdown(html: &str, options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(html)
}

/// Render HTML to Markdown with statistics.
pub fn to_markdown_with_stats(html: &str, options: &RenderOptions) -> RenderResult {
    MarkdownRenderer::new(options.clone()).render_with_stats(html)
}

/// Markdown renderer over an html5ever DOM.
pub struct MarkdownRenderer {
    options: RenderOptions,
    visitor: Box<dyn DocumentVisitor>,
    stats: RenderStats,
    list_depth: usize,
    in_table_cell: bool,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            visitor: Box::new(DefaultVisitor),
            stats: RenderStats::new(),
            list_depth: 0,
            in_table_cell: false,
        }
    }

    /// Install a visitor that can replace or skip elements.
    pub fn with_visitor<V: DocumentVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitor = Box::new(visitor);
        self
    }

    /// Render HTML to Markdown.
    pub fn render(mut self, html: &str) -> String {
        self.render_internal(html)
    }

    /// Render HTML to Markdown with statistics.
    pub fn render_with_stats(mut self, html: &str) -> RenderResult {
        let content = self.render_internal(html);
        self.stats.count_text(&content);
        RenderResult::new(content, self.stats)
    }

    fn render_internal(&mut self, html: &str) -> String {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        // Full documents render their body only; head content is skipped.
        let root = find_element(&dom.document, "body").unwrap_or_else(|| dom.document.clone());

        let mut output = String::new();
        self.walk_children(&root, &mut output);

        let mut output = collapse_blank_lines(&normalize_nbsp(&output));

        if let Some(ref cleanup_options) = self.options.cleanup {
            let pipeline = CleanupPipeline::new(cleanup_options.clone().for_parsed_text());
            output = pipeline.process(&output);
        }

        log::debug!(
            "rendered {} bytes of HTML into {} bytes of Markdown ({} blocks)",
            html.len(),
            output.len(),
            self.stats.block_count()
        );

        output
    }

    fn walk_children(&mut self, handle: &Handle, out: &mut String) {
        for child in handle.children.borrow().iter() {
            self.walk(child, out);
        }
    }

    fn walk(&mut self, handle: &Handle, out: &mut String) {
        match &handle.data {
            NodeData::Document => self.walk_children(handle, out),
            NodeData::Text { contents } => push_text(out, &contents.borrow()),
            NodeData::Element { name, .. } => {
                let tag = name.local.as_ref();
                if SKIPPED_ELEMENTS.contains(&tag) {
                    return;
                }
                self.render_element(tag, handle, out);
            }
            _ => {}
        }
    }

    fn render_element(&mut self, tag: &str, handle: &Handle, out: &mut String) {
        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag.as_bytes()[1] - b'0';
                self.render_heading(level, handle, out);
            }
            "p" => self.render_paragraph(handle, out),
            "strong" | "b" => self.render_emphasis(handle, out, "**"),
            "em" | "i" => self.render_emphasis(handle, out, "*"),
            "a" => self.render_link(handle, out),
            "img" => self.render_image(handle, out),
            "ul" => self.render_list(handle, out, false),
            "ol" => self.render_list(handle, out, true),
            "pre" => self.render_code_block(handle, out),
            "code" => render_inline_code(handle, out),
            "hr" => {
                self.stats.horizontal_rule_count += 1;
                let action = self.visitor.visit_horizontal_rule();
                emit_block(out, action, "---\n\n".to_string());
            }
            "br" => {
                trim_trailing_spaces(out);
                out.push('\n');
            }
            "blockquote" => self.render_blockquote(handle, out),
            "table" => self.render_table(handle, out),
            _ if CONTAINER_ELEMENTS.contains(&tag) => {
                ensure_newline(out);
                self.walk_children(handle, out);
                ensure_newline(out);
            }
            // span, font, u, li outside a list and anything unknown
            _ => self.walk_children(handle, out),
        }
    }

    /// Render children into a fresh buffer and trim it.
    fn inline(&mut self, handle: &Handle) -> String {
        let mut buf = String::new();
        self.walk_children(handle, &mut buf);
        buf.trim().to_string()
    }

    fn render_heading(&mut self, level: u8, handle: &Handle, out: &mut String) {
        let text = single_line(&self.inline(handle));
        if text.is_empty() {
            return;
        }
        let level = level.min(self.options.max_heading_level);
        self.stats.heading_count += 1;

        let default = format!("{} {}\n\n", "#".repeat(level as usize), text);
        let action = self.visitor.visit_heading(&text, level);
        emit_block(out, action, default);
    }

    fn render_paragraph(&mut self, handle: &Handle, out: &mut String) {
        let text = self.inline(handle);
        if text.is_empty() {
            return;
        }
        self.stats.paragraph_count += 1;

        let default = format!("{}\n\n", text);
        let action = self.visitor.visit_paragraph(&text);
        emit_block(out, action, default);
    }

    fn render_emphasis(&mut self, handle: &Handle, out: &mut String, marker: &str) {
        let raw = text_content(handle);
        let inner = self.inline(handle);

        // Whitespace inside the tag moves outside the markers.
        let leading = raw.starts_with(|c: char| c.is_ascii_whitespace())
            && !out.is_empty()
            && !out.ends_with(|c: char| c.is_ascii_whitespace());
        let trailing = raw.ends_with(|c: char| c.is_ascii_whitespace());

        if inner.is_empty() {
            if leading || trailing {
                push_text(out, " ");
            }
            return;
        }

        if leading {
            out.push(' ');
        }
        out.push_str(marker);
        out.push_str(&inner);
        out.push_str(marker);
        if trailing {
            out.push(' ');
        }
    }

    fn render_link(&mut self, handle: &Handle, out: &mut String) {
        let text = single_line(&self.inline(handle));
        let href = attr(handle, "href").unwrap_or_default();
        if href.is_empty() {
            out.push_str(&text);
            return;
        }
        self.stats.link_count += 1;

        match self.visitor.visit_link(&text, &href) {
            VisitorAction::Skip => {}
            VisitorAction::Replace(replacement) => out.push_str(&replacement),
            VisitorAction::Continue => out.push_str(&format!("[{}]({})", text, href)),
        }
    }

    fn render_image(&mut self, handle: &Handle, out: &mut String) {
        let src = attr(handle, "src").unwrap_or_default();
        if src.is_empty() {
            return;
        }
        let alt = attr(handle, "alt").unwrap_or_default();
        self.stats.image_count += 1;

        match self.visitor.visit_image(&src, &alt) {
            VisitorAction::Skip => {}
            VisitorAction::Replace(replacement) => out.push_str(&replacement),
            VisitorAction::Continue => out.push_str(&format!("![{}]({})", alt, src)),
        }
    }

    fn render_list(&mut self, handle: &Handle, out: &mut String, ordered: bool) {
        let nested = self.list_depth > 0;
        self.list_depth += 1;

        let mut items = String::new();
        // Items are renumbered from 1; `start` and `value` are ignored.
        let mut index = 0u32;

        for child in handle.children.borrow().iter() {
            match element_name(child) {
                Some("li") => {}
                Some("ul") | Some("ol") => {
                    // A list directly inside a list belongs to the previous item.
                    let mut sublist = String::new();
                    self.walk(child, &mut sublist);
                    items.push_str(&indent_lines(sublist.trim_end(), 2));
                    items.push('\n');
                    continue;
                }
                _ => continue,
            }

            index += 1;
            let text = self.inline(child);
            let marker = if ordered {
                format!("{}.", index)
            } else {
                self.options.list_marker.to_string()
            };
            self.stats.list_item_count += 1;

            let line = match self.visitor.visit_list_item(&text, ordered, index) {
                VisitorAction::Skip => continue,
                VisitorAction::Replace(replacement) => replacement,
                VisitorAction::Continue => list_item(&marker, &text),
            };
            items.push_str(&line);
            if !line.ends_with('\n') {
                items.push('\n');
            }
        }

        self.list_depth -= 1;

        if items.is_empty() {
            return;
        }
        if nested {
            ensure_newline(out);
            out.push_str(&items);
        } else {
            ensure_blank_line(out);
            out.push_str(&items);
            out.push('\n');
        }
    }

    fn render_code_block(&mut self, handle: &Handle, out: &mut String) {
        let raw = text_content(handle);
        let code = raw.trim_end_matches('\n');
        if code.trim().is_empty() {
            return;
        }
        self.stats.code_block_count += 1;

        let fence = &self.options.code_fence;
        let default = format!("{fence}\n{code}\n{fence}\n\n");
        let action = self.visitor.visit_code_block(code);
        emit_block(out, action, default);
    }

    fn render_blockquote(&mut self, handle: &Handle, out: &mut String) {
        let text = self.inline(handle);
        if text.is_empty() {
            return;
        }
        self.stats.blockquote_count += 1;

        let quoted: Vec<String> = text
            .lines()
            .map(|line| {
                if line.trim().is_empty() {
                    ">".to_string()
                } else {
                    format!("> {}", line)
                }
            })
            .collect();
        let default = format!("{}\n\n", quoted.join("\n"));
        let action = self.visitor.visit_blockquote(&text);
        emit_block(out, action, default);
    }

    fn render_table(&mut self, handle: &Handle, out: &mut String) {
        // Tables inside a cell are flattened to their text.
        if self.in_table_cell {
            push_text(out, &text_content(handle));
            return;
        }

        let table = self.collect_table(handle);
        if table.is_empty() {
            return;
        }
        self.stats.table_count += 1;

        let default = table.to_markdown();
        let action = self.visitor.visit_table(&table);
        emit_block(out, action, default);
    }

    fn collect_table(&mut self, handle: &Handle) -> TableData {
        let mut table = TableData::new();
        let mut footer = Vec::new();

        for section in handle.children.borrow().iter() {
            match element_name(section) {
                Some("thead") => {
                    for row in child_elements(section, "tr") {
                        let cells = self.collect_cells(&row);
                        if table.header.is_empty() {
                            table.header = cells;
                        } else if !cells.is_empty() {
                            table.rows.push(cells);
                        }
                    }
                }
                Some("tbody") => {
                    for row in child_elements(section, "tr") {
                        let cells = self.collect_cells(&row);
                        if !cells.is_empty() {
                            table.rows.push(cells);
                        }
                    }
                }
                Some("tfoot") => {
                    for row in child_elements(section, "tr") {
                        let cells = self.collect_cells(&row);
                        if !cells.is_empty() {
                            footer.push(cells);
                        }
                    }
                }
                Some("tr") => {
                    let cells = self.collect_cells(section);
                    if !cells.is_empty() {
                        table.rows.push(cells);
                    }
                }
                _ => {}
            }
        }

        table.rows.extend(footer);
        table
    }

    fn collect_cells(&mut self, row: &Handle) -> Vec<String> {
        let mut cells = Vec::new();
        for cell in row.children.borrow().iter() {
            if !matches!(element_name(cell), Some("td") | Some("th")) {
                continue;
            }
            let previous = self.in_table_cell;
            self.in_table_cell = true;
            let text = single_line(&self.inline(cell));
            self.in_table_cell = previous;

            if self.options.escape_table_pipes {
                cells.push(text.replace('|', "\\|"));
            } else {
                cells.push(text);
            }
        }
        cells
    }
}

fn render_inline_code(handle: &Handle, out: &mut String) {
    let code = text_content(handle).replace('\n', " ");
    if code.is_empty() {
        return;
    }
    if code.contains('`') {
        out.push_str(&format!("`` {} ``", code));
    } else {
        out.push_str(&format!("`{}`", code));
    }
}

fn emit_block(out: &mut String, action: VisitorAction, default: String) {
    match action {
        VisitorAction::Skip => {}
        VisitorAction::Replace(replacement) => {
            ensure_blank_line(out);
            out.push_str(&replacement);
        }
        VisitorAction::Continue => {
            ensure_blank_line(out);
            out.push_str(&default);
        }
    }
}

/// Format one list item, indenting continuation lines under the marker.
fn list_item(marker: &str, text: &str) -> String {
    if text.is_empty() {
        return format!("{}\n", marker);
    }
    let mut lines = text.lines();
    let mut output = format!("{} {}", marker, lines.next().unwrap_or_default());
    let rest: Vec<&str> = lines.collect();
    if !rest.is_empty() {
        output.push('\n');
        output.push_str(&indent_lines(&rest.join("\n"), marker.len() + 1));
    }
    output.push('\n');
    output
}

fn indent_lines(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Append text, collapsing runs of ASCII whitespace into one space.
fn push_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if out.is_empty() || out.ends_with(|c: char| c.is_ascii_whitespace()) {
                continue;
            }
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
}

fn trim_trailing_spaces(out: &mut String) {
    let len = out.trim_end_matches(|c: char| c == ' ' || c == '\t').len();
    out.truncate(len);
}

fn ensure_newline(out: &mut String) {
    trim_trailing_spaces(out);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn ensure_blank_line(out: &mut String) {
    trim_trailing_spaces(out);
    if out.is_empty() || out.ends_with("\n\n") {
        return;
    }
    if out.ends_with('\n') {
        out.push('\n');
    } else {
        out.push_str("\n\n");
    }
}

fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

fn child_elements(handle: &Handle, tag: &str) -> Vec<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .filter(|child| element_name(child) == Some(tag))
        .cloned()
        .collect()
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if element_name(handle) == Some(tag) {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn attr(handle: &Handle, key: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref() == key)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    collect_text(handle, &mut text);
    text
}

fn collect_text(handle: &Handle, text: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => text.push_str(&contents.borrow()),
        NodeData::Element { name, .. } if name.local.as_ref() == "br" => text.push('\n'),
        _ => {
            for child in handle.children.borrow().iter() {
                collect_text(child, text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::visitor::{MaxHeadingDepthVisitor, SkipImagesVisitor};
    use crate::render::CleanupPreset;

    #[test]
    fn test_table_with_head_and_body() {
        let html = "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
                    <tbody><tr><td>1</td><td>2</td></tr></tbody></table>";
        assert_eq!(render(html), "| A | B |\n| --- | --- |\n| 1 | 2 |\n\n");
    }

    #[test]
    fn test_table_without_head_emits_rows_only() {
        let html = "<table><tr><td>1</td><td>2</td></tr></table>";
        assert_eq!(render(html), "| 1 | 2 |\n\n");
    }

    #[test]
    fn test_table_cell_pipes_escaped() {
        let html = "<table><thead><tr><th>a|b</th></tr></thead></table>";
        assert_eq!(render(html), "| a\\|b |\n| --- |\n\n");
    }

    #[test]
    fn test_ordered_list_renumbered() {
        let html = "<ol start=\"5\"><li value=\"5\">five</li><li value=\"1\">one</li>\
                    <li value=\"9\">nine</li></ol>";
        assert_eq!(render(html), "1. five\n2. one\n3. nine\n\n");
    }

    #[test]
    fn test_each_list_restarts_numbering() {
        let html = "<ol><li>a</li><li>b</li></ol><p>gap</p><ol><li>c</li></ol>";
        assert_eq!(render(html), "1. a\n2. b\n\ngap\n\n1. c\n\n");
    }

    #[test]
    fn test_nested_lists() {
        let html = "<ul><li>Parent<ul><li>Child</li></ul></li><li>Next</li></ul>";
        assert_eq!(render(html), "- Parent\n  - Child\n- Next\n\n");
    }

    #[test]
    fn test_list_marker_option() {
        let options = RenderOptions::new().with_list_marker('*');
        assert_eq!(to_markdown("<ul><li>x</li></ul>", &options), "* x\n\n");
    }

    #[test]
    fn test_body_extracted_from_full_document() {
        let html = "<!DOCTYPE html><html><head><title>Ignored</title>\
                    <style>p { color: red }</style></head>\
                    <body><h2>Hello</h2><script>alert(1)</script></body></html>";
        assert_eq!(render(html), "## Hello\n\n");
    }

    #[test]
    fn test_entities_and_nbsp_decoded() {
        let html = "<p>a &amp; b &lt;tag&gt; &quot;q&quot; &#39;s&#39;&nbsp;end</p>";
        assert_eq!(render(html), "a & b <tag> \"q\" 's' end\n\n");
    }

    #[test]
    fn test_blockquote_prefixes_every_line() {
        let html = "<blockquote><p>Line one</p><p>Line two</p></blockquote>";
        assert_eq!(render(html), "> Line one\n>\n> Line two\n\n");
    }

    #[test]
    fn test_nested_blockquote() {
        let html = "<blockquote><p>outer</p><blockquote><p>inner</p></blockquote></blockquote>";
        assert_eq!(render(html), "> outer\n>\n> > inner\n\n");
    }

    #[test]
    fn test_emphasis_whitespace_moves_outside() {
        let html = "<p>Some<strong> bold </strong>text and <em>it</em>.</p>";
        assert_eq!(render(html), "Some **bold** text and *it*.\n\n");
    }

    #[test]
    fn test_links_and_images() {
        let html = "<p>See <a href=\"https://example.com\">docs</a> and <img src=\"a.png\"></p>";
        assert_eq!(render(html), "See [docs](https://example.com) and ![](a.png)\n\n");
    }

    #[test]
    fn test_code_block_and_inline_code() {
        let html = "<p>Use <code>cargo</code> now</p><pre><code>fn main() {\n    run();\n}\n</code></pre>";
        assert_eq!(
            render(html),
            "Use `cargo` now\n\n```\nfn main() {\n    run();\n}\n```\n\n"
        );
    }

    #[test]
    fn test_horizontal_rule_and_line_break() {
        let html = "<p>a<br>b</p><hr><p>c</p>";
        assert_eq!(render(html), "a\nb\n\n---\n\nc\n\n");
    }

    #[test]
    fn test_containers_unwrapped() {
        let html = "<div><span>one</span></div><div>two</div>";
        assert_eq!(render(html), "one\ntwo\n");
    }

    #[test]
    fn test_blank_lines_collapsed() {
        let html = "<p>a</p>\n\n\n\n<p>b</p>";
        assert!(!render(html).contains("\n\n\n"));
    }

    #[test]
    fn test_skip_images_visitor() {
        let md = MarkdownRenderer::new(RenderOptions::default())
            .with_visitor(SkipImagesVisitor)
            .render("<p>x <img src=\"a.png\" alt=\"A\"></p>");
        assert_eq!(md, "x\n\n");
    }

    #[test]
    fn test_max_heading_depth_visitor() {
        let md = MarkdownRenderer::new(RenderOptions::default())
            .with_visitor(MaxHeadingDepthVisitor::new(2))
            .render("<h4>Deep</h4>");
        assert_eq!(md, "## Deep\n\n");
    }

    #[test]
    fn test_render_with_stats() {
        let html = "<h1>T</h1><p>one two</p><ul><li>a</li><li>b</li></ul>";
        let result = to_markdown_with_stats(html, &RenderOptions::default());
        assert_eq!(result.stats.heading_count, 1);
        assert_eq!(result.stats.paragraph_count, 1);
        assert_eq!(result.stats.list_item_count, 2);
        assert!(result.stats.word_count > 0);
    }

    #[test]
    fn test_whitespace_passes_reach_fenced_code() {
        assert_eq!(
            render("<pre><code>a\n\n\n\nb   </code></pre>"),
            "```\na\n\nb\n```\n\n"
        );
        let minimal = RenderOptions::new().with_cleanup_preset(CleanupPreset::Minimal);
        assert_eq!(
            to_markdown("<pre><code>a\n\n\n\nb   </code></pre>", &minimal),
            "```\na\n\nb   \n```\n\n"
        );
    }

    #[test]
    fn test_stats_leave_output_unchanged() {
        let html = "<h2>T</h2><p>one <a href=\"u\">two</a></p><pre><code>x</code></pre>";
        let options = RenderOptions::default();
        let result = to_markdown_with_stats(html, &options);
        assert_eq!(result.content, to_markdown(html, &options));
        assert_eq!(result.stats.link_count, 1);
        assert_eq!(result.stats.code_block_count, 1);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }
}
