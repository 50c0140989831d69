//! HTML rendering of a compiled node sequence.
//!
//! Used for the preview shown next to a packaged document and as the
//! download offered when packaging fails.

use quick_xml::escape::escape;

use crate::model::{DocumentNode, StyledRun};

#[derive(Clone, Copy, PartialEq, Eq)]
enum OpenList {
    None,
    Bullet,
    Numbered,
}

/// Render nodes as an HTML fragment.
///
/// Consecutive bullet items share one `<ul>` and consecutive numbered items
/// share one `<ol>`. All text is escaped.
///
/// # Example
///
/// ```
/// use docmd::model::DocumentNode;
/// use docmd::render::to_preview_html;
///
/// let nodes = vec![DocumentNode::heading(1, "Title"), DocumentNode::Rule];
/// assert_eq!(to_preview_html(&nodes), "<h1>Title</h1>\n<hr>\n");
/// ```
pub fn to_preview_html(nodes: &[DocumentNode]) -> String {
    let mut output = String::new();
    let mut open = OpenList::None;

    for node in nodes {
        let wanted = match node {
            DocumentNode::BulletItem { .. } => OpenList::Bullet,
            DocumentNode::NumberedItem { .. } => OpenList::Numbered,
            _ => OpenList::None,
        };
        if wanted != open {
            close_list(&mut output, open);
            match wanted {
                OpenList::Bullet => output.push_str("<ul>\n"),
                OpenList::Numbered => output.push_str("<ol>\n"),
                OpenList::None => {}
            }
            open = wanted;
        }

        match node {
            DocumentNode::Heading { level, text } => {
                output.push_str(&format!("<h{level}>{}</h{level}>\n", escape(text)));
            }
            DocumentNode::Rule => output.push_str("<hr>\n"),
            DocumentNode::Quote { text } => {
                output.push_str(&format!("<blockquote><p>{}</p></blockquote>\n", escape(text)));
            }
            DocumentNode::BulletItem { text } | DocumentNode::NumberedItem { text, .. } => {
                output.push_str(&format!("<li>{}</li>\n", escape(text)));
            }
            DocumentNode::CodeBlock { text } => {
                output.push_str(&format!("<pre><code>{}</code></pre>\n", escape(text)));
            }
            DocumentNode::Paragraph { runs } => {
                output.push_str(&format!("<p>{}</p>\n", runs_to_html(runs)));
            }
        }
    }
    close_list(&mut output, open);

    output
}

/// Render nodes as a standalone HTML document.
pub fn to_html_document(nodes: &[DocumentNode], title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        to_preview_html(nodes)
    )
}

fn runs_to_html(runs: &[StyledRun]) -> String {
    runs.iter()
        .map(|run| {
            if run.bold {
                format!("<strong>{}</strong>", escape(&run.text))
            } else {
                escape(&run.text).into_owned()
            }
        })
        .collect()
}

fn close_list(output: &mut String, open: OpenList) {
    match open {
        OpenList::Bullet => output.push_str("</ul>\n"),
        OpenList::Numbered => output.push_str("</ol>\n"),
        OpenList::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StyledRun;

    #[test]
    fn test_lists_grouped() {
        let nodes = vec![
            DocumentNode::BulletItem { text: "a".into() },
            DocumentNode::BulletItem { text: "b".into() },
            DocumentNode::NumberedItem {
                text: "c".into(),
                index: 1,
            },
            DocumentNode::paragraph("end"),
        ];
        assert_eq!(
            to_preview_html(&nodes),
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<ol>\n<li>c</li>\n</ol>\n<p>end</p>\n"
        );
    }

    #[test]
    fn test_bold_runs_and_escaping() {
        let nodes = vec![DocumentNode::Paragraph {
            runs: vec![StyledRun::plain("a < b & "), StyledRun::bold("c")],
        }];
        assert_eq!(
            to_preview_html(&nodes),
            "<p>a &lt; b &amp; <strong>c</strong></p>\n"
        );
    }

    #[test]
    fn test_code_and_quote() {
        let nodes = vec![
            DocumentNode::CodeBlock {
                text: "x<y".into(),
            },
            DocumentNode::Quote { text: "q".into() },
        ];
        assert_eq!(
            to_preview_html(&nodes),
            "<pre><code>x&lt;y</code></pre>\n<blockquote><p>q</p></blockquote>\n"
        );
    }

    #[test]
    fn test_html_document_wrapper() {
        let doc = to_html_document(&[DocumentNode::Rule], "A & B");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>A &amp; B</title>"));
        assert!(doc.contains("<body>\n<hr>\n</body>"));
    }
}
