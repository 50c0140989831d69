//! Table content collected while rendering HTML.

/// Cell text of one HTML table, already rendered to inline Markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    /// Cells of the header section, empty if the table has no `<thead>`
    pub header: Vec<String>,

    /// Body rows, each a list of cell texts
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if neither a header nor a body row was found.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    /// Widest row, header included.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    /// Render as a pipe table.
    ///
    /// The header row is followed by a `---` separator row. A missing header
    /// or body section produces no output for that section.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        if !self.header.is_empty() {
            output.push_str(&pipe_row(&self.header));
            output.push('\n');
            let separator: Vec<&str> = self.header.iter().map(|_| "---").collect();
            output.push_str(&pipe_row(&separator));
            output.push('\n');
        }

        if !self.rows.is_empty() {
            let rows: Vec<String> = self.rows.iter().map(|r| pipe_row(r)).collect();
            output.push_str(&rows.join("\n"));
            output.push_str("\n\n");
        } else if !output.is_empty() {
            output.push('\n');
        }

        output
    }

    /// Render as plain text, cells separated by spaces.
    pub fn plain_text(&self) -> String {
        std::iter::once(&self.header)
            .chain(self.rows.iter())
            .filter(|r| !r.is_empty())
            .map(|r| r.join(" "))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn pipe_row<S: AsRef<str>>(cells: &[S]) -> String {
    let cells: Vec<&str> = cells.iter().map(AsRef::as_ref).collect();
    format!("| {} |", cells.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(header: &[&str], rows: &[&[&str]]) -> TableData {
        TableData {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_full_table() {
        let t = table(&["A", "B"], &[&["1", "2"]]);
        assert_eq!(t.to_markdown(), "| A | B |\n| --- | --- |\n| 1 | 2 |\n\n");
        assert_eq!(t.column_count(), 2);
    }

    #[test]
    fn test_missing_sections() {
        assert_eq!(table(&[], &[&["1"]]).to_markdown(), "| 1 |\n\n");
        assert_eq!(table(&["A"], &[]).to_markdown(), "| A |\n| --- |\n\n");
        assert_eq!(TableData::new().to_markdown(), "");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(table(&["A"], &[&["1", "2"]]).plain_text(), "A 1 2");
    }
}
