//! Tables embedded in section narratives, and their plain-text rendering.
//!
//! A table's header row is read from `thead/tr/th`, its data rows from
//! `tbody/tr` and each row's cells from the `td` elements below it. Cell
//! text follows [`cell_text`]: the cell's direct text, or the concatenated
//! text of its descendants when the cell wraps its content in markup.

use roxmltree::Node;
use serde::Serialize;

use crate::section::Section;
use crate::xml::{cell_text, find_descendants, select_all};

/// Separator placed between cells of a rendered row.
pub const CELL_SEPARATOR: &str = " | ";

/// A data row: one cell text per column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    /// Cell text at `index`, if the row is that wide.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// A table: positional header texts plus data rows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Read a table from a `table` element.
    pub fn from_node(table: Node<'_, '_>) -> Self {
        let headers = select_all(table, "thead/tr/th")
            .into_iter()
            .map(cell_text)
            .collect();

        let rows = select_all(table, "tbody/tr")
            .into_iter()
            .map(|tr| Row {
                cells: find_descendants(tr, "td").map(cell_text).collect(),
            })
            .collect();

        Self { headers, rows }
    }

    /// Position of the first header whose trimmed text equals `header`.
    ///
    /// # Examples
    /// ```
    /// use ccd_extractor::table::Table;
    ///
    /// let table = Table {
    ///     headers: vec![" Name ".into(), "Status".into(), "Name".into()],
    ///     rows: vec![],
    /// };
    /// assert_eq!(table.column_index("Name"), Some(0));
    /// assert_eq!(table.column_index("Status"), Some(1));
    /// assert_eq!(table.column_index("status"), None);
    /// ```
    #[must_use]
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == header)
    }

    /// The header row joined with the cell separator.
    #[must_use]
    pub fn header_line(&self) -> String {
        self.headers.join(CELL_SEPARATOR)
    }

    /// Width of the dashed line under the header row.
    ///
    /// Sum of the header lengths plus three characters per header, minus two.
    /// For headers `["A", "BB"]` this is `1 + 2 + 2 * 3 - 2 = 7`. A table
    /// without headers gets no dashes.
    #[must_use]
    pub fn underline_width(&self) -> usize {
        let text: usize = self.headers.iter().map(|h| h.chars().count()).sum();
        (text + 3 * self.headers.len()).saturating_sub(2)
    }

    /// Append this table's rendering to `lines`.
    ///
    /// Header line, dashed underline, one line per data row, then a blank line.
    pub fn render_into(&self, lines: &mut Vec<String>) {
        lines.push(self.header_line());
        lines.push("-".repeat(self.underline_width()));
        for row in &self.rows {
            lines.push(row.cells.join(CELL_SEPARATOR));
        }
        lines.push(String::new());
    }
}

/// All tables inside a section, nested sections included, in document order.
pub fn tables(section: &Section<'_, '_>) -> Vec<Table> {
    find_descendants(section.node(), "table")
        .map(Table::from_node)
        .collect()
}

/// Render a section as readable lines.
///
/// The title (when present) and a dashed underline of equal length come
/// first, followed by each table in document order.
pub fn render(section: &Section<'_, '_>) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(title) = section.title() {
        lines.push(title.to_string());
        lines.push("-".repeat(title.chars().count()));
    }

    for table in tables(section) {
        table.render_into(&mut lines);
    }

    lines
}

/// Render a section as newline-joined readable text.
pub fn render_text(section: &Section<'_, '_>) -> String {
    render(section).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ClinicalDocument;
    use crate::section::find_section;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
  <component><section>
    <title>Medications</title>
    <text>
      <table>
        <thead><tr><th>Name</th><th>Status</th></tr></thead>
        <tbody>
          <tr><td>Metformin</td><td>Active</td></tr>
          <tr><td><content>Lisinopril</content><br/><content>10 mg</content></td><td>Stopped</td></tr>
        </tbody>
      </table>
      <table>
        <thead><tr><th>A</th><th>BB</th></tr></thead>
        <tbody/>
      </table>
    </text>
  </section></component>
  <component><section>
    <text><table><tbody><tr><td>x</td></tr></tbody></table></text>
  </section></component>
</ClinicalDocument>"#;

    #[test]
    fn test_tables_read_headers_and_rows() {
        let doc = ClinicalDocument::parse(DOC).unwrap();
        let section = find_section(&doc, "Medications").unwrap();
        let tables = tables(&section);

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers, vec!["Name", "Status"]);
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].rows[1].cells, vec!["Lisinopril 10 mg", "Stopped"]);
        assert!(tables[1].rows.is_empty());
    }

    #[test]
    fn test_underline_width() {
        let table = Table {
            headers: vec!["A".into(), "BB".into()],
            rows: vec![],
        };
        assert_eq!(table.underline_width(), 7);
        assert_eq!(table.header_line(), "A | BB");
        assert_eq!(Table::default().underline_width(), 0);
    }

    #[test]
    fn test_render() {
        let doc = ClinicalDocument::parse(DOC).unwrap();
        let section = find_section(&doc, "Medications").unwrap();

        assert_eq!(
            render(&section),
            vec![
                "Medications",
                "-----------",
                "Name | Status",
                "--------------",
                "Metformin | Active",
                "Lisinopril 10 mg | Stopped",
                "",
                "A | BB",
                "-------",
                "",
            ]
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let doc = ClinicalDocument::parse(DOC).unwrap();
        let section = find_section(&doc, "Medications").unwrap();
        assert_eq!(render_text(&section), render_text(&section));
    }

    #[test]
    fn test_render_untitled_section() {
        let doc = ClinicalDocument::parse(DOC).unwrap();
        let untitled = crate::section::sections(&doc)[1];

        assert_eq!(render(&untitled), vec!["", "", "x", ""]);
    }

    #[test]
    fn test_render_section_without_tables() {
        let xml = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
            <section><title>Notes</title><text>Patient doing well.</text></section>
        </ClinicalDocument>"#;
        let doc = ClinicalDocument::parse(xml).unwrap();
        let section = find_section(&doc, "Notes").unwrap();

        assert_eq!(render_text(&section), "Notes\n-----");
    }

    #[test]
    fn test_render_counts_characters_not_bytes() {
        let xml = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
            <section><title>Bésoins</title></section>
        </ClinicalDocument>"#;
        let doc = ClinicalDocument::parse(xml).unwrap();
        let section = find_section(&doc, "Bésoins").unwrap();

        assert_eq!(render(&section)[1], "-------");
    }
}
