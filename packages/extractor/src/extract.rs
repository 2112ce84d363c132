//! Header-keyed extraction of key/value pairs from section tables.
//!
//! Columns are located by header text instead of position, so the same query
//! works on documents whose tables order or size their columns differently.

use serde::Serialize;

use crate::document::ClinicalDocument;
use crate::section::find_section;
use crate::table::{tables, Table};

/// A named header-keyed query against one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyValueQuery {
    /// Label under which the results are reported.
    pub label: &'static str,
    /// Exact title of the section to search.
    pub section: &'static str,
    /// Header of the column supplying keys.
    pub key_header: &'static str,
    /// Header of the column supplying values.
    pub value_header: &'static str,
}

impl KeyValueQuery {
    /// Run the query against a document.
    pub fn run(&self, doc: &ClinicalDocument<'_>) -> Vec<(String, String)> {
        extract_pairs(doc, self.section, self.key_header, self.value_header)
    }
}

/// The queries used by the application's key/value report.
pub const DEFAULT_QUERIES: [KeyValueQuery; 6] = [
    KeyValueQuery {
        label: "Past Encounters",
        section: "Past Encounters",
        key_header: "Encounter date",
        value_header: "Diagnosis/Indication",
    },
    KeyValueQuery {
        label: "Vitals",
        section: "Vitals",
        key_header: "Date Recorded",
        value_header: "Body mass index (BMI)",
    },
    KeyValueQuery {
        label: "Procedures",
        section: "Procedures",
        key_header: "Date",
        value_header: "Name",
    },
    KeyValueQuery {
        label: "Procedures (Imaging)",
        section: "Procedures",
        key_header: "Imaging Date",
        value_header: "Name",
    },
    KeyValueQuery {
        label: "Assessment",
        section: "Assessment",
        key_header: "Assessment Date",
        value_header: "Assessment",
    },
    KeyValueQuery {
        label: "Medications",
        section: "Medications",
        key_header: "Name",
        value_header: "Status",
    },
];

/// Results of one labeled query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValueGroup {
    pub label: String,
    pub pairs: Vec<(String, String)>,
}

/// Extract `(key, value)` pairs from the tables of a section.
///
/// Every table in the section whose header row contains both `key_header`
/// and `value_header` contributes one pair per data row, in document order.
/// Tables missing either column are skipped. Rows too short to reach both
/// columns are skipped. A missing section yields an empty result.
///
/// # Examples
/// ```
/// use ccd_extractor::{extract_pairs, ClinicalDocument};
///
/// let xml = r#"<ClinicalDocument xmlns="urn:hl7-org:v3"><section>
///   <title>Problems</title>
///   <text><table>
///     <thead><tr><th>Problem</th><th>Status</th></tr></thead>
///     <tbody>
///       <tr><td>Diabetes</td><td>Active</td></tr>
///       <tr><td>Flu</td><td>Resolved</td></tr>
///     </tbody>
///   </table></text>
/// </section></ClinicalDocument>"#;
/// let doc = ClinicalDocument::parse(xml).unwrap();
///
/// assert_eq!(
///     extract_pairs(&doc, "Problems", "Problem", "Status"),
///     vec![
///         ("Diabetes".to_string(), "Active".to_string()),
///         ("Flu".to_string(), "Resolved".to_string()),
///     ]
/// );
/// assert!(extract_pairs(&doc, "Vitals", "Date", "BMI").is_empty());
/// ```
pub fn extract_pairs(
    doc: &ClinicalDocument<'_>,
    section_title: &str,
    key_header: &str,
    value_header: &str,
) -> Vec<(String, String)> {
    let Ok(section) = find_section(doc, section_title) else {
        return Vec::new();
    };

    let pairs: Vec<(String, String)> = tables(&section)
        .iter()
        .flat_map(|table| table_pairs(table, key_header, value_header))
        .collect();

    tracing::debug!(
        section = section_title,
        key_header,
        value_header,
        pairs = pairs.len(),
        "extracted key/value pairs"
    );

    pairs
}

/// Pairs from a single table, or nothing if it lacks either column.
fn table_pairs(table: &Table, key_header: &str, value_header: &str) -> Vec<(String, String)> {
    let (Some(key_index), Some(value_index)) = (
        table.column_index(key_header),
        table.column_index(value_header),
    ) else {
        return Vec::new();
    };

    table
        .rows
        .iter()
        .filter_map(|row| {
            let key = row.cell(key_index)?;
            let value = row.cell(value_index)?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Run each query and collect labeled results in query order.
pub fn extract_key_values(
    doc: &ClinicalDocument<'_>,
    queries: &[KeyValueQuery],
) -> Vec<KeyValueGroup> {
    queries
        .iter()
        .map(|query| KeyValueGroup {
            label: query.label.to_string(),
            pairs: query.run(doc),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    const VITALS: &str = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
  <component><section>
    <title>Vitals</title>
    <text>
      <table>
        <thead><tr><th>Height</th><th> Date Recorded </th><th>Weight</th><th>Body mass index (BMI)</th></tr></thead>
        <tbody>
          <tr><td>170 cm</td><td>2023-01-05</td><td>70 kg</td><td>24.2</td></tr>
          <tr><td>170 cm</td><td> 2023-04-11 </td><td>72 kg</td><td><content>24.9</content></td></tr>
          <tr><td>171 cm</td><td>2023-09-30</td><td>71 kg</td><td>24.3</td></tr>
        </tbody>
      </table>
      <table>
        <thead><tr><th>Date Recorded</th><th>Pulse</th></tr></thead>
        <tbody><tr><td>2023-01-05</td><td>72</td></tr></tbody>
      </table>
    </text>
  </section></component>
</ClinicalDocument>"#;

    #[test]
    fn test_extract_pairs_by_header() {
        let doc = ClinicalDocument::parse(VITALS).unwrap();
        let pairs = extract_pairs(&doc, "Vitals", "Date Recorded", "Body mass index (BMI)");

        assert_eq!(
            pairs,
            vec![
                pair("2023-01-05", "24.2"),
                pair("2023-04-11", "24.9"),
                pair("2023-09-30", "24.3"),
            ]
        );
    }

    #[test]
    fn test_extract_pairs_missing_column() {
        let doc = ClinicalDocument::parse(VITALS).unwrap();
        assert!(extract_pairs(&doc, "Vitals", "Date Recorded", "Temperature").is_empty());
    }

    #[test]
    fn test_extract_pairs_missing_section() {
        let doc = ClinicalDocument::parse(VITALS).unwrap();
        assert!(extract_pairs(&doc, "Allergies", "Date Recorded", "Pulse").is_empty());
    }

    #[test]
    fn test_extract_pairs_skips_short_rows() {
        let xml = r#"<ClinicalDocument xmlns="urn:hl7-org:v3"><section>
          <title>Medications</title>
          <text><table>
            <thead><tr><th>Name</th><th>Dose</th><th>Status</th></tr></thead>
            <tbody>
              <tr><td>Aspirin</td><td>81 mg</td><td>Active</td></tr>
              <tr><td>Warfarin</td><td>5 mg</td></tr>
              <tr><td>Statin</td><td>20 mg</td><td>Stopped</td></tr>
            </tbody>
          </table></text>
        </section></ClinicalDocument>"#;
        let doc = ClinicalDocument::parse(xml).unwrap();

        assert_eq!(
            extract_pairs(&doc, "Medications", "Name", "Status"),
            vec![pair("Aspirin", "Active"), pair("Statin", "Stopped")]
        );
    }

    #[test]
    fn test_extract_pairs_multiple_tables_concatenate() {
        let xml = r#"<ClinicalDocument xmlns="urn:hl7-org:v3"><section>
          <title>Procedures</title>
          <text>
            <table>
              <thead><tr><th>Name</th><th>Date</th></tr></thead>
              <tbody><tr><td>Appendectomy</td><td>2019-03-02</td></tr></tbody>
            </table>
            <table>
              <thead><tr><th>Imaging Date</th><th>Name</th></tr></thead>
              <tbody><tr><td>2021-06-14</td><td>Chest X-ray</td></tr></tbody>
            </table>
            <table>
              <thead><tr><th>Date</th><th>Provider</th><th>Name</th></tr></thead>
              <tbody><tr><td>2022-11-20</td><td>Dr. Who</td><td>Colonoscopy</td></tr></tbody>
            </table>
          </text>
        </section></ClinicalDocument>"#;
        let doc = ClinicalDocument::parse(xml).unwrap();

        assert_eq!(
            extract_pairs(&doc, "Procedures", "Date", "Name"),
            vec![
                pair("2019-03-02", "Appendectomy"),
                pair("2022-11-20", "Colonoscopy"),
            ]
        );
        assert_eq!(
            extract_pairs(&doc, "Procedures", "Imaging Date", "Name"),
            vec![pair("2021-06-14", "Chest X-ray")]
        );
    }

    #[test]
    fn test_extract_key_values_default_queries() {
        let doc = ClinicalDocument::parse(VITALS).unwrap();
        let groups = extract_key_values(&doc, &DEFAULT_QUERIES);

        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Past Encounters",
                "Vitals",
                "Procedures",
                "Procedures (Imaging)",
                "Assessment",
                "Medications",
            ]
        );
        assert_eq!(groups[1].pairs.len(), 3);
        assert!(groups[0].pairs.is_empty());
    }
}
