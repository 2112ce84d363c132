//! CCD Extractor - Pull structured data out of CDA/CCD clinical documents.
//!
//! This crate reads HL7 CDA documents (Continuity of Care Documents), lists
//! their sections, renders section tables as readable text, extracts
//! key/value pairs by column header and reads patient demographics. Section
//! text can optionally be summarized by an external service.
//!
//! # Example
//!
//! ```
//! use ccd_extractor::{list_section_titles, ClinicalDocument};
//!
//! let xml = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
//!   <component><section><title>Vitals</title></section></component>
//! </ClinicalDocument>"#;
//! let doc = ClinicalDocument::parse(xml).unwrap();
//!
//! assert_eq!(list_section_titles(&doc), vec!["Vitals"]);
//! ```
//!
//! # Architecture
//!
//! The extractor is organized into several modules:
//!
//! - [`config`]: Configuration constants and validation
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Namespace-aware XML utilities
//! - [`document`]: Document loading and parsing
//! - [`section`]: Section discovery and lookup
//! - [`table`]: Table model and readable rendering
//! - [`extract`]: Header-keyed key/value extraction
//! - [`demographics`]: Patient demographics
//! - [`summarize`]: Summarization service client
//! - [`prompt`]: Summarization prompts
//! - [`report`]: Section reports and medical-data summaries
//! - [`output`]: JSON/YAML/text output helpers
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod demographics;
pub mod document;
pub mod error;
pub mod extract;
pub mod output;
pub mod prompt;
pub mod report;
pub mod section;
pub mod summarize;
pub mod table;
pub mod xml;

// Re-export main functions
pub use demographics::{extract_demographics, Demographics};
pub use document::{read_document, ClinicalDocument};
pub use extract::{extract_key_values, extract_pairs, KeyValueGroup, KeyValueQuery, DEFAULT_QUERIES};
pub use report::{
    add_summary, section_report, summarize_medical_data, summarize_section, SectionReport,
    SectionSummary, SummaryOutcome,
};
pub use section::{find_section, list_section_titles, sections, Section};
pub use table::{render, render_text, Row, Table};

// Re-export commonly used items
pub use error::{ExtractorError, Result};
pub use summarize::{HttpSummarizer, Summarizer};
