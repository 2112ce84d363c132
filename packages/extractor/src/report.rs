//! Section renderings combined with summaries.
//!
//! A summarization failure is recorded in the report as
//! [`SummaryOutcome::Unavailable`] and never discards the rendered section.

use serde::Serialize;

use crate::config::{MEDICAL_SUMMARY_MAX_TOKENS, SECTION_SUMMARY_MAX_TOKENS};
use crate::document::ClinicalDocument;
use crate::error::Result;
use crate::prompt::{medical_section_prompt, section_summary_prompt, MEDICAL_SECTIONS};
use crate::section::find_section;
use crate::summarize::Summarizer;
use crate::table::render_text;

/// Result of asking the summarizer for a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum SummaryOutcome {
    /// The service produced a summary.
    Summary(String),
    /// The service failed; carries the reason.
    Unavailable(String),
}

impl SummaryOutcome {
    /// Record a summarization result, logging the failure reason.
    pub fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(summary) => Self::Summary(summary),
            Err(e) => {
                tracing::warn!(error = %e, "summarization failed");
                Self::Unavailable(e.to_string())
            }
        }
    }

    /// The summary text, if one was produced.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        match self {
            Self::Summary(text) => Some(text),
            Self::Unavailable(_) => None,
        }
    }
}

/// A rendered section, optionally with its summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionReport {
    pub title: String,
    pub readable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryOutcome>,
}

/// Summary of one section of the medical-data report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub section: String,
    pub outcome: SummaryOutcome,
}

/// Render a section by title.
pub fn section_report(doc: &ClinicalDocument<'_>, title: &str) -> Result<SectionReport> {
    let section = find_section(doc, title)?;
    Ok(SectionReport {
        title: title.to_string(),
        readable: render_text(&section),
        summary: None,
    })
}

/// Render a section by title and summarize the rendering.
///
/// Fails only when the section does not exist.
pub fn summarize_section(
    doc: &ClinicalDocument<'_>,
    title: &str,
    summarizer: &dyn Summarizer,
) -> Result<SectionReport> {
    let mut report = section_report(doc, title)?;
    add_summary(&mut report, summarizer);
    Ok(report)
}

/// Summarize an already rendered section report in place.
pub fn add_summary(report: &mut SectionReport, summarizer: &dyn Summarizer) {
    let prompt = section_summary_prompt(&report.readable);
    report.summary = Some(SummaryOutcome::from_result(
        summarizer.summarize(&prompt, SECTION_SUMMARY_MAX_TOKENS),
    ));
}

/// Summarize each medical section present in the document.
///
/// Sections missing from the document are left out of the result.
pub fn summarize_medical_data(
    doc: &ClinicalDocument<'_>,
    summarizer: &dyn Summarizer,
) -> Vec<SectionSummary> {
    MEDICAL_SECTIONS
        .iter()
        .filter_map(|title| {
            let section = find_section(doc, title).ok()?;
            let prompt = medical_section_prompt(title, &render_text(&section));
            let outcome = SummaryOutcome::from_result(
                summarizer.summarize(&prompt, MEDICAL_SUMMARY_MAX_TOKENS),
            );
            Some(SectionSummary {
                section: (*title).to_string(),
                outcome,
            })
        })
        .collect()
}
