//! Command-line interface for the extractor.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::config::{SummarizerConfig, DEFAULT_MAX_DOCUMENT_SIZE};
use crate::demographics::extract_demographics;
use crate::document::{read_document, ClinicalDocument};
use crate::error::Result;
use crate::extract::{extract_key_values, extract_pairs, DEFAULT_QUERIES};
use crate::output::{pair_lines, to_structured, wrap_summary, OutputFormat};
use crate::report::{add_summary, section_report, summarize_medical_data, SummaryOutcome};
use crate::section::{find_section, list_section_titles};
use crate::summarize::HttpSummarizer;

/// CCD Extractor - Pull sections, tables and demographics out of CDA/CCD documents.
#[derive(Parser)]
#[command(name = "ccd-extractor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Maximum accepted document size in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DOCUMENT_SIZE)]
    pub max_size: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the titles of all sections.
    Sections {
        /// Path to the CCD document (.xml)
        file: PathBuf,
    },

    /// Show the tables of one section as readable text.
    Section {
        /// Path to the CCD document (.xml)
        file: PathBuf,

        /// Exact section title (e.g., "Vitals")
        title: String,

        /// Ask the summarization service for a bullet-point summary
        #[arg(short, long)]
        summarize: bool,

        /// Print the section's XML instead of its tables
        #[arg(long, conflicts_with = "summarize")]
        xml: bool,
    },

    /// Show the patient's demographics.
    Demographics {
        /// Path to the CCD document (.xml)
        file: PathBuf,
    },

    /// Extract key/value pairs from a section's tables by column header.
    Pairs {
        /// Path to the CCD document (.xml)
        file: PathBuf,

        /// Exact section title
        section: String,

        /// Header of the key column
        key_header: String,

        /// Header of the value column
        value_header: String,
    },

    /// Run the standard key/value report.
    KeyValues {
        /// Path to the CCD document (.xml)
        file: PathBuf,
    },

    /// Summarize the medical sections of the document.
    MedicalSummary {
        /// Path to the CCD document (.xml)
        file: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    let format = cli.format;
    let max_size = cli.max_size;

    match cli.command {
        Commands::Sections { file } => sections_command(&file, max_size, format),
        Commands::Section {
            file,
            title,
            summarize,
            xml,
        } => section_command(&file, &title, summarize, xml, max_size, format),
        Commands::Demographics { file } => demographics_command(&file, max_size, format),
        Commands::Pairs {
            file,
            section,
            key_header,
            value_header,
        } => pairs_command(&file, &section, &key_header, &value_header, max_size, format),
        Commands::KeyValues { file } => key_values_command(&file, max_size, format),
        Commands::MedicalSummary { file } => medical_summary_command(&file, max_size, format),
    }
}

/// Print a structured rendering if one was requested.
///
/// Returns `false` for text output so the caller prints its own rendering.
fn emit_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match to_structured(value, format)? {
        Some(rendered) => {
            println!("{}", rendered.trim_end());
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Raw XML of a section, for structured output.
#[derive(Serialize)]
struct SectionXml<'a> {
    title: &'a str,
    xml: &'a str,
}

fn nothing_found(message: &str) {
    println!("{}", style(message).yellow());
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn sections_command(file: &Path, max_size: u64, format: OutputFormat) -> Result<()> {
    let text = read_document(file, max_size)?;
    let doc = ClinicalDocument::parse(&text)?;
    let titles = list_section_titles(&doc);

    if emit_structured(&titles, format)? {
        return Ok(());
    }

    if titles.is_empty() {
        nothing_found("No sections found.");
        return Ok(());
    }

    println!("{} ({})", style("Sections").bold(), titles.len());
    for title in &titles {
        println!("  {}", style(title).cyan());
    }

    Ok(())
}

fn section_command(
    file: &Path,
    title: &str,
    summarize: bool,
    xml: bool,
    max_size: u64,
    format: OutputFormat,
) -> Result<()> {
    let text = read_document(file, max_size)?;
    let doc = ClinicalDocument::parse(&text)?;

    if xml {
        return match find_section(&doc, title) {
            Ok(section) => {
                let xml = SectionXml {
                    title,
                    xml: section.to_xml(),
                };
                if !emit_structured(&xml, format)? {
                    println!("{}", xml.xml);
                }
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                nothing_found(&format!("{e}."));
                Ok(())
            }
            Err(e) => Err(e),
        };
    }

    let mut report = match section_report(&doc, title) {
        Ok(report) => report,
        Err(e) if e.is_not_found() => {
            nothing_found(&format!("{e}."));
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if summarize {
        // A missing or broken summarizer setup only costs the summary.
        match SummarizerConfig::from_env().and_then(|config| HttpSummarizer::new(&config)) {
            Ok(summarizer) => {
                let pb = spinner("Summarizing section...");
                add_summary(&mut report, &summarizer);
                pb.finish_and_clear();
            }
            Err(e) => report.summary = Some(SummaryOutcome::from_result(Err(e))),
        }
    }

    if emit_structured(&report, format)? {
        return Ok(());
    }

    println!("{}", report.readable.trim_end_matches('\n'));
    if let Some(outcome) = &report.summary {
        println!();
        print_outcome("Summary", outcome);
    }

    Ok(())
}

fn print_outcome(heading: &str, outcome: &SummaryOutcome) {
    match outcome {
        SummaryOutcome::Summary(text) => {
            println!("{}", style(heading).green().bold());
            println!("{}", wrap_summary(text));
        }
        SummaryOutcome::Unavailable(reason) => {
            println!(
                "{} {}",
                style(heading).bold(),
                style(format!("unavailable: {reason}")).yellow()
            );
        }
    }
}

fn demographics_command(file: &Path, max_size: u64, format: OutputFormat) -> Result<()> {
    let text = read_document(file, max_size)?;
    let doc = ClinicalDocument::parse(&text)?;
    let demographics = extract_demographics(&doc);

    if emit_structured(&demographics, format)? {
        return Ok(());
    }

    if demographics.is_empty() {
        nothing_found("No demographic details found.");
        return Ok(());
    }

    for (label, value) in demographics.fields() {
        println!("{} {}", style(format!("{label}:")).bold(), value);
    }

    Ok(())
}

fn pairs_command(
    file: &Path,
    section: &str,
    key_header: &str,
    value_header: &str,
    max_size: u64,
    format: OutputFormat,
) -> Result<()> {
    let text = read_document(file, max_size)?;
    let doc = ClinicalDocument::parse(&text)?;
    let pairs = extract_pairs(&doc, section, key_header, value_header);

    if emit_structured(&pairs, format)? {
        return Ok(());
    }

    if pairs.is_empty() {
        nothing_found("No matching rows found.");
        return Ok(());
    }

    for line in pair_lines(&pairs) {
        println!("{line}");
    }

    Ok(())
}

fn key_values_command(file: &Path, max_size: u64, format: OutputFormat) -> Result<()> {
    let text = read_document(file, max_size)?;
    let doc = ClinicalDocument::parse(&text)?;
    let groups = extract_key_values(&doc, &DEFAULT_QUERIES);

    if emit_structured(&groups, format)? {
        return Ok(());
    }

    for group in &groups {
        println!("{}", style(&group.label).bold());
        if group.pairs.is_empty() {
            println!("  {}", style("(none)").dim());
        }
        for line in pair_lines(&group.pairs) {
            println!("  {line}");
        }
    }

    Ok(())
}

fn medical_summary_command(file: &Path, max_size: u64, format: OutputFormat) -> Result<()> {
    let text = read_document(file, max_size)?;
    let doc = ClinicalDocument::parse(&text)?;
    let summarizer = HttpSummarizer::new(&SummarizerConfig::from_env()?)?;

    let pb = spinner("Summarizing medical sections...");
    let summaries = summarize_medical_data(&doc, &summarizer);
    pb.finish_and_clear();

    if emit_structured(&summaries, format)? {
        return Ok(());
    }

    if summaries.is_empty() {
        nothing_found("No medical sections found.");
        return Ok(());
    }

    for (i, summary) in summaries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_outcome(&summary.section, &summary.outcome);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_sections() {
        let cli = Cli::parse_from(["ccd-extractor", "sections", "patient.xml"]);

        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.max_size, DEFAULT_MAX_DOCUMENT_SIZE);
        let Commands::Sections { file } = cli.command else {
            panic!("expected sections command");
        };
        assert_eq!(file, PathBuf::from("patient.xml"));
    }

    #[test]
    fn test_cli_parse_section_with_summarize() {
        let cli = Cli::parse_from([
            "ccd-extractor",
            "section",
            "patient.xml",
            "Vitals",
            "--summarize",
        ]);

        let Commands::Section {
            title,
            summarize,
            xml,
            ..
        } = cli.command
        else {
            panic!("expected section command");
        };
        assert_eq!(title, "Vitals");
        assert!(summarize);
        assert!(!xml);
    }

    #[test]
    fn test_cli_xml_conflicts_with_summarize() {
        let result = Cli::try_parse_from([
            "ccd-extractor",
            "section",
            "patient.xml",
            "Vitals",
            "--summarize",
            "--xml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_pairs_with_global_format() {
        let cli = Cli::parse_from([
            "ccd-extractor",
            "pairs",
            "patient.xml",
            "Vitals",
            "Date Recorded",
            "Body mass index (BMI)",
            "--format",
            "json",
        ]);

        assert_eq!(cli.format, OutputFormat::Json);
        let Commands::Pairs {
            section,
            key_header,
            value_header,
            ..
        } = cli.command
        else {
            panic!("expected pairs command");
        };
        assert_eq!(section, "Vitals");
        assert_eq!(key_header, "Date Recorded");
        assert_eq!(value_header, "Body mass index (BMI)");
    }

    #[test]
    fn test_cli_parse_max_size() {
        let cli = Cli::parse_from([
            "ccd-extractor",
            "--max-size",
            "1024",
            "demographics",
            "patient.xml",
        ]);
        assert_eq!(cli.max_size, 1024);
        assert!(matches!(cli.command, Commands::Demographics { .. }));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result =
            Cli::try_parse_from(["ccd-extractor", "--format", "csv", "sections", "patient.xml"]);
        assert!(result.is_err());
    }
}
