//! Prompts sent to the summarization service.

/// Sections covered by the medical-data summary, in report order.
pub const MEDICAL_SECTIONS: [&str; 4] = ["Notes", "Problems", "Allergies", "Medical History"];

/// Stand-in content for a medical section that renders to nothing.
pub const NOTHING_REPORTED: &str = "Nothing Reported.";

/// Prompt asking for a bullet-point summary of one rendered section.
#[must_use]
pub fn section_summary_prompt(readable: &str) -> String {
    format!(
        "This is the data for one patient. Give a summary of this data in bullet points:\n{readable}"
    )
}

/// Prompt for one section of the medical-data summary.
///
/// Allergies ask for allergens and reactions, the medical history asks only
/// for conditions answered "yes", and every other section asks for dates.
///
/// # Examples
/// ```
/// use ccd_extractor::prompt::medical_section_prompt;
///
/// let prompt = medical_section_prompt("Allergies", "Penicillin | Hives");
/// assert!(prompt.contains("allergens and reactions"));
/// ```
#[must_use]
pub fn medical_section_prompt(section: &str, content: &str) -> String {
    let content = if content.trim().is_empty() {
        NOTHING_REPORTED
    } else {
        content
    };

    match section {
        "Allergies" => format!(
            "Summarize the allergies mentioned in the section '{section}':\n{content}\n\
             Include details about allergens and reactions."
        ),
        "Medical History" => format!(
            "Summarize the medical conditions with 'yes' responses mentioned in the '{section}' section:\n{content}"
        ),
        _ => format!("Summarize the data in the section '{section}':\n{content}\nInclude Dates"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_summary_prompt() {
        let prompt = section_summary_prompt("Vitals\n------");
        assert!(prompt.starts_with("This is the data for one patient."));
        assert!(prompt.ends_with("Vitals\n------"));
    }

    #[test]
    fn test_medical_history_prompt() {
        let prompt = medical_section_prompt("Medical History", "Asthma | yes");
        assert!(prompt.contains("'yes' responses"));
        assert!(prompt.contains("Asthma | yes"));
    }

    #[test]
    fn test_generic_prompt_asks_for_dates() {
        let prompt = medical_section_prompt("Problems", "Diabetes | Active");
        assert_eq!(
            prompt,
            "Summarize the data in the section 'Problems':\nDiabetes | Active\nInclude Dates"
        );
    }

    #[test]
    fn test_empty_content_is_nothing_reported() {
        let prompt = medical_section_prompt("Notes", "");
        assert!(prompt.contains(NOTHING_REPORTED));
    }
}
