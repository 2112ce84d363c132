//! Patient demographics from the document header.
//!
//! Each field is read from a fixed path below the first `patient` element
//! and is independently optional. The name is the exception: given and
//! family name must both be present, otherwise the whole name is absent.

use chrono::NaiveDate;
use roxmltree::Node;
use serde::Serialize;

use crate::document::ClinicalDocument;
use crate::xml::{find_descendants, get_attribute, get_text, select_first};

/// Demographic attributes of the patient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Demographics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Demographics {
    /// Present fields as `(label, value)`, in display order.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Name", &self.name),
            ("Gender", &self.gender),
            ("Birthdate", &self.birthdate),
            ("Marital Status", &self.marital_status),
            ("Race", &self.race),
            ("Language", &self.language),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }

    /// Present fields rendered as `Label: value` lines.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        self.fields()
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect()
    }

    /// Whether no field could be resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Birth date parsed from the HL7 timestamp (`YYYYMMDD...`).
    ///
    /// # Examples
    /// ```
    /// use ccd_extractor::Demographics;
    /// use chrono::NaiveDate;
    ///
    /// let demographics = Demographics {
    ///     birthdate: Some("19750512".to_string()),
    ///     ..Demographics::default()
    /// };
    /// assert_eq!(demographics.birth_date(), NaiveDate::from_ymd_opt(1975, 5, 12));
    /// ```
    #[must_use]
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let value = self.birthdate.as_deref()?;
        let digits = value.get(..8)?;
        NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
    }
}

/// Extract demographics from the first `patient` element of a document.
///
/// A document without a patient yields an all-absent record.
pub fn extract_demographics(doc: &ClinicalDocument<'_>) -> Demographics {
    let Some(patient) = find_descendants(doc.root(), "patient").next() else {
        tracing::debug!("document has no patient element");
        return Demographics::default();
    };

    Demographics {
        name: full_name(patient),
        gender: coded_attribute(patient, "administrativeGenderCode", "displayName"),
        birthdate: coded_attribute(patient, "birthTime", "value"),
        marital_status: coded_attribute(patient, "maritalStatusCode", "displayName"),
        race: coded_attribute(patient, "raceCode", "displayName"),
        language: coded_attribute(patient, "languageCommunication/languageCode", "code"),
    }
}

/// Given and family name joined by a space, or `None` if either is missing.
fn full_name(patient: Node<'_, '_>) -> Option<String> {
    let given = select_first(patient, "name/given").and_then(get_text)?;
    let family = select_first(patient, "name/family").and_then(get_text)?;
    Some(format!("{given} {family}"))
}

/// An attribute of the first element matching `path` below the patient.
fn coded_attribute(patient: Node<'_, '_>, path: &str, attribute: &str) -> Option<String> {
    let element = select_first(patient, path)?;
    get_attribute(element, attribute).map(str::to_string)
}
