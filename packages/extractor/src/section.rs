//! Title-indexed access to document sections.
//!
//! Sections are found anywhere in the tree, in document order, and are
//! identified by the direct text of their `title` child. Titles are matched
//! exactly; when two sections share a title the first one wins.

use roxmltree::Node;

use crate::document::ClinicalDocument;
use crate::error::{ExtractorError, Result};
use crate::xml::{direct_text, find_child, find_descendants};

/// A borrowed view onto a `section` element.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> Section<'a, 'input> {
    /// Wrap a `section` element.
    #[must_use]
    pub fn new(node: Node<'a, 'input>) -> Self {
        Self { node }
    }

    /// The section's title, if it has a `title` child with non-blank text.
    #[must_use]
    pub fn title(&self) -> Option<&'a str> {
        find_child(self.node, "title").and_then(direct_text)
    }

    /// The underlying `section` element.
    #[must_use]
    pub fn node(&self) -> Node<'a, 'input> {
        self.node
    }

    /// The section's subtree exactly as it appears in the source text.
    #[must_use]
    pub fn to_xml(&self) -> &'a str {
        let text = self.node.document().input_text();
        text.get(self.node.range()).unwrap_or_default()
    }
}

/// All sections of a document, in document order, nested ones included.
pub fn sections<'a, 'input>(doc: &'a ClinicalDocument<'input>) -> Vec<Section<'a, 'input>> {
    find_descendants(doc.root(), "section")
        .map(Section::new)
        .collect()
}

/// List the titles of all titled sections, in document order.
///
/// Untitled sections are skipped.
///
/// # Examples
/// ```
/// use ccd_extractor::{list_section_titles, ClinicalDocument};
///
/// let xml = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
///   <component><section><title>Allergies</title></section></component>
///   <component><section/></component>
///   <component><section><title>Vitals</title></section></component>
/// </ClinicalDocument>"#;
/// let doc = ClinicalDocument::parse(xml).unwrap();
///
/// assert_eq!(list_section_titles(&doc), vec!["Allergies", "Vitals"]);
/// ```
pub fn list_section_titles(doc: &ClinicalDocument<'_>) -> Vec<String> {
    sections(doc)
        .iter()
        .filter_map(Section::title)
        .map(str::to_string)
        .collect()
}

/// Find the first section whose title equals `title` exactly.
///
/// Returns [`ExtractorError::SectionNotFound`] when no section matches, so
/// a missing section can be told apart from a present but empty one.
pub fn find_section<'a, 'input>(
    doc: &'a ClinicalDocument<'input>,
    title: &str,
) -> Result<Section<'a, 'input>> {
    let found = find_descendants(doc.root(), "section")
        .map(Section::new)
        .find(|section| section.title() == Some(title));

    match found {
        Some(section) => Ok(section),
        None => {
            tracing::debug!(title, "section not found");
            Err(ExtractorError::SectionNotFound(title.to_string()))
        }
    }
}
