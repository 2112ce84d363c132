//! Namespace-qualified navigation over CDA DOM trees.
//!
//! Names passed to these helpers are resolved through the namespace
//! registry: `"section"` means `{urn:hl7-org:v3}section` and
//! `"sdtc:raceCode"` means `{urn:hl7-org:sdtc}raceCode`. A name with an
//! unregistered prefix matches nothing.

use roxmltree::Node;

use super::namespaces::QName;

/// Find the first child element with the given qualified name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ccd_extractor::xml::find_child;
///
/// let xml = r#"<section xmlns="urn:hl7-org:v3"><title>Vitals</title></section>"#;
/// let doc = Document::parse(xml).unwrap();
/// let section = doc.root_element();
///
/// assert!(find_child(section, "title").is_some());
/// assert!(find_child(section, "text").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    let qname = QName::parse(name)?;
    node.children().find(|child| qname.matches(*child))
}

/// Find all descendant elements (excluding `node` itself) with the given
/// qualified name, in document order.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ccd_extractor::xml::find_descendants;
///
/// let xml = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
///   <component><section/><section><section/></section></component>
/// </ClinicalDocument>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert_eq!(find_descendants(doc.root_element(), "section").count(), 3);
/// ```
pub fn find_descendants<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    let qname = QName::parse(name);
    node.descendants()
        .skip(1)
        .filter(move |child| qname.is_some_and(|q| q.matches(*child)))
}

/// Select every element matching `path` anywhere below `node`.
///
/// The first step matches descendants at any depth; every following step
/// matches direct children of the previous step. `"thead/tr/th"` selects
/// each `th` of each `tr` of every `thead` under `node`, in document order.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ccd_extractor::xml::select_all;
///
/// let xml = r#"<table xmlns="urn:hl7-org:v3">
///   <thead><tr><th>Name</th><th>Status</th></tr></thead>
/// </table>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert_eq!(select_all(doc.root_element(), "thead/tr/th").len(), 2);
/// ```
pub fn select_all<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    let steps: Option<Vec<QName<'_>>> = path.split('/').map(QName::parse).collect();
    let Some(steps) = steps else {
        tracing::debug!(path, "path uses an unregistered namespace prefix");
        return Vec::new();
    };
    let Some((first, rest)) = steps.split_first() else {
        return Vec::new();
    };

    let mut selected: Vec<Node<'a, 'input>> = node
        .descendants()
        .skip(1)
        .filter(|n| first.matches(*n))
        .collect();

    for step in rest {
        selected = selected
            .into_iter()
            .flat_map(|n| n.children())
            .filter(|n| step.matches(*n))
            .collect();
    }

    selected
}

/// Select the first element matching `path` below `node`.
///
/// Same path semantics as [`select_all`].
pub fn select_first<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    select_all(node, path).into_iter().next()
}

/// Get the direct text of an element, if it has any non-blank text.
///
/// Only the text before the first child element counts; text nested in
/// child elements is ignored.
pub fn direct_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().filter(|t| !t.trim().is_empty())
}

/// Concatenate all non-blank text below `node`, each fragment trimmed and
/// fragments separated by a single space.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ccd_extractor::xml::descendant_text;
///
/// let xml = "<td><content>Line one</content><br/><content>Line two</content></td>";
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(descendant_text(doc.root_element()), "Line one Line two");
/// ```
pub fn descendant_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of a table cell.
///
/// The cell's direct text when it has any, otherwise the concatenated text
/// of its descendants. The direct text is returned as-is.
pub fn cell_text(node: Node<'_, '_>) -> String {
    direct_text(node)
        .map(str::to_string)
        .unwrap_or_else(|| descendant_text(node))
}

/// Get the trimmed direct text of an element, or `None` if blank.
pub fn get_text(node: Node<'_, '_>) -> Option<String> {
    direct_text(node).map(|t| t.trim().to_string())
}

/// Get a non-blank attribute value from an element.
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).filter(|v| !v.trim().is_empty())
}
