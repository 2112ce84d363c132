//! Namespace registry for CDA documents.
//!
//! Every element lookup in this crate is qualified through this registry.
//! Unprefixed names belong to the HL7 v3 namespace, which is the default
//! namespace of a CDA document.

use roxmltree::Node;

/// HL7 v3 namespace, the default namespace of CDA documents.
pub const HL7_V3_URI: &str = "urn:hl7-org:v3";

/// XML Schema instance namespace (`xsi:type` and friends).
pub const XSI_URI: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// HL7 SDTC extension namespace.
pub const SDTC_URI: &str = "urn:hl7-org:sdtc";

/// A namespace known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `default` → `urn:hl7-org:v3`.
    Hl7,
    /// `xsi` → XML Schema instance.
    Xsi,
    /// `sdtc` → `urn:hl7-org:sdtc`.
    Sdtc,
}

impl Namespace {
    /// All registered namespaces.
    pub const ALL: [Namespace; 3] = [Namespace::Hl7, Namespace::Xsi, Namespace::Sdtc];

    /// Short prefix used in qualified names.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Hl7 => "default",
            Self::Xsi => "xsi",
            Self::Sdtc => "sdtc",
        }
    }

    /// Namespace URI.
    #[must_use]
    pub fn uri(self) -> &'static str {
        match self {
            Self::Hl7 => HL7_V3_URI,
            Self::Xsi => XSI_URI,
            Self::Sdtc => SDTC_URI,
        }
    }

    /// Look up a namespace by its registered prefix.
    ///
    /// # Examples
    /// ```
    /// use ccd_extractor::xml::Namespace;
    ///
    /// assert_eq!(Namespace::from_prefix("sdtc"), Some(Namespace::Sdtc));
    /// assert_eq!(Namespace::from_prefix("fhir"), None);
    /// ```
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.prefix() == prefix)
    }
}

/// Resolve a registered prefix to its namespace URI.
#[must_use]
pub fn resolve_prefix(prefix: &str) -> Option<&'static str> {
    Namespace::from_prefix(prefix).map(Namespace::uri)
}

/// A namespace-qualified element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QName<'n> {
    pub namespace: Namespace,
    pub local: &'n str,
}

impl<'n> QName<'n> {
    /// Name in the default (HL7 v3) namespace.
    #[must_use]
    pub fn hl7(local: &'n str) -> Self {
        Self {
            namespace: Namespace::Hl7,
            local,
        }
    }

    /// Parse `prefix:local` or `local`.
    ///
    /// Returns `None` when the prefix is not registered.
    ///
    /// # Examples
    /// ```
    /// use ccd_extractor::xml::{Namespace, QName};
    ///
    /// let name = QName::parse("sdtc:raceCode").unwrap();
    /// assert_eq!(name.namespace, Namespace::Sdtc);
    /// assert_eq!(name.local, "raceCode");
    ///
    /// assert_eq!(QName::parse("section").unwrap().namespace, Namespace::Hl7);
    /// assert!(QName::parse("bogus:section").is_none());
    /// ```
    #[must_use]
    pub fn parse(name: &'n str) -> Option<Self> {
        match name.split_once(':') {
            Some((prefix, local)) => Some(Self {
                namespace: Namespace::from_prefix(prefix)?,
                local,
            }),
            None => Some(Self::hl7(name)),
        }
    }

    /// Whether `node` is an element with this qualified name.
    #[must_use]
    pub fn matches(&self, node: Node<'_, '_>) -> bool {
        node.is_element()
            && node.tag_name().name() == self.local
            && node.tag_name().namespace() == Some(self.namespace.uri())
    }
}
