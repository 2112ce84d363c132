//! XML utilities: the namespace registry and qualified tree navigation.

mod namespaces;
mod utils;

pub use namespaces::{resolve_prefix, Namespace, QName, HL7_V3_URI, SDTC_URI, XSI_URI};
pub use utils::{
    cell_text, descendant_text, direct_text, find_child, find_descendants, get_attribute,
    get_text, select_all, select_first,
};
