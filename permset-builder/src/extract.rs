//! Profile document → normalized permissions.
//!
//! Extraction never fails. A document whose root is not `Profile` yields an
//! empty permission map, and fields missing from an entry take the schema
//! default. Parse errors belong to the caller that produced the tree.

use metadata_xml::XmlNode;
use tracing::debug;

use crate::category::PermissionCategory;
use crate::entry::PermissionEntry;
use crate::permissions::{NormalizedProfile, PermissionMap};

/// Root element of a profile metadata document.
pub const PROFILE_ROOT: &str = "Profile";

/// Extract every permission category from a parsed profile document.
pub fn extract(root: &XmlNode) -> PermissionMap {
    let mut permissions = PermissionMap::new();

    if root.tag != PROFILE_ROOT {
        debug!(root = %root.tag, "document root is not a profile; no permissions extracted");
        return permissions;
    }

    for category in PermissionCategory::ALL {
        for node in root.get_children(category.key()) {
            permissions.push(extract_entry(category, node));
        }
    }

    permissions
}

/// Extract a named profile.
pub fn extract_profile(name: impl Into<String>, root: &XmlNode) -> NormalizedProfile {
    let name = name.into();
    let permissions = extract(root);
    debug!(profile = %name, total = permissions.total(), "extracted profile permissions");
    NormalizedProfile::new(name, permissions)
}

fn extract_entry(category: PermissionCategory, node: &XmlNode) -> PermissionEntry {
    PermissionEntry::from_lookup(category, |field| node.child_text(field))
}
