//! The eight permission categories a profile can carry into a permission set.
//!
//! Each category owns a fixed field schema. The schema order is the order in
//! which fields are written to permission set XML, and one schema field is the
//! identity field: two entries with the same identity value refer to the same
//! underlying permission target (object, field, class, ...).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// One of the eight permission kinds shared by profiles and permission sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PermissionCategory {
    #[serde(rename = "objectPermissions")]
    ObjectPermission,
    #[serde(rename = "fieldPermissions")]
    FieldPermission,
    #[serde(rename = "userPermissions")]
    UserPermission,
    #[serde(rename = "classAccesses")]
    ClassAccess,
    #[serde(rename = "applicationVisibilities")]
    ApplicationVisibility,
    #[serde(rename = "tabVisibilities")]
    TabVisibility,
    #[serde(rename = "pageAccesses")]
    PageAccess,
    #[serde(rename = "recordTypeVisibilities")]
    RecordTypeVisibility,
}

/// How a schema field is typed and defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Boolean flag, `false` when absent.
    Flag,
    /// Boolean flag whose absence is preserved and never written.
    OptionalFlag,
    /// Free text, replaced by `default` when absent or empty.
    Text { default: &'static str },
}

/// A named field in a category schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn flag(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Flag,
    }
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Text { default: "" },
    }
}

const OBJECT_SCHEMA: &[FieldSpec] = &[
    flag("allowCreate"),
    flag("allowDelete"),
    flag("allowEdit"),
    flag("allowRead"),
    flag("modifyAllRecords"),
    text("object"),
    flag("viewAllRecords"),
];
const FIELD_SCHEMA: &[FieldSpec] = &[flag("editable"), text("field"), flag("readable")];
const USER_SCHEMA: &[FieldSpec] = &[flag("enabled"), text("name")];
const CLASS_SCHEMA: &[FieldSpec] = &[text("apexClass"), flag("enabled")];
const APPLICATION_SCHEMA: &[FieldSpec] = &[text("application"), flag("default"), flag("visible")];
const TAB_SCHEMA: &[FieldSpec] = &[
    text("tab"),
    FieldSpec {
        name: "visibility",
        kind: FieldKind::Text {
            default: "DefaultOff",
        },
    },
];
const PAGE_SCHEMA: &[FieldSpec] = &[text("apexPage"), flag("enabled")];
const RECORD_TYPE_SCHEMA: &[FieldSpec] = &[
    text("recordType"),
    flag("visible"),
    FieldSpec {
        name: "default",
        kind: FieldKind::OptionalFlag,
    },
];

impl PermissionCategory {
    /// All categories in permission set output order.
    pub const ALL: [PermissionCategory; 8] = [
        PermissionCategory::ObjectPermission,
        PermissionCategory::FieldPermission,
        PermissionCategory::UserPermission,
        PermissionCategory::ClassAccess,
        PermissionCategory::ApplicationVisibility,
        PermissionCategory::TabVisibility,
        PermissionCategory::PageAccess,
        PermissionCategory::RecordTypeVisibility,
    ];

    /// XML element name of one entry, also used as the category key in name
    /// mappings and configuration.
    pub fn key(self) -> &'static str {
        match self {
            Self::ObjectPermission => "objectPermissions",
            Self::FieldPermission => "fieldPermissions",
            Self::UserPermission => "userPermissions",
            Self::ClassAccess => "classAccesses",
            Self::ApplicationVisibility => "applicationVisibilities",
            Self::TabVisibility => "tabVisibilities",
            Self::PageAccess => "pageAccesses",
            Self::RecordTypeVisibility => "recordTypeVisibilities",
        }
    }

    /// Built-in human label used in generated names.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::ObjectPermission => "ObjectAccess",
            Self::FieldPermission => "FieldAccess",
            Self::UserPermission => "UserPermissions",
            Self::ClassAccess => "ClassAccess",
            Self::ApplicationVisibility => "AppVisibility",
            Self::TabVisibility => "TabVisibility",
            Self::PageAccess => "PageAccess",
            Self::RecordTypeVisibility => "RecordTypeVisibility",
        }
    }

    /// Field schema in output order.
    pub fn schema(self) -> &'static [FieldSpec] {
        match self {
            Self::ObjectPermission => OBJECT_SCHEMA,
            Self::FieldPermission => FIELD_SCHEMA,
            Self::UserPermission => USER_SCHEMA,
            Self::ClassAccess => CLASS_SCHEMA,
            Self::ApplicationVisibility => APPLICATION_SCHEMA,
            Self::TabVisibility => TAB_SCHEMA,
            Self::PageAccess => PAGE_SCHEMA,
            Self::RecordTypeVisibility => RECORD_TYPE_SCHEMA,
        }
    }

    /// Name of the field that identifies the permission target.
    pub fn identity_field(self) -> &'static str {
        match self {
            Self::ObjectPermission => "object",
            Self::FieldPermission => "field",
            Self::UserPermission => "name",
            Self::ClassAccess => "apexClass",
            Self::ApplicationVisibility => "application",
            Self::TabVisibility => "tab",
            Self::PageAccess => "apexPage",
            Self::RecordTypeVisibility => "recordType",
        }
    }

    /// Position of the identity field within [`Self::schema`].
    pub fn identity_index(self) -> usize {
        let identity = self.identity_field();
        self.schema()
            .iter()
            .position(|field| field.name == identity)
            .unwrap_or(0)
    }

    /// Dense index of this category in [`Self::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Display for PermissionCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a string does not name one of the eight categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown permission category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for PermissionCategory {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.key() == raw)
            .ok_or_else(|| UnknownCategory(raw.to_string()))
    }
}

/// Immutable category → label table used for split names and descriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLabels {
    labels: [String; 8],
}

impl CategoryLabels {
    /// Label for `category`.
    pub fn get(&self, category: PermissionCategory) -> &str {
        &self.labels[category.index()]
    }

    /// Return a copy with the label for `category` replaced.
    pub fn with_label(mut self, category: PermissionCategory, label: impl Into<String>) -> Self {
        self.labels[category.index()] = label.into();
        self
    }
}

impl Default for CategoryLabels {
    fn default() -> Self {
        Self {
            labels: PermissionCategory::ALL.map(|category| category.default_label().to_string()),
        }
    }
}
