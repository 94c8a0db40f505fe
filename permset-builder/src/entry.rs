//! A single normalized permission record.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::category::{FieldKind, FieldSpec, PermissionCategory};

/// A normalized field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    /// An optional flag that was not present in the source.
    Absent,
}

impl FieldValue {
    /// Text form as written to XML. `None` for absent optional flags.
    pub fn as_xml_text(&self) -> Option<String> {
        match self {
            Self::Flag(value) => Some(value.to_string()),
            Self::Text(value) => Some(value.clone()),
            Self::Absent => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flag(value) => serializer.serialize_bool(*value),
            Self::Text(value) => serializer.serialize_str(value),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

/// One permission record, with values aligned to its category schema.
///
/// Derived equality compares every schema field, which is the strict test
/// used for intersection and complement. [`PermissionEntry::same_identity`]
/// is the looser test used for union deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionEntry {
    category: PermissionCategory,
    values: Vec<FieldValue>,
}

impl PermissionEntry {
    /// Build an entry from raw field text, normalizing every schema field.
    ///
    /// `lookup` returns the raw text of a field, or `None` when the field is
    /// missing. Fields not in the schema are never requested.
    pub fn from_lookup<'a>(
        category: PermissionCategory,
        lookup: impl Fn(&str) -> Option<&'a str>,
    ) -> Self {
        let values = category
            .schema()
            .iter()
            .map(|spec| normalize(spec, lookup(spec.name)))
            .collect();
        Self { category, values }
    }

    /// Build an entry from `(field, raw text)` pairs.
    pub fn from_pairs(category: PermissionCategory, pairs: &[(&str, &str)]) -> Self {
        Self::from_lookup(category, |name| {
            pairs
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| *value)
        })
    }

    pub fn category(&self) -> PermissionCategory {
        self.category
    }

    /// Value of the identity field. Empty when the source omitted it.
    pub fn identity_key(&self) -> &str {
        match &self.values[self.category.identity_index()] {
            FieldValue::Text(key) => key,
            _ => "",
        }
    }

    /// Whether both entries target the same permission.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.category == other.category && self.identity_key() == other.identity_key()
    }

    /// Identity match plus full field equality.
    pub fn matches(&self, other: &Self) -> bool {
        self.same_identity(other) && self == other
    }

    /// Value of the schema field `name`.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.category
            .schema()
            .iter()
            .position(|spec| spec.name == name)
            .map(|idx| &self.values[idx])
    }

    /// Boolean value of `name`; `false` for text, absent, or unknown fields.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.value(name), Some(FieldValue::Flag(true)))
    }

    /// Schema fields paired with their values, in output order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldSpec, &FieldValue)> {
        self.category.schema().iter().zip(self.values.iter())
    }
}

impl Serialize for PermissionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (spec, value) in self.fields() {
            map.serialize_entry(spec.name, value)?;
        }
        map.end()
    }
}

fn normalize(spec: &FieldSpec, raw: Option<&str>) -> FieldValue {
    let raw = raw.map(str::trim);
    match spec.kind {
        FieldKind::Flag => FieldValue::Flag(raw.is_some_and(parse_flag)),
        FieldKind::OptionalFlag => {
            raw.map_or(FieldValue::Absent, |r| FieldValue::Flag(parse_flag(r)))
        }
        FieldKind::Text { default } => match raw {
            Some(text) if !text.is_empty() => FieldValue::Text(text.to_string()),
            _ => FieldValue::Text(default.to_string()),
        },
    }
}

fn parse_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}
