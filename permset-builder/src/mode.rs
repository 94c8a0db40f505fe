use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::generate::InputError;

/// How profiles are recombined into permission sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GenerationMode {
    /// One permission set per profile.
    #[serde(rename = "single")]
    Single,
    /// One permission set per profile and non-empty category.
    #[serde(rename = "split")]
    Split,
    /// One permission set holding the deduplicated union of all profiles.
    #[serde(rename = "unified")]
    Unified,
    /// A shared `Common` set plus one set per profile with its differences.
    #[serde(rename = "base+specific")]
    BaseSpecific,
}

impl GenerationMode {
    pub const ALL: [GenerationMode; 4] = [
        GenerationMode::Single,
        GenerationMode::Split,
        GenerationMode::Unified,
        GenerationMode::BaseSpecific,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Split => "split",
            Self::Unified => "unified",
            Self::BaseSpecific => "base+specific",
        }
    }
}

impl Display for GenerationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = InputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == raw)
            .ok_or_else(|| InputError::UnsupportedMode(raw.to_string()))
    }
}
