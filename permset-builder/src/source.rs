//! Where profile documents come from.
//!
//! Acquisition is the only step that differs between reading a folder and
//! receiving uploaded content, so it sits behind [`ProfileSource`]. Parsing
//! and extraction happen once, in [`load_profiles`].

use std::fs;
use std::path::{Path, PathBuf};

use metadata_xml::parse;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::extract::extract_profile;
use crate::permissions::NormalizedProfile;

/// File suffix of profile metadata documents.
pub const PROFILE_SUFFIX: &str = ".profile-meta.xml";

/// Raw bytes of one profile document, keyed by profile name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDocument {
    pub name: String,
    pub content: Vec<u8>,
}

impl ProfileDocument {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Errors raised while acquiring profile documents.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read profile directory {path}: {source}")]
    ReadDir {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to read profile file {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },
    #[error("no .profile-meta.xml files found in {location}")]
    NoProfiles { location: String },
}

/// Acquires raw profile documents.
pub trait ProfileSource {
    /// Human-readable location, used in errors and logs.
    fn location(&self) -> String;

    /// Return every document, in a stable order.
    fn documents(&self) -> Result<Vec<ProfileDocument>, SourceError>;
}

/// Reads `*.profile-meta.xml` files from one directory (not recursive).
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ProfileSource for DirectorySource {
    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    fn documents(&self) -> Result<Vec<ProfileDocument>, SourceError> {
        let read_dir = fs::read_dir(&self.dir).map_err(|source| SourceError::ReadDir {
            path: self.location(),
            source,
        })?;

        let mut paths = Vec::new();
        for item in read_dir {
            let item = item.map_err(|source| SourceError::ReadDir {
                path: self.location(),
                source,
            })?;
            let path = item.path();
            if path.is_file() && profile_name_from_path(&path).is_some() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(name) = profile_name_from_path(&path) else {
                continue;
            };
            let content = fs::read(&path).map_err(|source| SourceError::ReadFile {
                path: path.display().to_string(),
                source,
            })?;
            debug!(profile = %name, path = %path.display(), "read profile document");
            documents.push(ProfileDocument { name, content });
        }
        Ok(documents)
    }
}

/// Documents already held in memory, such as uploaded file contents.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<ProfileDocument>,
}

impl MemorySource {
    pub fn new(documents: Vec<ProfileDocument>) -> Self {
        Self { documents }
    }
}

impl ProfileSource for MemorySource {
    fn location(&self) -> String {
        "in-memory documents".to_string()
    }

    fn documents(&self) -> Result<Vec<ProfileDocument>, SourceError> {
        Ok(self.documents.clone())
    }
}

/// A document that could not be parsed and was loaded as an empty profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub name: String,
    pub error: String,
}

/// Profiles produced by [`load_profiles`].
#[derive(Debug, Clone, Default)]
pub struct ProfileBatch {
    pub profiles: Vec<NormalizedProfile>,
    pub failures: Vec<LoadFailure>,
}

/// Acquire, parse and extract every profile from `source`.
///
/// A document that is not well-formed XML does not abort the batch: it is
/// logged, recorded in [`ProfileBatch::failures`], and contributes an empty
/// profile so the remaining documents still convert.
pub fn load_profiles(source: &dyn ProfileSource) -> Result<ProfileBatch, SourceError> {
    let documents = source.documents()?;
    if documents.is_empty() {
        return Err(SourceError::NoProfiles {
            location: source.location(),
        });
    }

    let mut batch = ProfileBatch::default();
    for document in documents {
        match parse(&document.content) {
            Ok(root) => batch.profiles.push(extract_profile(document.name, &root)),
            Err(err) => {
                warn!(
                    profile = %document.name,
                    error = %err,
                    "failed to parse profile; treating it as empty"
                );
                batch.failures.push(LoadFailure {
                    name: document.name.clone(),
                    error: err.to_string(),
                });
                batch.profiles.push(NormalizedProfile::empty(document.name));
            }
        }
    }
    Ok(batch)
}

/// Profile name for a `<name>.profile-meta.xml` path.
pub fn profile_name_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = file_name.strip_suffix(PROFILE_SUFFIX)?;
    (!name.is_empty()).then(|| name.to_string())
}
