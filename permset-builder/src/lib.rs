//! Salesforce profile to permission set conversion.
//!
//! Profiles and permission sets share eight kinds of access grants (object,
//! field, user permission, Apex class, application, tab, Visualforce page and
//! record type). This library extracts those grants from profile metadata,
//! normalizes them, recombines them according to a generation mode and emits
//! permission set metadata documents.
//!
//! # Architecture
//!
//! ## Model
//!
//! - [`category`]: The eight categories, their field schemas and identity fields
//! - [`entry`]: A single normalized permission entry
//! - [`permissions`]: Per-category entry lists and normalized profiles
//!
//! ## Pipeline
//!
//! - [`source`]: Profile acquisition from a directory or from memory
//! - [`extract`]: Profile XML to normalized permissions
//! - [`reconcile`]: Union, intersection and complement across profiles
//! - [`naming`]: Output names and user-supplied name mappings
//! - [`document`]: Permission set XML construction
//! - [`generate`]: Generation modes producing output artifacts
//!
//! ## Reporting
//!
//! - [`stats`]: Per-category counts and run totals
//! - [`compare`]: Category-level comparison of two profiles
//! - [`report`]: Terminal rendering
//!
//! ## Configuration
//!
//! - [`config`]: Category labels and description templates
//! - [`mode`]: Generation modes
//!
//! # Examples
//!
//! ```ignore
//! use permset_builder::config::BuildConfig;
//! use permset_builder::generate::{generate, GenerateOptions};
//! use permset_builder::mode::GenerationMode;
//! use permset_builder::source::{load_profiles, DirectorySource};
//!
//! let batch = load_profiles(&DirectorySource::new("force-app/main/default/profiles"))?;
//! let artifacts = generate(
//!     &batch.profiles,
//!     GenerationMode::BaseSpecific,
//!     None,
//!     &BuildConfig::default(),
//!     GenerateOptions::default(),
//! )?;
//! for artifact in &artifacts {
//!     println!("{} ({} permissions)", artifact.filename, artifact.stats.total);
//! }
//! ```
//!
//! # Built on metadata-xml
//!
//! XML parsing and writing come from `metadata-xml`. Everything specific to
//! Salesforce metadata lives in this crate.

pub mod category;
pub mod compare;
pub mod config;
pub mod document;
pub mod entry;
pub mod extract;
pub mod generate;
pub mod mode;
pub mod naming;
pub mod permissions;
pub mod reconcile;
pub mod report;
pub mod source;
pub mod stats;
