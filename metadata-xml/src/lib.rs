//! Generic XML tree primitives used to read Salesforce metadata documents and
//! write new ones.
//!
//! The crate knows nothing about profiles or permission sets. It turns bytes
//! into an [`XmlNode`] tree and back, nothing more.

pub mod parser;
pub mod tree;
pub mod writer;

pub use parser::{parse, parse_file, parse_str, ParseError};
pub use tree::XmlNode;
pub use writer::{write, write_document, write_file, WriteError};
