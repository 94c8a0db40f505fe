use std::path::PathBuf;

use metadata_xml::{parse, parse_file, write, write_file};
use pretty_assertions::assert_eq;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parse_write_parse_preserves_tree() {
    let first = parse_file(&fixture("fixtures/profiles/Admin.profile-meta.xml"))
        .expect("initial parse should succeed");

    let written = write(&first).expect("write should succeed");
    let second = parse(&written).expect("re-parse should succeed");

    assert_eq!(first, second);
}

#[test]
fn write_file_output_parses_back() {
    let node = parse_file(&fixture("fixtures/profiles/Standard.profile-meta.xml"))
        .expect("parse should succeed");
    let out_dir = tempfile::tempdir().expect("tempdir should be created");
    let out_path = out_dir.path().join("Standard.xml");

    write_file(&node, &out_path).expect("write_file should succeed");

    let raw = std::fs::read_to_string(&out_path).expect("read back");
    assert!(raw.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    let reparsed = parse_file(&out_path).expect("parse_file should succeed");
    assert_eq!(node, reparsed);
}
