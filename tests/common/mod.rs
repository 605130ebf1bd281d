//! Shared helpers for the integration test suite.

use gedrc::{GedcomParser, ParseOutcome};
use std::path::PathBuf;

/// Path of a fixture under `tests/data/`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

/// Load a fixture with default options, panicking on fatal failure.
pub fn load_fixture(name: &str) -> ParseOutcome {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut parser = GedcomParser::new();
    parser
        .load_file(fixture_path(name))
        .unwrap_or_else(|failure| panic!("fixture {name} failed to parse: {failure}"))
}

/// Encode text as UTF-16, optionally BOM-prefixed.
pub fn encode_utf16(text: &str, big_endian: bool, bom: bool) -> Vec<u8> {
    let mut bytes = Vec::new();
    let units = std::iter::once(0xFEFF_u16)
        .take(usize::from(bom))
        .chain(text.encode_utf16());
    for unit in units {
        if big_endian {
            bytes.extend_from_slice(&unit.to_be_bytes());
        } else {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
    }
    bytes
}
