//! Character encoding detection for GEDCOM files.
//!
//! GEDCOM 5.5/5.5.1 files may be encoded as ASCII, ANSEL (the format's
//! default), UTF-8, or UTF-16 in either byte order. The encoding is declared
//! by the mandatory `1 CHAR` line in the header, but a Unicode byte-order
//! mark (or a bare UTF-16 first line without one) takes precedence over the
//! declaration, since the declaration itself cannot be read without first
//! knowing the encoding.
//!
//! Detection happens once, against a bounded peek at the head of the stream,
//! before any bytes are consumed.

use crate::diagnostics::Diagnostic;
use crate::error::{GedcomError, Result};
use crate::source::{ByteSource, DETECTION_WINDOW};
use std::fmt;
use std::io::Read;

/// Character encoding of a GEDCOM file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GedcomEncoding {
    /// 7-bit ASCII. Bytes above 0x7F are replaced and warned about.
    Ascii,
    /// ANSEL (ANSI Z39.47), the GEDCOM default. 8-bit with combining
    /// diacritics stored before their base character.
    Ansel,
    /// UTF-8, with or without a BOM.
    Utf8,
    /// UTF-16 little-endian (the `UNICODE` declaration without a BOM).
    Utf16Le,
    /// UTF-16 big-endian.
    Utf16Be,
}

impl GedcomEncoding {
    /// Map a `1 CHAR` declaration value to an encoding.
    ///
    /// Values are matched case-insensitively. `UNICODE` means UTF-16; with
    /// no BOM to dictate byte order, little-endian is assumed (the order
    /// produced by the systems that wrote such files).
    ///
    /// # Errors
    ///
    /// Returns [`GedcomError::UnsupportedEncoding`] for any other value.
    pub fn from_char_declaration(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ANSEL" => Ok(GedcomEncoding::Ansel),
            "ASCII" => Ok(GedcomEncoding::Ascii),
            "UTF-8" | "UTF8" => Ok(GedcomEncoding::Utf8),
            "UNICODE" => Ok(GedcomEncoding::Utf16Le),
            other => Err(GedcomError::UnsupportedEncoding(format!(
                "Unrecognized CHAR declaration: {other}"
            ))),
        }
    }

    /// The canonical `1 CHAR` value naming this encoding.
    #[must_use]
    pub fn as_char_declaration(&self) -> &'static str {
        match self {
            GedcomEncoding::Ascii => "ASCII",
            GedcomEncoding::Ansel => "ANSEL",
            GedcomEncoding::Utf8 => "UTF-8",
            GedcomEncoding::Utf16Le | GedcomEncoding::Utf16Be => "UNICODE",
        }
    }

    /// Whether this is one of the two UTF-16 variants.
    #[must_use]
    pub fn is_utf16(&self) -> bool {
        matches!(self, GedcomEncoding::Utf16Le | GedcomEncoding::Utf16Be)
    }
}

impl fmt::Display for GedcomEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GedcomEncoding::Ascii => "ASCII",
            GedcomEncoding::Ansel => "ANSEL",
            GedcomEncoding::Utf8 => "UTF-8",
            GedcomEncoding::Utf16Le => "UTF-16LE",
            GedcomEncoding::Utf16Be => "UTF-16BE",
        };
        f.write_str(name)
    }
}

/// Outcome of encoding detection.
#[derive(Debug)]
pub struct Detection {
    /// The encoding the line reader must use.
    pub encoding: GedcomEncoding,
    /// Leading BOM bytes to skip before reading, 0 if none.
    pub bom_len: usize,
    /// A warning produced during detection (e.g. no `CHAR` declaration
    /// found, so the format default was assumed).
    pub warning: Option<Diagnostic>,
}

/// Detect the encoding from the head of the stream without consuming it.
///
/// Order of precedence, per the format rules:
/// 1. A UTF-8 or UTF-16 BOM.
/// 2. A first byte pair that can only be UTF-16 text: `'0'` then NUL, or
///    NUL then `'0'`, since every GEDCOM file starts with `0 HEAD`.
/// 3. The `1 CHAR <value>` declaration found by scanning a bounded ASCII
///    prefix of the stream.
/// 4. The format default, ANSEL, with a warning.
///
/// # Errors
///
/// Returns [`GedcomError::UnsupportedEncoding`] when the `CHAR` declaration
/// names an unknown encoding, and I/O errors from peeking.
pub fn detect_encoding<R: Read>(source: &mut ByteSource<R>) -> Result<Detection> {
    let head = source.peek(4)?;

    if head.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Ok(Detection {
            encoding: GedcomEncoding::Utf8,
            bom_len: 3,
            warning: None,
        });
    }
    if head.starts_with(&[0xFF, 0xFE]) {
        return Ok(Detection {
            encoding: GedcomEncoding::Utf16Le,
            bom_len: 2,
            warning: None,
        });
    }
    if head.starts_with(&[0xFE, 0xFF]) {
        return Ok(Detection {
            encoding: GedcomEncoding::Utf16Be,
            bom_len: 2,
            warning: None,
        });
    }
    // BOM-less UTF-16: the first character of any GEDCOM file is '0'.
    if head.starts_with(&[0x30, 0x00]) {
        return Ok(Detection {
            encoding: GedcomEncoding::Utf16Le,
            bom_len: 0,
            warning: None,
        });
    }
    if head.starts_with(&[0x00, 0x30]) {
        return Ok(Detection {
            encoding: GedcomEncoding::Utf16Be,
            bom_len: 0,
            warning: None,
        });
    }

    let window = source.peek(DETECTION_WINDOW)?;
    match find_char_declaration(window) {
        Some(value) => {
            let encoding = GedcomEncoding::from_char_declaration(&value)?;
            Ok(Detection {
                encoding,
                bom_len: 0,
                warning: None,
            })
        }
        None => Ok(Detection {
            encoding: GedcomEncoding::Ansel,
            bom_len: 0,
            warning: Some(Diagnostic::message(
                "no CHAR declaration found in header; assuming ANSEL",
            )),
        }),
    }
}

/// Scan a raw byte window for the `1 CHAR <value>` header line and return
/// the declared value. The window is treated as ASCII; in every encoding
/// this detector can reach here (ASCII, ANSEL, UTF-8), the declaration line
/// itself is pure ASCII.
fn find_char_declaration(window: &[u8]) -> Option<String> {
    for raw_line in window.split(|&b| b == b'\r' || b == b'\n') {
        let line: Vec<u8> = raw_line
            .iter()
            .copied()
            .filter(|&b| b.is_ascii() && b != 0)
            .collect();
        let text = String::from_utf8_lossy(&line);
        let mut parts = text.trim().splitn(3, ' ');
        let level = parts.next()?;
        if level != "1" {
            continue;
        }
        if parts.next() != Some("CHAR") {
            continue;
        }
        if let Some(value) = parts.next() {
            return Some(value.trim().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn detect(bytes: &[u8]) -> Detection {
        let mut src = ByteSource::new(Cursor::new(bytes.to_vec()), None);
        detect_encoding(&mut src).unwrap()
    }

    #[test]
    fn test_utf8_bom() {
        let d = detect(b"\xEF\xBB\xBF0 HEAD\n1 CHAR ANSEL\n");
        assert_eq!(d.encoding, GedcomEncoding::Utf8);
        assert_eq!(d.bom_len, 3);
    }

    #[test]
    fn test_utf16le_bom() {
        let d = detect(&[0xFF, 0xFE, 0x30, 0x00]);
        assert_eq!(d.encoding, GedcomEncoding::Utf16Le);
        assert_eq!(d.bom_len, 2);
    }

    #[test]
    fn test_utf16be_bom() {
        let d = detect(&[0xFE, 0xFF, 0x00, 0x30]);
        assert_eq!(d.encoding, GedcomEncoding::Utf16Be);
        assert_eq!(d.bom_len, 2);
    }

    #[test]
    fn test_bomless_utf16_patterns() {
        let d = detect(&[0x30, 0x00, 0x20, 0x00]);
        assert_eq!(d.encoding, GedcomEncoding::Utf16Le);
        assert_eq!(d.bom_len, 0);

        let d = detect(&[0x00, 0x30, 0x00, 0x20]);
        assert_eq!(d.encoding, GedcomEncoding::Utf16Be);
        assert_eq!(d.bom_len, 0);
    }

    #[test]
    fn test_char_declaration_scan() {
        let d = detect(b"0 HEAD\r\n1 SOUR X\r\n1 CHAR ASCII\r\n0 TRLR\r\n");
        assert_eq!(d.encoding, GedcomEncoding::Ascii);
        assert!(d.warning.is_none());

        let d = detect(b"0 HEAD\n1 CHAR UTF-8\n0 TRLR\n");
        assert_eq!(d.encoding, GedcomEncoding::Utf8);
    }

    #[test]
    fn test_char_declaration_case_insensitive() {
        let d = detect(b"0 HEAD\n1 CHAR ansel\n0 TRLR\n");
        assert_eq!(d.encoding, GedcomEncoding::Ansel);
    }

    #[test]
    fn test_unicode_declaration_without_bom() {
        // ASCII-encoded declaration naming UNICODE still selects UTF-16LE.
        assert_eq!(
            GedcomEncoding::from_char_declaration("Unicode").unwrap(),
            GedcomEncoding::Utf16Le
        );
    }

    #[test]
    fn test_unknown_declaration_is_fatal() {
        let mut src = ByteSource::new(
            Cursor::new(b"0 HEAD\n1 CHAR EBCDIC\n0 TRLR\n".to_vec()),
            None,
        );
        let err = detect_encoding(&mut src).unwrap_err();
        assert!(matches!(err, GedcomError::UnsupportedEncoding(_)));
        assert!(err.to_string().contains("EBCDIC"));
    }

    #[test]
    fn test_missing_declaration_defaults_to_ansel() {
        let d = detect(b"0 HEAD\n1 SOUR X\n0 TRLR\n");
        assert_eq!(d.encoding, GedcomEncoding::Ansel);
        assert!(d.warning.is_some());
    }

    #[test]
    fn test_detection_does_not_consume() {
        let bytes = b"0 HEAD\n1 CHAR ASCII\n0 TRLR\n";
        let mut src = ByteSource::new(Cursor::new(bytes.to_vec()), None);
        detect_encoding(&mut src).unwrap();
        assert_eq!(src.next_byte().unwrap(), Some(b'0'));
    }
}
