//! Logical-line reader for UTF-8 files.
//!
//! Terminator bytes never occur inside a UTF-8 multi-byte sequence, so the
//! reader decodes sequences inline: ASCII bytes stream straight through and
//! a leading byte pulls its continuation bytes eagerly. Malformed sequences
//! (bad leading byte, truncated or invalid continuation, overlong form,
//! surrogate or out-of-range scalar) are replaced with one U+FFFD and
//! reported, and decoding resynchronizes at the next byte.

use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::reader::{EncodingLineReader, LineCollector, ReadContext};
use crate::source::ByteSource;
use std::borrow::Cow;
use std::io::Read;

pub(crate) struct Utf8LineReader<R: Read> {
    source: ByteSource<R>,
    invalid_reported: bool,
}

impl<R: Read> Utf8LineReader<R> {
    pub(crate) fn new(source: ByteSource<R>) -> Self {
        Utf8LineReader {
            source,
            invalid_reported: false,
        }
    }

    fn report_invalid(&mut self, ctx: &mut ReadContext<'_>, detail: &str) {
        if !self.invalid_reported {
            self.invalid_reported = true;
            ctx.warnings.push(Diagnostic::message(format!(
                "invalid UTF-8 sequence ({detail}); replaced with U+FFFD"
            )));
        }
    }
}

impl<R: Read> EncodingLineReader for Utf8LineReader<R> {
    fn load(&mut self, ctx: &mut ReadContext<'_>) -> Result<Vec<Cow<'static, str>>> {
        let mut collector = LineCollector::new(false);

        while let Some(byte) = self.source.next_byte()? {
            if byte.is_ascii() {
                collector.feed(byte as char, ctx)?;
                continue;
            }

            let needed: u32 = match byte {
                0xC2..=0xDF => 1,
                0xE0..=0xEF => 2,
                0xF0..=0xF4 => 3,
                _ => {
                    // Stray continuation byte or invalid leading byte.
                    self.report_invalid(ctx, &format!("leading byte 0x{byte:02X}"));
                    collector.feed('\u{FFFD}', ctx)?;
                    continue;
                }
            };

            let mut scalar = u32::from(byte) & (0x3F_u32 >> needed);
            let mut valid = true;
            for _ in 0..needed {
                let next = self.source.peek(1)?.first().copied();
                match next {
                    Some(b) if b & 0xC0 == 0x80 => {
                        scalar = (scalar << 6) | u32::from(b & 0x3F);
                        self.source.skip(1);
                    }
                    _ => {
                        valid = false;
                        break;
                    }
                }
            }

            // Reject overlong encodings and non-scalar values.
            let min = match needed {
                1 => 0x80,
                2 => 0x800,
                _ => 0x1_0000,
            };
            match char::from_u32(scalar) {
                Some(c) if valid && scalar >= min => collector.feed(c, ctx)?,
                _ => {
                    self.report_invalid(ctx, &format!("sequence starting 0x{byte:02X}"));
                    collector.feed('\u{FFFD}', ctx)?;
                }
            }
        }
        collector.finish(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::FileObserver;
    use std::io::Cursor;
    use std::sync::atomic::AtomicBool;

    fn load(bytes: &[u8]) -> (Vec<Cow<'static, str>>, Vec<Diagnostic>) {
        let cancel = AtomicBool::new(false);
        let mut observers: Vec<FileObserver> = Vec::new();
        let mut warnings = Vec::new();
        let mut ctx = ReadContext {
            cancel: &cancel,
            notification_rate: 500,
            strict_line_breaks: false,
            observers: &mut observers,
            warnings: &mut warnings,
            total_bytes: None,
        };
        let source = ByteSource::new(Cursor::new(bytes.to_vec()), None);
        let lines = Utf8LineReader::new(source).load(&mut ctx).unwrap();
        (lines, warnings)
    }

    #[test]
    fn test_multibyte_characters() {
        let (lines, warnings) = load("1 NAME José /Niño/\n2 PLAC 東京\n".as_bytes());
        assert_eq!(lines, vec!["1 NAME José /Niño/", "2 PLAC 東京"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_four_byte_sequence() {
        let (lines, warnings) = load("1 NOTE \u{1F600}\n".as_bytes());
        assert_eq!(lines, vec!["1 NOTE \u{1F600}"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_invalid_byte_replaced_with_warning() {
        let (lines, warnings) = load(b"1 NAME Fran\xE7ois\n");
        // 0xE7 expects two continuation bytes; 'o' and 'i' do not qualify.
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains('\u{FFFD}'));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_overlong_encoding_rejected() {
        // 0xC0 0xAF is the classic overlong '/'.
        let (lines, warnings) = load(b"1 NOTE \xC0\xAF\n");
        assert!(lines[0].contains('\u{FFFD}'));
        assert!(!lines[0].contains('/'));
        assert!(!warnings.is_empty());
    }

    #[test]
    fn test_truncated_sequence_at_eof() {
        let (lines, warnings) = load(b"1 NOTE x\xE2\x82");
        assert_eq!(lines, vec!["1 NOTE x\u{FFFD}"]);
        assert_eq!(warnings.len(), 1);
    }
}
