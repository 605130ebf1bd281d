//! Logical-line readers for UTF-16 files, little- and big-endian.
//!
//! Characters are decoded code unit by code unit so terminators (the 2-byte
//! encodings of `\r` and `\n`) can be recognized at unit granularity.
//! Surrogate pairs are combined; an unpaired surrogate or a stream ending
//! in the middle of a unit is replaced with U+FFFD and reported. A leading
//! BOM unit is dropped whether or not the detector already skipped the BOM
//! bytes.

use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::reader::{EncodingLineReader, LineCollector, ReadContext};
use crate::source::ByteSource;
use std::borrow::Cow;
use std::io::Read;

/// Byte order of a UTF-16 stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

impl Endian {
    fn unit(self, first: u8, second: u8) -> u16 {
        match self {
            Endian::Little => u16::from_le_bytes([first, second]),
            Endian::Big => u16::from_be_bytes([first, second]),
        }
    }
}

/// Reader for little-endian UTF-16 (`FF FE` BOM, or the byte order implied
/// by a `UNICODE` declaration without one).
pub(crate) struct Utf16LeLineReader<R: Read> {
    core: Utf16Core<R>,
}

impl<R: Read> Utf16LeLineReader<R> {
    pub(crate) fn new(source: ByteSource<R>) -> Self {
        Utf16LeLineReader {
            core: Utf16Core::new(source, Endian::Little),
        }
    }
}

impl<R: Read> EncodingLineReader for Utf16LeLineReader<R> {
    fn load(&mut self, ctx: &mut ReadContext<'_>) -> Result<Vec<Cow<'static, str>>> {
        self.core.load(ctx)
    }
}

/// Reader for big-endian UTF-16 (`FE FF` BOM).
pub(crate) struct Utf16BeLineReader<R: Read> {
    core: Utf16Core<R>,
}

impl<R: Read> Utf16BeLineReader<R> {
    pub(crate) fn new(source: ByteSource<R>) -> Self {
        Utf16BeLineReader {
            core: Utf16Core::new(source, Endian::Big),
        }
    }
}

impl<R: Read> EncodingLineReader for Utf16BeLineReader<R> {
    fn load(&mut self, ctx: &mut ReadContext<'_>) -> Result<Vec<Cow<'static, str>>> {
        self.core.load(ctx)
    }
}

/// The endian-independent decode loop.
struct Utf16Core<R: Read> {
    source: ByteSource<R>,
    endian: Endian,
    invalid_reported: bool,
}

impl<R: Read> Utf16Core<R> {
    fn new(source: ByteSource<R>, endian: Endian) -> Self {
        Utf16Core {
            source,
            endian,
            invalid_reported: false,
        }
    }

    fn report_invalid(&mut self, ctx: &mut ReadContext<'_>, detail: &str) {
        if !self.invalid_reported {
            self.invalid_reported = true;
            ctx.warnings.push(Diagnostic::message(format!(
                "invalid UTF-16 data ({detail}); replaced with U+FFFD"
            )));
        }
    }

    fn next_unit(&mut self, ctx: &mut ReadContext<'_>) -> Result<Option<u16>> {
        match self.source.next_pair()? {
            None => Ok(None),
            Some((first, Some(second))) => Ok(Some(self.endian.unit(first, second))),
            Some((_, None)) => {
                self.report_invalid(ctx, "odd trailing byte");
                Ok(None)
            }
        }
    }

    fn load(&mut self, ctx: &mut ReadContext<'_>) -> Result<Vec<Cow<'static, str>>> {
        let mut collector = LineCollector::new(false);
        let mut at_start = true;

        while let Some(unit) = self.next_unit(ctx)? {
            if at_start {
                at_start = false;
                if unit == 0xFEFF {
                    continue;
                }
            }
            match unit {
                0x000D => collector.feed('\r', ctx)?,
                0x000A => collector.feed('\n', ctx)?,
                0xD800..=0xDBFF => {
                    // High surrogate: needs a low surrogate to follow.
                    match self.next_unit(ctx)? {
                        Some(low @ 0xDC00..=0xDFFF) => {
                            let scalar = 0x1_0000
                                + ((u32::from(unit) - 0xD800) << 10)
                                + (u32::from(low) - 0xDC00);
                            match char::from_u32(scalar) {
                                Some(c) => collector.feed(c, ctx)?,
                                None => {
                                    self.report_invalid(ctx, "surrogate pair out of range");
                                    collector.feed('\u{FFFD}', ctx)?;
                                }
                            }
                        }
                        Some(other) => {
                            self.report_invalid(ctx, "unpaired high surrogate");
                            collector.feed('\u{FFFD}', ctx)?;
                            // The follower is an ordinary unit; decode it.
                            match char::from_u32(u32::from(other)) {
                                Some(c) if !(0xD800..=0xDFFF).contains(&other) => {
                                    collector.feed(c, ctx)?;
                                }
                                _ => collector.feed('\u{FFFD}', ctx)?,
                            }
                        }
                        None => {
                            self.report_invalid(ctx, "unpaired high surrogate at end");
                            collector.feed('\u{FFFD}', ctx)?;
                        }
                    }
                }
                0xDC00..=0xDFFF => {
                    self.report_invalid(ctx, "unpaired low surrogate");
                    collector.feed('\u{FFFD}', ctx)?;
                }
                _ => {
                    // Safe: not a surrogate, so always a valid scalar.
                    if let Some(c) = char::from_u32(u32::from(unit)) {
                        collector.feed(c, ctx)?;
                    }
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

    fn encode_le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    fn encode_be(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_be_bytes).collect()
    }

    fn load(bytes: Vec<u8>, big_endian: bool) -> (Vec<Cow<'static, str>>, Vec<Diagnostic>) {
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
        let source = ByteSource::new(Cursor::new(bytes), None);
        let lines = if big_endian {
            Utf16BeLineReader::new(source).load(&mut ctx).unwrap()
        } else {
            Utf16LeLineReader::new(source).load(&mut ctx).unwrap()
        };
        (lines, warnings)
    }

    #[test]
    fn test_little_endian_lines() {
        let (lines, warnings) = load(encode_le("0 HEAD\r\n1 CHAR UNICODE\r\n0 TRLR\r\n"), false);
        assert_eq!(lines, vec!["0 HEAD", "1 CHAR UNICODE", "0 TRLR"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_big_endian_lines() {
        let (lines, _) = load(encode_be("0 HEAD\n0 TRLR\n"), true);
        assert_eq!(lines, vec!["0 HEAD", "0 TRLR"]);
    }

    #[test]
    fn test_leading_bom_unit_dropped() {
        let (lines, _) = load(encode_le("\u{FEFF}0 HEAD\n0 TRLR\n"), false);
        assert_eq!(lines, vec!["0 HEAD", "0 TRLR"]);
    }

    #[test]
    fn test_surrogate_pair_decodes() {
        let (lines, warnings) = load(encode_le("1 NOTE \u{1F600}\n"), false);
        assert_eq!(lines, vec!["1 NOTE \u{1F600}"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_non_ascii_bmp_characters() {
        let (lines, _) = load(encode_be("1 NAME Åsa /Öberg/\n"), true);
        assert_eq!(lines, vec!["1 NAME Åsa /Öberg/"]);
    }

    #[test]
    fn test_unpaired_surrogate_replaced() {
        // High surrogate followed by 'x'.
        let mut bytes = Vec::new();
        for unit in [0x0031_u16, 0x0020, 0xD83D, 0x0078, 0x000A] {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let (lines, warnings) = load(bytes, false);
        assert_eq!(lines, vec!["1 \u{FFFD}x"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("surrogate"));
    }

    #[test]
    fn test_odd_trailing_byte_reported() {
        let mut bytes = encode_le("0 X\n");
        bytes.push(0x41);
        let (lines, warnings) = load(bytes, false);
        assert_eq!(lines, vec!["0 X"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("odd trailing byte"));
    }
}
