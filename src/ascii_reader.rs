//! Logical-line reader for ASCII files.
//!
//! Bytes above 0x7F have no meaning in ASCII; each distinct offender is
//! replaced with U+FFFD and reported once per load, and reading continues.

use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::reader::{EncodingLineReader, LineCollector, ReadContext};
use crate::source::ByteSource;
use std::borrow::Cow;
use std::io::Read;

pub(crate) struct AsciiLineReader<R: Read> {
    source: ByteSource<R>,
    /// Byte values already reported, to keep a mis-encoded file from
    /// flooding the warning list.
    reported: [bool; 256],
}

impl<R: Read> AsciiLineReader<R> {
    pub(crate) fn new(source: ByteSource<R>) -> Self {
        AsciiLineReader {
            source,
            reported: [false; 256],
        }
    }
}

impl<R: Read> EncodingLineReader for AsciiLineReader<R> {
    fn load(&mut self, ctx: &mut ReadContext<'_>) -> Result<Vec<Cow<'static, str>>> {
        let mut collector = LineCollector::new(false);
        while let Some(byte) = self.source.next_byte()? {
            if byte.is_ascii() {
                collector.feed(byte as char, ctx)?;
            } else {
                if !self.reported[byte as usize] {
                    self.reported[byte as usize] = true;
                    ctx.warnings.push(Diagnostic::message(format!(
                        "byte 0x{byte:02X} is not ASCII; replaced with U+FFFD"
                    )));
                }
                collector.feed('\u{FFFD}', ctx)?;
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
        let lines = AsciiLineReader::new(source).load(&mut ctx).unwrap();
        (lines, warnings)
    }

    #[test]
    fn test_plain_ascii() {
        let (lines, warnings) = load(b"0 HEAD\r\n1 CHAR ASCII\r\n0 TRLR\r\n");
        assert_eq!(lines, vec!["0 HEAD", "1 CHAR ASCII", "0 TRLR"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_high_byte_replaced_with_warning() {
        let (lines, warnings) = load(b"1 NAME Fran\xE7ois\n");
        assert_eq!(lines, vec!["1 NAME Fran\u{FFFD}ois"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("0xE7"));
    }

    #[test]
    fn test_repeated_high_byte_reported_once() {
        let (_, warnings) = load(b"1 NOTE \xE9\xE9\xE9\n2 CONT \xE9\xFC\n");
        // One warning for 0xE9, one for 0xFC.
        assert_eq!(warnings.len(), 2);
    }
}
