//! Logical-line reader for ANSEL files.
//!
//! ANSEL stores combining diacritics *before* the base character they
//! modify; Unicode places them after. The reader buffers pending marks and
//! emits them behind the next base character, then each finished line is
//! NFC-normalized by the collector so `0xE2 'a'` comes out as the single
//! code point `á`.
//!
//! Unmapped high bytes are replaced with U+FFFD and reported once per byte
//! value per load.

use crate::ansel_tables;
use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::reader::{EncodingLineReader, LineCollector, ReadContext};
use crate::source::ByteSource;
use std::borrow::Cow;
use std::io::Read;

pub(crate) struct AnselLineReader<R: Read> {
    source: ByteSource<R>,
    reported: [bool; 256],
}

impl<R: Read> AnselLineReader<R> {
    pub(crate) fn new(source: ByteSource<R>) -> Self {
        AnselLineReader {
            source,
            reported: [false; 256],
        }
    }
}

impl<R: Read> EncodingLineReader for AnselLineReader<R> {
    fn load(&mut self, ctx: &mut ReadContext<'_>) -> Result<Vec<Cow<'static, str>>> {
        let mut collector = LineCollector::new(true);
        let mut pending_marks: Vec<char> = Vec::new();

        while let Some(byte) = self.source.next_byte()? {
            let decoded = if byte.is_ascii() {
                Some((byte as char, false))
            } else {
                ansel_tables::lookup(byte)
            };

            match decoded {
                Some((mark, true)) => pending_marks.push(mark),
                Some((base, false)) => {
                    // Terminators cannot carry marks; flush strays first so
                    // they stay on the line they appeared in.
                    if base == '\r' || base == '\n' {
                        for mark in pending_marks.drain(..) {
                            collector.feed(mark, ctx)?;
                        }
                        collector.feed(base, ctx)?;
                    } else {
                        collector.feed(base, ctx)?;
                        for mark in pending_marks.drain(..) {
                            collector.feed(mark, ctx)?;
                        }
                    }
                }
                None => {
                    if !self.reported[byte as usize] {
                        self.reported[byte as usize] = true;
                        ctx.warnings.push(Diagnostic::message(format!(
                            "byte 0x{byte:02X} has no ANSEL mapping; replaced with U+FFFD"
                        )));
                    }
                    collector.feed('\u{FFFD}', ctx)?;
                    for mark in pending_marks.drain(..) {
                        collector.feed(mark, ctx)?;
                    }
                }
            }
        }
        // Marks with no following base at end of stream.
        for mark in pending_marks {
            collector.feed(mark, ctx)?;
        }
        collector.finish(ctx)
    }
}
