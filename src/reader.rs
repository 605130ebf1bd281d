//! The line-reading contract shared by all encodings.
//!
//! Each encoding gets its own reader ([`crate::ascii_reader`],
//! [`crate::ansel_reader`], [`crate::utf8_reader`], [`crate::utf16_reader`]);
//! all five implement [`EncodingLineReader`] and delegate the parts that do
//! not depend on the encoding (terminator folding, blank-line discarding,
//! interning, progress cadence, cancellation) to [`LineCollector`].
//!
//! Logical lines come back with their terminators stripped and are never
//! empty. All four terminator dialects (`\r`, `\n`, `\r\n`, `\n\r`) fold to
//! a single line boundary; consecutive terminators produce blank lines,
//! which are discarded.

use crate::diagnostics::Diagnostic;
use crate::encoding::GedcomEncoding;
use crate::error::{GedcomError, Result};
use crate::intern::intern;
use crate::progress::{notify_file_observers, FileObserver, FileProgressEvent};
use crate::source::ByteSource;
use std::borrow::Cow;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use unicode_normalization::UnicodeNormalization;

/// Everything a reader needs from the parser while loading lines.
pub(crate) struct ReadContext<'a> {
    /// Externally-settable cancellation flag, checked at every line boundary.
    pub cancel: &'a AtomicBool,
    /// Lines between progress events.
    pub notification_rate: usize,
    /// Warn about terminator dialects other than `\r\n` and `\n`.
    pub strict_line_breaks: bool,
    /// Observers to notify with [`FileProgressEvent`]s.
    pub observers: &'a mut Vec<FileObserver>,
    /// Warning sink.
    pub warnings: &'a mut Vec<Diagnostic>,
    /// Total stream size, forwarded into progress events.
    pub total_bytes: Option<u64>,
}

/// Contract shared by the five encoding-specific readers: consume the whole
/// stream and return its logical lines in order.
pub(crate) trait EncodingLineReader {
    fn load(&mut self, ctx: &mut ReadContext<'_>) -> Result<Vec<Cow<'static, str>>>;
}

/// Choose and run the reader for a detected encoding. The BOM, if any, must
/// already have been skipped on `source`.
pub(crate) fn load_lines<R: Read>(
    encoding: GedcomEncoding,
    source: ByteSource<R>,
    ctx: &mut ReadContext<'_>,
) -> Result<Vec<Cow<'static, str>>> {
    match encoding {
        GedcomEncoding::Ascii => crate::ascii_reader::AsciiLineReader::new(source).load(ctx),
        GedcomEncoding::Ansel => crate::ansel_reader::AnselLineReader::new(source).load(ctx),
        GedcomEncoding::Utf8 => crate::utf8_reader::Utf8LineReader::new(source).load(ctx),
        GedcomEncoding::Utf16Le => crate::utf16_reader::Utf16LeLineReader::new(source).load(ctx),
        GedcomEncoding::Utf16Be => crate::utf16_reader::Utf16BeLineReader::new(source).load(ctx),
    }
}

/// Folds a decoded character stream into logical lines.
///
/// Readers feed every decoded character (terminators included) through
/// [`feed`](Self::feed) and call [`finish`](Self::finish) at end of stream.
pub(crate) struct LineCollector {
    lines: Vec<Cow<'static, str>>,
    buffer: String,
    lines_read: usize,
    /// The terminator character that ended the previous line, if the next
    /// character might pair with it.
    pending_terminator: Option<char>,
    /// NFC-normalize each finished line (used after ANSEL decoding, which
    /// synthesizes combining-mark sequences).
    normalize_nfc: bool,
    warned_bare_cr: bool,
    warned_lf_cr: bool,
}

impl LineCollector {
    pub(crate) fn new(normalize_nfc: bool) -> Self {
        LineCollector {
            lines: Vec::new(),
            buffer: String::new(),
            lines_read: 0,
            pending_terminator: None,
            normalize_nfc,
            warned_bare_cr: false,
            warned_lf_cr: false,
        }
    }

    /// Feed one decoded character.
    pub(crate) fn feed(&mut self, c: char, ctx: &mut ReadContext<'_>) -> Result<()> {
        if c == '\r' || c == '\n' {
            if let Some(prev) = self.pending_terminator.take() {
                if prev != c {
                    // Second half of a \r\n or \n\r pair: one terminator.
                    if prev == '\n' {
                        self.warn_lf_cr(ctx);
                    }
                    return Ok(());
                }
                // Same character twice: the previous one stood alone.
                if prev == '\r' {
                    self.warn_bare_cr(ctx);
                }
            }
            self.end_line(ctx)?;
            self.pending_terminator = Some(c);
        } else {
            if self.pending_terminator.take() == Some('\r') {
                self.warn_bare_cr(ctx);
            }
            self.buffer.push(c);
        }
        Ok(())
    }

    /// Flush the final line and emit the completion event.
    pub(crate) fn finish(mut self, ctx: &mut ReadContext<'_>) -> Result<Vec<Cow<'static, str>>> {
        if self.pending_terminator.take() == Some('\r') {
            self.warn_bare_cr(ctx);
        }
        self.end_line(ctx)?;
        let event = FileProgressEvent {
            lines_read: self.lines_read,
            total_bytes: ctx.total_bytes,
            complete: true,
        };
        notify_file_observers(ctx.observers, &event);
        Ok(self.lines)
    }

    /// Close the current line buffer. Blank lines are discarded and do not
    /// count toward the progress cadence.
    fn end_line(&mut self, ctx: &mut ReadContext<'_>) -> Result<()> {
        if ctx.cancel.load(Ordering::Relaxed) {
            return Err(GedcomError::Cancelled);
        }
        if self.buffer.is_empty() {
            return Ok(());
        }
        let line = std::mem::take(&mut self.buffer);
        let line = if self.normalize_nfc {
            line.nfc().collect()
        } else {
            line
        };
        self.lines.push(intern(line));
        self.lines_read += 1;
        if self.lines_read % ctx.notification_rate == 0 {
            let event = FileProgressEvent {
                lines_read: self.lines_read,
                total_bytes: ctx.total_bytes,
                complete: false,
            };
            notify_file_observers(ctx.observers, &event);
        }
        Ok(())
    }

    fn warn_bare_cr(&mut self, ctx: &mut ReadContext<'_>) {
        if ctx.strict_line_breaks && !self.warned_bare_cr {
            self.warned_bare_cr = true;
            ctx.warnings.push(Diagnostic::message(
                "line terminated by bare carriage return; strict mode expects \\r\\n or \\n",
            ));
        }
    }

    fn warn_lf_cr(&mut self, ctx: &mut ReadContext<'_>) {
        if ctx.strict_line_breaks && !self.warned_lf_cr {
            self.warned_lf_cr = true;
            ctx.warnings.push(Diagnostic::message(
                "line terminated by \\n\\r; strict mode expects \\r\\n or \\n",
            ));
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Run a collector over a plain character sequence with default options,
    /// returning the lines and any warnings.
    pub(crate) fn collect(
        text: &str,
        strict_line_breaks: bool,
    ) -> (Vec<Cow<'static, str>>, Vec<Diagnostic>) {
        let cancel = AtomicBool::new(false);
        let mut observers = Vec::new();
        let mut warnings = Vec::new();
        let mut ctx = ReadContext {
            cancel: &cancel,
            notification_rate: 500,
            strict_line_breaks,
            observers: &mut observers,
            warnings: &mut warnings,
            total_bytes: None,
        };
        let mut collector = LineCollector::new(false);
        for c in text.chars() {
            collector.feed(c, &mut ctx).unwrap();
        }
        let lines = collector.finish(&mut ctx).unwrap();
        (lines, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::collect;
    use super::*;

    #[test]
    fn test_all_terminator_dialects_are_equivalent() {
        let expected = vec!["0 HEAD", "1 CHAR ASCII", "0 TRLR"];
        for sep in ["\r", "\n", "\r\n", "\n\r"] {
            let text = format!("0 HEAD{sep}1 CHAR ASCII{sep}0 TRLR{sep}");
            let (lines, _) = collect(&text, false);
            assert_eq!(lines, expected, "separator {sep:?}");
        }
    }

    #[test]
    fn test_blank_lines_discarded() {
        let (lines, _) = collect("0 HEAD\n\n\n0 TRLR\n", false);
        assert_eq!(lines, vec!["0 HEAD", "0 TRLR"]);
    }

    #[test]
    fn test_final_line_without_terminator() {
        let (lines, _) = collect("0 HEAD\n0 TRLR", false);
        assert_eq!(lines, vec!["0 HEAD", "0 TRLR"]);
    }

    #[test]
    fn test_strict_mode_warns_on_bare_cr() {
        let (lines, warnings) = collect("0 HEAD\r0 TRLR\r", true);
        assert_eq!(lines.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("carriage return"));
    }

    #[test]
    fn test_strict_mode_warns_once_per_dialect() {
        let (_, warnings) = collect("a\rb\rc\rd\r", true);
        assert_eq!(warnings.len(), 1);

        let (_, warnings) = collect("a\n\rb\n\rc\n\r", true);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("\\n\\r"));
    }

    #[test]
    fn test_lenient_mode_accepts_all_dialects_silently() {
        let (_, warnings) = collect("a\rb\n\rc\r\nd\n", false);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_cancellation_stops_reading() {
        let cancel = AtomicBool::new(false);
        let mut observers = Vec::new();
        let mut warnings = Vec::new();
        let mut ctx = ReadContext {
            cancel: &cancel,
            notification_rate: 500,
            strict_line_breaks: false,
            observers: &mut observers,
            warnings: &mut warnings,
            total_bytes: None,
        };
        let mut collector = LineCollector::new(false);
        for c in "0 HEAD".chars() {
            collector.feed(c, &mut ctx).unwrap();
        }
        cancel.store(true, Ordering::Relaxed);
        let err = collector.feed('\n', &mut ctx).unwrap_err();
        assert!(err.is_cancellation());
    }

    #[test]
    fn test_progress_cadence() {
        let cancel = AtomicBool::new(false);
        let events = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let events_clone = std::sync::Arc::clone(&events);
        let mut observers: Vec<FileObserver> = vec![Box::new(move |e| {
            events_clone.lock().unwrap().push(*e);
        })];
        let mut warnings = Vec::new();
        let mut ctx = ReadContext {
            cancel: &cancel,
            notification_rate: 2,
            strict_line_breaks: false,
            observers: &mut observers,
            warnings: &mut warnings,
            total_bytes: Some(100),
        };
        let mut collector = LineCollector::new(false);
        for c in "a\nb\nc\nd\ne\n".chars() {
            collector.feed(c, &mut ctx).unwrap();
        }
        collector.finish(&mut ctx).unwrap();

        let events = events.lock().unwrap();
        // Two interim events (after lines 2 and 4) plus the completion event.
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].lines_read, 2);
        assert!(!events[0].complete);
        assert_eq!(events[1].lines_read, 4);
        assert_eq!(events[2].lines_read, 5);
        assert!(events[2].complete);
        assert_eq!(events[2].total_bytes, Some(100));
    }
}
