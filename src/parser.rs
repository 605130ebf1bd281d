//! The parse entry point and its state machine.
//!
//! One [`GedcomParser`] instance runs one load at a time, single-threaded
//! and synchronous. Different instances are fully independent, so separate
//! threads may each run their own parser. The only shared handle is the
//! cancellation flag, an `Arc<AtomicBool>` that any thread may set; the
//! line readers observe it at least once per line and unwind with the
//! distinguished [`GedcomError::Cancelled`].
//!
//! A load steps through the pipeline states in order:
//!
//! ```text
//! Idle -> DetectingEncoding -> Reading -> Tokenizing -> Building
//!      -> InterpretingPassA -> InterpretingPassB -> Resolving -> Done
//! ```
//!
//! with `Failed` and `Cancelled` as the terminal states of an aborted load.

use crate::diagnostics::Diagnostic;
use crate::encoding::detect_encoding;
use crate::error::{GedcomError, ParseFailure, Result};
use crate::interpreter::Interpreter;
use crate::line::tokenize_lines;
use crate::model::Gedcom;
use crate::progress::{FileObserver, FileProgressEvent, ParseObserver, ParseProgressEvent};
use crate::reader::{load_lines, ReadContext};
use crate::source::ByteSource;
use crate::tree::build_tree;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default number of lines between progress events.
pub const DEFAULT_READ_NOTIFICATION_RATE: usize = 500;

/// Where a load currently is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// No load started yet.
    Idle,
    /// Peeking at the head of the stream for a BOM or `CHAR` declaration.
    DetectingEncoding,
    /// Decoding bytes into logical lines.
    Reading,
    /// Splitting lines into level/xref/tag/value.
    Tokenizing,
    /// Folding lines into record trees.
    Building,
    /// Registering xref-bearing records (discovery).
    InterpretingPassA,
    /// Populating records from their trees (hydration).
    InterpretingPassB,
    /// Checking pending cross-references.
    Resolving,
    /// Load finished successfully.
    Done,
    /// Load aborted by the cancellation flag.
    Cancelled,
    /// Load aborted by a fatal error.
    Failed,
}

/// Result of a successful load.
#[derive(Debug)]
pub struct ParseOutcome {
    /// The populated object graph. Owned solely by the caller.
    pub gedcom: Gedcom,
    /// Recorded non-fatal errors, in input order.
    pub errors: Vec<Diagnostic>,
    /// Warnings, in input order.
    pub warnings: Vec<Diagnostic>,
}

/// Reads GEDCOM 5.5/5.5.1 data into a [`Gedcom`] object graph.
///
/// # Examples
///
/// ```no_run
/// use gedrc::GedcomParser;
///
/// let mut parser = GedcomParser::new();
/// let outcome = parser.load_file("family.ged")?;
/// for warning in &outcome.warnings {
///     eprintln!("warning: {warning}");
/// }
/// println!("{} individuals", outcome.gedcom.individuals.len());
/// # Ok::<(), gedrc::ParseFailure>(())
/// ```
///
/// Cancelling from another thread:
///
/// ```no_run
/// use gedrc::GedcomParser;
/// use std::sync::atomic::Ordering;
///
/// let mut parser = GedcomParser::new();
/// let cancel = parser.cancel_flag();
/// std::thread::spawn(move || cancel.store(true, Ordering::Relaxed));
/// let result = parser.load_file("huge.ged");
/// if result.as_ref().is_err_and(|f| f.is_cancellation()) {
///     println!("cancelled");
/// }
/// ```
pub struct GedcomParser {
    read_notification_rate: usize,
    strict_line_breaks: bool,
    strict_custom_tags: bool,
    cancel: Arc<AtomicBool>,
    file_observers: Vec<FileObserver>,
    parse_observers: Vec<ParseObserver>,
    state: ParserState,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Default for GedcomParser {
    fn default() -> Self {
        GedcomParser {
            read_notification_rate: DEFAULT_READ_NOTIFICATION_RATE,
            strict_line_breaks: false,
            strict_custom_tags: false,
            cancel: Arc::new(AtomicBool::new(false)),
            file_observers: Vec::new(),
            parse_observers: Vec::new(),
            state: ParserState::Idle,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl std::fmt::Debug for GedcomParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GedcomParser")
            .field("read_notification_rate", &self.read_notification_rate)
            .field("strict_line_breaks", &self.strict_line_breaks)
            .field("strict_custom_tags", &self.strict_custom_tags)
            .field("state", &self.state)
            .field("file_observers", &self.file_observers.len())
            .field("parse_observers", &self.parse_observers.len())
            .finish_non_exhaustive()
    }
}

impl GedcomParser {
    /// Create a parser with default options.
    #[must_use]
    pub fn new() -> Self {
        GedcomParser::default()
    }

    /// Set how many lines are read between progress events (default 500).
    #[must_use]
    pub fn with_read_notification_rate(mut self, rate: usize) -> Self {
        self.read_notification_rate = rate.max(1);
        self
    }

    /// Accept only `\r\n` and `\n` terminators silently; other dialects
    /// produce a warning (default off).
    #[must_use]
    pub fn with_strict_line_breaks(mut self, strict: bool) -> Self {
        self.strict_line_breaks = strict;
        self
    }

    /// Warn about `_`-prefixed extension tags instead of accepting them
    /// silently (default off).
    #[must_use]
    pub fn with_strict_custom_tags(mut self, strict: bool) -> Self {
        self.strict_custom_tags = strict;
        self
    }

    /// The cancellation flag. Any thread may set it; the load then fails
    /// with a cancellation at its next check, at most one line later.
    #[must_use]
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Register a callback for line-reading progress.
    pub fn add_file_observer(&mut self, observer: impl FnMut(&FileProgressEvent) + Send + 'static) {
        self.file_observers.push(Box::new(observer));
    }

    /// Register a callback invoked after each level-0 record is hydrated.
    pub fn add_parse_observer(
        &mut self,
        observer: impl FnMut(&ParseProgressEvent) + Send + 'static,
    ) {
        self.parse_observers.push(Box::new(observer));
    }

    /// Where the most recent load stopped.
    #[must_use]
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Recorded errors of the most recent load.
    #[must_use]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Warnings of the most recent load.
    #[must_use]
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Load a GEDCOM file from a path.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] on I/O failure, on any fatal parse
    /// condition, or on cancellation. The failure carries every diagnostic
    /// recorded before the abort; the partial graph is discarded.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> std::result::Result<ParseOutcome, ParseFailure> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                self.errors.clear();
                self.warnings.clear();
                self.state = ParserState::Failed;
                return Err(ParseFailure {
                    error: GedcomError::IoError(e),
                    errors: Vec::new(),
                    warnings: Vec::new(),
                });
            }
        };
        let total_size = file.metadata().ok().map(|m| m.len());
        self.load(file, total_size)
    }

    /// Load GEDCOM data from an in-memory buffer.
    ///
    /// # Errors
    ///
    /// Same contract as [`load_file`](Self::load_file).
    pub fn load_bytes(&mut self, bytes: &[u8]) -> std::result::Result<ParseOutcome, ParseFailure> {
        let total = bytes.len() as u64;
        self.load(Cursor::new(bytes.to_vec()), Some(total))
    }

    /// Load GEDCOM data from an arbitrary reader.
    ///
    /// The reader is owned by the parser for the duration of the call and
    /// dropped on every exit path. On success the returned graph is owned
    /// solely by the caller; intermediate buffers are released before the
    /// call returns.
    ///
    /// # Errors
    ///
    /// Same contract as [`load_file`](Self::load_file).
    pub fn load<R: Read>(
        &mut self,
        reader: R,
        total_size: Option<u64>,
    ) -> std::result::Result<ParseOutcome, ParseFailure> {
        self.errors.clear();
        self.warnings.clear();
        self.transition(ParserState::Idle);

        match self.run(reader, total_size) {
            Ok(gedcom) => {
                self.transition(ParserState::Done);
                Ok(ParseOutcome {
                    gedcom,
                    errors: self.errors.clone(),
                    warnings: self.warnings.clone(),
                })
            }
            Err(error) => {
                self.transition(if error.is_cancellation() {
                    ParserState::Cancelled
                } else {
                    ParserState::Failed
                });
                Err(ParseFailure {
                    error,
                    errors: self.errors.clone(),
                    warnings: self.warnings.clone(),
                })
            }
        }
    }

    fn run<R: Read>(&mut self, reader: R, total_size: Option<u64>) -> Result<Gedcom> {
        self.transition(ParserState::DetectingEncoding);
        let mut source = ByteSource::new(reader, total_size);
        let detection = detect_encoding(&mut source)?;
        if let Some(warning) = detection.warning {
            self.warnings.push(warning);
        }
        source.skip(detection.bom_len);
        log::debug!(
            "detected encoding {} (BOM: {} bytes)",
            detection.encoding,
            detection.bom_len
        );

        self.transition(ParserState::Reading);
        let mut ctx = ReadContext {
            cancel: &self.cancel,
            notification_rate: self.read_notification_rate,
            strict_line_breaks: self.strict_line_breaks,
            observers: &mut self.file_observers,
            warnings: &mut self.warnings,
            total_bytes: total_size,
        };
        let lines = load_lines(detection.encoding, source, &mut ctx)?;
        log::debug!("read {} logical lines", lines.len());

        self.transition(ParserState::Tokenizing);
        let parsed = tokenize_lines(&lines, &mut self.errors, &mut self.warnings)?;
        drop(lines);

        self.transition(ParserState::Building);
        let roots = build_tree(parsed, &mut self.errors, &mut self.warnings)?;
        self.check_cancelled()?;

        let mut interpreter = Interpreter::new(
            &mut self.errors,
            &mut self.warnings,
            self.strict_custom_tags,
            detection.encoding,
            detection.bom_len > 0,
        );
        self.state = ParserState::InterpretingPassA;
        log::debug!("parser state: InterpretingPassA");
        interpreter.discover(&roots);

        self.state = ParserState::InterpretingPassB;
        log::debug!("parser state: InterpretingPassB");
        interpreter.hydrate(&roots, &mut self.parse_observers);
        drop(roots);

        self.state = ParserState::Resolving;
        log::debug!("parser state: Resolving");
        interpreter.resolve_pending();
        let gedcom = interpreter.finish();
        self.check_cancelled()?;
        Ok(gedcom)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.load(Ordering::Relaxed) {
            return Err(GedcomError::Cancelled);
        }
        Ok(())
    }

    fn transition(&mut self, next: ParserState) {
        log::debug!("parser state: {:?} -> {next:?}", self.state);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    const MINIMAL: &str = "0 HEAD\r\n1 CHAR ASCII\r\n0 TRLR\r\n";

    #[test]
    fn test_minimal_file() {
        let mut parser = GedcomParser::new();
        let outcome = parser.load_bytes(MINIMAL.as_bytes()).unwrap();
        assert!(outcome.errors.is_empty());
        assert!(outcome.gedcom.individuals.is_empty());
        assert!(outcome.gedcom.families.is_empty());
        assert_eq!(parser.state(), ParserState::Done);
    }

    #[test]
    fn test_empty_file_missing_head() {
        let mut parser = GedcomParser::new();
        let failure = parser.load_bytes(b"").unwrap_err();
        assert!(matches!(failure.error, GedcomError::MissingHeader(_)));
        assert_eq!(parser.state(), ParserState::Failed);
    }

    #[test]
    fn test_no_head_is_fatal() {
        let mut parser = GedcomParser::new();
        let failure = parser
            .load_bytes(b"0 @X@ INDI\n0 TRLR\n")
            .unwrap_err();
        assert!(matches!(failure.error, GedcomError::MissingHeader(_)));
    }

    #[test]
    fn test_cancellation_mid_read() {
        let mut parser = GedcomParser::new().with_read_notification_rate(1);
        let cancel = parser.cancel_flag();
        parser.add_file_observer(move |_| {
            cancel.store(true, Ordering::Relaxed);
        });
        let failure = parser.load_bytes(MINIMAL.as_bytes()).unwrap_err();
        assert!(failure.is_cancellation());
        assert_eq!(parser.state(), ParserState::Cancelled);
    }

    #[test]
    fn test_preset_cancel_flag_stops_immediately() {
        let mut parser = GedcomParser::new();
        let cancel = parser.cancel_flag();
        cancel.store(true, Ordering::Relaxed);
        let failure = parser.load_bytes(MINIMAL.as_bytes()).unwrap_err();
        assert!(failure.is_cancellation());

        // The flag stays under the caller's control; clearing it makes the
        // parser usable again.
        cancel.store(false, Ordering::Relaxed);
        assert!(parser.load_bytes(MINIMAL.as_bytes()).is_ok());
    }

    #[test]
    fn test_file_observer_sees_completion() {
        let events = std::sync::Arc::new(Mutex::new(Vec::new()));
        let events_clone = std::sync::Arc::clone(&events);
        let mut parser = GedcomParser::new().with_read_notification_rate(1);
        parser.add_file_observer(move |e| events_clone.lock().unwrap().push(*e));
        parser.load_bytes(MINIMAL.as_bytes()).unwrap();

        let events = events.lock().unwrap();
        assert!(!events.is_empty());
        let last = events.last().unwrap();
        assert!(last.complete);
        assert_eq!(last.lines_read, 3);
        assert_eq!(last.total_bytes, Some(MINIMAL.len() as u64));
    }

    #[test]
    fn test_parse_observer_counts_records() {
        let count = std::sync::Arc::new(AtomicUsize::new(0));
        let count_clone = std::sync::Arc::clone(&count);
        let mut parser = GedcomParser::new();
        parser.add_parse_observer(move |e| {
            if e.complete {
                count_clone.store(e.records_processed, Ordering::SeqCst);
            }
        });
        parser
            .load_bytes(b"0 HEAD\n0 @I1@ INDI\n0 TRLR\n")
            .unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_failure_carries_prior_diagnostics() {
        let mut parser = GedcomParser::new();
        // A lowercase tag draws a tokenizer warning before the missing
        // trailer aborts the load; the failure still carries it.
        let failure = parser
            .load_bytes(b"0 HEAD\n1 xyzzy oops\n0 @I1@ INDI\n")
            .unwrap_err();
        assert!(matches!(failure.error, GedcomError::MissingTrailer(_)));
        assert!(failure
            .warnings
            .iter()
            .any(|w| w.message.contains("non-standard tag")));
    }

    #[test]
    fn test_io_error_on_missing_file() {
        let mut parser = GedcomParser::new();
        let failure = parser.load_file("/no/such/file.ged").unwrap_err();
        assert!(matches!(failure.error, GedcomError::IoError(_)));
        assert_eq!(parser.state(), ParserState::Failed);
    }

    #[test]
    fn test_parser_reusable_after_failure() {
        let mut parser = GedcomParser::new();
        assert!(parser.load_bytes(b"").is_err());
        let outcome = parser.load_bytes(MINIMAL.as_bytes()).unwrap();
        assert!(outcome.errors.is_empty());
        assert_eq!(parser.state(), ParserState::Done);
    }

    #[test]
    fn test_unsupported_encoding_fails() {
        let mut parser = GedcomParser::new();
        let failure = parser
            .load_bytes(b"0 HEAD\n1 CHAR EBCDIC\n0 TRLR\n")
            .unwrap_err();
        assert!(matches!(
            failure.error,
            GedcomError::UnsupportedEncoding(_)
        ));
    }

    #[test]
    fn test_diagnostics_accessible_on_parser() {
        let mut parser = GedcomParser::new();
        parser
            .load_bytes(b"0 HEAD\n0 @I1@ INDI\n1 FAMS @F404@\n0 TRLR\n")
            .unwrap();
        assert_eq!(parser.errors().len(), 1);
        assert!(parser.errors()[0].message.contains("dangling"));
    }
}
