//! Progress events and observer dispatch.
//!
//! Two kinds of observers can watch a load: file observers see line-reading
//! progress (every `read_notification_rate` lines, plus one final complete
//! event), and parse observers are called after each level-0 record is
//! hydrated. Observers run synchronously on the parsing thread; a panicking
//! observer is caught, logged, and otherwise ignored so it cannot abort the
//! parse.

use std::panic::{catch_unwind, AssertUnwindSafe};

/// Progress of the line-reading phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileProgressEvent {
    /// Logical lines read so far.
    pub lines_read: usize,
    /// Total size of the byte source, when known.
    pub total_bytes: Option<u64>,
    /// True only for the single event emitted when reading finishes.
    pub complete: bool,
}

/// Progress of the record-hydration phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseProgressEvent {
    /// Level-0 records hydrated so far.
    pub records_processed: usize,
    /// True only for the single event emitted when hydration finishes.
    pub complete: bool,
}

/// Callback observing [`FileProgressEvent`]s.
pub type FileObserver = Box<dyn FnMut(&FileProgressEvent) + Send>;

/// Callback observing [`ParseProgressEvent`]s.
pub type ParseObserver = Box<dyn FnMut(&ParseProgressEvent) + Send>;

/// Invoke every file observer with `event`, swallowing panics.
pub(crate) fn notify_file_observers(observers: &mut [FileObserver], event: &FileProgressEvent) {
    for observer in observers.iter_mut() {
        if catch_unwind(AssertUnwindSafe(|| observer(event))).is_err() {
            log::warn!("file progress observer panicked; continuing parse");
        }
    }
}

/// Invoke every parse observer with `event`, swallowing panics.
pub(crate) fn notify_parse_observers(observers: &mut [ParseObserver], event: &ParseProgressEvent) {
    for observer in observers.iter_mut() {
        if catch_unwind(AssertUnwindSafe(|| observer(event))).is_err() {
            log::warn!("parse progress observer panicked; continuing parse");
        }
    }
}
