//! Byte sources for the encoding detector and line readers.
//!
//! [`ByteSource`] wraps any [`std::io::Read`] and adds the two things the
//! front of the pipeline needs: a bounded lookahead (the encoding detector
//! peeks at the first bytes without consuming them) and an optional total
//! size for progress reporting. The stream is consumed exactly once; there
//! is no seeking.

use crate::error::Result;
use std::io::Read;

/// How many bytes the encoding detector may peek at before any are consumed.
/// Large enough to cover a BOM plus the `0 HEAD` line and the `1 CHAR`
/// declaration even in UTF-16 files with generous headers.
pub(crate) const DETECTION_WINDOW: usize = 4096;

/// A once-through byte stream with bounded lookahead.
#[derive(Debug)]
pub struct ByteSource<R: Read> {
    inner: R,
    /// Bytes read ahead of the consumer; drained before `inner` is touched.
    lookahead: Vec<u8>,
    /// Read position within `lookahead`.
    pos: usize,
    total_size: Option<u64>,
}

impl<R: Read> ByteSource<R> {
    /// Wrap a reader. `total_size` is reported to progress observers when
    /// known (e.g. from file metadata); it does not bound the read.
    pub fn new(inner: R, total_size: Option<u64>) -> Self {
        ByteSource {
            inner,
            lookahead: Vec::new(),
            pos: 0,
            total_size,
        }
    }

    /// Total size of the stream in bytes, if known.
    #[must_use]
    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }

    /// Peek at up to `n` bytes from the current position without consuming
    /// them. Returns fewer than `n` bytes only at end of stream.
    pub fn peek(&mut self, n: usize) -> Result<&[u8]> {
        let have = self.lookahead.len() - self.pos;
        if have < n {
            let mut need = n - have;
            let mut buf = [0u8; 512];
            while need > 0 {
                let want = need.min(buf.len());
                let got = self.inner.read(&mut buf[..want])?;
                if got == 0 {
                    break;
                }
                self.lookahead.extend_from_slice(&buf[..got]);
                need = need.saturating_sub(got);
            }
        }
        let end = self.lookahead.len().min(self.pos + n);
        Ok(&self.lookahead[self.pos..end])
    }

    /// Consume and discard `n` bytes (used to skip a BOM). The bytes must
    /// have been peeked already; skipping past the lookahead is a bug.
    pub fn skip(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.lookahead.len());
        self.pos = (self.pos + n).min(self.lookahead.len());
    }

    /// Read the next byte, or `None` at end of stream.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.pos < self.lookahead.len() {
            let b = self.lookahead[self.pos];
            self.pos += 1;
            return Ok(Some(b));
        }
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read the next two bytes as a pair, or `None` if the stream ends
    /// before the first byte. A stream ending between the two bytes yields
    /// `Some((b, None))` so UTF-16 readers can report the truncation.
    pub fn next_pair(&mut self) -> Result<Option<(u8, Option<u8>)>> {
        match self.next_byte()? {
            None => Ok(None),
            Some(first) => Ok(Some((first, self.next_byte()?))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_peek_does_not_consume() {
        let mut src = ByteSource::new(Cursor::new(b"0 HEAD".to_vec()), Some(6));
        assert_eq!(src.peek(3).unwrap(), b"0 H");
        assert_eq!(src.peek(6).unwrap(), b"0 HEAD");
        assert_eq!(src.next_byte().unwrap(), Some(b'0'));
        assert_eq!(src.next_byte().unwrap(), Some(b' '));
    }

    #[test]
    fn test_peek_short_at_eof() {
        let mut src = ByteSource::new(Cursor::new(b"ab".to_vec()), None);
        assert_eq!(src.peek(10).unwrap(), b"ab");
    }

    #[test]
    fn test_skip_then_read() {
        let mut src = ByteSource::new(Cursor::new(vec![0xEF, 0xBB, 0xBF, b'0']), None);
        src.peek(3).unwrap();
        src.skip(3);
        assert_eq!(src.next_byte().unwrap(), Some(b'0'));
        assert_eq!(src.next_byte().unwrap(), None);
    }

    #[test]
    fn test_next_pair_odd_tail() {
        let mut src = ByteSource::new(Cursor::new(vec![0x30, 0x00, 0x0A]), None);
        assert_eq!(src.next_pair().unwrap(), Some((0x30, Some(0x00))));
        assert_eq!(src.next_pair().unwrap(), Some((0x0A, None)));
        assert_eq!(src.next_pair().unwrap(), None);
    }

    #[test]
    fn test_total_size_reported() {
        let src = ByteSource::new(Cursor::new(Vec::new()), Some(42));
        assert_eq!(src.total_size(), Some(42));
    }
}
