use std::io::{BufReader, Read, Seek, SeekFrom};

use crate::error::{ParseError, Result};

/// A cursor for byte-by-byte reading of a seekable source with pushback.
///
/// Lookahead is speculative: a routine reads ahead, keeping a running count
/// of consumed bytes in a caller-owned counter, and unwinds with
/// [`unread`](Self::unread) when the speculation fails. Several nested
/// attempts can share one counter, so a single seek undoes all of them.
pub struct SourceCursor<R> {
    inner: BufReader<R>,
}

impl<R: Read + Seek> SourceCursor<R> {
    pub fn new(source: R) -> Self {
        Self {
            inner: BufReader::new(source),
        }
    }

    /// Moves back to the first byte of the source.
    pub fn rewind(&mut self) -> Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Reads one logical character, adding the raw bytes consumed to `count`.
    ///
    /// A `\r` is skipped and the byte after it returned, so `\r\n` reads as
    /// `\n` and counts 2. Returns `Ok(None)` at the end of the input.
    pub fn read_char(&mut self, count: &mut usize) -> Result<Option<u8>> {
        let Some(c) = self.read_byte()? else {
            return Ok(None);
        };
        *count += 1;

        if c != b'\r' {
            return Ok(Some(c));
        }

        let next = self.read_byte()?;
        if next.is_some() {
            *count += 1;
        }
        Ok(next)
    }

    /// Seeks back `n` raw bytes, which must not exceed `count`.
    pub fn unread(&mut self, n: usize, count: &mut usize) -> Result<()> {
        if n > *count {
            return Err(ParseError::Unread {
                requested: n,
                available: *count,
            });
        }
        if n > 0 {
            let offset = i64::try_from(n).map_err(|_| ParseError::Unread {
                requested: n,
                available: *count,
            })?;
            self.inner.seek_relative(-offset)?;
            *count -= n;
        }
        Ok(())
    }

    /// Returns the underlying source.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
