use std::borrow::Cow;
use std::fmt;
use std::io::{self, BufRead, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::string::FromUtf8Error;

use super::{ChannelError, FileHandle, OpenConfig, Whence};

type Result<T> = std::result::Result<T, ChannelError>;

/// Default size of each of the read-ahead and write-behind buffers.
pub const DEFAULT_CAPACITY: usize = 4096;

/// A single line produced by [Channel::read_line], with its terminator stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub content: Vec<u8>,
    /// False for a final line that ended at end of stream without `\n`.
    pub terminated: bool,
}

impl Line {
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    pub fn into_string(self) -> std::result::Result<String, FromUtf8Error> {
        String::from_utf8(self.content)
    }
}

/// Buffered reads and writes over a [FileHandle].
///
/// Operations take effect in call order: pending writes are flushed before any
/// read or seek, and unread read-ahead bytes are given back before any write, so
/// the channel always behaves as if it had a single cursor.
///
/// Dropping a channel flushes it, but a failure there can only be logged. Call
/// [close](Channel::close) to observe it.
pub struct Channel {
    handle: FileHandle,
    read_buf: Box<[u8]>,
    read_pos: usize,
    read_len: usize,
    write_buf: Vec<u8>,
    capacity: usize,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("handle", &self.handle)
            .field("capacity", &self.capacity)
            .field("buffered_read", &self.buffered_read_len())
            .field("pending_write", &self.pending_write_len())
            .finish()
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        if !self.handle.is_open() || self.write_buf.is_empty() {
            return;
        }

        let pending = self.write_buf.len();
        if let Err(error) = self.flush_buffer() {
            tracing::warn!(
                %error,
                "Channel dropped with {} unflushed bytes that could not be written. \
                 File at {:?} may be incomplete.",
                pending,
                self.handle.path()
            );
        }
    }
}

impl Channel {
    pub fn new(handle: FileHandle) -> Channel {
        Channel::with_capacity(DEFAULT_CAPACITY, handle)
    }

    pub fn with_capacity(capacity: usize, handle: FileHandle) -> Channel {
        let capacity = capacity.max(1);
        Channel {
            handle,
            read_buf: vec![0u8; capacity].into_boxed_slice(),
            read_pos: 0,
            read_len: 0,
            write_buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn open<P: AsRef<Path>>(path: P, config: &OpenConfig) -> Result<Channel> {
        FileHandle::open(path, config).map(Channel::new)
    }

    #[inline(always)]
    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        self.handle.path()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes read ahead from the file but not yet consumed.
    #[inline(always)]
    pub fn buffered_read_len(&self) -> usize {
        self.read_len - self.read_pos
    }

    /// Bytes accepted by [write](Channel::write) but not yet handed to the file.
    #[inline(always)]
    pub fn pending_write_len(&self) -> usize {
        self.write_buf.len()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.handle.is_open() {
            Ok(())
        } else {
            Err(ChannelError::Closed(self.handle.path().to_path_buf()))
        }
    }

    /// Buffered write. Touches the file only when the buffer would overflow;
    /// writes at least as large as the buffer go straight through after a flush.
    ///
    /// Always accepts the whole of `bytes` or fails.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.ensure_open()?;
        self.give_back_read_ahead()?;

        if self.write_buf.len() + bytes.len() > self.capacity {
            self.flush_buffer()?;
        }

        if bytes.len() >= self.capacity {
            tracing::trace!(bytes = bytes.len(), "write bypassing buffer");
            self.handle.write_all(bytes)?;
        } else {
            self.write_buf.extend_from_slice(bytes);
        }

        Ok(bytes.len())
    }

    pub fn write_str(&mut self, s: &str) -> Result<usize> {
        self.write(s.as_bytes())
    }

    /// Hand all pending bytes to the file.
    ///
    /// On failure, bytes the file did not accept remain pending.
    pub fn flush(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.flush_buffer()
    }

    fn flush_buffer(&mut self) -> Result<()> {
        if self.write_buf.is_empty() {
            return Ok(());
        }

        let mut written = 0;
        let result = loop {
            if written == self.write_buf.len() {
                break Ok(());
            }
            match self.handle.write(&self.write_buf[written..]) {
                Ok(0) => {
                    break Err(ChannelError::Io(
                        io::ErrorKind::WriteZero.into(),
                        self.handle.path().to_path_buf(),
                    ));
                }
                Ok(n) => written += n,
                Err(e) => break Err(e),
            }
        };

        tracing::trace!(written, pending = self.write_buf.len() - written, "flushed write buffer");
        self.write_buf.drain(..written);
        result
    }

    /// Rewind the file over read-ahead bytes nobody consumed, so a following
    /// write lands at the logical position.
    fn give_back_read_ahead(&mut self) -> Result<()> {
        let unread = self.buffered_read_len();
        if unread > 0 {
            self.handle.seek(-(unread as i64), Whence::Current)?;
        }
        self.read_pos = 0;
        self.read_len = 0;
        Ok(())
    }

    /// Return the unconsumed read-ahead bytes, refilling from the file when empty.
    /// An empty slice means end of stream.
    pub fn fill_buffer(&mut self) -> Result<&[u8]> {
        self.ensure_open()?;
        self.flush_buffer()?;

        if self.read_pos >= self.read_len {
            let n = self.handle.read(&mut self.read_buf)?;
            tracing::trace!(bytes = n, "filled read buffer");
            self.read_pos = 0;
            self.read_len = n;
        }

        Ok(&self.read_buf[self.read_pos..self.read_len])
    }

    fn consume_read(&mut self, amount: usize) {
        self.read_pos = usize::min(self.read_pos + amount, self.read_len);
    }

    /// Read up to `buf.len()` bytes. `Ok(0)` is end of stream.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;
        self.flush_buffer()?;

        if self.buffered_read_len() == 0 && buf.len() >= self.capacity {
            return self.handle.read(buf);
        }

        let available = self.fill_buffer()?;
        let n = usize::min(available.len(), buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume_read(n);
        Ok(n)
    }

    /// Read through the next `\n`, or to end of stream.
    ///
    /// The terminator, and a `\r` right before it, are stripped. Returns
    /// `Ok(None)` once the stream is exhausted.
    pub fn read_line(&mut self) -> Result<Option<Line>> {
        let mut content = Vec::new();

        loop {
            let available = self.fill_buffer()?;
            if available.is_empty() {
                if content.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(Line {
                    content,
                    terminated: false,
                }));
            }

            match available.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    content.extend_from_slice(&available[..i]);
                    self.consume_read(i + 1);
                    if content.last() == Some(&b'\r') {
                        content.pop();
                    }
                    return Ok(Some(Line {
                        content,
                        terminated: true,
                    }));
                }
                None => {
                    let n = available.len();
                    content.extend_from_slice(available);
                    self.consume_read(n);
                }
            }
        }
    }

    /// Logical cursor position, accounting for both buffers.
    ///
    /// In append mode the file decides where pending bytes land, so they are
    /// flushed first.
    pub fn position(&mut self) -> Result<u64> {
        if self.handle.is_append() {
            self.flush_buffer()?;
        }
        let physical = self.handle.position()?;
        Ok(physical - self.buffered_read_len() as u64 + self.write_buf.len() as u64)
    }

    /// Flush pending writes, drop read-ahead data, then move the cursor.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.ensure_open()?;
        self.flush_buffer()?;

        let pos = match whence {
            Whence::Current => {
                let target = i128::from(self.position()?) + i128::from(offset);
                let start = i64::try_from(target).map_err(|_| ChannelError::InvalidOffset {
                    offset,
                    whence,
                    target,
                })?;
                if start < 0 {
                    return Err(ChannelError::InvalidOffset {
                        offset,
                        whence,
                        target,
                    });
                }
                self.handle.seek(start, Whence::Start)?
            }
            _ => self.handle.seek(offset, whence)?,
        };

        self.read_pos = 0;
        self.read_len = 0;
        Ok(pos)
    }

    pub fn rewind(&mut self) -> Result<()> {
        self.seek(0, Whence::Start).map(|_| ())
    }

    pub fn size(&self) -> Result<u64> {
        self.handle.size()
    }

    /// Copy everything from `reader` into the channel through the write buffer.
    /// Returns the number of bytes copied; nothing is flushed.
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<u64> {
        self.ensure_open()?;
        let mut chunk = vec![0u8; self.capacity];
        let mut total = 0u64;

        loop {
            let n = reader.read(&mut chunk).map_err(ChannelError::Source)?;
            if n == 0 {
                break;
            }
            self.write(&chunk[..n])?;
            total += n as u64;
        }

        tracing::trace!(total, "copied from reader");
        Ok(total)
    }

    /// Flush and release the file. The handle is released even if the flush
    /// fails, and the flush error is returned.
    ///
    /// Closing an already-closed channel fails with [ChannelError::Closed].
    pub fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        let flushed = self.flush_buffer();
        self.write_buf.clear();
        self.read_pos = 0;
        self.read_len = 0;
        let closed = self.handle.close();
        flushed.and(closed)
    }
}

impl Read for Channel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Channel::read(self, buf).map_err(Into::into)
    }
}

impl BufRead for Channel {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.fill_buffer().map_err(Into::into)
    }

    fn consume(&mut self, amt: usize) {
        self.consume_read(amt)
    }
}

impl Write for Channel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Channel::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        Channel::flush(self).map_err(Into::into)
    }
}

impl Seek for Channel {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            SeekFrom::Start(n) => {
                let n = i64::try_from(n).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "seek offset out of range")
                })?;
                (n, Whence::Start)
            }
            SeekFrom::Current(n) => (n, Whence::Current),
            SeekFrom::End(n) => (n, Whence::End),
        };
        Channel::seek(self, offset, whence).map_err(Into::into)
    }
}
