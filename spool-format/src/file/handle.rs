use std::fs::{File, Metadata};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{AccessMode, ChannelError, OpenConfig, Whence};

type Result<T> = std::result::Result<T, ChannelError>;

/// An exclusively owned open file.
///
/// Every operation after [close](FileHandle::close) fails with [ChannelError::Closed].
#[derive(Debug)]
pub struct FileHandle {
    file: Option<File>,
    path: PathBuf,
    access: AccessMode,
    append: bool,
}

impl FileHandle {
    pub fn open<P: AsRef<Path>>(path: P, config: &OpenConfig) -> Result<FileHandle> {
        let path = path.as_ref();
        let file = config
            .to_open_options()
            .open(path)
            .map_err(|e| ChannelError::from_io(e, path))?;

        // Directories open fine for reading on most platforms.
        let meta = file.metadata().map_err(|e| ChannelError::from_io(e, path))?;
        if meta.is_dir() {
            return Err(ChannelError::IsDirectory(path.to_path_buf()));
        }

        tracing::debug!(path = %path.display(), access = ?config.access_mode(), "opened file");

        Ok(FileHandle {
            file: Some(file),
            path: path.to_path_buf(),
            access: config.access_mode(),
            append: config.is_append(),
        })
    }

    /// Create or truncate `path` for reading and writing.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<FileHandle> {
        FileHandle::open(path, &OpenConfig::create_truncate())
    }

    pub fn open_read<P: AsRef<Path>>(path: P) -> Result<FileHandle> {
        FileHandle::open(path, &OpenConfig::read_only())
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    pub fn access(&self) -> AccessMode {
        self.access
    }

    /// Every write lands at end of file, wherever the cursor was.
    #[inline(always)]
    pub fn is_append(&self) -> bool {
        self.append
    }

    #[inline(always)]
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn parts(&mut self) -> Result<(&mut File, &Path)> {
        match self.file.as_mut() {
            Some(file) => Ok((file, &self.path)),
            None => Err(ChannelError::Closed(self.path.clone())),
        }
    }

    /// Read up to `buf.len()` bytes at the cursor. `Ok(0)` is end of stream.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let (file, path) = self.parts()?;
        file.read(buf).map_err(|e| ChannelError::from_io(e, path))
    }

    /// Write at the cursor in a single call, returning how many bytes were accepted.
    ///
    /// The count may be less than `buf.len()`; use [write_all](FileHandle::write_all)
    /// to loop until everything is written.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let (file, path) = self.parts()?;
        file.write(buf).map_err(|e| ChannelError::from_io(e, path))
    }

    pub fn write_all(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => {
                    return Err(ChannelError::Io(
                        io::ErrorKind::WriteZero.into(),
                        self.path.clone(),
                    ));
                }
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }

    /// Move the cursor and return its new position from the start of the file.
    ///
    /// Positions past the end are allowed; a negative target is not.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let (file, path) = self.parts()?;
        let io_err = |e| ChannelError::from_io(e, path);

        let base = match whence {
            Whence::Start => 0,
            Whence::Current => file.stream_position().map_err(io_err)?,
            Whence::End => file.metadata().map_err(io_err)?.len(),
        };

        let target = i128::from(base) + i128::from(offset);
        let invalid = || ChannelError::InvalidOffset {
            offset,
            whence,
            target,
        };
        let target = u64::try_from(target).map_err(|_| invalid())?;

        tracing::trace!(offset, %whence, target, "seek");
        file.seek(SeekFrom::Start(target)).map_err(io_err)
    }

    pub fn position(&mut self) -> Result<u64> {
        let (file, path) = self.parts()?;
        file.stream_position()
            .map_err(|e| ChannelError::from_io(e, path))
    }

    pub fn metadata(&self) -> Result<Metadata> {
        match self.file.as_ref() {
            Some(file) => file
                .metadata()
                .map_err(|e| ChannelError::from_io(e, &self.path)),
            None => Err(ChannelError::Closed(self.path.clone())),
        }
    }

    /// Current size of the file in bytes.
    pub fn size(&self) -> Result<u64> {
        self.metadata().map(|meta| meta.len())
    }

    /// Release the OS handle. Closing twice fails with [ChannelError::Closed].
    pub fn close(&mut self) -> Result<()> {
        match self.file.take() {
            Some(file) => {
                drop(file);
                tracing::debug!(path = %self.path.display(), "closed file");
                Ok(())
            }
            None => Err(ChannelError::Closed(self.path.clone())),
        }
    }
}
