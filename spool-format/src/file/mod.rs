//! Byte-level file access: an owned [FileHandle] and the buffered [Channel] over it.

mod channel;
mod handle;
#[cfg(test)]
mod tests;

use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use channel::{Channel, DEFAULT_CAPACITY, Line};
pub use handle::FileHandle;

/// Default permission bits for newly created files (rw-r--r--).
pub const DEFAULT_FILE_MODE: u32 = 0o644;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("File not found. Path: '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied. Path: '{}'", .0.display())]
    PermissionDenied(PathBuf),

    #[error("File already exists. Path: '{}'", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Path is a directory. Path: '{}'", .0.display())]
    IsDirectory(PathBuf),

    #[error("No space left on device. Path: '{}'", .0.display())]
    DiskFull(PathBuf),

    #[error("File handle is closed. Path: '{}'", .0.display())]
    Closed(PathBuf),

    #[error("Cannot seek to negative position {target} ({offset} from {whence}).")]
    InvalidOffset {
        offset: i64,
        whence: Whence,
        target: i128,
    },

    #[error("Reading from source failed.")]
    Source(#[source] io::Error),

    #[error("I/O failed. Path: '{}'", .1.display())]
    Io(#[source] io::Error, PathBuf),
}

impl ChannelError {
    /// Classify an OS error raised while operating on `path`.
    pub fn from_io(err: io::Error, path: &Path) -> ChannelError {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => ChannelError::NotFound(path),
            io::ErrorKind::PermissionDenied => ChannelError::PermissionDenied(path),
            io::ErrorKind::AlreadyExists => ChannelError::AlreadyExists(path),
            io::ErrorKind::IsADirectory => ChannelError::IsDirectory(path),
            io::ErrorKind::StorageFull => ChannelError::DiskFull(path),
            _ => ChannelError::Io(err, path),
        }
    }

    fn kind(&self) -> io::ErrorKind {
        match self {
            ChannelError::NotFound(_) => io::ErrorKind::NotFound,
            ChannelError::PermissionDenied(_) => io::ErrorKind::PermissionDenied,
            ChannelError::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            ChannelError::IsDirectory(_) => io::ErrorKind::IsADirectory,
            ChannelError::DiskFull(_) => io::ErrorKind::StorageFull,
            ChannelError::Closed(_) => io::ErrorKind::Other,
            ChannelError::InvalidOffset { .. } => io::ErrorKind::InvalidInput,
            ChannelError::Source(err) | ChannelError::Io(err, _) => err.kind(),
        }
    }
}

impl From<ChannelError> for io::Error {
    fn from(err: ChannelError) -> Self {
        io::Error::new(err.kind(), err)
    }
}

/// Reference point for a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

impl fmt::Display for Whence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Whence::Start => "start",
            Whence::Current => "current",
            Whence::End => "end",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown seek origin: {0} (expected start, current or end)")]
pub struct ParseWhenceError(String);

impl FromStr for Whence {
    type Err = ParseWhenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" | "set" => Ok(Whence::Start),
            "current" | "cur" => Ok(Whence::Current),
            "end" => Ok(Whence::End),
            _ => Err(ParseWhenceError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

impl AccessMode {
    pub fn can_read(self) -> bool {
        matches!(self, AccessMode::Read | AccessMode::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, AccessMode::Write | AccessMode::ReadWrite)
    }
}

/// How a [FileHandle] is opened.
///
/// `mode` only takes effect when the open creates the file, and only on Unix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenConfig {
    access: AccessMode,
    append: bool,
    create: bool,
    create_new: bool,
    truncate: bool,
    mode: u32,
}

impl Default for OpenConfig {
    fn default() -> Self {
        OpenConfig::read_only()
    }
}

impl OpenConfig {
    pub fn new(access: AccessMode) -> OpenConfig {
        OpenConfig {
            access,
            append: false,
            create: false,
            create_new: false,
            truncate: false,
            mode: DEFAULT_FILE_MODE,
        }
    }

    pub fn read_only() -> OpenConfig {
        OpenConfig::new(AccessMode::Read)
    }

    /// Read-write, created if missing and emptied on open.
    pub fn create_truncate() -> OpenConfig {
        OpenConfig::new(AccessMode::ReadWrite)
            .create(true)
            .truncate(true)
    }

    pub fn access(mut self, access: AccessMode) -> Self {
        self.access = access;
        self
    }

    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Fail with [ChannelError::AlreadyExists] if the file is already there.
    pub fn create_new(mut self, create_new: bool) -> Self {
        self.create_new = create_new;
        self
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn access_mode(&self) -> AccessMode {
        self.access
    }

    pub fn is_append(&self) -> bool {
        self.append
    }

    pub fn permission_bits(&self) -> u32 {
        self.mode
    }

    pub(crate) fn to_open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options
            .read(self.access.can_read())
            .write(self.access.can_write())
            .append(self.append)
            .create(self.create)
            .create_new(self.create_new)
            .truncate(self.truncate);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.mode);
        }

        options
    }
}
