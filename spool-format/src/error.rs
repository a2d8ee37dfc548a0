use std::path::PathBuf;
use std::string::FromUtf8Error;

use crate::file::ChannelError;
use crate::json::CodecError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from operations that move JSON documents through files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("Invalid JSON document. Path: '{}'", .1.display())]
    Codec(#[source] CodecError, PathBuf),

    #[error("File is not valid UTF-8 text. Path: '{}'", .1.display())]
    Utf8(#[source] FromUtf8Error, PathBuf),
}

impl Error {
    pub(crate) fn codec(path: impl Into<PathBuf>) -> impl FnOnce(CodecError) -> Error {
        let path = path.into();
        move |source| Error::Codec(source, path)
    }
}
