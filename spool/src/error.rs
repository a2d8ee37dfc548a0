use std::path::PathBuf;

use miette::Diagnostic;
use spool_format::{ChannelError, CodecError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("Cannot open file `{}`", path.display())]
    #[diagnostic(help("Check that the path exists and that you may access it."))]
    OpenFile {
        path: PathBuf,
        #[source]
        source: ChannelError,
    },

    #[error("Cannot read file `{}`", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: ChannelError,
    },

    #[error("Cannot write file `{}`", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: ChannelError,
    },

    #[error("Cannot seek in file `{}`", path.display())]
    #[diagnostic(help("Offsets from `start` must not be negative."))]
    Seek {
        path: PathBuf,
        #[source]
        source: ChannelError,
    },

    #[error("Cannot load document `{}`", path.display())]
    #[diagnostic(help("Is this a valid JSON document?"))]
    LoadDocument {
        path: PathBuf,
        #[source]
        source: spool_format::Error,
    },

    #[error("Cannot save document `{}`", path.display())]
    SaveDocument {
        path: PathBuf,
        #[source]
        source: spool_format::Error,
    },

    #[error("Cannot encode value")]
    Encode {
        #[source]
        source: CodecError,
    },

    #[error("No value at `{key_path}` in `{}`", path.display())]
    #[diagnostic(help("Keys select object members by name and array items by index."))]
    MissingKey { path: PathBuf, key_path: String },

    #[error("Cannot write to standard output")]
    Stdout {
        #[source]
        source: std::io::Error,
    },
}
