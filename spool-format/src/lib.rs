//! Buffered file channels and a structured JSON value codec.
//!
//! Use [FileHandle][FileHandle] and [Channel][Channel] for byte-level file access,
//! and the [json] module to convert between [Value][json::Value] trees or typed
//! records and JSON text. The [fs] module glues the two together for whole-file work.

pub mod article;
mod error;
pub mod file;
pub mod fs;
pub mod json;

pub use error::{Error, Result};
pub use file::{
    AccessMode, Channel, ChannelError, DEFAULT_CAPACITY, FileHandle, Line, OpenConfig, Whence,
};
pub use json::{CodecError, Decode, Encode, EncodeOptions, Kind, Map, Number, Value};
