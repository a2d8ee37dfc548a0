//! Whole-file read and write helpers built on [Channel] and the JSON codec.

use std::path::Path;

use crate::error::{Error, Result};
use crate::file::{AccessMode, Channel, ChannelError, FileHandle, OpenConfig};
use crate::json::{self, Decode, Encode, EncodeOptions};

/// Create or truncate `path` and write `bytes` to it. `mode` only applies when
/// the file is created.
pub fn write_file<P: AsRef<Path>>(path: P, bytes: &[u8], mode: u32) -> std::result::Result<(), ChannelError> {
    let config = OpenConfig::new(AccessMode::Write)
        .create(true)
        .truncate(true)
        .mode(mode);

    let mut channel = Channel::open(path, &config)?;
    channel.write(bytes)?;
    channel.close()
}

/// Read all of `path` into memory.
pub fn read_file<P: AsRef<Path>>(path: P) -> std::result::Result<Vec<u8>, ChannelError> {
    let mut handle = FileHandle::open_read(path)?;
    let size = handle.size()?;
    let mut out = vec![0u8; size as usize];

    // The file may change size underneath us; read until end of stream either way.
    let mut filled = 0;
    loop {
        if filled == out.len() {
            out.resize(filled + 4096, 0);
        }
        let n = handle.read(&mut out[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    out.truncate(filled);

    handle.close()?;
    Ok(out)
}

pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = read_file(path)?;
    String::from_utf8(bytes).map_err(|e| Error::Utf8(e, path.to_path_buf()))
}

/// Encode `value` and write it to `path`, created with mode `0644` if missing.
pub fn write_json<P: AsRef<Path>, T: Encode + ?Sized>(
    path: P,
    value: &T,
    options: &EncodeOptions,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = json::encode_with(value, options).map_err(Error::codec(path))?;
    write_file(path, &bytes, crate::file::DEFAULT_FILE_MODE)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote JSON document");
    Ok(())
}

pub fn read_json<T: Decode, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let bytes = read_file(path)?;
    json::decode_into(&bytes).map_err(Error::codec(path))
}
