use std::io::Write;

use spool_format::{Channel, OpenConfig};

use crate::cli::ReadArgs;
use crate::error::{Error, Result};

pub fn run(args: ReadArgs) -> Result<()> {
    let mut channel =
        Channel::open(&args.path, &OpenConfig::read_only()).map_err(|source| Error::OpenFile {
            path: args.path.clone(),
            source,
        })?;

    channel
        .seek(args.offset, args.whence)
        .map_err(|source| Error::Seek {
            path: args.path.clone(),
            source,
        })?;

    let read_err = |source| Error::ReadFile {
        path: args.path.clone(),
        source,
    };

    let mut remaining = args.length.unwrap_or(u64::MAX);
    let mut buf = vec![0u8; channel.capacity()];
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    while remaining > 0 {
        let want = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let n = channel.read(&mut buf[..want]).map_err(read_err)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])
            .map_err(|source| Error::Stdout { source })?;
        remaining -= n as u64;
    }
    out.flush().map_err(|source| Error::Stdout { source })?;

    channel.close().map_err(read_err)?;
    Ok(())
}
