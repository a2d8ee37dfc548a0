use spool_format::{Channel, FileHandle};

use crate::cli::LinesArgs;
use crate::error::{Error, Result};

pub fn run(args: LinesArgs) -> Result<()> {
    let handle = FileHandle::open_read(&args.path).map_err(|source| Error::OpenFile {
        path: args.path.clone(),
        source,
    })?;
    let mut channel = Channel::with_capacity(args.capacity, handle);

    let read_err = |source| Error::ReadFile {
        path: args.path.clone(),
        source,
    };

    let mut number = 0usize;
    while let Some(line) = channel.read_line().map_err(read_err)? {
        number += 1;
        if line.terminated {
            println!("{:>6}  {}", number, line.to_string_lossy());
        } else {
            println!("{:>6}  {}  (no newline at end of file)", number, line.to_string_lossy());
        }
    }

    channel.close().map_err(read_err)?;
    tracing::debug!(lines = number, "finished reading lines");
    Ok(())
}
