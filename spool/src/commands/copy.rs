use spool_format::{AccessMode, Channel, OpenConfig};

use crate::cli::CopyArgs;
use crate::error::{Error, Result};
use crate::util::format_size;

pub fn run(args: CopyArgs) -> Result<()> {
    let mut source = Channel::open(&args.source, &OpenConfig::read_only()).map_err(|source| {
        Error::OpenFile {
            path: args.source.clone(),
            source,
        }
    })?;

    let config = OpenConfig::new(AccessMode::Write).create(true).truncate(true);
    let mut destination = Channel::open(&args.destination, &config).map_err(|source| {
        Error::OpenFile {
            path: args.destination.clone(),
            source,
        }
    })?;

    let write_err = |source| Error::WriteFile {
        path: args.destination.clone(),
        source,
    };

    let copied = destination.read_from(&mut source).map_err(write_err)?;
    destination.close().map_err(write_err)?;
    source.close().map_err(|source| Error::ReadFile {
        path: args.source.clone(),
        source,
    })?;

    println!(
        "Copied {} from {} to {}",
        format_size(copied),
        args.source.display(),
        args.destination.display()
    );
    Ok(())
}
