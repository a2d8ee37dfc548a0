use spool_format::{AccessMode, Channel, OpenConfig};

use crate::cli::WriteArgs;
use crate::error::{Error, Result};
use crate::util::format_size;

pub fn run(args: WriteArgs) -> Result<()> {
    let config = OpenConfig::new(AccessMode::Write)
        .create(true)
        .create_new(args.create_new)
        .append(args.append)
        .truncate(!args.append && !args.create_new)
        .mode(args.mode);

    let mut channel = Channel::open(&args.path, &config).map_err(|source| Error::OpenFile {
        path: args.path.clone(),
        source,
    })?;

    let write_err = |source| Error::WriteFile {
        path: args.path.clone(),
        source,
    };
    let written = channel.write_str(&args.text).map_err(write_err)?;
    channel.close().map_err(write_err)?;

    tracing::debug!(mode = args.mode, append = args.append, "write complete");
    println!(
        "Wrote {} ({} bytes) to {}",
        format_size(written as u64),
        written,
        args.path.display()
    );

    Ok(())
}
