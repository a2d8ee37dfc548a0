use std::path::PathBuf;

use clap::{Parser, Subcommand};
use spool_format::Whence;

use crate::util::parse_mode;

#[derive(Debug, Parser)]
#[command(
    name = "spool",
    about = "Read and write files through buffered channels, and work with JSON documents.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(visible_alias = "w", about = "Write text to a file")]
    Write(WriteArgs),

    #[command(visible_alias = "r", about = "Print bytes from a file")]
    Read(ReadArgs),

    #[command(about = "Print a file line by line")]
    Lines(LinesArgs),

    #[command(visible_alias = "cp", about = "Copy a file through a channel")]
    Copy(CopyArgs),

    #[command(about = "Inspect and reformat JSON documents")]
    Json(JsonArgs),

    #[command(about = "Write or read the sample article list")]
    Articles(ArticlesArgs),
}

#[derive(Debug, clap::Args)]
#[command(after_help = "\
\x1b[1m\x1b[4mExamples:\x1b[0m
  spool write text01.txt 'Hello, world!'
  spool write --append text01.txt ' Again.'
  spool write --create-new --mode 600 secret.txt 'hunter2'")]
pub struct WriteArgs {
    /// File to write
    pub path: PathBuf,

    /// Text to write
    pub text: String,

    /// Permission bits (octal) for a newly created file
    #[arg(long, value_parser = parse_mode, default_value = "644")]
    pub mode: u32,

    /// Fail if the file already exists
    #[arg(long, conflicts_with = "append")]
    pub create_new: bool,

    /// Append instead of truncating
    #[arg(short, long)]
    pub append: bool,
}

#[derive(Debug, clap::Args)]
pub struct ReadArgs {
    /// File to read
    pub path: PathBuf,

    /// Byte offset to seek to before reading
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,

    /// Origin of the offset: start, current or end
    #[arg(short, long, default_value = "start")]
    pub whence: Whence,

    /// Number of bytes to read (default: to end of file)
    #[arg(short = 'n', long)]
    pub length: Option<u64>,
}

#[derive(Debug, clap::Args)]
pub struct LinesArgs {
    /// File to print
    pub path: PathBuf,

    /// Read-buffer size in bytes
    #[arg(long, default_value_t = spool_format::DEFAULT_CAPACITY)]
    pub capacity: usize,
}

#[derive(Debug, clap::Args)]
pub struct CopyArgs {
    /// Source file
    pub source: PathBuf,

    /// Destination file, created or truncated
    pub destination: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct JsonArgs {
    #[command(subcommand)]
    pub command: JsonCommands,
}

#[derive(Debug, Subcommand)]
pub enum JsonCommands {
    #[command(visible_alias = "fmt", about = "Decode a document and encode it again")]
    Format(JsonFormatArgs),

    #[command(about = "Print the value at a key path")]
    Get(JsonGetArgs),
}

#[derive(Debug, clap::Args)]
pub struct JsonFormatArgs {
    /// JSON document
    pub path: PathBuf,

    /// Emit everything on one line
    #[arg(short, long, conflicts_with = "indent")]
    pub compact: bool,

    /// Indent unit for pretty output
    #[arg(short, long, default_value = "  ")]
    pub indent: String,

    /// Rewrite the file instead of printing
    #[arg(long)]
    pub in_place: bool,
}

#[derive(Debug, clap::Args)]
#[command(after_help = "\
Keys walk objects by name and arrays by index:
  spool json get articles.json 0 comments 0 author name")]
pub struct JsonGetArgs {
    /// JSON document
    pub path: PathBuf,

    /// Object keys or array indexes, outermost first
    pub keys: Vec<String>,
}

#[derive(Debug, clap::Args)]
pub struct ArticlesArgs {
    #[command(subcommand)]
    pub command: ArticlesCommands,
}

#[derive(Debug, Subcommand)]
pub enum ArticlesCommands {
    #[command(about = "Write the sample articles as JSON")]
    Write {
        /// Output document
        path: PathBuf,

        /// Emit everything on one line
        #[arg(short, long)]
        compact: bool,
    },

    #[command(about = "Decode an article list and print a summary")]
    Read {
        /// Article document
        path: PathBuf,
    },
}
