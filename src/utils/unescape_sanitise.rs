use std::io;

use bfg_fetcher::{
    util::sanitize::{run_filter, sanitize_file_name, sanitize_line},
    Status, Tracing,
};
use clap::Parser;
use tracing::debug;

/// Decodes HTML entities in text read from stdin and replaces characters
/// that are illegal in Windows file names, writing the result to stdout.
#[derive(Parser)]
struct Opts {
    /// Also turn each line into a readable folder name: ':' becomes ' - ',
    /// apostrophes are dropped and whitespace is collapsed.
    #[clap(long)]
    file_name: bool,
}

fn main() -> Result<(), Status> {
    Tracing::setup("utils/unescape_sanitise", false)?;

    let opts: Opts = Opts::parse();

    let transform: fn(&str) -> String = match opts.file_name {
        true => sanitize_file_name,
        false => sanitize_line,
    };

    let count = run_filter(io::stdin().lock(), io::stdout().lock(), transform)?;
    debug!("sanitized {count} lines");

    Ok(())
}
