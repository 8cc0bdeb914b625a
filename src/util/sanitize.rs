use std::io::{BufRead, Write};

use lazy_static::lazy_static;
use regex::Regex;

use super::entities::unescape;
use crate::Status;

/// Replaces runs of characters that are not allowed in Windows file names
/// with a single `_`, then decodes HTML entities: `&#12394;<>` gives `な_`.
pub fn sanitize_line(line: &str) -> String {
    let replaced = RESERVED.replace_all(line, "_");
    unescape(&replaced)
}

/// Turns a storefront title into a readable folder name.
///
/// Entities are decoded first, subtitles separated by `:` become ` - `,
/// apostrophes are dropped and whitespace is collapsed.
pub fn sanitize_file_name(input: &str) -> String {
    let decoded = unescape(input);
    let decoded = decoded.replace(':', " - ").replace('\'', "");
    let sanitized = RESERVED.replace_all(&decoded, "_");
    WHITESPACE.replace_all(&sanitized, " ").trim().to_owned()
}

/// Streams `reader` to `writer` one line at a time, passing each line
/// without its terminator through `transform`. Terminators are kept as they
/// were. Returns the number of lines processed.
pub fn run_filter<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    transform: fn(&str) -> String,
) -> Result<usize, Status> {
    let mut line = String::new();
    let mut count = 0;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        let (body, terminator) = split_terminator(&line);
        writer.write_all(transform(body).as_bytes())?;
        writer.write_all(terminator.as_bytes())?;
        writer.flush()?;
        count += 1;
    }

    Ok(count)
}

fn split_terminator(line: &str) -> (&str, &str) {
    let body = line.trim_end_matches(['\n', '\r']);
    (body, &line[body.len()..])
}

lazy_static! {
    static ref RESERVED: Regex = Regex::new(r#"[\\/:*?"<>|]+"#).unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}
