use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{documents::WrapId, logging::FetchCounters, Status};

/// Shape of the file handed over to the downloader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// `wrapidlist.sh`, one `bfg-dl.sh` invocation per id.
    Script,
    /// `wrapidlist.txt`, one bare id per line.
    List,
}

impl OutputFormat {
    pub fn from_gen_script(gen_script: bool) -> Self {
        match gen_script {
            true => OutputFormat::Script,
            false => OutputFormat::List,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Script => "wrapidlist.sh",
            OutputFormat::List => "wrapidlist.txt",
        }
    }

    pub fn line(&self, wrap_id: &WrapId) -> String {
        match self {
            OutputFormat::Script => format!("bash bfg-dl.sh -d {wrap_id}"),
            OutputFormat::List => wrap_id.to_string(),
        }
    }
}

/// Writes the first `count` wrapIDs to the format's file under `dir`,
/// replacing any previous file, and returns its path.
///
/// Fails without creating the file when fewer than `count` ids are given.
#[instrument(level = "trace", skip(wrap_ids))]
pub fn write_wrap_ids(
    dir: &Path,
    wrap_ids: &[WrapId],
    count: usize,
    format: OutputFormat,
) -> Result<PathBuf, Status> {
    if wrap_ids.len() < count {
        let status = Status::not_found(format!(
            "requested {count} wrapIDs but the catalog listing yielded only {}",
            wrap_ids.len()
        ));
        FetchCounters::short_result(count, wrap_ids.len(), &status);
        return Err(status);
    }

    let path = dir.join(format.file_name());
    let mut writer = BufWriter::new(File::create(&path)?);
    for wrap_id in &wrap_ids[..count] {
        writeln!(writer, "{}", format.line(wrap_id))?;
    }
    writer.flush()?;

    FetchCounters::file_written(&path, count);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn wrap_ids(ids: &[&str]) -> Vec<WrapId> {
        ids.iter().filter_map(|id| WrapId::parse(id)).collect()
    }

    #[test]
    fn format_from_gen_script() {
        assert_eq!(OutputFormat::from_gen_script(true), OutputFormat::Script);
        assert_eq!(OutputFormat::from_gen_script(false), OutputFormat::List);
    }

    #[test]
    fn write_script() {
        let dir = tempfile::tempdir().unwrap();
        let ids = wrap_ids(&["F3T1L1", "F2T1L1", "F1T1L1", "F0T1L1"]);

        let path = write_wrap_ids(dir.path(), &ids, 3, OutputFormat::Script).unwrap();
        assert_eq!(path, dir.path().join("wrapidlist.sh"));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "bash bfg-dl.sh -d F3T1L1\nbash bfg-dl.sh -d F2T1L1\nbash bfg-dl.sh -d F1T1L1\n"
        );
        assert!(!dir.path().join("wrapidlist.txt").exists());
    }

    #[test]
    fn write_list() {
        let dir = tempfile::tempdir().unwrap();
        let ids = wrap_ids(&["F3T1L1", "F2T1L1"]);

        let path = write_wrap_ids(dir.path(), &ids, 2, OutputFormat::List).unwrap();
        assert_eq!(path, dir.path().join("wrapidlist.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "F3T1L1\nF2T1L1\n");
    }

    #[test]
    fn write_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("wrapidlist.txt"), "OLD\nOLD\nOLD\nOLD\n").unwrap();

        write_wrap_ids(dir.path(), &wrap_ids(&["F1T1L1"]), 1, OutputFormat::List).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("wrapidlist.txt")).unwrap(),
            "F1T1L1\n"
        );
    }

    #[test]
    fn short_list_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let ids = wrap_ids(&["F3T1L1", "F2T1L1"]);

        let result = write_wrap_ids(dir.path(), &ids, 3, OutputFormat::Script);
        assert!(matches!(result, Err(Status::NotFound(_))));
        assert!(!dir.path().join("wrapidlist.sh").exists());
    }
}
