use std::{collections::HashMap, fs, path::Path};

use tracing::debug;

use crate::{
    documents::{CatalogFilter, Language, Platform},
    Status,
};

pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// Settings of a wrapID fetch, built once at startup from `config.ini`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetcherConfig {
    pub platform: Platform,
    pub language: Language,

    /// Emit a `bfg-dl.sh` batch script instead of a bare id list.
    pub gen_script: bool,

    /// Number of most recent releases to collect.
    pub latest_games_count: usize,

    pub enable_debug_logging: bool,
}

impl FetcherConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Status> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Status::new(&format!("Failed to read config '{}'", path.display()), e)
        })?;
        debug!("loaded config from {}", path.display());

        Self::from_pairs(&parse_pairs(&text)?)
    }

    pub fn from_pairs(pairs: &HashMap<String, String>) -> Result<Self, Status> {
        let count_value = required(pairs, "latest_games_count")?;
        let latest_games_count = count_value.parse::<usize>().map_err(|e| {
            Status::invalid_argument(format!(
                "latest_games_count='{count_value}' is not a positive integer: {e}"
            ))
        })?;
        if latest_games_count == 0 {
            return Err(Status::invalid_argument(
                "latest_games_count must be at least 1",
            ));
        }

        Ok(FetcherConfig {
            platform: required(pairs, "platform")?.parse()?,
            language: required(pairs, "language")?.parse()?,
            gen_script: required(pairs, "gen_script")? == "True",
            latest_games_count,
            enable_debug_logging: match pairs.get("enable_debug_logging") {
                Some(value) => parse_flag(value),
                None => false,
            },
        })
    }

    pub fn catalog_filter(&self) -> CatalogFilter {
        CatalogFilter::new(self.platform, self.language)
    }
}

/// Splits `key=value` lines into a map. Blank lines and lines starting with
/// `#` or `;` are ignored. Any other line needs exactly one `=`.
pub fn parse_pairs(text: &str) -> Result<HashMap<String, String>, Status> {
    let mut pairs = HashMap::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) if !value.contains('=') => {
                pairs.insert(key.trim().to_owned(), value.trim().to_owned());
            }
            _ => {
                return Err(Status::invalid_argument(format!(
                    "config line {}: expected 'key=value', got '{line}'",
                    i + 1
                )))
            }
        }
    }

    Ok(pairs)
}

fn required<'a>(pairs: &'a HashMap<String, String>, key: &str) -> Result<&'a str, Status> {
    match pairs.get(key) {
        Some(value) => Ok(value.as_str()),
        None => Err(Status::invalid_argument(format!(
            "missing required config key '{key}'"
        ))),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = "platform=win\nlanguage=eng\ngen_script=True\nlatest_games_count=250\n";

    #[test]
    fn parse_full_config() {
        let config = FetcherConfig::from_pairs(&parse_pairs(CONFIG).unwrap()).unwrap();
        assert_eq!(
            config,
            FetcherConfig {
                platform: Platform::Windows,
                language: Language::English,
                gen_script: true,
                latest_games_count: 250,
                enable_debug_logging: false,
            }
        );
        assert_eq!(config.catalog_filter().tag(), "t1l1");
    }

    #[test]
    fn whitespace_comments_and_blank_lines() {
        let text = "# fetcher settings\n\n  platform = mac \n; legacy\nlanguage=ger\ngen_script=False\nlatest_games_count=5\nenable_debug_logging=yes\n";
        let config = FetcherConfig::from_pairs(&parse_pairs(text).unwrap()).unwrap();
        assert_eq!(config.platform, Platform::Mac);
        assert_eq!(config.language, Language::German);
        assert!(!config.gen_script);
        assert_eq!(config.latest_games_count, 5);
        assert!(config.enable_debug_logging);
    }

    #[test]
    fn gen_script_only_for_exact_true() {
        for (value, expected) in [("True", true), ("true", false), ("1", false), ("", false)] {
            let text = format!(
                "platform=win\nlanguage=eng\ngen_script={value}\nlatest_games_count=1"
            );
            let config = FetcherConfig::from_pairs(&parse_pairs(&text).unwrap()).unwrap();
            assert_eq!(config.gen_script, expected, "gen_script={value}");
        }
    }

    #[test]
    fn malformed_lines_are_rejected() {
        for line in ["platform", "platform=win=mac"] {
            let err = parse_pairs(&format!("language=eng\n{line}\n")).unwrap_err();
            match err {
                Status::InvalidArgument(msg) => assert!(msg.contains("line 2"), "{msg}"),
                other => panic!("unexpected status {other:?}"),
            }
        }
    }

    #[test]
    fn missing_key_is_rejected() {
        let pairs = parse_pairs("platform=win\nlanguage=eng\nlatest_games_count=3").unwrap();
        match FetcherConfig::from_pairs(&pairs).unwrap_err() {
            Status::InvalidArgument(msg) => assert!(msg.contains("gen_script"), "{msg}"),
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn bad_values_are_rejected() {
        for text in [
            "platform=linux\nlanguage=eng\ngen_script=True\nlatest_games_count=3",
            "platform=win\nlanguage=xx\ngen_script=True\nlatest_games_count=3",
            "platform=win\nlanguage=eng\ngen_script=True\nlatest_games_count=many",
            "platform=win\nlanguage=eng\ngen_script=True\nlatest_games_count=-3",
            "platform=win\nlanguage=eng\ngen_script=True\nlatest_games_count=0",
        ] {
            let pairs = parse_pairs(text).unwrap();
            assert!(
                matches!(FetcherConfig::from_pairs(&pairs), Err(Status::InvalidArgument(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let config = FetcherConfig::from_file(file.path()).unwrap();
        assert_eq!(config.latest_games_count, 250);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FetcherConfig::from_file(dir.path().join("config.ini")).is_err());
    }
}
