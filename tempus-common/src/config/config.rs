// See config.example.toml for information on the variables here.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct TempusConfig {
    pub locale: LocaleConfig,
    pub parsing: ParsingConfig,
    pub logging: LoggingConfig,
}

impl TempusConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<TempusConfig> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str::<TempusConfig>(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale used when a translation is missing from the requested one.
    pub default: String,
    /// Directory of `<locale>.toml` bundles layered over the built-in ones.
    pub bundle_dir: Option<PathBuf>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: String::from("en"),
            bundle_dir: None,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ParsingConfig {
    pub allow_keyword_arguments: bool,
    pub long_help: bool,
    pub positive_only: bool,
    pub allow_negatives: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            allow_keyword_arguments: true,
            long_help: true,
            positive_only: true,
            allow_negatives: true,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: String::from("info"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[parsing]\npositive_only = false").unwrap();

        let config = TempusConfig::load(file.path()).unwrap();
        assert!(!config.parsing.positive_only);
        assert!(config.parsing.long_help);
        assert!(config.parsing.allow_negatives);
        assert_eq!(config.locale.default, "en");
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TempusConfig::load(dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[parsing\nlong_help = 3").unwrap();
        assert!(TempusConfig::load(file.path()).is_err());
    }
}
