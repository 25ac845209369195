use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional project config file, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "deepimport.json";

/// How import statements are found in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Token-aware scan that skips comments and string/template literals.
    #[default]
    Lexical,
    /// Plain textual patterns (`from ... '<spec>';` and `require('<spec>');`).
    Pattern,
}

impl ScanMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Pattern => "pattern",
        }
    }
}

/// Which file wins when several candidates match one specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// First match in graph order.
    #[default]
    First,
    /// Match in the nearest `node_modules` above the importing file.
    NearestScope,
}

impl TieBreak {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::NearestScope => "nearest-scope",
        }
    }
}

/// Options for one conversion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ConvertOptions {
    pub scan: ScanMode,
    pub tie_break: TieBreak,
}

impl ConvertOptions {
    #[must_use]
    pub fn with_scan(mut self, scan: ScanMode) -> Self {
        self.scan = scan;
        self
    }

    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

/// Runtime configuration for the deepimport CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Conversion options (file values, overridden by flags).
    pub convert: ConvertOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            convert: ConvertOptions::default(),
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Create a config for `cwd`, reading `deepimport.json` there if it exists.
    pub fn load(cwd: PathBuf) -> Result<Self> {
        let convert = load_convert_options(&cwd.join(CONFIG_FILE_NAME))?;
        Ok(Self {
            convert,
            ..Self::new(cwd)
        })
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Override the scan mode when one is given.
    #[must_use]
    pub fn with_scan(mut self, scan: Option<ScanMode>) -> Self {
        if let Some(scan) = scan {
            self.convert.scan = scan;
        }
        self
    }

    /// Override the tie-break policy when one is given.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: Option<TieBreak>) -> Self {
        if let Some(tie_break) = tie_break {
            self.convert.tie_break = tie_break;
        }
        self
    }
}

/// Read conversion options from a config file. A missing file yields defaults.
fn load_convert_options(path: &Path) -> Result<ConvertOptions> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ConvertOptions::default())
        }
        Err(source) => {
            return Err(Error::ConfigRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.convert, ConvertOptions::default());
        assert_eq!(config.convert.scan, ScanMode::Lexical);
        assert_eq!(config.convert.tie_break, TieBreak::First);
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"scan": "pattern", "tie_break": "nearest-scope"}"#,
        )
        .unwrap();

        let config = Config::load(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.convert.scan, ScanMode::Pattern);
        assert_eq!(config.convert.tie_break, TieBreak::NearestScope);
    }

    #[test]
    fn test_load_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"scan": "pattern"}"#).unwrap();

        let config = Config::load(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.convert.scan, ScanMode::Pattern);
        assert_eq!(config.convert.tie_break, TieBreak::First);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{ scan: ").unwrap();

        let err = Config::load(dir.path().to_path_buf()).unwrap_err();
        assert_eq!(err.code(), crate::error::codes::CONFIG_PARSE);
    }

    #[test]
    fn test_flag_overrides() {
        let config = Config::new(PathBuf::from("/app"))
            .with_scan(Some(ScanMode::Pattern))
            .with_tie_break(None)
            .with_verbosity(2)
            .with_json_logs(true);
        assert_eq!(config.convert.scan, ScanMode::Pattern);
        assert_eq!(config.convert.tie_break, TieBreak::First);
        assert_eq!(config.verbosity, 2);
        assert!(config.json_logs);
    }
}
