//! Configuration loaded from a JSON file.
//!
//! Every section has defaults, so an empty object `{}` is a valid
//! configuration and a missing file can fall back to `Config::default()`.

use crate::encode::{OutputFormat, DEFAULT_JPEG_QUALITY};
use crate::fonts::FontRegistry;
use crate::text::Language;
use crate::{MicrographyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub fonts: FontsConfig,
    pub providers: ProvidersConfig,
    pub output: OutputConfig,
}

/// Where font files live and, optionally, an explicit table of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontsConfig {
    pub dir: PathBuf,
    /// Overrides the stock table when present. Relative paths resolve against `dir`.
    pub table: Option<BTreeMap<Language, BTreeMap<String, PathBuf>>>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("assets/fonts"), table: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    pub quran_url: String,
    pub sefaria_url: String,
    /// Whole-request timeout. None leaves the call unbounded.
    pub timeout_secs: Option<u64>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            quran_url: "http://api.alquran.cloud/v1".into(),
            sefaria_url: "https://www.sefaria.org/api".into(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub png: bool,
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { png: false, jpeg_quality: DEFAULT_JPEG_QUALITY }
    }
}

impl OutputConfig {
    pub fn format(&self) -> OutputFormat {
        if self.png {
            OutputFormat::Png
        } else {
            OutputFormat::Jpeg { quality: self.jpeg_quality }
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| MicrographyError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| MicrographyError::Config(e.to_string()))
    }

    /// Build the font registry this configuration describes.
    pub fn font_registry(&self) -> Result<FontRegistry> {
        match &self.fonts.table {
            None => Ok(FontRegistry::builtin(&self.fonts.dir)),
            Some(table) => {
                let resolved = table
                    .iter()
                    .map(|(lang, by_name)| {
                        let by_name = by_name
                            .iter()
                            .map(|(name, path)| (name.clone(), self.fonts.dir.join(path)))
                            .collect();
                        (*lang, by_name)
                    })
                    .collect();
                FontRegistry::new(resolved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::from_json(r#"{"providers": {"timeout_secs": 5}, "output": {"png": true}}"#)
            .unwrap();
        assert_eq!(cfg.providers.timeout_secs, Some(5));
        assert_eq!(cfg.providers.quran_url, "http://api.alquran.cloud/v1");
        assert_eq!(cfg.output.format(), OutputFormat::Png);
    }

    #[test]
    fn explicit_font_table_resolves_against_dir() {
        let cfg = Config::from_json(
            r#"{"fonts": {"dir": "/opt/fonts", "table": {
                "he": {"David": "david.ttf"},
                "ar": {"Amiri": "/abs/amiri.ttf"}
            }}}"#,
        )
        .unwrap();
        let reg = cfg.font_registry().unwrap();
        assert_eq!(reg.resolve(Language::He, "David").unwrap(), Path::new("/opt/fonts/david.ttf"));
        assert_eq!(reg.resolve(Language::Ar, "Amiri").unwrap(), Path::new("/abs/amiri.ttf"));
        assert!(reg.resolve(Language::He, "Horev").is_err());
    }

    #[test]
    fn font_table_missing_a_language_is_rejected() {
        let cfg = Config::from_json(r#"{"fonts": {"table": {"he": {"David": "david.ttf"}}}}"#)
            .unwrap();
        assert!(matches!(cfg.font_registry(), Err(MicrographyError::Config(_))));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"output": {{"jpeg_quality": 90}}}}"#).unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.output.format(), OutputFormat::Jpeg { quality: 90 });
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(Config::load(file.path()), Err(MicrographyError::Config(_))));
    }
}
