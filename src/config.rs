// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tracing::debug;

/// Env var naming the YAML config picked up by the binaries.
pub const CONFIG_ENV: &str = "CATALOGCHECK_CONFIG";

/// How a line is broken into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerMode {
    /// Split every line on the delimiter, quotes are not special.
    #[default]
    Naive,
    /// RFC-4180 quoting; quoted fields may hold delimiters and newlines.
    Quoted,
}

/// How the image column is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlCheck {
    /// Value must start with `url_prefix`.
    #[default]
    Prefix,
    /// Prefix test plus a full parse, scheme must be http or https.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub delimiter: char,
    /// Position of the `nombre` field.
    pub name_index: usize,
    /// Position of the `marca` field.
    pub brand_index: usize,
    /// Header name of the URL-shaped column; looked up by name, not position.
    pub image_column: String,
    pub url_prefix: String,
    pub url_check: UrlCheck,
    pub tokenizer: TokenizerMode,
    /// Report `NoDataRows` when the table has no rows below the header.
    pub require_data_rows: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            name_index: 0,
            brand_index: 1,
            image_column: "imagen_url".to_string(),
            url_prefix: "http".to_string(),
            url_check: UrlCheck::Prefix,
            tokenizer: TokenizerMode::Naive,
            require_data_rows: false,
        }
    }
}

impl ValidatorConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // an empty document deserializes to unit, not to a map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("parsing validator config")
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_yaml_str(&text)
            .with_context(|| format!("loading config {}", path.display()))?;
        debug!(path = %path.display(), ?cfg, "loaded config");
        Ok(cfg)
    }

    /// Explicit path wins, then `$CATALOGCHECK_CONFIG`, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::from_yaml_file(p);
        }
        match env::var_os(CONFIG_ENV) {
            Some(p) if !p.is_empty() => Self::from_yaml_file(Path::new(&p)),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_yaml_keeps_defaults() -> Result<()> {
        let cfg = ValidatorConfig::from_yaml_str("tokenizer: quoted\nrequire_data_rows: true\n")?;
        assert_eq!(cfg.tokenizer, TokenizerMode::Quoted);
        assert!(cfg.require_data_rows);
        assert_eq!(cfg.delimiter, ',');
        assert_eq!(cfg.image_column, "imagen_url");
        assert_eq!(cfg.url_check, UrlCheck::Prefix);
        Ok(())
    }

    #[test]
    fn empty_yaml_is_default() -> Result<()> {
        assert_eq!(ValidatorConfig::from_yaml_str("  \n")?, ValidatorConfig::default());
        Ok(())
    }

    #[test]
    fn unknown_mode_is_an_error() {
        assert!(ValidatorConfig::from_yaml_str("url_check: loose\n").is_err());
    }

    #[test]
    fn loads_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "delimiter: \";\"\nimage_column: image\nurl_check: strict")?;
        let cfg = ValidatorConfig::from_yaml_file(tmp.path())?;
        assert_eq!(cfg.delimiter, ';');
        assert_eq!(cfg.image_column, "image");
        assert_eq!(cfg.url_check, UrlCheck::Strict);
        Ok(())
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ValidatorConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.yaml"));
    }
}
