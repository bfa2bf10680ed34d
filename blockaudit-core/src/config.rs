//! Configuration loading from blockaudit.toml.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, str::FromStr};

/// Main configuration structure for blockaudit.toml.
#[derive(Debug, Deserialize, Default)]
pub struct AuditConfig {
    /// Default content snapshot to audit.
    pub snapshot: Option<String>,
    /// Default `app_label.Model.field` selectors.
    pub pagetypes: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "csv", "plain" or "json".
    pub format: Option<String>,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Plain,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => bail!("Unknown output format: {}", other),
        }
    }
}

impl AuditConfig {
    /// The configured output format, if any.
    pub fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .map(str::parse)
            .transpose()
    }
}

/// Loads configuration from blockaudit.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<AuditConfig>> {
    let path = root.join("blockaudit.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid blockaudit.toml")?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let cfg: AuditConfig = toml::from_str(
            r#"
snapshot = "exports/content.json"
pagetypes = ["testapp.SearchTestPage.streamfield_with_block"]

[output]
format = "plain"
"#,
        )
        .unwrap();

        assert_eq!(cfg.snapshot.as_deref(), Some("exports/content.json"));
        assert_eq!(cfg.pagetypes.as_ref().map(Vec::len), Some(1));
        assert_eq!(cfg.output_format().unwrap(), Some(OutputFormat::Plain));
    }

    #[test]
    fn test_config_without_output() {
        let cfg: AuditConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.output_format().unwrap(), None);
    }
}
