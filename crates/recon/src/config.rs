use serde::Deserialize;

use crate::error::ReconError;
use crate::matcher::DEFAULT_TOLERANCE_DAYS;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// CLI-layer reconciliation config. The engine and loaders take the
/// tolerance and correction toggle as plain parameters; this struct only
/// maps a TOML file onto those parameters.
#[derive(Debug, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub legacy: LegacySourceConfig,
    pub live: LiveSourceConfig,
    #[serde(default = "default_tolerance_days")]
    pub tolerance_days: i64,
    /// Apply the OCR name-correction pass to the legacy corpus.
    #[serde(default = "default_corrections")]
    pub corrections: bool,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacySourceConfig {
    /// Path to the flat historical export (CSV), relative to the config file.
    pub file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveSourceConfig {
    /// Path to the live SQLite store, relative to the config file.
    pub database: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

fn default_tolerance_days() -> i64 {
    DEFAULT_TOLERANCE_DAYS
}

fn default_corrections() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }
        if self.legacy.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation("legacy.file must not be empty".into()));
        }
        if self.live.database.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "live.database must not be empty".into(),
            ));
        }
        if self.tolerance_days < 0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance_days must be >= 0, got {}",
                self.tolerance_days
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Lab Legacy Recon"

[legacy]
file = "oxetech_lab_historico.csv"

[live]
database = "oxetech.db"
"#;

    #[test]
    fn parse_valid_with_defaults() {
        let config = ReconConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Lab Legacy Recon");
        assert_eq!(config.legacy.file, "oxetech_lab_historico.csv");
        assert_eq!(config.live.database, "oxetech.db");
        assert_eq!(config.tolerance_days, 30);
        assert!(config.corrections);
        assert!(config.output.json.is_none());
    }

    #[test]
    fn parse_with_overrides() {
        let input = r#"
name = "Lab Legacy Recon"
tolerance_days = 14
corrections = false

[legacy]
file = "oxetech_lab_historico.csv"

[live]
database = "oxetech.db"

[output]
json = "merged.json"
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert_eq!(config.tolerance_days, 14);
        assert!(!config.corrections);
        assert_eq!(config.output.json.as_deref(), Some("merged.json"));
    }

    #[test]
    fn reject_negative_tolerance() {
        let input = r#"
name = "Lab Legacy Recon"
tolerance_days = -5

[legacy]
file = "oxetech_lab_historico.csv"

[live]
database = "oxetech.db"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("tolerance_days"));
    }

    #[test]
    fn reject_empty_paths() {
        let input = r#"
name = "Bad"

[legacy]
file = ""

[live]
database = "oxetech.db"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("legacy.file"));
    }

    #[test]
    fn reject_missing_section() {
        let input = r#"
name = "Bad"

[legacy]
file = "x.csv"
"#;
        assert!(ReconConfig::from_toml(input).is_err());
    }
}
