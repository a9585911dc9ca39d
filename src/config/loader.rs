use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::PipelineConfig, ConfigError};

/// Load configuration: built-in defaults, then the TOML file if one is given,
/// then `ORDER_PIPELINE_*` environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(PipelineConfig::default()));

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config: PipelineConfig = figment
        .merge(Env::prefixed("ORDER_PIPELINE_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<PipelineConfig, ConfigError> {
    let config: PipelineConfig =
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
/// - roster_buffer is not 0
/// - keep_snapshots, when set, is not 0
pub fn validate_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.roster_buffer == 0 {
        return Err(ConfigError::ValidationError(
            "roster_buffer cannot be 0".to_string(),
        ));
    }
    if config.keep_snapshots == Some(0) {
        return Err(ConfigError::ValidationError(
            "keep_snapshots cannot be 0, leave it unset to keep every snapshot".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.snapshot_dir, PathBuf::from("orders"));
        assert_eq!(config.preparation_time().as_millis(), 3000);
        assert_eq!(config.keep_snapshots, None);
    }

    #[test]
    fn test_load_config_from_str_overrides() {
        let toml = r#"
snapshot_dir = "/var/lib/orders"
preparation_time_ms = 250
keep_snapshots = 5
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.snapshot_dir, PathBuf::from("/var/lib/orders"));
        assert_eq!(config.preparation_time_ms, 250);
        assert_eq!(config.keep_snapshots, Some(5));
        assert_eq!(config.roster_buffer, 32);
    }

    #[test]
    fn test_load_config_from_str_invalid() {
        let result = load_config_from_str("preparation_time_ms = \"soon\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));

        let result = load_config_from_str("roster_buffer = 0");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = load_config_from_str("keep_snapshots = 0");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Some(Path::new("/nonexistent/pipeline.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
snapshot_dir = "snapshots"
roster_buffer = 8
"#
        )
        .unwrap();

        let config = load_config(Some(temp_file.path())).unwrap();
        assert_eq!(config.snapshot_dir, PathBuf::from("snapshots"));
        assert_eq!(config.roster_buffer, 8);
        assert_eq!(config.preparation_time_ms, 3000);
    }
}
