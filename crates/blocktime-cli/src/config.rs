//! Configuration file loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use blocktime_model::BlocktimeConfig;
use tracing::debug;

/// Loads the JSON configuration file, or the defaults when no path is given.
///
/// Keys missing from the file take their default values.
pub fn load_config(path: Option<&Path>) -> Result<BlocktimeConfig> {
    let Some(path) = path else {
        return Ok(BlocktimeConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: BlocktimeConfig = serde_json::from_str(&text)
        .with_context(|| format!("parse config {}", path.display()))?;
    debug!(
        path = %path.display(),
        timestamp_format = %config.reconcile.timestamp_format,
        robot_specialties = config.reconcile.robot_specialties.len(),
        "loaded config"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_no_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, BlocktimeConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{ "reconcile": {{ "timestamp_format": "%Y-%m-%d %H:%M" }} }}"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.reconcile.timestamp_format, "%Y-%m-%d %H:%M");
        assert!(config.reconcile.is_robot_eligible("CRS"));
        assert_eq!(config.sheets.dictionary, "Dictionary");
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();

        let error = load_config(Some(file.path())).unwrap_err();
        assert!(error.to_string().starts_with("parse config"));
    }
}
