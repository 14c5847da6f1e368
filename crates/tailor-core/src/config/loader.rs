//! Configuration file discovery and loading

use super::TailorConfig;
use crate::error::TailorError;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// File names searched for, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".tailorrc.json",
    ".tailorrc.toml",
    "tailor.json",
    "tailor.toml",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| TailorError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// The format follows the extension: `.json` or `.toml`.
    pub fn load_from_file(path: &Path) -> Result<TailorConfig> {
        let content = fs::read_to_string(path).map_err(|e| TailorError::io_error(path, e))?;
        let extension = path.extension().and_then(|e| e.to_str());

        let parsed = match extension {
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            _ => Err("unsupported file extension (expected .json or .toml)".to_string()),
        };
        parsed.map_err(|message| {
            TailorError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                message
            ))
        })
    }

    /// Load config from an explicit path, or discover one
    ///
    /// Without an explicit path and without a discoverable file the default
    /// config is returned.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<TailorConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(TailorError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(TailorConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "tailor.json",
            r#"{ "prefix": "tw", "canonicalize": { "collapse": true } }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.prefix.as_deref(), Some("tw"));
        assert!(config.canonicalize.collapse);
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".tailorrc.toml",
            r##"
[theme]
"--color-brand" = "#123456"

[utilities]
btn = "@apply flex"

[canonicalize]
remPx = 16.0
"##,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.canonicalize.rem_px, Some(16.0));
        assert_eq!(config.utilities.get("btn").map(String::as_str), Some("@apply flex"));
        assert!(config.theme.contains_key("--color-brand"));
    }

    #[test]
    fn test_auto_discover() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();

        create_temp_config(temp_dir.path(), "tailor.json", "{}");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(
            found.unwrap().file_name().and_then(|n| n.to_str()),
            Some("tailor.json")
        );
    }

    #[test]
    fn test_dotfile_takes_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "tailor.json", "{}");
        create_temp_config(temp_dir.path(), ".tailorrc.json", "{}");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap().unwrap();
        assert!(found.ends_with(".tailorrc.json"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let error = ConfigLoader::load(Some(Path::new("nonexistent.json")), None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let error = ConfigLoader::load_from_file(&temp_dir.path().join("missing.json")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Io);
        assert!(error.to_string().contains("missing.json"));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "tailor.yaml", "prefix: tw");
        assert!(ConfigLoader::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "tailor.json", "{ nope");
        let error = ConfigLoader::load_from_file(&config_path).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }
}
