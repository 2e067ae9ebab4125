//! Configuration loading and discovery for `outfits.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{LayoutSetting, OutfitConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "outfits.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse outfits.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override asset root
    pub root: Option<PathBuf>,
    /// Override outfit directory
    pub outfit_dir: Option<String>,
    /// Override layout detection
    pub layout: Option<LayoutSetting>,
    /// Override cache capacity
    pub cache_capacity: Option<usize>,
}

/// Find outfits.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for outfits.toml
/// 2. Check XDG_CONFIG_HOME/outfitstore/outfits.toml (or ~/.config/outfitstore/outfits.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find outfits.toml in XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("outfitstore").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find outfits.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from an outfits.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// `find_config()` to locate the config file. If no config file is found,
/// returns the default configuration.
///
/// A relative `assets.root` is resolved against the directory holding the
/// config file.
///
/// # Example
/// ```ignore
/// // Load from discovered config
/// let config = load_config(None)?;
///
/// // Load from specific path
/// let config = load_config(Some(Path::new("game/outfits.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<OutfitConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(OutfitConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<OutfitConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: OutfitConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = project_root(path) {
        config.assets.root = resolve_path(root, &config.assets.root);
    }
    log::debug!("loaded config from {}", path.display());

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut OutfitConfig, overrides: &CliOverrides) {
    if let Some(ref root) = overrides.root {
        config.assets.root = root.clone();
    }

    if let Some(ref outfit_dir) = overrides.outfit_dir {
        config.assets.outfit_dir = outfit_dir.clone();
    }

    if let Some(layout) = overrides.layout {
        config.layout.mode = layout;
    }

    if let Some(capacity) = overrides.cache_capacity {
        config.cache.capacity = capacity;
    }
}

/// Get the directory holding a config file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to a directory.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the directory.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"[cache]\ncapacity = 4")
            .expect("should write config content");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).expect("should create config file");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("should create nested dirs");

        assert_eq!(find_config_from(nested), Some(config_path));
    }

    #[test]
    fn test_load_config_resolves_root_against_config_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"[assets]\nroot = \"data/sprites\"\n\n[layout]\nmode = \"modern\"")
            .expect("should write config content");

        let config = load_config(Some(&config_path)).expect("should load config");
        assert_eq!(config.assets.root, temp.path().join("data/sprites"));
        assert_eq!(config.layout.mode, LayoutSetting::Modern);
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"this is not valid toml {{{")
            .expect("should write invalid config");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"[profiles.bad]\ndress = \"nope-not-a-color\"")
            .expect("should write invalid config");

        let result = load_config(Some(&config_path));
        match result {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("profiles.bad.dress"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = OutfitConfig::default();
        let overrides = CliOverrides {
            root: Some(PathBuf::from("/srv/game")),
            layout: Some(LayoutSetting::Legacy),
            cache_capacity: Some(64),
            ..Default::default()
        };

        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.assets.root, PathBuf::from("/srv/game"));
        assert_eq!(config.assets.outfit_dir, "outfits");
        assert_eq!(config.layout.mode, LayoutSetting::Legacy);
        assert_eq!(config.cache.capacity, 64);
    }

    #[test]
    fn test_merge_no_overrides_keeps_config() {
        let mut config = OutfitConfig::default();
        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert_eq!(config.assets.root, PathBuf::from("."));
        assert_eq!(config.layout.mode, LayoutSetting::Auto);
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/project");
        assert_eq!(resolve_path(root, Path::new("/other/path")), PathBuf::from("/other/path"));
        assert_eq!(resolve_path(root, Path::new("sprites")), PathBuf::from("/project/sprites"));
    }
}
