//! Sketch configuration file: RON on disk, checked before a replay uses it

use std::path::{Path, PathBuf};

use rk_sketch::SketchConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid setting '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_segments(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(invalid(field, "needs at least one segment"));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, format!("{} is not a finite non-negative number", value)));
    }
    Ok(())
}

/// Reject settings the tools cannot work with
pub fn validate(config: &SketchConfig) -> Result<(), ConfigError> {
    let t = &config.tessellation;
    check_segments("tessellation.arc_segments", t.arc_segments)?;
    check_segments("tessellation.circle_segments", t.circle_segments)?;
    check_segments("tessellation.spline_segments", t.spline_segments)?;

    let tol = &config.tolerances;
    check_non_negative("tolerances.collinear", tol.collinear)?;
    check_non_negative("tolerances.preview_collinear", tol.preview_collinear)?;
    check_non_negative("tolerances.zero_length", tol.zero_length)?;
    check_non_negative("tolerances.sweep", tol.sweep)?;

    check_non_negative("tools.spline_tension", config.tools.spline_tension)?;
    check_non_negative("tools.handle_pick_radius", config.tools.handle_pick_radius)?;
    if config.tools.handle_pick_radius == 0.0 {
        return Err(invalid("tools.handle_pick_radius", "handles could never be grabbed"));
    }
    Ok(())
}

/// The configuration a replay runs with and the file it came from
pub struct ConfigManager {
    config: SketchConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Open `config_path`. A missing, unreadable or invalid file leaves the defaults in place.
    pub fn open(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let config = match Self::load(&config_path) {
            Ok(Some(config)) => {
                tracing::info!("Loaded config from {:?}", config_path);
                config
            }
            Ok(None) => {
                tracing::info!("No config file at {:?}, using defaults", config_path);
                SketchConfig::new()
            }
            Err(e) => {
                tracing::warn!("Ignoring config file {:?}: {}", config_path, e);
                SketchConfig::new()
            }
        };

        Self {
            config,
            config_path,
        }
    }

    /// `config.ron` under the OS configuration directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rk-sketch")
            .join("config.ron")
    }

    /// Read and check a configuration file; `None` when it does not exist
    pub fn load(path: &Path) -> Result<Option<SketchConfig>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse a RON configuration; missing sections take their defaults
    pub fn parse(content: &str) -> Result<SketchConfig, ConfigError> {
        let config: SketchConfig = ron::from_str(content)?;
        if config.version > SketchConfig::CURRENT_VERSION {
            tracing::warn!(
                "Config version {} is newer than supported version {}",
                config.version,
                SketchConfig::CURRENT_VERSION
            );
        }
        validate(&config)?;
        Ok(config)
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }

    /// Write the current configuration, creating parent directories
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())?;
        std::fs::write(&self.config_path, content)?;
        tracing::info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Replace the file's contents with the defaults
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.config = SketchConfig::new();
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOLS: &str = "tools: (continuous_line: false, default_rect_mode: ThreePoint, default_circle_mode: TwoPoint, default_arc_mode: CenterStartEnd, spline_tension: 0.5, handle_pick_radius: 1.2, handles_visible: true)";

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.ron");
        assert!(ConfigManager::load(&path).expect("not an error").is_none());

        let manager = ConfigManager::open(&path);
        assert_eq!(manager.config(), &SketchConfig::new());
        assert!(!path.exists());
    }

    #[test]
    fn test_reset_writes_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.ron");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("created");
        std::fs::write(&path, format!("(version: 1, {})", TOOLS)).expect("written");

        let mut manager = ConfigManager::open(&path);
        assert!(!manager.config().tools.continuous_line);

        manager.reset().expect("saved");
        let reloaded = ConfigManager::load(&path).expect("readable").expect("present");
        assert_eq!(reloaded, SketchConfig::new());
        assert_eq!(manager.config_file_path(), path.as_path());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = ConfigManager::parse(&format!("(version: 1, {})", TOOLS)).expect("valid config");
        assert!(!config.tools.continuous_line);
        assert_eq!(config.tools.default_rect_mode, rk_sketch::RectMode::ThreePoint);
        assert_eq!(config.tessellation, rk_sketch::TessellationConfig::default());
    }

    #[test]
    fn test_unparsable_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "not ron at all (").expect("written");

        assert!(matches!(ConfigManager::load(&path), Err(ConfigError::Parse(_))));
        assert_eq!(ConfigManager::open(&path).config(), &SketchConfig::new());
    }

    #[test]
    fn test_rejects_unusable_settings() {
        let err = ConfigManager::parse("(version: 1, tessellation: (arc_segments: 0, circle_segments: 64, spline_segments: 128))")
            .expect_err("zero segments");
        assert!(matches!(err, ConfigError::Invalid { field: "tessellation.arc_segments", .. }));

        let mut config = SketchConfig::new();
        config.tolerances.zero_length = -1e-9;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Invalid { field: "tolerances.zero_length", .. })
        ));

        let mut config = SketchConfig::new();
        config.tools.handle_pick_radius = 0.0;
        assert!(validate(&config).is_err());
        assert!(validate(&SketchConfig::new()).is_ok());
    }
}
