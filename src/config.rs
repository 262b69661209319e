// ============================================
// src/config.rs
// Game settings, read from config.json when present
// ============================================

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::language::Language;
use crate::rotator::RotatorConfig;
use crate::spin::SpinTiming;
use crate::store::default_config_dir;
use crate::wheel::WheelConfig;

pub const CONFIG_FILE: &str = "config.json";

/// Every tunable of a game session. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub wheel: WheelConfig,
    pub timing: SpinTiming,
    pub rotator: RotatorConfig,
    /// Start language; the stored preference wins when unset.
    pub language: Option<Language>,
}

impl GameConfig {
    /// `config.json` in the platform config directory.
    pub fn default_path() -> PathBuf {
        default_config_dir().join(CONFIG_FILE)
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("pimpampet-no-such-config.json");
        assert_eq!(GameConfig::load(&path).unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let config: GameConfig = serde_json::from_str(
            r#"{"wheel": {"spin": {"min_turns": 2}}, "rotator": {"recent_capacity": 5}, "language": "english"}"#,
        )
        .unwrap();
        assert_eq!(config.wheel.spin.min_turns, 2);
        assert_eq!(config.wheel.spin.max_turns, 7);
        assert_eq!(config.wheel.excluded, vec!['c', 'q', 'x', 'y']);
        assert_eq!(config.rotator.recent_capacity, 5);
        assert_eq!(config.rotator.min_questions, 5);
        assert_eq!(config.timing, SpinTiming::default());
        assert_eq!(config.language, Some(Language::English));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("pimpampet-bad-{}.json", std::process::id()));
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(GameConfig::load(&path), Err(ConfigError::Parse { .. })));
        let _ = fs::remove_file(&path);
    }
}
