use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Delay between starting each fetch request to avoid rate limiting (10ms)
pub const FETCH_STAGGER_DELAY_MS: u64 = 10;

// =============================================================================
// Discovery constants
// =============================================================================

/// File extensions scanned when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &[".hcl", ".tf"];

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "MODPIN_LOG";

const APP_NAME: &str = "modpin";

const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration file structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub extensions: Vec<String>,
    pub git: GitConfig,
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            git: GitConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// `git ls-remote` settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GitConfig {
    /// Git executable
    pub binary: String,
    /// Timeout of one ls-remote call in milliseconds
    pub timeout_ms: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: "git".to_string(),
            timeout_ms: FETCH_TIMEOUT_MS,
        }
    }
}

/// Remote fetch settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    /// Delay between starting concurrent fetches in milliseconds
    pub stagger_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            stagger_delay_ms: FETCH_STAGGER_DELAY_MS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = config_path();
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the config directory for modpin.
/// Uses $XDG_CONFIG_HOME/modpin if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/modpin,
/// or ./modpin if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the config file.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "git": {
                "timeoutMs": 1000
            }
        }))
        .unwrap();

        assert_eq!(result.git.timeout_ms, 1000);
        assert_eq!(result.git.binary, "git");
        assert_eq!(result.extensions, vec![".hcl", ".tf"]);
        assert_eq!(result.fetch, FetchConfig::default());
    }

    #[test]
    fn config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "extensions": [".tf"],
            "git": {
                "binary": "/usr/local/bin/git",
                "timeoutMs": 5000
            },
            "fetch": {
                "staggerDelayMs": 0
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            Config {
                extensions: vec![".tf".to_string()],
                git: GitConfig {
                    binary: "/usr/local/bin/git".to_string(),
                    timeout_ms: 5000,
                },
                fetch: FetchConfig {
                    stagger_delay_ms: 0
                },
            }
        );
    }

    #[test]
    fn load_reads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"extensions": [".hcl"]}}"#).unwrap();

        let result = Config::load(Some(file.path())).unwrap();

        assert_eq!(result.extensions, vec![".hcl"]);
    }

    #[test]
    fn load_fails_for_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("missing.json")));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn load_fails_for_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = Config::load(Some(file.path()));

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn config_dir_with_env_uses_xdg_config_home_when_set() {
        let path = config_dir_with_env(
            Some("/tmp/test-config".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-config/modpin"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_home_config() {
        let path = config_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.config/modpin"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = config_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./modpin"));
    }
}
