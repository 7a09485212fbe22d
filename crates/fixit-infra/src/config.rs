//! Server configuration loader for Fixit.
//!
//! Reads `config.toml` from the data directory (`~/.fixit/` in production) or
//! an explicit path and deserializes it into [`ServerConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::Path;

use fixit_types::config::ServerConfig;

/// Why a config file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Read and parse a config file without falling back.
///
/// Returns `Ok(None)` when the file does not exist.
pub async fn read_config_file(config_path: &Path) -> Result<Option<ServerConfig>, ConfigError> {
    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                source,
            });
        }
    };

    toml::from_str::<ServerConfig>(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: config_path.display().to_string(),
            source,
        })
}

/// Load `config_path` (or `{data_dir}/config.toml`), falling back to defaults.
///
/// A missing file yields the defaults silently. A file that cannot be read or
/// parsed also yields the defaults, and the error is handed back so the caller
/// can report it once logging is up.
pub async fn load_server_config(
    data_dir: &Path,
    config_path: Option<&Path>,
) -> (ServerConfig, Option<ConfigError>) {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join("config.toml"));
    match read_config_file(&path).await {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(err) => (ServerConfig::default(), Some(err)),
    }
}
