//! Data directory layout for Fixit.

use std::path::{Path, PathBuf};

use fixit_types::config::ServerConfig;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `FIXIT_DATA_DIR` environment variable
/// 2. `~/.fixit`
/// 3. `.fixit` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FIXIT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".fixit");
    }

    PathBuf::from(".fixit")
}

/// Path of the SQLite database file. Absolute `database_file` values are used as-is.
pub fn database_path(data_dir: &Path, config: &ServerConfig) -> PathBuf {
    data_dir.join(&config.database_file)
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_relative_and_absolute() {
        let data_dir = PathBuf::from("/home/user/.fixit");
        let mut config = ServerConfig::default();
        assert_eq!(
            database_path(&data_dir, &config),
            PathBuf::from("/home/user/.fixit/fixit.db")
        );

        config.database_file = "/var/lib/fixit/chat.db".to_string();
        assert_eq!(
            database_path(&data_dir, &config),
            PathBuf::from("/var/lib/fixit/chat.db")
        );
    }

    #[tokio::test]
    async fn test_ensure_data_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_data_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        ensure_data_dir(&nested).await.unwrap();
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("FIXIT_DATA_DIR", "/tmp/test-fixit");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-fixit"));
        unsafe {
            std::env::remove_var("FIXIT_DATA_DIR");
        }
    }
}
