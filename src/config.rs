use serde::{Deserialize, Serialize};
use anyhow::{Result, Context};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "DOJO";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allow_any_origin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives. `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            cors_allow_any_origin: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: Config::base_dir().join("players"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "dojo_clicker=debug,info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file (if present), then `DOJO_*` environment
    /// variables, e.g. `DOJO_SERVER__PORT=9000`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        let defaults = ::config::Config::try_from(&Config::default())
            .context("Failed to build default config")?;

        let layered = ::config::Config::builder()
            .add_source(defaults)
            .add_source(::config::File::from(config_path.clone()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config from {:?}", config_path))?;

        let config: Config = layered
            .try_deserialize()
            .context("Failed to parse config")?;

        Ok(config)
    }

    pub fn base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dojo-clicker")
    }

    pub fn config_path() -> PathBuf {
        Self::base_dir().join("config.toml")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .context("Failed to create config directory")?;
        }

        fs::write(path, config_str)
            .context("Failed to write config file")?;

        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!("Invalid listen address {}:{}", self.server.host, self.server.port)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8001);
        assert!(config.server.cors_allow_any_origin);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.storage.data_dir.ends_with(".dojo-clicker/players"));
        assert_eq!(config.bind_addr().unwrap().port(), 8001);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.filter, "dojo_clicker=debug,info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[server]\nport = 9100\n\n[storage]\nbackend = \"memory\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\ncors_allow_any_origin = true\n").unwrap();

        // Only this test touches this key, so parallel loads are unaffected.
        std::env::set_var("DOJO_SERVER__CORS_ALLOW_ANY_ORIGIN", "false");
        let from_file = Config::load(Some(&path));
        let from_defaults = Config::load(Some(&dir.path().join("absent.toml")));
        std::env::remove_var("DOJO_SERVER__CORS_ALLOW_ANY_ORIGIN");

        assert!(!from_file.unwrap().server.cors_allow_any_origin);
        assert!(!from_defaults.unwrap().server.cors_allow_any_origin);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.server.port = 7007;
        config.storage.data_dir = dir.path().join("players");
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.server.port, 7007);
        assert_eq!(loaded.storage.data_dir, dir.path().join("players"));
    }

    #[test]
    fn test_bad_host_is_reported() {
        let mut config = Config::default();
        config.server.host = "not a host".to_string();
        assert!(config.bind_addr().is_err());
    }
}
