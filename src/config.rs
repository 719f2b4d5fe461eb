use std::{
    fs::{self, read_to_string},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::AppError;

const DEFAULT_MUSIC_DIR: &str = "assets/music";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Where this config was loaded from, used by [`AppConfig::save`].
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

/// Connection parameters of the remote media server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RemoteConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub library_id: String,
    /// Skip TLS certificate verification. Only meant for self-signed servers on
    /// a local network.
    #[serde(default)]
    pub insecure: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_music_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MUSIC_DIR)
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            music_dir: default_music_dir(),
            remote: RemoteConfig::default(),
            path: None,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            user_id: String::new(),
            api_key: String::new(),
            library_id: String::new(),
            insecure: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Loads the config from `path`, or from the default location inside the
    /// user's config directory. A missing file at the default location yields
    /// the defaults, a missing file at an explicit path is an error.
    pub fn load<T>(path: Option<T>) -> Result<Self, AppError>
    where
        T: Into<PathBuf>,
    {
        let (path, explicit) = match path {
            Some(path) => (path.into(), true),
            None => (Self::default_path()?, false),
        };

        if !explicit && !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self {
                path: Some(path),
                ..Self::default()
            });
        }

        let config = read_to_string(&path)?;
        let mut config: Self = toml::from_str(&config)?;
        config.path = Some(path);
        Ok(config)
    }

    pub fn default_path() -> Result<PathBuf, AppError> {
        Ok(dirs::config_dir()
            .ok_or(AppError::NoConfig)?
            .join("pipod")
            .join("config.toml"))
    }

    /// Writes the config back to where it was loaded from.
    pub fn save(&self) -> Result<(), AppError> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => Self::default_path()?,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        log::debug!("saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.music_dir, PathBuf::from(DEFAULT_MUSIC_DIR));
        assert!(!config.remote.insecure);
        assert_eq!(config.remote.timeout_secs, 10);
        assert_eq!(config.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn reads_remote_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
music-dir = "/srv/music"

[remote]
url = "https://media.local:8920"
user-id = "u1"
api-key = "k"
insecure = true
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.music_dir, PathBuf::from("/srv/music"));
        assert_eq!(config.remote.url, "https://media.local:8920");
        assert_eq!(config.remote.user_id, "u1");
        assert_eq!(config.remote.api_key, "k");
        assert!(config.remote.library_id.is_empty());
        assert!(config.remote.insecure);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(AppError::Io(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig {
            path: Some(path.clone()),
            ..AppConfig::default()
        };
        config.remote.url = "http://host:8096".to_string();
        config.remote.user_id = "u1".to_string();
        config.save().unwrap();

        let loaded = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }
}
