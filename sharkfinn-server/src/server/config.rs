use serde::Deserialize;
use std::{fs, io::ErrorKind, path::Path, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file. Absent or empty => static mode.
    pub database_url: Option<String>,
    pub listen_port: Option<u16>,
    /// Pre-built frontend bundle; `index.html` is the SPA shell.
    pub static_dir: PathBuf,
    /// Restrict CORS to this origin. Unset => any origin.
    pub cors_origin: Option<String>,
    pub pool_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            listen_port: None,
            static_dir: PathBuf::from("public"),
            cors_origin: None,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Yaml(e) => write!(f, "YAML error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        ConfigError::Yaml(value)
    }
}

impl AppConfig {
    /// Reads a YAML config file. A missing file yields the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: AppConfig = serde_yaml::from_str(&text)?;
        Ok(cfg)
    }

    /// The configured database URL, treating an empty string as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn port(&self) -> u16 {
        self.listen_port.unwrap_or(DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from_path(dir.path().join("nope.yaml")).unwrap();
        assert!(cfg.database_url().is_none());
        assert_eq!(cfg.port(), DEFAULT_PORT);
        assert_eq!(cfg.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "database_url: data/app.db\nlisten_port: 9000").unwrap();
        let cfg = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(cfg.database_url(), Some("data/app.db"));
        assert_eq!(cfg.port(), 9000);
        assert_eq!(cfg.pool_size, DEFAULT_POOL_SIZE);
    }

    #[test]
    fn blank_database_url_means_static_mode() {
        let cfg = AppConfig {
            database_url: Some("  ".into()),
            ..Default::default()
        };
        assert!(cfg.database_url().is_none());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "listen_port: [not, a, port]").unwrap();
        assert!(matches!(
            AppConfig::load_from_path(&path),
            Err(ConfigError::Yaml(_))
        ));
    }
}
