use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Media library configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directory scanned for files to be tagged.
    #[serde(default = "default_video_dir")]
    pub video_dir: PathBuf,
    /// The durable artifact holding the whole catalog.
    #[serde(default = "default_backup_path")]
    pub backup_path: PathBuf,
    /// How often the catalog is flushed to disk when dirty (seconds).
    #[serde(default = "default_save_interval")]
    pub save_interval_secs: u64,
    /// Static assets served under `/static/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl LibraryConfig {
    pub fn save_interval(&self) -> Duration {
        Duration::from_secs(self.save_interval_secs)
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            video_dir: default_video_dir(),
            backup_path: default_backup_path(),
            save_interval_secs: default_save_interval(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_video_dir() -> PathBuf {
    PathBuf::from("video")
}

fn default_backup_path() -> PathBuf {
    PathBuf::from("tagr.json")
}

fn default_save_interval() -> u64 {
    300 // 5 minutes
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_default_server() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
    }

    #[test]
    fn test_deserialize_with_default_library() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.library.video_dir.to_str().unwrap(), "video");
        assert_eq!(config.library.backup_path.to_str().unwrap(), "tagr.json");
        assert_eq!(config.library.save_interval(), Duration::from_secs(300));
        assert_eq!(config.library.static_dir.to_str().unwrap(), "static");
    }

    #[test]
    fn test_deserialize_partial_library() {
        let toml = r#"
[library]
video_dir = "/mnt/media"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.library.video_dir.to_str().unwrap(), "/mnt/media");
        assert_eq!(config.library.backup_path.to_str().unwrap(), "tagr.json");
        assert_eq!(config.library.save_interval_secs, 300);
    }

    #[test]
    fn test_config_serializes_for_status() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["server"]["port"], 8080);
        assert_eq!(json["library"]["video_dir"], "video");
    }
}
