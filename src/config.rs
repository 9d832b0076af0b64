//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup and handed to every service through
//! `AppState`.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase web API key (identifies the project to Identity Toolkit)
    pub firebase_api_key: String,
    /// Firebase / GCP project ID backing Firestore
    pub firebase_project_id: String,
    /// Origin used to build public share links and allowed by CORS
    pub public_origin: String,
    /// Interface to bind. The session is shared by every client that can
    /// reach the server, so this defaults to loopback.
    pub host: IpAddr,
    /// Server port
    pub port: u16,
    /// File holding persisted UI preferences
    pub preferences_path: PathBuf,
    /// Cloudinary cloud name; inline `data:` URLs are used when unset
    pub cloudinary_cloud_name: Option<String>,
    /// Cloudinary unsigned upload preset
    pub cloudinary_upload_preset: String,
    /// Run against in-memory store and auth instead of Firebase
    pub offline: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let offline = env::var("OFFLINE_MODE")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let firebase_api_key = match env::var("FIREBASE_API_KEY") {
            Ok(key) => key.trim().to_string(),
            Err(_) if offline => String::new(),
            Err(_) => return Err(ConfigError::Missing("FIREBASE_API_KEY")),
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => 8080,
        };

        let host = match env::var("HOST") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("HOST", raw))?,
            Err(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        Ok(Self {
            firebase_api_key,
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .unwrap_or_else(|_| "local-dev".to_string()),
            public_origin: env::var("PUBLIC_ORIGIN")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            host,
            port,
            preferences_path: env::var("PREFERENCES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("firenotes-prefs.json")),
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            cloudinary_upload_preset: env::var("CLOUDINARY_UPLOAD_PRESET")
                .unwrap_or_else(|_| "Image_upload".to_string()),
            offline,
        })
    }

    /// Address the server listens on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Config for tests: offline backends, preferences under the temp dir.
    pub fn test_default() -> Self {
        let unique = format!(
            "firenotes-test-prefs-{}-{}.json",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        );

        Self {
            firebase_api_key: "test-api-key".to_string(),
            firebase_project_id: "test-project".to_string(),
            public_origin: "http://localhost:5173".to_string(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            preferences_path: env::temp_dir().join(unique),
            cloudinary_cloud_name: None,
            cloudinary_upload_preset: "Image_upload".to_string(),
            offline: true,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("FIREBASE_API_KEY", " test-key ");
        env::set_var("PUBLIC_ORIGIN", "https://notes.example.com/");
        env::remove_var("PORT");
        env::remove_var("HOST");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.firebase_api_key, "test-key");
        assert_eq!(config.public_origin, "https://notes.example.com");
        assert_eq!(config.port, 8080);
        assert!(config.host.is_loopback());
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_bind_addr_uses_host() {
        let mut config = Config::test_default();
        assert!(config.bind_addr().ip().is_loopback());

        config.host = "0.0.0.0".parse().unwrap();
        config.port = 9000;
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:9000");
    }

    #[test]
    fn test_default_is_offline() {
        let config = Config::test_default();
        assert!(config.offline);
        assert!(config.cloudinary_cloud_name.is_none());
    }
}
