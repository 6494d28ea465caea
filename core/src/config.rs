//! Client configuration: runtime target, base URL, timeout, token policy.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const LOCALHOST_API: &str = "http://localhost:8080/api";
const LAN_API: &str = "http://192.168.0.15:8080/api";

/// Runtime target the client is embedded in.
///
/// Names are case-insensitive wherever they are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Platform {
    #[default]
    Web,
    Android,
    Ios,
    /// A physical phone on the local network.
    Device,
}

impl Platform {
    /// Base URL used when the configuration does not name one.
    ///
    /// The iOS simulator shares the host's loopback; Android and physical
    /// devices reach the development machine over the LAN.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Platform::Web | Platform::Ios => LOCALHOST_API,
            Platform::Android | Platform::Device => LAN_API,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Web => "web",
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Device => "device",
        };
        f.write_str(name)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "web" => Ok(Platform::Web),
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            "device" => Ok(Platform::Device),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub platform: Platform,
    /// Overrides the platform default when set.
    pub base_url: Option<String>,
    pub timeout_ms: u64,
    /// Only attach tokens that look like a JWT.
    pub require_jwt_shape: bool,
    /// Where the credential cache persists; platform data dir when unset.
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            base_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            require_jwt_shape: true,
            storage_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    pub fn resolved_base_url(&self) -> String {
        let url = self
            .base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.platform.default_base_url());
        url.trim().trim_end_matches('/').to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_defaults() {
        assert_eq!(
            ClientConfig::for_platform(Platform::Web).resolved_base_url(),
            "http://localhost:8080/api"
        );
        assert_eq!(
            ClientConfig::for_platform(Platform::Ios).resolved_base_url(),
            "http://localhost:8080/api"
        );
        assert_eq!(
            ClientConfig::for_platform(Platform::Android).resolved_base_url(),
            "http://192.168.0.15:8080/api"
        );
        assert_eq!(
            ClientConfig::for_platform(Platform::Device).resolved_base_url(),
            "http://192.168.0.15:8080/api"
        );
    }

    #[test]
    fn explicit_base_url_wins_and_loses_trailing_slash() {
        let config = ClientConfig {
            platform: Platform::Android,
            base_url: Some("https://admin.example.com/api/".to_string()),
            ..ClientConfig::default()
        };
        assert_eq!(config.resolved_base_url(), "https://admin.example.com/api");
    }

    #[test]
    fn blank_base_url_falls_back_to_platform() {
        let config = ClientConfig {
            base_url: Some("  ".to_string()),
            ..ClientConfig::default()
        };
        assert_eq!(config.resolved_base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"platform":"ios"}"#).unwrap();
        assert_eq!(config.platform, Platform::Ios);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.require_jwt_shape);
    }

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("Android".parse::<Platform>().unwrap(), Platform::Android);
        assert!("symbian".parse::<Platform>().is_err());
    }

    #[test]
    fn deserialized_platform_ignores_case() {
        let config: ClientConfig = serde_json::from_str(r#"{"platform":"Android"}"#).unwrap();
        assert_eq!(config.platform, Platform::Android);
        assert!(serde_json::from_str::<ClientConfig>(r#"{"platform":"symbian"}"#).is_err());
        assert_eq!(serde_json::to_value(Platform::Ios).unwrap(), "ios");
    }
}
