//! CLI configuration: `marketplace.toml`, `MARKETPLACE_*` variables, flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use marketplace_core::{ClientConfig, FileStorage, MemoryStorage, Platform, SessionStore};
use tracing::{debug, warn};

/// Looked up in the working directory when `--config` is not given.
const DEFAULT_FILE: &str = "marketplace";
const ENV_PREFIX: &str = "MARKETPLACE";

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub platform: Option<Platform>,
    pub base_url: Option<String>,
    pub storage_dir: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
}

/// Load the client configuration.
///
/// An explicit `path` must exist; the default file is optional.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<ClientConfig> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_FILE).required(false),
    };
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .context("reading configuration")?;
    let mut loaded: ClientConfig = settings
        .try_deserialize()
        .context("decoding configuration")?;

    if let Some(platform) = overrides.platform {
        loaded.platform = platform;
    }
    if let Some(base_url) = &overrides.base_url {
        loaded.base_url = Some(base_url.clone());
    }
    if let Some(dir) = &overrides.storage_dir {
        loaded.storage_dir = Some(dir.clone());
    }
    if let Some(timeout_ms) = overrides.timeout_ms {
        loaded.timeout_ms = timeout_ms;
    }
    Ok(loaded)
}

/// The credential cache for `settings`: the configured directory, else the
/// platform data directory, else memory only.
pub fn session_store(settings: &ClientConfig) -> SessionStore {
    let storage = match &settings.storage_dir {
        Some(dir) => Some(FileStorage::new(dir)),
        None => FileStorage::default_location(),
    };
    match storage {
        Some(storage) => {
            debug!(dir = %storage.dir().display(), "credential cache on disk");
            SessionStore::new(storage)
        }
        None => {
            warn!("no data directory available; credentials will not persist");
            SessionStore::new(MemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn file_values_are_read() {
        let file = write_config(
            "platform = \"android\"\ntimeout_ms = 2500\nrequire_jwt_shape = false\n",
        );
        let loaded = load(Some(file.path()), &Overrides::default()).unwrap();
        assert_eq!(loaded.platform, Platform::Android);
        assert_eq!(loaded.timeout_ms, 2500);
        assert!(!loaded.require_jwt_shape);
        assert_eq!(loaded.resolved_base_url(), "http://192.168.0.15:8080/api");
    }

    #[test]
    #[serial]
    fn flags_override_file() {
        let file = write_config("base_url = \"http://file.example/api\"\ntimeout_ms = 1\n");
        let overrides = Overrides {
            base_url: Some("http://flag.example/api/".to_string()),
            timeout_ms: Some(9000),
            ..Overrides::default()
        };
        let loaded = load(Some(file.path()), &overrides).unwrap();
        assert_eq!(loaded.resolved_base_url(), "http://flag.example/api");
        assert_eq!(loaded.timeout_ms, 9000);
    }

    #[test]
    #[serial]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load(Some(&missing), &Overrides::default()).is_err());
    }

    #[test]
    #[serial]
    fn environment_sits_between_file_and_flags() {
        let file = write_config(
            "platform = \"web\"\ntimeout_ms = 1\nrequire_jwt_shape = true\n",
        );
        std::env::set_var("MARKETPLACE_TIMEOUT_MS", "2500");
        std::env::set_var("MARKETPLACE_REQUIRE_JWT_SHAPE", "false");
        std::env::set_var("MARKETPLACE_PLATFORM", "Android");

        let from_env = load(Some(file.path()), &Overrides::default());
        let overrides = Overrides {
            timeout_ms: Some(9000),
            platform: Some(Platform::Ios),
            ..Overrides::default()
        };
        let from_flags = load(Some(file.path()), &overrides);

        std::env::remove_var("MARKETPLACE_TIMEOUT_MS");
        std::env::remove_var("MARKETPLACE_REQUIRE_JWT_SHAPE");
        std::env::remove_var("MARKETPLACE_PLATFORM");

        let from_env = from_env.unwrap();
        assert_eq!(from_env.timeout_ms, 2500);
        assert!(!from_env.require_jwt_shape);
        assert_eq!(from_env.platform, Platform::Android);

        let from_flags = from_flags.unwrap();
        assert_eq!(from_flags.timeout_ms, 9000);
        assert_eq!(from_flags.platform, Platform::Ios);
        assert!(!from_flags.require_jwt_shape);
    }

    #[test]
    fn session_store_uses_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ClientConfig {
            storage_dir: Some(dir.path().to_path_buf()),
            ..ClientConfig::default()
        };
        let store = session_store(&settings);
        store.set_token(Some("a.b.c")).unwrap();

        let reopened = session_store(&settings);
        assert_eq!(reopened.load_session().token.as_deref(), Some("a.b.c"));
    }
}
