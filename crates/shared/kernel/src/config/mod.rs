use config::{Config, Environment, File};
use encore_domain::constants::ENV_PREFIX;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default base name of the configuration file (`server.toml`, `server.json`, ...).
pub const DEFAULT_CONFIG_FILE: &str = "server";

/// Custom error type for config loading.
#[encore_derive::encore_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Layered configuration loader.
///
/// 1. **Base File**: an explicitly given file is required; without a path the optional
///    [`DEFAULT_CONFIG_FILE`] in the working directory is used when present.
/// 2. **Environment Overrides**: variables prefixed with `ENCORE__`, nested keys separated by
///    double underscores (`ENCORE__DATABASE__URL` maps to `database.url`).
///
/// # Errors
/// * An explicitly given configuration file cannot be found or parsed.
/// * The merged values do not match the structure of `T`.
///
/// # Example
/// ```rust
/// use encore_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    info!(path = %effective_path.display(), required, "Loading configuration");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_domain::config::ApiConfig;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial]
    fn reads_file_values() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("catalog.toml");
        fs::write(
            &file,
            "[server]\nport = 9100\n\n[database]\nurl = \"mem://\"\nnamespace = \"shop\"\n",
        )
        .expect("write config");

        let cfg: ApiConfig = load_config(Some(&file)).expect("config loads");
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.database.namespace, "shop");
        assert_eq!(cfg.database.database, "catalog", "missing keys keep defaults");
    }

    #[test]
    #[serial]
    fn missing_explicit_file_is_an_error() {
        let result: Result<ApiConfig, _> = load_config(Some("does/not/exist.toml"));
        assert!(matches!(result, Err(ConfigError::Config { .. })));
    }

    #[test]
    #[serial]
    fn missing_default_file_falls_back_to_defaults() {
        let cfg: ApiConfig = load_config(None::<&str>).expect("defaults load");
        assert_eq!(cfg.server.port, 4583);
    }
}
