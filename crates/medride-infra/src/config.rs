//! Configuration loader for MedRide.
//!
//! Reads `config.toml` from the data directory (`~/.medride/` in production)
//! and deserializes it into [`RegistryConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use medride_core::service::highlight::MIN_HIGHLIGHT_TTL;
use medride_types::config::RegistryConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MEDRIDE_DATA_DIR";

/// Resolve the data directory.
///
/// `$MEDRIDE_DATA_DIR`, else `~/.medride`, else `./.medride`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".medride");
    }

    PathBuf::from(".medride")
}

/// Load registry configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`RegistryConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config with the highlight TTL floor applied.
pub async fn load_config(data_dir: &Path) -> RegistryConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RegistryConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RegistryConfig::default();
        }
    };

    match toml::from_str::<RegistryConfig>(&content) {
        Ok(config) => normalize(config),
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RegistryConfig::default()
        }
    }
}

fn normalize(mut config: RegistryConfig) -> RegistryConfig {
    let floor = MIN_HIGHLIGHT_TTL.as_millis() as u64;
    if config.highlight_ttl_ms < floor {
        tracing::warn!(
            configured = config.highlight_ttl_ms,
            floor,
            "highlight_ttl_ms below minimum, clamping"
        );
        config.highlight_ttl_ms = floor;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use medride_types::config::TransitionPolicy;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config, RegistryConfig::default());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
highlight_ttl_ms = 1500
transition_policy = "strict"
number_prefix = "TRX"
number_start = 100

[locale]
time_format = "%I:%M %p"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.highlight_ttl_ms, 1_500);
        assert_eq!(config.transition_policy, TransitionPolicy::Strict);
        assert_eq!(config.number_prefix, "TRX");
        assert_eq!(config.number_start, 100);
        assert_eq!(config.locale.time_format, "%I:%M %p");
        assert_eq!(config.locale.date_format, "%d/%m/%Y");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config, RegistryConfig::default());
    }

    #[tokio::test]
    async fn load_config_clamps_tiny_ttl() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "highlight_ttl_ms = 5")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.highlight_ttl_ms, 100);
    }
}
