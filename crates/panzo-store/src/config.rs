//! # Cart Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PANZO_STORAGE_KEY=panzo_cart                                       │
//! │     PANZO_CART_DIR=/var/lib/panzo                                      │
//! │     PANZO_CART_EXPIRATION_HOURS=24                                     │
//! │     PANZO_WHATSAPP_NUMBER=5493442678312                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cart/cart.toml (Linux)                                   │
//! │     ~/Library/Application Support/ar.panzo.cart/cart.toml (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! storage_key = "panzo_cart"
//! expiration_hours = 24
//! storage_dir = "/var/lib/panzo"   # optional
//!
//! [order]
//! whatsapp_number = "5493442678312"
//! greeting = "Hola, te encargo el siguiente pedido:"
//! closing = "Gracias."
//! unit_label = "Unidad"
//! ```

use std::path::PathBuf;

use chrono::Duration;
use directories::ProjectDirs;
use panzo_core::validation::validate_storage_key;
use panzo_core::{OrderConfig, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::storage::FileStorage;

// =============================================================================
// Store Configuration
// =============================================================================

/// Where and how long the cart snapshot is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Durable storage key of the snapshot.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Snapshots older than this are discarded at load.
    /// Default: 24
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: u32,

    /// Directory for the file backend. Platform data dir when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

fn default_storage_key() -> String {
    "panzo_cart".to_string()
}

fn default_expiration_hours() -> u32 {
    24
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            storage_key: default_storage_key(),
            expiration_hours: default_expiration_hours(),
            storage_dir: None,
        }
    }
}

impl StoreConfig {
    /// Expiration window as a duration.
    pub fn expiration(&self) -> Duration {
        Duration::hours(i64::from(self.expiration_hours))
    }

    /// The configured directory, or the platform data directory.
    pub fn resolve_storage_dir(&self) -> ConfigResult<PathBuf> {
        self.storage_dir
            .clone()
            .or_else(FileStorage::default_dir)
            .ok_or(ConfigError::NoDataDir)
    }

    /// Opens the file backend for this configuration.
    pub fn file_storage(&self) -> ConfigResult<FileStorage> {
        self.resolve_storage_dir().map(FileStorage::new)
    }

    fn validate(&self) -> ConfigResult<()> {
        validate_storage_key(&self.storage_key)?;

        if self.expiration_hours == 0 {
            return Err(ValidationError::MustBePositive {
                field: "expiration_hours".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanzoConfig {
    /// Snapshot persistence settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// WhatsApp order export settings.
    #[serde(default)]
    pub order: OrderConfig,
}

impl PanzoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.store.validate()?;
        self.order.validate()?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PANZO_STORAGE_KEY") {
            debug!(storage_key = %key, "Overriding storage key from environment");
            self.store.storage_key = key;
        }

        if let Ok(dir) = std::env::var("PANZO_CART_DIR") {
            debug!(dir = %dir, "Overriding cart directory from environment");
            self.store.storage_dir = Some(PathBuf::from(dir));
        }

        if let Ok(hours) = std::env::var("PANZO_CART_EXPIRATION_HOURS") {
            match hours.parse::<u32>() {
                Ok(h) => self.store.expiration_hours = h,
                Err(_) => warn!(hours = %hours, "Ignoring non-numeric expiration hours"),
            }
        }

        if let Ok(number) = std::env::var("PANZO_WHATSAPP_NUMBER") {
            self.order.whatsapp_number = number;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("ar", "panzo", "cart").map(|dirs| dirs.config_dir().join("cart.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PanzoConfig::default();
        assert_eq!(config.store.storage_key, "panzo_cart");
        assert_eq!(config.store.expiration(), Duration::hours(24));
        assert_eq!(config.order.whatsapp_number, "5493442678312");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PanzoConfig::default();

        config.store.storage_key = "../escape".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.store.storage_key = "panzo_cart".to_string();
        config.store.expiration_hours = 0;
        assert!(config.validate().is_err());

        config.store.expiration_hours = 48;
        config.order.whatsapp_number = "+54 9 344".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: PanzoConfig = toml::from_str(
            r#"
            [store]
            expiration_hours = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.store.expiration_hours, 12);
        assert_eq!(config.store.storage_key, "panzo_cart");
        assert_eq!(config.order, OrderConfig::default());
    }

    #[test]
    fn test_save_then_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf/cart.toml");

        let mut config = PanzoConfig::default();
        config.store.storage_dir = Some(dir.path().join("data"));
        config.order.closing = "Muchas gracias.".to_string();
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[store]"));
        assert!(contents.contains("[order]"));

        let reloaded: PanzoConfig = toml::from_str(&contents).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_resolve_storage_dir_prefers_explicit() {
        let config = StoreConfig {
            storage_dir: Some(PathBuf::from("/tmp/panzo")),
            ..StoreConfig::default()
        };
        assert_eq!(
            config.resolve_storage_dir().unwrap(),
            PathBuf::from("/tmp/panzo")
        );
    }
}
