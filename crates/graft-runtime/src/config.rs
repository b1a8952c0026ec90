//! Configuration loading using figment.
//!
//! [`ManagerConfig`] is an explicit, typed settings struct: every key is a
//! named field with a named applier, no key list is walked reflectively.
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. Main config file (`graft.toml`, with the `toml-config` feature)
//! 3. Environment variables (`GRAFT_*`)
//!
//! Environment variables map with the `GRAFT_` prefix, e.g.
//! `GRAFT_LOAD_FROM=assets/components` → `load_from = "assets/components"`.
//!
//! Values also arrive as compact attribute payloads (the same form component
//! options use); [`ManagerConfig::from_option_string`] parses those.
//!
//! # Example
//!
//! ```rust,ignore
//! use graft_runtime::config::ManagerConfig;
//!
//! let config = ManagerConfig::load()?;
//! let manager = MountManager::new(tree, source, config.settings());
//! ```

use std::collections::HashSet;

use figment::Figment;
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use graft_core::options;
use graft_framework::MountSettings;

use crate::error::{ConfigError, ConfigResult};

/// Default config file name searched in the working directory.
#[cfg(feature = "toml-config")]
const CONFIG_FILE: &str = "graft.toml";

/// Settings the mount engine runs with.
///
/// The attribute-name fields (`mount_point`, `id_property`) are stored in
/// their normalized `data-` form; the setters apply the normalization, and
/// [`load`](Self::load) / [`from_option_string`](Self::from_option_string)
/// normalize whatever the sources provided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Load-path prefix joined onto every component name.
    #[serde(default)]
    pub load_from: String,

    /// Whether log output is emitted at all.
    #[serde(default = "default_logging_enabled")]
    pub logging_enabled: bool,

    /// Component names that must never be instantiated.
    #[serde(default)]
    pub disabled_components: Vec<String>,

    /// Base location passed through to the component source.
    #[serde(default)]
    pub base_url: String,

    /// The declaration attribute.
    #[serde(default = "default_mount_point")]
    pub mount_point: String,

    /// The attribute node identities are stored under.
    #[serde(default = "default_id_property")]
    pub id_property: String,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_mount_point() -> String {
    "mount".to_string()
}

fn default_id_property() -> String {
    "mid".to_string()
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            load_from: String::new(),
            logging_enabled: default_logging_enabled(),
            disabled_components: Vec::new(),
            base_url: String::new(),
            mount_point: default_mount_point(),
            id_property: default_id_property(),
        }
        .normalized()
    }
}

impl ManagerConfig {
    // ─── Loading ─────────────────────────────────────────────────────────────

    /// Loads the configuration from the default sources.
    pub fn load() -> ConfigResult<Self> {
        Self::from_figment(Self::figment())
    }

    /// The default figment layering: defaults, config file, environment.
    pub fn figment() -> Figment {
        #[allow(unused_mut)]
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        #[cfg(feature = "toml-config")]
        {
            figment = figment.merge(Toml::file(CONFIG_FILE));
        }
        trace!("Loading environment variables with GRAFT_ prefix");
        figment.merge(Env::prefixed("GRAFT_"))
    }

    /// Extracts and normalizes a configuration from `figment`.
    pub fn from_figment(figment: Figment) -> ConfigResult<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::ParseError(format!("Failed to extract configuration: {e}")))?;
        let config = config.normalized();
        debug!(
            mount_point = %config.mount_point,
            load_from = %config.load_from,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parses a compact attribute payload (the component option-string form)
    /// into a configuration. Unknown keys are logged and ignored; a
    /// malformed payload yields the defaults.
    pub fn from_option_string(raw: &str) -> Self {
        let mut config = Self::default();
        for (key, value) in options::parse(raw) {
            config.apply(&key, &value);
        }
        config
    }

    fn apply(&mut self, key: &str, value: &Value) {
        match key {
            "load_from" => {
                if let Some(v) = value.as_str() {
                    self.set_load_from(v);
                }
            }
            "logging_enabled" => {
                if let Some(v) = value.as_bool() {
                    self.logging_enabled = v;
                }
            }
            "disabled_components" => {
                if let Some(items) = value.as_array() {
                    self.disabled_components = items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect();
                }
            }
            "base_url" => {
                if let Some(v) = value.as_str() {
                    self.base_url = v.to_string();
                }
            }
            "mount_point" => {
                if let Some(v) = value.as_str() {
                    self.set_mount_point(v);
                }
            }
            "id_property" => {
                if let Some(v) = value.as_str() {
                    self.set_id_property(v);
                }
            }
            other => {
                warn!(key = other, "Ignoring unknown configuration key");
            }
        }
    }

    // ─── Appliers ────────────────────────────────────────────────────────────

    /// Sets the load-path prefix, stripping trailing slashes.
    pub fn set_load_from(&mut self, value: &str) {
        self.load_from = value.trim_end_matches('/').to_string();
    }

    /// Sets the declaration attribute, prefixing `data-` when missing.
    pub fn set_mount_point(&mut self, value: &str) {
        self.mount_point = data_attribute(value);
    }

    /// Sets the identity attribute, prefixing `data-` when missing.
    pub fn set_id_property(&mut self, value: &str) {
        self.id_property = data_attribute(value);
    }

    /// Re-runs every applier over the current values. Required after
    /// deserialization, which bypasses the setters.
    fn normalized(mut self) -> Self {
        self.load_from = self.load_from.trim_end_matches('/').to_string();
        self.mount_point = data_attribute(&self.mount_point);
        self.id_property = data_attribute(&self.id_property);
        self
    }

    // ─── Conversion ──────────────────────────────────────────────────────────

    /// Derives the mount settings the framework layer consumes.
    pub fn settings(&self) -> MountSettings {
        MountSettings {
            mount_point: self.mount_point.clone(),
            id_property: self.id_property.clone(),
            load_from: self.load_from.clone(),
            disabled: self
                .disabled_components
                .iter()
                .map(|name| name.trim().to_string())
                .collect::<HashSet<_>>(),
        }
    }
}

fn data_attribute(name: &str) -> String {
    if name.starts_with("data-") {
        name.to_string()
    } else {
        format!("data-{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_normalized_attribute_names() {
        let config = ManagerConfig::default();
        assert_eq!(config.mount_point, "data-mount");
        assert_eq!(config.id_property, "data-mid");
        assert!(config.logging_enabled);
        assert!(config.load_from.is_empty());
    }

    #[test]
    fn load_from_applier_strips_trailing_slashes() {
        let mut config = ManagerConfig::default();
        config.set_load_from("assets/components///");
        assert_eq!(config.load_from, "assets/components");
    }

    #[test]
    fn attribute_appliers_are_idempotent() {
        let mut config = ManagerConfig::default();
        config.set_mount_point("widgets");
        assert_eq!(config.mount_point, "data-widgets");
        config.set_mount_point("data-widgets");
        assert_eq!(config.mount_point, "data-widgets");
    }

    #[test]
    fn option_string_payloads_are_applied_and_normalized() {
        let config = ManagerConfig::from_option_string(
            "'load_from': 'assets/', 'mount_point': 'widgets', 'logging_enabled': false",
        );
        assert_eq!(config.load_from, "assets");
        assert_eq!(config.mount_point, "data-widgets");
        assert!(!config.logging_enabled);
        // Untouched keys keep their defaults.
        assert_eq!(config.id_property, "data-mid");
    }

    #[test]
    fn unknown_option_keys_are_ignored() {
        let config = ManagerConfig::from_option_string("'no_such_key': 1");
        assert_eq!(config.mount_point, "data-mount");
    }

    #[test]
    fn settings_trim_disabled_names() {
        let mut config = ManagerConfig::default();
        config.disabled_components = vec![" hider ".to_string(), "tabs".to_string()];
        let settings = config.settings();
        assert!(settings.disabled.contains("hider"));
        assert!(settings.disabled.contains("tabs"));
    }

    #[test]
    fn environment_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("GRAFT_MOUNT_POINT", "plugin");
            jail.set_env("GRAFT_LOAD_FROM", "cdn/components/");
            let config = ManagerConfig::from_figment(ManagerConfig::figment())
                .expect("config extracts");
            assert_eq!(config.mount_point, "data-plugin");
            assert_eq!(config.load_from, "cdn/components");
            Ok(())
        });
    }
}
