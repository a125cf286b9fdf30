//! Builder configuration loading and lookup

use crate::constants::{defaults, keys, CONFIG_FILENAMES};
use crate::error::{Error, Result};
use crate::ext::PathExt;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Configuration of the site builder, as seen by the renderer.
///
/// Values are kept as a JSON tree and addressed with dotted keys such as
/// `date.format`.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    root: PathBuf,
    values: Value,
}

impl BuilderConfig {
    /// Wraps a configuration tree as-is, without defaults.
    pub fn new(values: Value) -> Self {
        Self { root: PathBuf::from("."), values }
    }

    /// Wraps a configuration tree merged over [`BuilderConfig::default_values`].
    pub fn with_defaults(values: Value) -> Self {
        let mut merged = Self::default_values();
        merge(&mut merged, values);
        Self::new(merged)
    }

    /// Sets the site root that relative paths (e.g. `translations.dir`) resolve against.
    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }

    pub fn default_values() -> Value {
        json!({
            "date": {
                "format": defaults::DATE_FORMAT,
                "timezone": defaults::DATE_TIMEZONE,
            },
            "baseurl": defaults::BASEURL,
            "language": defaults::LANGUAGE,
            "translations": {
                "dir": defaults::TRANSLATIONS_DIR,
            },
        })
    }

    /// Loads the first configuration file found in `site_root`, merged over defaults.
    pub fn load<P: AsRef<Path>>(site_root: P) -> Result<Self> {
        let site_root = site_root.as_ref();
        let site_dir = site_root.to_str_checked()?.to_string();

        for config_file_name in CONFIG_FILENAMES.iter() {
            let config_file_path = site_root.join(config_file_name);

            if config_file_path.exists() {
                log::debug!("Loading configuration from {}", config_file_path.display());
                let content = std::fs::read_to_string(&config_file_path)?;
                let values: Value = if config_file_name.ends_with(".json") {
                    serde_json::from_str(&content)?
                } else {
                    serde_yaml::from_str(&content)?
                };

                return Ok(Self::with_defaults(values).with_root(site_root));
            }
        }

        Err(Error::ConfigNotFound { site_dir, config_files: CONFIG_FILENAMES.join(", ") })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Looks up a dotted key, e.g. `date.timezone`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        key.split('.').try_fold(&self.values, |node, part| node.get(part))
    }

    /// Looks up a dotted key that must hold a string.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        match self.get(key) {
            Some(Value::String(value)) => Ok(value),
            Some(other) => Err(Error::ConfigurationError(format!(
                "'{key}' must be a string, got {other}"
            ))),
            None => Err(Error::ConfigurationError(format!("'{key}' is not set"))),
        }
    }

    /// Like [`BuilderConfig::get_str`], falling back to `default` when absent.
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    pub fn date_format(&self) -> Result<&str> {
        self.get_str(keys::DATE_FORMAT)
    }

    pub fn date_timezone(&self) -> Result<&str> {
        self.get_str(keys::DATE_TIMEZONE)
    }

    pub fn baseurl(&self) -> &str {
        self.get_str_or(keys::BASEURL, defaults::BASEURL)
    }

    pub fn language(&self) -> &str {
        self.get_str_or(keys::LANGUAGE, defaults::LANGUAGE)
    }

    pub fn translations_dir(&self) -> PathBuf {
        self.root.join(self.get_str_or(keys::TRANSLATIONS_DIR, defaults::TRANSLATIONS_DIR))
    }
}

/// Deep-merges `overlay` into `base`; objects merge key by key, anything else replaces.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}
