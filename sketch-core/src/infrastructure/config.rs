use std::path::PathBuf;

use anyhow::Context;

use crate::data::file_store::FileSketchStore;

pub const DEFAULT_STORE_PATH: &str = "sketch_gallery.json";
/// Same budget browsers give a LocalStorage origin.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store_path: PathBuf,
    /// `None` disables the size check.
    pub store_quota_bytes: Option<usize>,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            store_quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            log_json: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `SKETCH_STORE_PATH`, `SKETCH_STORE_QUOTA_BYTES` (0 means no
    /// limit) and `SKETCH_LOG_JSON` through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let store_path = lookup("SKETCH_STORE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);

        let store_quota_bytes = match lookup("SKETCH_STORE_QUOTA_BYTES") {
            Some(raw) => {
                let quota: usize = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid SKETCH_STORE_QUOTA_BYTES: {raw:?}"))?;
                (quota > 0).then_some(quota)
            }
            None => defaults.store_quota_bytes,
        };

        let log_json = match lookup("SKETCH_LOG_JSON") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow::anyhow!("invalid SKETCH_LOG_JSON: {raw:?}"))?,
            None => defaults.log_json,
        };

        Ok(Self {
            store_path,
            store_quota_bytes,
            log_json,
        })
    }

    pub fn open_store(&self) -> FileSketchStore {
        FileSketchStore::new(&self.store_path).with_quota(self.store_quota_bytes)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SKETCH_STORE_PATH", "/tmp/gallery.json"),
            ("SKETCH_STORE_QUOTA_BYTES", "1024"),
            ("SKETCH_LOG_JSON", "true"),
        ]))
        .unwrap();

        assert_eq!(config.store_path, PathBuf::from("/tmp/gallery.json"));
        assert_eq!(config.store_quota_bytes, Some(1024));
        assert!(config.log_json);
    }

    #[test]
    fn zero_quota_disables_the_limit() {
        let config =
            AppConfig::from_lookup(lookup(&[("SKETCH_STORE_QUOTA_BYTES", "0")])).unwrap();
        assert_eq!(config.store_quota_bytes, None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("SKETCH_STORE_QUOTA_BYTES", "lots")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("SKETCH_LOG_JSON", "maybe")])).is_err());
    }
}
