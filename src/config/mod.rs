// src/config/mod.rs
//! Application config.
//!
//! Load order:
//! 1) $MOSAICBEAT_CONFIG_PATH (must exist when set)
//! 2) config/mosaicbeat.toml
//! 3) config/mosaicbeat.json
//! 4) built-in defaults
//!
//! Environment overrides are applied last: SUPABASE_URL, SUPABASE_ANON_KEY,
//! MOSAICBEAT_PAGE_SIZE.

pub mod store;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use store::{FeedConfig, StoreConfig, MAX_PAGE_SIZE};

pub const ENV_CONFIG_PATH: &str = "MOSAICBEAT_CONFIG_PATH";
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_PAGE_SIZE: &str = "MOSAICBEAT_PAGE_SIZE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Load from an explicit path. TOML or JSON, picked by extension.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let cfg: AppConfig = match ext.as_str() {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("parsing JSON config {}", path.display()))?,
        _ => toml::from_str(&content)
            .with_context(|| format!("parsing TOML config {}", path.display()))?,
    };
    finish(cfg)
}

/// Load using env var + fallbacks (see module docs).
pub fn load_default() -> Result<AppConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    for candidate in ["config/mosaicbeat.toml", "config/mosaicbeat.json"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return load_from(&p);
        }
    }
    finish(AppConfig::default())
}

fn finish(mut cfg: AppConfig) -> Result<AppConfig> {
    apply_env_overrides(&mut cfg)?;
    sanitize(&mut cfg);
    Ok(cfg)
}

fn apply_env_overrides(cfg: &mut AppConfig) -> Result<()> {
    if let Some(url) = non_empty_env(ENV_SUPABASE_URL) {
        cfg.store.supabase_url = Some(url);
    }

    // Resolve api key if "ENV"
    let wants_env = cfg
        .store
        .anon_key
        .as_deref()
        .is_some_and(|k| k.trim().eq_ignore_ascii_case("env"));
    match non_empty_env(ENV_SUPABASE_ANON_KEY) {
        Some(key) => cfg.store.anon_key = Some(key),
        None if wants_env => {
            return Err(anyhow!("Missing {ENV_SUPABASE_ANON_KEY} env var"));
        }
        None => {}
    }

    if let Some(raw) = non_empty_env(ENV_PAGE_SIZE) {
        cfg.feed.page_size = raw
            .trim()
            .parse()
            .with_context(|| format!("{ENV_PAGE_SIZE} must be a positive integer, got '{raw}'"))?;
    }
    Ok(())
}

fn sanitize(cfg: &mut AppConfig) {
    cfg.feed.page_size = cfg.feed.page_size.clamp(1, MAX_PAGE_SIZE);
    for slot in [&mut cfg.store.supabase_url, &mut cfg.store.anon_key] {
        if slot.as_deref().is_some_and(|s| s.trim().is_empty()) {
            *slot = None;
        }
    }
    if cfg.store.timeout_secs == 0 {
        cfg.store.timeout_secs = StoreConfig::default().timeout_secs;
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let mut cfg = AppConfig::default();
        sanitize(&mut cfg);
        assert_eq!(cfg.feed.page_size, 20);
        assert_eq!(cfg.store.topics_table, "topics");
        assert!(!cfg.store.is_configured());
    }

    #[test]
    fn sanitize_clamps_and_blanks() {
        let mut cfg = AppConfig::default();
        cfg.feed.page_size = 10_000;
        cfg.store.supabase_url = Some("  ".into());
        cfg.store.timeout_secs = 0;
        sanitize(&mut cfg);
        assert_eq!(cfg.feed.page_size, MAX_PAGE_SIZE);
        assert!(cfg.store.supabase_url.is_none());
        assert_eq!(cfg.store.timeout_secs, 10);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
[store]
supabase_url = "https://demo.supabase.co"
"#,
        )
        .unwrap();
        assert_eq!(cfg.store.articles_table, "articles");
        assert_eq!(cfg.feed.page_size, 20);
    }
}
