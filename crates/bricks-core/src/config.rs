//! Provider configuration.
//!
//! The whole top-level table of the configuration document is kept verbatim as
//! [`ProviderMeta`]. [`ProviderSettings`] is a typed view over the keys this crate
//! understands; unknown keys stay in the metadata and are otherwise ignored.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Raw provider metadata, exactly as read from the configuration document.
pub type ProviderMeta = toml::Table;

/// Configuration file looked up relative to the working directory before the XDG one.
pub const LOCAL_CONFIG_PATH: &str = "config/html.toml";

/// What `can_fetch` answers when the crawl policy cannot be retrieved at all
/// (host unreachable, timeout, 5xx, oversized policy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyFallback {
    #[default]
    Deny,
    Allow,
}

impl PolicyFallback {
    pub fn permits(self) -> bool {
        matches!(self, PolicyFallback::Allow)
    }
}

/// Typed settings derived from [`ProviderMeta`]. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Agent name evaluated against crawl policy groups.
    pub policy_agent: String,
    /// `User-Agent` header sent on every request.
    pub http_user_agent: String,
    /// Directory fetched bricks are written to.
    pub download_dir: PathBuf,
    pub connect_timeout_secs: u64,
    /// Total time allowed for a single request, body included.
    pub timeout_secs: u64,
    pub max_redirects: u32,
    /// Crawl policy documents larger than this are treated as unreachable.
    pub max_policy_bytes: u64,
    pub on_policy_unreachable: PolicyFallback,
    /// Extract zip bricks next to the archive when processing them.
    pub extract_archives: bool,
    pub max_archive_entries: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            policy_agent: "*".to_string(),
            http_user_agent: concat!("bricks/", env!("CARGO_PKG_VERSION")).to_string(),
            download_dir: PathBuf::from("bricks"),
            connect_timeout_secs: 15,
            timeout_secs: 300,
            max_redirects: 10,
            max_policy_bytes: 512 * 1024,
            on_policy_unreachable: PolicyFallback::Deny,
            extract_archives: false,
            max_archive_entries: 10_000,
        }
    }
}

impl ProviderSettings {
    /// Reads the known keys out of `meta`. Fails only when a known key has the wrong type.
    pub fn from_meta(meta: &ProviderMeta) -> std::result::Result<Self, toml::de::Error> {
        toml::Value::Table(meta.clone()).try_into()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `~/.config/bricks/config.toml` (or the `$XDG_CONFIG_HOME` equivalent).
pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bricks")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Reads a configuration document into provider metadata.
pub fn load_from(path: &Path) -> Result<ProviderMeta> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let meta: ProviderMeta =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(meta)
}

/// Picks the configuration file: an explicit path wins, then [`LOCAL_CONFIG_PATH`]
/// under `cwd` if it exists, then `fallback`.
pub fn resolve_path(explicit: Option<&Path>, cwd: &Path, fallback: PathBuf) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let local = cwd.join(LOCAL_CONFIG_PATH);
    if local.is_file() {
        return local;
    }
    fallback
}

/// Loads provider metadata, creating a default XDG config file if no file exists.
///
/// An explicitly requested file must exist. Returns the path that was used.
pub fn load_or_init(explicit: Option<&Path>) -> Result<(PathBuf, ProviderMeta)> {
    let cwd = std::env::current_dir()?;
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => resolve_path(None, &cwd, config_path()?),
    };

    if explicit.is_none() && !path.exists() {
        let default_cfg = ProviderSettings::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &toml)?;
        tracing::info!("created default config at {}", path.display());
    }

    let meta = load_from(&path)?;
    Ok((path, meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_values() {
        let s = ProviderSettings::default();
        assert_eq!(s.policy_agent, "*");
        assert_eq!(s.download_dir, PathBuf::from("bricks"));
        assert_eq!(s.on_policy_unreachable, PolicyFallback::Deny);
        assert!(!s.on_policy_unreachable.permits());
        assert!(!s.extract_archives);
        assert_eq!(s.connect_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn empty_meta_gives_defaults() {
        let s = ProviderSettings::from_meta(&ProviderMeta::new()).unwrap();
        assert_eq!(s, ProviderSettings::default());
    }

    #[test]
    fn known_keys_are_read_and_unknown_ignored() {
        let meta: ProviderMeta = toml::from_str(
            r#"
                policy_agent = "bricksbot"
                download_dir = "/srv/bricks"
                on_policy_unreachable = "allow"
                extract_archives = true
                compression = "zip"

                [source]
                base = "https://example.com/data/"
            "#,
        )
        .unwrap();
        let s = ProviderSettings::from_meta(&meta).unwrap();
        assert_eq!(s.policy_agent, "bricksbot");
        assert_eq!(s.download_dir, PathBuf::from("/srv/bricks"));
        assert_eq!(s.on_policy_unreachable, PolicyFallback::Allow);
        assert!(s.extract_archives);
        assert_eq!(s.max_redirects, 10);
    }

    #[test]
    fn wrong_type_for_known_key_is_rejected() {
        let meta: ProviderMeta = toml::from_str("timeout_secs = \"soon\"").unwrap();
        assert!(ProviderSettings::from_meta(&meta).is_err());
    }

    #[test]
    fn settings_toml_roundtrip() {
        let s = ProviderSettings::default();
        let text = toml::to_string_pretty(&s).unwrap();
        let meta: ProviderMeta = toml::from_str(&text).unwrap();
        assert_eq!(ProviderSettings::from_meta(&meta).unwrap(), s);
    }

    #[test]
    fn resolve_prefers_explicit_then_local_then_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("xdg").join("config.toml");

        assert_eq!(resolve_path(None, dir.path(), fallback.clone()), fallback);

        let local = dir.path().join(LOCAL_CONFIG_PATH);
        fs::create_dir_all(local.parent().unwrap()).unwrap();
        fs::write(&local, "policy_agent = \"*\"\n").unwrap();
        assert_eq!(resolve_path(None, dir.path(), fallback.clone()), local);

        let explicit = dir.path().join("other.toml");
        assert_eq!(
            resolve_path(Some(&explicit), dir.path(), fallback),
            explicit
        );
    }

    #[test]
    fn load_from_keeps_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("html.toml");
        fs::write(&path, "format = \"html\"\nretries = 3\n").unwrap();
        let meta = load_from(&path).unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(meta["format"].as_str(), Some("html"));
        assert_eq!(meta["retries"].as_integer(), Some(3));
    }

    #[test]
    fn load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from(&dir.path().join("nope.toml")).is_err());
    }
}
