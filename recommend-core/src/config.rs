use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::render::RenderOptions;

/// Port the recommendation server listens on when run locally.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIGURE_HINT: &str = "Hint: run `recommend configure` and enter a URL such as";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "http://localhost:8000"
/// timeout_secs = 30
/// placeholder_image = "/static/no-image.png"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server root; `/recommend` is appended.
    pub base_url: Option<String>,

    /// Request timeout; missing or zero means the default.
    pub timeout_secs: Option<u64>,

    /// Image used when a product thumbnail is missing or fails to load.
    pub placeholder_image: Option<String>,
}

impl Config {
    /// Full URL of the `/recommend` endpoint.
    pub fn endpoint_url(&self) -> Result<Url> {
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        endpoint_from_base(base)
    }

    pub fn timeout(&self) -> Duration {
        let secs = self
            .timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn render_options(&self) -> RenderOptions {
        match &self.placeholder_image {
            Some(image) => RenderOptions {
                placeholder_image: image.clone(),
            },
            None => RenderOptions::default(),
        }
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        let base_url = base_url.into();
        endpoint_from_base(&base_url)?;
        self.base_url = Some(base_url);
        Ok(())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "recommend", "recommend-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn endpoint_from_base(base: &str) -> Result<Url> {
    let mut base = Url::parse(base).with_context(|| {
        format!("Invalid base URL '{base}'.\n{CONFIGURE_HINT} {DEFAULT_BASE_URL}.")
    })?;

    if base.cannot_be_a_base() {
        return Err(anyhow!(
            "Base URL '{base}' cannot hold a path.\n{CONFIGURE_HINT} {DEFAULT_BASE_URL}."
        ));
    }

    // Url::join drops the last segment unless the path ends in '/'.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join("recommend")
        .context("Failed to build /recommend endpoint URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_points_at_local_server() {
        let cfg = Config::default();
        let url = cfg.endpoint_url().expect("default must parse");
        assert_eq!(url.as_str(), "http://localhost:8000/recommend");
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let mut cfg = Config::default();
        cfg.set_base_url("https://example.com/api").unwrap();
        assert_eq!(
            cfg.endpoint_url().unwrap().as_str(),
            "https://example.com/api/recommend"
        );

        cfg.set_base_url("https://example.com/api/").unwrap();
        assert_eq!(
            cfg.endpoint_url().unwrap().as_str(),
            "https://example.com/api/recommend"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected_with_hint() {
        let mut cfg = Config::default();
        let err = cfg.set_base_url("not a url").unwrap_err();
        assert!(err.to_string().contains("Hint: run `recommend configure`"));
        assert!(cfg.base_url.is_none());

        let err = cfg.set_base_url("mailto:someone@example.com").unwrap_err();
        assert!(err.to_string().contains("cannot hold a path"));
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let cfg = Config {
            timeout_secs: Some(0),
            ..Config::default()
        };
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let cfg = Config {
            timeout_secs: Some(3),
            ..Config::default()
        };
        assert_eq!(cfg.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn placeholder_image_overrides_render_default() {
        let mut cfg = Config::default();
        assert_eq!(cfg.render_options(), RenderOptions::default());

        cfg.placeholder_image = Some("/img/none.svg".into());
        assert_eq!(cfg.render_options().placeholder_image, "/img/none.svg");
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let cfg = Config {
            base_url: Some("http://10.0.0.2:9000".into()),
            timeout_secs: Some(5),
            placeholder_image: None,
        };
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.base_url, cfg.base_url);
        assert_eq!(back.timeout(), Duration::from_secs(5));
    }
}
