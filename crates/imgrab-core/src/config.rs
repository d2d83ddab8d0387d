//! Configuration: the app config (`config.toml` under XDG) and the per-run
//! input (`Input.json`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::FetchOptions;

/// Global configuration loaded from `~/.config/imgrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImgrabConfig {
    /// Endpoint every image is fetched from.
    pub source_url: String,
    /// TCP/TLS connect timeout per transfer, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout, in seconds.
    pub transfer_timeout_secs: u64,
    /// Minimum interval between progress line redraws, in milliseconds.
    pub progress_interval_ms: u64,
}

impl Default for ImgrabConfig {
    fn default() -> Self {
        Self {
            source_url: "https://picsum.photos/200/300".to_string(),
            connect_timeout_secs: 15,
            transfer_timeout_secs: 300,
            progress_interval_ms: 100,
        }
    }
}

impl ImgrabConfig {
    /// Transfer knobs for the fetcher.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            transfer_timeout: Duration::from_secs(self.transfer_timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// The configured endpoint must be a parseable URL.
pub fn load_or_init() -> Result<ImgrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImgrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ImgrabConfig = toml::from_str(&data)?;
    url::Url::parse(&cfg.source_url)
        .with_context(|| format!("invalid source_url in config: {}", cfg.source_url))?;
    Ok(cfg)
}

/// Per-run input: how many images, how parallel, where to save.
///
/// Mirrors the `Input.json` contract with exactly the keys `Count`,
/// `Parallelism` and `SavePath`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    #[serde(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Parallelism")]
    pub parallelism: usize,
    #[serde(rename = "SavePath")]
    pub save_path: String,
}

impl Input {
    /// Both counts at least 1 and a non-empty save path.
    pub fn is_valid(&self) -> bool {
        self.count >= 1 && self.parallelism >= 1 && !self.save_path.trim().is_empty()
    }

    /// Reads an `Input.json`-style file. Returns `None` when the file is
    /// missing, unparseable, or fails validation, so the caller can fall
    /// back to interactive prompting. Never fatal.
    pub fn load_from_path(path: &Path) -> Option<Input> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "input file not readable");
                return None;
            }
        };
        let input: Input = match serde_json::from_str(&data) {
            Ok(input) => input,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "input file not valid JSON");
                return None;
            }
        };
        if !input.is_valid() {
            tracing::debug!(path = %path.display(), "input file failed validation");
            return None;
        }
        Some(input)
    }
}
