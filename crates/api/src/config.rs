// Server configuration loaded from the environment

use anyhow::{anyhow, bail, Context, Result};
use memorylane_core::{MilestonePolicy, MilestoneTrigger, DEFAULT_MILESTONE_THRESHOLD};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Runtime settings for the HTTP server
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL URL; `None` runs against the in-memory store
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Directory that receives uploads and is served at `/uploads`
    pub upload_dir: PathBuf,
    pub milestone: MilestoneTrigger,
    /// Request body cap, applied to multipart uploads
    pub max_upload_bytes: usize,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            milestone: MilestoneTrigger::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from process environment variables
    ///
    /// - `DATABASE_URL` (unset: in-memory dev mode)
    /// - `HOST` (default: 0.0.0.0), `PORT` (default: 5000)
    /// - `UPLOAD_DIR` (default: uploads)
    /// - `MILESTONE_THRESHOLD` (default: 3), `MILESTONE_POLICY` (default: every_event)
    /// - `MAX_UPLOAD_BYTES` (default: 50 MB)
    /// - `CORS_ALLOWED_ORIGINS` (comma separated; unset: any origin)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let threshold = parse_var(&var, "MILESTONE_THRESHOLD")?
            .unwrap_or(DEFAULT_MILESTONE_THRESHOLD);
        if threshold == 0 {
            bail!("MILESTONE_THRESHOLD must be at least 1");
        }
        let policy = match var("MILESTONE_POLICY") {
            Some(raw) => raw
                .parse::<MilestonePolicy>()
                .map_err(|e| anyhow!(e))
                .context("Invalid MILESTONE_POLICY")?,
            None => MilestonePolicy::default(),
        };

        let cors_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url: var("DATABASE_URL"),
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_var(&var, "PORT")?.unwrap_or(defaults.port),
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            milestone: MilestoneTrigger::new(policy, threshold),
            max_upload_bytes: parse_var(&var, "MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
            cors_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_dev_mode(&self) -> bool {
        self.database_url.is_none()
    }
}

fn parse_var<T, F>(var: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| anyhow!("Invalid {} '{}': {}", key, raw, e))
        })
        .transpose()
}
