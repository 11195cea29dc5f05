use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TracefallError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
    /// Row cap passed to the trace endpoint; never applied by the flattener.
    pub trace_limit: usize,
    /// Width of the waterfall bar track, in terminal cells.
    pub track_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:9000/api/0".to_string(),
            api_token: None,
            request_timeout: Duration::from_secs(10),
            trace_limit: 100,
            track_width: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        let env_overrides = load_env_overrides()?;
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    api_base_url: Option<String>,
    api_token: Option<String>,
    request_timeout: Option<String>,
    trace_limit: Option<usize>,
    track_width: Option<usize>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("TRACEFALL_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("tracefall/config.toml")
}

fn load_file_overrides(path: &PathBuf) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| TracefallError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| TracefallError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> Result<ConfigOverrides> {
    let trace_limit = parse_env_usize("TRACEFALL_TRACE_LIMIT")?;
    let track_width = parse_env_usize("TRACEFALL_TRACK_WIDTH")?;

    Ok(ConfigOverrides {
        api_base_url: env::var("TRACEFALL_API_BASE_URL").ok(),
        api_token: env::var("TRACEFALL_API_TOKEN").ok(),
        request_timeout: env::var("TRACEFALL_REQUEST_TIMEOUT").ok(),
        trace_limit,
        track_width,
    })
}

fn parse_env_usize(key: &str) -> Result<Option<usize>> {
    match env::var(key) {
        Ok(v) => Ok(Some(v.parse::<usize>().map_err(|e| {
            TracefallError::Config(format!("bad {key} in environment: {e}"))
        })?)),
        Err(_) => Ok(None),
    }
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.api_base_url {
        cfg.api_base_url = v.trim_end_matches('/').to_string();
    }
    if let Some(v) = overrides.api_token {
        cfg.api_token = Some(v);
    }
    if let Some(v) = overrides.request_timeout {
        cfg.request_timeout = humantime::parse_duration(&v).map_err(|e| {
            TracefallError::Config(format!("bad request_timeout in {source}: {e} (value={v})"))
        })?;
    }
    if let Some(v) = overrides.trace_limit {
        cfg.trace_limit = v;
    }
    if let Some(v) = overrides.track_width {
        if v == 0 {
            return Err(TracefallError::Config(format!(
                "track_width in {source} must be positive"
            )));
        }
        cfg.track_width = v;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_api() {
        let cfg = Config::default();
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:9000/api/0");
        assert_eq!(cfg.trace_limit, 100);
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn apply_overrides_updates_fields() {
        let mut cfg = Config::default();
        let overrides = ConfigOverrides {
            api_base_url: Some("https://monitor.example.com/api/0/".to_string()),
            api_token: Some("token-1".to_string()),
            request_timeout: Some("3s".to_string()),
            trace_limit: Some(250),
            track_width: Some(80),
        };

        apply_overrides(&mut cfg, overrides, "config file").unwrap();

        assert_eq!(cfg.api_base_url, "https://monitor.example.com/api/0");
        assert_eq!(cfg.api_token.as_deref(), Some("token-1"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(3));
        assert_eq!(cfg.trace_limit, 250);
        assert_eq!(cfg.track_width, 80);
    }

    #[test]
    fn rejects_bad_timeout() {
        let mut cfg = Config::default();
        let overrides = ConfigOverrides {
            request_timeout: Some("soon".to_string()),
            ..ConfigOverrides::default()
        };
        assert!(apply_overrides(&mut cfg, overrides, "config file").is_err());
    }

    #[test]
    fn rejects_zero_track_width() {
        let mut cfg = Config::default();
        let overrides = ConfigOverrides {
            track_width: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(apply_overrides(&mut cfg, overrides, "environment").is_err());
    }
}
