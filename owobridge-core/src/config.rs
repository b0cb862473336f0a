//! src/config.rs
//!
//! The JSON settings file. Every key is optional; a missing file is written
//! out with defaults on first start.

use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Error;
use crate::address_map::default_address;
use crate::models::Muscle;

pub const DEFAULT_FREQUENCY: u32 = 50;
pub const DEFAULT_INTENSITY: f32 = 10.0;
pub const DEFAULT_OSC_LISTEN_ADDR: &str = "127.0.0.1:9001";
pub const DEFAULT_SEND_INTERVAL_MS: u64 = 300;
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 1000;

/// Which vendor binding to drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    #[default]
    Simulated,
    Native { library_path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub frequency: Option<u32>,
    pub intensities: HashMap<String, f32>,
    pub owo_ip: Option<String>,
    pub osc_listen_addr: String,
    pub send_interval_ms: u64,
    pub retry_interval_ms: u64,
    pub backend: BackendConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frequency: Some(DEFAULT_FREQUENCY),
            intensities: Muscle::ALL
                .iter()
                .map(|m| (default_address(*m), DEFAULT_INTENSITY))
                .collect(),
            owo_ip: None,
            osc_listen_addr: DEFAULT_OSC_LISTEN_ADDR.to_string(),
            send_interval_ms: DEFAULT_SEND_INTERVAL_MS,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
            backend: BackendConfig::default(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/owobridge/config.json`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("owobridge"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.json")
    }

    /// Read the file at `path`, creating it with defaults if it does not exist.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            let cfg = AppConfig::default();
            cfg.save(path)?;
            info!("Wrote default config to {}", path.display());
            return Ok(cfg);
        }
        Self::load(path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let cfg: AppConfig = serde_json::from_slice(&bytes)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        debug!("Loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// Configured frequency; unset or zero means the default of 50.
    pub fn frequency(&self) -> u32 {
        self.frequency.filter(|f| *f > 0).unwrap_or(DEFAULT_FREQUENCY)
    }

    pub fn intensity_for(&self, address: &str) -> f32 {
        self.intensities
            .get(address)
            .copied()
            .unwrap_or(DEFAULT_INTENSITY)
    }

    /// The direct-connect IP, if one is set and non-empty.
    pub fn owo_ip(&self) -> Option<&str> {
        self.owo_ip.as_deref().filter(|ip| !ip.is_empty())
    }

    pub fn osc_listen_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.osc_listen_addr.parse()?)
    }

    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.frequency(), 50);
        assert_eq!(cfg.owo_ip(), None);
        assert_eq!(cfg.backend, BackendConfig::Simulated);
    }

    #[test]
    fn frequency_null_or_zero_falls_back() {
        let cfg: AppConfig = serde_json::from_str(r#"{"frequency": null}"#).unwrap();
        assert_eq!(cfg.frequency(), 50);
        let cfg: AppConfig = serde_json::from_str(r#"{"frequency": 0}"#).unwrap();
        assert_eq!(cfg.frequency(), 50);
        let cfg: AppConfig = serde_json::from_str(r#"{"frequency": 80}"#).unwrap();
        assert_eq!(cfg.frequency(), 80);
    }

    #[test]
    fn intensities_replace_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"intensities": {"addrA": 0.7}}"#).unwrap();
        assert_eq!(cfg.intensities.len(), 1);
        assert_eq!(cfg.intensity_for("addrA"), 0.7);
        assert_eq!(cfg.intensity_for("addrB"), DEFAULT_INTENSITY);
    }

    #[test]
    fn only_empty_ip_is_none() {
        let cfg: AppConfig = serde_json::from_str(r#"{"owo_ip": ""}"#).unwrap();
        assert_eq!(cfg.owo_ip(), None);
        let cfg: AppConfig = serde_json::from_str(r#"{"owo_ip": "  "}"#).unwrap();
        assert_eq!(cfg.owo_ip(), Some("  "));
        let cfg: AppConfig = serde_json::from_str(r#"{"owo_ip": "10.0.0.5"}"#).unwrap();
        assert_eq!(cfg.owo_ip(), Some("10.0.0.5"));
    }

    #[test]
    fn native_backend_parses() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"backend": {"kind": "native", "library_path": "owo_shim.dll"}}"#,
        )
        .unwrap();
        assert_eq!(
            cfg.backend,
            BackendConfig::Native { library_path: PathBuf::from("owo_shim.dll") }
        );
    }

    #[test]
    fn load_or_create_writes_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let created = AppConfig::load_or_create(&path).unwrap();
        assert!(path.exists());

        let mut edited = created.clone();
        edited.owo_ip = Some("192.168.1.20".into());
        edited.save(&path).unwrap();

        let reloaded = AppConfig::load_or_create(&path).unwrap();
        assert_eq!(reloaded.owo_ip(), Some("192.168.1.20"));
    }

    #[test]
    fn bad_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ nope").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(Error::Config(_))));
    }
}
