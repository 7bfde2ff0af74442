// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

use crate::domain::ReportingPolicy;

pub const DEFAULT_PANEL_PATH: &str = "Panel_Esfuerzo_Recaudatorio.xlsx";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime settings.
///
/// Resolution order: built-in defaults, then the YAML file named by
/// `DASHBOARD_CONFIG` (if any), then individual environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub panel_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub assets_dir: PathBuf,
    pub log_level: String,
    pub policy: ReportingPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            panel_path: PathBuf::from(DEFAULT_PANEL_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            policy: ReportingPolicy::default(),
        }
    }
}

impl Settings {
    /// Settings for this process.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| env::var(key).ok())
    }

    /// Resolve settings with an arbitrary variable lookup.
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup("DASHBOARD_CONFIG") {
            Some(path) => Self::from_yaml_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(v) = lookup("PANEL_PATH") {
            settings.panel_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("HOST") {
            settings.host = v;
        }
        if let Some(v) = lookup("PORT") {
            settings.port = v
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {v:?}"))?;
        }
        if let Some(v) = lookup("ASSETS_DIR") {
            settings.assets_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            settings.log_level = v;
        }
        Ok(settings)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("HOST must be an IP address, got {:?}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_any_source() {
        let s = Settings::resolve(lookup(&[])).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.socket_addr().unwrap().port(), 8050);
    }

    #[test]
    fn env_overrides_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "panel_path: data/panel.csv").unwrap();
        writeln!(file, "port: 9000").unwrap();
        writeln!(file, "policy:").unwrap();
        writeln!(file, "  comparison_years: [2025, 2026]").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let s = Settings::resolve(lookup(&[("DASHBOARD_CONFIG", path.as_str()), ("PORT", "9100")])).unwrap();
        assert_eq!(s.panel_path, PathBuf::from("data/panel.csv"));
        assert_eq!(s.port, 9100);
        assert_eq!(s.policy.comparison_years, vec![2025, 2026]);
        assert_eq!(s.policy.reporting_months, 7);
    }

    #[test]
    fn bad_port_is_reported() {
        let err = Settings::resolve(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn bad_host_is_reported() {
        let s = Settings {
            host: "localhost:80".into(),
            ..Settings::default()
        };
        assert!(s.socket_addr().is_err());
    }
}
