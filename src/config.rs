use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Describing the server configuration.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Address the http server binds to.
    pub addr: SocketAddr,
    /// Directory records are persisted in.
    /// Records live in memory only if this is `None`.
    pub data_dir: Option<PathBuf>,
    /// Seconds between two expiry sweeps, `0` disables the sweep.
    pub sweep_interval_secs: u64,
    /// Points a restaurant earns each time one of its listings is claimed.
    pub points_per_claim: u64,
    /// Lifetime of a login token in days, `0` means never expire.
    pub token_expire_days: u16,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: Some(PathBuf::from("./data")),
            sweep_interval_secs: 60,
            points_per_claim: 50,
            token_expire_days: 5,
            log_level: "info".to_owned(),
        }
    }
}

impl Config {
    /// Reads the config from a toml file, or the defaults if the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Config for in-memory instances.
    pub fn ephemeral() -> Self {
        Self {
            data_dir: None,
            sweep_interval_secs: 0,
            ..Self::default()
        }
    }
}
