//! Central module for application-wide configuration settings.
//!
//! Settings come from `HY_*` environment variables, each with a logged
//! default: bind address, data directory (auth state and persisted records),
//! an optional role assignment file and the navigation visibility policy.

use std::{
    env,
    fmt::Display,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    str::FromStr,
};

use thiserror::Error;
use tracing::{info, warn};

use crate::services::navigation::NavPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub roles_file: Option<PathBuf>,
    pub nav_policy: NavPolicy,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: try_load(&lookup, "HY_HOST", "127.0.0.1")?,
            port: try_load(&lookup, "HY_PORT", "3000")?,
            data_dir: try_load(&lookup, "HY_DATA_DIR", "data")?,
            roles_file: lookup("HY_ROLES_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            nav_policy: try_load(&lookup, "HY_NAV_POLICY", "authenticated")?,
        })
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn auth_state_path(&self) -> PathBuf {
        self.data_dir.join("auth.json")
    }

    pub fn records_dir(&self) -> PathBuf {
        self.data_dir.join("records")
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }
    })
}
