use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use url::Url;

use crate::clients::FiwareHeader;
use crate::error::{FilipError, Result};

pub const DEFAULT_CB_URL: &str = "http://127.0.0.1:1026";
pub const DEFAULT_IOTA_URL: &str = "http://127.0.0.1:4041";
pub const DEFAULT_QL_URL: &str = "http://127.0.0.1:8668";

/// Endpoints and tenant of a FIWARE deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_cb_url")]
    pub cb_url: Url,
    #[serde(default = "default_iota_url")]
    pub iota_url: Url,
    #[serde(default = "default_ql_url")]
    pub ql_url: Url,
    #[serde(default)]
    pub service: String,
    #[serde(default = "default_service_path")]
    pub service_path: String,
}

// The DEFAULT_*_URL constants are valid absolute urls.
lazy_static! {
    static ref DEFAULT_URLS: [Url; 3] = [
        Url::parse(DEFAULT_CB_URL).expect("DEFAULT_CB_URL"),
        Url::parse(DEFAULT_IOTA_URL).expect("DEFAULT_IOTA_URL"),
        Url::parse(DEFAULT_QL_URL).expect("DEFAULT_QL_URL"),
    ];
}

fn default_cb_url() -> Url {
    DEFAULT_URLS[0].clone()
}

fn default_iota_url() -> Url {
    DEFAULT_URLS[1].clone()
}

fn default_ql_url() -> Url {
    DEFAULT_URLS[2].clone()
}

fn default_service_path() -> String {
    "/".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cb_url: default_cb_url(),
            iota_url: default_iota_url(),
            ql_url: default_ql_url(),
            service: String::new(),
            service_path: default_service_path(),
        }
    }
}

impl Settings {
    /// Reads `CB_URL`, `IOTA_URL`, `QL_URL`, `FIWARE_SERVICE` and
    /// `FIWARE_SERVICEPATH`.
    pub fn from_env() -> Result<Self> {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = |key: &str, default: &str| -> Result<Url> {
            let raw = lookup(key).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|err| FilipError::Config(format!("{}='{}': {}", key, raw, err)))
        };
        let settings = Settings {
            cb_url: url("CB_URL", DEFAULT_CB_URL)?,
            iota_url: url("IOTA_URL", DEFAULT_IOTA_URL)?,
            ql_url: url("QL_URL", DEFAULT_QL_URL)?,
            service: lookup("FIWARE_SERVICE").unwrap_or_default(),
            service_path: lookup("FIWARE_SERVICEPATH").unwrap_or_else(default_service_path),
        };
        debug!("settings: {:?}", settings);
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    pub fn fiware_header(&self) -> Result<FiwareHeader> {
        FiwareHeader::new(self.service.clone(), self.service_path.clone())
    }
}
