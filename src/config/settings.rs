//! Process configuration read once at startup and injected into application state.

use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

const ENV_URL: &str = "SUPABASE_URL";
const ENV_SERVICE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";
const ENV_BIND_ADDR: &str = "BIND_ADDR";
const ENV_MAX_UPLOAD: &str = "MAX_UPLOAD_BYTES";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Connection settings for the remote tabular data service.
#[derive(Clone, Debug, Default)]
pub struct RemoteSettings {
    pub base_url: Option<String>,
    /// Service-role key when present, otherwise the anon key.
    pub api_key: Option<String>,
}

impl RemoteSettings {
    pub fn is_complete(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub remote: RemoteSettings,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl GatewayConfig {
    /// Read configuration from the process environment.
    /// Missing remote settings are logged but do not fail; each remote call fails on its own.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = get(ENV_URL);
        let api_key = get(ENV_SERVICE_KEY).or_else(|| get(ENV_ANON_KEY));
        if base_url.is_none() || api_key.is_none() {
            tracing::warn!(
                url_present = base_url.is_some(),
                key_present = api_key.is_some(),
                "missing remote database settings; entity operations will fail until {} and {} or {} are set",
                ENV_URL,
                ENV_SERVICE_KEY,
                ENV_ANON_KEY
            );
        }

        let bind_raw = get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| SettingsError::Invalid {
            name: ENV_BIND_ADDR,
            value: bind_raw.clone(),
        })?;

        let max_upload_bytes = match get(ENV_MAX_UPLOAD) {
            Some(raw) => raw.parse().map_err(|_| SettingsError::Invalid {
                name: ENV_MAX_UPLOAD,
                value: raw,
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(GatewayConfig {
            remote: RemoteSettings { base_url, api_key },
            bind_addr,
            max_upload_bytes,
        })
    }
}
