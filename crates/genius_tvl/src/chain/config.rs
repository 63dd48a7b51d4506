//! RPC endpoint configuration.
//!
//! Load from: env `GENIUS_TVL_CONFIG_PATH`, or `./config/genius_tvl.json`, or
//! `./genius_tvl.json`. A per-chain env var `GENIUS_RPC_<CHAIN>` (for example
//! `GENIUS_RPC_BSC`) overrides the file. Chains with no endpoint fall back to
//! a public RPC.

use crate::chain::network::Chain;
use crate::chain::rpc::RpcConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const CONFIG_PATH_ENV: &str = "GENIUS_TVL_CONFIG_PATH";
const RPC_ENV_PREFIX: &str = "GENIUS_RPC_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io: {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Per-chain RPC endpoints and client tuning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Chain name (`"bsc"`, `"ethereum"`, ...) -> JSON-RPC URL.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub endpoints: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_ms: Option<u64>,

    /// Opt-in transport retries. Unset means a failed request fails the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl EndpointConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Env path, then the default locations. A missing file yields the empty config.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            debug!(%path, "config from env");
            return Self::load_from_path(Path::new(&path));
        }
        for candidate in [
            Path::new("./config/genius_tvl.json"),
            Path::new("./genius_tvl.json"),
        ] {
            if candidate.exists() {
                debug!(path = %candidate.display(), "config file");
                return Self::load_from_path(candidate);
            }
        }
        Ok(Self::default())
    }

    /// RPC settings for `chain`, honouring a `GENIUS_RPC_<CHAIN>` override.
    pub fn rpc_config(&self, chain: Chain) -> RpcConfig {
        self.rpc_config_with(chain, env_endpoint(chain))
    }

    /// RPC settings for `chain` with an explicit endpoint override in place of
    /// the environment. Override, then the file entry, then the public RPC.
    pub fn rpc_config_with(&self, chain: Chain, endpoint_override: Option<String>) -> RpcConfig {
        let url = endpoint_override
            .or_else(|| self.endpoints.get(chain.as_str()).cloned())
            .unwrap_or_else(|| chain.default_rpc_url().to_string());
        let mut config = RpcConfig::new(chain.as_str(), url);
        if let Some(ms) = self.rate_limit_ms {
            config.rate_limit_ms = ms;
        }
        if let Some(n) = self.max_retries {
            config.max_retries = n;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        config
    }
}

fn env_endpoint(chain: Chain) -> Option<String> {
    let var = format!("{}{}", RPC_ENV_PREFIX, chain.as_str().to_uppercase());
    let url = std::env::var(&var).ok()?;
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    debug!(%var, "endpoint from env");
    Some(url.to_string())
}
