//! The deploy configuration: development networks, per-chain settings, and
//! the owner accounts used on live networks

use std::{collections::HashMap, fs, path::Path};

use alloy_primitives::Address;
use itertools::Itertools;
use serde::Deserialize;
use tracing::warn;

use crate::{
    constants::{DEFAULT_BLOCK_CONFIRMATIONS, DEFAULT_DEVELOPMENT_NETWORKS},
    errors::ScriptError,
    types::NetworkContext,
};

/// Per-chain deployment settings, keyed by chain ID in [`DeployConfig`]
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ChainConfig {
    /// The name of the network served by this chain
    pub name: String,
    /// The number of confirmations to await for the deployment transaction
    #[serde(default)]
    pub block_confirmations: Option<u64>,
    /// The Etherscan-compatible explorer API used for source verification
    #[serde(default)]
    pub explorer_api_url: Option<String>,
}

/// The deploy configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DeployConfig {
    /// Networks on which local signers own the wallet and verification is skipped
    #[serde(default = "default_development_networks")]
    pub development_networks: Vec<String>,
    /// Per-chain settings, keyed by chain ID
    #[serde(default)]
    pub networks: HashMap<u64, ChainConfig>,
    /// The wallet owners on live networks, in order
    #[serde(default)]
    pub accounts: Vec<Address>,
}

/// The development networks used when the config does not list any
fn default_development_networks() -> Vec<String> {
    DEFAULT_DEVELOPMENT_NETWORKS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            development_networks: default_development_networks(),
            networks: HashMap::new(),
            accounts: Vec::new(),
        }
    }
}

impl DeployConfig {
    /// Read the config from a JSON file, using the defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        if !path.exists() {
            warn!(
                "Deploy config {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(path).map_err(|e| ScriptError::ReadFile(e.to_string()))?;
        Self::from_json_str(&contents)
    }

    /// Parse the config from a JSON string.
    ///
    /// Network names must be unique across chain entries.
    pub fn from_json_str(json: &str) -> Result<Self, ScriptError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ScriptError::ConfigParsing(e.to_string()))?;

        let duplicate_name = config
            .networks
            .values()
            .map(|chain| &chain.name)
            .duplicates()
            .next();
        if let Some(name) = duplicate_name {
            return Err(ScriptError::ConfigParsing(format!(
                "network \"{name}\" is configured for more than one chain"
            )));
        }

        Ok(config)
    }

    /// Whether the given network is a development network
    pub fn is_development(&self, network: &str) -> bool {
        self.development_networks.iter().any(|n| n == network)
    }

    /// The chain ID configured for the given network name, if any
    pub fn chain_id_for(&self, network: &str) -> Option<u64> {
        self.networks
            .iter()
            .find(|(_, chain)| chain.name == network)
            .map(|(chain_id, _)| *chain_id)
    }

    /// Build the network context for a run.
    ///
    /// An explicit chain ID takes precedence over the one configured for the network.
    pub fn network_context(&self, network: &str, chain_id: Option<u64>) -> NetworkContext {
        NetworkContext::new(network, chain_id.or_else(|| self.chain_id_for(network)))
    }

    /// The number of confirmations to await on the given chain
    pub fn block_confirmations(&self, chain_id: u64) -> u64 {
        self.networks
            .get(&chain_id)
            .and_then(|chain| chain.block_confirmations)
            .unwrap_or(DEFAULT_BLOCK_CONFIRMATIONS)
    }

    /// The explorer API configured for the given chain, if any
    pub fn explorer_api_url(&self, chain_id: u64) -> Option<&str> {
        self.networks
            .get(&chain_id)
            .and_then(|chain| chain.explorer_api_url.as_deref())
    }
}
