//! Definitions of CLI arguments for the deploy script

use std::{fs, path::PathBuf};

use clap::{Args, Parser};
use tracing::info;

use crate::{
    commands::{deploy_multisig, should_run},
    config::DeployConfig,
    constants::{
        DEFAULT_ARTIFACT_PATH, DEFAULT_CONFIG_PATH, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_DEVNET_PKEY,
        DEFAULT_NETWORK, DEFAULT_RPC_URL,
    },
    deployer::AlloyDeployer,
    errors::ScriptError,
    utils::{read_artifact_bytecode, setup_client},
    verify::{EtherscanVerifier, VerificationSettings},
};

/// Deploy the multisig wallet contract, owned by 2/3 of the configured accounts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer, defaults to the first devnet account
    #[arg(short, long, env = "PKEY", default_value = DEFAULT_DEVNET_PKEY)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Name of the network to deploy to
    #[arg(short, long, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Chain ID of the network, overriding the one in the deploy config
    #[arg(long)]
    pub chain_id: Option<u64>,

    /// Path to the deploy config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Path to the compiled wallet contract artifact
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    pub artifact: PathBuf,

    /// Path to the file in which to record deployed addresses
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Only deploy if the script carries one of these tags
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Source verification arguments
    #[command(flatten)]
    pub verify: VerifyArgs,
}

/// Arguments for verifying the contract source on live networks
#[derive(Args)]
pub struct VerifyArgs {
    /// API key for the block explorer
    #[arg(long, env = "ETHERSCAN_API_KEY")]
    pub etherscan_api_key: Option<String>,

    /// Explorer API URL, overriding the one in the deploy config
    #[arg(long)]
    pub explorer_api_url: Option<String>,

    /// Fully qualified name of the wallet contract
    #[arg(long, default_value = "contracts/MultiSigWallet.sol:MultiSigWallet")]
    pub contract_name: String,

    /// Full version of the compiler the contract was built with,
    /// e.g. `v0.8.17+commit.8df45f5f`
    #[arg(long)]
    pub compiler_version: Option<String>,

    /// Path to the standard JSON compiler input the contract was built from
    #[arg(long)]
    pub standard_json: Option<PathBuf>,
}

impl VerifyArgs {
    /// Resolve the verification settings for the given chain
    pub fn settings(
        self,
        config: &DeployConfig,
        chain_id: u64,
    ) -> Result<VerificationSettings, ScriptError> {
        let api_url = self
            .explorer_api_url
            .or_else(|| config.explorer_api_url(chain_id).map(str::to_string))
            .ok_or_else(|| {
                ScriptError::VerificationConfig(format!("no explorer API URL for chain {chain_id}"))
            })?;
        let api_key = self.etherscan_api_key.ok_or_else(|| {
            ScriptError::VerificationConfig("no explorer API key".to_string())
        })?;
        let compiler_version = self.compiler_version.ok_or_else(|| {
            ScriptError::VerificationConfig("no compiler version".to_string())
        })?;
        let standard_json_path = self.standard_json.ok_or_else(|| {
            ScriptError::VerificationConfig("no standard JSON compiler input".to_string())
        })?;
        let standard_json_input = fs::read_to_string(standard_json_path)
            .map_err(|e| ScriptError::ReadFile(e.to_string()))?;

        Ok(VerificationSettings {
            api_url,
            api_key,
            chain_id,
            contract_name: self.contract_name,
            compiler_version,
            standard_json_input,
        })
    }
}

impl Cli {
    /// Run the deploy script
    pub async fn run(self) -> Result<(), ScriptError> {
        if !should_run(&self.tags) {
            info!("No deploy script matches tags {:?}, skipping", self.tags);
            return Ok(());
        }

        let config = DeployConfig::load(&self.config)?;
        let network = config.network_context(&self.network, self.chain_id);
        let chain_id = network.resolved_chain_id();

        // Verification settings must resolve before anything is sent
        let verifier = if config.is_development(&network.name) {
            None
        } else {
            Some(EtherscanVerifier::new(self.verify.settings(&config, chain_id)?))
        };

        let bytecode = read_artifact_bytecode(&self.artifact)?;
        let (client, deployer) = setup_client(&self.priv_key, &self.rpc_url)?;
        let engine = AlloyDeployer::new(
            client,
            deployer,
            bytecode,
            network.name.clone(),
            self.deployments_path,
        );
        engine.check_chain_id(chain_id).await?;

        deploy_multisig(&network, &config, &engine, verifier.as_ref()).await?;
        Ok(())
    }
}
