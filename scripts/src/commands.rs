//! Implementation of the multisig wallet deploy script

use alloy_primitives::Address;
use tracing::info;

use crate::{
    config::DeployConfig,
    constants::{MULTISIG_DEPLOY_TAGS, NUM_DEV_SIGNERS},
    deployer::DeploymentEngine,
    errors::ScriptError,
    types::{AccountSet, DeploymentArgs, DeploymentResult, NetworkContext},
    verify::SourceVerifier,
};

#[cfg(test)]
mod tests;

/// Whether the multisig deploy script should run for the requested tags.
///
/// An empty tag list runs every script.
pub fn should_run(tags: &[String]) -> bool {
    tags.is_empty()
        || tags
            .iter()
            .any(|tag| MULTISIG_DEPLOY_TAGS.contains(&tag.as_str()))
}

/// Select the wallet owners for the given network.
///
/// On development networks these are the first local signers exposed by the
/// node, otherwise the accounts listed in the deploy config.
pub async fn select_accounts(
    network: &NetworkContext,
    config: &DeployConfig,
    engine: &impl DeploymentEngine,
) -> Result<AccountSet, ScriptError> {
    let accounts: Vec<Address> = if config.is_development(&network.name) {
        let signers = engine.local_signers().await?;
        if signers.len() < NUM_DEV_SIGNERS {
            return Err(ScriptError::InsufficientSigners {
                required: NUM_DEV_SIGNERS,
                available: signers.len(),
            });
        }

        signers.into_iter().take(NUM_DEV_SIGNERS).collect()
    } else {
        config.accounts.clone()
    };

    AccountSet::new(accounts)
}

/// Deploy the multisig wallet to the given network, verifying its source on
/// live networks.
///
/// Fails before sending any transaction if the owner set is invalid or a live
/// network has no verifier.
pub async fn deploy_multisig<E: DeploymentEngine, V: SourceVerifier>(
    network: &NetworkContext,
    config: &DeployConfig,
    engine: &E,
    verifier: Option<&V>,
) -> Result<DeploymentResult, ScriptError> {
    let is_development = config.is_development(&network.name);
    let verifier = match (is_development, verifier) {
        (true, _) => None,
        (false, Some(verifier)) => Some(verifier),
        (false, None) => {
            return Err(ScriptError::VerificationConfig(format!(
                "no verifier available for live network {}",
                network.name
            )))
        }
    };

    let accounts = select_accounts(network, config, engine).await?;
    let args = DeploymentArgs::new(accounts)?;
    let confirmations = config.block_confirmations(network.resolved_chain_id());

    info!("Deploying Multisig wallet contract...");
    info!(
        "\tnetwork: {}, deployer: {:#x}, threshold: {}, owners: {}",
        network,
        engine.deployer(),
        args.threshold,
        args.accounts
    );
    let result = engine.deploy(&args, confirmations).await?;
    info!("Contract deployed at {:#x}", result.address);

    if let Some(verifier) = verifier {
        info!("Verifying contract...");
        verifier.verify(result.address, &args).await?;
    }

    Ok(result)
}
