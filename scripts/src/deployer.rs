//! The deployment engine: submits the wallet creation transaction and waits
//! for it to be confirmed

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use alloy::{
    network::{ReceiptResponse, TransactionBuilder},
    providers::{DynProvider, Provider},
    rpc::types::TransactionRequest,
};
use alloy_primitives::{Address, Bytes};
use tracing::{info, warn};

use crate::{
    constants::MULTISIG_CONTRACT_NAME,
    errors::ScriptError,
    types::{DeploymentArgs, DeploymentResult},
    utils::write_deployed_address,
};

/// A backend capable of deploying the multisig wallet
pub trait DeploymentEngine {
    /// The address deployment transactions are sent from
    fn deployer(&self) -> Address;

    /// The signer identities the node makes available, in order
    fn local_signers(&self) -> impl Future<Output = Result<Vec<Address>, ScriptError>>;

    /// Deploy the wallet with the given constructor arguments, waiting for
    /// `confirmations` blocks before returning
    fn deploy(
        &self,
        args: &DeploymentArgs,
        confirmations: u64,
    ) -> impl Future<Output = Result<DeploymentResult, ScriptError>>;
}

/// Deploys the wallet through an alloy provider, recording the deployed
/// address in a deployments file
pub struct AlloyDeployer {
    /// The client used to send transactions
    client: DynProvider,
    /// The address of the deployer
    deployer: Address,
    /// The wallet creation bytecode, without constructor arguments
    bytecode: Bytes,
    /// The name of the network, used to key the deployments file
    network: String,
    /// The path of the deployments file
    deployments_path: PathBuf,
}

impl AlloyDeployer {
    /// Create a new deployer
    pub fn new(
        client: DynProvider,
        deployer: Address,
        bytecode: Bytes,
        network: impl Into<String>,
        deployments_path: PathBuf,
    ) -> Self {
        Self {
            client,
            deployer,
            bytecode,
            network: network.into(),
            deployments_path,
        }
    }

    /// Warn if the node reports a different chain ID than the one configured
    pub async fn check_chain_id(&self, expected: u64) -> Result<(), ScriptError> {
        let chain_id = self
            .client
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        if chain_id != expected {
            warn!(
                "Node reports chain ID {}, but the deployment resolved chain ID {}",
                chain_id, expected
            );
        }

        Ok(())
    }
}

/// Record the deployed wallet address in the deployments file.
///
/// The contract is already on chain at this point, so a failed write is logged
/// rather than returned. Returns whether the address was recorded.
fn record_deployment(deployments_path: &Path, network: &str, address: Address) -> bool {
    match write_deployed_address(deployments_path, network, MULTISIG_CONTRACT_NAME, address) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Could not record {:#x} in {}: {}",
                address,
                deployments_path.display(),
                e
            );
            false
        }
    }
}

impl DeploymentEngine for AlloyDeployer {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn local_signers(&self) -> Result<Vec<Address>, ScriptError> {
        self.client
            .get_accounts()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
    }

    async fn deploy(
        &self,
        args: &DeploymentArgs,
        confirmations: u64,
    ) -> Result<DeploymentResult, ScriptError> {
        let deploy_code = [self.bytecode.to_vec(), args.constructor_calldata()].concat();
        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(deploy_code);

        let pending_tx = self
            .client
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        let tx_hash = *pending_tx.tx_hash();
        info!(
            "deploying \"{}\" (tx: {:#x}), awaiting {} confirmation(s)",
            MULTISIG_CONTRACT_NAME, tx_hash, confirmations
        );

        let receipt = pending_tx
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractDeployment(format!(
                "deployment transaction {:#x} reverted",
                tx_hash
            )));
        }

        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "receipt for {:#x} has no contract address",
                tx_hash
            ))
        })?;
        info!(
            "deployed at {:#x} with {} gas",
            address, receipt.gas_used
        );

        record_deployment(&self.deployments_path, &self.network, address);

        Ok(DeploymentResult {
            address,
            tx_hash,
            confirmations,
            gas_used: receipt.gas_used,
        })
    }
}
