//! Tests for the multisig deploy script, run against in-memory collaborators

use std::{cell::RefCell, collections::HashMap};

use alloy_primitives::{Address, TxHash};
use eyre::Result;

use crate::{
    config::{ChainConfig, DeployConfig},
    deployer::DeploymentEngine,
    errors::ScriptError,
    types::{DeploymentArgs, DeploymentResult, NetworkContext},
    verify::SourceVerifier,
};

use super::{deploy_multisig, should_run};

/// The address the mock engine deploys to
const DEPLOYED_ADDRESS: Address = Address::repeat_byte(0xde);

/// The chain ID of the mock live network
const LIVE_CHAIN_ID: u64 = 11155111;

// -----------
// | Helpers |
// -----------

/// A deployment engine recording its calls
#[derive(Default)]
struct MockEngine {
    /// The signers exposed by the mock node
    signers: Vec<Address>,
    /// Whether deployments should fail
    fail: bool,
    /// The arguments and confirmation counts of each deployment
    deployments: RefCell<Vec<(DeploymentArgs, u64)>>,
}

impl DeploymentEngine for MockEngine {
    fn deployer(&self) -> Address {
        Address::repeat_byte(0xff)
    }

    async fn local_signers(&self) -> Result<Vec<Address>, ScriptError> {
        Ok(self.signers.clone())
    }

    async fn deploy(
        &self,
        args: &DeploymentArgs,
        confirmations: u64,
    ) -> Result<DeploymentResult, ScriptError> {
        if self.fail {
            return Err(ScriptError::ContractDeployment("reverted".to_string()));
        }

        self.deployments
            .borrow_mut()
            .push((args.clone(), confirmations));

        Ok(DeploymentResult {
            address: DEPLOYED_ADDRESS,
            tx_hash: TxHash::repeat_byte(1),
            confirmations,
            gas_used: 1_000_000,
        })
    }
}

/// A source verifier recording its calls
#[derive(Default)]
struct MockVerifier {
    /// Whether verification should fail
    fail: bool,
    /// The address and arguments of each verification
    verifications: RefCell<Vec<(Address, DeploymentArgs)>>,
}

impl SourceVerifier for MockVerifier {
    async fn verify(&self, address: Address, args: &DeploymentArgs) -> Result<(), ScriptError> {
        self.verifications.borrow_mut().push((address, args.clone()));
        if self.fail {
            return Err(ScriptError::Verification {
                address,
                reason: "Fail - Unable to verify".to_string(),
            });
        }

        Ok(())
    }
}

/// Build `n` distinct addresses, starting from `start`
fn addresses(start: u8, n: u8) -> Vec<Address> {
    (start..start + n).map(Address::repeat_byte).collect()
}

/// A config with a live network awaiting 5 confirmations and the given owners
fn live_config(accounts: Vec<Address>) -> DeployConfig {
    let mut networks = HashMap::new();
    networks.insert(
        LIVE_CHAIN_ID,
        ChainConfig {
            name: "sepolia".to_string(),
            block_confirmations: Some(5),
            explorer_api_url: None,
        },
    );

    DeployConfig {
        networks,
        accounts,
        ..Default::default()
    }
}

/// The mock live network
fn live_network() -> NetworkContext {
    NetworkContext::new("sepolia", Some(LIVE_CHAIN_ID))
}

// ---------
// | Tests |
// ---------

#[tokio::test]
async fn test_dev_network_uses_first_three_signers() -> Result<()> {
    let signers = addresses(1, 5);
    let engine = MockEngine {
        signers: signers.clone(),
        ..Default::default()
    };
    let verifier = MockVerifier::default();

    let network = NetworkContext::new("hardhat", None);
    let result =
        deploy_multisig(&network, &DeployConfig::default(), &engine, Some(&verifier)).await?;

    assert_eq!(result.address, DEPLOYED_ADDRESS);

    let deployments = engine.deployments.borrow();
    assert_eq!(deployments.len(), 1);
    let (args, confirmations) = &deployments[0];
    assert_eq!(args.accounts.addresses(), &signers[..3]);
    assert_eq!(args.threshold, 2);
    assert_eq!(*confirmations, 1);

    assert!(verifier.verifications.borrow().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_dev_network_needs_no_verifier() -> Result<()> {
    let engine = MockEngine {
        signers: addresses(1, 3),
        ..Default::default()
    };

    let network = NetworkContext::new("localhost", None);
    deploy_multisig::<_, MockVerifier>(&network, &DeployConfig::default(), &engine, None).await?;

    assert_eq!(engine.deployments.borrow().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_live_network_deploys_and_verifies() -> Result<()> {
    let owners = addresses(1, 6);
    let config = live_config(owners.clone());
    let engine = MockEngine::default();
    let verifier = MockVerifier::default();

    let result = deploy_multisig(&live_network(), &config, &engine, Some(&verifier)).await?;
    assert_eq!(result.confirmations, 5);

    let deployments = engine.deployments.borrow();
    let (args, confirmations) = &deployments[0];
    assert_eq!(args.accounts.addresses(), owners.as_slice());
    assert_eq!(args.threshold, 4);
    assert_eq!(*confirmations, 5);

    let verifications = verifier.verifications.borrow();
    assert_eq!(verifications.len(), 1);
    assert_eq!(verifications[0].0, DEPLOYED_ADDRESS);
    assert_eq!(&verifications[0].1, args);
    Ok(())
}

#[tokio::test]
async fn test_unknown_chain_defaults_to_one_confirmation() -> Result<()> {
    let config = live_config(addresses(1, 3));
    let engine = MockEngine::default();
    let verifier = MockVerifier::default();

    let network = NetworkContext::new("holesky", Some(17000));
    deploy_multisig(&network, &config, &engine, Some(&verifier)).await?;

    assert_eq!(engine.deployments.borrow()[0].1, 1);
    Ok(())
}

#[tokio::test]
async fn test_too_few_dev_signers() {
    let engine = MockEngine {
        signers: addresses(1, 2),
        ..Default::default()
    };

    let network = NetworkContext::new("hardhat", None);
    let res =
        deploy_multisig::<_, MockVerifier>(&network, &DeployConfig::default(), &engine, None)
            .await;

    assert!(matches!(
        res,
        Err(ScriptError::InsufficientSigners {
            required: 3,
            available: 2
        })
    ));
    assert!(engine.deployments.borrow().is_empty());
}

#[tokio::test]
async fn test_invalid_live_accounts_rejected_before_deploying() {
    let verifier = MockVerifier::default();

    let engine = MockEngine::default();
    let res = deploy_multisig(&live_network(), &live_config(vec![]), &engine, Some(&verifier)).await;
    assert!(matches!(res, Err(ScriptError::EmptyAccountSet)));
    assert!(engine.deployments.borrow().is_empty());

    let engine = MockEngine::default();
    let res = deploy_multisig(
        &live_network(),
        &live_config(addresses(1, 1)),
        &engine,
        Some(&verifier),
    )
    .await;
    assert!(matches!(
        res,
        Err(ScriptError::ThresholdTooLow { num_accounts: 1 })
    ));
    assert!(engine.deployments.borrow().is_empty());
    assert!(verifier.verifications.borrow().is_empty());
}

#[tokio::test]
async fn test_live_network_requires_verifier() {
    let engine = MockEngine::default();

    let res = deploy_multisig::<_, MockVerifier>(
        &live_network(),
        &live_config(addresses(1, 3)),
        &engine,
        None,
    )
    .await;

    assert!(matches!(res, Err(ScriptError::VerificationConfig(_))));
    assert!(engine.deployments.borrow().is_empty());
}

#[tokio::test]
async fn test_deploy_failure_skips_verification() {
    let engine = MockEngine {
        fail: true,
        ..Default::default()
    };
    let verifier = MockVerifier::default();

    let res = deploy_multisig(
        &live_network(),
        &live_config(addresses(1, 3)),
        &engine,
        Some(&verifier),
    )
    .await;

    let err = res.unwrap_err();
    assert!(matches!(err, ScriptError::ContractDeployment(_)));
    assert_eq!(err.deployed_address(), None);
    assert!(verifier.verifications.borrow().is_empty());
}

#[tokio::test]
async fn test_verify_failure_reports_deployed_address() {
    let engine = MockEngine::default();
    let verifier = MockVerifier {
        fail: true,
        ..Default::default()
    };

    let res = deploy_multisig(
        &live_network(),
        &live_config(addresses(1, 3)),
        &engine,
        Some(&verifier),
    )
    .await;

    let err = res.unwrap_err();
    assert!(matches!(err, ScriptError::Verification { .. }));
    assert_eq!(err.deployed_address(), Some(DEPLOYED_ADDRESS));
    assert_eq!(engine.deployments.borrow().len(), 1);
}

#[test]
fn test_tag_selection() {
    assert!(should_run(&[]));
    assert!(should_run(&["multisig".to_string()]));
    assert!(should_run(&["token".to_string(), "main".to_string()]));
    assert!(!should_run(&["token".to_string()]));
}
