//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::SolConstructor;
use itertools::Itertools;

use crate::{
    constants::{DEFAULT_CHAIN_ID, THRESHOLD_DENOMINATOR, THRESHOLD_NUMERATOR},
    errors::ScriptError,
    solidity::MultiSigWallet,
};

/// The network a deployment targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    /// The network name, e.g. `localhost` or `sepolia`
    pub name: String,
    /// The chain ID, if the environment supplies one
    pub chain_id: Option<u64>,
}

impl NetworkContext {
    /// Create a new network context
    pub fn new(name: impl Into<String>, chain_id: Option<u64>) -> Self {
        Self {
            name: name.into(),
            chain_id,
        }
    }

    /// The chain ID, falling back to the local development chain ID
    pub fn resolved_chain_id(&self) -> u64 {
        self.chain_id.unwrap_or(DEFAULT_CHAIN_ID)
    }
}

impl Display for NetworkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (chain {})", self.name, self.resolved_chain_id())
    }
}

/// An ordered, non-empty set of distinct wallet owners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSet(Vec<Address>);

impl AccountSet {
    /// Build an account set, rejecting empty lists and duplicate owners
    pub fn new(accounts: Vec<Address>) -> Result<Self, ScriptError> {
        if accounts.is_empty() {
            return Err(ScriptError::EmptyAccountSet);
        }

        if let Some(dup) = accounts.iter().duplicates().next() {
            return Err(ScriptError::DuplicateAccount(*dup));
        }

        Ok(Self(accounts))
    }

    /// The number of owners
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, an account set is never empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The owners, in order
    pub fn addresses(&self) -> &[Address] {
        &self.0
    }
}

impl Display for AccountSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.0.iter().map(|addr| format!("{addr:#x}")).join(", ")
        )
    }
}

/// Compute the approval threshold for `num_accounts` owners, `floor(2n / 3)`
pub fn approval_threshold(num_accounts: usize) -> usize {
    num_accounts * THRESHOLD_NUMERATOR / THRESHOLD_DENOMINATOR
}

/// The constructor arguments of the multisig wallet, `(threshold, owners)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentArgs {
    /// The number of approvals required to execute a transaction
    pub threshold: usize,
    /// The wallet owners
    pub accounts: AccountSet,
}

impl DeploymentArgs {
    /// Assemble the constructor arguments for the given owners
    pub fn new(accounts: AccountSet) -> Result<Self, ScriptError> {
        let threshold = approval_threshold(accounts.len());
        if threshold == 0 {
            return Err(ScriptError::ThresholdTooLow {
                num_accounts: accounts.len(),
            });
        }

        Ok(Self {
            threshold,
            accounts,
        })
    }

    /// ABI-encode the arguments for the wallet constructor
    pub fn constructor_calldata(&self) -> Vec<u8> {
        MultiSigWallet::constructorCall {
            numConfirmationsRequired: U256::from(self.threshold),
            owners: self.accounts.addresses().to_vec(),
        }
        .abi_encode()
    }
}

/// The outcome of a successful deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
    /// The address of the deployed contract
    pub address: Address,
    /// The hash of the deployment transaction
    pub tx_hash: TxHash,
    /// The number of confirmations awaited
    pub confirmations: u64,
    /// The gas used by the deployment transaction
    pub gas_used: u64,
}
