//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy_primitives::Address;

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading a file
    ReadFile(String),
    /// Error writing a file
    WriteFile(String),
    /// Error parsing the deploy configuration
    ConfigParsing(String),
    /// Source verification is required but not configured
    VerificationConfig(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Fewer local signer identities than needed on a development network
    InsufficientSigners {
        /// The number of signers required
        required: usize,
        /// The number of signers the node exposes
        available: usize,
    },
    /// No owner accounts were configured
    EmptyAccountSet,
    /// The same owner account appears more than once
    DuplicateAccount(Address),
    /// The owner set is too small to yield a nonzero approval threshold
    ThresholdTooLow {
        /// The number of owners
        num_accounts: usize,
    },
    /// Error deploying a contract
    ContractDeployment(String),
    /// The contract was deployed but its source could not be verified
    Verification {
        /// The address of the deployed, unverified contract
        address: Address,
        /// The reason verification failed
        reason: String,
    },
}

impl ScriptError {
    /// The address of a contract that was deployed before the error occurred,
    /// if any
    pub fn deployed_address(&self) -> Option<Address> {
        match self {
            ScriptError::Verification { address, .. } => Some(*address),
            _ => None,
        }
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::ConfigParsing(s) => write!(f, "error parsing deploy config: {}", s),
            ScriptError::VerificationConfig(s) => {
                write!(f, "verification is not configured: {}", s)
            }
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::InsufficientSigners {
                required,
                available,
            } => write!(
                f,
                "need {} local signers, but only {} are available",
                required, available
            ),
            ScriptError::EmptyAccountSet => write!(f, "no owner accounts configured"),
            ScriptError::DuplicateAccount(addr) => {
                write!(f, "owner account {:#x} is listed more than once", addr)
            }
            ScriptError::ThresholdTooLow { num_accounts } => write!(
                f,
                "{} owner account(s) yield an approval threshold of zero",
                num_accounts
            ),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::Verification { address, reason } => write!(
                f,
                "contract deployed at {:#x} but verification failed: {}",
                address, reason
            ),
        }
    }
}

impl Error for ScriptError {}
