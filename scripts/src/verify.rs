//! Source verification against an Etherscan-compatible block explorer API

use std::{future::Future, time::Duration};

use alloy::transports::http::reqwest::Client;
use alloy_primitives::Address;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    constants::{
        EXPLORER_ALREADY_VERIFIED_RESULT, EXPLORER_CHECK_STATUS_ACTION, EXPLORER_CONTRACT_MODULE,
        EXPLORER_PENDING_RESULT, EXPLORER_STATUS_OK, EXPLORER_VERIFY_ACTION,
        STANDARD_JSON_CODE_FORMAT, VERIFY_STATUS_MAX_ATTEMPTS, VERIFY_STATUS_POLL_INTERVAL_MS,
    },
    errors::ScriptError,
    types::DeploymentArgs,
};

/// A service that verifies the source of a deployed contract
pub trait SourceVerifier {
    /// Submit the source of the contract deployed at `address` with the given
    /// constructor arguments for verification
    fn verify(
        &self,
        address: Address,
        args: &DeploymentArgs,
    ) -> impl Future<Output = Result<(), ScriptError>>;
}

/// The settings needed to submit a verification request
#[derive(Debug, Clone)]
pub struct VerificationSettings {
    /// The explorer API endpoint
    pub api_url: String,
    /// The explorer API key
    pub api_key: String,
    /// The chain the contract was deployed to
    pub chain_id: u64,
    /// The fully qualified contract name, e.g. `contracts/MultiSigWallet.sol:MultiSigWallet`
    pub contract_name: String,
    /// The full compiler version, e.g. `v0.8.17+commit.8df45f5f`
    pub compiler_version: String,
    /// The standard JSON compiler input the contract was built from
    pub standard_json_input: String,
}

/// A response from the explorer API
#[derive(Debug, Clone, Deserialize)]
struct ExplorerResponse {
    /// `"1"` on success, `"0"` otherwise
    status: String,
    /// A short status message
    message: String,
    /// The request GUID on submission, or a status description
    result: String,
}

/// The state of a verification request as reported by the explorer
#[derive(Debug, Clone, PartialEq, Eq)]
enum VerifyStatus {
    /// The request was accepted or the source verified
    Accepted(String),
    /// The contract had been verified before
    AlreadyVerified,
    /// The explorer has not processed the request yet
    Pending,
    /// The explorer rejected the request
    Failed(String),
}

impl From<ExplorerResponse> for VerifyStatus {
    fn from(resp: ExplorerResponse) -> Self {
        let result_lower = resp.result.to_lowercase();
        if result_lower.contains(EXPLORER_ALREADY_VERIFIED_RESULT) {
            VerifyStatus::AlreadyVerified
        } else if resp.result.contains(EXPLORER_PENDING_RESULT) {
            VerifyStatus::Pending
        } else if resp.status == EXPLORER_STATUS_OK {
            VerifyStatus::Accepted(resp.result)
        } else {
            VerifyStatus::Failed(format!("{}: {}", resp.message, resp.result))
        }
    }
}

/// Verifies contract sources through an Etherscan-compatible explorer API
pub struct EtherscanVerifier {
    /// The HTTP client
    client: Client,
    /// The verification settings
    settings: VerificationSettings,
    /// The delay between status polls
    poll_interval: Duration,
}

impl EtherscanVerifier {
    /// Create a new verifier
    pub fn new(settings: VerificationSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            poll_interval: Duration::from_millis(VERIFY_STATUS_POLL_INTERVAL_MS),
        }
    }

    /// Set the delay between status polls
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Send a request to the explorer and parse its response
    async fn send(&self, request: ExplorerRequest<'_>) -> Result<ExplorerResponse, String> {
        let builder = match request {
            ExplorerRequest::Submit(params) => {
                self.client.post(&self.settings.api_url).form(&params)
            }
            ExplorerRequest::CheckStatus(params) => {
                self.client.get(&self.settings.api_url).query(&params)
            }
        };

        let body = builder
            .send()
            .await
            .map_err(|e| e.to_string())?
            .text()
            .await
            .map_err(|e| e.to_string())?;

        serde_json::from_str(&body).map_err(|e| format!("unexpected explorer response: {e}"))
    }

    /// Submit the verification request, returning the request GUID or `None`
    /// if the contract is already verified
    async fn submit(
        &self,
        address: Address,
        args: &DeploymentArgs,
    ) -> Result<Option<String>, String> {
        let params = self.submit_params(address, args);
        match VerifyStatus::from(self.send(ExplorerRequest::Submit(params)).await?) {
            VerifyStatus::Accepted(guid) => Ok(Some(guid)),
            VerifyStatus::AlreadyVerified => Ok(None),
            VerifyStatus::Pending => Err("explorer returned no request GUID".to_string()),
            VerifyStatus::Failed(reason) => Err(reason),
        }
    }

    /// Build the form parameters of a verification request
    fn submit_params(
        &self,
        address: Address,
        args: &DeploymentArgs,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("chainid", self.settings.chain_id.to_string()),
            ("apikey", self.settings.api_key.clone()),
            ("module", EXPLORER_CONTRACT_MODULE.to_string()),
            ("action", EXPLORER_VERIFY_ACTION.to_string()),
            ("contractaddress", format!("{address:#x}")),
            ("sourceCode", self.settings.standard_json_input.clone()),
            ("codeformat", STANDARD_JSON_CODE_FORMAT.to_string()),
            ("contractname", self.settings.contract_name.clone()),
            ("compilerversion", self.settings.compiler_version.clone()),
            // The misspelling is part of the explorer API
            ("constructorArguements", hex::encode(args.constructor_calldata())),
        ]
    }

    /// Poll the explorer until the request with the given GUID resolves
    async fn await_verification(&self, guid: &str) -> Result<(), String> {
        let params = vec![
            ("chainid", self.settings.chain_id.to_string()),
            ("apikey", self.settings.api_key.clone()),
            ("module", EXPLORER_CONTRACT_MODULE.to_string()),
            ("action", EXPLORER_CHECK_STATUS_ACTION.to_string()),
            ("guid", guid.to_string()),
        ];

        for _ in 0..VERIFY_STATUS_MAX_ATTEMPTS {
            tokio::time::sleep(self.poll_interval).await;

            let resp = self
                .send(ExplorerRequest::CheckStatus(params.clone()))
                .await?;
            match VerifyStatus::from(resp) {
                VerifyStatus::Accepted(_) | VerifyStatus::AlreadyVerified => return Ok(()),
                VerifyStatus::Pending => continue,
                VerifyStatus::Failed(reason) => return Err(reason),
            }
        }

        Err(format!(
            "verification still pending after {} status checks (guid {})",
            VERIFY_STATUS_MAX_ATTEMPTS, guid
        ))
    }
}

/// A request to the explorer API
enum ExplorerRequest<'a> {
    /// A verification submission, sent as a form POST
    Submit(Vec<(&'a str, String)>),
    /// A status check, sent as a GET with query parameters
    CheckStatus(Vec<(&'a str, String)>),
}

impl SourceVerifier for EtherscanVerifier {
    async fn verify(&self, address: Address, args: &DeploymentArgs) -> Result<(), ScriptError> {
        let to_err = |reason: String| ScriptError::Verification { address, reason };

        let guid = match self.submit(address, args).await.map_err(to_err)? {
            Some(guid) => guid,
            None => {
                warn!("Contract at {:#x} is already verified", address);
                return Ok(());
            }
        };

        info!("Verification submitted (guid {}), awaiting result", guid);
        self.await_verification(&guid).await.map_err(to_err)?;
        info!("Contract at {:#x} verified", address);

        Ok(())
    }
}
