//! Constants used in the deploy scripts

/// The chain ID assumed when neither the CLI nor the deploy configuration
/// supplies one.
///
/// This is the chain ID of a local Hardhat / Anvil development node.
pub const DEFAULT_CHAIN_ID: u64 = 31337;

/// The number of confirmations to wait for the deployment transaction when the
/// deploy configuration has no entry for the resolved chain ID
pub const DEFAULT_BLOCK_CONFIRMATIONS: u64 = 1;

/// The number of local signer identities used as wallet owners on a
/// development network
pub const NUM_DEV_SIGNERS: usize = 3;

/// The numerator of the approval threshold ratio, `2/3` of the owners
pub const THRESHOLD_NUMERATOR: usize = 2;

/// The denominator of the approval threshold ratio, `2/3` of the owners
pub const THRESHOLD_DENOMINATOR: usize = 3;

/// The network names treated as development networks when the deploy
/// configuration does not override them
pub const DEFAULT_DEVELOPMENT_NETWORKS: [&str; 3] = ["hardhat", "localhost", "anvil"];

/// The tags attached to the multisig deploy script
pub const MULTISIG_DEPLOY_TAGS: [&str; 2] = ["main", "multisig"];

/// The name of the contract being deployed
pub const MULTISIG_CONTRACT_NAME: &str = "MultiSigWallet";

/// The default path of the deploy configuration file
pub const DEFAULT_CONFIG_PATH: &str = "deploy-config.json";

/// The default path of the compiled contract artifact
pub const DEFAULT_ARTIFACT_PATH: &str = "artifacts/MultiSigWallet.json";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default RPC URL, a local development node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The default network name
pub const DEFAULT_NETWORK: &str = "localhost";

/// The default deployer private key, the first default account in an Anvil /
/// Hardhat node
pub const DEFAULT_DEVNET_PKEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The key of the bytecode field in a contract artifact
pub const ARTIFACT_BYTECODE_KEY: &str = "bytecode";

/// The key of the nested bytecode object in a Foundry contract artifact
pub const ARTIFACT_BYTECODE_OBJECT_KEY: &str = "object";

// --------------------------
// | Explorer Verification  |
// --------------------------

/// The explorer API module used for source verification
pub const EXPLORER_CONTRACT_MODULE: &str = "contract";

/// The explorer API action submitting a verification request
pub const EXPLORER_VERIFY_ACTION: &str = "verifysourcecode";

/// The explorer API action checking the status of a verification request
pub const EXPLORER_CHECK_STATUS_ACTION: &str = "checkverifystatus";

/// The code format used when submitting standard JSON compiler input
pub const STANDARD_JSON_CODE_FORMAT: &str = "solidity-standard-json-input";

/// The explorer API status string for a successful request
pub const EXPLORER_STATUS_OK: &str = "1";

/// Substring of the explorer response for a request still being processed
pub const EXPLORER_PENDING_RESULT: &str = "Pending in queue";

/// Substring of the explorer response for an already verified contract
pub const EXPLORER_ALREADY_VERIFIED_RESULT: &str = "already verified";

/// The number of times to poll the explorer for the verification status
pub const VERIFY_STATUS_MAX_ATTEMPTS: usize = 10;

/// The delay between verification status polls, in milliseconds
pub const VERIFY_STATUS_POLL_INTERVAL_MS: u64 = 3_000;
