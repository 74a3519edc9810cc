//! Utilities for the deploy scripts.

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
    str::FromStr,
};

use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::{Address, Bytes};
use json::JsonValue;
use serde_json::Value;

use crate::{
    constants::{ARTIFACT_BYTECODE_KEY, ARTIFACT_BYTECODE_OBJECT_KEY, DEPLOYMENTS_KEY},
    errors::ScriptError,
};

/// Sets up the client with which to deploy contracts, signing with the given
/// private key against the node at the given RPC url.
///
/// Returns the client along with the address of the deployer.
pub fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<(DynProvider, Address), ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);

    Ok((provider.erased(), deployer))
}

/// Read the creation bytecode from a compiled contract artifact.
///
/// Accepts both the flat `"bytecode": "0x.."` layout and the nested
/// `"bytecode": { "object": "0x.." }` layout.
pub fn read_artifact_bytecode(artifact_path: &Path) -> Result<Bytes, ScriptError> {
    let contents =
        fs::read_to_string(artifact_path).map_err(|e| ScriptError::ReadFile(e.to_string()))?;
    parse_artifact_bytecode(&contents)
}

/// Parse the creation bytecode out of an artifact's JSON contents
pub fn parse_artifact_bytecode(artifact: &str) -> Result<Bytes, ScriptError> {
    let parsed: Value =
        serde_json::from_str(artifact).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode_field = &parsed[ARTIFACT_BYTECODE_KEY];
    let bytecode_hex = bytecode_field
        .as_str()
        .or_else(|| bytecode_field[ARTIFACT_BYTECODE_OBJECT_KEY].as_str())
        .ok_or_else(|| {
            ScriptError::ArtifactParsing("artifact has no bytecode field".to_string())
        })?;

    let bytecode = hex::decode(bytecode_hex.trim_start_matches("0x"))
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(
            "artifact bytecode is empty, is the contract abstract?".to_string(),
        ));
    }

    Ok(Bytes::from(bytecode))
}

/// Read and parse a JSON file
pub fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::ReadFile(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::ReadFile(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadFile(e.to_string()))
}

/// Record a deployed contract address in the deployments file, under the given
/// network and contract key
pub fn write_deployed_address(
    file_path: &Path,
    network: &str,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    parsed_json[DEPLOYMENTS_KEY][network][contract_key] =
        JsonValue::String(format!("{address:#x}"));

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    Ok(())
}
