//! Scripts for deploying the multisig wallet contract.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod errors;
mod solidity;
pub mod types;
pub mod utils;
pub mod verify;
