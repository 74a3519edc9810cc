//! Definitions of Solidity interfaces used during deployment

use alloy_sol_types::sol;

sol! {
    /// The multisig wallet, owned by a fixed set of accounts
    contract MultiSigWallet {
        /// Sets the owners and the number of approvals a transaction needs
        constructor(uint256 numConfirmationsRequired, address[] owners);
    }
}
