// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Balance queries across chains, and the aggregator over both families.
//!
//! Failure policy is per chain family and deliberately asymmetric: the EVM
//! path omits a failed chain from the result, the Stellar path substitutes a
//! zero-value placeholder entry. A partial result is a normal, valid
//! response; one chain's failure never aborts the others.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod evm;
pub mod stellar;

pub use evm::EvmBalanceFetcher;
pub use stellar::{StellarBalanceFetcher, STELLAR_DECIMALS};

/// One balance line item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceEntry {
    /// Raw balance, integer decimal string in the chain's smallest unit
    pub balance: String,
    /// Human-formatted decimal string
    pub formatted: String,
    /// Chain ID (EVM chain id, or the synthetic Stellar network id)
    pub chain_id: u64,
    /// Currency symbol (e.g., "ETH", "XLM", issued asset code)
    pub currency: String,
    /// Decimal precision of the raw balance
    pub decimals: u8,
    /// Network name for display
    pub chain_name: String,
}

/// Balance query failures.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    #[error("Unsupported chain ID: {0}")]
    UnsupportedChain(u64),

    #[error("Unsupported Stellar network: {0}")]
    UnsupportedNetwork(String),

    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Invalid Stellar secret: {0}")]
    InvalidSecret(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Balance fetch failed for {address} on chain {chain_id}: {cause}")]
    BalanceFetchFailed {
        chain_id: u64,
        address: String,
        cause: String,
    },

    #[error("Faucet funding failed for {address}: {cause}")]
    FaucetFundingFailed { address: String, cause: String },
}

/// What to query: an EVM address over chains, or a Stellar secret over
/// network variants.
#[derive(Debug, Clone)]
pub enum BalanceScope {
    Evm {
        address: String,
        /// Defaults to every registry chain, in registry order.
        chain_ids: Option<Vec<u64>>,
    },
    Stellar {
        secret: String,
        /// Defaults to `["testnet"]`.
        networks: Option<Vec<String>>,
    },
}

/// Aggregator over both fetchers.
///
/// Selects the fetcher for the requested family and merges its output; holds
/// no retry or caching logic of its own.
#[derive(Clone)]
pub struct BalanceService {
    evm: Arc<EvmBalanceFetcher>,
}

impl BalanceService {
    pub fn new(evm: Arc<EvmBalanceFetcher>) -> Self {
        Self { evm }
    }

    /// Fetch balances for the requested scope. Per-chain failures follow the
    /// family's policy; only scope-level problems (unknown network variant,
    /// malformed secret) fail the call itself.
    pub async fn balances(&self, scope: BalanceScope) -> Result<Vec<BalanceEntry>, BalanceError> {
        match scope {
            BalanceScope::Evm { address, chain_ids } => {
                Ok(self.evm.get_balances(&address, chain_ids.as_deref()).await)
            }
            BalanceScope::Stellar { secret, networks } => {
                let session = StellarBalanceFetcher::new(&secret, networks.as_deref())?;
                Ok(session.get_balances_for_all_networks().await)
            }
        }
    }

    /// Single-chain EVM balance; surfaces errors instead of omitting.
    pub async fn evm_balance(
        &self,
        address: &str,
        chain_id: u64,
    ) -> Result<BalanceEntry, BalanceError> {
        self.evm.get_balance(address, chain_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::ChainRegistry;

    fn service() -> BalanceService {
        BalanceService::new(Arc::new(
            EvmBalanceFetcher::new(ChainRegistry::new()).unwrap(),
        ))
    }

    #[tokio::test]
    async fn stellar_scope_with_unknown_variant_fails_construction() {
        let err = service()
            .balances(BalanceScope::Stellar {
                secret: "SBADSECRET".to_string(),
                networks: None,
            })
            .await
            .unwrap_err();
        // Bad secret is rejected before any network traffic.
        assert!(matches!(err, BalanceError::InvalidSecret(_)));
    }

    #[tokio::test]
    async fn evm_scope_with_only_unknown_chains_yields_empty_ok() {
        let entries = service()
            .balances(BalanceScope::Evm {
                address: "0x742d35cc6634c0532925a3b844bc9e7595f0beb6".to_string(),
                chain_ids: Some(vec![999999]),
            })
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}
