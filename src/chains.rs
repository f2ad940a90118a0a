// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Chain registry: static connection parameters for every supported EVM chain.
//!
//! The registry is pure data. It is loaded once at process start and never
//! mutated; lookups either return a config or surface `UnsupportedChain` at
//! the caller (see `balance::BalanceError`).

use serde::Serialize;
use utoipa::ToSchema;

/// Native currency metadata for a chain.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NativeCurrency {
    /// Currency name (e.g., "Ether")
    pub name: &'static str,
    /// Currency symbol (e.g., "ETH")
    pub symbol: &'static str,
    /// Decimal precision of the smallest unit
    pub decimals: u8,
}

/// Immutable per-chain connection descriptor.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChainConfig {
    /// Chain ID (unique within the registry)
    pub chain_id: u64,
    /// Network name for display
    pub name: &'static str,
    /// RPC endpoint URL
    pub rpc_url: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
    /// Whether this is a test network
    pub testnet: bool,
    /// Native currency descriptor
    pub native_currency: NativeCurrency,
}

const ETHER: NativeCurrency = NativeCurrency {
    name: "Ether",
    symbol: "ETH",
    decimals: 18,
};

/// Chains supported by this deployment.
pub const SUPPORTED_CHAINS: &[ChainConfig] = &[
    ChainConfig {
        chain_id: 1,
        name: "Ethereum",
        rpc_url: "https://eth.llamarpc.com",
        explorer_url: "https://etherscan.io",
        testnet: false,
        native_currency: ETHER,
    },
    ChainConfig {
        chain_id: 10,
        name: "OP Mainnet",
        rpc_url: "https://mainnet.optimism.io",
        explorer_url: "https://optimistic.etherscan.io",
        testnet: false,
        native_currency: ETHER,
    },
    ChainConfig {
        chain_id: 56,
        name: "BNB Smart Chain",
        rpc_url: "https://bsc-dataseed.binance.org",
        explorer_url: "https://bscscan.com",
        testnet: false,
        native_currency: NativeCurrency {
            name: "BNB",
            symbol: "BNB",
            decimals: 18,
        },
    },
    ChainConfig {
        chain_id: 137,
        name: "Polygon",
        rpc_url: "https://polygon-rpc.com",
        explorer_url: "https://polygonscan.com",
        testnet: false,
        native_currency: NativeCurrency {
            name: "POL",
            symbol: "POL",
            decimals: 18,
        },
    },
    ChainConfig {
        chain_id: 8453,
        name: "Base",
        rpc_url: "https://mainnet.base.org",
        explorer_url: "https://basescan.org",
        testnet: false,
        native_currency: ETHER,
    },
    ChainConfig {
        chain_id: 42161,
        name: "Arbitrum One",
        rpc_url: "https://arb1.arbitrum.io/rpc",
        explorer_url: "https://arbiscan.io",
        testnet: false,
        native_currency: ETHER,
    },
    ChainConfig {
        chain_id: 11155111,
        name: "Sepolia",
        rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
        explorer_url: "https://sepolia.etherscan.io",
        testnet: true,
        native_currency: ETHER,
    },
];

/// Lookup table over a fixed set of chain configs.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: &'static [ChainConfig],
}

impl ChainRegistry {
    /// Registry over the chains supported by this deployment.
    pub fn new() -> Self {
        Self {
            chains: SUPPORTED_CHAINS,
        }
    }

    /// Registry over an explicit chain table (used by tests).
    pub fn with_chains(chains: &'static [ChainConfig]) -> Self {
        Self { chains }
    }

    /// Look up a chain config by chain ID.
    pub fn lookup(&self, chain_id: u64) -> Option<&'static ChainConfig> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    /// All registered chains, in registry order.
    pub fn list_all(&self) -> &'static [ChainConfig] {
        self.chains
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_matching_chain_id_for_every_entry() {
        let registry = ChainRegistry::new();
        for chain in registry.list_all() {
            let found = registry.lookup(chain.chain_id).expect("registered chain");
            assert_eq!(found.chain_id, chain.chain_id);
        }
    }

    #[test]
    fn lookup_unknown_chain_returns_none() {
        let registry = ChainRegistry::new();
        assert!(registry.lookup(999999).is_none());
    }

    #[test]
    fn chain_ids_are_unique() {
        let mut ids: Vec<u64> = SUPPORTED_CHAINS.iter().map(|c| c.chain_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), SUPPORTED_CHAINS.len());
    }

    #[test]
    fn registry_order_is_deterministic() {
        let a: Vec<u64> = ChainRegistry::new()
            .list_all()
            .iter()
            .map(|c| c.chain_id)
            .collect();
        let b: Vec<u64> = ChainRegistry::new()
            .list_all()
            .iter()
            .map(|c| c.chain_id)
            .collect();
        assert_eq!(a, b);
    }
}
