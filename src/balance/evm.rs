// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Native balance queries against EVM chains.
//!
//! One HTTP provider per registry chain, built once at startup and reused
//! across requests; the underlying RPC calls are stateless so the handles
//! are safe for concurrent use.

use std::collections::HashMap;
use std::str::FromStr;

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
};

use super::{BalanceEntry, BalanceError};
use crate::chains::{ChainConfig, ChainRegistry};

/// HTTP provider type (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Balance fetcher over the registry's EVM chains.
pub struct EvmBalanceFetcher {
    registry: ChainRegistry,
    providers: HashMap<u64, HttpProvider>,
}

impl EvmBalanceFetcher {
    /// Build one provider per registry chain.
    pub fn new(registry: ChainRegistry) -> Result<Self, BalanceError> {
        let mut providers = HashMap::new();
        for chain in registry.list_all() {
            let url: url::Url = chain
                .rpc_url
                .parse()
                .map_err(|e: url::ParseError| BalanceError::InvalidRpcUrl(e.to_string()))?;
            providers.insert(chain.chain_id, ProviderBuilder::new().connect_http(url));
        }
        Ok(Self {
            registry,
            providers,
        })
    }

    /// Get the native balance of `address` on one chain.
    ///
    /// Fails with `UnsupportedChain` for unregistered ids and wraps RPC
    /// failures into `BalanceFetchFailed` with chain and address context.
    /// Not retried.
    pub async fn get_balance(
        &self,
        address: &str,
        chain_id: u64,
    ) -> Result<BalanceEntry, BalanceError> {
        let chain = self
            .registry
            .lookup(chain_id)
            .ok_or(BalanceError::UnsupportedChain(chain_id))?;
        let provider = self
            .providers
            .get(&chain_id)
            .ok_or(BalanceError::UnsupportedChain(chain_id))?;

        let addr = Address::from_str(address)
            .map_err(|e| BalanceError::InvalidAddressFormat(e.to_string()))?;

        let balance = provider.get_balance(addr).await.map_err(|e| {
            BalanceError::BalanceFetchFailed {
                chain_id,
                address: address.to_string(),
                cause: e.to_string(),
            }
        })?;

        Ok(native_entry(chain, balance))
    }

    /// Get native balances across several chains, in caller order (registry
    /// order when `chain_ids` is `None`).
    ///
    /// Chains are queried sequentially and independently; a failed chain is
    /// logged and omitted from the result, never failing the aggregate call.
    pub async fn get_balances(
        &self,
        address: &str,
        chain_ids: Option<&[u64]>,
    ) -> Vec<BalanceEntry> {
        let ids: Vec<u64> = match chain_ids {
            Some(ids) => ids.to_vec(),
            None => self
                .registry
                .list_all()
                .iter()
                .map(|c| c.chain_id)
                .collect(),
        };

        let mut entries = Vec::new();
        for chain_id in ids {
            match self.get_balance(address, chain_id).await {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(
                        chain_id,
                        address,
                        error = %e,
                        "Omitting chain after balance query failure"
                    );
                }
            }
        }
        entries
    }
}

fn native_entry(chain: &ChainConfig, balance: U256) -> BalanceEntry {
    BalanceEntry {
        balance: balance.to_string(),
        formatted: format_balance(balance, chain.native_currency.decimals),
        chain_id: chain.chain_id,
        currency: chain.native_currency.symbol.to_string(),
        decimals: chain.native_currency.decimals,
        chain_name: chain.name.to_string(),
    }
}

/// Format a smallest-unit balance with the specified number of decimals,
/// trimming trailing zeros.
fn format_balance(balance: U256, decimals: u8) -> String {
    if balance.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = balance / divisor;
    let remainder = balance % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{whole}.{trimmed}")
    }
}
