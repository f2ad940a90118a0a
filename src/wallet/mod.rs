// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Wallet generation, recovery, and import across chain families.
//!
//! Every operation dispatches on [`NetworkFamily`], a closed enum over the
//! two protocol classes this service supports. Matching is exhaustive; there
//! is no runtime string fallthrough.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod evm;
pub mod stellar;
pub mod strkey;

/// Upper bound on batch generation size.
pub const MAX_BATCH_SIZE: i64 = 100;

/// The protocol class an address or key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NetworkFamily {
    /// EVM-compatible account chains (secp256k1)
    Evm,
    /// Stellar ledger (ed25519)
    Stellar,
}

impl std::fmt::Display for NetworkFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkFamily::Evm => write!(f, "evm"),
            NetworkFamily::Stellar => write!(f, "stellar"),
        }
    }
}

/// Key material produced by generation, recovery, or import.
///
/// Transient value object: the caller decides whether the persistence layer
/// stores it.
#[derive(Debug, Clone)]
pub struct WalletInfo {
    /// On-chain address (`0x...` or `G...`)
    pub address: String,
    /// Public key (uncompressed secp256k1 hex, or the Stellar account ID)
    pub public_key: String,
    /// Private key or secret (`0x...` hex, or `S...` strkey)
    pub private_key: String,
    /// Mnemonic, when one was involved in derivation
    pub mnemonic: Option<String>,
    /// Chain family of this wallet
    pub network: NetworkFamily,
}

/// Wallet operation failures.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Generation, recovery, or import failed; carries the originating cause.
    #[error("Key derivation failed: {0}")]
    Derivation(String),

    /// HD derivation and raw-key derivation disagreed on the address.
    #[error("Derived address does not match its private key")]
    InconsistentDerivation,

    #[error("Batch count must be between 1 and {MAX_BATCH_SIZE}, got {0}")]
    InvalidCount(i64),

    /// Sequential batch generation aborted; no partial results are returned.
    #[error("Batch generation failed at index {index}: {cause}")]
    BatchGenerationFailed { index: usize, cause: String },
}

/// Wallet generator over both chain families.
///
/// Stateless; constructed once and shared via `AppState`.
#[derive(Debug, Clone, Default)]
pub struct WalletService;

impl WalletService {
    pub fn new() -> Self {
        Self
    }

    /// Generate new key material, deriving fresh entropy when no mnemonic is
    /// supplied.
    pub fn generate(
        &self,
        family: NetworkFamily,
        mnemonic: Option<&str>,
    ) -> Result<WalletInfo, WalletError> {
        match family {
            NetworkFamily::Evm => evm::generate(mnemonic),
            NetworkFamily::Stellar => stellar::generate(mnemonic),
        }
    }

    /// Recover key material from a mnemonic. Deterministic; uses the same
    /// derivation paths as generation.
    pub fn recover_from_mnemonic(
        &self,
        mnemonic: &str,
        family: NetworkFamily,
    ) -> Result<WalletInfo, WalletError> {
        match family {
            NetworkFamily::Evm => evm::recover(mnemonic),
            NetworkFamily::Stellar => stellar::recover(mnemonic),
        }
    }

    /// Wrap existing key material without generating new entropy.
    pub fn import_from_secret(
        &self,
        secret: &str,
        family: NetworkFamily,
    ) -> Result<WalletInfo, WalletError> {
        match family {
            NetworkFamily::Evm => evm::import(secret),
            NetworkFamily::Stellar => stellar::import(secret),
        }
    }

    /// Format-only address check; not a checksum or on-network validation.
    pub fn validate_address(&self, address: &str, family: NetworkFamily) -> bool {
        match family {
            NetworkFamily::Evm => {
                address.len() == 42
                    && address.starts_with("0x")
                    && address[2..].chars().all(|c| c.is_ascii_hexdigit())
            }
            NetworkFamily::Stellar => {
                address.len() == 56
                    && address.starts_with('G')
                    && address[1..]
                        .chars()
                        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            }
        }
    }

    /// Generate `count` wallets sequentially. The first failure aborts the
    /// whole batch; no partial results are returned.
    pub fn generate_batch(
        &self,
        count: i64,
        family: NetworkFamily,
    ) -> Result<Vec<WalletInfo>, WalletError> {
        if count <= 0 || count > MAX_BATCH_SIZE {
            return Err(WalletError::InvalidCount(count));
        }

        let mut wallets = Vec::with_capacity(count as usize);
        for index in 0..count as usize {
            let wallet = self.generate(family, None).map_err(|e| {
                WalletError::BatchGenerationFailed {
                    index,
                    cause: e.to_string(),
                }
            })?;
            wallets.push(wallet);
        }
        Ok(wallets)
    }
}
