// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::balance::BalanceEntry;
use crate::chains::ChainConfig;
use crate::store::WalletRecord;
use crate::wallet::{NetworkFamily, WalletInfo};

// --- OTP ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct RequestOtpRequest {
    /// End-user email address
    pub identifier: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestOtpResponse {
    pub message: String,
    /// Minutes until the code expires
    pub expires_in_minutes: i64,
}

// --- Wallet lifecycle ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    /// End-user email address
    pub identifier: String,
    /// Verification code previously sent to the identifier
    pub otp: String,
    pub network: NetworkFamily,
    /// Optional mnemonic to derive from instead of generating a fresh one
    pub mnemonic: Option<String>,
}

/// A stored wallet, as exposed over the API. Key material never appears here.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletRecordResponse {
    pub id: String,
    pub identifier: String,
    pub network: NetworkFamily,
    pub address: String,
    pub public_key: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<&WalletRecord> for WalletRecordResponse {
    fn from(record: &WalletRecord) -> Self {
        Self {
            id: record.id.clone(),
            identifier: record.identifier.clone(),
            network: record.network,
            address: record.address.clone(),
            public_key: record.public_key.clone(),
            is_active: record.is_active,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Response to wallet creation. The mnemonic is returned exactly once, here;
/// it is not retrievable afterwards.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateWalletResponse {
    pub wallet: WalletRecordResponse,
    pub mnemonic: Option<String>,
}

// --- Stateless wallet operations ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecoverWalletRequest {
    pub mnemonic: String,
    pub network: NetworkFamily,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportWalletRequest {
    /// Private key (`0x...` hex) or Stellar seed (`S...`)
    pub private_key: String,
    pub network: NetworkFamily,
}

/// Full key material for a derived wallet. Returned only by the stateless
/// recover/import/batch endpoints; nothing here is persisted.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletMaterialResponse {
    pub address: String,
    pub public_key: String,
    pub private_key: String,
    pub mnemonic: Option<String>,
    pub network: NetworkFamily,
}

impl From<WalletInfo> for WalletMaterialResponse {
    fn from(info: WalletInfo) -> Self {
        Self {
            address: info.address,
            public_key: info.public_key,
            private_key: info.private_key,
            mnemonic: info.mnemonic,
            network: info.network,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchGenerateRequest {
    /// Number of wallets to generate (1..=100)
    pub count: i64,
    pub network: NetworkFamily,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchGenerateResponse {
    pub wallets: Vec<WalletMaterialResponse>,
    pub count: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateAddressRequest {
    pub address: String,
    pub network: NetworkFamily,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateAddressResponse {
    pub address: String,
    pub network: NetworkFamily,
    pub valid: bool,
}

// --- Balances ---

#[derive(Debug, Serialize, ToSchema)]
pub struct BalancesResponse {
    pub address: String,
    pub balances: Vec<BalanceEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StellarBalancesRequest {
    /// Stellar seed (`S...`)
    pub secret: String,
    /// Networks to query; defaults to `["testnet"]`
    pub networks: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StellarBalancesResponse {
    pub account_id: String,
    pub balances: Vec<BalanceEntry>,
}

// --- Chains ---

#[derive(Debug, Serialize, ToSchema)]
pub struct ChainsResponse {
    pub chains: Vec<ChainConfig>,
}
