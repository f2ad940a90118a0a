// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! In-memory persistence for wallet records and pending OTPs.
//!
//! Records are keyed by application tenant + normalized end-user identifier
//! + chain family, so one user can hold at most one wallet per family per
//! tenant.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::RngCore;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::error::ApiError;
use crate::wallet::{NetworkFamily, WalletInfo};

/// A persisted custodial wallet.
///
/// The `encrypted_private_key` and `encryption_salt` columns are named for
/// the at-rest encryption scheme this schema anticipates; today the key is
/// stored verbatim and the salt is generated but unused.
#[derive(Debug, Clone)]
pub struct WalletRecord {
    pub id: String,
    pub app_id: String,
    pub identifier: String,
    pub network: NetworkFamily,
    pub address: String,
    pub public_key: String,
    pub encrypted_private_key: String,
    pub encryption_salt: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl WalletRecord {
    /// Build a record from freshly generated key material.
    pub fn from_wallet_info(app_id: &str, identifier: &str, info: &WalletInfo) -> Self {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);

        Self {
            id: Uuid::new_v4().to_string(),
            app_id: app_id.to_string(),
            identifier: identifier.to_string(),
            network: info.network,
            address: info.address.clone(),
            public_key: info.public_key.clone(),
            encrypted_private_key: info.private_key.clone(),
            encryption_salt: alloy::hex::encode(salt),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// An OTP awaiting verification.
#[derive(Debug, Clone)]
pub struct PendingOtp {
    pub otp_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Normalize an end-user identifier (email): NFKC, trimmed, lowercased.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().nfkc().collect::<String>().to_lowercase()
}

#[derive(Default)]
pub struct InMemoryStore {
    wallets: HashMap<(String, String, NetworkFamily), WalletRecord>,
    pending_otps: HashMap<(String, String), PendingOtp>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pending_otp(
        &mut self,
        app_id: &str,
        identifier: &str,
        otp_hash: String,
        expires_at: DateTime<Utc>,
    ) {
        self.pending_otps.insert(
            (app_id.to_string(), identifier.to_string()),
            PendingOtp {
                otp_hash,
                expires_at,
            },
        );
    }

    pub fn pending_otp(&self, app_id: &str, identifier: &str) -> Option<&PendingOtp> {
        self.pending_otps
            .get(&(app_id.to_string(), identifier.to_string()))
    }

    pub fn clear_pending_otp(&mut self, app_id: &str, identifier: &str) {
        self.pending_otps
            .remove(&(app_id.to_string(), identifier.to_string()));
    }

    /// Insert a new wallet record. Fails if the user already holds a wallet
    /// for this family under this tenant.
    pub fn insert_wallet(&mut self, record: WalletRecord) -> Result<(), ApiError> {
        let key = (
            record.app_id.clone(),
            record.identifier.clone(),
            record.network,
        );
        if self.wallets.contains_key(&key) {
            return Err(ApiError::conflict(
                "A wallet already exists for this identifier and network",
            ));
        }
        self.wallets.insert(key, record);
        Ok(())
    }

    pub fn wallet(
        &self,
        app_id: &str,
        identifier: &str,
        network: NetworkFamily,
    ) -> Option<&WalletRecord> {
        self.wallets
            .get(&(app_id.to_string(), identifier.to_string(), network))
    }

    /// All wallets held by one user under one tenant.
    pub fn wallets_for_user(&self, app_id: &str, identifier: &str) -> Vec<WalletRecord> {
        let mut records: Vec<WalletRecord> = self
            .wallets
            .values()
            .filter(|record| record.app_id == app_id && record.identifier == identifier)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        records
    }

    /// Lookup by on-chain address, across tenants.
    pub fn find_by_address(&self, address: &str) -> Option<&WalletRecord> {
        self.wallets
            .values()
            .find(|record| record.address == address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::WalletService;

    fn record(app_id: &str, identifier: &str, network: NetworkFamily) -> WalletRecord {
        let info = WalletService::new().generate(network, None).unwrap();
        WalletRecord::from_wallet_info(app_id, identifier, &info)
    }

    #[test]
    fn normalize_identifier_trims_and_lowercases() {
        assert_eq!(
            normalize_identifier("  User@Example.COM "),
            "user@example.com"
        );
        // NFKC folds compatibility forms (fullwidth letters here).
        assert_eq!(normalize_identifier("ａｂｃ"), "abc");
    }

    #[test]
    fn insert_wallet_rejects_duplicate_family() {
        let mut store = InMemoryStore::new();
        store
            .insert_wallet(record("app", "user@example.com", NetworkFamily::Evm))
            .unwrap();

        let err = store
            .insert_wallet(record("app", "user@example.com", NetworkFamily::Evm))
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::CONFLICT);

        // A different family under the same identifier is fine.
        store
            .insert_wallet(record("app", "user@example.com", NetworkFamily::Stellar))
            .unwrap();
        assert_eq!(store.wallets_for_user("app", "user@example.com").len(), 2);
    }

    #[test]
    fn wallets_are_scoped_by_tenant() {
        let mut store = InMemoryStore::new();
        store
            .insert_wallet(record("app_a", "user@example.com", NetworkFamily::Evm))
            .unwrap();
        store
            .insert_wallet(record("app_b", "user@example.com", NetworkFamily::Evm))
            .unwrap();

        assert_eq!(store.wallets_for_user("app_a", "user@example.com").len(), 1);
        assert!(store
            .wallet("app_a", "user@example.com", NetworkFamily::Stellar)
            .is_none());
    }

    #[test]
    fn find_by_address_returns_record() {
        let mut store = InMemoryStore::new();
        let rec = record("app", "user@example.com", NetworkFamily::Evm);
        let address = rec.address.clone();
        store.insert_wallet(rec).unwrap();

        assert!(store.find_by_address(&address).is_some());
        assert!(store.find_by_address("0xmissing").is_none());
    }

    #[test]
    fn pending_otp_set_get_clear() {
        let mut store = InMemoryStore::new();
        store.set_pending_otp("app", "user@example.com", "hash".to_string(), Utc::now());
        assert!(store.pending_otp("app", "user@example.com").is_some());

        store.clear_pending_otp("app", "user@example.com");
        assert!(store.pending_otp("app", "user@example.com").is_none());
    }

    #[test]
    fn record_from_wallet_info_carries_salt_and_key() {
        let rec = record("app", "user@example.com", NetworkFamily::Stellar);
        assert!(rec.is_active);
        assert_eq!(rec.encryption_salt.len(), 32);
        assert!(rec.encrypted_private_key.starts_with('S'));
    }
}
