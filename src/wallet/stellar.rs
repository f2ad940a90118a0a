// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Stellar key generation and recovery (ed25519).
//!
//! Mnemonic-based derivation here is deliberately non-standard: the seed is
//! the SHA-256 digest of the phrase, not SEP-0005 HD derivation. Wallets
//! derived this way are not recoverable with standard Stellar tooling but
//! existing customer secrets depend on the scheme, so it must not change
//! without a migration path.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use super::{strkey, NetworkFamily, WalletError, WalletInfo};

/// Generate a new Stellar wallet: a fresh random keypair, or a deterministic
/// one when a mnemonic is supplied.
pub(super) fn generate(mnemonic: Option<&str>) -> Result<WalletInfo, WalletError> {
    match mnemonic {
        Some(phrase) => recover(phrase),
        None => {
            let signing_key = SigningKey::generate(&mut OsRng);
            Ok(wallet_info(&signing_key, None))
        }
    }
}

/// Recover a Stellar wallet from a mnemonic. Deterministic.
pub(super) fn recover(phrase: &str) -> Result<WalletInfo, WalletError> {
    let trimmed = phrase.trim();
    if trimmed.is_empty() {
        return Err(WalletError::Derivation("mnemonic is empty".to_string()));
    }

    // The SHA-256 digest of the phrase is used directly as the 32-byte
    // ed25519 seed (see module docs).
    let digest: [u8; 32] = Sha256::digest(trimmed.as_bytes()).into();
    let signing_key = SigningKey::from_bytes(&digest);
    Ok(wallet_info(&signing_key, Some(trimmed.to_string())))
}

/// Import a Stellar wallet from an `S...` secret.
pub(super) fn import(secret: &str) -> Result<WalletInfo, WalletError> {
    let seed = strkey::decode_seed(secret)
        .map_err(|e| WalletError::Derivation(format!("invalid Stellar secret: {e}")))?;
    let signing_key = SigningKey::from_bytes(&seed);
    Ok(wallet_info(&signing_key, None))
}

/// Derive the `G...` account ID controlled by an `S...` secret.
pub fn account_id_from_secret(secret: &str) -> Result<String, strkey::StrKeyError> {
    let seed = strkey::decode_seed(secret)?;
    let signing_key = SigningKey::from_bytes(&seed);
    Ok(strkey::encode_account_id(signing_key.verifying_key().as_bytes()))
}

fn wallet_info(signing_key: &SigningKey, mnemonic: Option<String>) -> WalletInfo {
    let address = strkey::encode_account_id(signing_key.verifying_key().as_bytes());

    WalletInfo {
        // Stellar convention: the account ID doubles as the public key.
        public_key: address.clone(),
        address,
        private_key: strkey::encode_seed(&signing_key.to_bytes()),
        mnemonic,
        network: NetworkFamily::Stellar,
    }
}
