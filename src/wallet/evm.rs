// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! EVM key generation and recovery.
//!
//! Accounts are derived from a BIP-39 mnemonic through the standard Ethereum
//! HD path (m/44'/60'/0'/0/0). After HD derivation the address is re-derived
//! independently from the raw private key (keccak256 over the uncompressed
//! public key, last 20 bytes) and the two must agree; a mismatch aborts the
//! operation rather than handing out a wallet whose key does not control its
//! address.

use alloy::{
    primitives::{keccak256, Address},
    signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner},
};
use bip39::{Language, Mnemonic};
use k256::ecdsa::SigningKey;
use rand::RngCore;

use super::{NetworkFamily, WalletError, WalletInfo};

/// Account index on the Ethereum derivation path.
const ACCOUNT_INDEX: u32 = 0;

/// Entropy for generated mnemonics (32 bytes = 24 words).
const MNEMONIC_ENTROPY_BYTES: usize = 32;

/// Generate a new EVM wallet, deriving a fresh mnemonic when none is given.
pub(super) fn generate(mnemonic: Option<&str>) -> Result<WalletInfo, WalletError> {
    let phrase = match mnemonic {
        Some(phrase) => phrase.to_string(),
        None => new_mnemonic()?,
    };
    derive(&phrase)
}

/// Recover an EVM wallet from an existing mnemonic. Deterministic.
pub(super) fn recover(mnemonic: &str) -> Result<WalletInfo, WalletError> {
    derive(mnemonic)
}

/// Import an EVM wallet from a raw hex private key (with or without `0x`).
pub(super) fn import(secret: &str) -> Result<WalletInfo, WalletError> {
    let hex_key = secret.trim().strip_prefix("0x").unwrap_or(secret.trim());
    let key_bytes = alloy::hex::decode(hex_key)
        .map_err(|e| WalletError::Derivation(format!("invalid private key hex: {e}")))?;
    let signer = PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| WalletError::Derivation(format!("invalid private key: {e}")))?;

    Ok(wallet_info(&signer, None))
}

fn new_mnemonic() -> Result<String, WalletError> {
    let mut entropy = [0u8; MNEMONIC_ENTROPY_BYTES];
    rand::thread_rng().fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| WalletError::Derivation(format!("mnemonic generation failed: {e}")))?;
    Ok(mnemonic.to_string())
}

fn derive(phrase: &str) -> Result<WalletInfo, WalletError> {
    // BIP-39 checksum validation up front, so a typoed phrase fails loudly
    // instead of deriving an unintended account.
    Mnemonic::parse_in(Language::English, phrase)
        .map_err(|e| WalletError::Derivation(format!("invalid mnemonic: {e}")))?;

    let signer = MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .index(ACCOUNT_INDEX)
        .map_err(|e| WalletError::Derivation(e.to_string()))?
        .build()
        .map_err(|e| WalletError::Derivation(e.to_string()))?;

    // Cross-check: re-derive the address from the raw private key bytes.
    let key_bytes = signer.credential().to_bytes();
    let rederived = address_from_private_key(key_bytes.as_slice())?;
    if rederived != signer.address() {
        return Err(WalletError::InconsistentDerivation);
    }

    Ok(wallet_info(&signer, Some(phrase.to_string())))
}

fn wallet_info(signer: &PrivateKeySigner, mnemonic: Option<String>) -> WalletInfo {
    let key_bytes = signer.credential().to_bytes();
    let public_key = signer.credential().verifying_key().to_encoded_point(false);

    WalletInfo {
        address: signer.address().to_string(),
        public_key: format!("0x{}", alloy::hex::encode(public_key.as_bytes())),
        private_key: format!("0x{}", alloy::hex::encode(key_bytes)),
        mnemonic,
        network: NetworkFamily::Evm,
    }
}

/// Derive an Ethereum address from raw secp256k1 private key bytes:
/// keccak256 over the uncompressed public key (minus the 0x04 prefix),
/// last 20 bytes of the hash.
fn address_from_private_key(key_bytes: &[u8]) -> Result<Address, WalletError> {
    let signing_key = SigningKey::from_slice(key_bytes)
        .map_err(|e| WalletError::Derivation(format!("invalid private key: {e}")))?;
    let public_key = signing_key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&public_key.as_bytes()[1..]);
    Ok(Address::from_slice(&hash[12..]))
}
