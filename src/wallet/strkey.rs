// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Stellar StrKey encoding.
//!
//! StrKey wraps a 32-byte ed25519 key with a version byte and a CRC16-XModem
//! checksum, Base32 encoded. Account IDs carry version byte 48 (`G` prefix),
//! seeds carry version byte 144 (`S` prefix).

use data_encoding::BASE32;

/// Version byte for account IDs (`G` prefix).
const VERSION_ACCOUNT_ID: u8 = 6 << 3;

/// Version byte for seeds (`S` prefix).
const VERSION_SEED: u8 = 18 << 3;

/// StrKey decoding errors.
#[derive(Debug, thiserror::Error)]
pub enum StrKeyError {
    #[error("Invalid Base32 encoding: {0}")]
    InvalidEncoding(String),

    #[error("Invalid StrKey length: expected 35 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Unexpected version byte: {0}")]
    InvalidVersion(u8),

    #[error("Checksum mismatch")]
    InvalidChecksum,
}

/// Encode a 32-byte ed25519 public key as a `G...` account ID.
pub fn encode_account_id(public_key: &[u8; 32]) -> String {
    encode(VERSION_ACCOUNT_ID, public_key)
}

/// Encode a 32-byte ed25519 seed as an `S...` secret.
pub fn encode_seed(seed: &[u8; 32]) -> String {
    encode(VERSION_SEED, seed)
}

/// Decode an `S...` secret back into its 32-byte ed25519 seed.
pub fn decode_seed(secret: &str) -> Result<[u8; 32], StrKeyError> {
    decode(VERSION_SEED, secret)
}

fn encode(version: u8, payload: &[u8; 32]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + 2);
    data.push(version);
    data.extend_from_slice(payload);

    let checksum = crc16_xmodem(&data);
    data.push((checksum & 0xFF) as u8);
    data.push((checksum >> 8) as u8);

    BASE32.encode(&data)
}

fn decode(version: u8, encoded: &str) -> Result<[u8; 32], StrKeyError> {
    let data = BASE32
        .decode(encoded.trim().as_bytes())
        .map_err(|e| StrKeyError::InvalidEncoding(e.to_string()))?;

    if data.len() != 35 {
        return Err(StrKeyError::InvalidLength(data.len()));
    }

    if data[0] != version {
        return Err(StrKeyError::InvalidVersion(data[0]));
    }

    let expected = crc16_xmodem(&data[..33]);
    let actual = u16::from(data[33]) | (u16::from(data[34]) << 8);
    if expected != actual {
        return Err(StrKeyError::InvalidChecksum);
    }

    let mut payload = [0u8; 32];
    payload.copy_from_slice(&data[1..33]);
    Ok(payload)
}

/// CRC16-XModem checksum over the version byte and payload.
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
