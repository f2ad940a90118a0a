// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! One-time passcodes for the email verification flow.
//!
//! Codes are 6 decimal digits, valid for 10 minutes. Only an HMAC-SHA-256
//! of the code (keyed by the server secret, bound to the identifier) is kept
//! at rest.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Codes expire this many minutes after issuance.
pub const OTP_TTL_MINUTES: i64 = 10;

/// Generate a random 6-digit code.
pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{code:06}")
}

/// Expiry timestamp for a code issued now.
pub fn expiry_timestamp() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(OTP_TTL_MINUTES)
}

/// HMAC of a code, bound to the identifier it was issued for.
pub fn hash_code(secret: &str, identifier: &str, code: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(identifier.as_bytes());
    mac.update(b"\x1f");
    mac.update(code.as_bytes());
    alloy::hex::encode(mac.finalize().into_bytes())
}

/// Constant-time verification of a submitted code against the stored hash.
pub fn verify_code(secret: &str, identifier: &str, code: &str, stored_hash: &str) -> bool {
    let Ok(expected) = alloy::hex::decode(stored_hash) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(identifier.as_bytes());
    mac.update(b"\x1f");
    mac.update(code.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_code("secret", "user@example.com", "123456");
        assert!(verify_code("secret", "user@example.com", "123456", &hash));
    }

    #[test]
    fn verify_rejects_wrong_code_identifier_or_secret() {
        let hash = hash_code("secret", "user@example.com", "123456");
        assert!(!verify_code("secret", "user@example.com", "654321", &hash));
        assert!(!verify_code("secret", "other@example.com", "123456", &hash));
        assert!(!verify_code("other", "user@example.com", "123456", &hash));
        assert!(!verify_code("secret", "user@example.com", "123456", "zz"));
    }

    #[test]
    fn expiry_is_in_the_future() {
        assert!(expiry_timestamp() > Utc::now());
    }
}
