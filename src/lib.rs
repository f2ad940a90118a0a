// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Crossledger - Custodial Multi-Chain Wallet Service
//!
//! This crate provides a custodial wallet backend spanning EVM chains and
//! Stellar: key generation, recovery and import, OTP-verified onboarding,
//! and native balance aggregation across chains.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Tenant authentication (`x-app-id` header)
//! - `wallet` - Key derivation per chain family
//! - `balance` - Balance aggregation (EVM JSON-RPC, Stellar Horizon)
//! - `store` - In-memory wallet and OTP persistence

pub mod api;
pub mod auth;
pub mod balance;
pub mod chains;
pub mod config;
pub mod error;
pub mod mailer;
pub mod models;
pub mod otp;
pub mod state;
pub mod store;
pub mod wallet;
