// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Shared application state.
//!
//! Services are constructed once here and injected into the request layer;
//! there are no process-wide singletons.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::balance::{BalanceError, BalanceService, EvmBalanceFetcher};
use crate::chains::ChainRegistry;
use crate::config::Config;
use crate::mailer::{Mailer, MailerError};
use crate::store::InMemoryStore;
use crate::wallet::WalletService;

/// State construction failures. Fatal; the process cannot serve without a
/// working fetcher and mailer.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Balance fetcher initialization failed: {0}")]
    Balance(#[from] BalanceError),

    #[error("Mailer initialization failed: {0}")]
    Mailer(#[from] MailerError),
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub wallets: Arc<WalletService>,
    pub balances: Arc<BalanceService>,
    pub registry: ChainRegistry,
    pub mailer: Arc<Mailer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, StateError> {
        let registry = ChainRegistry::new();
        let evm = Arc::new(EvmBalanceFetcher::new(registry.clone())?);
        let mailer = Mailer::from_config(config.mailer.clone())?;

        Ok(Self {
            store: Arc::new(RwLock::new(InMemoryStore::new())),
            wallets: Arc::new(WalletService::new()),
            balances: Arc::new(BalanceService::new(evm)),
            registry,
            mailer: Arc::new(mailer),
            config: Arc::new(config),
        })
    }
}
