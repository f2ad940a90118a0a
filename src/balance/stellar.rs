// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Crossledger

//! Balance queries against Stellar Horizon.
//!
//! A fetcher session is built per request from a Stellar secret and the
//! requested network variants; the variant set is fixed at construction.
//! Failure policy differs from the EVM path on purpose: a network that
//! cannot be queried contributes a single zero-value placeholder entry
//! instead of being omitted, so callers relying on array length per network
//! keep working. The one exception is the testnet funded-retry path, which
//! contributes no entries when the retry also fails.

use std::time::Duration;

use serde::Deserialize;

use super::{BalanceEntry, BalanceError};
use crate::wallet::stellar::account_id_from_secret;

const HORIZON_MAINNET: &str = "https://horizon.stellar.org";
const HORIZON_TESTNET: &str = "https://horizon-testnet.stellar.org";
const HORIZON_FUTURENET: &str = "https://horizon-futurenet.stellar.org";

/// Testnet faucet. Credits a starting balance to a new account.
const FRIENDBOT_TESTNET: &str = "https://friendbot.stellar.org";

/// Stellar amounts are fixed at 7 decimal places (stroops).
pub const STELLAR_DECIMALS: u8 = 7;

/// Ledger-close settle time after faucet funding, before the retry.
const SETTLE_DELAY: Duration = Duration::from_secs(3);

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// One Stellar network variant resolved for a fetch session.
#[derive(Debug, Clone)]
pub struct StellarNetworkConfig {
    /// Synthetic chain id (mainnet=1, testnet=2, futurenet=3)
    pub chain_id: u64,
    /// Display name
    pub name: String,
    /// Horizon base URL
    pub horizon_url: String,
    /// Faucet base URL; only test networks have one
    pub friendbot_url: Option<String>,
}

/// Resolve a variant name to its network config.
///
/// Unrecognized names fail with `UnsupportedNetwork`.
pub fn resolve_network(name: &str) -> Result<StellarNetworkConfig, BalanceError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "mainnet" => Ok(StellarNetworkConfig {
            chain_id: 1,
            name: "Stellar Mainnet".to_string(),
            horizon_url: HORIZON_MAINNET.to_string(),
            friendbot_url: None,
        }),
        "testnet" => Ok(StellarNetworkConfig {
            chain_id: 2,
            name: "Stellar Testnet".to_string(),
            horizon_url: HORIZON_TESTNET.to_string(),
            friendbot_url: Some(FRIENDBOT_TESTNET.to_string()),
        }),
        "futurenet" => Ok(StellarNetworkConfig {
            chain_id: 3,
            name: "Stellar Futurenet".to_string(),
            horizon_url: HORIZON_FUTURENET.to_string(),
            friendbot_url: None,
        }),
        other => Err(BalanceError::UnsupportedNetwork(other.to_string())),
    }
}

/// Horizon account record (the fields we read).
#[derive(Debug, Deserialize)]
pub struct HorizonAccount {
    pub balances: Vec<HorizonBalance>,
}

/// One balance line on a Horizon account.
#[derive(Debug, Deserialize)]
pub struct HorizonBalance {
    /// Decimal amount, always 7 fractional digits (e.g., "100.0000000")
    pub balance: String,
    /// "native", "credit_alphanum4", "credit_alphanum12", ...
    pub asset_type: String,
    /// Asset code for issued assets; absent for native lumens
    #[serde(default)]
    pub asset_code: Option<String>,
}

enum AccountLoadError {
    NotFound,
    Other(String),
}

impl std::fmt::Display for AccountLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountLoadError::NotFound => write!(f, "account not found"),
            AccountLoadError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

/// Per-request Stellar balance fetcher session.
#[derive(Debug)]
pub struct StellarBalanceFetcher {
    account_id: String,
    networks: Vec<StellarNetworkConfig>,
    http: reqwest::Client,
    settle_delay: Duration,
}

impl StellarBalanceFetcher {
    /// Build a session for `secret` over the named network variants
    /// (defaults to testnet only).
    pub fn new(secret: &str, networks: Option<&[String]>) -> Result<Self, BalanceError> {
        let resolved = match networks {
            Some(names) if !names.is_empty() => names
                .iter()
                .map(|name| resolve_network(name))
                .collect::<Result<Vec<_>, _>>()?,
            _ => vec![resolve_network("testnet")?],
        };
        Self::with_networks(secret, resolved)
    }

    /// Build a session over an explicit network table (used by tests).
    pub fn with_networks(
        secret: &str,
        networks: Vec<StellarNetworkConfig>,
    ) -> Result<Self, BalanceError> {
        let account_id = account_id_from_secret(secret)
            .map_err(|e| BalanceError::InvalidSecret(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| BalanceError::InvalidRpcUrl(e.to_string()))?;

        Ok(Self {
            account_id,
            networks,
            http,
            settle_delay: SETTLE_DELAY,
        })
    }

    /// The `G...` account ID this session queries.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Query each configured network sequentially and merge the entries in
    /// construction order.
    pub async fn get_balances_for_all_networks(&self) -> Vec<BalanceEntry> {
        let mut entries = Vec::new();
        for network in &self.networks {
            entries.extend(self.network_balances(network).await);
        }
        entries
    }

    async fn network_balances(&self, network: &StellarNetworkConfig) -> Vec<BalanceEntry> {
        match self.load_account(network).await {
            Ok(account) => entries_from_account(network, &account),

            // A missing account on a faucet-equipped network gets funded,
            // then retried exactly once after the settle delay.
            Err(AccountLoadError::NotFound) if network.friendbot_url.is_some() => {
                if let Err(e) = self.fund_account(network).await {
                    tracing::warn!(
                        network = %network.name,
                        account_id = %self.account_id,
                        error = %e,
                        "Faucet funding failed"
                    );
                    return Vec::new();
                }

                tokio::time::sleep(self.settle_delay).await;

                match self.load_account(network).await {
                    Ok(account) => entries_from_account(network, &account),
                    Err(e) => {
                        tracing::warn!(
                            network = %network.name,
                            account_id = %self.account_id,
                            error = %e,
                            "Account load failed after faucet funding"
                        );
                        Vec::new()
                    }
                }
            }

            // Everything else (including "not found" on networks without a
            // faucet) yields one zero-value placeholder entry.
            Err(e) => {
                tracing::warn!(
                    network = %network.name,
                    account_id = %self.account_id,
                    error = %e,
                    "Substituting placeholder after Stellar query failure"
                );
                vec![placeholder_entry(network)]
            }
        }
    }

    async fn load_account(
        &self,
        network: &StellarNetworkConfig,
    ) -> Result<HorizonAccount, AccountLoadError> {
        let url = format!("{}/accounts/{}", network.horizon_url, self.account_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AccountLoadError::Other(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AccountLoadError::NotFound);
        }
        if !response.status().is_success() {
            return Err(AccountLoadError::Other(format!(
                "Horizon returned {}",
                response.status()
            )));
        }

        response
            .json::<HorizonAccount>()
            .await
            .map_err(|e| AccountLoadError::Other(e.to_string()))
    }

    async fn fund_account(&self, network: &StellarNetworkConfig) -> Result<(), BalanceError> {
        let Some(friendbot_url) = network.friendbot_url.as_deref() else {
            return Err(BalanceError::FaucetFundingFailed {
                address: self.account_id.clone(),
                cause: format!("{} has no faucet", network.name),
            });
        };

        let response = self
            .http
            .get(friendbot_url)
            .query(&[("addr", self.account_id.as_str())])
            .send()
            .await
            .map_err(|e| BalanceError::FaucetFundingFailed {
                address: self.account_id.clone(),
                cause: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(BalanceError::FaucetFundingFailed {
                address: self.account_id.clone(),
                cause: format!("friendbot returned {}", response.status()),
            });
        }

        tracing::info!(
            network = %network.name,
            account_id = %self.account_id,
            "Funded account via faucet"
        );
        Ok(())
    }
}

/// One entry per balance line on the account. Issued assets are reported at
/// 7 decimals like lumens; Horizon quotes every amount in that precision.
fn entries_from_account(
    network: &StellarNetworkConfig,
    account: &HorizonAccount,
) -> Vec<BalanceEntry> {
    account
        .balances
        .iter()
        .map(|line| {
            let currency = if line.asset_type == "native" {
                "XLM".to_string()
            } else {
                line.asset_code
                    .clone()
                    .unwrap_or_else(|| line.asset_type.clone())
            };
            let stroops = match stroops_from_decimal(&line.balance) {
                Some(stroops) => stroops,
                None => {
                    tracing::warn!(
                        network = %network.name,
                        amount = %line.balance,
                        "Unparseable Horizon amount, reporting zero"
                    );
                    0
                }
            };

            BalanceEntry {
                balance: stroops.to_string(),
                formatted: format_stroops(stroops),
                chain_id: network.chain_id,
                currency,
                decimals: STELLAR_DECIMALS,
                chain_name: network.name.clone(),
            }
        })
        .collect()
}

/// Zero-value entry substituted for an unreachable or missing account.
fn placeholder_entry(network: &StellarNetworkConfig) -> BalanceEntry {
    BalanceEntry {
        balance: "0".to_string(),
        formatted: "0.0000000".to_string(),
        chain_id: network.chain_id,
        currency: "XLM".to_string(),
        decimals: STELLAR_DECIMALS,
        chain_name: network.name.clone(),
    }
}

/// Parse a Horizon decimal amount into stroops (1 XLM = 10^7 stroops).
fn stroops_from_decimal(amount: &str) -> Option<u128> {
    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };

    let mut frac = frac.to_string();
    frac.truncate(STELLAR_DECIMALS as usize);
    while frac.len() < STELLAR_DECIMALS as usize {
        frac.push('0');
    }
    let frac: u128 = frac.parse().ok()?;

    Some(whole * 10u128.pow(STELLAR_DECIMALS as u32) + frac)
}

/// Format stroops as a fixed 7-decimal string.
fn format_stroops(stroops: u128) -> String {
    let divisor = 10u128.pow(STELLAR_DECIMALS as u32);
    format!("{}.{:07}", stroops / divisor, stroops % divisor)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{
        extract::State,
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };

    use super::*;
    use crate::wallet::{NetworkFamily, WalletService};

    fn account_with(lines: Vec<HorizonBalance>) -> HorizonAccount {
        HorizonAccount { balances: lines }
    }

    #[derive(Clone)]
    struct StubCounters {
        account_hits: Arc<AtomicUsize>,
        fund_hits: Arc<AtomicUsize>,
    }

    /// Local Horizon/friendbot stand-in. The account endpoint returns 404
    /// until the faucet has been hit when `fund_credits` is set, otherwise
    /// 404 always.
    async fn spawn_stub(fund_credits: bool) -> (String, StubCounters) {
        let counters = StubCounters {
            account_hits: Arc::new(AtomicUsize::new(0)),
            fund_hits: Arc::new(AtomicUsize::new(0)),
        };

        let account = move |State(c): State<StubCounters>| async move {
            c.account_hits.fetch_add(1, Ordering::SeqCst);
            if fund_credits && c.fund_hits.load(Ordering::SeqCst) > 0 {
                Json(serde_json::json!({
                    "balances": [
                        { "balance": "10000.0000000", "asset_type": "native" }
                    ]
                }))
                .into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        };
        let fund = |State(c): State<StubCounters>| async move {
            c.fund_hits.fetch_add(1, Ordering::SeqCst);
            StatusCode::OK
        };

        let app = Router::new()
            .route("/horizon/accounts/{id}", get(account))
            .route("/friendbot", get(fund))
            .with_state(counters.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), counters)
    }

    fn stub_testnet(base: &str) -> StellarNetworkConfig {
        StellarNetworkConfig {
            chain_id: 2,
            name: "Stellar Testnet".to_string(),
            horizon_url: format!("{base}/horizon"),
            friendbot_url: Some(format!("{base}/friendbot")),
        }
    }

    fn stub_session(base: &str) -> StellarBalanceFetcher {
        let wallet = WalletService::new()
            .generate(NetworkFamily::Stellar, None)
            .unwrap();
        let mut session =
            StellarBalanceFetcher::with_networks(&wallet.private_key, vec![stub_testnet(base)])
                .unwrap();
        session.settle_delay = Duration::ZERO;
        session
    }

    #[tokio::test]
    async fn missing_testnet_account_funds_and_retries_exactly_once() {
        let (base, counters) = spawn_stub(false).await;
        let session = stub_session(&base);

        let entries = session.get_balances_for_all_networks().await;

        // Initial load plus one post-funding retry, one faucet call,
        // nothing more.
        assert_eq!(counters.account_hits.load(Ordering::SeqCst), 2);
        assert_eq!(counters.fund_hits.load(Ordering::SeqCst), 1);
        // Failure after the funded retry contributes no entries, not a
        // placeholder.
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn funded_account_yields_entries_on_retry() {
        let (base, counters) = spawn_stub(true).await;
        let session = stub_session(&base);

        let entries = session.get_balances_for_all_networks().await;

        assert_eq!(counters.account_hits.load(Ordering::SeqCst), 2);
        assert_eq!(counters.fund_hits.load(Ordering::SeqCst), 1);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].currency, "XLM");
        assert_eq!(entries[0].balance, "100000000000");
        assert_eq!(entries[0].chain_id, 2);
    }

    #[tokio::test]
    async fn server_error_yields_placeholder_without_faucet_call() {
        let fund_hits = Arc::new(AtomicUsize::new(0));
        let fund_counter = fund_hits.clone();

        let app = Router::new()
            .route(
                "/horizon/accounts/{id}",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .route(
                "/friendbot",
                get(move || {
                    let fund_counter = fund_counter.clone();
                    async move {
                        fund_counter.fetch_add(1, Ordering::SeqCst);
                        StatusCode::OK
                    }
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let session = stub_session(&format!("http://{addr}"));
        let entries = session.get_balances_for_all_networks().await;

        // A non-404 failure is not a funding trigger; it yields the
        // zero-value placeholder.
        assert_eq!(fund_hits.load(Ordering::SeqCst), 0);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].balance, "0");
        assert_eq!(entries[0].formatted, "0.0000000");
    }

    #[test]
    fn resolve_network_maps_variant_names() {
        assert_eq!(resolve_network("mainnet").unwrap().chain_id, 1);
        assert_eq!(resolve_network("testnet").unwrap().chain_id, 2);
        assert_eq!(resolve_network("futurenet").unwrap().chain_id, 3);
        // Case-insensitive.
        assert_eq!(resolve_network("Testnet").unwrap().chain_id, 2);

        assert!(matches!(
            resolve_network("livenet"),
            Err(BalanceError::UnsupportedNetwork(_))
        ));
    }

    #[test]
    fn only_testnet_has_a_faucet() {
        assert!(resolve_network("mainnet").unwrap().friendbot_url.is_none());
        assert!(resolve_network("testnet").unwrap().friendbot_url.is_some());
        assert!(resolve_network("futurenet")
            .unwrap()
            .friendbot_url
            .is_none());
    }

    #[test]
    fn session_defaults_to_testnet() {
        let wallet = WalletService::new()
            .generate(NetworkFamily::Stellar, None)
            .unwrap();
        let session = StellarBalanceFetcher::new(&wallet.private_key, None).unwrap();
        assert_eq!(session.networks.len(), 1);
        assert_eq!(session.networks[0].chain_id, 2);
        assert_eq!(session.account_id(), wallet.address);
    }

    #[test]
    fn session_rejects_unknown_variant() {
        let wallet = WalletService::new()
            .generate(NetworkFamily::Stellar, None)
            .unwrap();
        let err = StellarBalanceFetcher::new(&wallet.private_key, Some(&["devnet".to_string()]))
            .unwrap_err();
        assert!(matches!(err, BalanceError::UnsupportedNetwork(_)));
    }

    #[test]
    fn session_rejects_invalid_secret() {
        let err = StellarBalanceFetcher::new("not-a-secret", None).unwrap_err();
        assert!(matches!(err, BalanceError::InvalidSecret(_)));
    }

    #[test]
    fn stroops_conversion() {
        assert_eq!(stroops_from_decimal("100.0000000"), Some(1_000_000_000));
        assert_eq!(stroops_from_decimal("0.0000001"), Some(1));
        assert_eq!(stroops_from_decimal("0.0000000"), Some(0));
        assert_eq!(stroops_from_decimal("42"), Some(420_000_000));
        assert_eq!(stroops_from_decimal("bogus"), None);
    }

    #[test]
    fn format_stroops_is_fixed_width() {
        assert_eq!(format_stroops(0), "0.0000000");
        assert_eq!(format_stroops(1), "0.0000001");
        assert_eq!(format_stroops(1_000_000_000), "100.0000000");
        assert_eq!(format_stroops(12_345_678), "1.2345678");
    }

    #[test]
    fn entries_tag_native_as_xlm_and_assets_by_code() {
        let network = resolve_network("mainnet").unwrap();
        let account = account_with(vec![
            HorizonBalance {
                balance: "250.5000000".to_string(),
                asset_type: "native".to_string(),
                asset_code: None,
            },
            HorizonBalance {
                balance: "10.0000000".to_string(),
                asset_type: "credit_alphanum4".to_string(),
                asset_code: Some("USDC".to_string()),
            },
        ]);

        let entries = entries_from_account(&network, &account);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].currency, "XLM");
        assert_eq!(entries[0].balance, "2505000000");
        assert_eq!(entries[0].formatted, "250.5000000");
        assert_eq!(entries[0].chain_id, 1);
        assert_eq!(entries[0].decimals, STELLAR_DECIMALS);
        assert_eq!(entries[0].chain_name, "Stellar Mainnet");

        assert_eq!(entries[1].currency, "USDC");
        assert_eq!(entries[1].balance, "100000000");
        assert_eq!(entries[1].decimals, STELLAR_DECIMALS);
    }

    #[test]
    fn unparseable_amount_reports_zero() {
        let network = resolve_network("mainnet").unwrap();
        let account = account_with(vec![HorizonBalance {
            balance: "not-a-number".to_string(),
            asset_type: "native".to_string(),
            asset_code: None,
        }]);

        let entries = entries_from_account(&network, &account);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].balance, "0");
        assert_eq!(entries[0].formatted, "0.0000000");
    }

    #[test]
    fn placeholder_is_zero_valued_xlm() {
        let network = resolve_network("mainnet").unwrap();
        let entry = placeholder_entry(&network);
        assert_eq!(entry.balance, "0");
        assert_eq!(entry.formatted, "0.0000000");
        assert_eq!(entry.chain_id, 1);
        assert_eq!(entry.currency, "XLM");
        assert_eq!(entry.decimals, 7);
        assert_eq!(entry.chain_name, "Stellar Mainnet");
    }
}
