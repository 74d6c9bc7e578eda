use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Parser)]
#[clap(name="futurely")]
#[clap(about="futurely places and inspects orders on Binance USDⓈ-M futures (testnet unless --live)", long_about=None)]
pub struct CommandlineArgs {
    /// Execute against production instead of testnet
    #[clap(long, global=true)]
    pub live: bool,

    /// Override the exchange base url (takes precedence over --live).
    /// A path prefix such as https://proxy.local/binance is kept.
    #[clap(long, global=true)]
    pub base_url: Option<String>,

    /// Per-request deadline in seconds
    #[clap(long, global=true, default_value_t=crate::defines::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// recvWindow in milliseconds sent along with every signed request
    #[clap(long, global=true, default_value_t=crate::defines::DEFAULT_RECV_WINDOW_MS)]
    pub recv_window: u64,

    /// Append-only log of every attempted order and api error
    #[clap(long, global=true, default_value=crate::defines::DEFAULT_LOG_FILE)]
    pub log_file: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Place a trade order.
    Trade(TradeArgs),

    /// Check account or order information.
    Check {
        #[clap(subcommand)]
        target: CheckTarget,
    },
}

#[derive(Debug, Args)]
pub struct TradeArgs {
    /// MARKET, LIMIT, STOP_MARKET, STOP_LIMIT, TAKE_PROFIT_MARKET or TAKE_PROFIT_LIMIT.
    /// Anything else is forwarded to the exchange as-is.
    #[clap(value_name="ORDER_TYPE")]
    pub order_type: String,

    /// Trading symbol (e.g. BTCUSDT)
    #[clap(long)]
    pub symbol: String,

    /// BUY or SELL
    #[clap(long)]
    pub side: String,

    #[clap(long)]
    pub quantity: Decimal,

    /// Limit price. Required for LIMIT, STOP_LIMIT and TAKE_PROFIT_LIMIT.
    #[clap(long)]
    pub price: Option<Decimal>,

    /// Trigger price. Required for STOP_* and TAKE_PROFIT_* orders.
    #[clap(long)]
    pub stop_price: Option<Decimal>,
}

#[derive(Debug, Subcommand)]
pub enum CheckTarget {
    /// Check futures wallet balance.
    Balance {
        /// Specific asset to check (e.g. USDT). Shows all non-zero balances if omitted.
        #[clap(long)]
        asset: Option<String>,
    },

    /// Check a specific order's status.
    Order {
        #[clap(long)]
        symbol: String,

        #[clap(long)]
        order_id: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

/// Order types with local parameter requirements.
/// `Other` carries any upper-cased value we don't know about; the exchange
/// decides whether it is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
    StopMarket,
    StopLimit,
    TakeProfitMarket,
    TakeProfitLimit,
    Other(String),
}

/// Logical order as the user asked for it, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: String,
    pub order_type: String,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
}

/// Flattened parameter set sent to the order endpoint.
/// Decimal fields are already normalized (no trailing zeros).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOrderParams {
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: String,
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<String>,
}

/// Raw exchange payload for order placement or order query, passed through untouched.
pub type OrderResult = serde_json::Value;

/// One entry of the futures wallet balance listing.
// https://binance-docs.github.io/apidocs/futures/en/#futures-account-balance-v2-user_data
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesBalance {
    #[serde(default)]
    pub account_alias: String,
    pub asset: String,
    pub balance: Decimal,
    #[serde(default)]
    pub cross_wallet_balance: Option<Decimal>,
    #[serde(default)]
    pub cross_un_pnl: Option<Decimal>,
    #[serde(default)]
    pub available_balance: Option<Decimal>,
    #[serde(default)]
    pub max_withdraw_amount: Option<Decimal>,
    #[serde(default)]
    pub margin_available: Option<bool>,
    #[serde(default)]
    pub update_time: Option<u64>,
}

/// Error body returned by Binance alongside non-2xx statuses.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct BinanceErrorResponse {
    pub code: i64,
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BalanceSnapshot {
    /// Asset to balance, zero balances left out.
    All(BTreeMap<String, Decimal>),

    /// The record matching the requested asset.
    Asset(FuturesBalance),

    /// Requested asset is not in the wallet listing.
    NotFound(String),
}

/// HTTP verb of a request to the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Unsigned request as composed by the gateway. The transport adds
/// timestamp, recvWindow, signature and api key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: &'static str,
    pub params: Vec<(String, String)>,
}

/// `TradingContext` holds everything needed to talk to the exchange for one
/// invocation. Built once in `main` and handed to the transport.
#[derive(Debug, Clone)]
pub struct TradingContext {
    /// Read from BINANCE_TESTNET_API_KEY or BINANCE_API_KEY depending on network
    pub api_key: String,

    /// Read from BINANCE_TESTNET_API_SECRET or BINANCE_API_SECRET depending on network
    pub api_secret: String,

    pub base_url: url::Url,

    /// Whether or not to execute API against testnet
    pub use_testnet: bool,

    pub timeout: Duration,

    pub recv_window_ms: u64,
}
