/// Binance USDⓈ-M futures testnet base url
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

/// Binance USDⓈ-M futures production base url
pub const LIVE_BASE_URL: &str = "https://fapi.binance.com";

// https://binance-docs.github.io/apidocs/futures/en/#account-information-v2-user_data
pub const ACCOUNT_ENDPOINT: &str = "/fapi/v2/account";
// https://binance-docs.github.io/apidocs/futures/en/#futures-account-balance-v2-user_data
pub const BALANCE_ENDPOINT: &str = "/fapi/v2/balance";
// https://binance-docs.github.io/apidocs/futures/en/#new-order-trade
// also serves query order with GET
pub const ORDER_ENDPOINT: &str = "/fapi/v1/order";

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

pub const TESTNET_API_KEY_ENV: &str = "BINANCE_TESTNET_API_KEY";
pub const TESTNET_API_SECRET_ENV: &str = "BINANCE_TESTNET_API_SECRET";
pub const LIVE_API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const LIVE_API_SECRET_ENV: &str = "BINANCE_API_SECRET";

/// Only time-in-force policy we attach to limit-family orders
pub const TIME_IN_FORCE_GTC: &str = "GTC";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Milliseconds the exchange accepts a signed request after its timestamp
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;

pub const DEFAULT_LOG_FILE: &str = "trading_bot.log";
