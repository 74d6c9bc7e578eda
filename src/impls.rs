use crate::defines::*;
use crate::errors::{StartupError, ValidationError};
use crate::types::{CommandlineArgs, OrderType, Side, TradingContext};

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

impl TradingContext {
    /// Build context from process environment and command line flags.
    pub fn from_env(args: &CommandlineArgs) -> Result<TradingContext, StartupError> {
        Self::from_lookup(args, |name| std::env::var(name).ok())
    }

    /// Same as `from_env` but with an injectable variable lookup.
    /// Empty values count as missing.
    pub fn from_lookup<F>(args: &CommandlineArgs, lookup: F) -> Result<TradingContext, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let use_testnet = !args.live;
        let (key_var, secret_var) = if use_testnet {
            (TESTNET_API_KEY_ENV, TESTNET_API_SECRET_ENV)
        } else {
            (LIVE_API_KEY_ENV, LIVE_API_SECRET_ENV)
        };
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(StartupError::MissingCredential(name))
        };
        let api_key = required(key_var)?;
        let api_secret = required(secret_var)?;

        let raw_url = match &args.base_url {
            Some(url) => url.as_str(),
            None if use_testnet => TESTNET_BASE_URL,
            None => LIVE_BASE_URL,
        };
        let mut base_url = url::Url::parse(raw_url).map_err(|source| StartupError::InvalidBaseUrl {
            url: raw_url.to_string(),
            source,
        })?;
        // endpoint paths are joined relative to this, so it must end with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(TradingContext {
            api_key,
            api_secret,
            base_url,
            use_testnet,
            timeout: Duration::from_secs(args.timeout_secs),
            recv_window_ms: args.recv_window,
        })
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(ValidationError::InvalidSide(s.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        })
    }
}

impl OrderType {
    /// Case-insensitive; never fails, unknown values become `Other`.
    pub fn parse(s: &str) -> OrderType {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "MARKET" => OrderType::Market,
            "LIMIT" => OrderType::Limit,
            "STOP_MARKET" => OrderType::StopMarket,
            "STOP_LIMIT" => OrderType::StopLimit,
            "TAKE_PROFIT_MARKET" => OrderType::TakeProfitMarket,
            "TAKE_PROFIT_LIMIT" => OrderType::TakeProfitLimit,
            _ => OrderType::Other(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopMarket => "STOP_MARKET",
            OrderType::StopLimit => "STOP_LIMIT",
            OrderType::TakeProfitMarket => "TAKE_PROFIT_MARKET",
            OrderType::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
            OrderType::Other(s) => s,
        }
    }

    /// LIMIT-family: price plus GTC time-in-force
    pub fn requires_price(&self) -> bool {
        matches!(self, OrderType::Limit | OrderType::StopLimit | OrderType::TakeProfitLimit)
    }

    pub fn requires_stop_price(&self) -> bool {
        matches!(
            self,
            OrderType::StopMarket
                | OrderType::StopLimit
                | OrderType::TakeProfitMarket
                | OrderType::TakeProfitLimit
        )
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
