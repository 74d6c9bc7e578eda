use crate::defines::*;
use crate::errors::{GatewayError, RemoteError, StartupError};
use crate::order::build_order_params;
use crate::transport::Transport;
use crate::types::{ApiRequest, BalanceSnapshot, FuturesBalance, Method, OrderRequest, OrderResult};

use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Ready-to-use session with the exchange. The only way to obtain one is
/// `connect`, which requires a successful connection check.
pub struct TradingGateway<T: Transport> {
    transport: T,
}

impl<T: Transport> TradingGateway<T> {
    pub fn connect(transport: T) -> Result<TradingGateway<T>, StartupError> {
        let gateway = TradingGateway { transport };
        gateway.check_connection().map_err(StartupError::Connection)?;
        Ok(gateway)
    }

    /// One authenticated account query.
    pub fn check_connection(&self) -> Result<(), RemoteError> {
        let request = ApiRequest {
            method: Method::Get,
            path: ACCOUNT_ENDPOINT,
            params: Vec::new(),
        };
        match self.transport.execute(&request) {
            Ok(_) => {
                tracing::info!("Binance API connection successful.");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Binance API connection failed");
                Err(e)
            }
        }
    }

    /// Validate and submit an order. Validation failures return before any
    /// request is made.
    pub fn place_order(&self, order: &OrderRequest) -> Result<OrderResult, GatewayError> {
        let params = build_order_params(order).map_err(|e| {
            tracing::error!(
                symbol = %order.symbol,
                order_type = %order.order_type,
                error = %e,
                "Failed to place order"
            );
            e
        })?;

        tracing::info!(?params, "Placing order");
        let request = ApiRequest {
            method: Method::Post,
            path: ORDER_ENDPOINT,
            params: params.to_pairs(),
        };
        match self.transport.execute(&request) {
            Ok(response) => {
                tracing::info!(order_type = %params.order_type, %response, "Successfully placed order");
                Ok(response)
            }
            Err(e) => {
                tracing::error!(
                    symbol = %params.symbol,
                    order_type = %params.order_type,
                    error = %e,
                    "Failed to place order"
                );
                Err(e.into())
            }
        }
    }

    /// Fetch the futures wallet and either pick `asset` (case-insensitive) or
    /// summarize all non-zero balances.
    pub fn get_balance(&self, asset: Option<&str>) -> Result<BalanceSnapshot, GatewayError> {
        let request = ApiRequest {
            method: Method::Get,
            path: BALANCE_ENDPOINT,
            params: Vec::new(),
        };
        let balances: Vec<FuturesBalance> = self
            .transport
            .execute(&request)
            .and_then(|body| serde_json::from_value(body).map_err(RemoteError::from))
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to get account balance");
                e
            })?;

        let snapshot = summarize_balances(balances, asset);
        if let BalanceSnapshot::NotFound(missing) = &snapshot {
            tracing::warn!(asset = %missing, "Asset not found in futures account balance");
        }
        Ok(snapshot)
    }

    pub fn get_order_status(&self, symbol: &str, order_id: u64) -> Result<OrderResult, GatewayError> {
        let request = ApiRequest {
            method: Method::Get,
            path: ORDER_ENDPOINT,
            params: vec![
                ("symbol".to_string(), symbol.to_string()),
                ("orderId".to_string(), order_id.to_string()),
            ],
        };
        self.transport.execute(&request).map_err(|e| {
            tracing::error!(order_id, error = %e, "Failed to get order status");
            e.into()
        })
    }
}

fn summarize_balances(balances: Vec<FuturesBalance>, asset: Option<&str>) -> BalanceSnapshot {
    match asset {
        Some(wanted) => balances
            .into_iter()
            .find(|b| b.asset.eq_ignore_ascii_case(wanted.trim()))
            .map(BalanceSnapshot::Asset)
            .unwrap_or_else(|| BalanceSnapshot::NotFound(wanted.to_string())),
        None => BalanceSnapshot::All(
            balances
                .into_iter()
                .filter(|b| b.balance != Decimal::ZERO)
                .map(|b| (b.asset, b.balance.normalize()))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}
