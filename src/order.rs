//! Order validation and parameter building. Pure, no I/O.

use crate::defines::TIME_IN_FORCE_GTC;
use crate::errors::ValidationError;
use crate::types::{NormalizedOrderParams, OrderRequest, OrderType, Side};

use rust_decimal::Decimal;

/// Validate `request` and flatten it into the parameter set for the order
/// endpoint.
///
/// Price is required (and `timeInForce=GTC` attached) for LIMIT, STOP_LIMIT
/// and TAKE_PROFIT_LIMIT. Stop price is required for every STOP_* and
/// TAKE_PROFIT_* type. A zero price counts as absent. MARKET and unrecognized
/// types carry neither, whatever was supplied. The symbol is only trimmed;
/// whether it names a real instrument is for the exchange to say.
pub fn build_order_params(request: &OrderRequest) -> Result<NormalizedOrderParams, ValidationError> {
    let symbol = request.symbol.trim().to_string();
    if symbol.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }

    let side: Side = request.side.parse()?;
    let order_type = OrderType::parse(&request.order_type);

    if request.quantity <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveQuantity(request.quantity));
    }

    let mut params = NormalizedOrderParams {
        symbol,
        side,
        order_type: order_type.as_str().to_string(),
        quantity: wire_decimal(request.quantity),
        price: None,
        time_in_force: None,
        stop_price: None,
    };

    if order_type.requires_price() {
        let price = present(request.price)
            .ok_or_else(|| ValidationError::MissingPrice(order_type.to_string()))?;
        if price.is_sign_negative() {
            return Err(ValidationError::NegativePrice(price));
        }
        params.price = Some(wire_decimal(price));
        params.time_in_force = Some(TIME_IN_FORCE_GTC);
    }

    if order_type.requires_stop_price() {
        let stop_price = present(request.stop_price)
            .ok_or_else(|| ValidationError::MissingStopPrice(order_type.to_string()))?;
        if stop_price.is_sign_negative() {
            return Err(ValidationError::NegativeStopPrice(stop_price));
        }
        params.stop_price = Some(wire_decimal(stop_price));
    }

    if let OrderType::Other(raw) = &order_type {
        tracing::warn!(order_type = %raw, "order type not recognized locally, forwarding to exchange as-is");
    }

    tracing::debug!(?params, "built order parameters");
    Ok(params)
}

impl NormalizedOrderParams {
    /// Key/value pairs in the order the exchange documents them.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("symbol".to_string(), self.symbol.clone()),
            ("side".to_string(), self.side.to_string()),
            ("type".to_string(), self.order_type.clone()),
            ("quantity".to_string(), self.quantity.clone()),
        ];
        if let Some(price) = &self.price {
            pairs.push(("price".to_string(), price.clone()));
        }
        if let Some(tif) = self.time_in_force {
            pairs.push(("timeInForce".to_string(), tif.to_string()));
        }
        if let Some(stop_price) = &self.stop_price {
            pairs.push(("stopPrice".to_string(), stop_price.clone()));
        }
        pairs
    }
}

fn present(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

fn wire_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(order_type: &str, price: Option<Decimal>, stop_price: Option<Decimal>) -> OrderRequest {
        OrderRequest {
            symbol: "BTCUSDT".to_string(),
            side: "BUY".to_string(),
            order_type: order_type.to_string(),
            quantity: dec!(0.01),
            price,
            stop_price,
        }
    }

    #[test]
    fn limit_family_requires_price() {
        for ty in ["LIMIT", "STOP_LIMIT", "TAKE_PROFIT_LIMIT"] {
            let err = build_order_params(&request(ty, None, Some(dec!(1)))).unwrap_err();
            assert_eq!(err, ValidationError::MissingPrice(ty.to_string()));

            let err = build_order_params(&request(ty, Some(Decimal::ZERO), Some(dec!(1)))).unwrap_err();
            assert_eq!(err, ValidationError::MissingPrice(ty.to_string()));

            let params = build_order_params(&request(ty, Some(dec!(100)), Some(dec!(1)))).unwrap();
            assert_eq!(params.price.as_deref(), Some("100"));
            assert_eq!(params.time_in_force, Some("GTC"));
        }
    }

    #[test]
    fn stop_family_requires_stop_price() {
        for ty in ["STOP_MARKET", "STOP_LIMIT", "TAKE_PROFIT_MARKET", "TAKE_PROFIT_LIMIT"] {
            let err = build_order_params(&request(ty, Some(dec!(100)), None)).unwrap_err();
            assert_eq!(err, ValidationError::MissingStopPrice(ty.to_string()));

            let err = build_order_params(&request(ty, Some(dec!(100)), Some(Decimal::ZERO))).unwrap_err();
            assert_eq!(err, ValidationError::MissingStopPrice(ty.to_string()));
        }

        let params = build_order_params(&request("STOP_MARKET", None, Some(dec!(49000.50)))).unwrap();
        assert_eq!(params.stop_price.as_deref(), Some("49000.5"));
        assert_eq!(params.price, None);
        assert_eq!(params.time_in_force, None);
    }

    #[test]
    fn market_ignores_prices() {
        let bare = build_order_params(&request("MARKET", None, None)).unwrap();
        let priced = build_order_params(&request("MARKET", Some(dec!(1)), Some(dec!(2)))).unwrap();
        assert_eq!(bare, priced);
        assert_eq!(bare.price, None);
        assert_eq!(bare.stop_price, None);
        assert_eq!(bare.time_in_force, None);
    }

    #[test]
    fn limit_order_pairs() {
        let params = build_order_params(&request("limit", Some(dec!(50000)), None)).unwrap();
        let expected: Vec<(String, String)> = [
            ("symbol", "BTCUSDT"),
            ("side", "BUY"),
            ("type", "LIMIT"),
            ("quantity", "0.01"),
            ("price", "50000"),
            ("timeInForce", "GTC"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(params.to_pairs(), expected);
    }

    #[test]
    fn building_twice_is_identical() {
        let req = request("TAKE_PROFIT_LIMIT", Some(dec!(61000.00)), Some(dec!(60500)));
        assert_eq!(build_order_params(&req).unwrap(), build_order_params(&req).unwrap());
    }

    #[test]
    fn side_and_type_are_normalized() {
        let mut req = request("stop_market", None, Some(dec!(48000)));
        req.side = "sell".to_string();
        req.symbol = " BTCUSDT ".to_string();
        let params = build_order_params(&req).unwrap();
        assert_eq!(params.side, Side::Sell);
        assert_eq!(params.symbol, "BTCUSDT");
        assert_eq!(params.order_type, "STOP_MARKET");
    }

    #[test]
    fn symbol_is_forwarded_as_given() {
        for symbol in ["币安人生USDT", "btcusdt", "BTC/USDT"] {
            let mut req = request("MARKET", None, None);
            req.symbol = symbol.to_string();
            assert_eq!(build_order_params(&req).unwrap().symbol, symbol);
        }
    }

    #[test]
    fn unknown_type_passes_through_without_prices() {
        let params = build_order_params(&request("trailing_stop_market", Some(dec!(1)), Some(dec!(2)))).unwrap();
        assert_eq!(params.order_type, "TRAILING_STOP_MARKET");
        assert_eq!(params.price, None);
        assert_eq!(params.stop_price, None);
    }

    #[test]
    fn rejects_bad_quantity_empty_symbol_and_side() {
        let mut req = request("MARKET", None, None);
        req.quantity = Decimal::ZERO;
        assert_eq!(build_order_params(&req), Err(ValidationError::NonPositiveQuantity(Decimal::ZERO)));

        let mut req = request("MARKET", None, None);
        req.symbol = "".to_string();
        assert_eq!(build_order_params(&req), Err(ValidationError::EmptySymbol));

        let mut req = request("MARKET", None, None);
        req.symbol = "   ".to_string();
        assert_eq!(build_order_params(&req), Err(ValidationError::EmptySymbol));

        let mut req = request("MARKET", None, None);
        req.side = "LONG".to_string();
        assert_eq!(build_order_params(&req), Err(ValidationError::InvalidSide("LONG".to_string())));
    }

    #[test]
    fn negative_prices_are_rejected() {
        let err = build_order_params(&request("LIMIT", Some(dec!(-1)), None)).unwrap_err();
        assert_eq!(err, ValidationError::NegativePrice(dec!(-1)));

        let err = build_order_params(&request("STOP_MARKET", None, Some(dec!(-5)))).unwrap_err();
        assert_eq!(err, ValidationError::NegativeStopPrice(dec!(-5)));
    }
}
