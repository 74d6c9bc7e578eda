use crate::errors::GatewayError;
use crate::gateway::TradingGateway;
use crate::transport::Transport;
use crate::types::{BalanceSnapshot, CheckTarget, Command, OrderRequest, OrderResult};

use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// What a successfully executed command produced.
#[derive(Debug, PartialEq)]
pub enum CommandOutput {
    Order(OrderResult),
    Balance(BalanceSnapshot),
}

/// Dispatch one parsed command to the gateway.
pub fn run_command<T: Transport>(gateway: &TradingGateway<T>, command: &Command) -> Result<CommandOutput, GatewayError> {
    match command {
        Command::Trade(args) => {
            let request = OrderRequest {
                symbol: args.symbol.clone(),
                side: args.side.clone(),
                order_type: args.order_type.clone(),
                quantity: args.quantity,
                price: args.price,
                stop_price: args.stop_price,
            };
            tracing::info!(order_type = %request.order_type, symbol = %request.symbol, "Processing trade");
            gateway.place_order(&request).map(CommandOutput::Order)
        }
        Command::Check { target: CheckTarget::Balance { asset } } => {
            gateway.get_balance(asset.as_deref()).map(CommandOutput::Balance)
        }
        Command::Check { target: CheckTarget::Order { symbol, order_id } } => {
            gateway.get_order_status(symbol, *order_id).map(CommandOutput::Order)
        }
    }
}

/// Console text for a command outcome, and whether it counts as success.
/// An asset missing from the wallet is reported like any other failure.
pub fn render_result(outcome: &Result<CommandOutput, GatewayError>, log_file: &str) -> (String, bool) {
    match outcome.as_ref().ok().and_then(success_body) {
        Some(body) => (format!("\n--- Operation Successful ---\n{}", body), true),
        None => (render_failure(log_file), false),
    }
}

fn success_body(output: &CommandOutput) -> Option<String> {
    match output {
        CommandOutput::Order(payload) => Some(pretty(payload)),
        CommandOutput::Balance(BalanceSnapshot::All(map)) if map.is_empty() => {
            Some("No assets with a non-zero balance found.".to_string())
        }
        CommandOutput::Balance(BalanceSnapshot::All(map)) => {
            let amounts: BTreeMap<&str, Amount> = map.iter().map(|(asset, v)| (asset.as_str(), Amount(*v))).collect();
            Some(pretty(&amounts))
        }
        CommandOutput::Balance(BalanceSnapshot::Asset(balance)) => Some(pretty(balance)),
        CommandOutput::Balance(BalanceSnapshot::NotFound(_)) => None,
    }
}

/// Balance printed as a JSON number rather than a string.
#[derive(serde::Serialize)]
struct Amount(#[serde(with = "rust_decimal::serde::float")] Decimal);

/// Console text for a failed command. Details only go to the log.
pub fn render_failure(log_file: &str) -> String {
    format!(
        "\n--- Operation Failed ---\nPlease check {} for detailed error information.",
        log_file
    )
}

fn pretty<S: serde::Serialize>(value: &S) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable result: {}>", e))
}
