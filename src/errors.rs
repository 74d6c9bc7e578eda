use rust_decimal::Decimal;
use thiserror::Error;

/// Local rejection of an order request. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Price is required for {0} orders.")]
    MissingPrice(String),

    #[error("Stop Price is required for {0} orders.")]
    MissingStopPrice(String),

    #[error("Symbol must not be empty.")]
    EmptySymbol,

    #[error("Side {0:?} is not one of BUY, SELL.")]
    InvalidSide(String),

    #[error("Quantity must be positive, got {0}.")]
    NonPositiveQuantity(Decimal),

    #[error("Price must not be negative, got {0}.")]
    NegativePrice(Decimal),

    #[error("Stop Price must not be negative, got {0}.")]
    NegativeStopPrice(Decimal),
}

/// Anything reported by the exchange or the transport beneath it.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Exchange answered with its `{code, msg}` error body.
    #[error("exchange rejected request (http {status}, code {code}): {msg}")]
    Api { status: u16, code: i64, msg: String },

    /// Non-success status without a recognizable error body.
    #[error("unexpected http status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport failure: {0}")]
    Transport(#[from] isahc::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to assemble request: {0}")]
    Request(String),
}

/// Failure of a single gateway operation.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Conditions that abort the process before any command runs.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("required env variable {0} is not set")]
    MissingCredential(&'static str),

    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl { url: String, source: url::ParseError },

    #[error("failed to build http client: {0}")]
    HttpClient(#[source] isahc::Error),

    #[error("exchange connection check failed: {0}")]
    Connection(#[source] RemoteError),

    #[error("failed to open log file {path:?}: {source}")]
    LogFile { path: String, source: std::io::Error },
}
