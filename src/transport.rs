//! HTTP seam between the gateway and the exchange.

use crate::defines::API_KEY_HEADER;
use crate::errors::{RemoteError, StartupError};
use crate::types::{ApiRequest, BinanceErrorResponse, Method, TradingContext};

use isahc::config::Configurable;
use isahc::{HttpClient, ReadResponseExt, Request};
use ring::hmac;
use std::time::{SystemTime, UNIX_EPOCH};

/// Performs one round trip for an already composed request and returns the
/// decoded JSON body of a successful response.
pub trait Transport {
    fn execute(&self, request: &ApiRequest) -> Result<serde_json::Value, RemoteError>;
}

/// Signed Binance transport over a blocking isahc client.
pub struct HttpTransport {
    client: HttpClient,
    base_url: url::Url,
    api_key: String,
    signing_key: hmac::Key,
    recv_window_ms: u64,
}

impl HttpTransport {
    pub fn new(ctx: &TradingContext) -> Result<HttpTransport, StartupError> {
        let client = HttpClient::builder()
            .timeout(ctx.timeout)
            .build()
            .map_err(StartupError::HttpClient)?;

        Ok(HttpTransport {
            client,
            base_url: ctx.base_url.clone(),
            api_key: ctx.api_key.clone(),
            signing_key: hmac::Key::new(hmac::HMAC_SHA256, ctx.api_secret.as_bytes()),
            recv_window_ms: ctx.recv_window_ms,
        })
    }

    fn signed_url(&self, request: &ApiRequest) -> Result<url::Url, RemoteError> {
        // relative join keeps any path prefix of the base url
        let mut url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.extend_pairs(request.params.iter());
        query.append_pair("recvWindow", &self.recv_window_ms.to_string());
        query.append_pair("timestamp", &timestamp_ms().to_string());
        let mut query = query.finish();

        let signature = sign(&self.signing_key, &query);
        query.push_str("&signature=");
        query.push_str(&signature);

        url.set_query(Some(&query));
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> Result<serde_json::Value, RemoteError> {
        let url = self.signed_url(request)?;
        let method = match request.method {
            Method::Get => "GET",
            Method::Post => "POST",
        };
        tracing::debug!(method, path = request.path, "sending request");

        let http_request = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .body(())
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        let mut response = self.client.send(http_request)?;
        let status = response.status().as_u16();
        let body = response.text()?;
        decode_response(status, body)
    }
}

/// Turn a raw status and body into the JSON payload or a typed error.
pub fn decode_response(status: u16, body: String) -> Result<serde_json::Value, RemoteError> {
    if !(200..300).contains(&status) {
        return Err(decode_error(status, body));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Map a non-success response to the most specific error we can.
pub fn decode_error(status: u16, body: String) -> RemoteError {
    match serde_json::from_str::<BinanceErrorResponse>(&body) {
        Ok(err) => RemoteError::Api {
            status,
            code: err.code,
            msg: err.msg,
        },
        Err(_) => RemoteError::Http { status, body },
    }
}

/// Hex-encoded HMAC-SHA256 of `payload`, as Binance expects in `signature`.
pub fn sign(key: &hmac::Key, payload: &str) -> String {
    hex::encode(hmac::sign(key, payload.as_bytes()).as_ref())
}

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn signature_matches_binance_documentation() {
        // https://binance-docs.github.io/apidocs/futures/en/#signed-trade-and-user_data-endpoint-security
        let key = hmac::Key::new(
            hmac::HMAC_SHA256,
            b"NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j",
        );
        let payload = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            sign(&key, payload),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn error_body_becomes_api_error() {
        let err = decode_error(400, r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string());
        match err {
            RemoteError::Api { status, code, msg } => {
                assert_eq!(status, 400);
                assert_eq!(code, -1121);
                assert_eq!(msg, "Invalid symbol.");
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = decode_error(502, "<html>bad gateway</html>".to_string());
        assert!(matches!(err, RemoteError::Http { status: 502, .. }));
    }

    #[test]
    fn response_mapping_by_status_and_body() {
        let ok = decode_response(200, r#"{"orderId":1,"status":"NEW"}"#.to_string()).unwrap();
        assert_eq!(ok["orderId"], 1);

        let err = decode_response(400, r#"{"code":-1102,"msg":"Mandatory parameter 'price' was not sent."}"#.to_string())
            .unwrap_err();
        assert!(matches!(err, RemoteError::Api { status: 400, code: -1102, .. }));

        let err = decode_response(503, "Service Unavailable".to_string()).unwrap_err();
        assert!(matches!(err, RemoteError::Http { status: 503, .. }));

        // well-formed error body on a success status is still a payload
        let ok = decode_response(200, r#"{"code":200,"msg":"success"}"#.to_string()).unwrap();
        assert_eq!(ok["msg"], "success");

        let err = decode_response(200, "<html>maintenance</html>".to_string()).unwrap_err();
        assert!(matches!(err, RemoteError::Decode(_)));
    }

    fn transport_for(base_url: &str) -> HttpTransport {
        let ctx = TradingContext {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            base_url: url::Url::parse(base_url).unwrap(),
            use_testnet: true,
            timeout: Duration::from_secs(1),
            recv_window_ms: 5000,
        };
        HttpTransport::new(&ctx).unwrap()
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let transport = transport_for("https://proxy.local/binance/");
        let request = ApiRequest {
            method: Method::Get,
            path: "/fapi/v2/balance",
            params: Vec::new(),
        };
        let url = transport.signed_url(&request).unwrap();
        assert_eq!(url.host_str(), Some("proxy.local"));
        assert_eq!(url.path(), "/binance/fapi/v2/balance");
    }

    #[test]
    fn signed_url_carries_params_window_and_signature() {
        let transport = transport_for("https://testnet.binancefuture.com");
        let request = ApiRequest {
            method: Method::Get,
            path: "/fapi/v1/order",
            params: vec![
                ("symbol".to_string(), "BTCUSDT".to_string()),
                ("orderId".to_string(), "42".to_string()),
            ],
        };

        let url = transport.signed_url(&request).unwrap();
        assert_eq!(url.path(), "/fapi/v1/order");
        let query = url.query().unwrap();
        assert!(query.starts_with("symbol=BTCUSDT&orderId=42&recvWindow=5000&timestamp="));

        let (unsigned, signature) = query.rsplit_once("&signature=").unwrap();
        let key = hmac::Key::new(hmac::HMAC_SHA256, b"secret");
        assert_eq!(signature, sign(&key, unsigned));
    }
}
