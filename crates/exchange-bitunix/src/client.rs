//! Authenticated Bitunix REST client.
//!
//! Every call signs the canonical form of what is transmitted — the sorted
//! bare query string for GET, the exact JSON body text for POST — and
//! decodes the `{code, msg, data}` envelope into either a payload or a
//! typed failure. A non-2xx status fails before the envelope is read; a
//! success status with a non-zero business code fails with the resolved
//! API error; only then is the payload unwrapped.
//!
//! # Example
//!
//! ```ignore
//! use secrecy::SecretString;
//! use sentinel_bitunix::{BitunixClient, BitunixClientConfig};
//!
//! let client = BitunixClient::new(
//!     "api-key",
//!     SecretString::from("secret"),
//!     BitunixClientConfig::default(),
//! )?;
//! ```

use crate::auth::{canonical_query, BitunixSigner};
use crate::error::{BitunixError, Result};
use crate::types::{
    CancelAllRequest, CancelOrdersRequest, PendingOrdersData, PlaceOrderRequest,
    PositionTpslRequest, RawOrderAck, RawPosition, RawTpslOrder, RawTradingPair, TradingPair,
};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::SecretString;
use sentinel_core::{
    ExchangeApi, OpenOrder, OrderAck, Position, StopLossIntent, TakeProfitIntent, TpslOrder,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Bitunix production futures API base URL.
pub const BITUNIX_PROD_URL: &str = "https://fapi.bitunix.com";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Bitunix client.
#[derive(Debug, Clone)]
pub struct BitunixClientConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BitunixClientConfig {
    fn default() -> Self {
        Self {
            base_url: BITUNIX_PROD_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl BitunixClientConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// =============================================================================
// Response Envelope
// =============================================================================

/// The uniform Bitunix response wrapper. `data` is only meaningful when
/// `code` is zero.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

// =============================================================================
// BitunixClient
// =============================================================================

/// Bitunix futures REST client. All requests are signed.
pub struct BitunixClient {
    config: BitunixClientConfig,
    http: Client,
    signer: BitunixSigner,
}

impl std::fmt::Debug for BitunixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitunixClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl BitunixClient {
    /// Creates a new client for the given credentials.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        secret_key: SecretString,
        config: BitunixClientConfig,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BitunixError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            signer: BitunixSigner::new(api_key, secret_key),
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Makes an authenticated GET request. The canonical query string is
    /// signed; the same parameters travel URL-encoded on the request line.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Option<T>> {
        let query = canonical_query(params);
        let headers = self.signer.sign_request(&query, "")?;
        let url = format!("{}{}", self.config.base_url, path);

        tracing::debug!("GET {}", url);

        let mut request = self
            .http
            .get(&url)
            .header("language", "en-US")
            .header("Content-Type", "application/json");
        for (name, value) in headers.as_tuples() {
            request = request.header(name, value);
        }
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Makes an authenticated POST request. The body is serialized once;
    /// the identical bytes are signed and transmitted.
    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let body_json = serde_json::to_string(body)?;
        let headers = self.signer.sign_request("", &body_json)?;
        let url = format!("{}{}", self.config.base_url, path);

        tracing::debug!("POST {} body_len={}", url, body_json.len());

        let mut request = self
            .http
            .post(&url)
            .header("language", "en-US")
            .header("Content-Type", "application/json");
        for (name, value) in headers.as_tuples() {
            request = request.header(name, value);
        }

        let response = request.body(body_json).send().await?;
        Self::decode(response).await
    }

    /// Decodes a response: HTTP status first, then the business code, then
    /// the payload.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<Option<T>> {
        let status = response.status();
        if !status.is_success() {
            return Err(BitunixError::http(status.as_u16()));
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        if envelope.code != 0 {
            return Err(BitunixError::api(envelope.code, envelope.msg));
        }

        Ok(envelope.data)
    }

    // =========================================================================
    // Account Endpoints
    // =========================================================================

    /// Returns the open position for `symbol`, if any. A returned row with
    /// zero quantity counts as closed.
    ///
    /// # Errors
    /// Returns error if the API call fails or a live row is missing its
    /// entry fields.
    pub async fn get_open_position(&self, symbol: &str) -> Result<Option<Position>> {
        let params = vec![("symbol".to_string(), symbol.to_uppercase())];
        let rows: Vec<RawPosition> = self
            .get("/api/v1/futures/position/get_pending_positions", &params)
            .await?
            .unwrap_or_default();

        match rows.into_iter().next() {
            Some(raw) => raw.into_position(),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Market Endpoints
    // =========================================================================

    /// Returns instrument metadata for `symbol`, if the instrument exists.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn get_trading_pair(&self, symbol: &str) -> Result<Option<TradingPair>> {
        let params = vec![("symbols".to_string(), symbol.to_uppercase())];
        let rows: Vec<RawTradingPair> = self
            .get("/api/v1/futures/market/trading_pairs", &params)
            .await?
            .unwrap_or_default();

        Ok(rows.into_iter().next().map(TradingPair::from))
    }

    // =========================================================================
    // Trade Endpoints
    // =========================================================================

    /// Returns all resting plain orders for `symbol`.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn get_pending_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>> {
        let params = vec![("symbol".to_string(), symbol.to_uppercase())];
        let data: PendingOrdersData = self
            .get("/api/v1/futures/trade/get_pending_orders", &params)
            .await?
            .unwrap_or_default();

        Ok(data.order_list.into_iter().map(OpenOrder::from).collect())
    }

    /// Returns all pending conditional (TP/SL) orders for `symbol`.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn get_pending_tpsl_orders(&self, symbol: &str) -> Result<Vec<TpslOrder>> {
        let params = vec![("symbol".to_string(), symbol.to_uppercase())];
        let rows: Vec<RawTpslOrder> = self
            .get("/api/v1/futures/tpsl/get_pending_orders", &params)
            .await?
            .unwrap_or_default();

        Ok(rows.into_iter().map(TpslOrder::from).collect())
    }

    /// Cancels the given orders for `symbol` by id.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn cancel_orders(&self, symbol: &str, order_ids: &[String]) -> Result<()> {
        let request = CancelOrdersRequest::new(symbol, order_ids);
        self.post::<serde_json::Value, _>("/api/v1/futures/trade/cancel_orders", &request)
            .await?;
        Ok(())
    }

    /// Cancels every open order for `symbol`.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn cancel_all_orders(&self, symbol: &str) -> Result<()> {
        let request = CancelAllRequest {
            symbol: Some(symbol.to_uppercase()),
        };
        self.post::<serde_json::Value, _>("/api/v1/futures/trade/cancel_all_orders", &request)
            .await?;
        Ok(())
    }

    /// Cancels every open order across all symbols.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn cancel_all_orders_all_symbols(&self) -> Result<()> {
        let request = CancelAllRequest { symbol: None };
        self.post::<serde_json::Value, _>("/api/v1/futures/trade/cancel_all_orders", &request)
            .await?;
        Ok(())
    }

    /// Places an order.
    ///
    /// # Errors
    /// Returns error if the order is rejected or the acknowledgement is
    /// absent.
    pub async fn place_order(&self, request: &PlaceOrderRequest) -> Result<OrderAck> {
        let ack: Option<RawOrderAck> = self
            .post("/api/v1/futures/trade/place_order", request)
            .await?;

        ack.map(OrderAck::from)
            .ok_or(BitunixError::missing_field("data", "place_order response"))
    }

    /// Places a position-linked TP/SL order.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn place_position_tpsl(&self, request: &PositionTpslRequest) -> Result<()> {
        self.post::<serde_json::Value, _>("/api/v1/futures/tpsl/position/place_order", request)
            .await?;
        Ok(())
    }
}

// =============================================================================
// ExchangeApi
// =============================================================================

#[async_trait]
impl ExchangeApi for BitunixClient {
    async fn open_position(&self, symbol: &str) -> anyhow::Result<Option<Position>> {
        Ok(self.get_open_position(symbol).await?)
    }

    async fn quote_precision(&self, symbol: &str) -> anyhow::Result<Option<u32>> {
        Ok(self
            .get_trading_pair(symbol)
            .await?
            .and_then(|pair| pair.quote_precision))
    }

    async fn pending_orders(&self, symbol: &str) -> anyhow::Result<Vec<OpenOrder>> {
        Ok(self.get_pending_orders(symbol).await?)
    }

    async fn pending_tpsl_orders(&self, symbol: &str) -> anyhow::Result<Vec<TpslOrder>> {
        Ok(self.get_pending_tpsl_orders(symbol).await?)
    }

    async fn cancel_orders(&self, symbol: &str, order_ids: &[String]) -> anyhow::Result<()> {
        Ok(Self::cancel_orders(self, symbol, order_ids).await?)
    }

    async fn cancel_all_orders(&self, symbol: &str) -> anyhow::Result<()> {
        Ok(Self::cancel_all_orders(self, symbol).await?)
    }

    async fn place_position_stop(&self, intent: &StopLossIntent) -> anyhow::Result<()> {
        let request = PositionTpslRequest::stop_loss(
            &intent.symbol,
            intent.position_id.as_str(),
            intent.trigger_price,
        );
        Ok(self.place_position_tpsl(&request).await?)
    }

    async fn place_limit_close(&self, intent: &TakeProfitIntent) -> anyhow::Result<()> {
        let request = PlaceOrderRequest::limit(
            &intent.symbol,
            intent.side,
            intent.quantity,
            intent.limit_price,
            crate::types::TradeSide::Close,
        )
        .with_position_id(intent.position_id.as_str());
        self.place_order(&request).await?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sentinel_core::{OrderKind, Side};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BitunixClient {
        BitunixClient::new(
            "test-api-key",
            SecretString::from("test-secret-key"),
            BitunixClientConfig::default().with_base_url(server.uri()),
        )
        .unwrap()
    }

    fn success(data: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "success",
            "data": data
        }))
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_client_config_default() {
        let config = BitunixClientConfig::default();
        assert_eq!(config.base_url, BITUNIX_PROD_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_client_config_builder() {
        let config = BitunixClientConfig::default()
            .with_base_url("https://custom.url")
            .with_timeout_secs(5);
        assert_eq!(config.base_url, "https://custom.url");
        assert_eq!(config.timeout_secs, 5);
    }

    // ==================== Envelope Decoding Tests ====================

    #[tokio::test]
    async fn test_get_open_position_decodes_and_signs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/futures/position/get_pending_positions"))
            .and(query_param("symbol", "BTCUSDT"))
            .and(header("api-key", "test-api-key"))
            .and(header("language", "en-US"))
            .and(header_regex("sign", "^[0-9a-f]{64}$"))
            .and(header_regex("nonce", "^[0-9a-f]{32}$"))
            .and(header_regex("timestamp", "^[0-9]{13,}$"))
            .respond_with(success(json!([{
                "symbol": "BTCUSDT",
                "side": "BUY",
                "qty": "0.5",
                "avgOpenPrice": "42000.5",
                "entryValue": "21000.25",
                "positionId": "7001"
            }])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        // Lowercase input is upper-cased at the call boundary.
        let position = client.get_open_position("btcusdt").await.unwrap().unwrap();

        assert_eq!(position.symbol, "BTCUSDT");
        assert_eq!(position.side, Side::Buy);
        assert_eq!(position.quantity, dec!(0.5));
        assert_eq!(position.entry_value, dec!(21000.25));
    }

    #[tokio::test]
    async fn test_get_open_position_empty_list_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/futures/position/get_pending_positions"))
            .respond_with(success(json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.get_open_position("BTCUSDT").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_business_error_resolves_known_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/futures/position/get_pending_positions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 10007,
                "msg": "sign verify failed",
                "data": null
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_open_position("BTCUSDT").await.unwrap_err();
        match err {
            BitunixError::Api { code, ref message } => {
                assert_eq!(code, 10007);
                assert_eq!(message, "signature error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_business_error_unknown_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/futures/market/trading_pairs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 77777,
                "msg": "brand new failure",
                "data": null
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_trading_pair("BTCUSDT").await.unwrap_err();
        assert!(err.to_string().contains("unknown code 77777"));
        assert!(err.to_string().contains("brand new failure"));
    }

    #[tokio::test]
    async fn test_http_status_error_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/futures/position/get_pending_positions"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_open_position("BTCUSDT").await.unwrap_err();
        assert!(matches!(err, BitunixError::Http { status: 503 }));
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Nothing listens on port 9; the connection is refused outright.
        let client = BitunixClient::new(
            "test-api-key",
            SecretString::from("test-secret-key"),
            BitunixClientConfig::default()
                .with_base_url("http://127.0.0.1:9")
                .with_timeout_secs(1),
        )
        .unwrap();

        let err = client.get_open_position("BTCUSDT").await.unwrap_err();
        assert!(matches!(
            err,
            BitunixError::Network(_) | BitunixError::Timeout(_)
        ));
    }

    // ==================== Market Endpoint Tests ====================

    #[tokio::test]
    async fn test_get_trading_pair_precision() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/futures/market/trading_pairs"))
            .and(query_param("symbols", "BTCUSDT"))
            .respond_with(success(json!([{
                "symbol": "BTCUSDT",
                "quotePrecision": 4
            }])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let pair = client.get_trading_pair("BTCUSDT").await.unwrap().unwrap();
        assert_eq!(pair.quote_precision, Some(4));

        // And through the ExchangeApi seam the engine consumes.
        let precision = ExchangeApi::quote_precision(&client, "BTCUSDT").await.unwrap();
        assert_eq!(precision, Some(4));
    }

    // ==================== Trade Endpoint Tests ====================

    #[tokio::test]
    async fn test_get_pending_orders_unwraps_order_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/futures/trade/get_pending_orders"))
            .respond_with(success(json!({
                "orderList": [
                    {"orderId": "501", "orderType": "LIMIT", "side": "SELL"},
                    {"orderId": "502", "orderType": "MARKET", "side": "BUY"}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let orders = client.get_pending_orders("BTCUSDT").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, "501");
        assert_eq!(orders[0].kind, Some(OrderKind::Limit));
        assert_eq!(orders[0].side, Some(Side::Sell));
    }

    #[tokio::test]
    async fn test_get_pending_orders_null_data_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/futures/trade/get_pending_orders"))
            .respond_with(success(json!(null)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.get_pending_orders("BTCUSDT").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_pending_tpsl_orders() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/futures/tpsl/get_pending_orders"))
            .and(query_param("symbol", "BTCUSDT"))
            .respond_with(success(json!([{"id": "11"}, {"id": "12"}])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let orders = client.get_pending_tpsl_orders("BTCUSDT").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, "11");
    }

    #[tokio::test]
    async fn test_cancel_orders_body_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/futures/trade/cancel_orders"))
            .and(body_json(json!({
                "symbol": "BTCUSDT",
                "orderList": [{"orderId": "11"}, {"orderId": "12"}]
            })))
            .and(header_regex("sign", "^[0-9a-f]{64}$"))
            .respond_with(success(json!(null)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .cancel_orders("btcusdt", &["11".to_string(), "12".to_string()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancel_all_orders_body_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/futures/trade/cancel_all_orders"))
            .and(body_json(json!({"symbol": "BTCUSDT"})))
            .respond_with(success(json!(null)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.cancel_all_orders("BTCUSDT").await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_all_orders_all_symbols_posts_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/futures/trade/cancel_all_orders"))
            .and(body_json(json!({})))
            .respond_with(success(json!(null)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.cancel_all_orders_all_symbols().await.unwrap();
    }

    #[tokio::test]
    async fn test_place_order_returns_ack() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/futures/trade/place_order"))
            .and(body_json(json!({
                "symbol": "BTCUSDT",
                "side": "SELL",
                "orderType": "LIMIT",
                "qty": "0.5",
                "tradeSide": "CLOSE",
                "price": "110.5",
                "effect": "GTC",
                "positionId": "7001"
            })))
            .respond_with(success(json!({"orderId": "900", "clientId": null})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = PlaceOrderRequest::limit(
            "BTCUSDT",
            Side::Sell,
            dec!(0.5),
            dec!(110.5),
            crate::types::TradeSide::Close,
        )
        .with_position_id("7001");

        let ack = client.place_order(&request).await.unwrap();
        assert_eq!(ack.order_id, "900");
        assert!(ack.client_id.is_none());
    }

    #[tokio::test]
    async fn test_place_order_without_ack_is_a_fault() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/futures/trade/place_order"))
            .respond_with(success(json!(null)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = PlaceOrderRequest::market(
            "BTCUSDT",
            Side::Buy,
            dec!(1),
            crate::types::TradeSide::Open,
        );
        let err = client.place_order(&request).await.unwrap_err();
        assert!(matches!(err, BitunixError::MissingField { .. }));
    }

    #[tokio::test]
    async fn test_place_position_tpsl_body_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/futures/tpsl/position/place_order"))
            .and(body_json(json!({
                "symbol": "BTCUSDT",
                "positionId": "7001",
                "slPrice": "95.1234"
            })))
            .respond_with(success(json!(null)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = PositionTpslRequest::stop_loss("BTCUSDT", "7001", dec!(95.1234));
        client.place_position_tpsl(&request).await.unwrap();
    }

    // ==================== ExchangeApi Seam Tests ====================

    #[tokio::test]
    async fn test_place_position_stop_builds_stop_loss_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/futures/tpsl/position/place_order"))
            .and(body_json(json!({
                "symbol": "BTCUSDT",
                "positionId": "7001",
                "slPrice": "95"
            })))
            .respond_with(success(json!(null)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let intent = StopLossIntent {
            symbol: "BTCUSDT".to_string(),
            position_id: "7001".to_string(),
            trigger_price: dec!(95),
        };
        client.place_position_stop(&intent).await.unwrap();
    }

    #[tokio::test]
    async fn test_place_limit_close_builds_closing_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/futures/trade/place_order"))
            .and(body_json(json!({
                "symbol": "BTCUSDT",
                "side": "SELL",
                "orderType": "LIMIT",
                "qty": "2",
                "tradeSide": "CLOSE",
                "price": "110",
                "effect": "GTC",
                "positionId": "7001"
            })))
            .respond_with(success(json!({"orderId": "901"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let intent = TakeProfitIntent {
            symbol: "BTCUSDT".to_string(),
            position_id: "7001".to_string(),
            side: Side::Sell,
            quantity: dec!(2),
            limit_price: dec!(110),
        };
        client.place_limit_close(&intent).await.unwrap();
    }
}
