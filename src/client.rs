//! CoinMarketCap Pro API client
//!
//! Blocking client that gates each endpoint on the key's subscription tier,
//! issues one authenticated GET per call and hands the decoded JSON back
//! untouched.
//!
//! # Example
//! ```no_run
//! use coinmarketcap_client::params::QuotesLatestParams;
//! use coinmarketcap_client::{Client, Tier};
//!
//! fn main() -> anyhow::Result<()> {
//!     let client = Client::new("your-api-key", Tier::Basic);
//!     let quotes = client.get_quotes_latest(&QuotesLatestParams {
//!         symbol: Some("BTC,ETH".to_string()),
//!         ..Default::default()
//!     })?;
//!     println!("{}", serde_json::to_string_pretty(&quotes)?);
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::{ClientConfig, Credentials};
use crate::endpoint::Endpoint;
use crate::error::{CmcError, CmcResult};
use crate::logger::{Logger, TracingLogger};
use crate::params::*;
use crate::tier::Tier;
use crate::transport::{Headers, HttpResponse, HttpTransport, Transport};

pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_API_KEY: &str = "X-CMC_PRO_API_KEY";

/// What could be recovered from a non-200 body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// JSON body carrying a message
    Message(String),
    /// Body that was not JSON or had no message; raw text kept
    Raw(String),
}

impl ErrorBody {
    pub fn decode(response: &HttpResponse) -> Self {
        response
            .json()
            .ok()
            .and_then(|json| Self::message_from(&json))
            .map(Self::Message)
            .unwrap_or_else(|| Self::Raw(response.text()))
    }

    /// `message` at the top level, else CoinMarketCap's `status.error_message`
    fn message_from(json: &Value) -> Option<String> {
        json.get("message")
            .and_then(Value::as_str)
            .or_else(|| json.pointer("/status/error_message").and_then(Value::as_str))
            .map(str::to_string)
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Message(m) | Self::Raw(m) => m,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            Self::Message(m) | Self::Raw(m) => m,
        }
    }
}

/// CoinMarketCap API client
pub struct Client {
    api_key: String,
    key_type: Tier,
    fail_silently: bool,
    base_url: String,
    transport: Box<dyn Transport>,
    logger: Arc<dyn Logger>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Client")
            .field("key_type", &self.key_type)
            .field("fail_silently", &self.fail_silently)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client. No network activity happens here.
    pub fn new(api_key: impl Into<String>, key_type: Tier) -> Self {
        Self::with_config(api_key, key_type, ClientConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, key_type: Tier, config: ClientConfig) -> Self {
        Self {
            api_key: api_key.into(),
            key_type,
            fail_silently: config.fail_silently,
            transport: Box::new(HttpTransport::new(config.timeout)),
            base_url: config.base_url,
            logger: Arc::new(TracingLogger),
        }
    }

    pub fn from_credentials(credentials: Credentials, config: ClientConfig) -> Self {
        Self::with_config(credentials.api_key, credentials.key_type, config)
    }

    /// Log and return `None` on non-200 responses instead of failing
    pub fn with_fail_silently(mut self, fail_silently: bool) -> Self {
        self.fail_silently = fail_silently;
        self
    }

    /// Replace the HTTP transport
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    /// Replace the logger (defaults to [`TracingLogger`])
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn key_type(&self) -> Tier {
        self.key_type
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fail_silently(&self) -> bool {
        self.fail_silently
    }

    pub fn set_fail_silently(&mut self, fail_silently: bool) {
        self.fail_silently = fail_silently;
    }

    /// Headers attached to every request
    pub fn headers(&self) -> Headers {
        vec![
            (HEADER_ACCEPT, "application/json".to_string()),
            (HEADER_API_KEY, self.api_key.clone()),
        ]
    }

    /// GET `base_url + path` and decode the JSON body.
    ///
    /// Returns `Ok(None)` only when the response is not 200 and the client is
    /// in fail-silently mode. A 200 body that is not JSON is always an error.
    pub fn request(
        &self,
        path: &str,
        params: Option<&[(String, String)]>,
    ) -> CmcResult<Option<Value>> {
        let url = format!("{}{}", self.base_url, path);
        debug!(
            "GET {} ({} query params)",
            url,
            params.map_or(0, |p| p.len())
        );

        let response = self.transport.get(&url, &self.headers(), params)?;
        if response.is_ok() {
            return Ok(Some(response.json()?));
        }

        let status = response.status;
        let message = ErrorBody::decode(&response).into_message();
        self.logger.warn(&format!(
            "Request to {} failed with status {}: {}",
            path, status, message
        ));

        let err = CmcError::Request { status, message };
        if self.fail_silently {
            self.logger
                .info(&format!("Failing silently for {}: {}", path, err));
            return Ok(None);
        }
        Err(err)
    }

    /// Fail with [`CmcError::TierViolation`] if the key cannot call `endpoint`
    pub fn check_tier(&self, endpoint: Endpoint) -> CmcResult<()> {
        let required = endpoint.min_tier();
        if self.key_type.satisfies(required) {
            return Ok(());
        }

        let err = CmcError::TierViolation {
            endpoint,
            required,
            configured: self.key_type,
        };
        self.logger.error(&err.to_string());
        Err(err)
    }

    /// Tier-gated call with a parameter struct (or `&()` for none)
    pub fn call<P: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        params: &P,
    ) -> CmcResult<Option<Value>> {
        self.check_tier(endpoint)?;
        let pairs = to_query_pairs(params)?;
        self.dispatch(endpoint, &pairs)
    }

    /// Tier-gated call with pre-built query pairs
    pub fn call_raw(
        &self,
        endpoint: Endpoint,
        pairs: &[(String, String)],
    ) -> CmcResult<Option<Value>> {
        self.check_tier(endpoint)?;
        self.dispatch(endpoint, pairs)
    }

    fn dispatch(&self, endpoint: Endpoint, pairs: &[(String, String)]) -> CmcResult<Option<Value>> {
        let params = if pairs.is_empty() { None } else { Some(pairs) };
        self.request(endpoint.path(), params)
    }

    // =========================================================================
    // Cryptocurrency
    // =========================================================================

    pub fn get_airdrop(&self, params: &AirdropParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::Airdrop, params)
    }

    pub fn get_airdrops(&self, params: &AirdropsParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::Airdrops, params)
    }

    pub fn get_categories(&self, params: &CategoriesParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::Categories, params)
    }

    pub fn get_category(&self, params: &CategoryParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::Category, params)
    }

    /// Static metadata: logo, description, website and social links
    pub fn get_info(&self, params: &InfoParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::Info, params)
    }

    /// Mapping of every cryptocurrency to its CoinMarketCap id
    pub fn get_map(&self, params: &MapParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::Map, params)
    }

    pub fn get_listings_historical(
        &self,
        params: &ListingsHistoricalParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::ListingsHistorical, params)
    }

    pub fn get_listings_latest(&self, params: &ListingsLatestParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::ListingsLatest, params)
    }

    pub fn get_market_pairs_latest(
        &self,
        params: &MarketPairsLatestParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::MarketPairsLatest, params)
    }

    pub fn get_ohlcv_historical(&self, params: &OhlcvHistoricalParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::OhlcvHistorical, params)
    }

    pub fn get_ohlcv_latest(&self, params: &OhlcvLatestParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::OhlcvLatest, params)
    }

    pub fn get_price_performance_stats_latest(
        &self,
        params: &PricePerformanceStatsParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::PricePerformanceStatsLatest, params)
    }

    pub fn get_quotes_historical(
        &self,
        params: &QuotesHistoricalParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::QuotesHistorical, params)
    }

    pub fn get_quotes_latest(&self, params: &QuotesLatestParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::QuotesLatest, params)
    }

    /// Requires a startup key or higher
    pub fn get_trending_gainers_losers(&self, params: &TrendingParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::TrendingGainersLosers, params)
    }

    /// Requires a startup key or higher
    pub fn get_trending_latest(&self, params: &TrendingParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::TrendingLatest, params)
    }

    /// Requires a startup key or higher
    pub fn get_trending_most_visited(&self, params: &TrendingParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::TrendingMostVisited, params)
    }

    // =========================================================================
    // Fiat
    // =========================================================================

    pub fn get_fiat_map(&self, params: &FiatMapParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::FiatMap, params)
    }

    // =========================================================================
    // Exchange
    // =========================================================================

    pub fn get_exchange_info(&self, params: &ExchangeInfoParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::ExchangeInfo, params)
    }

    pub fn get_exchange_map(&self, params: &ExchangeMapParams) -> CmcResult<Option<Value>> {
        self.call(Endpoint::ExchangeMap, params)
    }

    pub fn get_exchange_listings_latest(
        &self,
        params: &ExchangeListingsLatestParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::ExchangeListingsLatest, params)
    }

    pub fn get_exchange_market_pairs_latest(
        &self,
        params: &ExchangeMarketPairsLatestParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::ExchangeMarketPairsLatest, params)
    }

    /// Requires a standard key or higher
    pub fn get_exchange_quotes_historical(
        &self,
        params: &ExchangeQuotesHistoricalParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::ExchangeQuotesHistorical, params)
    }

    /// Requires a standard key or higher
    pub fn get_exchange_quotes_latest(
        &self,
        params: &ExchangeQuotesLatestParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::ExchangeQuotesLatest, params)
    }

    // =========================================================================
    // Global metrics
    // =========================================================================

    pub fn get_global_metrics_quotes_historical(
        &self,
        params: &GlobalMetricsQuotesHistoricalParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::GlobalMetricsQuotesHistorical, params)
    }

    pub fn get_global_metrics_quotes_latest(
        &self,
        params: &GlobalMetricsQuotesLatestParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::GlobalMetricsQuotesLatest, params)
    }

    // =========================================================================
    // Tools, blockchain, partners, key
    // =========================================================================

    pub fn get_tools_price_conversion(
        &self,
        params: &PriceConversionParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::ToolsPriceConversion, params)
    }

    /// Requires an enterprise key
    pub fn get_blockchain_statistics_latest(
        &self,
        params: &BlockchainStatisticsParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::BlockchainStatisticsLatest, params)
    }

    pub fn get_partners_flipside_crypto_fcas_listings_latest(
        &self,
        params: &FcasListingsParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::FcasListingsLatest, params)
    }

    pub fn get_partners_flipside_crypto_fcas_quotes_latest(
        &self,
        params: &FcasQuotesParams,
    ) -> CmcResult<Option<Value>> {
        self.call(Endpoint::FcasQuotesLatest, params)
    }

    /// Plan and credit usage for the configured key
    pub fn get_key_info(&self) -> CmcResult<Option<Value>> {
        self.call(Endpoint::KeyInfo, &())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Answers every request with the same response and remembers the URLs
    struct FixedTransport {
        response: HttpResponse,
        urls: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for FixedTransport {
        fn get(
            &self,
            url: &str,
            _headers: &[(&'static str, String)],
            _query: Option<&[(String, String)]>,
        ) -> CmcResult<HttpResponse> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(self.response.clone())
        }
    }

    fn client_with(response: HttpResponse) -> (Client, Arc<Mutex<Vec<String>>>) {
        let urls = Arc::new(Mutex::new(Vec::new()));
        let client = Client::new("123test", Tier::Enterprise).with_transport(FixedTransport {
            response,
            urls: urls.clone(),
        });
        (client, urls)
    }

    #[test]
    fn test_client_creation() {
        let client = Client::new("123test", Tier::Startup);
        assert_eq!(client.key_type(), Tier::Startup);
        assert_eq!(client.base_url(), "https://pro-api.coinmarketcap.com/");
        assert!(!client.fail_silently());
    }

    #[test]
    fn test_set_fail_silently() {
        let mut client = Client::new("123test", Tier::Basic);
        client.set_fail_silently(true);
        assert!(client.fail_silently());
    }

    #[test]
    fn test_with_fail_silently_builder() {
        let (client, urls) = client_with(HttpResponse::new(404, r#"{"message": "Not Found"}"#));
        let client = client.with_fail_silently(true);
        assert!(client.fail_silently());
        assert_eq!(client.request("test", None).unwrap(), None);

        let client = client.with_fail_silently(false);
        assert_eq!(
            client.request("test", None).unwrap_err().to_string(),
            "404 Not Found"
        );
        assert_eq!(urls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_from_credentials() {
        let client = Client::from_credentials(
            Credentials::new("123test", Tier::Standard),
            ClientConfig::default().with_fail_silently(true),
        );
        assert_eq!(client.key_type(), Tier::Standard);
        assert!(client.fail_silently());
        assert_eq!(client.headers()[1], (HEADER_API_KEY, "123test".to_string()));
    }

    #[test]
    fn test_headers() {
        let client = Client::new("123test", Tier::Basic);
        let headers = client.headers();
        assert_eq!(
            headers,
            vec![
                ("Accept", "application/json".to_string()),
                ("X-CMC_PRO_API_KEY", "123test".to_string()),
            ]
        );
        assert_eq!(client.headers(), headers);
    }

    #[test]
    fn test_debug_hides_key() {
        let client = Client::new("super-secret", Tier::Basic);
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("Basic"));
    }

    #[test]
    fn test_request_joins_base_url() {
        let (client, urls) = client_with(HttpResponse::new(200, "{}"));
        assert_eq!(client.request("test", None).unwrap(), Some(serde_json::json!({})));
        assert_eq!(
            *urls.lock().unwrap(),
            vec!["https://pro-api.coinmarketcap.com/test".to_string()]
        );
    }

    #[test]
    fn test_custom_base_url() {
        let urls = Arc::new(Mutex::new(Vec::new()));
        let client = Client::with_config(
            "k",
            Tier::Basic,
            ClientConfig::default().with_base_url("http://localhost:9000"),
        )
        .with_transport(FixedTransport {
            response: HttpResponse::new(200, "{}"),
            urls: urls.clone(),
        });

        client.get_key_info().unwrap();
        assert_eq!(
            *urls.lock().unwrap(),
            vec!["http://localhost:9000/v1/key/info".to_string()]
        );
    }

    #[test]
    fn test_error_body_message() {
        let body = ErrorBody::decode(&HttpResponse::new(404, r#"{"message": "Not Found"}"#));
        assert_eq!(body, ErrorBody::Message("Not Found".to_string()));
    }

    #[test]
    fn test_error_body_status_error_message() {
        let body = ErrorBody::decode(&HttpResponse::new(
            401,
            r#"{"status": {"error_code": 1001, "error_message": "This API Key is invalid."}}"#,
        ));
        assert_eq!(body.message(), "This API Key is invalid.");
        assert!(matches!(body, ErrorBody::Message(_)));
    }

    #[test]
    fn test_error_body_raw_fallback() {
        let body = ErrorBody::decode(&HttpResponse::new(404, "404 Not Found Message"));
        assert_eq!(body, ErrorBody::Raw("404 Not Found Message".to_string()));

        let body = ErrorBody::decode(&HttpResponse::new(500, r#"{"detail": "oops"}"#));
        assert_eq!(body.into_message(), r#"{"detail": "oops"}"#);
    }

    #[test]
    fn test_success_with_invalid_json_is_decode_error() {
        let (mut client, _) = client_with(HttpResponse::new(200, "<html>"));
        client.set_fail_silently(true);
        assert!(matches!(
            client.request("test", None),
            Err(CmcError::Decode(_))
        ));
    }
}
