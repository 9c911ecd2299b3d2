//! Query parameters for each endpoint
//!
//! Every filter is optional unless the API requires it; unset values never
//! reach the query string. List-valued filters (`id`, `symbol`, `convert`,
//! `aux`, ...) take the API's comma-separated form, e.g. `"1,1027"`.
//!
//! # Example
//!
//! ```
//! use coinmarketcap_client::params::{to_query_pairs, ListingsLatestParams};
//!
//! let params = ListingsLatestParams {
//!     limit: Some(10),
//!     convert: Some("USD,EUR".to_string()),
//!     ..Default::default()
//! };
//! let pairs = to_query_pairs(&params).unwrap();
//! assert_eq!(
//!     pairs,
//!     vec![
//!         ("limit".to_string(), "10".to_string()),
//!         ("convert".to_string(), "USD,EUR".to_string()),
//!     ]
//! );
//! ```

use serde::{ser, Serialize, Serializer};
use serde_json::Value;

use crate::error::{CmcError, CmcResult};

/// Flattened query string, in field declaration order
pub type QueryPairs = Vec<(String, String)>;

/// Flatten a parameter struct into query pairs.
///
/// `None` fields are dropped, arrays are joined with commas, and `()` or a
/// struct with nothing set yields an empty list.
pub fn to_query_pairs<P: Serialize + ?Sized>(params: &P) -> CmcResult<QueryPairs> {
    let value = serde_json::to_value(params)
        .map_err(|e| CmcError::InvalidParams(e.to_string()))?;

    let fields = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(fields) => fields,
        other => {
            return Err(CmcError::InvalidParams(format!(
                "expected a struct of named parameters, got {}",
                other
            )))
        }
    };

    let mut pairs = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        if let Some(text) = query_value(&name, value)? {
            pairs.push((name, text));
        }
    }
    Ok(pairs)
}

fn query_value(name: &str, value: Value) -> CmcResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(items) => {
            let parts = items
                .into_iter()
                .map(|item| query_value(name, item))
                .collect::<CmcResult<Vec<_>>>()?;
            let parts: Vec<String> = parts.into_iter().flatten().collect();
            if parts.is_empty() {
                Ok(None)
            } else {
                Ok(Some(parts.join(",")))
            }
        }
        Value::Object(_) => Err(CmcError::InvalidParams(format!(
            "parameter `{}` is a nested object",
            name
        ))),
    }
}

/// JSON has no NaN or infinity; without this they would become `null` and be
/// dropped from the query like an unset filter.
fn finite<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        Err(ser::Error::custom(format!("non-finite number {}", value)))
    }
}

fn finite_opt<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => finite(v, serializer),
        None => serializer.serialize_none(),
    }
}

// =============================================================================
// Cryptocurrency
// =============================================================================

/// `cryptocurrency/airdrop`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AirdropParams {
    pub id: String,
}

impl AirdropParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// `cryptocurrency/airdrops`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AirdropsParams {
    pub start: Option<u32>,
    pub limit: Option<u32>,
    /// `ENDED`, `ONGOING` or `UPCOMING`
    pub status: Option<String>,
    pub id: Option<String>,
    pub slug: Option<String>,
    pub symbol: Option<String>,
}

/// `cryptocurrency/categories`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoriesParams {
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub id: Option<String>,
    pub slug: Option<String>,
    pub symbol: Option<String>,
}

/// `cryptocurrency/category`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryParams {
    pub id: String,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
}

impl CategoryParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// `cryptocurrency/info`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfoParams {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub symbol: Option<String>,
    pub address: Option<String>,
    pub aux: Option<String>,
}

/// `cryptocurrency/map`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapParams {
    /// `active`, `inactive` or `untracked`
    pub listing_status: Option<String>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    /// `id` or `cmc_rank`
    pub sort: Option<String>,
    pub symbol: Option<String>,
    pub aux: Option<String>,
}

/// `cryptocurrency/listings/historical`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingsHistoricalParams {
    /// Unix timestamp or ISO 8601 date
    pub date: String,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub cryptocurrency_type: Option<String>,
    pub aux: Option<String>,
}

impl ListingsHistoricalParams {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }
}

/// `cryptocurrency/listings/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingsLatestParams {
    pub start: Option<u32>,
    pub limit: Option<u32>,
    #[serde(serialize_with = "finite_opt")]
    pub price_min: Option<f64>,
    #[serde(serialize_with = "finite_opt")]
    pub price_max: Option<f64>,
    #[serde(serialize_with = "finite_opt")]
    pub market_cap_min: Option<f64>,
    #[serde(serialize_with = "finite_opt")]
    pub market_cap_max: Option<f64>,
    #[serde(serialize_with = "finite_opt")]
    pub volume_24h_min: Option<f64>,
    #[serde(serialize_with = "finite_opt")]
    pub volume_24h_max: Option<f64>,
    #[serde(serialize_with = "finite_opt")]
    pub circulating_supply_min: Option<f64>,
    #[serde(serialize_with = "finite_opt")]
    pub circulating_supply_max: Option<f64>,
    #[serde(serialize_with = "finite_opt")]
    pub percent_change_24h_min: Option<f64>,
    #[serde(serialize_with = "finite_opt")]
    pub percent_change_24h_max: Option<f64>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub cryptocurrency_type: Option<String>,
    pub tag: Option<String>,
    pub aux: Option<String>,
}

/// `cryptocurrency/market-pairs/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketPairsLatestParams {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub symbol: Option<String>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub sort_dir: Option<String>,
    pub sort: Option<String>,
    pub aux: Option<String>,
    pub matched_id: Option<String>,
    pub matched_symbol: Option<String>,
    pub category: Option<String>,
    pub fee_type: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
}

/// `cryptocurrency/ohlcv/historical`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OhlcvHistoricalParams {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub symbol: Option<String>,
    /// `daily`, `hourly`, ...
    pub time_period: Option<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub count: Option<u32>,
    pub interval: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
    pub skip_invalid: Option<bool>,
}

/// `cryptocurrency/ohlcv/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OhlcvLatestParams {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
    pub skip_invalid: Option<bool>,
}

/// `cryptocurrency/price-performance-stats/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PricePerformanceStatsParams {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub symbol: Option<String>,
    pub time_period: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
    pub skip_invalid: Option<bool>,
}

/// `cryptocurrency/quotes/historical`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuotesHistoricalParams {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub count: Option<u32>,
    pub interval: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
    pub aux: Option<String>,
    pub skip_invalid: Option<bool>,
}

/// `cryptocurrency/quotes/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuotesLatestParams {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub symbol: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
    pub aux: Option<String>,
    pub skip_invalid: Option<bool>,
}

/// Shared by the three `cryptocurrency/trending/*` endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendingParams {
    pub start: Option<u32>,
    pub limit: Option<u32>,
    /// `24h`, `30d` or `7d`
    pub time_period: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
    /// Only honoured by `gainers-losers`
    pub sort: Option<String>,
    /// Only honoured by `gainers-losers`
    pub sort_dir: Option<String>,
}

// =============================================================================
// Fiat
// =============================================================================

/// `fiat/map`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FiatMapParams {
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub include_metals: Option<bool>,
}

// =============================================================================
// Exchange
// =============================================================================

/// `exchange/info`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExchangeInfoParams {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub aux: Option<String>,
}

/// `exchange/map`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExchangeMapParams {
    pub listing_status: Option<String>,
    pub slug: Option<String>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub aux: Option<String>,
    pub crypto_id: Option<String>,
}

/// `exchange/listings/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExchangeListingsLatestParams {
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub market_type: Option<String>,
    pub category: Option<String>,
    pub aux: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
}

/// `exchange/market-pairs/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExchangeMarketPairsLatestParams {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub aux: Option<String>,
    pub matched_id: Option<String>,
    pub matched_symbol: Option<String>,
    pub category: Option<String>,
    pub fee_type: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
}

/// `exchange/quotes/historical`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExchangeQuotesHistoricalParams {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub count: Option<u32>,
    pub interval: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
}

/// `exchange/quotes/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExchangeQuotesLatestParams {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
    pub aux: Option<String>,
}

// =============================================================================
// Global metrics
// =============================================================================

/// `global-metrics/quotes/historical`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalMetricsQuotesHistoricalParams {
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub count: Option<u32>,
    pub interval: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
    pub aux: Option<String>,
}

/// `global-metrics/quotes/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalMetricsQuotesLatestParams {
    pub convert: Option<String>,
    pub convert_id: Option<String>,
}

// =============================================================================
// Tools, blockchain, partners
// =============================================================================

/// `tools/price-conversion`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceConversionParams {
    #[serde(serialize_with = "finite")]
    pub amount: f64,
    pub id: Option<String>,
    pub symbol: Option<String>,
    /// Historical conversion time; latest when unset
    pub time: Option<String>,
    pub convert: Option<String>,
    pub convert_id: Option<String>,
}

impl PriceConversionParams {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }
}

/// `blockchain/statistics/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockchainStatisticsParams {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub slug: Option<String>,
}

/// `partners/flipside-crypto/fcas/listings/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FcasListingsParams {
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub aux: Option<String>,
}

/// `partners/flipside-crypto/fcas/quotes/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FcasQuotesParams {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub symbol: Option<String>,
    pub aux: Option<String>,
}
