//! Endpoint table
//!
//! Every API resource the client exposes is one [`Endpoint`] variant. Its
//! path and minimum subscription tier live in a single constant table so the
//! tier gate and the dispatch path are driven from data rather than repeated
//! in every method.

use std::fmt;
use std::str::FromStr;

use crate::error::CmcError;
use crate::tier::Tier;

/// Base URL for the CoinMarketCap Pro API
pub const API_BASE_URL: &str = "https://pro-api.coinmarketcap.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Airdrop,
    Airdrops,
    Categories,
    Category,
    Info,
    Map,
    ListingsHistorical,
    ListingsLatest,
    MarketPairsLatest,
    OhlcvHistorical,
    OhlcvLatest,
    PricePerformanceStatsLatest,
    QuotesHistorical,
    QuotesLatest,
    TrendingGainersLosers,
    TrendingLatest,
    TrendingMostVisited,
    FiatMap,
    ExchangeInfo,
    ExchangeMap,
    ExchangeListingsLatest,
    ExchangeMarketPairsLatest,
    ExchangeQuotesHistorical,
    ExchangeQuotesLatest,
    GlobalMetricsQuotesHistorical,
    GlobalMetricsQuotesLatest,
    ToolsPriceConversion,
    BlockchainStatisticsLatest,
    FcasListingsLatest,
    FcasQuotesLatest,
    KeyInfo,
}

/// Static description of one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    pub endpoint: Endpoint,
    /// Path relative to [`API_BASE_URL`]
    pub path: &'static str,
    pub min_tier: Tier,
}

const fn spec(endpoint: Endpoint, path: &'static str, min_tier: Tier) -> EndpointSpec {
    EndpointSpec {
        endpoint,
        path,
        min_tier,
    }
}

/// Endpoint -> (path, minimum tier), in declaration order of [`Endpoint`]
pub const ENDPOINTS: [EndpointSpec; 31] = [
    spec(Endpoint::Airdrop, "v1/cryptocurrency/airdrop", Tier::Basic),
    spec(Endpoint::Airdrops, "v1/cryptocurrency/airdrops", Tier::Basic),
    spec(Endpoint::Categories, "v1/cryptocurrency/categories", Tier::Basic),
    spec(Endpoint::Category, "v1/cryptocurrency/category", Tier::Basic),
    spec(Endpoint::Info, "v1/cryptocurrency/info", Tier::Basic),
    spec(Endpoint::Map, "v1/cryptocurrency/map", Tier::Basic),
    spec(
        Endpoint::ListingsHistorical,
        "v1/cryptocurrency/listings/historical",
        Tier::Basic,
    ),
    spec(
        Endpoint::ListingsLatest,
        "v1/cryptocurrency/listings/latest",
        Tier::Basic,
    ),
    spec(
        Endpoint::MarketPairsLatest,
        "v1/cryptocurrency/market-pairs/latest",
        Tier::Basic,
    ),
    spec(
        Endpoint::OhlcvHistorical,
        "v1/cryptocurrency/ohlcv/historical",
        Tier::Basic,
    ),
    spec(
        Endpoint::OhlcvLatest,
        "v1/cryptocurrency/ohlcv/latest",
        Tier::Basic,
    ),
    spec(
        Endpoint::PricePerformanceStatsLatest,
        "v1/cryptocurrency/price-performance-stats/latest",
        Tier::Basic,
    ),
    spec(
        Endpoint::QuotesHistorical,
        "v1/cryptocurrency/quotes/historical",
        Tier::Basic,
    ),
    spec(
        Endpoint::QuotesLatest,
        "v1/cryptocurrency/quotes/latest",
        Tier::Basic,
    ),
    spec(
        Endpoint::TrendingGainersLosers,
        "v1/cryptocurrency/trending/gainers-losers",
        Tier::Startup,
    ),
    spec(
        Endpoint::TrendingLatest,
        "v1/cryptocurrency/trending/latest",
        Tier::Startup,
    ),
    spec(
        Endpoint::TrendingMostVisited,
        "v1/cryptocurrency/trending/most-visited",
        Tier::Startup,
    ),
    spec(Endpoint::FiatMap, "v1/fiat/map", Tier::Basic),
    spec(Endpoint::ExchangeInfo, "v1/exchange/info", Tier::Basic),
    spec(Endpoint::ExchangeMap, "v1/exchange/map", Tier::Basic),
    spec(
        Endpoint::ExchangeListingsLatest,
        "v1/exchange/listings/latest",
        Tier::Basic,
    ),
    spec(
        Endpoint::ExchangeMarketPairsLatest,
        "v1/exchange/market-pairs/latest",
        Tier::Basic,
    ),
    spec(
        Endpoint::ExchangeQuotesHistorical,
        "v1/exchange/quotes/historical",
        Tier::Standard,
    ),
    spec(
        Endpoint::ExchangeQuotesLatest,
        "v1/exchange/quotes/latest",
        Tier::Standard,
    ),
    spec(
        Endpoint::GlobalMetricsQuotesHistorical,
        "v1/global-metrics/quotes/historical",
        Tier::Basic,
    ),
    spec(
        Endpoint::GlobalMetricsQuotesLatest,
        "v1/global-metrics/quotes/latest",
        Tier::Basic,
    ),
    spec(
        Endpoint::ToolsPriceConversion,
        "v1/tools/price-conversion",
        Tier::Basic,
    ),
    spec(
        Endpoint::BlockchainStatisticsLatest,
        "v1/blockchain/statistics/latest",
        Tier::Enterprise,
    ),
    spec(
        Endpoint::FcasListingsLatest,
        "v1/partners/flipside-crypto/fcas/listings/latest",
        Tier::Basic,
    ),
    spec(
        Endpoint::FcasQuotesLatest,
        "v1/partners/flipside-crypto/fcas/quotes/latest",
        Tier::Basic,
    ),
    spec(Endpoint::KeyInfo, "v1/key/info", Tier::Basic),
];

impl Endpoint {
    /// All endpoints, in table order
    pub fn all() -> impl Iterator<Item = Endpoint> {
        ENDPOINTS.iter().map(|s| s.endpoint)
    }

    pub fn spec(&self) -> &'static EndpointSpec {
        // Table rows follow variant declaration order.
        &ENDPOINTS[*self as usize]
    }

    pub fn path(&self) -> &'static str {
        self.spec().path
    }

    pub fn min_tier(&self) -> Tier {
        self.spec().min_tier
    }

    /// Path without the version prefix, e.g. `cryptocurrency/listings/latest`
    pub fn name(&self) -> &'static str {
        let path = self.path();
        path.split_once('/').map_or(path, |(_, rest)| rest)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = CmcError;

    /// Accepts the name (`exchange/map`) or the full path (`v1/exchange/map`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().trim_matches('/');
        Endpoint::all()
            .find(|e| e.name() == needle || e.path() == needle)
            .ok_or_else(|| CmcError::UnknownEndpoint(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_matches_variant_order() {
        for (idx, row) in ENDPOINTS.iter().enumerate() {
            assert_eq!(row.endpoint as usize, idx, "{:?} out of order", row.endpoint);
        }
    }

    #[test]
    fn test_paths_unique_and_relative() {
        let paths: HashSet<_> = ENDPOINTS.iter().map(|s| s.path).collect();
        assert_eq!(paths.len(), ENDPOINTS.len());
        assert!(ENDPOINTS
            .iter()
            .all(|s| s.path.starts_with("v1/") && !s.path.ends_with('/')));
    }

    #[test]
    fn test_gated_endpoints() {
        let gated: Vec<_> = ENDPOINTS
            .iter()
            .filter(|s| s.min_tier > Tier::Basic)
            .map(|s| (s.endpoint, s.min_tier))
            .collect();

        assert_eq!(
            gated,
            vec![
                (Endpoint::TrendingGainersLosers, Tier::Startup),
                (Endpoint::TrendingLatest, Tier::Startup),
                (Endpoint::TrendingMostVisited, Tier::Startup),
                (Endpoint::ExchangeQuotesHistorical, Tier::Standard),
                (Endpoint::ExchangeQuotesLatest, Tier::Standard),
                (Endpoint::BlockchainStatisticsLatest, Tier::Enterprise),
            ]
        );
    }

    #[test]
    fn test_name_strips_version() {
        assert_eq!(Endpoint::KeyInfo.name(), "key/info");
        assert_eq!(
            Endpoint::FcasQuotesLatest.to_string(),
            "partners/flipside-crypto/fcas/quotes/latest"
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("exchange/map".parse::<Endpoint>().unwrap(), Endpoint::ExchangeMap);
        assert_eq!("v1/fiat/map".parse::<Endpoint>().unwrap(), Endpoint::FiatMap);
        assert_eq!("/key/info/".parse::<Endpoint>().unwrap(), Endpoint::KeyInfo);
        assert!(matches!(
            "cryptocurrency/nope".parse::<Endpoint>(),
            Err(CmcError::UnknownEndpoint(_))
        ));
        for endpoint in Endpoint::all() {
            assert_eq!(endpoint.name().parse::<Endpoint>().unwrap(), endpoint);
        }
    }
}
