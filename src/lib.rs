//! CoinMarketCap Client
//!
//! Blocking client for the CoinMarketCap Pro API. Each endpoint is one method
//! that checks the key's subscription tier, sends an authenticated GET and
//! returns the decoded JSON as-is.
//!
//! # Quick Start
//!
//! ```no_run
//! use coinmarketcap_client::params::ListingsLatestParams;
//! use coinmarketcap_client::{Client, ClientConfig, Tier};
//!
//! let config = ClientConfig::default().with_fail_silently(true);
//! let client = Client::with_config("your-api-key", Tier::Hobbyist, config);
//!
//! let listings = client
//!     .get_listings_latest(&ListingsLatestParams {
//!         limit: Some(10),
//!         ..Default::default()
//!     })
//!     .expect("request failed");
//!
//! match listings {
//!     Some(json) => println!("{}", json["data"][0]["name"]),
//!     None => println!("request failed, see logs"),
//! }
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod logger;
pub mod params;
pub mod tier;
pub mod transport;

pub use client::{Client, ErrorBody};
pub use config::{ClientConfig, Credentials};
pub use endpoint::{Endpoint, API_BASE_URL, ENDPOINTS};
pub use error::{CmcError, CmcResult};
pub use logger::{Logger, TracingLogger};
#[cfg(any(test, feature = "test-util"))]
pub use logger::{LogLevel, MemoryLogger};
pub use tier::Tier;
pub use transport::{HttpResponse, HttpTransport, Transport};
