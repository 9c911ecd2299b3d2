//! HTTP transport
//!
//! The client only ever issues one kind of call: a blocking GET with a fixed
//! header set and an optional query string. [`Transport`] is that call, so the
//! dispatch layer can run against `reqwest` in production and against an
//! in-memory fake in tests.

use reqwest::blocking::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use crate::error::CmcResult;

/// Request headers as (name, value) pairs
pub type Headers = Vec<(&'static str, String)>;

/// Status and raw body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One blocking GET round-trip
pub trait Transport: Send + Sync {
    fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        query: Option<&[(String, String)]>,
    ) -> CmcResult<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        query: Option<&[(String, String)]>,
    ) -> CmcResult<HttpResponse> {
        (**self).get(url, headers, query)
    }
}

/// [`Transport`] backed by `reqwest`'s blocking client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Wrap an already configured client (proxies, TLS settings, ...)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        query: Option<&[(String, String)]>,
    ) -> CmcResult<HttpResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();

        trace!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}
