//! Ethereum JSON-RPC client with rate limiting and opt-in retries.

use crate::chain::abi::{self, AbiError, ViewMethod};
use crate::chain::ChainApi;
use alloy_primitives::U256;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

const RATE_LIMIT_MS: u64 = 100;
const MAX_RETRIES: u32 = 0;
const RETRY_BACKOFF_MS: u64 = 500;
const TIMEOUT_SECS: u64 = 30;
const BLOCK_TAG: &str = "latest";

#[derive(Clone, Debug)]
pub struct RpcConfig {
    pub chain: String,
    pub url: String,
    pub rate_limit_ms: u64,
    /// Retries for transport and HTTP failures. JSON-RPC errors are never retried.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,
}

impl RpcConfig {
    pub fn new(chain: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            url: url.into(),
            rate_limit_ms: RATE_LIMIT_MS,
            max_retries: MAX_RETRIES,
            retry_backoff_ms: RETRY_BACKOFF_MS,
            timeout_secs: TIMEOUT_SECS,
        }
    }
}

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid rpc url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http error: status {0} body {1}")]
    Http(u16, String),
    #[error("json-rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("abi: {0}")]
    Abi(#[from] AbiError),
    #[error("response has neither result nor error")]
    MissingResult,
}

/// Exponential backoff for retry `attempt`, saturating instead of overflowing.
fn backoff_ms(base_ms: u64, attempt: u32) -> u64 {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    base_ms.saturating_mul(factor)
}

impl RpcError {
    fn is_transient(&self) -> bool {
        matches!(self, RpcError::Request(_) | RpcError::Http(..))
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client bound to one chain's endpoint.
pub struct RpcClient {
    config: RpcConfig,
    url: Url,
    client: reqwest::Client,
    last_request: Mutex<Option<Instant>>,
    next_id: AtomicU64,
    request_count: AtomicU64,
}

impl RpcClient {
    pub fn new(config: RpcConfig) -> Result<Self, RpcError> {
        let url = Url::parse(&config.url)?;
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            config,
            url,
            client,
            last_request: Mutex::new(None),
            next_id: AtomicU64::new(1),
            request_count: AtomicU64::new(0),
        })
    }

    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let min_gap = Duration::from_millis(self.config.rate_limit_ms);
            let elapsed = prev.elapsed();
            if elapsed < min_gap {
                tokio::time::sleep(min_gap - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Send one JSON-RPC request and return its `result` string.
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<String, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        let mut attempt = 0;
        loop {
            self.rate_limit().await;
            match self.send(&body).await {
                Ok(result) => {
                    self.request_count.fetch_add(1, Ordering::Relaxed);
                    debug!(chain = %self.config.chain, method, id, "rpc ok");
                    return Ok(result);
                }
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    let ms = backoff_ms(self.config.retry_backoff_ms, attempt);
                    warn!(chain = %self.config.chain, method, attempt, ms, error = %e, "retry after error");
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send(&self, body: &serde_json::Value) -> Result<String, RpcError> {
        let res = self.client.post(self.url.clone()).json(body).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(RpcError::Http(status.as_u16(), text));
        }
        let parsed: RpcResponse = serde_json::from_str(&text)?;
        if let Some(err) = parsed.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        parsed.result.ok_or(RpcError::MissingResult)
    }

    async fn eth_call(&self, target: &str, data: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let data = format!("0x{}", hex::encode(data));
        let out = self
            .request(
                "eth_call",
                serde_json::json!([{ "to": target, "data": data }, BLOCK_TAG]),
            )
            .await?;
        abi::return_bytes(&out).map_err(RpcError::from)
    }

    /// Successful requests so far.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ChainApi for RpcClient {
    type Error = RpcError;

    fn chain(&self) -> &str {
        &self.config.chain
    }

    async fn call(&self, target: &str, method: ViewMethod) -> Result<U256, RpcError> {
        let out = self.eth_call(target, method.calldata()).await?;
        method.decode(&out).map_err(RpcError::from)
    }

    async fn erc20_balance_of(&self, token: &str, owner: &str) -> Result<U256, RpcError> {
        let out = self
            .eth_call(token, abi::balance_of_calldata(owner)?)
            .await?;
        abi::decode_balance_of(&out).map_err(RpcError::from)
    }

    async fn native_balance(&self, owner: &str) -> Result<U256, RpcError> {
        let out = self
            .request("eth_getBalance", serde_json::json!([owner, BLOCK_TAG]))
            .await?;
        abi::parse_quantity(&out).map_err(RpcError::from)
    }

    async fn erc20_decimals(&self, token: &str) -> Result<u8, RpcError> {
        let out = self.eth_call(token, abi::decimals_calldata()).await?;
        abi::decode_decimals(&out).map_err(RpcError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    fn word(v: U256) -> String {
        format!("0x{}", hex::encode(v.to_be_bytes::<32>()))
    }

    fn client_for(server: &MockServer) -> RpcClient {
        let mut config = RpcConfig::new("bsc", server.url("/"));
        config.rate_limit_ms = 0;
        RpcClient::new(config).unwrap()
    }

    #[test]
    fn rejects_bad_url() {
        let config = RpcConfig::new("bsc", "not a url");
        assert!(matches!(RpcClient::new(config), Err(RpcError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn native_balance_via_get_balance() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/").body_contains("eth_getBalance");
                then.status(200)
                    .json_body(json!({ "jsonrpc": "2.0", "id": 1, "result": "0x22b1c8c1227a0000" }));
            })
            .await;
        let client = client_for(&server);
        let wei = client
            .native_balance("0xDCA692d433Fe291ef72c84652Af2fe04DA4B4444")
            .await
            .unwrap();
        assert_eq!(wei, U256::from(2_500_000_000_000_000_000u128));
        assert_eq!(client.request_count(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn balance_of_sends_encoded_owner() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .body_contains("eth_call")
                    .body_contains("0x70a08231000000000000000000000000dca692d433fe291ef72c84652af2fe04da4b4444");
                then.status(200)
                    .json_body(json!({ "jsonrpc": "2.0", "id": 1, "result": word(U256::from(42u8)) }));
            })
            .await;
        let client = client_for(&server);
        let bal = client
            .erc20_balance_of(
                "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56",
                "0xDCA692d433Fe291ef72c84652Af2fe04DA4B4444",
            )
            .await
            .unwrap();
        assert_eq!(bal, U256::from(42u8));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn decimals_decodes_u8() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").body_contains("0x313ce567");
                then.status(200)
                    .json_body(json!({ "jsonrpc": "2.0", "id": 1, "result": word(U256::from(18u8)) }));
            })
            .await;
        let client = client_for(&server);
        assert_eq!(
            client
                .erc20_decimals("0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56")
                .await
                .unwrap(),
            18
        );
    }

    #[tokio::test]
    async fn rpc_error_surfaces() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200).json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": { "code": -32000, "message": "execution reverted" }
                }));
            })
            .await;
        let client = client_for(&server);
        let err = client
            .call(
                "0x444444444444C1a66F394025Ac839A535246FCc8",
                ViewMethod::BasicLockedSupply,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::Rpc { code: -32000, .. }));
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn http_error_not_retried_by_default() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(503).body("unavailable");
            })
            .await;
        let client = client_for(&server);
        let err = client.native_balance("0x00").await.unwrap_err();
        assert!(matches!(err, RpcError::Http(503, _)));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn http_error_retried_when_configured() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(502).body("bad gateway");
            })
            .await;
        let mut config = RpcConfig::new("bsc", server.url("/"));
        config.rate_limit_ms = 0;
        config.retry_backoff_ms = 1;
        config.max_retries = 2;
        let client = RpcClient::new(config).unwrap();
        assert!(client.native_balance("0x00").await.is_err());
        mock.assert_hits_async(3).await;
    }

    #[test]
    fn backoff_saturates_for_large_attempts() {
        assert_eq!(backoff_ms(500, 0), 500);
        assert_eq!(backoff_ms(500, 3), 4000);
        assert_eq!(backoff_ms(500, 63), u64::MAX);
        assert_eq!(backoff_ms(500, 64), u64::MAX);
        assert_eq!(backoff_ms(500, u32::MAX), u64::MAX);
        assert_eq!(backoff_ms(0, 100), 0);
    }

    #[tokio::test]
    async fn tvl_reports_balance_wider_than_u128() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").body_contains("0x70a08231");
                then.status(200).json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": word(U256::from(1u8) << 128usize)
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").body_contains("0x313ce567");
                then.status(200)
                    .json_body(json!({ "jsonrpc": "2.0", "id": 1, "result": word(U256::from(18u8)) }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").body_contains("eth_getBalance");
                then.status(200)
                    .json_body(json!({ "jsonrpc": "2.0", "id": 1, "result": "0x0" }));
            })
            .await;
        let client = client_for(&server);
        let balances = crate::genius::tvl(&client).await.unwrap();
        // 2^128 / 10^18
        assert_eq!(
            balances
                .get(crate::genius::GENIUS_CONTRACT)
                .unwrap()
                .to_string(),
            "340282366920938463463.3746"
        );
        assert_eq!(client.request_count(), 3);
    }
}
