//! Chain access: the `ChainApi` seam, ABI encoding, JSON-RPC client, and endpoint config.

pub mod abi;
mod config;
mod network;
mod rpc;

pub use abi::{AbiError, ViewMethod};
pub use config::{ConfigError, EndpointConfig};
pub use network::{Chain, UnknownChain};
pub use rpc::{RpcClient, RpcConfig, RpcError};

use alloy_primitives::U256;
use async_trait::async_trait;

/// Read-only view of one chain, injected into the metric functions.
///
/// Implementations decide transport, timeouts, and batching. Errors are
/// surfaced to callers unchanged.
#[async_trait]
pub trait ChainApi: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Chain identifier, e.g. `"bsc"`.
    fn chain(&self) -> &str;

    /// Call a no-argument view method returning a single uint256.
    async fn call(&self, target: &str, method: ViewMethod) -> Result<U256, Self::Error>;

    /// ERC-20 `balanceOf(owner)` on `token`.
    async fn erc20_balance_of(&self, token: &str, owner: &str) -> Result<U256, Self::Error>;

    /// Native currency balance of `owner`, in wei.
    async fn native_balance(&self, owner: &str) -> Result<U256, Self::Error>;

    /// ERC-20 `decimals()` on `token`.
    async fn erc20_decimals(&self, token: &str) -> Result<u8, Self::Error>;
}
