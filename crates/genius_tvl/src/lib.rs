//! genius_tvl — TVL and staking reporter for the Genius protocol.
//!
//! Reads stability pool collateral and locked GENI from on-chain state and
//! reduces it into a balance mapping keyed by contract address.
//! Read-only; one chain per call; no signing.

pub mod balance;
pub mod chain;
pub mod genius;
pub mod report;
pub mod verify;

pub use alloy_primitives::U256;
pub use balance::{Amount, Balances};
pub use chain::{Chain, ChainApi, EndpointConfig, RpcClient, RpcConfig, RpcError};
pub use genius::{staking, tvl, METHODOLOGY, SUPPORTED_CHAINS};
pub use report::ReportData;
pub use verify::{reproducibility_hash, SnapshotBundle, VerificationResult};
