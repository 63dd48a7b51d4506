//! Genius protocol metrics.
//!
//! Staking runs on two models. Direct staking locks GENI under the Basic
//! policy (lower APR, no early/late penalties) or the Advanced policy (higher
//! APR, penalties). Debt-based staking deposits collateral in the stability
//! pool to borrow GENI; when the debt is settled the GENI is locked back in
//! the pool until the collateral is returned, earning yield while it waits.

mod registry;
mod staking;
mod tvl;

pub use registry::{
    collateral_for, Collateral, GENIUS_CONTRACT, NATIVE_DECIMALS, STABILITY_POOL,
};
pub use staking::staking;
pub use tvl::{tvl, tvl_with_collateral, TVL_PLACES};

use crate::chain::Chain;

pub const METHODOLOGY: &str = "Staking: counts the number of GENI tokens locked in Basic and Advanced miners per chain.
TVL: counts total number of value locked of all collateral tokens and native in the debt pool per chain.
";

/// Chains the adapter is exported for. Each uses the same `tvl` and `staking`.
pub const SUPPORTED_CHAINS: [Chain; 4] = Chain::ALL;
