//! TVL: collateral and native currency held by the stability pool.

use crate::balance::{Amount, Balances};
use crate::chain::ChainApi;
use crate::genius::registry::{
    collateral_for, Collateral, GENIUS_CONTRACT, NATIVE_DECIMALS, STABILITY_POOL,
};
use tracing::{debug, info};

/// Decimal places kept after rescaling.
pub const TVL_PLACES: u32 = 4;

/// Stability pool TVL on `api.chain()`, attributed to [`GENIUS_CONTRACT`].
pub async fn tvl<A: ChainApi + ?Sized>(api: &A) -> Result<Balances, A::Error> {
    tvl_with_collateral(api, collateral_for(api.chain())).await
}

/// [`tvl`] over an explicit collateral list.
///
/// Each token balance is rescaled by its own decimals, the native balance by
/// 10^18, both rounded to [`TVL_PLACES`]. The native entry is always added,
/// so the result has exactly one key even with no collateral.
pub async fn tvl_with_collateral<A: ChainApi + ?Sized>(
    api: &A,
    collateral: &[Collateral],
) -> Result<Balances, A::Error> {
    let mut balances = Balances::new();
    for c in collateral {
        let decimals = api.erc20_decimals(c.token).await?;
        let raw = api.erc20_balance_of(c.token, STABILITY_POOL).await?;
        let amount = Amount::rescaled(raw, decimals, TVL_PLACES);
        debug!(chain = api.chain(), symbol = c.symbol, decimals, %amount, "collateral");
        balances.add(GENIUS_CONTRACT, amount);
    }

    let wei = api.native_balance(STABILITY_POOL).await?;
    let native = Amount::rescaled(wei, NATIVE_DECIMALS, TVL_PLACES);
    debug!(chain = api.chain(), %native, "native");
    balances.add(GENIUS_CONTRACT, native);

    info!(
        chain = api.chain(),
        collateral = collateral.len(),
        tvl = %balances.get(GENIUS_CONTRACT).copied().unwrap_or_default(),
        "tvl"
    );
    Ok(balances)
}
