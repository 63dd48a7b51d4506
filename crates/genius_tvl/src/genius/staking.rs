//! Staking: GENI locked by Basic and Advanced miners plus settled GENI in the pool.

use crate::balance::{Amount, Balances};
use crate::chain::{ChainApi, ViewMethod};
use crate::genius::registry::{GENIUS_CONTRACT, STABILITY_POOL};
use tracing::info;

/// Sum of the three locked-GENI counters, in raw base units, keyed by [`GENIUS_CONTRACT`].
pub async fn staking<A: ChainApi + ?Sized>(api: &A) -> Result<Balances, A::Error> {
    let basic = api.call(GENIUS_CONTRACT, ViewMethod::BasicLockedSupply).await?;
    let advanced = api.call(GENIUS_CONTRACT, ViewMethod::AdvLockedSupply).await?;
    let settled = api.call(STABILITY_POOL, ViewMethod::TotalSettledGenitos).await?;

    let balances = [basic, advanced, settled]
        .into_iter()
        .fold(Balances::new(), |b, raw| {
            b.with(GENIUS_CONTRACT, Amount::from_raw(raw))
        });
    info!(chain = api.chain(), %basic, %advanced, %settled, "staking");
    Ok(balances)
}
