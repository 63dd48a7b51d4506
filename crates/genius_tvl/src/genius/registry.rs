//! Genius contract addresses and the per-chain collateral registry.

/// Genius staking contract. Every reported balance is keyed by this address.
pub const GENIUS_CONTRACT: &str = "0x444444444444C1a66F394025Ac839A535246FCc8";
/// Stability pool (debt contract) holding collateral and settled GENI.
pub const STABILITY_POOL: &str = "0xDCA692d433Fe291ef72c84652Af2fe04DA4B4444";

/// Decimals of every supported chain's native currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// An ERC-20 accepted as stability pool collateral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collateral {
    pub symbol: &'static str,
    pub token: &'static str,
}

const BSC: &[Collateral] = &[Collateral {
    symbol: "BUSD",
    token: "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56",
}];

const ETHEREUM: &[Collateral] = &[Collateral {
    symbol: "DAI",
    token: "0x6B175474E89094C44Da98b954EedeAC495271d0F",
}];

const AVAX: &[Collateral] = &[Collateral {
    symbol: "USDC",
    token: "0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E",
}];

const POLYGON: &[Collateral] = &[Collateral {
    symbol: "DAI",
    token: "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063",
}];

/// Collateral accepted on `chain`. Unknown chains have none.
pub fn collateral_for(chain: &str) -> &'static [Collateral] {
    match chain {
        "bsc" => BSC,
        "ethereum" => ETHEREUM,
        "avax" | "avalanche" => AVAX,
        "polygon" => POLYGON,
        _ => &[],
    }
}
