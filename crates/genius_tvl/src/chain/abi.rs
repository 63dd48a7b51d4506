//! Contract bindings for the ERC-20 and Genius view methods the metrics read.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use thiserror::Error;

sol! {
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
    }

    interface IGenius {
        function basicLockedSupply() external view returns (uint256);
        function advLockedSupply() external view returns (uint256);
    }

    interface IStabilityPool {
        function totalSettledGenitos() external view returns (uint256);
    }
}

#[derive(Error, Debug)]
pub enum AbiError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("decode: {0}")]
    Decode(#[from] alloy_sol_types::Error),
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("empty return data")]
    EmptyReturn,
}

/// No-argument uint256 view methods read by the staking metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMethod {
    /// Genius staking contract: GENI locked by Basic-policy miners.
    BasicLockedSupply,
    /// Genius staking contract: GENI locked by Advanced-policy miners.
    AdvLockedSupply,
    /// Stability pool: settled GENI waiting for collateral to be returned.
    TotalSettledGenitos,
}

impl ViewMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ViewMethod::BasicLockedSupply => "basicLockedSupply",
            ViewMethod::AdvLockedSupply => "advLockedSupply",
            ViewMethod::TotalSettledGenitos => "totalSettledGenitos",
        }
    }

    pub fn calldata(&self) -> Vec<u8> {
        match self {
            ViewMethod::BasicLockedSupply => IGenius::basicLockedSupplyCall {}.abi_encode(),
            ViewMethod::AdvLockedSupply => IGenius::advLockedSupplyCall {}.abi_encode(),
            ViewMethod::TotalSettledGenitos => {
                IStabilityPool::totalSettledGenitosCall {}.abi_encode()
            }
        }
    }

    pub fn decode(&self, data: &[u8]) -> Result<U256, AbiError> {
        non_empty(data)?;
        let value = match self {
            ViewMethod::BasicLockedSupply => {
                IGenius::basicLockedSupplyCall::abi_decode_returns(data, true)?._0
            }
            ViewMethod::AdvLockedSupply => {
                IGenius::advLockedSupplyCall::abi_decode_returns(data, true)?._0
            }
            ViewMethod::TotalSettledGenitos => {
                IStabilityPool::totalSettledGenitosCall::abi_decode_returns(data, true)?._0
            }
        };
        Ok(value)
    }
}

/// Address text to `Address`. Checksums are not enforced.
pub fn parse_address(s: &str) -> Result<Address, AbiError> {
    s.trim()
        .parse()
        .map_err(|_| AbiError::InvalidAddress(s.to_string()))
}

pub fn balance_of_calldata(owner: &str) -> Result<Vec<u8>, AbiError> {
    let owner = parse_address(owner)?;
    Ok(IERC20::balanceOfCall { owner }.abi_encode())
}

pub fn decode_balance_of(data: &[u8]) -> Result<U256, AbiError> {
    non_empty(data)?;
    Ok(IERC20::balanceOfCall::abi_decode_returns(data, true)?._0)
}

pub fn decimals_calldata() -> Vec<u8> {
    IERC20::decimalsCall {}.abi_encode()
}

pub fn decode_decimals(data: &[u8]) -> Result<u8, AbiError> {
    non_empty(data)?;
    Ok(IERC20::decimalsCall::abi_decode_returns(data, true)?._0)
}

/// `0x`-prefixed hex return data of `eth_call`.
pub fn return_bytes(hex_data: &str) -> Result<Vec<u8>, AbiError> {
    let digits = hex_data.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    Ok(hex::decode(digits)?)
}

/// JSON-RPC quantity such as the result of `eth_getBalance` (`0x1a`).
pub fn parse_quantity(quantity: &str) -> Result<U256, AbiError> {
    let digits = quantity.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    if digits.is_empty() {
        return Err(AbiError::EmptyReturn);
    }
    U256::from_str_radix(digits, 16).map_err(|_| AbiError::InvalidQuantity(quantity.to_string()))
}

fn non_empty(data: &[u8]) -> Result<(), AbiError> {
    if data.is_empty() {
        return Err(AbiError::EmptyReturn);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(v: U256) -> Vec<u8> {
        v.to_be_bytes::<32>().to_vec()
    }

    #[test]
    fn well_known_selectors() {
        assert_eq!(IERC20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(IERC20::decimalsCall::SELECTOR, [0x31, 0x3c, 0xe5, 0x67]);
        assert_eq!(decimals_calldata(), vec![0x31, 0x3c, 0xe5, 0x67]);
    }

    #[test]
    fn balance_of_pads_owner() {
        let data = balance_of_calldata("0xDCA692d433Fe291ef72c84652Af2fe04DA4B4444").unwrap();
        assert_eq!(
            hex::encode(data),
            "70a08231000000000000000000000000dca692d433fe291ef72c84652af2fe04da4b4444"
        );
    }

    #[test]
    fn view_calldata_is_selector_only() {
        for m in [
            ViewMethod::BasicLockedSupply,
            ViewMethod::AdvLockedSupply,
            ViewMethod::TotalSettledGenitos,
        ] {
            assert_eq!(m.calldata().len(), 4, "{}", m.name());
        }
    }

    #[test]
    fn rejects_bad_address() {
        assert!(matches!(
            balance_of_calldata("0xnothex"),
            Err(AbiError::InvalidAddress(_))
        ));
    }

    #[test]
    fn decodes_full_width_uint256() {
        let big = U256::from(1u8) << 200usize;
        assert_eq!(decode_balance_of(&word(big)).unwrap(), big);
        assert_eq!(
            ViewMethod::TotalSettledGenitos
                .decode(&word(U256::from(25u8)))
                .unwrap(),
            U256::from(25u8)
        );
        assert_eq!(decode_decimals(&word(U256::from(18u8))).unwrap(), 18);
    }

    #[test]
    fn rejects_empty_and_out_of_range() {
        assert!(matches!(decode_balance_of(&[]), Err(AbiError::EmptyReturn)));
        assert!(decode_decimals(&word(U256::from(256u16))).is_err());
    }

    #[test]
    fn quantities_and_return_bytes() {
        assert_eq!(parse_quantity("0x0").unwrap(), U256::ZERO);
        assert_eq!(
            parse_quantity("0x22b1c8c1227a0000").unwrap(),
            U256::from(2_500_000_000_000_000_000u128)
        );
        assert!(matches!(parse_quantity("0x"), Err(AbiError::EmptyReturn)));
        assert!(matches!(parse_quantity("0xzz"), Err(AbiError::InvalidQuantity(_))));
        assert_eq!(return_bytes("0x0102").unwrap(), vec![1, 2]);
    }
}
