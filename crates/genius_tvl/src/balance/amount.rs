//! Non-negative fixed-point amounts with exact rescaling and half-up rounding.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount: {0}")]
    Invalid(String),
    #[error("amount out of range: {0}")]
    OutOfRange(String),
}

/// Decimal amount stored as `mantissa / 10^scale`, with a full uint256 mantissa.
///
/// Equality is numeric: `2.50` equals `2.5`. Arithmetic saturates at `U256::MAX`
/// rather than wrapping.
#[derive(Clone, Copy, Debug, Default)]
pub struct Amount {
    mantissa: U256,
    scale: u32,
}

fn pow10(exp: u32) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}

impl Amount {
    pub fn new(mantissa: U256, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// Raw on-chain integer in its own base unit (no rescaling).
    pub fn from_raw(raw: U256) -> Self {
        Self::new(raw, 0)
    }

    /// `raw / 10^decimals`, rounded half-up to `places` decimal places.
    ///
    /// Matches fixed-point `toFixed(places)` formatting of the exact quotient,
    /// so the result never depends on binary float rounding.
    pub fn rescaled(raw: U256, decimals: u8, places: u32) -> Self {
        let decimals = u32::from(decimals);
        let mantissa = if decimals >= places {
            match pow10(decimals - places) {
                Some(divisor) => {
                    let quotient = raw / divisor;
                    let remainder = raw % divisor;
                    if !remainder.is_zero() && remainder >= divisor - remainder {
                        quotient.saturating_add(U256::from(1u8))
                    } else {
                        quotient
                    }
                }
                // divisor exceeds U256::MAX, so even half of it is above any raw value
                None => U256::ZERO,
            }
        } else {
            raw.saturating_mul(pow10(places - decimals).unwrap_or(U256::MAX))
        };
        Self::new(mantissa, places)
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Same value with trailing fractional zeros removed.
    pub fn normalized(&self) -> Self {
        let ten = U256::from(10u8);
        let mut out = *self;
        while out.scale > 0 && (out.mantissa % ten).is_zero() {
            out.mantissa /= ten;
            out.scale -= 1;
        }
        if out.mantissa.is_zero() {
            out.scale = 0;
        }
        out
    }

    fn rescale_up(&self, scale: u32) -> U256 {
        let factor = pow10(scale - self.scale).unwrap_or(U256::MAX);
        self.mantissa.saturating_mul(factor)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        let scale = self.scale.max(rhs.scale);
        let mantissa = self.rescale_up(scale).saturating_add(rhs.rescale_up(scale));
        Amount { mantissa, scale }
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        a.mantissa == b.mantissa && a.scale == b.scale
    }
}

impl Eq for Amount {}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.normalized();
        if n.scale == 0 {
            return write!(f, "{}", n.mantissa);
        }
        let scale = n.scale as usize;
        let digits = format!("{:0>width$}", n.mantissa.to_string(), width = scale + 1);
        let (int, frac) = digits.split_at(digits.len() - scale);
        write!(f, "{}.{}", int, frac)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountParseError::Empty);
        }
        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        if int.is_empty() && frac.is_empty() {
            return Err(AmountParseError::Invalid(s.to_string()));
        }
        if !int.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(AmountParseError::Invalid(s.to_string()));
        }
        let digits = format!("{}{}", int, frac);
        let mantissa = U256::from_str_radix(&digits, 10)
            .map_err(|_| AmountParseError::OutOfRange(s.to_string()))?;
        Ok(Self::new(mantissa, frac.len() as u32))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(v: u128) -> U256 {
        U256::from(v)
    }

    #[test]
    fn rescale_eighteen_decimals() {
        let a = Amount::rescaled(raw(2_500_000_000_000_000_000), 18, 4);
        assert_eq!(a.to_string(), "2.5");
        assert_eq!(a, "2.5".parse().unwrap());
    }

    #[test]
    fn rescale_rounds_half_up() {
        assert_eq!(Amount::rescaled(raw(123_455), 5, 4).to_string(), "1.2346");
        assert_eq!(Amount::rescaled(raw(123_454), 5, 4).to_string(), "1.2345");
        // 0.00005 is exactly half a unit in the last place
        assert_eq!(Amount::rescaled(raw(5), 5, 4).to_string(), "0.0001");
        assert_eq!(Amount::rescaled(raw(4), 5, 4).to_string(), "0");
    }

    #[test]
    fn rescale_few_decimals() {
        assert_eq!(Amount::rescaled(raw(150), 2, 4).to_string(), "1.5");
        assert_eq!(Amount::rescaled(raw(7), 0, 4).to_string(), "7");
    }

    #[test]
    fn rescale_huge_decimals_is_zero() {
        assert!(Amount::rescaled(U256::MAX, 200, 4).is_zero());
    }

    #[test]
    fn rescale_beyond_u128() {
        let a = Amount::rescaled(U256::from(1u8) << 128usize, 18, 4);
        assert_eq!(a.to_string(), "340282366920938463463.3746");
    }

    #[test]
    fn usdc_six_decimals() {
        let a = Amount::rescaled(raw(1_234_567_891), 6, 4);
        assert_eq!(a.to_string(), "1234.5679");
    }

    #[test]
    fn add_mixes_scales() {
        let tvl = Amount::rescaled(raw(1_500_000), 6, 4);
        let units = Amount::from_raw(raw(2));
        assert_eq!((tvl + units).to_string(), "3.5");
    }

    #[test]
    fn add_saturates() {
        let a = Amount::from_raw(U256::MAX) + Amount::from_raw(raw(1));
        assert_eq!(a, Amount::from_raw(U256::MAX));
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("175".parse::<Amount>().unwrap().to_string(), "175");
        assert_eq!("0.0100".parse::<Amount>().unwrap().to_string(), "0.01");
        assert_eq!(".5".parse::<Amount>().unwrap().to_string(), "0.5");
        assert!("1.2.3".parse::<Amount>().is_err());
        assert!("-1".parse::<Amount>().is_err());
        assert_eq!("".parse::<Amount>(), Err(AmountParseError::Empty));
        let wide = format!("1{}", "0".repeat(78));
        assert!(matches!(
            wide.parse::<Amount>(),
            Err(AmountParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn serializes_as_string() {
        let a = Amount::new(raw(25_000), 4);
        assert_eq!(serde_json::to_string(&a).unwrap(), r#""2.5""#);
        let back: Amount = serde_json::from_str(r#""2.5""#).unwrap();
        assert_eq!(back, a);
    }
}
