//! Balance mapping and fixed-point amounts.

mod amount;
mod balances;

pub use amount::{Amount, AmountParseError};
pub use balances::Balances;
