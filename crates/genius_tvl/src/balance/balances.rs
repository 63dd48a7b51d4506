//! Balance mapping keyed by contract address.

use crate::balance::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Address -> accumulated amount. Built fresh for each metric run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(BTreeMap<String, Amount>);

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `amount` under `key`, or add it to the existing entry.
    pub fn add(&mut self, key: &str, amount: Amount) {
        *self.0.entry(key.to_string()).or_default() += amount;
    }

    /// Builder form of [`Balances::add`] for folding.
    pub fn with(mut self, key: &str, amount: Amount) -> Self {
        self.add(key, amount);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Amount> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Amount)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
