//! Snapshot bundle and SHA-256 reproducibility hash.

use crate::balance::Balances;
use crate::genius::{GENIUS_CONTRACT, STABILITY_POOL};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// One point-in-time report for one chain: both metrics plus what produced them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotBundle {
    pub version: u32,
    pub chain: String,
    pub created_utc_rfc3339: String,
    pub genius_contract: String,
    pub stability_pool: String,
    pub tvl: Balances,
    pub staking: Balances,
    /// JSON-RPC requests issued to build the snapshot.
    pub request_count: u64,
}

const BUNDLE_VERSION: u32 = 1;

impl SnapshotBundle {
    pub fn new(chain: String, tvl: Balances, staking: Balances, request_count: u64) -> Self {
        let created_utc_rfc3339 = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        Self {
            version: BUNDLE_VERSION,
            chain,
            created_utc_rfc3339,
            genius_contract: GENIUS_CONTRACT.to_string(),
            stability_pool: STABILITY_POOL.to_string(),
            tvl,
            staking,
            request_count,
        }
    }
}

/// Normalize JSON for hashing: sort keys and no whitespace.
pub fn normalize_for_hash(value: &serde_json::Value) -> Result<String, VerifyError> {
    Ok(serde_json::to_string(&sort_json_keys(value))?)
}

fn sort_json_keys(v: &serde_json::Value) -> serde_json::Value {
    match v {
        serde_json::Value::Object(m) => {
            let sorted: std::collections::BTreeMap<&String, serde_json::Value> =
                m.iter().map(|(k, v)| (k, sort_json_keys(v))).collect();
            serde_json::Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v))
                    .collect(),
            )
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(sort_json_keys).collect())
        }
        other => other.clone(),
    }
}

/// Compute SHA-256 over normalized bundle JSON.
pub fn reproducibility_hash(bundle: &SnapshotBundle) -> Result<String, VerifyError> {
    let json = serde_json::to_value(bundle)?;
    let normalized = normalize_for_hash(&json)?;
    Ok(hex::encode(Sha256::digest(normalized.as_bytes())))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationResult {
    pub bundle_hash: String,
    pub expected_hash: Option<String>,
    pub matches: bool,
}

/// Compare a bundle's hash with the content of its `.sha256` file.
pub fn verify_bundle_hash(
    bundle: &SnapshotBundle,
    expected_hex: &str,
) -> Result<VerificationResult, VerifyError> {
    let bundle_hash = reproducibility_hash(bundle)?;
    let expected = expected_hex.trim().to_lowercase();
    let matches = bundle_hash == expected;
    Ok(VerificationResult {
        bundle_hash,
        expected_hash: Some(expected),
        matches,
    })
}

/// Read a bundle from disk.
pub fn read_bundle(path: &std::path::Path) -> Result<SnapshotBundle, VerifyError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::Amount;
    use alloy_primitives::U256;

    fn bundle() -> SnapshotBundle {
        SnapshotBundle::new(
            "bsc".to_string(),
            Balances::new().with(GENIUS_CONTRACT, Amount::new(U256::from(25_000u64), 4)),
            Balances::new().with(GENIUS_CONTRACT, Amount::from_raw(U256::from(175u8))),
            4,
        )
    }

    #[test]
    fn normalize_deterministic() {
        let a = serde_json::json!({"z":1,"a":{"y":2,"b":3}});
        let b = serde_json::json!({"a":{"b":3,"y":2},"z":1});
        assert_eq!(normalize_for_hash(&a).unwrap(), normalize_for_hash(&b).unwrap());
    }

    #[test]
    fn hash_deterministic() {
        let b = bundle();
        let h1 = reproducibility_hash(&b).unwrap();
        let h2 = reproducibility_hash(&b).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn verify_detects_tampering() {
        let b = bundle();
        let hash = reproducibility_hash(&b).unwrap();
        assert!(verify_bundle_hash(&b, &format!("{}\n", hash.to_uppercase())).unwrap().matches);

        let mut tampered = b.clone();
        tampered.staking.add(GENIUS_CONTRACT, Amount::from_raw(U256::from(1u8)));
        assert!(!verify_bundle_hash(&tampered, &hash).unwrap().matches);
    }

    #[test]
    fn bundle_json_roundtrip_keeps_hash() {
        let b = bundle();
        let json = serde_json::to_string_pretty(&b).unwrap();
        let back: SnapshotBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(reproducibility_hash(&b).unwrap(), reproducibility_hash(&back).unwrap());
    }
}
