//! Reproducibility hashing and verification of snapshot bundles.

mod bundle;

pub use bundle::{normalize_for_hash, read_bundle, verify_bundle_hash, VerifyError};
pub use bundle::{reproducibility_hash, SnapshotBundle, VerificationResult};
