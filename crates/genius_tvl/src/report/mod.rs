//! Report data structure (HTML is generated in the genius_tvl_report crate).

use crate::verify::SnapshotBundle;
use serde::{Deserialize, Serialize};

/// Data passed to the HTML report generator: bundle + reproducibility hash.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportData {
    pub bundle: SnapshotBundle,
    pub reproducibility_hash_sha256: String,
}
