//! JSON snapshot persistence with atomic-replace semantics

use crate::{Result, StoreError};
use selfmap_domain::BoundaryMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Write the map to `path`, replacing any prior snapshot atomically
///
/// The snapshot is written to a sibling temporary file and renamed into
/// place, so a crash mid-write leaves the prior snapshot intact. The file
/// handle is flushed and synced before the rename on every exit path.
pub fn save_snapshot(map: &BoundaryMap, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(map)?;

    // Same directory as the target, so the rename cannot cross filesystems.
    let tmp = path.with_extension("json.tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(&json)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;

    tracing::debug!(
        path = %path.display(),
        boundaries = map.boundaries.len(),
        "saved boundary snapshot"
    );
    Ok(())
}

/// Load a snapshot from `path`, rejecting anything that violates invariants
///
/// Out-of-range scalars, key/name mismatches, and dangling `derived_from`
/// references surface as [`StoreError::CorruptState`] naming the offending
/// boundary; nothing is silently coerced or repaired.
pub fn load_snapshot(path: &Path) -> Result<BoundaryMap> {
    let contents = fs::read_to_string(path)?;
    let map: BoundaryMap = serde_json::from_str(&contents)?;
    map.validate().map_err(|v| StoreError::CorruptState {
        domain: v.domain,
        reason: v.reason,
    })?;

    tracing::debug!(
        path = %path.display(),
        boundaries = map.boundaries.len(),
        "loaded boundary snapshot"
    );
    Ok(map)
}
