use std::fs;

use crate::error::Result;
use crate::services::ChainSnapshot;

pub fn load_snapshot(file_path: &str) -> Result<ChainSnapshot> {
    let raw_data = fs::read_to_string(file_path)?;
    let snapshot: ChainSnapshot = serde_json::from_str(&raw_data)?;
    Ok(snapshot)
}

/// Splits a comma separated address list, dropping blanks.
pub fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect()
}
