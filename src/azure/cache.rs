//! Dated cache of `az network vnet list` output.
//!
//! Saves repeated az calls while iterating on the same resource group. The
//! cache is a snapshot: a proposal read from it may already be taken.

use super::directory::parse_vnet_list;
use crate::error::{Error, Result};
use crate::models::Vnet;
use std::path::Path;

/// Read VNets from `cache_file`, or call `fetch` and write its result there.
pub fn read_vnet_cache<F>(cache_file: &Path, fetch: F) -> Result<Vec<Vnet>>
where
    F: FnOnce() -> Result<Vec<Vnet>>,
{
    match std::fs::read_to_string(cache_file) {
        Ok(json) => {
            log::info!("Reading from cache file: {}", cache_file.display());
            parse_vnet_list(&json, &cache_file.display().to_string())
        }
        Err(_) => {
            log::warn!("Cache file not found: {}", cache_file.display());
            let vnets = fetch()?;
            let json = serde_json::to_string_pretty(&vnets)
                .map_err(|e| Error::Lookup(format!("Error serializing JSON: {e}")))?;
            log::warn!("Writing data to cache file: {}", cache_file.display());
            std::fs::write(cache_file, json).map_err(|e| {
                Error::Lookup(format!(
                    "Error writing cache file {}: {e}",
                    cache_file.display()
                ))
            })?;
            Ok(vnets)
        }
    }
}
