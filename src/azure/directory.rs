//! Virtual network lookup.
//!
//! [`VnetDirectory`] is how the presentation layer finds a VNet. The live
//! implementation asks the Azure CLI, the static one serves a snapshot.

use super::cache::read_vnet_cache;
use super::cli;
use crate::error::{Error, Result};
use crate::models::Vnet;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Finds a virtual network and its current subnets.
pub trait VnetDirectory {
    /// Fails with [`Error::NetworkNotFound`] when no VNet matches.
    fn find_vnet(&self, resource_group: &str, vnet_name: &str) -> Result<Vnet>;
}

/// Looks up VNets with `az network vnet list`.
///
/// Authentication is whatever `az login` (or the managed identity it was
/// given) provides.
#[derive(Debug, Clone)]
pub struct AzCliDirectory {
    subscription_id: String,
    cache_dir: Option<PathBuf>,
}

impl AzCliDirectory {
    pub fn new(subscription_id: impl Into<String>) -> AzCliDirectory {
        AzCliDirectory {
            subscription_id: subscription_id.into(),
            cache_dir: None,
        }
    }

    /// Keep one listing per subscription, resource group and day in `dir`.
    pub fn with_cache(mut self, dir: PathBuf) -> AzCliDirectory {
        self.cache_dir = Some(dir);
        self
    }

    fn az_list_command(&self, resource_group: &str) -> Result<String> {
        for (name, value) in [
            ("subscription", self.subscription_id.as_str()),
            ("resource group", resource_group),
        ] {
            if value.contains(|c: char| matches!(c, '\'' | '"' | '/' | '\\')) {
                return Err(Error::InvalidInput(format!(
                    "{name} must not contain quotes or path separators"
                )));
            }
        }
        Ok(format!(
            "az network vnet list --subscription '{}' --resource-group '{resource_group}' --output json",
            self.subscription_id
        ))
    }

    fn list_vnets(&self, resource_group: &str) -> Result<Vec<Vnet>> {
        let cmd = self.az_list_command(resource_group)?;
        let fetch = || {
            let output = cli::run(&cmd).map_err(|e| Error::Lookup(e.to_string()))?;
            parse_vnet_list(&output, "az network vnet list")
        };
        match &self.cache_dir {
            Some(dir) => {
                let now = Utc::now().with_timezone(&crate::config::CACHE_TIMEZONE);
                let file_name = format!(
                    "vnet_cache_{}_{}_{}.json",
                    self.subscription_id,
                    resource_group.to_lowercase(),
                    now.format("%Y-%m-%d")
                );
                read_vnet_cache(&dir.join(file_name), fetch)
            }
            None => fetch(),
        }
    }
}

impl VnetDirectory for AzCliDirectory {
    fn find_vnet(&self, resource_group: &str, vnet_name: &str) -> Result<Vnet> {
        let vnets = self.list_vnets(resource_group)?;
        log::info!(
            "az listed {} vnets in {}/{}",
            vnets.len(),
            self.subscription_id,
            resource_group
        );
        select_vnet(vnets, resource_group, vnet_name)
    }
}

/// A fixed inventory, for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    vnets: Vec<Vnet>,
}

impl StaticDirectory {
    pub fn new(vnets: Vec<Vnet>) -> StaticDirectory {
        StaticDirectory { vnets }
    }

    /// Load a file holding `az network vnet list --output json` output.
    pub fn from_file(path: &Path) -> Result<StaticDirectory> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Lookup(format!("Error reading inventory {}: {e}", path.display())))?;
        let vnets = parse_vnet_list(&json, &path.display().to_string())?;
        log::info!("Loaded {} vnets from {}", vnets.len(), path.display());
        Ok(StaticDirectory { vnets })
    }

    pub fn vnets(&self) -> &[Vnet] {
        &self.vnets
    }
}

impl VnetDirectory for StaticDirectory {
    fn find_vnet(&self, resource_group: &str, vnet_name: &str) -> Result<Vnet> {
        select_vnet(self.vnets.iter().cloned(), resource_group, vnet_name)
    }
}

/// First VNet with this exact name in the (case insensitive) resource group.
fn select_vnet(
    vnets: impl IntoIterator<Item = Vnet>,
    resource_group: &str,
    vnet_name: &str,
) -> Result<Vnet> {
    vnets
        .into_iter()
        .find(|vnet| vnet.name == vnet_name && vnet.in_resource_group(resource_group))
        .ok_or_else(|| Error::NetworkNotFound {
            resource_group: resource_group.to_string(),
            vnet_name: vnet_name.to_string(),
        })
}

/// Parse a JSON array of VNets, reporting the failing path on error.
pub(crate) fn parse_vnet_list(json: &str, source: &str) -> Result<Vec<Vnet>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::debug!("JSON START:\n\n{json}\n\nJSON END\n");
        Error::Lookup(format!(
            "Error parsing vnet list from {source}: path={} error={}",
            e.path(),
            e.inner()
        ))
    })
}
