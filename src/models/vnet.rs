//! Azure Virtual Network (VNet) data model.
//!
//! Mirrors the JSON printed by `az network vnet list --output json`. Only the
//! fields the allocator needs are kept; everything else is ignored.

use super::Ipv4;
use crate::error::Result;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address space of a VNet.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpace {
    /// Top level prefixes, IPv4 and IPv6 mixed.
    #[serde(default)]
    pub address_prefixes: Vec<String>,
}

/// A subnet as listed inside its VNet.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VnetSubnet {
    /// Subnet name, unique within its VNet.
    pub name: String,
    /// Single prefix, set on most subnets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,
    /// Multiple prefixes, used by dual stack and multi prefix subnets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_prefixes: Option<Vec<String>>,
}

/// Represents an Azure Virtual Network with its subnets.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vnet {
    /// VNet name, unique within its resource group.
    pub name: String,
    /// Full ARM resource id.
    #[serde(default)]
    pub id: String,
    /// ARM resource type, `Microsoft.Network/virtualNetworks`.
    #[serde(default, rename = "type")]
    pub resource_type: String,
    /// Azure region, e.g. `westeurope`.
    #[serde(default)]
    pub location: String,
    /// Resource group as Azure spells it.
    #[serde(default)]
    pub resource_group: String,
    /// Prefixes the VNet may hand out.
    #[serde(default)]
    pub address_space: AddressSpace,
    /// Subnets already created in the VNet.
    #[serde(default)]
    pub subnets: Vec<VnetSubnet>,
}

impl VnetSubnet {
    /// All prefixes of the subnet, whichever field Azure filled in.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.address_prefix
            .iter()
            .chain(self.address_prefixes.iter().flatten())
            .map(String::as_str)
            .unique()
    }
}

impl Vnet {
    /// IPv4 address space prefixes in the order Azure lists them.
    pub fn ipv4_address_prefixes(&self) -> Result<Vec<Ipv4>> {
        parse_ipv4_prefixes(
            self.address_space.address_prefixes.iter().map(String::as_str),
            &self.name,
        )
    }

    /// IPv4 prefixes already taken by child subnets.
    pub fn used_subnets(&self) -> Result<Vec<Ipv4>> {
        parse_ipv4_prefixes(
            self.subnets.iter().flat_map(|subnet| subnet.prefixes()),
            &self.name,
        )
    }

    /// True when the resource group matches, ignoring case like Azure does.
    pub fn in_resource_group(&self, resource_group: &str) -> bool {
        self.resource_group.eq_ignore_ascii_case(resource_group)
    }
}

/// Parse CIDR strings, skipping IPv6 prefixes.
fn parse_ipv4_prefixes<'a>(
    prefixes: impl Iterator<Item = &'a str>,
    vnet_name: &str,
) -> Result<Vec<Ipv4>> {
    let mut ipv4 = Vec::new();
    for prefix in prefixes {
        if prefix.contains(':') {
            log::warn!("Skipping IPv6 prefix {prefix} in vnet {vnet_name}");
            continue;
        }
        ipv4.push(Ipv4::new(prefix)?);
    }
    Ok(ipv4)
}

impl fmt::Display for Vnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} [{}] ({} subnets, {})",
            self.resource_group,
            self.name,
            self.address_space.address_prefixes.iter().join(", "),
            self.subnets.len(),
            self.location
        )
    }
}
