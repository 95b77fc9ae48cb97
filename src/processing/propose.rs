//! Request handling: validate, look up the VNet, run the allocator, build the response.

use crate::allocation::{find_available_with_prefix, validate_prefix_length};
use crate::azure::VnetDirectory;
use crate::error::{Error, Result};
use crate::models::Ipv4;
use crate::output::{ProposalResponse, ProposedSubnetResponse};
use itertools::Itertools;

/// Caller supplied parameters, unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalRequest {
    pub subscription_id: String,
    pub resource_group: String,
    pub vnet_name: String,
    /// Requested prefix length as typed, e.g. "24".
    pub cidr: String,
    /// Only allocate from this address space prefix, e.g. "10.1.0.0/16".
    pub address_space: Option<String>,
}

impl ProposalRequest {
    /// Reject empty fields and a malformed address space, naming fields the
    /// way the HTTP API does.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("subscriptionId", &self.subscription_id),
            ("resourceGroupName", &self.resource_group),
            ("virtualNetworkName", &self.vnet_name),
            ("cidr", &self.cidr),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(Error::InvalidInput(format!("{name} is empty")));
        }
        self.desired_address_space().map(|_| ())
    }

    /// The requested address space prefix; blank counts as not given.
    pub fn desired_address_space(&self) -> Result<Option<Ipv4>> {
        let text = self
            .address_space
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());
        match text {
            Some(text) => Ipv4::new(text).map(Some).map_err(|err| {
                log::warn!("Rejected address space: {err}");
                Error::InvalidInput("desiredAddressSpace is invalid".to_string())
            }),
            None => Ok(None),
        }
    }
}

/// Answer a proposal request. Every outcome, including failures, becomes a response.
pub fn propose_subnet(directory: &dyn VnetDirectory, request: &ProposalRequest) -> ProposalResponse {
    log::info!(
        "#Start propose_subnet() {}/{} size={:?}",
        request.resource_group,
        request.vnet_name,
        request.cidr
    );
    let response = try_propose_subnet(directory, request).unwrap_or_else(|err| {
        if err.status_code() >= 500 {
            log::error!("Error has been encountered {err}");
        } else {
            log::warn!("Request rejected: {err}");
        }
        ProposalResponse::from_error(&err)
    });
    log::info!("#End propose_subnet() status={}", response.status());
    response
}

fn try_propose_subnet(
    directory: &dyn VnetDirectory,
    request: &ProposalRequest,
) -> Result<ProposalResponse> {
    request.validate()?;
    let desired = request.desired_address_space()?;

    let cidr = request.cidr.trim();
    let size = match cidr.parse::<i64>().ok().map(validate_prefix_length) {
        Some(Ok(size)) => size,
        _ => {
            log::warn!("Invalid CIDR size, must be between 0 and 32: {cidr:?}");
            return Ok(ProposalResponse::failed(
                400,
                format!("Invalid CIDR size requested: {cidr}"),
            ));
        }
    };

    let vnet = directory.find_vnet(&request.resource_group, &request.vnet_name)?;
    log::debug!("Found vnet {vnet}");

    let mut prefixes = vnet.ipv4_address_prefixes()?;
    let used = vnet.used_subnets()?;
    for stray in used.iter().filter(|u| !prefixes.iter().any(|p| u.subnet_of(p))) {
        log::warn!("Subnet {stray} lies outside the address space of {}", vnet.name);
    }

    if let Some(desired) = desired {
        prefixes.retain(|prefix| *prefix == desired);
        if prefixes.is_empty() {
            return Ok(ProposalResponse::failed(
                404,
                format!(
                    "Requested address space ({desired}) not found in VNet {}/{}",
                    request.resource_group, request.vnet_name
                ),
            ));
        }
    }

    match prefixes.iter().find(|prefix| size >= prefix.mask()) {
        Some(prefix) => log::info!(
            "CIDR is within range as {size} is a smaller or same sized subnet than {prefix}"
        ),
        None => {
            return Ok(ProposalResponse::failed(
                400,
                format!(
                    "VNet {}/{} cannot accept a subnet of size {size}",
                    request.resource_group, request.vnet_name
                ),
            ))
        }
    }

    log::info!(
        "The subnets used within {} are [{}]",
        vnet.name,
        used.iter().sorted().join(", ")
    );

    let response = match find_available_with_prefix(&prefixes, size, &used)? {
        Some((address_space, proposal)) => {
            log::info!("The suggested, next available subnet is {proposal} in {address_space}");
            ProposalResponse::Proposed(ProposedSubnetResponse::new(&vnet, address_space, proposal))
        }
        None => {
            log::warn!("No /{size} left in {}", prefixes.iter().join(", "));
            ProposalResponse::no_available_subnet(&request.resource_group, &request.vnet_name, size)
        }
    };
    Ok(response)
}
