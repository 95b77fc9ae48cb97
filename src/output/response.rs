//! JSON response bodies and their status codes.

use crate::error::Error;
use crate::models::{num_az_hosts, Ipv4, Vnet};
use serde::Serialize;

/// Body returned with a proposal.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposedSubnetResponse {
    /// VNet name.
    pub name: String,
    /// VNet resource id.
    pub id: String,
    /// ARM resource type of the VNet.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Azure region of the VNet.
    pub location: String,
    /// Address space prefix the proposal was carved from.
    pub address_space: Ipv4,
    /// The proposed subnet.
    #[serde(rename = "proposedCIDR")]
    pub proposed_cidr: Ipv4,
    /// Addresses left for VMs once Azure takes its 5, null past /29.
    pub azure_usable_hosts: Option<u64>,
}

impl ProposedSubnetResponse {
    pub fn new(vnet: &Vnet, address_space: Ipv4, proposed_cidr: Ipv4) -> ProposedSubnetResponse {
        ProposedSubnetResponse {
            name: vnet.name.clone(),
            id: vnet.id.clone(),
            resource_type: vnet.resource_type.clone(),
            location: vnet.location.clone(),
            address_space,
            proposed_cidr,
            azure_usable_hosts: num_az_hosts(proposed_cidr.mask()),
        }
    }
}

/// Body returned for every non 200 outcome.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Status code as text, e.g. "404".
    pub code: String,
    /// "<Reason>, <detail>".
    pub message: String,
}

/// Outcome of a proposal request, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub enum ProposalResponse {
    Proposed(ProposedSubnetResponse),
    Failed { status: u16, body: ErrorResponse },
}

impl ProposalResponse {
    pub fn failed(status: u16, detail: impl AsRef<str>) -> ProposalResponse {
        ProposalResponse::Failed {
            status,
            body: ErrorResponse {
                code: status.to_string(),
                message: format!("{}, {}", reason(status), detail.as_ref()),
            },
        }
    }

    pub fn from_error(err: &Error) -> ProposalResponse {
        ProposalResponse::failed(err.status_code(), err.to_string())
    }

    /// The VNet exists but none of its prefixes has room.
    pub fn no_available_subnet(resource_group: &str, vnet_name: &str, size: u8) -> ProposalResponse {
        ProposalResponse::failed(
            404,
            format!("VNet {resource_group}/{vnet_name} cannot accept a subnet of size {size}"),
        )
    }

    pub fn status(&self) -> u16 {
        match self {
            ProposalResponse::Proposed(_) => 200,
            ProposalResponse::Failed { status, .. } => *status,
        }
    }

    pub fn proposed_cidr(&self) -> Option<Ipv4> {
        match self {
            ProposalResponse::Proposed(proposal) => Some(proposal.proposed_cidr),
            ProposalResponse::Failed { .. } => None,
        }
    }

    /// Indented JSON body.
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            ProposalResponse::Proposed(proposal) => serde_json::to_string_pretty(proposal),
            ProposalResponse::Failed { body, .. } => serde_json::to_string_pretty(body),
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "BadRequest",
        404 => "NotFound",
        _ => "InternalServerError",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_proposed_json() {
        let vnet = Vnet {
            name: "vnet-dev-01".to_string(),
            id: "/subscriptions/0000/vnet-dev-01".to_string(),
            resource_type: "Microsoft.Network/virtualNetworks".to_string(),
            location: "westeurope".to_string(),
            ..Default::default()
        };
        let response = ProposalResponse::Proposed(ProposedSubnetResponse::new(
            &vnet,
            Ipv4::new("10.0.0.0/16").unwrap(),
            Ipv4::new("10.0.2.0/24").unwrap(),
        ));
        assert_eq!(response.status(), 200);
        assert_eq!(response.proposed_cidr(), Some(Ipv4::new("10.0.2.0/24").unwrap()));

        let body: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "vnet-dev-01",
                "id": "/subscriptions/0000/vnet-dev-01",
                "type": "Microsoft.Network/virtualNetworks",
                "location": "westeurope",
                "addressSpace": "10.0.0.0/16",
                "proposedCIDR": "10.0.2.0/24",
                "azureUsableHosts": 251
            })
        );
    }

    #[test]
    fn test_usable_hosts_null_for_tiny_block() {
        let block = Ipv4::new("10.0.0.4/30").unwrap();
        let proposal = ProposedSubnetResponse::new(&Vnet::default(), block, block);
        assert_eq!(proposal.azure_usable_hosts, None);
    }

    #[test]
    fn test_failed_json() {
        let response = ProposalResponse::no_available_subnet("rg-dev", "vnet-dev-01", 24);
        assert_eq!(response.status(), 404);
        assert_eq!(response.proposed_cidr(), None);
        let body: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "code": "404",
                "message": "NotFound, VNet rg-dev/vnet-dev-01 cannot accept a subnet of size 24"
            })
        );
    }

    #[test]
    fn test_from_error() {
        let response = ProposalResponse::from_error(&Error::Lookup("az exited 1".to_string()));
        assert_eq!(response.status(), 500);
        match response {
            ProposalResponse::Failed { body, .. } => {
                assert_eq!(body.message, "InternalServerError, Lookup failed: az exited 1")
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
