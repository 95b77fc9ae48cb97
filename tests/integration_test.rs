//! Integration tests for azure-next-cidr
//!
//! These tests run whole proposal requests against a checked-in inventory.

use azure_next_cidr::{
    azure::{StaticDirectory, VnetDirectory},
    find_available_across_prefixes,
    models::Ipv4,
    propose_subnet, ProposalRequest,
};
use std::path::Path;

const INVENTORY: &str = "src/tests/test_data/vnet_test_inventory_01.json";

fn directory() -> StaticDirectory {
    StaticDirectory::from_file(Path::new(INVENTORY)).expect("Failed to read test inventory")
}

fn request(resource_group: &str, vnet_name: &str, cidr: &str) -> ProposalRequest {
    ProposalRequest {
        subscription_id: "00000000-0000-0000-0000-000000000000".to_string(),
        resource_group: resource_group.to_string(),
        vnet_name: vnet_name.to_string(),
        cidr: cidr.to_string(),
        address_space: None,
    }
}

fn proposed(resource_group: &str, vnet_name: &str, cidr: &str) -> Option<String> {
    propose_subnet(&directory(), &request(resource_group, vnet_name, cidr))
        .proposed_cidr()
        .map(|ip| ip.to_string())
}

#[test]
fn test_first_prefix_full_uses_second() {
    let rg = "rg-ldo-euw-dev-build";
    let vnet = "vnet-ldo-euw-dev-01";
    assert_eq!(proposed(rg, vnet, "24").as_deref(), Some("10.1.4.0/24"));
    assert_eq!(proposed(rg, vnet, "26").as_deref(), Some("10.1.1.64/26"));
    assert_eq!(proposed(rg, vnet, "28").as_deref(), Some("10.1.1.64/28"));
    assert_eq!(proposed(rg, vnet, "16").as_deref(), None, "only room for /16 is taken");
}

#[test]
fn test_dual_stack_vnet_ignores_ipv6() {
    let rg = "rg-ldo-euw-dev-build";
    let vnet = "vnet-ldo-euw-dev-02";
    assert_eq!(proposed(rg, vnet, "27").as_deref(), Some("10.2.0.64/27"));
    assert_eq!(proposed(rg, vnet, "24").as_deref(), Some("10.2.1.0/24"));
}

#[test]
fn test_same_name_in_other_resource_group() {
    assert_eq!(
        proposed("rg-ldo-euw-prod", "vnet-ldo-euw-dev-01", "24").as_deref(),
        Some("172.16.0.0/24")
    );
}

#[test]
fn test_status_codes() {
    let directory = directory();
    let rg = "rg-ldo-euw-dev-build";
    let cases = [
        (request(rg, "vnet-full", "24"), 404),
        (request(rg, "vnet-full", "16"), 400),
        (request(rg, "vnet-missing", "24"), 404),
        (request(rg, "vnet-full", "33"), 400),
        (request("", "vnet-full", "24"), 400),
        (request(rg, "vnet-ldo-euw-dev-02", "29"), 200),
    ];
    for (request, status) in cases {
        let response = propose_subnet(&directory, &request);
        assert_eq!(response.status(), status, "{request:?}");
        assert!(response.to_json().is_ok());
    }
}

#[test]
fn test_proposal_matches_engine() {
    let vnet = directory()
        .find_vnet("rg-ldo-euw-dev-build", "vnet-ldo-euw-dev-01")
        .expect("Failed to find vnet");
    let prefixes = vnet.ipv4_address_prefixes().expect("Failed to parse prefixes");
    let used = vnet.used_subnets().expect("Failed to parse subnets");

    let engine = find_available_across_prefixes(&prefixes, 25, &used).unwrap();
    let response = propose_subnet(
        &directory(),
        &request("rg-ldo-euw-dev-build", "vnet-ldo-euw-dev-01", "25"),
    );
    assert_eq!(response.proposed_cidr(), engine);
    assert_eq!(engine, Some(Ipv4::new("10.1.1.128/25").unwrap()));
    assert!(used.iter().all(|u| !u.overlaps(&engine.unwrap())));
}

#[test]
fn test_response_json_shape() {
    let response = propose_subnet(
        &directory(),
        &request("rg-ldo-euw-dev-build", "vnet-ldo-euw-dev-02", "27"),
    );
    let body: serde_json::Value =
        serde_json::from_str(&response.to_json().unwrap()).expect("Response should be JSON");
    assert_eq!(body["name"], "vnet-ldo-euw-dev-02");
    assert_eq!(body["type"], "Microsoft.Network/virtualNetworks");
    assert_eq!(body["location"], "westeurope");
    assert_eq!(body["addressSpace"], "10.2.0.0/22");
    assert_eq!(body["proposedCIDR"], "10.2.0.64/27");
    assert_eq!(body["azureUsableHosts"], 27);
}

#[test]
fn test_address_space_selects_prefix() {
    let directory = directory();
    let rg = "rg-ldo-euw-dev-build";
    let vnet = "vnet-ldo-euw-dev-01";
    let in_space = |address_space: &str| ProposalRequest {
        address_space: Some(address_space.to_string()),
        ..request(rg, vnet, "26")
    };

    let response = propose_subnet(&directory, &in_space("10.1.0.0/16"));
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    assert_eq!(body["addressSpace"], "10.1.0.0/16");
    assert_eq!(body["proposedCIDR"], "10.1.1.64/26");

    let cases = [
        ("10.0.0.0/24", 404, "NotFound, VNet rg-ldo-euw-dev-build/vnet-ldo-euw-dev-01 cannot accept a subnet of size 26"),
        ("10.9.0.0/16", 404, "NotFound, Requested address space (10.9.0.0/16) not found in VNet rg-ldo-euw-dev-build/vnet-ldo-euw-dev-01"),
        ("10.1.0.0/33", 400, "BadRequest, Invalid input: desiredAddressSpace is invalid"),
    ];
    for (address_space, status, message) in cases {
        let response = propose_subnet(&directory, &in_space(address_space));
        assert_eq!(response.status(), status, "{address_space}");
        let body: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(body["message"], message);
    }
}
