//! IPv4 address blocks in CIDR notation.
//!
//! Provides the [`Ipv4`] block type used by the allocation engine, along with
//! the bit helpers it is built on.

use crate::error::{Error, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Addresses Azure keeps for itself in every subnet (network, gateway, 2x DNS, broadcast).
const AZURE_RESERVED_ADDRESSES: u64 = 5;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use azure_next_cidr::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32> {
    if len > MAX_LENGTH {
        return Err(Error::InvalidPrefixLength(i64::from(len)));
    }
    let right_len = MAX_LENGTH - len;
    let mask = (u64::from(u32::MAX) >> right_len) << right_len;
    Ok(mask as u32)
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Number of addresses Azure lets VMs use in a subnet of this length.
///
/// Azure only creates subnets up to /29, so anything longer yields `None`.
pub fn num_az_hosts(len: u8) -> Option<u64> {
    if len > MAX_LENGTH - 3 {
        None
    } else {
        Some((1u64 << (MAX_LENGTH - len)) - AZURE_RESERVED_ADDRESSES)
    }
}

/// A canonical IPv4 CIDR block.
///
/// The base address never has host bits set, so two blocks with the same
/// range always compare equal. Blocks order by base address, then by prefix
/// length (the bigger block first).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    addr: Ipv4Addr,
    mask: u8,
}

impl Ipv4 {
    /// Parse a block from CIDR text such as `"10.0.0.0/24"`.
    ///
    /// Text with host bits set (`"10.0.0.1/24"`) is rejected.
    pub fn new(addr_cidr: &str) -> Result<Ipv4> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| Error::InvalidCidr(format!("{addr_cidr}: expected address/length")))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| Error::InvalidCidr(format!("{addr_cidr}: invalid address {addr}")))?;
        let mask: u8 = Some(mask)
            .filter(|m| !m.is_empty() && m.bytes().all(|b| b.is_ascii_digit()))
            .filter(|m| m.len() == 1 || !m.starts_with('0'))
            .and_then(|m| m.parse().ok())
            .ok_or_else(|| Error::InvalidCidr(format!("{addr_cidr}: invalid prefix length {mask}")))?;
        Ipv4::from_parts(addr, mask)
    }

    /// Build a block from an address and prefix length, rejecting host bits.
    pub fn from_parts(addr: Ipv4Addr, mask: u8) -> Result<Ipv4> {
        if mask > MAX_LENGTH {
            return Err(Error::InvalidCidr(format!(
                "{addr}/{mask}: prefix length longer than {MAX_LENGTH}"
            )));
        }
        let base = cut_addr(addr, mask)?;
        if base != addr {
            return Err(Error::InvalidCidr(format!(
                "{addr}/{mask}: host bits set, network is {base}/{mask}"
            )));
        }
        Ok(Ipv4 { addr, mask })
    }

    /// Caller guarantees `base` is aligned to `mask` and `mask <= 32`.
    pub(crate) fn from_aligned(base: u32, mask: u8) -> Ipv4 {
        debug_assert!(mask <= MAX_LENGTH);
        debug_assert_eq!(u64::from(base) % (1u64 << (MAX_LENGTH - mask)), 0);
        Ipv4 {
            addr: Ipv4Addr::from(base),
            mask,
        }
    }

    /// Base (network) address.
    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    /// Prefix length.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        self.addr
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.hi_bits())
    }

    /// Number of addresses covered, 2^(32 - mask).
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LENGTH - self.mask)
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let ip = u32::from(ip);
        self.lo_bits() <= ip && ip <= self.hi_bits()
    }

    /// True when the two address ranges share at least one address.
    ///
    /// Symmetric, and true for containment in either direction.
    pub fn overlaps(&self, other: &Ipv4) -> bool {
        self.lo_bits() <= other.hi_bits() && other.lo_bits() <= self.hi_bits()
    }

    /// True when `self` lies entirely inside `other` (equal blocks included).
    pub fn subnet_of(&self, other: &Ipv4) -> bool {
        other.mask <= self.mask && other.contains(self.addr)
    }

    fn lo_bits(&self) -> u32 {
        u32::from(self.addr)
    }

    fn hi_bits(&self) -> u32 {
        // mask <= 32 is an invariant of the type
        let host_bits = (u64::from(u32::MAX) >> self.mask) as u32;
        self.lo_bits() | host_bits
    }
}

impl FromStr for Ipv4 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Ipv4> {
        Ipv4::new(s)
    }
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4::new(&s).map_err(de::Error::custom)
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
