//! Splitting a parent block into equal sized candidates.

use crate::error::{Error, Result};
use crate::models::{Ipv4, MAX_LENGTH};
use std::net::Ipv4Addr;

/// Check a caller supplied prefix length and narrow it to `u8`.
pub fn validate_prefix_length(n: i64) -> Result<u8> {
    u8::try_from(n)
        .ok()
        .filter(|len| *len <= MAX_LENGTH)
        .ok_or(Error::InvalidPrefixLength(n))
}

/// Every `/requested` block inside `parent`, lowest base address first.
///
/// Fails with [`Error::PrefixTooLarge`] when `requested` is shorter than the
/// parent's own prefix length.
pub fn partition(parent: Ipv4, requested: u8) -> Result<Subnets> {
    let requested = validate_prefix_length(i64::from(requested))?;
    if requested < parent.mask() {
        return Err(Error::PrefixTooLarge { requested, parent });
    }
    Ok(Subnets {
        base: u32::from(parent.addr()),
        mask: requested,
        next: 0,
        count: parent.size() >> (MAX_LENGTH - requested),
    })
}

/// Lazy sequence produced by [`partition`].
///
/// A clone continues from the same position; call [`partition`] again for a
/// fresh sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnets {
    base: u32,
    mask: u8,
    next: u64,
    count: u64,
}

impl Subnets {
    /// Candidates not yet produced.
    pub fn remaining(&self) -> u64 {
        self.count - self.next
    }

    /// Advance past every candidate whose range starts at or before `addr`.
    pub fn skip_through(&mut self, addr: Ipv4Addr) {
        let addr = u64::from(u32::from(addr));
        let base = u64::from(self.base);
        if addr < base {
            return;
        }
        let index = (addr - base) >> (MAX_LENGTH - self.mask);
        self.next = self.next.max(index + 1).min(self.count);
    }
}

impl Iterator for Subnets {
    type Item = Ipv4;

    fn next(&mut self) -> Option<Ipv4> {
        if self.next >= self.count {
            return None;
        }
        // offset < 2^32 because the candidates never leave the parent
        let offset = (self.next << (MAX_LENGTH - self.mask)) as u32;
        self.next += 1;
        Some(Ipv4::from_aligned(self.base + offset, self.mask))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
