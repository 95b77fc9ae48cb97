//! First-fit search for a free block.

use super::partition::{partition, validate_prefix_length};
use crate::error::Result;
use crate::models::Ipv4;

/// Lowest `/requested` block inside `parent` that overlaps none of `used`.
///
/// `used` may be unsorted, may overlap itself and may hold blocks outside
/// `parent`. A candidate is rejected if it intersects a used block in any
/// way: partial overlap, inside it, or around it.
///
/// Returns `Ok(None)` when every candidate is taken.
pub fn find_first_available(parent: Ipv4, requested: u8, used: &[Ipv4]) -> Result<Option<Ipv4>> {
    let mut candidates = partition(parent, requested)?;
    let used: Vec<&Ipv4> = used.iter().filter(|u| u.overlaps(&parent)).collect();

    while let Some(candidate) = candidates.next() {
        let blocked_until = used
            .iter()
            .filter(|u| u.overlaps(&candidate))
            .map(|u| u.hi())
            .max();
        match blocked_until {
            None => return Ok(Some(candidate)),
            // every candidate starting before the end of the used block overlaps it too
            Some(hi) => candidates.skip_through(hi),
        }
    }
    Ok(None)
}

/// Try each address space prefix in order and return the first free block.
///
/// Prefixes smaller than the requested block are skipped. `used` is shared by
/// all prefixes; each used block only matters to the prefix it falls in.
pub fn find_available_across_prefixes(
    prefixes: &[Ipv4],
    requested: u8,
    used: &[Ipv4],
) -> Result<Option<Ipv4>> {
    Ok(find_available_with_prefix(prefixes, requested, used)?.map(|(_, found)| found))
}

/// Like [`find_available_across_prefixes`], also returning the prefix the
/// block was carved from as `(prefix, block)`.
pub fn find_available_with_prefix(
    prefixes: &[Ipv4],
    requested: u8,
    used: &[Ipv4],
) -> Result<Option<(Ipv4, Ipv4)>> {
    let requested = validate_prefix_length(i64::from(requested))?;
    for prefix in prefixes.iter().filter(|p| requested >= p.mask()) {
        if let Some(found) = find_first_available(*prefix, requested, used)? {
            return Ok(Some((*prefix, found)));
        }
    }
    Ok(None)
}
