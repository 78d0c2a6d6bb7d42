//! Fixed classification domains assigned by the scheduler
//!
//! The gua (trigram) domain is a closed enumeration of eight values and the
//! element domain a closed enumeration of five. The CPU domain is open and
//! only known from observed data.

/// Number of trigram classifications (gua 0..=7)
pub const GUA_COUNT: usize = 8;

/// Number of element classifications (element 0..=4)
pub const ELEMENT_COUNT: usize = 5;

/// Display names for each gua, indexed by gua value
pub const GUA_NAMES: [&str; GUA_COUNT] = ["KUN", "ZHEN", "KAN", "DUI", "GEN", "LI", "XUN", "QIAN"];

/// Display names for each element, indexed by element value
pub const ELEMENT_NAMES: [&str; ELEMENT_COUNT] = ["Wood", "Fire", "Earth", "Metal", "Water"];

/// Iterate over the fixed gua domain
pub fn gua_domain() -> impl Iterator<Item = i64> {
    0..GUA_COUNT as i64
}

/// Iterate over the fixed element domain
pub fn element_domain() -> impl Iterator<Item = i64> {
    0..ELEMENT_COUNT as i64
}

/// Look up a display name, falling back to `Unknown<N>` outside the domain
pub fn label_for(names: &[String], value: i64) -> String {
    usize::try_from(value)
        .ok()
        .and_then(|idx| names.get(idx))
        .cloned()
        .unwrap_or_else(|| format!("Unknown{}", value))
}
