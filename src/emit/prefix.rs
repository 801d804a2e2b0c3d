//! Vendor prefixed duplicates.
//!
//! Properties listed in [`VENDOR_PREFIXES`] render twice: the prefixed line
//! first, the standard line second. The table is part of the output contract;
//! bump [`VENDOR_PREFIX_TABLE_VERSION`] whenever an entry changes.

/// Version of [`VENDOR_PREFIXES`].
pub const VENDOR_PREFIX_TABLE_VERSION: u32 = 1;

/// Standard property name to the prefix of its duplicate. Sorted by property.
pub const VENDOR_PREFIXES: &[(&str, &str)] = &[
    ("appearance", "-webkit-"),
    ("backdrop-filter", "-webkit-"),
    ("background-clip", "-webkit-"),
    ("box-decoration-break", "-webkit-"),
    ("mask-image", "-webkit-"),
    ("mask-position", "-webkit-"),
    ("mask-repeat", "-webkit-"),
    ("mask-size", "-webkit-"),
    ("text-size-adjust", "-webkit-"),
    ("user-select", "-webkit-"),
];

/// Prefix that `property` must additionally render with, if any.
pub fn vendor_prefix(property: &str) -> Option<&'static str> {
    VENDOR_PREFIXES
        .binary_search_by(|(name, _)| (*name).cmp(property))
        .ok()
        .map(|index| VENDOR_PREFIXES[index].1)
}
