//! Class name generation.
//!
//! Two schemes:
//!
//! - **Human** names slug a label (`"Body meta label"` → `w-body-meta-label`).
//!   A [`ClassNamer`] is scoped to one compile; the first claim of a name gets
//!   it bare, later claims get `-1`, `-2`, … in claim order.
//! - **Atomic** names are content addressed: a hash of the selector variant,
//!   breakpoint, property and rendered value. Equal declarations get equal
//!   names no matter which instance asked, or in what order.

use std::collections::{HashMap, HashSet};

use heck::ToKebabCase;
use xxhash_rust::xxh3::xxh3_64;

use crate::cascade::SelectorVariant;

/// Field separator of the atomic hash key; cannot occur in CSS text.
const KEY_SEPARATOR: &str = "\u{1f}";

/// Issues unique human-readable class names for one compile.
#[derive(Debug, Default)]
pub struct ClassNamer {
    prefix: String,
    issued: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl ClassNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Claims a class name derived from `label`.
    ///
    /// Never returns a name it has returned before, including names that only
    /// look like suffixed ones (a label slugging to `box-1` after `box` was
    /// claimed twice gets `box-1-1`).
    pub fn claim(&mut self, label: &str) -> String {
        let mut slug = slugify(label);
        if slug.is_empty() {
            slug.push_str("element");
        }
        let base = format!("{}{}", self.prefix, slug);
        let next = self.next_suffix.entry(base.clone()).or_insert(0);
        loop {
            let candidate = match *next {
                0 => base.clone(),
                n => format!("{base}-{n}"),
            };
            *next += 1;
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Lowercase, dash separated, ASCII-only form of a label.
pub fn slugify(label: &str) -> String {
    deunicode::deunicode(label).to_kebab_case()
}

/// Content-addressed class name of a single declaration.
///
/// `property` and `value` are the rendered CSS text, so two declarations that
/// render identically share a name.
pub fn atomic_class_name(
    prefix: &str,
    variant: &SelectorVariant<'_>,
    breakpoint_id: &str,
    property: &str,
    value: &str,
) -> String {
    let key = [
        variant.descendant.unwrap_or_default(),
        variant.state.unwrap_or_default(),
        breakpoint_id,
        property,
        value,
    ]
    .join(KEY_SEPARATOR);
    format!("{prefix}{}", to_base36(xxh3_64(key.as_bytes())))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("ListItem"), "list-item");
        assert_eq!(slugify("body meta label"), "body-meta-label");
        assert_eq!(slugify("box%instance#label"), "box-instance-label");
        assert_eq!(slugify("Café Menü"), "cafe-menu");
    }

    #[test]
    fn test_claim_suffixes_in_claim_order() {
        let mut namer = ClassNamer::new("w-");
        assert_eq!(namer.claim("ListItem"), "w-list-item");
        assert_eq!(namer.claim("ListItem"), "w-list-item-1");
        assert_eq!(namer.claim("list item"), "w-list-item-2");
        assert_eq!(namer.claim("Box"), "w-box");
    }

    #[test]
    fn test_claim_never_reissues_a_name() {
        let mut namer = ClassNamer::new("w-");
        assert_eq!(namer.claim("box 1"), "w-box-1");
        assert_eq!(namer.claim("box"), "w-box");
        // "w-box-1" is taken by the first label, so the next box skips it.
        assert_eq!(namer.claim("box"), "w-box-2");
        assert_eq!(namer.claim("box 1"), "w-box-1-1");
    }

    #[test]
    fn test_claim_empty_label() {
        let mut namer = ClassNamer::new("w-");
        assert_eq!(namer.claim("%%%"), "w-element");
    }

    #[test]
    fn test_namers_do_not_share_state() {
        let mut first = ClassNamer::new("w-");
        let mut second = ClassNamer::new("w-");
        assert_eq!(first.claim("Box"), "w-box");
        assert_eq!(second.claim("Box"), "w-box");
    }

    #[test]
    fn test_atomic_name_is_pure() {
        let variant = SelectorVariant::PLAIN;
        let a = atomic_class_name("c", &variant, "base", "color", "red");
        let b = atomic_class_name("c", &variant, "base", "color", "red");
        assert_eq!(a, b);
        assert!(a.starts_with('c'));
        assert!(a[1..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_atomic_name_depends_on_every_field() {
        let plain = SelectorVariant::PLAIN;
        let hover = SelectorVariant {
            descendant: None,
            state: Some(":hover"),
        };
        let links = SelectorVariant {
            descendant: Some(" a"),
            state: None,
        };
        let reference = atomic_class_name("c", &plain, "base", "color", "red");
        let variants = [
            atomic_class_name("c", &hover, "base", "color", "red"),
            atomic_class_name("c", &links, "base", "color", "red"),
            atomic_class_name("c", &plain, "tablet", "color", "red"),
            atomic_class_name("c", &plain, "base", "background-color", "red"),
            atomic_class_name("c", &plain, "base", "color", "blue"),
        ];
        for other in variants {
            assert_ne!(reference, other);
        }
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(u64::MAX), "3w5e11264sgsf");
    }
}
