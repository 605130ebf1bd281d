//! Interning of common GEDCOM strings.
//!
//! A large file repeats the same short lines and tags millions of times
//! (`0 TRLR`, `1 BIRT`, `2 DATE`, the bare digits used as levels). Lines
//! that exactly match an entry in the intern set are returned as borrows of
//! a single `'static` backing string instead of per-line allocations.
//!
//! The set is a process-wide immutable constant, built once on first use.

use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashSet;

/// Whole lines worth sharing: the level/tag combinations that dominate
/// real files.
static COMMON_STRINGS: &[&str] = &[
    "0 HEAD", "0 TRLR",
    "1 BIRT", "1 DEAT", "1 CHR", "1 BURI", "1 CHAN", "1 RESI", "1 CENS",
    "1 SEX M", "1 SEX F", "1 SEX U",
    "1 MARR", "1 DIV", "1 ENGA", "1 EVEN", "1 NOTE", "1 OBJE", "1 SOUR",
    "2 TYPE Occupation", "2 TYPE Religion", "2 DATA", "2 CONT", "2 CONC",
    "3 CONT", "3 CONC",
];

static INTERN_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| COMMON_STRINGS.iter().copied().collect());

/// Intern a decoded logical line or token.
///
/// An exact match against the common-string set returns a borrow of the
/// static entry; anything else keeps its own allocation.
#[must_use]
pub fn intern(s: String) -> Cow<'static, str> {
    match INTERN_SET.get(s.as_str()) {
        Some(&shared) => Cow::Borrowed(shared),
        None => Cow::Owned(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_line_is_borrowed() {
        let interned = intern("0 TRLR".to_string());
        assert!(matches!(interned, Cow::Borrowed(_)));
        assert_eq!(interned, "0 TRLR");
    }

    #[test]
    fn test_uncommon_line_is_owned() {
        let interned = intern("1 NAME John /Doe/".to_string());
        assert!(matches!(interned, Cow::Owned(_)));
    }

    #[test]
    fn test_interned_lines_share_backing() {
        let a = intern("1 BIRT".to_string());
        let b = intern("1 BIRT".to_string());
        if let (Cow::Borrowed(a), Cow::Borrowed(b)) = (&a, &b) {
            assert!(std::ptr::eq(*a, *b));
        } else {
            panic!("expected both to be borrowed");
        }
    }
}
