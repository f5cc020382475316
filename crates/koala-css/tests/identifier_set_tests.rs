//! Integration tests for the bounded identifier interner.

use koala_css::error::IdentifierSetError;
use koala_css::identifier_set::IdentifierSet;

/// Interning the same spelling from two different sources (a `String` and a
/// direct `&str`) yields the same index, as zml relies on when two elements
/// share a class name.
#[test]
fn test_distinct_sources_of_same_spelling_share_index() {
    let mut set = IdentifierSet::new(true, 64);
    let owned = String::from("card");
    let a = set.intern(owned.chars()).unwrap();
    let b = set.intern("card".chars()).unwrap();
    assert_eq!(a, b);
}

/// `get` returns the text in the case it was normalized to, not necessarily
/// the case of the most recent `intern` call.
#[test]
fn test_case_insensitive_get_returns_lowercased() {
    let mut set = IdentifierSet::new(false, 64);
    let index = set.intern("Card".chars()).unwrap();
    let _ = set.intern("CARD".chars()).unwrap();
    assert_eq!(set.get(index), "card");
}

/// `lookup` finds an entry interned earlier without inserting a duplicate.
#[test]
fn test_lookup_finds_previously_interned_entry() {
    let mut set = IdentifierSet::new(true, 64);
    let index = set.intern("main".chars()).unwrap();
    assert_eq!(set.lookup("main".chars()), Some(index));
    assert_eq!(set.len(), 1);
}

/// Once a set is at capacity, a genuinely new spelling is rejected, but the
/// set remains usable for entries already present.
#[test]
fn test_overflow_is_recoverable_for_interned_entries() {
    let mut set = IdentifierSet::new(true, 2);
    set.intern("a".chars()).unwrap();
    set.intern("b".chars()).unwrap();
    assert_eq!(set.intern("c".chars()), Err(IdentifierSetError::Overflow));
    assert_eq!(set.intern("a".chars()), Ok(0));
    assert_eq!(set.len(), 2);
}

/// A zero-capacity set rejects every intern, even the first one.
#[test]
fn test_zero_capacity_set_rejects_any_new_entry() {
    let mut set = IdentifierSet::new(true, 0);
    assert_eq!(set.intern("a".chars()), Err(IdentifierSetError::Overflow));
    assert!(set.is_empty());
}
