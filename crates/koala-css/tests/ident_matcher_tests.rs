//! Integration tests for the compile-time keyword matcher.

use koala_css::ident_matcher::{match_ident, AtRuleKeyword, IdentMatcher, UnitKeyword, AT_RULE_KEYWORDS, UNIT_KEYWORDS};

/// Feeding one codepoint at a time, as the tokenizer does while scanning an
/// ident, gives the same result as matching the whole string at once.
#[test]
fn test_incremental_feed_agrees_with_match_ident() {
    let mut matcher = IdentMatcher::new(&AT_RULE_KEYWORDS);
    for c in "KeyFrames".chars() {
        matcher.feed(c);
    }
    assert_eq!(matcher.finish(), Some(AtRuleKeyword::Keyframes));
    assert_eq!(match_ident(&AT_RULE_KEYWORDS, "KeyFrames"), Some(AtRuleKeyword::Keyframes));
}

/// A candidate that is itself a prefix of another keyword in the same table
/// (`s` vs `supports`... here `q` vs no other `q`-prefixed unit, and `pt`
/// vs `pc`) only matches at its own exact length.
#[test]
fn test_shared_prefix_keywords_do_not_cross_match() {
    assert_eq!(match_ident(&UNIT_KEYWORDS, "pt"), Some(UnitKeyword::Pt));
    assert_eq!(match_ident(&UNIT_KEYWORDS, "pc"), Some(UnitKeyword::Pc));
    assert_eq!(match_ident(&UNIT_KEYWORDS, "p"), None);
}

/// An empty identifier never matches anything.
#[test]
fn test_empty_ident_never_matches() {
    assert_eq!(match_ident(&AT_RULE_KEYWORDS, ""), None);
}

/// A matcher can be fed zero codepoints and still finish cleanly (the
/// `font-face`/`media` tables both still have an alive candidate at
/// position zero until proven otherwise).
#[test]
fn test_unfed_matcher_finishes_as_none() {
    let matcher: IdentMatcher<AtRuleKeyword, 8> = IdentMatcher::new(&AT_RULE_KEYWORDS);
    assert_eq!(matcher.finish(), None);
}
