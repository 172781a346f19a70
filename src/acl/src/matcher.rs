//! Resource matching
//!
//! A grant pattern is either the universal wildcard `*` or a literal resource
//! identifier compared case-sensitively. There is no prefix or glob support.

/// Universal resource wildcard
pub const WILDCARD: &str = "*";

/// Does `candidate` match the grant `pattern`?
pub fn matches(candidate: &str, pattern: &str) -> bool {
    pattern == WILDCARD || pattern == candidate
}

/// Does `candidate` match any of `patterns`?
pub fn matches_any<S: AsRef<str>>(candidate: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|p| matches(candidate, p.as_ref()))
}
