//! Runtime fallback configuration.
//!
//! The default treatment of characters the target charset cannot represent
//! is set via the `FRANKENICONV_FALLBACK` environment variable:
//! - `substitute` (default): write the replacement marker `?` and count a
//!   non-reversible conversion.
//! - `ignore`: drop the character and count a non-reversible conversion.
//! - `strict`: fail the call with an invalid-sequence error at the
//!   character's source offset.
//!
//! A `//TRANSLIT` or `//IGNORE` suffix on the target charset name overrides
//! the default for that descriptor.

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable read once per process.
pub const FALLBACK_ENV: &str = "FRANKENICONV_FALLBACK";

/// Marker written in place of unrepresentable characters.
pub const REPLACEMENT_MARKER: char = '?';

/// Policy for codepoints without a representation in the target charset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackPolicy {
    /// Write [`REPLACEMENT_MARKER`] instead.
    #[default]
    Substitute,
    /// Drop the character.
    Ignore,
    /// Fail the call.
    Strict,
}

impl FallbackPolicy {
    /// Parse from string (case-insensitive). Unknown values fall back to
    /// the default.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" | "skip" | "drop" => Self::Ignore,
            "strict" | "error" | "none" => Self::Strict,
            _ => Self::Substitute,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Substitute => "substitute",
            Self::Ignore => "ignore",
            Self::Strict => "strict",
        }
    }

    /// Returns true if unrepresentable characters are absorbed instead of
    /// failing the call.
    #[must_use]
    pub const fn is_lossy(self) -> bool {
        !matches!(self, Self::Strict)
    }
}

impl std::fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Atomic cache: 0=unresolved, 1=Substitute, 2=Ignore, 3=Strict.
static CACHED_POLICY: AtomicU8 = AtomicU8::new(0);

const POLICY_UNRESOLVED: u8 = 0;
const POLICY_SUBSTITUTE: u8 = 1;
const POLICY_IGNORE: u8 = 2;
const POLICY_STRICT: u8 = 3;

fn policy_to_u8(policy: FallbackPolicy) -> u8 {
    match policy {
        FallbackPolicy::Substitute => POLICY_SUBSTITUTE,
        FallbackPolicy::Ignore => POLICY_IGNORE,
        FallbackPolicy::Strict => POLICY_STRICT,
    }
}

fn u8_to_policy(v: u8) -> FallbackPolicy {
    match v {
        POLICY_IGNORE => FallbackPolicy::Ignore,
        POLICY_STRICT => FallbackPolicy::Strict,
        _ => FallbackPolicy::Substitute,
    }
}

/// Policy for a raw `FRANKENICONV_FALLBACK` value; unset means the default.
fn policy_from_env(value: Option<&str>) -> FallbackPolicy {
    value.map(FallbackPolicy::from_str_loose).unwrap_or_default()
}

/// Get the configured default policy (reads the env var on first call,
/// caches thereafter).
///
/// Threads racing on the first call all read the same variable; whichever
/// stores first wins and every caller returns the stored value.
#[must_use]
pub fn default_fallback() -> FallbackPolicy {
    let cached = CACHED_POLICY.load(Ordering::Acquire);
    if cached != POLICY_UNRESOLVED {
        return u8_to_policy(cached);
    }

    let policy = policy_from_env(std::env::var(FALLBACK_ENV).ok().as_deref());
    match CACHED_POLICY.compare_exchange(
        POLICY_UNRESOLVED,
        policy_to_u8(policy),
        Ordering::AcqRel,
        Ordering::Acquire,
    ) {
        Ok(_) => policy,
        Err(stored) => u8_to_policy(stored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_policies() {
        assert_eq!(
            FallbackPolicy::from_str_loose("substitute"),
            FallbackPolicy::Substitute
        );
        assert_eq!(
            FallbackPolicy::from_str_loose("TRANSLIT"),
            FallbackPolicy::Substitute
        );
        assert_eq!(FallbackPolicy::from_str_loose("ignore"), FallbackPolicy::Ignore);
        assert_eq!(FallbackPolicy::from_str_loose(" Skip "), FallbackPolicy::Ignore);
        assert_eq!(FallbackPolicy::from_str_loose("strict"), FallbackPolicy::Strict);
        assert_eq!(FallbackPolicy::from_str_loose("ERROR"), FallbackPolicy::Strict);
        assert_eq!(
            FallbackPolicy::from_str_loose("bogus"),
            FallbackPolicy::Substitute
        );
    }

    #[test]
    fn env_value_selects_policy() {
        assert_eq!(policy_from_env(None), FallbackPolicy::Substitute);
        assert_eq!(policy_from_env(Some("")), FallbackPolicy::Substitute);
        assert_eq!(policy_from_env(Some("ignore")), FallbackPolicy::Ignore);
        assert_eq!(policy_from_env(Some("IGNORE")), FallbackPolicy::Ignore);
        assert_eq!(policy_from_env(Some("strict")), FallbackPolicy::Strict);
        assert_eq!(policy_from_env(Some(" Strict\n")), FallbackPolicy::Strict);
        assert_eq!(policy_from_env(Some("substitute")), FallbackPolicy::Substitute);
        assert_eq!(policy_from_env(Some("lenient")), FallbackPolicy::Substitute);
    }

    #[test]
    fn default_is_substitute() {
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::Substitute);
    }

    #[test]
    fn only_strict_is_lossless() {
        assert!(FallbackPolicy::Substitute.is_lossy());
        assert!(FallbackPolicy::Ignore.is_lossy());
        assert!(!FallbackPolicy::Strict.is_lossy());
    }

    #[test]
    fn cache_encoding_round_trips() {
        for policy in [
            FallbackPolicy::Substitute,
            FallbackPolicy::Ignore,
            FallbackPolicy::Strict,
        ] {
            assert_eq!(u8_to_policy(policy_to_u8(policy)), policy);
        }
        assert_eq!(u8_to_policy(POLICY_UNRESOLVED), FallbackPolicy::Substitute);
    }

    #[test]
    fn default_fallback_is_process_sticky() {
        let first = default_fallback();
        assert_eq!(default_fallback(), first);
        assert_ne!(CACHED_POLICY.load(Ordering::Acquire), POLICY_UNRESOLVED);
    }
}
