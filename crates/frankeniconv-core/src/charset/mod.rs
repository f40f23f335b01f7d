//! Charset name parsing.
//!
//! A charset argument is a case-insensitive name optionally followed by
//! glibc-style `//FLAG` suffixes. `//TRANSLIT` selects substitution and
//! `//IGNORE` selects dropping for characters the target cannot represent;
//! unknown flags are ignored.

use crate::config::FallbackPolicy;
use crate::error::IconvError;

/// A parsed charset argument borrowing from the caller's string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharsetName<'a> {
    raw: &'a str,
    base: &'a str,
    fallback: Option<FallbackPolicy>,
}

impl<'a> CharsetName<'a> {
    /// Splits `raw` into its base name and policy suffixes.
    ///
    /// Fails with [`IconvError::UnsupportedCharset`] when the base name is
    /// empty.
    pub fn parse(raw: &'a str) -> Result<Self, IconvError> {
        let mut parts = raw.split("//");
        let base = parts.next().unwrap_or_default().trim();
        if base.is_empty() {
            return Err(IconvError::UnsupportedCharset {
                name: raw.to_string(),
            });
        }

        let mut fallback = None;
        for flag in parts.flat_map(|suffix| suffix.split(',')) {
            let flag = flag.trim();
            if flag.eq_ignore_ascii_case("IGNORE") {
                fallback = Some(FallbackPolicy::Ignore);
            } else if flag.eq_ignore_ascii_case("TRANSLIT") && fallback.is_none() {
                fallback = Some(FallbackPolicy::Substitute);
            }
        }

        Ok(Self {
            raw,
            base,
            fallback,
        })
    }

    /// The argument as supplied, suffixes included.
    #[must_use]
    pub const fn raw(&self) -> &'a str {
        self.raw
    }

    /// The name without suffixes.
    #[must_use]
    pub const fn base(&self) -> &'a str {
        self.base
    }

    /// Policy requested by a suffix, if any.
    #[must_use]
    pub const fn fallback(&self) -> Option<FallbackPolicy> {
        self.fallback
    }

    /// Key used for registry lookup.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        normalize_key(self.base)
    }
}

/// Uppercases ASCII letters and drops `-`, `_` and whitespace, so
/// `utf_8`, `UTF-8` and `utf8` share one key.
#[must_use]
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|ch| !matches!(ch, '-' | '_' | ' ' | '\t'))
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}
