//! Charset name → codec lookup.
//!
//! The registry is immutable once built. [`Registry::standard`] is a
//! process-wide instance shared by every descriptor opened through
//! [`crate::iconv::open`].

use std::collections::HashMap;
use std::sync::OnceLock;

use super::Charset;
use crate::charset::{CharsetName, normalize_key};

/// One registered charset with its accepted aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub charset: Charset,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

const STANDARD_ENTRIES: &[RegistryEntry] = &[
    RegistryEntry {
        charset: Charset::Ascii,
        canonical: "US-ASCII",
        aliases: &["ASCII", "ANSI_X3.4-1968", "ISO646-US", "CP367", "US"],
    },
    RegistryEntry {
        charset: Charset::Latin1,
        canonical: "ISO-8859-1",
        aliases: &["ISO_8859-1", "LATIN1", "L1", "CP819", "ISO-IR-100"],
    },
    RegistryEntry {
        charset: Charset::Windows1252,
        canonical: "WINDOWS-1252",
        aliases: &["CP1252", "MS-ANSI"],
    },
    RegistryEntry {
        charset: Charset::Utf8,
        canonical: "UTF-8",
        aliases: &["UTF8"],
    },
    RegistryEntry {
        charset: Charset::Utf16,
        canonical: "UTF-16",
        aliases: &[],
    },
    RegistryEntry {
        charset: Charset::Utf16Be,
        canonical: "UTF-16BE",
        aliases: &[],
    },
    RegistryEntry {
        charset: Charset::Utf16Le,
        canonical: "UTF-16LE",
        aliases: &[],
    },
    RegistryEntry {
        charset: Charset::Utf32,
        canonical: "UTF-32",
        aliases: &["UCS-4"],
    },
    RegistryEntry {
        charset: Charset::Utf32Be,
        canonical: "UTF-32BE",
        aliases: &["UCS-4BE"],
    },
    RegistryEntry {
        charset: Charset::Utf32Le,
        canonical: "UTF-32LE",
        aliases: &["UCS-4LE"],
    },
    RegistryEntry {
        charset: Charset::EucJp,
        canonical: "EUC-JP",
        aliases: &["EUCJP", "UJIS", "CSEUCPKDFMTJAPANESE"],
    },
    RegistryEntry {
        charset: Charset::ShiftJis,
        canonical: "SHIFT_JIS",
        aliases: &["SJIS", "MS_KANJI", "CSSHIFTJIS"],
    },
    RegistryEntry {
        charset: Charset::Cp932,
        canonical: "CP932",
        aliases: &["WINDOWS-31J", "MS932", "CSWINDOWS31J"],
    },
    RegistryEntry {
        charset: Charset::Iso2022Jp,
        canonical: "ISO-2022-JP",
        aliases: &["CSISO2022JP"],
    },
];

static STANDARD: OnceLock<Registry> = OnceLock::new();

/// Immutable charset lookup table.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    by_key: HashMap<String, Charset>,
}

impl Registry {
    /// Builds a registry. When two entries claim the same normalized name,
    /// the earlier entry wins.
    #[must_use]
    pub fn new(entries: &[RegistryEntry]) -> Self {
        let mut by_key = HashMap::new();
        for entry in entries {
            for name in std::iter::once(&entry.canonical).chain(entry.aliases) {
                by_key.entry(normalize_key(name)).or_insert(entry.charset);
            }
        }
        Self {
            entries: entries.to_vec(),
            by_key,
        }
    }

    /// The built-in registry.
    #[must_use]
    pub fn standard() -> &'static Registry {
        STANDARD.get_or_init(|| Registry::new(STANDARD_ENTRIES))
    }

    /// Resolves a parsed charset name.
    #[must_use]
    pub fn lookup(&self, name: &CharsetName<'_>) -> Option<Charset> {
        self.by_key.get(&name.lookup_key()).copied()
    }

    /// Resolves a raw charset string (suffixes are ignored).
    #[must_use]
    pub fn lookup_str(&self, raw: &str) -> Option<Charset> {
        CharsetName::parse(raw)
            .ok()
            .and_then(|name| self.lookup(&name))
    }

    #[must_use]
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Canonical names in registration order.
    pub fn canonical_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.canonical)
    }
}
