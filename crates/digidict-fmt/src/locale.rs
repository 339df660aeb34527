#![forbid(unsafe_code)]

//! Locale identifiers and the number conventions they select.
//!
//! A [`Locale`] is a normalized tag (`"en-US"`, `"de"`, `""` for root) plus an
//! optional [`NumberSymbols`] override. When no override is attached the
//! symbols come from a built-in table, resolved as `language-REGION`, then
//! `language`, then [`Locale::ROOT`].
//!
//! # Invariants
//!
//! 1. **Resolution terminates**: every tag resolves to some symbols; unknown
//!    tags get the root conventions (`.` decimal, `,` grouping).
//! 2. **Immutable**: locales are plain values, `Send + Sync`, cheap to clone.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// NumberSymbols
// ---------------------------------------------------------------------------

/// Characters used when rendering numbers under a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NumberSymbols {
    /// Separator between integer and fraction digits.
    pub decimal_separator: char,
    /// Separator inserted between digit groups when `,` is given.
    pub grouping_separator: char,
    /// Digits per group. Zero disables grouping.
    pub grouping_size: u8,
    /// The character for digit zero; digits 1-9 follow it contiguously.
    pub zero_digit: char,
}

impl NumberSymbols {
    /// Root conventions.
    pub const ROOT: Self = Self::new('.', ',');

    #[must_use]
    pub const fn new(decimal_separator: char, grouping_separator: char) -> Self {
        Self {
            decimal_separator,
            grouping_separator,
            grouping_size: 3,
            zero_digit: '0',
        }
    }

    /// Map an ASCII digit onto this locale's digit range.
    ///
    /// Non-digits pass through.
    #[inline]
    #[must_use]
    pub fn localize_digit(&self, c: char) -> char {
        if self.zero_digit == '0' || !c.is_ascii_digit() {
            return c;
        }
        let offset = c as u32 - '0' as u32;
        char::from_u32(self.zero_digit as u32 + offset).unwrap_or(c)
    }
}

impl Default for NumberSymbols {
    fn default() -> Self {
        Self::ROOT
    }
}

const NBSP: char = '\u{00A0}';
const NARROW_NBSP: char = '\u{202F}';
const APOSTROPHE: char = '\u{2019}';

/// Built-in conventions, keyed by normalized tag.
static SYMBOL_TABLE: &[(&str, NumberSymbols)] = &[
    ("en", NumberSymbols::new('.', ',')),
    ("de", NumberSymbols::new(',', '.')),
    ("de-AT", NumberSymbols::new(',', NBSP)),
    ("de-CH", NumberSymbols::new('.', APOSTROPHE)),
    ("fr", NumberSymbols::new(',', NARROW_NBSP)),
    ("fr-CH", NumberSymbols::new(',', NARROW_NBSP)),
    ("es", NumberSymbols::new(',', '.')),
    ("es-MX", NumberSymbols::new('.', ',')),
    ("it", NumberSymbols::new(',', '.')),
    ("it-CH", NumberSymbols::new('.', APOSTROPHE)),
    ("nl", NumberSymbols::new(',', '.')),
    ("pt", NumberSymbols::new(',', '.')),
    ("pt-PT", NumberSymbols::new(',', NBSP)),
    ("ru", NumberSymbols::new(',', NBSP)),
    ("uk", NumberSymbols::new(',', NBSP)),
    ("pl", NumberSymbols::new(',', NBSP)),
    ("sv", NumberSymbols::new(',', NBSP)),
    ("tr", NumberSymbols::new(',', '.')),
    ("ja", NumberSymbols::new('.', ',')),
    ("zh", NumberSymbols::new('.', ',')),
    ("ko", NumberSymbols::new('.', ',')),
    ("hi", NumberSymbols::new('.', ',')),
];

fn lookup_symbols(tag: &str) -> Option<NumberSymbols> {
    SYMBOL_TABLE
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, symbols)| *symbols)
}

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// A malformed locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid locale tag '{0}'")]
pub struct InvalidLocale(pub String);

/// Locale identifier selecting regional formatting conventions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    tag: Cow<'static, str>,
    symbols: Option<NumberSymbols>,
}

impl Locale {
    /// The language-neutral root locale.
    pub const ROOT: Self = Self::from_static("");
    pub const ENGLISH: Self = Self::from_static("en");
    pub const US: Self = Self::from_static("en-US");
    pub const UK: Self = Self::from_static("en-GB");
    pub const GERMAN: Self = Self::from_static("de");
    pub const GERMANY: Self = Self::from_static("de-DE");
    pub const FRENCH: Self = Self::from_static("fr");
    pub const FRANCE: Self = Self::from_static("fr-FR");
    pub const ITALIAN: Self = Self::from_static("it");
    pub const ITALY: Self = Self::from_static("it-IT");
    pub const JAPANESE: Self = Self::from_static("ja");
    pub const JAPAN: Self = Self::from_static("ja-JP");
    pub const CHINESE: Self = Self::from_static("zh");
    pub const CHINA: Self = Self::from_static("zh-CN");
    pub const KOREAN: Self = Self::from_static("ko");
    pub const KOREA: Self = Self::from_static("ko-KR");

    /// Wrap an already-normalized static tag.
    #[must_use]
    pub const fn from_static(tag: &'static str) -> Self {
        Self {
            tag: Cow::Borrowed(tag),
            symbols: None,
        }
    }

    /// Parse and normalize a tag such as `"en_us"` or `"sr-Latn-RS"`.
    ///
    /// Underscores become hyphens, the language is lowercased, a script
    /// subtag is titlecased, a region is uppercased.
    pub fn parse(tag: &str) -> Result<Self, InvalidLocale> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Ok(Self::ROOT);
        }
        let mut normalized = String::with_capacity(trimmed.len());
        for (i, part) in trimmed.split(['-', '_']).enumerate() {
            let valid = !part.is_empty()
                && part.len() <= 8
                && part.chars().all(|c| c.is_ascii_alphanumeric());
            if !valid || (i == 0 && !part.chars().all(|c| c.is_ascii_alphabetic())) {
                return Err(InvalidLocale(tag.to_owned()));
            }
            if i > 0 {
                normalized.push('-');
            }
            match (i, part.len()) {
                (0, _) => normalized.push_str(&part.to_ascii_lowercase()),
                (_, 4) if part.chars().all(|c| c.is_ascii_alphabetic()) => {
                    let mut chars = part.chars();
                    if let Some(first) = chars.next() {
                        normalized.push(first.to_ascii_uppercase());
                    }
                    normalized.extend(chars.map(|c| c.to_ascii_lowercase()));
                }
                (_, 2) => normalized.push_str(&part.to_ascii_uppercase()),
                _ => normalized.push_str(part),
            }
        }
        Ok(Self {
            tag: Cow::Owned(normalized),
            symbols: None,
        })
    }

    /// Attach explicit number symbols, bypassing the built-in table.
    ///
    /// The override is not part of the serialized form: with the `serde`
    /// feature a locale serializes as its tag alone.
    #[must_use]
    pub fn with_symbols(mut self, symbols: NumberSymbols) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// The normalized tag. Empty for [`Locale::ROOT`].
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The primary language subtag, lowercase.
    #[must_use]
    pub fn language(&self) -> &str {
        self.tag.split('-').next().unwrap_or("")
    }

    /// The region subtag (`"US"`, `"419"`), if present.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.tag.split('-').skip(1).find(|part| {
            (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
                || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
        })
    }

    /// Number conventions for this locale.
    #[must_use]
    pub fn symbols(&self) -> NumberSymbols {
        if let Some(symbols) = self.symbols {
            return symbols;
        }
        let language = self.language();
        if language.is_empty() {
            return NumberSymbols::ROOT;
        }
        if let Some(region) = self.region()
            && let Some(symbols) = lookup_symbols(&format!("{language}-{region}"))
        {
            return symbols;
        }
        if let Some(symbols) = lookup_symbols(language) {
            return symbols;
        }
        tracing::debug!(
            locale = %self.tag,
            "No number conventions for locale, using root"
        );
        NumberSymbols::ROOT
    }

    /// Whether `i`/`I` follow the dotted/dotless casing rules.
    fn has_turkic_casing(&self) -> bool {
        matches!(self.language(), "tr" | "az")
    }

    /// Uppercase under this locale's casing rules.
    #[must_use]
    pub fn to_uppercase(&self, s: &str) -> String {
        if !self.has_turkic_casing() {
            return s.to_uppercase();
        }
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                'i' => out.push('\u{0130}'),
                _ => out.extend(c.to_uppercase()),
            }
        }
        out
    }

    /// Lowercase under this locale's casing rules.
    #[must_use]
    pub fn to_lowercase(&self, s: &str) -> String {
        if !self.has_turkic_casing() {
            return s.to_lowercase();
        }
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                'I' => out.push('\u{0131}'),
                '\u{0130}' => out.push('i'),
                _ => out.extend(c.to_lowercase()),
            }
        }
        out
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::ROOT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl FromStr for Locale {
    type Err = InvalidLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Serialized as the bare tag. Symbols attached with
/// [`Locale::with_symbols`] are dropped; ship them through
/// [`NumberSymbols`] directly when they must persist.
#[cfg(feature = "serde")]
impl serde::Serialize for Locale {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.tag)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Locale {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Self::parse(&tag).map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_separator() {
        let l = Locale::parse("en_us").unwrap();
        assert_eq!(l.tag(), "en-US");
        assert_eq!(l.language(), "en");
        assert_eq!(l.region(), Some("US"));

        let l = Locale::parse("SR-latn-rs").unwrap();
        assert_eq!(l.tag(), "sr-Latn-RS");
        assert_eq!(l.region(), Some("RS"));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Locale::parse("en--US").is_err());
        assert!(Locale::parse("12-US").is_err());
        assert!(Locale::parse("en-toolongsubtag").is_err());
        assert_eq!(Locale::parse("  ").unwrap(), Locale::ROOT);
    }

    #[test]
    fn numeric_region() {
        let l: Locale = "es-419".parse().unwrap();
        assert_eq!(l.region(), Some("419"));
        assert_eq!(l.symbols().decimal_separator, ',');
    }

    #[test]
    fn symbols_resolve_region_then_language_then_root() {
        assert_eq!(Locale::GERMANY.symbols().decimal_separator, ',');
        assert_eq!(
            Locale::parse("de-CH").unwrap().symbols().grouping_separator,
            APOSTROPHE
        );
        assert_eq!(Locale::US.symbols(), NumberSymbols::new('.', ','));
        assert_eq!(Locale::parse("xx-YY").unwrap().symbols(), NumberSymbols::ROOT);
        assert_eq!(Locale::ROOT.symbols(), NumberSymbols::ROOT);
    }

    #[test]
    fn override_wins() {
        let custom = NumberSymbols {
            zero_digit: '\u{0660}',
            ..NumberSymbols::new('\u{066B}', '\u{066C}')
        };
        let l = Locale::parse("ar-EG").unwrap().with_symbols(custom);
        assert_eq!(l.symbols(), custom);
        assert_eq!(custom.localize_digit('7'), '\u{0667}');
        assert_eq!(custom.localize_digit('-'), '-');
    }

    #[test]
    fn turkic_casing() {
        let tr = Locale::parse("tr-TR").unwrap();
        assert_eq!(tr.to_uppercase("istanbul"), "\u{0130}STANBUL");
        assert_eq!(tr.to_lowercase("ISPARTA"), "\u{0131}sparta");
        assert_eq!(Locale::US.to_uppercase("istanbul"), "ISTANBUL");
    }

    #[test]
    fn display_is_tag() {
        assert_eq!(Locale::FRANCE.to_string(), "fr-FR");
        assert_eq!(Locale::ROOT.to_string(), "");
    }
}
