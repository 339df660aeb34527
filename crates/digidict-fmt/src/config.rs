#![forbid(unsafe_code)]

//! Custom locale conventions loaded from TOML or JSON.
//!
//! ```toml
//! # digidict-locales.toml
//! default_locale = "en-IN"
//!
//! [[locale]]
//! tag = "en-IN"
//! decimal_separator = "."
//! grouping_separator = ","
//!
//! [[locale]]
//! tag = "ar-EG"
//! decimal_separator = "٫"
//! grouping_separator = "٬"
//! zero_digit = "٠"
//! ```
//!
//! ```rust,ignore
//! let config = LocaleConfig::from_toml_file("digidict-locales.toml")?;
//! let registry = LocaleRegistry::from_config(&config)?;
//! let locale = registry.resolve("ar_eg")?;
//! ```
//!
//! Omitted symbol fields take the root conventions (`.` decimal, `,`
//! grouping, groups of three, ASCII digits).

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::locale::{InvalidLocale, Locale, NumberSymbols};

// ---------------------------------------------------------------------------
// LocaleConfig
// ---------------------------------------------------------------------------

/// Locale overrides as read from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Tag of the locale [`LocaleRegistry::default_locale`] returns.
    pub default_locale: Option<String>,
    /// Symbol overrides, one per tag.
    #[serde(rename = "locale")]
    pub locales: Vec<LocaleEntry>,
}

/// One locale override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleEntry {
    pub tag: String,
    #[serde(flatten)]
    pub symbols: NumberSymbols,
}

impl LocaleConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LocaleConfigError> {
        toml::from_str(s).map_err(LocaleConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LocaleConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LocaleConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, LocaleConfigError> {
        serde_json::from_str(s).map_err(LocaleConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LocaleConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LocaleConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check tags and symbols.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(tag) = &self.default_locale
            && Locale::parse(tag).is_err()
        {
            errors.push(format!("default_locale '{tag}' is not a valid locale tag"));
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        for (i, entry) in self.locales.iter().enumerate() {
            match Locale::parse(&entry.tag) {
                Ok(locale) if locale.tag().is_empty() => {
                    errors.push(format!("locale[{i}].tag must not be empty"));
                }
                Ok(locale) => {
                    if let Some(first) = seen.insert(locale.tag().to_owned(), i) {
                        errors.push(format!(
                            "locale[{i}].tag '{}' duplicates locale[{first}]",
                            locale.tag()
                        ));
                    }
                }
                Err(_) => errors.push(format!(
                    "locale[{i}].tag '{}' is not a valid locale tag",
                    entry.tag
                )),
            }

            let s = &entry.symbols;
            if s.decimal_separator == s.grouping_separator {
                errors.push(format!(
                    "locale[{i}]: decimal_separator and grouping_separator are both '{}'",
                    s.decimal_separator
                ));
            }
            if s.decimal_separator.is_numeric() || s.grouping_separator.is_numeric() {
                errors.push(format!("locale[{i}]: separators must not be digits"));
            }
            if !s.zero_digit.is_numeric() || char::from_u32(s.zero_digit as u32 + 9).is_none() {
                errors.push(format!(
                    "locale[{i}].zero_digit '{}' does not start a digit range",
                    s.zero_digit
                ));
            }
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// LocaleRegistry
// ---------------------------------------------------------------------------

/// Resolves tags to locales, preferring registered overrides over the
/// built-in table.
#[derive(Debug, Clone, Default)]
pub struct LocaleRegistry {
    locales: HashMap<String, Locale>,
    default: Locale,
}

impl LocaleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a validated config.
    pub fn from_config(config: &LocaleConfig) -> Result<Self, LocaleConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(LocaleConfigError::Validation(errors));
        }
        let mut registry = Self::new();
        for entry in &config.locales {
            let locale = Locale::parse(&entry.tag)
                .map_err(|e| LocaleConfigError::Validation(vec![e.to_string()]))?
                .with_symbols(entry.symbols);
            registry.register(locale);
        }
        if let Some(tag) = &config.default_locale {
            registry.default = registry
                .resolve(tag)
                .map_err(|e| LocaleConfigError::Validation(vec![e.to_string()]))?;
        }
        Ok(registry)
    }

    /// Register an override, returning the one it replaces.
    pub fn register(&mut self, locale: Locale) -> Option<Locale> {
        tracing::debug!(locale = %locale, "Registered locale override");
        self.locales.insert(locale.tag().to_owned(), locale)
    }

    /// Resolve `tag`: an exact override, then an override for its language,
    /// then the built-in conventions.
    pub fn resolve(&self, tag: &str) -> Result<Locale, InvalidLocale> {
        let locale = Locale::parse(tag)?;
        if let Some(found) = self.locales.get(locale.tag()) {
            return Ok(found.clone());
        }
        if let Some(by_language) = self.locales.get(locale.language()) {
            let symbols = by_language.symbols();
            return Ok(locale.with_symbols(symbols));
        }
        Ok(locale)
    }

    /// The configured default, [`Locale::ROOT`] when none was set.
    #[must_use]
    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading locale configuration.
#[derive(Debug)]
pub enum LocaleConfigError {
    /// File I/O error.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// The config parsed but [`LocaleConfig::validate`] reported problems.
    Validation(Vec<String>),
}

impl std::fmt::Display for LocaleConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "locale config validation failed: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for LocaleConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
default_locale = "de-CH"

[[locale]]
tag = "en_in"
decimal_separator = "."
grouping_separator = ","

[[locale]]
tag = "de-CH"
decimal_separator = "."
grouping_separator = "'"
"#;

    #[test]
    fn parses_toml() {
        let config = LocaleConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.locales.len(), 2);
        assert_eq!(config.locales[1].symbols.grouping_separator, '\'');
        assert_eq!(config.locales[1].symbols.grouping_size, 3);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn parses_json() {
        let json = r#"{"locale":[{"tag":"x-test","decimal_separator":"!"}]}"#;
        let config = LocaleConfig::from_json_str(json).unwrap();
        assert_eq!(config.locales[0].symbols.decimal_separator, '!');
        assert_eq!(config.locales[0].symbols.grouping_separator, ',');
        assert!(config.default_locale.is_none());
    }

    #[test]
    fn validation_reports_every_problem() {
        let config = LocaleConfig {
            default_locale: Some("not a tag".into()),
            locales: vec![
                LocaleEntry {
                    tag: "en".into(),
                    symbols: NumberSymbols::new(',', ','),
                },
                LocaleEntry {
                    tag: "EN".into(),
                    symbols: NumberSymbols {
                        zero_digit: 'x',
                        ..NumberSymbols::ROOT
                    },
                },
                LocaleEntry {
                    tag: "-".into(),
                    symbols: NumberSymbols::ROOT,
                },
            ],
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors[0].contains("default_locale"));
        assert!(errors.iter().any(|e| e.contains("duplicates locale[0]")));
        assert!(errors.iter().any(|e| e.contains("zero_digit")));
    }

    #[test]
    fn registry_resolution_order() {
        let config = LocaleConfig::from_toml_str(SAMPLE).unwrap();
        let registry = LocaleRegistry::from_config(&config).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.default_locale().tag(), "de-CH");
        assert_eq!(registry.resolve("de_CH").unwrap().symbols().grouping_separator, '\'');

        let mut registry = LocaleRegistry::new();
        registry.register(Locale::parse("fr").unwrap().with_symbols(NumberSymbols::new('.', '_')));
        let fr_be = registry.resolve("fr-BE").unwrap();
        assert_eq!(fr_be.tag(), "fr-BE");
        assert_eq!(fr_be.symbols().grouping_separator, '_');
        assert_eq!(registry.resolve("de").unwrap().symbols().decimal_separator, ',');
        assert!(registry.resolve("??").is_err());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = LocaleConfig::from_toml_str("[[locale]]\ntag = \"\"\n").unwrap();
        let err = LocaleRegistry::from_config(&config).unwrap_err();
        assert!(matches!(err, LocaleConfigError::Validation(ref v) if v.len() == 1));
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn malformed_input_maps_to_error_kind() {
        assert!(matches!(
            LocaleConfig::from_toml_str("locale = 3"),
            Err(LocaleConfigError::Toml(_))
        ));
        assert!(matches!(
            LocaleConfig::from_json_str("{"),
            Err(LocaleConfigError::Json(_))
        ));
        assert!(matches!(
            LocaleConfig::from_toml_file("/nonexistent/digidict.toml"),
            Err(LocaleConfigError::Io(_))
        ));
    }
}
