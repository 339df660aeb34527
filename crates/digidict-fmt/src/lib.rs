#![forbid(unsafe_code)]

//! Locale-aware `printf`-style formatting over an explicit argument slice.
//!
//! The entry point is [`format`]: it takes a [`Locale`], a template, and an
//! ordered slice of [`Arg`] values whose length need not be known at the
//! call site, and returns a newly owned `String`.
//!
//! ```
//! use digidict_fmt::{format, Arg, Locale};
//!
//! let de = format(&Locale::GERMANY, "%.1f", &[Arg::Float(1234.5)]).unwrap();
//! let us = format(&Locale::US, "%.1f", &[Arg::Float(1234.5)]).unwrap();
//! assert_eq!((de.as_str(), us.as_str()), ("1234,5", "1234.5"));
//! ```
//!
//! # Template grammar
//!
//! `%[argument_index$][flags][width][.precision]conversion`, plus
//! `%t<field>` / `%T<field>` for dates and times. See [`directive`] for the
//! accepted flags and the validation rules, and [`engine`] for how
//! arguments are matched to directives.
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Locale`] and
//!   [`NumberSymbols`].
//! - `locale-config`: load custom locale conventions from TOML or JSON
//!   (`config` module).

pub mod adapter;
pub mod arg;
#[cfg(feature = "locale-config")]
pub mod config;
pub mod datetime;
pub mod directive;
pub mod engine;
pub mod error;
pub mod locale;
pub mod number;

pub use adapter::{Formatted, display, format, format_nullable, format_root};
pub use arg::{Arg, ToArg};
#[cfg(feature = "locale-config")]
pub use config::{LocaleConfig, LocaleConfigError, LocaleEntry, LocaleRegistry};
pub use datetime::DateTimeField;
pub use directive::{ArgIndex, Conversion, Directive, Flags, Segment, Template};
pub use engine::LINE_SEPARATOR;
pub use error::{FormatError, FormatMismatch, Parameter, Result};
pub use locale::{InvalidLocale, Locale, NumberSymbols};
pub use number::shortest_float_string;
