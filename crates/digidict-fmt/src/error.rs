#![forbid(unsafe_code)]

//! Error taxonomy for formatting.
//!
//! Two kinds of failure exist:
//!
//! | Failure | Cause | Variant |
//! |---------|-------|---------|
//! | Absent input | locale, template, or argument slice missing | [`FormatError::NullArgument`] |
//! | Template/argument mismatch | too few arguments, wrong value type, malformed directive | [`FormatError::Mismatch`] |
//!
//! Both propagate unchanged to the caller. Nothing here logs.

use std::fmt;

use thiserror::Error;

/// Which input of [`format_nullable`](crate::adapter::format_nullable) was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Locale,
    Template,
    Args,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Locale => "locale",
            Self::Template => "template",
            Self::Args => "args",
        })
    }
}

/// Top-level formatting error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// A required input was absent.
    #[error("{parameter} must not be null")]
    NullArgument { parameter: Parameter },
    /// The template could not be applied to the supplied arguments.
    #[error(transparent)]
    Mismatch(#[from] FormatMismatch),
}

impl FormatError {
    #[inline]
    #[must_use]
    pub const fn is_null_argument(&self) -> bool {
        matches!(self, Self::NullArgument { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch(_))
    }

    /// The mismatch detail, if this is a mismatch.
    #[must_use]
    pub const fn as_mismatch(&self) -> Option<&FormatMismatch> {
        match self {
            Self::Mismatch(m) => Some(m),
            Self::NullArgument { .. } => None,
        }
    }
}

/// Why a template could not be applied.
///
/// The kinds follow the conventional `printf`-family contract: malformed
/// directives are reported when the template is parsed, argument problems
/// when the directive that consumes the argument is reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatMismatch {
    /// The directive references argument `index` (1-based) but fewer were supplied.
    #[error("missing argument {index} for directive '{directive}'")]
    MissingArgument { index: usize, directive: String },

    /// The argument at `index` cannot be rendered by `conversion`.
    #[error("conversion '{conversion}' cannot format {arg_kind} (argument {index})")]
    IllegalConversion {
        conversion: char,
        arg_kind: &'static str,
        index: usize,
    },

    /// Unknown conversion character.
    #[error("unknown conversion '{0}'")]
    UnknownConversion(String),

    /// A flag appears twice in one directive.
    #[error("duplicate flags '{0}'")]
    DuplicateFlags(String),

    /// Mutually exclusive flags were combined.
    #[error("illegal flag combination '{0}'")]
    IllegalFlags(String),

    /// A flag does not apply to the conversion.
    #[error("flag '{flag}' is not allowed with conversion '{conversion}'")]
    FlagsConversionMismatch { flag: char, conversion: char },

    /// The conversion does not accept a precision.
    #[error("precision {0} is not allowed here")]
    IllegalPrecision(usize),

    /// The conversion does not accept a width.
    #[error("width {0} is not allowed here")]
    IllegalWidth(usize),

    /// `-` or `0` was given without a width.
    #[error("directive '{0}' requires a width")]
    MissingWidth(String),

    /// `0$` or an index that overflows.
    #[error("illegal argument index in '{0}'")]
    IllegalArgumentIndex(String),

    /// `%c` got an integer outside the Unicode scalar range.
    #[error("illegal code point {0:#x}")]
    IllegalCodePoint(i64),
}

pub type Result<T> = std::result::Result<T, FormatError>;
