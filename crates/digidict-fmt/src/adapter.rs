#![forbid(unsafe_code)]

//! Public entry points.
//!
//! [`format`] is the core operation: a locale, a template and an explicit
//! argument slice in, a newly owned `String` out. Everything else here is a
//! thin convenience over it.
//!
//! Each call runs inside a TRACE span named `digidict_fmt::format` carrying
//! the locale tag and the argument count. Failures are returned, not
//! logged.

use std::fmt;

use tracing::trace_span;

use crate::arg::Arg;
use crate::directive::Template;
use crate::engine;
use crate::error::{FormatError, Parameter, Result};
use crate::locale::Locale;

/// Format `template` under `locale`, substituting directives with `args`.
///
/// A template without `%` is returned unchanged whatever `args` holds.
/// Surplus arguments are ignored.
///
/// # Errors
///
/// [`FormatError::Mismatch`] when a directive is malformed, references an
/// argument that was not supplied, or cannot render its argument's type.
/// No partial output is produced.
///
/// # Example
///
/// ```
/// use digidict_fmt::{format, Arg, Locale};
///
/// let s = format(&Locale::US, "Hello, %s! You have %d messages.", &[Arg::Str("Ann"), Arg::Int(3)]);
/// assert_eq!(s.unwrap(), "Hello, Ann! You have 3 messages.");
/// ```
pub fn format(locale: &Locale, template: &str, args: &[Arg<'_>]) -> Result<String> {
    let span = trace_span!(
        "digidict_fmt::format",
        locale = %locale,
        arg_count = args.len()
    );
    let _guard = span.enter();

    if !template.contains('%') {
        return Ok(template.to_owned());
    }
    let parsed = Template::parse(template)?;
    Ok(engine::render(parsed.segments(), locale, args)?)
}

/// [`format`] for callers whose inputs may be absent.
///
/// # Errors
///
/// [`FormatError::NullArgument`] naming the first absent input, checked in
/// the order locale, template, args. Otherwise as [`format`].
pub fn format_nullable(
    locale: Option<&Locale>,
    template: Option<&str>,
    args: Option<&[Arg<'_>]>,
) -> Result<String> {
    let locale = locale.ok_or(FormatError::NullArgument {
        parameter: Parameter::Locale,
    })?;
    let template = template.ok_or(FormatError::NullArgument {
        parameter: Parameter::Template,
    })?;
    let args = args.ok_or(FormatError::NullArgument {
        parameter: Parameter::Args,
    })?;
    format(locale, template, args)
}

/// [`format`] under [`Locale::ROOT`].
///
/// # Errors
///
/// As [`format`].
pub fn format_root(template: &str, args: &[Arg<'_>]) -> Result<String> {
    format(&Locale::ROOT, template, args)
}

impl Template<'_> {
    /// Render this template under `locale`.
    ///
    /// # Errors
    ///
    /// [`FormatError::Mismatch`] for a missing argument or an argument of
    /// the wrong type.
    pub fn apply(&self, locale: &Locale, args: &[Arg<'_>]) -> Result<String> {
        let span = trace_span!(
            "digidict_fmt::format",
            locale = %locale,
            arg_count = args.len()
        );
        let _guard = span.enter();
        Ok(engine::render(self.segments(), locale, args)?)
    }
}

// ---------------------------------------------------------------------------
// Lazy Display
// ---------------------------------------------------------------------------

/// Formats on `Display`; see [`display`].
#[derive(Debug, Clone, Copy)]
pub struct Formatted<'a> {
    locale: &'a Locale,
    template: &'a str,
    args: &'a [Arg<'a>],
}

/// Defer formatting until the value is displayed.
///
/// A formatting failure surfaces as [`fmt::Error`]; use [`format`] when the
/// cause matters. The outer `{}` width, fill and precision apply to the
/// formatted text as they would to a `&str`.
#[must_use]
pub fn display<'a>(locale: &'a Locale, template: &'a str, args: &'a [Arg<'a>]) -> Formatted<'a> {
    Formatted {
        locale,
        template,
        args,
    }
}

impl fmt::Display for Formatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = format(self.locale, self.template, self.args).map_err(|_| fmt::Error)?;
        f.pad(&s)
    }
}

/// Format with a variadic call site.
///
/// Each argument goes through [`ToArg`](crate::ToArg), so `Option<T>`
/// becomes a null argument when `None`.
///
/// ```
/// use digidict_fmt::{format_args_locale, Locale};
///
/// let name = String::from("Ann");
/// let s = format_args_locale!(&Locale::US, "%s has %d", name, 3).unwrap();
/// assert_eq!(s, "Ann has 3");
/// ```
#[macro_export]
macro_rules! format_args_locale {
    (
        $locale:expr, // locale
        $template:expr // template
        $(, $arg:expr)* // arguments
        $(,)? // optional trailing comma
    ) => {
        $crate::format(
            $locale,
            $template,
            &[$($crate::ToArg::to_arg(&$arg)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatMismatch;

    #[test]
    fn greeting() {
        let out = format(
            &Locale::US,
            "Hello, %s! You have %d messages.",
            &[Arg::Str("Ann"), Arg::Int(3)],
        );
        assert_eq!(out.unwrap(), "Hello, Ann! You have 3 messages.");
    }

    #[test]
    fn no_placeholders_is_identity() {
        assert_eq!(format(&Locale::US, "plain", &[Arg::Int(1)]).unwrap(), "plain");
        assert_eq!(format(&Locale::US, "", &[]).unwrap(), "");
    }

    #[test]
    fn null_inputs_checked_in_order() {
        let err = format_nullable(None, None, None).unwrap_err();
        assert_eq!(
            err,
            FormatError::NullArgument {
                parameter: Parameter::Locale
            }
        );
        let err = format_nullable(Some(&Locale::US), None, None).unwrap_err();
        assert_eq!(
            err,
            FormatError::NullArgument {
                parameter: Parameter::Template
            }
        );
        let err = format_nullable(Some(&Locale::US), Some("%s"), None).unwrap_err();
        assert_eq!(
            err,
            FormatError::NullArgument {
                parameter: Parameter::Args
            }
        );
        let ok = format_nullable(Some(&Locale::US), Some("%s"), Some(&[Arg::Null]));
        assert_eq!(ok.unwrap(), "null");
    }

    #[test]
    fn missing_argument_is_mismatch() {
        let err = format(&Locale::US, "%d items", &[]).unwrap_err();
        assert!(err.is_mismatch());
        assert!(matches!(
            err.as_mismatch(),
            Some(FormatMismatch::MissingArgument { index: 1, .. })
        ));
    }

    #[test]
    fn template_reuse() {
        let t = Template::parse("%.1f").unwrap();
        assert_eq!(t.required_args(), 1);
        assert_eq!(t.apply(&Locale::GERMANY, &[Arg::Float(1234.5)]).unwrap(), "1234,5");
        assert_eq!(t.apply(&Locale::US, &[Arg::Float(1234.5)]).unwrap(), "1234.5");
    }

    #[test]
    fn root_locale() {
        assert_eq!(format_root("%,d", &[Arg::Int(1234)]).unwrap(), "1,234");
    }

    #[test]
    fn lazy_display() {
        let args = [Arg::Int(7)];
        assert_eq!(display(&Locale::US, "n=%d", &args).to_string(), "n=7");
        let bad = [Arg::Str("x")];
        let mut buf = String::new();
        let res = fmt::write(&mut buf, format_args!("{}", display(&Locale::US, "%d", &bad)));
        assert!(res.is_err());
    }

    #[test]
    fn lazy_display_honors_outer_width() {
        let args = [Arg::Int(7)];
        let us = Locale::US;
        let shown = display(&us, "n=%d", &args);
        assert_eq!(std::format!("[{shown:>6}]"), "[   n=7]");
        assert_eq!(std::format!("[{shown:*<5}]"), "[n=7**]");
        assert_eq!(std::format!("[{shown:.2}]"), "[n=]");
    }

    #[test]
    fn macro_call_site() {
        let missing: Option<i32> = None;
        let out = format_args_locale!(&Locale::US, "%s/%s/%.2f", "a", missing, 0.5).unwrap();
        assert_eq!(out, "a/null/0.50");
        let out = format_args_locale!(&Locale::US, "static").unwrap();
        assert_eq!(out, "static");
    }

    #[test]
    fn macro_keeps_argument_width() {
        let out = format_args_locale!(&Locale::US, "%x|%o|%h", -1i32, -1i32, -1i32).unwrap();
        assert_eq!(out, "ffffffff|37777777777|ffffffff");
        let out = format_args_locale!(&Locale::US, "%x %x %x", -1i8, -1i16, -1i64).unwrap();
        assert_eq!(out, "ff ffff ffffffffffffffff");
        let out = format_args_locale!(&Locale::US, "%s %s", 0.1f32, 0.1f64).unwrap();
        assert_eq!(out, "0.1 0.1");
        // Unsuffixed literals are i32, as at most call sites.
        let out = format_args_locale!(&Locale::US, "%d. %x", 1 + 1, -2).unwrap();
        assert_eq!(out, "2. fffffffe");
    }
}
