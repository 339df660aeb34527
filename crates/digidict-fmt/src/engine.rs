#![forbid(unsafe_code)]

//! Rendering of parsed templates against an argument slice.
//!
//! # Argument resolution
//!
//! Ordinary directives consume arguments left to right. An explicit
//! `n$` index selects argument `n` without moving the ordinary cursor, and
//! `<` repeats whichever argument the previous directive used. Arguments
//! beyond the last one referenced are ignored.
//!
//! # Invariants
//!
//! 1. Output is produced only when every directive succeeds; a failure
//!    discards everything rendered so far.
//! 2. Padding counts Unicode scalar values, never bytes.
//! 3. Zero padding is inserted after the sign (and after `0x` for hex),
//!    so `%08.2f` of `-3.5` is `-0003.50`.

use std::iter;

use crate::arg::Arg;
use crate::datetime::{FieldWriter, Temporal};
use crate::directive::{ArgIndex, Conversion, Directive, Flags, Segment};
use crate::error::FormatMismatch;
use crate::locale::{Locale, NumberSymbols};
use crate::number;

/// Platform line separator emitted by `%n`.
pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Render `segments` under `locale`.
pub(crate) fn render(
    segments: &[Segment<'_>],
    locale: &Locale,
    args: &[Arg<'_>],
) -> Result<String, FormatMismatch> {
    let renderer = Renderer {
        locale,
        symbols: locale.symbols(),
    };
    let mut out = String::new();
    let mut ordinary = 0usize;
    let mut last: Option<usize> = None;

    for segment in segments {
        let d = match segment {
            Segment::Literal(text) => {
                out.push_str(text);
                continue;
            }
            Segment::Directive(d) => d,
        };
        let slot = match d.index {
            ArgIndex::None => {
                renderer.fixed_text(&mut out, d);
                continue;
            }
            ArgIndex::Ordinary => {
                ordinary += 1;
                ordinary - 1
            }
            ArgIndex::Explicit(n) => n - 1,
            ArgIndex::Previous => last.ok_or_else(|| missing(0, d))?,
        };
        last = Some(slot);
        let arg = args.get(slot).ok_or_else(|| missing(slot + 1, d))?;
        renderer.directive(&mut out, d, arg, slot + 1)?;
    }
    Ok(out)
}

fn missing(index: usize, d: &Directive<'_>) -> FormatMismatch {
    FormatMismatch::MissingArgument {
        index,
        directive: d.text.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

struct Renderer<'l> {
    locale: &'l Locale,
    symbols: NumberSymbols,
}

impl Renderer<'_> {
    fn fixed_text(&self, out: &mut String, d: &Directive<'_>) {
        match d.conversion {
            Conversion::LineSeparator => out.push_str(LINE_SEPARATOR),
            _ => justify(out, "%", d),
        }
    }

    /// Render one argument-consuming directive. `index` is 1-based.
    fn directive(
        &self,
        out: &mut String,
        d: &Directive<'_>,
        arg: &Arg<'_>,
        index: usize,
    ) -> Result<(), FormatMismatch> {
        let illegal = || FormatMismatch::IllegalConversion {
            conversion: conversion_char(d),
            arg_kind: arg.kind_name(),
            index,
        };

        let body = match d.conversion {
            Conversion::Boolean => {
                let text = match *arg {
                    Arg::Null => "false".to_owned(),
                    Arg::Bool(b) => b.to_string(),
                    _ => "true".to_owned(),
                };
                self.general(d, text)
            }
            _ if arg.is_null() => self.cased(d, "null".to_owned()),
            Conversion::HashCode => self.general(d, format!("{:x}", arg.hash_code() as u32)),
            Conversion::String => self.general(d, arg.to_plain_string()),
            Conversion::Char => {
                let c = match (*arg, arg.signed()) {
                    (Arg::Char(c), _) => c,
                    (Arg::UInt(v), _) => code_point(i64::try_from(v).unwrap_or(i64::MAX))?,
                    (_, Some((v, _))) => code_point(v)?,
                    _ => return Err(illegal()),
                };
                self.cased(d, c.to_string())
            }
            Conversion::Decimal => match (*arg, arg.signed()) {
                (Arg::UInt(v), _) => self.decimal(d, false, v),
                (_, Some((v, _))) => self.decimal(d, v < 0, v.unsigned_abs()),
                _ => return Err(illegal()),
            },
            Conversion::Octal | Conversion::Hex => {
                let bits = match (*arg, arg.signed()) {
                    (Arg::UInt(v), _) => v,
                    (_, Some((v, width))) => twos_complement(v, width),
                    _ => return Err(illegal()),
                };
                radix(d, bits)
            }
            Conversion::Scientific
            | Conversion::Fixed
            | Conversion::General
            | Conversion::HexFloat => match *arg {
                Arg::Float(v) => self.float(d, v),
                Arg::Float32(v) => self.float(d, f64::from(v)),
                _ => return Err(illegal()),
            },
            Conversion::DateTime(field) => {
                let temporal = Temporal::from_arg(arg).ok_or_else(illegal)?;
                let writer = FieldWriter {
                    locale: self.locale,
                    symbols: self.symbols,
                    index,
                    arg_kind: arg.kind_name(),
                };
                let mut text = String::new();
                writer.write(&mut text, field, &temporal)?;
                self.cased(d, text)
            }
            Conversion::Percent | Conversion::LineSeparator => {
                self.fixed_text(out, d);
                return Ok(());
            }
        };
        justify(out, &body, d);
        Ok(())
    }

    /// `%b`, `%h`, `%s`: precision truncates before casing.
    fn general(&self, d: &Directive<'_>, mut text: String) -> String {
        if let Some(p) = d.precision
            && let Some((cut, _)) = text.char_indices().nth(p)
        {
            text.truncate(cut);
        }
        self.cased(d, text)
    }

    fn cased(&self, d: &Directive<'_>, text: String) -> String {
        if d.upper {
            self.locale.to_uppercase(&text)
        } else {
            text
        }
    }

    fn decimal(&self, d: &Directive<'_>, negative: bool, magnitude: u64) -> String {
        let mut s = String::new();
        leading_sign(&mut s, d.flags, negative);
        number::localize_magnitude(
            &mut s,
            &magnitude.to_string(),
            &self.symbols,
            d.flags.contains(Flags::GROUP),
            zero_pad_width(d.flags, d.width, negative),
        );
        trailing_sign(&mut s, d.flags, negative);
        s
    }

    fn float(&self, d: &Directive<'_>, v: f64) -> String {
        if v.is_nan() {
            return if d.upper { "NAN" } else { "NaN" }.to_owned();
        }
        let negative = v.is_sign_negative();
        let abs = v.abs();
        let mut s = String::new();
        leading_sign(&mut s, d.flags, negative);
        if abs.is_infinite() {
            s.push_str(if d.upper { "INFINITY" } else { "Infinity" });
        } else if d.conversion == Conversion::HexFloat {
            hex_float(&mut s, d, abs, negative);
        } else {
            self.decimal_float(&mut s, d, abs, negative);
        }
        trailing_sign(&mut s, d.flags, negative);
        s
    }

    fn decimal_float(&self, s: &mut String, d: &Directive<'_>, abs: f64, negative: bool) {
        let precision = d.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
        let digits = match d.conversion {
            Conversion::Scientific => number::scientific(abs, precision),
            Conversion::General => number::general(abs, precision.max(1)),
            _ => number::fixed(abs, precision),
        };
        let mut mantissa = digits.mantissa;
        if precision == 0 && d.flags.contains(Flags::ALTERNATE) && !mantissa.contains('.') {
            mantissa.push('.');
        }
        let exponent_len = digits.exponent.map_or(0, |e| 2 + exponent_digits(e));
        let width = d.width.map(|w| w.saturating_sub(exponent_len));
        number::localize_magnitude(
            s,
            &mantissa,
            &self.symbols,
            d.flags.contains(Flags::GROUP),
            zero_pad_width(d.flags, width, negative),
        );
        if let Some(exp) = digits.exponent {
            number::push_exponent(s, exp, d.upper, &self.symbols);
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn conversion_char(d: &Directive<'_>) -> char {
    let c = d.conversion.to_char();
    if d.upper { c.to_ascii_uppercase() } else { c }
}

fn code_point(v: i64) -> Result<char, FormatMismatch> {
    u32::try_from(v)
        .ok()
        .and_then(char::from_u32)
        .ok_or(FormatMismatch::IllegalCodePoint(v))
}

fn exponent_digits(exp: i32) -> usize {
    exp.unsigned_abs().to_string().len().max(2)
}

fn leading_sign(s: &mut String, flags: Flags, negative: bool) {
    if negative {
        s.push(if flags.contains(Flags::PARENTHESES) { '(' } else { '-' });
    } else if flags.contains(Flags::PLUS) {
        s.push('+');
    } else if flags.contains(Flags::LEADING_SPACE) {
        s.push(' ');
    }
}

fn trailing_sign(s: &mut String, flags: Flags, negative: bool) {
    if negative && flags.contains(Flags::PARENTHESES) {
        s.push(')');
    }
}

/// Target length for zero padding, leaving room for a closing `)`.
fn zero_pad_width(flags: Flags, width: Option<usize>, negative: bool) -> Option<usize> {
    if !flags.contains(Flags::ZERO_PAD) {
        return None;
    }
    let width = width?;
    Some(if negative && flags.contains(Flags::PARENTHESES) {
        width.saturating_sub(1)
    } else {
        width
    })
}

/// `%o` / `%x`: unsigned two's-complement digits, never localized.
/// Bits of `v` as a `width`-bit two's-complement integer.
fn twos_complement(v: i64, width: u32) -> u64 {
    (v as u64) & (u64::MAX >> (64 - width))
}

fn radix(d: &Directive<'_>, bits: u64) -> String {
    let hex = d.conversion == Conversion::Hex;
    let digits = if hex {
        format!("{bits:x}")
    } else {
        format!("{bits:o}")
    };
    let prefix = match (d.flags.contains(Flags::ALTERNATE), hex, d.upper) {
        (false, _, _) => "",
        (true, false, _) => "0",
        (true, true, false) => "0x",
        (true, true, true) => "0X",
    };
    let mut s = String::from(prefix);
    if d.flags.contains(Flags::ZERO_PAD)
        && let Some(width) = d.width
    {
        let used = prefix.len() + digits.len();
        s.extend(iter::repeat_n('0', width.saturating_sub(used)));
    }
    if d.upper {
        s.push_str(&digits.to_ascii_uppercase());
    } else {
        s.push_str(&digits);
    }
    s
}

/// `%a`: `0x1.8p1`. Zeros for `0` go between the prefix and the mantissa.
fn hex_float(s: &mut String, d: &Directive<'_>, abs: f64, negative: bool) {
    let (mantissa, exponent) = number::hex_float(abs, d.precision);
    s.push_str(if d.upper { "0X" } else { "0x" });
    if d.flags.contains(Flags::ZERO_PAD)
        && let Some(width) = d.width
    {
        let signed = negative || d.flags.intersects(Flags::PLUS | Flags::LEADING_SPACE);
        let leading = if signed { 3 } else { 2 };
        let body = mantissa.len() + 1 + exponent.len();
        s.extend(iter::repeat_n('0', width.saturating_sub(body + leading)));
    }
    if d.upper {
        s.push_str(&mantissa.to_ascii_uppercase());
        s.push('P');
    } else {
        s.push_str(&mantissa);
        s.push('p');
    }
    s.push_str(&exponent);
}

fn justify(out: &mut String, body: &str, d: &Directive<'_>) {
    let pad = d
        .width
        .map_or(0, |w| w.saturating_sub(body.chars().count()));
    if d.flags.contains(Flags::LEFT_JUSTIFY) {
        out.push_str(body);
        out.extend(iter::repeat_n(' ', pad));
    } else {
        out.extend(iter::repeat_n(' ', pad));
        out.push_str(body);
    }
}
