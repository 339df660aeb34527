#![forbid(unsafe_code)]

//! Locale-independent number layout.
//!
//! Floating-point values are rendered from their shortest round-tripping
//! decimal digits, then rounded HALF_UP to the requested precision. So
//! `%.1f` of `0.25` gives `0.3`, and `%.20f` of `0.1` gives `0.1` followed
//! by zeros rather than the binary expansion.
//!
//! Everything here produces plain ASCII; [`localize_magnitude`] maps the
//! result onto a locale's digits and separators afterwards.

use crate::locale::NumberSymbols;

// ---------------------------------------------------------------------------
// Decimal digits
// ---------------------------------------------------------------------------

/// `0.d1 d2 d3 ... × 10^point`. An empty digit list is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Decimal {
    digits: Vec<u8>,
    point: i32,
}

impl Decimal {
    /// Shortest digits of `|v|`. `v` must be finite.
    fn from_f64(v: f64) -> Self {
        debug_assert!(v.is_finite());
        Self::from_scientific(&format!("{:e}", v.abs()))
    }

    /// Shortest digits of `|v|` at `f32` precision. `v` must be finite.
    fn from_f32(v: f32) -> Self {
        debug_assert!(v.is_finite());
        Self::from_scientific(&format!("{:e}", v.abs()))
    }

    /// Parse Rust's `{:e}` output of a non-negative value.
    fn from_scientific(sci: &str) -> Self {
        let (mantissa, exp) = sci.split_once('e').unwrap_or((sci, "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let mut digits: Vec<u8> = mantissa
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0')
            .collect();
        while digits.last() == Some(&0) {
            digits.pop();
        }
        if digits.is_empty() {
            return Self {
                digits,
                point: 1,
            };
        }
        Self {
            digits,
            point: exp + 1,
        }
    }

    fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Keep `keep` leading digits, rounding HALF_UP on the first dropped one.
    fn round_to(&mut self, keep: i64) {
        if keep >= self.digits.len() as i64 {
            return;
        }
        if keep < 0 {
            self.digits.clear();
            self.point = 1;
            return;
        }
        let keep = keep as usize;
        let round_up = self.digits[keep] >= 5;
        self.digits.truncate(keep);
        if round_up {
            let mut i = keep;
            loop {
                if i == 0 {
                    self.digits.insert(0, 1);
                    self.point += 1;
                    break;
                }
                i -= 1;
                if self.digits[i] == 9 {
                    self.digits[i] = 0;
                } else {
                    self.digits[i] += 1;
                    break;
                }
            }
        }
        while self.digits.last() == Some(&0) {
            self.digits.pop();
        }
        if self.digits.is_empty() {
            self.point = 1;
        }
    }

    fn digit_at(&self, i: i64) -> u8 {
        if i < 0 {
            return 0;
        }
        self.digits.get(i as usize).copied().unwrap_or(0)
    }

    /// `iii.fff` with exactly `precision` fraction digits.
    fn to_fixed(&self, precision: usize) -> String {
        let point = i64::from(self.point);
        let mut out = String::new();
        if self.is_zero() || point <= 0 {
            out.push('0');
        } else {
            for i in 0..point {
                out.push(char::from(b'0' + self.digit_at(i)));
            }
        }
        if precision > 0 {
            out.push('.');
            for i in 0..precision as i64 {
                let idx = if self.is_zero() { -1 } else { point + i };
                out.push(char::from(b'0' + self.digit_at(idx)));
            }
        }
        out
    }

    /// `d.ddd` with `precision` fraction digits, and the decimal exponent.
    fn to_scientific(&self, precision: usize) -> (String, i32) {
        if self.is_zero() {
            let mut out = String::from("0");
            if precision > 0 {
                out.push('.');
                out.extend(std::iter::repeat_n('0', precision));
            }
            return (out, 0);
        }
        let mut out = String::new();
        out.push(char::from(b'0' + self.digit_at(0)));
        if precision > 0 {
            out.push('.');
            for i in 1..=precision as i64 {
                out.push(char::from(b'0' + self.digit_at(i)));
            }
        }
        (out, self.point - 1)
    }
}

// ---------------------------------------------------------------------------
// Float layouts
// ---------------------------------------------------------------------------

/// Plain digits of a finite float in one of the decimal layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FloatDigits {
    /// ASCII mantissa, `.` as decimal point.
    pub(crate) mantissa: String,
    /// Decimal exponent when the layout is scientific.
    pub(crate) exponent: Option<i32>,
}

/// `%f`: fixed notation with `precision` fraction digits.
pub(crate) fn fixed(v: f64, precision: usize) -> FloatDigits {
    let mut d = Decimal::from_f64(v);
    let keep = i64::from(d.point) + precision as i64;
    d.round_to(keep);
    FloatDigits {
        mantissa: d.to_fixed(precision),
        exponent: None,
    }
}

/// `%e`: scientific notation with `precision` fraction digits.
pub(crate) fn scientific(v: f64, precision: usize) -> FloatDigits {
    let mut d = Decimal::from_f64(v);
    d.round_to(precision as i64 + 1);
    let (mantissa, exp) = d.to_scientific(precision);
    FloatDigits {
        mantissa,
        exponent: Some(exp),
    }
}

/// `%g`: `precision` significant digits; fixed when the rounded value lies
/// in `[10^-4, 10^precision)`, scientific otherwise. Zero is always fixed.
pub(crate) fn general(v: f64, precision: usize) -> FloatDigits {
    let precision = precision.max(1);
    let mut d = Decimal::from_f64(v);
    if d.is_zero() {
        return FloatDigits {
            mantissa: d.to_fixed(precision - 1),
            exponent: None,
        };
    }
    d.round_to(precision as i64);
    let exp10 = i64::from(d.point) - 1;
    if exp10 < -4 || exp10 >= precision as i64 {
        let (mantissa, exp) = d.to_scientific(precision - 1);
        FloatDigits {
            mantissa,
            exponent: Some(exp),
        }
    } else {
        let frac = (precision as i64 - exp10 - 1).max(0) as usize;
        FloatDigits {
            mantissa: d.to_fixed(frac),
            exponent: None,
        }
    }
}

/// Shortest text of a float: plain decimal in `[1e-3, 1e7)`, otherwise
/// `d.dddE±n`, always with at least one fraction digit.
#[must_use]
pub fn shortest_float_string(v: f64) -> String {
    shortest_layout(v, || Decimal::from_f64(v))
}

/// [`shortest_float_string`] with the digits of an `f32`, so `0.1f32`
/// prints `0.1` rather than its widened `f64` expansion.
#[must_use]
pub fn shortest_f32_string(v: f32) -> String {
    shortest_layout(f64::from(v), || Decimal::from_f32(v))
}

fn shortest_layout(v: f64, digits: impl FnOnce() -> Decimal) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    let sign = if v.is_sign_negative() { "-" } else { "" };
    let d = digits();
    if d.is_zero() {
        return format!("{sign}0.0");
    }
    let abs = v.abs();
    if (1e-3..1e7).contains(&abs) {
        let frac_digits = (d.digits.len() as i64 - i64::from(d.point)).max(1) as usize;
        format!("{sign}{}", d.to_fixed(frac_digits))
    } else {
        let frac_digits = (d.digits.len() - 1).max(1);
        let (mantissa, exp) = d.to_scientific(frac_digits);
        format!("{sign}{mantissa}E{exp}")
    }
}

// ---------------------------------------------------------------------------
// Hexadecimal floats
// ---------------------------------------------------------------------------

const SIGNIFICAND_BITS: u64 = 0x000F_FFFF_FFFF_FFFF;
const EXPONENT_BITS: u64 = 0x7FF0_0000_0000_0000;
const SIGNIFICAND_WIDTH: u32 = 53;

/// `1.8p1` style text (no `0x`, no sign) of a non-negative finite float.
fn hex_digits_exact(v: f64) -> String {
    let bits = v.to_bits();
    let biased = ((bits & EXPONENT_BITS) >> 52) as i64;
    let mantissa = bits & SIGNIFICAND_BITS;
    if biased == 0 && mantissa == 0 {
        return "0.0p0".to_owned();
    }
    let mut hex = format!("{mantissa:013x}");
    while hex.len() > 1 && hex.ends_with('0') {
        hex.pop();
    }
    if biased == 0 {
        format!("0.{hex}p-1022")
    } else {
        format!("1.{hex}p{}", biased - 1023)
    }
}

/// Round `v` to `prec` hex digits (1..=12), half-even on the dropped bits.
fn hex_digits_rounded(v: f64, prec: usize) -> String {
    let mut value = v;
    let subnormal = (value.to_bits() & EXPONENT_BITS) == 0;
    if subnormal {
        value *= 2f64.powi(54);
    }
    let precision_bits = 1 + (prec as u32) * 4;
    let shift = SIGNIFICAND_WIDTH - precision_bits;
    let bits = value.to_bits();
    let mut significand = (bits & (EXPONENT_BITS | SIGNIFICAND_BITS)) >> shift;
    let rounding_bits = bits & !(u64::MAX << shift);
    let least_zero = significand & 1 == 0;
    let round = (1u64 << (shift - 1)) & rounding_bits != 0;
    let sticky = shift > 1 && (!(1u64 << (shift - 1)) & rounding_bits) != 0;
    if (least_zero && round && sticky) || (!least_zero && round) {
        significand += 1;
    }
    let result = f64::from_bits(significand << shift);
    if result.is_infinite() {
        return "1.0p1024".to_owned();
    }
    let text = hex_digits_exact(result);
    if !subnormal {
        return text;
    }
    match text.split_once('p') {
        Some((mantissa, exp)) => {
            let exp: i64 = exp.parse().unwrap_or(0);
            format!("{mantissa}p{}", exp - 54)
        }
        None => text,
    }
}

/// Hex float layout of `|v|`: the text after `0x`, split at `p`.
///
/// `precision` of `None` prints every significant hex digit; `Some(0)` is
/// treated as one digit. The mantissa is padded with zeros up to the
/// precision but never truncated past what the rounding produced.
pub(crate) fn hex_float(v: f64, precision: Option<usize>) -> (String, String) {
    let abs = v.abs();
    let prec = match precision {
        None => 0,
        Some(0) => 1,
        Some(p) => p,
    };
    let text = if abs == 0.0 || prec == 0 || prec >= 13 {
        hex_digits_exact(abs)
    } else {
        hex_digits_rounded(abs, prec)
    };
    let (mantissa, exp) = text.split_once('p').unwrap_or((text.as_str(), "0"));
    let mut mantissa = mantissa.to_owned();
    if prec != 0 {
        pad_fraction(&mut mantissa, prec);
    }
    (mantissa, exp.to_owned())
}

/// Append zeros so the mantissa has at least `precision` fraction digits.
pub(crate) fn pad_fraction(mantissa: &mut String, precision: usize) {
    let have = match mantissa.find('.') {
        Some(dot) => mantissa.len() - dot - 1,
        None => {
            mantissa.push('.');
            0
        }
    };
    mantissa.extend(std::iter::repeat_n('0', precision.saturating_sub(have)));
}

// ---------------------------------------------------------------------------
// Localization
// ---------------------------------------------------------------------------

/// Append `plain` (ASCII digits, optional `.` fraction) to `out` using the
/// locale's digits and separators.
///
/// With `grouping`, separators go between integer-digit groups. With
/// `zero_pad_to`, zeros are inserted at the start of the magnitude until
/// `out` (which may already hold a sign) reaches that many chars.
pub(crate) fn localize_magnitude(
    out: &mut String,
    plain: &str,
    symbols: &NumberSymbols,
    grouping: bool,
    zero_pad_to: Option<usize>,
) {
    let begin_chars = out.chars().count();
    let begin_byte = out.len();
    let (int_part, frac_part) = match plain.find('.') {
        Some(dot) => (&plain[..dot], Some(&plain[dot + 1..])),
        None => (plain, None),
    };

    let group = if grouping {
        usize::from(symbols.grouping_size)
    } else {
        0
    };
    let len = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        out.push(symbols.localize_digit(c));
        let remaining = len - i - 1;
        if group > 0 && remaining > 0 && remaining % group == 0 {
            out.push(symbols.grouping_separator);
        }
    }
    if let Some(frac) = frac_part {
        out.push(symbols.decimal_separator);
        out.extend(frac.chars().map(|c| symbols.localize_digit(c)));
    }

    if let Some(width) = zero_pad_to {
        let written = out.chars().count();
        if written < width {
            let zero = symbols.localize_digit('0');
            let pad: String = std::iter::repeat_n(zero, width - written).collect();
            debug_assert!(begin_chars <= written);
            out.insert_str(begin_byte, &pad);
        }
    }
}

/// Exponent suffix: sign and at least two localized digits.
pub(crate) fn push_exponent(out: &mut String, exp: i32, upper: bool, symbols: &NumberSymbols) {
    out.push(if upper { 'E' } else { 'e' });
    out.push(if exp < 0 { '-' } else { '+' });
    let digits = format!("{:02}", exp.unsigned_abs());
    out.extend(digits.chars().map(|c| symbols.localize_digit(c)));
}
