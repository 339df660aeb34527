#![forbid(unsafe_code)]

//! Argument values passed to the formatter.
//!
//! An argument list is a plain slice of [`Arg`]. Each element may be
//! [`Arg::Null`], which the conversions render as `null` (or `false` for
//! `%b`). Values are borrowed from the caller; nothing is copied until
//! rendering.
//!
//! Integers and floats keep their source width: an `i32` becomes
//! [`Arg::Int32`], not [`Arg::Int`]. Radix conversions print the
//! two's-complement bits of that width, `%h` hashes at that width, and `%s`
//! of an `f32` prints the shortest `f32` digits.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// A single formatting argument.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    /// An absent value.
    Null,
    Bool(bool),
    Char(char),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float(f64),
    Str(&'a str),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    ZonedDateTime(DateTime<FixedOffset>),
    /// Any other value, rendered through its `Display` impl by `%s`.
    Display(&'a (dyn fmt::Display + 'a)),
}

impl<'a> Arg<'a> {
    /// Short human-readable name of the value kind, used in errors.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::Int8(_) => "byte",
            Self::Int16(_) => "short",
            Self::Int32(_) => "int",
            Self::Int(_) => "integer",
            Self::UInt(_) => "unsigned integer",
            Self::Float32(_) => "float32",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "date-time",
            Self::ZonedDateTime(_) => "zoned date-time",
            Self::Display(_) => "object",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Value and bit width of a signed integer argument.
    #[must_use]
    pub const fn signed(&self) -> Option<(i64, u32)> {
        match *self {
            Self::Int8(v) => Some((v as i64, 8)),
            Self::Int16(v) => Some((v as i64, 16)),
            Self::Int32(v) => Some((v as i64, 32)),
            Self::Int(v) => Some((v, 64)),
            _ => None,
        }
    }

    /// 32-bit hash code, as rendered by `%h`.
    ///
    /// Strings hash over their UTF-16 code units with multiplier 31,
    /// integers up to 32 bits hash to their value, 64-bit integers fold the
    /// high word into the low word, and booleans map to 1231/1237. Floats
    /// hash their bits at their own width. Date/time and `Display` values
    /// hash their text.
    #[must_use]
    pub fn hash_code(&self) -> i32 {
        match *self {
            Self::Null => 0,
            Self::Bool(true) => 1231,
            Self::Bool(false) => 1237,
            Self::Char(c) => c as i32,
            Self::Int8(v) => i32::from(v),
            Self::Int16(v) => i32::from(v),
            Self::Int32(v) => v,
            Self::Int(v) => fold_u64(v as u64),
            Self::UInt(v) => fold_u64(v),
            Self::Float32(v) => {
                let bits = if v.is_nan() { 0x7fc0_0000 } else { v.to_bits() };
                bits as i32
            }
            Self::Float(v) => {
                let bits = if v.is_nan() {
                    0x7ff8_0000_0000_0000
                } else {
                    v.to_bits()
                };
                fold_u64(bits)
            }
            Self::Str(s) => string_hash(s),
            Self::Display(d) => string_hash(&d.to_string()),
            Self::Date(_) | Self::Time(_) | Self::DateTime(_) | Self::ZonedDateTime(_) => {
                string_hash(&self.to_plain_string())
            }
        }
    }

    /// The value's plain textual form, as rendered by `%s`.
    ///
    /// Floats use the shortest representation that round-trips, with
    /// scientific notation outside `[1e-3, 1e7)`. No locale is applied.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        match *self {
            Self::Null => "null".to_owned(),
            Self::Bool(b) => b.to_string(),
            Self::Char(c) => c.to_string(),
            Self::Int8(v) => v.to_string(),
            Self::Int16(v) => v.to_string(),
            Self::Int32(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Float32(v) => crate::number::shortest_f32_string(v),
            Self::Float(v) => crate::number::shortest_float_string(v),
            Self::Str(s) => s.to_owned(),
            Self::Date(_) | Self::Time(_) | Self::DateTime(_) | Self::ZonedDateTime(_) => {
                crate::datetime::iso_string(self).unwrap_or_default()
            }
            Self::Display(d) => d.to_string(),
        }
    }
}

fn fold_u64(bits: u64) -> i32 {
    (bits ^ (bits >> 32)) as u32 as i32
}

fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Self::Int8(v) => f.debug_tuple("Int8").field(v).finish(),
            Self::Int16(v) => f.debug_tuple("Int16").field(v).finish(),
            Self::Int32(v) => f.debug_tuple("Int32").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Self::Float32(v) => f.debug_tuple("Float32").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Date(v) => f.debug_tuple("Date").field(v).finish(),
            Self::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Self::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
            Self::ZonedDateTime(v) => f.debug_tuple("ZonedDateTime").field(v).finish(),
            Self::Display(v) => f.debug_tuple("Display").field(&v.to_string()).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// ToArg — conversion from Rust values
// ---------------------------------------------------------------------------

/// Conversion into an [`Arg`] borrowing from `self`.
///
/// `Option<T>` maps `None` to [`Arg::Null`].
pub trait ToArg {
    fn to_arg(&self) -> Arg<'_>;
}

impl ToArg for Arg<'_> {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        *self
    }
}

macro_rules! impl_to_arg {
    ($variant:ident as $target:ty: $($t:ty),+) => {
        $(
            impl ToArg for $t {
                #[inline]
                fn to_arg(&self) -> Arg<'_> {
                    Arg::$variant(<$target>::from(*self))
                }
            }

            impl From<$t> for Arg<'_> {
                #[inline]
                fn from(v: $t) -> Self {
                    Arg::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

impl_to_arg!(Int8 as i8: i8);
impl_to_arg!(Int16 as i16: i16);
impl_to_arg!(Int32 as i32: i32);
impl_to_arg!(Int as i64: i64);
impl_to_arg!(UInt as u64: u8, u16, u32, u64);
impl_to_arg!(Float32 as f32: f32);
impl_to_arg!(Float as f64: f64);
impl_to_arg!(Bool as bool: bool);
impl_to_arg!(Char as char: char);
impl_to_arg!(Date as NaiveDate: NaiveDate);
impl_to_arg!(Time as NaiveTime: NaiveTime);
impl_to_arg!(DateTime as NaiveDateTime: NaiveDateTime);

impl ToArg for isize {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Int(*self as i64)
    }
}

impl ToArg for usize {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::UInt(*self as u64)
    }
}

impl From<isize> for Arg<'_> {
    fn from(v: isize) -> Self {
        Arg::Int(v as i64)
    }
}

impl From<usize> for Arg<'_> {
    fn from(v: usize) -> Self {
        Arg::UInt(v as u64)
    }
}

impl ToArg for str {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(self)
    }
}

impl ToArg for String {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(self.as_str())
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Str(s)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(s: &'a String) -> Self {
        Arg::Str(s.as_str())
    }
}

impl<T: ToArg> ToArg for Option<T> {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        match self {
            Some(v) => v.to_arg(),
            None => Arg::Null,
        }
    }
}

impl<'a, T> From<Option<T>> for Arg<'a>
where
    T: Into<Arg<'a>>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Null, Into::into)
    }
}

impl<T: ToArg + ?Sized> ToArg for &T {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        (**self).to_arg()
    }
}

impl<Tz: TimeZone> ToArg for DateTime<Tz> {
    fn to_arg(&self) -> Arg<'_> {
        Arg::ZonedDateTime(self.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Arg<'_> {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Arg::ZonedDateTime(v)
    }
}
