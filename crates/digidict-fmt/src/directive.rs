#![forbid(unsafe_code)]

//! Template parsing.
//!
//! A template is split into literal runs and directives of the form
//!
//! ```text
//! %[argument_index$][flags][width][.precision]conversion
//! %[argument_index$][flags][width]t<field>      (or T<field>)
//! ```
//!
//! Parsing validates each directive on its own: flag combinations, whether
//! the conversion accepts a precision, whether a width is present when `-`
//! or `0` demands one. Whether an argument exists, and whether its type
//! fits, is checked later when the template is applied.
//!
//! # Failure Modes
//!
//! | Failure | Example | Error |
//! |---------|---------|-------|
//! | Unknown conversion | `%q`, `%tq`, trailing `%` | `UnknownConversion` |
//! | Repeated flag | `%--5d` | `DuplicateFlags` |
//! | Contradicting flags | `%+ d`, `%-05d` | `IllegalFlags` |
//! | Flag not valid here | `%,x`, `%#d` | `FlagsConversionMismatch` |
//! | Precision not valid here | `%.2d` | `IllegalPrecision` |
//! | Width required | `%-d` | `MissingWidth` |
//! | Width not allowed | `%5n` | `IllegalWidth` |
//! | Index zero/overflow | `%0$s` | `IllegalArgumentIndex` |

use bitflags::bitflags;

use crate::datetime::DateTimeField;
use crate::error::FormatMismatch;

bitflags! {
    /// Directive flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        /// `-`: pad on the right.
        const LEFT_JUSTIFY  = 1 << 0;
        /// `#`: alternate form (`0x` prefix, forced decimal point).
        const ALTERNATE     = 1 << 1;
        /// `+`: always print a sign.
        const PLUS          = 1 << 2;
        /// ` `: leading space for non-negative values.
        const LEADING_SPACE = 1 << 3;
        /// `0`: pad with zeros after the sign.
        const ZERO_PAD      = 1 << 4;
        /// `,`: locale grouping separators.
        const GROUP         = 1 << 5;
        /// `(`: negative values in parentheses.
        const PARENTHESES   = 1 << 6;
        /// `<`: reuse the previous argument.
        const PREVIOUS      = 1 << 7;
    }
}

impl Flags {
    const CHARS: [(char, Flags); 8] = [
        ('-', Flags::LEFT_JUSTIFY),
        ('#', Flags::ALTERNATE),
        ('+', Flags::PLUS),
        (' ', Flags::LEADING_SPACE),
        ('0', Flags::ZERO_PAD),
        (',', Flags::GROUP),
        ('(', Flags::PARENTHESES),
        ('<', Flags::PREVIOUS),
    ];

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        Self::CHARS
            .iter()
            .find(|(fc, _)| *fc == c)
            .map(|(_, flag)| *flag)
    }

    /// The flag characters, in canonical order.
    #[must_use]
    pub fn to_flag_string(self) -> String {
        Self::CHARS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(c, _)| *c)
            .collect()
    }

    fn first_char(self) -> char {
        Self::CHARS
            .iter()
            .find(|(_, flag)| self.contains(*flag))
            .map_or('?', |(c, _)| *c)
    }
}

/// Which argument a directive consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgIndex {
    /// `%%` and `%n` consume nothing.
    None,
    /// The next argument in sequence.
    Ordinary,
    /// `n$`, 1-based.
    Explicit(usize),
    /// `<`: the argument used by the previous directive.
    Previous,
}

/// The conversion character, case-folded; see [`Directive::upper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// `b`
    Boolean,
    /// `h`
    HashCode,
    /// `s`
    String,
    /// `c`
    Char,
    /// `d`
    Decimal,
    /// `o`
    Octal,
    /// `x`
    Hex,
    /// `e`
    Scientific,
    /// `f`
    Fixed,
    /// `g`
    General,
    /// `a`
    HexFloat,
    /// `t<field>`
    DateTime(DateTimeField),
    /// `%%`
    Percent,
    /// `%n`
    LineSeparator,
}

impl Conversion {
    /// The lowercase conversion character.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Boolean => 'b',
            Self::HashCode => 'h',
            Self::String => 's',
            Self::Char => 'c',
            Self::Decimal => 'd',
            Self::Octal => 'o',
            Self::Hex => 'x',
            Self::Scientific => 'e',
            Self::Fixed => 'f',
            Self::General => 'g',
            Self::HexFloat => 'a',
            Self::DateTime(_) => 't',
            Self::Percent => '%',
            Self::LineSeparator => 'n',
        }
    }

    /// Map a conversion character; returns the conversion and whether the
    /// uppercase variant was used.
    const fn from_char(c: char) -> Option<(Self, bool)> {
        Some(match c {
            'b' => (Self::Boolean, false),
            'B' => (Self::Boolean, true),
            'h' => (Self::HashCode, false),
            'H' => (Self::HashCode, true),
            's' => (Self::String, false),
            'S' => (Self::String, true),
            'c' => (Self::Char, false),
            'C' => (Self::Char, true),
            'd' => (Self::Decimal, false),
            'o' => (Self::Octal, false),
            'x' => (Self::Hex, false),
            'X' => (Self::Hex, true),
            'e' => (Self::Scientific, false),
            'E' => (Self::Scientific, true),
            'f' => (Self::Fixed, false),
            'g' => (Self::General, false),
            'G' => (Self::General, true),
            'a' => (Self::HexFloat, false),
            'A' => (Self::HexFloat, true),
            '%' => (Self::Percent, false),
            'n' => (Self::LineSeparator, false),
            _ => return None,
        })
    }
}

/// One parsed `%...` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'t> {
    /// The directive's source text, e.g. `%-10.3f`.
    pub text: &'t str,
    pub index: ArgIndex,
    pub flags: Flags,
    pub width: Option<usize>,
    pub precision: Option<usize>,
    pub conversion: Conversion,
    /// Uppercase variant (`%S`, `%X`, `%T…`).
    pub upper: bool,
}

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'t> {
    Literal(&'t str),
    Directive(Directive<'t>),
}

/// A parsed template, reusable across argument lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'t> {
    source: &'t str,
    segments: Vec<Segment<'t>>,
}

impl<'t> Template<'t> {
    /// Parse and validate every directive in `source`.
    pub fn parse(source: &'t str) -> Result<Self, FormatMismatch> {
        let segments = parse_segments(source)?;
        tracing::trace!(
            template_len = source.len(),
            segments = segments.len(),
            "parsed template"
        );
        Ok(Self { source, segments })
    }

    #[must_use]
    pub fn source(&self) -> &'t str {
        self.source
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment<'t>] {
        &self.segments
    }

    /// Whether the template contains directives that consume arguments.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        self.directives().any(|d| d.index != ArgIndex::None)
    }

    /// Iterate over the directives.
    pub fn directives(&self) -> impl Iterator<Item = &Directive<'t>> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Directive(d) => Some(d),
            Segment::Literal(_) => None,
        })
    }

    /// Minimum argument count for which no directive reports a missing
    /// argument.
    #[must_use]
    pub fn required_args(&self) -> usize {
        let mut ordinary = 0usize;
        let mut explicit = 0usize;
        for d in self.directives() {
            match d.index {
                ArgIndex::Ordinary => ordinary += 1,
                ArgIndex::Explicit(n) => explicit = explicit.max(n),
                ArgIndex::None | ArgIndex::Previous => {}
            }
        }
        ordinary.max(explicit)
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

fn parse_segments(source: &str) -> Result<Vec<Segment<'_>>, FormatMismatch> {
    let mut segments = Vec::new();
    let mut rest_start = 0;
    while let Some(offset) = source[rest_start..].find('%') {
        let start = rest_start + offset;
        if start > rest_start {
            segments.push(Segment::Literal(&source[rest_start..start]));
        }
        let (directive, end) = parse_directive(source, start)?;
        segments.push(Segment::Directive(directive));
        rest_start = end;
    }
    if rest_start < source.len() {
        segments.push(Segment::Literal(&source[rest_start..]));
    }
    Ok(segments)
}

/// Scan ASCII digits from `pos`; returns the end position.
fn scan_digits(bytes: &[u8], pos: usize) -> usize {
    pos + bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count()
}

fn char_at(source: &str, pos: usize) -> Option<char> {
    source.get(pos..).and_then(|s| s.chars().next())
}

/// Parse the directive beginning at `start` (which holds `%`).
fn parse_directive(source: &str, start: usize) -> Result<(Directive<'_>, usize), FormatMismatch> {
    let bytes = source.as_bytes();
    let mut pos = start + 1;
    if pos >= bytes.len() {
        return Err(FormatMismatch::UnknownConversion("%".to_owned()));
    }

    // argument_index$
    let mut explicit = None;
    let digits_end = scan_digits(bytes, pos);
    if digits_end > pos && bytes.get(digits_end) == Some(&b'$') {
        let n: usize = source[pos..digits_end].parse().map_err(|_| {
            FormatMismatch::IllegalArgumentIndex(source[start..=digits_end].to_owned())
        })?;
        if n == 0 {
            return Err(FormatMismatch::IllegalArgumentIndex(
                source[start..=digits_end].to_owned(),
            ));
        }
        explicit = Some(n);
        pos = digits_end + 1;
    }

    // flags
    let flags_start = pos;
    let mut flags = Flags::empty();
    while let Some(flag) = bytes
        .get(pos)
        .and_then(|&b| Flags::from_char(char::from(b)))
    {
        if flags.contains(flag) {
            return Err(FormatMismatch::DuplicateFlags(
                source[flags_start..=pos].to_owned(),
            ));
        }
        flags |= flag;
        pos += 1;
    }

    // width
    let mut width = None;
    let width_end = scan_digits(bytes, pos);
    if width_end > pos {
        let w: usize = source[pos..width_end]
            .parse()
            .map_err(|_| FormatMismatch::IllegalWidth(usize::MAX))?;
        width = Some(w);
        pos = width_end;
    }

    // .precision
    let mut precision = None;
    if bytes.get(pos) == Some(&b'.') {
        let prec_end = scan_digits(bytes, pos + 1);
        if prec_end == pos + 1 {
            return Err(FormatMismatch::UnknownConversion(".".to_owned()));
        }
        let p: usize = source[pos + 1..prec_end]
            .parse()
            .map_err(|_| FormatMismatch::IllegalPrecision(usize::MAX))?;
        precision = Some(p);
        pos = prec_end;
    }

    // conversion
    let Some(c) = char_at(source, pos) else {
        return Err(FormatMismatch::UnknownConversion("%".to_owned()));
    };
    let (conversion, upper, end) = if c == 't' || c == 'T' {
        let field_pos = pos + 1;
        let field = char_at(source, field_pos)
            .ok_or_else(|| FormatMismatch::UnknownConversion(c.to_string()))?;
        let Some(field_kind) = DateTimeField::from_char(field) else {
            return Err(FormatMismatch::UnknownConversion(format!("{c}{field}")));
        };
        (
            Conversion::DateTime(field_kind),
            c == 'T',
            field_pos + field.len_utf8(),
        )
    } else {
        let Some((conversion, upper)) = Conversion::from_char(c) else {
            return Err(FormatMismatch::UnknownConversion(c.to_string()));
        };
        (conversion, upper, pos + c.len_utf8())
    };

    let index = match conversion {
        Conversion::Percent | Conversion::LineSeparator => ArgIndex::None,
        _ if flags.contains(Flags::PREVIOUS) => ArgIndex::Previous,
        _ => explicit.map_or(ArgIndex::Ordinary, ArgIndex::Explicit),
    };

    let directive = Directive {
        text: &source[start..end],
        index,
        flags,
        width,
        precision,
        conversion,
        upper,
    };
    validate(&directive)?;
    Ok((directive, end))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn check_bad_flags(d: &Directive<'_>, bad: Flags) -> Result<(), FormatMismatch> {
    let hit = d.flags & bad;
    if hit.is_empty() {
        return Ok(());
    }
    Err(FormatMismatch::FlagsConversionMismatch {
        flag: hit.first_char(),
        conversion: d.conversion.to_char(),
    })
}

fn check_left_needs_width(d: &Directive<'_>) -> Result<(), FormatMismatch> {
    if d.width.is_none() && d.flags.contains(Flags::LEFT_JUSTIFY) {
        return Err(FormatMismatch::MissingWidth(d.text.to_owned()));
    }
    Ok(())
}

fn check_no_precision(d: &Directive<'_>) -> Result<(), FormatMismatch> {
    match d.precision {
        Some(p) => Err(FormatMismatch::IllegalPrecision(p)),
        None => Ok(()),
    }
}

fn check_numeric(d: &Directive<'_>) -> Result<(), FormatMismatch> {
    if d.width.is_none() && d.flags.intersects(Flags::LEFT_JUSTIFY | Flags::ZERO_PAD) {
        return Err(FormatMismatch::MissingWidth(d.text.to_owned()));
    }
    if d.flags.contains(Flags::PLUS | Flags::LEADING_SPACE)
        || d.flags.contains(Flags::LEFT_JUSTIFY | Flags::ZERO_PAD)
    {
        return Err(FormatMismatch::IllegalFlags(d.flags.to_flag_string()));
    }
    Ok(())
}

const NOT_FOR_TEXT: Flags = Flags::PLUS
    .union(Flags::LEADING_SPACE)
    .union(Flags::ZERO_PAD)
    .union(Flags::GROUP)
    .union(Flags::PARENTHESES);

fn validate(d: &Directive<'_>) -> Result<(), FormatMismatch> {
    match d.conversion {
        Conversion::Boolean | Conversion::HashCode | Conversion::String => {
            check_bad_flags(d, Flags::ALTERNATE)?;
            check_left_needs_width(d)?;
            check_bad_flags(d, NOT_FOR_TEXT)
        }
        Conversion::Char | Conversion::DateTime(_) => {
            check_no_precision(d)?;
            check_bad_flags(d, NOT_FOR_TEXT | Flags::ALTERNATE)?;
            check_left_needs_width(d)
        }
        Conversion::Decimal => {
            check_numeric(d)?;
            check_no_precision(d)?;
            check_bad_flags(d, Flags::ALTERNATE)
        }
        Conversion::Octal | Conversion::Hex => {
            check_numeric(d)?;
            check_no_precision(d)?;
            check_bad_flags(
                d,
                Flags::GROUP | Flags::PARENTHESES | Flags::LEADING_SPACE | Flags::PLUS,
            )
        }
        Conversion::Fixed => check_numeric(d),
        Conversion::Scientific => {
            check_numeric(d)?;
            check_bad_flags(d, Flags::GROUP)
        }
        Conversion::General => {
            check_numeric(d)?;
            check_bad_flags(d, Flags::ALTERNATE)
        }
        Conversion::HexFloat => {
            check_numeric(d)?;
            check_bad_flags(d, Flags::PARENTHESES | Flags::GROUP)
        }
        Conversion::Percent => {
            check_no_precision(d)?;
            if !(d.flags - Flags::LEFT_JUSTIFY).is_empty() {
                return Err(FormatMismatch::IllegalFlags(d.flags.to_flag_string()));
            }
            check_left_needs_width(d)
        }
        Conversion::LineSeparator => {
            check_no_precision(d)?;
            if let Some(w) = d.width {
                return Err(FormatMismatch::IllegalWidth(w));
            }
            if !d.flags.is_empty() {
                return Err(FormatMismatch::IllegalFlags(d.flags.to_flag_string()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(src: &str) -> Directive<'_> {
        let t = Template::parse(src).unwrap();
        let mut it = t.directives().cloned().collect::<Vec<_>>().into_iter();
        let d = it.next().expect("one directive");
        assert!(it.next().is_none());
        d
    }

    fn err(src: &str) -> FormatMismatch {
        Template::parse(src).unwrap_err()
    }

    #[test]
    fn literal_only() {
        let t = Template::parse("plain text").unwrap();
        assert_eq!(t.segments(), &[Segment::Literal("plain text")]);
        assert!(!t.has_placeholders());
        assert_eq!(t.required_args(), 0);
        assert!(Template::parse("").unwrap().segments().is_empty());
    }

    #[test]
    fn full_directive() {
        let d = single("%2$-10.3f");
        assert_eq!(d.index, ArgIndex::Explicit(2));
        assert_eq!(d.flags, Flags::LEFT_JUSTIFY);
        assert_eq!(d.width, Some(10));
        assert_eq!(d.precision, Some(3));
        assert_eq!(d.conversion, Conversion::Fixed);
        assert_eq!(d.text, "%2$-10.3f");
    }

    #[test]
    fn zero_flag_versus_width() {
        let d = single("%05d");
        assert_eq!(d.flags, Flags::ZERO_PAD);
        assert_eq!(d.width, Some(5));
        let d = single("%10d");
        assert!(d.flags.is_empty());
        assert_eq!(d.width, Some(10));
    }

    #[test]
    fn segments_keep_literals() {
        let t = Template::parse("a%sb%%c%n").unwrap();
        let kinds: Vec<_> = t
            .segments()
            .iter()
            .map(|s| match s {
                Segment::Literal(l) => (*l).to_owned(),
                Segment::Directive(d) => d.text.to_owned(),
            })
            .collect();
        assert_eq!(kinds, ["a", "%s", "b", "%%", "c", "%n"]);
        assert_eq!(t.required_args(), 1);
    }

    #[test]
    fn uppercase_and_datetime() {
        let d = single("%S");
        assert!(d.upper);
        assert_eq!(d.conversion, Conversion::String);
        let d = single("%TY");
        assert!(d.upper);
        assert_eq!(d.conversion, Conversion::DateTime(DateTimeField::Year));
    }

    #[test]
    fn previous_and_required_args() {
        let t = Template::parse("%s %<s %3$d %s").unwrap();
        let idx: Vec<_> = t.directives().map(|d| d.index).collect();
        assert_eq!(
            idx,
            [
                ArgIndex::Ordinary,
                ArgIndex::Previous,
                ArgIndex::Explicit(3),
                ArgIndex::Ordinary
            ]
        );
        assert_eq!(t.required_args(), 3);
    }

    #[test]
    fn unknown_conversions() {
        assert_eq!(err("%q"), FormatMismatch::UnknownConversion("q".into()));
        assert_eq!(err("100%"), FormatMismatch::UnknownConversion("%".into()));
        assert_eq!(err("%tq"), FormatMismatch::UnknownConversion("tq".into()));
        assert_eq!(err("%D"), FormatMismatch::UnknownConversion("D".into()));
        assert_eq!(err("%.f"), FormatMismatch::UnknownConversion(".".into()));
        assert_eq!(err("%5"), FormatMismatch::UnknownConversion("%".into()));
        assert_eq!(err("%é"), FormatMismatch::UnknownConversion("é".into()));
    }

    #[test]
    fn flag_errors() {
        assert_eq!(err("%--5d"), FormatMismatch::DuplicateFlags("--".into()));
        assert_eq!(err("%+ d"), FormatMismatch::IllegalFlags("+ ".into()));
        assert_eq!(err("%-05d"), FormatMismatch::IllegalFlags("-0".into()));
        assert_eq!(
            err("%#d"),
            FormatMismatch::FlagsConversionMismatch {
                flag: '#',
                conversion: 'd'
            }
        );
        assert_eq!(
            err("%,x"),
            FormatMismatch::FlagsConversionMismatch {
                flag: ',',
                conversion: 'x'
            }
        );
        assert_eq!(
            err("%,e"),
            FormatMismatch::FlagsConversionMismatch {
                flag: ',',
                conversion: 'e'
            }
        );
        assert_eq!(
            err("%+s"),
            FormatMismatch::FlagsConversionMismatch {
                flag: '+',
                conversion: 's'
            }
        );
        assert_eq!(
            err("%#g"),
            FormatMismatch::FlagsConversionMismatch {
                flag: '#',
                conversion: 'g'
            }
        );
        assert_eq!(err("%+%"), FormatMismatch::IllegalFlags("+".into()));
        assert_eq!(err("%-n"), FormatMismatch::IllegalFlags("-".into()));
    }

    #[test]
    fn width_and_precision_errors() {
        assert_eq!(err("%-d"), FormatMismatch::MissingWidth("%-d".into()));
        assert_eq!(err("%0f"), FormatMismatch::MissingWidth("%0f".into()));
        assert_eq!(err("%-s"), FormatMismatch::MissingWidth("%-s".into()));
        assert_eq!(err("%.2d"), FormatMismatch::IllegalPrecision(2));
        assert_eq!(err("%.1c"), FormatMismatch::IllegalPrecision(1));
        assert_eq!(err("%.1tH"), FormatMismatch::IllegalPrecision(1));
        assert_eq!(err("%3n"), FormatMismatch::IllegalWidth(3));
    }

    #[test]
    fn index_errors() {
        assert_eq!(
            err("%0$s"),
            FormatMismatch::IllegalArgumentIndex("%0$".into())
        );
        assert!(matches!(
            err("%99999999999999999999999$s"),
            FormatMismatch::IllegalArgumentIndex(_)
        ));
    }

    #[test]
    fn flag_string_is_canonical() {
        let f = Flags::GROUP | Flags::LEFT_JUSTIFY;
        assert_eq!(f.to_flag_string(), "-,");
        assert_eq!(Flags::from_char('('), Some(Flags::PARENTHESES));
        assert_eq!(Flags::from_char('x'), None);
    }
}
