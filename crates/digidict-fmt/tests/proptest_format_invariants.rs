//! Property-based invariant tests for locale-aware formatting.
//!
//! 1.  A template without `%` is returned unchanged for any arguments
//! 2.  Formatting never panics on arbitrary templates and arguments
//! 3.  `%d` under the root locale matches the integer's decimal text
//! 4.  `%,d` with the separators removed matches `%d`
//! 5.  `%x` / `%o` render the two's-complement bits at the argument's width
//! 6.  Width pads to exactly `max(width, len)` chars, on the requested side
//! 7.  `%.6f` stays within half an ulp of the last digit
//! 8.  German `%.1f` differs from US only in the decimal separator
//! 9.  `%s` of a finite float parses back to the same float
//! 10. Explicit `n$` selects argument n regardless of the ordinary cursor
//! 11. Fewer arguments than ordinary directives is a MissingArgument error
//! 12. Surplus arguments are ignored
//! 13. Null renders as `null`, or `false` for `%b`
//! 14. `required_args` arguments are always enough
//! 15. `%e` of a non-zero value has a single non-zero leading digit

use digidict_fmt::{Arg, FormatError, FormatMismatch, Locale, Template, format};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

fn us(template: &str, args: &[Arg<'_>]) -> String {
    format(&Locale::US, template, args).unwrap()
}

fn arb_arg() -> impl Strategy<Value = ArgValue> {
    prop_oneof![
        Just(ArgValue::Null),
        any::<bool>().prop_map(ArgValue::Bool),
        any::<i64>().prop_map(ArgValue::Int),
        any::<f64>().prop_map(ArgValue::Float),
        "[a-zA-Z0-9 ]{0,12}".prop_map(ArgValue::Str),
        any::<char>().prop_map(ArgValue::Char),
    ]
}

/// Owned stand-in for `Arg` so strategies can generate string values.
#[derive(Debug, Clone)]
enum ArgValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
}

impl ArgValue {
    fn as_arg(&self) -> Arg<'_> {
        match self {
            Self::Null => Arg::Null,
            Self::Bool(b) => Arg::Bool(*b),
            Self::Int(v) => Arg::Int(*v),
            Self::Float(v) => Arg::Float(*v),
            Self::Str(s) => Arg::Str(s),
            Self::Char(c) => Arg::Char(*c),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Reference examples
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn greeting_example() {
    assert_eq!(
        us(
            "Hello, %s! You have %d messages.",
            &[Arg::Str("Ann"), Arg::Int(3)]
        ),
        "Hello, Ann! You have 3 messages."
    );
}

#[test]
fn null_string_example() {
    assert_eq!(us("%s", &[Arg::Null]), "null");
}

#[test]
fn missing_argument_example() {
    let err = format(&Locale::US, "%d items", &[]).unwrap_err();
    assert_eq!(
        err,
        FormatError::Mismatch(FormatMismatch::MissingArgument {
            index: 1,
            directive: "%d".to_owned()
        })
    );
}

#[test]
fn locale_decimal_separator_example() {
    let de = Locale::parse("de-DE").unwrap();
    assert_eq!(format(&de, "%.1f", &[Arg::Float(1234.5)]).unwrap(), "1234,5");
    assert_eq!(us("%.1f", &[Arg::Float(1234.5)]), "1234.5");
}

// ═════════════════════════════════════════════════════════════════════════
// 1. No placeholders is identity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_placeholder_identity(
        template in "[^%]{0,64}",
        args in prop::collection::vec(arb_arg(), 0..4),
    ) {
        let args: Vec<Arg<'_>> = args.iter().map(ArgValue::as_arg).collect();
        let out = format(&Locale::GERMANY, &template, &args).unwrap();
        prop_assert_eq!(out, template);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Never panics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_template_never_panics(
        template in "([a-z ]|%[-#+ 0,(<]{0,3}[1-9]?(\\.[0-9])?[a-zA-Z%<$]){0,8}",
        args in prop::collection::vec(arb_arg(), 0..4),
    ) {
        let args: Vec<Arg<'_>> = args.iter().map(ArgValue::as_arg).collect();
        let _ = format(&Locale::US, &template, &args);
        let _ = format(&Locale::parse("tr-TR").unwrap(), &template, &args);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. %d matches decimal text
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn decimal_matches_to_string(v in any::<i64>(), u in any::<u64>()) {
        prop_assert_eq!(format(&Locale::ROOT, "%d", &[Arg::Int(v)]).unwrap(), v.to_string());
        prop_assert_eq!(format(&Locale::ROOT, "%d", &[Arg::UInt(u)]).unwrap(), u.to_string());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Grouping only inserts separators
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn grouping_only_inserts_separators(v in any::<i64>()) {
        for locale in [Locale::US, Locale::GERMANY, Locale::FRANCE] {
            let sep = locale.symbols().grouping_separator;
            let grouped = format(&locale, "%,d", &[Arg::Int(v)]).unwrap();
            let stripped: String = grouped.chars().filter(|c| *c != sep).collect();
            prop_assert_eq!(stripped, v.to_string());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Radix conversions
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn radix_matches_bits(v in any::<i64>()) {
        let bits = v as u64;
        prop_assert_eq!(us("%x", &[Arg::Int(v)]), format!("{bits:x}"));
        prop_assert_eq!(us("%X", &[Arg::Int(v)]), format!("{bits:X}"));
        prop_assert_eq!(us("%o", &[Arg::Int(v)]), format!("{bits:o}"));
        prop_assert_eq!(us("%#x", &[Arg::Int(v)]), format!("{bits:#x}"));
    }

    #[test]
    fn radix_uses_argument_width(v in any::<i32>(), w in any::<i16>(), b in any::<i8>()) {
        prop_assert_eq!(us("%x", &[Arg::Int32(v)]), format!("{:x}", v as u32));
        prop_assert_eq!(us("%o", &[Arg::Int32(v)]), format!("{:o}", v as u32));
        prop_assert_eq!(us("%h", &[Arg::Int32(v)]), format!("{:x}", v as u32));
        prop_assert_eq!(us("%x", &[Arg::Int16(w)]), format!("{:x}", w as u16));
        prop_assert_eq!(us("%X", &[Arg::Int8(b)]), format!("{:X}", b as u8));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Width
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn width_pads_to_exact_length(s in "[a-zäöü]{0,12}", width in 1usize..24) {
        let len = s.chars().count();
        let right = us(&std::format!("%{width}s"), &[Arg::Str(&s)]);
        let left = us(&std::format!("%-{width}s"), &[Arg::Str(&s)]);
        prop_assert_eq!(right.chars().count(), width.max(len));
        prop_assert_eq!(left.chars().count(), width.max(len));
        prop_assert!(right.ends_with(s.as_str()));
        prop_assert!(left.starts_with(s.as_str()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Fixed precision accuracy
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fixed_precision_is_close(v in -1.0e6f64..1.0e6) {
        let out = format(&Locale::ROOT, "%.6f", &[Arg::Float(v)]).unwrap();
        let back: f64 = out.parse().unwrap();
        prop_assert!((back - v).abs() <= 5.0e-7 + 1e-9, "{} -> {}", v, out);
        let frac = out.split('.').nth(1).unwrap_or("");
        prop_assert_eq!(frac.len(), 6);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Locale changes only the separator
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn german_differs_only_in_separator(v in -999.0f64..999.0) {
        let en = us("%.1f", &[Arg::Float(v)]);
        let de = format(&Locale::GERMANY, "%.1f", &[Arg::Float(v)]).unwrap();
        prop_assert_eq!(de, en.replace('.', ","));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Shortest float text round-trips
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn float_string_round_trips(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let out = us("%s", &[Arg::Float(v)]);
        let back: f64 = out.parse().unwrap();
        prop_assert_eq!(back.to_bits(), v.to_bits(), "{}", out);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 10. Explicit index
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn explicit_index_selects_argument(
        values in prop::collection::vec("[a-z]{1,6}", 2..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let args: Vec<Arg<'_>> = values.iter().map(|s| Arg::Str(s)).collect();
        let i = pick.index(values.len());
        let template = std::format!("%s|%{}$s|%s", i + 1);
        let out = us(&template, &args);
        let parts: Vec<&str> = out.split('|').collect();
        prop_assert_eq!(parts[0], values[0].as_str());
        prop_assert_eq!(parts[1], values[i].as_str());
        prop_assert_eq!(parts[2], values[1].as_str());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 11. Missing arguments
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn too_few_arguments_is_missing(directives in 1usize..8, supplied in 0usize..8) {
        prop_assume!(supplied < directives);
        let template = "%s ".repeat(directives);
        let args = vec![Arg::Int(1); supplied];
        let err = format(&Locale::US, &template, &args).unwrap_err();
        let is_expected = matches!(
            err.as_mismatch(),
            Some(FormatMismatch::MissingArgument { index, .. }) if *index == supplied + 1
        );
        prop_assert!(is_expected, "{:?}", err);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 12. Surplus arguments
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn surplus_arguments_ignored(
        first in any::<i64>(),
        extra in prop::collection::vec(arb_arg(), 0..5),
    ) {
        let mut args = vec![Arg::Int(first)];
        args.extend(extra.iter().map(ArgValue::as_arg));
        prop_assert_eq!(format(&Locale::ROOT, "<%d>", &args).unwrap(), std::format!("<{first}>"));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 13. Null rendering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn null_renders_uniformly(conversion in prop::sample::select(vec!["s", "d", "x", "f", "e", "c", "h", "tY"])) {
        let out = us(&std::format!("%{conversion}"), &[Arg::Null]);
        prop_assert_eq!(out, "null");
        prop_assert_eq!(us("%b", &[Arg::Null]), "false");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 14. required_args suffices
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn required_args_suffice(
        template in "(x|%s|%s%<s|%[1-4]\\$s|%%|%n){0,10}",
    ) {
        let t = Template::parse(&template).unwrap();
        let args = vec![Arg::Str("v"); t.required_args()];
        prop_assert!(t.apply(&Locale::US, &args).is_ok());
        if t.required_args() > 0 {
            let short = &args[..t.required_args() - 1];
            prop_assert!(t.apply(&Locale::US, short).is_err());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 15. Scientific mantissa is normalized
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scientific_mantissa_normalized(
        v in any::<f64>().prop_filter("finite non-zero", |v| v.is_finite() && *v != 0.0),
        precision in 0usize..10,
    ) {
        let out = us(&std::format!("%.{precision}e"), &[Arg::Float(v)]);
        let first = out.trim_start_matches('-').chars().next().unwrap();
        prop_assert!(('1'..='9').contains(&first), "{}", out);
        prop_assert!(out.contains('e'));
    }
}
