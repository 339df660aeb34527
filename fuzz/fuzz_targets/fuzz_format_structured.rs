#![no_main]

use arbitrary::Arbitrary;
use digidict_fmt::{Arg, Locale, format};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzArg {
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
    Str(String),
}

#[derive(Debug, Arbitrary)]
struct Directive {
    flags: Vec<u8>,
    width: Option<u8>,
    precision: Option<u8>,
    conversion: u8,
    date_suffix: u8,
}

#[derive(Debug, Arbitrary)]
struct Input {
    locale: u8,
    directives: Vec<Directive>,
    args: Vec<FuzzArg>,
}

const FLAGS: &[u8] = b"-#+ 0,(<";
const CONVERSIONS: &[u8] = b"bBhHsScCdoxXeEfgGaAtT%n";
const DATE_SUFFIXES: &[u8] = b"HIklMSLNpzZsQBbhAaCYyjmdeRTrDFc";
const LOCALES: &[&str] = &["", "en-US", "de-DE", "fr-FR", "tr", "ru", "ja", "xx"];

fn pick(table: &[u8], i: u8) -> char {
    char::from(table[usize::from(i) % table.len()])
}

fuzz_target!(|input: Input| {
    let mut template = String::new();
    for d in input.directives.iter().take(16) {
        template.push('%');
        for &f in d.flags.iter().take(3) {
            template.push(pick(FLAGS, f));
        }
        if let Some(w) = d.width {
            template.push_str(&(w % 40).to_string());
        }
        if let Some(p) = d.precision {
            template.push('.');
            template.push_str(&(p % 20).to_string());
        }
        let c = pick(CONVERSIONS, d.conversion);
        template.push(c);
        if c == 't' || c == 'T' {
            template.push(pick(DATE_SUFFIXES, d.date_suffix));
        }
        template.push(' ');
    }

    let args: Vec<Arg<'_>> = input
        .args
        .iter()
        .take(16)
        .map(|a| match a {
            FuzzArg::Null => Arg::Null,
            FuzzArg::Bool(b) => Arg::Bool(*b),
            FuzzArg::Char(c) => Arg::Char(*c),
            FuzzArg::Int8(v) => Arg::Int8(*v),
            FuzzArg::Int16(v) => Arg::Int16(*v),
            FuzzArg::Int32(v) => Arg::Int32(*v),
            FuzzArg::Int(v) => Arg::Int(*v),
            FuzzArg::UInt(v) => Arg::UInt(*v),
            FuzzArg::Float32(v) => Arg::Float32(*v),
            FuzzArg::Float(v) => Arg::Float(*v),
            FuzzArg::Str(s) => Arg::Str(s),
        })
        .collect();

    let tag = LOCALES[usize::from(input.locale) % LOCALES.len()];
    let Ok(locale) = Locale::parse(tag) else {
        return;
    };

    // Must never panic; either outcome is acceptable.
    let _ = format(&locale, &template, &args);
});
