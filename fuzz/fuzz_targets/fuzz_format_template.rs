#![no_main]

use digidict_fmt::{Arg, Locale, Template, format};
use libfuzzer_sys::fuzz_target;

/// Widths and precisions are honored literally; long digit runs would only
/// measure the allocator.
fn has_long_digit_run(text: &str) -> bool {
    let mut run = 0;
    for b in text.bytes() {
        run = if b.is_ascii_digit() { run + 1 } else { 0 };
        if run > 4 {
            return true;
        }
    }
    false
}

fuzz_target!(|data: &[u8]| {
    let Ok(template) = std::str::from_utf8(data) else {
        return;
    };
    if template.len() > 1024 || has_long_digit_run(template) {
        return;
    }

    let args = [
        Arg::Str("text"),
        Arg::Int(-1234567),
        Arg::Float(-0.5),
        Arg::Null,
        Arg::Char('ß'),
        Arg::UInt(u64::MAX),
        Arg::Bool(true),
    ];

    for locale in [Locale::ROOT, Locale::US, Locale::GERMANY, Locale::FRANCE] {
        let direct = format(&locale, template, &args);

        // Parsing and applying separately must agree with the one-shot call.
        if let Ok(parsed) = Template::parse(template) {
            let applied = parsed.apply(&locale, &args);
            assert_eq!(direct, applied, "template {template:?}");
        } else {
            assert!(direct.is_err());
        }

        // A template without `%` is the identity.
        if !template.contains('%') {
            assert_eq!(direct.as_deref(), Ok(template));
        }
    }
});
