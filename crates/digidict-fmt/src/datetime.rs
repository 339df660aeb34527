#![forbid(unsafe_code)]

//! `%t` / `%T` date and time conversions.
//!
//! A temporal argument is first normalized into a [`Temporal`] holding
//! whichever of date, time, and UTC offset the value carries. Each field
//! conversion then asks for the parts it needs; asking for a part the value
//! lacks (an hour of a bare date, a zone of a local date-time) is an
//! [`FormatMismatch::IllegalConversion`].
//!
//! 64-bit integer arguments are milliseconds since the Unix epoch,
//! interpreted in the `UTC` zone, so `%tZ` prints `UTC`. A zoned date-time
//! carries only its offset and prints it as an offset id (`Z`, `-08:00`).

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};

use crate::arg::Arg;
use crate::error::FormatMismatch;
use crate::locale::{Locale, NumberSymbols};

// ---------------------------------------------------------------------------
// DateTimeField
// ---------------------------------------------------------------------------

/// The suffix character after `%t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeField {
    /// `H`: hour of day, 00-23.
    Hour24,
    /// `I`: hour of half-day, 01-12.
    Hour12,
    /// `k`: hour of day, 0-23.
    Hour24Unpadded,
    /// `l`: hour of half-day, 1-12.
    Hour12Unpadded,
    /// `M`: minute, 00-59.
    Minute,
    /// `S`: second, 00-60.
    Second,
    /// `L`: millisecond, 000-999.
    Millisecond,
    /// `N`: nanosecond, 000000000-999999999.
    Nanosecond,
    /// `p`: am/pm marker, lowercase.
    AmPm,
    /// `z`: numeric offset, `+hhmm`.
    ZoneOffset,
    /// `Z`: zone id.
    ZoneName,
    /// `s`: seconds since the epoch.
    EpochSeconds,
    /// `Q`: milliseconds since the epoch.
    EpochMillis,
    /// `B`: full month name.
    MonthName,
    /// `b` / `h`: abbreviated month name.
    MonthNameShort,
    /// `A`: full weekday name.
    WeekdayName,
    /// `a`: abbreviated weekday name.
    WeekdayNameShort,
    /// `C`: year / 100, two digits.
    Century,
    /// `Y`: year, at least four digits.
    Year,
    /// `y`: last two digits of the year.
    YearTwoDigit,
    /// `j`: day of year, 001-366.
    DayOfYear,
    /// `m`: month, 01-12.
    Month,
    /// `d`: day of month, 01-31.
    DayOfMonth,
    /// `e`: day of month, 1-31.
    DayOfMonthUnpadded,
    /// `R`: `%tH:%tM`.
    Time24Short,
    /// `T`: `%tH:%tM:%tS`.
    Time24,
    /// `r`: `%tI:%tM:%tS %Tp`.
    Time12,
    /// `D`: `%tm/%td/%ty`.
    DateUs,
    /// `F`: `%tY-%tm-%td`.
    DateIso,
    /// `c`: `%ta %tb %td %tT %tZ %tY`.
    Full,
}

impl DateTimeField {
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'H' => Self::Hour24,
            'I' => Self::Hour12,
            'k' => Self::Hour24Unpadded,
            'l' => Self::Hour12Unpadded,
            'M' => Self::Minute,
            'S' => Self::Second,
            'L' => Self::Millisecond,
            'N' => Self::Nanosecond,
            'p' => Self::AmPm,
            'z' => Self::ZoneOffset,
            'Z' => Self::ZoneName,
            's' => Self::EpochSeconds,
            'Q' => Self::EpochMillis,
            'B' => Self::MonthName,
            'b' | 'h' => Self::MonthNameShort,
            'A' => Self::WeekdayName,
            'a' => Self::WeekdayNameShort,
            'C' => Self::Century,
            'Y' => Self::Year,
            'y' => Self::YearTwoDigit,
            'j' => Self::DayOfYear,
            'm' => Self::Month,
            'd' => Self::DayOfMonth,
            'e' => Self::DayOfMonthUnpadded,
            'R' => Self::Time24Short,
            'T' => Self::Time24,
            'r' => Self::Time12,
            'D' => Self::DateUs,
            'F' => Self::DateIso,
            'c' => Self::Full,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Hour24 => 'H',
            Self::Hour12 => 'I',
            Self::Hour24Unpadded => 'k',
            Self::Hour12Unpadded => 'l',
            Self::Minute => 'M',
            Self::Second => 'S',
            Self::Millisecond => 'L',
            Self::Nanosecond => 'N',
            Self::AmPm => 'p',
            Self::ZoneOffset => 'z',
            Self::ZoneName => 'Z',
            Self::EpochSeconds => 's',
            Self::EpochMillis => 'Q',
            Self::MonthName => 'B',
            Self::MonthNameShort => 'b',
            Self::WeekdayName => 'A',
            Self::WeekdayNameShort => 'a',
            Self::Century => 'C',
            Self::Year => 'Y',
            Self::YearTwoDigit => 'y',
            Self::DayOfYear => 'j',
            Self::Month => 'm',
            Self::DayOfMonth => 'd',
            Self::DayOfMonthUnpadded => 'e',
            Self::Time24Short => 'R',
            Self::Time24 => 'T',
            Self::Time12 => 'r',
            Self::DateUs => 'D',
            Self::DateIso => 'F',
            Self::Full => 'c',
        }
    }
}

// ---------------------------------------------------------------------------
// Calendar names
// ---------------------------------------------------------------------------

struct CalendarNames {
    months: [&'static str; 12],
    months_short: [&'static str; 12],
    /// Sunday first.
    weekdays: [&'static str; 7],
    weekdays_short: [&'static str; 7],
    am_pm: [&'static str; 2],
}

const ENGLISH_NAMES: CalendarNames = CalendarNames {
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ],
    months_short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: [
        "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
    ],
    weekdays_short: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    am_pm: ["AM", "PM"],
};

const GERMAN_NAMES: CalendarNames = CalendarNames {
    months: [
        "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
        "Oktober", "November", "Dezember",
    ],
    months_short: [
        "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.",
        "Dez.",
    ],
    weekdays: [
        "Sonntag", "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag",
    ],
    weekdays_short: ["So.", "Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa."],
    am_pm: ["AM", "PM"],
};

const FRENCH_NAMES: CalendarNames = CalendarNames {
    months: [
        "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
        "octobre", "novembre", "décembre",
    ],
    months_short: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
        "nov.", "déc.",
    ],
    weekdays: [
        "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
    ],
    weekdays_short: ["dim.", "lun.", "mar.", "mer.", "jeu.", "ven.", "sam."],
    am_pm: ["AM", "PM"],
};

const SPANISH_NAMES: CalendarNames = CalendarNames {
    months: [
        "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
        "octubre", "noviembre", "diciembre",
    ],
    months_short: [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
    ],
    weekdays: [
        "domingo", "lunes", "martes", "miércoles", "jueves", "viernes", "sábado",
    ],
    weekdays_short: ["dom", "lun", "mar", "mié", "jue", "vie", "sáb"],
    am_pm: ["a. m.", "p. m."],
};

const ITALIAN_NAMES: CalendarNames = CalendarNames {
    months: [
        "gennaio", "febbraio", "marzo", "aprile", "maggio", "giugno", "luglio", "agosto",
        "settembre", "ottobre", "novembre", "dicembre",
    ],
    months_short: [
        "gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic",
    ],
    weekdays: [
        "domenica", "lunedì", "martedì", "mercoledì", "giovedì", "venerdì", "sabato",
    ],
    weekdays_short: ["dom", "lun", "mar", "mer", "gio", "ven", "sab"],
    am_pm: ["AM", "PM"],
};

const PORTUGUESE_NAMES: CalendarNames = CalendarNames {
    months: [
        "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
        "outubro", "novembro", "dezembro",
    ],
    months_short: [
        "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.",
        "dez.",
    ],
    weekdays: [
        "domingo",
        "segunda-feira",
        "terça-feira",
        "quarta-feira",
        "quinta-feira",
        "sexta-feira",
        "sábado",
    ],
    weekdays_short: ["dom.", "seg.", "ter.", "qua.", "qui.", "sex.", "sáb."],
    am_pm: ["AM", "PM"],
};

const RUSSIAN_NAMES: CalendarNames = CalendarNames {
    months: [
        "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа", "сентября",
        "октября", "ноября", "декабря",
    ],
    months_short: [
        "янв.", "февр.", "мар.", "апр.", "мая", "июн.", "июл.", "авг.", "сент.", "окт.",
        "нояб.", "дек.",
    ],
    weekdays: [
        "воскресенье",
        "понедельник",
        "вторник",
        "среда",
        "четверг",
        "пятница",
        "суббота",
    ],
    weekdays_short: ["вс", "пн", "вт", "ср", "чт", "пт", "сб"],
    am_pm: ["AM", "PM"],
};

const TURKISH_NAMES: CalendarNames = CalendarNames {
    months: [
        "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül",
        "Ekim", "Kasım", "Aralık",
    ],
    months_short: [
        "Oca", "Şub", "Mar", "Nis", "May", "Haz", "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara",
    ],
    weekdays: [
        "Pazar", "Pazartesi", "Salı", "Çarşamba", "Perşembe", "Cuma", "Cumartesi",
    ],
    weekdays_short: ["Paz", "Pzt", "Sal", "Çar", "Per", "Cum", "Cmt"],
    am_pm: ["ÖÖ", "ÖS"],
};

fn calendar_names(locale: &Locale) -> &'static CalendarNames {
    match locale.language() {
        "de" => &GERMAN_NAMES,
        "fr" => &FRENCH_NAMES,
        "es" => &SPANISH_NAMES,
        "it" => &ITALIAN_NAMES,
        "pt" => &PORTUGUESE_NAMES,
        "ru" => &RUSSIAN_NAMES,
        "tr" => &TURKISH_NAMES,
        _ => &ENGLISH_NAMES,
    }
}

// ---------------------------------------------------------------------------
// Temporal
// ---------------------------------------------------------------------------

/// The parts of a temporal argument.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Temporal {
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    offset: Option<FixedOffset>,
    /// Zone id printed by `%tZ` in place of the offset id.
    zone: Option<&'static str>,
}

impl Temporal {
    /// Normalize an argument; `None` if it is not temporal.
    pub(crate) fn from_arg(arg: &Arg<'_>) -> Option<Self> {
        let zoned = |dt: DateTime<FixedOffset>| Self {
            date: Some(dt.date_naive()),
            time: Some(dt.time()),
            offset: Some(*dt.offset()),
            zone: None,
        };
        let utc = |dt: DateTime<FixedOffset>| Self {
            zone: Some("UTC"),
            ..zoned(dt)
        };
        match *arg {
            Arg::Date(d) => Some(Self {
                date: Some(d),
                time: None,
                offset: None,
                zone: None,
            }),
            Arg::Time(t) => Some(Self {
                date: None,
                time: Some(t),
                offset: None,
                zone: None,
            }),
            Arg::DateTime(dt) => Some(Self {
                date: Some(dt.date()),
                time: Some(dt.time()),
                offset: None,
                zone: None,
            }),
            Arg::ZonedDateTime(dt) => Some(zoned(dt)),
            Arg::Int(millis) => epoch_millis(millis).map(utc),
            Arg::UInt(millis) => i64::try_from(millis)
                .ok()
                .and_then(epoch_millis)
                .map(utc),
            _ => None,
        }
    }

    fn instant(&self) -> Option<DateTime<FixedOffset>> {
        let naive = NaiveDateTime::new(self.date?, self.time?);
        naive.and_local_timezone(self.offset?).single()
    }
}

fn epoch_millis(millis: i64) -> Option<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.fixed_offset())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Context shared by the field writers of one directive.
pub(crate) struct FieldWriter<'l> {
    pub(crate) locale: &'l Locale,
    pub(crate) symbols: NumberSymbols,
    /// 1-based argument position, for errors.
    pub(crate) index: usize,
    pub(crate) arg_kind: &'static str,
}

impl FieldWriter<'_> {
    fn missing(&self, field: DateTimeField) -> FormatMismatch {
        FormatMismatch::IllegalConversion {
            conversion: field.to_char(),
            arg_kind: self.arg_kind,
            index: self.index,
        }
    }

    fn push_number(&self, out: &mut String, value: i64, min_digits: usize) {
        let digits = format!("{:0min_digits$}", value.unsigned_abs());
        if value < 0 {
            out.push('-');
        }
        out.extend(digits.chars().map(|c| self.symbols.localize_digit(c)));
    }

    /// Append the rendering of `field` for `t`.
    pub(crate) fn write(
        &self,
        out: &mut String,
        field: DateTimeField,
        t: &Temporal,
    ) -> Result<(), FormatMismatch> {
        use DateTimeField as F;

        let time = || t.time.ok_or_else(|| self.missing(field));
        let date = || t.date.ok_or_else(|| self.missing(field));
        let names = calendar_names(self.locale);

        match field {
            F::Hour24 => self.push_number(out, i64::from(time()?.hour()), 2),
            F::Hour12 => self.push_number(out, i64::from(time()?.hour12().1), 2),
            F::Hour24Unpadded => self.push_number(out, i64::from(time()?.hour()), 1),
            F::Hour12Unpadded => self.push_number(out, i64::from(time()?.hour12().1), 1),
            F::Minute => self.push_number(out, i64::from(time()?.minute()), 2),
            F::Second => {
                // chrono folds a leap second into nanoseconds >= 1e9.
                let tm = time()?;
                let second = tm.second() + u32::from(tm.nanosecond() >= 1_000_000_000);
                self.push_number(out, i64::from(second), 2);
            }
            F::Millisecond => {
                let nanos = time()?.nanosecond() % 1_000_000_000;
                self.push_number(out, i64::from(nanos / 1_000_000), 3);
            }
            F::Nanosecond => {
                let nanos = time()?.nanosecond() % 1_000_000_000;
                self.push_number(out, i64::from(nanos), 9);
            }
            F::AmPm => {
                let pm = time()?.hour12().0;
                out.push_str(&self.locale.to_lowercase(names.am_pm[usize::from(pm)]));
            }
            F::ZoneOffset => {
                let offset = t.offset.ok_or_else(|| self.missing(field))?;
                let secs = offset.local_minus_utc();
                out.push(if secs < 0 { '-' } else { '+' });
                let minutes = secs.unsigned_abs() / 60;
                let hhmm = (minutes / 60) * 100 + minutes % 60;
                self.push_number(out, i64::from(hhmm), 4);
            }
            F::ZoneName => {
                let offset = t.offset.ok_or_else(|| self.missing(field))?;
                match t.zone {
                    Some(zone) => out.push_str(zone),
                    None => out.push_str(&offset_id(offset)),
                }
            }
            F::EpochSeconds => {
                let instant = t.instant().ok_or_else(|| self.missing(field))?;
                self.push_number(out, instant.timestamp(), 1);
            }
            F::EpochMillis => {
                let instant = t.instant().ok_or_else(|| self.missing(field))?;
                self.push_number(out, instant.timestamp_millis(), 1);
            }
            F::MonthName => out.push_str(names.months[date()?.month0() as usize]),
            F::MonthNameShort => out.push_str(names.months_short[date()?.month0() as usize]),
            F::WeekdayName => {
                let idx = date()?.weekday().num_days_from_sunday() as usize;
                out.push_str(names.weekdays[idx]);
            }
            F::WeekdayNameShort => {
                let idx = date()?.weekday().num_days_from_sunday() as usize;
                out.push_str(names.weekdays_short[idx]);
            }
            F::Century => self.push_number(out, i64::from(date()?.year()).div_euclid(100), 2),
            F::Year => self.push_number(out, i64::from(date()?.year()), 4),
            F::YearTwoDigit => {
                self.push_number(out, i64::from(date()?.year()).rem_euclid(100), 2);
            }
            F::DayOfYear => self.push_number(out, i64::from(date()?.ordinal()), 3),
            F::Month => self.push_number(out, i64::from(date()?.month()), 2),
            F::DayOfMonth => self.push_number(out, i64::from(date()?.day()), 2),
            F::DayOfMonthUnpadded => self.push_number(out, i64::from(date()?.day()), 1),
            F::Time24Short => {
                self.write(out, F::Hour24, t)?;
                out.push(':');
                self.write(out, F::Minute, t)?;
            }
            F::Time24 => {
                self.write(out, F::Time24Short, t)?;
                out.push(':');
                self.write(out, F::Second, t)?;
            }
            F::Time12 => {
                self.write(out, F::Hour12, t)?;
                out.push(':');
                self.write(out, F::Minute, t)?;
                out.push(':');
                self.write(out, F::Second, t)?;
                out.push(' ');
                let mut marker = String::new();
                self.write(&mut marker, F::AmPm, t)?;
                out.push_str(&self.locale.to_uppercase(&marker));
            }
            F::DateUs => {
                self.write(out, F::Month, t)?;
                out.push('/');
                self.write(out, F::DayOfMonth, t)?;
                out.push('/');
                self.write(out, F::YearTwoDigit, t)?;
            }
            F::DateIso => {
                self.write(out, F::Year, t)?;
                out.push('-');
                self.write(out, F::Month, t)?;
                out.push('-');
                self.write(out, F::DayOfMonth, t)?;
            }
            F::Full => {
                self.write(out, F::WeekdayNameShort, t)?;
                out.push(' ');
                self.write(out, F::MonthNameShort, t)?;
                out.push(' ');
                self.write(out, F::DayOfMonth, t)?;
                out.push(' ');
                self.write(out, F::Time24, t)?;
                out.push(' ');
                self.write(out, F::ZoneName, t)?;
                out.push(' ');
                self.write(out, F::Year, t)?;
            }
        }
        Ok(())
    }
}

/// `Z` for UTC, otherwise `+hh:mm` (with `:ss` when needed).
fn offset_id(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    if secs == 0 {
        return "Z".to_owned();
    }
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.unsigned_abs();
    let (h, m, s) = (abs / 3600, (abs / 60) % 60, abs % 60);
    if s == 0 {
        format!("{sign}{h:02}:{m:02}")
    } else {
        format!("{sign}{h:02}:{m:02}:{s:02}")
    }
}

// ---------------------------------------------------------------------------
// ISO text for %s
// ---------------------------------------------------------------------------

fn iso_time(t: NaiveTime) -> String {
    let mut s = format!("{:02}:{:02}", t.hour(), t.minute());
    let nanos = t.nanosecond() % 1_000_000_000;
    let second = t.second() + u32::from(t.nanosecond() >= 1_000_000_000);
    if second > 0 || nanos > 0 {
        s.push_str(&format!(":{second:02}"));
        if nanos > 0 {
            if nanos % 1_000_000 == 0 {
                s.push_str(&format!(".{:03}", nanos / 1_000_000));
            } else if nanos % 1_000 == 0 {
                s.push_str(&format!(".{:06}", nanos / 1_000));
            } else {
                s.push_str(&format!(".{nanos:09}"));
            }
        }
    }
    s
}

fn iso_date(d: NaiveDate) -> String {
    let year = d.year();
    if (0..=9999).contains(&year) {
        format!("{year:04}-{:02}-{:02}", d.month(), d.day())
    } else {
        format!("{year:+05}-{:02}-{:02}", d.month(), d.day())
    }
}

/// ISO-8601 text of a temporal argument: seconds are omitted when zero and
/// fractions are printed in groups of three digits.
pub(crate) fn iso_string(arg: &Arg<'_>) -> Option<String> {
    Some(match *arg {
        Arg::Date(d) => iso_date(d),
        Arg::Time(t) => iso_time(t),
        Arg::DateTime(dt) => format!("{}T{}", iso_date(dt.date()), iso_time(dt.time())),
        Arg::ZonedDateTime(dt) => format!(
            "{}T{}{}",
            iso_date(dt.date_naive()),
            iso_time(dt.time()),
            offset_id(*dt.offset())
        ),
        _ => return None,
    })
}
