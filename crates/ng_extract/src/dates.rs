use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

#[derive(Debug, Clone, Copy)]
enum Unit {
    Days,
    Hours,
    Minutes,
    Weeks,
    Months,
}

// Table order is load-bearing: within a rule family the first textual match
// wins, and English months are scanned before Polish ones.
const ENGLISH_MONTHS: [(&str, u32); 12] = [
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

const POLISH_MONTHS: [(&str, u32); 12] = [
    ("stycznia", 1),
    ("lutego", 2),
    ("marca", 3),
    ("kwietnia", 4),
    ("maja", 5),
    ("czerwca", 6),
    ("lipca", 7),
    ("sierpnia", 8),
    ("września", 9),
    ("października", 10),
    ("listopada", 11),
    ("grudnia", 12),
];

lazy_static! {
    static ref RELATIVE_RULES: Vec<(Regex, Unit)> = vec![
        (Regex::new(r"(\d+)\s+days?\s+ago").unwrap(), Unit::Days),
        (Regex::new(r"(\d+)\s+hours?\s+ago").unwrap(), Unit::Hours),
        (Regex::new(r"(\d+)\s+minutes?\s+ago").unwrap(), Unit::Minutes),
        (Regex::new(r"(\d+)\s+weeks?\s+ago").unwrap(), Unit::Weeks),
        (Regex::new(r"(\d+)\s+months?\s+ago").unwrap(), Unit::Months),
    ];

    /// English "month day, year", e.g. "october 14, 2024".
    static ref ENGLISH_MONTH_RULES: Vec<(Regex, u32)> = ENGLISH_MONTHS
        .iter()
        .map(|(name, month)| {
            let pattern = format!(r"{}\s+(\d+),\s+(\d{{4}})", name);
            (Regex::new(&pattern).unwrap(), *month)
        })
        .collect();

    /// Polish "day month year", e.g. "14 października 2024".
    static ref POLISH_MONTH_RULES: Vec<(Regex, u32)> = POLISH_MONTHS
        .iter()
        .map(|(name, month)| {
            let pattern = format!(r"(\d+)\s+{}\s+(\d{{4}})", name);
            (Regex::new(&pattern).unwrap(), *month)
        })
        .collect();

    /// Day-first numeric forms: D.M.Y then D/M/Y.
    static ref NUMERIC_DAY_FIRST: Vec<Regex> = vec![
        Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})").unwrap(),
        Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap(),
    ];

    static ref NUMERIC_YEAR_FIRST: Regex =
        Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap();

    /// ISO-ish datetimes; input is lower-cased before matching.
    static ref ISO_RULES: Vec<Regex> = vec![
        Regex::new(r"(\d{4})-(\d{2})-(\d{2})t(\d{2}):(\d{2}):(\d{2})z?").unwrap(),
        Regex::new(r"(\d{4})-(\d{2})-(\d{2})\s+(\d{2}):(\d{2}):(\d{2})").unwrap(),
    ];
}

/// Midnight UTC of the given instant's calendar day.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now)
}

fn ymd_midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    ymd_hms(year, month, day, 0, 0, 0)
}

fn ymd_hms(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour, min, sec)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn group_u32(caps: &Captures<'_>, index: usize) -> u32 {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn group_i32(caps: &Captures<'_>, index: usize) -> i32 {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Parses free-text date expressions into a UTC timestamp. Total: when no
/// rule matches, the result is the start of `now`'s day.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateNormalizer;

impl DateNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// The sentinel returned when nothing matches.
    pub fn fallback(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        start_of_day(now)
    }

    pub fn normalize(&self, text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return self.fallback(now);
        }

        self.try_relative(&text, now)
            .or_else(|| self.try_absolute(&text))
            .or_else(|| self.try_iso(&text))
            .unwrap_or_else(|| self.fallback(now))
    }

    fn try_relative(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        for (rule, unit) in RELATIVE_RULES.iter() {
            if let Some(caps) = rule.captures(text) {
                let n = i64::from(group_u32(&caps, 1));
                let offset = match unit {
                    Unit::Days => chrono::Duration::try_days(n),
                    Unit::Hours => chrono::Duration::try_hours(n),
                    Unit::Minutes => chrono::Duration::try_minutes(n),
                    Unit::Weeks => chrono::Duration::try_weeks(n),
                    // Months are a coarse 30-day approximation on purpose;
                    // downstream consumers rely on it being exact.
                    Unit::Months => chrono::Duration::try_days(n * 30),
                };
                // Offsets that leave the representable range degrade to the
                // sentinel instead of panicking; normalize is total.
                return Some(
                    offset
                        .and_then(|offset| now.checked_sub_signed(offset))
                        .unwrap_or_else(|| start_of_day(now)),
                );
            }
        }

        if text.contains("yesterday") || text.contains("wczoraj") {
            return Some(now - chrono::Duration::days(1));
        }
        if text.contains("today") || text.contains("dziś") {
            return Some(start_of_day(now));
        }

        None
    }

    fn try_absolute(&self, text: &str) -> Option<DateTime<Utc>> {
        for (rule, month) in ENGLISH_MONTH_RULES.iter() {
            if let Some(caps) = rule.captures(text) {
                let day = group_u32(&caps, 1);
                let year = group_i32(&caps, 2);
                if let Some(date) = ymd_midnight(year, *month, day) {
                    return Some(date);
                }
            }
        }

        for (rule, month) in POLISH_MONTH_RULES.iter() {
            if let Some(caps) = rule.captures(text) {
                let day = group_u32(&caps, 1);
                let year = group_i32(&caps, 2);
                if let Some(date) = ymd_midnight(year, *month, day) {
                    return Some(date);
                }
            }
        }

        // Invalid calendar combinations fall through to the next pattern,
        // never to a field-swapped retry.
        for rule in NUMERIC_DAY_FIRST.iter() {
            if let Some(caps) = rule.captures(text) {
                let day = group_u32(&caps, 1);
                let month = group_u32(&caps, 2);
                let year = group_i32(&caps, 3);
                if let Some(date) = ymd_midnight(year, month, day) {
                    return Some(date);
                }
            }
        }

        if let Some(caps) = NUMERIC_YEAR_FIRST.captures(text) {
            let year = group_i32(&caps, 1);
            let month = group_u32(&caps, 2);
            let day = group_u32(&caps, 3);
            if let Some(date) = ymd_midnight(year, month, day) {
                return Some(date);
            }
        }

        None
    }

    fn try_iso(&self, text: &str) -> Option<DateTime<Utc>> {
        for rule in ISO_RULES.iter() {
            if let Some(caps) = rule.captures(text) {
                let date = ymd_hms(
                    group_i32(&caps, 1),
                    group_u32(&caps, 2),
                    group_u32(&caps, 3),
                    group_u32(&caps, 4),
                    group_u32(&caps, 5),
                    group_u32(&caps, 6),
                );
                if let Some(date) = date {
                    return Some(date);
                }
            }
        }

        None
    }
}
