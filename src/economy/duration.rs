//! Human-readable duration codec for cooldown-type config values.
//!
//! Operators type spans like "30m", "1h30m", "2 days" into the config panel;
//! this module turns them into whole seconds and back. The grammar is a flat
//! sequence of `<integer><unit>` tokens: case-insensitive,
//! whitespace-insensitive, units may repeat and combine, and anything
//! unrecognized is silently skipped. The French day unit `j` (jour) is
//! accepted alongside `d`.

/// Parse a duration string to total seconds.
///
/// Returns the sum of every recognized `<integer><unit>` token, or 0 when
/// nothing is recognized. Callers must treat 0 as invalid input for
/// cooldowns; "0s" and "garbage" are indistinguishable here.
///
/// # Examples
/// ```
/// use coinbot::economy::duration::parse;
///
/// assert_eq!(parse("90s"), 90);
/// assert_eq!(parse("1h30m"), 5400);
/// assert_eq!(parse("2j"), 172_800);
/// assert_eq!(parse("1 day 3h"), 97_200);
/// assert_eq!(parse("soon"), 0);
/// ```
pub fn parse(text: &str) -> u64 {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    let mut total: u64 = 0;
    let mut chars = compact.chars().peekable();

    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            // stray letters/punctuation between tokens
            chars.next();
            continue;
        }

        let mut number: u64 = 0;
        while let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
            number = number.saturating_mul(10).saturating_add(u64::from(digit));
            chars.next();
        }

        let mut unit = String::new();
        while let Some(&a) = chars.peek() {
            if a.is_alphabetic() {
                unit.push(a);
                chars.next();
            } else {
                break;
            }
        }

        if let Some(scale) = unit_seconds(&unit) {
            total = total.saturating_add(number.saturating_mul(scale));
        }
    }

    total
}

fn unit_seconds(unit: &str) -> Option<u64> {
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Some(1),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(60),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(3600),
        "d" | "day" | "days" | "j" | "jour" | "jours" => Some(86_400),
        _ => None,
    }
}

/// Render seconds as the largest applicable unit plus one subordinate unit.
///
/// Presentational only, never used in decision logic. The subordinate unit
/// is abbreviated ("2 hours 15m", "1 day 3h") and omitted when zero.
pub fn format(seconds: u64) -> String {
    if seconds < 60 {
        plural(seconds, "second")
    } else if seconds < 3600 {
        let minutes = seconds / 60;
        let s = seconds % 60;
        let mut out = plural(minutes, "minute");
        if s > 0 {
            out.push_str(&format!(" {s}s"));
        }
        out
    } else if seconds < 86_400 {
        let hours = seconds / 3600;
        let m = (seconds % 3600) / 60;
        let mut out = plural(hours, "hour");
        if m > 0 {
            out.push_str(&format!(" {m}m"));
        }
        out
    } else {
        let days = seconds / 86_400;
        let h = (seconds % 86_400) / 3600;
        let mut out = plural(days, "day");
        if h > 0 {
            out.push_str(&format!(" {h}h"));
        }
        out
    }
}

fn plural(n: u64, unit: &str) -> String {
    format!("{n} {unit}{}", if n == 1 { "" } else { "s" })
}
