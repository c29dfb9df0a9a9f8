//! Parsing of human-friendly durations such as `30d` or `12h`.

use std::time::Duration;

/// Parses a duration written as `<n><unit>` or as bare seconds.
///
/// Supported units: `s`, `m`, `h`, `d`, `w`.
///
/// ```ignore
/// assert_eq!(parse_duration("30d"), Some(Duration::from_secs(30 * 86_400)));
/// assert_eq!(parse_duration("3600"), Some(Duration::from_secs(3600)));
/// ```
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);
    let amount: u64 = digits.parse().ok()?;

    let multiplier = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        "w" => 604_800,
        _ => return None,
    };

    amount.checked_mul(multiplier).map(Duration::from_secs)
}
