//! Parsing of grid-interval strings like `"5min"`, `"300s"`, `"1h"`.

use crate::preprocess::error::PreprocessError;

/// Parses an interval string into a millisecond bucket width. The value must
/// be a positive whole number of seconds, minutes, or hours.
pub(crate) fn parse_interval(value: &str) -> Result<i64, PreprocessError> {
    let invalid = || PreprocessError::Configuration(format!("invalid interval '{value}'"));

    let trimmed = value.trim();
    let unit_start = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (digits, unit) = trimmed.split_at(unit_start);
    let amount: i64 = digits.parse().map_err(|_| invalid())?;

    let unit_ms = match unit.trim() {
        "s" | "sec" | "secs" => 1_000,
        "m" | "min" | "mins" => 60_000,
        "h" | "hr" | "hour" | "hours" => 3_600_000,
        _ => return Err(invalid()),
    };

    if amount == 0 {
        return Err(PreprocessError::Configuration(format!(
            "interval '{value}' must be positive"
        )));
    }
    Ok(amount * unit_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_forms() {
        assert_eq!(parse_interval("5min").unwrap(), 300_000);
        assert_eq!(parse_interval("5m").unwrap(), 300_000);
        assert_eq!(parse_interval("300s").unwrap(), 300_000);
        assert_eq!(parse_interval("1h").unwrap(), 3_600_000);
        assert_eq!(parse_interval(" 10 min ").unwrap(), 600_000);
    }

    #[test]
    fn rejects_garbage_zero_and_negative() {
        for bad in ["", "min", "5", "5fortnights", "0min", "-5min", "5.5min"] {
            assert!(
                matches!(
                    parse_interval(bad),
                    Err(PreprocessError::Configuration(_))
                ),
                "expected '{bad}' to be rejected"
            );
        }
    }
}
