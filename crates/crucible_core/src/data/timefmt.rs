//! Time formats used at the ingestion boundary.
//!
//! Time limits and drop times arrive as "mm:ss" where the minute part may
//! exceed 60; event start and end times arrive as military "HH:MM".

use std::time::Duration;

use crate::error::{EngineError, Result};

fn two_part(raw: &str, field: &str) -> Result<(u64, u64)> {
    let mut parts = raw.trim().splitn(2, ':');
    let (Some(first), Some(second)) = (parts.next(), parts.next()) else {
        return Err(EngineError::Validation {
            field: field.to_string(),
            message: format!("'{}' is not in a two-part colon format", raw),
        });
    };
    let parse = |s: &str| -> Result<u64> {
        s.trim().parse().map_err(|_| EngineError::Validation {
            field: field.to_string(),
            message: format!("'{}' is not a number in '{}'", s, raw),
        })
    };
    Ok((parse(first)?, parse(second)?))
}

/// Parse "mm:ss" into a duration. Minutes may exceed 60.
pub fn parse_mm_ss(raw: &str) -> Result<Duration> {
    let (minutes, seconds) = two_part(raw, "Time_Limit")?;
    if seconds >= 60 {
        return Err(EngineError::Validation {
            field: "Time_Limit".to_string(),
            message: format!("seconds {} out of range in '{}'", seconds, raw),
        });
    }
    Ok(Duration::from_secs(minutes * 60 + seconds))
}

/// Format a duration as "mm:ss". Minutes may exceed 60.
pub fn format_mm_ss(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Parse military "HH:MM" into minutes since midnight.
pub fn parse_military(raw: &str) -> Result<u32> {
    let (hours, minutes) = two_part(raw, "Time")?;
    if hours > 23 || minutes > 59 {
        return Err(EngineError::Validation {
            field: "Time".to_string(),
            message: format!("'{}' is not a valid military time", raw),
        });
    }
    Ok((hours * 60 + minutes) as u32)
}

/// Duration between two military times, wrapping past midnight when the
/// end precedes the start.
pub fn duration_between_military(start: &str, end: &str) -> Result<Duration> {
    let start_min = parse_military(start)?;
    let mut end_min = parse_military(end)?;
    if end_min < start_min {
        end_min += 24 * 60;
    }
    Ok(Duration::from_secs(u64::from(end_min - start_min) * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_ss_round_trip() {
        let d = parse_mm_ss("185:30").unwrap();
        assert_eq!(d.as_secs(), 185 * 60 + 30);
        assert_eq!(format_mm_ss(d), "185:30");
        assert_eq!(format_mm_ss(Duration::from_secs(65)), "01:05");
    }

    #[test]
    fn mm_ss_rejects_garbage() {
        assert!(parse_mm_ss("1800").is_err());
        assert!(parse_mm_ss("12:xx").is_err());
        assert!(parse_mm_ss("10:75").is_err());
    }

    #[test]
    fn military_time_bounds() {
        assert_eq!(parse_military("06:30").unwrap(), 390);
        assert!(parse_military("24:00").is_err());
        assert!(parse_military("12:60").is_err());
    }

    #[test]
    fn duration_wraps_midnight() {
        let d = duration_between_military("23:30", "01:15").unwrap();
        assert_eq!(d.as_secs() / 60, 105);
        let same_day = duration_between_military("06:00", "09:05").unwrap();
        assert_eq!(same_day.as_secs() / 60, 185);
    }
}
