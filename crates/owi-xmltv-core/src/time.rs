//! Timestamp rendering for programme `start`/`stop` attributes.
//!
//! The UTC offset is decided once per run from an explicit run timestamp and
//! reused for every event, so a run that spans a DST change still renders all
//! times with the offset that was valid when it started.

use std::fmt;

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

use crate::error::{Result, XmltvError};

/// Granularity of the rendered offset in seconds
const OFFSET_STEP_SECS: f64 = 900.0;

/// Largest offset `FixedOffset` accepts, kept on a 15 minute boundary
const MAX_OFFSET_MINUTES: i32 = 23 * 60 + 45;

/// Signed UTC offset rounded to the nearest 15 minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TzOffset {
    minutes: i32,
}

impl TzOffset {
    /// Build an offset from raw seconds east of UTC.
    ///
    /// # Example
    /// ```
    /// use owi_xmltv_core::time::TzOffset;
    ///
    /// assert_eq!(TzOffset::from_seconds(3600).to_string(), "+0100");
    /// assert_eq!(TzOffset::from_seconds(-19800).to_string(), "-0530");
    /// ```
    pub fn from_seconds(seconds: i32) -> Self {
        let quarters = (f64::from(seconds) / OFFSET_STEP_SECS).round() as i32;
        let minutes = (quarters * 15).clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES);
        Self { minutes }
    }

    /// Offset in effect at the given instant.
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self::from_seconds(now.offset().fix().local_minus_utc())
    }

    /// Offset in minutes east of UTC
    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    fn as_fixed_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl fmt::Display for TzOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.abs();
        write!(f, "{}{:02}{:02}", sign, abs / 60, abs % 60)
    }
}

/// Renders Unix timestamps as `YYYYMMDDHHMMSS ±HHMM` in one fixed offset.
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    offset: TzOffset,
    zone: FixedOffset,
    suffix: String,
}

impl TimeFormatter {
    pub fn new(offset: TzOffset) -> Self {
        Self {
            offset,
            zone: offset.as_fixed_offset(),
            suffix: offset.to_string(),
        }
    }

    /// Formatter for the offset in effect at the run timestamp.
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self::new(TzOffset::at(now))
    }

    pub fn offset(&self) -> TzOffset {
        self.offset
    }

    /// Render a single timestamp.
    ///
    /// # Errors
    /// `XmltvError::InvalidTimestamp` if chrono cannot represent the instant.
    pub fn format(&self, timestamp: i64) -> Result<String> {
        let utc = DateTime::from_timestamp(timestamp, 0)
            .ok_or(XmltvError::InvalidTimestamp(timestamp))?;
        Ok(format!(
            "{} {}",
            utc.with_timezone(&self.zone).format("%Y%m%d%H%M%S"),
            self.suffix
        ))
    }

    /// Render the start and stop of an event lasting `duration_minutes`.
    pub fn format_span(&self, begin: i64, duration_minutes: i64) -> Result<(String, String)> {
        let end = duration_minutes
            .checked_mul(60)
            .and_then(|secs| begin.checked_add(secs))
            .ok_or(XmltvError::InvalidTimestamp(begin))?;
        Ok((self.format(begin)?, self.format(end)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_whole_hours() {
        assert_eq!(TzOffset::from_seconds(0).to_string(), "+0000");
        assert_eq!(TzOffset::from_seconds(3600).to_string(), "+0100");
        assert_eq!(TzOffset::from_seconds(7200).to_string(), "+0200");
        assert_eq!(TzOffset::from_seconds(-18000).to_string(), "-0500");
    }

    #[test]
    fn test_offset_fractional_hours() {
        assert_eq!(TzOffset::from_seconds(19800).to_string(), "+0530");
        assert_eq!(TzOffset::from_seconds(-19800).to_string(), "-0530");
        assert_eq!(TzOffset::from_seconds(20700).to_string(), "+0545");
        assert_eq!(TzOffset::from_seconds(-9000).to_string(), "-0230");
    }

    #[test]
    fn test_offset_rounds_to_quarter_hour() {
        // 1:07 rounds down, 1:08 rounds up
        assert_eq!(TzOffset::from_seconds(3600 + 7 * 60).to_string(), "+0100");
        assert_eq!(TzOffset::from_seconds(3600 + 8 * 60).to_string(), "+0115");
        assert_eq!(TzOffset::from_seconds(3600 + 59 * 60).to_string(), "+0200");
    }

    #[test]
    fn test_offset_at_datetime() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = zone.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(TzOffset::at(&now).minutes(), 120);
    }

    #[test]
    fn test_format_timestamp() {
        let formatter = TimeFormatter::new(TzOffset::from_seconds(3600));
        // 2023-11-14 22:13:20 UTC
        assert_eq!(
            formatter.format(1_700_000_000).unwrap(),
            "20231114231320 +0100"
        );
    }

    #[test]
    fn test_format_timestamp_negative_offset() {
        let formatter = TimeFormatter::new(TzOffset::from_seconds(-19800));
        assert_eq!(
            formatter.format(1_700_000_000).unwrap(),
            "20231114164320 -0530"
        );
    }

    #[test]
    fn test_format_span_adds_minutes() {
        let formatter = TimeFormatter::new(TzOffset::from_seconds(0));
        let (start, stop) = formatter.format_span(1_700_000_000, 90).unwrap();
        assert_eq!(start, "20231114221320 +0000");
        assert_eq!(stop, "20231114234320 +0000");
    }

    #[test]
    fn test_format_span_across_midnight() {
        let formatter = TimeFormatter::new(TzOffset::from_seconds(3600));
        // 2024-01-01 22:30:00 UTC
        let (start, stop) = formatter.format_span(1_704_148_200, 120).unwrap();
        assert_eq!(start, "20240101233000 +0100");
        assert_eq!(stop, "20240102013000 +0100");
    }

    #[test]
    fn test_same_offset_for_every_event() {
        let formatter = TimeFormatter::new(TzOffset::from_seconds(3600));
        // One timestamp in winter, one in summer
        let winter = formatter.format(1_704_067_200).unwrap();
        let summer = formatter.format(1_719_792_000).unwrap();
        assert!(winter.ends_with(" +0100"));
        assert!(summer.ends_with(" +0100"));
    }

    #[test]
    fn test_invalid_timestamp() {
        let formatter = TimeFormatter::new(TzOffset::from_seconds(0));
        let result = formatter.format(i64::MAX);
        assert!(matches!(result, Err(XmltvError::InvalidTimestamp(_))));

        let result = formatter.format_span(0, i64::MAX);
        assert!(matches!(result, Err(XmltvError::InvalidTimestamp(0))));
    }
}
