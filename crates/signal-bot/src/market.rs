//! Market clock gate
//!
//! Standard forex pairs are only queried during presumed trading hours,
//! evaluated in Moscow civil time. OTC pairs trade around the clock and never
//! consult this gate.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Europe::Moscow;

/// Nightly closure starts at 22:45 and runs until 02:00
const NIGHT_CLOSE_HOUR: u32 = 22;
const NIGHT_CLOSE_MINUTE: u32 = 45;
const NIGHT_REOPEN_HOUR: u32 = 2;

/// Source of the current time
pub trait MarketClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl MarketClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl MarketClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Whether standard-instrument data is unavailable at `now`.
///
/// Closed all of Saturday and Sunday, and every night from 22:45 up to but
/// not including 02:00, regardless of weekday.
pub fn is_market_closed<Tz: TimeZone>(now: &DateTime<Tz>) -> bool {
    let local = now.with_timezone(&Moscow);

    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return true;
    }

    let (hour, minute) = (local.hour(), local.minute());
    (hour == NIGHT_CLOSE_HOUR && minute >= NIGHT_CLOSE_MINUTE) || hour < NIGHT_REOPEN_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    /// Build an instant from Moscow wall-clock components
    fn msk(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .unwrap()
    }

    // 2024-06-04 is a Tuesday
    #[test]
    fn test_weekday_trading_hours_open() {
        assert!(!is_market_closed(&msk(2024, 6, 4, 10, 0)));
        assert!(!is_market_closed(&msk(2024, 6, 4, 22, 44)));
        assert!(!is_market_closed(&msk(2024, 6, 5, 2, 0)));
    }

    #[test]
    fn test_nightly_window_closed() {
        assert!(is_market_closed(&msk(2024, 6, 4, 22, 45)));
        assert!(is_market_closed(&msk(2024, 6, 4, 23, 0)));
        assert!(is_market_closed(&msk(2024, 6, 5, 0, 0)));
        assert!(is_market_closed(&msk(2024, 6, 5, 1, 30)));
        assert!(is_market_closed(&msk(2024, 6, 5, 1, 59)));
    }

    #[test]
    fn test_weekend_closed_all_day() {
        // 2024-06-08 Saturday, 2024-06-09 Sunday
        assert!(is_market_closed(&msk(2024, 6, 8, 10, 0)));
        assert!(is_market_closed(&msk(2024, 6, 8, 15, 30)));
        assert!(is_market_closed(&msk(2024, 6, 9, 12, 0)));
        assert!(is_market_closed(&msk(2024, 6, 9, 23, 59)));
    }

    #[test]
    fn test_friday_night_uses_nightly_window() {
        // 2024-06-07 Friday
        assert!(!is_market_closed(&msk(2024, 6, 7, 22, 30)));
        assert!(is_market_closed(&msk(2024, 6, 7, 23, 0)));
    }

    #[test]
    fn test_evaluated_in_moscow_time_not_input_zone() {
        // Tuesday 19:50 UTC is 22:50 in Moscow
        let utc = Utc.with_ymd_and_hms(2024, 6, 4, 19, 50, 0).unwrap();
        assert!(is_market_closed(&utc));

        // Friday 22:00 UTC is already Saturday in Moscow
        let utc = Utc.with_ymd_and_hms(2024, 6, 7, 22, 0, 0).unwrap();
        assert!(is_market_closed(&utc));

        // Monday 23:30 UTC is Tuesday 02:30 in Moscow
        let utc = Utc.with_ymd_and_hms(2024, 6, 3, 23, 30, 0).unwrap();
        assert!(!is_market_closed(&utc));
    }

    #[test]
    fn test_uses_historical_moscow_offset() {
        // Moscow was UTC+4 from 2011 to 2014: 18:50 UTC on a Tuesday is 22:50
        let utc = Utc.with_ymd_and_hms(2013, 1, 15, 18, 50, 0).unwrap();
        assert!(is_market_closed(&utc));

        // and 22:00 UTC that night is 02:00 Wednesday, open again
        let utc = Utc.with_ymd_and_hms(2013, 1, 15, 22, 0, 0).unwrap();
        assert!(!is_market_closed(&utc));

        // summer time before 2011: Tuesday 18:50 UTC in July 2010 is 22:50 MSD
        let utc = Utc.with_ymd_and_hms(2010, 7, 13, 18, 50, 0).unwrap();
        assert!(is_market_closed(&utc));
    }

    #[test]
    fn test_fixed_clock() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 4, 7, 0, 0).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert!(!is_market_closed(&clock.now()));
    }
}
