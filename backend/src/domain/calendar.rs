//! Local calendar deciding which day counts as "today".
//!
//! Memberships end on calendar days and members mark attendance for the
//! current day, so both follow the mess's wall clock rather than UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Seconds in one minute, for offset conversion.
const SECONDS_PER_MINUTE: i32 = 60;

/// Fixed UTC offset of the messes served by this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalCalendar {
    offset: FixedOffset,
}

impl LocalCalendar {
    /// Calendar east of UTC by `minutes`; `None` outside ±24 hours.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use mess_backend::domain::LocalCalendar;
    ///
    /// let ist = LocalCalendar::from_offset_minutes(330).expect("valid offset");
    /// let late_evening_utc = Utc.with_ymd_and_hms(2025, 3, 9, 20, 0, 0).unwrap();
    /// assert_eq!(
    ///     ist.today(late_evening_utc),
    ///     NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    /// );
    /// ```
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        let seconds = minutes.checked_mul(SECONDS_PER_MINUTE)?;
        FixedOffset::east_opt(seconds).map(|offset| Self { offset })
    }

    /// Offset east of UTC in minutes.
    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / SECONDS_PER_MINUTE
    }

    /// Calendar day at `now` on the local wall clock.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }
}

impl Default for LocalCalendar {
    fn default() -> Self {
        Self { offset: Utc.fix() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[rstest]
    #[case(0, date(2025, 3, 9))]
    #[case(330, date(2025, 3, 10))]
    #[case(-300, date(2025, 3, 9))]
    fn day_follows_offset(#[case] minutes: i32, #[case] expected: NaiveDate) {
        let calendar = LocalCalendar::from_offset_minutes(minutes).expect("offset");
        let now = Utc
            .with_ymd_and_hms(2025, 3, 9, 20, 0, 0)
            .single()
            .expect("instant");
        assert_eq!(calendar.today(now), expected);
    }

    #[rstest]
    #[case(24 * 60)]
    #[case(-24 * 60)]
    #[case(i32::MAX)]
    fn rejects_offsets_of_a_day_or_more(#[case] minutes: i32) {
        assert!(LocalCalendar::from_offset_minutes(minutes).is_none());
    }

    #[rstest]
    fn default_is_utc() {
        assert_eq!(LocalCalendar::default().offset_minutes(), 0);
    }
}
