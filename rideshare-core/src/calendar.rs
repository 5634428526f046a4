//! Calendar-month arithmetic used by the date listing queries and the seed
//! data.

use chrono::{Datelike, Days, Months, NaiveDate};

/// The inclusive span of days making up one calendar month.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rideshare_core::MonthRange;
///
/// let reference = NaiveDate::from_ymd_opt(2024, 2, 14).expect("valid date");
/// let month = MonthRange::containing(reference);
/// assert_eq!(month.first(), NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date"));
/// assert_eq!(month.last(), NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthRange {
    first: NaiveDate,
    last: NaiveDate,
}

impl MonthRange {
    /// The month that contains `reference`.
    #[must_use]
    pub fn containing(reference: NaiveDate) -> Self {
        let first = reference - Days::new(u64::from(reference.day0()));
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { first, last }
    }

    /// First day of the month.
    #[must_use]
    pub const fn first(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the month.
    #[must_use]
    pub const fn last(&self) -> NaiveDate {
        self.last
    }

    /// Whether `date` falls inside the month, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.first..=self.last).contains(&date)
    }

    /// The month immediately after this one, if representable.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        self.last.succ_opt().map(Self::containing)
    }

    /// The given day of this month, if the month has that many days.
    #[must_use]
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[rstest]
    #[case(date(2025, 1, 1), date(2025, 1, 1), date(2025, 1, 31))]
    #[case(date(2025, 1, 31), date(2025, 1, 1), date(2025, 1, 31))]
    #[case(date(2023, 2, 10), date(2023, 2, 1), date(2023, 2, 28))]
    #[case(date(2024, 2, 10), date(2024, 2, 1), date(2024, 2, 29))]
    #[case(date(2025, 4, 30), date(2025, 4, 1), date(2025, 4, 30))]
    #[case(date(2025, 12, 15), date(2025, 12, 1), date(2025, 12, 31))]
    fn month_bounds_are_inclusive(
        #[case] reference: NaiveDate,
        #[case] first: NaiveDate,
        #[case] last: NaiveDate,
    ) {
        let month = MonthRange::containing(reference);
        assert_eq!(month.first(), first);
        assert_eq!(month.last(), last);
        assert!(month.contains(first));
        assert!(month.contains(last));
    }

    #[rstest]
    fn excludes_neighbouring_months() {
        let month = MonthRange::containing(date(2025, 6, 15));
        assert!(!month.contains(date(2025, 5, 31)));
        assert!(!month.contains(date(2025, 7, 1)));
    }

    #[rstest]
    fn next_rolls_over_the_year() {
        let december = MonthRange::containing(date(2025, 12, 3));
        let january = december.next().expect("next month");
        assert_eq!(january.first(), date(2026, 1, 1));
        assert_eq!(january.last(), date(2026, 1, 31));
    }

    #[rstest]
    fn day_rejects_days_past_the_month_end() {
        let february = MonthRange::containing(date(2025, 2, 1));
        assert_eq!(february.day(28), Some(date(2025, 2, 28)));
        assert_eq!(february.day(30), None);
    }
}
