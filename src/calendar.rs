//! Monthly billing calendar.

use std::{
    fmt::{Display, Formatter},
    iter,
};

use chrono::{Datelike, Local, Months, NaiveDate, TimeDelta, TimeZone};
use itertools::Itertools;

use crate::{billing::BillingRecord, prelude::*, quantity::cost::Cost};

/// Displayed calendar month.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Month {
    first_day: NaiveDate,
}

impl Month {
    /// Build a month from the year and the zero-based month index.
    pub fn try_new(year: i32, month0: u32) -> Result<Self> {
        ensure!(month0 <= 11, "month index must be within 0..=11, got {month0}");
        let first_day = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
            .with_context(|| format!("month {year}-{:02} is out of range", month0 + 1))?;
        Ok(Self { first_day })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self { first_day: date - TimeDelta::days(i64::from(date.day0())) }
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.first_day
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.first_day.year()
    }

    #[must_use]
    pub fn month0(self) -> u32 {
        self.first_day.month0()
    }

    /// Following month, staying put at the end of the supported date range.
    pub fn next(self) -> Self {
        self.first_day.checked_add_months(Months::new(1)).map_or(self, Self::containing)
    }

    /// Preceding month, staying put at the start of the supported date range.
    pub fn previous(self) -> Self {
        self.first_day.checked_sub_months(Months::new(1)).map_or(self, Self::containing)
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let month = self.first_day.month();
        self.first_day.iter_days().take_while(move |date| date.month() == month)
    }

    #[must_use]
    pub fn n_days(self) -> usize {
        self.days().count()
    }

    /// Number of placeholder cells before the 1st, with weeks starting on Sunday.
    #[must_use]
    pub fn n_leading_blanks(self) -> usize {
        self.first_day.weekday().num_days_from_sunday() as usize
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.first_day.format("%B %Y"))
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CalendarCell {
    /// Aligns the 1st under its weekday column.
    Blank,

    Day(DayCell),
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,

    /// Number of billing records that ended on this day.
    pub n_readings: usize,

    pub total: Cost,
}

impl DayCell {
    #[must_use]
    pub const fn has_reading(&self) -> bool {
        self.n_readings != 0
    }

    pub fn marker(&self) -> DayMarker {
        if !self.has_reading() {
            DayMarker::Empty
        } else if self.total > Cost::ZERO {
            DayMarker::Amount(self.total.whole())
        } else {
            DayMarker::Checkmark
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DayMarker {
    Empty,

    /// A reading was taken but nothing was charged.
    Checkmark,

    /// Charged amount, rounded to whole rupees.
    Amount(Cost),
}

/// Lay out the month and sum the billing records per local calendar day.
///
/// A record belongs to the day its end timestamp falls on in `time_zone`.
pub fn aggregate<Tz: TimeZone>(
    month: Month,
    records: &[BillingRecord],
    time_zone: &Tz,
) -> Vec<CalendarCell> {
    let mut by_date =
        records.iter().into_group_map_by(|record| record.to.with_timezone(time_zone).date_naive());
    let mut cells = Vec::with_capacity(month.n_leading_blanks() + month.n_days());
    cells.extend(iter::repeat_n(CalendarCell::Blank, month.n_leading_blanks()));
    cells.extend(month.days().map(|date| {
        let records = by_date.remove(&date).unwrap_or_default();
        CalendarCell::Day(DayCell {
            date,
            n_readings: records.len(),
            total: records.iter().map(|record| record.amount).sum(),
        })
    }));
    cells
}

pub fn aggregate_local(month: Month, records: &[BillingRecord]) -> Vec<CalendarCell> {
    aggregate(month, records, &Local)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, Utc};

    use super::*;

    fn record(to: DateTime<Utc>, amount: f64) -> BillingRecord {
        BillingRecord { to, amount: Cost(amount), ..BillingRecord::default() }
    }

    fn day(cells: &[CalendarCell], month: Month, day: usize) -> DayCell {
        match cells[month.n_leading_blanks() + day - 1] {
            CalendarCell::Day(cell) => cell,
            CalendarCell::Blank => panic!("day {day} is blank"),
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_month_try_new() -> Result {
        let month = Month::try_new(2026, 9)?;
        assert_eq!(month.first_day(), NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        assert_eq!(month.to_string(), "October 2026");
        assert!(Month::try_new(2026, 12).is_err());
        Ok(())
    }

    #[test]
    fn test_navigation_wraps_year() -> Result {
        let december = Month::try_new(2025, 11)?;
        assert_eq!(december.next(), Month::try_new(2026, 0)?);
        assert_eq!(december.next().previous(), december);
        assert_eq!(Month::try_new(2026, 0)?.previous(), december);
        Ok(())
    }

    #[test]
    fn test_containing() {
        let month = Month::containing(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month0(), 1);
        assert_eq!(month.n_days(), 29);
    }

    #[test]
    fn test_layout_matches_weekdays() -> Result {
        for year in 2020..=2030 {
            for month0 in 0..12 {
                let month = Month::try_new(year, month0)?;
                let cells = aggregate(month, &[], &utc());
                let n_blanks = cells.iter().take_while(|cell| **cell == CalendarCell::Blank).count();
                let n_days = cells.len() - n_blanks;
                assert_eq!(
                    n_blanks,
                    month.first_day().weekday().num_days_from_sunday() as usize,
                );
                assert_eq!(n_days, month.n_days());
            }
        }
        Ok(())
    }

    #[test]
    fn test_known_layouts() -> Result {
        // Thursday, 31 days.
        let october = Month::try_new(2026, 9)?;
        assert_eq!((october.n_leading_blanks(), october.n_days()), (4, 31));

        // Sunday, non-leap.
        let february = Month::try_new(2026, 1)?;
        assert_eq!((february.n_leading_blanks(), february.n_days()), (0, 28));

        // Thursday, leap.
        let february = Month::try_new(2024, 1)?;
        assert_eq!((february.n_leading_blanks(), february.n_days()), (4, 29));
        Ok(())
    }

    #[test]
    fn test_days_in_order() -> Result {
        let month = Month::try_new(2026, 9)?;
        let cells = aggregate(month, &[], &utc());
        let days = cells
            .iter()
            .filter_map(|cell| match cell {
                CalendarCell::Day(cell) => Some(cell.date.day()),
                CalendarCell::Blank => None,
            })
            .collect_vec();
        assert_eq!(days, (1..=31).collect_vec());
        Ok(())
    }

    #[test]
    fn test_same_day_records_are_summed() -> Result {
        let month = Month::try_new(2026, 9)?;
        let records = [
            record(Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(), 50.0),
            record(Utc.with_ymd_and_hms(2026, 10, 19, 21, 30, 0).unwrap(), 70.0),
            record(Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap(), 5.0),
        ];
        let cells = aggregate(month, &records, &utc());

        let cell = day(&cells, month, 19);
        assert!(cell.has_reading());
        assert_eq!(cell.n_readings, 2);
        assert_eq!(cell.total, Cost(120.0));
        assert_eq!(cell.marker(), DayMarker::Amount(Cost(120.0)));

        assert_eq!(day(&cells, month, 20).total, Cost(5.0));
        assert!(!day(&cells, month, 18).has_reading());
        assert_eq!(day(&cells, month, 18).marker(), DayMarker::Empty);
        Ok(())
    }

    #[test]
    fn test_zero_amount_still_has_reading() -> Result {
        let month = Month::try_new(2026, 9)?;
        let records = [record(Utc.with_ymd_and_hms(2026, 10, 3, 12, 0, 0).unwrap(), 0.0)];
        let cell = day(&aggregate(month, &records, &utc()), month, 3);
        assert!(cell.has_reading());
        assert_eq!(cell.total, Cost::ZERO);
        assert_eq!(cell.marker(), DayMarker::Checkmark);
        Ok(())
    }

    #[test]
    fn test_amount_marker_is_rounded() -> Result {
        let month = Month::try_new(2026, 9)?;
        let records = [record(Utc.with_ymd_and_hms(2026, 10, 3, 12, 0, 0).unwrap(), 112.5)];
        let cell = day(&aggregate(month, &records, &utc()), month, 3);
        assert_eq!(cell.total, Cost(112.5));
        assert_eq!(cell.marker(), DayMarker::Amount(Cost(113.0)));
        Ok(())
    }

    #[test]
    fn test_records_outside_the_month_are_ignored() -> Result {
        let month = Month::try_new(2026, 9)?;
        let records = [
            record(Utc.with_ymd_and_hms(2026, 9, 30, 12, 0, 0).unwrap(), 10.0),
            record(Utc.with_ymd_and_hms(2025, 10, 19, 12, 0, 0).unwrap(), 10.0),
        ];
        let cells = aggregate(month, &records, &utc());
        assert!(cells.iter().all(|cell| match cell {
            CalendarCell::Day(cell) => !cell.has_reading(),
            CalendarCell::Blank => true,
        }));
        Ok(())
    }

    #[test]
    fn test_local_date_near_midnight() -> Result {
        let month = Month::try_new(2026, 9)?;
        let records = [record(Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap(), 42.0)];

        // 01:30 on the next day in India.
        let india = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let cells = aggregate(month, &records, &india);
        assert!(!day(&cells, month, 19).has_reading());
        assert!(day(&cells, month, 20).has_reading());

        // 15:00 on the same day in New York.
        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        let cells = aggregate(month, &records, &new_york);
        assert!(day(&cells, month, 19).has_reading());
        assert!(!day(&cells, month, 20).has_reading());
        Ok(())
    }

    #[test]
    fn test_month_boundary_follows_time_zone() -> Result {
        // 23:00 UTC on the last day of September is already October in India.
        let records = [record(Utc.with_ymd_and_hms(2026, 9, 30, 23, 0, 0).unwrap(), 9.0)];
        let india = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let october = Month::try_new(2026, 9)?;
        assert!(day(&aggregate(october, &records, &india), october, 1).has_reading());
        let september = october.previous();
        assert!(!day(&aggregate(september, &records, &india), september, 30).has_reading());
        assert!(day(&aggregate(september, &records, &utc()), september, 30).has_reading());
        Ok(())
    }

    #[test]
    fn test_idempotent() -> Result {
        let month = Month::try_new(2026, 9)?;
        let records = [
            record(Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap(), 0.0),
            record(Utc.with_ymd_and_hms(2026, 10, 2, 12, 0, 0).unwrap(), 30.0),
        ];
        assert_eq!(aggregate(month, &records, &utc()), aggregate(month, &records, &utc()));
        Ok(())
    }
}
