/*!
Calendar stepping primitives.

Days and weeks are fixed numbers of civil days, so they are delegated to
Jiff's date arithmetic. Months and years are not. Stepping from a day of the
month that does not exist in the target month (say, the 31st into April) is
clamped to the last day of the target month. That policy is implemented here
explicitly instead of relying on whatever overflow behavior a date library
happens to pick.

All functions return `None` when the result would fall outside of the range
of dates supported by Jiff.
*/

use jiff::{Span, civil::Date};

/// Adds the given number of days to `date`.
pub fn add_days(date: Date, days: i64) -> Option<Date> {
    let span = Span::new().try_days(days).ok()?;
    date.checked_add(span).ok()
}

/// Adds the given number of weeks to `date`.
pub fn add_weeks(date: Date, weeks: i64) -> Option<Date> {
    add_days(date, weeks.checked_mul(7)?)
}

/// Adds the given number of months to `date`, clamping the day.
///
/// When the day of `date` doesn't exist in the target month, the last day of
/// the target month is used instead. For example, adding one month to
/// `2025-01-31` gives `2025-02-28`.
pub fn add_months_clamped(date: Date, months: i64) -> Option<Date> {
    // Months counted from the start of year zero, which makes the year
    // arithmetic below a plain euclidean division.
    let base = i64::from(date.year()) * 12 + i64::from(date.month() - 1);
    let target = base.checked_add(months)?;
    let year = i16::try_from(target.div_euclid(12)).ok()?;
    let month = i8::try_from(target.rem_euclid(12) + 1).ok()?;
    let day = date.day().min(days_in_month(year, month)?);
    Date::new(year, month, day).ok()
}

/// Adds the given number of years to `date`, clamping the day.
///
/// The only day that can be clamped is February 29th, which becomes
/// February 28th in a year that is not a leap year.
pub fn add_years_clamped(date: Date, years: i64) -> Option<Date> {
    add_months_clamped(date, years.checked_mul(12)?)
}

/// Returns the number of days in the given month of the given year.
pub fn days_in_month(year: i16, month: i8) -> Option<i8> {
    Date::new(year, month, 1).ok().map(|first| first.days_in_month())
}
