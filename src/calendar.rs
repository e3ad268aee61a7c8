use chrono::{Duration, NaiveDate};

pub const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDate {
    pub month: String,
    pub years_elapsed: u64,
}

/// Turns a count of simulated days into the month it falls in and the number of
/// whole years elapsed. Every year is 365 days long; the month is looked up in
/// `starting_year`'s calendar.
pub fn day_month(day_number: f64, starting_year: i32) -> Option<CalendarDate> {
    let day_number = if day_number.is_finite() {
        day_number.max(0.0)
    } else {
        0.0
    };
    let years_elapsed = (day_number / DAYS_PER_YEAR).floor() as u64;
    let remaining_days = day_number % DAYS_PER_YEAR;

    let start_date = NaiveDate::from_ymd_opt(starting_year, 1, 1)?;
    let target_date = start_date.checked_add_signed(Duration::days(remaining_days as i64))?;

    Some(CalendarDate {
        month: target_date.format("%B").to_string(),
        years_elapsed,
    })
}
