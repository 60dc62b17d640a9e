//! Relative date-window helpers for expense queries.
//!
//! A [TimeWindow] is a symbolic trailing range (`week`, `month`, `3months`,
//! `year`) that is resolved against "today" at request time.

use std::str::FromStr;

use time::{Date, Duration, Month};

/// A named trailing range of dates ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// The trailing 7 days.
    Week,
    /// The trailing calendar month.
    Month,
    /// The trailing three calendar months.
    ThreeMonths,
    /// The trailing calendar year.
    Year,
}

impl TimeWindow {
    /// The token used for this window in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::ThreeMonths => "3months",
            Self::Year => "year",
        }
    }

    /// Resolve the window against `today`.
    ///
    /// The returned range is inclusive on both ends with `end = today`.
    /// Calendar arithmetic clamps to the last valid day of the target month,
    /// e.g. Mar 31 minus one month is Feb 28 (or Feb 29 in a leap year).
    pub fn resolve(self, today: Date) -> DateWindow {
        let start = match self {
            Self::Week => today - Duration::days(7),
            Self::Month => months_back(today, 1),
            Self::ThreeMonths => months_back(today, 3),
            Self::Year => years_back(today, 1),
        };

        DateWindow { start, end: today }
    }
}

impl FromStr for TimeWindow {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "3months" => Ok(Self::ThreeMonths),
            "year" => Ok(Self::Year),
            _ => Err(UnknownWindow(s.to_owned())),
        }
    }
}

/// The string did not name a time window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid filter, expected one of week, month, 3months, year")]
pub struct UnknownWindow(pub String);

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// The first date in the window.
    pub start: Date,
    /// The last date in the window.
    pub end: Date,
}

/// The date `months` calendar months before `date`.
///
/// The day of month is kept where possible and otherwise clamped to the last
/// valid day of the target month.
fn months_back(date: Date, months: u32) -> Date {
    let mut year = date.year();
    let mut month_number = month_number(date.month());

    for _ in 0..months {
        if month_number == 1 {
            month_number = 12;
            year -= 1;
        } else {
            month_number -= 1;
        }
    }

    let month = month_from_number(month_number);
    let day = date.day().min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).expect("clamped day is always valid")
}

/// The date `years` calendar years before `date`, clamping Feb 29.
fn years_back(date: Date, years: i32) -> Date {
    let year = date.year() - years;
    let day = date.day().min(last_day_of_month(year, date.month()));

    Date::from_calendar_date(year, date.month(), day).expect("clamped day is always valid")
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn month_number(month: Month) -> u8 {
    match month {
        Month::January => 1,
        Month::February => 2,
        Month::March => 3,
        Month::April => 4,
        Month::May => 5,
        Month::June => 6,
        Month::July => 7,
        Month::August => 8,
        Month::September => 9,
        Month::October => 10,
        Month::November => 11,
        Month::December => 12,
    }
}

fn month_from_number(month: u8) -> Month {
    match month {
        1 => Month::January,
        2 => Month::February,
        3 => Month::March,
        4 => Month::April,
        5 => Month::May,
        6 => Month::June,
        7 => Month::July,
        8 => Month::August,
        9 => Month::September,
        10 => Month::October,
        11 => Month::November,
        12 => Month::December,
        _ => panic!("invalid month number {month}"),
    }
}
