use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Monday first, matching `chrono::Weekday::num_days_from_monday`.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// The time axis a bar or heatmap view is grouped by.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[default]
    Year,
    Month,
    Weekday,
}

impl Granularity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Granularity::Year => "Year",
            Granularity::Month => "Month",
            Granularity::Weekday => "Weekday",
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "year" => Ok(Granularity::Year),
            "month" => Ok(Granularity::Month),
            "weekday" => Ok(Granularity::Weekday),
            _ => Err(s.to_string()),
        }
    }
}

/// A calendar quarter, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: i32,
    /// 1 to 4.
    pub quarter: u8,
}

impl Quarter {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month0() / 3 + 1) as u8,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        let month = (self.quarter as u32 - 1) * 3 + 1;
        NaiveDate::from_ymd_opt(self.year, month, 1).unwrap_or_default()
    }
}

impl Display for Quarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}Q{}", self.year, self.quarter))
    }
}

/// A category on a granularity axis. Ordering is calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Year(i32),
    /// Zero based month.
    Month(u32),
    /// Zero based, Monday is 0.
    Weekday(u32),
}

impl PeriodKey {
    /// Every category of a granularity with a fixed calendar, or `None` for
    /// granularities whose categories depend on the data.
    pub fn full_axis(granularity: Granularity) -> Option<Vec<PeriodKey>> {
        match granularity {
            Granularity::Year => None,
            Granularity::Month => Some((0..12).map(PeriodKey::Month).collect()),
            Granularity::Weekday => Some((0..7).map(PeriodKey::Weekday).collect()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            PeriodKey::Year(year) => year.to_string(),
            PeriodKey::Month(month) => MONTH_NAMES[*month as usize].to_string(),
            PeriodKey::Weekday(day) => WEEKDAY_NAMES[*day as usize].to_string(),
        }
    }
}

/// Fields derived from a date once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i32,
    pub month_name: &'static str,
    pub weekday_name: &'static str,
    pub quarter: Quarter,
    month0: u32,
    weekday0: u32,
}

impl CalendarFields {
    pub fn from_date(date: NaiveDate) -> Self {
        let month0 = date.month0();
        let weekday0 = date.weekday().num_days_from_monday();
        Self {
            year: date.year(),
            month_name: MONTH_NAMES[month0 as usize],
            weekday_name: WEEKDAY_NAMES[weekday0 as usize],
            quarter: Quarter::of(date),
            month0,
            weekday0,
        }
    }

    pub fn period(&self, granularity: Granularity) -> PeriodKey {
        match granularity {
            Granularity::Year => PeriodKey::Year(self.year),
            Granularity::Month => PeriodKey::Month(self.month0),
            Granularity::Weekday => PeriodKey::Weekday(self.weekday0),
        }
    }

    pub fn weekday_index(&self) -> u32 {
        self.weekday0
    }
}

/// Field order for ambiguous numeric dates such as `03/04/2022`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateConvention {
    DayFirst,
    #[default]
    MonthFirst,
}

impl DateConvention {
    fn formats(&self) -> &'static [&'static str] {
        match self {
            DateConvention::DayFirst => &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"],
            DateConvention::MonthFirst => &["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"],
        }
    }
}

const ISO_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// Serials Excel can display: 1900-01-01 up to 9999-12-31.
const EXCEL_SERIALS: std::ops::RangeInclusive<u64> = 1..=2_958_465;

/// Parses a date cell. ISO dates are accepted under either convention, an
/// optional time part is dropped, and bare integers within Excel's range are spreadsheet serials.
pub fn parse_date(value: &str, convention: DateConvention) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(value);
    if date_part.is_empty() {
        return None;
    }

    if date_part.bytes().all(|b| b.is_ascii_digit()) {
        let serial: u64 = date_part.parse().ok()?;
        if !EXCEL_SERIALS.contains(&serial) {
            return None;
        }
        let (y, m, d) = EXCEL_EPOCH;
        return NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(serial));
    }

    ISO_FORMATS
        .iter()
        .chain(convention.formats())
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn convention_decides_ambiguous_dates() {
        assert_eq!(
            parse_date("03/04/2022", DateConvention::DayFirst),
            Some(ymd(2022, 4, 3))
        );
        assert_eq!(
            parse_date("03/04/2022", DateConvention::MonthFirst),
            Some(ymd(2022, 3, 4))
        );
    }

    #[test]
    fn iso_ignores_convention() {
        for convention in [DateConvention::DayFirst, DateConvention::MonthFirst] {
            assert_eq!(
                parse_date("2022-03-04 00:00:00", convention),
                Some(ymd(2022, 3, 4))
            );
        }
    }

    #[test]
    fn excel_serial() {
        assert_eq!(
            parse_date("44621", DateConvention::MonthFirst),
            Some(ymd(2022, 3, 1))
        );
    }

    #[test]
    fn excel_serial_range() {
        assert_eq!(
            parse_date("2958465", DateConvention::MonthFirst),
            Some(ymd(9999, 12, 31))
        );
        assert_eq!(parse_date("0", DateConvention::MonthFirst), None);
        assert_eq!(parse_date("2958466", DateConvention::MonthFirst), None);
        assert_eq!(parse_date("20220301", DateConvention::DayFirst), None);
    }

    #[test]
    fn invalid_dates() {
        assert_eq!(parse_date("", DateConvention::DayFirst), None);
        assert_eq!(parse_date("13/13/2022", DateConvention::DayFirst), None);
        assert_eq!(parse_date("yesterday", DateConvention::MonthFirst), None);
    }

    #[test]
    fn calendar_fields() {
        let fields = CalendarFields::from_date(ymd(2022, 3, 14));
        assert_eq!(fields.year, 2022);
        assert_eq!(fields.month_name, "March");
        assert_eq!(fields.weekday_name, "Monday");
        assert_eq!(fields.quarter, Quarter { year: 2022, quarter: 1 });
        assert_eq!(fields.quarter.start_date(), ymd(2022, 1, 1));
        assert_eq!(fields.quarter.to_string(), "2022Q1");
        assert_eq!(fields, CalendarFields::from_date(ymd(2022, 3, 14)));
    }
}
