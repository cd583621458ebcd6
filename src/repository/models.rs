use std::sync::Arc;

use chrono::NaiveDate;

use crate::shared::{CalendarFields, Line};

/// One canonical ridership observation.
#[derive(Debug, Clone, PartialEq)]
pub struct RidershipRecord {
    pub date: NaiveDate,
    pub line: Line,
    pub station: Arc<str>,
    /// Non-negative passenger count.
    pub value: f64,
    /// Derived from `date` on construction.
    pub calendar: CalendarFields,
}

impl RidershipRecord {
    pub fn new(date: NaiveDate, line: Line, station: Arc<str>, value: f64) -> Self {
        Self {
            date,
            line,
            station,
            value,
            calendar: CalendarFields::from_date(date),
        }
    }
}

/// One observation of the sub-daily table.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub station: Arc<str>,
    /// Time-of-day label as written in the source (e.g. "05:00-06:00").
    pub time_bucket: Arc<str>,
    pub value: f64,
    /// Zero based, Monday is 0.
    pub weekday: u32,
}

impl HourlyRecord {
    pub fn new(date: NaiveDate, station: Arc<str>, time_bucket: Arc<str>, value: f64) -> Self {
        Self {
            date,
            station,
            time_bucket,
            value,
            weekday: CalendarFields::from_date(date).weekday_index(),
        }
    }
}
