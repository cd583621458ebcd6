//! Pure aggregations over the canonical dataset.
//!
//! Every function returns `None` or an empty list when nothing matches; an
//! unknown station or a station on another line is not an error. Sums are
//! taken sequentially in load order so repeated calls give identical floats.

use std::{collections::BTreeMap, str::FromStr, sync::Arc};

use rayon::prelude::*;

use crate::{
    repository::Dataset,
    shared::{Granularity, Line, PeriodKey, Quarter, WEEKDAY_ABBREVIATIONS, WEEKDAY_NAMES},
};

pub const DAY_OF_WEEK_LABEL: &str = "Day of the Week";
pub const TIME_LABEL: &str = "Time";

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Mean value per period for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodAverages {
    pub station: Arc<str>,
    /// Line of the station's first record.
    pub line: Line,
    pub granularity: Granularity,
    /// In calendar order. `None` marks a period without data.
    pub points: Vec<(PeriodKey, Option<f64>)>,
}

/// Averages a station's records per period. Month and weekday axes are
/// always complete; the year axis holds the years present.
pub fn period_averages(
    dataset: &Dataset,
    station: &str,
    granularity: Granularity,
) -> Option<PeriodAverages> {
    let mut records = dataset.records_by_station(station).peekable();
    let first = records.peek()?;
    let line = first.line;
    let station = first.station.clone();

    let mut groups: BTreeMap<PeriodKey, Mean> = BTreeMap::new();
    records.for_each(|record| {
        groups
            .entry(record.calendar.period(granularity))
            .or_default()
            .add(record.value)
    });

    let points = match PeriodKey::full_axis(granularity) {
        Some(axis) => axis
            .into_iter()
            .map(|key| (key, groups.get(&key).map(Mean::value)))
            .collect(),
        None => groups
            .into_iter()
            .map(|(key, mean)| (key, Some(mean.value())))
            .collect(),
    };

    Some(PeriodAverages {
        station,
        line,
        granularity,
        points,
    })
}

/// Summed values over (row, column) categories plus the labels to draw them with.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotMatrix {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `cells[row][column]`, `None` where no record matched.
    pub cells: Vec<Vec<Option<f64>>>,
}

type WeekRow = [Option<f64>; 7];

fn add_to_cell(row: &mut WeekRow, weekday: u32, value: f64) {
    let cell = &mut row[weekday as usize];
    *cell = Some(cell.unwrap_or(0.0) + value);
}

/// Period by weekday sums of a station on a line. Weekdays cannot be a row
/// axis, so a weekday granularity is drawn per year.
pub fn weekday_pivot(
    dataset: &Dataset,
    line: Line,
    station: &str,
    granularity: Granularity,
) -> Option<PivotMatrix> {
    let row_granularity = match granularity {
        Granularity::Weekday => Granularity::Year,
        granularity => granularity,
    };

    let mut sums: BTreeMap<PeriodKey, WeekRow> = BTreeMap::new();
    dataset
        .records_by_station(station)
        .filter(|record| record.line == line)
        .for_each(|record| {
            let row = sums
                .entry(record.calendar.period(row_granularity))
                .or_insert([None; 7]);
            add_to_cell(row, record.calendar.weekday_index(), record.value);
        });
    if sums.is_empty() {
        return None;
    }

    Some(PivotMatrix {
        title: format!("Heatmap for {station}"),
        x_label: DAY_OF_WEEK_LABEL.into(),
        y_label: row_granularity.to_string(),
        rows: sums.keys().map(PeriodKey::label).collect(),
        columns: WEEKDAY_NAMES.iter().map(|day| day.to_string()).collect(),
        cells: sums.into_values().map(Vec::from).collect(),
    })
}

/// Sorts "5:00", "05:00-06:00" and "5 PM" by hour of day, then by text.
/// Only the first time of a range decides, including its AM/PM marker.
fn bucket_order(bucket: &str) -> (u32, String) {
    let trimmed = bucket.trim();
    let start = trimmed
        .split(['-', '–'])
        .next()
        .unwrap_or(trimmed)
        .trim()
        .to_uppercase();
    let hour = start
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .and_then(|digits| digits.parse::<u32>().ok());
    let hour = match hour {
        Some(12) if start.ends_with("AM") => 0,
        Some(hour) if hour < 12 && start.ends_with("PM") => hour + 12,
        Some(hour) => hour,
        None => u32::MAX,
    };
    (hour, trimmed.to_string())
}

/// Time bucket by weekday sums of a station from the sub-daily table.
pub fn hourly_pivot(dataset: &Dataset, station: &str) -> Option<PivotMatrix> {
    let mut sums: BTreeMap<(u32, String), WeekRow> = BTreeMap::new();
    dataset.hourly_by_station(station).for_each(|record| {
        let row = sums
            .entry(bucket_order(&record.time_bucket))
            .or_insert([None; 7]);
        add_to_cell(row, record.weekday, record.value);
    });
    if sums.is_empty() {
        return None;
    }

    Some(PivotMatrix {
        title: format!("Hourly Heatmap for {station}"),
        x_label: DAY_OF_WEEK_LABEL.into(),
        y_label: TIME_LABEL.into(),
        rows: sums.keys().map(|(_, bucket)| bucket.clone()).collect(),
        columns: WEEKDAY_ABBREVIATIONS.iter().map(|day| day.to_string()).collect(),
        cells: sums.into_values().map(Vec::from).collect(),
    })
}

/// Which lines a trend is drawn for. `All` shows every line side by side;
/// it never averages across lines.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TrendSelector {
    #[default]
    All,
    Line(Line),
}

impl TrendSelector {
    pub fn lines(&self) -> Vec<Line> {
        match self {
            TrendSelector::All => Line::ALL.to_vec(),
            TrendSelector::Line(line) => vec![*line],
        }
    }
}

impl FromStr for TrendSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(TrendSelector::All)
        } else {
            s.parse().map(TrendSelector::Line)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuarterPoint {
    pub quarter: Quarter,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub line: Line,
    /// Chronological.
    pub points: Vec<QuarterPoint>,
}

/// Mean value per quarter for each selected line, over every station.
/// Lines without records are left out.
pub fn quarterly_trend(dataset: &Dataset, selector: TrendSelector) -> Vec<TrendSeries> {
    selector
        .lines()
        .into_par_iter()
        .map(|line| line_trend(dataset, line))
        .filter(|series| !series.points.is_empty())
        .collect()
}

fn line_trend(dataset: &Dataset, line: Line) -> TrendSeries {
    let mut groups: BTreeMap<Quarter, Mean> = BTreeMap::new();
    dataset.records_by_line(line).for_each(|record| {
        groups
            .entry(record.calendar.quarter)
            .or_default()
            .add(record.value)
    });
    TrendSeries {
        line,
        points: groups
            .into_iter()
            .map(|(quarter, mean)| QuarterPoint {
                quarter,
                mean: mean.value(),
            })
            .collect(),
    }
}
