//! Chart-ready structures handed to the presentation layer.
//!
//! Output only contains ordered collections so the same selection over the
//! same dataset always serializes to the same bytes.

use serde::Serialize;

use super::{
    DashboardConfig,
    aggregate::{PeriodAverages, PivotMatrix, TrendSelector, TrendSeries},
};
use crate::{
    geometry::GeometryIndex,
    shared::{Coordinate, Line},
};

pub const AVERAGE_VALUE_LABEL: &str = "Average Value";
pub const QUARTER_LABEL: &str = "Quarter";

/// A view, or the explicit "nothing to draw" marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "view", rename_all = "snake_case")]
pub enum View<T> {
    Empty,
    Ready(T),
}

impl<T> View<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, View::Empty)
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            View::Empty => None,
            View::Ready(view) => Some(view),
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            View::Empty => None,
            View::Ready(view) => Some(view),
        }
    }
}

impl<T> From<Option<T>> for View<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(View::Empty, View::Ready)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarView {
    pub title: String,
    pub category_label: String,
    pub value_label: String,
    pub categories: Vec<String>,
    /// `null` for periods without data.
    pub values: Vec<Option<f64>>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapView {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeriesView {
    pub line: String,
    pub color: String,
    pub quarters: Vec<String>,
    /// ISO dates of the first day of each quarter.
    pub quarter_starts: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<TrendSeriesView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub name: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLineView {
    pub line: String,
    pub color: String,
    pub route: Vec<Coordinate>,
    pub stations: Vec<MapMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub lines: Vec<MapLineView>,
}

pub fn bar_view(averages: &PeriodAverages, config: &DashboardConfig) -> BarView {
    BarView {
        title: format!(
            "Average Value for {} per {}",
            averages.station, averages.granularity
        ),
        category_label: averages.granularity.to_string(),
        value_label: AVERAGE_VALUE_LABEL.into(),
        categories: averages.points.iter().map(|(key, _)| key.label()).collect(),
        values: averages.points.iter().map(|(_, value)| *value).collect(),
        color: config.color_of(Some(averages.line)).to_string(),
    }
}

pub fn heatmap_view(matrix: PivotMatrix) -> HeatmapView {
    HeatmapView {
        title: matrix.title,
        x_label: matrix.x_label,
        y_label: matrix.y_label,
        rows: matrix.rows,
        columns: matrix.columns,
        cells: matrix.cells,
    }
}

pub fn trend_view(
    series: &[TrendSeries],
    selector: TrendSelector,
    config: &DashboardConfig,
) -> TrendView {
    let title = match selector {
        TrendSelector::All => "Quarterly Average Ridership per Line".to_string(),
        TrendSelector::Line(line) => format!("Quarterly Average Ridership for {line}"),
    };
    TrendView {
        title,
        x_label: QUARTER_LABEL.into(),
        y_label: AVERAGE_VALUE_LABEL.into(),
        series: series
            .iter()
            .map(|series| TrendSeriesView {
                line: series.line.to_string(),
                color: config.color_of(Some(series.line)).to_string(),
                quarters: series
                    .points
                    .iter()
                    .map(|point| point.quarter.to_string())
                    .collect(),
                quarter_starts: series
                    .points
                    .iter()
                    .map(|point| point.quarter.start_date().format("%Y-%m-%d").to_string())
                    .collect(),
                values: series.points.iter().map(|point| point.mean).collect(),
            })
            .collect(),
    }
}

pub fn map_view(geometry: &GeometryIndex, config: &DashboardConfig) -> MapView {
    let center = config
        .map_center
        .unwrap_or_else(|| geometry.all_stations().map(|point| point.coordinate).sum());
    MapView {
        center,
        zoom: config.map_zoom,
        lines: Line::ALL
            .into_iter()
            .map(|line| MapLineView {
                line: line.to_string(),
                color: config.color_of(Some(line)).to_string(),
                route: geometry.route_of(line).to_vec(),
                stations: geometry
                    .stations_of(line)
                    .iter()
                    .map(|point| MapMarker {
                        name: point.name.to_string(),
                        coordinate: point.coordinate,
                    })
                    .collect(),
            })
            .collect(),
    }
}
