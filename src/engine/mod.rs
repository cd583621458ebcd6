use std::sync::Arc;

use tracing::debug;

pub mod aggregate;
mod config;
mod selection;
pub mod view;
pub use aggregate::{PeriodAverages, PivotMatrix, TrendSelector, TrendSeries};
pub use config::*;
pub use selection::*;
pub use view::*;

use crate::{
    geometry::{GeometryIndex, StationPoint},
    repository::Dataset,
    shared::Line,
    source::{self, SourceReader},
};

/// The query interface of the dashboard. Cheap to clone and safe to share
/// between threads: nothing behind it changes after load.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    dataset: Arc<Dataset>,
    geometry: Arc<GeometryIndex>,
    config: Arc<DashboardConfig>,
}

impl Engine {
    pub fn new(dataset: Dataset, geometry: GeometryIndex, config: DashboardConfig) -> Self {
        Self {
            dataset: dataset.into(),
            geometry: geometry.into(),
            config: config.into(),
        }
    }

    /// Loads tables and geometry named in the reader's config.
    pub fn load(reader: &SourceReader, config: DashboardConfig) -> Result<Self, source::Error> {
        let geometry = GeometryIndex::from_reader(reader)?;
        let dataset = Dataset::load(reader)?;
        Ok(Self::new(dataset, geometry, config))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn geometry(&self) -> &GeometryIndex {
        &self.geometry
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn lines(&self) -> &'static [Line] {
        &Line::ALL
    }

    /// A fresh selection on the configured default line and granularity.
    pub fn selection_state(&self) -> SelectionState {
        SelectionState::new(
            self.geometry.clone(),
            self.config.default_line,
            self.config.default_granularity,
        )
    }

    /// Stations of a line in geometry order. Never empty: a line without
    /// stations fails at load.
    pub fn get_stations(&self, line: Line) -> &[StationPoint] {
        self.geometry.stations_of(line)
    }

    pub fn get_bar_view(&self, selection: &Selection) -> View<BarView> {
        let Some(station) = selection.station.as_deref() else {
            return View::Empty;
        };
        let averages = aggregate::period_averages(&self.dataset, station, selection.granularity);
        if averages.is_none() {
            debug!("No records for station {station}");
        }
        averages
            .map(|averages| view::bar_view(&averages, &self.config))
            .into()
    }

    /// Draws from the sub-daily table when the selected line is the
    /// configured hourly line, from the daily records otherwise.
    pub fn get_heatmap_view(&self, selection: &Selection) -> View<HeatmapView> {
        if !self.config.heatmap_enabled {
            return View::Empty;
        }
        let Some(station) = selection.station.as_deref() else {
            return View::Empty;
        };
        let matrix = if self.config.hourly_line == Some(selection.line) {
            aggregate::hourly_pivot(&self.dataset, station)
        } else {
            aggregate::weekday_pivot(
                &self.dataset,
                selection.line,
                station,
                selection.granularity,
            )
        };
        matrix.map(view::heatmap_view).into()
    }

    pub fn get_trend_view(&self, selector: TrendSelector) -> View<TrendView> {
        if !self.config.trend_enabled {
            return View::Empty;
        }
        let series = aggregate::quarterly_trend(&self.dataset, selector);
        if series.is_empty() {
            return View::Empty;
        }
        View::Ready(view::trend_view(&series, selector, &self.config))
    }

    pub fn get_map_view(&self) -> MapView {
        view::map_view(&self.geometry, &self.config)
    }
}
