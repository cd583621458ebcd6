use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::{
    geometry::{GeometryIndex, StationPoint},
    shared::{Granularity, Line},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown line: {0}")]
pub struct UnknownLineError(pub String);

/// The (line, station, granularity) triple a view is computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub line: Line,
    pub station: Option<Arc<str>>,
    pub granularity: Granularity,
}

impl Selection {
    pub fn new(line: Line, station: Option<&str>, granularity: Granularity) -> Self {
        Self {
            line,
            station: station.map(Into::into),
            granularity,
        }
    }
}

/// Keeps a selection consistent with the stations of its line.
#[derive(Debug, Clone)]
pub struct SelectionState {
    geometry: Arc<GeometryIndex>,
    current: Selection,
}

impl SelectionState {
    pub fn new(geometry: Arc<GeometryIndex>, line: Line, granularity: Granularity) -> Self {
        let station = default_station(&geometry, line);
        Self {
            geometry,
            current: Selection {
                line,
                station,
                granularity,
            },
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.current
    }

    /// Switches line and returns its stations along with the station now
    /// selected. The previous station never survives a line change: the
    /// requested one is kept only if it belongs to the new line, otherwise
    /// the line's first station is used.
    pub fn select_line(
        &mut self,
        line: &str,
        station: Option<&str>,
    ) -> Result<(&[StationPoint], Option<Arc<str>>), UnknownLineError> {
        let line: Line = line.parse().map_err(UnknownLineError)?;
        let stations = self.geometry.stations_of(line);
        let requested = station
            .and_then(|name| stations.iter().find(|point| point.name.as_ref() == name));
        if let (Some(name), None) = (station, requested) {
            debug!("Station {name} is not on {line}, using the default station");
        }

        self.current.line = line;
        self.current.station = requested
            .or_else(|| stations.first())
            .map(|point| point.name.clone());
        Ok((stations, self.current.station.clone()))
    }

    /// Selects a station of the current line. Returns `false` and keeps the
    /// current station if `name` is not on the line.
    pub fn select_station(&mut self, name: &str) -> bool {
        match self.geometry.station(self.current.line, name) {
            Some(point) => {
                self.current.station = Some(point.name.clone());
                true
            }
            None => false,
        }
    }

    pub fn select_granularity(&mut self, granularity: Granularity) {
        self.current.granularity = granularity;
    }
}

fn default_station(geometry: &GeometryIndex, line: Line) -> Option<Arc<str>> {
    geometry
        .stations_of(line)
        .first()
        .map(|point| point.name.clone())
}
