use ridership::{engine::Selection, geometry::StationPoint};
use serde::Serialize;

use crate::dto::StationDto;

#[derive(Debug, Clone, Serialize)]
pub struct SelectionDto {
    pub line: String,
    pub station: Option<String>,
    pub granularity: String,
    pub stations: Vec<StationDto>,
}

impl SelectionDto {
    pub fn from(selection: &Selection, stations: &[StationPoint]) -> Self {
        Self {
            line: selection.line.to_string(),
            station: selection.station.as_deref().map(str::to_string),
            granularity: selection.granularity.to_string(),
            stations: stations.iter().map(StationDto::from).collect(),
        }
    }
}
