use ridership::{geometry::StationPoint, shared::Coordinate};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StationDto {
    pub name: String,
    pub line: String,
    pub coordinate: Coordinate,
}

impl StationDto {
    pub fn from(station: &StationPoint) -> Self {
        Self {
            name: station.name.to_string(),
            line: station.line.to_string(),
            coordinate: station.coordinate,
        }
    }
}
