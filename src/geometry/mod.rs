//! Station points and route paths per line, read from GeoJSON.

use std::{collections::BTreeMap, sync::Arc, time::Instant};

use geojson::{Feature, GeoJson, Value};
use tracing::{debug, warn};

use crate::{
    shared::{Coordinate, Line},
    source::{self, SourceReader},
};

const NAME_PROPERTIES: [&str; 2] = ["station_name", "name"];

/// A station marker. `coordinate` is always latitude first.
#[derive(Debug, Clone, PartialEq)]
pub struct StationPoint {
    pub name: Arc<str>,
    pub line: Line,
    pub coordinate: Coordinate,
}

/// The two ways a route can be supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteShape {
    /// Discrete points, connected in the given order.
    Points(Vec<Coordinate>),
    /// A ready made path.
    Path(Vec<Coordinate>),
}

impl RouteShape {
    pub fn into_path(self) -> Vec<Coordinate> {
        match self {
            RouteShape::Points(mut points) => {
                // Repeated points add no segment.
                points.dedup();
                points
            }
            RouteShape::Path(path) => path,
        }
    }
}

/// Parsed geometry inputs of one line.
#[derive(Debug, Clone)]
pub struct LineGeometrySource {
    pub line: Line,
    /// Used in error messages.
    pub file_name: String,
    pub stations: GeoJson,
    pub route: Option<GeoJson>,
}

impl LineGeometrySource {
    /// Parse failures, including non-numeric coordinates, are reported
    /// against `file_name` and `line`.
    pub fn parse(
        line: Line,
        file_name: impl Into<String>,
        stations: &str,
        route: Option<&str>,
    ) -> Result<Self, source::Error> {
        let file_name = file_name.into();
        let parse = |text: &str| {
            text.parse::<GeoJson>()
                .map_err(|err| geometry_error(&file_name, line, err.to_string()))
        };
        let stations = parse(stations)?;
        let route = route.map(parse).transpose()?;
        Ok(Self {
            line,
            file_name,
            stations,
            route,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeometryIndex {
    stations: BTreeMap<Line, Box<[StationPoint]>>,
    routes: BTreeMap<Line, Box<[Coordinate]>>,
}

impl GeometryIndex {
    /// Builds the index. Every line must end up with at least one station.
    pub fn load(sources: Vec<LineGeometrySource>) -> Result<Self, source::Error> {
        let now = Instant::now();
        let mut stations: BTreeMap<Line, Vec<StationPoint>> = BTreeMap::new();
        let mut routes: BTreeMap<Line, Vec<Coordinate>> = BTreeMap::new();
        let mut files: BTreeMap<Line, String> = BTreeMap::new();

        for source in sources {
            let line = source.line;
            let points = station_points(&source.file_name, line, &source.stations)?;
            let shape = match &source.route {
                Some(route) => route_shape(&source.file_name, line, route)?,
                None => RouteShape::Points(points.iter().map(|point| point.coordinate).collect()),
            };

            let line_stations = stations.entry(line).or_default();
            for point in points {
                if line_stations.iter().any(|known| known.name == point.name) {
                    warn!("Duplicate station {} on {line} in {}", point.name, source.file_name);
                    continue;
                }
                line_stations.push(point);
            }
            routes.entry(line).or_default().extend(shape.into_path());
            files.entry(line).or_insert(source.file_name);
        }

        for line in Line::ALL {
            if stations.get(&line).is_none_or(|points| points.is_empty()) {
                return Err(source::Error::Geometry {
                    file: files.remove(&line).unwrap_or_else(|| "<none>".into()),
                    line,
                    reason: "line has no stations".into(),
                });
            }
        }

        debug!("Loading geometry took {:?}", now.elapsed());
        Ok(Self {
            stations: stations
                .into_iter()
                .map(|(line, points)| (line, points.into()))
                .collect(),
            routes: routes
                .into_iter()
                .map(|(line, path)| (line, path.into()))
                .collect(),
        })
    }

    /// Reads the geometry files named in the reader's config.
    pub fn from_reader(reader: &SourceReader) -> Result<Self, source::Error> {
        let sources = reader
            .config()
            .geometry
            .iter()
            .map(|files| {
                let stations = reader.read(&files.stations_file_name)?;
                let route = files
                    .route_file_name
                    .as_deref()
                    .map(|name| reader.read(name))
                    .transpose()?;
                LineGeometrySource::parse(
                    files.line,
                    files.stations_file_name.clone(),
                    &String::from_utf8_lossy(&stations),
                    route.as_deref().map(String::from_utf8_lossy).as_deref(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::load(sources)
    }

    /// Stations of a line in source order, names unique.
    pub fn stations_of(&self, line: Line) -> &[StationPoint] {
        self.stations
            .get(&line)
            .map(|points| points.as_ref())
            .unwrap_or_default()
    }

    pub fn route_of(&self, line: Line) -> &[Coordinate] {
        self.routes
            .get(&line)
            .map(|path| path.as_ref())
            .unwrap_or_default()
    }

    pub fn station(&self, line: Line, name: &str) -> Option<&StationPoint> {
        self.stations_of(line)
            .iter()
            .find(|point| point.name.as_ref() == name)
    }

    pub fn all_stations(&self) -> impl Iterator<Item = &StationPoint> {
        self.stations.values().flat_map(|points| points.iter())
    }
}

fn features(geojson: &GeoJson) -> Vec<&Feature> {
    match geojson {
        GeoJson::FeatureCollection(collection) => collection.features.iter().collect(),
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => Vec::new(),
    }
}

fn geometry_error(file: &str, line: Line, reason: impl Into<String>) -> source::Error {
    source::Error::Geometry {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

fn coordinate(file: &str, line: Line, position: &[f64]) -> Result<Coordinate, source::Error> {
    Coordinate::from_position(position)
        .ok_or_else(|| geometry_error(file, line, format!("invalid position {position:?}")))
}

fn station_points(
    file: &str,
    line: Line,
    geojson: &GeoJson,
) -> Result<Vec<StationPoint>, source::Error> {
    features(geojson)
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            let position = match feature.geometry.as_ref().map(|geometry| &geometry.value) {
                Some(Value::Point(position)) => position,
                _ => return Err(geometry_error(file, line, format!("feature {i} is not a point"))),
            };
            let name = feature
                .properties
                .as_ref()
                .and_then(|properties| {
                    NAME_PROPERTIES
                        .iter()
                        .find_map(|key| properties.get(*key)?.as_str())
                })
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| geometry_error(file, line, format!("feature {i} has no station name")))?;
            Ok(StationPoint {
                name: name.into(),
                line,
                coordinate: coordinate(file, line, position)?,
            })
        })
        .collect()
}

/// Any line geometry makes the file a ready made path; otherwise its points
/// are connected in file order.
fn route_shape(file: &str, line: Line, geojson: &GeoJson) -> Result<RouteShape, source::Error> {
    let values: Vec<&Value> = match geojson {
        GeoJson::Geometry(geometry) => vec![&geometry.value],
        _ => features(geojson)
            .into_iter()
            .filter_map(|feature| feature.geometry.as_ref().map(|geometry| &geometry.value))
            .collect(),
    };

    let mut path = Vec::new();
    let mut points = Vec::new();
    for value in values {
        match value {
            Value::Point(position) => points.push(coordinate(file, line, position)?),
            Value::MultiPoint(positions) => {
                for position in positions {
                    points.push(coordinate(file, line, position)?);
                }
            }
            Value::LineString(positions) => {
                for position in positions {
                    path.push(coordinate(file, line, position)?);
                }
            }
            Value::MultiLineString(lines) => {
                for position in lines.iter().flatten() {
                    path.push(coordinate(file, line, position)?);
                }
            }
            _ => return Err(geometry_error(file, line, "unsupported route geometry")),
        }
    }

    match (path.is_empty(), points.is_empty()) {
        (false, _) => Ok(RouteShape::Path(path)),
        (true, false) => Ok(RouteShape::Points(points)),
        (true, true) => Err(geometry_error(file, line, "route has no coordinates")),
    }
}
