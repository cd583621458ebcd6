mod common;

use ridership::{
    geometry::{GeometryIndex, LineGeometrySource},
    shared::{Coordinate, Line},
    source::Error,
};

#[test]
fn stations_are_lat_lon_test() {
    let index = common::geometry();
    let stations = index.stations_of(Line::Lrt2);
    assert_eq!(stations.len(), 3);
    assert_eq!(stations[0].name.as_ref(), "Recto Station");
    assert_eq!(stations[0].line, Line::Lrt2);
    assert_eq!(stations[0].coordinate, Coordinate::new(14.6035, 120.9833));
    for station in index.all_stations() {
        assert!(station.coordinate.latitude < 90.0);
        assert!(station.coordinate.longitude > 100.0);
    }
}

#[test]
fn every_line_has_stations_test() {
    let index = common::geometry();
    for line in Line::ALL {
        assert!(!index.stations_of(line).is_empty());
    }
}

#[test]
fn route_connects_points_in_order_test() {
    let index = common::geometry();
    let route: Vec<_> = index.route_of(Line::Mrt3).to_vec();
    let stations: Vec<_> = index
        .stations_of(Line::Mrt3)
        .iter()
        .map(|station| station.coordinate)
        .collect();
    assert_eq!(route, stations);
}

#[test]
fn prebuilt_route_test() {
    let route = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},
        "geometry":{"type":"LineString","coordinates":[[121.0323,14.6522],[121.03,14.60],[121.0280,14.5491]]}}]}"#;
    let mut sources = common::geometry_sources();
    sources[2] = LineGeometrySource::parse(
        Line::Mrt3,
        "line3.geojson",
        &common::stations_geojson(&common::MRT3_STATIONS),
        Some(route),
    )
    .unwrap();
    let index = GeometryIndex::load(sources).unwrap();
    assert_eq!(
        index.route_of(Line::Mrt3),
        &[
            Coordinate::new(14.6522, 121.0323),
            Coordinate::new(14.60, 121.03),
            Coordinate::new(14.5491, 121.0280),
        ]
    );
}

#[test]
fn duplicate_stations_are_dropped_test() {
    let mut stations = common::LRT1_STATIONS.to_vec();
    stations.push(("EDSA Station", 14.5387, 121.0007));
    let mut sources = common::geometry_sources();
    sources[0] =
        LineGeometrySource::parse(Line::Lrt1, "line1.geojson", &common::stations_geojson(&stations), None)
            .unwrap();
    let index = GeometryIndex::load(sources).unwrap();
    assert_eq!(index.stations_of(Line::Lrt1).len(), 3);
    assert_eq!(
        index.station(Line::Lrt1, "EDSA Station").unwrap().coordinate,
        Coordinate::new(14.5386, 121.0006)
    );
}

#[test]
fn line_without_stations_test() {
    let mut sources = common::geometry_sources();
    sources[1] = LineGeometrySource::parse(
        Line::Lrt2,
        "line2.geojson",
        r#"{"type":"FeatureCollection","features":[]}"#,
        None,
    )
    .unwrap();
    match GeometryIndex::load(sources) {
        Err(Error::Geometry { file, line, .. }) => {
            assert_eq!(file, "line2.geojson");
            assert_eq!(line, Line::Lrt2);
        }
        other => panic!("expected a geometry error, got {other:?}"),
    }
}

#[test]
fn missing_line_source_test() {
    let mut sources = common::geometry_sources();
    sources.pop();
    assert!(matches!(
        GeometryIndex::load(sources),
        Err(Error::Geometry { line: Line::Mrt3, .. })
    ));
}

#[test]
fn out_of_range_coordinate_test() {
    // Latitude and longitude swapped in the file.
    let stations = [("Recto Station", 120.9833, 14.6035)];
    let mut sources = common::geometry_sources();
    sources[1] =
        LineGeometrySource::parse(Line::Lrt2, "line2.geojson", &common::stations_geojson(&stations), None)
            .unwrap();
    assert!(matches!(
        GeometryIndex::load(sources),
        Err(Error::Geometry { line: Line::Lrt2, .. })
    ));
}

#[test]
fn malformed_coordinate_test() {
    let stations = r#"{"type":"FeatureCollection","features":[{"type":"Feature",
        "geometry":{"type":"Point","coordinates":[120.9833]},"properties":{"station_name":"Recto Station"}}]}"#;
    let parsed = LineGeometrySource::parse(Line::Lrt2, "line2.geojson", stations, None);
    let result = parsed.and_then(|source| {
        let mut sources = common::geometry_sources();
        sources[1] = source;
        GeometryIndex::load(sources)
    });
    assert!(matches!(
        result,
        Err(Error::Geometry { line: Line::Lrt2, .. })
    ));
}

#[test]
fn non_numeric_coordinate_test() {
    let stations = r#"{"type":"FeatureCollection","features":[{"type":"Feature",
        "geometry":{"type":"Point","coordinates":["a","b"]},"properties":{"station_name":"Recto Station"}}]}"#;
    match LineGeometrySource::parse(Line::Lrt2, "line2.geojson", stations, None) {
        Err(Error::Geometry { file, line, .. }) => {
            assert_eq!(file, "line2.geojson");
            assert_eq!(line, Line::Lrt2);
        }
        other => panic!("expected a geometry error, got {other:?}"),
    }
}

#[test]
fn invalid_route_file_test() {
    let stations = common::stations_geojson(&common::MRT3_STATIONS);
    assert!(matches!(
        LineGeometrySource::parse(Line::Mrt3, "line3.geojson", &stations, Some("not json")),
        Err(Error::Geometry { line: Line::Mrt3, .. })
    ));
}

#[test]
fn missing_station_name_test() {
    let stations = r#"{"type":"FeatureCollection","features":[{"type":"Feature",
        "geometry":{"type":"Point","coordinates":[120.9833,14.6035]},"properties":{}}]}"#;
    let mut sources = common::geometry_sources();
    sources[1] = LineGeometrySource::parse(Line::Lrt2, "line2.geojson", stations, None).unwrap();
    assert!(matches!(
        GeometryIndex::load(sources),
        Err(Error::Geometry { line: Line::Lrt2, .. })
    ));
}
