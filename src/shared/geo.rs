use std::{fmt::Display, iter::Sum};

use serde::{Deserialize, Serialize};

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A geographic point in plotting order: latitude first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

/// Averages the coordinates. An empty iterator yields NaN components.
impl Sum for Coordinate {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let mut count: usize = 0;
        let mut lat: f64 = 0.0;
        let mut lon: f64 = 0.0;
        iter.for_each(|coordinate| {
            count += 1;
            lat += coordinate.latitude;
            lon += coordinate.longitude;
        });
        let count = count as f64;
        Self {
            latitude: lat / count,
            longitude: lon / count,
        }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate from a GeoJSON position, which is `[lon, lat, ..]`.
    /// Returns `None` when the position is too short, not finite or out of range.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        let (&longitude, &latitude) = (position.first()?, position.get(1)?);
        let coordinate = Self::new(latitude, longitude);
        coordinate.is_valid().then_some(coordinate)
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&self.latitude)
            && (LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&self.longitude)
    }
}

#[test]
fn position_swap_test() {
    let coord = Coordinate::from_position(&[121.0244, 14.5547]).unwrap();
    assert_eq!(coord, Coordinate::new(14.5547, 121.0244));
}

#[test]
fn position_out_of_range_test() {
    assert!(Coordinate::from_position(&[14.5547, 121.0244]).is_none());
    assert!(Coordinate::from_position(&[f64::NAN, 14.0]).is_none());
    assert!(Coordinate::from_position(&[121.0]).is_none());
}

#[test]
fn centroid_test() {
    let center: Coordinate = [Coordinate::new(10.0, 100.0), Coordinate::new(20.0, 110.0)]
        .into_iter()
        .sum();
    assert_eq!(center, Coordinate::new(15.0, 105.0));
}
