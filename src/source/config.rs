use serde::{Deserialize, Serialize};

use crate::shared::{DateConvention, Line};

/// Layout of a ridership table. Either layout may come as delimited text or
/// as a spreadsheet (`.xlsx`, `.xls`, `.ods`), told apart by file extension.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RidershipFormat {
    /// One row per observation: `Date, Line, Station, Value`.
    #[default]
    Flat,
    /// One row per date and line, one column per station.
    Wide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidershipSource {
    pub file_name: String,
    #[serde(default)]
    pub format: RidershipFormat,
    #[serde(default)]
    pub date_convention: DateConvention,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Worksheet of a spreadsheet file; the first sheet when unset.
    #[serde(default)]
    pub sheet: Option<String>,
}

impl RidershipSource {
    pub fn new(file_name: impl Into<String>, format: RidershipFormat) -> Self {
        Self {
            file_name: file_name.into(),
            format,
            date_convention: DateConvention::MonthFirst,
            delimiter: default_delimiter(),
            sheet: None,
        }
    }

    pub fn with_date_convention(mut self, date_convention: DateConvention) -> Self {
        self.date_convention = date_convention;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// Sub-daily ridership table: `Date, Station, Time, Value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySource {
    pub file_name: String,
    #[serde(default = "day_first")]
    pub date_convention: DateConvention,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub sheet: Option<String>,
}

impl HourlySource {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            date_convention: day_first(),
            delimiter: default_delimiter(),
            sheet: None,
        }
    }

    pub fn with_date_convention(mut self, date_convention: DateConvention) -> Self {
        self.date_convention = date_convention;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryFiles {
    pub line: Line,
    /// GeoJSON point features carrying a `station_name` property.
    pub stations_file_name: String,
    /// Optional GeoJSON path, or points to connect in file order.
    #[serde(default)]
    pub route_file_name: Option<String>,
}

/// File names and parsing conventions of every input the dataset is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ridership: Vec<RidershipSource>,
    pub hourly: Option<HourlySource>,
    pub geometry: Vec<GeometryFiles>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ridership: vec![RidershipSource::new("data.xlsx", RidershipFormat::Flat)],
            hourly: Some(HourlySource::new("Raw-Data-2016-2022.csv")),
            geometry: vec![
                GeometryFiles {
                    line: Line::Lrt1,
                    stations_file_name: "line1.geojson".into(),
                    route_file_name: None,
                },
                GeometryFiles {
                    line: Line::Lrt2,
                    stations_file_name: "line2.geojson".into(),
                    route_file_name: None,
                },
                GeometryFiles {
                    line: Line::Mrt3,
                    stations_file_name: "line3.geojson".into(),
                    route_file_name: None,
                },
            ],
        }
    }
}

fn default_delimiter() -> char {
    ','
}

fn day_first() -> DateConvention {
    DateConvention::DayFirst
}
