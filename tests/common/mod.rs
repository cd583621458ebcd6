#![allow(dead_code)]

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use ridership::{
    engine::{DashboardConfig, Engine},
    geometry::{GeometryIndex, LineGeometrySource},
    repository::Dataset,
    shared::Line,
    source::{self, HourlySource, RidershipFormat, RidershipSource},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

pub const LRT1_STATIONS: [(&str, f64, f64); 3] = [
    ("Baclaran Station", 14.5343, 120.9983),
    ("EDSA Station", 14.5386, 121.0006),
    ("Libertad Station", 14.5476, 120.9986),
];

pub const LRT2_STATIONS: [(&str, f64, f64); 3] = [
    ("Recto Station", 14.6035, 120.9833),
    ("Legarda Station", 14.6009, 120.9925),
    ("Pureza Station", 14.6017, 121.0052),
];

pub const MRT3_STATIONS: [(&str, f64, f64); 3] = [
    ("North Avenue Station", 14.6522, 121.0323),
    ("Quezon Avenue Station", 14.6427, 121.0387),
    ("Ayala Station", 14.5491, 121.0280),
];

pub const FLAT_CSV: &str = "\
Date,Line,Station,Value
2022-03-01,LRT2,Recto Station,10
2022-03-08,LRT2,Recto Station,20
2022-03-15,LRT2,Recto Station,30
2021-01-04,LRT2,Legarda Station,100
2021-01-05,LRT2,Legarda Station,200
2022-07-04,LRT2,Legarda Station,50
2022-03-01,LRT1,Baclaran Station,40
2022-04-01,LRT1,Baclaran Station,60
2022-03-02,MRT3,North Avenue Station,500
2022-03-09,MRT3,North Avenue Station,700
";

/// Day-first dates: 07/03/2022 is Monday 7 March.
pub const HOURLY_CSV: &str = "\
Date,Station,Time,weekday,Value
07/03/2022,North Avenue Station,05:00-06:00,0,100
07/03/2022,North Avenue Station,06:00-07:00,0,150
08/03/2022,North Avenue Station,05:00-06:00,1,120
14/03/2022,North Avenue Station,05:00-06:00,0,80
";

/// GeoJSON point features in `[lon, lat]` order.
pub fn stations_geojson(stations: &[(&str, f64, f64)]) -> String {
    let features: Vec<String> = stations
        .iter()
        .map(|(name, lat, lon)| {
            format!(
                r#"{{"type":"Feature","geometry":{{"type":"Point","coordinates":[{lon},{lat}]}},"properties":{{"station_name":"{name}"}}}}"#
            )
        })
        .collect();
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

pub fn geometry_sources() -> Vec<LineGeometrySource> {
    [
        (Line::Lrt1, "line1.geojson", &LRT1_STATIONS),
        (Line::Lrt2, "line2.geojson", &LRT2_STATIONS),
        (Line::Mrt3, "line3.geojson", &MRT3_STATIONS),
    ]
    .into_iter()
    .map(|(line, file, stations)| {
        LineGeometrySource::parse(line, file, &stations_geojson(stations), None).unwrap()
    })
    .collect()
}

pub fn geometry() -> GeometryIndex {
    GeometryIndex::load(geometry_sources()).unwrap()
}

pub fn flat_source() -> RidershipSource {
    RidershipSource::new("ridership.csv", RidershipFormat::Flat)
}

pub fn hourly_source() -> HourlySource {
    HourlySource::new("hourly.csv")
}

pub fn dataset() -> Dataset {
    let records = source::normalize(FLAT_CSV.as_bytes(), &flat_source()).unwrap();
    let hourly = source::normalize_hourly(HOURLY_CSV.as_bytes(), &hourly_source()).unwrap();
    Dataset::new(records, hourly)
}

pub fn engine_with(config: DashboardConfig) -> Engine {
    Engine::new(dataset(), geometry(), config)
}

pub fn engine() -> Engine {
    engine_with(DashboardConfig::default())
}

/// Splits a CSV fixture into cells. Fixtures never quote.
pub fn csv_rows(csv: &str) -> Vec<Vec<String>> {
    csv.lines()
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect()
}

/// The day number a spreadsheet stores for an ISO date.
pub fn excel_serial(date: &str) -> String {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    (date - epoch).num_days().to_string()
}

/// Replaces the ISO dates of the first column with spreadsheet serials.
pub fn with_serial_dates(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    for row in rows.iter_mut().skip(1) {
        row[0] = excel_serial(&row[0]);
    }
    rows
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Ridership" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// A single-sheet workbook named `Ridership`. Numeric cells are stored as
/// numbers, other cells as inline strings and empty cells are left out.
pub fn xlsx(rows: &[Vec<String>]) -> Vec<u8> {
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        sheet.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let cell = format!("{}{}", (b'A' + c as u8) as char, r + 1);
            if value.parse::<f64>().is_ok() {
                sheet.push_str(&format!(r#"<c r="{cell}"><v>{value}</v></c>"#));
            } else {
                let text = value
                    .replace('&', "&amp;")
                    .replace('<', "&lt;")
                    .replace('>', "&gt;");
                sheet.push_str(&format!(
                    r#"<c r="{cell}" t="inlineStr"><is><t>{text}</t></is></c>"#
                ));
            }
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/worksheets/sheet1.xml", sheet.as_str()),
    ] {
        writer.start_file(name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
