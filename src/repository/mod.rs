use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Instant,
};

mod models;
pub use models::*;
use tracing::debug;

use crate::{
    shared::Line,
    source::{self, SourceReader},
};

type IdToIndexes = HashMap<Arc<str>, Box<[u32]>>;

/// The canonical dataset. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Box<[RidershipRecord]>,
    hourly: Box<[HourlyRecord]>,

    station_to_records: IdToIndexes,
    station_to_hourly: IdToIndexes,
    // Stations in order of first appearance in the data.
    line_to_stations: BTreeMap<Line, Box<[Arc<str>]>>,
}

impl Dataset {
    pub fn new(records: Vec<RidershipRecord>, hourly: Vec<HourlyRecord>) -> Self {
        let now = Instant::now();
        let mut station_to_records: HashMap<Arc<str>, Vec<u32>> = HashMap::new();
        let mut line_to_stations: BTreeMap<Line, Vec<Arc<str>>> = BTreeMap::new();
        records.iter().enumerate().for_each(|(i, record)| {
            let indexes = station_to_records.entry(record.station.clone()).or_default();
            let stations = line_to_stations.entry(record.line).or_default();
            if !stations.contains(&record.station) {
                stations.push(record.station.clone());
            }
            indexes.push(i as u32);
        });

        let mut station_to_hourly: HashMap<Arc<str>, Vec<u32>> = HashMap::new();
        hourly.iter().enumerate().for_each(|(i, record)| {
            station_to_hourly
                .entry(record.station.clone())
                .or_default()
                .push(i as u32);
        });

        debug!(
            "Indexing {} records and {} hourly records took {:?}",
            records.len(),
            hourly.len(),
            now.elapsed()
        );
        Self {
            records: records.into(),
            hourly: hourly.into(),
            station_to_records: into_boxed(station_to_records),
            station_to_hourly: into_boxed(station_to_hourly),
            line_to_stations: line_to_stations
                .into_iter()
                .map(|(line, stations)| (line, stations.into()))
                .collect(),
        }
    }

    /// Reads and normalizes every configured table.
    pub fn load(reader: &SourceReader) -> Result<Self, source::Error> {
        let records = reader.load_ridership()?;
        let hourly = reader.load_hourly()?;
        Ok(Self::new(records, hourly))
    }

    pub fn records(&self) -> &[RidershipRecord] {
        &self.records
    }

    pub fn hourly(&self) -> &[HourlyRecord] {
        &self.hourly
    }

    /// Records of a station in load order. Unknown stations yield nothing.
    pub fn records_by_station<'a>(
        &'a self,
        station: &str,
    ) -> impl Iterator<Item = &'a RidershipRecord> + use<'a> {
        self.station_to_records
            .get(station)
            .into_iter()
            .flat_map(|indexes| indexes.iter())
            .map(|i| &self.records[*i as usize])
    }

    pub fn hourly_by_station<'a>(
        &'a self,
        station: &str,
    ) -> impl Iterator<Item = &'a HourlyRecord> + use<'a> {
        self.station_to_hourly
            .get(station)
            .into_iter()
            .flat_map(|indexes| indexes.iter())
            .map(|i| &self.hourly[*i as usize])
    }

    pub fn records_by_line(&self, line: Line) -> impl Iterator<Item = &RidershipRecord> {
        self.records.iter().filter(move |record| record.line == line)
    }

    /// Stations that have data on `line`, in order of first appearance.
    pub fn stations_on(&self, line: Line) -> &[Arc<str>] {
        self.line_to_stations
            .get(&line)
            .map(|stations| stations.as_ref())
            .unwrap_or_default()
    }
}

fn into_boxed(lookup: HashMap<Arc<str>, Vec<u32>>) -> IdToIndexes {
    lookup
        .into_iter()
        .map(|(key, value)| (key, value.into()))
        .collect()
}
