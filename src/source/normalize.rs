use std::{
    collections::HashSet,
    io::{Cursor, Read},
    path::Path,
    sync::Arc,
};

use calamine::{Data, Reader as _, open_workbook_auto_from_rs};
use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::warn;

use super::{
    Error, HourlySource, RidershipFormat, RidershipSource,
    models::{RawHourlyRow, RawRidershipRow},
};
use crate::{
    repository::{HourlyRecord, RidershipRecord},
    shared::{DateConvention, Line, parse_date},
};

pub type RidershipRecordSet = Vec<RidershipRecord>;

const DATE: &str = "Date";
const LINE: &str = "Line";
const STATION: &str = "Station";
const VALUE: &str = "Value";
const TIME: &str = "Time";

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

type Rows<'a> = Box<dyn Iterator<Item = Result<StringRecord, Error>> + 'a>;

/// Header and data rows of a table, whatever the file type.
struct Table<'a> {
    file: &'a str,
    headers: StringRecord,
    rows: Rows<'a>,
}

/// Turns one ridership table into canonical records. The reader is consumed
/// as is; opening the file is up to the caller. Spreadsheets are recognized
/// by the file extension, anything else is read as delimited text.
pub fn normalize<R: Read>(reader: R, source: &RidershipSource) -> Result<RidershipRecordSet, Error> {
    let table = read_table(
        reader,
        &source.file_name,
        source.delimiter,
        source.sheet.as_deref(),
    )?;
    match source.format {
        RidershipFormat::Flat => normalize_flat(table, source.date_convention),
        RidershipFormat::Wide => normalize_wide(table, source.date_convention),
    }
}

pub fn normalize_hourly<R: Read>(reader: R, source: &HourlySource) -> Result<Vec<HourlyRecord>, Error> {
    let table = read_table(
        reader,
        &source.file_name,
        source.delimiter,
        source.sheet.as_deref(),
    )?;
    let file = table.file;
    let headers = canonical_headers(&table.headers, file, &[DATE, STATION, TIME, VALUE])?;

    let mut stations = HashSet::new();
    let mut buckets = HashSet::new();
    let mut records = Vec::new();
    let mut skipped = 0;
    for (i, result) in table.rows.enumerate() {
        let row = i + 2;
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let raw: RawHourlyRow = record
            .deserialize(Some(&headers))
            .map_err(|err| table_error(file, row, err))?;
        let date = parse_row_date(file, row, &raw.date, source.date_convention)?;
        let Some(value) = parse_value(file, row, &raw.value)? else {
            skipped += 1;
            continue;
        };
        records.push(HourlyRecord::new(
            date,
            intern(&mut stations, &raw.station),
            intern(&mut buckets, &raw.time),
            value,
        ));
    }
    if skipped > 0 {
        warn!("Skipped {skipped} empty values in {file}");
    }
    Ok(records)
}

fn normalize_flat(table: Table<'_>, convention: DateConvention) -> Result<RidershipRecordSet, Error> {
    let file = table.file;
    let headers = canonical_headers(&table.headers, file, &[DATE, LINE, STATION, VALUE])?;

    let mut stations = HashSet::new();
    let mut records = Vec::new();
    let mut skipped = 0;
    for (i, result) in table.rows.enumerate() {
        let row = i + 2;
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let raw: RawRidershipRow = record
            .deserialize(Some(&headers))
            .map_err(|err| table_error(file, row, err))?;
        let date = parse_row_date(file, row, &raw.date, convention)?;
        let line = parse_line(file, row, &raw.line)?;
        let Some(value) = parse_value(file, row, &raw.value)? else {
            skipped += 1;
            continue;
        };
        records.push(RidershipRecord::new(
            date,
            line,
            intern(&mut stations, &raw.station),
            value,
        ));
    }
    if skipped > 0 {
        warn!("Skipped {skipped} empty values in {file}");
    }
    Ok(records)
}

fn normalize_wide(table: Table<'_>, convention: DateConvention) -> Result<RidershipRecordSet, Error> {
    let file = table.file;
    let headers = canonical_headers(&table.headers, file, &[DATE, LINE])?;
    let date_idx = column_index(&headers, DATE);
    let line_idx = column_index(&headers, LINE);

    let mut stations = HashSet::new();
    let station_columns: Vec<(usize, Arc<str>)> = headers
        .iter()
        .enumerate()
        .filter(|(i, name)| *i != date_idx && *i != line_idx && !name.is_empty())
        .map(|(i, name)| (i, intern(&mut stations, name)))
        .collect();
    if station_columns.is_empty() {
        return Err(Error::Format {
            file: file.to_string(),
            column: STATION.to_string(),
        });
    }

    let mut records = Vec::new();
    let mut skipped = 0;
    for (i, result) in table.rows.enumerate() {
        let row = i + 2;
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let date = parse_row_date(
            file,
            row,
            record.get(date_idx).unwrap_or_default(),
            convention,
        )?;
        let line = parse_line(file, row, record.get(line_idx).unwrap_or_default())?;
        for (column, station) in &station_columns {
            match parse_value(file, row, record.get(*column).unwrap_or_default())? {
                Some(value) => {
                    records.push(RidershipRecord::new(date, line, station.clone(), value))
                }
                None => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        warn!("Skipped {skipped} empty cells in {file}");
    }
    Ok(records)
}

fn is_spreadsheet(file: &str) -> bool {
    Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn read_table<'a, R: Read + 'a>(
    reader: R,
    file: &'a str,
    delimiter: char,
    sheet: Option<&str>,
) -> Result<Table<'a>, Error> {
    if is_spreadsheet(file) {
        return read_spreadsheet(reader, file, sheet);
    }

    let mut rdr = csv_reader(reader, delimiter);
    let headers = rdr
        .headers()
        .map_err(|err| table_error(file, 1, err))?
        .clone();
    let rows = rdr
        .into_records()
        .enumerate()
        .map(move |(i, result)| result.map_err(|err| table_error(file, i + 2, err)));
    Ok(Table {
        file,
        headers,
        rows: Box::new(rows),
    })
}

fn csv_reader<R: Read>(reader: R, delimiter: char) -> Reader<R> {
    let delimiter = if delimiter.is_ascii() {
        delimiter as u8
    } else {
        b','
    };
    ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader)
}

/// Reads one worksheet, the first one unless `sheet` names another. The
/// first row is the header.
fn read_spreadsheet<'a, R: Read>(
    mut reader: R,
    file: &'a str,
    sheet: Option<&str>,
) -> Result<Table<'a>, Error> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let spreadsheet_error = |err: calamine::Error| Error::Spreadsheet {
        file: file.to_string(),
        source: err,
    };

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(spreadsheet_error)?;
    let range = match sheet {
        Some(name) => workbook.worksheet_range(name),
        None => workbook
            .worksheet_range_at(0)
            .unwrap_or(Err(calamine::Error::Msg("workbook has no sheets"))),
    }
    .map_err(spreadsheet_error)?;

    let mut rows = range
        .rows()
        .map(|cells| cells.iter().map(cell_text).collect::<StringRecord>());
    let headers = rows.next().unwrap_or_default();
    let rows: Vec<StringRecord> = rows.collect();
    Ok(Table {
        file,
        headers,
        rows: Box::new(rows.into_iter().map(Ok)),
    })
}

/// Renders a cell the way a CSV export would. Date cells become their serial
/// day number, which `parse_date` reads back.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => value.clone(),
        Data::Float(value) if value.fract() == 0.0 => format!("{value:.0}"),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => format!("{:.0}", value.as_f64().floor()),
        Data::Error(err) => err.to_string(),
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Trims headers and rewrites known columns to their canonical spelling so
/// that `date`, ` DATE ` and `Date` all match. Fails on the first missing
/// required column.
fn canonical_headers(
    headers: &StringRecord,
    file: &str,
    required: &[&str],
) -> Result<StringRecord, Error> {
    let mut canonical = StringRecord::new();
    for header in headers.iter() {
        let header = header.trim_start_matches('\u{feff}').trim();
        let known = [DATE, LINE, STATION, VALUE, TIME]
            .into_iter()
            .find(|column| column.eq_ignore_ascii_case(header));
        canonical.push_field(known.unwrap_or(header));
    }

    if let Some(missing) = required
        .iter()
        .find(|column| !canonical.iter().any(|header| header == **column))
    {
        return Err(Error::Format {
            file: file.to_string(),
            column: missing.to_string(),
        });
    }
    Ok(canonical)
}

fn column_index(headers: &StringRecord, column: &str) -> usize {
    headers
        .iter()
        .position(|header| header == column)
        .unwrap_or(usize::MAX)
}

fn parse_row_date(
    file: &str,
    row: usize,
    value: &str,
    convention: DateConvention,
) -> Result<chrono::NaiveDate, Error> {
    parse_date(value, convention).ok_or_else(|| parse_error(file, row, DATE, value))
}

fn parse_line(file: &str, row: usize, value: &str) -> Result<Line, Error> {
    value
        .parse()
        .map_err(|_| parse_error(file, row, LINE, value))
}

/// Empty cells are missing observations. Anything else has to be a finite,
/// non-negative number; thousands separators are tolerated.
fn parse_value(file: &str, row: usize, value: &str) -> Result<Option<f64>, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.replace(',', "").parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => Ok(Some(parsed)),
        _ => Err(parse_error(file, row, VALUE, value)),
    }
}

fn parse_error(file: &str, row: usize, field: &'static str, value: &str) -> Error {
    Error::Parse {
        file: file.to_string(),
        row,
        field,
        value: value.to_string(),
    }
}

fn table_error(file: &str, row: usize, err: csv::Error) -> Error {
    Error::Table {
        file: file.to_string(),
        row,
        source: err,
    }
}

fn intern(pool: &mut HashSet<Arc<str>>, name: &str) -> Arc<str> {
    let name = name.trim();
    if let Some(existing) = pool.get(name) {
        existing.clone()
    } else {
        let value: Arc<str> = name.into();
        pool.insert(value.clone());
        value
    }
}
