//! Raw inputs: where source files live, how they are read, and how their rows
//! become canonical records.

use std::{
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
    time::Instant,
};
use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

mod config;
pub mod models;
mod normalize;
pub use config::*;
pub use normalize::*;

use crate::{repository::HourlyRecord, shared::Line};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Source {file}, row {row}: {source}")]
    Table {
        file: String,
        row: usize,
        source: csv::Error,
    },
    #[error("Spreadsheet {file}: {source}")]
    Spreadsheet {
        file: String,
        source: calamine::Error,
    },
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
    #[error("Source {file} is missing required column {column}")]
    Format { file: String, column: String },
    #[error("Source {file}, row {row}: could not parse {field} from {value:?}")]
    Parse {
        file: String,
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("Geometry {file} for line {line}: {reason}")]
    Geometry {
        file: String,
        line: Line,
        reason: String,
    },
}

#[derive(Debug, Default, Clone)]
pub enum Storage {
    #[default]
    None,
    Directory(PathBuf),
    Zip(PathBuf),
}

/// Reads the configured source files out of a directory or a zip archive.
#[derive(Debug, Default, Clone)]
pub struct SourceReader {
    config: Config,
    storage: Storage,
}

impl SourceReader {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            storage: Default::default(),
        }
    }

    pub fn from_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage = Storage::Directory(path.as_ref().to_path_buf());
        self
    }

    pub fn from_zip<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage = Storage::Zip(path.as_ref().to_path_buf());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn read(&self, file_name: &str) -> Result<Vec<u8>, self::Error> {
        match &self.storage {
            Storage::None => Err(self::Error::FileNotFound(file_name.to_string())),
            Storage::Directory(dir) => read_from_dir(dir, file_name),
            Storage::Zip(path) => read_from_zip(path, file_name),
        }
    }

    /// Normalizes every configured ridership table into one record set.
    pub fn load_ridership(&self) -> Result<RidershipRecordSet, self::Error> {
        let mut records = RidershipRecordSet::new();
        for source in &self.config.ridership {
            let now = Instant::now();
            let bytes = self.read(&source.file_name)?;
            let mut normalized = normalize(bytes.as_slice(), source)?;
            debug!(
                "Loading {} ({} records) took {:?}",
                source.file_name,
                normalized.len(),
                now.elapsed()
            );
            records.append(&mut normalized);
        }
        Ok(records)
    }

    /// Normalizes the hourly table, or yields nothing when none is configured.
    pub fn load_hourly(&self) -> Result<Vec<HourlyRecord>, self::Error> {
        let Some(source) = &self.config.hourly else {
            return Ok(Vec::new());
        };
        let now = Instant::now();
        let bytes = self.read(&source.file_name)?;
        let records = normalize_hourly(bytes.as_slice(), source)?;
        debug!(
            "Loading {} ({} records) took {:?}",
            source.file_name,
            records.len(),
            now.elapsed()
        );
        Ok(records)
    }
}

fn read_from_dir(dir: &Path, file_name: &str) -> Result<Vec<u8>, self::Error> {
    fs::read(dir.join(file_name)).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => self::Error::FileNotFound(file_name.to_string()),
        _ => err.into(),
    })
}

fn read_from_zip(zip_path: &Path, file_name: &str) -> Result<Vec<u8>, self::Error> {
    let zip_file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(zip_file)?;
    let index = archive
        .index_for_name(file_name)
        .ok_or(self::Error::FileNotFound(file_name.to_string()))?;
    let mut file = archive.by_index(index)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
}
