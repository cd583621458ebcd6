use ridership::{engine::DashboardConfig, source};
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub sources: source::Config,
    pub dashboard: DashboardConfig,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            sources: Default::default(),
            dashboard: Default::default(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ridership::source::Error> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
