use serde::{Deserialize, Serialize};

/// A flat ridership row as it appears in the file, before typing.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawRidershipRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Line")]
    pub line: String,
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawHourlyRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Value")]
    pub value: String,
}
