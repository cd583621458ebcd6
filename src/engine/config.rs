use std::{collections::BTreeMap, io::Read};

use serde::{Deserialize, Serialize};

use crate::shared::{Coordinate, Granularity, Line};

/// Everything that used to differ between copies of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Display color per line.
    pub palette: BTreeMap<Line, String>,
    /// Used when a line has no palette entry.
    pub fallback_color: String,
    /// `None` centers the map on the mean of all stations.
    pub map_center: Option<Coordinate>,
    pub map_zoom: u8,
    /// The line whose heatmap is drawn from the sub-daily table.
    pub hourly_line: Option<Line>,
    pub heatmap_enabled: bool,
    pub trend_enabled: bool,
    pub default_line: Line,
    pub default_granularity: Granularity,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            palette: BTreeMap::from([
                (Line::Lrt1, "green".to_string()),
                (Line::Lrt2, "purple".to_string()),
                (Line::Mrt3, "blue".to_string()),
            ]),
            fallback_color: "gray".into(),
            map_center: Some(Coordinate::new(14.5547, 121.0244)),
            map_zoom: 10,
            hourly_line: Some(Line::Mrt3),
            heatmap_enabled: true,
            trend_enabled: true,
            default_line: Line::Lrt2,
            default_granularity: Granularity::Year,
        }
    }
}

impl DashboardConfig {
    pub fn from_json<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn color_of(&self, line: Option<Line>) -> &str {
        line.and_then(|line| self.palette.get(&line))
            .unwrap_or(&self.fallback_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r##"{ "palette": { "LRT1": "#00a651" }, "trend_enabled": false }"##;
        let config = DashboardConfig::from_json(json.as_bytes()).unwrap();
        assert_eq!(config.color_of(Some(Line::Lrt1)), "#00a651");
        assert_eq!(config.color_of(Some(Line::Mrt3)), "gray");
        assert_eq!(config.color_of(None), "gray");
        assert!(!config.trend_enabled);
        assert!(config.heatmap_enabled);
        assert_eq!(config.map_zoom, 10);
    }
}
