pub mod engine;
pub mod geometry;
pub mod repository;
pub mod shared;
pub mod source;

pub mod prelude {
    pub use crate::engine::{
        BarView, DashboardConfig, Engine, HeatmapView, MapView, Selection, SelectionState,
        TrendSelector, TrendView, UnknownLineError, View,
    };
    pub use crate::geometry::{GeometryIndex, LineGeometrySource, StationPoint};
    pub use crate::repository::{Dataset, HourlyRecord, RidershipRecord};
    pub use crate::shared::{Coordinate, DateConvention, Granularity, Line};
    pub use crate::source::{
        Config, HourlySource, RidershipFormat, RidershipSource, SourceReader,
    };
}
