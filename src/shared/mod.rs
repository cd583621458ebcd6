pub mod calendar;
pub mod geo;
pub mod line;

pub use calendar::*;
pub use geo::*;
pub use line::*;
