mod stations;
mod views;
pub use stations::*;
pub use views::*;
