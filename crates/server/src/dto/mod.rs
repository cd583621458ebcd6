mod selection;
mod station;
pub use selection::*;
pub use station::*;
