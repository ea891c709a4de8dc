mod config;
mod constants;
mod data;
mod sequence;
mod stats;

pub use config::*;
pub use constants::*;
pub use data::*;
pub use sequence::*;
pub use stats::*;
