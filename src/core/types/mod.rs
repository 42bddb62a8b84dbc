pub mod config;
mod error;
pub mod mode;
pub mod stats;

pub use error::*;
