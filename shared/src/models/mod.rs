//! Domain models for the farm advisory pipeline

mod advisory;
mod weather;

pub use advisory::*;
pub use weather::*;
