//! Shared types, models and the advisory rule engine
//!
//! Everything in this crate is synchronous and free of I/O so it can run
//! both in the backend pipeline and in the browser (via WASM).

pub mod models;
pub mod rules;
pub mod types;
pub mod validation;

pub use models::*;
pub use rules::*;
pub use types::*;
pub use validation::*;
