pub mod campaign;
pub mod chain;
pub mod claim;
pub mod config;
pub mod error;
pub mod events;
pub mod indexer;
pub mod units;
pub mod utils;

pub use config::Config;
pub use error::{ClaimError, Result};
