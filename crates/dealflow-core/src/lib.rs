pub mod config;
pub mod error;
pub mod types;

pub use config::DealflowConfig;
pub use error::{DealflowError, Result};
pub use types::*;
