pub mod config;
pub mod error;
pub mod types;

pub use config::SolxConfig;
pub use error::{Result, SolxError};
pub use types::*;
