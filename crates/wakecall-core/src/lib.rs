//! `wakecall-core` — shared configuration and error types.

pub mod config;
pub mod error;

pub use config::WakecallConfig;
pub use error::{Result, WakecallError};
