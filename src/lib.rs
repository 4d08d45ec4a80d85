pub mod config;
pub mod error;
pub mod gateway;
pub mod generator;
pub mod process;
pub mod server;

pub use error::{Error, Result};
