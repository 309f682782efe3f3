pub mod config;
pub mod error;
pub mod mcp;
pub mod upstream;

pub use error::{BridgeError, Result};
