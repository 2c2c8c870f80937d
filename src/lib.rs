pub mod config;
pub mod error;
pub mod model;
pub mod server;
pub mod store;

pub use error::{Error, Result};
