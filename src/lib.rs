pub mod args;
pub mod chart;
pub mod commands;
mod config;
mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
pub mod state;
pub mod table;
mod utils;


pub use config::Config;
pub use error::Error;
pub use error::Result;
