pub mod config;
pub mod error;
pub mod extensions;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
