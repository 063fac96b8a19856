pub mod cli;
pub mod error;
pub mod models;
pub mod parsers;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
