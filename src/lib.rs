pub mod args;
mod backup;
mod budget;
pub mod codec;
pub mod command;
pub mod commands;
mod config;
pub mod error;
pub mod model;
pub mod rollover;
pub mod store;
pub mod summary;
mod utils;
pub mod validate;

#[cfg(test)]
mod test;

pub use backup::Backup;
pub use budget::{Budget, ImportOutcome, ImportReport};
pub use config::Config;
pub use error::Error;
pub use error::Result;
