//! Core types and aggregation for the epidash dashboard.
//!
//! This crate is deliberately free of file-format, HTTP and terminal
//! dependencies. Loaders implement [`source::DatasetSource`]; presentation
//! layers talk to a [`dashboard::Dashboard`].

pub mod aggregate;
pub mod cache;
pub mod dashboard;
pub mod error;
pub mod record;
pub mod source;
pub mod table;

pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use table::{Table, TableVersion};

#[cfg(test)]
mod tests;
