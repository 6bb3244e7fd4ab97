#![forbid(unsafe_code)]

pub mod assemble;
pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod formats;
pub mod ingest;
pub mod logging;
pub mod mapper;
pub mod render;
pub mod sheets;
pub mod source;
pub mod validate;
pub mod workbook;

pub use error::{ErrorKind, ScrollyError, ScrollyResult, Violation};
