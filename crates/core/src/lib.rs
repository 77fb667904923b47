//! Core library for Assistant Relay
//!
//! This crate contains the pieces shared by the rest of the workspace:
//! - Process configuration
//! - The tool plugin contract and registry
//! - The bundled web-search and page-fetch tools

pub mod config;
pub mod error;
pub mod tool;

pub use config::{ChatApiConfig, Config, SearchApiConfig};
pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
