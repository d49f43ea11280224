//! Command-line management of gateway APIs bound to serverless actions.
//!
//! The binary (`wsk`) parses the command line; this library holds the
//! request builder, the platform client and the rendering helpers.

pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod whisk;

pub use error::{ErrorKind, ExitCode, WskError};
