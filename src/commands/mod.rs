//! Command handlers
//!
//! - [`api`] - create, update, get, delete and list gateway APIs
//! - [`property`] - persist and show client settings

pub mod api;
pub mod property;
