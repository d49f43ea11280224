//! Platform API interaction module
//!
//! # Module Structure
//!
//! - [`api`] - gateway API resource types and the verb set
//! - [`client`] - main client and the `apis` collection operations
//! - [`http`] - HTTP utilities for REST API calls
//! - [`qualified_name`] - `/namespace/package/entity` name parsing
//!
//! # Example
//!
//! ```ignore
//! use wsk_api::whisk::client::WhiskClient;
//!
//! async fn example(config: &ClientConfig) -> anyhow::Result<()> {
//!     let client = WhiskClient::new(config)?;
//!     let apis = client.apis().list(&Default::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod http;
pub mod qualified_name;
