//! Yandex Cloud resource inventory and utilization collector.
//!
//! The crate walks an account's organizational hierarchy (clouds →
//! folders), enumerates compute and network resources inside it, and
//! summarizes instance CPU usage from the Monitoring API.
//!
//! # Module Structure
//!
//! - [`yc`] - provider plumbing: credentials, IAM token cache, HTTP
//!   transport, cloud/folder listing
//! - [`inventory`] - typed resource listing and the full hierarchy walk
//! - [`monitoring`] - CPU time-series aggregation and tier classification
//! - [`config`] - persistent CLI configuration
//!
//! # Example
//!
//! ```ignore
//! use ycinv::yc::auth::Credentials;
//! use ycinv::yc::client::YcClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let credentials = Credentials::from_key_file("sa-key.json".as_ref())?;
//!     let client = YcClient::new(credentials)?;
//!     let summary = ycinv::inventory::discover_all(&client).await;
//!     println!("{} resources", summary.total_resources);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod inventory;
pub mod monitoring;
pub mod yc;

pub use error::{Error, Result};
