//! Yandex Cloud API interaction module
//!
//! This module provides the core functionality for interacting with Yandex
//! Cloud control-plane APIs, including authentication, the HTTP client, and
//! hierarchy listing.
//!
//! # Module Structure
//!
//! - [`auth`] - credential normalization and IAM token caching
//! - [`client`] - main client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//! - [`clouds`] - cloud/folder listing and scope resolution
//!
//! # Example
//!
//! ```ignore
//! use ycinv::yc::auth::Credentials;
//! use ycinv::yc::client::YcClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = YcClient::new(Credentials::from_oauth_token("y0_..."))?;
//!     let clouds = ycinv::yc::clouds::list_clouds(&client).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod clouds;
pub mod http;
