//! # hcloud-core
//!
//! Shared resource-access layer for the Hetzner Cloud REST API.
//!
//! Every resource collection exposed by the API (images, placement groups, ...)
//! follows the same contract: a list endpoint accepting a common set of filters,
//! a `meta.pagination` block, a singular or plural payload key, and an `error`
//! object on failure. This crate implements that contract once so resource crates
//! only have to declare their wire keys and models.
//!
//! ## Modules
//!
//! - [`query`] - Query string construction from optional filters
//! - [`envelope`] - Typed response envelope with pagination metadata and headers
//! - [`classify`] - Detection of failed responses and API error extraction
//! - [`parse`] - Conversion of decoded JSON into typed resources
//! - [`pagination`] - Multi-page listing
//! - [`resource`] - The per-resource contract and generic resource operations
//! - [`transport`] - The HTTP seam and its `reqwest` implementation
//! - [`config`] - Client configuration
//! - [`client`] - HTTP client tuning knobs
//! - [`error`] - Error types

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod pagination;
pub mod parse;
pub mod query;
pub mod resource;
pub mod transport;

// Re-export commonly used types
pub use config::HcloudConfig;
pub use envelope::{Envelope, Meta, Pagination, RateLimit};
pub use error::{ApiError, Error, Result};
pub use query::{ListOptions, ListQuery, QueryParams};
pub use resource::{Resource, ResourceApi};
pub use transport::{ApiRequest, HttpTransport, RawResponse, Transport};
