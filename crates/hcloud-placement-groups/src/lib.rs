//! Placement group client and data models for the Hetzner Cloud API.
//!
//! Placement groups control how servers are spread across physical hosts.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::PlacementGroupsClient;
pub use models::{
    CreatePlacementGroupRequest, PlacementGroup, PlacementGroupListParams, PlacementGroupType,
    UpdatePlacementGroupRequest,
};

/// Convenient result alias using the shared error type.
pub type Result<T> = hcloud_core::Result<T>;
