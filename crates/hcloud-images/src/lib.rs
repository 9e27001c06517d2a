//! Image client and data models for the Hetzner Cloud API.
//!
//! Provides strongly typed models and an asynchronous client for the `/images`
//! collection: system images, snapshots, backups and app images.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ImagesClient;
pub use models::{
    Architecture, CreatedFrom, Image, ImageListParams, ImageStatus, ImageType, Protection,
    UpdateImageRequest,
};

/// Convenient result alias using the shared error type.
pub type Result<T> = hcloud_core::Result<T>;
