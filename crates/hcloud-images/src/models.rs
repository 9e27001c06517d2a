//! Image models and list filters.

use chrono::{DateTime, Utc};
use hcloud_core::query::{ListOptions, ListQuery, QueryParams};
use hcloud_core::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Operating system image maintained by the provider.
    System,
    /// Image with preinstalled applications.
    App,
    /// Snapshot taken by the user.
    Snapshot,
    /// Automatic server backup.
    Backup,
    /// Short-lived image created during provisioning.
    Temporary,
}

impl ImageType {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::App => "app",
            Self::Snapshot => "snapshot",
            Self::Backup => "backup",
            Self::Temporary => "temporary",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    /// Ready to be used.
    Available,
    /// Still being created.
    Creating,
    /// Not usable.
    Unavailable,
}

impl ImageStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Creating => "creating",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture an image is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// x86_64.
    X86,
    /// aarch64.
    Arm,
}

impl Architecture {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::Arm => "arm",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server an image was created from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedFrom {
    /// Server id.
    pub id: u64,
    /// Server name at creation time.
    pub name: String,
}

/// Protection flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Protection {
    /// Deletion is blocked.
    pub delete: bool,
}

/// Representation of an image as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    /// Image id.
    pub id: u64,
    /// Image type.
    #[serde(rename = "type")]
    pub r#type: ImageType,
    /// Current status.
    pub status: ImageStatus,
    /// Unique name; only set for system and app images.
    #[serde(default)]
    pub name: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Size of the image file in GB.
    #[serde(default)]
    pub image_size: Option<f64>,
    /// Size of the disk contained in the image in GB.
    pub disk_size: f64,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Server the image was created from.
    #[serde(default)]
    pub created_from: Option<CreatedFrom>,
    /// Server the image is bound to (backups only).
    #[serde(default)]
    pub bound_to: Option<u64>,
    /// Operating system flavor (e.g. `ubuntu`, `debian`, `unknown`).
    pub os_flavor: String,
    /// Operating system version.
    #[serde(default)]
    pub os_version: Option<String>,
    /// Whether servers from this image are deployed quickly.
    #[serde(default)]
    pub rapid_deploy: bool,
    /// Protection flags.
    #[serde(default)]
    pub protection: Protection,
    /// Deprecation time, after which the image is no longer offered.
    #[serde(default)]
    pub deprecated: Option<DateTime<Utc>>,
    /// Deletion time.
    #[serde(default)]
    pub deleted: Option<DateTime<Utc>>,
    /// User-defined labels.
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// CPU architecture.
    pub architecture: Architecture,
}

impl Image {
    /// Returns true if the image has been marked deprecated.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.deprecated.is_some()
    }
}

impl Resource for Image {
    const SINGULAR_KEY: &'static str = "image";
    const PLURAL_KEY: &'static str = "images";
    const PATH: &'static str = "images";
    type ListParams = ImageListParams;
}

/// Parameters supported by the `/images` list endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageListParams {
    /// Name, label selector, sort and paging.
    pub options: ListOptions,
    /// Filter by image type.
    pub types: Vec<ImageType>,
    /// Filter by status.
    pub statuses: Vec<ImageStatus>,
    /// Only backups bound to this server.
    pub bound_to: Option<u64>,
    /// Include deprecated images.
    pub include_deprecated: Option<bool>,
    /// Filter by architecture.
    pub architectures: Vec<Architecture>,
}

impl ImageListParams {
    /// Filter by exact name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.options = self.options.with_name(name);
        self
    }

    /// Filter by label selector.
    #[must_use]
    pub fn with_label_selector(mut self, selector: impl Into<String>) -> Self {
        self.options = self.options.with_label_selector(selector);
        self
    }

    /// Add a sort key.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.options = self.options.with_sort(sort);
        self
    }

    /// Request a specific page.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.options = self.options.with_page(page);
        self
    }

    /// Request a page size.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.options = self.options.with_per_page(per_page);
        self
    }

    /// Add an image type filter.
    #[must_use]
    pub fn with_type(mut self, image_type: ImageType) -> Self {
        self.types.push(image_type);
        self
    }

    /// Add a status filter.
    #[must_use]
    pub fn with_status(mut self, status: ImageStatus) -> Self {
        self.statuses.push(status);
        self
    }

    /// Only backups bound to the given server.
    #[must_use]
    pub const fn with_bound_to(mut self, server_id: u64) -> Self {
        self.bound_to = Some(server_id);
        self
    }

    /// Include or exclude deprecated images.
    #[must_use]
    pub const fn with_include_deprecated(mut self, include: bool) -> Self {
        self.include_deprecated = Some(include);
        self
    }

    /// Add an architecture filter.
    #[must_use]
    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architectures.push(architecture);
        self
    }
}

impl ListQuery for ImageListParams {
    fn options(&self) -> &ListOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ListOptions {
        &mut self.options
    }

    fn append_filters(&self, params: &mut QueryParams) {
        params.push_all("type", &self.types);
        params.push_all("status", &self.statuses);
        params.push_opt("bound_to", self.bound_to);
        params.push_opt("include_deprecated", self.include_deprecated);
        params.push_all("architecture", &self.architectures);
    }
}

/// Mutable image attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateImageRequest {
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New type; only converting to `snapshot` is accepted.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<ImageType>,
    /// Replacement labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}
