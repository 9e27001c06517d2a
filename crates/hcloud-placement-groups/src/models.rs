//! Placement group models.

use chrono::{DateTime, Utc};
use hcloud_core::parse::deserialize_skip_nulls;
use hcloud_core::query::{ListOptions, ListQuery, QueryParams};
use hcloud_core::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Placement strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementGroupType {
    /// Servers are placed on distinct physical hosts.
    #[default]
    Spread,
}

impl PlacementGroupType {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Spread => "spread",
        }
    }
}

impl fmt::Display for PlacementGroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representation of a placement group as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacementGroup {
    /// Placement group id.
    pub id: u64,
    /// Unique name.
    pub name: String,
    /// User-defined labels.
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Placement strategy.
    #[serde(rename = "type")]
    pub r#type: PlacementGroupType,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Ids of the member servers.
    #[serde(default, deserialize_with = "deserialize_skip_nulls")]
    pub servers: Vec<u64>,
}

impl Resource for PlacementGroup {
    const SINGULAR_KEY: &'static str = "placement_group";
    const PLURAL_KEY: &'static str = "placement_groups";
    const PATH: &'static str = "placement_groups";
    type ListParams = PlacementGroupListParams;
}

/// Parameters supported by the `/placement_groups` list endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlacementGroupListParams {
    /// Name, label selector, sort and paging.
    pub options: ListOptions,
    /// Filter by placement strategy.
    pub types: Vec<PlacementGroupType>,
}

impl PlacementGroupListParams {
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

    /// Add a type filter.
    #[must_use]
    pub fn with_type(mut self, group_type: PlacementGroupType) -> Self {
        self.types.push(group_type);
        self
    }
}

impl ListQuery for PlacementGroupListParams {
    fn options(&self) -> &ListOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ListOptions {
        &mut self.options
    }

    fn append_filters(&self, params: &mut QueryParams) {
        params.push_all("type", &self.types);
    }
}

/// Body of a create request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatePlacementGroupRequest {
    /// Unique name.
    pub name: String,
    /// Placement strategy.
    #[serde(rename = "type")]
    pub r#type: PlacementGroupType,
    /// Labels; omitted from the body when empty.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

impl CreatePlacementGroupRequest {
    /// Request with no labels.
    #[must_use]
    pub fn new(name: impl Into<String>, group_type: PlacementGroupType) -> Self {
        Self {
            name: name.into(),
            r#type: group_type,
            labels: HashMap::new(),
        }
    }

    /// Attach labels.
    #[must_use]
    pub fn with_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.labels = labels;
        self
    }
}

/// Mutable placement group attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdatePlacementGroupRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}
