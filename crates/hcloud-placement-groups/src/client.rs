//! Asynchronous client for the `/placement_groups` collection.

use crate::models::{
    CreatePlacementGroupRequest, PlacementGroup, PlacementGroupListParams, PlacementGroupType,
    UpdatePlacementGroupRequest,
};
use crate::Result;
use hcloud_core::{Envelope, HcloudConfig, HttpTransport, ResourceApi, Transport};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Typed access to placement groups.
#[derive(Debug, Clone)]
pub struct PlacementGroupsClient {
    api: ResourceApi<PlacementGroup>,
}

impl PlacementGroupsClient {
    /// Create a client over an existing transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            api: ResourceApi::new(transport),
        }
    }

    /// Create a client with its own HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &HcloudConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self {
            api: ResourceApi::new(Arc::new(transport)).with_default_per_page(config.per_page),
        })
    }

    /// Fetch one page of placement groups.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn list(
        &self,
        params: &PlacementGroupListParams,
    ) -> Result<Envelope<PlacementGroup>> {
        self.api.list(params).await
    }

    /// Fetch every placement group matching `params`.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; partial results are discarded.
    pub async fn all(&self, params: &PlacementGroupListParams) -> Result<Vec<PlacementGroup>> {
        self.api.all(params).await
    }

    /// Fetch a placement group by id; `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<PlacementGroup>> {
        self.api.get_by_id(id).await
    }

    /// Fetch a placement group by name.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<PlacementGroup>> {
        let params = PlacementGroupListParams::default().with_name(name);
        self.api.find_first(&params).await
    }

    /// Create a placement group. Empty `labels` are left out of the request.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn create(
        &self,
        name: &str,
        group_type: PlacementGroupType,
        labels: HashMap<String, String>,
    ) -> Result<Envelope<PlacementGroup>> {
        let request = CreatePlacementGroupRequest::new(name, group_type).with_labels(labels);
        let envelope = self.api.create(&request).await?;
        if let Some(group) = envelope.resource() {
            info!(id = group.id, name = %group.name, "placement group created");
        }
        Ok(envelope)
    }

    /// Rename or relabel a placement group.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn update(
        &self,
        id: u64,
        request: &UpdatePlacementGroupRequest,
    ) -> Result<PlacementGroup> {
        self.api.update(id, request).await
    }

    /// Delete a placement group.
    ///
    /// # Errors
    ///
    /// Returns the transport or API error.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.api.delete(id).await
    }
}
