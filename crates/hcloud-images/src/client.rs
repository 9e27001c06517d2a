//! Asynchronous client for the `/images` collection.

use crate::models::{Architecture, Image, ImageListParams, UpdateImageRequest};
use crate::Result;
use hcloud_core::{Envelope, HcloudConfig, HttpTransport, ResourceApi, Transport};
use std::sync::Arc;
use tracing::debug;

/// Typed access to images.
#[derive(Debug, Clone)]
pub struct ImagesClient {
    api: ResourceApi<Image>,
}

impl ImagesClient {
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

    /// Fetch one page of images.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn list(&self, params: &ImageListParams) -> Result<Envelope<Image>> {
        self.api.list(params).await
    }

    /// Fetch every image matching `params`, following pages until a short one.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; partial results are discarded.
    pub async fn all(&self, params: &ImageListParams) -> Result<Vec<Image>> {
        self.api.all(params).await
    }

    /// Fetch an image by id; `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<Image>> {
        self.api.get_by_id(id).await
    }

    /// Fetch an image by its unique name.
    ///
    /// Names are only unique per architecture, so the lookup can be narrowed
    /// with `architecture`.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn get_by_name(
        &self,
        name: &str,
        architecture: Option<Architecture>,
    ) -> Result<Option<Image>> {
        let mut params = ImageListParams::default().with_name(name);
        if let Some(architecture) = architecture {
            params = params.with_architecture(architecture);
        }

        let image = self.api.find_first(&params).await?;
        if image.is_none() {
            debug!(name, "no image with this name");
        }
        Ok(image)
    }

    /// Update the description, type or labels of an image.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn update(&self, id: u64, request: &UpdateImageRequest) -> Result<Image> {
        self.api.update(id, request).await
    }

    /// Delete an image.
    ///
    /// # Errors
    ///
    /// Returns the transport or API error.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.api.delete(id).await
    }
}
