//! Multi-page listing.
//!
//! [`ResourceApi::all`] walks the list endpoint page by page, one request at a
//! time, and concatenates the results in server order. A page shorter than the
//! requested page size ends the walk; when the last page is exactly full, one
//! extra request for the following (empty) page is made. Any failure aborts the
//! walk and discards what was collected.
//!
//! The page size must lie in `1..=MAX_PER_PAGE`; the server caps larger pages
//! and a size of zero never produces a short page.

use crate::config::MAX_PER_PAGE;
use crate::query::ListQuery;
use crate::resource::{Resource, ResourceApi};
use crate::{Error, Result};
use tracing::debug;

impl<R: Resource> ResourceApi<R> {
    /// Fetch every resource matching `params`, across all pages.
    ///
    /// Listing starts at `params`' page (default 1). When `params` sets no page
    /// size, the configured default is requested.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] without sending a request when the
    /// page size is outside `1..=MAX_PER_PAGE`. Otherwise returns the first
    /// transport, API or parse error encountered; no partial result is
    /// returned.
    pub async fn all(&self, params: &R::ListParams) -> Result<Vec<R>> {
        let mut query = params.clone();
        let per_page = *query
            .options_mut()
            .per_page
            .get_or_insert(self.default_per_page);
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(Error::ValidationError(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}"
            )));
        }
        let mut page = query.options().page.unwrap_or(1);
        let mut resources = Vec::new();

        loop {
            query.options_mut().page = Some(page);
            let envelope = self.list(&query).await?;
            let received = envelope.page_len();
            debug!(
                resource = R::PLURAL_KEY,
                page,
                per_page,
                received,
                "fetched page"
            );
            resources.extend(envelope.into_resources());

            if received != per_page as usize {
                break;
            }
            match page.checked_add(1) {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(resources)
    }
}
