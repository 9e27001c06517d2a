//! The per-resource contract and the operations shared by every resource.
//!
//! A resource type declares its wire keys, its collection path and its filter
//! type by implementing [`Resource`]. [`ResourceApi`] then provides list, get,
//! create, update and delete on top of any [`Transport`]; concrete clients wrap
//! it with typed method names.

use crate::classify;
use crate::config::MAX_PER_PAGE;
use crate::envelope::Envelope;
use crate::query::ListQuery;
use crate::transport::{ApiRequest, Transport};
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error};

/// A resource collection exposed by the API.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Key holding a single resource (e.g. `image`).
    const SINGULAR_KEY: &'static str;
    /// Key holding a collection (e.g. `images`).
    const PLURAL_KEY: &'static str;
    /// Collection path relative to the API base URL (e.g. `images`).
    const PATH: &'static str;
    /// Filters accepted by the list endpoint.
    type ListParams: ListQuery;
}

/// Generic operations for resource type `R`.
pub struct ResourceApi<R> {
    transport: Arc<dyn Transport>,
    pub(crate) default_per_page: u32,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceApi<R> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            default_per_page: self.default_per_page,
            _resource: PhantomData,
        }
    }
}

impl<R> fmt::Debug for ResourceApi<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceApi")
            .field("resource", &std::any::type_name::<R>())
            .field("default_per_page", &self.default_per_page)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> ResourceApi<R> {
    /// Create the operations over a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            default_per_page: MAX_PER_PAGE,
            _resource: PhantomData,
        }
    }

    /// Page size requested by [`ResourceApi::all`] when the filter sets none.
    #[must_use]
    pub const fn with_default_per_page(mut self, per_page: u32) -> Self {
        self.default_per_page = per_page;
        self
    }

    /// The transport used by this instance.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Fetch one page of resources.
    ///
    /// # Errors
    ///
    /// Returns the transport error, the API error, or a parse error.
    pub async fn list(&self, params: &R::ListParams) -> Result<Envelope<R>> {
        let path = format!("{}{}", R::PATH, params.to_query_string());
        let (body, headers) = self.send(ApiRequest::get(path)).await?;
        Envelope::many(body, headers)
    }

    /// Fetch a resource by id.
    ///
    /// Returns `Ok(None)` when the API reports the resource as not found.
    ///
    /// # Errors
    ///
    /// Returns any other transport, API or parse error.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<R>> {
        let path = format!("{}/{id}", R::PATH);
        match self.send(ApiRequest::get(path)).await {
            Ok((body, headers)) => Ok(Envelope::<R>::one(body, headers)?.into_resource()),
            Err(err) if err.is_not_found() => {
                debug!(resource = R::SINGULAR_KEY, id, "resource not found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// First resource of the page selected by `params`, if any.
    ///
    /// Name lookups use this with a `name` filter: zero matches is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error of the list call.
    pub async fn find_first(&self, params: &R::ListParams) -> Result<Option<R>> {
        Ok(self.list(params).await?.into_resources().into_iter().next())
    }

    /// Create a resource; the response carries it under the singular key.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn create<B>(&self, body: &B) -> Result<Envelope<R>>
    where
        B: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        let (body, headers) = self.send(ApiRequest::post(R::PATH, body)).await?;
        Envelope::one(body, headers)
    }

    /// Update a resource and return its new state.
    ///
    /// # Errors
    ///
    /// Returns the transport, API or parse error.
    pub async fn update<B>(&self, id: u64, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
    {
        let path = format!("{}/{id}", R::PATH);
        let body = serde_json::to_value(body)?;
        let (body, headers) = self.send(ApiRequest::put(path, body)).await?;
        Envelope::<R>::one(body, headers)?
            .into_resource()
            .ok_or_else(|| Error::ParseError(format!("response is missing `{}`", R::SINGULAR_KEY)))
    }

    /// Delete a resource.
    ///
    /// # Errors
    ///
    /// Returns the transport or API error.
    pub async fn delete(&self, id: u64) -> Result<()> {
        let path = format!("{}/{id}", R::PATH);
        self.send(ApiRequest::delete(path)).await.map(|_| ())
    }

    /// Execute, classify, and return the decoded success body with its headers.
    async fn send(&self, request: ApiRequest) -> Result<(Value, HeaderMap)> {
        let method = request.method.clone();
        let path = request.path.clone();
        let result = self
            .transport
            .execute(request)
            .await
            .and_then(|response| {
                let body = classify::check(&response)?;
                Ok((body, response.headers))
            });

        if let Err(err) = &result {
            if err.should_log() {
                error!(
                    %method,
                    %path,
                    code = err.error_code(),
                    error = %err,
                    "hcloud request failed"
                );
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ListOptions;
    use crate::transport::{MockTransport, RawResponse};
    use mockall::predicate::eq;
    use reqwest::{Method, StatusCode};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct Network {
        id: u64,
        name: String,
    }

    impl Resource for Network {
        const SINGULAR_KEY: &'static str = "network";
        const PLURAL_KEY: &'static str = "networks";
        const PATH: &'static str = "networks";
        type ListParams = ListOptions;
    }

    fn api(mock: MockTransport) -> ResourceApi<Network> {
        ResourceApi::new(Arc::new(mock))
    }

    fn not_found() -> RawResponse {
        RawResponse::from_json(
            StatusCode::NOT_FOUND,
            &json!({ "error": { "code": "not_found", "message": "network not found" } }),
        )
    }

    #[tokio::test]
    async fn list_builds_path_with_query() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .with(eq(ApiRequest::get("networks?name=lan&per_page=5")))
            .times(1)
            .returning(|_| {
                Ok(RawResponse::from_json(
                    StatusCode::OK,
                    &json!({ "networks": [{ "id": 1, "name": "lan" }] }),
                ))
            });

        let params = ListOptions::default().with_name("lan").with_per_page(5);
        let envelope = api(mock).list(&params).await.unwrap();
        assert_eq!(envelope.resources()[0].name, "lan");
    }

    #[tokio::test]
    async fn get_by_id_returns_resource() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .with(eq(ApiRequest::get("networks/4")))
            .times(1)
            .returning(|_| {
                Ok(RawResponse::from_json(
                    StatusCode::OK,
                    &json!({ "network": { "id": 4, "name": "backend" } }),
                ))
            });

        let network = api(mock).get_by_id(4).await.unwrap();
        assert_eq!(network.map(|n| n.name), Some("backend".to_string()));
    }

    #[tokio::test]
    async fn get_by_id_not_found_is_absent() {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(1).returning(|_| Ok(not_found()));

        assert_eq!(api(mock).get_by_id(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_by_id_other_errors_propagate() {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(RawResponse::from_json(
                StatusCode::FORBIDDEN,
                &json!({ "error": { "code": "forbidden", "message": "no access" } }),
            ))
        });

        let err = api(mock).get_by_id(1).await.unwrap_err();
        assert_eq!(err.error_code(), "forbidden");
    }

    #[tokio::test]
    async fn transport_errors_pass_through_unchanged() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Err(Error::Timeout("deadline exceeded".into())));

        let err = api(mock).get_by_id(1).await.unwrap_err();
        assert_eq!(err, Error::Timeout("deadline exceeded".into()));
    }

    #[tokio::test]
    async fn find_first_returns_first_match() {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(RawResponse::from_json(
                StatusCode::OK,
                &json!({ "networks": [{ "id": 1, "name": "a" }, { "id": 2, "name": "a" }] }),
            ))
        });

        let params = ListOptions::default().with_name("a");
        let network = api(mock).find_first(&params).await.unwrap();
        assert_eq!(network.map(|n| n.id), Some(1));
    }

    #[tokio::test]
    async fn find_first_without_match_is_absent() {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(RawResponse::from_json(StatusCode::OK, &json!({ "networks": [] })))
        });

        let params = ListOptions::default().with_name("missing");
        assert_eq!(api(mock).find_first(&params).await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_posts_body_and_reads_singular_key() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .withf(|request| {
                request.method == Method::POST
                    && request.path == "networks"
                    && request.body == Some(json!({ "name": "lan" }))
            })
            .times(1)
            .returning(|_| {
                Ok(RawResponse::from_json(
                    StatusCode::CREATED,
                    &json!({ "network": { "id": 10, "name": "lan" } }),
                ))
            });

        let envelope = api(mock).create(&json!({ "name": "lan" })).await.unwrap();
        assert_eq!(envelope.resource().map(|n| n.id), Some(10));
    }

    #[tokio::test]
    async fn update_puts_body() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .withf(|request| request.method == Method::PUT && request.path == "networks/10")
            .times(1)
            .returning(|_| {
                Ok(RawResponse::from_json(
                    StatusCode::OK,
                    &json!({ "network": { "id": 10, "name": "renamed" } }),
                ))
            });

        let network = api(mock)
            .update(10, &json!({ "name": "renamed" }))
            .await
            .unwrap();
        assert_eq!(network.name, "renamed");
    }

    #[tokio::test]
    async fn delete_accepts_empty_body() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .with(eq(ApiRequest::delete("networks/10")))
            .times(1)
            .returning(|_| {
                Ok(RawResponse::new(
                    StatusCode::NO_CONTENT,
                    reqwest::header::HeaderMap::new(),
                    bytes::Bytes::new(),
                ))
            });

        api(mock).delete(10).await.unwrap();
    }

    #[tokio::test]
    async fn delete_surfaces_api_errors() {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(RawResponse::from_json(
                StatusCode::LOCKED,
                &json!({ "error": { "code": "locked", "message": "resource is locked" } }),
            ))
        });

        let err = api(mock).delete(10).await.unwrap_err();
        assert!(matches!(err, Error::Api(ref api) if api.code == "locked"));
    }

    #[tokio::test]
    async fn server_errors_are_returned_after_logging() {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(RawResponse::from_json(
                StatusCode::SERVICE_UNAVAILABLE,
                &json!({ "error": { "code": "unavailable", "message": "maintenance" } }),
            ))
        });

        let err = api(mock).list(&ListOptions::default()).await.unwrap_err();
        assert!(err.should_log());
        assert_eq!(err.error_code(), "unavailable");
    }

    #[tokio::test]
    async fn null_error_key_in_success_body_fails_the_call() {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(RawResponse::from_json(
                StatusCode::OK,
                &json!({ "network": { "id": 1, "name": "lan" }, "error": null }),
            ))
        });

        let err = api(mock).get_by_id(1).await.unwrap_err();
        assert!(matches!(err, Error::Api(ref api) if api.status == 200));
    }
}
