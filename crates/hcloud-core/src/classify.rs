//! Detection of failed responses.
//!
//! A response is a failure when its status is outside `200..=299` or when its body
//! carries a top-level `error` key, whatever the status says. Every resource
//! operation passes its response through [`check`], which decodes the body once
//! and hands the decoded value on to the envelope.

use crate::error::{ApiError, ErrorResponse};
use crate::transport::RawResponse;
use crate::{Error, Result};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

/// Returns true when a response with this status and decoded body must be
/// treated as a failure.
///
/// Presence of the top-level `error` key is enough, whatever its value:
/// `{"error": null}` on a 2xx response is a failure too.
#[must_use]
pub fn has_error(status: StatusCode, body: &Value) -> bool {
    !status.is_success() || body.as_object().is_some_and(|map| map.contains_key("error"))
}

/// Build the API error carried by a failed response's decoded body.
///
/// A body without a decodable `error` object yields a generic error with code
/// [`crate::error::INVALID_ERROR_BODY`] instead of a parse failure.
#[must_use]
pub fn api_error(status: StatusCode, body: Value) -> ApiError {
    let status = status.as_u16();
    match serde_json::from_value::<ErrorResponse>(body) {
        Ok(decoded) => ApiError::from_detail(status, decoded.error),
        Err(_) => ApiError::undecodable(status),
    }
}

/// Decode the body once and classify the response.
///
/// Returns the decoded body of a successful response, ready for the envelope.
///
/// # Errors
///
/// Returns [`Error::Api`] for any failed response, and [`Error::ParseError`]
/// for a successful response whose body is not JSON.
pub fn check(response: &RawResponse) -> Result<Value> {
    let status = response.status;
    let body = match response.json() {
        Ok(body) => body,
        Err(err) if status.is_success() => return Err(err),
        Err(_) => return Err(Error::Api(ApiError::undecodable(status.as_u16()))),
    };

    if !has_error(status, &body) {
        return Ok(body);
    }

    let error = api_error(status, body);
    if status.is_success() {
        warn!(
            status = status.as_u16(),
            code = %error.code,
            "error object in successful response"
        );
    }
    Err(Error::Api(error))
}
