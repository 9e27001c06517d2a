//! Typed response envelope.
//!
//! A successful body has the shape
//! `{ "meta": { "pagination": {...} }, "<key>": <object or array> }`. The key is
//! the resource's singular key for single-resource endpoints and its plural key
//! for collections; [`Envelope`] holds exactly one of the two, together with the
//! response headers.

use crate::parse::{parse_many, parse_one};
use crate::resource::Resource;
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `meta` block of a response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    /// Pagination state, present on list responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Server-reported pagination state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number.
    pub page: u32,
    /// Entries per page.
    pub per_page: u32,
    /// Previous page number, if any.
    #[serde(default)]
    pub previous_page: Option<u32>,
    /// Next page number, if any.
    #[serde(default)]
    pub next_page: Option<u32>,
    /// Last page number, if known.
    #[serde(default)]
    pub last_page: Option<u32>,
    /// Total number of entries, if known.
    #[serde(default)]
    pub total_entries: Option<u64>,
}

impl Pagination {
    /// Total number of pages, as reported through `last_page`.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.last_page
    }

    /// Returns true when the server announced a following page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next_page.is_some()
    }
}

/// Rate-limit counters sent with every response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    /// `RateLimit-Limit`: requests allowed per window.
    pub limit: Option<u64>,
    /// `RateLimit-Remaining`: requests left in the window.
    pub remaining: Option<u64>,
    /// `RateLimit-Reset`: UNIX timestamp at which the window refills.
    pub reset: Option<i64>,
}

impl RateLimit {
    /// Read the counters from response headers.
    ///
    /// Returns `None` when none of the three headers is present.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let rate_limit = Self {
            limit: header_number(headers, "ratelimit-limit"),
            remaining: header_number(headers, "ratelimit-remaining"),
            reset: header_number(headers, "ratelimit-reset"),
        };
        (rate_limit != Self::default()).then_some(rate_limit)
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// The payload of an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<R> {
    /// A single resource under the singular key.
    One(R),
    /// A collection under the plural key.
    Many(Vec<R>),
}

/// A decoded success response for resource type `R`.
#[derive(Debug, Clone)]
pub struct Envelope<R> {
    meta: Option<Meta>,
    payload: Payload<R>,
    slots: usize,
    headers: HeaderMap,
}

impl<R: Resource> Envelope<R> {
    /// Build a single-resource envelope from a response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the singular key is missing or the
    /// resource cannot be decoded.
    pub fn one(body: Value, headers: HeaderMap) -> Result<Self> {
        let (meta, value) = split_body(body, R::SINGULAR_KEY)?;
        Ok(Self {
            meta,
            payload: Payload::One(parse_one(value)?),
            slots: 1,
            headers,
        })
    }

    /// Build a collection envelope from a response body.
    ///
    /// `null` entries are dropped from the collection but still count as
    /// slots for [`Envelope::page_len`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the plural key is missing or any
    /// resource cannot be decoded.
    pub fn many(body: Value, headers: HeaderMap) -> Result<Self> {
        let (meta, value) = split_body(body, R::PLURAL_KEY)?;
        let slots = value.as_array().map_or(0, Vec::len);
        Ok(Self {
            meta,
            payload: Payload::Many(parse_many(value)?),
            slots,
            headers,
        })
    }
}

impl<R> Envelope<R> {
    /// The `meta` block, if the response had one.
    #[must_use]
    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    /// Pagination state, if the response had any.
    #[must_use]
    pub fn pagination(&self) -> Option<&Pagination> {
        self.meta.as_ref().and_then(|meta| meta.pagination.as_ref())
    }

    /// The payload.
    #[must_use]
    pub fn payload(&self) -> &Payload<R> {
        &self.payload
    }

    /// The single resource, for envelopes built with [`Envelope::one`].
    #[must_use]
    pub fn resource(&self) -> Option<&R> {
        match &self.payload {
            Payload::One(resource) => Some(resource),
            Payload::Many(_) => None,
        }
    }

    /// The resources carried by the envelope, in server order.
    #[must_use]
    pub fn resources(&self) -> &[R] {
        match &self.payload {
            Payload::One(resource) => std::slice::from_ref(resource),
            Payload::Many(resources) => resources,
        }
    }

    /// Take the single resource, for envelopes built with [`Envelope::one`].
    #[must_use]
    pub fn into_resource(self) -> Option<R> {
        match self.payload {
            Payload::One(resource) => Some(resource),
            Payload::Many(_) => None,
        }
    }

    /// Take the resources, in server order.
    #[must_use]
    pub fn into_resources(self) -> Vec<R> {
        match self.payload {
            Payload::One(resource) => vec![resource],
            Payload::Many(resources) => resources,
        }
    }

    /// Number of entries the server sent, including dropped `null` entries.
    #[must_use]
    pub const fn page_len(&self) -> usize {
        self.slots
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Rate-limit counters from the response headers.
    #[must_use]
    pub fn rate_limit(&self) -> Option<RateLimit> {
        RateLimit::from_headers(&self.headers)
    }
}

fn split_body(body: Value, key: &str) -> Result<(Option<Meta>, Value)> {
    let Value::Object(mut map) = body else {
        return Err(Error::ParseError(format!(
            "expected a JSON object carrying `{key}`"
        )));
    };

    let value = map
        .remove(key)
        .ok_or_else(|| Error::ParseError(format!("response is missing `{key}`")))?;
    let meta = match map.remove("meta") {
        Some(Value::Null) | None => None,
        Some(meta) => Some(
            serde_json::from_value(meta)
                .map_err(|err| Error::ParseError(format!("invalid `meta` block: {err}")))?,
        ),
    };

    Ok((meta, value))
}
