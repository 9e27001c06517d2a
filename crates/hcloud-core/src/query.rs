//! Query string construction for list endpoints.
//!
//! Filters are modelled as plain values with optional fields. Unset fields never
//! reach the query string, array-valued filters repeat their key once per value,
//! and numbers are written as plain integers.

use std::fmt::{self, Display};

use url::form_urlencoded;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append one pair per value, repeating the key.
    pub fn push_all<I, T>(&mut self, key: &'static str, values: I)
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.pairs
            .extend(values.into_iter().map(|value| (key, value.to_string())));
    }

    /// Borrow the collected key/value pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Number of collected pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// URL-encode the pairs, including the leading `?`.
    ///
    /// Returns an empty string when no pair was added.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }

        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(key, value)| (*key, value.as_str())))
            .finish();
        format!("?{encoded}")
    }
}

impl Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Filters shared by every list endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Exact name match.
    pub name: Option<String>,
    /// Label selector expression (e.g. `env=prod,tier!=db`).
    pub label_selector: Option<String>,
    /// Sort keys, each optionally suffixed with `:asc` or `:desc`.
    pub sort: Vec<String>,
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Entries per page.
    pub per_page: Option<u32>,
}

impl ListOptions {
    /// Filter by exact name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Filter by label selector.
    #[must_use]
    pub fn with_label_selector(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = Some(selector.into());
        self
    }

    /// Add a sort key.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort.push(sort.into());
        self
    }

    /// Request a specific page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Request a page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }
}

/// A filter value accepted by a list endpoint.
///
/// Implementors expose the shared [`ListOptions`] and append their own
/// resource-specific pairs; the query string is derived from both.
pub trait ListQuery: Clone + Default + Send + Sync {
    /// Shared list options.
    fn options(&self) -> &ListOptions;

    /// Mutable access to the shared list options.
    fn options_mut(&mut self) -> &mut ListOptions;

    /// Append resource-specific filters.
    fn append_filters(&self, _params: &mut QueryParams) {}

    /// Collect every set field into query pairs.
    fn to_params(&self) -> QueryParams {
        let options = self.options();
        let mut params = QueryParams::new();
        params.push_opt("name", options.name.as_deref());
        params.push_opt("label_selector", options.label_selector.as_deref());
        params.push_all("sort", &options.sort);
        self.append_filters(&mut params);
        params.push_opt("page", options.page);
        params.push_opt("per_page", options.per_page);
        params
    }

    /// Encoded query string including the leading `?`, or empty.
    fn to_query_string(&self) -> String {
        self.to_params().to_query_string()
    }
}

impl ListQuery for ListOptions {
    fn options(&self) -> &ListOptions {
        self
    }

    fn options_mut(&mut self) -> &mut ListOptions {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("name", Option::<String>::None);
        assert!(params.is_empty());
        assert_eq!(params.to_query_string(), "");
    }

    #[test]
    fn push_opt_writes_integers_plainly() {
        let mut params = QueryParams::new();
        params.push_opt("per_page", Some(50u32));
        assert_eq!(params.into_pairs(), vec![("per_page", "50".to_string())]);
    }

    #[test]
    fn push_all_repeats_key() {
        let mut params = QueryParams::new();
        params.push_all("type", ["system", "snapshot"]);
        assert_eq!(params.to_query_string(), "?type=system&type=snapshot");
    }

    #[test]
    fn empty_options_produce_empty_query() {
        assert_eq!(ListOptions::default().to_query_string(), "");
    }

    #[test]
    fn each_set_field_produces_one_pair() {
        let options = ListOptions::default()
            .with_name("web")
            .with_label_selector("env=prod")
            .with_page(2)
            .with_per_page(25);

        let params = options.to_params();
        assert_eq!(params.len(), 4);
        assert_eq!(
            params.pairs(),
            &[
                ("name", "web".to_string()),
                ("label_selector", "env=prod".to_string()),
                ("page", "2".to_string()),
                ("per_page", "25".to_string()),
            ]
        );
    }

    #[test]
    fn sort_keys_are_repeated() {
        let options = ListOptions::default()
            .with_sort("id:asc")
            .with_sort("name:desc");
        assert_eq!(options.to_params().len(), 2);
        assert_eq!(options.to_query_string(), "?sort=id%3Aasc&sort=name%3Adesc");
    }

    #[test]
    fn values_are_url_encoded() {
        let options = ListOptions::default()
            .with_name("my image")
            .with_label_selector("env=prod,tier!=db");
        assert_eq!(
            options.to_query_string(),
            "?name=my+image&label_selector=env%3Dprod%2Ctier%21%3Ddb"
        );
    }

    #[test]
    fn numbers_are_plain_integers() {
        let options = ListOptions::default().with_page(10).with_per_page(50);
        assert_eq!(options.to_query_string(), "?page=10&per_page=50");
    }
}
