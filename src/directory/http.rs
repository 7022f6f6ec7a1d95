//! HTTP directory source.
//!
//! Queries a user-directory endpoint with a GET request and decodes a JSON
//! array of objects into candidates. The searchable and insert fields are
//! configurable; entries missing the searchable field are dropped rather
//! than rendered broken.

use serde_json::Value;
use tracing::{debug, warn};

use super::{Candidate, DirectoryError, DirectorySource, LookupFuture};

/// Default query-string parameter name.
const DEFAULT_QUERY_PARAM: &str = "q";

/// Default JSON field holding the display label.
const DEFAULT_LABEL_FIELD: &str = "name";

/// Directory source backed by an HTTP JSON endpoint.
///
/// The endpoint is expected to answer
/// `GET <endpoint>?<query_param>=<query>` with a JSON array of objects,
/// e.g. `[{"name": "Ada Lovelace"}, ...]`. Server-side filtering is
/// assumed; whatever comes back is decoded in order.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    endpoint: String,
    query_param: String,
    label_field: String,
    insert_field: Option<String>,
}

impl HttpSource {
    /// Creates a source for the given endpoint URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            label_field: DEFAULT_LABEL_FIELD.to_string(),
            insert_field: None,
        }
    }

    /// Overrides the query-string parameter name.
    #[must_use]
    pub fn with_query_param(mut self, param: impl Into<String>) -> Self {
        self.query_param = param.into();
        self
    }

    /// Overrides the JSON field read as the display label.
    #[must_use]
    pub fn with_label_field(mut self, field: impl Into<String>) -> Self {
        self.label_field = field.into();
        self
    }

    /// Reads the insertion payload from a separate JSON field; falls back
    /// to the label when the field is absent on an entry.
    #[must_use]
    pub fn with_insert_field(mut self, field: impl Into<String>) -> Self {
        self.insert_field = Some(field.into());
        self
    }

    /// Decodes a JSON array into candidates, dropping malformed entries.
    fn decode_entries(&self, values: &[Value]) -> Vec<Candidate> {
        let mut dropped = 0_usize;
        let candidates: Vec<Candidate> = values
            .iter()
            .filter_map(|value| {
                let label = value.get(&self.label_field).and_then(Value::as_str);
                let Some(label) = label.filter(|l| !l.is_empty()) else {
                    dropped += 1;
                    return None;
                };

                let insert = self
                    .insert_field
                    .as_deref()
                    .and_then(|field| value.get(field))
                    .and_then(Value::as_str)
                    .filter(|i| !i.is_empty());

                Some(match insert {
                    Some(insert) => Candidate::new(label).with_insert(insert),
                    None => Candidate::new(label),
                })
            })
            .collect();

        if dropped > 0 {
            warn!(dropped, "dropped malformed directory entries");
        }
        candidates
    }
}

impl DirectorySource for HttpSource {
    fn id(&self) -> &str {
        "http"
    }

    fn lookup(&self, query: &str) -> LookupFuture {
        let source = self.clone();
        let query = query.to_string();

        Box::pin(async move {
            debug!(endpoint = %source.endpoint, %query, "directory lookup");

            let response = source
                .client
                .get(&source.endpoint)
                .query(&[(source.query_param.as_str(), query.as_str())])
                .send()
                .await
                .map_err(|e| DirectoryError::Transport(e.to_string()))?
                .error_for_status()
                .map_err(|e| DirectoryError::Transport(e.to_string()))?;

            let values: Vec<Value> = response
                .json()
                .await
                .map_err(|e| DirectoryError::Decode(e.to_string()))?;

            Ok(source.decode_entries(&values))
        })
    }
}
