//! REST client for the asset-management sub-category endpoints.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::domain::{Node, SubCategoryUpdate};
use crate::infrastructure::traits::{
    KeyValueStore, SourceError, SourceResult, SubCategorySource, ACCESS_TOKEN_KEY,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub item_count: u64,
    pub items_per_page: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Response envelope used by every endpoint of the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    pub data: T,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
}

/// A node list as found in a response body or a JSON file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodesPayload {
    Envelope(ApiResponse<Vec<Node>>),
    Bare(Vec<Node>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodePayload {
    Envelope(ApiResponse<Node>),
    Bare(Node),
}

/// Decode either an `ApiResponse` envelope or a bare array of nodes.
pub fn decode_nodes(body: &str, context: &str) -> SourceResult<Vec<Node>> {
    let payload: NodesPayload = serde_json::from_str(body).map_err(|e| SourceError::Decode {
        context: context.to_string(),
        source: e,
    })?;
    Ok(match payload {
        NodesPayload::Envelope(response) => response.data,
        NodesPayload::Bare(nodes) => nodes,
    })
}

/// Decode a single node, enveloped or bare.
pub fn decode_node(body: &str, context: &str) -> SourceResult<Node> {
    let payload: NodePayload = serde_json::from_str(body).map_err(|e| SourceError::Decode {
        context: context.to_string(),
        source: e,
    })?;
    Ok(match payload {
        NodePayload::Envelope(response) => response.data,
        NodePayload::Bare(node) => node,
    })
}

/// Sub-category source backed by the REST API.
pub struct HttpSubCategorySource {
    client: Client,
    base_url: Url,
    store: Arc<dyn KeyValueStore>,
}

impl HttpSubCategorySource {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        store: Arc<dyn KeyValueStore>,
    ) -> SourceResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| SourceError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            store,
        })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> SourceResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn access_token(&self) -> SourceResult<Option<String>> {
        let token = self
            .store
            .get(ACCESS_TOKEN_KEY)
            .map_err(|e| SourceError::Io {
                context: "read access token".to_string(),
                source: e,
            })?;
        Ok(token.filter(|t| !t.trim().is_empty()))
    }

    /// Send with JSON accept header and bearer token; returns the body of a
    /// successful response. A 404 becomes `not_found` when one is given.
    fn send(
        &self,
        request: RequestBuilder,
        url: &Url,
        not_found: Option<SourceError>,
    ) -> SourceResult<String> {
        let mut request = request.header("Accept", "application/json");
        if let Some(token) = self.access_token()? {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            if let Some(e) = not_found {
                debug!("{}: not found", url);
                return Err(e);
            }
        }

        let body = response.text()?;
        if !status.is_success() {
            error!("sub-category request failed: {} {} {}", url, status, body);
            return Err(SourceError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    #[instrument(level = "debug", skip(self, query, not_found))]
    fn get_nodes(
        &self,
        url: Url,
        query: &[(&str, &str)],
        not_found: Option<SourceError>,
    ) -> SourceResult<Vec<Node>> {
        debug!("GET {}", url);
        let request = self.client.get(url.clone()).query(query);
        let body = self.send(request, &url, not_found)?;
        let nodes = decode_nodes(&body, url.as_str())?;
        debug!("GET {}: {} nodes", url, nodes.len());
        Ok(nodes)
    }
}

impl SubCategorySource for HttpSubCategorySource {
    fn fetch_hierarchy(&self, category_id: &str) -> SourceResult<Vec<Node>> {
        // Not every deployment serves the nested tree; callers fall back
        // to the flat list, which reports unknown categories itself.
        let url = self.endpoint(&["v1", "sub-category", "hierarchy", category_id])?;
        self.get_nodes(url, &[], Some(SourceError::HierarchyUnsupported))
    }

    fn fetch_flat_list(&self, category_id: Option<&str>) -> SourceResult<Vec<Node>> {
        match category_id {
            Some(id) => {
                let url = self.endpoint(&["v1", "category", id, "sub-category"])?;
                self.get_nodes(url, &[], Some(SourceError::CategoryNotFound(id.to_string())))
            }
            None => {
                let url = self.endpoint(&["v1", "sub-category"])?;
                self.get_nodes(url, &[("all", "true")], None)
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn fetch_one(&self, id: &str) -> SourceResult<Node> {
        let url = self.endpoint(&["v1", "sub-category", id])?;
        debug!("GET {}", url);
        let request = self.client.get(url.clone());
        let body = self.send(
            request,
            &url,
            Some(SourceError::SubCategoryNotFound(id.to_string())),
        )?;
        decode_node(&body, url.as_str())
    }

    #[instrument(level = "debug", skip(self, payload))]
    fn update(&self, id: &str, payload: &SubCategoryUpdate) -> SourceResult<()> {
        let url = self.endpoint(&["v1", "sub-category", id])?;
        debug!("PUT {} parent={:?}", url, payload.parent_id);
        let request = self.client.put(url.clone()).json(payload);
        self.send(
            request,
            &url,
            Some(SourceError::SubCategoryNotFound(id.to_string())),
        )?;
        Ok(())
    }
}
