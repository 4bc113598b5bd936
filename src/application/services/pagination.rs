use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;
use tracing::debug;

use crate::application::services::access_policy::AccessPolicy;
use crate::constants::PAGE_SIZE;
use crate::error::CrawlerError;
use crate::transport::http_client::RequestGateway;
use crate::transport::model::EdgeList;

/// One cursor-driven walk over a GraphQL connection.
#[derive(Debug)]
pub struct ConnectionWalk<'a> {
    /// Full query endpoint URL
    pub url: &'a str,
    pub query_hash: &'a str,
    /// Numeric id of the profile being walked
    pub user_id: &'a str,
    /// Endpoint-specific additions, e.g. `include_reel`
    pub extra_params: &'a [(&'a str, &'a str)],
    /// Where the connection lives in the response document
    pub edge_path: &'a [&'a str],
    /// Whether to pause randomly before each page; timeline walks do
    pub jitter: bool,
}

/// Walks cursor-paginated connections page by page.
///
/// Every page asks for [`PAGE_SIZE`] items and passes the previous page's
/// `end_cursor` as `after`, empty on the first request. Pages are fetched
/// strictly one after another and accumulated items keep exactly the order
/// the API shipped them in. A page that claims `has_next_page` without
/// supplying a cursor ends the walk instead of refetching the same page
/// forever.
pub struct PaginationEngine {
    gateway: Arc<RequestGateway>,
    policy: AccessPolicy,
}

impl PaginationEngine {
    pub fn new(gateway: Arc<RequestGateway>, policy: AccessPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Collects the whole connection, mapping every node through
    /// `map_node`. A mapping failure aborts the walk.
    pub async fn collect<N, T, F>(
        &self,
        walk: ConnectionWalk<'_>,
        mut map_node: F,
    ) -> Result<Vec<T>, CrawlerError>
    where
        N: DeserializeOwned,
        F: FnMut(N) -> Result<T, CrawlerError>,
    {
        let mut items = Vec::new();
        let mut after = String::new();

        loop {
            if walk.jitter {
                sleep(self.policy.page_jitter()).await;
            }

            let mut params: Vec<(&str, String)> = vec![
                ("query_hash", walk.query_hash.to_string()),
                ("id", walk.user_id.to_string()),
                ("first", PAGE_SIZE.to_string()),
                ("after", after.clone()),
            ];
            for &(name, value) in walk.extra_params {
                params.push((name, value.to_string()));
            }

            let payload = self.gateway.fetch(walk.url, &params, None).await?;
            let connection: EdgeList<N> =
                serde_json::from_value(value_at(&payload, walk.edge_path)?.clone())?;

            let EdgeList {
                edges, page_info, ..
            } = connection;
            for edge in edges {
                items.push(map_node(edge.node)?);
            }

            let next = page_info.and_then(|info| {
                if info.has_next_page {
                    info.end_cursor
                } else {
                    None
                }
            });
            match next {
                Some(cursor) => after = cursor,
                None => break,
            }
        }

        debug!("Walk finished with {} items", items.len());
        Ok(items)
    }
}

/// Navigates `path` into `payload`, naming the missing key on failure.
pub(crate) fn value_at<'v>(payload: &'v Value, path: &[&str]) -> Result<&'v Value, CrawlerError> {
    let mut cursor = payload;
    for key in path {
        cursor = cursor
            .get(key)
            .ok_or_else(|| CrawlerError::UnexpectedPayload(format!("response without `{key}`")))?;
    }
    Ok(cursor)
}
