use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::config::HttpConfig;
use crate::error::CrawlerError;
use crate::session::session::Session;

/// HTTP access point every crawl request funnels through.
///
/// Owns the `reqwest` client configured with the session identity (cookie
/// and user agent ride along as default headers) and classifies the bare
/// responses of the private web API, which never reports errors through
/// status codes: it answers an empty JSON document or serves an HTML page
/// instead.
#[derive(Debug)]
pub struct RequestGateway {
    client: Client,
    session: Session,
}

impl RequestGateway {
    pub fn new(session: Session, http: &HttpConfig) -> Result<Self, CrawlerError> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&session.cookie_header())?);
        headers.insert(USER_AGENT, HeaderValue::from_str(session.user_agent())?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(http.timeout))
            .build()?;

        Ok(Self { client, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Issues a GET and classifies the response.
    ///
    /// Returns the parsed JSON payload on success. Otherwise:
    /// - [`CrawlerError::Blocked`] when the body is not JSON, which is what
    ///   a login wall or challenge page looks like from here;
    /// - [`CrawlerError::NotFound`] or [`CrawlerError::PrivateProfile`] when
    ///   the payload is empty, told apart by a single query-less follow-up
    ///   request.
    #[instrument(skip(self, extra_headers))]
    pub async fn fetch(
        &self,
        url: &str,
        params: &[(&str, String)],
        extra_headers: Option<HeaderMap>,
    ) -> Result<Value, CrawlerError> {
        debug!("Sending GET request to {}", url);

        let mut request = self.client.get(url).query(params);
        if let Some(headers) = extra_headers {
            request = request.headers(headers);
        }

        let response = request.send().await?;
        let final_url = response.url().clone();
        let status = response.status();
        let body = response.text().await?;
        debug!("Response status: {}", status);

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Non-JSON response from {}: {:?}", final_url, e);
                return Err(CrawlerError::Blocked);
            }
        };

        if payload_is_empty(&payload) {
            return self.disambiguate_empty_payload(final_url).await;
        }

        Ok(payload)
    }

    /// Tells an unknown resource apart from a private one.
    ///
    /// The API answers the same empty document for both. Re-requesting the
    /// final URL with the query stripped settles it: for a private profile
    /// the request lands on the owner's profile URL, for a missing resource
    /// it stays where it was sent.
    async fn disambiguate_empty_payload(&self, final_url: Url) -> Result<Value, CrawlerError> {
        let mut stripped = final_url;
        stripped.set_query(None);
        debug!("Empty payload, re-requesting {}", stripped);

        let response = self.client.get(stripped.clone()).send().await?;
        if response.url() == &stripped {
            error!("Nothing found behind {}", stripped);
            Err(CrawlerError::NotFound)
        } else {
            debug!("Follow-up to {} landed on {}", stripped, response.url());
            Err(CrawlerError::PrivateProfile)
        }
    }
}

/// Empty means `{}`, `[]`, `null` or `""`; any payload with content,
/// including scalars, counts as non-empty.
fn payload_is_empty(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}
