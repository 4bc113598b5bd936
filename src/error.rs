use std::fmt;
use std::fmt::{Display, Formatter};

/// Terminal outcomes of a crawl operation.
///
/// The upstream API returns no explicit error codes, so the first four
/// variants are produced by classification (see
/// `transport::http_client::RequestGateway`) rather than read off the wire.
/// None of them is retried by this crate: a block or a privacy restriction
/// cannot succeed again without external state change (a fresh cookie, a
/// follow relationship).
#[derive(Debug)]
pub enum CrawlerError {
    /// No session cookie was provided; the crawler refuses to run anonymously.
    MissingCookie,
    /// The resource genuinely does not exist upstream.
    NotFound,
    /// The target profile is private and the session user does not follow it.
    PrivateProfile,
    /// The upstream answered with a non-JSON page: the session was blocked or
    /// the cookie has expired.
    Blocked,
    Network(reqwest::Error),
    Json(serde_json::Error),
    /// A session value (cookie, user agent) cannot be carried in an HTTP header.
    InvalidHeader(reqwest::header::InvalidHeaderValue),
    /// The response parsed as JSON but did not carry the expected shape.
    UnexpectedPayload(String),
}

impl Display for CrawlerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CrawlerError::MissingCookie => write!(f, "there is no cookie, use your cookie"),
            CrawlerError::NotFound => write!(f, "not found"),
            CrawlerError::PrivateProfile => {
                write!(f, "profile is private and not followed by the cookie user")
            }
            CrawlerError::Blocked => write!(
                f,
                "non-json response: access blocked by instagram or the cookie is expired"
            ),
            CrawlerError::Network(e) => write!(f, "network error: {e}"),
            CrawlerError::Json(e) => write!(f, "json error: {e}"),
            CrawlerError::InvalidHeader(e) => write!(f, "invalid header value: {e}"),
            CrawlerError::UnexpectedPayload(msg) => write!(f, "unexpected payload: {msg}"),
        }
    }
}

impl std::error::Error for CrawlerError {}

impl From<reqwest::Error> for CrawlerError {
    fn from(e: reqwest::Error) -> Self {
        CrawlerError::Network(e)
    }
}
impl From<serde_json::Error> for CrawlerError {
    fn from(e: serde_json::Error) -> Self {
        CrawlerError::Json(e)
    }
}
impl From<reqwest::header::InvalidHeaderValue> for CrawlerError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        CrawlerError::InvalidHeader(e)
    }
}
