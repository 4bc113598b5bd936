use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, ORIGIN, PRAGMA, REFERER, USER_AGENT,
};
use tracing::debug;

use crate::error::CrawlerError;
use crate::session::session::Session;

/// Header set the mobile `reels_media` endpoint expects.
///
/// The stories feed lives on `i.instagram.com` and rejects plain web
/// requests; it wants the app id plus the fetch-metadata headers a browser
/// would attach to a cross-site XHR from the web frontend. The cookie is
/// not set here, the gateway carries it as a default header.
pub(crate) fn story_headers(
    session: &Session,
    web_base_url: &str,
) -> Result<HeaderMap, CrawlerError> {
    let mut headers = HeaderMap::new();
    headers.insert("authority", HeaderValue::from_static("i.instagram.com"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert("x-ig-app-id", HeaderValue::from_str(session.app_id())?);
    headers.insert(ORIGIN, HeaderValue::from_str(web_base_url)?);
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-site"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(REFERER, HeaderValue::from_str(web_base_url)?);
    headers.insert(USER_AGENT, HeaderValue::from_str(session.user_agent())?);

    debug!("Story headers: {:?}", headers);
    Ok(headers)
}
