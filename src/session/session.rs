use std::collections::BTreeMap;
use std::fmt;

use rand::seq::SliceRandom;

use crate::constants::{USER_AGENTS, X_IG_APP_ID};
use crate::error::CrawlerError;

/// The borrowed browser identity every request is issued under.
///
/// Holds the parsed cookie jar plus the fixed request identity (web-app id
/// and user agent). Read-only after construction; an empty jar is rejected
/// up front because every meaningful endpoint requires an authenticated
/// session.
#[derive(Debug, Clone)]
pub struct Session {
    cookies: BTreeMap<String, String>,
    app_id: String,
    user_agent: String,
}

impl Session {
    /// Builds a session from a raw browser cookie string, e.g.
    /// `"ig_did=XXXXXXXX-YYYY; sessionid=1111111111;"`. Pairs are split on
    /// `;`, trimmed, and split on the first `=`; empty segments are skipped.
    pub fn from_cookie_str(raw: &str) -> Result<Self, CrawlerError> {
        Self::from_pairs(parse_cookie_str(raw))
    }

    /// Builds a session from an already-parsed cookie map.
    pub fn from_pairs(cookies: BTreeMap<String, String>) -> Result<Self, CrawlerError> {
        if cookies.is_empty() {
            return Err(CrawlerError::MissingCookie);
        }

        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
            .to_string();

        Ok(Self {
            cookies,
            app_id: X_IG_APP_ID.to_string(),
            user_agent,
        })
    }

    /// Renders the jar as a `Cookie:` header value, `"k1=v1; k2=v2"`.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

fn parse_cookie_str(raw: &str) -> BTreeMap<String, String> {
    let mut cookies = BTreeMap::new();
    for segment in raw.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if let Some((name, value)) = segment.split_once('=') {
            cookies.insert(name.trim().to_string(), value.trim().to_string());
        }
    }
    cookies
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = self
            .cookies
            .keys()
            .map(|name| format!("\"{name}\":\"[REDACTED]\""))
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "{{\"cookies\":{{{}}},\"app_id\":\"{}\",\"user_agent\":\"{}\"}}",
            redacted, self.app_id, self.user_agent
        )
    }
}

#[cfg(test)]
mod tests_session {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_cookie_str_parses_pairs() {
        let session =
            Session::from_cookie_str("ig_did=XXXXXXXX-YYYY-CCCC; sessionid=1111111111;").unwrap();

        assert_eq!(session.cookie("ig_did"), Some("XXXXXXXX-YYYY-CCCC"));
        assert_eq!(session.cookie("sessionid"), Some("1111111111"));
        assert_eq!(session.cookie("csrftoken"), None);
    }

    #[test]
    fn test_from_cookie_str_splits_on_first_equals_only() {
        let session = Session::from_cookie_str("token=abc=def;").unwrap();
        assert_eq!(session.cookie("token"), Some("abc=def"));
    }

    #[test]
    fn test_from_cookie_str_trims_and_skips_empty_segments() {
        let session = Session::from_cookie_str("  a = 1 ; ; b=2 ;;").unwrap();
        assert_eq!(session.cookie("a"), Some("1"));
        assert_eq!(session.cookie("b"), Some("2"));
        assert_eq!(session.cookie_header(), "a=1; b=2");
    }

    #[test]
    fn test_empty_cookie_is_rejected() {
        assert!(matches!(
            Session::from_cookie_str(""),
            Err(CrawlerError::MissingCookie)
        ));
        assert!(matches!(
            Session::from_cookie_str(" ; ; "),
            Err(CrawlerError::MissingCookie)
        ));
        assert!(matches!(
            Session::from_pairs(BTreeMap::new()),
            Err(CrawlerError::MissingCookie)
        ));
    }

    #[test]
    fn test_identity_defaults() {
        let session = Session::from_cookie_str("sessionid=1;").unwrap();
        assert_eq!(session.app_id(), X_IG_APP_ID);
        assert!(USER_AGENTS.contains(&session.user_agent()));
    }
}
