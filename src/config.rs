use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;

/// The borrowed browser session. Only the raw cookie string lives here;
/// parsing and validation happen in [`crate::session::session::Session`].
#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    pub cookie: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub credentials: CookieConfig,
    pub endpoints: EndpointConfig,
    pub http: HttpConfig,
    pub pacing: PacingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    /// Desktop web origin serving profile pages and GraphQL queries.
    pub web_base_url: String,
    /// Mobile origin serving the reels-media story feed.
    pub story_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout: u64,
}

/// Step-function pauses inserted between successive requests during long
/// connection resolutions, plus the per-page jitter for timeline listing.
/// All values are seconds.
#[derive(Debug, Deserialize, Clone)]
pub struct PacingConfig {
    pub long_pause: u64,
    pub medium_pause: u64,
    pub short_pause: u64,
    pub page_jitter_max: u64,
}

impl fmt::Display for CookieConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"cookie\":{}}}",
            if self.cookie.is_empty() {
                "null".to_string()
            } else {
                "\"[REDACTED]\"".to_string()
            }
        )
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"credentials\":{},\"endpoints\":{},\"http\":{},\"pacing\":{}}}",
            self.credentials, self.endpoints, self.http, self.pacing
        )
    }
}

impl fmt::Display for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"web_base_url\":\"{}\",\"story_base_url\":\"{}\"}}",
            self.web_base_url, self.story_base_url
        )
    }
}

impl fmt::Display for HttpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"timeout\":{}}}", self.timeout)
    }
}

impl fmt::Display for PacingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"long_pause\":{},\"medium_pause\":{},\"short_pause\":{},\"page_jitter_max\":{}}}",
            self.long_pause, self.medium_pause, self.short_pause, self.page_jitter_max
        )
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            credentials: CookieConfig {
                cookie: get_env_or_default("INSTA_COOKIE", String::new()),
            },
            endpoints: EndpointConfig {
                web_base_url: get_env_or_default(
                    "INSTA_WEB_BASE_URL",
                    String::from("https://www.instagram.com/"),
                ),
                story_base_url: get_env_or_default(
                    "INSTA_STORY_BASE_URL",
                    String::from("https://i.instagram.com/"),
                ),
            },
            http: HttpConfig {
                timeout: get_env_or_default("INSTA_HTTP_TIMEOUT", 30),
            },
            pacing: PacingConfig {
                long_pause: get_env_or_default("INSTA_LONG_PAUSE", 11),
                medium_pause: get_env_or_default("INSTA_MEDIUM_PAUSE", 9),
                short_pause: get_env_or_default("INSTA_SHORT_PAUSE", 7),
                page_jitter_max: get_env_or_default("INSTA_PAGE_JITTER_MAX", 2),
            },
        }
    }
}
