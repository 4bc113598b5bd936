//! Fixed identifiers the upstream web API associates with particular query
//! shapes. The query hashes are opaque: they are not computed, only replayed.

pub(crate) const GRAPHQL_QUERY_PATH: &str = "graphql/query/";
pub(crate) const STORIES_FEED_PATH: &str = "api/v1/feed/reels_media/";

pub(crate) const ALL_POSTS_QUERY_HASH: &str = "003056d32c2554def87228bc3fd9668a";
pub(crate) const USER_REELS_QUERY_HASH: &str = "d4d88dc1500312af6f937f7b804c68c3";
pub(crate) const USER_IGTVS_QUERY_HASH: &str = "bc78b344a68ed16dd5d7f264681c4c76";
pub(crate) const COOKIE_USER_TIMELINE_QUERY_HASH: &str = "b1245d9d251dff47d91080fbdd6b274a";
pub(crate) const FOLLOWERS_QUERY_HASH: &str = "c76146de99bb02f6415203be841dd25a";
pub(crate) const FOLLOWED_BY_USER_QUERY_HASH: &str = "d04b0a864b4b54837c0d870b0e77e076";

pub(crate) const X_IG_APP_ID: &str = "936619743392459";

/// Connection/timeline pages are requested in chunks of this size.
pub(crate) const PAGE_SIZE: &str = "50";

/// The profile payload carries at most this many recent posts inline.
pub(crate) const PROFILE_SAMPLE_LIMIT: usize = 12;

/// Desktop Chrome identities; each session picks one and sticks to it.
pub(crate) const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];
