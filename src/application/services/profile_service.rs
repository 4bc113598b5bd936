use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::application::models::user::User;
use crate::application::services::assembler::ContentAssembler;
use crate::application::services::pagination::value_at;
use crate::config::Config;
use crate::constants::{COOKIE_USER_TIMELINE_QUERY_HASH, GRAPHQL_QUERY_PATH, PROFILE_SAMPLE_LIMIT};
use crate::error::CrawlerError;
use crate::transport::http_client::RequestGateway;
use crate::transport::model::{GraphqlEnvelope, UserNode};
use crate::utils::urls;

/// Fetches profile documents and normalizes them into [`User`] records.
///
/// Resolution only reads; it never gates. Whether a private profile may be
/// listed is the caller's decision, taken against the resolved record.
/// Every content operation starts by resolving its target, often twice in
/// a row (once for gating, once for ids), so the most recent resolution is
/// kept in a single-slot cache keyed by the requested URL and overwritten
/// whenever a different URL is resolved.
pub struct ProfileResolver {
    gateway: Arc<RequestGateway>,
    config: Arc<Config>,
    assembler: ContentAssembler,
    cache: Mutex<Option<(String, User)>>,
}

impl ProfileResolver {
    pub fn new(gateway: Arc<RequestGateway>, config: Arc<Config>) -> Self {
        let assembler = ContentAssembler::new(&config.endpoints.web_base_url);
        Self {
            gateway,
            config,
            assembler,
            cache: Mutex::new(None),
        }
    }

    /// Resolves a profile or post URL into the profile behind it.
    ///
    /// The payload carries either a `user` node (profile URLs) or the
    /// owner embedded in `shortcode_media` (post permalinks); both unwrap
    /// to the same record.
    pub async fn resolve(&self, url: &str) -> Result<User, CrawlerError> {
        if let Some(user) = self.cached(url) {
            debug!("Profile {} served from cache", url);
            return Ok(user);
        }

        info!("Resolving profile {}", url);
        let payload = self
            .gateway
            .fetch(url, &[("__a", "1".to_string())], None)
            .await?;
        let envelope: GraphqlEnvelope = serde_json::from_value(payload)?;

        let user = self.user_from_payload(envelope)?;
        let mut cache = self.cache.lock().expect("profile cache poisoned");
        *cache = Some((url.to_string(), user.clone()));
        Ok(user)
    }

    /// Resolves the profile behind the session cookie, via the timeline
    /// query that reveals the cookie user's username.
    pub async fn resolve_self(&self) -> Result<User, CrawlerError> {
        let url = format!("{}{}", self.config.endpoints.web_base_url, GRAPHQL_QUERY_PATH);
        let params = [("query_hash", COOKIE_USER_TIMELINE_QUERY_HASH.to_string())];
        let payload = self.gateway.fetch(&url, &params, None).await?;

        let username = value_at(&payload, &["data", "user", "username"])?
            .as_str()
            .ok_or_else(|| {
                CrawlerError::UnexpectedPayload("cookie user without username".to_string())
            })?
            .to_string();
        info!("Cookie user is {}", username);

        self.resolve(&urls::profile_url(
            &self.config.endpoints.web_base_url,
            &username,
        ))
        .await
    }

    fn cached(&self, url: &str) -> Option<User> {
        let cache = self.cache.lock().expect("profile cache poisoned");
        cache
            .as_ref()
            .filter(|(cached_url, _)| cached_url == url)
            .map(|(_, user)| user.clone())
    }

    fn user_from_payload(&self, envelope: GraphqlEnvelope) -> Result<User, CrawlerError> {
        let node = if let Some(user) = envelope.graphql.user {
            user
        } else if let Some(owner) = envelope
            .graphql
            .shortcode_media
            .and_then(|media| media.owner)
        {
            *owner
        } else {
            return Err(CrawlerError::UnexpectedPayload(
                "profile payload without user".to_string(),
            ));
        };
        self.user_from_node(node)
    }

    fn user_from_node(&self, node: UserNode) -> Result<User, CrawlerError> {
        let username = node.username.ok_or_else(|| {
            CrawlerError::UnexpectedPayload("profile payload without username".to_string())
        })?;
        let user_url = urls::profile_url(&self.config.endpoints.web_base_url, &username);

        let mut last_twelve_posts = Vec::new();
        if let Some(timeline) = &node.timeline_media {
            for edge in timeline.edges.iter().take(PROFILE_SAMPLE_LIMIT) {
                last_twelve_posts.push(self.assembler.assemble_post(&edge.node)?);
            }
        }

        Ok(User {
            bio: node.biography,
            external_url: node.external_url,
            followed_by: node.followed_by.map(|edge| edge.count).unwrap_or(0),
            follow: node.follow.map(|edge| edge.count).unwrap_or(0),
            full_name: node.full_name,
            highlight_reel_count: node.highlight_reel_count.unwrap_or(0),
            user_id: node.id,
            is_business_account: node.is_business_account.unwrap_or(false),
            business_category_name: node.business_category_name,
            category_name: node.category_name,
            is_private: node.is_private.unwrap_or(false),
            username,
            igtv_count: node
                .felix_video_timeline
                .as_ref()
                .and_then(|list| list.count)
                .unwrap_or(0),
            posts_count: node
                .timeline_media
                .as_ref()
                .and_then(|list| list.count)
                .unwrap_or(0),
            last_twelve_posts,
            profile_pic_hd: node.profile_pic_url_hd,
            followed_by_viewer: node.followed_by_viewer.unwrap_or(false),
            user_url,
        })
    }
}

#[cfg(test)]
mod tests_profile_resolver {
    use super::*;
    use crate::config::{CookieConfig, EndpointConfig, HttpConfig, PacingConfig};
    use crate::session::session::Session;
    use crate::utils::logger::setup_logger;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn resolver(server: &Server) -> ProfileResolver {
        let config = Arc::new(Config {
            credentials: CookieConfig {
                cookie: "sessionid=1111;".to_string(),
            },
            endpoints: EndpointConfig {
                web_base_url: format!("{}/", server.url()),
                story_base_url: format!("{}/", server.url()),
            },
            http: HttpConfig { timeout: 30 },
            pacing: PacingConfig {
                long_pause: 0,
                medium_pause: 0,
                short_pause: 0,
                page_jitter_max: 0,
            },
        });
        let session = Session::from_cookie_str(&config.credentials.cookie).unwrap();
        let gateway = Arc::new(RequestGateway::new(session, &config.http).unwrap());
        ProfileResolver::new(gateway, config)
    }

    fn profile_url_of(server: &Server, username: &str) -> String {
        format!("{}/{username}/", server.url())
    }

    fn sample_media(shortcode: &str, username: &str) -> Value {
        json!({
            "shortcode": shortcode,
            "display_url": format!("https://cdn.example/{shortcode}.jpg"),
            "taken_at_timestamp": 1_609_459_200,
            "owner": {"id": "3194024074", "username": username},
            "edge_media_to_caption": {"edges": []},
            "edge_media_preview_like": {"count": 1},
            "edge_media_to_comment": {"count": 0}
        })
    }

    fn profile_payload(username: &str, private: bool, followed: bool, posts: usize) -> Value {
        let edges: Vec<Value> = (0..posts)
            .map(|n| json!({"node": sample_media(&format!("CPOST{n}"), username)}))
            .collect();
        json!({"graphql": {"user": {
            "biography": "weekly rides",
            "external_url": "https://example.org",
            "edge_followed_by": {"count": 100},
            "edge_follow": {"count": 50},
            "full_name": "Some User",
            "highlight_reel_count": 2,
            "id": "3194024074",
            "is_business_account": false,
            "business_category_name": null,
            "category_name": null,
            "is_private": private,
            "username": username,
            "edge_felix_video_timeline": {"count": 3, "edges": []},
            "edge_owner_to_timeline_media": {"count": posts, "edges": edges},
            "profile_pic_url_hd": "https://cdn.example/pic.jpg",
            "followed_by_viewer": followed
        }}})
    }

    fn mock_profile(
        server: &mut Server,
        username: &str,
        payload: &Value,
        hits: usize,
    ) -> mockito::Mock {
        server
            .mock("GET", format!("/{username}/").as_str())
            .match_query(Matcher::UrlEncoded("__a".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(payload.to_string())
            .expect(hits)
            .create()
    }

    #[tokio::test]
    async fn test_resolve_builds_the_user_with_canonical_url() {
        setup_logger();
        let mut server = Server::new_async().await;
        let mock = mock_profile(
            &mut server,
            "someuser",
            &profile_payload("someuser", false, false, 2),
            1,
        );

        let user = resolver(&server)
            .resolve(&profile_url_of(&server, "someuser"))
            .await
            .unwrap();

        assert_eq!(user.username, "someuser");
        assert_eq!(user.user_url, profile_url_of(&server, "someuser"));
        assert_eq!(user.followed_by, 100);
        assert_eq!(user.follow, 50);
        assert_eq!(user.posts_count, 2);
        assert_eq!(user.igtv_count, 3);
        assert_eq!(user.last_twelve_posts.len(), 2);
        assert_eq!(user.last_twelve_posts[0].shortcode, "CPOST0");
        assert_eq!(user.bio.as_deref(), Some("weekly rides"));
        mock.assert();
    }

    #[tokio::test]
    async fn test_profile_sample_is_capped_at_twelve() {
        setup_logger();
        let mut server = Server::new_async().await;
        let _mock = mock_profile(
            &mut server,
            "busyuser",
            &profile_payload("busyuser", false, false, 13),
            1,
        );

        let user = resolver(&server)
            .resolve(&profile_url_of(&server, "busyuser"))
            .await
            .unwrap();
        assert_eq!(user.last_twelve_posts.len(), 12);
        assert_eq!(user.posts_count, 13);
    }

    #[tokio::test]
    async fn test_resolve_serves_repeat_lookups_from_cache() {
        setup_logger();
        let mut server = Server::new_async().await;
        let mock = mock_profile(
            &mut server,
            "someuser",
            &profile_payload("someuser", false, false, 1),
            1,
        );

        let resolver = resolver(&server);
        let url = profile_url_of(&server, "someuser");
        let first = resolver.resolve(&url).await.unwrap();
        let second = resolver.resolve(&url).await.unwrap();

        assert_eq!(first.username, second.username);
        mock.assert();
    }

    #[tokio::test]
    async fn test_cache_holds_a_single_entry() {
        setup_logger();
        let mut server = Server::new_async().await;
        let first_mock = mock_profile(
            &mut server,
            "firstuser",
            &profile_payload("firstuser", false, false, 0),
            2,
        );
        let second_mock = mock_profile(
            &mut server,
            "seconduser",
            &profile_payload("seconduser", false, false, 0),
            1,
        );

        let resolver = resolver(&server);
        resolver
            .resolve(&profile_url_of(&server, "firstuser"))
            .await
            .unwrap();
        resolver
            .resolve(&profile_url_of(&server, "seconduser"))
            .await
            .unwrap();
        resolver
            .resolve(&profile_url_of(&server, "firstuser"))
            .await
            .unwrap();

        first_mock.assert();
        second_mock.assert();
    }

    #[tokio::test]
    async fn test_private_profile_resolves_with_its_flags() {
        setup_logger();
        let mut server = Server::new_async().await;
        let _mock = mock_profile(
            &mut server,
            "hiddenuser",
            &profile_payload("hiddenuser", true, false, 0),
            1,
        );

        let user = resolver(&server)
            .resolve(&profile_url_of(&server, "hiddenuser"))
            .await
            .unwrap();

        assert!(user.is_private);
        assert!(!user.followed_by_viewer);
        assert_eq!(user.followed_by, 100);
    }

    #[tokio::test]
    async fn test_media_payload_resolves_through_the_owner() {
        setup_logger();
        let mut server = Server::new_async().await;
        let payload = json!({"graphql": {"shortcode_media": {
            "shortcode": "CAbCdEfGhIj",
            "owner": {
                "id": "3194024074",
                "username": "someuser",
                "edge_followed_by": {"count": 7},
                "is_private": false
            }
        }}});
        let mock = server
            .mock("GET", "/p/CAbCdEfGhIj/")
            .match_query(Matcher::UrlEncoded("__a".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(payload.to_string())
            .expect(1)
            .create();

        let url = format!("{}/p/CAbCdEfGhIj/", server.url());
        let user = resolver(&server).resolve(&url).await.unwrap();

        assert_eq!(user.username, "someuser");
        assert_eq!(user.user_url, profile_url_of(&server, "someuser"));
        assert_eq!(user.followed_by, 7);
        assert_eq!(user.posts_count, 0);
        mock.assert();
    }

    #[tokio::test]
    async fn test_payload_without_username_is_rejected() {
        setup_logger();
        let mut server = Server::new_async().await;
        let _mock = mock_profile(
            &mut server,
            "ghostuser",
            &json!({"graphql": {"user": {"id": "3194024074"}}}),
            1,
        );

        let err = resolver(&server)
            .resolve(&profile_url_of(&server, "ghostuser"))
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlerError::UnexpectedPayload(_)));
    }

    #[tokio::test]
    async fn test_resolve_self_follows_the_cookie_user() {
        setup_logger();
        let mut server = Server::new_async().await;

        let timeline_mock = server
            .mock("GET", "/graphql/query/")
            .match_query(Matcher::UrlEncoded(
                "query_hash".into(),
                COOKIE_USER_TIMELINE_QUERY_HASH.into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"data": {"user": {"username": "cookieuser"}}}).to_string(),
            )
            .create();
        let profile_mock = mock_profile(
            &mut server,
            "cookieuser",
            &profile_payload("cookieuser", false, false, 0),
            1,
        );

        let user = resolver(&server).resolve_self().await.unwrap();
        assert_eq!(user.username, "cookieuser");
        timeline_mock.assert();
        profile_mock.assert();
    }
}
