use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;
use tracing::info;

use crate::application::models::connection::Connections;
use crate::application::models::post::{Highlight, Igtv, Post, Story};
use crate::application::models::user::User;
use crate::application::services::access_policy::AccessPolicy;
use crate::application::services::assembler::ContentAssembler;
use crate::application::services::pagination::{value_at, ConnectionWalk, PaginationEngine};
use crate::application::services::profile_service::ProfileResolver;
use crate::config::Config;
use crate::constants::{
    ALL_POSTS_QUERY_HASH, FOLLOWED_BY_USER_QUERY_HASH, FOLLOWERS_QUERY_HASH, GRAPHQL_QUERY_PATH,
    STORIES_FEED_PATH, USER_IGTVS_QUERY_HASH, USER_REELS_QUERY_HASH,
};
use crate::error::CrawlerError;
use crate::session::session::Session;
use crate::transport::headers::story_headers;
use crate::transport::http_client::RequestGateway;
use crate::transport::model::{
    EdgeList, FollowerNode, GraphqlEnvelope, HighlightNode, MediaNode, ReelsMediaFeed,
};
use crate::utils::urls;

/// Fixed switches the highlight-reel query expects alongside the user id.
const HIGHLIGHT_PARAMS: &[(&str, &str)] = &[
    ("include_chaining", "true"),
    ("include_reel", "true"),
    ("include_suggested_users", "false"),
    ("include_logged_out_extras", "false"),
    ("include_highlight_reels", "true"),
    ("include_live_status", "true"),
];

/// The follower connection takes these two extras; the following
/// connection takes none.
const FOLLOWER_WALK_PARAMS: &[(&str, &str)] =
    &[("include_reel", "false"), ("fetch_mutual", "false")];

/// One content surface of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Posts,
    Stories,
    Highlights,
    Igtv,
}

/// What [`InstaCrawler::collect`] should gather.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSelection {
    Only(ContentKind),
    All,
}

/// Everything gathered for one profile; unselected kinds stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentBundle {
    pub posts: Option<Vec<Post>>,
    pub stories: Option<Vec<Story>>,
    pub highlights: Option<Vec<Highlight>>,
    pub igtvs: Option<Vec<Igtv>>,
}

impl fmt::Display for ContentBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", s)
    }
}

/// The crawl façade: one borrowed browser session, every read operation
/// the web frontend offers.
///
/// All operations run their requests strictly one after another. Nothing
/// here retries; terminal classifications ([`CrawlerError::Blocked`],
/// [`CrawlerError::PrivateProfile`], [`CrawlerError::NotFound`]) surface
/// to the caller unchanged.
pub struct InstaCrawler {
    config: Arc<Config>,
    gateway: Arc<RequestGateway>,
    resolver: ProfileResolver,
    pagination: PaginationEngine,
    assembler: ContentAssembler,
    policy: AccessPolicy,
}

impl InstaCrawler {
    /// Builds a crawler from configuration. Fails fast when the cookie is
    /// empty, no operation can work without one.
    pub fn new(config: Config) -> Result<Self, CrawlerError> {
        let config = Arc::new(config);
        let session = Session::from_cookie_str(&config.credentials.cookie)?;
        let gateway = Arc::new(RequestGateway::new(session, &config.http)?);
        let policy = AccessPolicy::new(config.pacing.clone());
        let assembler = ContentAssembler::new(&config.endpoints.web_base_url);
        let resolver = ProfileResolver::new(gateway.clone(), config.clone());
        let pagination = PaginationEngine::new(gateway.clone(), policy.clone());

        Ok(Self {
            config,
            gateway,
            resolver,
            pagination,
            assembler,
            policy,
        })
    }

    /// Environment configuration plus the given cookie string.
    pub fn from_cookie(cookie: &str) -> Result<Self, CrawlerError> {
        let mut config = Config::new();
        config.credentials.cookie = cookie.to_string();
        Self::new(config)
    }

    /// Profile metadata. Resolves for private profiles too; only the
    /// content listings below are gated on privacy.
    pub async fn get_profile(&self, username: &str) -> Result<User, CrawlerError> {
        self.resolve_profile(username).await
    }

    /// Profile behind the session cookie.
    pub async fn get_self_profile(&self) -> Result<User, CrawlerError> {
        self.resolver.resolve_self().await
    }

    /// Single post or IGTV episode by its public link
    /// (`https://www.instagram.com/p/<shortcode>/` or `tv/<shortcode>/`).
    pub async fn get_item(&self, url: &str) -> Result<Post, CrawlerError> {
        info!("Single item: {}", url);

        let payload = self
            .gateway
            .fetch(url, &[("__a", "1".to_string())], None)
            .await?;
        let envelope: GraphqlEnvelope = serde_json::from_value(payload)?;
        let media = envelope.graphql.shortcode_media.ok_or_else(|| {
            CrawlerError::UnexpectedPayload("item payload without shortcode_media".to_string())
        })?;

        self.assembler.assemble_post(&media)
    }

    /// Every regular timeline post, in the exact order the API pages them.
    pub async fn get_posts(&self, username: &str) -> Result<Vec<Post>, CrawlerError> {
        let user = self.listable_profile(username).await?;
        let user_id = require_user_id(&user)?;

        let url = self.graphql_url();
        let walk = ConnectionWalk {
            url: &url,
            query_hash: ALL_POSTS_QUERY_HASH,
            user_id: &user_id,
            extra_params: &[],
            edge_path: &["data", "user", "edge_owner_to_timeline_media"],
            jitter: true,
        };
        let posts = self
            .pagination
            .collect(walk, |node: MediaNode| self.assembler.assemble_post(&node))
            .await?;

        info!("User {} posts. Count: {}", user.username, posts.len());
        Ok(posts)
    }

    /// Active story frames of the profile's current reel.
    pub async fn get_stories(&self, username: &str) -> Result<Vec<Story>, CrawlerError> {
        let user = self.listable_profile(username).await?;
        let user_id = require_user_id(&user)?;

        let stories = self.stories_by_reel(&user_id).await?;
        info!("User {} stories. Count: {}", user.username, stories.len());
        Ok(stories)
    }

    /// Saved highlight collections, each carrying the first media URL of
    /// every frame.
    pub async fn get_highlights(&self, username: &str) -> Result<Vec<Highlight>, CrawlerError> {
        let user = self.listable_profile(username).await?;
        let user_id = require_user_id(&user)?;

        let mut params: Vec<(&str, String)> = vec![
            ("query_hash", USER_REELS_QUERY_HASH.to_string()),
            ("user_id", user_id.clone()),
        ];
        for &(name, value) in HIGHLIGHT_PARAMS {
            params.push((name, value.to_string()));
        }
        let payload = self.gateway.fetch(&self.graphql_url(), &params, None).await?;
        let user_data = value_at(&payload, &["data", "user"])?;

        // the reel object names the owner; fall back to the resolved
        // profile when it is absent
        let owner_username = user_data
            .pointer("/reel/owner/username")
            .and_then(Value::as_str)
            .unwrap_or(&user.username)
            .to_string();
        let highlight_edges: EdgeList<HighlightNode> =
            serde_json::from_value(value_at(user_data, &["edge_highlight_reels"])?.clone())?;

        let mut highlights = Vec::with_capacity(highlight_edges.edges.len());
        for edge in highlight_edges.edges {
            let node = edge.node;
            let title = node.title.ok_or_else(|| {
                CrawlerError::UnexpectedPayload(format!("highlight {} without title", node.id))
            })?;
            let frames = self
                .stories_by_reel(&format!("highlight:{}", node.id))
                .await?;
            let post_content: Vec<String> = frames
                .iter()
                .filter_map(|story| story.post_content.first().cloned())
                .collect();
            let post_content_len = post_content.len();

            highlights.push(Highlight {
                owner_link: urls::profile_url(&self.config.endpoints.web_base_url, &owner_username),
                owner_username: owner_username.clone(),
                highlight_id: node.id.clone(),
                post_content,
                post_content_len,
                post_link: urls::highlight_url(&self.config.endpoints.web_base_url, &node.id),
                title,
            });
        }

        info!(
            "User {} highlights. Count: {}",
            user.username,
            highlights.len()
        );
        Ok(highlights)
    }

    /// Every IGTV episode. The felix timeline only carries previews, so
    /// each episode is re-fetched as a single item for full counters and
    /// paired with its title from the timeline.
    pub async fn get_igtvs(&self, username: &str) -> Result<Vec<Igtv>, CrawlerError> {
        let user = self.listable_profile(username).await?;
        let user_id = require_user_id(&user)?;

        let url = self.graphql_url();
        let walk = ConnectionWalk {
            url: &url,
            query_hash: USER_IGTVS_QUERY_HASH,
            user_id: &user_id,
            extra_params: &[],
            edge_path: &["data", "user", "edge_felix_video_timeline"],
            jitter: false,
        };
        let episodes = self
            .pagination
            .collect(walk, |node: MediaNode| Ok(node))
            .await?;

        let mut igtvs = Vec::with_capacity(episodes.len());
        for episode in episodes {
            let title = episode.title.ok_or_else(|| {
                CrawlerError::UnexpectedPayload(format!(
                    "igtv {} without title",
                    episode.shortcode
                ))
            })?;
            let link = urls::igtv_url(&self.config.endpoints.web_base_url, &episode.shortcode);
            let post = self.get_item(&link).await?;
            igtvs.push(Igtv { post, title });
        }

        info!("User {} igtvs. Count: {}", user.username, igtvs.len());
        Ok(igtvs)
    }

    /// The whole follower list: usernames from the connection walk, then
    /// every member resolved to a full profile.
    pub async fn get_followers(&self, username: &str) -> Result<Connections, CrawlerError> {
        let user = self.listable_profile(username).await?;
        let user_id = require_user_id(&user)?;

        let url = self.graphql_url();
        let walk = ConnectionWalk {
            url: &url,
            query_hash: FOLLOWERS_QUERY_HASH,
            user_id: &user_id,
            extra_params: FOLLOWER_WALK_PARAMS,
            edge_path: &["data", "user", "edge_followed_by"],
            jitter: false,
        };
        let usernames = self
            .pagination
            .collect(walk, |node: FollowerNode| Ok(node.username))
            .await?;
        let users = self.resolve_members(&usernames).await?;

        info!("User {} followers. Count: {}", user.username, users.len());
        Ok(Connections {
            count: user.followed_by,
            usernames,
            users,
        })
    }

    /// Profiles followed by this user; same walk as followers over the
    /// other connection.
    pub async fn get_following(&self, username: &str) -> Result<Connections, CrawlerError> {
        let user = self.listable_profile(username).await?;
        let user_id = require_user_id(&user)?;

        let url = self.graphql_url();
        let walk = ConnectionWalk {
            url: &url,
            query_hash: FOLLOWED_BY_USER_QUERY_HASH,
            user_id: &user_id,
            extra_params: &[],
            edge_path: &["data", "user", "edge_follow"],
            jitter: false,
        };
        let usernames = self
            .pagination
            .collect(walk, |node: FollowerNode| Ok(node.username))
            .await?;
        let users = self.resolve_members(&usernames).await?;

        info!("Followed by user {}. Count: {}", user.username, users.len());
        Ok(Connections {
            count: user.follow,
            usernames,
            users,
        })
    }

    /// Gathers the selected content kinds for one profile.
    pub async fn collect(
        &self,
        username: &str,
        selection: ContentSelection,
    ) -> Result<ContentBundle, CrawlerError> {
        let mut bundle = ContentBundle::default();
        match selection {
            ContentSelection::Only(ContentKind::Posts) => {
                bundle.posts = Some(self.get_posts(username).await?);
            }
            ContentSelection::Only(ContentKind::Stories) => {
                bundle.stories = Some(self.get_stories(username).await?);
            }
            ContentSelection::Only(ContentKind::Highlights) => {
                bundle.highlights = Some(self.get_highlights(username).await?);
            }
            ContentSelection::Only(ContentKind::Igtv) => {
                bundle.igtvs = Some(self.get_igtvs(username).await?);
            }
            ContentSelection::All => {
                bundle.posts = Some(self.get_posts(username).await?);
                bundle.stories = Some(self.get_stories(username).await?);
                bundle.highlights = Some(self.get_highlights(username).await?);
                bundle.igtvs = Some(self.get_igtvs(username).await?);
            }
        }
        Ok(bundle)
    }

    /// Fetches one reel (an active-stories tray by user id, or
    /// `highlight:<id>`) from the mobile feed endpoint.
    async fn stories_by_reel(&self, reel_ids: &str) -> Result<Vec<Story>, CrawlerError> {
        let headers = story_headers(self.gateway.session(), &self.config.endpoints.web_base_url)?;
        let payload = self
            .gateway
            .fetch(
                &self.stories_url(),
                &[("reel_ids", reel_ids.to_string())],
                Some(headers),
            )
            .await?;
        let feed: ReelsMediaFeed = serde_json::from_value(payload)?;

        let reel = match feed.reels_media.into_iter().next() {
            Some(reel) => reel,
            None => return Ok(Vec::new()),
        };

        let mut stories = Vec::with_capacity(reel.items.len());
        for item in &reel.items {
            stories.push(self.assembler.assemble_story(item, &reel.user.username)?);
        }
        Ok(stories)
    }

    async fn resolve_profile(&self, username: &str) -> Result<User, CrawlerError> {
        let url = urls::profile_url(&self.config.endpoints.web_base_url, username);
        self.resolver.resolve(&url).await
    }

    /// Resolves a profile and checks that its content may be listed.
    async fn listable_profile(&self, username: &str) -> Result<User, CrawlerError> {
        let user = self.resolve_profile(username).await?;
        self.policy.ensure_listable(&user)?;
        Ok(user)
    }

    /// Resolves usernames to profiles sequentially, pacing the walk. A
    /// member whose resolution is blocked by privacy degrades to a
    /// placeholder; any other failure aborts.
    async fn resolve_members(&self, usernames: &[String]) -> Result<Vec<User>, CrawlerError> {
        let mut members = Vec::with_capacity(usernames.len());
        for username in usernames {
            let member = match self.resolve_profile(username).await {
                Ok(user) => user,
                Err(CrawlerError::PrivateProfile) => User::degraded(
                    username,
                    &urls::profile_url(&self.config.endpoints.web_base_url, username),
                ),
                Err(e) => return Err(e),
            };
            members.push(member);

            if let Some(pause) = self.policy.pace(members.len()) {
                sleep(pause).await;
            }
        }
        Ok(members)
    }

    fn graphql_url(&self) -> String {
        format!("{}{}", self.config.endpoints.web_base_url, GRAPHQL_QUERY_PATH)
    }

    fn stories_url(&self) -> String {
        format!(
            "{}{}",
            self.config.endpoints.story_base_url, STORIES_FEED_PATH
        )
    }
}

fn require_user_id(user: &User) -> Result<String, CrawlerError> {
    user.user_id.clone().ok_or_else(|| {
        CrawlerError::UnexpectedPayload(format!("profile {} without numeric id", user.username))
    })
}
