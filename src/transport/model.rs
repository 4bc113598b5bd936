use serde::{Deserialize, Serialize};

/// Pagination marker carried by every GraphQL connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    /// Whether another page can be requested
    pub has_next_page: bool,
    /// Opaque cursor to pass as `after` on the next request
    pub end_cursor: Option<String>,
}

/// GraphQL edge wrapper; lists arrive as `{"edges": [{"node": ...}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// A GraphQL connection: edges plus optional count and pagination marker.
///
/// The default is spelled as a function so deserializing stays available
/// for node types without a `Default` impl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeList<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    /// Total size of the collection, when the endpoint reports it
    pub count: Option<u64>,
    pub page_info: Option<PageInfo>,
}

/// Count-only connection, e.g. `edge_media_preview_like`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeCount {
    pub count: u64,
}

/// Node of `edge_media_to_caption`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionNode {
    pub text: String,
}

/// A post, IGTV or sidecar child as the web GraphQL endpoints ship it.
///
/// The same shape appears in timeline edges, in `shortcode_media` payloads
/// and (recursively) in `edge_sidecar_to_children`; fields that only some
/// of those contexts carry are optional. The owner is a [`UserNode`]
/// because single-media payloads embed a full profile there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaNode {
    pub id: Option<String>,
    pub shortcode: String,
    /// Poster frame for videos, full image otherwise
    pub display_url: Option<String>,
    pub video_url: Option<String>,
    /// `"igtv"` marks long-form video
    pub product_type: Option<String>,
    /// IGTV episode title
    pub title: Option<String>,
    pub taken_at_timestamp: Option<i64>,
    #[serde(default)]
    pub is_video: bool,
    pub owner: Option<Box<UserNode>>,
    #[serde(rename = "edge_media_to_caption")]
    pub caption: Option<EdgeList<CaptionNode>>,
    #[serde(rename = "edge_media_preview_like")]
    pub preview_like: Option<EdgeCount>,
    #[serde(rename = "edge_liked_by")]
    pub liked_by: Option<EdgeCount>,
    #[serde(rename = "edge_media_preview_comment")]
    pub preview_comment: Option<EdgeCount>,
    #[serde(rename = "edge_media_to_comment")]
    pub comment: Option<EdgeCount>,
    #[serde(rename = "edge_sidecar_to_children")]
    pub sidecar_children: Option<EdgeList<MediaNode>>,
}

/// A profile as the `__a=1` endpoint ships it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserNode {
    pub id: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub external_url: Option<String>,
    pub highlight_reel_count: Option<u64>,
    pub is_business_account: Option<bool>,
    pub business_category_name: Option<String>,
    pub category_name: Option<String>,
    pub is_private: Option<bool>,
    /// Whether the cookie user follows this profile
    pub followed_by_viewer: Option<bool>,
    pub profile_pic_url_hd: Option<String>,
    #[serde(rename = "edge_followed_by")]
    pub followed_by: Option<EdgeCount>,
    #[serde(rename = "edge_follow")]
    pub follow: Option<EdgeCount>,
    #[serde(rename = "edge_owner_to_timeline_media")]
    pub timeline_media: Option<EdgeList<MediaNode>>,
    #[serde(rename = "edge_felix_video_timeline")]
    pub felix_video_timeline: Option<EdgeList<MediaNode>>,
}

/// Node of the follower / following connections; only the username is
/// needed, full profiles are resolved separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerNode {
    pub username: String,
}

/// Node of `edge_highlight_reels`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightNode {
    pub id: String,
    pub title: Option<String>,
}

/// Envelope of the `__a=1` profile and single-post endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlEnvelope {
    pub graphql: GraphqlPayload,
}

/// Either a profile or a single media, depending on the URL requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlPayload {
    pub user: Option<UserNode>,
    pub shortcode_media: Option<MediaNode>,
}

/// Response of the mobile `reels_media` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelsMediaFeed {
    #[serde(default)]
    pub reels_media: Vec<ReelMedia>,
}

/// One reel: an active-stories tray or a highlight, with its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelMedia {
    pub user: ReelUser,
    #[serde(default)]
    pub items: Vec<ReelItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelUser {
    pub username: String,
}

/// A single story frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelItem {
    pub id: String,
    /// 1 is an image, anything else is treated as video
    pub media_type: u8,
    pub taken_at: i64,
    pub image_versions2: Option<ImageVersions>,
    #[serde(default)]
    pub video_versions: Vec<VideoVersion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageVersions {
    #[serde(default)]
    pub candidates: Vec<ImageCandidate>,
}

/// One rendition of a story image; candidates are ordered best-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoVersion {
    pub url: String,
}
