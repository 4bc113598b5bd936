use crate::application::models::post::{Post, Story};
use crate::error::CrawlerError;
use crate::transport::model::{MediaNode, ReelItem};
use crate::utils::urls;

/// Turns wire media nodes into domain values.
///
/// Media selection runs most specific first: a sidecar album contributes
/// one URL per child, long-form (IGTV) media contributes its video, then
/// plain video beats the still image. Counters prefer the `preview`
/// connections, which are the ones the web UI actually renders.
#[derive(Debug, Clone)]
pub struct ContentAssembler {
    web_base_url: String,
}

impl ContentAssembler {
    pub fn new(web_base_url: &str) -> Self {
        Self {
            web_base_url: web_base_url.to_string(),
        }
    }

    /// Direct media URLs of a post, one per frame. Frames that carry no
    /// usable URL are dropped rather than padded with placeholders.
    pub fn collect_post_content(&self, node: &MediaNode) -> Vec<String> {
        if let Some(children) = &node.sidecar_children {
            return children
                .edges
                .iter()
                .filter_map(|edge| best_frame_url(&edge.node))
                .collect();
        }
        if node.product_type.as_deref() == Some("igtv") {
            return node.video_url.iter().cloned().collect();
        }
        best_frame_url(node).into_iter().collect()
    }

    /// Builds a [`Post`] from a top-level media node, as found in timeline
    /// edges and `shortcode_media` payloads.
    pub fn assemble_post(&self, node: &MediaNode) -> Result<Post, CrawlerError> {
        let owner = node.owner.as_ref().ok_or_else(|| {
            CrawlerError::UnexpectedPayload(format!("media {} without owner", node.shortcode))
        })?;
        let owner_username = owner.username.as_deref().ok_or_else(|| {
            CrawlerError::UnexpectedPayload(format!(
                "media {} owner without username",
                node.shortcode
            ))
        })?;
        let posted_at = node.taken_at_timestamp.ok_or_else(|| {
            CrawlerError::UnexpectedPayload(format!(
                "media {} without taken_at_timestamp",
                node.shortcode
            ))
        })?;

        let description = node
            .caption
            .as_ref()
            .and_then(|caption| caption.edges.first())
            .map(|edge| edge.node.text.clone());
        let likes = node
            .preview_like
            .as_ref()
            .or(node.liked_by.as_ref())
            .map(|edge| edge.count)
            .unwrap_or(0);
        let comments = node
            .preview_comment
            .as_ref()
            .or(node.comment.as_ref())
            .map(|edge| edge.count)
            .unwrap_or(0);

        let post_content = self.collect_post_content(node);
        if post_content.is_empty() {
            return Err(CrawlerError::UnexpectedPayload(format!(
                "media {} without content urls",
                node.shortcode
            )));
        }
        let post_content_len = post_content.len();
        let post_link = if node.product_type.as_deref() == Some("igtv") {
            urls::igtv_url(&self.web_base_url, &node.shortcode)
        } else {
            urls::post_url(&self.web_base_url, &node.shortcode)
        };

        Ok(Post {
            description,
            likes,
            comments,
            owner_link: urls::profile_url(&self.web_base_url, owner_username),
            owner_username: owner_username.to_string(),
            post_content,
            post_content_len,
            posted_at,
            shortcode: node.shortcode.clone(),
            post_link,
        })
    }

    /// Builds a [`Story`] from one reel frame. `media_type` 1 is an image
    /// served through ranked candidates; everything else is a video.
    pub fn assemble_story(
        &self,
        item: &ReelItem,
        owner_username: &str,
    ) -> Result<Story, CrawlerError> {
        let media_url = if item.media_type == 1 {
            item.image_versions2
                .as_ref()
                .and_then(|versions| versions.candidates.first())
                .map(|candidate| candidate.url.clone())
        } else {
            item.video_versions.first().map(|version| version.url.clone())
        };
        let media_url = media_url.ok_or_else(|| {
            CrawlerError::UnexpectedPayload(format!("story {} without media url", item.id))
        })?;

        Ok(Story {
            owner_link: urls::profile_url(&self.web_base_url, owner_username),
            owner_username: owner_username.to_string(),
            post_content: vec![media_url],
            post_content_len: 1,
            post_link: urls::story_url(&self.web_base_url, owner_username, &item.id),
            posted_at: item.taken_at,
            shortcode: item.id.clone(),
        })
    }
}

/// Video URL when the frame has one, still image otherwise.
fn best_frame_url(node: &MediaNode) -> Option<String> {
    node.video_url.clone().or_else(|| node.display_url.clone())
}
