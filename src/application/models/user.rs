use std::fmt;

use serde::{Deserialize, Serialize};

use crate::application::models::post::Post;

/// Everything the profile endpoint reveals about an account, plus the
/// canonical link back to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub bio: Option<String>,
    pub external_url: Option<String>,
    /// Follower count
    pub followed_by: u64,
    /// Following count
    pub follow: u64,
    pub full_name: Option<String>,
    pub highlight_reel_count: u64,
    pub user_id: Option<String>,
    pub is_business_account: bool,
    pub business_category_name: Option<String>,
    pub category_name: Option<String>,
    pub is_private: bool,
    pub username: String,
    pub igtv_count: u64,
    pub posts_count: u64,
    /// Up to the twelve most recent posts, as embedded in the profile payload
    pub last_twelve_posts: Vec<Post>,
    pub profile_pic_hd: Option<String>,
    /// Whether the session user follows this profile
    pub followed_by_viewer: bool,
    pub user_url: String,
}

impl User {
    /// Placeholder entry for a profile that exists but cannot be read
    /// because it is private and the session user does not follow it.
    /// Keeps username and link so follower listings stay complete.
    pub fn degraded(username: &str, user_url: &str) -> Self {
        Self {
            bio: None,
            external_url: None,
            followed_by: 0,
            follow: 0,
            full_name: None,
            highlight_reel_count: 0,
            user_id: None,
            is_business_account: false,
            business_category_name: None,
            category_name: None,
            is_private: true,
            username: username.to_string(),
            igtv_count: 0,
            posts_count: 0,
            last_twelve_posts: Vec::new(),
            profile_pic_hd: None,
            followed_by_viewer: false,
            user_url: user_url.to_string(),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests_user {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_degraded_keeps_identity_and_marks_private() {
        let user = User::degraded("hiddenuser", "https://www.instagram.com/hiddenuser/");

        assert_eq!(user.username, "hiddenuser");
        assert_eq!(user.user_url, "https://www.instagram.com/hiddenuser/");
        assert!(user.is_private);
        assert!(!user.followed_by_viewer);
        assert_eq!(user.followed_by, 0);
        assert!(user.last_twelve_posts.is_empty());
    }

    #[test]
    fn test_display_renders_json() {
        let user = User::degraded("hiddenuser", "https://www.instagram.com/hiddenuser/");
        let parsed: serde_json::Value = serde_json::from_str(&user.to_string()).unwrap();

        assert_eq!(parsed["username"], "hiddenuser");
        assert_eq!(parsed["is_private"], true);
        assert_eq!(parsed["last_twelve_posts"], serde_json::json!([]));
    }
}
