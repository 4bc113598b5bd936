//! Canonical public-site links for crawled entities.
//!
//! `base` is the configured web base URL and is expected to carry a trailing
//! slash. Every builder appends one too, so links compare equal regardless
//! of which code path produced them.

pub fn profile_url(base: &str, username: &str) -> String {
    format!("{base}{username}/")
}

pub fn post_url(base: &str, shortcode: &str) -> String {
    format!("{base}p/{shortcode}/")
}

pub fn igtv_url(base: &str, shortcode: &str) -> String {
    format!("{base}tv/{shortcode}/")
}

pub fn story_url(base: &str, username: &str, story_id: &str) -> String {
    format!("{base}stories/{username}/{story_id}/")
}

pub fn highlight_url(base: &str, highlight_id: &str) -> String {
    format!("{base}stories/highlights/{highlight_id}/")
}

#[cfg(test)]
mod tests_urls {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://www.instagram.com/";

    #[test]
    fn test_profile_url() {
        assert_eq!(
            profile_url(BASE, "someuser"),
            "https://www.instagram.com/someuser/"
        );
    }

    #[test]
    fn test_post_and_igtv_urls() {
        assert_eq!(
            post_url(BASE, "CAbCdEfGhIj"),
            "https://www.instagram.com/p/CAbCdEfGhIj/"
        );
        assert_eq!(
            igtv_url(BASE, "CAbCdEfGhIj"),
            "https://www.instagram.com/tv/CAbCdEfGhIj/"
        );
    }

    #[test]
    fn test_story_and_highlight_urls() {
        assert_eq!(
            story_url(BASE, "someuser", "2894380001122334455"),
            "https://www.instagram.com/stories/someuser/2894380001122334455/"
        );
        assert_eq!(
            highlight_url(BASE, "17900011223344556"),
            "https://www.instagram.com/stories/highlights/17900011223344556/"
        );
    }
}
