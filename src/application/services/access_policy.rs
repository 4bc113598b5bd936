use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::application::models::user::User;
use crate::config::PacingConfig;
use crate::error::CrawlerError;

/// Decides what may be enumerated and how fast.
///
/// Two concerns live here: the privacy gate (content listings of a private
/// profile the session user does not follow are refused up front) and the
/// pacing schedule that keeps long walks from looking like a scraper
/// running at full tilt.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pacing: PacingConfig,
}

impl AccessPolicy {
    pub fn new(pacing: PacingConfig) -> Self {
        Self { pacing }
    }

    /// Refuses enumeration of a private profile the session does not follow.
    pub fn ensure_listable(&self, user: &User) -> Result<(), CrawlerError> {
        if user.is_private && !user.followed_by_viewer {
            debug!("Profile {} is private and not followed", user.username);
            return Err(CrawlerError::PrivateProfile);
        }
        Ok(())
    }

    /// Step pause after the nth expensive item.
    ///
    /// Thresholds are checked largest first, so the 1000th item gets the
    /// long pause even though 1000 is also divisible by 100 and 25. Most
    /// counts pause not at all.
    pub fn pace(&self, items_collected: usize) -> Option<Duration> {
        if items_collected == 0 {
            return None;
        }
        if items_collected % 1000 == 0 {
            Some(Duration::from_secs(self.pacing.long_pause))
        } else if items_collected % 100 == 0 {
            Some(Duration::from_secs(self.pacing.medium_pause))
        } else if items_collected % 25 == 0 {
            Some(Duration::from_secs(self.pacing.short_pause))
        } else {
            None
        }
    }

    /// Random pause inserted before each timeline page request.
    pub fn page_jitter(&self) -> Duration {
        Duration::from_secs(rand::thread_rng().gen_range(0..=self.pacing.page_jitter_max))
    }
}

#[cfg(test)]
mod tests_access_policy {
    use super::*;
    use pretty_assertions::assert_eq;

    fn policy() -> AccessPolicy {
        AccessPolicy::new(PacingConfig {
            long_pause: 11,
            medium_pause: 9,
            short_pause: 7,
            page_jitter_max: 2,
        })
    }

    fn user(is_private: bool, followed_by_viewer: bool) -> User {
        let mut user = User::degraded("someuser", "https://www.instagram.com/someuser/");
        user.is_private = is_private;
        user.followed_by_viewer = followed_by_viewer;
        user
    }

    #[test]
    fn test_private_unfollowed_profile_is_refused() {
        let err = policy().ensure_listable(&user(true, false)).unwrap_err();
        assert!(matches!(err, CrawlerError::PrivateProfile));
    }

    #[test]
    fn test_public_and_followed_profiles_are_listable() {
        assert!(policy().ensure_listable(&user(false, false)).is_ok());
        assert!(policy().ensure_listable(&user(false, true)).is_ok());
        assert!(policy().ensure_listable(&user(true, true)).is_ok());
    }

    #[test]
    fn test_pace_picks_the_largest_matching_threshold() {
        let policy = policy();
        assert_eq!(policy.pace(1000), Some(Duration::from_secs(11)));
        assert_eq!(policy.pace(2000), Some(Duration::from_secs(11)));
        assert_eq!(policy.pace(100), Some(Duration::from_secs(9)));
        assert_eq!(policy.pace(200), Some(Duration::from_secs(9)));
        assert_eq!(policy.pace(25), Some(Duration::from_secs(7)));
        assert_eq!(policy.pace(75), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_pace_is_silent_between_thresholds() {
        let policy = policy();
        assert_eq!(policy.pace(0), None);
        assert_eq!(policy.pace(1), None);
        assert_eq!(policy.pace(24), None);
        assert_eq!(policy.pace(999), None);
    }

    #[test]
    fn test_page_jitter_stays_in_range() {
        let policy = policy();
        for _ in 0..50 {
            assert!(policy.page_jitter() <= Duration::from_secs(2));
        }
    }
}
