use std::fmt;

use serde::{Deserialize, Serialize};

use crate::application::models::user::User;

/// A fully walked follower or following list.
///
/// `count` is the size the profile reports; `usernames` and `users` hold
/// what the walk actually returned, in the order the API shipped it. The
/// three can disagree when memberships change mid-walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connections {
    pub count: u64,
    pub usernames: Vec<String>,
    pub users: Vec<User>,
}

impl fmt::Display for Connections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", s)
    }
}
