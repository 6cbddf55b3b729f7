//! Like/dislike toggling.
//!
//! A user sits in at most one of the two lists. Liking removes any dislike and
//! toggles the like; disliking does the mirror image.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A rating gesture sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingAction {
    Like,
    Dislike,
}

impl RatingAction {
    /// Wire and route representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl std::fmt::Display for RatingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply `action` by `user` to the like and dislike lists in place.
pub fn apply(
    likes: &mut Vec<UserId>,
    dislikes: &mut Vec<UserId>,
    action: RatingAction,
    user: &UserId,
) {
    let (target, opposite) = match action {
        RatingAction::Like => (likes, dislikes),
        RatingAction::Dislike => (dislikes, likes),
    };

    opposite.retain(|id| id != user);

    if target.contains(user) {
        target.retain(|id| id != user);
    } else {
        target.push(user.clone());
    }
}
