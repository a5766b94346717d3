use serde::{Deserialize, Serialize};
use std::fmt;

/// Item inside the likedUsers / seenUsers / likedMeUsers arrays
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub display_name: String,
    pub user_id: String,
}

impl LedgerEntry {
    pub fn new(display_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            user_id: user_id.into(),
        }
    }
}

/// Document of the "matchingData" collection - one per user, keyed by `userId`
///
/// Campos ausentes no documento equivalem a listas vazias.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchingData {
    pub user_id: String,
    #[serde(default)]
    pub liked_users: Vec<LedgerEntry>,
    #[serde(default)]
    pub seen_users: Vec<LedgerEntry>,
    #[serde(default)]
    pub liked_me_users: Vec<LedgerEntry>,
}

impl MatchingData {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Default::default()
        }
    }

    pub fn list(&self, list: LedgerList) -> &[LedgerEntry] {
        match list {
            LedgerList::Liked => &self.liked_users,
            LedgerList::Seen => &self.seen_users,
            LedgerList::LikedMe => &self.liked_me_users,
        }
    }

    pub fn list_mut(&mut self, list: LedgerList) -> &mut Vec<LedgerEntry> {
        match list {
            LedgerList::Liked => &mut self.liked_users,
            LedgerList::Seen => &mut self.seen_users,
            LedgerList::LikedMe => &mut self.liked_me_users,
        }
    }

    /// Linear scan by `userId`; lists are expected to stay small.
    pub fn contains(&self, list: LedgerList, user_id: &str) -> bool {
        self.list(list).iter().any(|entry| entry.user_id == user_id)
    }
}

/// The three append-only lists held by a `MatchingData` document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerList {
    Liked,
    Seen,
    LikedMe,
}

impl LedgerList {
    /// Field name in the stored document.
    pub fn field(&self) -> &'static str {
        match self {
            LedgerList::Liked => "likedUsers",
            LedgerList::Seen => "seenUsers",
            LedgerList::LikedMe => "likedMeUsers",
        }
    }
}

impl fmt::Display for LedgerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}
