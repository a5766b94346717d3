// ==================== MATCHING LEDGER ====================
// Likes, seen profiles and "liked me" per user (matchingData collection)
// Every operation takes the caller identity explicitly

use crate::{
    database::DocumentStore,
    models::{LedgerEntry, LedgerList, MatchingData},
    services::user_service::UserDirectory,
    utils::error::LedgerError,
};
use std::sync::Arc;

/// Per-user like/seen/likedMe bookkeeping on top of a `DocumentStore`.
///
/// Every write is read-modify-write with no lock: two concurrent appends to
/// the same list of the same user can lose one entry. `merge` is field
/// scoped, so appends to different lists never interfere.
#[derive(Clone)]
pub struct MatchLedger {
    store: Arc<dyn DocumentStore>,
    directory: Arc<dyn UserDirectory>,
}

impl MatchLedger {
    pub fn new(store: Arc<dyn DocumentStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { store, directory }
    }

    /// Appends `target` to `acting`'s likedUsers unless already there.
    pub async fn record_like(&self, acting: &str, target: &str) -> Result<(), LedgerError> {
        validate_pair(acting, target)?;

        // Caller must have a profile, target provides the display name
        self.directory.get_user(acting).await?;
        let liked_user = self.directory.get_user(target).await?;

        let entry = LedgerEntry::new(liked_user.first_name, target);
        if self.append_if_absent(acting, LedgerList::Liked, entry).await? {
            log::info!("💚 {} liked {}", acting, target);
        }
        Ok(())
    }

    /// Appends `target` to `acting`'s seenUsers unless already there.
    pub async fn record_seen(&self, acting: &str, target: &str) -> Result<(), LedgerError> {
        validate_pair(acting, target)?;

        self.directory.get_user(acting).await?;
        let seen_user = self.directory.get_user(target).await?;

        let entry = LedgerEntry::new(seen_user.first_name, target);
        if self.append_if_absent(acting, LedgerList::Seen, entry).await? {
            log::info!("👀 {} saw {}", acting, target);
        }
        Ok(())
    }

    /// Records on `target`'s own document that `acting` liked them.
    pub async fn record_liked_me(&self, target: &str, acting: &str) -> Result<(), LedgerError> {
        validate_pair(acting, target)?;

        let acting_user = self.directory.get_user(acting).await?;

        let entry = LedgerEntry::new(acting_user.first_name, acting);
        if self.append_if_absent(target, LedgerList::LikedMe, entry).await? {
            log::info!("💌 {} is now in likedMeUsers of {}", acting, target);
        }
        Ok(())
    }

    /// True when a like between `a` and `b` is on record from either side.
    ///
    /// Each like is stored twice (likedUsers of the liker, likedMeUsers of
    /// the liked user), so it is detected if either write survived. The
    /// result does not depend on argument order.
    pub async fn is_mutual_match(&self, a: &str, b: &str) -> Result<bool, LedgerError> {
        validate_pair(a, b)?;

        let record_a = self.store.get(a).await?;
        let record_b = self.store.get(b).await?;

        let matched = liked(record_b.as_ref(), record_a.as_ref(), b, a)
            || liked(record_a.as_ref(), record_b.as_ref(), a, b);

        log::debug!("🔎 match check {} <-> {}: {}", a, b, matched);
        Ok(matched)
    }

    /// The swipe-right action: both halves of the like, then whether the
    /// target had already liked `acting` back.
    ///
    /// Each profile is looked up once; a lookup failure stops before either
    /// write. The second write is attempted even if the first fails on the
    /// store, and the first error is returned afterwards.
    pub async fn like_user(&self, acting: &str, target: &str) -> Result<bool, LedgerError> {
        validate_pair(acting, target)?;

        let acting_user = self.directory.get_user(acting).await?;
        let liked_user = self.directory.get_user(target).await?;

        let liked_result = self
            .append_if_absent(acting, LedgerList::Liked, LedgerEntry::new(liked_user.first_name, target))
            .await;
        let liked_me_result = self
            .append_if_absent(target, LedgerList::LikedMe, LedgerEntry::new(acting_user.first_name, acting))
            .await;

        match &liked_result {
            Ok(true) => log::info!("💚 {} liked {}", acting, target),
            Ok(false) => {}
            Err(e) => log::warn!("⚠️ likedUsers write failed for {} -> {}: {}", acting, target, e),
        }
        if let Err(e) = &liked_me_result {
            log::warn!("⚠️ likedMeUsers write failed for {} -> {}: {}", acting, target, e);
        }
        liked_result?;
        liked_me_result?;

        let record_acting = self.store.get(acting).await?;
        let record_target = self.store.get(target).await?;
        let matched = liked(record_target.as_ref(), record_acting.as_ref(), target, acting);

        if matched {
            log::info!("🎉 It's a match: {} <-> {}", acting, target);
        }
        Ok(matched)
    }

    /// Users already shown to `user_id`; empty when no document exists.
    pub async fn seen_users(&self, user_id: &str) -> Result<Vec<LedgerEntry>, LedgerError> {
        validate_id(user_id)?;

        Ok(self
            .store
            .get(user_id)
            .await?
            .map(|record| record.seen_users)
            .unwrap_or_default())
    }

    /// The whole ledger document of `user_id`.
    pub async fn match_tables(&self, user_id: &str) -> Result<MatchingData, LedgerError> {
        validate_id(user_id)?;

        self.store
            .get(user_id)
            .await?
            .ok_or_else(|| LedgerError::RecordNotFound(format!("matchingData for {}", user_id)))
    }

    /// One read of `owner`'s document, then at most one write. Returns
    /// whether the entry was appended.
    async fn append_if_absent(
        &self,
        owner: &str,
        list: LedgerList,
        entry: LedgerEntry,
    ) -> Result<bool, LedgerError> {
        match self.store.get(owner).await? {
            Some(record) if record.contains(list, &entry.user_id) => {
                log::debug!("ℹ️  {} already in {} of {}", entry.user_id, list, owner);
                Ok(false)
            }
            Some(record) => {
                let mut entries = record.list(list).to_vec();
                entries.push(entry);
                self.store.merge(owner, list, &entries).await?;
                Ok(true)
            }
            None => {
                let mut record = MatchingData::empty(owner);
                record.list_mut(list).push(entry);
                self.store.create(&record).await?;
                Ok(true)
            }
        }
    }
}

/// Has `liker` liked `liked`? Checked on both copies of the like.
fn liked(
    liker_record: Option<&MatchingData>,
    liked_record: Option<&MatchingData>,
    liker_id: &str,
    liked_id: &str,
) -> bool {
    liker_record.map_or(false, |r| r.contains(LedgerList::Liked, liked_id))
        || liked_record.map_or(false, |r| r.contains(LedgerList::LikedMe, liker_id))
}

fn validate_id(user_id: &str) -> Result<(), LedgerError> {
    if user_id.trim().is_empty() {
        return Err(LedgerError::InvalidRequest("user id must not be empty".into()));
    }
    Ok(())
}

fn validate_pair(a: &str, b: &str) -> Result<(), LedgerError> {
    validate_id(a)?;
    validate_id(b)?;
    if a == b {
        return Err(LedgerError::InvalidRequest(format!("{} cannot act on themselves", a)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::in_memory::InMemoryStore;
    use crate::services::user_service::fake::StaticDirectory;

    fn setup() -> (MatchLedger, InMemoryStore) {
        let store = InMemoryStore::new();
        let directory = StaticDirectory::default()
            .with("u1", "Alice")
            .with("u2", "Bob")
            .with("u3", "Carol");
        let ledger = MatchLedger::new(Arc::new(store.clone()), Arc::new(directory));
        (ledger, store)
    }

    #[tokio::test]
    async fn test_like_then_liked_me_scenario() {
        let (ledger, store) = setup();

        ledger.record_like("u1", "u2").await.unwrap();
        let u1 = store.snapshot("u1").await.unwrap();
        assert_eq!(u1.liked_users, vec![LedgerEntry::new("Bob", "u2")]);

        ledger.record_like("u1", "u2").await.unwrap();
        let u1 = store.snapshot("u1").await.unwrap();
        assert_eq!(u1.liked_users.len(), 1);

        ledger.record_liked_me("u2", "u1").await.unwrap();
        let u2 = store.snapshot("u2").await.unwrap();
        assert_eq!(u2.liked_me_users, vec![LedgerEntry::new("Alice", "u1")]);

        assert!(ledger.is_mutual_match("u1", "u2").await.unwrap());
        assert!(ledger.is_mutual_match("u2", "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_repeated_like_writes_once() {
        let (ledger, store) = setup();

        ledger.record_like("u1", "u2").await.unwrap();
        ledger.record_like("u1", "u2").await.unwrap();

        assert_eq!(store.reads("u1").await, 2);
        assert_eq!(store.writes("u1").await, 1);
        assert_eq!(store.writes("u2").await, 0);
        assert!(store.snapshot("u2").await.is_none());
    }

    #[tokio::test]
    async fn test_no_likes_is_not_a_match() {
        let (ledger, store) = setup();
        assert!(!ledger.is_mutual_match("u1", "u2").await.unwrap());

        ledger.record_seen("u1", "u2").await.unwrap();
        ledger.record_seen("u2", "u1").await.unwrap();
        assert!(!ledger.is_mutual_match("u1", "u2").await.unwrap());
        assert!(store.snapshot("u1").await.unwrap().liked_users.is_empty());
    }

    #[tokio::test]
    async fn test_liked_me_alone_is_detected() {
        let (ledger, store) = setup();

        ledger.record_liked_me("u2", "u1").await.unwrap();

        assert!(store.snapshot("u1").await.is_none());
        assert!(ledger.is_mutual_match("u1", "u2").await.unwrap());
        assert!(ledger.is_mutual_match("u2", "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_seen_does_not_touch_liked_users() {
        let (ledger, store) = setup();

        ledger.record_like("u1", "u2").await.unwrap();
        ledger.record_seen("u1", "u3").await.unwrap();
        ledger.record_seen("u1", "u3").await.unwrap();

        let u1 = store.snapshot("u1").await.unwrap();
        assert_eq!(u1.liked_users, vec![LedgerEntry::new("Bob", "u2")]);
        assert_eq!(u1.seen_users, vec![LedgerEntry::new("Carol", "u3")]);
        assert!(u1.liked_me_users.is_empty());
    }

    #[tokio::test]
    async fn test_entries_keep_insertion_order() {
        let (ledger, store) = setup();

        ledger.record_seen("u1", "u3").await.unwrap();
        ledger.record_seen("u1", "u2").await.unwrap();
        ledger.record_seen("u1", "u3").await.unwrap();

        let seen = store.snapshot("u1").await.unwrap().seen_users;
        assert_eq!(
            seen,
            vec![LedgerEntry::new("Carol", "u3"), LedgerEntry::new("Bob", "u2")]
        );
    }

    #[tokio::test]
    async fn test_unknown_profile_aborts_before_write() {
        let (ledger, store) = setup();

        let result = ledger.record_like("u1", "ghost").await;
        assert!(matches!(result, Err(LedgerError::ProfileLookupFailure(_))));

        let result = ledger.record_liked_me("u1", "ghost").await;
        assert!(matches!(result, Err(LedgerError::ProfileLookupFailure(_))));

        assert_eq!(store.reads("u1").await, 0);
        assert!(store.snapshot("u1").await.is_none());
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_and_leaves_record_unchanged() {
        let (ledger, store) = setup();
        ledger.record_like("u1", "u2").await.unwrap();

        store.fail_next(1);
        let result = ledger.record_like("u1", "u3").await;
        assert!(matches!(result, Err(LedgerError::StoreUnavailable(_))));

        let u1 = store.snapshot("u1").await.unwrap();
        assert_eq!(u1.liked_users, vec![LedgerEntry::new("Bob", "u2")]);

        // Safe to retry once the store is back
        ledger.record_like("u1", "u3").await.unwrap();
        let u1 = store.snapshot("u1").await.unwrap();
        assert_eq!(u1.liked_users.len(), 2);
    }

    #[tokio::test]
    async fn test_like_user_reports_match_on_second_like() {
        let (ledger, store) = setup();

        assert!(!ledger.like_user("u1", "u2").await.unwrap());
        assert!(ledger.like_user("u2", "u1").await.unwrap());

        let u1 = store.snapshot("u1").await.unwrap();
        assert_eq!(u1.liked_users, vec![LedgerEntry::new("Bob", "u2")]);
        assert_eq!(u1.liked_me_users, vec![LedgerEntry::new("Bob", "u2")]);
    }

    #[tokio::test]
    async fn test_like_user_attempts_both_writes() {
        let (ledger, store) = setup();

        // First get (u1's record) fails, the likedMe half still lands on u2
        store.fail_next(1);
        let result = ledger.like_user("u1", "u2").await;
        assert!(matches!(result, Err(LedgerError::StoreUnavailable(_))));

        assert!(store.snapshot("u1").await.is_none());
        let u2 = store.snapshot("u2").await.unwrap();
        assert_eq!(u2.liked_me_users, vec![LedgerEntry::new("Alice", "u1")]);
        assert!(ledger.is_mutual_match("u1", "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_like_user_unknown_target_writes_nothing() {
        let (ledger, store) = setup();

        let result = ledger.like_user("u1", "ghost").await;
        assert!(matches!(result, Err(LedgerError::ProfileLookupFailure(_))));

        assert!(store.snapshot("u1").await.is_none());
        assert!(store.snapshot("ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_like_user_looks_up_each_profile_once() {
        let store = InMemoryStore::new();
        let directory = StaticDirectory::default().with("u1", "Alice").with("u2", "Bob");
        let ledger = MatchLedger::new(Arc::new(store.clone()), Arc::new(directory.clone()));

        ledger.like_user("u1", "u2").await.unwrap();

        assert_eq!(directory.lookups(), 2);
        assert_eq!(store.snapshot("u1").await.unwrap().liked_users, vec![LedgerEntry::new("Bob", "u2")]);
        assert_eq!(store.snapshot("u2").await.unwrap().liked_me_users, vec![LedgerEntry::new("Alice", "u1")]);
    }

    #[tokio::test]
    async fn test_directory_outage_is_store_unavailable() {
        let store = InMemoryStore::new();
        let directory = StaticDirectory::default().with("u1", "Alice").with("u2", "Bob").offline();
        let ledger = MatchLedger::new(Arc::new(store.clone()), Arc::new(directory));

        let result = ledger.like_user("u1", "u2").await;
        assert!(matches!(result, Err(LedgerError::StoreUnavailable(_))));

        assert_eq!(store.reads("u1").await, 0);
        assert!(store.snapshot("u1").await.is_none());
        assert!(store.snapshot("u2").await.is_none());
    }

    #[tokio::test]
    async fn test_create_race_is_conflict_then_retry_merges() {
        let (ledger, store) = setup();

        // Another writer creates u1's record between our read and our create
        let mut concurrent = MatchingData::empty("u1");
        concurrent.seen_users.push(LedgerEntry::new("Carol", "u3"));
        store.insert_after_next_get(concurrent).await;

        let result = ledger.record_like("u1", "u2").await;
        assert!(matches!(result, Err(LedgerError::Conflict(_))));
        assert!(store.snapshot("u1").await.unwrap().liked_users.is_empty());

        ledger.record_like("u1", "u2").await.unwrap();
        ledger.record_like("u1", "u2").await.unwrap();

        let u1 = store.snapshot("u1").await.unwrap();
        assert_eq!(u1.liked_users, vec![LedgerEntry::new("Bob", "u2")]);
        assert_eq!(u1.seen_users, vec![LedgerEntry::new("Carol", "u3")]);
    }

    #[tokio::test]
    async fn test_seen_users_and_match_tables() {
        let (ledger, _store) = setup();

        assert!(ledger.seen_users("u1").await.unwrap().is_empty());
        assert!(matches!(
            ledger.match_tables("u1").await,
            Err(LedgerError::RecordNotFound(_))
        ));

        ledger.record_seen("u1", "u2").await.unwrap();
        assert_eq!(
            ledger.seen_users("u1").await.unwrap(),
            vec![LedgerEntry::new("Bob", "u2")]
        );

        let tables = ledger.match_tables("u1").await.unwrap();
        assert_eq!(tables.user_id, "u1");
        assert_eq!(tables.seen_users.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_self_and_empty_ids() {
        let (ledger, store) = setup();

        assert!(matches!(
            ledger.record_like("u1", "u1").await,
            Err(LedgerError::InvalidRequest(_))
        ));
        assert!(matches!(
            ledger.is_mutual_match("", "u1").await,
            Err(LedgerError::InvalidRequest(_))
        ));
        assert_eq!(store.reads("u1").await, 0);
    }
}
