// ==================== USER DIRECTORY ====================
// Profile reads from the "users" collection (owned by the profile service)

use crate::{
    database::{MongoDB, USERS},
    models::UserProfile,
    utils::error::LedgerError,
};
use async_trait::async_trait;
use mongodb::bson::doc;

/// Profile lookups the ledger needs to build its entries.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// An unknown id is a `ProfileLookupFailure`; a driver failure is
    /// `StoreUnavailable`.
    async fn get_user(&self, user_id: &str) -> Result<UserProfile, LedgerError>;
}

#[async_trait]
impl UserDirectory for MongoDB {
    async fn get_user(&self, user_id: &str) -> Result<UserProfile, LedgerError> {
        log::debug!("👤 Fetching profile {}", user_id);

        self.collection::<UserProfile>(USERS)
            .find_one(doc! { "userId": user_id })
            .await
            .map_err(|e| LedgerError::StoreUnavailable(format!("Profile lookup for {}: {}", user_id, e)))?
            .ok_or_else(|| LedgerError::ProfileLookupFailure(format!("User {} not found", user_id)))
    }
}
