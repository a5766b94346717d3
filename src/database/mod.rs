use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Collection, Database};
use std::error::Error;

use crate::{
    models::{LedgerEntry, LedgerList, MatchingData},
    utils::error::LedgerError,
};

#[cfg(test)]
pub mod in_memory;

pub const MATCHING_DATA: &str = "matchingData";
pub const USERS: &str = "users";

const DUPLICATE_KEY: i32 = 11000;

/// Key-addressed document store for the "matchingData" collection.
///
/// Each call is atomic on its own document; there are no cross-document
/// transactions and nothing spans a `get` and the write that follows it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Absent documents are `Ok(None)`, not an error.
    async fn get(&self, user_id: &str) -> Result<Option<MatchingData>, LedgerError>;

    /// Creates a new document. Fails with `Conflict` if one already exists.
    async fn create(&self, record: &MatchingData) -> Result<(), LedgerError>;

    /// Replaces a single list field, leaving the other fields untouched.
    async fn merge(
        &self,
        user_id: &str,
        list: LedgerList,
        entries: &[LedgerEntry],
    ) -> Result<(), LedgerError>;
}

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        // Timeouts: the store is the only place a ledger call can hang
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty() && !s.contains(':'))
            .unwrap_or("matching");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the ledger relies on
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        // matchingData(userId) UNIQUE - one ledger document per user, makes create fail on a race
        let matching = self.collection::<Document>(MATCHING_DATA);

        let matching_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match matching.create_index(matching_index).await {
            Ok(_) => log::info!("   ✅ Index created: matchingData(userId) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // users(userId) - profile lookups for display names
        let users = self.collection::<Document>(USERS);

        let users_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .build();

        match users.create_index(users_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(userId)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl DocumentStore for MongoDB {
    async fn get(&self, user_id: &str) -> Result<Option<MatchingData>, LedgerError> {
        let record = self
            .collection::<MatchingData>(MATCHING_DATA)
            .find_one(doc! { "userId": user_id })
            .await?;

        Ok(record)
    }

    async fn create(&self, record: &MatchingData) -> Result<(), LedgerError> {
        match self
            .collection::<MatchingData>(MATCHING_DATA)
            .insert_one(record)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(LedgerError::Conflict(format!(
                "matchingData for {} already exists",
                record.user_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn merge(
        &self,
        user_id: &str,
        list: LedgerList,
        entries: &[LedgerEntry],
    ) -> Result<(), LedgerError> {
        let value = mongodb::bson::to_bson(entries)
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to encode {}: {}", list, e)))?;

        // $set on a single field: writes to the other lists are never clobbered
        let mut fields = Document::new();
        fields.insert(list.field(), value);

        let result = self
            .collection::<MatchingData>(MATCHING_DATA)
            .update_one(doc! { "userId": user_id }, doc! { "$set": fields })
            .await?;

        if result.matched_count == 0 {
            return Err(LedgerError::RecordNotFound(format!(
                "matchingData for {} disappeared before update",
                user_id
            )));
        }

        Ok(())
    }
}
