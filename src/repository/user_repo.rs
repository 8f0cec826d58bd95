use crate::config::mongo_conf::MongoConfig;
use crate::model::user::User;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use tracing::{debug, info};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn update(&self, id: ObjectId, user: User) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    async fn find_by_user_id(&self, user_id: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_any_id(&self, target: &str) -> RepositoryResult<Option<User>>;
    async fn user_id_exists(&self, user_id: &str) -> RepositoryResult<bool>;
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<User>>;
    async fn count(&self, filter: Option<Document>) -> RepositoryResult<u64>;
}

pub struct UserRepositoryImpl {
    collection: mongodb::Collection<User>,
}

impl UserRepositoryImpl {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        use mongodb::{options::{ClientOptions, Credential, ResolverConfig}, Client};
        let mut client_options =
            ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
        client_options.app_name = Some("LifeLinkBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));
        if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password.clone())
                    .build(),
            );
        }
        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database);
        let collection_name = config.user_collection.as_deref().unwrap_or("users");
        let collection = db.collection::<User>(collection_name);
        Ok(UserRepositoryImpl { collection })
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        let result = self.collection.insert_one(user.clone(), None).await;
        match result {
            Ok(_) => {
                info!("User {} inserted successfully", user.user_id);
                Ok(user)
            }
            Err(e) => Err(RepositoryError::from(e)),
        }
    }

    async fn update(&self, id: ObjectId, mut user: User) -> RepositoryResult<User> {
        user.updated_at = Some(chrono::Utc::now().to_rfc3339());
        let filter = doc! { "_id": id };
        let mut document = bson::to_document(&user)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize user: {}", e)))?;
        document.remove("_id");
        let update = doc! { "$set": document };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => Ok(user),
            Ok(_) => Err(RepositoryError::not_found(format!("No user found to update for ID: {}", id))),
            Err(e) => Err(RepositoryError::database(format!("Failed to update user: {}", e))),
        }
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "email": email };
        let user = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by email: {}", e)))?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        let filter = doc! { "_id": id };
        let user = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by id: {}", e)))?;
        Ok(user)
    }

    async fn find_by_user_id(&self, user_id: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "user_id": user_id };
        let user = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by user_id: {}", e)))?;
        Ok(user)
    }

    /// Single lookup tolerating callers that pass either the human-readable
    /// `user_id` or the hex `_id`. Precedence: `user_id` first, then `_id`.
    async fn find_by_any_id(&self, target: &str) -> RepositoryResult<Option<User>> {
        debug!("Looking up user by any id: {}", target);
        if let Some(user) = self.find_by_user_id(target).await? {
            return Ok(Some(user));
        }
        match ObjectId::parse_str(target) {
            Ok(oid) => self.find_by_id(&oid).await,
            Err(_) => Ok(None),
        }
    }

    async fn user_id_exists(&self, user_id: &str) -> RepositoryResult<bool> {
        let filter = doc! { "user_id": user_id };
        let count = self
            .collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to check user_id existence: {}", e)))?;
        Ok(count > 0)
    }

    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<User>> {
        let skip = page.saturating_sub(1) * limit;
        let mut options = mongodb::options::FindOptions::default();
        options.skip = Some(skip as u64);
        options.limit = Some(limit as i64);
        options.sort = Some(doc! { "created_at": -1 });
        let mut cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list users: {}", e)))?;
        let mut users = Vec::new();
        while let Some(user) = cursor.next().await {
            match user {
                Ok(u) => users.push(u),
                Err(e) => {
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize user: {}",
                        e
                    )))
                }
            }
        }
        Ok(users)
    }

    async fn count(&self, filter: Option<Document>) -> RepositoryResult<u64> {
        let count = self
            .collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count users: {}", e)))?;
        Ok(count)
    }
}
