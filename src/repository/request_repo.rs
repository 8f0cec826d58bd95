use crate::config::mongo_conf::MongoConfig;
use crate::model::request::{Request, RequestStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use tracing::{error, info};

#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn create(&self, request: Request) -> RepositoryResult<Request>;
    async fn get_by_request_id(&self, request_id: &str) -> RepositoryResult<Request>;
    async fn update(&self, id: ObjectId, request: Request) -> RepositoryResult<Request>;
    async fn delete(&self, request_id: &str) -> RepositoryResult<()>;
    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Request>>;
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Request>>;
    async fn request_id_exists(&self, request_id: &str) -> RepositoryResult<bool>;
    async fn count_by_status(&self, status: RequestStatus) -> RepositoryResult<u64>;
}

pub struct MongoRequestRepository {
    collection: mongodb::Collection<Request>,
}

impl MongoRequestRepository {
    /// Create a new MongoRequestRepository using MongoConfig
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
        let collection_name = config.request_collection.as_deref().unwrap_or("requests");
        let collection = db.collection::<Request>(collection_name);
        Ok(MongoRequestRepository { collection })
    }
}

#[async_trait]
impl RequestRepository for MongoRequestRepository {
    #[tracing::instrument(skip(self, request), fields(request_id = %request.request_id))]
    async fn create(&self, request: Request) -> RepositoryResult<Request> {
        info!("Creating new request");
        let mut new_request = request;
        new_request.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        new_request.created_at = Some(now.clone());
        new_request.updated_at = Some(now);

        let result = self.collection.insert_one(new_request.clone(), None).await;
        match result {
            Ok(_) => {
                info!("Request created successfully");
                Ok(new_request)
            }
            Err(e) => {
                error!("Failed to create request: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(request_id = %request_id))]
    async fn get_by_request_id(&self, request_id: &str) -> RepositoryResult<Request> {
        let filter = doc! { "request_id": request_id };
        let result = self.collection.find_one(filter, None).await;
        match result {
            Ok(Some(request)) => Ok(request),
            Ok(None) => {
                error!("Request not found: {}", request_id);
                Err(RepositoryError::not_found(format!("Request not found: {}", request_id)))
            }
            Err(e) => {
                error!("Failed to fetch request: {}", e);
                Err(RepositoryError::database(format!("Failed to fetch request: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self, request), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut request: Request) -> RepositoryResult<Request> {
        request.updated_at = Some(chrono::Utc::now().to_rfc3339());
        let filter = doc! { "_id": id };
        let mut document = bson::to_document(&request)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize request: {}", e)))?;
        document.remove("_id");
        let update = doc! { "$set": document };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => {
                info!("Request updated successfully for ID: {}", id);
                Ok(request)
            }
            Ok(_) => {
                error!("No request found to update for ID: {}", id);
                Err(RepositoryError::not_found(format!("No request found to update for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to update request: {}", e);
                Err(RepositoryError::database(format!("Failed to update request: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(request_id = %request_id))]
    async fn delete(&self, request_id: &str) -> RepositoryResult<()> {
        let filter = doc! { "request_id": request_id };
        let result = self.collection.delete_one(filter, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => {
                info!("Request deleted successfully: {}", request_id);
                Ok(())
            }
            Ok(_) => {
                error!("No request found to delete: {}", request_id);
                Err(RepositoryError::not_found(format!("No request found to delete: {}", request_id)))
            }
            Err(e) => {
                error!("Failed to delete request: {}", e);
                Err(RepositoryError::database(format!("Failed to delete request: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Request>> {
        let filter = doc! { "user_id": user_id };
        let mut options = mongodb::options::FindOptions::default();
        options.sort = Some(doc! { "created_at": -1 });
        let mut cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list requests: {}", e)))?;
        let mut requests = Vec::new();
        while let Some(request) = cursor.next().await {
            match request {
                Ok(r) => requests.push(r),
                Err(e) => {
                    error!("Failed to deserialize request: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize request: {}",
                        e
                    )));
                }
            }
        }
        Ok(requests)
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Request>> {
        let skip = page.saturating_sub(1) * limit;
        let mut options = mongodb::options::FindOptions::default();
        options.skip = Some(skip as u64);
        options.limit = Some(limit as i64);
        options.sort = Some(doc! { "created_at": -1 });
        let mut cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list requests: {}", e)))?;
        let mut requests = Vec::new();
        while let Some(request) = cursor.next().await {
            match request {
                Ok(r) => requests.push(r),
                Err(e) => {
                    error!("Failed to deserialize request: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize request: {}",
                        e
                    )));
                }
            }
        }
        Ok(requests)
    }

    async fn request_id_exists(&self, request_id: &str) -> RepositoryResult<bool> {
        let filter = doc! { "request_id": request_id };
        let count = self
            .collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to check request_id existence: {}", e)))?;
        Ok(count > 0)
    }

    async fn count_by_status(&self, status: RequestStatus) -> RepositoryResult<u64> {
        let filter = doc! { "status": status.as_str() };
        let count = self
            .collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count requests: {}", e)))?;
        Ok(count)
    }
}
