use crate::config::mongo_conf::MongoConfig;
use crate::model::donation::{Donation, DonationStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use tracing::{error, info};

#[async_trait]
pub trait DonationRepository: Send + Sync {
    async fn create(&self, donation: Donation) -> RepositoryResult<Donation>;
    async fn get_by_donation_id(&self, donation_id: &str) -> RepositoryResult<Donation>;
    async fn update(&self, id: ObjectId, donation: Donation) -> RepositoryResult<Donation>;
    async fn delete(&self, donation_id: &str) -> RepositoryResult<()>;
    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Donation>>;
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Donation>>;
    async fn donation_id_exists(&self, donation_id: &str) -> RepositoryResult<bool>;
    async fn count_by_status(&self, status: DonationStatus) -> RepositoryResult<u64>;
}

pub struct MongoDonationRepository {
    collection: mongodb::Collection<Donation>,
}

impl MongoDonationRepository {
    /// Create a new MongoDonationRepository using MongoConfig
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
        let collection_name = config.donation_collection.as_deref().unwrap_or("donations");
        let collection = db.collection::<Donation>(collection_name);
        Ok(MongoDonationRepository { collection })
    }
}

#[async_trait]
impl DonationRepository for MongoDonationRepository {
    #[tracing::instrument(skip(self, donation), fields(donation_id = %donation.donation_id))]
    async fn create(&self, donation: Donation) -> RepositoryResult<Donation> {
        info!("Creating new donation");
        let mut new_donation = donation;
        new_donation.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        new_donation.created_at = Some(now.clone());
        new_donation.updated_at = Some(now);

        let result = self.collection.insert_one(new_donation.clone(), None).await;
        match result {
            Ok(_) => {
                info!("Donation created successfully");
                Ok(new_donation)
            }
            Err(e) => {
                error!("Failed to create donation: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(donation_id = %donation_id))]
    async fn get_by_donation_id(&self, donation_id: &str) -> RepositoryResult<Donation> {
        let filter = doc! { "donation_id": donation_id };
        let result = self.collection.find_one(filter, None).await;
        match result {
            Ok(Some(donation)) => Ok(donation),
            Ok(None) => {
                error!("Donation not found: {}", donation_id);
                Err(RepositoryError::not_found(format!("Donation not found: {}", donation_id)))
            }
            Err(e) => {
                error!("Failed to fetch donation: {}", e);
                Err(RepositoryError::database(format!("Failed to fetch donation: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self, donation), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut donation: Donation) -> RepositoryResult<Donation> {
        donation.updated_at = Some(chrono::Utc::now().to_rfc3339());
        let filter = doc! { "_id": id };
        let mut document = bson::to_document(&donation)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize donation: {}", e)))?;
        document.remove("_id");
        let update = doc! { "$set": document };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            Ok(update_result) if update_result.matched_count > 0 => {
                info!("Donation updated successfully for ID: {}", id);
                Ok(donation)
            }
            Ok(_) => {
                error!("No donation found to update for ID: {}", id);
                Err(RepositoryError::not_found(format!("No donation found to update for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to update donation: {}", e);
                Err(RepositoryError::database(format!("Failed to update donation: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(donation_id = %donation_id))]
    async fn delete(&self, donation_id: &str) -> RepositoryResult<()> {
        let filter = doc! { "donation_id": donation_id };
        let result = self.collection.delete_one(filter, None).await;
        match result {
            Ok(delete_result) if delete_result.deleted_count > 0 => {
                info!("Donation deleted successfully: {}", donation_id);
                Ok(())
            }
            Ok(_) => {
                error!("No donation found to delete: {}", donation_id);
                Err(RepositoryError::not_found(format!("No donation found to delete: {}", donation_id)))
            }
            Err(e) => {
                error!("Failed to delete donation: {}", e);
                Err(RepositoryError::database(format!("Failed to delete donation: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Donation>> {
        let filter = doc! { "user_id": user_id };
        let mut options = mongodb::options::FindOptions::default();
        options.sort = Some(doc! { "created_at": -1 });
        let mut cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list donations: {}", e)))?;
        let mut donations = Vec::new();
        while let Some(donation) = cursor.next().await {
            match donation {
                Ok(d) => donations.push(d),
                Err(e) => {
                    error!("Failed to deserialize donation: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize donation: {}",
                        e
                    )));
                }
            }
        }
        Ok(donations)
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Donation>> {
        let skip = page.saturating_sub(1) * limit;
        let mut options = mongodb::options::FindOptions::default();
        options.skip = Some(skip as u64);
        options.limit = Some(limit as i64);
        options.sort = Some(doc! { "created_at": -1 });
        let mut cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list donations: {}", e)))?;
        let mut donations = Vec::new();
        while let Some(donation) = cursor.next().await {
            match donation {
                Ok(d) => donations.push(d),
                Err(e) => {
                    error!("Failed to deserialize donation: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize donation: {}",
                        e
                    )));
                }
            }
        }
        Ok(donations)
    }

    async fn donation_id_exists(&self, donation_id: &str) -> RepositoryResult<bool> {
        let filter = doc! { "donation_id": donation_id };
        let count = self
            .collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to check donation_id existence: {}", e)))?;
        Ok(count > 0)
    }

    async fn count_by_status(&self, status: DonationStatus) -> RepositoryResult<u64> {
        let filter = doc! { "status": status.as_str() };
        let count = self
            .collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count donations: {}", e)))?;
        Ok(count)
    }
}
