use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::dto::donation_dto::UpdateDonationDetailsRequest;
use crate::model::donation::{Donation, DonationStatus};
use crate::repository::donation_repo::{DonationRepository, MongoDonationRepository};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;
use crate::util::ids::generate_donation_id;
use crate::util::notify::donation_status_notification;
use crate::model::user::Notification;

const ID_GENERATION_ATTEMPTS: usize = 5;

#[async_trait]
pub trait DonationService: Send + Sync {
    async fn create(&self, donation: Donation) -> Result<Donation, ServiceError>;
    async fn get(&self, donation_id: &str) -> Result<Donation, ServiceError>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Donation>, ServiceError>;
    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Donation>, ServiceError>;
    async fn update_details(
        &self,
        donation_id: &str,
        update: UpdateDonationDetailsRequest,
    ) -> Result<Donation, ServiceError>;
    async fn update_status(
        &self,
        donation_id: &str,
        status: DonationStatus,
        notes: Option<String>,
    ) -> Result<Donation, ServiceError>;
    async fn delete(&self, donation_id: &str) -> Result<(), ServiceError>;
}

pub struct DonationServiceImpl {
    pub donation_repo: Arc<MongoDonationRepository>,
    pub user_repo: Arc<UserRepositoryImpl>,
}

impl DonationServiceImpl {
    pub fn new(donation_repo: Arc<MongoDonationRepository>, user_repo: Arc<UserRepositoryImpl>) -> Self {
        Self { donation_repo, user_repo }
    }

    async fn unique_donation_id(&self, donation: &Donation) -> Result<String, ServiceError> {
        for _ in 0..ID_GENERATION_ATTEMPTS {
            let candidate = generate_donation_id(donation.donation_type);
            if !self.donation_repo.donation_id_exists(&candidate).await? {
                return Ok(candidate);
            }
            warn!("Generated donation id collided, retrying");
        }
        Err(ServiceError::InternalError(
            "Failed to generate a unique donation id".to_string(),
        ))
    }

    /// Sync the owner's cached `donation_history` with the donation's current
    /// state, optionally delivering a notification in the same write.
    ///
    /// This is deliberately best-effort: the donation itself is already
    /// persisted, and a stale history entry self-heals on the next upsert.
    async fn sync_owner(&self, donation: &Donation, notification: Option<Notification>) {
        let result: Result<(), ServiceError> = async {
            let mut user = self
                .user_repo
                .find_by_user_id(&donation.user_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Owner not found: {}", donation.user_id))
                })?;
            user.upsert_donation_history(donation.history_entry());
            if let Some(notification) = notification {
                user.push_notification(notification);
            }
            let id = user
                .id
                .ok_or_else(|| ServiceError::InternalError("User document has no _id".to_string()))?;
            self.user_repo.update(id, user).await?;
            Ok(())
        }
        .await;

        if let Err(e) = result {
            warn!(
                "Failed to sync donation {} onto owner {}: {}",
                donation.donation_id, donation.user_id, e
            );
        }
    }
}

#[async_trait]
impl DonationService for DonationServiceImpl {
    #[instrument(skip(self, donation), fields(user_id = %donation.user_id))]
    async fn create(&self, mut donation: Donation) -> Result<Donation, ServiceError> {
        info!("Creating donation");
        donation.donation_id = self.unique_donation_id(&donation).await?;
        let created = self.donation_repo.create(donation).await?;
        self.sync_owner(&created, None).await;
        info!("Donation {} created", created.donation_id);
        Ok(created)
    }

    async fn get(&self, donation_id: &str) -> Result<Donation, ServiceError> {
        Ok(self.donation_repo.get_by_donation_id(donation_id).await?)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Donation>, ServiceError> {
        Ok(self.donation_repo.list_by_user(user_id).await?)
    }

    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Donation>, ServiceError> {
        Ok(self.donation_repo.list(page, limit).await?)
    }

    #[instrument(skip(self, update), fields(donation_id = %donation_id))]
    async fn update_details(
        &self,
        donation_id: &str,
        update: UpdateDonationDetailsRequest,
    ) -> Result<Donation, ServiceError> {
        info!("Updating donation details");
        let mut donation = self.donation_repo.get_by_donation_id(donation_id).await?;
        update.apply_to(&mut donation).map_err(ServiceError::InvalidInput)?;
        let id = donation
            .id
            .ok_or_else(|| ServiceError::InternalError("Donation document has no _id".to_string()))?;
        let updated = self.donation_repo.update(id, donation).await?;

        // Date and hospital feed the cached history entry; keep it current.
        self.sync_owner(&updated, None).await;
        Ok(updated)
    }

    #[instrument(skip(self, notes), fields(donation_id = %donation_id, status = status.as_str()))]
    async fn update_status(
        &self,
        donation_id: &str,
        status: DonationStatus,
        notes: Option<String>,
    ) -> Result<Donation, ServiceError> {
        info!("Updating donation status");
        let mut donation = self.donation_repo.get_by_donation_id(donation_id).await?;
        donation.apply_transition(status, notes);
        let id = donation
            .id
            .ok_or_else(|| ServiceError::InternalError("Donation document has no _id".to_string()))?;
        let updated = self.donation_repo.update(id, donation).await?;

        // One transition, one owner notification, one history upsert.
        let draft = donation_status_notification(status, updated.donation_type, &updated.donation_id);
        let notification = Notification::system(draft.message, draft.kind);
        self.sync_owner(&updated, Some(notification)).await;

        info!("Donation {} moved to {}", updated.donation_id, status.as_str());
        Ok(updated)
    }

    #[instrument(skip(self), fields(donation_id = %donation_id))]
    async fn delete(&self, donation_id: &str) -> Result<(), ServiceError> {
        info!("Deleting donation");
        let donation = self.donation_repo.get_by_donation_id(donation_id).await?;
        self.donation_repo.delete(donation_id).await?;

        // Best-effort history cleanup, mirroring sync_owner's policy.
        let result: Result<(), ServiceError> = async {
            let mut user = self
                .user_repo
                .find_by_user_id(&donation.user_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Owner not found: {}", donation.user_id))
                })?;
            if user.remove_donation_history(donation_id) {
                let id = user.id.ok_or_else(|| {
                    ServiceError::InternalError("User document has no _id".to_string())
                })?;
                self.user_repo.update(id, user).await?;
            }
            Ok(())
        }
        .await;
        if let Err(e) = result {
            warn!("Failed to remove history entry for {}: {}", donation_id, e);
        }
        Ok(())
    }
}
