use std::sync::Arc;

use async_trait::async_trait;
use bson::doc;
use tracing::{info, instrument};

use crate::dto::staff_dto::DashboardCounts;
use crate::model::donation::DonationStatus;
use crate::model::request::RequestStatus;
use crate::model::user::{KycStatus, User};
use crate::repository::donation_repo::{DonationRepository, MongoDonationRepository};
use crate::repository::request_repo::{MongoRequestRepository, RequestRepository};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;

#[async_trait]
pub trait StaffService: Send + Sync {
    async fn dashboard(&self) -> Result<DashboardCounts, ServiceError>;
    async fn list_users(&self, page: u32, limit: u32) -> Result<Vec<User>, ServiceError>;
    async fn set_staff_approval(&self, target_user_id: &str, approved: bool) -> Result<User, ServiceError>;
}

pub struct StaffServiceImpl {
    pub user_repo: Arc<UserRepositoryImpl>,
    pub donation_repo: Arc<MongoDonationRepository>,
    pub request_repo: Arc<MongoRequestRepository>,
}

impl StaffServiceImpl {
    pub fn new(
        user_repo: Arc<UserRepositoryImpl>,
        donation_repo: Arc<MongoDonationRepository>,
        request_repo: Arc<MongoRequestRepository>,
    ) -> Self {
        Self { user_repo, donation_repo, request_repo }
    }
}

#[async_trait]
impl StaffService for StaffServiceImpl {
    #[instrument(skip(self))]
    async fn dashboard(&self) -> Result<DashboardCounts, ServiceError> {
        info!("Building staff dashboard counts");
        let total_users = self.user_repo.count(None).await?;
        let pending_kyc = self
            .user_repo
            .count(Some(doc! { "kyc_status": KycStatus::Pending.as_str() }))
            .await?;
        let pending_donations = self.donation_repo.count_by_status(DonationStatus::Pending).await?;
        let completed_donations = self.donation_repo.count_by_status(DonationStatus::Completed).await?;
        let pending_requests = self.request_repo.count_by_status(RequestStatus::Pending).await?;
        let fulfilled_requests = self.request_repo.count_by_status(RequestStatus::Fulfilled).await?;

        Ok(DashboardCounts {
            total_users,
            pending_kyc,
            pending_donations,
            completed_donations,
            pending_requests,
            fulfilled_requests,
        })
    }

    async fn list_users(&self, page: u32, limit: u32) -> Result<Vec<User>, ServiceError> {
        Ok(self.user_repo.list(page, limit).await?)
    }

    /// Toggle staff approval. The jwt_version bump forces every outstanding
    /// session for the user to re-authenticate with the new capability set.
    #[instrument(skip(self), fields(target = %target_user_id, approved = approved))]
    async fn set_staff_approval(&self, target_user_id: &str, approved: bool) -> Result<User, ServiceError> {
        info!("Setting staff approval");
        let mut user = self
            .user_repo
            .find_by_any_id(target_user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User not found: {}", target_user_id)))?;

        if !user.roles.staff {
            return Err(ServiceError::InvalidInput(format!(
                "User {} has not registered as staff",
                user.user_id
            )));
        }

        user.staff_approval = approved;
        user.jwt_version += 1;

        let id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("User document has no _id".to_string()))?;
        let updated = self.user_repo.update(id, user).await?;
        info!("Staff approval for {} set to {}", updated.user_id, approved);
        Ok(updated)
    }
}
