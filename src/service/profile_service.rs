use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{error, info, instrument, warn};

use crate::dto::profile_dto::{KycDecision, UpdateProfileRequest};
use crate::model::user::{
    DocumentStatus, KycDocument, KycStatus, Notification, User,
};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;
use crate::util::notify::{document_status_notification, kyc_status_notification};
use crate::util::storage::StorageService;

#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<User, ServiceError>;
    async fn update_profile(&self, user_id: &str, update: UpdateProfileRequest) -> Result<User, ServiceError>;
    async fn upload_kyc_file(
        &self,
        user_id: &str,
        filename: &str,
        data: Bytes,
        document_type: Option<String>,
    ) -> Result<User, ServiceError>;
    async fn upload_kyc_link(
        &self,
        user_id: &str,
        url: String,
        document_type: Option<String>,
    ) -> Result<User, ServiceError>;
    async fn review_kyc(
        &self,
        reviewer: &User,
        target_user_id: &str,
        decision: KycDecision,
    ) -> Result<User, ServiceError>;
    async fn review_document(
        &self,
        reviewer: &User,
        target_user_id: &str,
        document_id: &str,
        status: DocumentStatus,
        rejection_reason: Option<String>,
    ) -> Result<User, ServiceError>;
}

pub struct ProfileServiceImpl {
    pub user_repo: Arc<UserRepositoryImpl>,
    pub storage: Arc<StorageService>,
}

impl ProfileServiceImpl {
    pub fn new(user_repo: Arc<UserRepositoryImpl>, storage: Arc<StorageService>) -> Self {
        Self { user_repo, storage }
    }

    async fn load_user(&self, user_id: &str) -> Result<User, ServiceError> {
        self.user_repo
            .find_by_any_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User not found: {}", user_id)))
    }

    async fn persist(&self, user: User) -> Result<User, ServiceError> {
        let id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("User document has no _id".to_string()))?;
        Ok(self.user_repo.update(id, user).await?)
    }

    /// Record an upload on the user document: promote the status (from
    /// `not_submitted` only), mirror the url, append the reviewable entry,
    /// notify, recompute completion, and persist.
    async fn record_upload(
        &self,
        mut user: User,
        url: String,
        document_type: Option<String>,
    ) -> Result<User, ServiceError> {
        user.record_kyc_document(KycDocument {
            url,
            document_type,
            uploaded_at: None,
            verified_at: None,
            verified_by: None,
            rejection_reason: None,
        });
        let draft = kyc_status_notification(KycStatus::Pending, None);
        user.push_notification(Notification::system(draft.message, draft.kind));
        user.refresh_completion();
        self.persist(user).await
    }
}

#[async_trait]
impl ProfileService for ProfileServiceImpl {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn get_profile(&self, user_id: &str) -> Result<User, ServiceError> {
        self.load_user(user_id).await
    }

    #[instrument(skip(self, update), fields(user_id = %user_id))]
    async fn update_profile(&self, user_id: &str, update: UpdateProfileRequest) -> Result<User, ServiceError> {
        info!("Updating profile");
        let mut user = self.load_user(user_id).await?;
        update
            .apply_to(&mut user)
            .map_err(ServiceError::InvalidInput)?;
        user.refresh_completion();
        let updated = self.persist(user).await?;
        info!(
            "Profile updated, completion now {}%",
            updated.profile_completion
        );
        Ok(updated)
    }

    #[instrument(skip(self, data), fields(user_id = %user_id, filename = %filename))]
    async fn upload_kyc_file(
        &self,
        user_id: &str,
        filename: &str,
        data: Bytes,
        document_type: Option<String>,
    ) -> Result<User, ServiceError> {
        info!("Processing KYC file upload");
        let user = self.load_user(user_id).await?;
        let url = self
            .storage
            .put_document(&user.user_id, filename, data)
            .await
            .map_err(|e| match e {
                crate::util::storage::StorageError::RejectedUpload(msg) => {
                    ServiceError::InvalidInput(msg)
                }
                other => {
                    error!("KYC upload storage failure: {}", other);
                    ServiceError::InternalError(other.to_string())
                }
            })?;
        self.record_upload(user, url, document_type).await
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn upload_kyc_link(
        &self,
        user_id: &str,
        url: String,
        document_type: Option<String>,
    ) -> Result<User, ServiceError> {
        info!("Processing KYC link upload");
        let user = self.load_user(user_id).await?;
        self.record_upload(user, url, document_type).await
    }

    #[instrument(skip(self, reviewer, decision), fields(reviewer = %reviewer.user_id, target = %target_user_id))]
    async fn review_kyc(
        &self,
        reviewer: &User,
        target_user_id: &str,
        decision: KycDecision,
    ) -> Result<User, ServiceError> {
        info!("Reviewing KYC submission");
        let mut user = self.load_user(target_user_id).await?;

        if user.kyc_document.is_none() {
            warn!("KYC review attempted with no document on file");
            return Err(ServiceError::InvalidInput(
                "User has no KYC document to review".to_string(),
            ));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let (status, reason) = match decision {
            KycDecision::Approve => (KycStatus::Completed, None),
            KycDecision::Reject { reason } => (KycStatus::Rejected, Some(reason)),
        };

        user.kyc_status = status;
        if status == KycStatus::Completed {
            if let Some(document) = user.kyc_document.as_mut() {
                document.verified_at = Some(now);
                document.verified_by = Some(reviewer.user_id.clone());
                document.rejection_reason = None;
            }
            // Only approval feeds the completion score; rejection leaves the
            // previously computed flags untouched.
            user.refresh_completion();
        } else if let Some(document) = user.kyc_document.as_mut() {
            document.rejection_reason = reason.clone();
        }

        let draft = kyc_status_notification(status, reason.as_deref());
        let staff_name = reviewer.name.clone().unwrap_or_else(|| reviewer.user_id.clone());
        user.push_notification(Notification::from_staff(
            draft.message,
            draft.kind,
            &reviewer.user_id,
            &staff_name,
        ));

        let updated = self.persist(user).await?;
        info!("KYC review recorded: {}", updated.kyc_status.as_str());
        Ok(updated)
    }

    #[instrument(skip(self, reviewer, rejection_reason), fields(reviewer = %reviewer.user_id, target = %target_user_id, document_id = %document_id))]
    async fn review_document(
        &self,
        reviewer: &User,
        target_user_id: &str,
        document_id: &str,
        status: DocumentStatus,
        rejection_reason: Option<String>,
    ) -> Result<User, ServiceError> {
        info!("Reviewing individual KYC document");
        let mut user = self.load_user(target_user_id).await?;

        let entry = user
            .kyc_documents
            .items
            .iter_mut()
            .find(|entry| entry.id == document_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Document not found: {}", document_id)))?;

        entry.status = status;
        entry.rejection_reason = if status == DocumentStatus::Rejected {
            rejection_reason.clone()
        } else {
            None
        };

        let draft = document_status_notification(status, rejection_reason.as_deref());
        let staff_name = reviewer.name.clone().unwrap_or_else(|| reviewer.user_id.clone());
        user.push_notification(Notification::from_staff(
            draft.message,
            draft.kind,
            &reviewer.user_id,
            &staff_name,
        ));

        self.persist(user).await
    }
}
