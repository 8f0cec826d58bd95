use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::dto::request_dto::UpdateRequestDetailsRequest;
use crate::model::request::{FulfillmentEntry, Request, RequestStatus};
use crate::repository::request_repo::{MongoRequestRepository, RequestRepository};
use crate::service::notification_service::{NotificationService, NotificationServiceImpl};
use crate::util::error::ServiceError;
use crate::util::ids::generate_request_id;
use crate::util::notify::request_status_notification;

const ID_GENERATION_ATTEMPTS: usize = 5;

#[async_trait]
pub trait RequestService: Send + Sync {
    async fn create(&self, request: Request) -> Result<Request, ServiceError>;
    async fn get(&self, request_id: &str) -> Result<Request, ServiceError>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Request>, ServiceError>;
    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Request>, ServiceError>;
    async fn update_details(
        &self,
        request_id: &str,
        update: UpdateRequestDetailsRequest,
    ) -> Result<Request, ServiceError>;
    async fn update_status(&self, request_id: &str, status: RequestStatus) -> Result<Request, ServiceError>;
    async fn fulfill(&self, request_id: &str, entry: FulfillmentEntry) -> Result<Request, ServiceError>;
    async fn delete(&self, request_id: &str) -> Result<(), ServiceError>;
}

pub struct RequestServiceImpl {
    pub request_repo: Arc<MongoRequestRepository>,
    pub notifications: Arc<NotificationServiceImpl>,
}

impl RequestServiceImpl {
    pub fn new(request_repo: Arc<MongoRequestRepository>, notifications: Arc<NotificationServiceImpl>) -> Self {
        Self { request_repo, notifications }
    }

    async fn unique_request_id(&self) -> Result<String, ServiceError> {
        for _ in 0..ID_GENERATION_ATTEMPTS {
            let candidate = generate_request_id();
            if !self.request_repo.request_id_exists(&candidate).await? {
                return Ok(candidate);
            }
            warn!("Generated request id collided, retrying");
        }
        Err(ServiceError::InternalError(
            "Failed to generate a unique request id".to_string(),
        ))
    }

    async fn persist(&self, request: Request) -> Result<Request, ServiceError> {
        let id = request
            .id
            .ok_or_else(|| ServiceError::InternalError("Request document has no _id".to_string()))?;
        Ok(self.request_repo.update(id, request).await?)
    }
}

#[async_trait]
impl RequestService for RequestServiceImpl {
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    async fn create(&self, mut request: Request) -> Result<Request, ServiceError> {
        info!("Creating request");
        request.request_id = self.unique_request_id().await?;
        let created = self.request_repo.create(request).await?;
        info!("Request {} created", created.request_id);
        Ok(created)
    }

    async fn get(&self, request_id: &str) -> Result<Request, ServiceError> {
        Ok(self.request_repo.get_by_request_id(request_id).await?)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Request>, ServiceError> {
        Ok(self.request_repo.list_by_user(user_id).await?)
    }

    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Request>, ServiceError> {
        Ok(self.request_repo.list(page, limit).await?)
    }

    #[instrument(skip(self, update), fields(request_id = %request_id))]
    async fn update_details(
        &self,
        request_id: &str,
        update: UpdateRequestDetailsRequest,
    ) -> Result<Request, ServiceError> {
        info!("Updating request details");
        let mut request = self.request_repo.get_by_request_id(request_id).await?;
        update.apply_to(&mut request).map_err(ServiceError::InvalidInput)?;
        self.persist(request).await
    }

    #[instrument(skip(self), fields(request_id = %request_id, status = status.as_str()))]
    async fn update_status(&self, request_id: &str, status: RequestStatus) -> Result<Request, ServiceError> {
        info!("Updating request status");
        let mut request = self.request_repo.get_by_request_id(request_id).await?;
        request.status = status;
        let updated = self.persist(request).await?;

        let draft = request_status_notification(status, &updated.request_id);
        self.notifications.notify_user(&updated.user_id, draft).await;

        info!("Request {} moved to {}", updated.request_id, status.as_str());
        Ok(updated)
    }

    #[instrument(skip(self, entry), fields(request_id = %request_id, donor = %entry.donor_user_id))]
    async fn fulfill(&self, request_id: &str, entry: FulfillmentEntry) -> Result<Request, ServiceError> {
        info!("Recording request fulfillment");
        let mut request = self.request_repo.get_by_request_id(request_id).await?;

        match request.status {
            RequestStatus::Pending | RequestStatus::Matched => {}
            other => {
                return Err(ServiceError::InvalidInput(format!(
                    "Request {} cannot be fulfilled in status {}",
                    request_id,
                    other.as_str()
                )));
            }
        }

        let before = request.status;
        let after = request.record_fulfillment(entry);
        let updated = self.persist(request).await?;

        // Partial blood fulfillments leave the status alone; only a real
        // transition is worth waking the requester up for.
        if after != before {
            let draft = request_status_notification(after, &updated.request_id);
            self.notifications.notify_user(&updated.user_id, draft).await;
        }

        info!("Request {} now {}", updated.request_id, updated.status.as_str());
        Ok(updated)
    }

    #[instrument(skip(self), fields(request_id = %request_id))]
    async fn delete(&self, request_id: &str) -> Result<(), ServiceError> {
        info!("Deleting request");
        // Load first so a missing id surfaces as 404 rather than a no-op.
        self.request_repo.get_by_request_id(request_id).await?;
        self.request_repo.delete(request_id).await?;
        Ok(())
    }
}
