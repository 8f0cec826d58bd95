use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::model::user::{Notification, NotificationKind, User};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;
use crate::util::notify::NotificationDraft;

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Best-effort system notification. Failures are logged, never
    /// propagated; the returned flag is informational only.
    async fn notify_user(&self, user_id: &str, draft: NotificationDraft) -> bool;
    /// Staff-authored notification pushed onto a user's inbox. Unlike the
    /// system path this is the caller's primary operation, so errors surface.
    async fn notify_from_staff(
        &self,
        staff: &User,
        target_user_id: &str,
        message: String,
        kind: NotificationKind,
    ) -> Result<(), ServiceError>;
    async fn list(&self, user_id: &str) -> Result<Vec<Notification>, ServiceError>;
    async fn mark_read(&self, user_id: &str, notification_id: &str) -> Result<(), ServiceError>;
    async fn mark_all_read(&self, user_id: &str) -> Result<u32, ServiceError>;
}

pub struct NotificationServiceImpl {
    pub user_repo: Arc<UserRepositoryImpl>,
}

impl NotificationServiceImpl {
    pub fn new(user_repo: Arc<UserRepositoryImpl>) -> Self {
        Self { user_repo }
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
}

#[async_trait]
impl NotificationService for NotificationServiceImpl {
    #[instrument(skip(self, draft), fields(user_id = %user_id))]
    async fn notify_user(&self, user_id: &str, draft: NotificationDraft) -> bool {
        let result: Result<(), ServiceError> = async {
            let mut user = self.load_user(user_id).await?;
            user.push_notification(Notification::system(draft.message, draft.kind));
            self.persist(user).await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to deliver notification to {}: {}", user_id, e);
                false
            }
        }
    }

    #[instrument(skip(self, staff, message), fields(staff = %staff.user_id, target = %target_user_id))]
    async fn notify_from_staff(
        &self,
        staff: &User,
        target_user_id: &str,
        message: String,
        kind: NotificationKind,
    ) -> Result<(), ServiceError> {
        info!("Pushing staff notification");
        let mut user = self.load_user(target_user_id).await?;
        let staff_name = staff.name.clone().unwrap_or_else(|| staff.user_id.clone());
        user.push_notification(Notification::from_staff(message, kind, &staff.user_id, &staff_name));
        self.persist(user).await?;
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Notification>, ServiceError> {
        let user = self.load_user(user_id).await?;
        Ok(user.notifications)
    }

    #[instrument(skip(self), fields(user_id = %user_id, notification_id = %notification_id))]
    async fn mark_read(&self, user_id: &str, notification_id: &str) -> Result<(), ServiceError> {
        let mut user = self.load_user(user_id).await?;
        let notification = user
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Notification not found: {}", notification_id))
            })?;
        notification.is_read = true;
        self.persist(user).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn mark_all_read(&self, user_id: &str) -> Result<u32, ServiceError> {
        let mut user = self.load_user(user_id).await?;
        let mut marked = 0u32;
        for notification in user.notifications.iter_mut().filter(|n| !n.is_read) {
            notification.is_read = true;
            marked += 1;
        }
        if marked > 0 {
            self.persist(user).await?;
        }
        Ok(marked)
    }
}
