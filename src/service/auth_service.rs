use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::dto::auth_dto::AuthResponse;
use crate::dto::profile_dto::UserView;
use crate::model::user::{Notification, NotificationKind, User};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;
use crate::util::ids::generate_user_id;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl, TokenPair};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

/// Attempts at finding a free generated id before giving up. Collisions on a
/// 7-digit space are rare; repeated collisions indicate a systemic problem.
const ID_GENERATION_ATTEMPTS: usize = 5;

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(
        &self,
        email: String,
        password: String,
        name: Option<String>,
        register_as_staff: bool,
    ) -> Result<AuthResponse, ServiceError>;
    async fn login(&self, email: String, password: String, ip: Option<String>) -> Result<AuthResponse, ServiceError>;
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError>;
}

pub struct AuthServiceImpl {
    pub user_repo: Arc<UserRepositoryImpl>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl AuthServiceImpl {
    pub fn new(user_repo: Arc<UserRepositoryImpl>, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        Self { user_repo, jwt_utils }
    }

    async fn unique_user_id(&self) -> Result<String, ServiceError> {
        for _ in 0..ID_GENERATION_ATTEMPTS {
            let candidate = generate_user_id();
            if !self.user_repo.user_id_exists(&candidate).await? {
                return Ok(candidate);
            }
            warn!("Generated user id collided, retrying");
        }
        Err(ServiceError::InternalError(
            "Failed to generate a unique user id".to_string(),
        ))
    }

    fn token_pair_for(&self, user: &User) -> Result<TokenPair, ServiceError> {
        self.jwt_utils
            .generate_token_pair(&user.user_id, &user.email, user.role_label(), user.jwt_version)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn register(
        &self,
        email: String,
        password: String,
        name: Option<String>,
        register_as_staff: bool,
    ) -> Result<AuthResponse, ServiceError> {
        info!("Registering new user");

        PasswordUtilsImpl::validate_password_strength(&password)
            .map_err(|errors| ServiceError::InvalidInput(errors.join("; ")))?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            error!("Registration rejected: email already in use");
            return Err(ServiceError::Conflict("Email already registered".to_string()));
        }

        let user_id = self.unique_user_id().await?;
        let mut user = User::new(user_id, email);
        user.name = name;
        user.roles.staff = register_as_staff;
        user.password_hash = PasswordUtilsImpl::hash_password(&password)
            .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))?;

        user.push_notification(Notification::system(
            "Welcome to LifeLink! Thank you for joining our donor community.",
            NotificationKind::Welcome,
        ));
        user.push_notification(Notification::system(
            "Complete your profile and verify your identity to start donating.",
            NotificationKind::Reminder,
        ));
        user.refresh_completion();

        let inserted = self.user_repo.insert(user).await?;
        info!("User {} registered successfully", inserted.user_id);

        let tokens = self.token_pair_for(&inserted)?;
        Ok(AuthResponse { user: UserView::from(inserted), tokens })
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: String, password: String, ip: Option<String>) -> Result<AuthResponse, ServiceError> {
        info!("User login attempt");

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = PasswordUtilsImpl::verify_password(&password, &user.password_hash)
            .map_err(|e| ServiceError::InternalError(format!("Password verify error: {}", e)))?;
        if !valid {
            error!("Invalid credentials for user: {}", email);
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }

        let mut user = user;
        if let Some(ip) = ip {
            user.record_login_ip(ip);
            if let Some(id) = user.id {
                user = self.user_repo.update(id, user).await?;
            }
        }

        let tokens = self.token_pair_for(&user)?;
        info!("User {} logged in successfully", user.user_id);
        Ok(AuthResponse { user: UserView::from(user), tokens })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError> {
        info!("Refreshing token");

        let claims = self
            .jwt_utils
            .validate_refresh_token(&refresh_token)
            .map_err(|e| ServiceError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        // Re-check the nonce against the live document so a bumped
        // jwt_version invalidates outstanding refresh tokens too.
        let user = self
            .user_repo
            .find_by_user_id(&claims.sub)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("User no longer exists".to_string()))?;

        if user.jwt_version != claims.jwt_version {
            warn!("Stale refresh token for user {}", user.user_id);
            return Err(ServiceError::Unauthorized("Token has been invalidated".to_string()));
        }

        let tokens = self.token_pair_for(&user)?;
        info!("Token refreshed for user {}", user.user_id);
        Ok(tokens)
    }
}
