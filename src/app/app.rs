use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tracing::{error, info, warn};

use crate::config::admin_user_conf::AdminUserConfig;
use crate::config::app_conf::AppConfig;
use crate::config::{JwtConfig, MongoConfig, UploadConfig};
use crate::handler::staff_handler::StaffHandlerState;
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::donation_repo::MongoDonationRepository;
use crate::repository::request_repo::MongoRequestRepository;
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::router::auth_router::auth_router;
use crate::router::donation_router::donation_router;
use crate::router::notification_router::notification_router;
use crate::router::profile_router::profile_router;
use crate::router::request_router::request_router;
use crate::router::staff_router::staff_router;
use crate::service::auth_service::{AuthService, AuthServiceImpl};
use crate::service::donation_service::DonationServiceImpl;
use crate::service::notification_service::NotificationServiceImpl;
use crate::service::profile_service::ProfileServiceImpl;
use crate::service::request_service::RequestServiceImpl;
use crate::service::staff_service::StaffServiceImpl;
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::storage::StorageService;

pub struct App {
    config: AppConfig,
    router: Router,
    pub auth_service: Arc<AuthServiceImpl>,
    pub user_repo: Arc<UserRepositoryImpl>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();

        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");
        let upload_config = UploadConfig::from_env().expect("Upload config error");

        let user_repo = Arc::new(
            UserRepositoryImpl::new(&mongo_config)
                .await
                .expect("User repo error"),
        );
        let donation_repo = Arc::new(
            MongoDonationRepository::new(&mongo_config)
                .await
                .expect("Donation repo error"),
        );
        let request_repo = Arc::new(
            MongoRequestRepository::new(&mongo_config)
                .await
                .expect("Request repo error"),
        );

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let storage = Arc::new(
            StorageService::new(upload_config)
                .await
                .expect("Storage service error"),
        );

        let auth_service = Arc::new(AuthServiceImpl::new(user_repo.clone(), jwt_utils.clone()));
        let profile_service = Arc::new(ProfileServiceImpl::new(user_repo.clone(), storage));
        let notification_service = Arc::new(NotificationServiceImpl::new(user_repo.clone()));
        let donation_service = Arc::new(DonationServiceImpl::new(
            donation_repo.clone(),
            user_repo.clone(),
        ));
        let request_service = Arc::new(RequestServiceImpl::new(
            request_repo.clone(),
            notification_service.clone(),
        ));
        let staff_service = Arc::new(StaffServiceImpl::new(
            user_repo.clone(),
            donation_repo,
            request_repo,
        ));

        let auth_state = Arc::new(AuthState {
            jwt_utils,
            user_repo: user_repo.clone(),
        });

        let router = Router::new()
            .merge(auth_router(auth_service.clone()))
            .merge(profile_router(profile_service, auth_state.clone()))
            .merge(donation_router(donation_service, auth_state.clone()))
            .merge(request_router(request_service, auth_state.clone()))
            .merge(notification_router(notification_service.clone(), auth_state.clone()))
            .merge(staff_router(
                StaffHandlerState {
                    staff_service,
                    notification_service,
                },
                auth_state,
            ))
            .route("/health", get(|| async { "OK" }));

        let app = App { config, router, auth_service, user_repo };
        app.create_first_admin_user().await;
        app
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(self.config.host.parse().expect("Invalid host"), self.config.port);
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");
        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Failed to start server");
    }

    async fn create_first_admin_user(&self) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };

        match self.user_repo.find_by_email(&admin_conf.email).await {
            Ok(Some(_)) => {
                info!("Admin user already exists, skipping creation.");
                return;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to check for existing admin user: {e}");
                return;
            }
        }

        match self
            .auth_service
            .register(
                admin_conf.email.clone(),
                admin_conf.password.clone(),
                Some(admin_conf.name.clone()),
                false,
            )
            .await
        {
            Ok(response) => {
                // Promote the freshly registered account to admin.
                match self.user_repo.find_by_user_id(&response.user.user_id).await {
                    Ok(Some(mut user)) => {
                        user.roles.admin = true;
                        user.staff_approval = true;
                        if let Some(id) = user.id {
                            match self.user_repo.update(id, user).await {
                                Ok(_) => info!("First admin user created."),
                                Err(e) => error!("Failed to promote admin user: {e}"),
                            }
                        }
                    }
                    Ok(None) => error!("Admin user vanished after registration"),
                    Err(e) => error!("Failed to reload admin user: {e}"),
                }
            }
            Err(e) => error!("Failed to create admin user: {e}"),
        }
    }
}
