use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::ApiClient;
use shared_models::auth::{Session, SignInRequest, SignInResponse};
use shared_models::error::AppError;
use shared_utils::session::SessionStore;

pub struct SignInService {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl SignInService {
    pub fn new(config: &AppConfig, session: Arc<SessionStore>) -> Self {
        Self {
            api: ApiClient::new(config, session.clone()),
            session,
        }
    }

    /// Exchange credentials for a session token and remember who signed in.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Email and password are required".to_string()));
        }

        debug!("Signing in {}", email);

        let body = serde_json::to_value(SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;

        let response: SignInResponse = self
            .api
            .request_public(Method::POST, "/auth/login", Some(body))
            .await?;

        let token = match (&response.jwt_token, response.success) {
            (Some(token), true) if !token.is_empty() => token.clone(),
            _ => {
                let message = response.failure_message();
                warn!("Sign-in refused for {}: {}", email, message);
                return Err(AppError::Auth(message));
            }
        };

        let session = Session {
            token,
            logged_in_user: response.name.clone().unwrap_or_else(|| email.to_string()),
            user_role: response.role.clone().unwrap_or_default(),
        };
        self.session.set(session.clone());

        info!("Signed in as {} ({})", session.logged_in_user, session.user_role);
        Ok(session)
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.session.logged_in_user() {
            info!("Signing out {}", user);
        }
        self.session.clear();
    }

    pub fn session(&self) -> Option<Session> {
        self.session.current()
    }
}
