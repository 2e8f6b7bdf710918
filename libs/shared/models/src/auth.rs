use serde::{Deserialize, Serialize};

/// Identity kept for the lifetime of a signed-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub logged_in_user: String,
    pub user_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub jwt_token: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub error: Option<SignInErrorBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInErrorBody {
    #[serde(default)]
    pub details: Vec<SignInErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInErrorDetail {
    pub message: String,
}

impl SignInResponse {
    /// First field-level message if the backend sent any, else the top-level message.
    pub fn failure_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.details.first())
            .map(|d| d.message.clone())
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Sign-in failed".to_string())
    }
}
