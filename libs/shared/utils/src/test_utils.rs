use std::sync::Arc;

use serde_json::json;

use shared_config::AppConfig;
use shared_models::auth::Session;

use crate::session::SessionStore;

pub const TEST_TOKEN: &str = "test-token";

pub struct TestConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 5,
        }
    }
}

impl TestConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}

pub struct TestSession;

impl TestSession {
    pub fn receptionist() -> Session {
        Session {
            token: TEST_TOKEN.to_string(),
            logged_in_user: "Test Receptionist".to_string(),
            user_role: "receptionist".to_string(),
        }
    }

    pub fn signed_in() -> Arc<SessionStore> {
        Arc::new(SessionStore::with_session(Self::receptionist()))
    }

    pub fn signed_out() -> Arc<SessionStore> {
        Arc::new(SessionStore::new())
    }
}

/// JSON bodies shaped like the hospital backend's responses.
pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn patient_response(id: &str, name: &str, patient_code: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "name": name,
            "patientId": patient_code,
            "email": format!("{}@example.com", id),
            "phone": "555-0100"
        })
    }

    pub fn doctor_response(id: &str, name: &str, specialization: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "name": name,
            "specialization": specialization,
            "doctorId": format!("DOC-{}", id)
        })
    }

    pub fn appointment_response(
        id: &str,
        doctor_id: &str,
        date: &str,
        time: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "_id": id,
            "appointmentId": format!("APT-{}", id),
            "patient": {
                "_id": "P1",
                "name": "Jane Roe",
                "patientId": "PAT-0001"
            },
            "doctor": {
                "_id": doctor_id,
                "name": "Gregory House",
                "specialization": "Diagnostics"
            },
            "appointmentDate": format!("{}T00:00:00.000Z", date),
            "appointmentTime": time,
            "reason": "Persistent cough",
            "notes": "",
            "status": status,
            "createdAt": "2025-03-01T08:00:00.000Z"
        })
    }

    /// Appointment as the backend returns it from a write: refs not populated.
    pub fn appointment_ref_response(
        id: &str,
        patient_id: &str,
        doctor_id: &str,
        date: &str,
        time: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "_id": id,
            "appointmentId": format!("APT-{}", id),
            "patient": patient_id,
            "doctor": doctor_id,
            "appointmentDate": format!("{}T00:00:00.000Z", date),
            "appointmentTime": time,
            "reason": "Persistent cough",
            "notes": "",
            "status": status
        })
    }

    pub fn login_success(token: &str, name: &str, role: &str) -> serde_json::Value {
        json!({
            "success": true,
            "message": "Login successful",
            "jwtToken": token,
            "email": "user@example.com",
            "name": name,
            "role": role
        })
    }

    pub fn login_failure(message: &str) -> serde_json::Value {
        json!({
            "success": false,
            "message": message
        })
    }

    pub fn error_response(message: &str) -> serde_json::Value {
        json!({
            "success": false,
            "message": message
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default().to_app_config();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_session_creation() {
        let store = TestSession::signed_in();
        assert_eq!(store.token().as_deref(), Some(TEST_TOKEN));
        assert!(!TestSession::signed_out().is_signed_in());
    }

    #[test]
    fn appointment_fixture_shape() {
        let value = MockBackendResponses::appointment_response(
            "A1", "D1", "2025-03-14", "10:00", "Scheduled",
        );
        assert_eq!(value["_id"], "A1");
        assert_eq!(value["doctor"]["_id"], "D1");
        assert_eq!(value["appointmentDate"], "2025-03-14T00:00:00.000Z");

        let raw = MockBackendResponses::appointment_ref_response(
            "A1", "P1", "D1", "2025-03-14", "10:00", "Scheduled",
        );
        assert_eq!(raw["doctor"], "D1");
    }
}
