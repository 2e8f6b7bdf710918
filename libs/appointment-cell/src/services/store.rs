// libs/appointment-cell/src/services/store.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::ApiClient;
use shared_models::error::AppError;
use shared_utils::session::SessionStore;

use crate::models::{
    Appointment, AppointmentDraft, AppointmentStatus, DoctorSummary, PatientSummary,
    StatusUpdateRequest,
};

/// Everything the scheduling screen reads and writes about appointments.
///
/// Writes succeed on any 2xx. The record the backend echoes back is returned
/// when it decodes as an [`Appointment`]; callers re-read the list either way.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Appointment>, AppError>;

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppError>;

    async fn create(&self, draft: &AppointmentDraft) -> Result<Option<Appointment>, AppError>;

    async fn update(
        &self,
        id: &str,
        draft: &AppointmentDraft,
    ) -> Result<Option<Appointment>, AppError>;

    async fn set_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppError>;
}

/// Patient and doctor rosters for the form dropdowns.
#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn list_patients(&self) -> Result<Vec<PatientSummary>, AppError>;

    async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, AppError>;
}

pub struct HttpAppointmentStore {
    api: Arc<ApiClient>,
}

impl HttpAppointmentStore {
    pub fn new(config: &AppConfig, session: Arc<SessionStore>) -> Self {
        Self {
            api: Arc::new(ApiClient::new(config, session)),
        }
    }

    pub fn with_client(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    async fn write(
        &self,
        method: Method,
        path: &str,
        body: Value,
    ) -> Result<Option<Appointment>, AppError> {
        let response: Value = self.api.request(method, path, Some(body)).await?;
        Ok(decode_record(response))
    }
}

fn appointment_path(id: &str) -> String {
    format!("/api/appointments/{}", urlencoding::encode(id))
}

/// The written record, bare or wrapped in `data` / `appointment`. Bodies with
/// unpopulated patient or doctor refs, or no body at all, give `None`.
fn decode_record(value: Value) -> Option<Appointment> {
    let nested = value
        .get("data")
        .or_else(|| value.get("appointment"))
        .filter(|inner| inner.is_object())
        .cloned();
    let candidate = nested.unwrap_or(value);

    match serde_json::from_value::<Appointment>(candidate) {
        Ok(appointment) => Some(appointment),
        Err(err) => {
            debug!("Write response is not a populated appointment: {}", err);
            None
        }
    }
}

#[async_trait]
impl AppointmentStore for HttpAppointmentStore {
    async fn list_all(&self) -> Result<Vec<Appointment>, AppError> {
        debug!("Fetching all appointments");
        self.api.request(Method::GET, "/api/appointments", None).await
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        debug!("Fetching appointments for {}", date);
        let path = format!("/api/appointments/date/{}", date.format("%Y-%m-%d"));
        self.api.request(Method::GET, &path, None).await
    }

    async fn create(&self, draft: &AppointmentDraft) -> Result<Option<Appointment>, AppError> {
        let body = serde_json::to_value(draft)?;
        let created = self.write(Method::POST, "/api/appointments", body).await?;
        info!(
            "Appointment created for {} at {} {}",
            draft.doctor, draft.appointment_date, draft.appointment_time
        );
        Ok(created)
    }

    async fn update(
        &self,
        id: &str,
        draft: &AppointmentDraft,
    ) -> Result<Option<Appointment>, AppError> {
        let body = serde_json::to_value(draft)?;
        let updated = self.write(Method::PUT, &appointment_path(id), body).await?;
        info!("Appointment {} updated", id);
        Ok(updated)
    }

    async fn set_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppError> {
        let path = format!("{}/status", appointment_path(id));
        let body = serde_json::to_value(StatusUpdateRequest { status })?;
        let updated = self.write(Method::PATCH, &path, body).await?;
        info!("Appointment {} status set to {}", id, status);
        Ok(updated)
    }
}

#[async_trait]
impl RosterStore for HttpAppointmentStore {
    async fn list_patients(&self) -> Result<Vec<PatientSummary>, AppError> {
        self.api.request(Method::GET, "/api/patients", None).await
    }

    async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, AppError> {
        self.api.request(Method::GET, "/api/doctors", None).await
    }
}
