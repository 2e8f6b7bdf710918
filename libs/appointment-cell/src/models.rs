// libs/appointment-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_models::error::AppError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "patientId", default)]
    pub patient_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub specialization: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "appointmentId", default)]
    pub appointment_code: String,
    #[serde(default)]
    pub patient: Option<PatientSummary>,
    #[serde(default)]
    pub doctor: Option<DoctorSummary>,
    /// ISO 8601 as sent by the backend; only the calendar-date prefix carries meaning.
    #[serde(rename = "appointmentDate")]
    pub appointment_date: String,
    #[serde(rename = "appointmentTime")]
    pub appointment_time: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn doctor_id(&self) -> Option<&str> {
        self.doctor.as_ref().map(|d| d.id.as_str())
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient.as_ref().map(|p| p.id.as_str())
    }

    /// `"2025-03-14T00:00:00Z"` -> `"2025-03-14"`.
    pub fn calendar_date(&self) -> &str {
        calendar_date_prefix(&self.appointment_date)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_calendar_date(self.calendar_date())
    }
}

/// Everything before the first `T` of an ISO date or datetime.
pub fn calendar_date_prefix(value: &str) -> &str {
    value.split('T').next().unwrap_or(value)
}

pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(calendar_date_prefix(value.trim()), "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    #[serde(rename = "No Show", alias = "NoShow")]
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];

    /// Wire and display label.
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No Show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }

    /// Whether an appointment in this status holds its slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Form contents for create and edit. Empty strings mean "not chosen yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub patient: String,
    pub doctor: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub reason: String,
    pub notes: String,
}

impl AppointmentDraft {
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            patient: appointment.patient_id().unwrap_or_default().to_string(),
            doctor: appointment.doctor_id().unwrap_or_default().to_string(),
            appointment_date: appointment.calendar_date().to_string(),
            appointment_time: appointment.appointment_time.clone(),
            reason: appointment.reason.clone(),
            notes: appointment.notes.clone().unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Patient => self.patient = value,
            DraftField::Doctor => self.doctor = value,
            DraftField::AppointmentDate => self.appointment_date = value,
            DraftField::AppointmentTime => self.appointment_time = value,
            DraftField::Reason => self.reason = value,
            DraftField::Notes => self.notes = value,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.appointment_date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Patient,
    Doctor,
    AppointmentDate,
    AppointmentTime,
    Reason,
    Notes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: AppointmentStatus,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppointmentError {
    #[error(transparent)]
    Store(#[from] AppError),

    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error("Cannot change status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("{0} is not a bookable time slot")]
    InvalidSlot(String),

    #[error("Time slot {0} is no longer available")]
    SlotNotAvailable(String),

    #[error("{0}")]
    ValidationError(String),
}

impl AppointmentError {
    pub fn user_message(&self) -> String {
        match self {
            AppointmentError::Store(err) => err.user_message().to_string(),
            other => other.to_string(),
        }
    }
}
