// libs/appointment-cell/src/services/memory.rs
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{
    Appointment, AppointmentDraft, AppointmentStatus, DoctorSummary, PatientSummary,
};
use crate::services::slots::is_catalog_slot;
use crate::services::store::{AppointmentStore, RosterStore};

/// One recorded call against the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListAll,
    ListByDate(NaiveDate),
    Create(AppointmentDraft),
    Update(String, AppointmentDraft),
    SetStatus(String, AppointmentStatus),
    ListPatients,
    ListDoctors,
}

#[derive(Default)]
struct MemoryState {
    appointments: Vec<Appointment>,
    patients: Vec<PatientSummary>,
    doctors: Vec<DoctorSummary>,
    next_id: u64,
    fail_next: Option<AppError>,
    calls: Vec<StoreCall>,
}

/// Backend stand-in that keeps everything in a `Vec` and answers the way the
/// hospital API does: ids and codes are assigned on create, rosters are joined
/// into the returned appointment, and double-booking a slot is rejected.
#[derive(Default)]
pub struct InMemoryAppointmentStore {
    state: Mutex<MemoryState>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rosters(patients: Vec<PatientSummary>, doctors: Vec<DoctorSummary>) -> Self {
        let store = Self::default();
        {
            let mut state = store.lock();
            state.patients = patients;
            state.doctors = doctors;
        }
        store
    }

    /// Insert fixtures as-is, bypassing validation.
    pub fn seed(&self, appointments: impl IntoIterator<Item = Appointment>) {
        self.lock().appointments.extend(appointments);
    }

    /// Make the next call of any kind fail with `error`.
    pub fn fail_next(&self, error: AppError) {
        self.lock().fail_next = Some(error);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.lock().appointments.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, call: StoreCall) -> Result<MutexGuard<'_, MemoryState>, AppError> {
        let mut state = self.lock();
        debug!("In-memory store call: {:?}", call);
        state.calls.push(call);
        let failure = state.fail_next.take();
        match failure {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

impl MemoryState {
    fn build(
        &self,
        id: String,
        code: String,
        draft: &AppointmentDraft,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        if draft.reason.trim().is_empty() {
            return Err(AppError::Validation("Reason for visit is required".to_string()));
        }
        let date = draft
            .date()
            .ok_or_else(|| AppError::Validation("Appointment date is required".to_string()))?;
        if !is_catalog_slot(&draft.appointment_time) {
            return Err(AppError::Validation("Invalid appointment time".to_string()));
        }
        let patient = self
            .patients
            .iter()
            .find(|p| p.id == draft.patient)
            .cloned()
            .ok_or_else(|| AppError::Validation("Patient not found".to_string()))?;
        let doctor = self
            .doctors
            .iter()
            .find(|d| d.id == draft.doctor)
            .cloned()
            .ok_or_else(|| AppError::Validation("Doctor not found".to_string()))?;

        let clash = self.appointments.iter().any(|a| {
            a.id != id
                && a.status.occupies_slot()
                && a.doctor_id() == Some(doctor.id.as_str())
                && a.date() == Some(date)
                && a.appointment_time == draft.appointment_time
        });
        if clash {
            return Err(AppError::Validation("Doctor is not available at this time".to_string()));
        }

        Ok(Appointment {
            id,
            appointment_code: code,
            patient: Some(patient),
            doctor: Some(doctor),
            appointment_date: format!("{}T00:00:00.000Z", date.format("%Y-%m-%d")),
            appointment_time: draft.appointment_time.clone(),
            reason: draft.reason.clone(),
            notes: if draft.notes.is_empty() { None } else { Some(draft.notes.clone()) },
            status,
        })
    }

    fn position(&self, id: &str) -> Result<usize, AppError> {
        self.appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AppError::Server {
                status: 404,
                message: "Appointment not found".to_string(),
            })
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn list_all(&self) -> Result<Vec<Appointment>, AppError> {
        let state = self.begin(StoreCall::ListAll)?;
        Ok(state.appointments.clone())
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        let state = self.begin(StoreCall::ListByDate(date))?;
        Ok(state
            .appointments
            .iter()
            .filter(|a| a.date() == Some(date))
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &AppointmentDraft) -> Result<Option<Appointment>, AppError> {
        let mut state = self.begin(StoreCall::Create(draft.clone()))?;
        let seq = state.next_id + 1;
        let appointment = state.build(
            format!("mem-{}", seq),
            format!("APT{:04}", seq),
            draft,
            AppointmentStatus::Scheduled,
        )?;
        state.next_id = seq;
        state.appointments.push(appointment.clone());
        Ok(Some(appointment))
    }

    async fn update(
        &self,
        id: &str,
        draft: &AppointmentDraft,
    ) -> Result<Option<Appointment>, AppError> {
        let mut state = self.begin(StoreCall::Update(id.to_string(), draft.clone()))?;
        let idx = state.position(id)?;
        let existing = state.appointments[idx].clone();
        let updated = state.build(existing.id, existing.appointment_code, draft, existing.status)?;
        state.appointments[idx] = updated.clone();
        Ok(Some(updated))
    }

    async fn set_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppError> {
        let mut state = self.begin(StoreCall::SetStatus(id.to_string(), status))?;
        let idx = state.position(id)?;
        state.appointments[idx].status = status;
        Ok(Some(state.appointments[idx].clone()))
    }
}

#[async_trait]
impl RosterStore for InMemoryAppointmentStore {
    async fn list_patients(&self) -> Result<Vec<PatientSummary>, AppError> {
        let state = self.begin(StoreCall::ListPatients)?;
        Ok(state.patients.clone())
    }

    async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, AppError> {
        let state = self.begin(StoreCall::ListDoctors)?;
        Ok(state.doctors.clone())
    }
}
