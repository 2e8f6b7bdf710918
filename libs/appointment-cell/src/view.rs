// libs/appointment-cell/src/view.rs
//! Presentation contract for the scheduling screen, computed from a state snapshot.

use chrono::NaiveDate;

use crate::controller::SchedulingState;
use crate::models::{Appointment, AppointmentStatus};
use crate::services::lifecycle::{AppointmentLifecycleService, StatusAction};

pub const EMPTY_TABLE_MESSAGE: &str = "No appointments found for the selected date";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Status(StatusAction),
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Edit => "Edit",
            RowAction::Status(action) => action.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRow {
    pub id: String,
    pub appointment_code: String,
    pub patient_name: String,
    pub patient_code: String,
    pub doctor_name: String,
    pub specialization: String,
    pub date: String,
    pub time: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub status_label: &'static str,
    pub badge_class: &'static str,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentForm {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub date_min: Option<NaiveDate>,
    pub patient_options: Vec<SelectOption>,
    pub doctor_options: Vec<SelectOption>,
    pub time_options: Vec<&'static str>,
}

pub fn badge_class(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Scheduled => "status-scheduled",
        AppointmentStatus::Completed => "status-completed",
        AppointmentStatus::Cancelled => "status-cancelled",
        AppointmentStatus::NoShow => "status-no-show",
    }
}

pub fn row(appointment: &Appointment) -> AppointmentRow {
    let lifecycle = AppointmentLifecycleService::new();
    let mut actions = vec![RowAction::Edit];
    actions.extend(lifecycle.row_actions(appointment.status).into_iter().map(RowAction::Status));

    let (patient_name, patient_code) = appointment
        .patient
        .as_ref()
        .map(|p| (p.name.clone(), p.patient_code.clone()))
        .unwrap_or_default();
    let (doctor_name, specialization) = appointment
        .doctor
        .as_ref()
        .map(|d| (format!("Dr. {}", d.name), d.specialization.clone()))
        .unwrap_or_default();

    AppointmentRow {
        id: appointment.id.clone(),
        appointment_code: appointment.appointment_code.clone(),
        patient_name,
        patient_code,
        doctor_name,
        specialization,
        date: appointment.calendar_date().to_string(),
        time: appointment.appointment_time.clone(),
        reason: appointment.reason.clone(),
        status: appointment.status,
        status_label: appointment.status.label(),
        badge_class: badge_class(appointment.status),
        actions,
    }
}

impl SchedulingState {
    /// Value of the date filter input.
    pub fn date_filter_value(&self) -> String {
        self.selected_date.format("%Y-%m-%d").to_string()
    }

    pub fn rows(&self) -> Vec<AppointmentRow> {
        self.appointments.iter().map(row).collect()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.appointments.is_empty().then_some(EMPTY_TABLE_MESSAGE)
    }

    /// Full-page spinner while a save runs outside the modal.
    pub fn show_spinner(&self) -> bool {
        self.loading && !self.modal_open
    }

    pub fn form(&self) -> Option<AppointmentForm> {
        if !self.modal_open {
            return None;
        }

        let editing = self.is_editing();
        let submit_label = match (self.loading, editing) {
            (true, _) => "Saving...",
            (false, true) => "Update Appointment",
            (false, false) => "Schedule Appointment",
        };

        Some(AppointmentForm {
            title: if editing { "Edit Appointment" } else { "Schedule New Appointment" },
            submit_label,
            submit_enabled: !self.loading,
            date_min: if editing { None } else { Some(self.today) },
            patient_options: self
                .patients
                .iter()
                .map(|p| SelectOption {
                    value: p.id.clone(),
                    label: format!("{} - {}", p.name, p.patient_code),
                })
                .collect(),
            doctor_options: self
                .doctors
                .iter()
                .map(|d| SelectOption {
                    value: d.id.clone(),
                    label: format!("Dr. {} - {}", d.name, d.specialization),
                })
                .collect(),
            time_options: self.available_slots(),
        })
    }
}
