// libs/appointment-cell/src/services/availability.rs
use std::collections::HashSet;

use crate::models::Appointment;
use crate::services::slots::{slots, SLOT_CATALOG};

/// Catalog slots still free for `doctor_id` on `date` (`YYYY-MM-DD`).
///
/// With either key empty the whole catalog comes back, so a form can offer a
/// menu before doctor and date are picked.
pub fn available(doctor_id: &str, date: &str, appointments: &[Appointment]) -> Vec<&'static str> {
    available_excluding(doctor_id, date, appointments, None)
}

/// Same as [`available`], but the appointment with `exclude_id` never counts as
/// taking its slot. Used while that appointment is being edited.
pub fn available_excluding(
    doctor_id: &str,
    date: &str,
    appointments: &[Appointment],
    exclude_id: Option<&str>,
) -> Vec<&'static str> {
    if doctor_id.is_empty() || date.is_empty() {
        return SLOT_CATALOG.to_vec();
    }

    let taken = taken_set(doctor_id, date, appointments, exclude_id);
    slots().filter(|slot| !taken.contains(slot)).collect()
}

/// Catalog slots already held for the pair, in catalog order.
pub fn taken_slots(doctor_id: &str, date: &str, appointments: &[Appointment]) -> Vec<&'static str> {
    if doctor_id.is_empty() || date.is_empty() {
        return Vec::new();
    }

    let taken = taken_set(doctor_id, date, appointments, None);
    slots().filter(|slot| taken.contains(slot)).collect()
}

fn taken_set<'a>(
    doctor_id: &str,
    date: &str,
    appointments: &'a [Appointment],
    exclude_id: Option<&str>,
) -> HashSet<&'a str> {
    appointments
        .iter()
        .filter(|a| exclude_id != Some(a.id.as_str()))
        .filter(|a| a.doctor_id() == Some(doctor_id))
        .filter(|a| a.calendar_date() == date)
        .filter(|a| a.status.occupies_slot())
        .map(|a| a.appointment_time.as_str())
        .collect()
}
