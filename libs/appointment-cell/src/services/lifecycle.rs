// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus};

/// Status changes a row offers, keyed by the action shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Complete,
    Cancel,
    MarkNoShow,
}

impl StatusAction {
    pub fn target(&self) -> AppointmentStatus {
        match self {
            StatusAction::Complete => AppointmentStatus::Completed,
            StatusAction::Cancel => AppointmentStatus::Cancelled,
            StatusAction::MarkNoShow => AppointmentStatus::NoShow,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusAction::Complete => "Complete",
            StatusAction::Cancel => "Cancel",
            StatusAction::MarkNoShow => "No Show",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition may be originated from the client
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {:?} to {:?}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {:?} -> {:?}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(
        &self,
        current_status: AppointmentStatus,
    ) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
            AppointmentStatus::NoShow => vec![],
        }
    }

    /// Row actions for an appointment: Complete and Cancel while Scheduled, nothing afterwards.
    pub fn row_actions(&self, current_status: AppointmentStatus) -> Vec<StatusAction> {
        match current_status {
            AppointmentStatus::Scheduled => vec![StatusAction::Complete, StatusAction::Cancel],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_reaches_exactly_three_states() {
        let lifecycle = AppointmentLifecycleService::new();
        let next = lifecycle.get_valid_transitions(AppointmentStatus::Scheduled);
        assert_eq!(
            next,
            vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ]
        );
        for target in next {
            assert!(lifecycle
                .validate_status_transition(AppointmentStatus::Scheduled, target)
                .is_ok());
        }
        assert!(lifecycle
            .validate_status_transition(AppointmentStatus::Scheduled, AppointmentStatus::Scheduled)
            .is_err());
    }

    #[test]
    fn terminal_states_are_final() {
        let lifecycle = AppointmentLifecycleService::new();
        let terminal = [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ];
        for from in terminal {
            assert!(lifecycle.get_valid_transitions(from).is_empty());
            assert!(lifecycle.row_actions(from).is_empty());
            for to in AppointmentStatus::ALL {
                assert_eq!(
                    lifecycle.validate_status_transition(from, to),
                    Err(AppointmentError::InvalidStatusTransition { from, to })
                );
            }
        }
    }

    #[test]
    fn row_actions_map_to_targets() {
        let lifecycle = AppointmentLifecycleService::new();
        let actions = lifecycle.row_actions(AppointmentStatus::Scheduled);
        let targets: Vec<AppointmentStatus> = actions.iter().map(StatusAction::target).collect();
        assert_eq!(targets, vec![AppointmentStatus::Completed, AppointmentStatus::Cancelled]);
        assert_eq!(StatusAction::MarkNoShow.target(), AppointmentStatus::NoShow);
    }
}
