// libs/appointment-cell/src/controller.rs
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use shared_models::error::AppError;

use crate::models::{
    Appointment, AppointmentDraft, AppointmentError, AppointmentStatus, DoctorSummary, DraftField,
    PatientSummary,
};
use crate::services::availability::available_excluding;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::slots::{is_catalog_slot, SLOT_CATALOG};
use crate::services::store::{AppointmentStore, RosterStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A toast waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// What a user action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// Refused without side effects: a mutation was already in flight, or the response was stale.
    Ignored,
    Failed,
}

/// What a list request fetched, tagged with the date that was selected when
/// it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All { selected: NaiveDate },
    Date(NaiveDate),
}

impl ListScope {
    pub fn selected_date(&self) -> NaiveDate {
        match self {
            ListScope::All { selected } => *selected,
            ListScope::Date(date) => *date,
        }
    }
}

/// Source of the local calendar date.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> NaiveDate + Send + Sync>);

impl Clock {
    pub fn local() -> Self {
        Self::from_fn(|| Local::now().date_naive())
    }

    pub fn fixed(date: NaiveDate) -> Self {
        Self::from_fn(move || date)
    }

    pub fn from_fn(f: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn today(&self) -> NaiveDate {
        (self.0)()
    }
}

/// Everything the scheduling screen renders from, updated as one record.
#[derive(Debug, Clone)]
pub struct SchedulingState {
    pub loading: bool,
    pub today: NaiveDate,
    pub selected_date: NaiveDate,
    pub appointments: Vec<Appointment>,
    pub draft: AppointmentDraft,
    pub editing: Option<Appointment>,
    pub modal_open: bool,
    pub patients: Vec<PatientSummary>,
    pub doctors: Vec<DoctorSummary>,
    pub notices: Vec<Notice>,
    issued_seq: u64,
    applied_seq: u64,
}

impl SchedulingState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            loading: false,
            today,
            selected_date: today,
            appointments: Vec::new(),
            draft: AppointmentDraft::default(),
            editing: None,
            modal_open: false,
            patients: Vec::new(),
            doctors: Vec::new(),
            notices: Vec::new(),
            issued_seq: 0,
            applied_seq: 0,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Time options for the form. The appointment being edited never blocks its own slot.
    pub fn available_slots(&self) -> Vec<&'static str> {
        if self.draft.doctor.is_empty() || self.draft.appointment_date.is_empty() {
            return SLOT_CATALOG.to_vec();
        }

        available_excluding(
            &self.draft.doctor,
            &self.draft.appointment_date,
            &self.appointments,
            self.editing.as_ref().map(|a| a.id.as_str()),
        )
    }

    fn issue(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    /// A list response is current if nothing newer has landed and the date
    /// selected when it was issued is still selected.
    fn accepts(&self, scope: ListScope, seq: u64) -> bool {
        seq > self.applied_seq && scope.selected_date() == self.selected_date
    }

    fn reset_form(&mut self) {
        self.modal_open = false;
        self.editing = None;
        self.draft = AppointmentDraft::default();
    }

    fn validate_draft(&self) -> Result<(), AppointmentError> {
        let draft = &self.draft;

        if draft.patient.is_empty() {
            return Err(AppointmentError::ValidationError("Please select a patient".to_string()));
        }
        if draft.doctor.is_empty() {
            return Err(AppointmentError::ValidationError("Please select a doctor".to_string()));
        }
        let date = draft.date().ok_or_else(|| {
            AppointmentError::ValidationError("Please select an appointment date".to_string())
        })?;
        if draft.appointment_time.is_empty() {
            return Err(AppointmentError::ValidationError(
                "Please select an appointment time".to_string(),
            ));
        }
        if !is_catalog_slot(&draft.appointment_time) {
            return Err(AppointmentError::InvalidSlot(draft.appointment_time.clone()));
        }
        if draft.reason.trim().is_empty() {
            return Err(AppointmentError::ValidationError(
                "Reason for visit is required".to_string(),
            ));
        }
        if !self.is_editing() && date < self.today {
            return Err(AppointmentError::ValidationError(
                "Appointment date cannot be in the past".to_string(),
            ));
        }
        if !self.available_slots().contains(&draft.appointment_time.as_str()) {
            return Err(AppointmentError::SlotNotAvailable(draft.appointment_time.clone()));
        }

        Ok(())
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }
}

fn load_failure_message(err: &AppError) -> &'static str {
    match err {
        AppError::Transport(_) => "Error loading appointments",
        _ => "Failed to fetch appointments",
    }
}

/// Drives the appointment scheduling screen.
///
/// State lives in one [`SchedulingState`] behind a lock that is never held
/// while a store call is pending, so several actions can be awaited at once
/// the way a UI event loop interleaves them.
pub struct SchedulingController {
    appointments: Arc<dyn AppointmentStore>,
    rosters: Arc<dyn RosterStore>,
    lifecycle: AppointmentLifecycleService,
    clock: Clock,
    state: RwLock<SchedulingState>,
}

impl SchedulingController {
    pub fn new(appointments: Arc<dyn AppointmentStore>, rosters: Arc<dyn RosterStore>) -> Self {
        Self::with_clock(appointments, rosters, Clock::local())
    }

    pub fn with_today(
        appointments: Arc<dyn AppointmentStore>,
        rosters: Arc<dyn RosterStore>,
        today: NaiveDate,
    ) -> Self {
        Self::with_clock(appointments, rosters, Clock::fixed(today))
    }

    /// `today` is re-read from `clock` whenever the form opens and on submit,
    /// so the minimum booking date follows midnight.
    pub fn with_clock(
        appointments: Arc<dyn AppointmentStore>,
        rosters: Arc<dyn RosterStore>,
        clock: Clock,
    ) -> Self {
        let today = clock.today();
        Self {
            appointments,
            rosters,
            lifecycle: AppointmentLifecycleService::new(),
            clock,
            state: RwLock::new(SchedulingState::new(today)),
        }
    }

    pub async fn snapshot(&self) -> SchedulingState {
        self.state.read().await.clone()
    }

    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.write().await.notices)
    }

    pub async fn available_slots(&self) -> Vec<&'static str> {
        self.state.read().await.available_slots()
    }

    /// First mount: everything, both rosters, and the selected day.
    pub async fn on_enter(&self) {
        let (all_seq, date_seq, date) = {
            let mut state = self.state.write().await;
            let all_seq = state.issue();
            let date_seq = state.issue();
            (all_seq, date_seq, state.selected_date)
        };

        futures::join!(
            self.fetch(ListScope::All { selected: date }, all_seq),
            self.load_rosters(),
            self.fetch(ListScope::Date(date), date_seq),
        );
    }

    pub async fn on_select_date(&self, date: NaiveDate) -> ActionOutcome {
        let seq = {
            let mut state = self.state.write().await;
            state.selected_date = date;
            state.issue()
        };

        self.fetch(ListScope::Date(date), seq).await
    }

    /// Re-fetch the selected day.
    pub async fn refresh(&self) -> ActionOutcome {
        let (date, seq) = {
            let mut state = self.state.write().await;
            (state.selected_date, state.issue())
        };

        self.fetch(ListScope::Date(date), seq).await
    }

    pub async fn open_create(&self) {
        let mut state = self.state.write().await;
        state.today = self.clock.today();
        state.editing = None;
        state.draft = AppointmentDraft::default();
        state.modal_open = true;
    }

    pub async fn open_edit(&self, appointment: &Appointment) {
        let mut state = self.state.write().await;
        state.draft = AppointmentDraft::from_appointment(appointment);
        state.editing = Some(appointment.clone());
        state.modal_open = true;
    }

    /// Close button and Cancel button. A write already in flight still completes.
    pub async fn close_modal(&self) {
        self.state.write().await.reset_form();
    }

    pub async fn on_draft_change(&self, field: DraftField, value: impl Into<String>) {
        self.state.write().await.draft.set(field, value);
    }

    pub async fn submit(&self) -> ActionOutcome {
        let (draft, editing_id) = {
            let mut state = self.state.write().await;
            if state.loading {
                debug!("Submit ignored: a save is already in flight");
                return ActionOutcome::Ignored;
            }
            state.today = self.clock.today();
            if let Err(err) = state.validate_draft() {
                warn!("Appointment form rejected: {}", err);
                state.notify(NoticeLevel::Error, err.user_message());
                return ActionOutcome::Failed;
            }
            state.loading = true;
            (state.draft.clone(), state.editing.as_ref().map(|a| a.id.clone()))
        };

        let result = match &editing_id {
            None => self.appointments.create(&draft).await,
            Some(id) => self.appointments.update(id, &draft).await,
        };

        {
            let mut state = self.state.write().await;
            state.loading = false;

            match result {
                Ok(saved) => {
                    match &saved {
                        Some(appointment) => info!("Appointment {} saved", appointment.id),
                        None => info!("Appointment saved"),
                    }
                    state.reset_form();
                    let message = if editing_id.is_some() {
                        "Appointment updated successfully"
                    } else {
                        "Appointment scheduled successfully"
                    };
                    state.notify(NoticeLevel::Success, message);
                }
                Err(err) => {
                    error!("Submit error: {}", err);
                    let message = match &err {
                        AppError::Transport(_) => "Error saving appointment".to_string(),
                        other => other.user_message().to_string(),
                    };
                    state.notify(NoticeLevel::Error, message);
                    return ActionOutcome::Failed;
                }
            }
        }

        self.refresh().await;
        ActionOutcome::Done
    }

    pub async fn change_status(&self, id: &str, next: AppointmentStatus) -> ActionOutcome {
        {
            let mut state = self.state.write().await;
            if state.loading {
                debug!("Status change ignored: a save is already in flight");
                return ActionOutcome::Ignored;
            }

            let current = state.appointments.iter().find(|a| a.id == id).map(|a| a.status);
            let Some(current) = current else {
                let err = AppointmentError::NotFound(id.to_string());
                warn!("{}", err);
                state.notify(NoticeLevel::Error, err.user_message());
                return ActionOutcome::Failed;
            };

            if let Err(err) = self.lifecycle.validate_status_transition(current, next) {
                state.notify(NoticeLevel::Error, err.user_message());
                return ActionOutcome::Failed;
            }

            state.loading = true;
        }

        let result = self.appointments.set_status(id, next).await;

        {
            let mut state = self.state.write().await;
            state.loading = false;

            match result {
                Ok(updated) => {
                    if let Some(updated) = updated {
                        let row = state.appointments.iter_mut().find(|a| a.id == updated.id);
                        if let Some(row) = row {
                            *row = updated;
                        }
                    }
                    state.notify(NoticeLevel::Success, "Appointment status updated successfully");
                }
                Err(err) => {
                    error!("Status update error: {}", err);
                    let message = match err {
                        AppError::Transport(_) => "Error updating appointment status",
                        _ => "Failed to update appointment status",
                    };
                    state.notify(NoticeLevel::Error, message);
                    return ActionOutcome::Failed;
                }
            }
        }

        self.refresh().await;
        ActionOutcome::Done
    }

    async fn fetch(&self, scope: ListScope, seq: u64) -> ActionOutcome {
        let result = match scope {
            ListScope::All { .. } => self.appointments.list_all().await,
            ListScope::Date(date) => self.appointments.list_by_date(date).await,
        };

        let mut state = self.state.write().await;

        if !state.accepts(scope, seq) {
            debug!("Discarding stale {:?} response (request {})", scope, seq);
            return ActionOutcome::Ignored;
        }

        match result {
            Ok(list) => {
                debug!("Showing {} appointments for {:?}", list.len(), scope);
                state.applied_seq = seq;
                state.appointments = list;
                ActionOutcome::Done
            }
            Err(err) => {
                error!("Fetch appointments error: {}", err);
                state.notify(NoticeLevel::Error, load_failure_message(&err));
                ActionOutcome::Failed
            }
        }
    }

    async fn load_rosters(&self) {
        let (patients, doctors) =
            futures::join!(self.rosters.list_patients(), self.rosters.list_doctors());

        let mut state = self.state.write().await;
        match patients {
            Ok(list) => state.patients = list,
            Err(err) => error!("Fetch patients error: {}", err),
        }
        match doctors {
            Ok(list) => state.doctors = list,
            Err(err) => error!("Fetch doctors error: {}", err),
        }
    }
}
