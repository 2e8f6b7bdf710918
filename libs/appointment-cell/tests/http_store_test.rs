use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::controller::{ActionOutcome, SchedulingController};
use appointment_cell::models::*;
use appointment_cell::services::store::{AppointmentStore, HttpAppointmentStore, RosterStore};
use appointment_cell::view::RowAction;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockBackendResponses, TestConfig, TestSession, TEST_TOKEN};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn bearer() -> String {
    format!("Bearer {}", TEST_TOKEN)
}

fn store_for(mock_server: &MockServer) -> Arc<HttpAppointmentStore> {
    let config = TestConfig::with_base_url(mock_server.uri()).to_app_config();
    Arc::new(HttpAppointmentStore::new(&config, TestSession::signed_in()))
}

fn appointment(id: &str, date: &str, time: &str, status: &str) -> serde_json::Value {
    MockBackendResponses::appointment_response(id, "D1", date, time, status)
}

async fn fill_create_form(controller: &SchedulingController) {
    controller.open_create().await;
    controller.on_draft_change(DraftField::Patient, "P1").await;
    controller.on_draft_change(DraftField::Doctor, "D1").await;
    controller.on_draft_change(DraftField::AppointmentDate, "2025-03-20").await;
    controller.on_draft_change(DraftField::AppointmentTime, "10:00").await;
    controller.on_draft_change(DraftField::Reason, "Persistent cough").await;
}

fn controller_for(store: Arc<HttpAppointmentStore>) -> SchedulingController {
    SchedulingController::with_today(store.clone(), store, today())
}

#[tokio::test]
async fn test_list_by_date_uses_calendar_date_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments/date/2025-03-14"))
        .and(header("Authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment("A1", "2025-03-14", "10:00", "Scheduled"),
            appointment("A2", "2025-03-14", "11:00", "No Show"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let list = store.list_by_date(today()).await.unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0].calendar_date(), "2025-03-14");
    assert_eq!(list[0].doctor_id(), Some("D1"));
    assert_eq!(list[1].status, AppointmentStatus::NoShow);
}

#[tokio::test]
async fn test_rosters_are_fetched_from_their_endpoints() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::patient_response("P1", "Jane Roe", "PAT-0001")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::doctor_response("D1", "Gregory House", "Diagnostics"),
            MockBackendResponses::doctor_response("D2", "Lisa Cuddy", "Endocrinology"),
        ])))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let patients = store.list_patients().await.unwrap();
    let doctors = store.list_doctors().await.unwrap();

    assert_eq!(patients[0].patient_code, "PAT-0001");
    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[1].specialization, "Endocrinology");
}

#[tokio::test]
async fn test_update_puts_draft_to_appointment_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/appointments/A1"))
        .and(body_json(json!({
            "patient": "P1",
            "doctor": "D1",
            "appointmentDate": "2025-03-15",
            "appointmentTime": "14:30",
            "reason": "Persistent cough",
            "notes": "Moved"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(appointment("A1", "2025-03-15", "14:30", "Scheduled")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let draft = AppointmentDraft {
        patient: "P1".into(),
        doctor: "D1".into(),
        appointment_date: "2025-03-15".into(),
        appointment_time: "14:30".into(),
        reason: "Persistent cough".into(),
        notes: "Moved".into(),
    };

    let updated = store.update("A1", &draft).await.unwrap();
    assert_matches!(updated, Some(ref a) if a.appointment_time == "14:30");
}

#[tokio::test]
async fn test_conflict_is_surfaced_as_validation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(MockBackendResponses::error_response(
                "Doctor is not available at this time",
            )),
        )
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let result = store.create(&AppointmentDraft::default()).await;

    assert_matches!(
        result,
        Err(AppError::Validation(ref msg)) if msg == "Doctor is not available at this time"
    );
}

#[tokio::test]
async fn test_signed_out_store_never_reaches_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_base_url(mock_server.uri()).to_app_config();
    let store = HttpAppointmentStore::new(&config, TestSession::signed_out());

    assert_matches!(store.list_all().await, Err(AppError::Auth(_)));
}

#[tokio::test]
async fn test_create_posts_draft_then_refetches_selected_day() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(header("Authorization", bearer().as_str()))
        .and(body_json(json!({
            "patient": "P1",
            "doctor": "D1",
            "appointmentDate": "2025-03-20",
            "appointmentTime": "10:00",
            "reason": "Persistent cough",
            "notes": ""
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(appointment("NEW1", "2025-03-20", "10:00", "Scheduled")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/appointments/date/2025-03-14"))
        .and(header("Authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let controller = controller_for(store_for(&mock_server));
    fill_create_form(&controller).await;

    assert_eq!(controller.submit().await, ActionOutcome::Done);

    let state = controller.snapshot().await;
    assert!(!state.modal_open);
    assert_eq!(state.selected_date, today());
    assert_eq!(
        controller.take_notices().await.last().map(|n| n.message.as_str()),
        Some("Appointment scheduled successfully")
    );
}

#[tokio::test]
async fn test_complete_patches_status_and_refetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments/date/2025-03-14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment("X", "2025-03-14", "10:00", "Scheduled")
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/appointments/X/status"))
        .and(body_json(json!({ "status": "Completed" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(appointment("X", "2025-03-14", "10:00", "Completed")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/appointments/date/2025-03-14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment("X", "2025-03-14", "10:00", "Completed")
        ])))
        .mount(&mock_server)
        .await;

    let controller = controller_for(store_for(&mock_server));
    assert_eq!(controller.refresh().await, ActionOutcome::Done);
    let rows = controller.snapshot().await.rows();
    assert_eq!(rows[0].actions.len(), 3);

    assert_eq!(
        controller.change_status("X", AppointmentStatus::Completed).await,
        ActionOutcome::Done
    );

    let rows = controller.snapshot().await.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status_label, "Completed");
    assert_eq!(rows[0].badge_class, "status-completed");
    assert_eq!(rows[0].actions, vec![RowAction::Edit]);
}

#[tokio::test]
async fn test_server_error_keeps_current_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments/date/2025-03-14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment("A1", "2025-03-14", "09:00", "Scheduled")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments/date/2025-03-15"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(MockBackendResponses::error_response("boom")),
        )
        .mount(&mock_server)
        .await;

    let controller = controller_for(store_for(&mock_server));
    controller.refresh().await;
    assert_eq!(
        controller.on_select_date(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()).await,
        ActionOutcome::Failed
    );

    let state = controller.snapshot().await;
    assert_eq!(state.appointments.len(), 1);
    assert_eq!(state.appointments[0].id, "A1");
    assert_eq!(controller.take_notices().await[0].message, "Failed to fetch appointments");
}

#[tokio::test]
async fn test_create_with_unpopulated_echo_still_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockBackendResponses::appointment_ref_response(
                "NEW1",
                "P1",
                "D1",
                "2025-03-20",
                "10:00",
                "Scheduled",
            ),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/appointments/date/2025-03-14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let controller = controller_for(store_for(&mock_server));
    fill_create_form(&controller).await;

    assert_eq!(controller.submit().await, ActionOutcome::Done);

    let state = controller.snapshot().await;
    assert!(!state.modal_open);
    let notices = controller.take_notices().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Appointment scheduled successfully");
}

#[tokio::test]
async fn test_status_change_with_empty_body_refetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments/date/2025-03-14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment("X", "2025-03-14", "10:00", "Scheduled")
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/appointments/X/status"))
        .and(body_json(json!({ "status": "Cancelled" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/appointments/date/2025-03-14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment("X", "2025-03-14", "10:00", "Cancelled")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let controller = controller_for(store_for(&mock_server));
    assert_eq!(controller.refresh().await, ActionOutcome::Done);
    assert_eq!(
        controller.change_status("X", AppointmentStatus::Cancelled).await,
        ActionOutcome::Done
    );

    let rows = controller.snapshot().await.rows();
    assert_eq!(rows[0].status_label, "Cancelled");
}
