use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appointment_cell::controller::{NoticeLevel, SchedulingController};
use appointment_cell::services::store::HttpAppointmentStore;
use auth_cell::SignInService;
use shared_config::AppConfig;
use shared_utils::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hospital front desk");

    let config = AppConfig::from_env();
    if !config.is_configured() {
        bail!("HOSPITAL_API_BASE must be an http(s) URL, got {:?}", config.api_base_url);
    }

    let session = SessionStore::global();

    match (std::env::var("HOSPITAL_DESK_EMAIL"), std::env::var("HOSPITAL_DESK_PASSWORD")) {
        (Ok(email), Ok(password)) => {
            SignInService::new(&config, session.clone())
                .sign_in(&email, &password)
                .await
                .context("sign-in failed")?;
        }
        _ => warn!("HOSPITAL_DESK_EMAIL/HOSPITAL_DESK_PASSWORD not set, requests will be refused"),
    }

    let store = Arc::new(HttpAppointmentStore::new(&config, session));
    let controller = SchedulingController::new(store.clone(), store);
    controller.on_enter().await;

    if let Some(arg) = std::env::args().nth(1) {
        let date = NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .with_context(|| format!("expected a YYYY-MM-DD date, got {}", arg))?;
        controller.on_select_date(date).await;
    }

    let state = controller.snapshot().await;
    println!("Appointments for {}", state.date_filter_value());

    match state.empty_message() {
        Some(message) => println!("  {}", message),
        None => {
            for row in state.rows() {
                let actions: Vec<&str> = row.actions.iter().map(|a| a.label()).collect();
                println!(
                    "  {} {:<6} {:<20} {:<22} {:<10} [{}]",
                    row.appointment_code,
                    row.time,
                    row.patient_name,
                    row.doctor_name,
                    row.status_label,
                    actions.join(", ")
                );
            }
        }
    }

    for notice in controller.take_notices().await {
        match notice.level {
            NoticeLevel::Success => info!("{}", notice.message),
            NoticeLevel::Error => warn!("{}", notice.message),
        }
    }

    Ok(())
}
