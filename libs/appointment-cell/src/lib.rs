pub mod controller;
pub mod models;
pub mod services;
pub mod view;

pub use controller::{
    ActionOutcome, Clock, Notice, NoticeLevel, SchedulingController, SchedulingState,
};
pub use models::*;
pub use services::*;
