pub mod availability;
pub mod lifecycle;
pub mod memory;
pub mod slots;
pub mod store;

pub use availability::{available, available_excluding, taken_slots};
pub use lifecycle::{AppointmentLifecycleService, StatusAction};
pub use memory::{InMemoryAppointmentStore, StoreCall};
pub use slots::SLOT_CATALOG;
pub use store::{AppointmentStore, HttpAppointmentStore, RosterStore};
