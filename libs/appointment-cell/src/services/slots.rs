// libs/appointment-cell/src/services/slots.rs

/// Every half-hour label a doctor can be booked at, earliest first.
pub const SLOT_CATALOG: [&str; 18] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30",
    "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00", "17:30", "18:00", "18:30",
];

pub const SLOT_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotBand {
    Morning,
    Afternoon,
}

pub fn slots() -> impl Iterator<Item = &'static str> {
    SLOT_CATALOG.iter().copied()
}

pub fn is_catalog_slot(label: &str) -> bool {
    SLOT_CATALOG.contains(&label)
}

/// Position in presentation order, if the label is in the catalog.
pub fn slot_index(label: &str) -> Option<usize> {
    SLOT_CATALOG.iter().position(|slot| *slot == label)
}

/// Morning band runs to 12:30, afternoon starts at 14:00.
pub fn band_of(label: &str) -> Option<SlotBand> {
    slot_index(label).map(|idx| if idx < 8 { SlotBand::Morning } else { SlotBand::Afternoon })
}
