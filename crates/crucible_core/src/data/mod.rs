//! Ingestion boundary: the row schema the core consumes, the time
//! formats it arrives in, and the embedded default dataset.

pub mod embedded;
pub mod rows;
pub mod timefmt;

pub use embedded::{default_event_rows, default_roster_rows, DEFAULT_TEAM_SIZE};
pub use rows::{build_equipment, build_events, build_roster, EquipmentRow, EventRow, RosterRow};
pub use timefmt::{duration_between_military, format_mm_ss, parse_military, parse_mm_ss};
