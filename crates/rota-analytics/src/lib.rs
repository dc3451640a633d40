//! `rota-analytics`: derived views over the record collection.
//!
//! Everything here is a pure function of the records, the roster and (for
//! rotation) the current local time. Nothing is cached.

pub mod activity;
pub mod rotation;

pub use activity::{activity_counts, assignments_for, ranking, ActivityCounts, RankingEntry};
pub use rotation::{
    rotation_board, rotation_for, DaysSince, RotationEntry, RotationTable, Urgency,
    URGENT_AFTER_DAYS,
};
