use chrono::NaiveDate;
use rota_core::ServiceDay;
use thiserror::Error;

/// Form fields checked before a record can be saved, in checking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ServiceDate,
    ServiceDay,
    Gatekeeper,
    Worship,
    Sermon,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Field::ServiceDate => "service date",
            Field::ServiceDay => "service day",
            Field::Gatekeeper => "gatekeeper",
            Field::Worship => "worship",
            Field::Sermon => "sermon",
        };
        f.write_str(s)
    }
}

/// Validation failures raised when saving a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The first required field left empty.
    #[error("Missing required field: {0}")]
    MissingField(Field),

    /// The chosen service day cannot happen on the chosen date.
    #[error("Service day {day} does not fall on {date}")]
    DayMismatch { date: NaiveDate, day: ServiceDay },
}

pub type Result<T> = std::result::Result<T, RuleError>;
