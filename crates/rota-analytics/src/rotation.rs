use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rota_core::{Record, Role, Roster, ServiceDay, WorkerId};
use rota_rules::role_requirements;
use serde::Serialize;
use tracing::debug;

/// A worker idle for more than this many days at a (day, role) is urgent.
pub const URGENT_AFTER_DAYS: i64 = 21;

const SECS_PER_DAY: i64 = 86_400;

/// Whole days since a worker last held a role, or `Never`.
///
/// `Never` orders above every finite count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DaysSince {
    Days(i64),
    Never,
}

impl Ord for DaysSince {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DaysSince::Never, DaysSince::Never) => Ordering::Equal,
            (DaysSince::Never, DaysSince::Days(_)) => Ordering::Greater,
            (DaysSince::Days(_), DaysSince::Never) => Ordering::Less,
            (DaysSince::Days(a), DaysSince::Days(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for DaysSince {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DaysSince {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysSince::Days(1) => f.write_str("1 day"),
            DaysSince::Days(n) => write!(f, "{n} days"),
            DaysSince::Never => f.write_str("never"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Urgent,
}

impl Urgency {
    pub fn from_days(days: DaysSince) -> Self {
        match days {
            DaysSince::Never => Urgency::Urgent,
            DaysSince::Days(n) if n > URGENT_AFTER_DAYS => Urgency::Urgent,
            DaysSince::Days(_) => Urgency::Normal,
        }
    }
}

/// One worker's line in a rotation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationEntry {
    pub worker: WorkerId,
    pub last_date: Option<NaiveDate>,
    /// ID of the record `last_date` came from.
    pub last_record: Option<String>,
    pub days_since: DaysSince,
    pub urgency: Urgency,
}

/// Rotation list for one (service day, role) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationTable {
    pub day: ServiceDay,
    pub role: Role,
    pub entries: Vec<RotationEntry>,
}

/// Days between local midnight of `date` and `now`, floored.
fn days_between(date: NaiveDate, now: NaiveDateTime) -> i64 {
    let midnight = date.and_time(NaiveTime::default());
    (now - midnight).num_seconds().div_euclid(SECS_PER_DAY)
}

/// Most recent record where `worker` held `role` on a `day` service.
fn last_served<'a>(
    records: &'a [Record],
    day: ServiceDay,
    role: Role,
    worker: &WorkerId,
) -> Option<&'a Record> {
    records
        .iter()
        .filter(|r| r.service_day == day && r.is_held_by(role, worker))
        .max_by(|a, b| {
            a.service_date
                .cmp(&b.service_date)
                .then(a.created_at.cmp(&b.created_at))
        })
}

/// Rank the eligible roster for `role` at `day` services, longest idle first.
///
/// Workers with equal idle time keep roster order.
pub fn rotation_for(
    records: &[Record],
    roster: &Roster,
    day: ServiceDay,
    role: Role,
    now: NaiveDateTime,
) -> Vec<RotationEntry> {
    let mut entries: Vec<RotationEntry> = roster
        .eligible()
        .map(|worker| {
            let last = last_served(records, day, role, worker);
            let days_since = match last {
                Some(r) => DaysSince::Days(days_between(r.service_date, now)),
                None => DaysSince::Never,
            };
            RotationEntry {
                worker: worker.clone(),
                last_date: last.map(|r| r.service_date),
                last_record: last.map(|r| r.id.clone()),
                days_since,
                urgency: Urgency::from_days(days_since),
            }
        })
        .collect();

    // `sort_by` is stable, so ties stay in roster order.
    entries.sort_by(|a, b| b.days_since.cmp(&a.days_since));
    debug!(%day, %role, workers = entries.len(), "rotation computed");
    entries
}

/// Rotation lists for every pair whose role takes place on that day.
pub fn rotation_board(records: &[Record], roster: &Roster, now: NaiveDateTime) -> Vec<RotationTable> {
    ServiceDay::ALL
        .into_iter()
        .flat_map(|day| {
            role_requirements(day)
                .active_roles()
                .map(move |role| (day, role))
                .collect::<Vec<_>>()
        })
        .map(|(day, role)| RotationTable {
            day,
            role,
            entries: rotation_for(records, roster, day, role, now),
        })
        .collect()
}
