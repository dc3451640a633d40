use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire value of the "none held" sentinel.
pub const NONE_HELD: &str = "NONE HELD";

/// Sentinel spelling found in older backups. Accepted on input only.
pub const LEGACY_NONE_HELD: &str = "NÃO HOUVE";

/// Identifies a volunteer. Compared verbatim; the roster decides the spelling.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WorkerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One of the three recurring duties at a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Entrance duty. Required at every service.
    Gatekeeper,
    /// Song leading.
    Worship,
    /// Message delivery.
    Sermon,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Gatekeeper, Role::Worship, Role::Sermon];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Gatekeeper => "gatekeeper",
            Role::Worship => "worship",
            Role::Sermon => "sermon",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gatekeeper" | "gate" => Ok(Role::Gatekeeper),
            "worship" => Ok(Role::Worship),
            "sermon" | "word" => Ok(Role::Sermon),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Kind of weekly service. Codes are the ones stored in backups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ServiceDay {
    /// Sunday morning Bible study.
    #[serde(rename = "EBD")]
    SundayStudy,
    /// Sunday evening service.
    #[serde(rename = "DOM")]
    SundayEvening,
    #[serde(rename = "SEG")]
    Monday,
    #[serde(rename = "TER")]
    Tuesday,
    /// Midweek service led by the women's group.
    #[serde(rename = "QUA")]
    Wednesday,
    #[serde(rename = "QUI")]
    Thursday,
    #[serde(rename = "SEX")]
    Friday,
    #[serde(rename = "SAB")]
    Saturday,
}

impl ServiceDay {
    pub const ALL: [ServiceDay; 8] = [
        ServiceDay::SundayStudy,
        ServiceDay::SundayEvening,
        ServiceDay::Monday,
        ServiceDay::Tuesday,
        ServiceDay::Wednesday,
        ServiceDay::Thursday,
        ServiceDay::Friday,
        ServiceDay::Saturday,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ServiceDay::SundayStudy => "EBD",
            ServiceDay::SundayEvening => "DOM",
            ServiceDay::Monday => "SEG",
            ServiceDay::Tuesday => "TER",
            ServiceDay::Wednesday => "QUA",
            ServiceDay::Thursday => "QUI",
            ServiceDay::Friday => "SEX",
            ServiceDay::Saturday => "SAB",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceDay::SundayStudy => "Sunday morning study",
            ServiceDay::SundayEvening => "Sunday evening service",
            ServiceDay::Monday => "Monday service",
            ServiceDay::Tuesday => "Tuesday service",
            ServiceDay::Wednesday => "Midweek service",
            ServiceDay::Thursday => "Thursday service",
            ServiceDay::Friday => "Friday service",
            ServiceDay::Saturday => "Saturday service",
        }
    }
}

impl fmt::Display for ServiceDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for ServiceDay {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        ServiceDay::ALL
            .into_iter()
            .find(|day| day.code() == upper)
            .ok_or_else(|| format!("unknown service day: {s}"))
    }
}

/// Who held a role at a service, or the sentinel for a role that did not occur.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Assignment {
    Worker(WorkerId),
    NoneHeld,
}

impl Assignment {
    pub fn worker(name: impl Into<String>) -> Self {
        Assignment::Worker(WorkerId::new(name))
    }

    pub fn is_none_held(&self) -> bool {
        matches!(self, Assignment::NoneHeld)
    }

    pub fn worker_id(&self) -> Option<&WorkerId> {
        match self {
            Assignment::Worker(id) => Some(id),
            Assignment::NoneHeld => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Assignment::Worker(id) => id.as_str(),
            Assignment::NoneHeld => NONE_HELD,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Assignment {
    fn from(s: String) -> Self {
        if s == NONE_HELD || s == LEGACY_NONE_HELD {
            Assignment::NoneHeld
        } else {
            Assignment::Worker(WorkerId(s))
        }
    }
}

impl From<&str> for Assignment {
    fn from(s: &str) -> Self {
        Assignment::from(s.to_string())
    }
}

impl From<Assignment> for String {
    fn from(a: Assignment) -> Self {
        match a {
            Assignment::Worker(id) => id.0,
            Assignment::NoneHeld => NONE_HELD.to_string(),
        }
    }
}

/// The user-editable part of a record, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub service_date: NaiveDate,
    pub service_day: ServiceDay,
    pub gatekeeper: Assignment,
    pub worship: Assignment,
    pub sermon: Assignment,
    pub scripture_text: String,
}

/// One service as persisted and exported.
///
/// Field aliases let older backups (Portuguese keys,
/// `timestamp` instead of `createdAt`) be restored as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(alias = "date")]
    pub service_date: NaiveDate,
    #[serde(alias = "dayOfWeek")]
    pub service_day: ServiceDay,
    #[serde(alias = "portao")]
    pub gatekeeper: Assignment,
    #[serde(alias = "louvor")]
    pub worship: Assignment,
    #[serde(alias = "palavra")]
    pub sermon: Assignment,
    #[serde(alias = "textoBiblico", default)]
    pub scripture_text: String,
    /// Milliseconds; tie-break for records sharing a date.
    #[serde(alias = "timestamp")]
    pub created_at: i64,
}

impl Record {
    pub fn new(id: impl Into<String>, created_at: i64, fields: RecordFields) -> Self {
        Self {
            id: id.into(),
            service_date: fields.service_date,
            service_day: fields.service_day,
            gatekeeper: fields.gatekeeper,
            worship: fields.worship,
            sermon: fields.sermon,
            scripture_text: fields.scripture_text,
            created_at,
        }
    }

    /// Replace every editable field; `id` and `created_at` stay.
    pub fn apply(&mut self, fields: RecordFields) {
        self.service_date = fields.service_date;
        self.service_day = fields.service_day;
        self.gatekeeper = fields.gatekeeper;
        self.worship = fields.worship;
        self.sermon = fields.sermon;
        self.scripture_text = fields.scripture_text;
    }

    pub fn assignment(&self, role: Role) -> &Assignment {
        match role {
            Role::Gatekeeper => &self.gatekeeper,
            Role::Worship => &self.worship,
            Role::Sermon => &self.sermon,
        }
    }

    /// True when `worker` held `role` at this service.
    pub fn is_held_by(&self, role: Role, worker: &WorkerId) -> bool {
        self.assignment(role).worker_id() == Some(worker)
    }
}
