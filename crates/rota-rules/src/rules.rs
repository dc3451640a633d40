use chrono::{Datelike, NaiveDate, Weekday};
use rota_core::{Role, ServiceDay};

/// Placeholder stored when no scripture text is given.
pub const DEFAULT_SCRIPTURE: &str = "Not informed";
/// Fixed scripture text of the women's-group midweek service.
pub const WOMENS_GROUP_TEXT: &str = "Directed by women's group";

/// Spellings of the two texts above found in older backups.
pub const LEGACY_DEFAULT_SCRIPTURE: &str = "Não informado";
pub const LEGACY_WOMENS_GROUP_TEXT: &str = "CULTO DE SENHORAS";

/// The two tags a Sunday can be recorded under.
pub const SUNDAY_CHOICES: [ServiceDay; 2] = [ServiceDay::SundayStudy, ServiceDay::SundayEvening];

/// Whether a role takes place at a kind of service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// A worker must be picked.
    Required,
    /// The role does not occur; always stored as "none held".
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirements {
    pub gatekeeper: Requirement,
    pub worship: Requirement,
    pub sermon: Requirement,
}

impl RoleRequirements {
    pub const ALL_REQUIRED: RoleRequirements = RoleRequirements {
        gatekeeper: Requirement::Required,
        worship: Requirement::Required,
        sermon: Requirement::Required,
    };

    pub fn get(&self, role: Role) -> Requirement {
        match role {
            Role::Gatekeeper => self.gatekeeper,
            Role::Worship => self.worship,
            Role::Sermon => self.sermon,
        }
    }

    pub fn is_suppressed(&self, role: Role) -> bool {
        self.get(role) == Requirement::Suppressed
    }

    /// Roles that take place, in [`Role::ALL`] order.
    pub fn active_roles(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| !self.is_suppressed(*r))
    }
}

/// Everything the form needs to know about one service-day tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRule {
    pub day: ServiceDay,
    pub requirements: RoleRequirements,
    /// Scripture text imposed when the user left it blank.
    pub forced_scripture: Option<&'static str>,
}

const fn regular(day: ServiceDay) -> DayRule {
    DayRule {
        day,
        requirements: RoleRequirements::ALL_REQUIRED,
        forced_scripture: None,
    }
}

// Indexed by `ServiceDay as usize`; order must follow the enum.
const DAY_RULES: [DayRule; 8] = [
    regular(ServiceDay::SundayStudy),
    regular(ServiceDay::SundayEvening),
    DayRule {
        day: ServiceDay::Monday,
        requirements: RoleRequirements {
            gatekeeper: Requirement::Required,
            worship: Requirement::Required,
            sermon: Requirement::Suppressed,
        },
        forced_scripture: None,
    },
    regular(ServiceDay::Tuesday),
    DayRule {
        day: ServiceDay::Wednesday,
        requirements: RoleRequirements {
            gatekeeper: Requirement::Required,
            worship: Requirement::Suppressed,
            sermon: Requirement::Suppressed,
        },
        forced_scripture: Some(WOMENS_GROUP_TEXT),
    },
    regular(ServiceDay::Thursday),
    regular(ServiceDay::Friday),
    regular(ServiceDay::Saturday),
];

pub fn day_rule(day: ServiceDay) -> &'static DayRule {
    &DAY_RULES[day as usize]
}

pub fn role_requirements(day: ServiceDay) -> RoleRequirements {
    day_rule(day).requirements
}

/// Outcome of mapping a calendar date to a service-day tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayResolution {
    Fixed(ServiceDay),
    /// Sunday: the user must pick one of [`SUNDAY_CHOICES`].
    Ambiguous,
}

impl DayResolution {
    /// Tags the user may pick from for this date.
    pub fn choices(&self) -> &[ServiceDay] {
        match self {
            DayResolution::Fixed(day) => std::slice::from_ref(day),
            DayResolution::Ambiguous => &SUNDAY_CHOICES,
        }
    }
}

/// Default service-day tag for a local calendar date.
pub fn resolve_default_day(date: NaiveDate) -> DayResolution {
    match date.weekday() {
        Weekday::Sun => DayResolution::Ambiguous,
        Weekday::Mon => DayResolution::Fixed(ServiceDay::Monday),
        Weekday::Tue => DayResolution::Fixed(ServiceDay::Tuesday),
        Weekday::Wed => DayResolution::Fixed(ServiceDay::Wednesday),
        Weekday::Thu => DayResolution::Fixed(ServiceDay::Thursday),
        Weekday::Fri => DayResolution::Fixed(ServiceDay::Friday),
        Weekday::Sat => DayResolution::Fixed(ServiceDay::Saturday),
    }
}

/// Day selection after the date changed to `date`.
///
/// A Sunday keeps a current `EBD`/`DOM` choice and clears anything else.
pub fn reconcile_day(date: NaiveDate, current: Option<ServiceDay>) -> Option<ServiceDay> {
    match resolve_default_day(date) {
        DayResolution::Fixed(day) => Some(day),
        DayResolution::Ambiguous => current.filter(|d| SUNDAY_CHOICES.contains(d)),
    }
}

/// True when a record tagged `day` may be dated `date`.
pub fn day_matches_date(day: ServiceDay, date: NaiveDate) -> bool {
    resolve_default_day(date).choices().contains(&day)
}
