use chrono::NaiveDate;
use rota_core::{Assignment, Record, RecordFields, Role, ServiceDay};
use tracing::trace;

use crate::error::{Field, Result, RuleError};
use crate::rules::{
    day_matches_date, day_rule, reconcile_day, RoleRequirements, DEFAULT_SCRIPTURE,
    LEGACY_DEFAULT_SCRIPTURE, LEGACY_WOMENS_GROUP_TEXT, WOMENS_GROUP_TEXT,
};

/// The form being filled in, before validation.
///
/// `None` means "not selected yet". A role holding `Some(NoneHeld)` was set
/// to the sentinel, either by the day rules or by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub service_date: Option<NaiveDate>,
    pub service_day: Option<ServiceDay>,
    pub gatekeeper: Option<Assignment>,
    pub worship: Option<Assignment>,
    pub sermon: Option<Assignment>,
    pub scripture_text: String,
}

impl Draft {
    /// Empty form dated `date`, with the day already resolved when possible.
    pub fn for_date(date: NaiveDate) -> Self {
        apply_date_change(Draft::default(), date)
    }

    /// Form pre-filled for editing an existing record.
    pub fn from_record(record: &Record) -> Self {
        Self {
            service_date: Some(record.service_date),
            service_day: Some(record.service_day),
            gatekeeper: Some(record.gatekeeper.clone()),
            worship: Some(record.worship.clone()),
            sermon: Some(record.sermon.clone()),
            scripture_text: record.scripture_text.clone(),
        }
    }

    pub fn role(&self, role: Role) -> Option<&Assignment> {
        match role {
            Role::Gatekeeper => self.gatekeeper.as_ref(),
            Role::Worship => self.worship.as_ref(),
            Role::Sermon => self.sermon.as_ref(),
        }
    }

    fn role_mut(&mut self, role: Role) -> &mut Option<Assignment> {
        match role {
            Role::Gatekeeper => &mut self.gatekeeper,
            Role::Worship => &mut self.worship,
            Role::Sermon => &mut self.sermon,
        }
    }

    pub fn with_role(mut self, role: Role, assignment: Option<Assignment>) -> Self {
        *self.role_mut(role) = assignment;
        self
    }

    pub fn with_scripture(mut self, text: impl Into<String>) -> Self {
        self.scripture_text = text.into();
        self
    }
}

/// Transition run whenever the selected service day changes.
///
/// Suppressed roles are set to "none held"; a sentinel left on a role that
/// now takes place is cleared so it has to be picked again. The forced
/// scripture text follows the same pattern.
pub fn apply_day_change(draft: Draft, new_day: Option<ServiceDay>) -> Draft {
    let mut next = draft;
    next.service_day = new_day;

    let (requirements, forced) = match new_day {
        Some(day) => {
            let rule = day_rule(day);
            (rule.requirements, rule.forced_scripture)
        }
        None => (RoleRequirements::ALL_REQUIRED, None),
    };

    for role in Role::ALL {
        let slot = next.role_mut(role);
        if requirements.is_suppressed(role) {
            *slot = Some(Assignment::NoneHeld);
        } else if slot.as_ref().is_some_and(Assignment::is_none_held) {
            trace!(%role, "clearing stale none-held");
            *slot = None;
        }
    }

    match forced {
        Some(text) => {
            if is_placeholder(&next.scripture_text) {
                next.scripture_text = text.to_string();
            }
        }
        None => {
            if is_womens_group_text(&next.scripture_text) {
                next.scripture_text.clear();
            }
        }
    }

    next
}

/// Transition run when the user picks another date.
pub fn apply_date_change(draft: Draft, date: NaiveDate) -> Draft {
    let day = reconcile_day(date, draft.service_day);
    let mut next = draft;
    next.service_date = Some(date);
    apply_day_change(next, day)
}

fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == DEFAULT_SCRIPTURE || trimmed == LEGACY_DEFAULT_SCRIPTURE
}

fn is_womens_group_text(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed == WOMENS_GROUP_TEXT || trimmed == LEGACY_WOMENS_GROUP_TEXT
}

/// Check a draft before saving and fill in the derived values.
///
/// Fields are checked in a fixed order (date, day, gatekeeper, worship,
/// sermon); the first missing one is reported.
pub fn validate(draft: &Draft) -> Result<RecordFields> {
    let service_date = draft
        .service_date
        .ok_or(RuleError::MissingField(Field::ServiceDate))?;
    let service_day = draft
        .service_day
        .ok_or(RuleError::MissingField(Field::ServiceDay))?;
    if !day_matches_date(service_day, service_date) {
        return Err(RuleError::DayMismatch {
            date: service_date,
            day: service_day,
        });
    }

    let rule = day_rule(service_day);
    let gatekeeper = resolve_role(draft, Role::Gatekeeper, &rule.requirements)?;
    let worship = resolve_role(draft, Role::Worship, &rule.requirements)?;
    let sermon = resolve_role(draft, Role::Sermon, &rule.requirements)?;

    let scripture_text = if is_placeholder(&draft.scripture_text) {
        rule.forced_scripture.unwrap_or(DEFAULT_SCRIPTURE).to_string()
    } else {
        draft.scripture_text.trim().to_string()
    };

    Ok(RecordFields {
        service_date,
        service_day,
        gatekeeper,
        worship,
        sermon,
        scripture_text,
    })
}

fn resolve_role(draft: &Draft, role: Role, requirements: &RoleRequirements) -> Result<Assignment> {
    if requirements.is_suppressed(role) {
        return Ok(Assignment::NoneHeld);
    }
    match draft.role(role) {
        Some(assignment @ Assignment::Worker(_)) => Ok(assignment.clone()),
        _ => Err(RuleError::MissingField(field_for(role))),
    }
}

fn field_for(role: Role) -> Field {
    match role {
        Role::Gatekeeper => Field::Gatekeeper,
        Role::Worship => Field::Worship,
        Role::Sermon => Field::Sermon,
    }
}
