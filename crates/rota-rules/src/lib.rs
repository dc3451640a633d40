//! `rota-rules`: which roles a service has, and how the form reacts.
//!
//! # Rule table
//!
//! | Tag   | Service                 | Gatekeeper | Worship    | Sermon     | Scripture                  |
//! |-------|-------------------------|------------|------------|------------|----------------------------|
//! | `EBD` | Sunday morning study    | required   | required   | required   | free text                  |
//! | `DOM` | Sunday evening service  | required   | required   | required   | free text                  |
//! | `SEG` | Monday                  | required   | required   | none held  | free text                  |
//! | `QUA` | Midweek (women's group) | required   | none held  | none held  | "Directed by women's group" |
//! | other | Tue, Thu, Fri, Sat      | required   | required   | required   | free text                  |
//!
//! Sunday dates are ambiguous: the user picks `EBD` or `DOM`.
//!
//! The form is modelled as a [`Draft`] value moved through pure transitions
//! ([`apply_date_change`], [`apply_day_change`]) and checked by [`validate`]
//! before a record is created.

pub mod draft;
pub mod error;
pub mod rules;

pub use draft::{apply_date_change, apply_day_change, validate, Draft};
pub use error::{Field, Result, RuleError};
pub use rules::{
    day_matches_date, day_rule, reconcile_day, resolve_default_day, role_requirements, DayResolution,
    DayRule, Requirement, RoleRequirements, DEFAULT_SCRIPTURE, LEGACY_DEFAULT_SCRIPTURE,
    LEGACY_WOMENS_GROUP_TEXT, SUNDAY_CHOICES, WOMENS_GROUP_TEXT,
};
