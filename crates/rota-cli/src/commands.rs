use std::fmt::Write;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use rota_analytics::{
    assignments_for, ranking, rotation_board, DaysSince, RotationTable, Urgency,
};
use rota_core::{Assignment, Record, Role, Roster, RotaConfig, ServiceDay, WorkerId, NONE_HELD};
use rota_records::{write_backup, RecordRepository};
use rota_report::{
    compose_link, render_history, render_month, render_range, render_record, DesktopSharer, ShareError,
    ShareProvider,
};
use rota_rules::{
    apply_date_change, apply_day_change, resolve_default_day, role_requirements, DayResolution,
    Draft, Requirement,
};
use rota_store::RecordStore;
use tracing::{info, warn};

use crate::cli::{Command, RecordArgs};

const DATE_FORMAT: &str = "%d/%m/%Y";

/// What `share` renders.
enum ShareTarget {
    Record(String),
    Month(String),
    Range(NaiveDate, NaiveDate),
    History,
}

/// Everything a command needs: config, roster and the open collection.
pub struct App<S: RecordStore> {
    pub config: RotaConfig,
    pub roster: Roster,
    pub repo: RecordRepository<S>,
}

impl<S: RecordStore> App<S> {
    pub fn new(config: RotaConfig, store: S) -> Self {
        let roster = Roster::from_config(&config.roster);
        Self {
            config,
            roster,
            repo: RecordRepository::open(store),
        }
    }

    /// Run one command, printing its output to stdout.
    pub async fn run(&mut self, command: Command) -> anyhow::Result<()> {
        let today = Local::now().date_naive();
        let output = match command {
            Command::Day { date } => describe_day(date.unwrap_or(today)),
            Command::Add(args) => {
                let draft = self.build_draft(Draft::for_date(args.date.unwrap_or(today)), &args)?;
                let record = self.repo.create(&draft)?;
                format!("Created {}\n{}", record.id, record_line(&record))
            }
            Command::Edit { id, fields } => {
                let current = self
                    .repo
                    .get(&id)
                    .with_context(|| format!("no record with id {id}"))?;
                let mut draft = Draft::from_record(current);
                if let Some(date) = fields.date {
                    draft = apply_date_change(draft, date);
                }
                let draft = self.build_draft(draft, &fields)?;
                let record = self.repo.update(&id, &draft)?;
                format!("Updated {}\n{}", record.id, record_line(&record))
            }
            Command::Delete { id, yes } => {
                if !yes {
                    bail!("refusing to delete {id} without --yes");
                }
                let record = self.repo.delete(&id)?;
                format!("Deleted {}", record_line(&record))
            }
            Command::List { search } => self.list(search.as_deref().unwrap_or("")),
            Command::Months => self.months(),
            Command::Rotation { day, role, json } => {
                self.rotation(day, role, json, Local::now().naive_local())?
            }
            Command::Ranking { json } => self.ranking(json)?,
            Command::Details { worker, role } => {
                let worker = match self.resolve_worker(&worker)? {
                    Assignment::Worker(id) => id,
                    Assignment::NoneHeld => bail!("pick a worker, not {NONE_HELD}"),
                };
                self.details(&worker, role)
            }
            Command::Share {
                id,
                month,
                all,
                from,
                to,
                open,
            } => {
                let target = match (id, month, from.or(to).is_some()) {
                    (Some(id), _, _) => ShareTarget::Record(id),
                    (None, Some(month), _) => ShareTarget::Month(month),
                    (None, None, true) => ShareTarget::Range(
                        from.unwrap_or(NaiveDate::MIN),
                        to.unwrap_or(NaiveDate::MAX),
                    ),
                    (None, None, false) if all => ShareTarget::History,
                    _ => bail!("pass a record id, --month YYYY-MM, --from/--to or --all"),
                };
                let text = self.share_text(&target)?;
                let link = compose_link(&self.config.report.composer, &text);
                if open {
                    DesktopSharer::detect().open_link(&link).await?;
                }
                format!("{text}\n\n{link}")
            }
            Command::Export { dir, share } => self.export(&dir, today, share).await?,
            Command::Import { file } => {
                let count = self
                    .repo
                    .import_file(&file)
                    .await
                    .with_context(|| format!("importing {}", file.display()))?;
                format!("Imported {count} records from {}", file.display())
            }
            Command::Reset { yes } => {
                if !yes {
                    bail!("refusing to delete every record without --yes");
                }
                let removed = self.repo.clear()?;
                format!("Deleted {removed} records")
            }
        };
        println!("{output}");
        Ok(())
    }

    /// Apply the day and field arguments to `draft`, in form order.
    fn build_draft(&self, draft: Draft, args: &RecordArgs) -> anyhow::Result<Draft> {
        let mut draft = match args.day {
            Some(day) => apply_day_change(draft, Some(day)),
            None => draft,
        };
        for role in Role::ALL {
            if let Some(name) = args.role(role) {
                draft = draft.with_role(role, Some(self.resolve_worker(name)?));
            }
        }
        if let Some(text) = &args.text {
            draft = draft.with_scripture(text.as_str());
        }
        Ok(draft)
    }

    /// Match a typed name against the roster, ignoring case.
    fn resolve_worker(&self, input: &str) -> anyhow::Result<Assignment> {
        let input = input.trim();
        if input.eq_ignore_ascii_case(NONE_HELD) {
            return Ok(Assignment::NoneHeld);
        }
        let wanted = input.to_lowercase();
        match self
            .roster
            .all()
            .iter()
            .find(|w| w.as_str().to_lowercase() == wanted)
        {
            Some(worker) => Ok(Assignment::Worker(worker.clone())),
            None => bail!(
                "unknown worker {input:?}; roster: {}",
                self.roster
                    .all()
                    .iter()
                    .map(WorkerId::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    fn list(&self, term: &str) -> String {
        let found = self.repo.search(term);
        if found.is_empty() {
            return "No records.".to_string();
        }
        found
            .iter()
            .map(|r| format!("{}  {}", r.id, record_line(r)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn months(&self) -> String {
        let months = self.repo.months();
        if months.is_empty() {
            return "No records.".to_string();
        }
        months
            .iter()
            .map(|(year, month)| {
                let count = self
                    .repo
                    .query(|r| r.service_date.year() == *year && r.service_date.month() == *month)
                    .len();
                format!("{year}-{month:02}  {count} records")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn rotation(
        &self,
        day: Option<ServiceDay>,
        role: Option<Role>,
        json: bool,
        now: NaiveDateTime,
    ) -> anyhow::Result<String> {
        let records = self.repo.records();
        let tables: Vec<RotationTable> = rotation_board(records, &self.roster, now)
            .into_iter()
            .filter(|t| day.map_or(true, |d| d == t.day) && role.map_or(true, |r| r == t.role))
            .collect();
        if tables.is_empty() {
            bail!("no rotation for that day and role: the role is not held on that day");
        }
        if json {
            return Ok(serde_json::to_string_pretty(&tables)?);
        }
        Ok(format_rotation(&tables))
    }

    fn ranking(&self, json: bool) -> anyhow::Result<String> {
        let entries = ranking(self.repo.records(), &self.roster);
        if json {
            return Ok(serde_json::to_string_pretty(&entries)?);
        }
        let mut out = format!(
            "{:>3}  {:<14} {:>5} {:>7} {:>6} {:>5}\n",
            "#", "WORKER", "GATE", "WORSHIP", "SERMON", "TOTAL"
        );
        for (i, e) in entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}  {:<14} {:>5} {:>7} {:>6} {:>5}",
                i + 1,
                e.worker.as_str(),
                e.counts.gatekeeper,
                e.counts.worship,
                e.counts.sermon,
                e.total
            );
        }
        Ok(out.trim_end().to_string())
    }

    fn details(&self, worker: &WorkerId, role: Role) -> String {
        let found = assignments_for(self.repo.records(), worker, role);
        let mut out = format!("{worker} - {role}: {} services", found.len());
        for r in found {
            let _ = write!(out, "\n  {}  {}", r.service_date.format(DATE_FORMAT), r.service_day);
        }
        out
    }

    fn share_text(&self, target: &ShareTarget) -> anyhow::Result<String> {
        let org = &self.config.report.organization;
        if self.repo.is_empty() {
            bail!("no records to share");
        }
        let text = match target {
            ShareTarget::Record(id) => {
                let record = self
                    .repo
                    .get(id)
                    .with_context(|| format!("no record with id {id}"))?;
                render_record(record, org)
            }
            ShareTarget::Month(month) => {
                let (year, month) = parse_month(month)?;
                if !self.repo.months().contains(&(year, month)) {
                    bail!("no records in {year}-{month:02}");
                }
                render_month(self.repo.records(), year, month, org)
            }
            ShareTarget::Range(from, to) => {
                let records = self.repo.in_range(*from, *to);
                if records.is_empty() {
                    bail!("no records in that range");
                }
                let title = format!(
                    "{org} - {} TO {}",
                    records[0].service_date.format(DATE_FORMAT),
                    records[records.len() - 1].service_date.format(DATE_FORMAT)
                );
                render_range(&records, &title)
            }
            ShareTarget::History => render_history(self.repo.records(), org),
        };
        Ok(text)
    }

    async fn export(&self, dir: &Path, today: NaiveDate, share: bool) -> anyhow::Result<String> {
        let path = write_backup(dir, self.repo.records(), today)?;
        let mut out = format!("Exported {} records to {}", self.repo.len(), path.display());
        if share {
            match DesktopSharer::detect().share_file(&path).await {
                Ok(()) => info!(path = %path.display(), "backup shared"),
                Err(e @ ShareError::Unsupported) => {
                    warn!("{e}");
                    let _ = write!(out, "\n{e}");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(out)
    }
}

fn parse_month(input: &str) -> anyhow::Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .with_context(|| format!("expected YYYY-MM, got {input:?}"))?;
    Ok((first.year(), first.month()))
}

fn record_line(r: &Record) -> String {
    format!(
        "{} {:<3}  gate: {} | worship: {} | sermon: {} | {}",
        r.service_date.format(DATE_FORMAT),
        r.service_day.code(),
        r.gatekeeper,
        r.worship,
        r.sermon,
        r.scripture_text
    )
}

fn describe_day(date: NaiveDate) -> String {
    let resolution = resolve_default_day(date);
    let mut out = match resolution {
        DayResolution::Fixed(day) => format!("{date} is recorded as {day} ({})", day.label()),
        DayResolution::Ambiguous => format!("{date} is a Sunday: pick --day EBD or --day DOM"),
    };
    for day in resolution.choices() {
        let requirements = role_requirements(*day);
        let roles: Vec<String> = Role::ALL
            .iter()
            .map(|role| match requirements.get(*role) {
                Requirement::Required => role.to_string(),
                Requirement::Suppressed => format!("{role} (none held)"),
            })
            .collect();
        let _ = write!(out, "\n  {day}: {}", roles.join(", "));
    }
    out
}

fn format_rotation(tables: &[RotationTable]) -> String {
    let mut out = String::new();
    for table in tables {
        let _ = writeln!(out, "{} ({}) - {}", table.day, table.day.label(), table.role);
        for e in &table.entries {
            let last = e
                .last_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| "no records".to_string());
            let flag = match e.urgency {
                Urgency::Urgent => "  URGENT",
                Urgency::Normal => "",
            };
            let since = match e.days_since {
                DaysSince::Never => String::new(),
                days => format!(" ({days} ago)"),
            };
            let _ = writeln!(out, "  {:<14} {last}{since}{flag}", e.worker.as_str());
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_store::MemoryStore;

    fn app() -> App<MemoryStore> {
        App::new(RotaConfig::default(), MemoryStore::new())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn workers_resolve_case_insensitively() {
        let app = app();
        assert_eq!(app.resolve_worker("david").unwrap(), Assignment::worker("DAVID"));
        assert_eq!(app.resolve_worker(" luiz borges ").unwrap(), Assignment::worker("LUIZ BORGES"));
        assert_eq!(app.resolve_worker("none held").unwrap(), Assignment::NoneHeld);
        assert!(app.resolve_worker("NOBODY").is_err());
    }

    #[test]
    fn draft_from_arguments() {
        let app = app();
        let args = RecordArgs {
            day: Some(ServiceDay::SundayEvening),
            gatekeeper: Some("david".into()),
            worship: Some("etiel".into()),
            sermon: Some("manoel".into()),
            text: Some("Psalm 23".into()),
            ..Default::default()
        };
        let draft = app.build_draft(Draft::for_date(date(2026, 10, 25)), &args).unwrap();
        let fields = rota_rules::validate(&draft).unwrap();
        assert_eq!(fields.service_day, ServiceDay::SundayEvening);
        assert_eq!(fields.sermon, Assignment::worker("MANOEL"));
        assert_eq!(fields.scripture_text, "Psalm 23");
    }

    #[test]
    fn month_argument_parsing() {
        assert_eq!(parse_month("2026-10").unwrap(), (2026, 10));
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("October").is_err());
    }

    #[test]
    fn sunday_description_lists_both_tags() {
        let text = describe_day(date(2026, 10, 25));
        assert!(text.contains("pick --day EBD or --day DOM"));
        assert!(text.contains("\n  EBD: gatekeeper, worship, sermon"));

        let wednesday = describe_day(date(2026, 10, 21));
        assert!(wednesday.contains("worship (none held), sermon (none held)"));
    }

    #[test]
    fn rotation_filters_by_day() {
        let app = app();
        let now = date(2026, 10, 19).and_hms_opt(9, 0, 0).unwrap();
        let out = app.rotation(Some(ServiceDay::Wednesday), None, false, now).unwrap();
        assert!(out.starts_with("QUA"));
        assert_eq!(out.matches(" - ").count(), 1);
        assert!(!out.contains("TRANSMISSÃO"));
        assert!(out.contains("URGENT"));

        assert!(app
            .rotation(Some(ServiceDay::Wednesday), Some(Role::Worship), false, now)
            .is_err());
    }

    #[test]
    fn share_targets() {
        let mut app = app();
        assert!(app.share_text(&ShareTarget::History).is_err());

        let draft = Draft::for_date(date(2026, 10, 21))
            .with_role(Role::Gatekeeper, Some(Assignment::worker("DAVID")));
        let record = app.repo.create(&draft).unwrap();

        let text = app.share_text(&ShareTarget::Record(record.id.clone())).unwrap();
        assert!(text.contains("DAVID"));
        assert!(app.share_text(&ShareTarget::Record("missing".into())).is_err());

        let month = app.share_text(&ShareTarget::Month("2026-10".into())).unwrap();
        assert!(month.contains("OCTOBER / 2026"));
        assert!(app.share_text(&ShareTarget::Month("2030-01".into())).is_err());

        let range = app
            .share_text(&ShareTarget::Range(date(2026, 10, 1), date(2026, 10, 31)))
            .unwrap();
        assert!(range.contains("21/10/2026 TO 21/10/2026"));
        assert!(app
            .share_text(&ShareTarget::Range(date(2026, 11, 1), NaiveDate::MAX))
            .is_err());
    }

    #[tokio::test]
    async fn export_writes_backup_and_reports_sharing_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let app = app();
        let out = app.export(dir.path(), date(2026, 10, 19), true).await.unwrap();
        assert!(dir.path().join("rota_backup_2026-10-19.json").exists());
        assert!(out.contains("not supported"));
    }
}
