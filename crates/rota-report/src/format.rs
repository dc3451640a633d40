use std::fmt::Write;

use chrono::{Datelike, Month};
use rota_core::{Assignment, Record, Role};
use rota_rules::{day_rule, role_requirements};

/// Date layout used in every rendered text.
const DATE_FORMAT: &str = "%d/%m/%Y";

fn role_icon(role: Role) -> &'static str {
    match role {
        Role::Gatekeeper => "🚪",
        Role::Worship => "🎤",
        Role::Sermon => "📖",
    }
}

fn role_title(role: Role) -> &'static str {
    match role {
        Role::Gatekeeper => "Gatekeeper",
        Role::Worship => "Worship",
        Role::Sermon => "Sermon",
    }
}

/// Roles worth printing: not suppressed by the day and not "none held".
fn printed_roles(record: &Record) -> impl Iterator<Item = (Role, &Assignment)> + '_ {
    let requirements = role_requirements(record.service_day);
    Role::ALL
        .into_iter()
        .filter(move |role| !requirements.is_suppressed(*role))
        .map(move |role| (role, record.assignment(role)))
        .filter(|(_, a)| !a.is_none_held())
}

/// Closing line: the women's-group notice on days with forced text,
/// otherwise the scripture.
fn closing_line(record: &Record, bold: bool) -> String {
    match day_rule(record.service_day).forced_scripture {
        Some(text) if bold => format!("*🌸 {}*", text.to_uppercase()),
        Some(text) => format!("🌸 {}", text.to_uppercase()),
        None if bold => format!("📜 *Text:* {}", record.scripture_text),
        None => format!("📜 {}", record.scripture_text),
    }
}

/// Share block for a single record.
pub fn render_record(record: &Record, organization: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "*REPORT {organization} - {}*", record.service_day);
    let _ = writeln!(out, "📅 *Date:* {}", record.service_date.format(DATE_FORMAT));
    for (role, assignment) in printed_roles(record) {
        let _ = writeln!(out, "{} *{}:* {assignment}", role_icon(role), role_title(role));
    }
    out.push_str(&closing_line(record, true));
    out
}

/// One compact block: heading, a single roles line, closing line.
fn compact_block(out: &mut String, heading: &str, record: &Record) {
    let roles: Vec<String> = printed_roles(record)
        .map(|(role, a)| format!("{} {a}", role_icon(role)))
        .collect();
    let _ = writeln!(out, "📅 *{heading} ({}):*", record.service_day);
    let _ = writeln!(out, "{}", roles.join(" | "));
    let _ = writeln!(out, "{}", closing_line(record, false));
    out.push('\n');
}

/// Records in the given order under a bold title.
pub fn render_range(records: &[&Record], title: &str) -> String {
    let mut out = format!("*{title}*\n\n");
    for record in records {
        let heading = record.service_date.format(DATE_FORMAT).to_string();
        compact_block(&mut out, &heading, record);
    }
    out.trim_end().to_string()
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_uppercase())
        .unwrap_or_else(|| month.to_string())
}

/// Summary of one calendar month, oldest service first.
pub fn render_month(records: &[Record], year: i32, month: u32, organization: &str) -> String {
    let mut selected: Vec<&Record> = records
        .iter()
        .filter(|r| r.service_date.year() == year && r.service_date.month() == month)
        .collect();
    selected.sort_by(|a, b| {
        a.service_date
            .cmp(&b.service_date)
            .then(a.created_at.cmp(&b.created_at))
    });

    let mut out = format!("*{organization} - {} / {year}*\n\n", month_name(month));
    for record in selected {
        let heading = format!("Day {:02}", record.service_date.day());
        compact_block(&mut out, &heading, record);
    }
    out.trim_end().to_string()
}

/// Every record, most recently created first.
pub fn render_history(records: &[Record], organization: &str) -> String {
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    render_range(&sorted, &format!("FULL HISTORY - {organization}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rota_core::{RecordFields, ServiceDay};
    use rota_rules::WOMENS_GROUP_TEXT;

    fn record(id: &str, date: (i32, u32, u32), day: ServiceDay, created_at: i64) -> Record {
        let wednesday = day == ServiceDay::Wednesday;
        let held = |name: &str| {
            if wednesday {
                Assignment::NoneHeld
            } else {
                Assignment::worker(name)
            }
        };
        Record::new(
            id,
            created_at,
            RecordFields {
                service_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
                service_day: day,
                gatekeeper: Assignment::worker("DAVID"),
                worship: held("ETIEL"),
                sermon: if day == ServiceDay::Monday {
                    Assignment::NoneHeld
                } else {
                    held("ROBERTO")
                },
                scripture_text: if wednesday {
                    WOMENS_GROUP_TEXT.into()
                } else {
                    "John 3:16".into()
                },
            },
        )
    }

    #[test]
    fn full_record_block() {
        let text = render_record(&record("a", (2026, 10, 20), ServiceDay::Tuesday, 1), "ICM");
        assert_eq!(
            text,
            "*REPORT ICM - TER*\n\
             📅 *Date:* 20/10/2026\n\
             🚪 *Gatekeeper:* DAVID\n\
             🎤 *Worship:* ETIEL\n\
             📖 *Sermon:* ROBERTO\n\
             📜 *Text:* John 3:16"
        );
    }

    #[test]
    fn suppressed_roles_are_omitted() {
        let monday = render_record(&record("m", (2026, 10, 19), ServiceDay::Monday, 1), "ICM");
        assert!(monday.contains("Worship"));
        assert!(!monday.contains("Sermon"));
        assert!(!monday.contains(rota_core::NONE_HELD));

        let wednesday = render_record(&record("w", (2026, 10, 21), ServiceDay::Wednesday, 1), "ICM");
        assert!(!wednesday.contains("Worship"));
        assert!(!wednesday.contains("Text:"));
        assert!(wednesday.ends_with("*🌸 DIRECTED BY WOMEN'S GROUP*"));
    }

    #[test]
    fn month_is_filtered_and_ascending() {
        let records = vec![
            record("late", (2026, 10, 22), ServiceDay::Thursday, 1),
            record("other", (2026, 9, 30), ServiceDay::Wednesday, 2),
            record("early", (2026, 10, 19), ServiceDay::Monday, 3),
        ];
        let text = render_month(&records, 2026, 10, "ICM");
        assert!(text.starts_with("*ICM - OCTOBER / 2026*\n\n"));
        let early = text.find("Day 19 (SEG)").unwrap();
        let late = text.find("Day 22 (QUI)").unwrap();
        assert!(early < late);
        assert!(!text.contains("Day 30"));
        assert!(text.contains("🚪 DAVID | 🎤 ETIEL\n"));
    }

    #[test]
    fn history_is_newest_created_first() {
        let records = vec![
            record("first", (2026, 10, 22), ServiceDay::Thursday, 10),
            record("second", (2026, 10, 19), ServiceDay::Monday, 20),
        ];
        let text = render_history(&records, "ICM");
        assert!(text.starts_with("*FULL HISTORY - ICM*"));
        assert!(text.find("19/10/2026").unwrap() < text.find("22/10/2026").unwrap());
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn bad_month_number_falls_back() {
        assert_eq!(month_name(13), "13");
        assert_eq!(month_name(1), "JANUARY");
    }
}
