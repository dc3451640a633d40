use chrono::NaiveDate;
use rota_analytics::{ranking, rotation_for, DaysSince, Urgency};
use rota_core::{Assignment, Role, Roster, ServiceDay, WorkerId};
use rota_records::RecordRepository;
use rota_rules::{apply_day_change, Draft};
use rota_store::MemoryStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn never_served_ranks_before_long_idle() {
    let roster = Roster::new(vec![WorkerId::new("ALICE"), WorkerId::new("BRUNO")], vec![]);
    let mut repo = RecordRepository::open(MemoryStore::new());

    // 2026-09-27 is a Sunday, 30 days before Tuesday 2026-10-27.
    let evening = apply_day_change(Draft::for_date(date(2026, 9, 27)), Some(ServiceDay::SundayEvening))
        .with_role(Role::Gatekeeper, Some(Assignment::worker("ALICE")))
        .with_role(Role::Worship, Some(Assignment::worker("CARLOS")))
        .with_role(Role::Sermon, Some(Assignment::worker("CARLOS")));
    repo.create(&evening).unwrap();

    let now = date(2026, 10, 27).and_hms_opt(19, 30, 0).unwrap();
    let entries = rotation_for(repo.records(), &roster, ServiceDay::SundayEvening, Role::Gatekeeper, now);

    assert_eq!(entries[0].worker.as_str(), "BRUNO");
    assert_eq!(entries[0].days_since, DaysSince::Never);
    assert_eq!(entries[0].last_date, None);

    assert_eq!(entries[1].worker.as_str(), "ALICE");
    assert_eq!(entries[1].days_since, DaysSince::Days(30));
    assert_eq!(entries[1].last_date, Some(date(2026, 9, 27)));

    assert!(entries.iter().all(|e| e.urgency == Urgency::Urgent));
}

#[test]
fn other_day_tags_do_not_count() {
    let roster = Roster::new(vec![WorkerId::new("ALICE")], vec![]);
    let mut repo = RecordRepository::open(MemoryStore::new());
    let study = apply_day_change(Draft::for_date(date(2026, 10, 25)), Some(ServiceDay::SundayStudy))
        .with_role(Role::Gatekeeper, Some(Assignment::worker("ALICE")))
        .with_role(Role::Worship, Some(Assignment::worker("ALICE")))
        .with_role(Role::Sermon, Some(Assignment::worker("ALICE")));
    repo.create(&study).unwrap();

    let now = date(2026, 10, 26).and_hms_opt(8, 0, 0).unwrap();
    let evening = rotation_for(repo.records(), &roster, ServiceDay::SundayEvening, Role::Gatekeeper, now);
    assert_eq!(evening[0].days_since, DaysSince::Never);

    let morning = rotation_for(repo.records(), &roster, ServiceDay::SundayStudy, Role::Gatekeeper, now);
    assert_eq!(morning[0].days_since, DaysSince::Days(1));
    assert_eq!(morning[0].urgency, Urgency::Normal);

    assert_eq!(ranking(repo.records(), &roster)[0].total, 3);
}
