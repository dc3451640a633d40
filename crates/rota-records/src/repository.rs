use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Utc};
use rota_core::{Record, Role};
use rota_rules::{validate, Draft};
use rota_store::RecordStore;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{RecordError, Result};

/// In-memory record collection with write-through persistence.
///
/// The collection is kept newest-first (new records are prepended) and
/// that order is what gets saved, exported and restored.
pub struct RecordRepository<S: RecordStore> {
    store: S,
    records: Vec<Record>,
}

impl<S: RecordStore> RecordRepository<S> {
    /// Load the collection from `store`.
    pub fn open(store: S) -> Self {
        let records = store.load();
        info!(count = records.len(), "record collection opened");
        Self { store, records }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Validate `draft` and add it as a new record.
    ///
    /// Nothing is added when validation fails.
    #[instrument(skip(self, draft))]
    pub fn create(&mut self, draft: &Draft) -> Result<Record> {
        let fields = validate(draft)?;
        let record = Record::new(Uuid::new_v4().to_string(), self.next_created_at(), fields);

        self.records.insert(0, record.clone());
        info!(record_id = %record.id, day = %record.service_day, date = %record.service_date, "record created");
        self.persist()?;
        Ok(record)
    }

    /// Replace the editable fields of record `id`.
    #[instrument(skip(self, draft))]
    pub fn update(&mut self, id: &str, draft: &Draft) -> Result<Record> {
        let index = self.index_of(id)?;
        let fields = validate(draft)?;

        let record = &mut self.records[index];
        record.apply(fields);
        let updated = record.clone();
        info!(record_id = %id, "record updated");
        self.persist()?;
        Ok(updated)
    }

    /// Remove record `id`. Confirmation is the caller's business.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> Result<Record> {
        let index = self.index_of(id)?;
        let removed = self.records.remove(index);
        info!(record_id = %id, "record deleted");
        self.persist()?;
        Ok(removed)
    }

    /// Swap in a whole collection, as a restore does. No validation.
    #[instrument(skip_all, fields(count = records.len()))]
    pub fn replace_all(&mut self, records: Vec<Record>) -> Result<()> {
        self.records = records;
        info!("record collection replaced");
        self.persist()
    }

    /// Delete every record. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let removed = self.records.len();
        self.records.clear();
        warn!(removed, "record collection cleared");
        self.persist()?;
        Ok(removed)
    }

    /// Records matching `predicate`, in collection order.
    pub fn query<P>(&self, predicate: P) -> Vec<&Record>
    where
        P: Fn(&Record) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// Case-insensitive search over worker names and scripture text,
    /// newest-created first. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Record> {
        let needle = term.trim().to_lowercase();
        let mut found = self.query(|r| {
            needle.is_empty()
                || Role::ALL.iter().any(|role| {
                    r.assignment(*role)
                        .worker_id()
                        .is_some_and(|w| w.as_str().to_lowercase().contains(&needle))
                })
                || r.scripture_text.to_lowercase().contains(&needle)
        });
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(term, hits = found.len(), "search");
        found
    }

    /// Distinct (year, month) pairs with at least one service, newest first.
    pub fn months(&self) -> Vec<(i32, u32)> {
        let months: BTreeSet<(i32, u32)> = self
            .records
            .iter()
            .map(|r| (r.service_date.year(), r.service_date.month()))
            .collect();
        months.into_iter().rev().collect()
    }

    /// Records dated within `from..=to`, oldest first.
    pub fn in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Record> {
        let mut found = self.query(|r| r.service_date >= from && r.service_date <= to);
        found.sort_by(|a, b| {
            a.service_date
                .cmp(&b.service_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        found
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RecordError::NotFound { id: id.to_string() })
    }

    /// Wall-clock milliseconds, bumped so creation stamps never repeat.
    fn next_created_at(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let newest = self.records.iter().map(|r| r.created_at).max();
        match newest {
            Some(latest) if latest >= now => latest.saturating_add(1),
            _ => now,
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.records)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_core::{Assignment, ServiceDay};
    use rota_store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tuesday(gatekeeper: &str, text: &str) -> Draft {
        Draft::for_date(date(2026, 10, 20))
            .with_role(Role::Gatekeeper, Some(Assignment::worker(gatekeeper)))
            .with_role(Role::Worship, Some(Assignment::worker("ETIEL")))
            .with_role(Role::Sermon, Some(Assignment::worker("ROBERTO")))
            .with_scripture(text)
    }

    #[test]
    fn create_prepends_and_persists() {
        let mut repo = RecordRepository::open(MemoryStore::new());
        let first = repo.create(&tuesday("DAVID", "Psalm 1")).unwrap();
        let second = repo.create(&tuesday("MANOEL", "Psalm 2")).unwrap();

        assert_eq!(repo.records()[0].id, second.id);
        assert_eq!(repo.records()[1].id, first.id);
        assert!(second.created_at > first.created_at);
        assert_eq!(repo.store().save_count(), 2);

        let reopened = RecordRepository::open(MemoryStore::with_payload(repo.store().raw().unwrap()));
        assert_eq!(reopened.records(), repo.records());
    }

    #[test]
    fn create_after_restoring_maximal_stamp() {
        let mut repo = RecordRepository::open(MemoryStore::new());
        let mut restored = repo.create(&tuesday("DAVID", "")).unwrap();
        restored.created_at = i64::MAX;
        repo.replace_all(vec![restored]).unwrap();

        let created = repo.create(&tuesday("MANOEL", "")).unwrap();
        assert_eq!(created.created_at, i64::MAX);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn update_preserves_identity() {
        let mut repo = RecordRepository::open(MemoryStore::new());
        let created = repo.create(&tuesday("DAVID", "")).unwrap();

        let edited = Draft::from_record(&created)
            .with_role(Role::Gatekeeper, Some(Assignment::worker("VALDEMIRO")));
        let updated = repo.update(&created.id, &edited).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.gatekeeper, Assignment::worker("VALDEMIRO"));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn update_and_delete_unknown_id() {
        let mut repo = RecordRepository::open(MemoryStore::new());
        assert!(matches!(
            repo.update("missing", &tuesday("DAVID", "")),
            Err(RecordError::NotFound { .. })
        ));
        assert!(matches!(repo.delete("missing"), Err(RecordError::NotFound { .. })));
        assert_eq!(repo.store().save_count(), 0);
    }

    #[test]
    fn failed_update_leaves_record_alone() {
        let mut repo = RecordRepository::open(MemoryStore::new());
        let created = repo.create(&tuesday("DAVID", "")).unwrap();
        let broken = Draft::from_record(&created).with_role(Role::Worship, None);

        assert!(matches!(repo.update(&created.id, &broken), Err(RecordError::Validation(_))));
        assert_eq!(repo.get(&created.id), Some(&created));
    }

    #[test]
    fn delete_removes_only_target() {
        let mut repo = RecordRepository::open(MemoryStore::new());
        let a = repo.create(&tuesday("DAVID", "")).unwrap();
        let b = repo.create(&tuesday("MANOEL", "")).unwrap();

        let removed = repo.delete(&a.id).unwrap();
        assert_eq!(removed.id, a.id);
        assert_eq!(repo.records().len(), 1);
        assert_eq!(repo.records()[0].id, b.id);
    }

    #[test]
    fn search_is_case_insensitive_and_newest_first() {
        let mut repo = RecordRepository::open(MemoryStore::new());
        let a = repo.create(&tuesday("DAVID", "Genesis 1")).unwrap();
        let b = repo.create(&tuesday("MANOEL", "Exodus 3")).unwrap();

        let hits: Vec<&str> = repo.search("david").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(hits, vec![a.id.as_str()]);

        let hits: Vec<&str> = repo.search("EXODUS").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(hits, vec![b.id.as_str()]);

        let all: Vec<&str> = repo.search("  ").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(all, vec![b.id.as_str(), a.id.as_str()]);
    }

    #[test]
    fn search_ignores_none_held_sentinel() {
        let mut repo = RecordRepository::open(MemoryStore::new());
        let wednesday = Draft::for_date(date(2026, 10, 21))
            .with_role(Role::Gatekeeper, Some(Assignment::worker("DAVID")));
        repo.create(&wednesday).unwrap();
        assert!(repo.search("none held").is_empty());
    }

    #[test]
    fn months_and_ranges() {
        let mut repo = RecordRepository::open(MemoryStore::new());
        let october = repo.create(&tuesday("DAVID", "")).unwrap();
        let september = Draft::for_date(date(2026, 9, 27))
            .with_role(Role::Gatekeeper, Some(Assignment::worker("DAVID")))
            .with_role(Role::Worship, Some(Assignment::worker("ETIEL")))
            .with_role(Role::Sermon, Some(Assignment::worker("ROBERTO")));
        let september = rota_rules::apply_day_change(september, Some(ServiceDay::SundayEvening));
        let september = repo.create(&september).unwrap();

        assert_eq!(repo.months(), vec![(2026, 10), (2026, 9)]);

        let range = repo.in_range(date(2026, 9, 1), date(2026, 10, 31));
        assert_eq!(range[0].id, september.id);
        assert_eq!(range[1].id, october.id);
        assert!(repo.in_range(date(2026, 11, 1), date(2026, 11, 30)).is_empty());
    }

    #[test]
    fn clear_empties_collection() {
        let mut repo = RecordRepository::open(MemoryStore::new());
        repo.create(&tuesday("DAVID", "")).unwrap();
        repo.create(&tuesday("MANOEL", "")).unwrap();
        assert_eq!(repo.clear().unwrap(), 2);
        assert!(repo.is_empty());
        assert_eq!(repo.store().raw().as_deref(), Some("[]"));
    }
}
