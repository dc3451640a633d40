use std::collections::HashMap;

use rota_core::{Record, Role, Roster, WorkerId};
use serde::Serialize;

/// How often a worker held each role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivityCounts {
    pub gatekeeper: u32,
    pub worship: u32,
    pub sermon: u32,
}

impl ActivityCounts {
    fn bump(&mut self, role: Role) {
        match role {
            Role::Gatekeeper => self.gatekeeper += 1,
            Role::Worship => self.worship += 1,
            Role::Sermon => self.sermon += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.gatekeeper + self.worship + self.sermon
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub worker: WorkerId,
    pub counts: ActivityCounts,
    pub total: u32,
}

/// Per-worker role counts. "None held" is never counted.
pub fn activity_counts(records: &[Record]) -> HashMap<WorkerId, ActivityCounts> {
    let mut counts: HashMap<WorkerId, ActivityCounts> = HashMap::new();
    for record in records {
        for role in Role::ALL {
            if let Some(worker) = record.assignment(role).worker_id() {
                counts.entry(worker.clone()).or_default().bump(role);
            }
        }
    }
    counts
}

/// Eligible roster workers by total activity, busiest first.
///
/// Workers without records appear with zero counts; ties keep roster order.
pub fn ranking(records: &[Record], roster: &Roster) -> Vec<RankingEntry> {
    let counts = activity_counts(records);
    let mut entries: Vec<RankingEntry> = roster
        .eligible()
        .map(|worker| {
            let c = counts.get(worker).copied().unwrap_or_default();
            RankingEntry {
                worker: worker.clone(),
                counts: c,
                total: c.total(),
            }
        })
        .collect();
    entries.sort_by(|a, b| b.total.cmp(&a.total));
    entries
}

/// Records where `worker` held `role`, latest service first.
pub fn assignments_for<'a>(records: &'a [Record], worker: &WorkerId, role: Role) -> Vec<&'a Record> {
    let mut found: Vec<&Record> = records.iter().filter(|r| r.is_held_by(role, worker)).collect();
    found.sort_by(|a, b| {
        b.service_date
            .cmp(&a.service_date)
            .then(b.created_at.cmp(&a.created_at))
    });
    found
}
