use crate::config::RosterConfig;
use crate::types::{WorkerId, LEGACY_NONE_HELD, NONE_HELD};

/// The people who can be assigned, in display order.
///
/// Reserved identifiers (broadcast operator, visiting guest) may appear in
/// records but never take part in rotation or ranking.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    workers: Vec<WorkerId>,
    reserved: Vec<WorkerId>,
}

impl Roster {
    pub fn new(workers: Vec<WorkerId>, reserved: Vec<WorkerId>) -> Self {
        Self { workers, reserved }
    }

    pub fn from_config(config: &RosterConfig) -> Self {
        Self::new(
            config.workers.iter().map(|w| WorkerId::new(w.as_str())).collect(),
            config.reserved.iter().map(|w| WorkerId::new(w.as_str())).collect(),
        )
    }

    /// Every configured identifier, reserved ones included.
    pub fn all(&self) -> &[WorkerId] {
        &self.workers
    }

    pub fn is_reserved(&self, worker: &WorkerId) -> bool {
        worker.as_str() == NONE_HELD
            || worker.as_str() == LEGACY_NONE_HELD
            || self.reserved.contains(worker)
    }

    /// Workers that rotate, in roster order.
    pub fn eligible(&self) -> impl Iterator<Item = &WorkerId> + '_ {
        self.workers.iter().filter(|w| !self.is_reserved(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_skips_reserved_and_sentinel() {
        let roster = Roster::new(
            vec!["ANA".into(), "TRANSMISSÃO".into(), "NÃO HOUVE".into(), "BIA".into()],
            vec!["TRANSMISSÃO".into()],
        );
        let eligible: Vec<&str> = roster.eligible().map(|w| w.as_str()).collect();
        assert_eq!(eligible, vec!["ANA", "BIA"]);
    }

    #[test]
    fn default_config_roster_has_eleven_rotating_workers() {
        let roster = Roster::from_config(&RosterConfig::default());
        assert_eq!(roster.all().len(), 13);
        assert_eq!(roster.eligible().count(), 11);
        assert!(roster.is_reserved(&WorkerId::from("VISITANTE")));
    }
}
