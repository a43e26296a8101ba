use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{Event, EventKey, Participant};

/// One recorded drop: a participant leaving an event before (or at)
/// completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropRecord {
    pub roster_number: u32,
    pub participant_name: String,
    pub event: EventKey,
    /// Time elapsed into the event when the participant dropped.
    pub drop_time: Duration,
}

/// Append-only audit trail of participant drops.
///
/// Records are never removed or edited once written. The ledger does not
/// touch any `DifficultyScore`; callers recompute scores after recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropLedger {
    records: Vec<DropRecord>,
}

impl DropLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a drop. Rejects a second drop for the same participant in
    /// the same event.
    pub fn record_drop(
        &mut self,
        participant: &Participant,
        event: &Event,
        drop_time: Duration,
    ) -> Result<&DropRecord> {
        let key = event.key();
        if self
            .records
            .iter()
            .any(|r| r.roster_number == participant.roster_number && r.event == key)
        {
            return Err(EngineError::DuplicateDrop {
                roster_number: participant.roster_number,
                event: event.name.clone(),
            });
        }
        self.records.push(DropRecord {
            roster_number: participant.roster_number,
            participant_name: participant.name.clone(),
            event: key,
            drop_time,
        });
        Ok(self.records.last().unwrap())
    }

    /// Drops recorded for one event, ordered by drop time ascending
    /// (roster number breaks ties). Restartable: each call walks the
    /// ledger afresh.
    pub fn drops_for_event(&self, event: &EventKey) -> impl Iterator<Item = &DropRecord> {
        let mut hits: Vec<&DropRecord> = self.records.iter().filter(|r| &r.event == event).collect();
        hits.sort_by(|a, b| {
            a.drop_time
                .cmp(&b.drop_time)
                .then(a.roster_number.cmp(&b.roster_number))
        });
        hits.into_iter()
    }

    /// Drops recorded for one participant across all events, ordered by
    /// drop time ascending.
    pub fn drops_for_participant(&self, roster_number: u32) -> impl Iterator<Item = &DropRecord> {
        let mut hits: Vec<&DropRecord> = self
            .records
            .iter()
            .filter(|r| r.roster_number == roster_number)
            .collect();
        hits.sort_by_key(|r| r.drop_time);
        hits.into_iter()
    }

    pub fn has_drop(&self, roster_number: u32, event: &EventKey) -> bool {
        self.records
            .iter()
            .any(|r| r.roster_number == roster_number && &r.event == event)
    }

    /// Full log in append order.
    pub fn records(&self) -> &[DropRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateType, Equipment, EquipmentSlot};

    fn participant(n: u32) -> Participant {
        Participant {
            roster_number: n,
            name: format!("Candidate {}", n),
            candidate_type: CandidateType::Ade,
        }
    }

    fn event() -> Event {
        Event {
            name: "SAND BABIES".to_string(),
            day: 2,
            event_number: 1,
            equipment: vec![EquipmentSlot {
                equipment: Equipment {
                    name: "SAND BAG".to_string(),
                    weight: 50.0,
                },
                count: 25,
            }],
            time_limit: Duration::from_secs(120 * 60),
            initial_participants: 18,
            distance_km: 4.0,
            heat_category: 2,
        }
    }

    #[test]
    fn record_appends_exactly_one() {
        let mut ledger = DropLedger::new();
        let event = event();
        ledger
            .record_drop(&participant(1001), &event, Duration::from_secs(600))
            .unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn duplicate_drop_rejected() {
        let mut ledger = DropLedger::new();
        let event = event();
        let p = participant(1001);
        ledger.record_drop(&p, &event, Duration::from_secs(600)).unwrap();
        let err = ledger
            .record_drop(&p, &event, Duration::from_secs(900))
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateDrop { roster_number: 1001, .. }));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.has_drop(1001, &event.key()));
        assert!(!ledger.has_drop(1002, &event.key()));
    }

    #[test]
    fn drops_for_event_ordered_by_time() {
        let mut ledger = DropLedger::new();
        let event = event();
        ledger
            .record_drop(&participant(1003), &event, Duration::from_secs(900))
            .unwrap();
        ledger
            .record_drop(&participant(1001), &event, Duration::from_secs(300))
            .unwrap();
        ledger
            .record_drop(&participant(1002), &event, Duration::from_secs(600))
            .unwrap();

        let times: Vec<u64> = ledger
            .drops_for_event(&event.key())
            .map(|r| r.drop_time.as_secs())
            .collect();
        assert_eq!(times, vec![300, 600, 900]);

        // Restartable: a second pass yields the same sequence.
        let again: Vec<u64> = ledger
            .drops_for_event(&event.key())
            .map(|r| r.drop_time.as_secs())
            .collect();
        assert_eq!(again, times);
    }

    #[test]
    fn drops_for_participant_spans_events() {
        let mut ledger = DropLedger::new();
        let mut day3 = event();
        day3.day = 3;
        ledger
            .record_drop(&participant(1001), &event(), Duration::from_secs(600))
            .unwrap();
        ledger
            .record_drop(&participant(1001), &day3, Duration::from_secs(200))
            .unwrap();
        assert_eq!(ledger.drops_for_participant(1001).count(), 2);
        assert_eq!(ledger.drops_for_participant(1002).count(), 0);
    }
}
