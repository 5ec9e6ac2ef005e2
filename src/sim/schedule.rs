//! Deferred session events keyed to the simulation clock
//!
//! Wave transitions fire a fixed delay after the clear. The queue only
//! advances with the simulation clock, so pausing freezes it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledEvent {
    /// Spawn the formation for the current wave number
    SpawnWave,
    /// Hide the "wave complete" banner
    ClearWaveBanner,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// (due time, insertion order, event)
    entries: Vec<(f64, u64, ScheduledEvent)>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: f64, event: ScheduledEvent) {
        self.entries.push((at, self.next_seq, event));
        self.next_seq += 1;
    }

    /// Remove and return every event due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: f64) -> Vec<ScheduledEvent> {
        let mut due: Vec<_> = Vec::new();
        self.entries.retain(|&entry| {
            if entry.0 <= now {
                due.push(entry);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, event)| event).collect()
    }

    /// Drop every pending occurrence of `event`
    pub fn cancel(&mut self, event: ScheduledEvent) {
        self.entries.retain(|&(_, _, e)| e != event);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, event: ScheduledEvent) -> bool {
        self.entries.iter().any(|&(_, _, e)| e == event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
