use crate::{
    animal::Animal,
    config::GameConfig,
    dice::Outcome,
    notice::Notice,
    table::{
        Ack,
        Phase,
        Table,
        Variant,
    },
    timers::{
        Scheduled,
        TimerKind,
    },
};
use rand::{
    SeedableRng,
    rngs::StdRng,
};

pub const TEST_SEED: u64 = 0x00ba_0c0a;

/// A table on a seeded rng plus a manual clock: scheduled timers pile up in
/// `pending` until a test fires them.
pub struct TestContext {
    pub table: Table<StdRng>,
    pending: Vec<Scheduled>,
    notices: Vec<Notice>,
}

impl TestContext {
    pub fn new(variant: Variant) -> Self {
        Self::new_with_config(variant, GameConfig::default(), TEST_SEED)
    }

    pub fn wager() -> Self {
        Self::new(Variant::Wager)
    }

    pub fn free() -> Self {
        Self::new(Variant::Free)
    }

    pub fn new_with_config(variant: Variant, config: GameConfig, seed: u64) -> Self {
        Self {
            table: Table::new(variant, config, StdRng::seed_from_u64(seed)),
            pending: Vec::new(),
            notices: Vec::new(),
        }
    }

    fn collect(&mut self) {
        self.pending.extend(self.table.drain_scheduled());
        self.notices.extend(self.table.drain_notices());
    }

    /// Timers handed out so far and not yet fired.
    pub fn pending(&mut self) -> Vec<Scheduled> {
        self.collect();
        self.pending.clone()
    }

    /// Fires the oldest pending timer of `kind`, stale or not.
    pub fn fire(&mut self, kind: TimerKind) -> Option<Ack> {
        self.collect();
        let idx = self.pending.iter().position(|s| s.kind == kind)?;
        let scheduled = self.pending.remove(idx);
        let ack = self.table.fire(scheduled);
        self.collect();
        Some(ack)
    }

    /// Fires every pending timer of `kind` in scheduling order.
    pub fn fire_all(&mut self, kind: TimerKind) -> Vec<Ack> {
        let mut acks = Vec::new();
        while let Some(ack) = self.fire(kind) {
            acks.push(ack);
        }
        acks
    }

    pub fn notices(&mut self) -> Vec<Notice> {
        self.collect();
        self.notices.clone()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.collect();
        std::mem::take(&mut self.notices)
    }

    pub fn tap_zones(&mut self, zones: &[u8]) {
        for zone in zones {
            let _ = self.table.tap_zone(*zone);
        }
        self.collect();
    }

    pub fn tap_cards(&mut self, positions: &[u8]) {
        for position in positions {
            let _ = self.table.tap_card(*position);
        }
        self.collect();
    }

    pub fn bet(&mut self, animal: Animal, times: usize) {
        for _ in 0..times {
            let _ = self
                .table
                .place_bet(animal)
                .unwrap_or_else(|e| panic!("bet on {animal} rejected: {e}"));
        }
        self.collect();
    }

    /// Rolls and lets the rolling animation elapse.
    pub fn roll_and_settle(&mut self) -> Phase {
        let _ = self
            .table
            .roll()
            .unwrap_or_else(|e| panic!("roll rejected: {e}"));
        self.fire(TimerKind::RollSettle);
        self.table.phase()
    }

    /// Rolls, settles and waits out the result window; returns the outcome.
    pub fn play_round(&mut self) -> Outcome {
        self.roll_and_settle();
        let outcome = self.table.faces();
        self.fire_all(TimerKind::ResultExpiry);
        outcome
    }
}
