//! Round controller for a single Bầu Cua table.
//!
//! A [`Table`] owns every piece of per-session state and moves through
//! `Betting -> Rolling -> (WaitingForTap) -> Result -> Betting`. It never
//! sleeps: phase changes that happen "later" are handed out as [`Scheduled`]
//! records through [`Table::drain_scheduled`] and come back via
//! [`Table::fire`]. Player-facing messages are queued as [`Notice`]s.

use crate::{
    animal::Animal,
    bets::BetLedger,
    config::GameConfig,
    dice::{
        self,
        DICE,
        Draw,
        INITIAL_FACES,
        Outcome,
    },
    notice::Notice,
    secret::{
        FAVOR_PATTERN,
        OVERRIDE_PATTERN,
        TapDetector,
        TapProgress,
    },
    timers::{
        Scheduled,
        TimerKind,
        Timers,
    },
};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{
    debug,
    info,
    warn,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Variant {
    /// Coin economy with the single-round favor mode.
    Wager,
    /// No coins; hides the outcome override.
    Free,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    Betting,
    Rolling,
    WaitingForTap,
    Result,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Die {
    pub face: Animal,
    pub animating: bool,
}

/// Outcome of a command that was not rejected.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Ack {
    Applied,
    Ignored,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("bet of {requested} exceeds balance of {available}")]
    InsufficientBalance { requested: u64, available: u64 },
    #[error("no bet placed")]
    NoBetPlaced,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundRecord {
    pub round: u64,
    pub outcome: Outcome,
    /// Total returned to the balance; `None` on the free table.
    pub payout: Option<u64>,
    pub forced: bool,
}

pub struct Table<R> {
    variant: Variant,
    config: GameConfig,
    rng: R,
    phase: Phase,
    dice: [Die; DICE],
    ledger: BetLedger,
    balance: u64,
    winners: Vec<Animal>,
    favor: bool,
    favor_this_round: bool,
    override_armed: bool,
    detector: TapDetector,
    timers: Timers,
    notices: Vec<Notice>,
    history: VecDeque<RoundRecord>,
    round: u64,
}

impl<R: Rng> Table<R> {
    pub fn new(variant: Variant, config: GameConfig, rng: R) -> Self {
        let pattern: &'static [u8] = match variant {
            Variant::Wager => &FAVOR_PATTERN,
            Variant::Free => &OVERRIDE_PATTERN,
        };
        let balance = config.starting_balance;
        Table {
            variant,
            config,
            rng,
            phase: Phase::Betting,
            dice: INITIAL_FACES.map(|face| Die {
                face,
                animating: false,
            }),
            ledger: BetLedger::new(),
            balance,
            winners: Vec::new(),
            favor: false,
            favor_this_round: false,
            override_armed: false,
            detector: TapDetector::new(pattern),
            timers: Timers::new(),
            notices: Vec::new(),
            history: VecDeque::new(),
            round: 0,
        }
    }

    /// Wagers one configured bet step on `animal`.
    pub fn place_bet(&mut self, animal: Animal) -> Result<Ack, Rejection> {
        let step = self.config.bet_step;
        self.place_bet_amount(animal, step)
    }

    pub fn place_bet_amount(
        &mut self,
        animal: Animal,
        amount: u64,
    ) -> Result<Ack, Rejection> {
        if self.variant != Variant::Wager || self.phase != Phase::Betting || amount == 0
        {
            debug!(?animal, amount, phase = ?self.phase, "bet ignored");
            return Ok(Ack::Ignored);
        }
        if amount > self.balance {
            warn!(?animal, amount, balance = self.balance, "bet exceeds balance");
            self.notices.push(Notice::InsufficientBalance);
            return Err(Rejection::InsufficientBalance {
                requested: amount,
                available: self.balance,
            });
        }
        self.ledger.add(animal, amount);
        self.balance -= amount;
        debug!(?animal, amount, balance = self.balance, "bet placed");
        Ok(Ack::Applied)
    }

    pub fn roll(&mut self) -> Result<Ack, Rejection> {
        if self.phase != Phase::Betting {
            debug!(phase = ?self.phase, "roll ignored");
            return Ok(Ack::Ignored);
        }
        if self.variant == Variant::Wager && self.ledger.is_empty() {
            warn!("roll requested without any bet");
            self.notices.push(Notice::NoBetPlaced);
            return Err(Rejection::NoBetPlaced);
        }
        self.round += 1;
        self.favor_this_round = self.favor;
        self.phase = Phase::Rolling;
        for die in &mut self.dice {
            die.animating = true;
        }
        let delay = self.config.rolling_delay();
        self.timers.schedule(TimerKind::RollSettle, delay);
        info!(
            round = self.round,
            total_bet = self.ledger.total(),
            favor = self.favor_this_round,
            "rolling"
        );
        Ok(Ack::Applied)
    }

    /// Secret zone tap on the wager table. Observed in every phase.
    pub fn tap_zone(&mut self, zone: u8) -> Ack {
        if self.variant != Variant::Wager {
            return Ack::Ignored;
        }
        let delay = self.config.tap_idle_delay();
        self.timers.schedule(TimerKind::TapIdle, delay);
        match self.detector.push(zone) {
            TapProgress::Matched => {
                self.timers.cancel(TimerKind::TapIdle);
                self.favor = true;
                info!(round = self.round, "favor mode activated");
                self.notices.push(Notice::FavorActivated);
            }
            TapProgress::Mismatched => debug!(zone, "tap sequence mismatch"),
            TapProgress::Partial(len) => debug!(zone, len, "tap recorded"),
        }
        Ack::Applied
    }

    /// Card tap on the free table: feeds the detector while betting, picks
    /// the outcome while waiting for a tap.
    pub fn tap_card(&mut self, position: u8) -> Ack {
        if self.variant != Variant::Free || Animal::from_position(position).is_none() {
            return Ack::Ignored;
        }
        match self.phase {
            Phase::Betting if !self.override_armed => {
                match self.detector.push(position) {
                    TapProgress::Matched => {
                        self.override_armed = true;
                        info!("override mode armed");
                        self.notices.push(Notice::OverrideArmed);
                    }
                    TapProgress::Mismatched => debug!(position, "tap sequence mismatch"),
                    TapProgress::Partial(len) => debug!(position, len, "tap recorded"),
                }
                Ack::Applied
            }
            Phase::WaitingForTap => {
                let (outcome, forced) = match self.config.forced_outcomes.get(&position) {
                    Some(triple) => (dice::generate(&mut self.rng, &Draw::Forced(*triple)), true),
                    None => (dice::generate(&mut self.rng, &Draw::Uniform), false),
                };
                info!(position, ?outcome, forced, "outcome picked by tap");
                if forced {
                    self.notices.push(Notice::ForcedResult(outcome));
                }
                self.settle(outcome, forced);
                Ack::Applied
            }
            _ => Ack::Ignored,
        }
    }

    /// Delivers a timer that has elapsed. Superseded timers are ignored.
    pub fn fire(&mut self, fired: Scheduled) -> Ack {
        if !self.timers.claim(&fired) {
            debug!(kind = ?fired.kind, "stale timer ignored");
            return Ack::Ignored;
        }
        match fired.kind {
            TimerKind::RollSettle => self.on_roll_settled(),
            TimerKind::ResultExpiry => self.on_result_expired(),
            TimerKind::TapIdle => {
                debug!(len = self.detector.buffer().len(), "tap buffer idle");
                self.detector.clear();
                Ack::Applied
            }
        }
    }

    fn on_roll_settled(&mut self) -> Ack {
        if self.phase != Phase::Rolling {
            return Ack::Ignored;
        }
        if self.variant == Variant::Free && self.override_armed {
            self.phase = Phase::WaitingForTap;
            info!(round = self.round, "waiting for outcome tap");
            self.notices.push(Notice::WaitingForTap);
            return Ack::Applied;
        }
        let favored = self.ledger.active();
        let draw = if self.favor_this_round {
            Draw::Favor {
                favored: &favored,
                chance: self.config.favor_chance,
            }
        } else {
            Draw::Uniform
        };
        let outcome = dice::generate(&mut self.rng, &draw);
        self.settle(outcome, false);
        Ack::Applied
    }

    fn settle(&mut self, outcome: Outcome, forced: bool) {
        for (die, face) in self.dice.iter_mut().zip(outcome) {
            die.face = face;
            die.animating = false;
        }
        self.winners = dice::winners(&outcome);
        self.phase = Phase::Result;

        let payout = match self.variant {
            Variant::Wager => {
                let total = self.ledger.payout(&outcome);
                self.balance = self.balance.saturating_add(total);
                if total > 0 {
                    self.notices.push(Notice::Won(total));
                } else {
                    self.notices.push(Notice::Lost);
                }
                Some(total)
            }
            Variant::Free => None,
        };
        info!(round = self.round, ?outcome, ?payout, balance = self.balance, "round settled");

        self.history.push_front(RoundRecord {
            round: self.round,
            outcome,
            payout,
            forced,
        });
        self.history.truncate(self.config.history_len);

        let delay = self.config.result_delay();
        self.timers.schedule(TimerKind::ResultExpiry, delay);
    }

    fn on_result_expired(&mut self) -> Ack {
        if self.phase != Phase::Result {
            return Ack::Ignored;
        }
        self.phase = Phase::Betting;
        self.ledger.clear();
        self.winners.clear();
        if self.favor_this_round {
            self.favor = false;
            self.favor_this_round = false;
            info!(round = self.round, "favor mode expired");
        }
        debug!(round = self.round, "ready for next round");
        Ack::Applied
    }

    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.balance = self.config.starting_balance;
        self.ledger.clear();
        self.phase = Phase::Betting;
        self.winners.clear();
        self.favor = false;
        self.favor_this_round = false;
        self.override_armed = false;
        self.detector.clear();
        self.history.clear();
        self.round = 0;
        for die in &mut self.dice {
            die.animating = false;
        }
        info!(balance = self.balance, "table reset");
    }

    pub fn drain_scheduled(&mut self) -> Vec<Scheduled> {
        self.timers.drain()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl<R> Table<R> {
    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dice(&self) -> &[Die; DICE] {
        &self.dice
    }

    pub fn faces(&self) -> Outcome {
        self.dice.map(|d| d.face)
    }

    pub fn is_rolling(&self) -> bool {
        self.dice.iter().any(|d| d.animating)
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn bets(&self) -> &BetLedger {
        &self.ledger
    }

    pub fn winners(&self) -> &[Animal] {
        &self.winners
    }

    pub fn favor_active(&self) -> bool {
        self.favor
    }

    pub fn override_armed(&self) -> bool {
        self.override_armed
    }

    pub fn tap_buffer(&self) -> &[u8] {
        self.detector.buffer()
    }

    pub fn history(&self) -> impl Iterator<Item = &RoundRecord> {
        self.history.iter()
    }

    pub fn round(&self) -> u64 {
        self.round
    }
}
