use crate::{
    animal::Animal,
    dice::{
        Outcome,
        match_count,
    },
};
use std::collections::BTreeMap;

/// Wagers for the current round, keyed by animal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BetLedger {
    wagers: BTreeMap<Animal, u64>,
}

impl BetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, animal: Animal, amount: u64) {
        let entry = self.wagers.entry(animal).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    pub fn amount(&self, animal: Animal) -> u64 {
        self.wagers.get(&animal).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.wagers.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Animals with a non-zero wager, in catalog order.
    pub fn active(&self) -> Vec<Animal> {
        self.wagers
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(animal, _)| *animal)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Animal, u64)> + '_ {
        self.wagers.iter().map(|(a, n)| (*a, *n))
    }

    pub fn clear(&mut self) {
        self.wagers.clear();
    }

    /// Each wager matched by at least one die returns `wager * (matches + 1)`;
    /// unmatched wagers return nothing.
    pub fn payout(&self, outcome: &Outcome) -> u64 {
        self.wagers
            .iter()
            .map(|(animal, wager)| {
                let matches = match_count(outcome, *animal);
                if matches == 0 {
                    0
                } else {
                    wager.saturating_mul(u64::from(matches) + 1)
                }
            })
            .fold(0u64, u64::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Animal::*;

    #[test]
    fn add_accumulates_per_animal() {
        let mut ledger = BetLedger::new();
        ledger.add(Deer, 100);
        ledger.add(Deer, 100);
        ledger.add(Crab, 50);
        assert_eq!(ledger.amount(Deer), 200);
        assert_eq!(ledger.amount(Crab), 50);
        assert_eq!(ledger.amount(Fish), 0);
        assert_eq!(ledger.total(), 250);
        assert_eq!(ledger.active(), vec![Crab, Deer]);
    }

    #[test]
    fn payout_counts_each_matching_die() {
        let mut ledger = BetLedger::new();
        ledger.add(Crab, 100);
        assert_eq!(ledger.payout(&[Crab, Crab, Fish]), 300);
        assert_eq!(ledger.payout(&[Crab, Crab, Crab]), 400);
        assert_eq!(ledger.payout(&[Crab, Fish, Shrimp]), 200);
        assert_eq!(ledger.payout(&[Fish, Shrimp, Deer]), 0);
    }

    #[test]
    fn payout_sums_across_animals() {
        let mut ledger = BetLedger::new();
        ledger.add(Crab, 100);
        ledger.add(Gourd, 200);
        ledger.add(Rooster, 300);
        // crab x1 -> 200, gourd x2 -> 600, rooster misses
        assert_eq!(ledger.payout(&[Gourd, Crab, Gourd]), 800);
    }

    #[test]
    fn zero_wagers_are_not_active() {
        let mut ledger = BetLedger::new();
        ledger.add(Shrimp, 0);
        assert!(ledger.is_empty());
        assert!(ledger.active().is_empty());
    }
}
