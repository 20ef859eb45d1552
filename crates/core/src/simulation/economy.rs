//! Money accounting for the reactor
//!
//! The lifecycle policy only needs somewhere to put income, so it accrues into
//! any [`IncomeSink`]. [`Ledger`] is the sink the simulation facade owns; it also
//! backs the shop flow (`can_afford` / `try_spend`).

use serde::{Deserialize, Serialize};

/// Accumulator that receives income from placed objects
pub trait IncomeSink {
    fn accrue(&mut self, amount: f64);
}

impl IncomeSink for f64 {
    fn accrue(&mut self, amount: f64) {
        *self += amount;
    }
}

/// Player balance in money units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    balance: f64,
}

impl Ledger {
    #[must_use]
    pub fn new(starting_balance: f64) -> Self {
        Self {
            balance: starting_balance,
        }
    }

    #[must_use]
    pub fn balance(&self) -> f64 {
        self.balance
    }

    #[must_use]
    pub fn can_afford(&self, cost: u64) -> bool {
        self.balance >= cost as f64
    }

    /// Debit `cost` if the balance covers it
    pub fn try_spend(&mut self, cost: u64) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.balance -= cost as f64;
        true
    }

    pub fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }
}

impl IncomeSink for Ledger {
    fn accrue(&mut self, amount: f64) {
        self.credit(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_spend_requires_funds() {
        let mut ledger = Ledger::new(30.0);
        assert!(ledger.can_afford(30));
        assert!(ledger.try_spend(25));
        assert_eq!(ledger.balance(), 5.0);

        assert!(!ledger.try_spend(10));
        assert_eq!(ledger.balance(), 5.0, "failed purchase leaves balance alone");
    }

    #[test]
    fn test_accrue_through_sink() {
        fn pay(sink: &mut dyn IncomeSink) {
            sink.accrue(2.5);
            sink.accrue(0.5);
        }

        let mut ledger = Ledger::new(0.0);
        pay(&mut ledger);
        assert_eq!(ledger.balance(), 3.0);

        let mut total = 0.0_f64;
        pay(&mut total);
        assert_eq!(total, 3.0);
    }
}
