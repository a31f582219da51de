//! Economy ledger: currency, score and base health.
//!
//! Every credit or debit of the match funnels through [`Ledger`], which is the
//! single place that enforces the non-negative invariants.

use serde::{Deserialize, Serialize};

use crate::{Faction, UnitKind};

/// Amounts paid out by the ledger for player achievements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    /// Score for a hero defeating a villain, before the villain's bounty.
    pub kill_score: u32,
    /// Currency for a hero defeating a villain, before the villain's bounty.
    pub kill_currency: u32,
    /// Score for a hero reaching the villain base.
    pub base_reach_score: u32,
    /// Currency for a hero reaching the villain base.
    pub base_reach_currency: u32,
    /// Currency paid when the operator starts the next wave.
    pub wave_bonus: u32,
    /// Currency per reached wave added to the match-end payout.
    pub wave_payout: u32,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            kill_score: 25,
            kill_currency: 10,
            base_reach_score: 50,
            base_reach_currency: 20,
            wave_bonus: 50,
            wave_payout: 50,
        }
    }
}

/// Score and currency awarded by a single ledger event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reward {
    /// Points added to the score.
    pub score: u32,
    /// Currency credited.
    pub currency: u32,
}

/// Failure raised when a debit would drive currency negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The ledger holds less currency than requested.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount the caller attempted to debit.
        requested: u32,
        /// Currency held at the time of the request.
        available: u32,
    },
}

/// Read-only copy of the ledger values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Spendable currency.
    pub currency: u32,
    /// Accumulated score.
    pub score: u32,
    /// Remaining health of the player's base.
    pub base_health: u32,
}

/// Mutable economy state of a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    currency: u32,
    score: u32,
    base_health: u32,
    rewards: Rewards,
}

impl Ledger {
    /// Opens a ledger with the provided starting balances.
    #[must_use]
    pub const fn new(starting_currency: u32, base_health: u32, rewards: Rewards) -> Self {
        Self {
            currency: starting_currency,
            score: 0,
            base_health,
            rewards,
        }
    }

    /// Adds currency.
    pub fn credit(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Removes currency, refusing to go below zero.
    pub fn debit(&mut self, amount: u32) -> Result<(), LedgerError> {
        if amount > self.currency {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.currency,
            });
        }
        self.currency -= amount;
        Ok(())
    }

    /// Reports whether a debit of `amount` would succeed.
    #[must_use]
    pub const fn can_afford(&self, amount: u32) -> bool {
        amount <= self.currency
    }

    /// Adds points to the score.
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Applies damage to the base, clamping at zero, and returns the remaining health.
    pub fn damage_base(&mut self, amount: u32) -> u32 {
        self.base_health = self.base_health.saturating_sub(amount);
        self.base_health
    }

    /// Reports whether the base has been destroyed.
    #[must_use]
    pub const fn is_base_destroyed(&self) -> bool {
        self.base_health == 0
    }

    /// Credits a kill. Only heroes defeating villains are monetized.
    pub fn award_kill(&mut self, killer: Faction, victim: UnitKind) -> Option<Reward> {
        if killer != Faction::Hero || victim.faction() != Faction::Villain {
            return None;
        }

        let bounty = victim.bounty();
        let reward = Reward {
            score: self.rewards.kill_score.saturating_mul(bounty),
            currency: self.rewards.kill_currency.saturating_mul(bounty),
        };
        self.pay(reward);
        Some(reward)
    }

    /// Credits a unit reaching the opposing base. Only heroes are monetized.
    pub fn award_base_reach(&mut self, faction: Faction) -> Option<Reward> {
        if faction != Faction::Hero {
            return None;
        }

        let reward = Reward {
            score: self.rewards.base_reach_score,
            currency: self.rewards.base_reach_currency,
        };
        self.pay(reward);
        Some(reward)
    }

    /// Credits the bonus that accompanies the start of a new wave.
    pub fn pay_wave_bonus(&mut self) -> u32 {
        let bonus = self.rewards.wave_bonus;
        self.credit(bonus);
        bonus
    }

    /// Spendable currency.
    #[must_use]
    pub const fn currency(&self) -> u32 {
        self.currency
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Remaining base health.
    #[must_use]
    pub const fn base_health(&self) -> u32 {
        self.base_health
    }

    /// Reward amounts in effect for the match.
    #[must_use]
    pub const fn rewards(&self) -> &Rewards {
        &self.rewards
    }

    /// Copies the current balances.
    #[must_use]
    pub const fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            currency: self.currency,
            score: self.score,
            base_health: self.base_health,
        }
    }

    fn pay(&mut self, reward: Reward) {
        self.add_score(reward.score);
        self.credit(reward.currency);
    }
}
