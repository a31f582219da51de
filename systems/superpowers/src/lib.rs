#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Superpower dispatcher: cost and cooldown gating plus global effects.

mod effects;

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use lane_siege_core::{
    Casualty, DamageOutcome, Faction, IntentError, Ledger, MatchPhase, SuperpowerEffect,
    SuperpowerId, SuperpowerStatus, Unit, UnitId,
};
use tracing::debug;

pub use effects::{EffectBook, SlowEffect};

/// Period at which superpower cooldowns decay.
pub const COOLDOWN_QUANTUM: Duration = Duration::from_millis(100);

/// Remaining cooldown per superpower, decayed in fixed quanta while the match plays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CooldownClock {
    remaining: BTreeMap<SuperpowerId, Duration>,
    accumulator: Duration,
}

impl CooldownClock {
    /// Creates a clock with every superpower ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left before `superpower` may be invoked again.
    #[must_use]
    pub fn remaining(&self, superpower: SuperpowerId) -> Duration {
        self.remaining
            .get(&superpower)
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Starts the full cooldown of `superpower`.
    pub fn start(&mut self, superpower: SuperpowerId) {
        let _ = self
            .remaining
            .insert(superpower, superpower.definition().cooldown);
    }

    /// Accumulates `dt` and decays every cooldown by the whole quanta elapsed.
    ///
    /// Nothing accumulates unless the match is playing, so pausing freezes
    /// cooldowns. Returns the number of quanta applied.
    pub fn advance(&mut self, dt: Duration, phase: MatchPhase) -> u32 {
        if phase != MatchPhase::Playing {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let whole = self.accumulator.as_nanos() / COOLDOWN_QUANTUM.as_nanos();
        let quanta = u32::try_from(whole).unwrap_or(u32::MAX);
        if quanta == 0 {
            return 0;
        }

        let elapsed = COOLDOWN_QUANTUM.saturating_mul(quanta);
        self.accumulator = self.accumulator.saturating_sub(elapsed);
        for remaining in self.remaining.values_mut() {
            *remaining = remaining.saturating_sub(elapsed);
        }
        quanta
    }
}

/// Effect of a successful superpower invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    /// Superpower that fired.
    pub superpower: SuperpowerId,
    /// Units damaged, slowed or healed, in roster order.
    pub affected: Vec<UnitId>,
    /// Units defeated by the effect, in roster order.
    pub casualties: Vec<Casualty>,
}

/// Applies superpowers on behalf of the player's faction.
#[derive(Debug, Default)]
pub struct Dispatcher {
    cooldowns: CooldownClock,
    effects: EffectBook,
}

impl Dispatcher {
    /// Creates a dispatcher with every superpower ready and no active effect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `superpower` could be invoked right now, without side effects.
    pub fn check(&self, superpower: SuperpowerId, ledger: &Ledger) -> Result<(), IntentError> {
        let cost = superpower.definition().cost;
        if !ledger.can_afford(cost) {
            return Err(IntentError::InsufficientCurrency {
                cost,
                available: ledger.currency(),
            });
        }

        let remaining = self.remaining(superpower);
        if !remaining.is_zero() {
            return Err(IntentError::OnCooldown { remaining });
        }
        Ok(())
    }

    /// Invokes `superpower` against the roster.
    ///
    /// Declined invocations leave the ledger, cooldowns and roster untouched.
    /// On success the cost is debited, the cooldown restarts and the effect is
    /// applied to living units. Villains defeated by the effect are credited
    /// to the player.
    pub fn invoke(
        &mut self,
        superpower: SuperpowerId,
        roster: &mut [Unit],
        ledger: &mut Ledger,
        tick: u64,
    ) -> Result<Invocation, IntentError> {
        self.check(superpower, ledger)?;
        let definition = superpower.definition();
        ledger.debit(definition.cost)?;
        self.cooldowns.start(superpower);

        let mut invocation = Invocation {
            superpower,
            affected: Vec::new(),
            casualties: Vec::new(),
        };
        let enemies = Faction::Hero.opponent();

        match definition.effect {
            SuperpowerEffect::AreaDamage { radius } => {
                let Some(centre) = centroid(roster, enemies) else {
                    debug!(?superpower, "no targets for area damage");
                    return Ok(invocation);
                };
                for unit in living_mut(roster, enemies) {
                    if (unit.position().x - centre.x).abs() <= radius {
                        strike(unit, definition.magnitude, ledger, &mut invocation);
                    }
                }
            }
            SuperpowerEffect::ChainDamage => {
                for unit in living_mut(roster, enemies) {
                    strike(unit, definition.magnitude, ledger, &mut invocation);
                }
            }
            SuperpowerEffect::SlowDamage {
                factor,
                duration_ticks,
            } => {
                let expires_at = tick.saturating_add(duration_ticks);
                for unit in living_mut(roster, enemies) {
                    strike(unit, definition.magnitude, ledger, &mut invocation);
                    if unit.is_alive() {
                        self.effects.apply_slow(unit.id(), factor, expires_at);
                    }
                }
            }
            SuperpowerEffect::Heal => {
                for unit in living_mut(roster, Faction::Hero) {
                    let _ = unit.heal(definition.magnitude);
                    invocation.affected.push(unit.id());
                }
            }
        }

        debug!(
            ?superpower,
            affected = invocation.affected.len(),
            kills = invocation.casualties.len(),
            "superpower invoked"
        );
        Ok(invocation)
    }

    /// Decays cooldowns by `dt` unless the match is not playing.
    pub fn advance(&mut self, dt: Duration, phase: MatchPhase) {
        let _ = self.cooldowns.advance(dt, phase);
    }

    /// Removes effects that expired by `tick`, reporting affected units.
    pub fn expire_effects(&mut self, tick: u64, out: &mut Vec<UnitId>) {
        self.effects.expire(tick, out);
    }

    /// Speed multiplier currently applied to `unit`.
    #[must_use]
    pub fn speed_factor(&self, unit: UnitId) -> f32 {
        self.effects.speed_factor(unit)
    }

    /// Drops the effects of a unit that left the battlefield.
    pub fn forget(&mut self, unit: UnitId) {
        self.effects.forget(unit);
    }

    /// Time left before `superpower` recharges.
    #[must_use]
    pub fn remaining(&self, superpower: SuperpowerId) -> Duration {
        self.cooldowns.remaining(superpower)
    }

    /// Availability of every superpower in catalog order.
    #[must_use]
    pub fn status(&self, ledger: &Ledger) -> Vec<SuperpowerStatus> {
        SuperpowerId::ALL
            .into_iter()
            .map(|id| {
                let cost = id.definition().cost;
                SuperpowerStatus {
                    id,
                    remaining: self.remaining(id),
                    cost,
                    affordable: ledger.can_afford(cost),
                }
            })
            .collect()
    }
}

fn living_mut(roster: &mut [Unit], faction: Faction) -> impl Iterator<Item = &mut Unit> {
    roster
        .iter_mut()
        .filter(move |unit| unit.is_alive() && unit.faction() == faction)
}

fn centroid(roster: &[Unit], faction: Faction) -> Option<Vec2> {
    let (sum, count) = roster
        .iter()
        .filter(|unit| unit.is_alive() && unit.faction() == faction)
        .fold((Vec2::ZERO, 0u32), |(sum, count), unit| {
            (sum + unit.position(), count + 1)
        });
    (count > 0).then(|| sum / count as f32)
}

fn strike(unit: &mut Unit, damage: f32, ledger: &mut Ledger, invocation: &mut Invocation) {
    match unit.apply_damage(damage) {
        DamageOutcome::Killed => {
            invocation.affected.push(unit.id());
            invocation.casualties.push(Casualty {
                unit: unit.id(),
                kind: unit.kind(),
                reward: ledger.award_kill(Faction::Hero, unit.kind()),
            });
        }
        DamageOutcome::Wounded => invocation.affected.push(unit.id()),
        DamageOutcome::Ignored => {}
    }
}
