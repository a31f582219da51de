#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state and simulation clock for Lane Siege.
//!
//! The world owns the roster, projectiles, ledger, wave scheduler and
//! superpower dispatcher. Adapters mutate it exclusively through [`apply`]
//! and read it through the [`query`] module.

use std::{collections::VecDeque, time::Duration};

use glam::Vec2;
use lane_siege_core::{
    Battlefield, Command, Event, Faction, HeroKind, HeroRoster, Intent, IntentError,
    InvalidStatError, Ledger, MatchConfig, MatchPhase, MatchSummary, Projectile, TargetAssignment,
    Unit, UnitId, UnitKind, UnitStats, WELCOME_BANNER,
};
use lane_siege_system_combat::{resolve_impact, Combat, Outcome};
use lane_siege_system_movement::{advance, advance_projectile, BoundaryEvent, ProjectileStep};
use lane_siege_system_superpowers::Dispatcher;
use lane_siege_system_targeting::Targeting;
use lane_siege_system_waves::{WaveScheduler, VILLAIN_SPACING};
use tracing::{debug, info, trace, warn};

/// Failures raised while constructing a match.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A purchasable hero type resolved to invalid stats.
    #[error("invalid hero roster: {0}")]
    InvalidRoster(#[from] InvalidStatError),
    /// The battlefield geometry cannot host a match.
    #[error("battlefield must have a positive, finite width and height (received {width}x{height})")]
    InvalidBattlefield {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
}

/// Represents the authoritative state of a single match.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    battlefield: Battlefield,
    heroes: HeroRoster,
    ledger: Ledger,
    phase: MatchPhase,
    tick: u64,
    units: Vec<Unit>,
    projectiles: Vec<Projectile>,
    next_unit: u32,
    waves: WaveScheduler,
    dispatcher: Dispatcher,
    targeting: Targeting,
    combat: Combat,
    pending: VecDeque<Intent>,
    assignments: Vec<TargetAssignment>,
    expired: Vec<UnitId>,
    waves_enabled: bool,
}

impl World {
    /// Creates a match in the playing phase, positioned before the first wave's spawn step.
    pub fn new(config: &MatchConfig) -> Result<Self, WorldError> {
        let battlefield = config.battlefield;
        let valid_extent = |value: f32| value.is_finite() && value > 0.0;
        if !valid_extent(battlefield.width) || !valid_extent(battlefield.height) {
            return Err(WorldError::InvalidBattlefield {
                width: battlefield.width,
                height: battlefield.height,
            });
        }

        let heroes = HeroRoster::from_config(config)?;
        info!(
            difficulty = ?config.difficulty,
            currency = config.starting_currency,
            base_health = config.base_health,
            "match created"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            battlefield,
            heroes,
            ledger: Ledger::new(config.starting_currency, config.base_health, config.rewards),
            phase: MatchPhase::Playing,
            tick: 0,
            units: Vec::new(),
            projectiles: Vec::new(),
            next_unit: 0,
            waves: WaveScheduler::new(config.difficulty, config.seed),
            dispatcher: Dispatcher::new(),
            targeting: Targeting::new(),
            combat: Combat::new(),
            pending: VecDeque::new(),
            assignments: Vec::new(),
            expired: Vec::new(),
            waves_enabled: true,
        })
    }

    fn set_phase(&mut self, phase: MatchPhase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        info!(from = %self.phase, to = %phase, wave = self.waves.wave(), "phase changed");
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn reject(intent: Intent, reason: IntentError, out_events: &mut Vec<Event>) {
        debug!(?intent, %reason, "intent rejected");
        out_events.push(Event::IntentRejected { intent, reason });
    }

    fn submit(&mut self, intent: Intent, out_events: &mut Vec<Event>) {
        match intent {
            Intent::TogglePause => match self.phase {
                MatchPhase::Playing => self.set_phase(MatchPhase::Paused, out_events),
                MatchPhase::Paused => self.set_phase(MatchPhase::Playing, out_events),
                phase => Self::reject(intent, IntentError::InvalidPhase { phase }, out_events),
            },
            Intent::StartNextWave => {
                if self.phase != MatchPhase::WaveComplete {
                    let phase = self.phase;
                    Self::reject(intent, IntentError::InvalidPhase { phase }, out_events);
                    return;
                }
                let wave = self.waves.advance_wave();
                let amount = self.ledger.pay_wave_bonus();
                out_events.push(Event::WaveBonusAwarded { wave, amount });
                self.set_phase(MatchPhase::Playing, out_events);
            }
            Intent::SpawnHero { .. } | Intent::InvokeSuperpower { .. } => {
                if self.phase.is_terminal() {
                    let phase = self.phase;
                    Self::reject(intent, IntentError::InvalidPhase { phase }, out_events);
                    return;
                }
                match self.precheck(intent) {
                    Ok(()) => {
                        self.pending.push_back(intent);
                        out_events.push(Event::IntentQueued { intent });
                    }
                    Err(reason) => Self::reject(intent, reason, out_events),
                }
            }
        }
    }

    fn precheck(&self, intent: Intent) -> Result<(), IntentError> {
        match intent {
            Intent::SpawnHero { hero } => {
                let cost = self.hero_cost(hero)?;
                if self.ledger.can_afford(cost) {
                    Ok(())
                } else {
                    Err(IntentError::InsufficientCurrency {
                        cost,
                        available: self.ledger.currency(),
                    })
                }
            }
            Intent::InvokeSuperpower { superpower } => self.dispatcher.check(superpower, &self.ledger),
            Intent::TogglePause | Intent::StartNextWave => Ok(()),
        }
    }

    fn hero_cost(&self, hero: HeroKind) -> Result<u32, IntentError> {
        self.heroes
            .entry(hero)
            .map(|entry| entry.cost)
            .ok_or_else(|| IntentError::UnknownHeroType {
                id: hero.id().to_owned(),
            })
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.phase != MatchPhase::Playing {
            trace!(phase = %self.phase, "tick skipped");
            return;
        }

        self.tick = self.tick.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick,
            dt,
        });
        self.dispatcher.advance(dt, self.phase);

        let eligible = self.units.len();
        self.apply_pending(eligible, out_events);
        self.expire_effects(out_events);
        self.spawn_wave(out_events);
        self.assign_targets(eligible, out_events);
        self.resolve_units(eligible, out_events);
        self.resolve_projectiles(eligible, out_events);
        self.prune();
        self.evaluate_terminal(out_events);

        trace!(
            tick = self.tick,
            units = self.units.len(),
            projectiles = self.projectiles.len(),
            "tick complete"
        );
    }

    fn apply_pending(&mut self, eligible: usize, out_events: &mut Vec<Event>) {
        while let Some(intent) = self.pending.pop_front() {
            match intent {
                Intent::SpawnHero { hero } => {
                    let purchase = self.hero_cost(hero).and_then(|cost| {
                        self.ledger.debit(cost)?;
                        Ok(cost)
                    });
                    match (purchase, self.heroes.entry(hero).copied()) {
                        (Ok(cost), Some(entry)) => {
                            let position = self.battlefield.spawn_point(Faction::Hero, 0, 0.0);
                            let unit =
                                self.spawn_unit(UnitKind::Hero(hero), entry.stats, position, out_events);
                            debug!(?unit, %hero, cost, "hero purchased");
                        }
                        (Err(reason), _) => Self::reject(intent, reason, out_events),
                        (Ok(_), None) => {}
                    }
                }
                Intent::InvokeSuperpower { superpower } => {
                    let roster = &mut self.units[..eligible];
                    match self
                        .dispatcher
                        .invoke(superpower, roster, &mut self.ledger, self.tick)
                    {
                        Ok(invocation) => {
                            out_events.push(Event::SuperpowerInvoked {
                                superpower,
                                affected: invocation.affected,
                            });
                            out_events.extend(invocation.casualties.into_iter().map(Event::from));
                        }
                        Err(reason) => Self::reject(intent, reason, out_events),
                    }
                }
                Intent::TogglePause | Intent::StartNextWave => {}
            }
        }
    }

    fn expire_effects(&mut self, out_events: &mut Vec<Event>) {
        self.dispatcher.expire_effects(self.tick, &mut self.expired);
        out_events.extend(
            self.expired
                .drain(..)
                .map(|unit| Event::EffectExpired { unit }),
        );
    }

    fn spawn_wave(&mut self, out_events: &mut Vec<Event>) {
        if !self.waves_enabled {
            return;
        }
        let Some(plan) = self.waves.plan() else {
            return;
        };

        out_events.push(Event::WaveStarted {
            wave: plan.wave,
            villains: u32::try_from(plan.villains.len()).unwrap_or(u32::MAX),
            boss: plan.boss,
        });
        let mut members = Vec::with_capacity(plan.villains.len());
        for spawn in &plan.villains {
            let position = self
                .battlefield
                .spawn_point(Faction::Villain, spawn.rank, VILLAIN_SPACING);
            members.push(self.spawn_unit(
                UnitKind::Villain(spawn.kind),
                spawn.stats,
                position,
                out_events,
            ));
        }
        self.waves.record_spawned(members);
        info!(wave = plan.wave, boss = plan.boss, "wave started");
    }

    fn spawn_unit(
        &mut self,
        kind: UnitKind,
        stats: UnitStats,
        position: Vec2,
        out_events: &mut Vec<Event>,
    ) -> UnitId {
        let unit = self.allocate_unit(kind, stats, position);
        out_events.push(Event::UnitSpawned {
            unit,
            kind,
            position,
        });
        unit
    }

    fn allocate_unit(&mut self, kind: UnitKind, stats: UnitStats, position: Vec2) -> UnitId {
        let id = UnitId::new(self.next_unit);
        self.next_unit = self.next_unit.wrapping_add(1);
        self.units.push(Unit::spawn(id, kind, stats, position));
        id
    }

    fn assign_targets(&mut self, eligible: usize, out_events: &mut Vec<Event>) {
        self.targeting.handle(
            &self.units[..eligible],
            &self.battlefield,
            &mut self.assignments,
        );

        for assignment in &self.assignments {
            let Some(unit) = self.units[..eligible]
                .iter_mut()
                .find(|unit| unit.id() == assignment.unit)
            else {
                continue;
            };
            if unit.target() != assignment.target {
                out_events.push(Event::TargetChanged {
                    unit: assignment.unit,
                    target: assignment.target,
                });
            }
            unit.set_target(assignment.target, assignment.engaged);
        }
    }

    fn resolve_units(&mut self, eligible: usize, out_events: &mut Vec<Event>) {
        for unit in self.units[..eligible]
            .iter_mut()
            .filter(|unit| unit.is_alive())
        {
            unit.tick_cooldown();
        }

        for index in 0..eligible {
            if !self.units[index].is_alive() {
                continue;
            }

            if self.units[index].is_engaged() {
                self.attack(index, eligible, out_events);
                continue;
            }

            let unit = &mut self.units[index];
            let delta = unit.speed() * self.dispatcher.speed_factor(unit.id());
            if let Some(BoundaryEvent::BaseReached { faction }) =
                advance(unit, delta, &self.battlefield)
            {
                self.reach_base(index, faction, out_events);
            }
        }
    }

    fn attack(&mut self, index: usize, eligible: usize, out_events: &mut Vec<Event>) {
        let Some(target) = self.units[index].target() else {
            return;
        };
        let Some(defender_index) = self.units[..eligible]
            .iter()
            .position(|unit| unit.id() == target)
        else {
            return;
        };
        let Some((attacker, defender)) = pair_mut(&mut self.units, index, defender_index) else {
            return;
        };

        match self
            .combat
            .resolve(attacker, defender, self.tick, &mut self.ledger)
        {
            Outcome::Idle => {}
            Outcome::Struck { damage, casualty } => {
                out_events.push(Event::UnitStruck {
                    attacker: attacker.id(),
                    defender: defender.id(),
                    damage,
                });
                if let Some(casualty) = casualty {
                    out_events.push(Event::from(casualty));
                }
            }
            Outcome::Launched { projectile } => {
                out_events.push(Event::ProjectileLaunched {
                    projectile: projectile.id(),
                    attacker: attacker.id(),
                    target: projectile.target(),
                });
                self.projectiles.push(projectile);
            }
        }
    }

    fn reach_base(&mut self, index: usize, faction: Faction, out_events: &mut Vec<Event>) {
        let unit = &mut self.units[index];
        unit.depart();
        let id = unit.id();

        let (reward, base_damage) = match faction {
            Faction::Hero => (self.ledger.award_base_reach(faction), 0),
            Faction::Villain => {
                let damage = unit.damage().round();
                let damage = if damage.is_finite() && damage > 0.0 {
                    damage.min(u32::MAX as f32) as u32
                } else {
                    0
                };
                let remaining = self.ledger.damage_base(damage);
                debug!(unit = ?id, damage, remaining, "base damaged");
                (None, damage)
            }
        };

        out_events.push(Event::BaseReached {
            unit: id,
            faction,
            reward,
            base_damage,
        });
    }

    fn resolve_projectiles(&mut self, eligible: usize, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.projectiles.len() {
            match advance_projectile(&mut self.projectiles[index], &self.battlefield) {
                ProjectileStep::InFlight => index += 1,
                ProjectileStep::Arrived => {
                    let projectile = self.projectiles.remove(index);
                    let impact =
                        resolve_impact(&projectile, &mut self.units[..eligible], &mut self.ledger);
                    out_events.push(Event::ProjectileResolved {
                        projectile: projectile.id(),
                        hits: impact.hits,
                    });
                    out_events.extend(impact.casualties.into_iter().map(Event::from));
                }
                ProjectileStep::OutOfBounds => {
                    let projectile = self.projectiles.remove(index);
                    out_events.push(Event::ProjectileDiscarded {
                        projectile: projectile.id(),
                    });
                }
            }
        }
    }

    fn prune(&mut self) {
        let dispatcher = &mut self.dispatcher;
        self.units.retain(|unit| {
            if unit.is_alive() {
                return true;
            }
            if !unit.has_departed() && !unit.hp().is_finite() {
                warn!(unit = ?unit.id(), "removing unit with corrupted hit points");
            }
            dispatcher.forget(unit.id());
            false
        });
    }

    fn evaluate_terminal(&mut self, out_events: &mut Vec<Event>) {
        if self.ledger.is_base_destroyed() {
            self.set_phase(MatchPhase::Defeat, out_events);
            return;
        }

        let wave = self.waves.wave();
        if !self.waves.is_wave_complete(wave, &self.units) {
            return;
        }

        out_events.push(Event::WaveCompleted { wave });
        if self.waves.is_final_wave() {
            self.set_phase(MatchPhase::Victory, out_events);
        } else {
            self.set_phase(MatchPhase::WaveComplete, out_events);
        }
    }

    fn summary(&self) -> MatchSummary {
        let wave = self.waves.wave();
        let score = self.ledger.score();
        MatchSummary {
            final_score: score,
            currency_earned: score
                .saturating_add(self.ledger.rewards().wave_payout.saturating_mul(wave)),
            victory: self.phase == MatchPhase::Victory,
            wave,
        }
    }
}

fn pair_mut(units: &mut [Unit], first: usize, second: usize) -> Option<(&mut Unit, &mut Unit)> {
    if first == second || first >= units.len() || second >= units.len() {
        return None;
    }
    if first < second {
        let (left, right) = units.split_at_mut(second);
        Some((&mut left[first], &mut right[0]))
    } else {
        let (left, right) = units.split_at_mut(first);
        Some((&mut right[0], &mut left[second]))
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Ticks execute only while the match is playing. Intents are either applied
/// immediately (pause toggles, starting the next wave) or queued for the next
/// executed tick (hero purchases, superpowers).
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::Submit { intent } => world.submit(intent, out_events),
    }
}

/// Leaves a finished match, yielding the results for the surrounding application.
///
/// Returns `None` while the match has not reached victory or defeat. The world
/// is consumed, so the summary can be taken at most once.
pub fn leave_match(world: World) -> Option<MatchSummary> {
    if !world.phase.is_terminal() {
        return None;
    }
    let summary = world.summary();
    info!(
        score = summary.final_score,
        currency = summary.currency_earned,
        victory = summary.victory,
        "match left"
    );
    Some(summary)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_siege_core::{
        Battlefield, FrameSnapshot, HeroRoster, Hud, LedgerSnapshot, MatchPhase, Projectile,
        ProjectileSnapshot, SuperpowerStatus, Unit, UnitId, UnitSnapshot,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Active match phase.
    #[must_use]
    pub fn phase(world: &World) -> MatchPhase {
        world.phase
    }

    /// Number of ticks executed so far.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Current one-based wave number.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.waves.wave()
    }

    /// Copy of the ledger balances.
    #[must_use]
    pub fn ledger(world: &World) -> LedgerSnapshot {
        world.ledger.snapshot()
    }

    /// Battlefield geometry.
    #[must_use]
    pub fn battlefield(world: &World) -> &Battlefield {
        &world.battlefield
    }

    /// Purchasable hero types with their resolved stats and prices.
    #[must_use]
    pub fn hero_roster(world: &World) -> &HeroRoster {
        &world.heroes
    }

    /// Units on the battlefield in roster order.
    #[must_use]
    pub fn units(world: &World) -> &[Unit] {
        &world.units
    }

    /// Looks up a unit by identifier.
    #[must_use]
    pub fn unit(world: &World, id: UnitId) -> Option<&Unit> {
        world.units.iter().find(|unit| unit.id() == id)
    }

    /// Projectiles in flight in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        &world.projectiles
    }

    /// Number of intents waiting for the next executed tick.
    #[must_use]
    pub fn pending_intents(world: &World) -> usize {
        world.pending.len()
    }

    /// Effective speed multiplier of a unit, accounting for active slows.
    #[must_use]
    pub fn speed_factor(world: &World, id: UnitId) -> f32 {
        world.dispatcher.speed_factor(id)
    }

    /// Availability of every superpower in catalog order.
    #[must_use]
    pub fn superpowers(world: &World) -> Vec<SuperpowerStatus> {
        world.dispatcher.status(&world.ledger)
    }

    /// Heads-up display values.
    #[must_use]
    pub fn hud(world: &World) -> Hud {
        let ledger = world.ledger.snapshot();
        Hud {
            wave: world.waves.wave(),
            max_waves: world.waves.max_waves(),
            currency: ledger.currency,
            score: ledger.score,
            base_health: ledger.base_health,
            phase: world.phase,
        }
    }

    /// Captures the complete read-only frame handed to renderers.
    #[must_use]
    pub fn frame(world: &World) -> FrameSnapshot {
        FrameSnapshot {
            tick: world.tick,
            hud: hud(world),
            units: world
                .units
                .iter()
                .filter(|unit| unit.is_alive())
                .map(UnitSnapshot::from_unit)
                .collect(),
            projectiles: world
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id(),
                    owner: projectile.owner(),
                    position: projectile.position(),
                })
                .collect(),
            superpowers: superpowers(world),
        }
    }
}

#[cfg(any(test, feature = "test_scaffolding"))]
impl World {
    /// Places a unit with explicit stats directly on the battlefield, bypassing the ledger.
    pub fn insert_unit(&mut self, kind: UnitKind, stats: UnitStats, position: Vec2) -> UnitId {
        self.allocate_unit(kind, stats, position)
    }

    /// Stops the wave scheduler from spawning villains.
    pub fn suppress_waves(&mut self) {
        self.waves_enabled = false;
    }

    /// Mutable access to a unit for arranging test scenarios.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id() == id)
    }

    /// Mutable access to the ledger for arranging test scenarios.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_siege_core::{SuperpowerId, VillainKind};

    fn tick(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        events
    }

    fn submit(world: &mut World, intent: Intent) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::from(intent), &mut events);
        events
    }

    #[test]
    fn pair_mut_returns_both_orders() {
        let stats = UnitStats::new(10.0, 1.0, 1.0, 60).expect("valid stats");
        let mut units: Vec<Unit> = (0..3)
            .map(|id| {
                Unit::spawn(
                    UnitId::new(id),
                    UnitKind::Villain(VillainKind::Goblin),
                    stats,
                    Vec2::ZERO,
                )
            })
            .collect();

        let (a, b) = pair_mut(&mut units, 2, 0).expect("distinct indices");
        assert_eq!((a.id().get(), b.id().get()), (2, 0));
        assert!(pair_mut(&mut units, 1, 1).is_none());
        assert!(pair_mut(&mut units, 1, 3).is_none());
    }

    #[test]
    fn first_tick_spawns_the_first_wave() {
        let mut world = World::new(&MatchConfig::default()).expect("valid config");
        let events = tick(&mut world);

        assert!(events.contains(&Event::WaveStarted {
            wave: 1,
            villains: 3,
            boss: false,
        }));
        assert_eq!(world.units.len(), 3);
        assert!(world.units.iter().all(|unit| unit.faction() == Faction::Villain));
        assert_eq!(world.units[0].position(), Vec2::new(-50.0, 500.0));
        assert_eq!(world.units[2].position(), Vec2::new(-170.0, 500.0));
    }

    #[test]
    fn spawn_intent_is_applied_on_the_next_tick() {
        let mut world = World::new(&MatchConfig::default()).expect("valid config");
        world.suppress_waves();

        let events = submit(
            &mut world,
            Intent::SpawnHero {
                hero: HeroKind::Knight,
            },
        );
        assert_eq!(
            events,
            vec![Event::IntentQueued {
                intent: Intent::SpawnHero {
                    hero: HeroKind::Knight
                }
            }]
        );
        assert!(world.units.is_empty());
        assert_eq!(world.ledger.currency(), 200);

        let _ = tick(&mut world);
        assert_eq!(world.units.len(), 1);
        assert_eq!(world.ledger.currency(), 150);
        assert_eq!(world.units[0].position(), Vec2::new(1050.0, 500.0));
    }

    #[test]
    fn freshly_spawned_units_sit_out_their_first_tick() {
        let mut world = World::new(&MatchConfig::default()).expect("valid config");
        world.suppress_waves();
        let _ = submit(
            &mut world,
            Intent::SpawnHero {
                hero: HeroKind::Knight,
            },
        );

        let _ = tick(&mut world);
        assert_eq!(world.units[0].position().x, 1050.0);
        let _ = tick(&mut world);
        assert_eq!(world.units[0].position().x, 1048.5);
    }

    #[test]
    fn queued_intents_are_rechecked_when_applied() {
        let config = MatchConfig {
            starting_currency: 100,
            ..MatchConfig::default()
        };
        let mut world = World::new(&config).expect("valid config");
        world.suppress_waves();

        let knight = Intent::SpawnHero {
            hero: HeroKind::Knight,
        };
        let _ = submit(&mut world, knight);
        let _ = submit(&mut world, knight);
        let _ = submit(&mut world, knight);

        let events = tick(&mut world);
        let rejections = events
            .iter()
            .filter(|event| matches!(event, Event::IntentRejected { .. }))
            .count();
        assert_eq!(rejections, 1);
        assert_eq!(world.units.len(), 2);
        assert_eq!(world.ledger.currency(), 0);
    }

    #[test]
    fn start_next_wave_is_rejected_outside_wave_complete() {
        let mut world = World::new(&MatchConfig::default()).expect("valid config");
        let events = submit(&mut world, Intent::StartNextWave);
        assert_eq!(
            events,
            vec![Event::IntentRejected {
                intent: Intent::StartNextWave,
                reason: IntentError::InvalidPhase {
                    phase: MatchPhase::Playing
                },
            }]
        );
        assert_eq!(world.ledger.currency(), 200);
    }

    #[test]
    fn superpower_precheck_rejects_without_queueing() {
        let config = MatchConfig {
            starting_currency: 10,
            ..MatchConfig::default()
        };
        let mut world = World::new(&config).expect("valid config");
        let intent = Intent::InvokeSuperpower {
            superpower: SuperpowerId::RocketStrike,
        };
        let events = submit(&mut world, intent);
        assert!(matches!(
            events.as_slice(),
            [Event::IntentRejected {
                reason: IntentError::InsufficientCurrency { cost: 100, .. },
                ..
            }]
        ));
        assert!(world.pending.is_empty());
    }

    #[test]
    fn invalid_battlefield_is_rejected() {
        let mut config = MatchConfig::default();
        config.battlefield.width = 0.0;
        assert!(matches!(
            World::new(&config),
            Err(WorldError::InvalidBattlefield { .. })
        ));
    }
}
