//! Entity model: combatants and projectiles.

use std::fmt;

use glam::Vec2;

use crate::{AttackStyle, Faction, UnitKind};

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Names a validated stat in construction errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// Maximum hit points.
    MaxHp,
    /// Damage per hit.
    Damage,
    /// Movement speed.
    Speed,
    /// Travel speed of a projectile.
    ProjectileSpeed,
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MaxHp => "max hp",
            Self::Damage => "damage",
            Self::Speed => "speed",
            Self::ProjectileSpeed => "projectile speed",
        };
        f.write_str(name)
    }
}

/// Raised when a unit or projectile is constructed with a negative or non-finite stat.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("{stat} must be finite and non-negative (received {value})")]
pub struct InvalidStatError {
    /// Stat that failed validation.
    pub stat: StatKind,
    /// Offending value.
    pub value: f32,
}

fn validated(stat: StatKind, value: f32) -> Result<f32, InvalidStatError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InvalidStatError { stat, value })
    }
}

/// Validated combat stats of a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitStats {
    max_hp: f32,
    damage: f32,
    speed: f32,
    attack_interval: u32,
}

impl UnitStats {
    /// Validates and bundles unit stats.
    ///
    /// Hit points, damage and speed must be finite and non-negative.
    pub fn new(
        max_hp: f32,
        damage: f32,
        speed: f32,
        attack_interval: u32,
    ) -> Result<Self, InvalidStatError> {
        Ok(Self {
            max_hp: validated(StatKind::MaxHp, max_hp)?,
            damage: validated(StatKind::Damage, damage)?,
            speed: validated(StatKind::Speed, speed)?,
            attack_interval,
        })
    }

    /// Hit points of a freshly spawned unit.
    #[must_use]
    pub const fn max_hp(&self) -> f32 {
        self.max_hp
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Distance travelled per tick while advancing.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Ticks between two consecutive attacks.
    #[must_use]
    pub const fn attack_interval(&self) -> u32 {
        self.attack_interval
    }
}

/// Result of applying damage to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageOutcome {
    /// The unit was already out of the fight or the damage was not positive.
    Ignored,
    /// The unit lost hit points and survived.
    Wounded,
    /// The hit brought the unit to zero hit points.
    Killed,
}

/// A combatant on the battlefield.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    id: UnitId,
    kind: UnitKind,
    position: Vec2,
    stats: UnitStats,
    hp: f32,
    cooldown: u32,
    target: Option<UnitId>,
    engaged: bool,
    departed: bool,
}

impl Unit {
    /// Creates a unit at full health with no target and a ready attack.
    #[must_use]
    pub fn spawn(id: UnitId, kind: UnitKind, stats: UnitStats, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            stats,
            hp: stats.max_hp(),
            cooldown: 0,
            target: None,
            engaged: false,
            departed: false,
        }
    }

    /// Identifier of the unit.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Concrete unit type.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Faction the unit fights for.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.kind.faction()
    }

    /// Melee or ranged classification derived from the unit type.
    #[must_use]
    pub const fn attack_style(&self) -> AttackStyle {
        self.kind.attack_style()
    }

    /// Maximum distance at which the unit may attack.
    #[must_use]
    pub const fn attack_range(&self) -> f32 {
        self.kind.attack_style().attack_range()
    }

    /// Distance within which the unit acquires or keeps a target.
    #[must_use]
    pub fn engagement_radius(&self) -> f32 {
        self.kind.attack_style().engagement_radius()
    }

    /// Current position on the battlefield.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the unit to a new position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Collision radius of the unit.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.kind.size()
    }

    /// Validated stats the unit was spawned with.
    #[must_use]
    pub const fn stats(&self) -> &UnitStats {
        &self.stats
    }

    /// Current hit points.
    #[must_use]
    pub const fn hp(&self) -> f32 {
        self.hp
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max_hp(&self) -> f32 {
        self.stats.max_hp()
    }

    /// Current hit points as a fraction of the maximum, for health bars.
    #[must_use]
    pub fn hp_fraction(&self) -> f32 {
        if self.stats.max_hp() <= 0.0 {
            return 0.0;
        }
        (self.hp / self.stats.max_hp()).clamp(0.0, 1.0)
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.stats.damage()
    }

    /// Base movement speed, before any temporary effects.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.stats.speed()
    }

    /// Horizontal distance to another unit.
    #[must_use]
    pub fn distance_to(&self, other: &Unit) -> f32 {
        (self.position.x - other.position.x).abs()
    }

    /// Reports whether the unit still takes part in the fight.
    ///
    /// Units with corrupted (non-finite) hit points count as dead.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.departed && self.hp.is_finite() && self.hp > 0.0
    }

    /// Reports whether the unit left the battlefield through the opposing base line.
    #[must_use]
    pub const fn has_departed(&self) -> bool {
        self.departed
    }

    /// Marks the unit as having crossed the opposing base line.
    pub fn depart(&mut self) {
        self.departed = true;
        self.clear_target();
    }

    /// Subtracts hit points, clamping at zero.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() || !amount.is_finite() || amount <= 0.0 {
            return DamageOutcome::Ignored;
        }

        self.hp = (self.hp - amount).max(0.0);
        if self.hp == 0.0 {
            self.clear_target();
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    /// Restores hit points up to the maximum and returns the amount restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() || !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }

        let before = self.hp;
        self.hp = (self.hp + amount).min(self.stats.max_hp());
        self.hp - before
    }

    /// Ticks remaining before the unit may attack again.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Reports whether the attack cooldown has elapsed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.cooldown == 0
    }

    /// Restarts the attack cooldown after an attack.
    pub fn reset_cooldown(&mut self) {
        self.cooldown = self.stats.attack_interval();
    }

    /// Counts the attack cooldown down by one tick.
    pub fn tick_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Identifier of the unit currently being pursued or fought, if any.
    #[must_use]
    pub const fn target(&self) -> Option<UnitId> {
        self.target
    }

    /// Reports whether the current target is within attack range.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        self.engaged && self.target.is_some()
    }

    /// Records the target chosen for this tick.
    pub fn set_target(&mut self, target: Option<UnitId>, engaged: bool) {
        self.engaged = engaged && target.is_some();
        self.target = target;
    }

    /// Drops the current target and disengages.
    pub fn clear_target(&mut self) {
        self.target = None;
        self.engaged = false;
    }
}

/// A ranged-attack payload in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    owner: Faction,
    position: Vec2,
    target: Vec2,
    damage: f32,
    speed: f32,
    launched_at: u64,
}

impl Projectile {
    /// Launches a projectile from `origin` toward the captured `target` point.
    ///
    /// The speed must be finite and strictly positive so that the projectile
    /// always reaches its destination in a bounded number of ticks.
    pub fn launch(
        id: ProjectileId,
        owner: Faction,
        origin: Vec2,
        target: Vec2,
        damage: f32,
        speed: f32,
        tick: u64,
    ) -> Result<Self, InvalidStatError> {
        let damage = validated(StatKind::Damage, damage)?;
        let speed = validated(StatKind::ProjectileSpeed, speed)?;
        if speed == 0.0 {
            return Err(InvalidStatError {
                stat: StatKind::ProjectileSpeed,
                value: speed,
            });
        }

        Ok(Self {
            id,
            owner,
            position: origin,
            target,
            damage,
            speed,
            launched_at: tick,
        })
    }

    /// Identifier of the projectile.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Faction that fired the projectile; only the opponent can be damaged.
    #[must_use]
    pub const fn owner(&self) -> Faction {
        self.owner
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the projectile to a new position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Point captured at launch time.
    #[must_use]
    pub const fn target(&self) -> Vec2 {
        self.target
    }

    /// Damage applied on arrival.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Distance travelled per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Tick on which the projectile was launched.
    #[must_use]
    pub const fn launched_at(&self) -> u64 {
        self.launched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HeroKind, VillainKind};

    fn knight() -> Unit {
        let stats = UnitStats::new(100.0, 25.0, 1.5, 60).expect("valid stats");
        Unit::spawn(
            UnitId::new(1),
            UnitKind::Hero(HeroKind::Knight),
            stats,
            Vec2::ZERO,
        )
    }

    #[test]
    fn negative_stats_are_rejected() {
        let error = UnitStats::new(100.0, -1.0, 1.0, 60).expect_err("negative damage");
        assert_eq!(error.stat, StatKind::Damage);

        let error = UnitStats::new(f32::NAN, 1.0, 1.0, 60).expect_err("nan hp");
        assert_eq!(error.stat, StatKind::MaxHp);

        let error = UnitStats::new(10.0, 1.0, f32::INFINITY, 60).expect_err("infinite speed");
        assert_eq!(error.stat, StatKind::Speed);
    }

    #[test]
    fn damage_clamps_at_zero_and_reports_kill_once() {
        let mut unit = knight();
        assert_eq!(unit.apply_damage(30.0), DamageOutcome::Wounded);
        assert_eq!(unit.apply_damage(500.0), DamageOutcome::Killed);
        assert_eq!(unit.hp(), 0.0);
        assert!(!unit.is_alive());
        assert_eq!(unit.apply_damage(10.0), DamageOutcome::Ignored);
    }

    #[test]
    fn non_positive_damage_is_ignored() {
        let mut unit = knight();
        assert_eq!(unit.apply_damage(f32::NAN), DamageOutcome::Ignored);
        assert_eq!(unit.apply_damage(-5.0), DamageOutcome::Ignored);
        assert_eq!(unit.hp(), 100.0);
    }

    #[test]
    fn heal_is_capped_at_max_hp() {
        let mut unit = knight();
        let _ = unit.apply_damage(30.0);
        assert_eq!(unit.heal(100.0), 30.0);
        assert_eq!(unit.hp(), unit.max_hp());
    }

    #[test]
    fn cooldown_counts_down_to_zero() {
        let mut unit = knight();
        unit.reset_cooldown();
        assert_eq!(unit.cooldown(), 60);
        for _ in 0..100 {
            unit.tick_cooldown();
        }
        assert!(unit.is_ready());
    }

    #[test]
    fn departed_units_are_not_alive() {
        let stats = UnitStats::new(40.0, 15.0, 2.0, 60).expect("valid stats");
        let mut unit = Unit::spawn(
            UnitId::new(9),
            UnitKind::Villain(VillainKind::Goblin),
            stats,
            Vec2::ZERO,
        );
        unit.set_target(Some(UnitId::new(1)), true);
        unit.depart();
        assert!(!unit.is_alive());
        assert!(unit.target().is_none());
        assert!(!unit.is_engaged());
    }

    #[test]
    fn projectile_requires_positive_speed() {
        let error = Projectile::launch(
            ProjectileId::new(1),
            Faction::Hero,
            Vec2::ZERO,
            Vec2::X,
            10.0,
            0.0,
            0,
        )
        .expect_err("zero speed");
        assert_eq!(error.stat, StatKind::ProjectileSpeed);
    }
}
