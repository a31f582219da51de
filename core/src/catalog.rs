//! Static catalogs describing unit types, superpowers and difficulty tiers.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{IntentError, TICKS_PER_SECOND};

/// Distance within which a melee unit can strike its target.
pub const MELEE_ATTACK_RANGE: f32 = 60.0;
/// Distance within which a ranged unit can launch a projectile at its target.
pub const RANGED_ATTACK_RANGE: f32 = 100.0;
/// Hysteresis added to the attack range when acquiring or retaining a target.
pub const ENGAGEMENT_MARGIN: f32 = 40.0;
/// Ticks a unit waits between two consecutive attacks.
pub const ATTACK_INTERVAL_TICKS: u32 = 60;
/// Purchase price of the champion before gear costs are added.
pub const CHAMPION_BASE_COST: u32 = 60;

/// The two opposing sides of the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    /// Player-controlled units purchased with currency.
    Hero,
    /// Adversarial units spawned by the wave scheduler.
    Villain,
}

impl Faction {
    /// Returns the faction this one fights against.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Hero => Self::Villain,
            Self::Villain => Self::Hero,
        }
    }
}

/// How a unit delivers its damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackStyle {
    /// Damage lands on the defender in the same tick.
    Melee,
    /// Damage travels as a projectile toward the defender's launch-time position.
    Ranged,
}

impl AttackStyle {
    /// Maximum horizontal distance at which an attack may be started.
    #[must_use]
    pub const fn attack_range(self) -> f32 {
        match self {
            Self::Melee => MELEE_ATTACK_RANGE,
            Self::Ranged => RANGED_ATTACK_RANGE,
        }
    }

    /// Radius within which a target is acquired or retained.
    ///
    /// Always wider than [`AttackStyle::attack_range`] so that a target drifting
    /// just out of striking distance is not dropped and re-acquired every tick.
    #[must_use]
    pub fn engagement_radius(self) -> f32 {
        self.attack_range() + ENGAGEMENT_MARGIN
    }
}

/// Base values a unit type starts from before any scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitTemplate {
    /// Hit points of a freshly spawned unit.
    pub max_hp: f32,
    /// Damage dealt per attack.
    pub damage: f32,
    /// Distance travelled per tick while advancing.
    pub speed: f32,
}

impl UnitTemplate {
    const fn new(max_hp: f32, damage: f32, speed: f32) -> Self {
        Self {
            max_hp,
            damage,
            speed,
        }
    }
}

/// Hero types the player may purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroKind {
    /// Sturdy melee fighter.
    Knight,
    /// Cheap ranged attacker.
    Archer,
    /// Fragile ranged attacker with heavy hits.
    Mage,
    /// Slow melee unit with a large health pool.
    Tank,
    /// The configured character, equipped with the selected gear.
    Champion,
}

impl HeroKind {
    /// Every purchasable hero type in catalog order.
    pub const ALL: [HeroKind; 5] = [
        HeroKind::Knight,
        HeroKind::Archer,
        HeroKind::Mage,
        HeroKind::Tank,
        HeroKind::Champion,
    ];

    /// Stable identifier used by adapters to reference the hero type.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Knight => "knight",
            Self::Archer => "archer",
            Self::Mage => "mage",
            Self::Tank => "tank",
            Self::Champion => "champion",
        }
    }

    /// Attack delivery used by the hero type.
    #[must_use]
    pub const fn attack_style(self) -> AttackStyle {
        match self {
            Self::Archer | Self::Mage => AttackStyle::Ranged,
            Self::Knight | Self::Tank | Self::Champion => AttackStyle::Melee,
        }
    }

    /// Collision radius of the hero.
    #[must_use]
    pub const fn size(self) -> f32 {
        match self {
            Self::Knight | Self::Champion => 30.0,
            Self::Archer => 25.0,
            Self::Mage => 28.0,
            Self::Tank => 35.0,
        }
    }

    /// Catalog stats and price, or `None` for the configuration-derived champion.
    #[must_use]
    pub const fn catalog_entry(self) -> Option<(UnitTemplate, u32)> {
        match self {
            Self::Knight => Some((UnitTemplate::new(100.0, 25.0, 1.5), 50)),
            Self::Archer => Some((UnitTemplate::new(60.0, 35.0, 2.0), 40)),
            Self::Mage => Some((UnitTemplate::new(50.0, 45.0, 1.8), 60)),
            Self::Tank => Some((UnitTemplate::new(200.0, 15.0, 1.0), 80)),
            Self::Champion => None,
        }
    }
}

impl fmt::Display for HeroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for HeroKind {
    type Err = IntentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| IntentError::UnknownHeroType {
                id: trimmed.to_owned(),
            })
    }
}

/// Villain types spawned by waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VillainKind {
    /// Fast and weak.
    Goblin,
    /// Middle of the road.
    Orc,
    /// Slow bruiser.
    Troll,
    /// Boss that only appears alone on boss waves.
    Dragon,
}

impl VillainKind {
    /// Unscaled stats of the villain type.
    #[must_use]
    pub const fn template(self) -> UnitTemplate {
        match self {
            Self::Goblin => UnitTemplate::new(40.0, 15.0, 2.0),
            Self::Orc => UnitTemplate::new(80.0, 25.0, 1.5),
            Self::Troll => UnitTemplate::new(150.0, 35.0, 1.2),
            Self::Dragon => UnitTemplate::new(300.0, 50.0, 0.8),
        }
    }

    /// Collision radius of the villain.
    #[must_use]
    pub const fn size(self) -> f32 {
        match self {
            Self::Goblin => 22.0,
            Self::Orc => 28.0,
            Self::Troll => 35.0,
            Self::Dragon => 50.0,
        }
    }

    /// Multiplier applied to kill rewards when a hero defeats this villain.
    #[must_use]
    pub const fn bounty(self) -> u32 {
        match self {
            Self::Dragon => 4,
            Self::Goblin | Self::Orc | Self::Troll => 1,
        }
    }

    /// Reports whether the villain is the boss subtype.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Dragon)
    }
}

/// Concrete type of a unit on the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// A purchased hero.
    Hero(HeroKind),
    /// A wave-spawned villain.
    Villain(VillainKind),
}

impl UnitKind {
    /// Faction the unit fights for.
    #[must_use]
    pub const fn faction(self) -> Faction {
        match self {
            Self::Hero(_) => Faction::Hero,
            Self::Villain(_) => Faction::Villain,
        }
    }

    /// Attack delivery used by the unit. Villains always fight in melee.
    #[must_use]
    pub const fn attack_style(self) -> AttackStyle {
        match self {
            Self::Hero(kind) => kind.attack_style(),
            Self::Villain(_) => AttackStyle::Melee,
        }
    }

    /// Collision radius of the unit.
    #[must_use]
    pub const fn size(self) -> f32 {
        match self {
            Self::Hero(kind) => kind.size(),
            Self::Villain(kind) => kind.size(),
        }
    }

    /// Kill reward multiplier; heroes carry no bounty.
    #[must_use]
    pub const fn bounty(self) -> u32 {
        match self {
            Self::Hero(_) => 0,
            Self::Villain(kind) => kind.bounty(),
        }
    }
}

/// Identifier of a catalog superpower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuperpowerId {
    /// Area damage around the villain centroid.
    RocketStrike,
    /// Damage to every villain.
    LightningChain,
    /// Damage and a temporary slow on every villain.
    IceStorm,
    /// Heals every hero.
    BattleHeal,
}

impl SuperpowerId {
    /// Every superpower in catalog order.
    pub const ALL: [SuperpowerId; 4] = [
        SuperpowerId::RocketStrike,
        SuperpowerId::LightningChain,
        SuperpowerId::IceStorm,
        SuperpowerId::BattleHeal,
    ];

    /// Static definition of the superpower.
    #[must_use]
    pub const fn definition(self) -> SuperpowerDefinition {
        match self {
            Self::RocketStrike => SuperpowerDefinition {
                id: self,
                effect: SuperpowerEffect::AreaDamage { radius: 150.0 },
                magnitude: 150.0,
                cost: 100,
                cooldown: Duration::from_secs(15),
            },
            Self::LightningChain => SuperpowerDefinition {
                id: self,
                effect: SuperpowerEffect::ChainDamage,
                magnitude: 80.0,
                cost: 80,
                cooldown: Duration::from_secs(12),
            },
            Self::IceStorm => SuperpowerDefinition {
                id: self,
                effect: SuperpowerEffect::SlowDamage {
                    factor: 0.3,
                    duration_ticks: 5 * TICKS_PER_SECOND as u64,
                },
                magnitude: 30.0,
                cost: 60,
                cooldown: Duration::from_secs(18),
            },
            Self::BattleHeal => SuperpowerDefinition {
                id: self,
                effect: SuperpowerEffect::Heal,
                magnitude: 100.0,
                cost: 70,
                cooldown: Duration::from_secs(20),
            },
        }
    }
}

/// Effect applied when a superpower fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SuperpowerEffect {
    /// Damages opposing units near the centroid of all opposing units.
    AreaDamage {
        /// Horizontal distance from the centroid within which units are hit.
        radius: f32,
    },
    /// Damages every opposing unit regardless of position.
    ChainDamage,
    /// Damages every opposing unit and scales its speed for a while.
    SlowDamage {
        /// Speed multiplier in `(0, 1)` applied while the slow lasts.
        factor: f32,
        /// Number of ticks the slow lasts.
        duration_ticks: u64,
    },
    /// Restores hit points of every friendly unit.
    Heal,
}

/// Catalog entry describing a superpower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuperpowerDefinition {
    /// Identifier of the superpower.
    pub id: SuperpowerId,
    /// Effect applied on invocation.
    pub effect: SuperpowerEffect,
    /// Damage dealt or hit points restored.
    pub magnitude: f32,
    /// Currency debited on invocation.
    pub cost: u32,
    /// Time before the superpower may be invoked again.
    pub cooldown: Duration,
}

/// Difficulty tiers selectable before a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Few short waves of weakened villains.
    Easy,
    /// The reference balance with a boss on the final wave.
    #[default]
    Medium,
    /// Long campaign of strengthened villains with recurring bosses.
    Hard,
}

impl Difficulty {
    /// Number of waves that must be cleared for victory.
    #[must_use]
    pub const fn max_waves(self) -> u32 {
        match self {
            Self::Easy => 3,
            Self::Medium => 6,
            Self::Hard => 12,
        }
    }

    /// Upper bound on the number of villains in a regular wave.
    #[must_use]
    pub const fn spawn_ceiling(self) -> u32 {
        match self {
            Self::Easy => 6,
            Self::Medium => 7,
            Self::Hard => 8,
        }
    }

    /// Multiplier applied to scaled villain hit points and damage.
    #[must_use]
    pub const fn stat_multiplier(self) -> f32 {
        match self {
            Self::Easy => 0.8,
            Self::Medium => 1.0,
            Self::Hard => 1.25,
        }
    }

    /// Period of boss waves, if the tier has any.
    #[must_use]
    pub const fn boss_period(self) -> Option<u32> {
        match self {
            Self::Easy => None,
            Self::Medium | Self::Hard => Some(6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engagement_radius_exceeds_attack_range() {
        for style in [AttackStyle::Melee, AttackStyle::Ranged] {
            assert!(style.engagement_radius() > style.attack_range());
        }
        assert!(MELEE_ATTACK_RANGE < RANGED_ATTACK_RANGE);
    }

    #[test]
    fn hero_ids_parse_case_insensitively() {
        assert_eq!("Archer".parse::<HeroKind>(), Ok(HeroKind::Archer));
        assert_eq!(" champion ".parse::<HeroKind>(), Ok(HeroKind::Champion));
    }

    #[test]
    fn unknown_hero_id_is_rejected() {
        assert_eq!(
            "wizard".parse::<HeroKind>(),
            Err(IntentError::UnknownHeroType {
                id: "wizard".to_owned()
            }),
        );
    }

    #[test]
    fn only_the_dragon_is_a_boss() {
        assert!(VillainKind::Dragon.is_boss());
        assert!(!VillainKind::Troll.is_boss());
        assert_eq!(UnitKind::Villain(VillainKind::Dragon).bounty(), 4);
        assert_eq!(UnitKind::Hero(HeroKind::Knight).bounty(), 0);
    }

    #[test]
    fn easy_has_no_boss_waves() {
        assert_eq!(Difficulty::Easy.boss_period(), None);
        assert_eq!(Difficulty::Hard.boss_period(), Some(6));
        assert!(Difficulty::Easy.max_waves() < Difficulty::Hard.max_waves());
    }

    #[test]
    fn ice_storm_lasts_five_seconds_of_ticks() {
        let definition = SuperpowerId::IceStorm.definition();
        match definition.effect {
            SuperpowerEffect::SlowDamage {
                factor,
                duration_ticks,
            } => {
                assert!(factor > 0.0 && factor < 1.0);
                assert_eq!(duration_ticks, 300);
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }
}
