//! Match configuration consumed once at match start.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    Difficulty, Faction, HeroKind, InvalidStatError, Rewards, UnitStats, ATTACK_INTERVAL_TICKS,
    CHAMPION_BASE_COST,
};

/// Direction of travel along the horizontal axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Toward decreasing x.
    West,
    /// Toward increasing x.
    East,
}

impl Facing {
    const fn sign(self) -> f32 {
        match self {
            Self::West => -1.0,
            Self::East => 1.0,
        }
    }
}

/// Geometry of the one-dimensional battlefield.
///
/// The two base lines sit at `x = 0` and `x = width`. Heroes advance in the
/// `hero_facing` direction, so their own base is the line behind them and the
/// villain base is the line ahead of them. Villains advance the opposite way.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Battlefield {
    /// Distance between the two base lines.
    pub width: f32,
    /// Vertical extent used to bound projectiles.
    pub height: f32,
    /// Vertical coordinate every unit stands on.
    pub ground_y: f32,
    /// Direction in which heroes advance.
    pub hero_facing: Facing,
    /// Distance behind its own base line at which a unit spawns.
    pub spawn_margin: f32,
    /// Horizontal slack beyond the base lines before projectiles are discarded.
    pub projectile_margin: f32,
}

impl Default for Battlefield {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            ground_y: 500.0,
            hero_facing: Facing::West,
            spawn_margin: 50.0,
            projectile_margin: 50.0,
        }
    }
}

impl Battlefield {
    /// Signed unit step of the faction's advance along x.
    #[must_use]
    pub fn heading(&self, faction: Faction) -> f32 {
        match faction {
            Faction::Hero => self.hero_facing.sign(),
            Faction::Villain => -self.hero_facing.sign(),
        }
    }

    /// Base line the faction defends.
    #[must_use]
    pub fn home_line(&self, faction: Faction) -> f32 {
        if self.heading(faction) < 0.0 {
            self.width
        } else {
            0.0
        }
    }

    /// Base line the faction advances toward.
    #[must_use]
    pub fn goal_line(&self, faction: Faction) -> f32 {
        self.home_line(faction.opponent())
    }

    /// Reports whether `x` lies strictly beyond the faction's goal line.
    #[must_use]
    pub fn has_crossed_goal(&self, faction: Faction, x: f32) -> bool {
        let goal = self.goal_line(faction);
        if self.heading(faction) > 0.0 {
            x > goal
        } else {
            x < goal
        }
    }

    /// Spawn point behind the faction's base line, `rank` slots further back.
    #[must_use]
    pub fn spawn_point(&self, faction: Faction, rank: u32, spacing: f32) -> Vec2 {
        let behind = self.spawn_margin + rank as f32 * spacing;
        let x = self.home_line(faction) - self.heading(faction) * behind;
        Vec2::new(x, self.ground_y)
    }

    /// Reports whether `x` lies on the lane, margins included.
    ///
    /// Only units on the lane can be targeted, so every shot stays inside
    /// the bounds projectiles are allowed to travel.
    #[must_use]
    pub fn is_on_field(&self, x: f32) -> bool {
        x.is_finite() && x >= -self.projectile_margin && x <= self.width + self.projectile_margin
    }

    /// Reports whether a projectile at `position` is still on the battlefield.
    #[must_use]
    pub fn contains_projectile(&self, position: Vec2) -> bool {
        self.is_on_field(position.x)
            && position.y.is_finite()
            && position.y >= 0.0
            && position.y <= self.height
    }
}

/// Base stats of the selected character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    /// Hit points before gear.
    pub hp: f32,
    /// Damage per hit before gear.
    pub damage: f32,
    /// Speed before gear.
    pub speed: f32,
}

/// Stat changes and price of a piece of equipped gear.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearModifier {
    /// Display name of the gear.
    pub name: String,
    /// Added to the champion's hit points.
    pub hp_delta: f32,
    /// Added to the champion's damage.
    pub damage_delta: f32,
    /// Added to the champion's speed; may be negative.
    pub speed_delta: f32,
    /// Added to the champion's purchase price.
    pub cost: u32,
}

fn default_starting_currency() -> u32 {
    200
}

fn default_base_health() -> u32 {
    100
}

fn default_seed() -> u64 {
    0x5eed_1a4e_2c0f_fee1
}

/// Everything the surrounding application hands to a new match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Stats of the selected character, used for the champion hero type.
    pub champion: BaseStats,
    /// Gear equipped on the champion.
    #[serde(default)]
    pub gear: Vec<GearModifier>,
    /// Selected difficulty tier.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Currency available when the match starts.
    #[serde(default = "default_starting_currency")]
    pub starting_currency: u32,
    /// Health of the player's base when the match starts.
    #[serde(default = "default_base_health")]
    pub base_health: u32,
    /// Seed for villain subtype selection.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Reward amounts credited by the ledger.
    #[serde(default)]
    pub rewards: Rewards,
    /// Battlefield geometry.
    #[serde(default)]
    pub battlefield: Battlefield,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            champion: BaseStats {
                hp: 100.0,
                damage: 15.0,
                speed: 5.0,
            },
            gear: Vec::new(),
            difficulty: Difficulty::default(),
            starting_currency: default_starting_currency(),
            base_health: default_base_health(),
            seed: default_seed(),
            rewards: Rewards::default(),
            battlefield: Battlefield::default(),
        }
    }
}

impl MatchConfig {
    /// Champion stats: the character's base stats plus every gear delta.
    pub fn champion_stats(&self) -> Result<UnitStats, InvalidStatError> {
        let (hp, damage, speed) = self.gear.iter().fold(
            (self.champion.hp, self.champion.damage, self.champion.speed),
            |(hp, damage, speed), gear| {
                (
                    hp + gear.hp_delta,
                    damage + gear.damage_delta,
                    speed + gear.speed_delta,
                )
            },
        );
        UnitStats::new(hp, damage, speed, ATTACK_INTERVAL_TICKS)
    }

    /// Champion price: the base price plus the price of every piece of gear.
    #[must_use]
    pub fn champion_cost(&self) -> u32 {
        self.gear
            .iter()
            .fold(CHAMPION_BASE_COST, |total, gear| total.saturating_add(gear.cost))
    }
}

/// Stats and price of a purchasable hero type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroEntry {
    /// Hero type.
    pub kind: HeroKind,
    /// Stats a purchased unit spawns with.
    pub stats: UnitStats,
    /// Currency debited per purchase.
    pub cost: u32,
}

/// Purchasable hero types resolved against a match configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroRoster {
    entries: Vec<HeroEntry>,
}

impl HeroRoster {
    /// Resolves catalog heroes and the configured champion.
    pub fn from_config(config: &MatchConfig) -> Result<Self, InvalidStatError> {
        let mut entries = Vec::with_capacity(HeroKind::ALL.len());
        for kind in HeroKind::ALL {
            let entry = match kind.catalog_entry() {
                Some((template, cost)) => HeroEntry {
                    kind,
                    stats: UnitStats::new(
                        template.max_hp,
                        template.damage,
                        template.speed,
                        ATTACK_INTERVAL_TICKS,
                    )?,
                    cost,
                },
                None => HeroEntry {
                    kind,
                    stats: config.champion_stats()?,
                    cost: config.champion_cost(),
                },
            };
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    /// Looks up the entry for a hero type.
    #[must_use]
    pub fn entry(&self, kind: HeroKind) -> Option<&HeroEntry> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }

    /// Iterator over every entry in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &HeroEntry> {
        self.entries.iter()
    }
}
