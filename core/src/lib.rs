#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Siege battle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing operator intents and the passage of time, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values describing everything that happened. Rendering consumes immutable
//! [`FrameSnapshot`] values and never mutates simulation state.

mod catalog;
mod config;
mod ledger;
mod unit;

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use catalog::{
    AttackStyle, Difficulty, Faction, HeroKind, SuperpowerDefinition, SuperpowerEffect,
    SuperpowerId, UnitKind, UnitTemplate, VillainKind, ATTACK_INTERVAL_TICKS, CHAMPION_BASE_COST,
    ENGAGEMENT_MARGIN, MELEE_ATTACK_RANGE, RANGED_ATTACK_RANGE,
};
pub use config::{Battlefield, BaseStats, Facing, GearModifier, HeroEntry, HeroRoster, MatchConfig};
pub use ledger::{Ledger, LedgerError, LedgerSnapshot, Reward, Rewards};
pub use unit::{
    DamageOutcome, InvalidStatError, Projectile, ProjectileId, StatKind, Unit, UnitId, UnitStats,
};

/// Canonical banner emitted when a match boots.
pub const WELCOME_BANNER: &str = "Welcome to Lane Siege.";

/// Number of simulation ticks that make up one second of match time.
pub const TICKS_PER_SECOND: u32 = 60;

/// Finite state machine of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPhase {
    /// Ticks execute and time-based state advances.
    Playing,
    /// The operator suspended the match; no time-based state advances.
    Paused,
    /// The current wave was cleared and the match waits for the next wave to be started.
    WaveComplete,
    /// The final wave was cleared.
    Victory,
    /// The player's base was destroyed.
    Defeat,
}

impl MatchPhase {
    /// Reports whether the phase ends the match.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::WaveComplete => "wave complete",
            Self::Victory => "victory",
            Self::Defeat => "defeat",
        };
        f.write_str(label)
    }
}

/// Reasons an operator intent is declined without side effects.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    /// The ledger holds less currency than the intent costs.
    #[error("insufficient currency: costs {cost}, have {available}")]
    InsufficientCurrency {
        /// Price of the declined intent.
        cost: u32,
        /// Currency held when the intent was evaluated.
        available: u32,
    },
    /// The superpower is still recharging.
    #[error("superpower on cooldown for another {remaining:?}")]
    OnCooldown {
        /// Time left before the superpower becomes available.
        remaining: Duration,
    },
    /// The intent is not accepted in the current match phase.
    #[error("intent not accepted while the match is {phase}")]
    InvalidPhase {
        /// Phase the match was in.
        phase: MatchPhase,
    },
    /// The intent referenced a hero type that does not exist.
    #[error("unknown hero type `{id}`")]
    UnknownHeroType {
        /// Identifier supplied by the caller.
        id: String,
    },
}

impl From<LedgerError> for IntentError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::InsufficientFunds {
                requested,
                available,
            } => Self::InsufficientCurrency {
                cost: requested,
                available,
            },
        }
    }
}

/// Operator actions accepted by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "intent")]
pub enum Intent {
    /// Purchases and spawns a hero at the player's base.
    SpawnHero {
        /// Hero type to purchase.
        hero: HeroKind,
    },
    /// Fires a superpower.
    InvokeSuperpower {
        /// Superpower to fire.
        superpower: SuperpowerId,
    },
    /// Toggles between playing and paused.
    TogglePause,
    /// Leaves the wave-complete pause and starts the next wave.
    StartNextWave,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one tick.
    Tick {
        /// Wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Submits an operator intent.
    Submit {
        /// Intent to evaluate.
        intent: Intent,
    },
}

impl From<Intent> for Command {
    fn from(intent: Intent) -> Self {
        Self::Submit { intent }
    }
}

/// Events broadcast by the world after executing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that a tick executed.
    TimeAdvanced {
        /// Number of ticks executed since the match started, including this one.
        tick: u64,
        /// Wall-clock time attributed to the tick.
        dt: Duration,
    },
    /// Confirms that an intent was queued for the next tick.
    IntentQueued {
        /// Intent that was queued.
        intent: Intent,
    },
    /// Reports that an intent was declined without side effects.
    IntentRejected {
        /// Intent that was declined.
        intent: Intent,
        /// Reason for the rejection.
        reason: IntentError,
    },
    /// Announces that the villains of a wave were spawned.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Number of villains spawned.
        villains: u32,
        /// Whether the wave is a boss wave.
        boss: bool,
    },
    /// Confirms that a unit entered the battlefield.
    UnitSpawned {
        /// Identifier assigned to the unit.
        unit: UnitId,
        /// Type of the unit.
        kind: UnitKind,
        /// Position the unit spawned at.
        position: Vec2,
    },
    /// Reports that a unit acquired, switched or dropped its target.
    TargetChanged {
        /// Unit whose target changed.
        unit: UnitId,
        /// New target, if any.
        target: Option<UnitId>,
    },
    /// Reports that a melee attack landed.
    UnitStruck {
        /// Attacking unit.
        attacker: UnitId,
        /// Defending unit.
        defender: UnitId,
        /// Damage applied.
        damage: f32,
    },
    /// Reports that a ranged attack launched a projectile.
    ProjectileLaunched {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Unit that fired the projectile.
        attacker: UnitId,
        /// Point the projectile travels toward.
        target: Vec2,
    },
    /// Reports that a projectile arrived and applied its damage.
    ProjectileResolved {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Units damaged by the impact.
        hits: Vec<UnitId>,
    },
    /// Reports that a projectile left the battlefield without arriving.
    ProjectileDiscarded {
        /// Identifier of the projectile.
        projectile: ProjectileId,
    },
    /// Reports that a unit was defeated and removed.
    UnitKilled {
        /// Defeated unit.
        unit: UnitId,
        /// Type of the defeated unit.
        kind: UnitKind,
        /// Credit awarded to the player, if the kill was monetized.
        reward: Option<Reward>,
    },
    /// Reports that a unit crossed the opposing base line and was removed.
    BaseReached {
        /// Unit that crossed the line.
        unit: UnitId,
        /// Faction of the unit.
        faction: Faction,
        /// Credit awarded to the player, if any.
        reward: Option<Reward>,
        /// Damage dealt to the player's base.
        base_damage: u32,
    },
    /// Confirms that a superpower fired.
    SuperpowerInvoked {
        /// Superpower that fired.
        superpower: SuperpowerId,
        /// Units affected by the effect.
        affected: Vec<UnitId>,
    },
    /// Reports that a timed effect on a unit ended.
    EffectExpired {
        /// Unit whose effect ended.
        unit: UnitId,
    },
    /// Reports that every villain of a wave was removed.
    WaveCompleted {
        /// One-based wave number.
        wave: u32,
    },
    /// Reports that the start-next-wave bonus was paid.
    WaveBonusAwarded {
        /// Wave that is about to start.
        wave: u32,
        /// Currency credited.
        amount: u32,
    },
    /// Announces that the match entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: MatchPhase,
    },
}

/// A unit defeated by a system, together with the credit its defeat earned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Casualty {
    /// Defeated unit.
    pub unit: UnitId,
    /// Type of the defeated unit.
    pub kind: UnitKind,
    /// Credit awarded to the player, if the kill was monetized.
    pub reward: Option<Reward>,
}

impl From<Casualty> for Event {
    fn from(casualty: Casualty) -> Self {
        Self::UnitKilled {
            unit: casualty.unit,
            kind: casualty.kind,
            reward: casualty.reward,
        }
    }
}

/// Target selected by the targeting system for a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetAssignment {
    /// Unit the assignment belongs to.
    pub unit: UnitId,
    /// Selected target, if any.
    pub target: Option<UnitId>,
    /// Whether the target lies within the unit's attack range.
    pub engaged: bool,
}

/// Read-only view of a unit for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Identifier of the unit.
    pub id: UnitId,
    /// Type of the unit.
    pub kind: UnitKind,
    /// Faction of the unit.
    pub faction: Faction,
    /// Current position.
    pub position: Vec2,
    /// Collision radius.
    pub size: f32,
    /// Current hit points divided by maximum hit points.
    pub hp_fraction: f32,
    /// Whether the unit is standing and fighting.
    pub attacking: bool,
}

impl UnitSnapshot {
    /// Captures the renderable state of a unit.
    #[must_use]
    pub fn from_unit(unit: &Unit) -> Self {
        Self {
            id: unit.id(),
            kind: unit.kind(),
            faction: unit.faction(),
            position: unit.position(),
            size: unit.size(),
            hp_fraction: unit.hp_fraction(),
            attacking: unit.is_engaged(),
        }
    }
}

/// Read-only view of a projectile for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Faction that fired the projectile.
    pub owner: Faction,
    /// Current position.
    pub position: Vec2,
}

/// Availability of a superpower for button enablement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuperpowerStatus {
    /// Superpower described by the status.
    pub id: SuperpowerId,
    /// Time left before the superpower recharges.
    pub remaining: Duration,
    /// Currency required to fire the superpower.
    pub cost: u32,
    /// Whether the ledger currently holds enough currency.
    pub affordable: bool,
}

impl SuperpowerStatus {
    /// Reports whether an invocation would currently succeed.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.affordable && self.remaining.is_zero()
    }
}

/// Heads-up display values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Current one-based wave number.
    pub wave: u32,
    /// Number of waves required for victory.
    pub max_waves: u32,
    /// Spendable currency.
    pub currency: u32,
    /// Accumulated score.
    pub score: u32,
    /// Remaining base health.
    pub base_health: u32,
    /// Active match phase.
    pub phase: MatchPhase,
}

/// Complete read-only view of a match at a tick boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Number of ticks executed so far.
    pub tick: u64,
    /// Heads-up display values.
    pub hud: Hud,
    /// Living units in roster order.
    pub units: Vec<UnitSnapshot>,
    /// Projectiles in flight in launch order.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Superpower availability in catalog order.
    pub superpowers: Vec<SuperpowerStatus>,
}

/// Results handed to the surrounding application when leaving a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Score accumulated during the match.
    pub final_score: u32,
    /// Currency carried over into meta-progression.
    pub currency_earned: u32,
    /// Whether the match ended in victory.
    pub victory: bool,
    /// Last wave reached.
    pub wave: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_phases_are_victory_and_defeat() {
        assert!(MatchPhase::Victory.is_terminal());
        assert!(MatchPhase::Defeat.is_terminal());
        assert!(!MatchPhase::Paused.is_terminal());
        assert!(!MatchPhase::WaveComplete.is_terminal());
    }

    #[test]
    fn ledger_shortfall_maps_to_insufficient_currency() {
        let error = IntentError::from(LedgerError::InsufficientFunds {
            requested: 70,
            available: 20,
        });
        assert_eq!(
            error,
            IntentError::InsufficientCurrency {
                cost: 70,
                available: 20
            }
        );
        assert_eq!(error.to_string(), "insufficient currency: costs 70, have 20");
    }

    #[test]
    fn intents_convert_into_submit_commands() {
        let command = Command::from(Intent::TogglePause);
        assert_eq!(
            command,
            Command::Submit {
                intent: Intent::TogglePause
            }
        );
    }

    #[test]
    fn superpower_status_requires_funds_and_charge() {
        let status = SuperpowerStatus {
            id: SuperpowerId::BattleHeal,
            remaining: Duration::ZERO,
            cost: 70,
            affordable: true,
        };
        assert!(status.is_available());
        assert!(!SuperpowerStatus {
            remaining: Duration::from_millis(100),
            ..status
        }
        .is_available());
    }

    #[test]
    fn match_summary_round_trips_through_bincode() {
        let summary = MatchSummary {
            final_score: 300,
            currency_earned: 450,
            victory: true,
            wave: 3,
        };
        let bytes = bincode::serialize(&summary).expect("serialize summary");
        let decoded: MatchSummary = bincode::deserialize(&bytes).expect("deserialize summary");
        assert_eq!(decoded, summary);
    }

    #[test]
    fn intents_deserialize_from_tagged_toml() {
        #[derive(Deserialize)]
        struct Script {
            steps: Vec<Intent>,
        }

        let script: Script = toml::from_str(
            r#"
            [[steps]]
            intent = "spawn-hero"
            hero = "archer"

            [[steps]]
            intent = "invoke-superpower"
            superpower = "battle-heal"

            [[steps]]
            intent = "start-next-wave"
            "#,
        )
        .expect("valid script");

        assert_eq!(
            script.steps,
            vec![
                Intent::SpawnHero {
                    hero: HeroKind::Archer
                },
                Intent::InvokeSuperpower {
                    superpower: SuperpowerId::BattleHeal
                },
                Intent::StartNextWave,
            ]
        );
    }
}
