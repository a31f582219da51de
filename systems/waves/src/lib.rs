#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler deciding which villains each wave spawns and when a wave is cleared.

use lane_siege_core::{
    Difficulty, InvalidStatError, Unit, UnitId, UnitStats, VillainKind, ATTACK_INTERVAL_TICKS,
};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

/// Horizontal gap between consecutive villains of a wave at spawn time.
pub const VILLAIN_SPACING: f32 = 60.0;

const BASE_SPAWN_COUNT: u32 = 2;
const HP_PER_WAVE: f32 = 20.0;
const DAMAGE_PER_WAVE: f32 = 5.0;
const SPEED_PER_WAVE: f32 = 0.1;

const EARLY_POOL: [VillainKind; 1] = [VillainKind::Goblin];
const MIDDLE_POOL: [VillainKind; 2] = [VillainKind::Goblin, VillainKind::Orc];
const LATE_POOL: [VillainKind; 3] = [VillainKind::Goblin, VillainKind::Orc, VillainKind::Troll];

/// Number of villains spawned by `wave` on the provided difficulty.
///
/// Regular waves grow linearly up to the difficulty's ceiling. Boss waves
/// spawn the boss alone and wave zero spawns nothing.
#[must_use]
pub fn spawn_count_for_wave(wave: u32, difficulty: Difficulty) -> u32 {
    if wave == 0 {
        return 0;
    }
    if is_boss_wave(wave, difficulty) {
        return 1;
    }
    wave.saturating_add(BASE_SPAWN_COUNT).min(difficulty.spawn_ceiling())
}

/// Reports whether `wave` spawns the boss on the provided difficulty.
#[must_use]
pub fn is_boss_wave(wave: u32, difficulty: Difficulty) -> bool {
    match difficulty.boss_period() {
        Some(period) if period > 0 && wave > 0 => wave % period == 0,
        _ => false,
    }
}

/// Villain types a regular wave may draw from.
#[must_use]
pub fn villain_pool(wave: u32) -> &'static [VillainKind] {
    match wave {
        0..=2 => &EARLY_POOL,
        3..=4 => &MIDDLE_POOL,
        _ => &LATE_POOL,
    }
}

/// Villain stats after wave and difficulty scaling.
pub fn scaled_stats(
    kind: VillainKind,
    wave: u32,
    difficulty: Difficulty,
) -> Result<UnitStats, InvalidStatError> {
    let template = kind.template();
    let wave = wave as f32;
    let multiplier = difficulty.stat_multiplier();
    UnitStats::new(
        (template.max_hp + HP_PER_WAVE * wave) * multiplier,
        (template.damage + DAMAGE_PER_WAVE * wave) * multiplier,
        template.speed + SPEED_PER_WAVE * wave,
        ATTACK_INTERVAL_TICKS,
    )
}

/// A villain the world should spawn for the current wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VillainSpawn {
    /// Villain type.
    pub kind: VillainKind,
    /// Scaled stats.
    pub stats: UnitStats,
    /// Position in the spawn column; higher ranks spawn further back.
    pub rank: u32,
}

/// Villains spawned together by one wave.
#[derive(Clone, Debug, PartialEq)]
pub struct WavePlan {
    /// One-based wave number.
    pub wave: u32,
    /// Whether the wave is a boss wave.
    pub boss: bool,
    /// Villains in spawn order.
    pub villains: Vec<VillainSpawn>,
}

/// Tracks wave progression and the villains spawned by the current wave.
#[derive(Debug)]
pub struct WaveScheduler {
    difficulty: Difficulty,
    rng: ChaCha8Rng,
    wave: u32,
    spawned: bool,
    members: Vec<UnitId>,
}

impl WaveScheduler {
    /// Creates a scheduler positioned on wave one, before its spawn step.
    #[must_use]
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: ChaCha8Rng::seed_from_u64(seed),
            wave: 1,
            spawned: false,
            members: Vec::new(),
        }
    }

    /// Current one-based wave number.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Number of waves that must be cleared for victory.
    #[must_use]
    pub const fn max_waves(&self) -> u32 {
        self.difficulty.max_waves()
    }

    /// Reports whether the current wave is the last one.
    #[must_use]
    pub const fn is_final_wave(&self) -> bool {
        self.wave >= self.difficulty.max_waves()
    }

    /// Reports whether the current wave already executed its spawn step.
    #[must_use]
    pub const fn has_spawned(&self) -> bool {
        self.spawned
    }

    /// Plans the villains of the current wave, or `None` if they already spawned.
    pub fn plan(&mut self) -> Option<WavePlan> {
        if self.spawned || self.wave == 0 {
            return None;
        }

        let wave = self.wave;
        let boss = is_boss_wave(wave, self.difficulty);
        let count = spawn_count_for_wave(wave, self.difficulty);
        let mut villains = Vec::with_capacity(count as usize);
        for rank in 0..count {
            let kind = if boss {
                VillainKind::Dragon
            } else {
                villain_pool(wave)
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or(VillainKind::Goblin)
            };
            match scaled_stats(kind, wave, self.difficulty) {
                Ok(stats) => villains.push(VillainSpawn { kind, stats, rank }),
                Err(error) => warn!(wave, ?kind, %error, "villain skipped"),
            }
        }

        info!(wave, boss, villains = villains.len(), "wave planned");
        Some(WavePlan {
            wave,
            boss,
            villains,
        })
    }

    /// Records the villains spawned for the current wave and closes its spawn step.
    pub fn record_spawned<I>(&mut self, units: I)
    where
        I: IntoIterator<Item = UnitId>,
    {
        self.members.extend(units);
        self.spawned = true;
    }

    /// Reports whether `wave` is the current wave and every villain it spawned is gone.
    ///
    /// A wave whose spawn step has not run, or that spawned nothing, is never complete.
    #[must_use]
    pub fn is_wave_complete(&self, wave: u32, roster: &[Unit]) -> bool {
        if wave != self.wave || !self.spawned || self.members.is_empty() {
            return false;
        }

        self.members.iter().all(|member| {
            roster
                .iter()
                .find(|unit| unit.id() == *member)
                .map_or(true, |unit| !unit.is_alive())
        })
    }

    /// Moves on to the next wave, whose villains spawn on the next tick.
    pub fn advance_wave(&mut self) -> u32 {
        self.wave = self.wave.saturating_add(1);
        self.spawned = false;
        self.members.clear();
        self.wave
    }
}
