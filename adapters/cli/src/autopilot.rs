//! Scripted operator that plays a match without human input.

use lane_siege_core::{Faction, HeroKind, Intent, MatchPhase, SuperpowerId, Unit};
use lane_siege_world::{query, World};

/// Villains that must be on the field before a rocket strike is worth its cost.
const ROCKET_CROWD: usize = 3;

/// Chooses intents from the world state each frame.
///
/// Heroes are purchased in catalog rotation whenever the next one is
/// affordable. Battle Heal is cast once any hero drops below half health and
/// Rocket Strike is cast into crowds. Cleared waves are followed immediately
/// by the next one.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    rotation: usize,
}

impl Autopilot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends the intents to submit before the next tick.
    pub(crate) fn decide(&mut self, world: &World, out: &mut Vec<Intent>) {
        match query::phase(world) {
            MatchPhase::WaveComplete => {
                out.push(Intent::StartNextWave);
                return;
            }
            MatchPhase::Playing => {}
            MatchPhase::Paused | MatchPhase::Victory | MatchPhase::Defeat => return,
        }

        // Queued intents are applied by the next tick; wait for them to land.
        if query::pending_intents(world) > 0 {
            return;
        }

        let units = query::units(world);
        let mut budget = query::ledger(world).currency;
        let statuses = query::superpowers(world);
        let cast = |superpower: SuperpowerId, budget: &mut u32, out: &mut Vec<Intent>| {
            let Some(status) = statuses.iter().find(|status| status.id == superpower) else {
                return;
            };
            if status.remaining.is_zero() && status.cost <= *budget {
                *budget -= status.cost;
                out.push(Intent::InvokeSuperpower { superpower });
            }
        };

        if units.iter().any(is_wounded_hero) {
            cast(SuperpowerId::BattleHeal, &mut budget, out);
        }
        let villains = units
            .iter()
            .filter(|unit| unit.faction() == Faction::Villain)
            .count();
        if villains >= ROCKET_CROWD {
            cast(SuperpowerId::RocketStrike, &mut budget, out);
        }

        let hero = HeroKind::ALL[self.rotation % HeroKind::ALL.len()];
        let affordable = query::hero_roster(world)
            .entry(hero)
            .is_some_and(|entry| entry.cost <= budget);
        if affordable {
            self.rotation = self.rotation.wrapping_add(1);
            out.push(Intent::SpawnHero { hero });
        }
    }
}

fn is_wounded_hero(unit: &Unit) -> bool {
    unit.faction() == Faction::Hero && unit.is_alive() && unit.hp_fraction() < 0.5
}
