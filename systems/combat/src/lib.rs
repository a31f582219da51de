#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves melee strikes, ranged launches and projectile impacts.

use lane_siege_core::{
    AttackStyle, Casualty, DamageOutcome, Ledger, Projectile, ProjectileId, Unit, UnitId,
};
use tracing::{debug, warn};

/// Distance travelled by a projectile every tick.
pub const PROJECTILE_SPEED: f32 = 10.0;
/// Splash radius of a projectile impact, before the struck unit's own size.
pub const IMPACT_RADIUS: f32 = 30.0;

/// Result of asking an attacker to attack a defender.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Preconditions did not hold; nothing changed.
    Idle,
    /// A melee strike landed this tick.
    Struck {
        /// Damage applied to the defender.
        damage: f32,
        /// Set when the strike defeated the defender.
        casualty: Option<Casualty>,
    },
    /// A ranged attack launched a projectile; damage is applied on arrival.
    Launched {
        /// Projectile in flight.
        projectile: Projectile,
    },
}

/// Damage dealt by a single projectile arrival.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Impact {
    /// Units that took damage, in roster order.
    pub hits: Vec<UnitId>,
    /// Units defeated by the impact, in roster order.
    pub casualties: Vec<Casualty>,
}

/// Combat resolver that allocates identifiers for the projectiles it launches.
#[derive(Debug, Default)]
pub struct Combat {
    next_projectile: u32,
}

impl Combat {
    /// Creates a resolver whose first projectile receives identifier zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves one attack of `attacker` against `defender`.
    ///
    /// The call is a no-op returning [`Outcome::Idle`] unless both units are
    /// alive and opposed, the attacker's cooldown has elapsed and the defender
    /// lies within the attacker's attack range. Melee kills are credited to
    /// the ledger immediately; ranged attacks defer damage and credit to
    /// [`resolve_impact`].
    pub fn resolve(
        &mut self,
        attacker: &mut Unit,
        defender: &mut Unit,
        tick: u64,
        ledger: &mut Ledger,
    ) -> Outcome {
        if !attacker.is_alive() || !defender.is_alive() {
            return Outcome::Idle;
        }
        if attacker.faction() == defender.faction() || !attacker.is_ready() {
            return Outcome::Idle;
        }
        let distance = attacker.distance_to(defender);
        if distance.is_nan() || distance > attacker.attack_range() {
            return Outcome::Idle;
        }

        match attacker.attack_style() {
            AttackStyle::Melee => {
                let damage = attacker.damage();
                attacker.reset_cooldown();
                let casualty = match defender.apply_damage(damage) {
                    DamageOutcome::Killed => {
                        let reward = ledger.award_kill(attacker.faction(), defender.kind());
                        debug!(
                            attacker = ?attacker.id(),
                            defender = ?defender.id(),
                            ?reward,
                            "melee kill"
                        );
                        Some(Casualty {
                            unit: defender.id(),
                            kind: defender.kind(),
                            reward,
                        })
                    }
                    DamageOutcome::Wounded | DamageOutcome::Ignored => None,
                };
                Outcome::Struck { damage, casualty }
            }
            AttackStyle::Ranged => {
                let id = ProjectileId::new(self.next_projectile);
                match Projectile::launch(
                    id,
                    attacker.faction(),
                    attacker.position(),
                    defender.position(),
                    attacker.damage(),
                    PROJECTILE_SPEED,
                    tick,
                ) {
                    Ok(projectile) => {
                        self.next_projectile = self.next_projectile.wrapping_add(1);
                        attacker.reset_cooldown();
                        Outcome::Launched { projectile }
                    }
                    Err(error) => {
                        warn!(attacker = ?attacker.id(), %error, "projectile launch refused");
                        Outcome::Idle
                    }
                }
            }
        }
    }
}

/// Applies an arrived projectile's damage to every living opponent near its impact point.
///
/// A unit is hit when its centre lies within [`IMPACT_RADIUS`] plus half its
/// size of the point captured at launch. Kills by a hero projectile are
/// credited to the ledger.
pub fn resolve_impact(projectile: &Projectile, roster: &mut [Unit], ledger: &mut Ledger) -> Impact {
    let point = projectile.target();
    let victims = projectile.owner().opponent();
    let mut impact = Impact::default();

    for unit in roster
        .iter_mut()
        .filter(|unit| unit.is_alive() && unit.faction() == victims)
    {
        let reach = IMPACT_RADIUS + unit.size() / 2.0;
        if unit.position().distance(point) > reach {
            continue;
        }

        match unit.apply_damage(projectile.damage()) {
            DamageOutcome::Killed => {
                impact.hits.push(unit.id());
                let reward = ledger.award_kill(projectile.owner(), unit.kind());
                impact.casualties.push(Casualty {
                    unit: unit.id(),
                    kind: unit.kind(),
                    reward,
                });
            }
            DamageOutcome::Wounded => impact.hits.push(unit.id()),
            DamageOutcome::Ignored => {}
        }
    }

    if !impact.casualties.is_empty() {
        debug!(
            projectile = ?projectile.id(),
            kills = impact.casualties.len(),
            "projectile impact"
        );
    }
    impact
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use lane_siege_core::{Faction, HeroKind, Rewards, UnitKind, UnitStats, VillainKind};

    fn unit(id: u32, kind: UnitKind, hp: f32, damage: f32, x: f32) -> Unit {
        let stats = UnitStats::new(hp, damage, 1.0, 60).expect("valid stats");
        Unit::spawn(UnitId::new(id), kind, stats, Vec2::new(x, 500.0))
    }

    fn ledger() -> Ledger {
        Ledger::new(0, 100, Rewards::default())
    }

    #[test]
    fn melee_strike_applies_damage_and_resets_cooldown() {
        let mut combat = Combat::new();
        let mut ledger = ledger();
        let mut hero = unit(1, UnitKind::Hero(HeroKind::Knight), 50.0, 20.0, 500.0);
        let mut villain = unit(2, UnitKind::Villain(VillainKind::Goblin), 30.0, 10.0, 460.0);

        let outcome = combat.resolve(&mut hero, &mut villain, 1, &mut ledger);
        assert_eq!(
            outcome,
            Outcome::Struck {
                damage: 20.0,
                casualty: None
            }
        );
        assert_eq!(villain.hp(), 10.0);
        assert_eq!(hero.cooldown(), 60);

        assert_eq!(
            combat.resolve(&mut hero, &mut villain, 2, &mut ledger),
            Outcome::Idle
        );
        assert_eq!(villain.hp(), 10.0);
    }

    #[test]
    fn melee_kill_by_hero_is_credited() {
        let mut combat = Combat::new();
        let mut ledger = ledger();
        let mut hero = unit(1, UnitKind::Hero(HeroKind::Knight), 50.0, 40.0, 500.0);
        let mut villain = unit(2, UnitKind::Villain(VillainKind::Orc), 30.0, 10.0, 460.0);

        let outcome = combat.resolve(&mut hero, &mut villain, 1, &mut ledger);
        let Outcome::Struck {
            casualty: Some(casualty),
            ..
        } = outcome
        else {
            panic!("expected a kill, got {outcome:?}");
        };
        assert_eq!(casualty.unit, UnitId::new(2));
        assert!(casualty.reward.is_some());
        assert_eq!(ledger.score(), 25);
        assert_eq!(ledger.currency(), 10);
    }

    #[test]
    fn villain_kills_are_not_monetized() {
        let mut combat = Combat::new();
        let mut ledger = ledger();
        let mut villain = unit(1, UnitKind::Villain(VillainKind::Troll), 100.0, 80.0, 460.0);
        let mut hero = unit(2, UnitKind::Hero(HeroKind::Archer), 30.0, 10.0, 500.0);

        let outcome = combat.resolve(&mut villain, &mut hero, 1, &mut ledger);
        assert!(matches!(
            outcome,
            Outcome::Struck {
                casualty: Some(Casualty { reward: None, .. }),
                ..
            }
        ));
        assert_eq!(ledger.snapshot().score, 0);
    }

    #[test]
    fn out_of_range_and_same_faction_attacks_are_ignored() {
        let mut combat = Combat::new();
        let mut ledger = ledger();
        let mut hero = unit(1, UnitKind::Hero(HeroKind::Knight), 50.0, 20.0, 500.0);
        let mut far = unit(2, UnitKind::Villain(VillainKind::Goblin), 30.0, 10.0, 420.0);
        let mut ally = unit(3, UnitKind::Hero(HeroKind::Tank), 30.0, 10.0, 490.0);

        assert_eq!(
            combat.resolve(&mut hero, &mut far, 1, &mut ledger),
            Outcome::Idle
        );
        assert_eq!(
            combat.resolve(&mut hero, &mut ally, 1, &mut ledger),
            Outcome::Idle
        );
        assert!(hero.is_ready());
    }

    #[test]
    fn ranged_attack_launches_toward_current_position() {
        let mut combat = Combat::new();
        let mut ledger = ledger();
        let mut archer = unit(1, UnitKind::Hero(HeroKind::Archer), 60.0, 35.0, 500.0);
        let mut villain = unit(2, UnitKind::Villain(VillainKind::Goblin), 40.0, 10.0, 410.0);

        let outcome = combat.resolve(&mut archer, &mut villain, 7, &mut ledger);
        let Outcome::Launched { projectile } = outcome else {
            panic!("expected a launch, got {outcome:?}");
        };
        assert_eq!(projectile.id(), ProjectileId::new(0));
        assert_eq!(projectile.owner(), Faction::Hero);
        assert_eq!(projectile.target(), Vec2::new(410.0, 500.0));
        assert_eq!(projectile.launched_at(), 7);
        assert_eq!(villain.hp(), 40.0);
        assert!(!archer.is_ready());
    }

    #[test]
    fn impact_hits_opponents_near_the_point_only() {
        let mut ledger = ledger();
        let projectile = Projectile::launch(
            ProjectileId::new(3),
            Faction::Hero,
            Vec2::new(500.0, 500.0),
            Vec2::new(400.0, 500.0),
            35.0,
            PROJECTILE_SPEED,
            0,
        )
        .expect("valid projectile");
        let mut roster = vec![
            unit(1, UnitKind::Villain(VillainKind::Goblin), 30.0, 10.0, 410.0),
            unit(2, UnitKind::Villain(VillainKind::Orc), 80.0, 10.0, 435.0),
            unit(3, UnitKind::Villain(VillainKind::Orc), 80.0, 10.0, 480.0),
            unit(4, UnitKind::Hero(HeroKind::Knight), 80.0, 10.0, 400.0),
        ];

        let impact = resolve_impact(&projectile, &mut roster, &mut ledger);
        assert_eq!(impact.hits, vec![UnitId::new(1), UnitId::new(2)]);
        assert_eq!(impact.casualties.len(), 1);
        assert_eq!(impact.casualties[0].unit, UnitId::new(1));
        assert_eq!(roster[1].hp(), 45.0);
        assert_eq!(roster[2].hp(), 80.0);
        assert_eq!(roster[3].hp(), 80.0);
        assert_eq!(ledger.score(), 25);
    }
}
