#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Integration step that advances units and projectiles along the battlefield.

use glam::Vec2;
use lane_siege_core::{Battlefield, Faction, Projectile, Unit};

/// Boundary crossing detected while advancing a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryEvent {
    /// The unit crossed the opposing faction's base line.
    BaseReached {
        /// Faction of the unit that crossed.
        faction: Faction,
    },
}

/// Progress made by a projectile during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileStep {
    /// The projectile is still travelling.
    InFlight,
    /// The projectile reached its captured target point.
    Arrived,
    /// The projectile left the battlefield and must be discarded.
    OutOfBounds,
}

/// Advances a living, unengaged unit by `delta` toward the opposing base.
///
/// Engaged units hold their position. Negative or non-finite deltas are
/// treated as zero so a corrupted speed never moves a unit backwards.
pub fn advance(unit: &mut Unit, delta: f32, battlefield: &Battlefield) -> Option<BoundaryEvent> {
    if !unit.is_alive() || unit.is_engaged() {
        return None;
    }

    let step = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
    let faction = unit.faction();
    let mut position = unit.position();
    position.x += battlefield.heading(faction) * step;
    unit.set_position(position);

    battlefield
        .has_crossed_goal(faction, position.x)
        .then_some(BoundaryEvent::BaseReached { faction })
}

/// Moves a projectile one tick along the straight line toward its target point.
///
/// A projectile arrives once the remaining distance is shorter than its
/// speed, so every projectile resolves within a bounded number of ticks.
pub fn advance_projectile(projectile: &mut Projectile, battlefield: &Battlefield) -> ProjectileStep {
    let position = projectile.position();
    if !battlefield.contains_projectile(position) {
        return ProjectileStep::OutOfBounds;
    }

    let target = projectile.target();
    let offset: Vec2 = target - position;
    let remaining = offset.length();
    if !remaining.is_finite() {
        return ProjectileStep::OutOfBounds;
    }
    if remaining < projectile.speed() {
        projectile.set_position(target);
        return ProjectileStep::Arrived;
    }

    let next = position + offset / remaining * projectile.speed();
    projectile.set_position(next);
    if battlefield.contains_projectile(next) {
        ProjectileStep::InFlight
    } else {
        ProjectileStep::OutOfBounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_siege_core::{HeroKind, ProjectileId, UnitId, UnitKind, UnitStats, VillainKind};

    fn unit(kind: UnitKind, x: f32) -> Unit {
        let stats = UnitStats::new(100.0, 30.0, 2.0, 60).expect("valid stats");
        Unit::spawn(UnitId::new(1), kind, stats, Vec2::new(x, 500.0))
    }

    fn projectile(origin: Vec2, target: Vec2) -> Projectile {
        Projectile::launch(
            ProjectileId::new(1),
            Faction::Hero,
            origin,
            target,
            10.0,
            10.0,
            0,
        )
        .expect("valid projectile")
    }

    #[test]
    fn factions_advance_toward_each_other() {
        let battlefield = Battlefield::default();
        let mut hero = unit(UnitKind::Hero(HeroKind::Knight), 500.0);
        let mut villain = unit(UnitKind::Villain(VillainKind::Goblin), 500.0);

        assert_eq!(advance(&mut hero, 2.0, &battlefield), None);
        assert_eq!(advance(&mut villain, 2.0, &battlefield), None);
        assert_eq!(hero.position().x, 498.0);
        assert_eq!(villain.position().x, 502.0);
    }

    #[test]
    fn engaged_units_are_frozen() {
        let battlefield = Battlefield::default();
        let mut hero = unit(UnitKind::Hero(HeroKind::Knight), 500.0);
        hero.set_target(Some(UnitId::new(9)), true);
        assert_eq!(advance(&mut hero, 2.0, &battlefield), None);
        assert_eq!(hero.position().x, 500.0);

        hero.set_target(Some(UnitId::new(9)), false);
        let _ = advance(&mut hero, 2.0, &battlefield);
        assert_eq!(hero.position().x, 498.0);
    }

    #[test]
    fn crossing_the_opposing_line_reports_base_reached() {
        let battlefield = Battlefield::default();
        let mut hero = unit(UnitKind::Hero(HeroKind::Knight), 1.0);
        assert_eq!(
            advance(&mut hero, 2.0, &battlefield),
            Some(BoundaryEvent::BaseReached {
                faction: Faction::Hero
            })
        );

        let mut villain = unit(UnitKind::Villain(VillainKind::Troll), 999.0);
        assert_eq!(advance(&mut villain, 1.0, &battlefield), None);
        assert_eq!(
            advance(&mut villain, 1.0, &battlefield),
            Some(BoundaryEvent::BaseReached {
                faction: Faction::Villain
            })
        );
    }

    #[test]
    fn corrupted_delta_does_not_move_the_unit() {
        let battlefield = Battlefield::default();
        let mut hero = unit(UnitKind::Hero(HeroKind::Knight), 500.0);
        assert_eq!(advance(&mut hero, f32::NAN, &battlefield), None);
        assert_eq!(advance(&mut hero, -4.0, &battlefield), None);
        assert_eq!(hero.position().x, 500.0);
    }

    #[test]
    fn projectile_arrives_within_bounded_ticks() {
        let battlefield = Battlefield::default();
        let mut shot = projectile(Vec2::new(500.0, 500.0), Vec2::new(405.0, 500.0));

        let mut steps = 0;
        loop {
            steps += 1;
            match advance_projectile(&mut shot, &battlefield) {
                ProjectileStep::InFlight => assert!(steps < 20, "projectile never arrived"),
                ProjectileStep::Arrived => break,
                ProjectileStep::OutOfBounds => panic!("projectile left the field"),
            }
        }
        assert_eq!(steps, 10);
        assert_eq!(shot.position(), Vec2::new(405.0, 500.0));
    }

    #[test]
    fn projectile_leaving_the_field_is_out_of_bounds() {
        let battlefield = Battlefield::default();
        let mut shot = projectile(Vec2::new(-45.0, 500.0), Vec2::new(-200.0, 500.0));
        assert_eq!(
            advance_projectile(&mut shot, &battlefield),
            ProjectileStep::OutOfBounds
        );
    }
}
