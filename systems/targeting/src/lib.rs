#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that assigns every living unit its target for the tick.

use lane_siege_core::{Battlefield, Faction, TargetAssignment, Unit, UnitId};

/// Targeting system that reuses a scratch buffer to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct Targeting {
    candidates: Vec<Candidate>,
}

impl Targeting {
    /// Creates a new targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes target assignments for every living unit of the roster.
    ///
    /// Units are visited in roster order and every unit observes the same
    /// roster, so the outcome does not depend on assignments made earlier in
    /// the same pass. Units staged off the lane neither target nor get
    /// targeted. The output buffer is cleared before populating it.
    pub fn handle(
        &mut self,
        roster: &[Unit],
        battlefield: &Battlefield,
        out: &mut Vec<TargetAssignment>,
    ) {
        out.clear();
        self.prepare_candidates(roster, battlefield);
        for unit in roster.iter().filter(|unit| unit.is_alive()) {
            let selection = select(unit, &self.candidates, battlefield);
            out.push(TargetAssignment {
                unit: unit.id(),
                target: selection.map(|best| best.id),
                engaged: selection.is_some_and(|best| best.distance <= unit.attack_range()),
            });
        }
    }

    fn prepare_candidates(&mut self, roster: &[Unit], battlefield: &Battlefield) {
        self.candidates.clear();
        self.candidates.reserve(roster.len());
        self.candidates.extend(candidates(roster, battlefield));
    }
}

/// Picks the target `unit` should pursue among the provided roster.
///
/// A living current target inside the engagement radius is retained.
/// Otherwise the nearest living opponent inside the engagement radius is
/// chosen, with ties going to the unit encountered first in roster order.
/// Nothing is selected for or against units outside the battlefield bounds.
#[must_use]
pub fn select_target(unit: &Unit, roster: &[Unit], battlefield: &Battlefield) -> Option<UnitId> {
    let candidates: Vec<Candidate> = candidates(roster, battlefield).collect();
    select(unit, &candidates, battlefield).map(|best| best.id)
}

fn candidates<'a>(
    roster: &'a [Unit],
    battlefield: &'a Battlefield,
) -> impl Iterator<Item = Candidate> + 'a {
    roster
        .iter()
        .filter(|unit| unit.is_alive() && battlefield.is_on_field(unit.position().x))
        .map(Candidate::from_unit)
}

fn select(unit: &Unit, candidates: &[Candidate], battlefield: &Battlefield) -> Option<Selection> {
    if !unit.is_alive() || !battlefield.is_on_field(unit.position().x) {
        return None;
    }

    let opponent = unit.faction().opponent();
    let x = unit.position().x;
    let radius = unit.engagement_radius();

    if let Some(current) = unit.target() {
        let retained = candidates
            .iter()
            .find(|candidate| candidate.id == current && candidate.faction == opponent)
            .map(|candidate| Selection {
                id: candidate.id,
                distance: (candidate.x - x).abs(),
            })
            .filter(|selection| selection.distance <= radius);
        if retained.is_some() {
            return retained;
        }
    }

    let mut best: Option<Selection> = None;
    for candidate in candidates.iter().filter(|candidate| candidate.faction == opponent) {
        let distance = (candidate.x - x).abs();
        if distance.is_nan() || distance > radius {
            continue;
        }

        let current = Selection {
            id: candidate.id,
            distance,
        };
        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }
    best
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: UnitId,
    faction: Faction,
    x: f32,
}

impl Candidate {
    fn from_unit(unit: &Unit) -> Self {
        Self {
            id: unit.id(),
            faction: unit.faction(),
            x: unit.position().x,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Selection {
    id: UnitId,
    distance: f32,
}

impl Selection {
    // Strictly closer only: equal distances keep the earlier roster entry.
    fn precedes(&self, other: &Self) -> bool {
        self.distance < other.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use lane_siege_core::{HeroKind, UnitKind, UnitStats, VillainKind};

    fn unit(id: u32, kind: UnitKind, x: f32) -> Unit {
        let stats = UnitStats::new(50.0, 10.0, 1.0, 60).expect("valid stats");
        Unit::spawn(UnitId::new(id), kind, stats, Vec2::new(x, 500.0))
    }

    fn knight(id: u32, x: f32) -> Unit {
        unit(id, UnitKind::Hero(HeroKind::Knight), x)
    }

    fn archer(id: u32, x: f32) -> Unit {
        unit(id, UnitKind::Hero(HeroKind::Archer), x)
    }

    fn goblin(id: u32, x: f32) -> Unit {
        unit(id, UnitKind::Villain(VillainKind::Goblin), x)
    }

    fn pick(roster: &[Unit]) -> Option<UnitId> {
        select_target(&roster[0], roster, &Battlefield::default())
    }

    #[test]
    fn nearest_opponent_inside_radius_is_selected() {
        let roster = vec![knight(1, 500.0), goblin(2, 420.0), goblin(3, 450.0)];
        assert_eq!(pick(&roster), Some(UnitId::new(3)));
    }

    #[test]
    fn equal_distances_pick_first_in_roster_order() {
        let roster = vec![knight(1, 500.0), goblin(7, 450.0), goblin(3, 550.0)];
        for _ in 0..8 {
            assert_eq!(pick(&roster), Some(UnitId::new(7)));
        }

        let reordered = vec![knight(1, 500.0), goblin(3, 550.0), goblin(7, 450.0)];
        assert_eq!(pick(&reordered), Some(UnitId::new(3)));
    }

    #[test]
    fn friendly_and_distant_units_are_ignored() {
        let roster = vec![knight(1, 500.0), knight(2, 490.0), goblin(3, 300.0)];
        assert_eq!(pick(&roster), None);
    }

    #[test]
    fn ranged_units_see_further() {
        let roster = vec![archer(1, 500.0), goblin(2, 370.0)];
        assert_eq!(pick(&roster), Some(UnitId::new(2)));

        let roster = vec![knight(1, 500.0), goblin(2, 370.0)];
        assert_eq!(pick(&roster), None);
    }

    #[test]
    fn current_target_is_retained_over_a_closer_opponent() {
        let mut hero = knight(1, 500.0);
        hero.set_target(Some(UnitId::new(2)), false);
        let roster = vec![hero, goblin(2, 420.0), goblin(3, 470.0)];
        assert_eq!(pick(&roster), Some(UnitId::new(2)));
    }

    #[test]
    fn dead_target_is_replaced() {
        let mut hero = knight(1, 500.0);
        hero.set_target(Some(UnitId::new(2)), true);
        let mut fallen = goblin(2, 470.0);
        let _ = fallen.apply_damage(1_000.0);
        let roster = vec![hero, fallen, goblin(3, 430.0)];
        assert_eq!(pick(&roster), Some(UnitId::new(3)));
    }

    #[test]
    fn handle_marks_engagement_by_attack_range() {
        let roster = vec![knight(1, 500.0), goblin(2, 420.0), knight(3, 900.0)];
        let mut targeting = Targeting::new();
        let mut out = Vec::new();
        targeting.handle(&roster, &Battlefield::default(), &mut out);

        assert_eq!(
            out,
            vec![
                TargetAssignment {
                    unit: UnitId::new(1),
                    target: Some(UnitId::new(2)),
                    engaged: false,
                },
                TargetAssignment {
                    unit: UnitId::new(2),
                    target: Some(UnitId::new(1)),
                    engaged: false,
                },
                TargetAssignment {
                    unit: UnitId::new(3),
                    target: None,
                    engaged: false,
                },
            ]
        );

        let roster = vec![knight(1, 500.0), goblin(2, 445.0)];
        targeting.handle(&roster, &Battlefield::default(), &mut out);
        assert!(out.iter().all(|assignment| assignment.engaged));
    }

    #[test]
    fn opponents_staged_off_the_lane_are_not_selected() {
        let battlefield = Battlefield::default();
        let roster = vec![archer(1, 30.0), goblin(2, -65.0)];
        assert_eq!(select_target(&roster[0], &roster, &battlefield), None);

        let mut hero = archer(1, 30.0);
        hero.set_target(Some(UnitId::new(2)), true);
        let roster = vec![hero, goblin(2, -65.0), goblin(3, -45.0)];
        assert_eq!(
            select_target(&roster[0], &roster, &battlefield),
            Some(UnitId::new(3))
        );

        let mut targeting = Targeting::new();
        let mut out = Vec::new();
        targeting.handle(&roster, &battlefield, &mut out);
        assert_eq!(out[0].target, Some(UnitId::new(3)));
        assert_eq!(out[1].target, None);
    }
}
