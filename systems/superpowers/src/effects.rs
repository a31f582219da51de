//! Expiring per-unit effects checked deterministically every tick.

use std::collections::BTreeMap;

use lane_siege_core::UnitId;

/// Active slow applied to a single unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlowEffect {
    /// Multiplier applied to the unit's base speed.
    pub factor: f32,
    /// First tick on which the slow no longer applies.
    pub expires_at: u64,
}

/// Timed effects keyed by the unit they apply to.
///
/// A unit holds at most one slow. Effective speed is always derived from the
/// unit's base speed, so removing a record restores the base speed exactly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectBook {
    slows: BTreeMap<UnitId, SlowEffect>,
}

impl EffectBook {
    /// Creates an empty effect book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slows `unit` until `expires_at`.
    ///
    /// Re-applying to an already slowed unit keeps the stronger factor and the
    /// later expiry instead of compounding.
    pub fn apply_slow(&mut self, unit: UnitId, factor: f32, expires_at: u64) {
        let factor = if factor.is_finite() {
            factor.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let _ = self
            .slows
            .entry(unit)
            .and_modify(|slow| {
                slow.factor = slow.factor.min(factor);
                slow.expires_at = slow.expires_at.max(expires_at);
            })
            .or_insert(SlowEffect { factor, expires_at });
    }

    /// Speed multiplier currently applied to `unit`.
    #[must_use]
    pub fn speed_factor(&self, unit: UnitId) -> f32 {
        self.slows.get(&unit).map_or(1.0, |slow| slow.factor)
    }

    /// Removes every effect that expired by `now`, reporting affected units in id order.
    pub fn expire(&mut self, now: u64, out: &mut Vec<UnitId>) {
        out.clear();
        self.slows.retain(|unit, slow| {
            if slow.expires_at <= now {
                out.push(*unit);
                false
            } else {
                true
            }
        });
    }

    /// Drops any effect on a unit that left the battlefield.
    pub fn forget(&mut self, unit: UnitId) {
        let _ = self.slows.remove(&unit);
    }

    /// Number of units currently affected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slows.len()
    }

    /// Reports whether no effect is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_slows_do_not_compound() {
        let mut book = EffectBook::new();
        let unit = UnitId::new(4);
        book.apply_slow(unit, 0.3, 300);
        book.apply_slow(unit, 0.3, 420);
        assert_eq!(book.speed_factor(unit), 0.3);

        book.apply_slow(unit, 0.5, 360);
        assert_eq!(book.speed_factor(unit), 0.3);
        assert_eq!(book.len(), 1);

        let mut expired = Vec::new();
        book.expire(419, &mut expired);
        assert!(expired.is_empty());
        assert_eq!(book.speed_factor(unit), 0.3);
        book.expire(420, &mut expired);
        assert_eq!(expired, vec![unit]);
        assert_eq!(book.speed_factor(unit), 1.0);
    }

    #[test]
    fn expiry_restores_full_speed() {
        let mut book = EffectBook::new();
        let mut expired = Vec::new();
        book.apply_slow(UnitId::new(2), 0.3, 10);
        book.apply_slow(UnitId::new(1), 0.3, 12);

        book.expire(9, &mut expired);
        assert!(expired.is_empty());

        book.expire(12, &mut expired);
        assert_eq!(expired, vec![UnitId::new(1), UnitId::new(2)]);
        assert_eq!(book.speed_factor(UnitId::new(1)), 1.0);
        assert!(book.is_empty());
    }

    #[test]
    fn forgotten_units_lose_their_effects() {
        let mut book = EffectBook::new();
        book.apply_slow(UnitId::new(1), 0.3, 10);
        book.forget(UnitId::new(1));
        assert!(book.is_empty());
    }
}
