//! Random draws for battle resolution.
//!
//! Every roll takes the RNG as a parameter so that sessions and tests can
//! inject a seeded generator and replay a fight exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive integer range rolled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DieRange {
    min: i32,
    max: i32,
}

/// Damage dealt by the player's attack.
pub const ATTACK_DAMAGE: DieRange = DieRange { min: 6, max: 19 };

/// Raw roll for the defend stance; only the part above [`DEFEND_ABSORB`] hurts.
pub const DEFEND_ROLL: DieRange = DieRange { min: 2, max: 9 };

/// Amount of the defend roll absorbed before it turns into self-damage.
pub const DEFEND_ABSORB: i32 = 6;

/// Damage dealt by an enemy counter-attack.
pub const ENEMY_DAMAGE: DieRange = DieRange { min: 4, max: 15 };

/// Gold granted for a victory.
pub const VICTORY_GOLD: DieRange = DieRange { min: 2, max: 7 };

/// Escape succeeds when a uniform draw in `[0, 1)` is strictly above this.
pub const ESCAPE_THRESHOLD: f64 = 0.5;

impl DieRange {
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Roll with the given RNG.
    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> RollResult {
        RollResult {
            range: *self,
            value: rng.gen_range(self.min..=self.max),
        }
    }
}

impl fmt::Display for DieRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Outcome of a single roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub range: DieRange,
    pub value: i32,
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.value, self.range)
    }
}

/// Uniform draw in `[0, 1)`.
pub fn chance<R: Rng>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Self-damage taken while defending: `max(0, roll - DEFEND_ABSORB)`.
pub fn defend_self_damage(roll: &RollResult) -> i32 {
    (roll.value - DEFEND_ABSORB).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rolls_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for range in [ATTACK_DAMAGE, DEFEND_ROLL, ENEMY_DAMAGE, VICTORY_GOLD] {
            for _ in 0..500 {
                let roll = range.roll_with_rng(&mut rng);
                assert!(range.contains(roll.value), "{roll} escaped {range}");
            }
        }
    }

    #[test]
    fn test_rolls_cover_both_ends() {
        let mut rng = StdRng::seed_from_u64(11);
        let values: Vec<i32> = (0..2000)
            .map(|_| VICTORY_GOLD.roll_with_rng(&mut rng).value)
            .collect();
        assert!(values.contains(&2));
        assert!(values.contains(&7));
    }

    #[test]
    fn test_defend_self_damage() {
        let roll = |value| RollResult {
            range: DEFEND_ROLL,
            value,
        };
        assert_eq!(defend_self_damage(&roll(2)), 0);
        assert_eq!(defend_self_damage(&roll(6)), 0);
        assert_eq!(defend_self_damage(&roll(7)), 1);
        assert_eq!(defend_self_damage(&roll(9)), 3);
    }

    #[test]
    fn test_chance_is_unit_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let c = chance(&mut rng);
            assert!((0.0..1.0).contains(&c));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ATTACK_DAMAGE.to_string(), "[6, 19]");
    }
}
