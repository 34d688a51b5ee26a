//! Coin reward draws for completed tasks.

use rand::Rng;

/// Smallest reward a completed task can pay out.
pub const MIN_REWARD: u32 = 5;
/// Largest reward a completed task can pay out.
pub const MAX_REWARD: u32 = 50;

/// Draw a completion reward: uniform over [5, 50], redrawn until the value
/// lands on a multiple of 5. The resulting distribution is uniform over
/// {5, 10, ..., 50}.
pub fn draw_reward(rng: &mut impl Rng) -> u32 {
    loop {
        let coins = rng.random_range(MIN_REWARD..=MAX_REWARD);
        if coins % 5 == 0 {
            return coins;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_reward_is_multiple_of_five_in_range() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let coins = draw_reward(&mut rng);
            assert!(coins % 5 == 0, "got {}", coins);
            assert!((MIN_REWARD..=MAX_REWARD).contains(&coins), "got {}", coins);
        }
    }

    #[test]
    fn test_reward_reaches_every_tier() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<u32> = (0..5000).map(|_| draw_reward(&mut rng)).collect();
        for tier in (MIN_REWARD..=MAX_REWARD).step_by(5) {
            assert!(seen.contains(&tier), "never drew {}", tier);
        }
    }

    #[test]
    fn test_reward_deterministic_for_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(draw_reward(&mut a), draw_reward(&mut b));
        }
    }
}
