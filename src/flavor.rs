//! Game-over screen copy

use rand::Rng;
use rand::seq::IndexedRandom;

pub const MOTIVATION_MESSAGES: &[&str] = &[
    "Keep practicing and beat your high score!",
    "You got this, Captain!",
    "Never give up, pilot! Try again!",
    "Your spaceship needs you!",
    "One more try! Show them who's boss!",
];

/// A random line of encouragement, or "" if there is none to pick
pub fn random_motivation<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(MOTIVATION_MESSAGES, rng)
}

fn pick<R: Rng + ?Sized>(messages: &[&'static str], rng: &mut R) -> &'static str {
    messages.choose(rng).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_picks_from_list() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..20 {
            assert!(MOTIVATION_MESSAGES.contains(&random_motivation(&mut rng)));
        }
    }

    #[test]
    fn test_empty_list_falls_back() {
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(pick(&[], &mut rng), "");
    }
}
