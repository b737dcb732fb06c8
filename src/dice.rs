//! Outcome generation for the three dice.
//!
//! Draws are independent and uniform over the six animals unless a [`Draw`]
//! asks for the favor bias or a forced triple.

use crate::animal::Animal;
use rand::{
    Rng,
    seq::IndexedRandom,
};

pub const DICE: usize = 3;

pub type Outcome = [Animal; DICE];

/// Faces shown before the first roll.
pub const INITIAL_FACES: Outcome = [Animal::Crab, Animal::Fish, Animal::Shrimp];

#[derive(Clone, Debug, PartialEq)]
pub enum Draw<'a> {
    Uniform,
    /// Each die independently lands on one of `favored` with probability
    /// `chance`, otherwise uniform over all six.
    Favor { favored: &'a [Animal], chance: f64 },
    Forced(Outcome),
}

pub fn generate<R: Rng + ?Sized>(rng: &mut R, draw: &Draw<'_>) -> Outcome {
    match draw {
        Draw::Uniform => roll_uniform(rng),
        Draw::Favor { favored, chance } => roll_favoring(rng, favored, *chance),
        Draw::Forced(outcome) => *outcome,
    }
}

pub fn roll_uniform<R: Rng + ?Sized>(rng: &mut R) -> Outcome {
    std::array::from_fn(|_| uniform_face(rng))
}

pub fn roll_favoring<R: Rng + ?Sized>(
    rng: &mut R,
    favored: &[Animal],
    chance: f64,
) -> Outcome {
    // NaN would panic inside `random_bool`.
    let chance = if chance.is_finite() {
        chance.clamp(0.0, 1.0)
    } else {
        0.0
    };
    std::array::from_fn(|_| {
        if rng.random_bool(chance) {
            favored
                .choose(rng)
                .copied()
                .unwrap_or_else(|| uniform_face(rng))
        } else {
            uniform_face(rng)
        }
    })
}

fn uniform_face<R: Rng + ?Sized>(rng: &mut R) -> Animal {
    Animal::ALL[rng.random_range(0..Animal::ALL.len())]
}

pub fn match_count(outcome: &Outcome, animal: Animal) -> u32 {
    outcome.iter().filter(|face| **face == animal).count() as u32
}

/// Distinct faces of an outcome in die order.
pub fn winners(outcome: &Outcome) -> Vec<Animal> {
    let mut out: Vec<Animal> = Vec::with_capacity(DICE);
    for face in outcome {
        if !out.contains(face) {
            out.push(*face);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{
        SeedableRng,
        rngs::StdRng,
    };

    #[test]
    fn non_finite_favor_chance_rolls_uniformly() {
        let mut rng = StdRng::seed_from_u64(7);
        for chance in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let outcome = roll_favoring(&mut rng, &[Animal::Crab], chance);
            assert!(outcome.iter().all(|face| Animal::ALL.contains(face)));
        }
    }

    #[test]
    fn winners_are_distinct_in_die_order() {
        use Animal::*;
        assert_eq!(winners(&[Deer, Crab, Deer]), vec![Deer, Crab]);
        assert_eq!(winners(&[Gourd, Gourd, Gourd]), vec![Gourd]);
    }

    #[test]
    fn forced_draw_is_returned_verbatim() {
        let mut rng = StdRng::seed_from_u64(7);
        let triple = [Animal::Fish; DICE];
        assert_eq!(generate(&mut rng, &Draw::Forced(triple)), triple);
    }

    #[test]
    fn full_favor_only_lands_on_favored_animals() {
        let mut rng = StdRng::seed_from_u64(11);
        let favored = [Animal::Shrimp, Animal::Rooster];
        for _ in 0..200 {
            let outcome = roll_favoring(&mut rng, &favored, 1.0);
            assert!(outcome.iter().all(|face| favored.contains(face)));
        }
    }

    #[test]
    fn favor_without_bets_falls_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = Vec::new();
        for _ in 0..300 {
            for face in roll_favoring(&mut rng, &[], 1.0) {
                if !seen.contains(&face) {
                    seen.push(face);
                }
            }
        }
        assert_eq!(seen.len(), Animal::ALL.len());
    }
}
