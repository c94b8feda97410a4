//! Uniform display-order shuffling.

use rand::Rng;

/// Fisher–Yates shuffle, in place.
///
/// Walks from the end of the slice, swapping each position with a uniformly
/// chosen index at or below it. Used only to randomise the on-screen order of
/// reference entries, so any uniform generator will do.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    let mut current = items.len();
    while current > 1 {
        let pick = rng.random_range(0..current);
        current -= 1;
        items.swap(current, pick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_and_single_unchanged() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut empty: Vec<u32> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = vec![42];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, vec![42]);
    }

    #[test]
    fn result_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 0..32usize {
            let mut items: Vec<usize> = (0..n).collect();
            shuffle(&mut items, &mut rng);
            let mut sorted = items.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn keeps_duplicates() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut items = vec!["a", "b", "a", "c", "b"];
        shuffle(&mut items, &mut rng);
        items.sort_unstable();
        assert_eq!(items, vec!["a", "a", "b", "b", "c"]);
    }

    #[test]
    fn every_position_is_reachable() {
        // Element 0 should land in each slot of a 4-element slice over enough runs.
        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let mut items = [0, 1, 2, 3];
            shuffle(&mut items, &mut rng);
            let pos = items.iter().position(|&v| v == 0).unwrap();
            seen[pos] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
