// ============================================================
// Layer 4 — Paired Shuffle
// ============================================================
// Shuffles a source list and a target list with the same
// permutation, so sample i of `src` still lines up with sample i
// of `tgt` afterwards.
//
// Uses the Fisher-Yates shuffle from rand::seq::SliceRandom on
// an index vector, then gathers both lists through it.
//
// Reference: rand crate documentation

use anyhow::{ensure, Result};
use rand::{seq::SliceRandom, Rng};

/// Shuffle `src` and `tgt` in lockstep using `rng`.
///
/// # Example
/// ```
/// use graph_lab::data::splitter::shuffle_pairs;
///
/// let (src, tgt) = shuffle_pairs(vec![1, 2, 3], vec!["a", "b", "c"], &mut rand::thread_rng()).unwrap();
/// let pos = src.iter().position(|&x| x == 2).unwrap();
/// assert_eq!(tgt[pos], "b");
/// ```
pub fn shuffle_pairs<A, B, R: Rng + ?Sized>(
    src: Vec<A>,
    tgt: Vec<B>,
    rng: &mut R,
) -> Result<(Vec<A>, Vec<B>)> {
    ensure!(
        src.len() == tgt.len(),
        "cannot shuffle {} sources against {} targets",
        src.len(),
        tgt.len()
    );

    let mut order: Vec<usize> = (0..src.len()).collect();
    order.shuffle(rng);

    // Gather through the permutation without requiring Clone
    let mut src: Vec<Option<A>> = src.into_iter().map(Some).collect();
    let mut tgt: Vec<Option<B>> = tgt.into_iter().map(Some).collect();

    let shuffled_src = order.iter().filter_map(|&i| src[i].take()).collect();
    let shuffled_tgt = order.iter().filter_map(|&i| tgt[i].take()).collect();

    tracing::debug!("Shuffled {} paired samples", order.len());
    Ok((shuffled_src, shuffled_tgt))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_pairs_stay_aligned() {
        let src: Vec<usize>  = (0..50).collect();
        let tgt: Vec<String> = (0..50).map(|i| format!("t{i}")).collect();

        let mut rng = StdRng::seed_from_u64(7);
        let (s, t) = shuffle_pairs(src, tgt, &mut rng).unwrap();

        assert_eq!(s.len(), 50);
        for (a, b) in s.iter().zip(&t) {
            assert_eq!(format!("t{a}"), *b);
        }
    }

    #[test]
    fn test_all_items_preserved() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mut s, _) = shuffle_pairs((0..20).collect::<Vec<u32>>(), vec![(); 20], &mut rng).unwrap();
        s.sort();
        assert_eq!(s, (0..20).collect::<Vec<u32>>());
    }

    #[test]
    fn test_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(shuffle_pairs(vec![1, 2], vec![1], &mut rng).is_err());
    }

    #[test]
    fn test_empty_lists() {
        let mut rng = StdRng::seed_from_u64(0);
        let (s, t) = shuffle_pairs(Vec::<u8>::new(), Vec::<u8>::new(), &mut rng).unwrap();
        assert!(s.is_empty() && t.is_empty());
    }
}
