//! Weighted-choice primitive behind every loot and reward surface.

use rand::Rng;

use super::errors::GameError;

/// An ordered list of `(outcome, weight)` pairs. Selection probability is
/// `weight / sum(weights)`; ties break by list order. Construction rejects
/// empty tables and zero totals up front so sampling never has to.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<(T, f64)>,
    total: f64,
}

impl<T> WeightedTable<T> {
    pub fn new(entries: Vec<(T, f64)>) -> Result<Self, GameError> {
        if entries.is_empty() {
            return Err(GameError::InvalidTable("table has no entries"));
        }
        if entries.iter().any(|(_, w)| *w < 0.0 || !w.is_finite()) {
            return Err(GameError::InvalidTable("negative or non-finite weight"));
        }
        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(GameError::InvalidTable("total weight is zero"));
        }
        Ok(Self { entries, total })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(T, f64)] {
        &self.entries
    }

    /// Draw one outcome proportionally to the stored weights.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        let roll = rng.gen_range(0.0..self.total);
        let mut acc = 0.0;
        for (outcome, weight) in &self.entries {
            acc += weight;
            if roll < acc {
                return outcome;
            }
        }
        // Float accumulation can land exactly on the total; last entry wins.
        &self.entries[self.entries.len() - 1].0
    }

    /// Draw with a per-entry scale factor applied on top of the stored
    /// weights. Used for tool-tier boosts that inflate only the weights of
    /// specific rarity entries.
    pub fn sample_scaled<R, F>(&self, rng: &mut R, scale: F) -> &T
    where
        R: Rng + ?Sized,
        F: Fn(&T) -> f64,
    {
        let scaled: Vec<f64> = self
            .entries
            .iter()
            .map(|(outcome, weight)| weight * scale(outcome).max(0.0))
            .collect();
        let total: f64 = scaled.iter().sum();
        if total <= 0.0 {
            // Degenerate scaling wiped every weight; fall back to the base
            // distribution rather than failing the draw.
            return self.sample(rng);
        }
        let roll = rng.gen_range(0.0..total);
        let mut acc = 0.0;
        for ((outcome, _), weight) in self.entries.iter().zip(&scaled) {
            acc += weight;
            if roll < acc {
                return outcome;
            }
        }
        &self.entries[self.entries.len() - 1].0
    }
}

/// "Independent probability per candidate, first success wins, else uniform
/// fallback." Candidates are tried in fixed order, each admitted with its
/// own probability; when the joint roll misses everything, a uniform pick
/// guarantees an outcome anyway.
///
/// Panics on an empty slice: candidate lists are compile-time catalog data.
pub fn pick_independent<'a, T, R, F>(candidates: &'a [T], rng: &mut R, probability: F) -> &'a T
where
    R: Rng + ?Sized,
    F: Fn(&T) -> f64,
{
    assert!(!candidates.is_empty(), "empty candidate list");
    for candidate in candidates {
        let p = probability(candidate).clamp(0.0, 1.0);
        if p > 0.0 && rng.gen_bool(p) {
            return candidate;
        }
    }
    &candidates[rng.gen_range(0..candidates.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn rejects_empty_table() {
        let table: Result<WeightedTable<u8>, _> = WeightedTable::new(vec![]);
        assert!(matches!(table, Err(GameError::InvalidTable(_))));
    }

    #[test]
    fn rejects_zero_total() {
        let table = WeightedTable::new(vec![("a", 0.0), ("b", 0.0)]);
        assert!(matches!(table, Err(GameError::InvalidTable(_))));
    }

    #[test]
    fn rejects_negative_weight() {
        let table = WeightedTable::new(vec![("a", 1.0), ("b", -2.0)]);
        assert!(matches!(table, Err(GameError::InvalidTable(_))));
    }

    #[test]
    fn zero_weight_entries_never_sampled() {
        let table = WeightedTable::new(vec![("never", 0.0), ("always", 1.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert_eq!(*table.sample(&mut rng), "always");
        }
    }

    #[test]
    fn sampling_converges_to_weight_proportions() {
        let table =
            WeightedTable::new(vec![("a", 1.0), ("b", 3.0), ("c", 6.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<&str, u32> = HashMap::new();
        let n = 100_000;
        for _ in 0..n {
            *counts.entry(table.sample(&mut rng)).or_default() += 1;
        }
        let share = |k: &str| f64::from(counts[k]) / f64::from(n);
        assert!((share("a") - 0.1).abs() < 0.01);
        assert!((share("b") - 0.3).abs() < 0.01);
        assert!((share("c") - 0.6).abs() < 0.01);
    }

    #[test]
    fn scaling_boosts_only_matching_entries() {
        let table = WeightedTable::new(vec![("plain", 9.0), ("boosted", 1.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let n = 100_000;
        let boosted = (0..n)
            .filter(|_| {
                *table.sample_scaled(&mut rng, |o| if *o == "boosted" { 9.0 } else { 1.0 })
                    == "boosted"
            })
            .count();
        // Scaled weights are 9:9, so expect roughly half.
        let share = boosted as f64 / n as f64;
        assert!((share - 0.5).abs() < 0.01, "share was {}", share);
    }

    #[test]
    fn independent_pick_honors_first_success() {
        let mut rng = StdRng::seed_from_u64(3);
        // First candidate has probability 1.0, so it always wins.
        let picked = pick_independent(&["first", "second"], &mut rng, |c| {
            if *c == "first" {
                1.0
            } else {
                0.0
            }
        });
        assert_eq!(*picked, "first");
    }

    #[test]
    fn independent_pick_falls_back_uniformly() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut counts: HashMap<&str, u32> = HashMap::new();
        let candidates = ["x", "y"];
        for _ in 0..20_000 {
            // All probabilities zero: always the uniform fallback.
            *counts
                .entry(*pick_independent(&candidates, &mut rng, |_| 0.0))
                .or_default() += 1;
        }
        let share = f64::from(counts["x"]) / 20_000.0;
        assert!((share - 0.5).abs() < 0.02, "share was {}", share);
    }
}
