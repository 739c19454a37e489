//! Class balancing by resampling to the smallest class.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::DatasetRow;

/// Rows per primary label. Rows without a label are not counted.
pub fn class_distribution(rows: &[DatasetRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        if let Some(label) = row.primary_label() {
            *counts.entry(label.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Resample every class to the size of the smallest one, then shuffle.
///
/// Sampling is with replacement, so a class may contain repeated rows.
/// Rows without a primary label are dropped.
pub fn balance<R: Rng + ?Sized>(rows: &[DatasetRow], rng: &mut R) -> Vec<DatasetRow> {
    let mut groups: BTreeMap<&str, Vec<&DatasetRow>> = BTreeMap::new();
    for row in rows {
        if let Some(label) = row.primary_label() {
            groups.entry(label).or_default().push(row);
        }
    }

    let Some(min_size) = groups.values().map(|g| g.len()).min() else {
        return Vec::new();
    };

    let mut balanced: Vec<DatasetRow> = Vec::with_capacity(min_size * groups.len());
    for group in groups.values() {
        for _ in 0..min_size {
            let pick = group[rng.gen_range(0..group.len())];
            balanced.push(pick.clone());
        }
    }
    balanced.shuffle(rng);

    tracing::debug!(
        classes = groups.len(),
        per_class = min_size,
        rows = balanced.len(),
        "Balanced dataset"
    );
    balanced
}

/// [`balance`] with an RNG seeded from `seed`.
pub fn balance_seeded(rows: &[DatasetRow], seed: u64) -> Vec<DatasetRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    balance(rows, &mut rng)
}
