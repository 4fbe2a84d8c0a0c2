//! Aggregation primitives used by the statistics engine.
//!
//! Callers pass only present values; missing cells are dropped beforehand with `filter_map`.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Built-in numeric reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Sum of values.
    Sum,
    /// Arithmetic mean.
    Mean,
}

/// Reduce numeric values with a built-in [`ReduceOp`].
///
/// Returns `None` if there are no values.
pub fn reduce<I>(values: I, op: ReduceOp) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0usize;
    let mut acc: Option<f64> = None;
    for v in values {
        count += 1;
        acc = Some(acc.map_or(v, |a| a + v));
    }

    match op {
        ReduceOp::Sum => acc,
        ReduceOp::Mean => acc.map(|sum| sum / count as f64),
    }
}

/// Most frequent value, or `None` if there are no values.
///
/// Ties go to the smallest value under `T`'s ordering, so the result is deterministic
/// regardless of row order.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().is_none_or(|(_, best_count)| count > *best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Frequency of each distinct value, ordered by descending count.
///
/// Values with equal counts keep the order in which they were first encountered.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();
    for v in values {
        match index.get(&v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(v.clone(), counts.len());
                counts.push((v, 1));
            }
        }
    }
    // Stable sort keeps first-encounter order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
