use std::collections::btree_map::{self, BTreeMap};
use std::iter::FromIterator;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Counted occurrences of discrete items, usually class labels
///
/// Items are iterated in lexicographic order, which makes `max_item` deterministic: among equally
/// frequent items the smallest one wins.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscreteDistribution {
    counts: BTreeMap<String, usize>,
    sum: usize,
}

impl DiscreteDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: &str) {
        self.add_count(item, 1);
    }

    /// Adds `count` occurrences of `item` at once
    pub fn add_count(&mut self, item: &str, count: usize) {
        if count == 0 {
            return;
        }
        match self.counts.get_mut(item) {
            Some(existing) => *existing += count,
            None => {
                self.counts.insert(item.to_string(), count);
            }
        }
        self.sum += count;
    }

    /// Removes one occurrence of `item`, the entry disappears once its count reaches zero
    pub fn remove_item(&mut self, item: &str) {
        if let Some(count) = self.counts.get_mut(item) {
            *count -= 1;
            self.sum -= 1;
            if *count == 0 {
                self.counts.remove(item);
            }
        }
    }

    pub fn add_distribution(&mut self, other: &DiscreteDistribution) {
        for (item, count) in other.iter() {
            self.add_count(item, count);
        }
    }

    pub fn remove_distribution(&mut self, other: &DiscreteDistribution) {
        for (item, count) in other.iter() {
            if let Some(existing) = self.counts.get_mut(item) {
                let removed = count.min(*existing);
                *existing -= removed;
                self.sum -= removed;
                if *existing == 0 {
                    self.counts.remove(item);
                }
            }
        }
    }

    /// Total number of counted occurrences
    pub fn sum(&self) -> usize {
        self.sum
    }

    /// Number of distinct items
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.counts.contains_key(item)
    }

    pub fn count(&self, item: &str) -> usize {
        self.counts.get(item).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(item, count)| (item.as_str(), *count))
    }

    pub fn items(&self) -> btree_map::Keys<'_, String, usize> {
        self.counts.keys()
    }

    pub fn probability(&self, item: &str) -> f64 {
        if self.sum == 0 {
            0.0
        } else {
            self.count(item) as f64 / self.sum as f64
        }
    }

    pub fn probability_distribution(&self) -> BTreeMap<String, f64> {
        self.counts
            .iter()
            .map(|(item, count)| (item.clone(), *count as f64 / self.sum as f64))
            .collect()
    }

    /// Shannon entropy in bits
    pub fn entropy(&self) -> f64 {
        if self.sum == 0 {
            return 0.0;
        }
        let total = self.sum as f64;

        self.counts
            .values()
            .map(|count| *count as f64 / total)
            .map(|p| -p * p.log2())
            .sum()
    }

    /// The most frequent item, `None` for an empty distribution
    pub fn max_item(&self) -> Option<&str> {
        Self::max_by_count(self.iter())
    }

    /// The most frequent item among `include`, `None` if none of them occurs
    pub fn max_item_among<S: AsRef<str>>(&self, include: &[S]) -> Option<&str> {
        Self::max_by_count(
            self.iter()
                .filter(|(item, _)| include.iter().any(|label| label.as_ref() == *item)),
        )
    }

    fn max_by_count<'a>(items: impl Iterator<Item = (&'a str, usize)>) -> Option<&'a str> {
        items
            .fold(None, |best: Option<(&str, usize)>, (item, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((item, count)),
            })
            .map(|(item, _)| item)
    }
}

impl<'a> FromIterator<&'a str> for DiscreteDistribution {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut distribution = DiscreteDistribution::new();
        for item in iter {
            distribution.add_item(item);
        }
        distribution
    }
}
