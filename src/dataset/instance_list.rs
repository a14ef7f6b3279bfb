use std::cmp::Ordering;
use std::iter::FromIterator;
use std::ops::Index;

use log::trace;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::{Attribute, Bootstrap, DiscreteDistribution, Instance};

/// An ordered list of labelled instances
///
/// Every subdividing operation returns new lists and leaves `self` untouched.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceList {
    instances: Vec<Instance>,
}

impl InstanceList {
    pub fn new(instances: Vec<Instance>) -> Self {
        InstanceList { instances }
    }

    pub fn push(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instance> {
        self.instances.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instance> {
        self.instances.iter()
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn into_instances(self) -> Vec<Instance> {
        self.instances
    }

    /// Number of attributes of the first instance, zero for an empty list
    pub fn attribute_count(&self) -> usize {
        self.instances
            .first()
            .map(Instance::attribute_count)
            .unwrap_or(0)
    }

    /// Class labels of all instances counted
    pub fn class_distribution(&self) -> DiscreteDistribution {
        self.instances
            .iter()
            .map(Instance::class_label)
            .collect()
    }

    /// Distinct class labels in lexicographic order
    pub fn class_labels(&self) -> Vec<String> {
        self.class_distribution().items().cloned().collect()
    }

    /// Distinct categorical values of an attribute in order of first appearance
    pub fn attribute_value_list(&self, attribute_index: usize) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for value in self.discrete_values(attribute_index) {
            if !values.iter().any(|known| *known == value) {
                values.push(value);
            }
        }
        values
    }

    /// Class distribution per categorical value, aligned with `attribute_value_list`
    pub fn attribute_class_distribution(&self, attribute_index: usize) -> Vec<DiscreteDistribution> {
        let values = self.attribute_value_list(attribute_index);
        let mut distributions = vec![DiscreteDistribution::new(); values.len()];

        for (instance, value) in self.instances.iter().zip(self.discrete_values(attribute_index)) {
            if let Some(position) = values.iter().position(|known| *known == value) {
                distributions[position].add_item(instance.class_label());
            }
        }
        distributions
    }

    /// Class distribution of the instances whose indexed attribute has index `index`
    pub fn indexed_attribute_class_distribution(
        &self,
        attribute_index: usize,
        index: usize,
    ) -> DiscreteDistribution {
        self.instances
            .iter()
            .filter(|instance| has_index(instance, attribute_index, index))
            .map(Instance::class_label)
            .collect()
    }

    /// Copy of the list sorted ascending by a continuous attribute
    ///
    /// The sort is stable; instances without a continuous value keep their relative order
    /// at the end.
    pub fn sorted_by_attribute(&self, attribute_index: usize) -> InstanceList {
        let value = |instance: &Instance| {
            instance
                .attribute(attribute_index)
                .and_then(Attribute::continuous_value)
        };
        let mut instances = self.instances.clone();
        instances.sort_by(|a, b| match (value(a), value(b)) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        InstanceList::new(instances)
    }

    /// One list per categorical value, aligned with `attribute_value_list`
    pub fn divide_by_discrete_attribute(&self, attribute_index: usize) -> Vec<InstanceList> {
        let values = self.attribute_value_list(attribute_index);
        let mut lists = vec![InstanceList::default(); values.len()];

        for (instance, value) in self.instances.iter().zip(self.discrete_values(attribute_index)) {
            if let Some(position) = values.iter().position(|known| *known == value) {
                lists[position].push(instance.clone());
            }
        }
        lists
    }

    /// Splits into instances with the given index and all others
    pub fn divide_by_indexed_attribute(
        &self,
        attribute_index: usize,
        index: usize,
    ) -> (InstanceList, InstanceList) {
        self.partition_by(|instance| has_index(instance, attribute_index, index))
    }

    /// Splits into instances with `value <= threshold` and `value > threshold`
    pub fn divide_by_threshold(
        &self,
        attribute_index: usize,
        threshold: f64,
    ) -> (InstanceList, InstanceList) {
        self.partition_by(|instance| {
            instance
                .attribute(attribute_index)
                .and_then(Attribute::continuous_value)
                .map(|value| value <= threshold)
                .unwrap_or(false)
        })
    }

    /// Copy of the list in a random order determined by `seed`
    pub fn shuffle(&self, seed: u64) -> InstanceList {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut instances = self.instances.clone();
        instances.shuffle(&mut rng);

        InstanceList::new(instances)
    }

    /// Splits off the first `ceil(ratio * len)` instances, keeping the order
    pub fn split_with_ratio(&self, ratio: f64) -> (InstanceList, InstanceList) {
        let n = ((self.len() as f64) * ratio).ceil() as usize;
        let n = n.min(self.len());
        let (first, second) = self.instances.split_at(n);

        (InstanceList::new(first.to_vec()), InstanceList::new(second.to_vec()))
    }

    /// Splits the shuffled list so that the first part holds a `ratio` share of every class
    ///
    /// Within every class, instances go to the first part while fewer than
    /// `ratio * class size` of them have been placed there.
    pub fn stratified_split(&self, ratio: f64, seed: u64) -> (InstanceList, InstanceList) {
        let shuffled = self.shuffle(seed);
        let distribution = shuffled.class_distribution();
        let mut taken = DiscreteDistribution::new();
        let mut first = InstanceList::default();
        let mut second = InstanceList::default();

        for instance in shuffled.instances {
            let label = instance.class_label();
            let quota = ratio * distribution.count(label) as f64;
            if (taken.count(label) as f64) < quota {
                taken.add_item(label);
                first.push(instance);
            } else {
                second.push(instance);
            }
        }

        trace!(
            "stratified split of {} instances with ratio {} into {} and {}",
            self.len(),
            ratio,
            first.len(),
            second.len()
        );
        (first, second)
    }

    /// Sample with replacement of the same size as the list
    pub fn bootstrap(&self, seed: u64) -> Bootstrap {
        Bootstrap::new(self, seed)
    }

    fn discrete_values(&self, attribute_index: usize) -> impl Iterator<Item = String> + '_ {
        self.instances.iter().map(move |instance| {
            instance
                .attribute(attribute_index)
                .and_then(Attribute::discrete_value)
                .map(|value| value.into_owned())
                .unwrap_or_default()
        })
    }

    fn partition_by<P: Fn(&Instance) -> bool>(&self, predicate: P) -> (InstanceList, InstanceList) {
        let (matching, others): (Vec<Instance>, Vec<Instance>) =
            self.instances.iter().cloned().partition(|instance| predicate(instance));

        (InstanceList::new(matching), InstanceList::new(others))
    }
}

fn has_index(instance: &Instance, attribute_index: usize, index: usize) -> bool {
    matches!(
        instance.attribute(attribute_index),
        Some(Attribute::DiscreteIndexed { index: found, .. }) if *found == index
    )
}

impl From<Vec<Instance>> for InstanceList {
    fn from(instances: Vec<Instance>) -> Self {
        InstanceList::new(instances)
    }
}

impl FromIterator<Instance> for InstanceList {
    fn from_iter<I: IntoIterator<Item = Instance>>(iter: I) -> Self {
        InstanceList::new(iter.into_iter().collect())
    }
}

impl Index<usize> for InstanceList {
    type Output = Instance;

    fn index(&self, index: usize) -> &Instance {
        &self.instances[index]
    }
}

impl<'a> IntoIterator for &'a InstanceList {
    type Item = &'a Instance;
    type IntoIter = std::slice::Iter<'a, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}
