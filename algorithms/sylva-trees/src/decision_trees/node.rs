//! Node induction and traversal
//!
use std::collections::BTreeMap;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use sylva::{Attribute, DiscreteDistribution, Instance, InstanceList};

use super::{Comparison, DecisionCondition};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Entropy differences below this are rounding noise, not an improvement
///
/// A later candidate has to beat the best split by more than this, so on near-ties the earliest
/// candidate in attribute, index and threshold order is kept.
const ENTROPY_TOLERANCE: f64 = 1e-12;

/// Draws the candidate attributes of every node of a random forest tree
///
/// The generator is seeded once per tree and advanced in the pre-order in which nodes are
/// constructed, so a tree is fully determined by its bootstrap sample and its seed.
#[derive(Debug, Clone)]
pub(crate) struct AttributeSampler {
    rng: StdRng,
    subset_size: usize,
}

impl AttributeSampler {
    pub(crate) fn new(seed: u64, subset_size: usize) -> Self {
        AttributeSampler {
            rng: StdRng::seed_from_u64(seed),
            subset_size,
        }
    }

    /// Random subset of `0..attribute_count` in ascending order
    fn candidates(&mut self, attribute_count: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..attribute_count).collect();
        if self.subset_size < attribute_count {
            indices.shuffle(&mut self.rng);
            indices.truncate(self.subset_size);
            indices.sort_unstable();
        }
        indices
    }
}

/// The best split found for a node
#[derive(Debug, Clone, PartialEq)]
enum Split {
    Indexed {
        attribute_index: usize,
        index: usize,
        max_index: usize,
    },
    Discrete {
        attribute_index: usize,
    },
    Continuous {
        attribute_index: usize,
        threshold: f64,
    },
}

/// Tracks the split with the lowest weighted entropy seen so far
struct BestSplit {
    entropy: f64,
    split: Option<Split>,
}

impl BestSplit {
    fn new(entropy: f64) -> Self {
        BestSplit {
            entropy,
            split: None,
        }
    }

    /// Replaces the current best only on a strict improvement, so earlier candidates win ties
    fn offer(&mut self, entropy: f64, split: impl FnOnce() -> Split) {
        if self.entropy - entropy > ENTROPY_TOLERANCE {
            self.entropy = entropy;
            self.split = Some(split());
        }
    }
}

/// Sum of the partition entropies weighted by their share of the `total` instances
fn weighted_entropy<'a>(
    partitions: impl IntoIterator<Item = &'a DiscreteDistribution>,
    total: usize,
) -> f64 {
    partitions
        .into_iter()
        .map(|partition| partition.sum() as f64 * partition.entropy())
        .sum::<f64>()
        / total as f64
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
/// A node in the decision tree
pub struct DecisionNode {
    condition: Option<DecisionCondition>,
    children: Vec<DecisionNode>,
    class_label: String,
    class_distribution: DiscreteDistribution,
    leaf: bool,
}

impl DecisionNode {
    fn leaf(
        condition: Option<DecisionCondition>,
        class_label: String,
        class_distribution: DiscreteDistribution,
    ) -> Self {
        DecisionNode {
            condition,
            children: Vec::new(),
            class_label,
            class_distribution,
            leaf: true,
        }
    }

    /// Assembles a node read back from a model file
    ///
    /// The children partition the instances of their parent, so the parent's class distribution
    /// is the sum of theirs.
    pub(crate) fn from_parts(
        condition: Option<DecisionCondition>,
        children: Vec<DecisionNode>,
        leaf_label: Option<String>,
        leaf_distribution: DiscreteDistribution,
    ) -> Self {
        if children.is_empty() {
            let class_label = leaf_label
                .or_else(|| leaf_distribution.max_item().map(str::to_string))
                .unwrap_or_default();
            return Self::leaf(condition, class_label, leaf_distribution);
        }

        let mut class_distribution = DiscreteDistribution::new();
        for child in &children {
            class_distribution.add_distribution(&child.class_distribution);
        }
        let class_label = class_distribution
            .max_item()
            .map(str::to_string)
            .unwrap_or_default();

        DecisionNode {
            condition,
            children,
            class_label,
            class_distribution,
            leaf: false,
        }
    }

    /// Recursively grows the subtree for `data`
    ///
    /// `condition` is the test that routed `data` into this node, `None` at the root. With
    /// `stump` set only the root is split.
    pub(crate) fn grow(
        data: &InstanceList,
        condition: Option<DecisionCondition>,
        mut sampler: Option<&mut AttributeSampler>,
        stump: bool,
    ) -> Self {
        let class_distribution = data.class_distribution();
        let class_label = class_distribution
            .max_item()
            .map(str::to_string)
            .unwrap_or_default();

        // a pure partition is never split further
        if class_distribution.len() <= 1 || (stump && condition.is_some()) {
            return Self::leaf(condition, class_label, class_distribution);
        }

        let attribute_count = data.attribute_count();
        let candidates = match sampler.as_deref_mut() {
            Some(sampler) => sampler.candidates(attribute_count),
            None => (0..attribute_count).collect(),
        };

        let split = match find_best_split(data, &class_distribution, &candidates) {
            Some(split) => split,
            None => return Self::leaf(condition, class_label, class_distribution),
        };

        let partitions: Vec<(DecisionCondition, InstanceList)> = match split {
            Split::Indexed {
                attribute_index,
                index,
                max_index,
            } => {
                let (matching, others) = data.divide_by_indexed_attribute(attribute_index, index);
                vec![
                    (
                        DecisionCondition::new(
                            attribute_index,
                            Comparison::IndexEquals { index, max_index },
                        ),
                        matching,
                    ),
                    (
                        DecisionCondition::new(attribute_index, Comparison::IndexOther { max_index }),
                        others,
                    ),
                ]
            }
            Split::Discrete { attribute_index } => data
                .attribute_value_list(attribute_index)
                .into_iter()
                .zip(data.divide_by_discrete_attribute(attribute_index))
                .map(|(value, partition)| {
                    (
                        DecisionCondition::new(attribute_index, Comparison::Equals(value)),
                        partition,
                    )
                })
                .collect(),
            Split::Continuous {
                attribute_index,
                threshold,
            } => {
                let (lower, upper) = data.divide_by_threshold(attribute_index, threshold);
                vec![
                    (
                        DecisionCondition::new(attribute_index, Comparison::LessOrEqual(threshold)),
                        lower,
                    ),
                    (
                        DecisionCondition::new(attribute_index, Comparison::Greater(threshold)),
                        upper,
                    ),
                ]
            }
        };

        // a split has to shrink every partition, otherwise growing would never terminate
        if partitions
            .iter()
            .any(|(_, partition)| partition.len() == data.len())
        {
            return Self::leaf(condition, class_label, class_distribution);
        }

        let children = partitions
            .into_iter()
            .map(|(child_condition, partition)| {
                DecisionNode::grow(
                    &partition,
                    Some(child_condition),
                    sampler.as_deref_mut(),
                    stump,
                )
            })
            .collect();

        DecisionNode {
            condition,
            children,
            class_label,
            class_distribution,
            leaf: false,
        }
    }

    /// Returns true if the node makes its own prediction
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    pub(crate) fn set_leaf(&mut self, leaf: bool) {
        self.leaf = leaf;
    }

    /// Turns the node into a leaf and drops its subtree
    pub(crate) fn collapse(&mut self) {
        self.leaf = true;
        self.children.clear();
    }

    /// The condition that routes instances into this node, `None` for the root
    pub fn condition(&self) -> Option<&DecisionCondition> {
        self.condition.as_ref()
    }

    pub fn children(&self) -> &[DecisionNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [DecisionNode] {
        &mut self.children
    }

    /// Majority class label of the instances that reached this node
    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    pub fn class_distribution(&self) -> &DiscreteDistribution {
        &self.class_distribution
    }

    /// Number of edges on the longest path from this node down to a leaf
    pub fn height(&self) -> usize {
        if self.leaf {
            0
        } else {
            1 + self
                .children
                .iter()
                .map(DecisionNode::height)
                .max()
                .unwrap_or(0)
        }
    }

    fn matching_child(&self, instance: &Instance) -> Option<&DecisionNode> {
        self.children.iter().find(|child| {
            child
                .condition
                .as_ref()
                .map(|condition| condition.satisfied_by(instance))
                .unwrap_or(false)
        })
    }

    /// Predicts the class label of `instance`
    ///
    /// Composite instances get the most frequent of their acceptable labels, which is `None`
    /// when none of them reached the node. An instance no child accepts is predicted by this
    /// node itself.
    pub fn predict(&self, instance: &Instance) -> Option<String> {
        if let Some(possible_labels) = instance.possible_class_labels() {
            let label = self
                .class_distribution
                .max_item_among(possible_labels)
                .map(str::to_string);
            if self.leaf {
                return label;
            }
            match self.matching_child(instance) {
                Some(child) => child.predict(instance),
                None => label,
            }
        } else if self.leaf {
            Some(self.class_label.clone())
        } else {
            match self.matching_child(instance) {
                Some(child) => child.predict(instance),
                None => Some(self.class_label.clone()),
            }
        }
    }

    /// Normalized class distribution of the node `instance` ends up in
    pub fn predict_probability(&self, instance: &Instance) -> BTreeMap<String, f64> {
        if self.leaf {
            return self.class_distribution.probability_distribution();
        }
        match self.matching_child(instance) {
            Some(child) => child.predict_probability(instance),
            None => self.class_distribution.probability_distribution(),
        }
    }
}

/// Scans the candidate attributes in order and returns the split with the lowest weighted
/// entropy, if any improves on the entropy of `data` itself
fn find_best_split(
    data: &InstanceList,
    class_distribution: &DiscreteDistribution,
    candidates: &[usize],
) -> Option<Split> {
    let total = data.len();
    let first = data.get(0)?;
    let mut best = BestSplit::new(class_distribution.entropy());

    for &attribute_index in candidates {
        match first.attribute(attribute_index) {
            Some(Attribute::DiscreteIndexed { max_index, .. }) => {
                let max_index = *max_index;
                for index in 0..max_index {
                    let matching = data.indexed_attribute_class_distribution(attribute_index, index);
                    if matching.sum() == 0 {
                        continue;
                    }
                    let mut others = class_distribution.clone();
                    others.remove_distribution(&matching);

                    best.offer(weighted_entropy(vec![&matching, &others], total), || {
                        Split::Indexed {
                            attribute_index,
                            index,
                            max_index,
                        }
                    });
                }
            }
            Some(Attribute::Discrete(_)) | Some(Attribute::Binary(_)) => {
                let partitions = data.attribute_class_distribution(attribute_index);
                best.offer(weighted_entropy(&partitions, total), || Split::Discrete {
                    attribute_index,
                });
            }
            Some(Attribute::Continuous(_)) => {
                scan_thresholds(data, class_distribution, attribute_index, &mut best);
            }
            None => {}
        }
    }

    best.split
}

/// Offers every midpoint between adjacent distinct values of a continuous attribute
///
/// Instances are moved one by one from the right to the left distribution in ascending order of
/// the attribute, so both distributions are updated incrementally.
fn scan_thresholds(
    data: &InstanceList,
    class_distribution: &DiscreteDistribution,
    attribute_index: usize,
    best: &mut BestSplit,
) {
    let total = data.len();
    let sorted = data.sorted_by_attribute(attribute_index);
    let mut left = DiscreteDistribution::new();
    let mut right = class_distribution.clone();
    let mut previous: Option<f64> = None;

    for instance in sorted.iter() {
        // instances without a value are sorted last and always end up on the right
        let value = match instance
            .attribute(attribute_index)
            .and_then(Attribute::continuous_value)
        {
            Some(value) => value,
            None => break,
        };

        if let Some(previous) = previous {
            if value != previous {
                let midpoint = (previous + value) / 2.0;
                // adjacent floats may round the midpoint up to `value`
                let threshold = if midpoint < value { midpoint } else { previous };
                best.offer(weighted_entropy(vec![&left, &right], total), || {
                    Split::Continuous {
                        attribute_index,
                        threshold,
                    }
                });
            }
        }

        previous = Some(value);
        left.add_item(instance.class_label());
        right.remove_item(instance.class_label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    fn continuous(rows: &[(&str, &[f64])]) -> InstanceList {
        rows.iter()
            .map(|(label, values)| {
                Instance::new(
                    *label,
                    values.iter().map(|value| Attribute::Continuous(*value)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn weighted_entropy_example() {
        let left: DiscreteDistribution = ["a", "a", "b", "b"].iter().copied().collect();
        let right: DiscreteDistribution = ["a", "a", "a", "a"].iter().copied().collect();

        // half of the instances with one bit of entropy, half pure
        assert_abs_diff_eq!(weighted_entropy(vec![&left, &right], 8), 0.5);
    }

    #[test]
    fn pure_partition_is_a_leaf() {
        let data = continuous(&[("a", &[1.0, 5.0]), ("a", &[2.0, 3.0]), ("a", &[3.0, 1.0])]);
        let node = DecisionNode::grow(&data, None, None, false);

        assert!(node.is_leaf());
        assert!(node.children().is_empty());
        assert_eq!(node.class_label(), "a");
        assert_eq!(node.class_distribution().sum(), 3);
    }

    #[test]
    fn continuous_split_uses_midpoint() {
        let data = continuous(&[("a", &[1.0]), ("a", &[2.0]), ("b", &[4.0]), ("b", &[6.0])]);
        let node = DecisionNode::grow(&data, None, None, false);

        assert!(!node.is_leaf());
        assert_eq!(node.children().len(), 2);
        assert_eq!(
            node.children()[0].condition(),
            Some(&DecisionCondition::new(0, Comparison::LessOrEqual(3.0)))
        );
        assert_eq!(
            node.children()[1].condition(),
            Some(&DecisionCondition::new(0, Comparison::Greater(3.0)))
        );
        assert_eq!(node.children()[0].class_label(), "a");
        assert_eq!(node.children()[1].class_label(), "b");
    }

    #[test]
    fn ties_go_to_the_first_attribute() {
        // both attributes separate the classes perfectly
        let data = continuous(&[("a", &[1.0, 10.0]), ("a", &[2.0, 20.0]), ("b", &[3.0, 30.0])]);
        let node = DecisionNode::grow(&data, None, None, false);

        let condition = node.children()[0].condition().unwrap();
        assert_eq!(condition.attribute_index(), 0);
        assert_eq!(condition.comparison(), &Comparison::LessOrEqual(2.5));
    }

    #[test]
    fn discrete_split_fans_out_per_value() {
        let rows = [
            ("sunny", "no"),
            ("rainy", "yes"),
            ("overcast", "yes"),
            ("sunny", "no"),
            ("rainy", "yes"),
        ];
        let data: InstanceList = rows
            .iter()
            .map(|(outlook, label)| Instance::new(*label, vec![Attribute::from(*outlook)]))
            .collect();
        let node = DecisionNode::grow(&data, None, None, false);

        let values: Vec<&Comparison> = node
            .children()
            .iter()
            .filter_map(|child| child.condition().map(DecisionCondition::comparison))
            .collect();
        assert_eq!(
            values,
            vec![
                &Comparison::Equals("sunny".into()),
                &Comparison::Equals("rainy".into()),
                &Comparison::Equals("overcast".into()),
            ]
        );
        assert!(node.children().iter().all(DecisionNode::is_leaf));
    }

    #[test]
    fn indexed_split_is_binary() {
        let data: InstanceList = [(0, "a"), (1, "b"), (2, "a"), (1, "b"), (0, "a")]
            .iter()
            .map(|(index, label)| {
                Instance::new(
                    *label,
                    vec![Attribute::discrete_indexed(index.to_string(), *index, 3)],
                )
            })
            .collect();
        let node = DecisionNode::grow(&data, None, None, false);

        assert_eq!(node.children().len(), 2);
        assert_eq!(
            node.children()[0].condition().map(DecisionCondition::comparison),
            Some(&Comparison::IndexEquals {
                index: 1,
                max_index: 3
            })
        );
        assert_eq!(node.children()[0].class_label(), "b");
        assert_eq!(node.children()[1].class_label(), "a");

        // any index other than the split index takes the second branch
        let unseen = Instance::new("?", vec![Attribute::discrete_indexed("2", 2, 3)]);
        assert_eq!(node.predict(&unseen), Some("a".to_string()));
    }

    #[test]
    fn identical_attributes_make_a_leaf() {
        let data = continuous(&[("a", &[1.0]), ("b", &[1.0]), ("a", &[1.0])]);
        let node = DecisionNode::grow(&data, None, None, false);

        assert!(node.is_leaf());
        assert_eq!(node.class_label(), "a");
    }

    #[test]
    fn empty_partition_is_a_leaf() {
        let node = DecisionNode::grow(&InstanceList::default(), None, None, false);

        assert!(node.is_leaf());
        assert_eq!(node.class_label(), "");
    }

    #[test]
    fn unseen_discrete_value_falls_back_to_node() {
        let data: InstanceList = [("red", "a"), ("blue", "b"), ("red", "a")]
            .iter()
            .map(|(color, label)| Instance::new(*label, vec![Attribute::from(*color)]))
            .collect();
        let node = DecisionNode::grow(&data, None, None, false);

        let unseen = Instance::new("?", vec![Attribute::from("green")]);
        assert_eq!(node.predict(&unseen), Some("a".to_string()));

        let probabilities = node.predict_probability(&unseen);
        assert_abs_diff_eq!(probabilities["a"], 2.0 / 3.0);
        assert_abs_diff_eq!(probabilities["b"], 1.0 / 3.0);
    }

    #[test]
    fn composite_instances_choose_among_acceptable_labels() {
        let data = continuous(&[("a", &[1.0]), ("a", &[1.0]), ("b", &[1.0]), ("c", &[5.0])]);
        let node = DecisionNode::grow(&data, None, None, false);

        let plain = Instance::new("?", vec![Attribute::Continuous(1.0)]);
        assert_eq!(node.predict(&plain), Some("a".to_string()));

        let composite = Instance::composite(vec!["b", "c"], vec![Attribute::Continuous(1.0)]);
        assert_eq!(node.predict(&composite), Some("b".to_string()));

        let hopeless = Instance::composite(vec!["z"], vec![Attribute::Continuous(1.0)]);
        assert_eq!(node.predict(&hopeless), None);
    }

    #[test]
    fn nan_values_are_routed_with_the_upper_partition() {
        let data = continuous(&[
            ("a", &[1.0]),
            ("a", &[2.0]),
            ("b", &[f64::NAN]),
            ("b", &[5.0]),
            ("b", &[6.0]),
        ]);
        let node = DecisionNode::grow(&data, None, None, false);

        assert_eq!(node.children().len(), 2);
        assert_eq!(
            node.children()[0].condition().map(DecisionCondition::comparison),
            Some(&Comparison::LessOrEqual(3.5))
        );
        assert!(node.children().iter().all(DecisionNode::is_leaf));
        assert_eq!(node.children()[1].class_distribution().count("b"), 3);

        // no child accepts NaN, the root predicts its majority
        let missing = Instance::new("?", vec![Attribute::Continuous(f64::NAN)]);
        assert_eq!(node.predict(&missing), Some("b".to_string()));
    }

    #[test]
    fn only_missing_values_make_a_leaf() {
        let data = continuous(&[("a", &[f64::NAN]), ("b", &[f64::NAN]), ("a", &[f64::NAN])]);
        let node = DecisionNode::grow(&data, None, None, false);

        assert!(node.is_leaf());
        assert_eq!(node.class_label(), "a");
    }

    #[test]
    fn sampler_restricts_candidates() {
        let mut sampler = AttributeSampler::new(5, 2);
        let candidates = sampler.candidates(6);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.windows(2).all(|pair| pair[0] < pair[1]));

        assert_eq!(AttributeSampler::new(5, 2).candidates(6), candidates);
        assert_eq!(AttributeSampler::new(5, 10).candidates(3), vec![0, 1, 2]);
    }
}
