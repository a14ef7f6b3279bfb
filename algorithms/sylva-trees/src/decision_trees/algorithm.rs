//! Decision trees over heterogeneous attributes
//!
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use sylva::{
    error::{Error, Result},
    traits::*,
    Instance, InstanceList,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::node::AttributeSampler;
use super::{DecisionNode, DecisionTreeValidParams, NodeIter};
use crate::persistence::{self, ModelReader};

/// A fitted decision tree model for classification.
///
/// ### Structure
/// Every internal node tests one attribute and has a child per outcome of the test:
/// * a continuous attribute is split at a threshold into `value <= threshold` and `value > threshold`;
/// * a discrete-indexed attribute is split into `index == k` and every other index;
/// * a discrete (or binary) attribute gets one child per value observed while growing the node.
///
/// Leaf nodes predict the most popular label of the training instances that reached them.
///
/// ### Algorithm
///
/// Starting with a single root node holding all training instances, every node is grown by:
///
/// * stopping if all its instances share one class label;
/// * computing for every attribute the split with the lowest entropy of the resulting partitions,
///   weighted by their size;
/// * splitting with the best attribute if that entropy is lower than the entropy of the node,
///   ties going to the lowest attribute index, and growing every child the same way.
///
/// A pruned tree is grown on part of the training set only. The remaining instances are used to
/// collapse, from the root downwards, every internal node whose removal does not lower the
/// accuracy of the tree on them.
///
/// ### Predictions
///
/// An instance is routed from the root along the children whose conditions it satisfies. If no
/// child accepts it, which happens for discrete values never seen during training, the current
/// node predicts. Composite instances are predicted the most frequent of their acceptable labels.
///
/// ### Example
///
/// ```rust
/// use sylva::prelude::*;
/// use sylva_trees::DecisionTree;
///
/// // Load the dataset
/// let dataset = sylva_datasets::iris();
/// // Fit the tree without pruning
/// let tree = DecisionTree::params().prune(false).fit(&dataset).unwrap();
/// // An unpruned tree separates its training set
/// assert_eq!(tree.test(&dataset).error_rate(), 0.0);
/// ```
///
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    root_node: DecisionNode,
}

impl Fit<Error> for DecisionTreeValidParams {
    type Object = DecisionTree;

    /// Grows a decision tree on `dataset`, pruning it against a stratified hold-out if
    /// requested
    fn fit(&self, dataset: &InstanceList) -> Result<Self::Object> {
        if dataset.is_empty() {
            return Err(Error::NotEnoughSamples);
        }

        if self.stump() || !self.prune() {
            let tree = DecisionTree::grow(dataset, None, self.stump());
            debug!(
                "grew {} on {} instances: {} nodes, {} leaves",
                if self.stump() { "stump" } else { "tree" },
                dataset.len(),
                tree.num_nodes(),
                tree.num_leaves()
            );
            return Ok(tree);
        }

        let (prune_set, train_set) = dataset.stratified_split(self.prune_ratio(), self.seed());
        if prune_set.is_empty() || train_set.is_empty() {
            return Err(Error::EmptyPruneSet {
                ratio: self.prune_ratio(),
                prune: prune_set.len(),
                train: train_set.len(),
            });
        }

        let mut tree = DecisionTree::grow(&train_set, None, false);
        let grown = tree.num_nodes();
        let collapsed = tree.prune(&prune_set);
        debug!(
            "grew tree on {} instances with {} nodes, pruning on {} instances collapsed {} nodes",
            train_set.len(),
            grown,
            prune_set.len(),
            collapsed
        );

        Ok(tree)
    }
}

impl DecisionTree {
    pub(crate) fn grow(
        data: &InstanceList,
        sampler: Option<&mut AttributeSampler>,
        stump: bool,
    ) -> Self {
        DecisionTree {
            root_node: DecisionNode::grow(data, None, sampler, stump),
        }
    }

    pub(crate) fn from_root(root_node: DecisionNode) -> Self {
        DecisionTree { root_node }
    }

    /// Prune the tree against `prune_set`
    ///
    /// Nodes are visited from the root downwards. An internal node is collapsed into a leaf
    /// when that does not lower the accuracy of the whole tree on `prune_set`, otherwise its
    /// children are visited with the same set. Returns the number of collapsed nodes.
    pub fn prune(&mut self, prune_set: &InstanceList) -> usize {
        let mut path = Vec::new();
        self.prune_node(&mut path, prune_set)
    }

    fn prune_node(&mut self, path: &mut Vec<usize>, prune_set: &InstanceList) -> usize {
        if self.node_at_mut(path).is_leaf() {
            return 0;
        }

        let before = self.test(prune_set).correct();
        self.node_at_mut(path).set_leaf(true);
        let after = self.test(prune_set).correct();

        let node = self.node_at_mut(path);
        if after >= before {
            node.collapse();
            return 1;
        }

        node.set_leaf(false);
        let mut collapsed = 0;
        for child in 0..node.children().len() {
            path.push(child);
            collapsed += self.prune_node(path, prune_set);
            path.pop();
        }
        collapsed
    }

    fn node_at_mut(&mut self, path: &[usize]) -> &mut DecisionNode {
        path.iter()
            .fold(&mut self.root_node, |node, &child| &mut node.children_mut()[child])
    }

    /// Create a node iterator in pre-order (DFT)
    pub fn iter_nodes(&self) -> NodeIter<'_> {
        NodeIter::new(&self.root_node)
    }

    /// Return root node of the tree
    pub fn root_node(&self) -> &DecisionNode {
        &self.root_node
    }

    /// Return max depth of the tree, zero for a single leaf
    pub fn max_depth(&self) -> usize {
        self.root_node.height()
    }

    /// Return the number of leaves in this tree
    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }

    pub fn num_nodes(&self) -> usize {
        self.iter_nodes().count()
    }

    /// Writes the tree in the line oriented model format
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        persistence::write_node(&self.root_node, writer)?;
        Ok(())
    }

    /// Reads a tree written by [`write_to`](DecisionTree::write_to)
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut reader = ModelReader::new(reader);
        let tree = reader.read_tree()?;
        reader.finish()?;
        Ok(tree)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(
            "saved tree with {} nodes to {}",
            self.num_nodes(),
            path.as_ref().display()
        );
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let tree = Self::read_from(BufReader::new(File::open(path.as_ref())?))?;
        debug!(
            "loaded tree with {} nodes from {}",
            tree.num_nodes(),
            path.as_ref().display()
        );
        Ok(tree)
    }
}

impl Classifier for DecisionTree {
    /// Composite instances that none of their acceptable labels reached are predicted their first
    /// acceptable label
    fn predict(&self, instance: &Instance) -> Option<String> {
        self.root_node.predict(instance).or_else(|| {
            instance
                .possible_class_labels()
                .and_then(|labels| labels.first().cloned())
        })
    }

    fn predict_probability(&self, instance: &Instance) -> BTreeMap<String, f64> {
        self.root_node.predict_probability(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use sylva::{Attribute, ParamGuard};

    fn labelled(rows: &[(f64, f64, &str)]) -> InstanceList {
        rows.iter()
            .map(|(x, y, label)| {
                Instance::new(*label, vec![Attribute::Continuous(*x), Attribute::Continuous(*y)])
            })
            .collect()
    }

    /// Four clusters, the first attribute splits off class `a`, the second separates the rest
    fn quadrants() -> InstanceList {
        let mut rows = Vec::new();
        for i in 0..10 {
            let offset = i as f64 * 0.1;
            rows.push((offset, offset, "a"));
            rows.push((offset, 5.0 + offset, "a"));
            rows.push((5.0 + offset, offset, "b"));
            rows.push((5.0 + offset, 5.0 + offset, "c"));
        }
        labelled(&rows)
    }

    #[test]
    fn unpruned_tree_separates_training_set() -> Result<()> {
        let data = quadrants();
        let tree = DecisionTree::params().prune(false).fit(&data)?;

        assert_abs_diff_eq!(tree.test(&data).accuracy(), 1.0);
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.num_nodes(), 5);

        Ok(())
    }

    #[test]
    fn stump_has_depth_one() -> Result<()> {
        let data = quadrants();
        let tree = DecisionTree::stump_params().fit(&data)?;

        assert_eq!(tree.max_depth(), 1);
        assert!(tree.root_node().children().iter().all(DecisionNode::is_leaf));
        // class `b` and `c` share a leaf
        assert_abs_diff_eq!(tree.test(&data).accuracy(), 0.75);

        Ok(())
    }

    #[test]
    fn pruning_collapses_useless_subtrees() {
        let data = quadrants();
        let mut tree = DecisionTree::grow(&data, None, false);

        // a pruning set in which `b` and `c` are indistinguishable for the tree
        let prune_set = labelled(&[(1.0, 1.0, "a"), (6.0, 1.0, "b"), (6.0, 6.0, "b")]);
        let before = tree.test(&prune_set).accuracy();
        let collapsed = tree.prune(&prune_set);

        assert_eq!(collapsed, 1);
        assert_eq!(tree.max_depth(), 1);
        assert!(tree.test(&prune_set).accuracy() >= before);
    }

    #[test]
    fn pruning_keeps_useful_subtrees() {
        let data = quadrants();
        let mut tree = DecisionTree::grow(&data, None, false);

        let prune_set = labelled(&[(1.0, 1.0, "a"), (6.0, 1.0, "b"), (6.0, 6.0, "c")]);
        assert_eq!(tree.prune(&prune_set), 0);
        assert_eq!(tree.num_nodes(), 5);
    }

    #[test]
    fn composite_fallback_to_first_acceptable_label() {
        let tree = DecisionTree::grow(&quadrants(), None, false);
        let instance = Instance::composite(vec!["x", "y"], vec![Attribute::Continuous(0.0)]);

        assert_eq!(tree.predict(&instance), Some("x".to_string()));
    }

    #[test]
    fn fitting_empty_set_fails() {
        let result = DecisionTree::params()
            .prune(false)
            .fit(&InstanceList::default());
        assert!(matches!(result, Err(Error::NotEnoughSamples)));
    }

    #[test]
    fn tiny_prune_ratio_is_rejected_at_fit() {
        // a single instance per class always lands in the pruning set
        let data = labelled(&[(0.0, 0.0, "a"), (1.0, 1.0, "b")]);
        let result = DecisionTree::params().prune_ratio(0.1).fit(&data);
        assert!(matches!(result, Err(Error::EmptyPruneSet { .. })));
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(DecisionTree::params().prune_ratio(0.0).check().is_err());
        assert!(DecisionTree::params().prune_ratio(1.0).check().is_err());
        assert!(DecisionTree::params().stump(true).check().is_err());
        assert!(DecisionTree::params().prune(false).prune_ratio(2.0).check().is_ok());
        assert!(DecisionTree::stump_params().check().is_ok());
    }
}
