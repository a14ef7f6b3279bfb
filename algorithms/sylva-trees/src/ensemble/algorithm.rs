//! Bagging and random forests
//!
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, trace};
use sylva::{
    error::{Error, Result},
    traits::*,
    DiscreteDistribution, Instance, InstanceList, ParamGuard,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::{BaggingValidParams, RandomForestValidParams};
use crate::decision_trees::{AttributeSampler, DecisionTree};
use crate::persistence::ModelReader;

/// An ensemble of decision trees voting on the class label
///
/// Each tree is grown on its own bootstrap sample of the training set, which is resampled with
/// the seed `seed + i` for the tree at position `i`. Ensembles are fitted through
/// [`TreeEnsemble::bagging`] or [`TreeEnsemble::random_forest`]:
///
/// * bagging grows plain decision trees, optionally pruned;
/// * a random forest restricts every node of its trees to a random subset of the attributes,
///   drawn from a generator seeded per tree.
///
/// ### Example
///
/// ```rust
/// use sylva::prelude::*;
/// use sylva_trees::TreeEnsemble;
///
/// let (train, test) = sylva_datasets::iris().stratified_split(0.8, 1);
/// let forest = TreeEnsemble::random_forest()
///     .ensemble_size(30)
///     .seed(42)
///     .fit(&train)
///     .unwrap();
///
/// assert_eq!(forest.len(), 30);
/// assert!(forest.test(&test).accuracy() > 0.8);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    trees: Vec<DecisionTree>,
}

impl Fit<Error> for BaggingValidParams {
    type Object = TreeEnsemble;

    fn fit(&self, dataset: &InstanceList) -> Result<Self::Object> {
        if dataset.is_empty() {
            return Err(Error::NotEnoughSamples);
        }

        let trees = (0..self.ensemble_size())
            .map(|i| {
                let seed = self.seed().wrapping_add(i as u64);
                let bootstrap = dataset.bootstrap(seed);
                let params = DecisionTree::params()
                    .prune(self.prune())
                    .prune_ratio(self.prune_ratio())
                    .seed(seed)
                    .check()?;
                let tree = params.fit(bootstrap.sample())?;
                trace!(
                    "bagging tree {} (seed {}) has {} nodes",
                    i,
                    seed,
                    tree.num_nodes()
                );
                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "bagged {} trees on {} instances",
            trees.len(),
            dataset.len()
        );
        Ok(TreeEnsemble { trees })
    }
}

impl Fit<Error> for RandomForestValidParams {
    type Object = TreeEnsemble;

    fn fit(&self, dataset: &InstanceList) -> Result<Self::Object> {
        if dataset.is_empty() {
            return Err(Error::NotEnoughSamples);
        }

        let subset_size = self.subset_size_for(dataset.attribute_count());
        let trees: Vec<DecisionTree> = (0..self.ensemble_size())
            .map(|i| {
                let seed = self.seed().wrapping_add(i as u64);
                let bootstrap = dataset.bootstrap(seed);
                let mut sampler = AttributeSampler::new(seed, subset_size);
                let tree = DecisionTree::grow(bootstrap.sample(), Some(&mut sampler), false);
                trace!(
                    "random forest tree {} (seed {}) has {} nodes",
                    i,
                    seed,
                    tree.num_nodes()
                );
                tree
            })
            .collect();

        debug!(
            "grew random forest of {} trees on {} instances with {} of {} attributes per node",
            trees.len(),
            dataset.len(),
            subset_size.min(dataset.attribute_count()),
            dataset.attribute_count()
        );
        Ok(TreeEnsemble { trees })
    }
}

impl TreeEnsemble {
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Number of trees in the ensemble
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Predictions of all trees that have an opinion about `instance`
    pub fn votes(&self, instance: &Instance) -> DiscreteDistribution {
        let mut votes = DiscreteDistribution::new();
        for label in self.trees.iter().filter_map(|tree| tree.predict(instance)) {
            votes.add_item(&label);
        }
        votes
    }

    /// Writes the number of trees followed by every tree
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.trees.len())?;
        for tree in &self.trees {
            tree.write_to(writer)?;
        }
        Ok(())
    }

    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut reader = ModelReader::new(reader);
        let tree_count = reader.read_count("tree count")?;
        if tree_count == 0 {
            return Err(Error::ModelFormat {
                line: 1,
                reason: "an ensemble needs at least one tree".to_string(),
            });
        }

        let trees = (0..tree_count)
            .map(|_| reader.read_tree())
            .collect::<Result<Vec<_>>>()?;
        reader.finish()?;

        Ok(TreeEnsemble { trees })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(
            "saved ensemble of {} trees to {}",
            self.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ensemble = Self::read_from(BufReader::new(File::open(path.as_ref())?))?;
        debug!(
            "loaded ensemble of {} trees from {}",
            ensemble.len(),
            path.as_ref().display()
        );
        Ok(ensemble)
    }
}

impl Classifier for TreeEnsemble {
    /// Plurality vote of the trees, ties going to the lexicographically smallest label
    fn predict(&self, instance: &Instance) -> Option<String> {
        self.votes(instance).max_item().map(str::to_string)
    }

    /// Share of the trees voting for every label
    fn predict_probability(&self, instance: &Instance) -> BTreeMap<String, f64> {
        self.votes(instance).probability_distribution()
    }
}

impl From<Vec<DecisionTree>> for TreeEnsemble {
    fn from(trees: Vec<DecisionTree>) -> Self {
        TreeEnsemble { trees }
    }
}
