use sylva::{
    error::{Error, Result},
    ParamGuard,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::DecisionTree;

/// The set of hyperparameters that can be specified for fitting a
/// [decision tree](struct.DecisionTree.html).
///
/// ### Example
///
/// ```rust
/// use sylva::prelude::*;
/// use sylva_trees::DecisionTree;
///
/// // Hold out a fifth of every class to prune the grown tree
/// let params = DecisionTree::params().prune(true).prune_ratio(0.2).seed(7);
///
/// let (train, test) = sylva_datasets::iris().stratified_split(0.8, 1);
/// let tree = params.fit(&train).unwrap();
/// assert!(tree.test(&test).accuracy() > 0.8);
/// ```
///
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionTreeValidParams {
    prune: bool,
    prune_ratio: f64,
    seed: u64,
    stump: bool,
}

impl DecisionTreeValidParams {
    pub fn prune(&self) -> bool {
        self.prune
    }

    pub fn prune_ratio(&self) -> f64 {
        self.prune_ratio
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stump(&self) -> bool {
        self.stump
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionTreeParams(DecisionTreeValidParams);

impl DecisionTreeParams {
    pub fn new() -> Self {
        Self(DecisionTreeValidParams {
            prune: true,
            prune_ratio: 0.2,
            seed: 1,
            stump: false,
        })
    }

    /// Sets whether the grown tree is pruned against a held out part of the training set
    pub fn prune(mut self, prune: bool) -> Self {
        self.0.prune = prune;
        self
    }

    /// Sets the share of every class held out for pruning
    pub fn prune_ratio(mut self, prune_ratio: f64) -> Self {
        self.0.prune_ratio = prune_ratio;
        self
    }

    /// Sets the seed of the stratified split into construction and pruning set
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }

    /// Restricts the tree to a single split at the root
    pub fn stump(mut self, stump: bool) -> Self {
        self.0.stump = stump;
        self
    }
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `prune = true`
    /// * `prune_ratio = 0.2`
    /// * `seed = 1`
    /// * `stump = false`
    pub fn params() -> DecisionTreeParams {
        DecisionTreeParams::new()
    }

    /// Parameters of a decision stump, a tree of depth one which is never pruned
    pub fn stump_params() -> DecisionTreeParams {
        DecisionTreeParams::new().stump(true).prune(false)
    }
}

/// Decision trees restricted to a single split at the root
///
/// Stumps are regular [`DecisionTree`]s, this type only provides their parameters.
///
/// ```rust
/// use sylva::prelude::*;
/// use sylva_trees::DecisionStump;
///
/// let stump = DecisionStump::params().fit(&sylva_datasets::iris()).unwrap();
/// assert_eq!(stump.max_depth(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionStump;

impl DecisionStump {
    pub fn params() -> DecisionTreeParams {
        DecisionTree::stump_params()
    }
}

impl ParamGuard for DecisionTreeParams {
    type Checked = DecisionTreeValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.stump && self.0.prune {
            Err(Error::Parameters(
                "a decision stump is never pruned, disable pruning".to_string(),
            ))
        } else if self.0.prune && !(self.0.prune_ratio > 0.0 && self.0.prune_ratio < 1.0) {
            Err(Error::Parameters(format!(
                "Prune ratio should be between zero and one (exclusive), but was {}",
                self.0.prune_ratio
            )))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
