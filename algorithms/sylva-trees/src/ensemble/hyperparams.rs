use sylva::{
    error::{Error, Result},
    ParamGuard,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::TreeEnsemble;

/// The set of hyperparameters of a bagged ensemble of decision trees
///
/// Every tree `i` is grown on a bootstrap sample of the training set drawn with seed
/// `seed + i`. With pruning enabled the same seed stratifies the split of that sample into
/// construction and pruning set.
///
/// ### Example
///
/// ```rust
/// use sylva::prelude::*;
/// use sylva_trees::TreeEnsemble;
///
/// let (train, test) = sylva_datasets::iris().stratified_split(0.8, 3);
/// let bagging = TreeEnsemble::bagging().ensemble_size(25).seed(4).fit(&train).unwrap();
///
/// assert_eq!(bagging.len(), 25);
/// assert!(bagging.test(&test).accuracy() > 0.8);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaggingValidParams {
    ensemble_size: usize,
    seed: u64,
    prune: bool,
    prune_ratio: f64,
}

impl BaggingValidParams {
    pub fn ensemble_size(&self) -> usize {
        self.ensemble_size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn prune(&self) -> bool {
        self.prune
    }

    pub fn prune_ratio(&self) -> f64 {
        self.prune_ratio
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaggingParams(BaggingValidParams);

impl BaggingParams {
    pub fn new() -> Self {
        Self(BaggingValidParams {
            ensemble_size: 100,
            seed: 1,
            prune: false,
            prune_ratio: 0.2,
        })
    }

    /// Sets the number of trees
    pub fn ensemble_size(mut self, ensemble_size: usize) -> Self {
        self.0.ensemble_size = ensemble_size;
        self
    }

    /// Sets the seed the per-tree seeds are derived from
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }

    /// Sets whether every tree is pruned against a held out part of its bootstrap sample
    pub fn prune(mut self, prune: bool) -> Self {
        self.0.prune = prune;
        self
    }

    pub fn prune_ratio(mut self, prune_ratio: f64) -> Self {
        self.0.prune_ratio = prune_ratio;
        self
    }
}

impl Default for BaggingParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamGuard for BaggingParams {
    type Checked = BaggingValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.ensemble_size == 0 {
            Err(Error::Parameters(
                "Ensemble size should be at least one".to_string(),
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

/// The set of hyperparameters of a random forest
///
/// A random forest is a bagged ensemble whose trees consider only a random subset of the
/// attributes at every node. Trees are never pruned.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomForestValidParams {
    ensemble_size: usize,
    seed: u64,
    attribute_subset_size: Option<usize>,
}

impl RandomForestValidParams {
    pub fn ensemble_size(&self) -> usize {
        self.ensemble_size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The configured subset size, `None` if it follows the attribute count
    pub fn attribute_subset_size(&self) -> Option<usize> {
        self.attribute_subset_size
    }

    /// Number of candidate attributes per node for data with `attribute_count` attributes
    ///
    /// Defaults to the rounded up square root of the attribute count.
    pub fn subset_size_for(&self, attribute_count: usize) -> usize {
        self.attribute_subset_size
            .unwrap_or_else(|| (attribute_count as f64).sqrt().ceil() as usize)
            .max(1)
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomForestParams(RandomForestValidParams);

impl RandomForestParams {
    pub fn new() -> Self {
        Self(RandomForestValidParams {
            ensemble_size: 100,
            seed: 1,
            attribute_subset_size: None,
        })
    }

    pub fn ensemble_size(mut self, ensemble_size: usize) -> Self {
        self.0.ensemble_size = ensemble_size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }

    /// Sets the number of attributes drawn as split candidates at every node
    ///
    /// Sizes above the attribute count make every attribute a candidate, as in bagging.
    pub fn attribute_subset_size(mut self, attribute_subset_size: usize) -> Self {
        self.0.attribute_subset_size = Some(attribute_subset_size);
        self
    }
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamGuard for RandomForestParams {
    type Checked = RandomForestValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.ensemble_size == 0 {
            Err(Error::Parameters(
                "Ensemble size should be at least one".to_string(),
            ))
        } else if self.0.attribute_subset_size == Some(0) {
            Err(Error::Parameters(
                "Attribute subset size should be at least one".to_string(),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl TreeEnsemble {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `ensemble_size = 100`
    /// * `seed = 1`
    /// * `prune = false`
    /// * `prune_ratio = 0.2`
    pub fn bagging() -> BaggingParams {
        BaggingParams::new()
    }

    /// Defaults are provided if the optional parameters are not specified:
    /// * `ensemble_size = 100`
    /// * `seed = 1`
    /// * `attribute_subset_size` the rounded up square root of the attribute count
    pub fn random_forest() -> RandomForestParams {
        RandomForestParams::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bagging_defaults() {
        let params = TreeEnsemble::bagging().check_unwrap();
        assert_eq!(params.ensemble_size(), 100);
        assert_eq!(params.seed(), 1);
        assert!(!params.prune());
    }

    #[test]
    fn invalid_ensembles_are_rejected() {
        assert!(TreeEnsemble::bagging().ensemble_size(0).check().is_err());
        assert!(TreeEnsemble::bagging().prune(true).prune_ratio(1.5).check().is_err());
        assert!(TreeEnsemble::bagging().prune_ratio(1.5).check().is_ok());
        assert!(TreeEnsemble::random_forest().ensemble_size(0).check().is_err());
        assert!(TreeEnsemble::random_forest()
            .attribute_subset_size(0)
            .check()
            .is_err());
    }

    #[test]
    fn subset_size_defaults_to_square_root() {
        let params = TreeEnsemble::random_forest().check_unwrap();
        assert_eq!(params.subset_size_for(4), 2);
        assert_eq!(params.subset_size_for(10), 4);
        assert_eq!(params.subset_size_for(0), 1);

        let params = TreeEnsemble::random_forest()
            .attribute_subset_size(7)
            .check_unwrap();
        assert_eq!(params.subset_size_for(4), 7);
    }
}
