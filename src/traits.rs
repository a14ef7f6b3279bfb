//! Provide traits for different classes of algorithms
//!

use std::collections::BTreeMap;

use crate::dataset::{Instance, InstanceList};
use crate::metrics::ClassificationPerformance;

/// Fittable algorithms
///
/// A fittable algorithm takes a list of labelled instances and creates a concept of some kind
/// about it. The hyperparameters live in the implementing type, the learned model is returned
/// as `Self::Object`.
pub trait Fit<E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, dataset: &InstanceList) -> Result<Self::Object, E>;
}

/// Trained classifiers
pub trait Classifier {
    /// Predict the class label of a single instance
    ///
    /// `None` is returned if the model has no opinion about the instance.
    fn predict(&self, instance: &Instance) -> Option<String>;

    /// Posterior probability of every class label the model knows about
    fn predict_probability(&self, instance: &Instance) -> BTreeMap<String, f64>;

    /// Predict every instance of `test_set` and count the agreeing predictions
    ///
    /// For composite instances a prediction is correct if it is one of the acceptable labels.
    fn test(&self, test_set: &InstanceList) -> ClassificationPerformance {
        test_set
            .iter()
            .fold(ClassificationPerformance::default(), |mut performance, instance| {
                let correct = self
                    .predict(instance)
                    .map(|label| instance.accepts(&label))
                    .unwrap_or(false);
                performance.record(correct);
                performance
            })
    }
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn predict(&self, instance: &Instance) -> Option<String> {
        (**self).predict(instance)
    }

    fn predict_probability(&self, instance: &Instance) -> BTreeMap<String, f64> {
        (**self).predict_probability(instance)
    }
}
