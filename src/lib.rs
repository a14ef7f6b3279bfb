//! `sylva` provides the building blocks shared by its tree learners.
//!
//! The crate defines the instance model the learners consume, i.e. typed attributes, labelled
//! instances and instance lists together with their class statistics, partitioning and
//! bootstrap resampling, and the common surface every algorithm crate implements: the
//! [`Fit`](traits::Fit) and [`Classifier`](traits::Classifier) traits, hyperparameter checking
//! through [`ParamGuard`] and the shared [`Error`](error::Error) type.
//!
//! The learners themselves live in separate crates of the workspace, decision trees, decision
//! stumps, bagging and random forests in `sylva-trees`. Bundled datasets for tests and examples
//! are provided by `sylva-datasets`.
//!

pub mod benchmarks;
pub mod dataset;
pub mod error;
pub mod metrics;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Attribute, DiscreteDistribution, Instance, InstanceList};
pub use param_guard::ParamGuard;
