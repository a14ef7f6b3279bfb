//!
//! # Decision tree learning
//! `sylva-trees` provides decision tree induction and tree ensembles over instances with
//! continuous, discrete, discrete-indexed and binary attributes.
//!
//! # The big picture
//!
//! `sylva-trees` is a crate in the `sylva` workspace. The instance model, the [`Fit`] and
//! [`Classifier`] traits and the shared error type live in the `sylva` crate.
//!
//! Decision trees are grown greedily: every node is split on the attribute whose partitions
//! have the lowest weighted entropy, until the partitions are pure or no split improves on them.
//!
//! # Current state
//!
//! `sylva-trees` currently provides
//! * [decision trees](DecisionTree) with optional pruning against a stratified hold-out set,
//! * [decision stumps](DecisionStump), trees with a single split,
//! * [tree ensembles](TreeEnsemble) fitted by bagging or as random forests,
//! * a line oriented text format to save and load trees and ensembles.
//!
//! [`Fit`]: sylva::traits::Fit
//! [`Classifier`]: sylva::traits::Classifier

mod decision_trees;
mod ensemble;
mod persistence;

pub use decision_trees::*;
pub use ensemble::*;

pub use sylva::error::Result;
