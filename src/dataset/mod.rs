//! Datasets
//!
//! This module implements the instance model consumed by the learning algorithms: typed
//! attributes, labelled (and composite) instances, ordered instance lists with their class
//! statistics, and the partitioning and resampling operations built on top of them.
//!
//! * [`Attribute`]: a single feature value, continuous, discrete, discrete-indexed or binary
//! * [`Instance`]: an attribute vector with its class label or set of acceptable labels
//! * [`InstanceList`]: an ordered collection of instances, never mutated by its subdividing
//! operations
//! * [`DiscreteDistribution`]: counted class labels with entropy and majority queries
//! * [`Bootstrap`]: a seeded sample drawn with replacement

mod attribute;
mod bootstrap;
mod distribution;
mod instance;
mod instance_list;

pub use attribute::Attribute;
pub use bootstrap::Bootstrap;
pub use distribution::DiscreteDistribution;
pub use instance::Instance;
pub use instance_list::InstanceList;
