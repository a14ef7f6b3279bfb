//! sylva prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::traits::*;

#[doc(no_inline)]
pub use crate::dataset::{Attribute, Bootstrap, DiscreteDistribution, Instance, InstanceList};

#[doc(no_inline)]
pub use crate::metrics::ClassificationPerformance;

#[doc(no_inline)]
pub use crate::param_guard::ParamGuard;
