mod algorithm;
mod condition;
mod hyperparams;
mod iter;
mod node;

pub use algorithm::*;
pub use condition::*;
pub use hyperparams::*;
pub use iter::*;
pub use node::DecisionNode;

pub(crate) use node::AttributeSampler;
