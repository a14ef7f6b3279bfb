use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A single feature value of an instance
///
/// The set of variants is closed; algorithms dispatch on it with exhaustive matches.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Real valued feature
    Continuous(f64),
    /// Unordered categorical feature
    Discrete(String),
    /// Categorical feature with a known cardinality, `index` is in `0..max_index`
    DiscreteIndexed {
        value: String,
        index: usize,
        max_index: usize,
    },
    /// Two-valued categorical feature
    Binary(bool),
}

impl Attribute {
    pub fn discrete_indexed(value: impl Into<String>, index: usize, max_index: usize) -> Self {
        Attribute::DiscreteIndexed {
            value: value.into(),
            index,
            max_index,
        }
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, Attribute::Continuous(_))
    }

    /// Returns the value of a continuous attribute, `None` for NaN which counts as missing
    pub fn continuous_value(&self) -> Option<f64> {
        match self {
            Attribute::Continuous(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }

    /// Returns the categorical value, binary attributes are rendered as `true` and `false`
    pub fn discrete_value(&self) -> Option<Cow<'_, str>> {
        match self {
            Attribute::Continuous(_) => None,
            Attribute::Discrete(value) | Attribute::DiscreteIndexed { value, .. } => {
                Some(Cow::Borrowed(value))
            }
            Attribute::Binary(value) => Some(Cow::Owned(value.to_string())),
        }
    }

    /// Number of numeric dimensions this attribute contributes to an instance vector
    pub fn continuous_size(&self) -> usize {
        match self {
            Attribute::Continuous(_) | Attribute::Binary(_) => 1,
            Attribute::DiscreteIndexed { max_index, .. } => *max_index,
            Attribute::Discrete(_) => 0,
        }
    }

    /// Renders the attribute as a partial numeric vector of length `continuous_size()`
    ///
    /// Indexed attributes are one-hot encoded.
    pub fn continuous_values(&self) -> Vec<f64> {
        match self {
            Attribute::Continuous(value) => vec![*value],
            Attribute::Binary(value) => vec![if *value { 1.0 } else { 0.0 }],
            Attribute::DiscreteIndexed {
                index, max_index, ..
            } => (0..*max_index)
                .map(|i| if i == *index { 1.0 } else { 0.0 })
                .collect(),
            Attribute::Discrete(_) => Vec::new(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Attribute::Continuous(value) => write!(f, "{}", value),
            Attribute::Discrete(value) | Attribute::DiscreteIndexed { value, .. } => {
                write!(f, "{}", value)
            }
            Attribute::Binary(value) => write!(f, "{}", value),
        }
    }
}

impl From<f64> for Attribute {
    fn from(value: f64) -> Self {
        Attribute::Continuous(value)
    }
}

impl From<bool> for Attribute {
    fn from(value: bool) -> Self {
        Attribute::Binary(value)
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Attribute::Discrete(value.to_string())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Attribute::Discrete(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Attribute;

    #[test]
    fn continuous_sizes_per_variant() {
        assert_eq!(Attribute::Continuous(2.5).continuous_size(), 1);
        assert_eq!(Attribute::Binary(true).continuous_size(), 1);
        assert_eq!(Attribute::from("red").continuous_size(), 0);
        assert_eq!(
            Attribute::discrete_indexed("green", 1, 4).continuous_size(),
            4
        );
    }

    #[test]
    fn indexed_attribute_is_one_hot() {
        let attribute = Attribute::discrete_indexed("green", 1, 3);
        assert_eq!(attribute.continuous_values(), vec![0.0, 1.0, 0.0]);
        assert_eq!(attribute.discrete_value().as_deref(), Some("green"));
    }

    #[test]
    fn binary_renders_as_discrete_value() {
        assert_eq!(Attribute::Binary(false).continuous_values(), vec![0.0]);
        assert_eq!(Attribute::Binary(false).discrete_value().as_deref(), Some("false"));
        assert_eq!(Attribute::Continuous(1.0).discrete_value(), None);
    }

    #[test]
    fn nan_is_a_missing_continuous_value() {
        assert_eq!(Attribute::Continuous(f64::NAN).continuous_value(), None);
        assert_eq!(Attribute::Continuous(-0.5).continuous_value(), Some(-0.5));
        assert!(Attribute::Continuous(f64::NAN).is_continuous());
    }
}
