use std::fmt;

use sylva::{Attribute, Instance};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// The test applied to the attribute referenced by a [`DecisionCondition`]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// Discrete or binary attribute equal to the value
    Equals(String),
    /// Indexed attribute with exactly this index
    IndexEquals { index: usize, max_index: usize },
    /// Any indexed attribute, the branch taken when its `IndexEquals` sibling does not match
    IndexOther { max_index: usize },
    /// Continuous attribute at most the threshold
    LessOrEqual(f64),
    /// Continuous attribute above the threshold
    Greater(f64),
}

impl Comparison {
    /// The character identifying the comparison in the model file format
    pub fn symbol(&self) -> char {
        match self {
            Comparison::Equals(_) => '=',
            Comparison::IndexEquals { .. } | Comparison::IndexOther { .. } => ':',
            Comparison::LessOrEqual(_) => '<',
            Comparison::Greater(_) => '>',
        }
    }
}

/// The condition an instance satisfied to be routed from a parent node into a child
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionCondition {
    attribute_index: usize,
    comparison: Comparison,
}

impl DecisionCondition {
    pub fn new(attribute_index: usize, comparison: Comparison) -> Self {
        DecisionCondition {
            attribute_index,
            comparison,
        }
    }

    pub fn attribute_index(&self) -> usize {
        self.attribute_index
    }

    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    /// Whether `instance` passes the test. An attribute of a different kind than the one the
    /// condition was built for never passes.
    pub fn satisfied_by(&self, instance: &Instance) -> bool {
        let attribute = match instance.attribute(self.attribute_index) {
            Some(attribute) => attribute,
            None => return false,
        };

        match &self.comparison {
            Comparison::Equals(expected) => match attribute {
                Attribute::Discrete(value) => value == expected,
                Attribute::Binary(value) => *expected == value.to_string(),
                Attribute::Continuous(_) | Attribute::DiscreteIndexed { .. } => false,
            },
            Comparison::IndexEquals { index, .. } => match attribute {
                Attribute::DiscreteIndexed { index: found, .. } => found == index,
                _ => false,
            },
            Comparison::IndexOther { .. } => {
                matches!(attribute, Attribute::DiscreteIndexed { .. })
            }
            Comparison::LessOrEqual(threshold) => match attribute {
                Attribute::Continuous(value) => value <= threshold,
                _ => false,
            },
            Comparison::Greater(threshold) => match attribute {
                Attribute::Continuous(value) => value > threshold,
                _ => false,
            },
        }
    }
}

/// Renders the condition line of the model file format
impl fmt::Display for DecisionCondition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = self.comparison.symbol();
        match &self.comparison {
            Comparison::Equals(value) => write!(f, "{} {} {}", self.attribute_index, symbol, value),
            Comparison::IndexEquals { index, max_index } => write!(
                f,
                "{} {} {} {}",
                self.attribute_index, symbol, index, max_index
            ),
            Comparison::IndexOther { max_index } => {
                write!(f, "{} {} -1 {}", self.attribute_index, symbol, max_index)
            }
            Comparison::LessOrEqual(threshold) | Comparison::Greater(threshold) => {
                write!(f, "{} {} {}", self.attribute_index, symbol, threshold)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Comparison, DecisionCondition};
    use sylva::{Attribute, Instance};

    fn instance() -> Instance {
        Instance::new(
            "label",
            vec![
                Attribute::from("sunny"),
                Attribute::discrete_indexed("mild", 1, 3),
                Attribute::Continuous(2.5),
                Attribute::Binary(true),
            ],
        )
    }

    #[test]
    fn conditions_match_their_attribute_kind() {
        let instance = instance();

        let cases = vec![
            (0, Comparison::Equals("sunny".into()), true),
            (0, Comparison::Equals("rainy".into()), false),
            (1, Comparison::IndexEquals { index: 1, max_index: 3 }, true),
            (1, Comparison::IndexEquals { index: 2, max_index: 3 }, false),
            (1, Comparison::IndexOther { max_index: 3 }, true),
            (2, Comparison::LessOrEqual(2.5), true),
            (2, Comparison::Greater(2.5), false),
            (3, Comparison::Equals("true".into()), true),
            // kind mismatches
            (2, Comparison::Equals("2.5".into()), false),
            (0, Comparison::LessOrEqual(10.0), false),
            (0, Comparison::IndexOther { max_index: 3 }, false),
            // out of range attribute
            (9, Comparison::Greater(0.0), false),
        ];

        for (attribute_index, comparison, expected) in cases {
            let condition = DecisionCondition::new(attribute_index, comparison);
            assert_eq!(condition.satisfied_by(&instance), expected, "{}", condition);
        }
    }

    #[test]
    fn display_follows_model_format() {
        let render = |index, comparison| DecisionCondition::new(index, comparison).to_string();

        assert_eq!(render(0, Comparison::Equals("sunny day".into())), "0 = sunny day");
        assert_eq!(
            render(1, Comparison::IndexEquals { index: 2, max_index: 4 }),
            "1 : 2 4"
        );
        assert_eq!(render(1, Comparison::IndexOther { max_index: 4 }), "1 : -1 4");
        assert_eq!(render(2, Comparison::LessOrEqual(2.45)), "2 < 2.45");
        assert_eq!(render(2, Comparison::Greater(0.5)), "2 > 0.5");
    }
}
