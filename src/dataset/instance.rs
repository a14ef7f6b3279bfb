use ndarray::Array1;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::Attribute;

/// A labelled observation
///
/// A composite instance does not know its true class label, only the set of labels it may have.
/// Its `class_label` is the first acceptable label.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    attributes: Vec<Attribute>,
    class_label: String,
    possible_class_labels: Option<Vec<String>>,
}

impl Instance {
    pub fn new(class_label: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Instance {
            attributes,
            class_label: class_label.into(),
            possible_class_labels: None,
        }
    }

    /// Creates a composite instance, panics if `possible_class_labels` is empty
    pub fn composite<S: Into<String>>(
        possible_class_labels: Vec<S>,
        attributes: Vec<Attribute>,
    ) -> Self {
        let labels: Vec<String> = possible_class_labels.into_iter().map(Into::into).collect();
        assert!(
            !labels.is_empty(),
            "a composite instance needs at least one acceptable label"
        );

        Instance {
            attributes,
            class_label: labels[0].clone(),
            possible_class_labels: Some(labels),
        }
    }

    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    pub fn is_composite(&self) -> bool {
        self.possible_class_labels.is_some()
    }

    /// Acceptable labels of a composite instance, `None` for plain instances
    pub fn possible_class_labels(&self) -> Option<&[String]> {
        self.possible_class_labels.as_deref()
    }

    /// Whether predicting `label` counts as correct for this instance
    pub fn accepts(&self, label: &str) -> bool {
        match &self.possible_class_labels {
            Some(labels) => labels.iter().any(|possible| possible == label),
            None => self.class_label == label,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Concatenates the numeric rendering of every attribute
    pub fn to_vector(&self) -> Array1<f64> {
        self.attributes
            .iter()
            .flat_map(|attribute| attribute.continuous_values())
            .collect()
    }

    pub fn continuous_size(&self) -> usize {
        self.attributes.iter().map(Attribute::continuous_size).sum()
    }
}
