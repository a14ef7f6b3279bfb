//! Common metrics for performance evaluation of classifiers
//!

use std::fmt;

/// Number of correct predictions out of the number of tested instances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationPerformance {
    correct: usize,
    total: usize,
}

impl ClassificationPerformance {
    pub fn new(correct: usize, total: usize) -> Self {
        assert!(correct <= total, "more correct predictions than instances");
        ClassificationPerformance { correct, total }
    }

    pub(crate) fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction of correct predictions, one for an empty test set
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    pub fn error_rate(&self) -> f64 {
        1.0 - self.accuracy()
    }
}

impl fmt::Display for ClassificationPerformance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{} correct (accuracy {:.4})",
            self.correct,
            self.total,
            self.accuracy()
        )
    }
}
