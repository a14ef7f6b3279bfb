//! Line oriented model files
//!
//! A tree is written in pre-order. Every node starts with its condition line, `-1` for the root,
//! followed by the number of its children. Internal nodes continue with their children, leaves
//! with their class label, the number of distinct labels they saw and one `<label> <count>` line
//! per label. An ensemble file is the number of trees followed by every tree.
use std::io::{self, BufRead, Lines, Write};
use std::str::FromStr;

use sylva::{
    error::{Error, Result},
    DiscreteDistribution,
};

use crate::decision_trees::{Comparison, DecisionCondition, DecisionNode, DecisionTree};

const ROOT_CONDITION: &str = "-1";

pub(crate) fn write_node<W: Write>(node: &DecisionNode, writer: &mut W) -> io::Result<()> {
    match node.condition() {
        Some(condition) => writeln!(writer, "{}", condition)?,
        None => writeln!(writer, "{}", ROOT_CONDITION)?,
    }

    writeln!(writer, "{}", node.children().len())?;
    if node.children().is_empty() {
        let distribution = node.class_distribution();
        writeln!(writer, "{}", node.class_label())?;
        writeln!(writer, "{}", distribution.len())?;
        for (label, count) in distribution.iter() {
            writeln!(writer, "{} {}", label, count)?;
        }
    } else {
        for child in node.children() {
            write_node(child, writer)?;
        }
    }

    Ok(())
}

/// Reads model files line by line, keeping track of the line number for error reports
pub(crate) struct ModelReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> ModelReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        ModelReader {
            lines: reader.lines(),
            line: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::ModelFormat {
            line: self.line,
            reason: reason.into(),
        }
    }

    /// Next line as written, line endings already removed
    fn next_line(&mut self) -> Result<String> {
        self.line += 1;
        match self.lines.next() {
            Some(line) => Ok(line?),
            None => Err(self.error("unexpected end of file")),
        }
    }

    fn parse<T: FromStr>(&self, token: &str, what: &str) -> Result<T> {
        token
            .trim()
            .parse()
            .map_err(|_| self.error(format!("invalid {} `{}`", what, token)))
    }

    pub(crate) fn read_count(&mut self, what: &str) -> Result<usize> {
        let line = self.next_line()?;
        self.parse(&line, what)
    }

    pub(crate) fn read_tree(&mut self) -> Result<DecisionTree> {
        let start = self.line + 1;
        let root = self.read_node()?;
        if root.condition().is_some() {
            return Err(Error::ModelFormat {
                line: start,
                reason: "the root node must not have a condition".to_string(),
            });
        }
        Ok(DecisionTree::from_root(root))
    }

    fn read_node(&mut self) -> Result<DecisionNode> {
        let condition = self.read_condition()?;
        let child_count = self.read_count("child count")?;

        if child_count == 0 {
            let class_label = self.next_line()?;
            let distribution = self.read_distribution()?;
            return Ok(DecisionNode::from_parts(
                condition,
                Vec::new(),
                Some(class_label),
                distribution,
            ));
        }

        let start = self.line + 1;
        let children = (0..child_count)
            .map(|_| self.read_node())
            .collect::<Result<Vec<_>>>()?;
        if children.iter().any(|child| child.condition().is_none()) {
            return Err(Error::ModelFormat {
                line: start,
                reason: "child node without condition".to_string(),
            });
        }

        Ok(DecisionNode::from_parts(
            condition,
            children,
            None,
            DiscreteDistribution::new(),
        ))
    }

    fn read_condition(&mut self) -> Result<Option<DecisionCondition>> {
        let line = self.next_line()?;
        if line.trim_end() == ROOT_CONDITION {
            return Ok(None);
        }

        // discrete values are kept verbatim, they may be empty or end in spaces
        let mut tokens = line.splitn(3, ' ');
        let (attribute_index, symbol, value) = match (tokens.next(), tokens.next(), tokens.next())
        {
            (Some(index), Some(symbol), Some(value)) => (index, symbol, value),
            _ => return Err(self.error(format!("invalid condition `{}`", line))),
        };
        let attribute_index: usize = self.parse(attribute_index, "attribute index")?;

        let comparison = match symbol {
            "=" => Comparison::Equals(value.to_string()),
            "<" => Comparison::LessOrEqual(self.parse(value, "threshold")?),
            ">" => Comparison::Greater(self.parse(value, "threshold")?),
            ":" => {
                let (index, max_index) = value
                    .trim_end()
                    .split_once(' ')
                    .ok_or_else(|| self.error(format!("invalid indexed value `{}`", value)))?;
                let max_index: usize = self.parse(max_index, "maximum index")?;
                match self.parse::<i64>(index, "index")? {
                    -1 => Comparison::IndexOther { max_index },
                    index if index >= 0 => Comparison::IndexEquals {
                        index: index as usize,
                        max_index,
                    },
                    _ => return Err(self.error(format!("invalid index `{}`", index))),
                }
            }
            _ => return Err(self.error(format!("unknown comparator `{}`", symbol))),
        };

        Ok(Some(DecisionCondition::new(attribute_index, comparison)))
    }

    fn read_distribution(&mut self) -> Result<DiscreteDistribution> {
        let label_count = self.read_count("label count")?;
        let mut distribution = DiscreteDistribution::new();
        for _ in 0..label_count {
            let line = self.next_line()?;
            let (label, count) = line
                .trim_end()
                .rsplit_once(' ')
                .ok_or_else(|| self.error(format!("invalid label count `{}`", line)))?;
            let count: usize = self.parse(count, "count")?;
            if count == 0 || distribution.contains(label) {
                return Err(self.error(format!("invalid count for label `{}`", label)));
            }
            distribution.add_count(label, count);
        }
        Ok(distribution)
    }

    /// Fails if anything but blank lines follows the model
    pub(crate) fn finish(self) -> Result<()> {
        let mut line = self.line;
        for content in self.lines {
            line += 1;
            if !content?.trim().is_empty() {
                return Err(Error::ModelFormat {
                    line,
                    reason: "unexpected content after the model".to_string(),
                });
            }
        }
        Ok(())
    }
}
