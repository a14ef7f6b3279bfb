use std::iter::Iterator;

use super::DecisionNode;

/// Pre-order (DFT) iterator of nodes in a decision tree
pub struct NodeIter<'a> {
    stack: Vec<&'a DecisionNode>,
}

impl<'a> NodeIter<'a> {
    pub fn new(root: &'a DecisionNode) -> Self {
        NodeIter { stack: vec![root] }
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a DecisionNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().map(|node| {
            // push in reverse so that the first child is visited first
            self.stack.extend(node.children().iter().rev());
            node
        })
    }
}
