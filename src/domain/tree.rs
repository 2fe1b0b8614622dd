// Syntax tree data structure for astdot.
// A producer builds the tree once; exporters only read it.

use serde::{Deserialize, Serialize};

/// A node in the abstract syntax tree.
///
/// `kind` classifies the construct (a grammar rule or token category),
/// `value` holds the lexeme and is empty when there is none. Children are
/// owned exclusively and kept in production order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub kind: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    /// A node without a lexeme.
    pub fn leaf(kind: impl Into<String>) -> Self {
        Self::new(kind, "")
    }

    /// Builder form of [`TreeNode::push_child`].
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Kind and value joined by a single space. The space is kept even when
    /// the value is empty.
    pub fn label(&self) -> String {
        format!("{} {}", self.kind, self.value)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Height of the subtree: 0 for a leaf.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, d)) = stack.pop() {
            max = max.max(d);
            stack.extend(node.children.iter().map(|c| (c, d + 1)));
        }
        max
    }
}

impl Drop for TreeNode {
    // Detach descendants onto a heap stack so deep chains drop without recursion.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}
