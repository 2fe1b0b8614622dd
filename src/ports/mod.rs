use crate::domain::tree::TreeNode;
use crate::error::ProduceError;
use std::io::{self, Write};

pub mod tree_exporter;

/// Source of a syntax tree. Built over its input, invoked once.
pub trait TreeProducer {
    fn produce(&self) -> Result<TreeNode, ProduceError>;
}

pub trait TreeExporter {
    fn export(&self, root: &TreeNode, out: &mut dyn Write) -> io::Result<()>;
}
