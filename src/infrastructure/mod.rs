// Producer implementations for astdot.

use crate::domain::format::InputFormat;
use crate::domain::tree::TreeNode;
use crate::error::ProduceError;
use crate::ports::TreeProducer;
use serde::Deserialize;

pub mod input_loader;
pub mod rust;
pub mod sexpr;

pub use rust::RustProducer;
pub use sexpr::SexprProducer;

/// Reads the JSON shape written by the JSON exporter.
pub struct JsonProducer {
    src: String,
}

impl JsonProducer {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

impl TreeProducer for JsonProducer {
    fn produce(&self) -> Result<TreeNode, ProduceError> {
        if self.src.trim().is_empty() {
            return Err(ProduceError::Empty);
        }
        // Nesting depth is bounded by the heap, not serde_json's limit of 128.
        let mut json = serde_json::Deserializer::from_str(&self.src);
        json.disable_recursion_limit();
        let root = TreeNode::deserialize(serde_stacker::Deserializer::new(&mut json))?;
        json.end()?;
        tracing::debug!(nodes = root.node_count(), "parsed JSON tree");
        Ok(root)
    }
}

/// Producer for `format` over `src`.
pub fn producer_for(format: InputFormat, src: String) -> Box<dyn TreeProducer> {
    match format {
        InputFormat::Sexpr => Box::new(SexprProducer::new(src)),
        InputFormat::Json => Box::new(JsonProducer::new(src)),
        InputFormat::Rust => Box::new(RustProducer::new(src)),
    }
}
