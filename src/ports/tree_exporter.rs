//! Tree Exporters
//!
//! Render a produced tree as DOT, JSON or an indented outline.

use crate::domain::dot::{DotSerializer, IdScheme};
use crate::domain::format::OutputFormat;
use crate::domain::tree::TreeNode;
use crate::ports::TreeExporter;
use serde::Serialize;
use std::io::{self, Write};

pub struct DotExporter {
    serializer: DotSerializer,
}

impl DotExporter {
    pub fn new(scheme: IdScheme) -> Self {
        Self {
            serializer: DotSerializer::new(scheme),
        }
    }
}

impl TreeExporter for DotExporter {
    fn export(&self, root: &TreeNode, out: &mut dyn Write) -> io::Result<()> {
        tracing::debug!(scheme = %self.serializer.scheme(), "exporting DOT");
        self.serializer.write(root, out)
    }
}

/// Pretty-printed JSON, readable back by the JSON producer.
pub struct JsonExporter;

impl TreeExporter for JsonExporter {
    fn export(&self, root: &TreeNode, out: &mut dyn Write) -> io::Result<()> {
        let mut json = serde_json::Serializer::pretty(&mut *out);
        root.serialize(serde_stacker::Serializer::new(&mut json))?;
        writeln!(out)
    }
}

/// Indented outline, two spaces per level.
pub struct TextExporter;

impl TreeExporter for TextExporter {
    fn export(&self, root: &TreeNode, out: &mut dyn Write) -> io::Result<()> {
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let indent = "  ".repeat(depth);
            if node.value.is_empty() {
                writeln!(out, "{}{}", indent, node.kind)?;
            } else {
                writeln!(out, "{}{} {}", indent, node.kind, node.value)?;
            }
            // Reversed so the first child is popped first.
            stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
        }
        Ok(())
    }
}

/// Exporter for `format`. `scheme` only affects DOT output.
pub fn exporter_for(format: OutputFormat, scheme: IdScheme) -> Box<dyn TreeExporter> {
    match format {
        OutputFormat::Dot => Box::new(DotExporter::new(scheme)),
        OutputFormat::Json => Box::new(JsonExporter),
        OutputFormat::Text => Box::new(TextExporter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::JsonProducer;
    use crate::ports::TreeProducer;

    fn sample() -> TreeNode {
        TreeNode::leaf("Call")
            .with_child(TreeNode::new("Path", "foo"))
            .with_child(TreeNode::leaf("Args").with_child(TreeNode::new("Lit", "1")))
    }

    fn export_to_string(exporter: &dyn TreeExporter, root: &TreeNode) -> String {
        let mut buf = Vec::new();
        exporter.export(root, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_outline() {
        let text = export_to_string(&TextExporter, &sample());
        assert_eq!(text, "Call\n  Path foo\n  Args\n    Lit 1\n");
    }

    #[test]
    fn test_json_export_reads_back() {
        let json = export_to_string(&JsonExporter, &sample());
        let back: TreeNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_deep_json_reads_back() {
        let mut deep = TreeNode::new("LEAF", "end");
        for i in 0..500 {
            deep = TreeNode::new("NEST", i.to_string()).with_child(deep);
        }
        let json = export_to_string(&JsonExporter, &deep);
        let back = JsonProducer::new(json).produce().unwrap();
        assert_eq!(back.depth(), 500);
        assert_eq!(back, deep);
    }

    #[test]
    fn test_dot_exporter_uses_scheme() {
        let dot = export_to_string(&DotExporter::new(IdScheme::PreOrder), &sample());
        assert!(dot.starts_with("digraph G {\n"));
        assert!(dot.contains("\t\tn2 -> n3;\n"));

        let dot = export_to_string(&*exporter_for(OutputFormat::Dot, IdScheme::Depth), &sample());
        assert!(dot.contains("\t\tn0 -> n0_1;\n"));
    }
}
