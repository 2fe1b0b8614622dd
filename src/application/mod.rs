use crate::error::RenderError;
use crate::ports::{TreeExporter, TreeProducer};
use std::io::Write;

/// Produce a tree once and export it.
pub struct RenderUsecase<'a> {
    pub producer: &'a dyn TreeProducer,
    pub exporter: &'a dyn TreeExporter,
}

impl<'a> RenderUsecase<'a> {
    /// On producer failure `out` is left untouched.
    pub fn run(&self, out: &mut dyn Write) -> Result<(), RenderError> {
        let root = self.producer.produce()?;
        tracing::info!(nodes = root.node_count(), depth = root.depth(), "tree produced");
        self.exporter.export(&root, out)?;
        out.flush()?;
        Ok(())
    }

    pub fn render_to_string(&self) -> Result<String, RenderError> {
        let mut buf = Vec::new();
        self.run(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
