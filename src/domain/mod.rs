pub mod dot;
pub mod format;
pub mod tree;

pub use dot::{DotSerializer, IdScheme};
pub use format::{InputFormat, OutputFormat};
pub use tree::TreeNode;
