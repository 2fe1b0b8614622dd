//! Graphviz DOT serializer
//!
//! Walks a [`TreeNode`] depth-first in pre-order and writes one declaration
//! per node and one edge per parent/child pair:
//!
//! ```text
//! digraph G {
//! 	n0[label = "PROGRAM "];
//! 		n0 -> n0_0;
//! 	n1[label = "IDENT x"];
//! }
//! ```
//!
//! The default [`IdScheme::Depth`] reproduces the historical naming, where a
//! declaration is named after its depth and an edge target after the parent
//! depth and child index. The two never line up, and siblings share a
//! declaration name. [`IdScheme::PreOrder`] numbers nodes in visit order and
//! uses that number on both ends of every edge.

use crate::domain::tree::TreeNode;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

/// How node identifiers are assigned in the emitted graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IdScheme {
    /// `n<depth>` for declarations, `n<depth>_<index>` for edge targets.
    /// Labels are written verbatim.
    #[default]
    Depth,
    /// `n<k>` where `k` is the pre-order position. Labels are escaped.
    PreOrder,
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdScheme::Depth => write!(f, "depth"),
            IdScheme::PreOrder => write!(f, "pre-order"),
        }
    }
}

/// One node on the explicit traversal stack.
struct Frame<'a> {
    node: &'a TreeNode,
    depth: usize,
    /// Pre-order position.
    ordinal: usize,
    /// Index of the next child to visit.
    next: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DotSerializer {
    scheme: IdScheme,
}

impl DotSerializer {
    pub const PREAMBLE: &'static str = "digraph G {";
    pub const CLOSING: &'static str = "}";

    pub fn new(scheme: IdScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> IdScheme {
        self.scheme
    }

    /// Serialize `root` into `out`.
    ///
    /// The walk uses a heap-allocated stack, so output order matches a
    /// recursive pre-order descent without being bounded by the call stack.
    /// The tree must be acyclic; ownership through `Vec<TreeNode>` already
    /// guarantees that.
    pub fn write<W: Write + ?Sized>(&self, root: &TreeNode, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", Self::PREAMBLE)?;
        self.declare(out, root, 0, 0)?;

        let mut stack = vec![Frame {
            node: root,
            depth: 0,
            ordinal: 0,
            next: 0,
        }];
        let mut next_ordinal = 1;

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            if frame.next == node.children.len() {
                stack.pop();
                continue;
            }
            let index = frame.next;
            frame.next += 1;
            let (depth, parent) = (frame.depth, frame.ordinal);

            let child = &node.children[index];
            let ordinal = next_ordinal;
            next_ordinal += 1;

            self.connect(out, depth, index, parent, ordinal)?;
            self.declare(out, child, depth + 1, ordinal)?;
            stack.push(Frame {
                node: child,
                depth: depth + 1,
                ordinal,
                next: 0,
            });
        }

        writeln!(out, "{}", Self::CLOSING)?;
        tracing::trace!(nodes = next_ordinal, scheme = %self.scheme, "serialized tree");
        Ok(())
    }

    /// Serialize into an owned string.
    pub fn render(&self, root: &TreeNode) -> String {
        let mut buf = Vec::new();
        self.write(root, &mut buf).expect("writing to a Vec cannot fail");
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn declare<W: Write + ?Sized>(
        &self,
        out: &mut W,
        node: &TreeNode,
        depth: usize,
        ordinal: usize,
    ) -> io::Result<()> {
        match self.scheme {
            IdScheme::Depth => {
                writeln!(out, "\tn{}[label = \"{} {}\"];", depth, node.kind, node.value)
            }
            IdScheme::PreOrder => writeln!(
                out,
                "\tn{}[label = \"{} {}\"];",
                ordinal,
                escape_label(&node.kind),
                escape_label(&node.value)
            ),
        }
    }

    fn connect<W: Write + ?Sized>(
        &self,
        out: &mut W,
        depth: usize,
        index: usize,
        parent: usize,
        child: usize,
    ) -> io::Result<()> {
        match self.scheme {
            IdScheme::Depth => writeln!(out, "\t\tn{} -> n{}_{};", depth, depth, index),
            IdScheme::PreOrder => writeln!(out, "\t\tn{} -> n{};", parent, child),
        }
    }
}

/// Escape text for use inside a double-quoted DOT string.
pub fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
