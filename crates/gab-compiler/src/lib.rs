use std::collections::BTreeSet;

use gab_core::{CommandName, CompiledNode, DialogueCommand, DialogueOption, ScriptNode};
use log::warn;

mod body;
mod directive;
mod edges;

pub use body::compile_node;
pub use directive::{parse_directive, parse_gate, Directive, Gate};
pub use edges::{node_edges, EdgeTarget, NodeEdges};

pub(crate) const OPTION_MARKER: &str = "->";

#[cfg(test)]
mod tests;
