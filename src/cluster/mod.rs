//! Significance cluster analysis module

pub mod anneal;
pub mod extract;
pub mod score;

use serde::{Serialize, Deserialize};

use crate::ensemble::{NodeId, NodeSet};

/// A robust cluster core discovered across the ensemble
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Core {
    /// Unique identifier for this core (rank order, largest first)
    pub id: u32,

    /// Members of this core, in ascending node order
    pub members: Vec<NodeId>,

    /// Size of the core
    pub size: usize,
}

impl Core {
    /// Build a core record from a working node set
    pub fn from_nodes(id: u32, nodes: &NodeSet) -> Self {
        let members = nodes.to_sorted();
        Self {
            id,
            size: members.len(),
            members,
        }
    }

    /// The core's members as a node set
    pub fn to_node_set(&self) -> NodeSet {
        self.members.iter().copied().collect()
    }
}
