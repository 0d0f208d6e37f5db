//! Wire format for `AdjacencyList`, used for worker transfer and cache
//! restore. Deserialization is a direct restore of the packed arrays - no
//! hash buckets are recomputed.

use serde::{Deserialize, Serialize};

use super::{AdjacencyList, EdgeSlot};
use crate::error::{GraphError, Result};
use crate::ids::{EdgeType, NodeId};

/// Current wire format version. Readers reject any other value.
pub const WIRE_VERSION: u32 = 1;

/// Self-contained, serializable snapshot of an [`AdjacencyList`].
///
/// Every field is a plain packed array so the whole value round-trips
/// through `bincode` without any external table dependency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SerializedAdjacencyList {
    version: u32,
    node_count: u32,
    edge_capacity: usize,
    first_in: Vec<u32>,
    first_out: Vec<u32>,
    last_in: Vec<u32>,
    last_out: Vec<u32>,
    packed_edges: Vec<PackedEdge>,
    hash_table: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
struct PackedEdge {
    edge_type: u16,
    from: u32,
    to: u32,
    hash_next: u32,
    next_in: u32,
    prev_in: u32,
    next_out: u32,
    prev_out: u32,
}

impl From<&EdgeSlot> for PackedEdge {
    fn from(slot: &EdgeSlot) -> Self {
        Self {
            edge_type: slot.edge_type.0,
            from: slot.from.0,
            to: slot.to.0,
            hash_next: slot.hash_next,
            next_in: slot.next_in,
            prev_in: slot.prev_in,
            next_out: slot.next_out,
            prev_out: slot.prev_out,
        }
    }
}

impl From<PackedEdge> for EdgeSlot {
    fn from(p: PackedEdge) -> Self {
        Self {
            edge_type: EdgeType(p.edge_type),
            from: NodeId(p.from),
            to: NodeId(p.to),
            hash_next: p.hash_next,
            next_in: p.next_in,
            prev_in: p.prev_in,
            next_out: p.next_out,
            prev_out: p.prev_out,
        }
    }
}

pub(super) fn pack(list: &AdjacencyList) -> SerializedAdjacencyList {
    SerializedAdjacencyList {
        version: WIRE_VERSION,
        node_count: list.node_count(),
        edge_capacity: list.capacity,
        first_in: list.first_in.clone(),
        first_out: list.first_out.clone(),
        last_in: list.last_in.clone(),
        last_out: list.last_out.clone(),
        packed_edges: list.edges.iter().map(PackedEdge::from).collect(),
        hash_table: list.hash_table.clone(),
    }
}

pub(super) fn unpack(data: &SerializedAdjacencyList) -> Result<AdjacencyList> {
    if data.version != WIRE_VERSION {
        return Err(GraphError::UnsupportedVersion {
            found: data.version,
            expected: WIRE_VERSION,
        });
    }
    if data.first_in.len() != data.node_count as usize
        || data.first_out.len() != data.node_count as usize
        || data.last_in.len() != data.node_count as usize
        || data.last_out.len() != data.node_count as usize
    {
        return Err(GraphError::CorruptWireFormat(
            "first_in/first_out/last_in/last_out length does not match node_count".to_string(),
        ));
    }
    if !data.hash_table.len().is_power_of_two() {
        return Err(GraphError::CorruptWireFormat(
            "hash table length is not a power of two".to_string(),
        ));
    }

    let edges: Vec<EdgeSlot> = data.packed_edges.iter().copied().map(EdgeSlot::from).collect();
    let mut edge_count = 0u32;
    let mut free_list = Vec::new();
    for (idx, slot) in edges.iter().enumerate() {
        if slot.is_tombstone() {
            free_list.push(idx as u32);
        } else {
            edge_count += 1;
        }
    }

    Ok(AdjacencyList {
        first_in: data.first_in.clone(),
        first_out: data.first_out.clone(),
        last_in: data.last_in.clone(),
        last_out: data.last_out.clone(),
        edges,
        free_list,
        edge_count,
        capacity: data.edge_capacity,
        hash_table: data.hash_table.clone(),
    })
}

#[cfg(test)]
impl SerializedAdjacencyList {
    pub(crate) fn version_for_test(&self) -> u32 {
        self.version
    }

    pub(crate) fn set_version_for_test(&mut self, version: u32) {
        self.version = version;
    }
}
