//! An in-memory Adaptive Radix Tree indexing variable-length byte-string
//! keys as a **set**: membership lookup and insertion only. No values, no
//! deletion, no ordered iteration, no persistence, no concurrency safety.
//!
//! Internally this is an arena of two [`slab::Slab`]s — one for inner
//! nodes, one for leaves — addressed through a small tagged [`NodeId`]
//! instead of the reference C implementation's low-bit pointer tagging.
//! Inner nodes adapt their child storage across three shapes (SMALL,
//! MEDIUM, LARGE) as the number of distinct branching bytes grows, with
//! path compression collapsing single-child runs into a node's own
//! `partial` prefix.

mod error;
mod leaf;
mod node;

#[cfg(test)]
mod test;

pub use error::ArtError;

use bytes::Bytes;
use leaf::Leaf;
use node::{InnerNode, NodeId, Partial};
use slab::Slab;

/// Where a `NodeId` is read from / written to during a traversal: the
/// tree's root, a specific byte-keyed child of an inner node, or the
/// "key ends exactly here" marker on an inner node.
#[derive(Clone, Copy)]
enum Slot {
    Root,
    Child { node: u32, byte: u8 },
    EndOfKey { node: u32 },
}

/// A set of byte-string keys backed by an Adaptive Radix Tree.
pub struct ArtSet {
    inner_nodes: Slab<InnerNode>,
    leaves: Slab<Leaf>,
    root: Option<NodeId>,
    len: usize,
}

impl Default for ArtSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtSet {
    /// Keys longer than this are rejected with [`ArtError::KeyTooLong`]
    /// instead of silently truncated. The reference caps its one-byte
    /// `key_len` field at 255; this crate widens that field to `usize`
    /// but still bounds it to keep a single leaf allocation predictable.
    pub const MAX_KEY_LEN: usize = 1024;

    /// An empty set with a small pre-allocated arena, mirroring a fixed-size
    /// `Slab::with_capacity` at construction.
    pub fn new() -> Self {
        Self::with_capacity(16, 16)
    }

    /// An empty set sized up front for an expected number of keys and
    /// inner nodes, for callers who know their workload in advance.
    pub fn with_capacity(leaves: usize, inner_nodes: usize) -> Self {
        ArtSet {
            inner_nodes: Slab::with_capacity(inner_nodes),
            leaves: Slab::with_capacity(leaves),
            root: None,
            len: 0,
        }
    }

    /// Number of distinct keys currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `key`, returning `Ok(true)` if it was newly added and
    /// `Ok(false)` if an identical key was already present (a no-op, not
    /// an error). This fixes the reference's latent duplicate-leaf bug:
    /// its `recursive_insert` never compares an incoming key against a
    /// colliding leaf's full key before computing a shared prefix, so it
    /// would split a leaf against an identical key and store it twice.
    pub fn insert(&mut self, key: impl Into<Bytes>) -> Result<bool, ArtError> {
        let key: Bytes = key.into();
        if key.len() > Self::MAX_KEY_LEN {
            return Err(ArtError::KeyTooLong { len: key.len(), max: Self::MAX_KEY_LEN });
        }
        self.insert_bytes(key)
    }

    /// Returns `true` if `key` is present in the set.
    pub fn contains(&self, key: &[u8]) -> bool {
        let mut cur = self.root;
        let mut depth = 0usize;
        loop {
            match cur {
                None => return false,
                Some(NodeId::Leaf(idx)) => return self.leaves[idx as usize].matches(key),
                Some(NodeId::Inner(idx)) => {
                    let node = &self.inner_nodes[idx as usize];
                    let plen = node.header.partial.len as usize;
                    if plen > 0 {
                        let d = node.header.partial.match_len(key, depth);
                        if d < plen {
                            return false;
                        }
                        depth += plen;
                    }
                    if depth == key.len() {
                        return node.header.end_of_key.is_some();
                    }
                    match node.find_child(key[depth]) {
                        Some(child) => {
                            cur = Some(child);
                            depth += 1;
                        }
                        None => return false,
                    }
                }
            }
        }
    }

    /// The lexicographically smallest stored key, if any.
    pub fn min_key(&self) -> Option<Bytes> {
        self.root.map(|r| self.leaves[self.minimum(r) as usize].key.clone())
    }

    /// The lexicographically largest stored key, if any.
    pub fn max_key(&self) -> Option<Bytes> {
        self.root.map(|r| self.leaves[self.maximum(r) as usize].key.clone())
    }

    fn minimum(&self, id: NodeId) -> u32 {
        match id {
            NodeId::Leaf(idx) => idx,
            NodeId::Inner(idx) => {
                let node = &self.inner_nodes[idx as usize];
                match node.header.end_of_key {
                    // a key ending exactly here sorts before any longer
                    // continuation that shares the same prefix.
                    Some(leaf_idx) => leaf_idx,
                    None => self.minimum(node.first_child()),
                }
            }
        }
    }

    fn maximum(&self, id: NodeId) -> u32 {
        match id {
            NodeId::Leaf(idx) => idx,
            NodeId::Inner(idx) => {
                let node = &self.inner_nodes[idx as usize];
                if node.num_children() > 0 {
                    self.maximum(node.last_child())
                } else {
                    node.header
                        .end_of_key
                        .expect("inner node always has a child or an end-of-key leaf")
                }
            }
        }
    }

    fn new_leaf(&mut self, key: Bytes) -> u32 {
        self.leaves.insert(Leaf::new(key)) as u32
    }

    fn slot_get(&self, slot: Slot) -> Option<NodeId> {
        match slot {
            Slot::Root => self.root,
            Slot::Child { node, byte } => self.inner_nodes[node as usize].find_child(byte),
            Slot::EndOfKey { node } => {
                self.inner_nodes[node as usize].header.end_of_key.map(NodeId::Leaf)
            }
        }
    }

    fn slot_set(&mut self, slot: Slot, value: NodeId) {
        match slot {
            Slot::Root => self.root = Some(value),
            Slot::Child { node, byte } => self.inner_nodes[node as usize].set_child(byte, value),
            Slot::EndOfKey { node } => match value {
                NodeId::Leaf(idx) => {
                    self.inner_nodes[node as usize].header.end_of_key = Some(idx)
                }
                NodeId::Inner(_) => unreachable!("end-of-key slot only ever holds a leaf"),
            },
        }
    }

    fn insert_bytes(&mut self, key: Bytes) -> Result<bool, ArtError> {
        let mut slot = Slot::Root;
        let mut depth = 0usize;
        loop {
            match self.slot_get(slot) {
                None => {
                    let leaf_idx = self.new_leaf(key);
                    self.slot_set(slot, NodeId::Leaf(leaf_idx));
                    self.len += 1;
                    return Ok(true);
                }
                Some(NodeId::Leaf(leaf_idx)) => {
                    let existing = &self.leaves[leaf_idx as usize].key;
                    if existing.as_ref() == key.as_ref() {
                        return Ok(false);
                    }
                    let new_leaf_idx = self.new_leaf(key);
                    let new_root = self.build_split(depth, leaf_idx, new_leaf_idx);
                    self.slot_set(slot, new_root);
                    self.len += 1;
                    return Ok(true);
                }
                Some(NodeId::Inner(node_idx)) => {
                    let plen = self.inner_nodes[node_idx as usize].header.partial.len as usize;
                    if plen > 0 {
                        let d = self.inner_nodes[node_idx as usize]
                            .header
                            .partial
                            .match_len(key.as_ref(), depth);
                        if d < plen {
                            let new_leaf_idx = self.new_leaf(key);
                            let new_root = self.split_prefix(node_idx, depth, d, new_leaf_idx);
                            self.slot_set(slot, new_root);
                            self.len += 1;
                            return Ok(true);
                        }
                        depth += plen;
                    }
                    if depth == key.len() {
                        slot = Slot::EndOfKey { node: node_idx };
                        continue;
                    }
                    let byte = key[depth];
                    match self.inner_nodes[node_idx as usize].find_child(byte) {
                        Some(_) => {
                            slot = Slot::Child { node: node_idx, byte };
                            depth += 1;
                        }
                        None => {
                            let new_leaf_idx = self.new_leaf(key);
                            // LARGE nodes reject a 37th distinct branching
                            // byte with ArtError::NodeFull; every other
                            // shape always has room because it would have
                            // promoted already.
                            match self.inner_nodes[node_idx as usize]
                                .add_child(byte, NodeId::Leaf(new_leaf_idx))
                            {
                                Ok(()) => {
                                    self.len += 1;
                                    return Ok(true);
                                }
                                Err(e) => {
                                    self.leaves.remove(new_leaf_idx as usize);
                                    return Err(e);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Builds the subtree that replaces a single leaf once a second,
    /// distinct key collides with it. May chain more than one SMALL node
    /// deep when the two keys' shared run exceeds 4 bytes, since a single
    /// partial can only physically hold 4 (invariant 4); each link
    /// consumes up to 4 bytes of the shared run until the true divergence
    /// point is reached.
    fn build_split(&mut self, depth: usize, leaf_a: u32, leaf_b: u32) -> NodeId {
        let key_a = self.leaves[leaf_a as usize].key.clone();
        let key_b = self.leaves[leaf_b as usize].key.clone();
        let max_depth = key_a.len().min(key_b.len());
        let mut i = depth;
        while i < max_depth && key_a[i] == key_b[i] {
            i += 1;
        }
        let lcp = i - depth;
        let chunk = lcp.min(4);
        let partial = Partial::from_slice(&key_a[depth..depth + chunk]);
        let node_idx = self.inner_nodes.insert(InnerNode::new_small(partial)) as u32;
        let next_depth = depth + chunk;

        if chunk < lcp {
            tracing::trace!(depth, "chaining path-compressed node for a shared run over 4 bytes");
            let branch_byte = key_a[next_depth];
            let child = self.build_split(next_depth + 1, leaf_a, leaf_b);
            self.add_child_infallible(node_idx, branch_byte, child);
        } else if next_depth == key_a.len() && next_depth == key_b.len() {
            unreachable!("equal keys are rejected before a split is ever built");
        } else if next_depth == key_a.len() {
            self.inner_nodes[node_idx as usize].header.end_of_key = Some(leaf_a);
            let branch_byte = key_b[next_depth];
            self.add_child_infallible(node_idx, branch_byte, NodeId::Leaf(leaf_b));
        } else if next_depth == key_b.len() {
            self.inner_nodes[node_idx as usize].header.end_of_key = Some(leaf_b);
            let branch_byte = key_a[next_depth];
            self.add_child_infallible(node_idx, branch_byte, NodeId::Leaf(leaf_a));
        } else {
            let byte_a = key_a[next_depth];
            let byte_b = key_b[next_depth];
            self.add_child_infallible(node_idx, byte_a, NodeId::Leaf(leaf_a));
            self.add_child_infallible(node_idx, byte_b, NodeId::Leaf(leaf_b));
        }
        NodeId::Inner(node_idx)
    }

    /// Splits an existing inner node's partial at the point where the
    /// incoming key diverges from it: a new SMALL node carrying the
    /// shared prefix goes above it, and below the split either a sibling
    /// leaf or (if the incoming key ends exactly at the split point) an
    /// end-of-key marker.
    fn split_prefix(&mut self, node_idx: u32, depth: usize, d: usize, new_leaf_idx: u32) -> NodeId {
        tracing::trace!(depth, d, "splitting inner node prefix");
        let old_partial = self.inner_nodes[node_idx as usize].header.partial;
        let old_bytes = old_partial.as_slice();
        let split_byte = old_bytes[d];
        let shared = Partial::from_slice(&old_bytes[..d]);
        let remaining = Partial::from_slice(&old_bytes[d + 1..]);

        self.inner_nodes[node_idx as usize].header.partial = remaining;

        let new_idx = self.inner_nodes.insert(InnerNode::new_small(shared)) as u32;
        self.add_child_infallible(new_idx, split_byte, NodeId::Inner(node_idx));

        let key_depth = depth + d;
        let new_key_len = self.leaves[new_leaf_idx as usize].key.len();
        if key_depth == new_key_len {
            self.inner_nodes[new_idx as usize].header.end_of_key = Some(new_leaf_idx);
        } else {
            let byte = self.leaves[new_leaf_idx as usize].key[key_depth];
            self.add_child_infallible(new_idx, byte, NodeId::Leaf(new_leaf_idx));
        }
        NodeId::Inner(new_idx)
    }

    /// Adds a child to a freshly created SMALL node, which by construction
    /// never holds more than two children and so can never report
    /// [`ArtError::NodeFull`].
    fn add_child_infallible(&mut self, node_idx: u32, byte: u8, child: NodeId) {
        self.inner_nodes[node_idx as usize]
            .add_child(byte, child)
            .expect("a freshly built SMALL node always has room for its first two children");
    }
}
