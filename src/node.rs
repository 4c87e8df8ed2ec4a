//! Inner node representation: the path-compressed header shared by every
//! node shape, and the three SMALL/MEDIUM/LARGE child-storage bodies.

use arrayvec::ArrayVec;

use crate::error::ArtError;

/// A reference to either a leaf or an inner node, tagged instead of pointer-
/// low-bit-tagged: arena indices into `ArtSet`'s two slabs take the place of
/// the reference implementation's `IS_LEAF`/`LEAF_RAW` pointer trick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeId {
    Leaf(u32),
    Inner(u32),
}

/// At most 4 bytes of path-compressed prefix, matching the reference's
/// `partial[4]` field exactly, not widened.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Partial {
    pub(crate) len: u8,
    bytes: [u8; 4],
}

impl Partial {
    /// Builds a partial from a slice, silently capping at 4 bytes. Callers
    /// that need the true (possibly longer) shared length use that length
    /// to pick the branch byte and depth advance themselves; only the
    /// physical bytes stored here are ever capped.
    pub(crate) fn from_slice(src: &[u8]) -> Self {
        let len = src.len().min(4);
        let mut bytes = [0u8; 4];
        bytes[..len].copy_from_slice(&src[..len]);
        Partial { len: len as u8, bytes }
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of leading bytes of `key[depth..]` that match this partial,
    /// bounded by both the partial's own length and the key's remaining
    /// length. Serves both `search`'s "bail on mismatch" and `insert`'s
    /// "locate the split point" uses, per spec.
    pub(crate) fn match_len(&self, key: &[u8], depth: usize) -> usize {
        let avail = key.len().saturating_sub(depth);
        let max_cmp = (self.len as usize).min(avail);
        for i in 0..max_cmp {
            if self.bytes[i] != key[depth + i] {
                return i;
            }
        }
        max_cmp
    }
}

const SMALL_CAP: usize = 2;
const MEDIUM_CAP: usize = 16;
const LARGE_CAP: usize = 36;

#[derive(Debug)]
pub(crate) struct SmallNode {
    keys: ArrayVec<u8, SMALL_CAP>,
    children: ArrayVec<NodeId, SMALL_CAP>,
}

#[derive(Debug)]
pub(crate) struct MediumNode {
    keys: ArrayVec<u8, MEDIUM_CAP>,
    children: ArrayVec<NodeId, MEDIUM_CAP>,
}

/// A 256-entry byte -> 1-based index indirection table over a dense,
/// append-only `children` array. Since this crate never deletes, "first
/// unused slot" (the reference's `add_child36` search) always coincides
/// with "append at the end" — there are never holes to scan for.
#[derive(Debug)]
pub(crate) struct LargeNode {
    keys: Box<[u8; 256]>,
    children: ArrayVec<NodeId, LARGE_CAP>,
}

#[derive(Debug)]
pub(crate) enum NodeBody {
    Small(SmallNode),
    Medium(MediumNode),
    Large(Box<LargeNode>),
}

#[derive(Debug, Default)]
pub(crate) struct InnerHeader {
    pub(crate) partial: Partial,
    /// A leaf whose key is exactly the path from the root to this node (no
    /// further bytes). This lets one stored key be a byte-exact prefix of
    /// another without the out-of-bounds read the C reference risks in
    /// that case.
    pub(crate) end_of_key: Option<u32>,
}

#[derive(Debug)]
pub(crate) struct InnerNode {
    pub(crate) header: InnerHeader,
    pub(crate) body: NodeBody,
}

fn sorted_insert<const N: usize>(
    keys: &mut ArrayVec<u8, N>,
    children: &mut ArrayVec<NodeId, N>,
    byte: u8,
    child: NodeId,
) {
    let pos = keys.iter().position(|&k| k > byte).unwrap_or(keys.len());
    keys.insert(pos, byte);
    children.insert(pos, child);
}

impl InnerNode {
    pub(crate) fn new_small(partial: Partial) -> Self {
        InnerNode {
            header: InnerHeader { partial, end_of_key: None },
            body: NodeBody::Small(SmallNode { keys: ArrayVec::new(), children: ArrayVec::new() }),
        }
    }

    pub(crate) fn num_children(&self) -> usize {
        match &self.body {
            NodeBody::Small(s) => s.keys.len(),
            NodeBody::Medium(m) => m.keys.len(),
            NodeBody::Large(l) => l.children.len(),
        }
    }

    pub(crate) fn find_child(&self, byte: u8) -> Option<NodeId> {
        match &self.body {
            NodeBody::Small(s) => {
                s.keys.iter().position(|&k| k == byte).map(|i| s.children[i])
            }
            NodeBody::Medium(m) => {
                m.keys.iter().position(|&k| k == byte).map(|i| m.children[i])
            }
            NodeBody::Large(l) => {
                let idx = l.keys[byte as usize];
                if idx == 0 { None } else { Some(l.children[idx as usize - 1]) }
            }
        }
    }

    /// Overwrites an already-present child's reference in place. Used when
    /// a leaf (or, for a prefix split, the node itself) is replaced by a
    /// freshly built subtree, never for adding a brand new branch byte.
    pub(crate) fn set_child(&mut self, byte: u8, new_child: NodeId) {
        match &mut self.body {
            NodeBody::Small(s) => {
                let i = s.keys.iter().position(|&k| k == byte).expect("child must exist");
                s.children[i] = new_child;
            }
            NodeBody::Medium(m) => {
                let i = m.keys.iter().position(|&k| k == byte).expect("child must exist");
                m.children[i] = new_child;
            }
            NodeBody::Large(l) => {
                let idx = l.keys[byte as usize];
                assert!(idx != 0, "child must exist");
                l.children[idx as usize - 1] = new_child;
            }
        }
    }

    /// Inserts a brand new branch byte, promoting SMALL -> MEDIUM -> LARGE
    /// as capacity is exhausted, mirroring the reference's `add_child2`/
    /// `add_child16` promotion cascades and header-copy semantics.
    pub(crate) fn add_child(&mut self, byte: u8, child: NodeId) -> Result<(), ArtError> {
        match &mut self.body {
            NodeBody::Small(s) => {
                if s.keys.len() < SMALL_CAP {
                    sorted_insert(&mut s.keys, &mut s.children, byte, child);
                    return Ok(());
                }
                tracing::trace!(partial_len = self.header.partial.len, "promoting SMALL to MEDIUM");
                let mut medium = MediumNode { keys: ArrayVec::new(), children: ArrayVec::new() };
                for (&k, &c) in s.keys.iter().zip(s.children.iter()) {
                    medium.keys.push(k);
                    medium.children.push(c);
                }
                self.body = NodeBody::Medium(medium);
                self.add_child(byte, child)
            }
            NodeBody::Medium(m) => {
                if m.keys.len() < MEDIUM_CAP {
                    sorted_insert(&mut m.keys, &mut m.children, byte, child);
                    return Ok(());
                }
                tracing::trace!(partial_len = self.header.partial.len, "promoting MEDIUM to LARGE");
                let mut keys = Box::new([0u8; 256]);
                let mut children = ArrayVec::new();
                for (i, (&k, &c)) in m.keys.iter().zip(m.children.iter()).enumerate() {
                    children.push(c);
                    keys[k as usize] = (i + 1) as u8;
                }
                self.body = NodeBody::Large(Box::new(LargeNode { keys, children }));
                self.add_child(byte, child)
            }
            NodeBody::Large(l) => {
                if l.children.len() < LARGE_CAP {
                    let idx = l.children.len();
                    l.children.push(child);
                    l.keys[byte as usize] = (idx + 1) as u8;
                    Ok(())
                } else {
                    Err(ArtError::NodeFull)
                }
            }
        }
    }

    /// The child with the smallest branching byte, used by `minimum`.
    pub(crate) fn first_child(&self) -> NodeId {
        match &self.body {
            NodeBody::Small(s) => s.children[0],
            NodeBody::Medium(m) => m.children[0],
            NodeBody::Large(l) => {
                let byte = l.keys.iter().position(|&i| i != 0).expect("LARGE node has a child");
                l.children[l.keys[byte] as usize - 1]
            }
        }
    }

    /// The child with the largest branching byte, used by `maximum`.
    pub(crate) fn last_child(&self) -> NodeId {
        match &self.body {
            NodeBody::Small(s) => s.children[s.children.len() - 1],
            NodeBody::Medium(m) => m.children[m.children.len() - 1],
            NodeBody::Large(l) => {
                let byte = l.keys.iter().rposition(|&i| i != 0).expect("LARGE node has a child");
                l.children[l.keys[byte] as usize - 1]
            }
        }
    }
}
