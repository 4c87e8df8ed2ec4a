use thiserror::Error;

/// Failure modes an [`ArtSet`](crate::ArtSet) can report to a caller.
///
/// Everything else the reference implementation treats as fatal — a
/// corrupted variant tag, an allocator that gives up — stays a panic here
/// too: those are programmer errors, not conditions a caller can recover
/// from by trying something else.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ArtError {
    /// The key is longer than [`ArtSet::MAX_KEY_LEN`](crate::ArtSet::MAX_KEY_LEN).
    #[error("key of {len} bytes exceeds the maximum supported length of {max} bytes")]
    KeyTooLong { len: usize, max: usize },

    /// A LARGE node already holds 36 children; the reference leaves a 37th
    /// distinct branching byte undefined, this crate rejects it instead.
    #[error("node already holds the maximum of 36 children and cannot accept another branch")]
    NodeFull,
}
