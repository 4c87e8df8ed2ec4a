use bytes::Bytes;

/// A stored key. Unlike the reference's `art_leaf`, which packs a one-byte
/// `key_len` ahead of a flexible array member, this holds an owned `Bytes`
/// whose own length prefix needs no separate field.
#[derive(Debug)]
pub(crate) struct Leaf {
    pub(crate) key: Bytes,
}

impl Leaf {
    pub(crate) fn new(key: Bytes) -> Self {
        Leaf { key }
    }

    pub(crate) fn matches(&self, key: &[u8]) -> bool {
        self.key.as_ref() == key
    }
}
