use crate::{ArtError, ArtSet};

#[test]
fn empty_tree_contains_nothing() {
    let art = ArtSet::new();
    assert!(!art.contains(b"anything"));
    assert_eq!(art.len(), 0);
    assert!(art.is_empty());
    assert_eq!(art.min_key(), None);
    assert_eq!(art.max_key(), None);
}

#[test]
fn single_key_round_trips() {
    let mut art = ArtSet::new();
    assert_eq!(art.insert(&b"hello"[..]), Ok(true));
    assert!(art.contains(b"hello"));
    assert!(!art.contains(b"hell"));
    assert!(!art.contains(b"hello!"));
    assert_eq!(art.len(), 1);
}

#[test]
fn reinserting_same_key_is_a_noop() {
    let mut art = ArtSet::new();
    assert_eq!(art.insert(&b"hello"[..]), Ok(true));
    assert_eq!(art.insert(&b"hello"[..]), Ok(false));
    assert_eq!(art.len(), 1);
}

#[test]
fn leaf_split_on_shared_prefix() {
    let mut art = ArtSet::new();
    art.insert(&b"romane"[..]).unwrap();
    art.insert(&b"romanus"[..]).unwrap();
    art.insert(&b"roman"[..]).unwrap();
    art.insert(&b"romanes"[..]).unwrap();

    assert!(art.contains(b"romane"));
    assert!(art.contains(b"romanus"));
    assert!(art.contains(b"roman"));
    assert!(art.contains(b"romanes"));
    assert!(!art.contains(b"rom"));
    assert!(!art.contains(b"romanu"));
    assert_eq!(art.len(), 4);
}

#[test]
fn one_key_is_a_prefix_of_another() {
    let mut art = ArtSet::new();
    art.insert(&b"ab"[..]).unwrap();
    art.insert(&b"abc"[..]).unwrap();
    assert!(art.contains(b"ab"));
    assert!(art.contains(b"abc"));
    assert!(!art.contains(b"a"));
    assert!(!art.contains(b"abcd"));
}

#[test]
fn empty_key_can_be_stored_alongside_others() {
    let mut art = ArtSet::new();
    art.insert(&b""[..]).unwrap();
    art.insert(&b"x"[..]).unwrap();
    assert!(art.contains(b""));
    assert!(art.contains(b"x"));
    assert!(!art.contains(b"y"));
    assert_eq!(art.min_key().unwrap(), &b""[..]);
}

#[test]
fn small_promotes_to_medium_on_third_child() {
    let mut art = ArtSet::new();
    art.insert(&b"xa"[..]).unwrap();
    art.insert(&b"xb"[..]).unwrap();
    art.insert(&b"xc"[..]).unwrap();
    art.insert(&b"xd"[..]).unwrap();

    for c in ['a', 'b', 'c', 'd'] {
        assert!(art.contains(format!("x{c}").as_bytes()));
    }
    assert!(!art.contains(b"xe"));
}

#[test]
fn medium_promotes_to_large_on_seventeenth_child() {
    let mut art = ArtSet::new();
    for i in 0u8..17 {
        art.insert(vec![b'x', i]).unwrap();
    }
    for i in 0u8..17 {
        assert!(art.contains(&[b'x', i]));
    }
    assert!(!art.contains(&[b'x', 17]));
    assert_eq!(art.len(), 17);
}

#[test]
fn large_node_rejects_a_thirty_seventh_child() {
    let mut art = ArtSet::new();
    for i in 0u8..36 {
        art.insert(vec![b'x', i]).unwrap();
    }
    assert_eq!(art.insert(vec![b'x', 36]), Err(ArtError::NodeFull));
    assert_eq!(art.len(), 36);
    assert!(!art.contains(&[b'x', 36]));
}

#[test]
fn deep_multi_split_keeps_every_key_reachable() {
    let mut art = ArtSet::new();
    let keys: [&[u8]; 4] = [b"abcdefgh", b"abcdxy", b"abcdzzz", b"abce"];
    for k in keys {
        art.insert(k).unwrap();
    }
    for k in keys {
        assert!(art.contains(k));
    }
    assert!(!art.contains(b"abcd"));
    assert!(!art.contains(b"abcdef"));
    assert!(!art.contains(b"abcdefg"));
    assert!(!art.contains(b"ab"));
    assert_eq!(art.len(), 4);
}

#[test]
fn shared_run_longer_than_four_bytes_chains_correctly() {
    let mut art = ArtSet::new();
    let a = vec![b'a'; 50];
    let mut b = vec![b'a'; 50];
    b.push(b'!');
    art.insert(a.clone()).unwrap();
    art.insert(b.clone()).unwrap();
    assert!(art.contains(&a));
    assert!(art.contains(&b));
    assert!(!art.contains(&vec![b'a'; 49]));
    assert!(!art.contains(&vec![b'a'; 51]));
}

#[test]
fn key_too_long_is_rejected() {
    let mut art = ArtSet::new();
    let key = vec![0u8; ArtSet::MAX_KEY_LEN + 1];
    assert_eq!(
        art.insert(key),
        Err(ArtError::KeyTooLong { len: ArtSet::MAX_KEY_LEN + 1, max: ArtSet::MAX_KEY_LEN })
    );
    assert_eq!(art.len(), 0);
}

#[test]
fn min_and_max_key_track_lexicographic_order() {
    let mut art = ArtSet::new();
    for k in ["banana", "apple", "cherry", "app"] {
        art.insert(k.as_bytes()).unwrap();
    }
    assert_eq!(art.min_key().unwrap(), &b"app"[..]);
    assert_eq!(art.max_key().unwrap(), &b"cherry"[..]);
}

#[test]
fn with_capacity_behaves_like_new() {
    let mut art = ArtSet::with_capacity(4, 4);
    art.insert(&b"a"[..]).unwrap();
    art.insert(&b"bb"[..]).unwrap();
    assert!(art.contains(b"a"));
    assert!(art.contains(b"bb"));
    assert_eq!(art.len(), 2);
}
