use std::cmp::Ordering;

use dynamic_connectivity::treap::Treap;

fn build_chain(t: &mut Treap<usize>, n: usize) -> Vec<usize> {
    let mut nodes = Vec::with_capacity(n);
    let mut root = None;
    for i in 0..n {
        let node = t.construct(i).unwrap();
        root = t.concat(root, Some(node));
        nodes.push(node);
    }
    let _ = root;
    nodes
}

#[test]
fn in_order_matches_insertion_order() {
    let mut t: Treap<usize> = Treap::new(Some(10));
    let nodes = build_chain(&mut t, 20);
    for i in 0..nodes.len() {
        for j in 0..nodes.len() {
            let expected = i.cmp(&j);
            assert_eq!(t.compare(nodes[i], nodes[j]), expected);
        }
    }
    assert_eq!(t.find_min(nodes[0]), nodes[0]);
    assert_eq!(t.find_max(nodes[0]), nodes[nodes.len() - 1]);
    assert_eq!(t.size(nodes[0]), nodes.len());
    for i in 0..nodes.len() - 1 {
        assert_eq!(t.next(nodes[i]), Some(nodes[i + 1]));
        assert_eq!(t.prev(nodes[i + 1]), Some(nodes[i]));
    }
    assert_eq!(t.next(nodes[nodes.len() - 1]), None);
    assert_eq!(t.prev(nodes[0]), None);
}

#[test]
fn split_after_then_concat_round_trips() {
    let mut t: Treap<usize> = Treap::new(Some(11));
    let nodes = build_chain(&mut t, 12);
    let pivot = nodes[5];
    let right = t.split_after(pivot);
    for i in 0..=5 {
        assert_eq!(t.find_root(nodes[i]), t.find_root(pivot));
    }
    if let Some(right_root) = right {
        for i in 6..nodes.len() {
            assert_eq!(t.find_root(nodes[i]), t.find_root(right_root));
        }
    }
    let whole = t.concat(Some(t.find_root(pivot)), right);
    let whole = whole.unwrap();
    for i in 0..nodes.len() {
        for j in 0..nodes.len() {
            assert_eq!(t.compare(nodes[i], nodes[j]), i.cmp(&j));
        }
    }
    assert_eq!(t.size(whole), nodes.len());
}

#[test]
fn split_before_isolates_prefix() {
    let mut t: Treap<usize> = Treap::new(Some(12));
    let nodes = build_chain(&mut t, 8);
    let pivot = nodes[3];
    let left = t.split_before(pivot);
    assert!(left.is_some());
    for i in 0..3 {
        assert_eq!(t.find_root(nodes[i]), left.unwrap());
    }
    for i in 3..nodes.len() {
        assert_eq!(t.find_root(nodes[i]), t.find_root(pivot));
    }
}

#[test]
fn key_based_insert_find_remove_round_trip() {
    let mut t: Treap<i64> = Treap::new(Some(13));
    let mut root = None;
    let keys = [5, 2, 8, 1, 9, 3, 7];
    for &k in &keys {
        let (_, new_root) = t.insert_by_key(root, k, k).unwrap();
        root = Some(new_root);
    }
    let root = root.unwrap();
    for &k in &keys {
        let found = t.find_by_key(root, k);
        assert!(found.is_some());
        assert_eq!(*t.payload(found.unwrap()), k);
    }
    assert!(t.find_by_key(root, 100).is_none());

    let (new_root, removed) = t.remove_by_key(root, 5).unwrap();
    assert_eq!(removed, 5);
    let new_root = new_root.expect("tree is not empty after removing one of seven keys");
    assert!(t.find_by_key(new_root, 5).is_none());
    for &k in keys.iter().filter(|&&k| k != 5) {
        assert!(t.find_by_key(new_root, k).is_some());
    }
}

#[test]
fn compare_is_equal_for_same_node() {
    let mut t: Treap<usize> = Treap::new(Some(14));
    let n = t.construct(0).unwrap();
    assert_eq!(t.compare(n, n), Ordering::Equal);
}
