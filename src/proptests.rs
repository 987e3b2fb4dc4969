use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{BTreeSet, HashSet};

fn in_order(t: &RbTree<u16>) -> Vec<u16> {
    fn walk(node: Option<NodeRef<'_, u16>>, out: &mut Vec<u16>) {
        if let Some(n) = node {
            walk(n.left(), out);
            out.push(*n.key());
            walk(n.right(), out);
        }
    }
    let mut out = Vec::with_capacity(t.len());
    walk(t.root(), &mut out);
    out
}

/// Pre-order (key, is_red) pairs: equal iff the trees have the same shape and coloring.
fn shape(t: &RbTree<u16>) -> Vec<(u16, bool)> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeRef<'_, u16>> = t.root().into_iter().collect();
    while let Some(n) = stack.pop() {
        out.push((*n.key(), n.is_red()));
        stack.extend(n.right());
        stack.extend(n.left());
    }
    out
}

fn assert_height_bound(t: &RbTree<u16>) {
    let bound = 2.0 * ((t.len() + 1) as f64).log2();
    assert!(
        t.height() as f64 <= bound,
        "height {} exceeds bound {bound} for {} keys",
        t.height(),
        t.len()
    );
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "0u16..512")] u16),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "0u16..512")] u16),
    #[proptest(weight = 2)]
    Find(#[proptest(strategy = "0u16..512")] u16),
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreeset(ops in prop::collection::vec(any::<Op>(), 0..=1500)) {
        let mut t: RbTree<u16> = RbTree::new();
        let mut m: BTreeSet<u16> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => {
                    let before = in_order(&t);
                    let got = t.insert(k);
                    if m.insert(k) {
                        prop_assert_eq!(got, Ok(()));
                    } else {
                        prop_assert_eq!(got, Err(Error::DuplicateKey));
                        prop_assert_eq!(in_order(&t), before);
                    }
                    prop_assert_eq!(t.find(&k).map(|n| *n.key()), Some(k));
                }
                Op::Remove(k) => {
                    let before = in_order(&t);
                    let got = t.remove(&k);
                    if m.remove(&k) {
                        prop_assert_eq!(got, Ok(k));
                    } else {
                        prop_assert_eq!(got, Err(Error::KeyNotFound));
                        prop_assert_eq!(in_order(&t), before);
                    }
                    prop_assert!(t.find(&k).is_none());
                }
                Op::Find(k) => {
                    prop_assert_eq!(t.contains(&k), m.contains(&k));
                }
            }

            prop_assert_eq!(t.len(), m.len());
            prop_assert!(t.validate().is_ok(), "{:?}", t.validate());
        }

        assert_height_bound(&t);
        let expected: Vec<u16> = m.into_iter().collect();
        prop_assert_eq!(in_order(&t), expected);
    }

    #[test]
    fn prop_remove_everything(keys in prop::collection::hash_set(any::<u16>(), 0..=400)) {
        let keys: Vec<u16> = keys.into_iter().collect();
        let mut t: RbTree<u16> = RbTree::new();
        for &k in &keys {
            prop_assert_eq!(t.insert(k), Ok(()));
        }
        assert_height_bound(&t);

        for &k in keys.iter().rev() {
            prop_assert_eq!(t.remove(&k), Ok(k));
            prop_assert!(t.validate().is_ok());
        }
        prop_assert!(t.is_empty());
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_sets() {
    for n in 1..=6u16 {
        let keys: Vec<u16> = (1..=n).collect();
        for_each_permutation(&keys, |perm| {
            let mut t: RbTree<u16> = RbTree::new();
            for k in perm {
                t.insert(k).unwrap();
                t.validate().unwrap();
            }
            assert_eq!(in_order(&t), keys);
            assert!(t.root().unwrap().is_black());
            assert_height_bound(&t);
        });
    }
}

#[test]
fn exhaustive_remove_order_small_sets() {
    for n in 1..=6u16 {
        let keys: Vec<u16> = (1..=n).collect();

        // Every distinct shape reachable by insertion, then every removal order.
        let mut seen = HashSet::new();
        let mut bases = Vec::new();
        for_each_permutation(&keys, |perm| {
            let mut t: RbTree<u16> = RbTree::new();
            for k in perm {
                t.insert(k).unwrap();
            }
            if seen.insert(shape(&t)) {
                bases.push(t);
            }
        });

        for base in &bases {
            for_each_permutation(&keys, |perm| {
                let mut t = base.clone();
                let mut remaining: BTreeSet<u16> = keys.iter().copied().collect();
                for k in perm {
                    assert_eq!(t.remove(&k), Ok(k));
                    remaining.remove(&k);
                    t.validate().unwrap();
                    assert!(t.find(&k).is_none());
                    assert_eq!(in_order(&t), remaining.iter().copied().collect::<Vec<_>>());
                }
                assert!(t.is_empty());
                assert!(t.root().is_none());
            });
        }
    }
}

#[test]
fn exhaustive_mixed_small_sets() {
    // Remove one key and reinsert it at every position of every insertion order.
    let keys: Vec<u16> = (1..=6).collect();
    for_each_permutation(&keys, |perm| {
        let mut t: RbTree<u16> = RbTree::new();
        for &k in &perm {
            t.insert(k).unwrap();
        }
        for &k in &perm {
            assert_eq!(t.remove(&k), Ok(k));
            t.validate().unwrap();
            t.insert(k).unwrap();
            t.validate().unwrap();
        }
        assert_eq!(in_order(&t), keys);
    });
}
