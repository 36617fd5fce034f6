use quickcheck::{Arbitrary, Gen, TestResult, quickcheck};
use simplelog::{Config, LevelFilter, TestLogger};
use super::{Color, Link, Tree};
use crate::{Error, Map};

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

/// An operation on a `Map`.
#[derive(Clone, Debug)]
enum Op<K> {
    /// Insert a key into the map.
    Insert(K),
    /// Remove the key at index `n % map.len()` from the map.
    Remove(usize),
    /// Remove a key that may or may not be present.
    RemoveKey(K),
}

impl<K> Arbitrary for Op<K> where K: Arbitrary {
    fn arbitrary(gen: &mut Gen) -> Self {
        match u8::arbitrary(gen) % 3 {
            0 => Op::Remove(usize::arbitrary(gen)),
            1 => Op::RemoveKey(K::arbitrary(gen)),
            _ => Op::Insert(K::arbitrary(gen)),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item=Self>> {
        match *self {
            Op::Insert(ref key) => Box::new(key.shrink().map(Op::Insert)),
            Op::Remove(index) => Box::new(index.shrink().map(Op::Remove)),
            Op::RemoveKey(ref key) => Box::new(key.shrink().map(Op::RemoveKey)),
        }
    }
}

impl Op<u8> {
    /// Perform the operation on the given map, storing the key's double as its value.
    fn exec(self, map: &mut Map<u8, u32>) {
        match self {
            Op::Insert(key) => { map.insert(key, key as u32 * 2); }
            Op::Remove(index) => if !map.is_empty() {
                let key = *map.keys().nth(index % map.len()).unwrap();
                assert_eq!(map.remove(&key), Some((key, key as u32 * 2)));
            },
            Op::RemoveKey(key) => {
                let present = map.contains_key(&key);
                assert_eq!(map.remove(&key).is_some(), present);
            }
        }
    }
}

/// Checks every structural property of the tree and its list, returning the black height.
fn assert_red_black<K, V>(tree: &Tree<K, V>) -> usize where K: Ord {
    fn check<K, V>(tree: &Tree<K, V>, link: Link, parent: Link, in_order: &mut Vec<usize>)
        -> usize {

        let id = match link {
            None => return 1,
            Some(id) => id,
        };

        let node = tree.node(id);
        assert_eq!(node.parent, parent, "parent link of slot {}", id);

        if node.color == Color::Red {
            assert!(!tree.is_red(node.left) && !tree.is_red(node.right),
                    "red slot {} has a red child", id);
        }

        let left = check(tree, node.left, Some(id), in_order);
        in_order.push(id);
        let right = check(tree, node.right, Some(id), in_order);

        assert_eq!(left, right, "black heights differ below slot {}", id);
        left + if node.color == Color::Black { 1 } else { 0 }
    }

    assert!(!tree.is_red(tree.root), "red root");

    let mut in_order = vec![];
    let height = check(tree, tree.root, None, &mut in_order);

    assert_eq!(in_order.len(), tree.len);
    assert_eq!(tree.slots.len() - tree.free.len(), tree.len);
    assert!(in_order.windows(2).all(|w| tree.node(w[0]).key < tree.node(w[1]).key));

    let mut listed = vec![];
    let mut prev = None;
    let mut link = tree.head;

    while let Some(id) = link {
        assert_eq!(tree.node(id).prev, prev, "prev link of slot {}", id);
        listed.push(id);
        prev = link;
        link = tree.node(id).next;
    }

    assert_eq!(tree.tail, prev);
    assert_eq!(listed, in_order);
    height
}

type Links = (Link, Link, Link, Color, Link, Link);

/// Every link and color in the arena, plus the tree's root and ends.
fn shape<K, V>(tree: &Tree<K, V>) -> (Vec<Option<Links>>, [Link; 3]) {
    let nodes = tree.slots.iter()
        .map(|slot| slot.node.as_ref())
        .map(|node| node.map(|n| (n.parent, n.left, n.right, n.color, n.prev, n.next)))
        .collect();

    (nodes, [tree.root, tree.head, tree.tail])
}

fn keys<K, V>(tree: &Tree<K, V>) -> Vec<K> where K: Clone {
    let mut keys = vec![];
    let mut link = tree.head;

    while let Some(id) = link {
        keys.push(tree.node(id).key.clone());
        link = tree.next(id);
    }

    keys
}

#[test]
fn test_red_black() {
    fn check(ops: Vec<Op<u8>>) -> TestResult {
        let mut map = Map::new();

        for op in ops {
            op.exec(&mut map);
            assert_red_black(map.tree());
        }

        TestResult::from_bool(map.iter().all(|(&k, &v)| v == k as u32 * 2))
    }

    quickcheck(check as fn(_) -> _);
}

#[test]
fn test_clone_is_red_black() {
    fn check(ops: Vec<Op<u8>>) -> bool {
        let mut map = Map::new();
        for op in ops { op.exec(&mut map); }

        let copy = map.clone();
        assert_red_black(copy.tree());

        copy.tree().free.is_empty() && keys(copy.tree()) == keys(map.tree())
    }

    quickcheck(check as fn(_) -> _);
}

#[test]
fn insert_mixed_sequence() {
    init_logger();

    let mut map = Map::new();
    for &key in &[10, 20, 30, 15, 25, 5] { map.insert(key, ()); }

    assert_red_black(map.tree());
    assert_eq!(keys(map.tree()), [5, 10, 15, 20, 25, 30]);
}

#[test]
fn insert_ascending_then_remove_odd() {
    init_logger();

    let mut map = Map::new();

    for key in 1..=31 {
        map.insert(key, key);
        assert_red_black(map.tree());
    }

    for key in (1..=31).filter(|key| key % 2 == 1) {
        assert_eq!(map.remove(&key), Some((key, key)));
        assert_red_black(map.tree());
    }

    assert_eq!(keys(map.tree()), (2..=30).step_by(2).collect::<Vec<_>>());
}

#[test]
fn remove_root_until_empty() {
    init_logger();

    let mut map: Map<u32, ()> = (0..64).map(|key| (key, ())).collect();

    while let Some(root) = map.tree().root {
        let key = map.tree().node(root).key;
        assert!(map.remove(&key).is_some());
        assert_red_black(map.tree());
    }

    assert!(map.is_empty());
    assert_eq!(map.tree().head, None);
    assert_eq!(map.tree().tail, None);
}

#[test]
fn slots_are_reused() {
    let mut map = Map::new();
    for key in 0..9 { map.insert(key, ()); }
    for key in 0..8 { map.remove(&key); }
    for key in 9..17 { map.insert(key, ()); }

    assert_eq!(map.tree().slots.len(), 9);
    assert_red_black(map.tree());
}

#[test]
fn absent_key_leaves_tree_untouched() {
    fn check(ops: Vec<Op<u8>>, key: u8) -> TestResult {
        let mut map = Map::new();
        for op in ops { op.exec(&mut map); }

        if map.contains_key(&key) { return TestResult::discard(); }

        let before = shape(map.tree());
        let removed = map.remove(&key);

        TestResult::from_bool(removed.is_none() && shape(map.tree()) == before)
    }

    quickcheck(check as fn(_, _) -> _);
}

#[test]
fn present_key_insert_leaves_tree_untouched() {
    fn check(ops: Vec<Op<u8>>, index: usize) -> TestResult {
        let mut map = Map::new();
        for op in ops { op.exec(&mut map); }

        if map.is_empty() { return TestResult::discard(); }

        let key = *map.keys().nth(index % map.len()).unwrap();
        let before = shape(map.tree());
        let (_, inserted) = map.insert(key, 0);

        TestResult::from_bool(!inserted && shape(map.tree()) == before)
    }

    quickcheck(check as fn(_, _) -> _);
}

#[test]
fn generation_outgrows_u32() {
    let cmp = compare::natural();
    let mut tree = Tree::new();

    tree.insert(&cmp, 0, ());
    let (id, _) = tree.insert(&cmp, 1, ());

    tree.slots[id].generation = u32::MAX as u64;
    let stale = tree.handle(id);

    assert_eq!(tree.remove(&cmp, id), (1, ()));

    let (reused, _) = tree.insert(&cmp, 2, ());
    assert_eq!(reused, id);
    assert_eq!(tree.slots[id].generation, u32::MAX as u64 + 1);
    assert_eq!(tree.resolve(stale), None);
    assert_eq!(tree.resolve(tree.handle(reused)), Some(id));
    assert_red_black(&tree);
}

#[test]
fn emptied_arena_is_released() {
    init_logger();

    let mut map = Map::new();
    for key in 0..1000 { map.insert(key, ()); }

    let first = map.begin();
    let last = map.prev_position(map.end()).unwrap();

    while map.remove_first().is_some() {}

    assert_eq!(map.tree().slots.capacity(), 0);
    assert!(map.tree().free.is_empty());

    map.insert(0, ());
    map.insert(999, ());

    assert_eq!(map.entry_at(first), Err(Error::InvalidIterator));
    assert_eq!(map.entry_at(last), Err(Error::InvalidIterator));
    assert_eq!(map.len(), 2);
    assert_red_black(map.tree());
}
