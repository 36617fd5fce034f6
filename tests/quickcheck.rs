use compare::Compare;
use quickcheck::{Arbitrary, Gen};
use rbmap::Map;

pub trait Remove<K, C> where C: Compare<K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)>;
}

macro_rules! remove {
    ($K:ty, $V:ty, $R:ty) => {
        mod remove {
            use crate::Remove;
            use quickcheck::{TestResult, quickcheck};
            use rbmap::Map;

            #[test]
            fn removes_key() {
                fn test(mut map: Map<$K, $V>, removal: $R) -> TestResult {
                    match removal.remove(&mut map) {
                        None => TestResult::discard(),
                        Some((ref key, _)) => TestResult::from_bool(
                            !map.contains_key(key) &&
                            map.get(key).is_none() &&
                            map.get_mut(key).is_none() &&
                            map.count(key) == 0 &&
                            map.find(key) == map.end() &&
                            map.iter().find(|e| e.0 == key).is_none()
                        ),
                    }
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> TestResult);
            }

            #[test]
            fn affects_no_others() {
                fn test(mut map: Map<$K, $V>, removal: $R) -> bool {
                    let old_map = map.clone();

                    match removal.remove(&mut map) {
                        None => map == old_map,
                        Some((ref key, _)) =>
                            map.iter().collect::<Vec<_>>() ==
                               old_map.iter().filter(|e| e.0 != key).collect::<Vec<_>>()
                    }
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> bool);
            }

            #[test]
            fn sets_len() {
                fn test(mut map: Map<$K, $V>, removal: $R) -> bool {
                    let old_len = map.len();

                    match removal.remove(&mut map) {
                        None => map.len() == old_len,
                        Some(_) => map.len() == old_len - 1,
                    }
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> bool);
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Find<Q>(Q);

impl<Q> Arbitrary for Find<Q> where Q: Arbitrary {
    fn arbitrary(gen: &mut Gen) -> Self { Find(Q::arbitrary(gen)) }
    fn shrink(&self) -> Box<dyn Iterator<Item=Self>> { Box::new(self.0.shrink().map(Find)) }
}

impl<Q, K, C> Remove<K, C> for Find<Q> where C: Compare<K> + Compare<Q, K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> { map.remove(&self.0) }
}

/// Removes through the position of the entry found by key.
#[derive(Clone, Debug)]
pub struct Erase<Q>(Q);

impl<Q> Arbitrary for Erase<Q> where Q: Arbitrary {
    fn arbitrary(gen: &mut Gen) -> Self { Erase(Q::arbitrary(gen)) }
    fn shrink(&self) -> Box<dyn Iterator<Item=Self>> { Box::new(self.0.shrink().map(Erase)) }
}

impl<Q, K, C> Remove<K, C> for Erase<Q> where C: Compare<K> + Compare<Q, K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> {
        let pos = map.find(&self.0);
        if pos.is_end() { return None; }
        Some(map.erase(pos).expect("a found position is valid"))
    }
}

mod find {
    use quickcheck::quickcheck;
    use rbmap::Map;

    #[test]
    fn agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            let found = map.entry_at(map.find(&key)).ok();
            found == map.iter().find(|e| *e.0 == key) && found.map(|e| e.1) == map.get(&key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    #[test]
    fn at_agrees_with_get() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.at(&key).ok() == map.get(&key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    remove!{u32, u16, crate::Find<u32>}
}

mod erase {
    remove!{u32, u16, crate::Erase<u32>}
}

mod insert {
    use quickcheck::quickcheck;
    use rbmap::Map;

    #[test]
    fn sets_len() {
        fn test(mut map: Map<u32, u16>, key: u32, value: u16) -> bool {
            let old_len = map.len();
            let (_, inserted) = map.insert(key, value);
            map.len() == if inserted { old_len + 1 } else { old_len }
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn keeps_existing_value() {
        fn test(mut map: Map<u32, u16>, key: u32, value: u16) -> bool {
            let old = map.get(&key).cloned();
            let (pos, inserted) = map.insert(key, value);

            inserted == old.is_none() &&
            map.entry_at(pos) == Ok((&key, old.as_ref().unwrap_or(&value))) &&
            map.find(&key) == pos
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn affects_no_others() {
        fn test(mut map: Map<u32, u16>, key: u32, value: u16) -> bool {
            let old_map = map.clone();
            map.insert(key, value);

            map.iter().filter(|e| *e.0 != key).collect::<Vec<_>>() ==
                old_map.iter().filter(|e| *e.0 != key).collect::<Vec<_>>()
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn get_or_default_inserts_once() {
        fn test(mut map: Map<u32, u16>, key: u32) -> bool {
            let old = map.get(&key).cloned();
            let old_len = map.len();
            let value = *map.get_or_default(key);

            value == old.unwrap_or_default() && map.len() == old_len + old.map_or(1, |_| 0)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }
}

#[derive(Clone, Debug)]
pub struct Max;

impl Arbitrary for Max { fn arbitrary(_gen: &mut Gen) -> Self { Max } }

impl<K, C> Remove<K, C> for Max where C: Compare<K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> { map.remove_last() }
}

mod last {
    use quickcheck::quickcheck;
    use rbmap::Map;

    #[test]
    fn agrees_with_iter() {
        fn test(map: Map<u32, u16>) -> bool {
            map.last() == map.iter().rev().next()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    remove!{u32, u16, crate::Max}
}

#[derive(Clone, Debug)]
pub struct Min;

impl Arbitrary for Min { fn arbitrary(_gen: &mut Gen) -> Self { Min } }

impl<K, C> Remove<K, C> for Min where C: Compare<K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> { map.remove_first() }
}

mod first {
    use quickcheck::quickcheck;
    use rbmap::Map;

    #[test]
    fn agrees_with_iter() {
        fn test(map: Map<u32, u16>) -> bool {
            map.first() == map.iter().next()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    remove!{u32, u16, crate::Min}
}

mod succ {
    use quickcheck::quickcheck;
    use rbmap::Map;

    #[test]
    fn exclusive_agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.succ(&key, false) == map.iter().find(|e| *e.0 > key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    #[test]
    fn inclusive_agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.succ(&key, true) == map.iter().find(|e| *e.0 >= key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }
}

mod pred {
    use quickcheck::quickcheck;
    use rbmap::Map;

    #[test]
    fn exclusive_agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.pred(&key, false) == map.iter().rev().find(|e| *e.0 < key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    #[test]
    fn inclusive_agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.pred(&key, true) == map.iter().rev().find(|e| *e.0 <= key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }
}

mod iter {
    use quickcheck::quickcheck;
    use rbmap::Map;
    use std::collections::BTreeMap;

    #[test]
    fn agrees_with_btree_map() {
        fn test(entries: Vec<(u8, u16)>) -> bool {
            let mut map = Map::new();
            let mut btree = BTreeMap::new();

            for (key, value) in entries {
                map.insert(key, value);
                btree.entry(key).or_insert(value);
            }

            map.len() == btree.len() && map.iter().eq(btree.iter())
        }

        quickcheck(test as fn(Vec<(u8, u16)>) -> bool);
    }

    #[test]
    fn positions_walk_in_order() {
        fn test(map: Map<u32, u16>) -> bool {
            let mut forward = vec![];
            let mut pos = map.begin();

            while !pos.is_end() {
                forward.push(map.entry_at(pos).unwrap());
                pos = map.next_position(pos).unwrap();
            }

            let mut backward = vec![];

            while let Ok(prev) = map.prev_position(pos) {
                pos = prev;
                backward.push(map.entry_at(pos).unwrap());
            }

            backward.reverse();
            forward == map.iter().collect::<Vec<_>>() && backward == forward
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn double_ended() {
        fn test(map: Map<u32, u16>) -> bool {
            let mut rev: Vec<_> = map.iter().rev().collect();
            rev.reverse();
            rev == map.iter().collect::<Vec<_>>() && map.iter().len() == map.len()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn into_iter_agrees_with_iter() {
        fn test(map: Map<u32, u16>) -> bool {
            let entries: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
            map.into_iter().collect::<Vec<_>>() == entries
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn iter_mut_updates_values() {
        fn test(mut map: Map<u32, u16>) -> bool {
            let old_map = map.clone();
            for (_, value) in map.iter_mut() { *value = value.wrapping_add(1); }

            map.iter().zip(old_map.iter())
                .all(|(new, old)| new.0 == old.0 && *new.1 == old.1.wrapping_add(1))
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }
}

mod clone {
    use quickcheck::quickcheck;
    use rbmap::{Error, Map};

    #[test]
    fn is_independent() {
        fn test(mut map: Map<u32, u16>, key: u32, value: u16) -> bool {
            let copy = map.clone();
            let before: Vec<_> = copy.iter().map(|(&k, &v)| (k, v)).collect();

            map.insert(key, value);
            map.remove_first();
            map.clear();

            copy.iter().map(|(&k, &v)| (k, v)).collect::<Vec<_>>() == before
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn rejects_original_positions() {
        fn test(map: Map<u32, u16>) -> bool {
            let copy = map.clone();
            let pos = map.begin();

            copy == map && (pos.is_end() || copy.entry_at(pos) == Err(Error::InvalidIterator))
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }
}

mod set {
    use quickcheck::quickcheck;
    use rbmap::Set;
    use std::collections::BTreeSet;

    #[test]
    fn agrees_with_btree_set() {
        fn test(items: Vec<u8>, removals: Vec<u8>) -> bool {
            let mut set: Set<u8> = items.iter().cloned().collect();
            let mut btree: BTreeSet<u8> = items.iter().cloned().collect();

            for item in removals { assert_eq!(set.remove(&item), btree.remove(&item)); }

            set.len() == btree.len() && set.iter().eq(btree.iter())
        }

        quickcheck(test as fn(Vec<u8>, Vec<u8>) -> bool);
    }
}

mod round_trip {
    use quickcheck_macros::quickcheck;
    use rbmap::Map;

    #[quickcheck]
    fn insert_then_erase_restores(map: Map<u32, u16>, key: u32, value: u16) -> bool {
        let mut copy = map.clone();
        let (pos, inserted) = copy.insert(key, value);

        if inserted {
            copy.erase(pos) == Ok((key, value)) && copy == map
        } else {
            copy == map
        }
    }

    #[quickcheck]
    fn removing_absent_key_is_noop(map: Map<u32, u16>, key: u32) -> bool {
        let mut copy = map.clone();
        if map.contains_key(&key) { copy.remove(&key); }

        let before = copy.clone();
        copy.remove(&key).is_none() && copy == before
    }
}
