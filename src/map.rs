//! An ordered map based on a top-down red-black tree.

use compare::{Compare, Natural};
use log::debug;
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops;
use std::sync::atomic::{self, AtomicUsize};
use super::error::{Error, Result};
use super::node::{self, Dir, Handle, Link, Tree};

static NEXT_TREE_ID: AtomicUsize = AtomicUsize::new(0);

/// Identifies one map instance for the lifetime of its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct TreeId(usize);

impl TreeId {
    fn fresh() -> Self { TreeId(NEXT_TREE_ID.fetch_add(1, atomic::Ordering::Relaxed)) }
}

/// An ordered map based on a red-black tree whose entries are also threaded in key order.
///
/// Insertion and removal rebalance the tree during a single descent. Stepping from an entry to
/// its neighbor follows the thread, so iteration never walks the tree.
///
/// The behavior of this map is undefined if a key's ordering relative to any other key changes
/// while the key is in the map. This is normally only possible through `Cell`, `RefCell`, or
/// unsafe code.
pub struct Map<K, V, C = Natural<K>> where C: Compare<K> {
    tree: Tree<K, V>,
    cmp: C,
    id: TreeId,
}

/// A position in a map: either one of its entries or past-the-end.
///
/// Positions are plain handles that do not borrow the map. A position stays valid until its
/// entry is removed or the map is cleared; removing other entries does not affect it. Using an
/// invalid position, or a position of another map, is reported as `Error::InvalidIterator`.
///
/// # Examples
///
/// ```
/// let mut map = rbmap::Map::new();
///
/// map.insert(2, "b");
/// let (a, _) = map.insert(1, "a");
///
/// assert_eq!(map.begin(), a);
/// assert_eq!(map.entry_at(a), Ok((&1, &"a")));
/// assert!(map.next_position(a).map(|pos| !pos.is_end()).unwrap());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    tree: TreeId,
    node: Option<Handle>,
}

impl Position {
    /// Checks if the position is past-the-end.
    pub fn is_end(&self) -> bool { self.node.is_none() }
}

impl<K, V> Map<K, V> where K: Ord {
    /// Creates an empty map ordered according to the natural order of its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { Map::with_cmp(compare::natural()) }
}

impl<K, V, C> Map<K, V, C> where C: Compare<K> {
    /// Creates an empty map ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let mut map = rbmap::Map::with_cmp(natural().rev());
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        Map { tree: Tree::new(), cmp, id: TreeId::fresh() }
    }

    /// Checks if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// assert!(map.is_empty());
    ///
    /// map.insert(2, "b");
    /// assert!(!map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool { self.tree.len() == 0 }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// assert_eq!(map.len(), 0);
    ///
    /// map.insert(2, "b");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize { self.tree.len() }

    /// Returns a reference to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let map: rbmap::Map<i32, &str> = rbmap::Map::new();
    /// assert!(map.cmp().compares_lt(&1, &2));
    ///
    /// let map: rbmap::Map<i32, &str, _> = rbmap::Map::with_cmp(natural().rev());
    /// assert!(map.cmp().compares_gt(&1, &2));
    /// ```
    pub fn cmp(&self) -> &C { &self.cmp }

    /// Removes all entries from the map.
    ///
    /// Every position obtained before the call becomes invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// let (pos, _) = map.insert(1, "a");
    ///
    /// map.clear();
    ///
    /// assert_eq!(map.len(), 0);
    /// assert_eq!(map.iter().next(), None);
    /// assert_eq!(map.entry_at(pos), Err(Error::InvalidIterator));
    /// ```
    pub fn clear(&mut self) {
        debug!("clearing map of {} entries", self.tree.len());
        self.tree = Tree::new();
        self.id = TreeId::fresh();
    }

    /// Inserts an entry into the map unless its key is already present.
    ///
    /// Returns the position of the entry holding the key and whether the entry was inserted. An
    /// existing entry is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// let (pos, inserted) = map.insert(1, "a");
    /// assert!(inserted);
    ///
    /// assert_eq!(map.insert(1, "b"), (pos, false));
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        let (id, inserted) = self.tree.insert(&self.cmp, key, value);
        (self.position(Some(id)), inserted)
    }

    /// Returns a mutable reference to the value associated with the given key, inserting the
    /// default value first if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// *map.get_or_default("a") += 1;
    /// *map.get_or_default("a") += 1;
    /// *map.get_or_default("b") += 1;
    ///
    /// assert_eq!(map.get(&"a"), Some(&2));
    /// assert_eq!(map.get(&"b"), Some(&1));
    /// ```
    pub fn get_or_default(&mut self, key: K) -> &mut V where V: Default {
        let (id, _) = self.tree.insert_with(&self.cmp, key, V::default);
        self.tree.key_value_mut(id).1
    }

    /// Removes and returns the entry whose key is equal to the given key, returning
    /// `None` if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.remove(&1), Some((1, "a")));
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        let id = self.tree.find(&self.cmp, key)?;
        Some(self.tree.remove(&self.cmp, id))
    }

    /// Removes and returns the entry at the given position.
    ///
    /// Fails without modifying the map if the position is past-the-end, belongs to another map,
    /// or names an entry that was already removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let pos = map.find(&2);
    /// assert_eq!(map.erase(pos), Ok((2, "b")));
    /// assert_eq!(map.erase(pos), Err(Error::InvalidIterator));
    ///
    /// let end = map.end();
    /// assert_eq!(map.erase(end), Err(Error::InvalidIterator));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn erase(&mut self, pos: Position) -> Result<(K, V)> {
        match self.locate(pos)? {
            None => Err(Error::InvalidIterator),
            Some(id) => Ok(self.tree.remove(&self.cmp, id)),
        }
    }

    /// Returns the position of the entry whose key is equal to the given key, or the
    /// past-the-end position if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// assert_eq!(map.find(&1), map.end());
    ///
    /// let (pos, _) = map.insert(1, "a");
    /// assert_eq!(map.find(&1), pos);
    /// ```
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Position where C: Compare<Q, K> {
        self.position(self.tree.find(&self.cmp, key))
    }

    /// Returns the number of entries whose key is equal to the given key, which is either 0 or
    /// 1.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// assert_eq!(map.count(&1), 0);
    ///
    /// map.insert(1, "a");
    /// map.insert(1, "b");
    /// assert_eq!(map.count(&1), 1);
    /// ```
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize where C: Compare<Q, K> {
        self.tree.find(&self.cmp, key).map_or(0, |_| 1)
    }

    /// Checks if the map contains the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// assert!(!map.contains_key(&1));
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        self.tree.find(&self.cmp, key).is_some()
    }

    /// Returns a reference to the value associated with the given key, or `None` if the
    /// map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// assert_eq!(map.get(&1), None);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        self.tree.find(&self.cmp, key).map(|id| self.tree.key_value(id).1)
    }

    /// Returns a mutable reference to the value associated with the given key, or `None`
    /// if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// map.insert(1, "a");
    ///
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value = "b";
    /// }
    ///
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        let id = self.tree.find(&self.cmp, key)?;
        Some(self.tree.key_value_mut(id).1)
    }

    /// Returns a reference to the value associated with the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut map = rbmap::Map::new();
    /// assert_eq!(map.at(&1), Err(Error::KeyNotFound));
    ///
    /// map.insert(1, "a");
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// ```
    pub fn at<Q: ?Sized>(&self, key: &Q) -> Result<&V> where C: Compare<Q, K> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> rbmap::Result<()> {
    /// let mut map = rbmap::Map::new();
    /// map.insert(1, 10);
    ///
    /// *map.at_mut(&1)? += 5;
    /// assert_eq!(map.at(&1)?, &15);
    /// assert!(map.at_mut(&2).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn at_mut<Q: ?Sized>(&mut self, key: &Q) -> Result<&mut V> where C: Compare<Q, K> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a reference to the map's first (minimum) key and a reference to its
    /// associated value, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// assert_eq!(map.first(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.first(), Some((&1, &"a")));
    /// ```
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.head().map(|id| self.tree.key_value(id))
    }

    /// Returns a reference to the map's last (maximum) key and a reference to its
    /// associated value, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// assert_eq!(map.last(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.last(), Some((&3, &"c")));
    /// ```
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.tail().map(|id| self.tree.key_value(id))
    }

    /// Removes and returns the map's first entry, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.remove_first(), Some((1, "a")));
    /// assert_eq!(map.remove_first(), Some((2, "b")));
    /// assert_eq!(map.remove_first(), None);
    /// ```
    pub fn remove_first(&mut self) -> Option<(K, V)> {
        let id = self.tree.head()?;
        Some(self.tree.remove(&self.cmp, id))
    }

    /// Removes and returns the map's last entry, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.remove_last(), Some((2, "b")));
    /// assert_eq!(map.remove_last(), Some((1, "a")));
    /// assert_eq!(map.remove_last(), None);
    /// ```
    pub fn remove_last(&mut self) -> Option<(K, V)> {
        let id = self.tree.tail()?;
        Some(self.tree.remove(&self.cmp, id))
    }

    /// Returns a reference to the predecessor of the given key and a reference to its
    /// associated value, or `None` if no such key is present in the map.
    ///
    /// If `inclusive` is `false`, this method finds the greatest key that is strictly less than
    /// the given key. If `inclusive` is `true`, this method finds the greatest key that is less
    /// than or equal to the given key.
    ///
    /// The given key need not itself be present in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.pred(&0, false), None);
    /// assert_eq!(map.pred(&1, false), None);
    /// assert_eq!(map.pred(&2, false), Some((&1, &"a")));
    /// assert_eq!(map.pred(&4, false), Some((&3, &"c")));
    ///
    /// assert_eq!(map.pred(&0, true), None);
    /// assert_eq!(map.pred(&1, true), Some((&1, &"a")));
    /// assert_eq!(map.pred(&4, true), Some((&3, &"c")));
    /// ```
    pub fn pred<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.tree.closest(&self.cmp, key, Dir::Left, inclusive).map(|id| self.tree.key_value(id))
    }

    /// Returns a reference to the successor of the given key and a reference to its
    /// associated value, or `None` if no such key is present in the map.
    ///
    /// If `inclusive` is `false`, this method finds the smallest key that is strictly greater
    /// than the given key. If `inclusive` is `true`, this method finds the smallest key that is
    /// greater than or equal to the given key.
    ///
    /// The given key need not itself be present in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.succ(&0, false), Some((&1, &"a")));
    /// assert_eq!(map.succ(&2, false), Some((&3, &"c")));
    /// assert_eq!(map.succ(&3, false), None);
    ///
    /// assert_eq!(map.succ(&0, true), Some((&1, &"a")));
    /// assert_eq!(map.succ(&2, true), Some((&2, &"b")));
    /// assert_eq!(map.succ(&4, true), None);
    /// ```
    pub fn succ<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.tree.closest(&self.cmp, key, Dir::Right, inclusive).map(|id| self.tree.key_value(id))
    }

    /// Returns the position of the map's first entry, or the past-the-end position if the map
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// assert_eq!(map.begin(), map.end());
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.entry_at(map.begin()), Ok((&1, &"a")));
    /// ```
    pub fn begin(&self) -> Position { self.position(self.tree.head()) }

    /// Returns the past-the-end position.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut map = rbmap::Map::new();
    /// map.insert(1, "a");
    ///
    /// let end = map.end();
    /// assert!(end.is_end());
    /// assert_eq!(map.find(&2), end);
    /// assert_eq!(map.entry_at(end), Err(Error::InvalidIterator));
    /// ```
    pub fn end(&self) -> Position { self.position(None) }

    /// Returns the position following the given one.
    ///
    /// Advancing the last entry yields the past-the-end position; advancing past-the-end fails
    /// with `Error::IteratorOverflow`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut map = rbmap::Map::new();
    /// let (pos, _) = map.insert(1, "a");
    ///
    /// let end = map.next_position(pos).unwrap();
    /// assert_eq!(end, map.end());
    /// assert_eq!(map.next_position(end), Err(Error::IteratorOverflow));
    /// ```
    pub fn next_position(&self, pos: Position) -> Result<Position> {
        match self.locate(pos)? {
            None => Err(Error::IteratorOverflow),
            Some(id) => Ok(self.position(self.tree.next(id))),
        }
    }

    /// Returns the position preceding the given one.
    ///
    /// Moving back from past-the-end yields the last entry; moving back from the first entry
    /// (or from past-the-end of an empty map) fails with `Error::IteratorUnderflow`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut map = rbmap::Map::new();
    /// assert_eq!(map.prev_position(map.end()), Err(Error::IteratorUnderflow));
    ///
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let last = map.prev_position(map.end()).unwrap();
    /// assert_eq!(map.entry_at(last), Ok((&2, &"b")));
    ///
    /// let first = map.prev_position(last).unwrap();
    /// assert_eq!(first, map.begin());
    /// assert_eq!(map.prev_position(first), Err(Error::IteratorUnderflow));
    /// ```
    pub fn prev_position(&self, pos: Position) -> Result<Position> {
        let prev = match self.locate(pos)? {
            None => self.tree.tail(),
            Some(id) => self.tree.prev(id),
        };

        prev.map(|id| self.position(Some(id))).ok_or(Error::IteratorUnderflow)
    }

    /// Returns references to the key and value of the entry at the given position.
    ///
    /// Fails with `Error::InvalidIterator` if the position is past-the-end or invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut map = rbmap::Map::new();
    /// let (pos, _) = map.insert(1, "a");
    ///
    /// assert_eq!(map.entry_at(pos), Ok((&1, &"a")));
    ///
    /// map.remove(&1);
    /// assert_eq!(map.entry_at(pos), Err(Error::InvalidIterator));
    /// ```
    pub fn entry_at(&self, pos: Position) -> Result<(&K, &V)> {
        match self.locate(pos)? {
            None => Err(Error::InvalidIterator),
            Some(id) => Ok(self.tree.key_value(id)),
        }
    }

    /// Returns a reference to the key and a mutable reference to the value of the entry at the
    /// given position.
    ///
    /// Fails with `Error::InvalidIterator` if the position is past-the-end or invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    /// let (pos, _) = map.insert(1, "a");
    ///
    /// *map.entry_at_mut(pos).unwrap().1 = "b";
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// assert!(map.entry_at_mut(map.end()).is_err());
    /// ```
    pub fn entry_at_mut(&mut self, pos: Position) -> Result<(&K, &mut V)> {
        match self.locate(pos)? {
            None => Err(Error::InvalidIterator),
            Some(id) => Ok(self.tree.key_value_mut(id)),
        }
    }

    /// Returns a read-only cursor over the map, starting at the given position.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let mut cursor = map.cursor(map.begin());
    /// assert_eq!(cursor.key_value(), Ok((&1, &"a")));
    ///
    /// cursor.move_next().unwrap();
    /// assert_eq!(cursor.key(), Ok(&2));
    ///
    /// cursor.move_next().unwrap();
    /// assert!(cursor.is_end());
    /// assert!(cursor.move_next().is_err());
    /// ```
    pub fn cursor(&self, pos: Position) -> Cursor<K, V, C> { Cursor { map: self, pos } }

    /// Returns an iterator over the map's entries with immutable references to the values.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next_back(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<K, V> { Iter(node::Iter::new(&self.tree)) }

    /// Returns an iterator over the map's entries with mutable references to the values.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// map.insert("c", 3);
    ///
    /// for (_, value) in map.iter_mut() {
    ///     *value *= 2;
    /// }
    ///
    /// assert_eq!(map[&"a"], 2);
    /// assert_eq!(map[&"b"], 4);
    /// assert_eq!(map[&"c"], 6);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<K, V> { IterMut(node::IterMut::new(&mut self.tree)) }

    /// Returns an iterator over the map's keys.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.keys().collect::<Vec<_>>(), [&1, &2, &3]);
    /// assert_eq!(map.keys().next_back(), Some(&3));
    /// ```
    pub fn keys(&self) -> Keys<K, V> { Keys(self.iter()) }

    /// Returns an iterator over the map's values.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.values().collect::<Vec<_>>(), [&"a", &"b", &"c"]);
    /// ```
    pub fn values(&self) -> Values<K, V> { Values(self.iter()) }

    #[cfg(test)]
    pub(crate) fn tree(&self) -> &Tree<K, V> { &self.tree }

    fn position(&self, link: Link) -> Position {
        Position { tree: self.id, node: link.map(|id| self.tree.handle(id)) }
    }

    // `Ok(None)` is past-the-end.
    fn locate(&self, pos: Position) -> Result<Link> {
        if pos.tree != self.id { return Err(Error::InvalidIterator); }

        match pos.node {
            None => Ok(None),
            Some(handle) => self.tree.resolve(handle).map(Some).ok_or(Error::InvalidIterator),
        }
    }
}

impl<K, V, C> Clone for Map<K, V, C> where K: Clone, V: Clone, C: Compare<K> + Clone {
    /// Returns a deep copy of the map. Positions of the original are not valid in the copy.
    fn clone(&self) -> Self {
        Map { tree: self.tree.clone(), cmp: self.cmp.clone(), id: TreeId::fresh() }
    }
}

impl<K, V, C> Debug for Map<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;

        let mut it = self.iter();

        if let Some((k, v)) = it.next() {
            write!(f, "{:?}: {:?}", k, v)?;
            for (k, v) in it { write!(f, ", {:?}: {:?}", k, v)?; }
        }

        write!(f, "}}")
    }
}

impl<K, V, C> Default for Map<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self { Map::with_cmp(Default::default()) }
}

impl<K, V, C> Extend<(K, V)> for Map<K, V, C> where C: Compare<K> {
    /// Inserts the entries in order; for a repeated key the first entry wins.
    fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, it: I) {
        for (k, v) in it { self.insert(k, v); }
    }
}

impl<K, V, C> FromIterator<(K, V)> for Map<K, V, C> where C: Compare<K> + Default {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(it: I) -> Self {
        let mut map: Map<K, V, C> = Default::default();
        map.extend(it);
        map
    }
}

impl<K, V, C> Hash for Map<K, V, C> where K: Hash, V: Hash, C: Compare<K> {
    fn hash<H: Hasher>(&self, h: &mut H) {
        for e in self.iter() { e.hash(h); }
    }
}

impl<'a, K, V, C, Q: ?Sized> ops::Index<&'a Q> for Map<K, V, C>
    where C: Compare<K> + Compare<Q, K> {

    type Output = V;
    fn index(&self, key: &'a Q) -> &V { self.get(key).expect("key not found") }
}

impl<'a, K, V, C> IntoIterator for &'a Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> { self.iter_mut() }
}

impl<K, V, C> IntoIterator for Map<K, V, C> where C: Compare<K> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Returns an iterator that consumes the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbmap::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.into_iter();
    /// assert_eq!(it.next(), Some((1, "a")));
    /// assert_eq!(it.next_back(), Some((3, "c")));
    /// assert_eq!(it.next(), Some((2, "b")));
    /// assert_eq!(it.next(), None);
    /// ```
    fn into_iter(self) -> IntoIter<K, V> { IntoIter(node::IntoIter::new(self.tree)) }
}

impl<K, V, C> PartialEq for Map<K, V, C> where K: PartialEq, V: PartialEq, C: Compare<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, C> Eq for Map<K, V, C> where K: Eq, V: Eq, C: Compare<K> {}

impl<K, V, C> PartialOrd for Map<K, V, C> where K: PartialOrd, V: PartialOrd, C: Compare<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K, V, C> Ord for Map<K, V, C> where K: Ord, V: Ord, C: Compare<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

/// A read-only cursor over a map.
///
/// Acquire through [`Map::cursor`](struct.Map.html#method.cursor). Two cursors are equal if
/// they are at the same position of the same map.
pub struct Cursor<'a, K: 'a, V: 'a, C: 'a> where C: Compare<K> {
    map: &'a Map<K, V, C>,
    pos: Position,
}

impl<'a, K, V, C> Cursor<'a, K, V, C> where C: Compare<K> {
    /// Returns the cursor's position.
    pub fn position(&self) -> Position { self.pos }

    /// Checks if the cursor is past-the-end.
    pub fn is_end(&self) -> bool { self.pos.is_end() }

    /// Returns references to the key and value of the entry under the cursor.
    pub fn key_value(&self) -> Result<(&'a K, &'a V)> { self.map.entry_at(self.pos) }

    /// Returns a reference to the key of the entry under the cursor.
    pub fn key(&self) -> Result<&'a K> { self.key_value().map(|e| e.0) }

    /// Returns a reference to the value of the entry under the cursor.
    pub fn value(&self) -> Result<&'a V> { self.key_value().map(|e| e.1) }

    /// Moves the cursor to the next entry, or past-the-end after the last entry.
    pub fn move_next(&mut self) -> Result<()> {
        self.pos = self.map.next_position(self.pos)?;
        Ok(())
    }

    /// Moves the cursor to the previous entry.
    pub fn move_prev(&mut self) -> Result<()> {
        self.pos = self.map.prev_position(self.pos)?;
        Ok(())
    }
}

impl<'a, K, V, C> Clone for Cursor<'a, K, V, C> where C: Compare<K> {
    fn clone(&self) -> Self { Cursor { map: self.map, pos: self.pos } }
}

impl<'a, K, V, C> PartialEq for Cursor<'a, K, V, C> where C: Compare<K> {
    fn eq(&self, other: &Self) -> bool { self.pos == other.pos }
}

impl<'a, K, V, C> Eq for Cursor<'a, K, V, C> where C: Compare<K> {}

impl<'a, K, V, C> Debug for Cursor<'a, K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.key_value() {
            Ok((k, v)) => write!(f, "Cursor({:?}: {:?})", k, v),
            Err(_) => write!(f, "Cursor(end)"),
        }
    }
}

/// An iterator that consumes the map.
///
/// Acquire through the `IntoIterator` trait:
///
/// ```
/// let mut map = rbmap::Map::new();
///
/// map.insert(2, "b");
/// map.insert(1, "a");
/// map.insert(3, "c");
///
/// for (key, value) in map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
pub struct IntoIter<K, V>(node::IntoIter<K, V>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<(K, V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> { self.0.next_back() }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// An iterator over the map's entries with immutable references to the values.
///
/// Acquire through [`Map::iter`](struct.Map.html#method.iter) or the `IntoIterator` trait:
///
/// ```
/// let mut map = rbmap::Map::new();
///
/// map.insert(2, "b");
/// map.insert(1, "a");
/// map.insert(3, "c");
///
/// for (key, value) in &map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
pub struct Iter<'a, K: 'a, V: 'a>(node::Iter<'a, K, V>);

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self { Iter(self.0.clone()) }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<(&'a K, &'a V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> { self.0.next_back() }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// An iterator over the map's entries with mutable references to the values.
///
/// Acquire through [`Map::iter_mut`](struct.Map.html#method.iter_mut) or the
/// `IntoIterator` trait.
pub struct IterMut<'a, K: 'a, V: 'a>(node::IterMut<'a, K, V>);

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<(&'a K, &'a mut V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> { self.0.next_back() }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

/// An iterator over the map's keys.
///
/// Acquire through [`Map::keys`](struct.Map.html#method.keys).
pub struct Keys<'a, K: 'a, V: 'a>(Iter<'a, K, V>);

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Self { Keys(self.0.clone()) }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<&'a K> { self.0.next().map(|e| e.0) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> { self.0.next_back().map(|e| e.0) }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

/// An iterator over the map's values.
///
/// Acquire through [`Map::values`](struct.Map.html#method.values).
pub struct Values<'a, K: 'a, V: 'a>(Iter<'a, K, V>);

impl<'a, K, V> Clone for Values<'a, K, V> {
    fn clone(&self) -> Self { Values(self.0.clone()) }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<&'a V> { self.0.next().map(|e| e.1) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> { self.0.next_back().map(|e| e.1) }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}
