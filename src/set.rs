//! An ordered set based on a top-down red-black tree.

use compare::{Compare, Natural};
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use super::error::Result;
use super::map::{self, Map, Position};

/// An ordered set based on a red-black tree whose items are also threaded in order.
///
/// The behavior of this set is undefined if an item's ordering relative to any other item changes
/// while the item is in the set. This is normally only possible through `Cell`, `RefCell`, or
/// unsafe code.
pub struct Set<T, C = Natural<T>> where C: Compare<T> {
    map: Map<T, (), C>,
}

impl<T> Set<T> where T: Ord {
    /// Creates an empty set ordered according to the natural order of its items.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut it = set.iter();
    /// assert_eq!(it.next(), Some(&1));
    /// assert_eq!(it.next(), Some(&2));
    /// assert_eq!(it.next(), Some(&3));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { Set { map: Map::new() } }
}

impl<T, C> Set<T, C> where C: Compare<T> {
    /// Creates an empty set ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let mut set = rbmap::Set::with_cmp(natural().rev());
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut it = set.iter();
    /// assert_eq!(it.next(), Some(&3));
    /// assert_eq!(it.next(), Some(&2));
    /// assert_eq!(it.next(), Some(&1));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self { Set { map: Map::with_cmp(cmp) } }

    /// Checks if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    /// assert!(set.is_empty());
    ///
    /// set.insert(2);
    /// assert!(!set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    /// Returns the number of items in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    /// assert_eq!(set.len(), 0);
    ///
    /// set.insert(2);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize { self.map.len() }

    /// Returns a reference to the set's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let set: rbmap::Set<i32> = rbmap::Set::new();
    /// assert!(set.cmp().compares_lt(&1, &2));
    ///
    /// let set: rbmap::Set<i32, _> = rbmap::Set::with_cmp(natural().rev());
    /// assert!(set.cmp().compares_gt(&1, &2));
    /// ```
    pub fn cmp(&self) -> &C { self.map.cmp() }

    /// Removes all items from the set, invalidating every position obtained before the call.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// let pos = set.begin();
    ///
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert!(set.get_at(pos).is_err());
    /// ```
    pub fn clear(&mut self) { self.map.clear(); }

    /// Inserts an item into the set, returning `true` if the set did not already contain the
    /// item.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, item: T) -> bool { self.map.insert(item, ()).1 }

    /// Removes the given item from the set, returning `true` if the set contained the item.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, item: &Q) -> bool where C: Compare<Q, T> {
        self.map.remove(item).is_some()
    }

    /// Checks if the set contains the given item.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    /// assert!(!set.contains(&1));
    ///
    /// set.insert(1);
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<Q: ?Sized>(&self, item: &Q) -> bool where C: Compare<Q, T> {
        self.map.contains_key(item)
    }

    /// Returns the position of the given item, or the past-the-end position if the set does
    /// not contain it.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// let pos = set.find(&2);
    /// assert_eq!(set.get_at(pos), Ok(&2));
    /// assert_eq!(set.find(&3), set.end());
    /// ```
    pub fn find<Q: ?Sized>(&self, item: &Q) -> Position where C: Compare<Q, T> {
        self.map.find(item)
    }

    /// Returns the position of the set's first item, or the past-the-end position if the set
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    /// assert_eq!(set.begin(), set.end());
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.get_at(set.begin()), Ok(&1));
    /// ```
    pub fn begin(&self) -> Position { self.map.begin() }

    /// Returns the past-the-end position.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut set = rbmap::Set::new();
    /// set.insert(1);
    ///
    /// assert_eq!(set.find(&2), set.end());
    /// assert_eq!(set.get_at(set.end()), Err(Error::InvalidIterator));
    /// ```
    pub fn end(&self) -> Position { self.map.end() }

    /// Returns the position following the given one.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut set = rbmap::Set::new();
    /// set.insert(1);
    /// set.insert(2);
    ///
    /// let pos = set.next_position(set.begin()).unwrap();
    /// assert_eq!(set.get_at(pos), Ok(&2));
    ///
    /// let end = set.next_position(pos).unwrap();
    /// assert_eq!(end, set.end());
    /// assert_eq!(set.next_position(end), Err(Error::IteratorOverflow));
    /// ```
    pub fn next_position(&self, pos: Position) -> Result<Position> { self.map.next_position(pos) }

    /// Returns the position preceding the given one.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut set = rbmap::Set::new();
    /// set.insert(1);
    /// set.insert(2);
    ///
    /// let last = set.prev_position(set.end()).unwrap();
    /// assert_eq!(set.get_at(last), Ok(&2));
    /// assert_eq!(set.prev_position(set.begin()), Err(Error::IteratorUnderflow));
    /// ```
    pub fn prev_position(&self, pos: Position) -> Result<Position> { self.map.prev_position(pos) }

    /// Returns a reference to the item at the given position.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    /// set.insert(1);
    ///
    /// assert_eq!(set.get_at(set.begin()), Ok(&1));
    /// assert!(set.get_at(set.end()).is_err());
    /// ```
    pub fn get_at(&self, pos: Position) -> Result<&T> { self.map.entry_at(pos).map(|e| e.0) }

    /// Removes and returns the item at the given position.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Error;
    ///
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// let pos = set.begin();
    /// assert_eq!(set.erase(pos), Ok(1));
    /// assert_eq!(set.erase(pos), Err(Error::InvalidIterator));
    /// ```
    pub fn erase(&mut self, pos: Position) -> Result<T> { self.map.erase(pos).map(|e| e.0) }

    /// Returns a reference to the set's first (minimum) item, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    /// assert_eq!(set.first(), None);
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    pub fn first(&self) -> Option<&T> { self.map.first().map(|e| e.0) }

    /// Returns a reference to the set's last (maximum) item, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    /// assert_eq!(set.last(), None);
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    pub fn last(&self) -> Option<&T> { self.map.last().map(|e| e.0) }

    /// Removes and returns the set's first item, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// assert_eq!(set.remove_first(), Some(1));
    /// assert_eq!(set.remove_first(), Some(2));
    /// assert_eq!(set.remove_first(), None);
    /// ```
    pub fn remove_first(&mut self) -> Option<T> { self.map.remove_first().map(|e| e.0) }

    /// Removes and returns the set's last item, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// assert_eq!(set.remove_last(), Some(2));
    /// assert_eq!(set.remove_last(), Some(1));
    /// assert_eq!(set.remove_last(), None);
    /// ```
    pub fn remove_last(&mut self) -> Option<T> { self.map.remove_last().map(|e| e.0) }

    /// Returns a reference to the predecessor of the given item, or `None` if no such item is
    /// present in the set.
    ///
    /// If `inclusive` is `true`, the item itself counts as its own predecessor.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// assert_eq!(set.pred(&1, false), None);
    /// assert_eq!(set.pred(&2, false), Some(&1));
    /// assert_eq!(set.pred(&3, true), Some(&3));
    /// ```
    pub fn pred<Q: ?Sized>(&self, item: &Q, inclusive: bool) -> Option<&T> where C: Compare<Q, T> {
        self.map.pred(item, inclusive).map(|e| e.0)
    }

    /// Returns a reference to the successor of the given item, or `None` if no such item is
    /// present in the set.
    ///
    /// If `inclusive` is `true`, the item itself counts as its own successor.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// assert_eq!(set.succ(&1, false), Some(&3));
    /// assert_eq!(set.succ(&2, false), Some(&3));
    /// assert_eq!(set.succ(&3, false), None);
    /// assert_eq!(set.succ(&1, true), Some(&1));
    /// ```
    pub fn succ<Q: ?Sized>(&self, item: &Q, inclusive: bool) -> Option<&T> where C: Compare<Q, T> {
        self.map.succ(item, inclusive).map(|e| e.0)
    }

    /// Returns an iterator over the set.
    ///
    /// The iterator yields the items in ascending order according to the set's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut it = set.iter();
    /// assert_eq!(it.next(), Some(&1));
    /// assert_eq!(it.next_back(), Some(&3));
    /// assert_eq!(it.next(), Some(&2));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<T> { Iter(self.map.iter()) }
}

impl<T, C> Clone for Set<T, C> where T: Clone, C: Compare<T> + Clone {
    fn clone(&self) -> Self { Set { map: self.map.clone() } }
}

impl<T, C> Debug for Set<T, C> where T: Debug, C: Compare<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> Default for Set<T, C> where C: Compare<T> + Default {
    fn default() -> Self { Set { map: Map::default() } }
}

impl<T, C> Extend<T> for Set<T, C> where C: Compare<T> {
    fn extend<I: IntoIterator<Item=T>>(&mut self, it: I) {
        self.map.extend(it.into_iter().map(|item| (item, ())));
    }
}

impl<T, C> FromIterator<T> for Set<T, C> where C: Compare<T> + Default {
    fn from_iter<I: IntoIterator<Item=T>>(it: I) -> Self {
        let mut set = Set::default();
        set.extend(it);
        set
    }
}

impl<T, C> Hash for Set<T, C> where T: Hash, C: Compare<T> {
    fn hash<H: Hasher>(&self, h: &mut H) {
        for item in self.iter() { item.hash(h); }
    }
}

impl<'a, T, C> IntoIterator for &'a Set<T, C> where C: Compare<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Iter<'a, T> { self.iter() }
}

impl<T, C> IntoIterator for Set<T, C> where C: Compare<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Returns an iterator that consumes the set.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbmap::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut it = set.into_iter();
    /// assert_eq!(it.next(), Some(1));
    /// assert_eq!(it.next_back(), Some(3));
    /// assert_eq!(it.next(), Some(2));
    /// assert_eq!(it.next(), None);
    /// ```
    fn into_iter(self) -> IntoIter<T> { IntoIter(self.map.into_iter()) }
}

impl<T, C> PartialEq for Set<T, C> where T: PartialEq, C: Compare<T> {
    fn eq(&self, other: &Self) -> bool { self.map == other.map }
}

impl<T, C> Eq for Set<T, C> where T: Eq, C: Compare<T> {}

impl<T, C> PartialOrd for Set<T, C> where T: PartialOrd, C: Compare<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.map.partial_cmp(&other.map)
    }
}

impl<T, C> Ord for Set<T, C> where T: Ord, C: Compare<T> {
    fn cmp(&self, other: &Self) -> Ordering { Ord::cmp(&self.map, &other.map) }
}

/// An iterator that consumes the set.
///
/// The iterator yields the items in ascending order according to the set's comparator.
pub struct IntoIter<T>(map::IntoIter<T, ()>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<T> { self.0.next().map(|e| e.0) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> { self.0.next_back().map(|e| e.0) }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

/// An iterator over the set.
///
/// The iterator yields the items in ascending order according to the set's comparator.
///
/// # Examples
///
/// Acquire through [`Set::iter`](struct.Set.html#method.iter) or the `IntoIterator` trait:
///
/// ```
/// let mut set = rbmap::Set::new();
///
/// set.insert(2);
/// set.insert(1);
/// set.insert(3);
///
/// for item in &set {
///     println!("{:?}", item);
/// }
/// ```
pub struct Iter<'a, T: 'a>(map::Iter<'a, T, ()>);

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self { Iter(self.0.clone()) }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<&'a T> { self.0.next().map(|e| e.0) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> { self.0.next_back().map(|e| e.0) }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
