use std::marker::PhantomData;
use super::{Link, Node, Slot, Tree};

/// Walks the threaded list from both ends; `len` keeps the two ends from crossing.
pub struct Iter<'a, K: 'a, V: 'a> {
    tree: &'a Tree<K, V>,
    front: Link,
    back: Link,
    len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub fn new(tree: &'a Tree<K, V>) -> Self {
        Iter { tree, front: tree.head, back: tree.tail, len: tree.len }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self { Iter { ..*self } }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        if self.len == 0 { return None; }
        let id = self.front?;
        let node = self.tree.node(id);
        self.front = node.next;
        self.len -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        if self.len == 0 { return None; }
        let id = self.back?;
        let node = self.tree.node(id);
        self.back = node.prev;
        self.len -= 1;
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

pub struct IterMut<'a, K: 'a, V: 'a> {
    slots: *mut Slot<K, V>,
    front: Link,
    back: Link,
    len: usize,
    _mut: PhantomData<&'a mut Tree<K, V>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub fn new(tree: &'a mut Tree<K, V>) -> Self {
        IterMut {
            slots: tree.slots.as_mut_ptr(),
            front: tree.head,
            back: tree.tail,
            len: tree.len,
            _mut: PhantomData,
        }
    }

    fn node(&self, id: usize) -> Option<&'a mut Node<K, V>> {
        // SAFETY: `id` is a live slot of the exclusively borrowed tree, and every node is
        // yielded at most once because `len` stops the two ends before they cross.
        unsafe { (*self.slots.add(id)).node.as_mut() }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<(&'a K, &'a mut V)> {
        if self.len == 0 { return None; }
        let id = self.front?;
        let node = self.node(id)?;
        self.front = node.next;
        self.len -= 1;
        Some((&node.key, &mut node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
        if self.len == 0 { return None; }
        let id = self.back?;
        let node = self.node(id)?;
        self.back = node.prev;
        self.len -= 1;
        Some((&node.key, &mut node.value))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

unsafe impl<'a, K, V> Send for IterMut<'a, K, V> where K: Send, V: Send {}
unsafe impl<'a, K, V> Sync for IterMut<'a, K, V> where K: Sync, V: Sync {}

/// Takes nodes out of the arena in list order.
pub struct IntoIter<K, V> {
    tree: Tree<K, V>,
}

impl<K, V> IntoIter<K, V> {
    pub fn new(tree: Tree<K, V>) -> Self { IntoIter { tree } }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        if self.tree.len == 0 { return None; }
        let id = self.tree.head?;
        let node = self.tree.slots[id].node.take()?;
        self.tree.head = node.next;
        if self.tree.head.is_none() { self.tree.tail = None; }
        self.tree.len -= 1;
        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.tree.len, Some(self.tree.len)) }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        if self.tree.len == 0 { return None; }
        let id = self.tree.tail?;
        let node = self.tree.slots[id].node.take()?;
        self.tree.tail = node.prev;
        if self.tree.tail.is_none() { self.tree.head = None; }
        self.tree.len -= 1;
        Some((node.key, node.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
