mod iter;

#[cfg(test)]
mod test;

use compare::Compare;
use log::{debug, trace};
use std::cmp::Ordering::*;

pub use self::iter::{IntoIter, Iter, IterMut};

/// An arena index naming a node, or nothing.
pub type Link = Option<usize>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    fn opposite(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// A stable reference to a live node that detects reuse of its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u64,
}

pub struct Node<K, V> {
    color: Color,
    parent: Link,
    left: Link,
    right: Link,
    prev: Link,
    next: Link,
    key: K,
    value: V,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, color: Color) -> Self {
        Node {
            color,
            parent: None,
            left: None,
            right: None,
            prev: None,
            next: None,
            key,
            value,
        }
    }

    fn child(&self, dir: Dir) -> Link {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    fn child_mut(&mut self, dir: Dir) -> &mut Link {
        match dir {
            Dir::Left => &mut self.left,
            Dir::Right => &mut self.right,
        }
    }
}

struct Slot<K, V> {
    generation: u64,
    node: Option<Node<K, V>>,
}

/// A red-black tree whose nodes live in an arena and are threaded in key order.
///
/// Both insertion and removal rebalance on the way down; neither walks back up.
pub struct Tree<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    root: Link,
    head: Link,
    tail: Link,
    len: usize,
    // Generation for freshly pushed slots; above every generation a released arena handed out.
    base_generation: u64,
}

#[cold]
fn dangling(id: usize) -> ! {
    panic!("dangling link to vacant slot {}", id)
}

impl<K, V> Tree<K, V> {
    pub fn new() -> Self {
        Tree {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            head: None,
            tail: None,
            len: 0,
            base_generation: 0,
        }
    }

    pub fn len(&self) -> usize { self.len }

    pub fn head(&self) -> Link { self.head }

    pub fn tail(&self) -> Link { self.tail }

    pub fn next(&self, id: usize) -> Link { self.node(id).next }

    pub fn prev(&self, id: usize) -> Link { self.node(id).prev }

    pub fn key_value(&self, id: usize) -> (&K, &V) {
        let node = self.node(id);
        (&node.key, &node.value)
    }

    pub fn key_value_mut(&mut self, id: usize) -> (&K, &mut V) {
        let node = self.node_mut(id);
        (&node.key, &mut node.value)
    }

    pub fn handle(&self, id: usize) -> Handle {
        Handle { index: id, generation: self.slots[id].generation }
    }

    /// Returns the node named by `handle` if it is still live.
    pub fn resolve(&self, handle: Handle) -> Link {
        self.slots.get(handle.index)
            .filter(|slot| slot.generation == handle.generation && slot.node.is_some())
            .map(|_| handle.index)
    }

    fn node(&self, id: usize) -> &Node<K, V> {
        match self.slots[id].node {
            Some(ref node) => node,
            None => dangling(id),
        }
    }

    fn node_mut(&mut self, id: usize) -> &mut Node<K, V> {
        match self.slots[id].node {
            Some(ref mut node) => node,
            None => dangling(id),
        }
    }

    fn is_red(&self, link: Link) -> bool {
        link.map_or(false, |id| self.node(id).color == Color::Red)
    }

    fn set_color(&mut self, id: usize, color: Color) {
        self.node_mut(id).color = color;
    }

    /// Which side of `parent` the node `id` hangs on.
    fn side(&self, id: usize, parent: usize) -> Dir {
        if self.node(parent).left == Some(id) { Dir::Left } else { Dir::Right }
    }

    fn alloc(&mut self, node: Node<K, V>) -> usize {
        match self.free.pop() {
            Some(id) => {
                self.slots[id].node = Some(node);
                id
            }
            None => {
                self.slots.push(Slot { generation: self.base_generation, node: Some(node) });
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, id: usize) -> Node<K, V> {
        let slot = &mut self.slots[id];
        let node = match slot.node.take() {
            Some(node) => node,
            None => dangling(id),
        };
        slot.generation += 1;
        self.free.push(id);
        node
    }

    // Gives the arena back once the last node is gone. New slots start above every retired
    // generation, so handles into the old arena stay stale.
    fn release_arena(&mut self) {
        let retired = self.slots.iter().map(|slot| slot.generation).max();
        if let Some(retired) = retired {
            self.base_generation = self.base_generation.max(retired);
        }

        debug!("releasing arena of {} slots", self.slots.len());
        self.slots = Vec::new();
        self.free = Vec::new();
    }

    pub fn find<C, Q: ?Sized>(&self, cmp: &C, key: &Q) -> Link where C: Compare<Q, K> {
        let mut link = self.root;

        while let Some(id) = link {
            let node = self.node(id);
            link = match cmp.compare(key, &node.key) {
                Equal => return Some(id),
                Less => node.left,
                Greater => node.right,
            };
        }

        None
    }

    /// Returns the closest node on the `dir` side of `key`, or the node holding `key` itself
    /// when `inclusive` is set.
    pub fn closest<C, Q: ?Sized>(&self, cmp: &C, key: &Q, dir: Dir, inclusive: bool) -> Link
        where C: Compare<Q, K> {

        let mut link = self.root;
        let mut closest = None;

        while let Some(id) = link {
            let node = self.node(id);
            link = match cmp.compare(key, &node.key) {
                Equal if inclusive => return Some(id),
                Equal => return match dir {
                    Dir::Left => node.prev,
                    Dir::Right => node.next,
                },
                Less => {
                    if dir == Dir::Right { closest = Some(id); }
                    node.left
                }
                Greater => {
                    if dir == Dir::Left { closest = Some(id); }
                    node.right
                }
            };
        }

        closest
    }

    pub fn insert<C>(&mut self, cmp: &C, key: K, value: V) -> (usize, bool) where C: Compare<K> {
        self.insert_with(cmp, key, || value)
    }

    /// Inserts `key` unless it is already present, building its value only if a node is created.
    pub fn insert_with<C, F>(&mut self, cmp: &C, key: K, value: F) -> (usize, bool)
        where C: Compare<K>, F: FnOnce() -> V {

        if let Some(id) = self.find(cmp, &key) { return (id, false); }

        let mut cur = match self.root {
            Some(root) => root,
            None => {
                let id = self.alloc(Node::new(key, value(), Color::Black));
                self.root = Some(id);
                self.head = Some(id);
                self.tail = Some(id);
                self.len = 1;
                return (id, true);
            }
        };

        loop {
            self.split(cur);

            let dir = match cmp.compare(&key, &self.node(cur).key) {
                Less => Dir::Left,
                _ => Dir::Right,
            };

            match self.node(cur).child(dir) {
                Some(child) => cur = child,
                None => {
                    let id = self.alloc(Node::new(key, value(), Color::Red));
                    self.node_mut(id).parent = Some(cur);
                    *self.node_mut(cur).child_mut(dir) = Some(id);

                    match dir {
                        Dir::Left => self.link_before(id, cur),
                        Dir::Right => self.link_after(id, cur),
                    }

                    self.len += 1;

                    if self.is_red(Some(cur)) {
                        let grand = self.node(cur).parent.expect("a red node has a parent");
                        self.rebalance_insert(id, cur, grand);
                    }

                    return (id, true);
                }
            }
        }
    }

    // Splits a node with two red children on the way down, repairing a red parent at once.
    fn split(&mut self, id: usize) {
        let (left, right) = {
            let node = self.node(id);
            (node.left, node.right)
        };

        if let (Some(left), Some(right)) = (left, right) {
            if self.is_red(Some(left)) && self.is_red(Some(right)) {
                trace!("color flip at slot {}", id);
                self.set_color(left, Color::Black);
                self.set_color(right, Color::Black);

                if let Some(parent) = self.node(id).parent {
                    self.set_color(id, Color::Red);

                    if self.is_red(Some(parent)) {
                        let grand = self.node(parent).parent.expect("a red node has a parent");
                        self.rebalance_insert(id, parent, grand);
                    }
                }
            }
        }
    }

    // Repairs a red `child` under a red `parent` by rotating at `grand`.
    fn rebalance_insert(&mut self, child: usize, parent: usize, grand: usize) {
        let parent_dir = self.side(parent, grand);
        let child_dir = self.side(child, parent);

        let top = if parent_dir == child_dir {
            self.rotate(grand, parent_dir.opposite())
        } else {
            self.rotate(parent, parent_dir);
            self.rotate(grand, parent_dir.opposite())
        };

        self.set_color(top, Color::Black);
        self.set_color(grand, Color::Red);
    }

    /// Removes the live node `target`, returning its key and value.
    pub fn remove<C>(&mut self, cmp: &C, target: usize) -> (K, V) where C: Compare<K> {
        let mut cur = self.root.expect("removing from an empty tree");

        loop {
            let dir = if cur == target {
                Dir::Right
            } else {
                match cmp.compare(&self.node(target).key, &self.node(cur).key) {
                    Less => Dir::Left,
                    _ => Dir::Right,
                }
            };

            self.push_red_down(cur, dir);

            match self.node(cur).child(dir) {
                Some(child) => cur = child,
                None => break,
            }
        }

        // `cur` is the target itself or its in-order successor.
        if cur != target { self.swap_positions(target, cur); }

        let child = {
            let node = self.node(target);
            node.left.or(node.right)
        };

        self.replace_child(target, child);
        if let Some(child) = child { self.set_color(child, Color::Black); }

        self.unlink(target);
        self.len -= 1;

        if let Some(root) = self.root { self.set_color(root, Color::Black); }

        let node = self.release(target);
        if self.len == 0 { self.release_arena(); }
        (node.key, node.value)
    }

    // Makes `id` red before the descent continues toward `dir`, so that the node finally
    // spliced out is red.
    fn push_red_down(&mut self, id: usize, dir: Dir) {
        let node = self.node(id);
        let (near, far, parent) = (node.child(dir), node.child(dir.opposite()), node.parent);

        if self.is_red(Some(id)) || self.is_red(near) { return; }

        if self.is_red(far) {
            let top = self.rotate(id, dir);
            self.set_color(id, Color::Red);
            self.set_color(top, Color::Black);
            return;
        }

        let parent = match parent {
            Some(parent) => parent,
            None => return,
        };

        let last = self.side(id, parent);

        let sibling = match self.node(parent).child(last.opposite()) {
            Some(sibling) => sibling,
            None => return,
        };

        let inner = self.node(sibling).child(last);
        let outer = self.node(sibling).child(last.opposite());

        if !self.is_red(inner) && !self.is_red(outer) {
            trace!("color flip below slot {}", parent);
            self.set_color(parent, Color::Black);
            self.set_color(sibling, Color::Red);
            self.set_color(id, Color::Red);
            return;
        }

        let top = if self.is_red(inner) {
            self.rotate(sibling, last.opposite());
            self.rotate(parent, last)
        } else {
            self.rotate(parent, last)
        };

        self.set_color(id, Color::Red);
        self.set_color(top, Color::Red);

        let (left, right) = {
            let node = self.node(top);
            (node.left, node.right)
        };

        for child in left.into_iter().chain(right) { self.set_color(child, Color::Black); }
    }

    /// Rotates the subtree rooted at `top` toward `dir`, returning the node lifted into its
    /// place.
    fn rotate(&mut self, top: usize, dir: Dir) -> usize {
        trace!("rotating slot {} {:?}", top, dir);

        let pivot = self.node(top).child(dir.opposite()).expect("rotation requires a pivot");
        let inner = self.node(pivot).child(dir);

        *self.node_mut(top).child_mut(dir.opposite()) = inner;
        if let Some(inner) = inner { self.node_mut(inner).parent = Some(top); }

        self.replace_child(top, Some(pivot));
        *self.node_mut(pivot).child_mut(dir) = Some(top);
        self.node_mut(top).parent = Some(pivot);

        pivot
    }

    // Puts `new` where `old` hangs from its parent, or at the root.
    fn replace_child(&mut self, old: usize, new: Link) {
        let parent = self.node(old).parent;
        if let Some(new) = new { self.node_mut(new).parent = parent; }

        match parent {
            None => self.root = new,
            Some(parent) => {
                let dir = self.side(old, parent);
                *self.node_mut(parent).child_mut(dir) = new;
            }
        }
    }

    // Exchanges the tree positions and colors of two nodes. Keys, values and list links stay
    // with their nodes.
    fn swap_positions(&mut self, a: usize, b: usize) {
        let place = |tree: &Self, id: usize| {
            let node = tree.node(id);
            let slot = node.parent.map(|parent| (parent, tree.side(id, parent)));
            (slot, node.left, node.right, node.color)
        };

        let swap = |link: Link| link.map(|id| if id == a { b } else if id == b { a } else { id });

        let (slot_a, left_a, right_a, color_a) = place(self, a);
        let (slot_b, left_b, right_b, color_b) = place(self, b);

        for &(id, slot, left, right, color) in &[(a, slot_b, left_b, right_b, color_b),
                                                 (b, slot_a, left_a, right_a, color_a)] {
            let node = self.node_mut(id);
            node.parent = swap(slot.map(|(parent, _)| parent));
            node.left = swap(left);
            node.right = swap(right);
            node.color = color;
        }

        for &(id, slot) in &[(a, slot_b), (b, slot_a)] {
            match slot {
                None => self.root = Some(id),
                Some((parent, _)) if parent == a || parent == b => {}
                Some((parent, dir)) => *self.node_mut(parent).child_mut(dir) = Some(id),
            }

            let (left, right) = {
                let node = self.node(id);
                (node.left, node.right)
            };

            for child in left.into_iter().chain(right) {
                if child != a && child != b { self.node_mut(child).parent = Some(id); }
            }
        }
    }

    fn link_before(&mut self, id: usize, next: usize) {
        let prev = self.node(next).prev;
        {
            let node = self.node_mut(id);
            node.prev = prev;
            node.next = Some(next);
        }
        self.node_mut(next).prev = Some(id);

        match prev {
            Some(prev) => self.node_mut(prev).next = Some(id),
            None => self.head = Some(id),
        }
    }

    fn link_after(&mut self, id: usize, prev: usize) {
        let next = self.node(prev).next;
        {
            let node = self.node_mut(id);
            node.prev = Some(prev);
            node.next = next;
        }
        self.node_mut(prev).next = Some(id);

        match next {
            Some(next) => self.node_mut(next).prev = Some(id),
            None => self.tail = Some(id),
        }
    }

    fn unlink(&mut self, id: usize) {
        let (prev, next) = {
            let node = self.node(id);
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }

        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }
}

impl<K, V> Clone for Tree<K, V> where K: Clone, V: Clone {
    fn clone(&self) -> Self {
        let mut tree = Tree {
            slots: Vec::with_capacity(self.len),
            free: Vec::new(),
            root: None,
            head: None,
            tail: None,
            len: self.len,
            base_generation: 0,
        };

        let root = self.root.map(|root| tree.copy_subtree(self, root, None));
        tree.root = root;

        let mut last = None;
        tree.thread(root, &mut last);
        tree.tail = last;

        debug!("cloned tree of {} nodes", tree.len);
        tree
    }
}

impl<K, V> Tree<K, V> where K: Clone, V: Clone {
    fn copy_subtree(&mut self, src: &Self, id: usize, parent: Link) -> usize {
        let node = src.node(id);
        let mut copy = Node::new(node.key.clone(), node.value.clone(), node.color);
        copy.parent = parent;
        let copy = self.alloc(copy);

        let left = node.left.map(|left| self.copy_subtree(src, left, Some(copy)));
        let right = node.right.map(|right| self.copy_subtree(src, right, Some(copy)));

        let node = self.node_mut(copy);
        node.left = left;
        node.right = right;
        copy
    }
}

impl<K, V> Tree<K, V> {
    // Rebuilds the list links of the subtree at `link` by an in-order walk.
    fn thread(&mut self, link: Link, last: &mut Link) {
        if let Some(id) = link {
            let left = self.node(id).left;
            self.thread(left, last);

            self.node_mut(id).prev = *last;
            match *last {
                Some(prev) => self.node_mut(prev).next = Some(id),
                None => self.head = Some(id),
            }
            *last = Some(id);

            let right = self.node(id).right;
            self.thread(right, last);
        }
    }
}
