//! An ordered map and set based on a red-black tree that rebalances in a single top-down pass
//! and threads its entries into a doubly linked list in key order.
//!
//! Entries are addressed either by key or by [`Position`](struct.Position.html), a lightweight
//! handle that survives unrelated insertions and removals. Stepping a position to its neighbor
//! follows the list in constant time.
//!
//! # Examples
//!
//! ```
//! use rbmap::{Error, Map};
//!
//! let mut map = Map::new();
//!
//! map.insert(20, "b");
//! map.insert(10, "a");
//! map.insert(30, "c");
//!
//! let mut pos = map.begin();
//! let mut keys = vec![];
//!
//! while !pos.is_end() {
//!     keys.push(*map.entry_at(pos).unwrap().0);
//!     pos = map.next_position(pos).unwrap();
//! }
//!
//! assert_eq!(keys, [10, 20, 30]);
//! assert_eq!(map.next_position(pos), Err(Error::IteratorOverflow));
//! ```

#![warn(missing_docs)]

mod error;
mod node;
#[cfg(feature = "ordered_iter")] mod ordered_iter;
#[cfg(feature = "quickcheck")] mod quickcheck;

pub mod map;
pub mod set;

pub use error::{Error, Result};
pub use map::{Cursor, Map, Position};
pub use set::Set;
