//! Typed-arena model of the runtime hashed set.
//!
//! The compiled set library works on raw linear memory: a bucket array of
//! [`SET_BUCKETS`] words, each the head of a chain of 2-word `{key, next}`
//! nodes, with 0 as the none sentinel. This module expresses the identical
//! hashing and chaining algorithm over an explicit arena with [`NodeId`]
//! handles instead of addresses. It serves as the reference the emitted
//! library is checked against, and as a native set for host-side code.
//!
//! # Arena invariant
//!
//! Nodes are only ever appended. `remove` unlinks nodes from their chain but
//! never returns them to the arena, so [`NodeArena::len`] only grows.

const BUCKETS: u32 = 10;

/// Fixed bucket count. There is no resizing or rehashing.
pub const SET_BUCKETS: usize = BUCKETS as usize;

/// Bytes per machine word in linear memory.
pub const WORD_BYTES: i32 = 4;

/// Words per node record: `{key, next}`.
pub const NODE_WORDS: i32 = 2;

/// Bucket index for `key`: the key's bit pattern, unsigned, modulo
/// [`SET_BUCKETS`] (the target's `rem_u`).
pub fn bucket_of(key: i32) -> usize {
    let unsigned = u32::from_ne_bytes(key.to_ne_bytes());
    (unsigned % BUCKETS) as usize
}

/// Handle to a node in a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A chain node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub key: i32,
    pub next: Option<NodeId>,
}

/// Append-only node storage.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node holding `key` with no successor.
    #[expect(clippy::cast_possible_truncation, reason = "node counts never exceed u32")]
    pub fn create_entry(&mut self, key: i32) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { key, next: None });
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes ever allocated.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A hashed set of `i32` keys with separate chaining.
///
/// The set owns only its bucket heads; nodes live in a shared [`NodeArena`]
/// so several sets can allocate from one arena, as they do from one linear
/// memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainedSet {
    buckets: [Option<NodeId>; SET_BUCKETS],
}

impl ChainedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key`. Adding a present key is a no-op.
    pub fn add(&mut self, arena: &mut NodeArena, key: i32) {
        let bucket = bucket_of(key);
        let Some(head) = self.buckets[bucket] else {
            self.buckets[bucket] = Some(arena.create_entry(key));
            return;
        };
        let mut node = head;
        loop {
            let current = *arena.get(node);
            if current.key == key {
                return;
            }
            match current.next {
                Some(next) => node = next,
                None => break,
            }
        }
        let entry = arena.create_entry(key);
        arena.get_mut(node).next = Some(entry);
    }

    pub fn contains(&self, arena: &NodeArena, key: i32) -> bool {
        self.chain(arena, bucket_of(key)).any(|k| k == key)
    }

    /// Number of keys, counted over every bucket's chain.
    pub fn len(&self, arena: &NodeArena) -> usize {
        (0..SET_BUCKETS).map(|b| self.chain(arena, b).count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Option::is_none)
    }

    /// Unlink every node holding `key`. Unlinked nodes stay in the arena.
    pub fn remove(&mut self, arena: &mut NodeArena, key: i32) {
        let bucket = bucket_of(key);
        let mut prev: Option<NodeId> = None;
        let mut curr = self.buckets[bucket];
        while let Some(id) = curr {
            let node = *arena.get(id);
            if node.key == key {
                match prev {
                    None => self.buckets[bucket] = node.next,
                    Some(p) => arena.get_mut(p).next = node.next,
                }
            } else {
                prev = Some(id);
            }
            curr = node.next;
        }
    }

    /// Keys in bucket order, then chain order. The order carries no meaning.
    pub fn keys<'a>(&'a self, arena: &'a NodeArena) -> impl Iterator<Item = i32> + 'a {
        (0..SET_BUCKETS).flat_map(move |b| self.chain(arena, b))
    }

    fn chain<'a>(&self, arena: &'a NodeArena, bucket: usize) -> impl Iterator<Item = i32> + 'a {
        let mut curr = self.buckets[bucket];
        std::iter::from_fn(move || {
            let id = curr?;
            let node = arena.get(id);
            curr = node.next;
            Some(node.key)
        })
    }
}
