// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{config::DuplicateKeys, HashMap, PageId};

/// Outcome of a single [`Bucket::insert`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Insertion {
    /// The key was stored in the primary node
    Stored,

    /// The key was already resident somewhere in the chain, and its entry was updated
    Updated,

    /// The primary node was full, so the key was routed to the overflow chain
    Collision,
}

impl Insertion {
    /// Returns `true` if the insertion was counted as a collision.
    #[must_use]
    pub fn is_collision(self) -> bool {
        self == Self::Collision
    }
}

/// A single node of a bucket chain
///
/// The primary node and every overflow node share the same capacity.
#[derive(Debug, Default)]
pub struct Node {
    entries: HashMap<String, Vec<PageId>>,
    collisions: u64,
}

impl Node {
    /// Number of resident keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the node holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of insertions that found this node full.
    #[must_use]
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// Returns the pages stored for `key` in this node only.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[PageId]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Iterates over the resident keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn is_full(&self, capacity: usize) -> bool {
        self.entries.len() >= capacity
    }
}

/// Fixed-capacity key to page container with overflow chaining
///
/// Once the primary node holds `capacity` keys, any further insertion of a new key
/// is a collision and goes to the overflow chain instead. A new overflow node is
/// appended only when the last one is full, so the chain never evicts and has no
/// depth limit.
///
/// The chain is stored flat: `chain[0]` is the primary node, `chain[1..]` are the
/// overflow nodes in creation order.
#[derive(Debug)]
pub struct Bucket {
    name: String,
    capacity: usize,
    chain: Vec<Node>,
}

impl Bucket {
    pub(crate) fn new(name: String, capacity: usize) -> Self {
        debug_assert!(capacity > 0, "bucket capacity may not be 0");

        Self {
            name,
            capacity,
            chain: vec![Node::default()],
        }
    }

    /// Bucket label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of keys per node.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of keys resident in the primary node.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primary().len()
    }

    /// Returns `true` if the bucket (including its overflow chain) holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary().is_empty()
    }

    /// Returns `true` if the primary node is full.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.primary().is_full(self.capacity)
    }

    /// Number of keys resident in the whole chain.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.chain.iter().map(Node::len).sum()
    }

    /// Number of overflow nodes.
    #[must_use]
    pub fn overflow_count(&self) -> usize {
        self.chain.len() - 1
    }

    /// Number of nodes in the chain, including the primary node.
    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    /// Collision counter of the primary node.
    #[must_use]
    pub fn collisions(&self) -> u64 {
        self.primary().collisions
    }

    /// Sum of the collision counters of every node in the chain.
    ///
    /// This counts collision events, which is not the same as the number of
    /// overflow nodes (see [`Bucket::overflow_count`]).
    #[must_use]
    pub fn total_collisions(&self) -> u64 {
        self.chain.iter().map(Node::collisions).sum()
    }

    /// The primary node.
    #[must_use]
    #[expect(clippy::expect_used, reason = "the chain always has a primary node")]
    pub fn primary(&self) -> &Node {
        self.chain.first().expect("chain should not be empty")
    }

    /// Iterates over the chain, starting with the primary node.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.chain.iter()
    }

    /// Iterates over the overflow nodes only.
    pub fn overflows(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.chain.iter().skip(1)
    }

    /// Iterates over every key resident in the chain.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.chain.iter().flat_map(Node::keys)
    }

    /// Label of a node in the chain, `0` being the primary node.
    #[must_use]
    pub fn node_name(&self, position: usize) -> String {
        if position == 0 {
            self.name.clone()
        } else {
            format!("{} - OVERFLOW {position}", self.name)
        }
    }

    /// Inserts a `(key, page)` pair.
    ///
    /// If the key is already resident in the chain, its entry is updated according to
    /// `duplicates`. Otherwise the key goes into the primary node if it has room, or is
    /// routed to the overflow chain as a collision.
    pub fn insert(&mut self, key: &str, page: PageId, duplicates: DuplicateKeys) -> Insertion {
        if let Some(pages) = self.chain.iter_mut().find_map(|node| node.entries.get_mut(key)) {
            duplicates.apply(pages, page);
            return Insertion::Updated;
        }

        let capacity = self.capacity;

        if !self.primary().is_full(capacity) {
            self.primary_mut().entries.insert(key.into(), vec![page]);
            return Insertion::Stored;
        }

        self.primary_mut().collisions += 1;

        // NOTE: While there are no overflow nodes, the last node is the (full) primary node
        if self.chain.last().is_none_or(|last| last.is_full(capacity)) {
            log::trace!(
                "{}: appending overflow node #{}",
                self.name,
                self.chain.len()
            );
            self.chain.push(Node::default());
        }

        // NOTE: The last node always has room at this point, because we just
        // pushed a fresh one if it didn't
        if let Some(last) = self.chain.last_mut() {
            last.entries.insert(key.into(), vec![page]);
        }

        Insertion::Collision
    }

    /// Returns the pages stored for `key`, walking the chain in order.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[PageId]> {
        self.probe(key).0
    }

    /// Like [`Bucket::get`], but also returns how many nodes were probed.
    #[must_use]
    pub fn probe(&self, key: &str) -> (Option<&[PageId]>, usize) {
        let mut probes = 0;

        for node in &self.chain {
            probes += 1;

            if let Some(pages) = node.get(key) {
                return (Some(pages), probes);
            }
        }

        (None, probes)
    }

    #[expect(clippy::expect_used, reason = "the chain always has a primary node")]
    fn primary_mut(&mut self) -> &mut Node {
        self.chain.first_mut().expect("chain should not be empty")
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (position, node) in self.chain.iter().enumerate() {
            if position > 0 {
                writeln!(f)?;
                write!(f, "  ")?;
            }
            write!(
                f,
                "{} [{}/{}, collisions={}]",
                self.node_name(position),
                node.len(),
                self.capacity,
                node.collisions,
            )?;
        }
        Ok(())
    }
}
