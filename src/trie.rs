// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The multiset-trie: a fixed-depth digital search tree over multisets.
//!
//! A multiset over an alphabet of size `A` with maximal multiplicity `M` is a
//! vector of `A` multiplicities in `0..=M`. The trie has depth exactly `A`:
//! the slot chosen at level `k` encodes how often element `k` occurs, and a
//! full path ends in an acceptor slot when its multiset is stored. Interior
//! nodes live in one arena and refer to each other by `u32` handle, which
//! keeps the fan-out array dense and makes dropping the trie trivial.

use std::io::Write;
use std::path::PathBuf;

use crate::codec::{self, Codec};
use crate::error::{Error, Result};
use crate::stats::{Stats, TimeUnit};

/// The immutable parameters of one index.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Number of distinct elements a multiset may contain. At least 1.
    pub alphabet: u32,
    /// Upper bound on the multiplicity of any one element.
    pub max_multiplicity: u32,
    /// Where the index is persisted.
    pub index_path: PathBuf,
}

/// Handle of an interior node in the arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct NodeId(u32);

const ROOT: NodeId = NodeId(0);

/// One child slot of a node, indexed by multiplicity value.
///
/// `Accept` marks the end of a stored multiset's path. It plays the role of a
/// shared acceptor sentinel: all acceptances are the same value, there is
/// nothing to descend into, and comparing against it is free.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Slot {
    Empty,
    Child(NodeId),
    Accept,
}

/// An interior node: a dense array of `max_multiplicity + 1` slots.
#[derive(Debug)]
struct Node {
    slots: Box<[Slot]>,
}

/// An in-memory multiset-trie with its statistics.
#[derive(Debug)]
pub struct Mstrie {
    settings: Settings,
    codec: Codec,
    nodes: Vec<Node>,
    stats: Stats,
}

impl Mstrie {
    /// Create an empty trie: the root and the acceptor, no multisets.
    pub fn new(settings: Settings, unit: TimeUnit) -> Mstrie {
        let fanout = settings.max_multiplicity as usize + 1;
        let root = Node {
            slots: vec![Slot::Empty; fanout].into_boxed_slice(),
        };
        Mstrie {
            codec: Codec::new(settings.alphabet),
            settings,
            nodes: vec![root],
            stats: Stats::new(unit),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    fn alloc_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let fanout = self.settings.max_multiplicity as usize + 1;
        self.nodes.push(Node {
            slots: vec![Slot::Empty; fanout].into_boxed_slice(),
        });
        id
    }

    fn slot_at(&self, node: NodeId, value: u32) -> Slot {
        self.nodes[node.0 as usize].slots[value as usize]
    }

    fn set_slot(&mut self, node: NodeId, value: u32, slot: Slot) {
        self.nodes[node.0 as usize].slots[value as usize] = slot;
    }

    fn occupied_slots(&self, node: NodeId) -> usize {
        self.nodes[node.0 as usize]
            .slots
            .iter()
            .filter(|slot| **slot != Slot::Empty)
            .count()
    }

    /// Decode a token and verify every multiplicity is at most the maximum.
    ///
    /// The codec does not know the multiplicity bound; an unchecked vector
    /// would index out of a node's slot array.
    fn decode_checked(&self, word: &str) -> Result<Vec<u32>> {
        let v = self.codec.decode(word)?;
        for &count in &v {
            if count > self.settings.max_multiplicity {
                let msg = format!(
                    "Token multiplicity {} exceeds the maximal multiplicity {}.",
                    count, self.settings.max_multiplicity,
                );
                return Err(Error::OutOfRange(msg));
            }
        }
        Ok(v)
    }

    /// A negative or absent limit means "unbounded"; nothing exceeds `M`.
    fn clamp_limit(&self, limit: Option<u32>) -> u32 {
        let m = self.settings.max_multiplicity;
        limit.map_or(m, |l| l.min(m))
    }

    /// Store a multiset. Idempotent: reinserting changes no counter.
    pub fn insert(&mut self, word: &str) -> Result<()> {
        let q = self.decode_checked(word)?;
        self.stats.begin_query(String::from("insert"));
        self.insert_vec(&q);
        self.stats.end_query();
        Ok(())
    }

    fn insert_vec(&mut self, q: &[u32]) {
        let last = q.len() - 1;
        let mut cur = ROOT;
        for &value in &q[..last] {
            cur = match self.slot_at(cur, value) {
                Slot::Child(id) => id,
                Slot::Empty => {
                    let id = self.alloc_node();
                    self.set_slot(cur, value, Slot::Child(id));
                    self.stats.add_node();
                    id
                }
                Slot::Accept => unreachable!("acceptor above the leaf level"),
            };
            self.stats.visit_node();
        }
        if self.slot_at(cur, q[last]) != Slot::Accept {
            self.set_slot(cur, q[last], Slot::Accept);
            self.stats.add_multiset();
        }
        self.stats.visit_node();
    }

    /// Remove a multiset, or fail without modifying anything.
    pub fn delete(&mut self, word: &str) -> Result<()> {
        let q = self.decode_checked(word)?;
        self.stats.begin_query(String::from("delete"));
        let result = self.delete_vec(&q);
        self.stats.end_query();
        result
    }

    fn delete_vec(&mut self, q: &[u32]) -> Result<()> {
        let a = q.len();

        // Walk the full path first. The trie is only modified once the
        // acceptor is known to exist.
        let mut path = Vec::with_capacity(a);
        let mut cur = ROOT;
        for &value in &q[..a - 1] {
            path.push(cur);
            match self.slot_at(cur, value) {
                Slot::Child(id) => {
                    self.stats.visit_node();
                    cur = id;
                }
                _ => return Err(Error::NothingToDelete),
            }
        }
        path.push(cur);
        if self.slot_at(cur, q[a - 1]) != Slot::Accept {
            return Err(Error::NothingToDelete);
        }
        self.stats.visit_node();

        // Sever at the deepest level where the path has a sibling. Every node
        // below that level carries only this multiset's path, so the whole
        // chain comes off in one slot clear.
        let mut pos = 0;
        for level in (0..a).rev() {
            if self.occupied_slots(path[level]) > 1 {
                pos = level;
                break;
            }
        }
        self.set_slot(path[pos], q[pos], Slot::Empty);
        self.stats.remove_nodes((a - pos - 1) as u64);
        self.stats.remove_multiset();
        Ok(())
    }

    /// Is exactly this multiset stored?
    pub fn exact(&mut self, word: &str) -> Result<bool> {
        let q = self.decode_checked(word)?;
        self.stats.begin_query(String::from("search exact"));
        let found = self.exact_vec(&q);
        self.stats.end_query();
        Ok(found)
    }

    fn exact_vec(&mut self, q: &[u32]) -> bool {
        let last = q.len() - 1;
        let mut cur = ROOT;
        for &value in &q[..last] {
            match self.slot_at(cur, value) {
                Slot::Child(id) => {
                    self.stats.visit_node();
                    cur = id;
                }
                _ => return false,
            }
        }
        match self.slot_at(cur, q[last]) {
            Slot::Accept => {
                self.stats.visit_node();
                true
            }
            _ => false,
        }
    }

    /// Is some stored multiset a submultiset of `word`, with every
    /// multiplicity at most `limit` below the query's?
    pub fn subseteq(&mut self, word: &str, limit: Option<u32>) -> Result<bool> {
        let q = self.decode_checked(word)?;
        let limit = self.clamp_limit(limit);
        self.stats.begin_query(String::from("search sub"));
        let found = self.subseteq_rec(ROOT, &q, limit, 0);
        self.stats.end_query();
        Ok(found)
    }

    // The scan at each level runs the slot value and a local countdown in
    // lockstep: at most `limit + 1` slot values per level, and the child
    // recursion starts over from the original limit. The offset bound is per
    // level, not cumulative along the path.
    fn subseteq_rec(&mut self, node: NodeId, q: &[u32], limit: u32, level: usize) -> bool {
        let mut value = q[level] as i64;
        let mut steps = i64::from(limit);
        while value >= 0 && steps >= 0 {
            match self.slot_at(node, value as u32) {
                Slot::Accept => {
                    self.stats.visit_node();
                    return true;
                }
                Slot::Child(id) => {
                    self.stats.visit_node();
                    if self.subseteq_rec(id, q, limit, level + 1) {
                        return true;
                    }
                }
                Slot::Empty => {}
            }
            value -= 1;
            steps -= 1;
        }
        false
    }

    /// Is some stored multiset a supermultiset of `word`, with every
    /// multiplicity at most `limit` above the query's?
    pub fn superseteq(&mut self, word: &str, limit: Option<u32>) -> Result<bool> {
        let q = self.decode_checked(word)?;
        let limit = self.clamp_limit(limit);
        self.stats.begin_query(String::from("search sup"));
        let found = self.superseteq_rec(ROOT, &q, limit, 0);
        self.stats.end_query();
        Ok(found)
    }

    fn superseteq_rec(&mut self, node: NodeId, q: &[u32], limit: u32, level: usize) -> bool {
        let mut value = q[level];
        let mut steps = i64::from(limit);
        while value <= self.settings.max_multiplicity && steps >= 0 {
            match self.slot_at(node, value) {
                Slot::Accept => {
                    self.stats.visit_node();
                    return true;
                }
                Slot::Child(id) => {
                    self.stats.visit_node();
                    if self.superseteq_rec(id, q, limit, level + 1) {
                        return true;
                    }
                }
                Slot::Empty => {}
            }
            value += 1;
            steps -= 1;
        }
        false
    }

    /// All stored submultisets of `word` within the offset limit, encoded as
    /// tokens, in traversal order (higher multiplicities first per level).
    pub fn get_subseteq(&mut self, word: &str, limit: Option<u32>) -> Result<Vec<String>> {
        let q = self.decode_checked(word)?;
        let limit = self.clamp_limit(limit);
        self.stats.begin_query(format!("retrieve sub_{}", limit));
        let mut chosen = vec![0_u32; q.len()];
        let mut out = Vec::new();
        self.get_subseteq_rec(ROOT, &q, &mut chosen, &mut out, limit, 0);
        self.stats.end_query();
        Ok(out)
    }

    fn get_subseteq_rec(
        &mut self,
        node: NodeId,
        q: &[u32],
        chosen: &mut Vec<u32>,
        out: &mut Vec<String>,
        limit: u32,
        level: usize,
    ) {
        let mut value = q[level] as i64;
        let mut steps = i64::from(limit);
        while value >= 0 && steps >= 0 {
            match self.slot_at(node, value as u32) {
                Slot::Accept => {
                    self.stats.visit_node();
                    chosen[level] = value as u32;
                    out.push(self.codec.encode(chosen));
                }
                Slot::Child(id) => {
                    self.stats.visit_node();
                    chosen[level] = value as u32;
                    self.get_subseteq_rec(id, q, chosen, out, limit, level + 1);
                }
                Slot::Empty => {}
            }
            value -= 1;
            steps -= 1;
        }
    }

    /// All stored supermultisets of `word` within the offset limit, encoded
    /// as tokens, in traversal order (lower multiplicities first per level).
    pub fn get_superseteq(&mut self, word: &str, limit: Option<u32>) -> Result<Vec<String>> {
        let q = self.decode_checked(word)?;
        let limit = self.clamp_limit(limit);
        self.stats.begin_query(format!("retrieve sup_{}", limit));
        let mut chosen = vec![0_u32; q.len()];
        let mut out = Vec::new();
        self.get_superseteq_rec(ROOT, &q, &mut chosen, &mut out, limit, 0);
        self.stats.end_query();
        Ok(out)
    }

    fn get_superseteq_rec(
        &mut self,
        node: NodeId,
        q: &[u32],
        chosen: &mut Vec<u32>,
        out: &mut Vec<String>,
        limit: u32,
        level: usize,
    ) {
        let mut value = q[level];
        let mut steps = i64::from(limit);
        while value <= self.settings.max_multiplicity && steps >= 0 {
            match self.slot_at(node, value) {
                Slot::Accept => {
                    self.stats.visit_node();
                    chosen[level] = value;
                    out.push(self.codec.encode(chosen));
                }
                Slot::Child(id) => {
                    self.stats.visit_node();
                    chosen[level] = value;
                    self.get_superseteq_rec(id, q, chosen, out, limit, level + 1);
                }
                Slot::Empty => {}
            }
            value += 1;
            steps -= 1;
        }
    }

    /// Every stored multiset, in ascending traversal order.
    ///
    /// This is the supermultiset enumeration of the zero vector with an
    /// unbounded offset, but through a dedicated traversal: persistence is an
    /// internal operation and must leave the per-query statistics untouched.
    fn enumerate_all(&self) -> Vec<String> {
        let a = self.settings.alphabet as usize;
        let mut chosen = vec![0_u32; a];
        let mut out = Vec::new();
        self.enumerate_all_rec(ROOT, &mut chosen, &mut out, 0);
        out
    }

    fn enumerate_all_rec(
        &self,
        node: NodeId,
        chosen: &mut Vec<u32>,
        out: &mut Vec<String>,
        level: usize,
    ) {
        for value in 0..=self.settings.max_multiplicity {
            match self.slot_at(node, value) {
                Slot::Accept => {
                    chosen[level] = value;
                    out.push(self.codec.encode(chosen));
                }
                Slot::Child(id) => {
                    chosen[level] = value;
                    self.enumerate_all_rec(id, chosen, out, level + 1);
                }
                Slot::Empty => {}
            }
        }
    }

    /// Serialize the trie to the flat dump format.
    pub fn dump<W: Write>(&self, mut w: W) -> Result<()> {
        let words = self.enumerate_all();
        let created_ms = chrono::Utc::now().timestamp_millis();
        codec::write_dump(
            &mut w,
            created_ms,
            self.settings.max_multiplicity,
            self.settings.alphabet,
            &words,
        )?;
        Ok(())
    }

    /// Re-insert the multisets of a dump into this trie.
    ///
    /// The dump's parameters must match this trie's settings exactly.
    pub fn load(&mut self, contents: &str) -> Result<()> {
        let dump = codec::parse_dump(contents)?;
        if dump.max_multiplicity != self.settings.max_multiplicity
            || dump.alphabet != self.settings.alphabet
        {
            return Err(Error::Parametrization);
        }
        for word in dump.words {
            self.insert(word)?;
        }
        Ok(())
    }
}

#[test]
fn struct_sizes_are_as_expected() {
    use std::mem;
    assert_eq!(mem::size_of::<Slot>(), 8);
    assert_eq!(mem::size_of::<NodeId>(), 4);
}
