// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Query statistics: per-query counters, lifetime counters, and reports.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Unit in which elapsed query times are reported.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimeUnit {
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl TimeUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Millis => "ms",
            TimeUnit::Micros => "µs",
            TimeUnit::Nanos => "ns",
        }
    }

    fn convert(self, d: Duration) -> u128 {
        match self {
            TimeUnit::Seconds => u128::from(d.as_secs()),
            TimeUnit::Millis => d.as_millis(),
            TimeUnit::Micros => d.as_micros(),
            TimeUnit::Nanos => d.as_nanos(),
        }
    }
}

impl Default for TimeUnit {
    fn default() -> TimeUnit {
        TimeUnit::Micros
    }
}

impl FromStr for TimeUnit {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<TimeUnit, &'static str> {
        match s {
            "s" => Ok(TimeUnit::Seconds),
            "ms" => Ok(TimeUnit::Millis),
            "µs" | "us" => Ok(TimeUnit::Micros),
            "ns" => Ok(TimeUnit::Nanos),
            _ => Err("Invalid time unit, expected one of 's', 'ms', 'µs', 'ns'."),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Counters of a multiset-trie.
///
/// The per-query fields (name, traversed nodes, elapsed time) are reset at the
/// entry of every public query. The lifetime counters change only on insert
/// and delete; a fresh trie counts two nodes, the root and the acceptor.
#[derive(Debug)]
pub struct Stats {
    unit: TimeUnit,
    total_nodes: u64,
    total_multisets: u64,
    last_query_name: String,
    traversed_nodes: u64,
    started: Option<Instant>,
    elapsed: Duration,
}

impl Stats {
    pub fn new(unit: TimeUnit) -> Stats {
        Stats {
            unit,
            total_nodes: 2,
            total_multisets: 0,
            last_query_name: String::new(),
            traversed_nodes: 0,
            started: None,
            elapsed: Duration::new(0, 0),
        }
    }

    /// Reset the per-query counters and start the clock.
    pub fn begin_query(&mut self, name: String) {
        self.last_query_name = name;
        self.traversed_nodes = 0;
        self.elapsed = Duration::new(0, 0);
        self.started = Some(Instant::now());
    }

    /// Stop the clock started by the matching [`begin_query`](Stats::begin_query).
    pub fn end_query(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
    }

    /// Count one step of a descent: a child node entered, or the acceptor reached.
    pub fn visit_node(&mut self) {
        self.traversed_nodes += 1;
    }

    pub fn add_node(&mut self) {
        self.total_nodes += 1;
    }

    pub fn remove_nodes(&mut self, n: u64) {
        self.total_nodes -= n;
    }

    pub fn add_multiset(&mut self) {
        self.total_multisets += 1;
    }

    pub fn remove_multiset(&mut self) {
        self.total_multisets -= 1;
    }

    pub fn total_nodes(&self) -> u64 {
        self.total_nodes
    }

    pub fn total_multisets(&self) -> u64 {
        self.total_multisets
    }

    pub fn traversed_nodes(&self) -> u64 {
        self.traversed_nodes
    }

    pub fn last_query_report(&self) -> String {
        format!(
            "Last query: {}; time: {} {}; nodes: {}\n",
            self.last_query_name,
            self.unit.convert(self.elapsed),
            self.unit.suffix(),
            self.traversed_nodes,
        )
    }

    pub fn total_report(&self) -> String {
        format!(
            "Total nodes: {}; total multisets: {}\n",
            self.total_nodes, self.total_multisets,
        )
    }

    pub fn full_report(&self) -> String {
        let mut report = self.last_query_report();
        report.push_str(&self.total_report());
        report
    }

    /// The bare elapsed time followed by the unit, without separator.
    pub fn benchmark_report(&self) -> String {
        format!("{}{}", self.unit.convert(self.elapsed), self.unit.suffix())
    }
}
