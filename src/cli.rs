// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The interactive command driver.
//!
//! Reads one command per line from stdin, dispatches onto the configured
//! index managers, and prints results to stdout. Errors are rendered to
//! stderr with their causes and never end the session; only `exit` (or end
//! of input) does, after flushing every configured index.

use std::collections::BTreeMap;
use std::io;
use std::io::Write;

use crate::config::Config;
use crate::error::{format_causes, Error, Result};
use crate::index::IndexManager;

const HELP: &str = "
Mstrie commands:
\thelp
\t\tdisplays this dialog with commands description.

\tconfigure [name]
\t\tloads or creates a Multiset-trie structure using the configuration
\t\tparameters of the named index: the alphabet length, the maximal
\t\tmultiplicity, and the file path for storage. Without a name, the
\t\tdefault index is configured.

\tmanagers
\t\tlists the configured Multiset-trie structures.

\tsave
\t\tsaves the current Multiset-trie structure into its configured file.

\tflush [name]
\t\tsaves the Multiset-trie structure into its configured file and
\t\tdestroys the in-memory instance.

\tsearch < <= | = | >= > <word> [limit]
\t\tanswers whether there is a matching found similar to word. The type
\t\tof matching can be specified: '=' exact matching, '<=' submultiset
\t\tmatching, '>=' supermultiset matching.

\tretrieve < <= | >= > <word | *> [limit]
\t\tretrieves the matched results similar to word, where * is the empty
\t\tmultiset. The limit parameter sets the offset limit for the
\t\tmultiplicity changes during search.

\tupdate < - | + > <word>
\t\tupdates the Multiset-trie structure with word: '+' inserts the
\t\tword, '-' removes it.

\tstats_<all | total | last>
\t\tprints statistics of the Multiset-trie structure. All prints both
\t\ttotal and last; total prints the total number of nodes and
\t\tmultisets; last prints the name, the time, and the number of nodes
\t\ttraversed by the last performed query.

\texit
\t\tflushes every configured structure and exits the mstrie program.
";

pub struct Cli {
    config: Config,
    managers: BTreeMap<String, IndexManager>,
    current: String,
    default_name: String,
}

impl Cli {
    pub fn new(config: Config) -> Result<Cli> {
        let default_name = String::from(config.get_str("default_mstrie_name")?);
        Ok(Cli {
            config,
            managers: BTreeMap::new(),
            current: String::new(),
            default_name,
        })
    }

    /// Run the command loop until `exit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("{}> ", self.current);
            io::stdout().flush()?;

            line.clear();
            if stdin.read_line(&mut line)? == 0 {
                // End of input behaves like `exit`.
                self.flush_all()?;
                return Ok(());
            }

            let argv: Vec<&str> = line.split_whitespace().collect();
            if argv.is_empty() {
                continue;
            }
            match self.exec(&argv) {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(err) => eprint!("{}", format_causes(&err)),
            }
        }
    }

    /// Execute one command line. `Ok(false)` ends the session.
    fn exec(&mut self, argv: &[&str]) -> Result<bool> {
        match argv[0] {
            "help" => println!("{}", HELP),
            "configure" => self.configure(argv.get(1).copied())?,
            "managers" => {
                for name in self.managers.keys() {
                    println!("{}", name);
                }
            }
            "save" => self.current_manager()?.save_index()?,
            "flush" => self.flush(argv.get(1).copied())?,
            "search" => {
                let found = self.search(argv)?;
                println!("{}", found);
            }
            "update" => self.update(argv)?,
            "retrieve" => {
                let results = self.retrieve(argv)?;
                println!("{}", results.join("|"));
            }
            "stats_all" => print!("{}", self.current_manager()?.full_stats()?),
            "stats_total" => print!("{}", self.current_manager()?.total_stats()?),
            "stats_last" => print!("{}", self.current_manager()?.last_query_stats()?),
            "exit" => {
                self.flush_all()?;
                return Ok(false);
            }
            other => return Err(Error::UnknownCommand(String::from(other))),
        }
        Ok(true)
    }

    fn current_manager(&mut self) -> Result<&mut IndexManager> {
        self.managers
            .get_mut(&self.current)
            .ok_or(Error::IndexNotLoaded)
    }

    /// Configure the named index (default when no name), and make it current.
    fn configure(&mut self, name: Option<&str>) -> Result<()> {
        let name = String::from(name.unwrap_or(&self.default_name));
        let mut manager = IndexManager::from_config(&self.config, &name)?;
        manager.init_index()?;
        self.managers.insert(name.clone(), manager);
        self.current = name;
        Ok(())
    }

    /// Save the named (default: current) index and destroy its trie.
    fn flush(&mut self, name: Option<&str>) -> Result<()> {
        let name = String::from(name.unwrap_or(&self.current));
        let manager = self
            .managers
            .get_mut(&name)
            .ok_or(Error::IndexNotLoaded)?;
        manager.flush_index(true)?;
        self.managers.remove(&name);
        if self.current == name {
            self.current = String::new();
        }
        Ok(())
    }

    /// Flush every manager that still has an in-memory trie.
    fn flush_all(&mut self) -> Result<()> {
        for manager in self.managers.values_mut() {
            if manager.index_exists() {
                manager.flush_index(true)?;
            }
        }
        self.managers.clear();
        self.current = String::new();
        Ok(())
    }

    fn search(&mut self, argv: &[&str]) -> Result<bool> {
        match argv {
            [_, kind, word] => self.current_manager()?.search_query(kind, word, None),
            [_, kind, word, limit] => {
                let limit = parse_limit(limit)?;
                self.current_manager()?.search_query(kind, word, limit)
            }
            _ => Err(Error::CommandUsage("search < <= | = | >= > <word> [limit]")),
        }
    }

    fn update(&mut self, argv: &[&str]) -> Result<()> {
        match argv {
            [_, kind, word] => self.current_manager()?.update_query(kind, word),
            _ => Err(Error::CommandUsage("update < - | + > <word>")),
        }
    }

    fn retrieve(&mut self, argv: &[&str]) -> Result<Vec<String>> {
        match argv {
            [_, kind, word] => self.current_manager()?.retrieve_query(kind, word, None),
            [_, kind, word, limit] => {
                let limit = parse_limit(limit)?;
                self.current_manager()?.retrieve_query(kind, word, limit)
            }
            _ => Err(Error::CommandUsage("retrieve < <= | >= > <word | *> [limit]")),
        }
    }
}

/// Parse an optional limit argument; any negative value means "unbounded".
fn parse_limit(arg: &str) -> Result<Option<u32>> {
    match arg.parse::<i64>() {
        Ok(n) if n < 0 => Ok(None),
        Ok(n) if n <= i64::from(u32::max_value()) => Ok(Some(n as u32)),
        Ok(_) => Ok(None),
        Err(_) => Err(Error::InvalidToken(format!(
            "Limit '{}' is not an integer.",
            arg,
        ))),
    }
}
