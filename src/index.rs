// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Lifecycle and query dispatch for one configured index.

use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::stats::TimeUnit;
use crate::trie::{Mstrie, Settings};

/// Owns one multiset-trie and its settings.
///
/// The trie itself exists between `init_index` and a destroying flush; the
/// settings outlive it, so a flushed index can be configured again.
#[derive(Debug)]
pub struct IndexManager {
    settings: Settings,
    unit: TimeUnit,
    trie: Option<Mstrie>,
}

impl IndexManager {
    pub fn new(settings: Settings, unit: TimeUnit) -> IndexManager {
        IndexManager {
            settings,
            unit,
            trie: None,
        }
    }

    /// Read the settings of the index named `name` from its config group.
    pub fn from_config(config: &Config, name: &str) -> Result<IndexManager> {
        let settings = Settings {
            alphabet: config.get_u32(&format!("{}:alphabet_length", name))?,
            max_multiplicity: config.get_u32(&format!("{}:max_multiplicity", name))?,
            index_path: PathBuf::from(config.get_str(&format!("{}:mstrie_path", name))?),
        };
        if settings.alphabet == 0 {
            let msg = format!("Configuration parameter '{}:alphabet_length' must be at least 1.", name);
            return Err(Error::InvalidParameter(msg));
        }

        let unit = match config.get_opt_str(&format!("{}:time_unit", name)) {
            Some(value) => value
                .parse()
                .map_err(|msg: &'static str| Error::InvalidParameter(String::from(msg)))?,
            None => TimeUnit::default(),
        };

        Ok(IndexManager::new(settings, unit))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn index_exists(&self) -> bool {
        self.trie.is_some()
    }

    fn trie_mut(&mut self) -> Result<&mut Mstrie> {
        self.trie.as_mut().ok_or(Error::IndexNotLoaded)
    }

    /// Create the in-memory trie, loading the index file when there is one.
    pub fn init_index(&mut self) -> Result<()> {
        let mut trie = Mstrie::new(self.settings.clone(), self.unit);
        if self.settings.index_path.is_file() {
            let contents = fs::read_to_string(&self.settings.index_path)?;
            trie.load(&contents)?;
        }
        self.trie = Some(trie);
        Ok(())
    }

    /// Write the trie to its index file; the trie stays usable.
    ///
    /// The dump is formed in memory first, so an IO failure cannot leave a
    /// half-written trie state in memory, only a short file on disk.
    pub fn save_index(&mut self) -> Result<()> {
        let path = self.settings.index_path.clone();
        let trie = self.trie_mut()?;
        let mut out = Vec::new();
        trie.dump(&mut out)?;
        fs::write(path, out)?;
        Ok(())
    }

    /// Save, and optionally destroy the in-memory trie.
    pub fn flush_index(&mut self, destroy: bool) -> Result<()> {
        self.save_index()?;
        if destroy {
            self.trie = None;
        }
        Ok(())
    }

    /// Run a boolean search of the given kind: `=`, `<=`, or `>=`.
    pub fn search_query(&mut self, kind: &str, word: &str, limit: Option<u32>) -> Result<bool> {
        let trie = self.trie_mut()?;
        match kind {
            "=" => trie.exact(word),
            "<=" => trie.subseteq(word, limit),
            ">=" => trie.superseteq(word, limit),
            other => Err(Error::UnknownQueryKind(String::from(other))),
        }
    }

    /// Run an update of the given kind: `+` inserts, `-` deletes.
    pub fn update_query(&mut self, kind: &str, word: &str) -> Result<()> {
        let trie = self.trie_mut()?;
        match kind {
            "+" => trie.insert(word),
            "-" => trie.delete(word),
            other => Err(Error::UnknownQueryKind(String::from(other))),
        }
    }

    /// Run a retrieval of the given kind: `<=` or `>=`.
    pub fn retrieve_query(
        &mut self,
        kind: &str,
        word: &str,
        limit: Option<u32>,
    ) -> Result<Vec<String>> {
        let trie = self.trie_mut()?;
        match kind {
            "<=" => trie.get_subseteq(word, limit),
            ">=" => trie.get_superseteq(word, limit),
            other => Err(Error::UnknownQueryKind(String::from(other))),
        }
    }

    pub fn last_query_stats(&self) -> Result<String> {
        match &self.trie {
            Some(trie) => Ok(trie.stats().last_query_report()),
            None => Err(Error::IndexNotLoaded),
        }
    }

    pub fn total_stats(&self) -> Result<String> {
        match &self.trie {
            Some(trie) => Ok(trie.stats().total_report()),
            None => Err(Error::IndexNotLoaded),
        }
    }

    pub fn full_stats(&self) -> Result<String> {
        match &self.trie {
            Some(trie) => Ok(trie.stats().full_report()),
            None => Err(Error::IndexNotLoaded),
        }
    }

    pub fn benchmark_stats(&self) -> Result<String> {
        match &self.trie {
            Some(trie) => Ok(trie.stats().benchmark_report()),
            None => Err(Error::IndexNotLoaded),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    use super::IndexManager;
    use crate::config::Config;
    use crate::error::Error;
    use crate::stats::TimeUnit;
    use crate::trie::Settings;

    fn temp_index_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("mstrie-index-test-{}-{}.mst", name, std::process::id()))
    }

    fn new_manager(name: &str) -> IndexManager {
        let settings = Settings {
            alphabet: 3,
            max_multiplicity: 4,
            index_path: temp_index_path(name),
        };
        IndexManager::new(settings, TimeUnit::default())
    }

    #[test]
    fn from_config_reads_the_index_group() {
        let lines = [
            "mstrie_A:",
            "\talphabet_length = \"5\"",
            "\tmax_multiplicity = \"2\"",
            "\tmstrie_path = \"/tmp/a.mst\"",
            "\ttime_unit = \"ns\"",
        ];
        let config = Config::parse(&lines).unwrap();
        let manager = IndexManager::from_config(&config, "mstrie_A").unwrap();
        assert_eq!(manager.settings().alphabet, 5);
        assert_eq!(manager.settings().max_multiplicity, 2);
        assert_eq!(manager.settings().index_path, PathBuf::from("/tmp/a.mst"));
        assert!(!manager.index_exists());
    }

    #[test]
    fn from_config_rejects_missing_and_invalid_parameters() {
        let lines = ["mstrie_A:", "\talphabet_length = \"3\""];
        let config = Config::parse(&lines).unwrap();
        assert!(matches!(
            IndexManager::from_config(&config, "mstrie_A"),
            Err(Error::IncompleteConfig(_)),
        ));

        let lines = [
            "mstrie_A:",
            "\talphabet_length = \"0\"",
            "\tmax_multiplicity = \"2\"",
            "\tmstrie_path = \"/tmp/a.mst\"",
        ];
        let config = Config::parse(&lines).unwrap();
        assert!(matches!(
            IndexManager::from_config(&config, "mstrie_A"),
            Err(Error::InvalidParameter(_)),
        ));
    }

    #[test]
    fn queries_before_init_fail() {
        let mut manager = new_manager("uninit");
        assert!(matches!(
            manager.search_query("=", "1,2", None),
            Err(Error::IndexNotLoaded),
        ));
        assert!(matches!(manager.save_index(), Err(Error::IndexNotLoaded)));
        assert!(matches!(manager.total_stats(), Err(Error::IndexNotLoaded)));
    }

    #[test]
    fn update_search_and_retrieve_dispatch_by_symbol() {
        let mut manager = new_manager("dispatch");
        manager.init_index().unwrap();

        manager.update_query("+", "1,2").unwrap();
        assert!(manager.search_query("=", "1,2", None).unwrap());
        assert!(manager.search_query("<=", "0,1,2", None).unwrap());
        assert!(manager.search_query(">=", "1", None).unwrap());
        assert_eq!(manager.retrieve_query(">=", "*", None).unwrap(), vec!["1,2"]);

        manager.update_query("-", "1,2").unwrap();
        assert!(!manager.search_query("=", "1,2", None).unwrap());

        assert!(matches!(
            manager.search_query("!=", "1,2", None),
            Err(Error::UnknownQueryKind(_)),
        ));
        assert!(matches!(
            manager.update_query("=", "1,2"),
            Err(Error::UnknownQueryKind(_)),
        ));
        assert!(matches!(
            manager.retrieve_query("=", "1,2", None),
            Err(Error::UnknownQueryKind(_)),
        ));
    }

    #[test]
    fn save_then_init_restores_the_index() {
        let mut manager = new_manager("save-restore");
        let path = manager.settings().index_path.clone();
        manager.init_index().unwrap();
        manager.update_query("+", "1,2").unwrap();
        manager.update_query("+", "*").unwrap();

        // A destroying flush writes the file and drops the trie.
        manager.flush_index(true).unwrap();
        assert!(!manager.index_exists());

        manager.init_index().unwrap();
        assert!(manager.search_query("=", "1,2", None).unwrap());
        assert!(manager.search_query("=", "*", None).unwrap());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn stats_reports_come_from_the_trie() {
        let mut manager = new_manager("stats");
        manager.init_index().unwrap();
        manager.update_query("+", "1,2").unwrap();
        assert_eq!(manager.total_stats().unwrap(), "Total nodes: 4; total multisets: 1\n");
        assert!(manager.last_query_stats().unwrap().starts_with("Last query: insert;"));
        assert!(manager.full_stats().unwrap().ends_with("total multisets: 1\n"));
        assert!(manager.benchmark_stats().unwrap().ends_with("µs"));
    }
}
