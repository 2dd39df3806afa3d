// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Configuration file parser.
//!
//! The format is line-based and hierarchical. A line ending in `:` opens a
//! group, `name = "value"` lines are parameters, and the number of leading tab
//! characters gives the nesting depth. Lines whose first non-blank character
//! is `#` are comments. Parameters are addressed by colon-joined paths, for
//! example `mstrie_A:alphabet_length`.
//!
//! ```text
//! run_mode = "cli"
//! default_mstrie_name = "mstrie_A"
//!
//! mstrie_A:
//! 	alphabet_length = "3"
//! 	max_multiplicity = "4"
//! 	mstrie_path = "/var/lib/mstrie/mstrie_A.mst"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct Group {
    groups: HashMap<String, Group>,
    parameters: HashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct Config {
    root: Group,
}

impl Config {
    /// Read and parse the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)?;
        Config::parse(contents.lines())
    }

    pub fn parse<I, S>(lines: I) -> Result<Config>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = Group::default();
        // Names of the groups that enclose the current line, one per level.
        let mut scope: Vec<String> = Vec::new();

        for (lineno, line_raw) in lines.into_iter().enumerate() {
            let line = line_raw.as_ref();

            // The nesting level is the number of leading tabs.
            let level = line.len() - line.trim_start_matches('\t').len();

            let line = line.trim_matches(|ch| ch == ' ' || ch == '\t');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if level > scope.len() {
                let msg = "Line is indented deeper than its enclosing group.";
                return Err(Error::InvalidConfig(lineno, msg));
            }

            if let Some(name) = line.strip_suffix(':') {
                let name = name.trim_end();
                if name.is_empty() {
                    return Err(Error::InvalidConfig(lineno, "Group has no name."));
                }
                scope.truncate(level);
                scope.push(String::from(name));
            } else if let Some(n) = line.find('=') {
                let name = line[..n].trim();
                if name.is_empty() {
                    return Err(Error::InvalidConfig(lineno, "Parameter has no name."));
                }
                let value = match parse_quoted(&line[n + 1..]) {
                    Some(v) => v,
                    None => {
                        let msg = "Expected a double-quoted parameter value, \
                            like 'run_mode = \"cli\"'.";
                        return Err(Error::InvalidConfig(lineno, msg));
                    }
                };
                let mut group = &mut root;
                for part in &scope[..level] {
                    group = group.groups.entry(part.clone()).or_default();
                }
                group.parameters.insert(String::from(name), String::from(value));
            } else {
                let msg = "Line contains no '='. \
                    Expected a group ending in ':' or a key-value pair.";
                return Err(Error::InvalidConfig(lineno, msg));
            }
        }

        Ok(Config { root })
    }

    /// Look up a parameter by its colon-joined path.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        let mut parts: Vec<&str> = key.split(':').collect();
        // Split always yields at least one element, even for the empty key.
        let name = parts.pop().unwrap();

        let mut group = &self.root;
        for part in parts {
            group = match group.groups.get(part) {
                Some(g) => g,
                None => {
                    let msg = format!("Could not find configuration group: {}", part);
                    return Err(Error::IncompleteConfig(msg));
                }
            };
        }

        match group.parameters.get(name) {
            Some(value) => Ok(value),
            None => {
                let msg = format!("Could not find configuration parameter: {}", key);
                Err(Error::IncompleteConfig(msg))
            }
        }
    }

    /// Like [`get_str`](Config::get_str), but `None` when the key is absent.
    pub fn get_opt_str(&self, key: &str) -> Option<&str> {
        self.get_str(key).ok()
    }

    pub fn get_u32(&self, key: &str) -> Result<u32> {
        let value = self.get_str(key)?;
        value.parse().map_err(|_| {
            let msg = format!(
                "Configuration parameter '{}' must be a non-negative integer, got '{}'.",
                key, value,
            );
            Error::InvalidParameter(msg)
        })
    }
}

/// Extract the text between the first pair of double quotes, if any.
fn parse_quoted(raw: &str) -> Option<&str> {
    let start = raw.find('"')?;
    let rest = &raw[start + 1..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::error::Error;

    const EXAMPLE: &[&str] = &[
        "# Example mstrie configuration.",
        "run_mode = \"cli\"",
        "default_mstrie_name = \"mstrie_A\"",
        "",
        "mstrie_A:",
        "\talphabet_length = \"3\"",
        "\tmax_multiplicity = \"4\"",
        "\tmstrie_path = \"/tmp/mstrie_A.mst\"",
        "",
        "benchmark:",
        "\tmstrie_name = \"mstrie_A\"",
        "\trun:",
        "\t\ttype = \"exact_search\"",
        "\t\ttest_file = \"/tmp/tests.txt\"",
        "\t\tresult_file = \"/tmp/results.csv\"",
    ];

    #[test]
    fn config_can_be_parsed() {
        let config = Config::parse(EXAMPLE).unwrap();
        assert_eq!(config.get_str("run_mode").unwrap(), "cli");
        assert_eq!(config.get_str("default_mstrie_name").unwrap(), "mstrie_A");
        assert_eq!(config.get_u32("mstrie_A:alphabet_length").unwrap(), 3);
        assert_eq!(config.get_u32("mstrie_A:max_multiplicity").unwrap(), 4);
        assert_eq!(config.get_str("mstrie_A:mstrie_path").unwrap(), "/tmp/mstrie_A.mst");
    }

    #[test]
    fn nested_groups_are_addressed_by_colon_joined_path() {
        let config = Config::parse(EXAMPLE).unwrap();
        assert_eq!(config.get_str("benchmark:run:type").unwrap(), "exact_search");
        assert_eq!(config.get_str("benchmark:run:result_file").unwrap(), "/tmp/results.csv");
    }

    #[test]
    fn sibling_group_closes_previous_group() {
        let lines = ["a:", "\tx = \"1\"", "b:", "\tx = \"2\""];
        let config = Config::parse(&lines).unwrap();
        assert_eq!(config.get_str("a:x").unwrap(), "1");
        assert_eq!(config.get_str("b:x").unwrap(), "2");
    }

    #[test]
    fn dedent_returns_to_outer_group() {
        let lines = ["a:", "\tb:", "\t\tx = \"1\"", "\ty = \"2\"", "z = \"3\""];
        let config = Config::parse(&lines).unwrap();
        assert_eq!(config.get_str("a:b:x").unwrap(), "1");
        assert_eq!(config.get_str("a:y").unwrap(), "2");
        assert_eq!(config.get_str("z").unwrap(), "3");
    }

    #[test]
    fn missing_group_and_parameter_are_distinguished() {
        let config = Config::parse(EXAMPLE).unwrap();
        match config.get_str("nonsense:alphabet_length") {
            Err(Error::IncompleteConfig(msg)) => assert!(msg.contains("group")),
            other => panic!("expected IncompleteConfig, got {:?}", other),
        }
        match config.get_str("mstrie_A:nonsense") {
            Err(Error::IncompleteConfig(msg)) => assert!(msg.contains("parameter")),
            other => panic!("expected IncompleteConfig, got {:?}", other),
        }
    }

    #[test]
    fn unquoted_value_is_rejected_with_line_number() {
        let lines = ["run_mode = \"cli\"", "broken = cli"];
        match Config::parse(&lines) {
            Err(Error::InvalidConfig(lineno, _)) => assert_eq!(lineno, 1),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn over_indented_line_is_rejected() {
        let lines = ["a:", "\t\t\tx = \"1\""];
        assert!(matches!(Config::parse(&lines), Err(Error::InvalidConfig(1, _))));
    }

    #[test]
    fn non_integer_parameter_is_rejected_at_access() {
        let lines = ["n = \"three\""];
        let config = Config::parse(&lines).unwrap();
        assert!(matches!(config.get_u32("n"), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn indented_comments_are_ignored() {
        let lines = ["a:", "\t# not a parameter", "\tx = \"1\""];
        let config = Config::parse(&lines).unwrap();
        assert_eq!(config.get_str("a:x").unwrap(), "1");
    }
}
