// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The batch benchmark driver.
//!
//! Reads one query word per line from a test file, runs the configured search
//! against the configured index, and writes one CSV row per query to the
//! result file. Unlike the interactive driver, any error ends the run.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::IndexManager;

pub struct Benchmark {
    manager: IndexManager,
    query_kind: &'static str,
    test_path: PathBuf,
    result_path: PathBuf,
}

impl Benchmark {
    pub fn new(config: &Config) -> Result<Benchmark> {
        let name = config.get_str("benchmark:mstrie_name")?;
        let manager = IndexManager::from_config(config, name)?;

        let query_kind = match config.get_str("benchmark:run:type")? {
            "exact_search" => "=",
            "subset_search" => "<=",
            "superset_search" => ">=",
            other => return Err(Error::UnknownQueryKind(String::from(other))),
        };

        Ok(Benchmark {
            manager,
            query_kind,
            test_path: PathBuf::from(config.get_str("benchmark:run:test_file")?),
            result_path: PathBuf::from(config.get_str("benchmark:run:result_file")?),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.manager.init_index()?;

        let test_file = fs::File::open(&self.test_path)?;
        let result_file = fs::File::create(&self.result_path)?;
        let mut writer = BufWriter::new(result_file);
        self.process(BufReader::new(test_file), &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn process<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        writeln!(writer, "test;output;time_μs")?;
        for line in reader.lines() {
            let word = line?;
            let found = self
                .manager
                .search_query(self.query_kind, &word, None)?;
            writeln!(writer, "{};{};{}", word, found, self.manager.benchmark_stats()?)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::io::Cursor;
    use std::path::PathBuf;

    use super::Benchmark;
    use crate::config::Config;
    use crate::error::Error;

    fn test_config(run_type: &str) -> Config {
        let path = env::temp_dir().join(format!("mstrie-bench-test-{}.mst", std::process::id()));
        let lines = [
            String::from("run_mode = \"benchmark\""),
            String::from("mstrie_A:"),
            String::from("\talphabet_length = \"3\""),
            String::from("\tmax_multiplicity = \"4\""),
            format!("\tmstrie_path = \"{}\"", path.display()),
            String::from("benchmark:"),
            String::from("\tmstrie_name = \"mstrie_A\""),
            String::from("\trun:"),
            format!("\t\ttype = \"{}\"", run_type),
            String::from("\t\ttest_file = \"/tmp/tests.txt\""),
            String::from("\t\tresult_file = \"/tmp/results.csv\""),
        ];
        Config::parse(&lines).unwrap()
    }

    #[test]
    fn new_maps_the_run_type_onto_a_query_symbol() {
        assert_eq!(Benchmark::new(&test_config("exact_search")).unwrap().query_kind, "=");
        assert_eq!(Benchmark::new(&test_config("subset_search")).unwrap().query_kind, "<=");
        assert_eq!(Benchmark::new(&test_config("superset_search")).unwrap().query_kind, ">=");
        assert!(matches!(
            Benchmark::new(&test_config("fuzzy_search")),
            Err(Error::UnknownQueryKind(_)),
        ));
        assert_eq!(
            Benchmark::new(&test_config("exact_search")).unwrap().test_path,
            PathBuf::from("/tmp/tests.txt"),
        );
    }

    #[test]
    fn process_writes_one_csv_row_per_query() {
        let mut benchmark = Benchmark::new(&test_config("exact_search")).unwrap();
        benchmark.manager.init_index().unwrap();
        benchmark.manager.update_query("+", "1,2").unwrap();

        let mut out = Vec::new();
        benchmark
            .process(Cursor::new("1,2\n0,1\n"), &mut out)
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "test;output;time_μs");
        assert!(lines[1].starts_with("1,2;true;"));
        assert!(lines[1].ends_with("µs"));
        assert!(lines[2].starts_with("0,1;false;"));
    }

    #[test]
    fn process_fails_on_an_undecodable_word() {
        let mut benchmark = Benchmark::new(&test_config("subset_search")).unwrap();
        benchmark.manager.init_index().unwrap();

        let mut out = Vec::new();
        let result = benchmark.process(Cursor::new("9,9\n"), &mut out);
        assert!(matches!(result, Err(Error::InvalidToken(_))));
    }
}
