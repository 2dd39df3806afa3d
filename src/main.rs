// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::env;
use std::path::Path;
use std::process;

use mstrie::benchmark::Benchmark;
use mstrie::cli::Cli;
use mstrie::error::{format_causes, Error, Result};
use mstrie::Config;

fn run(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let run_mode = String::from(config.get_str("run_mode")?);

    println!("Mstrie {}", env!("CARGO_PKG_VERSION"));
    match &run_mode[..] {
        "benchmark" => {
            println!("Running benchmark...");
            Benchmark::new(&config)?.run()?;
            println!("Done.");
            Ok(())
        }
        "cli" => {
            println!("Type \"help\" for more information.");
            Cli::new(config)?.run()
        }
        other => Err(Error::UnknownRunMode(String::from(other))),
    }
}

fn main() {
    if env::args().len() != 2 {
        eprintln!("No configuration file specified.");
        process::exit(1);
    }
    // The args check above guarantees the argument is present.
    let config_path = env::args().nth(1).unwrap();

    match run(Path::new(&config_path)) {
        Ok(()) => {}
        Err(err) => {
            eprint!("{}", format_causes(&err));
            process::exit(1);
        }
    }
}
