// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Textual multiset tokens, and the on-disk dump format.
//!
//! A token is either `*` (the empty multiset) or a comma-separated list of
//! element indices, where an index may repeat up to the maximal multiplicity.
//! The dense form is a vector with one multiplicity per alphabet element, so
//! for an alphabet of 3 the token `0,0,2` denotes the vector `(2, 0, 1)`.

use std::io;
use std::io::Write;

use crate::error::{Error, Result};

/// Translates tokens from and to dense multiplicity vectors.
#[derive(Debug)]
pub struct Codec {
    alphabet: u32,
}

impl Codec {
    pub fn new(alphabet: u32) -> Codec {
        Codec { alphabet }
    }

    /// Decode a token into a multiplicity vector of alphabet length.
    ///
    /// The empty string decodes like `*`: dump files render the empty multiset
    /// as an empty line. Multiplicities are counted but not bounded here; the
    /// trie enforces its own maximum.
    pub fn decode(&self, token: &str) -> Result<Vec<u32>> {
        let mut v = vec![0_u32; self.alphabet as usize];
        if token == "*" || token.is_empty() {
            return Ok(v);
        }
        for part in token.split(',') {
            let element: i64 = match part.parse() {
                Ok(n) => n,
                Err(_) => {
                    let msg = format!("Token component '{}' is not a number.", part);
                    return Err(Error::InvalidToken(msg));
                }
            };
            if element < 0 {
                let msg = String::from("Token cannot have negative values.");
                return Err(Error::InvalidToken(msg));
            }
            if element >= i64::from(self.alphabet) {
                let msg = String::from("Token cannot have values greater than alphabet size.");
                return Err(Error::InvalidToken(msg));
            }
            v[element as usize] += 1;
        }
        Ok(v)
    }

    /// Encode a multiplicity vector as a token, the zero vector as `""`.
    pub fn encode(&self, v: &[u32]) -> String {
        let mut s = String::new();
        for (element, &count) in v.iter().enumerate() {
            for _ in 0..count {
                if !s.is_empty() {
                    s.push(',');
                }
                s.push_str(&element.to_string());
            }
        }
        s
    }
}

/// A parsed index dump: the parameters line, and one token per multiset.
///
/// The creation timestamp on the first line is read and discarded.
#[derive(Debug)]
pub struct Dump<'a> {
    pub max_multiplicity: u32,
    pub alphabet: u32,
    pub words: Vec<&'a str>,
}

/// Parse the textual dump format:
///
/// ```text
/// <creation-timestamp-ms>
/// <max_multiplicity> <alphabet_size>
/// <multiset token>
/// ...
/// ```
pub fn parse_dump(contents: &str) -> Result<Dump> {
    let mut lines = contents.lines();
    let _created_ms = lines.next().ok_or(Error::Parametrization)?;

    let params = lines.next().ok_or(Error::Parametrization)?;
    let mut fields = params.split_whitespace();
    let max_multiplicity = parse_param(fields.next())?;
    let alphabet = parse_param(fields.next())?;
    if fields.next().is_some() {
        return Err(Error::Parametrization);
    }

    Ok(Dump {
        max_multiplicity,
        alphabet,
        words: lines.collect(),
    })
}

fn parse_param(field: Option<&str>) -> Result<u32> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or(Error::Parametrization)
}

/// Write a dump in the format accepted by [`parse_dump`].
pub fn write_dump<W: Write>(
    w: &mut W,
    created_ms: i64,
    max_multiplicity: u32,
    alphabet: u32,
    words: &[String],
) -> io::Result<()> {
    writeln!(w, "{}", created_ms)?;
    writeln!(w, "{} {}", max_multiplicity, alphabet)?;
    for word in words {
        writeln!(w, "{}", word)?;
    }
    Ok(())
}
