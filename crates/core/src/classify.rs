// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input classifier (component C): maps a submitted `sample_id` to an
//! [`InputType`], or rejects it. Case-sensitive, first-match-wins, as
//! specified in §4.C. Never touches the network.

use crate::job::InputType;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static READS_ARCHIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[SED]RR\d+$").expect("static pattern is valid"));
static SEQUENCE_ACCESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(CP|NC|NZ)_?\d+(\.\d+)?$").expect("static pattern is valid"));
static ASSEMBLY_ACCESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^GC[AF]_\d+(\.\d+)?$").expect("static pattern is valid"));

const LOCAL_FILE_SUFFIXES: &[&str] = &[".fasta", ".fna", ".fa", ".fasta.gz", ".fna.gz"];

/// Classify a submitted sample identifier. Patterns are tried in the order
/// given in §4.C; the first match wins. Local-file candidates additionally
/// require the path to exist and be readable.
pub fn classify(sample_id: &str) -> Option<InputType> {
    if READS_ARCHIVE.is_match(sample_id) {
        return Some(InputType::ReadsArchive);
    }
    if SEQUENCE_ACCESSION.is_match(sample_id) {
        return Some(InputType::SequenceAccession);
    }
    if ASSEMBLY_ACCESSION.is_match(sample_id) {
        return Some(InputType::AssemblyAccession);
    }
    if looks_like_local_file(sample_id) && is_readable_file(sample_id) {
        return Some(InputType::LocalFile);
    }
    None
}

fn looks_like_local_file(sample_id: &str) -> bool {
    sample_id.starts_with('/') || LOCAL_FILE_SUFFIXES.iter().any(|suf| sample_id.ends_with(suf))
}

fn is_readable_file(sample_id: &str) -> bool {
    let path = Path::new(sample_id);
    path.is_file()
        && std::fs::File::open(path)
            .map(|_| true)
            .unwrap_or(false)
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
