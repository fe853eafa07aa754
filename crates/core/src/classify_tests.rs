// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;
use yare::parameterized;

#[parameterized(
    srr = { "SRR28083254", Some(InputType::ReadsArchive) },
    err = { "ERR123", Some(InputType::ReadsArchive) },
    drr = { "DRR1", Some(InputType::ReadsArchive) },
    lowercase_srr_rejected = { "srr123", None },
    cp_accession = { "CP012345.1", Some(InputType::SequenceAccession) },
    nc_accession_no_underscore = { "NC012345", Some(InputType::SequenceAccession) },
    nz_accession = { "NZ_CP012345.1", Some(InputType::SequenceAccession) },
    gca_accession = { "GCA_000001405.1", Some(InputType::AssemblyAccession) },
    gcf_accession = { "GCF_000001635.2", Some(InputType::AssemblyAccession) },
    gibberish = { "not-a-real-id", None },
    path_traversal_missing_file = { "../../etc/passwd", None },
)]
fn classify_patterns(input: &str, expected: Option<InputType>) {
    assert_eq!(classify(input), expected);
}

#[test]
fn local_fasta_path_requires_file_to_exist() {
    assert_eq!(classify("/tmp/does-not-exist-oj-spec.fasta"), None);
}

#[test]
fn local_fasta_path_accepted_when_file_exists_and_readable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sample.fasta");
    let mut f = std::fs::File::create(&path).expect("create");
    writeln!(f, ">contig1\nACGT").expect("write");

    let classified = classify(path.to_str().expect("utf8 path"));
    assert_eq!(classified, Some(InputType::LocalFile));
}

#[test]
fn gz_suffix_variants_are_recognized_suffixes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sample.fna.gz");
    std::fs::File::create(&path).expect("create");
    assert_eq!(
        classify(path.to_str().expect("utf8 path")),
        Some(InputType::LocalFile)
    );
}
