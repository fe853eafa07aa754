// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, content).expect("write");
}

#[test]
fn s1_happy_path_two_resfinder_rows_yield_two_total_genes() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    write(
        tmp.path(),
        "04_arg_detection/resfinder/SRR28083254_resfinder.tsv",
        "gene\tcoverage\tidentity\tproduct\tresistance\tcontig\n\
         blaTEM-1\t100.0\t99.8\tbeta-lactamase\tbeta-lactam\tcontig_1\n\
         tetA\t98.0\t97.5\ttetracycline efflux\ttetracycline\tcontig_2\n",
    );

    let results = parse(tmp.path(), "SRR28083254");
    assert_eq!(results.total_arg_genes, 2);
    assert!(results.parse_warnings.is_empty());
    assert_eq!(
        results.unique_resistance_types,
        vec!["beta-lactam".to_string(), "tetracycline".to_string()]
    );
}

#[test]
fn duplicate_gene_and_tool_pair_counts_once() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    write(
        tmp.path(),
        "04_arg_detection/resfinder/SRR1_resfinder.tsv",
        "gene\tresistance\nblaTEM-1\tbeta-lactam\nblaTEM-1\tbeta-lactam\n",
    );
    let results = parse(tmp.path(), "SRR1");
    assert_eq!(results.total_arg_genes, 1);
}

#[test]
fn same_gene_across_two_tools_counts_twice() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    write(
        tmp.path(),
        "04_arg_detection/resfinder/SRR1_resfinder.tsv",
        "gene\tresistance\nblaTEM-1\tbeta-lactam\n",
    );
    write(
        tmp.path(),
        "04_arg_detection/card/SRR1_card.tsv",
        "gene\tresistance\nblaTEM-1\tbeta-lactam\n",
    );
    let results = parse(tmp.path(), "SRR1");
    assert_eq!(results.total_arg_genes, 2);
}

#[test]
fn completely_empty_output_dir_yields_all_none_no_panic() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let results = parse(tmp.path(), "SRR1");
    assert!(results.metadata.is_none());
    assert!(results.assembly_stats.is_none());
    assert!(results.arg_detection.is_empty());
    assert_eq!(results.total_arg_genes, 0);
    assert!(results.report_html_path.is_none());
    assert!(results.parse_warnings.is_empty());
}

#[test]
fn parsing_same_directory_twice_is_byte_identical() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    write(
        tmp.path(),
        "04_arg_detection/resfinder/SRR1_resfinder.tsv",
        "gene\tresistance\nblaTEM-1\tbeta-lactam\n",
    );
    write(tmp.path(), "METADATA.json", r#"{"sample":"SRR1"}"#);

    let first = serde_json::to_string(&parse(tmp.path(), "SRR1")).expect("serialize");
    let second = serde_json::to_string(&parse(tmp.path(), "SRR1")).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn invalid_metadata_json_produces_warning_but_other_fields_still_parsed() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    write(tmp.path(), "METADATA.json", "{not valid json");
    write(
        tmp.path(),
        "04_arg_detection/resfinder/SRR1_resfinder.tsv",
        "gene\tresistance\nblaTEM-1\tbeta-lactam\n",
    );

    let results = parse(tmp.path(), "SRR1");
    assert!(results.metadata.is_none());
    assert_eq!(results.total_arg_genes, 1);
    assert!(results.parse_warnings.iter().any(|w| w.file == "METADATA.json"));
}
