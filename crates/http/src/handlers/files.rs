// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/jobs/{job_id}/files`: recursive directory listing of a job's run
//! directory. Walk shape follows `megarg_assets::probe::directory_size`'s
//! recursive `read_dir`, generalized from "sum bytes" to "list entries".

use std::path::Path;

use crate::handlers::dto::FileEntry;

pub fn list_files(output_dir: &Path) -> Vec<FileEntry> {
    let mut entries = Vec::new();
    walk(output_dir, output_dir, &mut entries);
    entries.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    entries
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<FileEntry>) {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in read_dir.filter_map(|e| e.ok()) {
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let path = entry.path();
        if metadata.is_dir() {
            walk(root, &path, out);
        } else {
            let rel_path = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            out.push(FileEntry {
                mime: guess_mime(&path),
                rel_path,
                size: metadata.len(),
            });
        }
    }
}

fn guess_mime(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => "application/json",
        Some("html" | "htm") => "text/html",
        Some("csv") => "text/csv",
        Some("tsv" | "txt" | "log") => "text/plain",
        Some("png") => "image/png",
        Some("gz") => "application/gzip",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
