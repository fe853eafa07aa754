// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static catalog of known reference-data bundles. Each entry names where
//! the bundle lives on disk, whether the pipeline hard-requires it, and
//! where to fetch it from when not yet installed.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub display_name: &'static str,
    pub required: bool,
    pub download_url: &'static str,
}

/// Marker file whose presence under an asset's `install_path` indicates a
/// complete (not partially-downloaded) install (spec §3: "Installed-ness is
/// derived from filesystem probes … not trusted from prior writes").
pub const INSTALLED_MARKER: &str = ".bundle_complete";

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        key: "card",
        display_name: "CARD (Comprehensive Antibiotic Resistance Database)",
        required: true,
        download_url: "https://card.example.invalid/releases/latest/card.tar.gz",
    },
    CatalogEntry {
        key: "resfinder",
        display_name: "ResFinder",
        required: true,
        download_url: "https://resfinder.example.invalid/releases/latest/resfinder.tar.gz",
    },
    CatalogEntry {
        key: "ncbi",
        display_name: "NCBI AMRFinderPlus reference gene database",
        required: true,
        download_url: "https://ncbi.example.invalid/amrfinderplus/latest/amrfinderplus-db.tar.gz",
    },
    CatalogEntry {
        key: "vfdb",
        display_name: "VFDB (Virulence Factor Database)",
        required: false,
        download_url: "https://vfdb.example.invalid/releases/latest/vfdb.tar.gz",
    },
    CatalogEntry {
        key: "plasmidfinder",
        display_name: "PlasmidFinder",
        required: false,
        download_url: "https://plasmidfinder.example.invalid/releases/latest/plasmidfinder.tar.gz",
    },
];

pub fn install_path(assets_root: &std::path::Path, key: &str) -> PathBuf {
    assets_root.join(key)
}
