//! Host side of the pipeline: where declared elements come from.
//!
//! Either a serialized manifest or a scan of Java sources under the source
//! root. Both produce the same `DeclaredElement` list.

pub mod file_scanner;
pub mod java;
pub mod manifest;

use std::{fs, path::Path};

use colored::Colorize;
use rayon::prelude::*;

pub use file_scanner::{ScanResult, scan_files};
pub use java::{ParsedSource, parse_java_source};
pub use manifest::{load_manifest, parse_manifest};

use crate::core::{DeclaredElement, QueryFlavor};

/// Declared elements found by scanning sources.
#[derive(Debug, Default)]
pub struct DiscoveredSources {
    pub elements: Vec<DeclaredElement>,
    pub files_scanned: usize,
}

/// Scan every source file under `root_dir` and collect annotated elements.
///
/// Files are read and parsed in parallel; results keep file order, and
/// reported paths are relative to `root_dir`.
pub fn discover_sources(
    root_dir: &Path,
    includes: &[String],
    ignores: &[String],
    flavors: &[QueryFlavor],
    verbose: bool,
) -> DiscoveredSources {
    let scan = scan_files(root_dir, includes, ignores, verbose);

    if scan.skipped_count > 0 {
        eprintln!(
            "{} {} path(s) skipped due to access errors{}",
            "warning:".bold().yellow(),
            scan.skipped_count,
            if verbose { "" } else { " (use -v for details)" }
        );
    }

    let parsed: Vec<Result<ParsedSource, String>> = scan
        .files
        .par_iter()
        .map(|path| {
            let display = path
                .strip_prefix(root_dir)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            fs::read_to_string(path)
                .map(|source| parse_java_source(&display, &source, flavors))
                .map_err(|e| format!("{}: {}", display, e))
        })
        .collect();

    let mut discovered = DiscoveredSources {
        files_scanned: scan.files.len(),
        ..Default::default()
    };

    for result in parsed {
        match result {
            Ok(source) => {
                if verbose {
                    for warning in &source.warnings {
                        eprintln!("{} {}", "warning:".bold().yellow(), warning);
                    }
                }
                discovered.elements.extend(source.elements);
            }
            Err(e) => {
                if verbose {
                    eprintln!(
                        "{} Cannot read source file {}",
                        "warning:".bold().yellow(),
                        e
                    );
                }
            }
        }
    }

    discovered
}
