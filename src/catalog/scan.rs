// Directory scanning: pooled metadata reads feeding a fresh catalog

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::catalog::{Catalog, FileRecord};
use crate::constants::{BYTES_PER_MB, PARALLEL_PARSE_THRESHOLD, SCAN_WORKERS};
use crate::error::{CapsweepError, Result};
use crate::parse::IdentityParser;

/// Scan tuning. The worker cap is fixed and independent of file count so a
/// slow volume never fans out into unbounded threads.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub workers: usize,
    pub parallel_parse_threshold: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            workers: SCAN_WORKERS,
            parallel_parse_threshold: PARALLEL_PARSE_THRESHOLD,
        }
    }
}

/// One file whose metadata could not be read. The scan carries on.
#[derive(Debug, Clone)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Completed scan: the rebuilt catalog plus skip/failure accounting.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub catalog: Catalog,
    pub files_seen: usize,
    pub parsed: usize,
    pub unparsed: Vec<String>,
    pub failed: Vec<ScanFailure>,
}

/// Scan a directory without cancellation support.
pub fn scan_directory(
    root: &Path,
    parser: &IdentityParser,
    options: &ScanOptions,
) -> Result<ScanOutcome> {
    scan_directory_inner(root, parser, options, None)
}

/// Scan a directory with cooperative cancellation. The flag is polled
/// between work units; a cancelled scan returns `Cancelled` and exposes no
/// partial catalog.
pub fn scan_directory_with_cancel(
    root: &Path,
    parser: &IdentityParser,
    options: &ScanOptions,
    cancel_flag: &AtomicBool,
) -> Result<ScanOutcome> {
    scan_directory_inner(root, parser, options, Some(cancel_flag))
}

fn scan_directory_inner(
    root: &Path,
    parser: &IdentityParser,
    options: &ScanOptions,
    cancel_flag: Option<&AtomicBool>,
) -> Result<ScanOutcome> {
    let mut failures = Vec::new();
    let paths = list_dir(root, &mut failures)?;

    if is_cancelled(cancel_flag) {
        return Err(CapsweepError::Cancelled);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers.max(1))
        .thread_name(|i| format!("capsweep-scan-{}", i))
        .build()
        .map_err(|e| CapsweepError::Other(format!("Scan pool unavailable: {}", e)))?;

    // Metadata reads are the I/O-bound part; fan them out over the pool.
    let metadata: Vec<std::result::Result<(String, f64), ScanFailure>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                if is_cancelled(cancel_flag) {
                    return Err(ScanFailure {
                        path: path.clone(),
                        error: "cancelled".to_string(),
                    });
                }
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                match path.metadata() {
                    Ok(md) => Ok((name, md.len() as f64 / BYTES_PER_MB)),
                    Err(e) => Err(ScanFailure {
                        path: path.clone(),
                        error: e.to_string(),
                    }),
                }
            })
            .collect()
    });

    if is_cancelled(cancel_flag) {
        return Err(CapsweepError::Cancelled);
    }

    let mut records = Vec::with_capacity(metadata.len());
    for item in metadata {
        match item {
            Ok(record) => records.push(record),
            Err(failure) => {
                log::warn!("Skipping {}: {}", failure.path.display(), failure.error);
                failures.push(failure);
            }
        }
    }

    // Merge order must not depend on worker completion order.
    records.sort_by(|a, b| a.0.cmp(&b.0));

    // Parsing is CPU-only; only large listings justify the pool.
    let identities: Vec<Option<String>> = if records.len() >= options.parallel_parse_threshold {
        pool.install(|| {
            records
                .par_iter()
                .map(|(name, _)| parser.parse(name).map(|p| p.identity))
                .collect()
        })
    } else {
        records
            .iter()
            .map(|(name, _)| parser.parse(name).map(|p| p.identity))
            .collect()
    };

    if is_cancelled(cancel_flag) {
        return Err(CapsweepError::Cancelled);
    }

    let mut outcome = ScanOutcome {
        files_seen: paths.len(),
        failed: failures,
        ..Default::default()
    };

    for ((name, size_mb), identity) in records.into_iter().zip(identities) {
        match identity {
            Some(id) => {
                outcome.catalog.add(&id, FileRecord { name, size_mb });
                outcome.parsed += 1;
            }
            None => {
                log::debug!("Unparseable filename: {}", name);
                outcome.unparsed.push(name);
            }
        }
    }

    log::info!(
        "Scanned {}: {} files, {} parsed, {} unparseable, {} failed",
        root.display(),
        outcome.files_seen,
        outcome.parsed,
        outcome.unparsed.len(),
        outcome.failed.len()
    );

    Ok(outcome)
}

fn is_cancelled(flag: Option<&AtomicBool>) -> bool {
    flag.map(|f| f.load(Ordering::Relaxed)).unwrap_or(false)
}

/// Non-recursive listing of regular files, sorted for stable downstream
/// order. An unreadable root halts the scan; unreadable entries inside it
/// are recorded and skipped.
fn list_dir(root: &Path, failures: &mut Vec<ScanFailure>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).max_depth(1) {
        match entry {
            Ok(e) => {
                if e.depth() > 0 && e.file_type().is_file() {
                    paths.push(e.into_path());
                }
            }
            Err(err) => {
                if err.depth() == 0 {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "unreadable"));
                    return Err(CapsweepError::Scan {
                        path: root.to_path_buf(),
                        source,
                    });
                }
                let path = err
                    .path()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| root.to_path_buf());
                failures.push(ScanFailure {
                    path,
                    error: err.to_string(),
                });
            }
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(dir: &Path, name: &str, bytes: usize) {
        fs::write(dir.join(name), vec![0u8; bytes]).unwrap();
    }

    #[test]
    fn test_scan_builds_catalog() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "twitch-alice-2025-06-26T15_09_46+09_00.mp4",
            2 * 1024 * 1024,
        );
        write_file(
            dir.path(),
            "chzzk-alice-2025-06-27T10_00_00+09_00.mp4",
            1024 * 1024,
        );
        write_file(
            dir.path(),
            "twitch-bob-2025-06-26T20_30_00+09_00.mp4",
            1024 * 1024,
        );
        write_file(dir.path(), "random-notes.txt", 16);
        fs::create_dir(dir.path().join("nested")).unwrap();
        write_file(
            &dir.path().join("nested"),
            "twitch-carol-2025-06-26T11_00_00+09_00.mp4",
            1024,
        );

        let parser = IdentityParser::default();
        let outcome = scan_directory(dir.path(), &parser, &ScanOptions::default()).unwrap();

        // Nested file ignored: the listing is non-recursive.
        assert_eq!(outcome.files_seen, 4);
        assert_eq!(outcome.parsed, 3);
        assert_eq!(outcome.unparsed, vec!["random-notes.txt"]);
        assert!(outcome.failed.is_empty());

        assert_eq!(outcome.catalog.identities(), vec!["alice", "bob"]);
        let alice = outcome.catalog.bucket("alice").unwrap();
        assert_eq!(alice.files.len(), 2);
        assert!((alice.total_size_mb - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_missing_root_halts() {
        let parser = IdentityParser::default();
        let result = scan_directory(
            Path::new("/definitely/not/a/real/dir"),
            &parser,
            &ScanOptions::default(),
        );
        assert!(matches!(result, Err(CapsweepError::Scan { .. })));
    }

    #[test]
    fn test_cancelled_scan_exposes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "twitch-alice-2025-06-26T15_09_46+09_00.mp4",
            1024,
        );

        let parser = IdentityParser::default();
        let flag = AtomicBool::new(true);
        let result =
            scan_directory_with_cancel(dir.path(), &parser, &ScanOptions::default(), &flag);
        assert!(matches!(result, Err(CapsweepError::Cancelled)));
    }

    #[test]
    fn test_rescan_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..8 {
            write_file(
                dir.path(),
                &format!("twitch-alice-2025-06-0{}T15_09_46+09_00.mp4", i + 1),
                1024 * (i + 1),
            );
        }

        let parser = IdentityParser::default();
        let opts = ScanOptions {
            workers: 4,
            ..Default::default()
        };
        let first = scan_directory(dir.path(), &parser, &opts).unwrap();
        let second = scan_directory(dir.path(), &parser, &opts).unwrap();

        let names = |o: &ScanOutcome| {
            o.catalog
                .bucket("alice")
                .map(|b| b.files.iter().map(|f| f.name.clone()).collect::<Vec<_>>())
                .unwrap_or_default()
        };
        assert_eq!(names(&first), names(&second));
        assert_eq!(first.parsed, 8);
    }
}
