//! Trajectory files on disk.
//!
//! RULE: Only store.rs touches the filesystem.
//! Each run writes its own file, so concurrent batches never collide
//! as long as (model, replicate) pairs differ.

use crate::{
    error::SimResult,
    revenue,
    snapshot::Snapshot,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const MANIFEST_FILE: &str = "batch.manifest";

pub struct TrajectoryStore {
    root: PathBuf,
}

/// Outcome of a pass over every file in the store.
#[derive(Debug, Default)]
pub struct FilePassReport {
    pub updated: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl FilePassReport {
    pub fn processed(&self) -> usize {
        self.updated.len() + self.failed.len()
    }
}

impl TrajectoryStore {
    /// Open (or create) the store directory at `root`.
    pub fn open(root: impl Into<PathBuf>) -> SimResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Open an existing directory without creating it.
    pub fn existing(root: impl Into<PathBuf>) -> SimResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a valid directory", root.display()),
            )
            .into());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `saas_growth_{model}_{replicate}.json`, replicate counted from 1.
    pub fn file_name(model: &str, replicate: usize) -> String {
        format!("saas_growth_{model}_{replicate}.json")
    }

    pub fn path_for(&self, model: &str, replicate: usize) -> PathBuf {
        self.root.join(Self::file_name(model, replicate))
    }

    // ── Read / write ───────────────────────────────────────────

    pub fn save(&self, model: &str, replicate: usize, snapshots: &[Snapshot]) -> SimResult<PathBuf> {
        let path = self.path_for(model, replicate);
        write_json(&path, snapshots)?;
        Ok(path)
    }

    pub fn load(path: &Path) -> SimResult<Vec<Snapshot>> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Every `.json` file directly under the store root, sorted.
    pub fn list_json_files(&self) -> SimResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Write batch metadata next to the trajectories. The extension
    /// keeps it out of `list_json_files`.
    pub fn save_manifest<T: Serialize>(&self, manifest: &T) -> SimResult<PathBuf> {
        let path = self.root.join(MANIFEST_FILE);
        write_json(&path, manifest)?;
        Ok(path)
    }

    // ── Revenue post-processing ────────────────────────────────

    /// Append revenue fields to every quarter of every file.
    /// A file that cannot be read, parsed or written is logged and
    /// skipped; the rest of the directory is still processed.
    pub fn annotate_revenue(&self) -> SimResult<FilePassReport> {
        let files = self.list_json_files()?;
        if files.is_empty() {
            log::warn!("No JSON files found in {}", self.root.display());
        }

        let mut report = FilePassReport::default();
        for path in files {
            match annotate_file(&path) {
                Ok(quarters) => {
                    log::info!("Updated {} with revenue for {quarters} quarters", path.display());
                    report.updated.push(path);
                }
                Err(e) => {
                    log::error!("Error processing {}: {e}", path.display());
                    report.failed.push((path, e.to_string()));
                }
            }
        }
        Ok(report)
    }
}

/// Revenue keys are merged into each quarter's existing object, so any
/// key the simulator schema does not know survives the rewrite.
fn annotate_file(path: &Path) -> SimResult<usize> {
    let content = fs::read_to_string(path)?;
    let mut quarters: Vec<Map<String, Value>> = serde_json::from_str(&content)?;
    for quarter in &mut quarters {
        let snapshot: Snapshot = serde_json::from_value(Value::Object(quarter.clone()))?;
        if let Value::Object(fields) = serde_json::to_value(revenue::estimate(&snapshot))? {
            quarter.extend(fields);
        }
    }
    write_json(path, &quarters)?;
    Ok(quarters.len())
}

/// JSON with four-space indentation, matching existing trajectory files.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> SimResult<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    fs::write(path, buf)?;
    Ok(())
}
