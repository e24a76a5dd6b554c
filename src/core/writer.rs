//! Export bundle writer.
//!
//! Lays out one run's results on disk: a JSON document per record at
//! the bundle root, plus extracted scripts under `scripts/<record_id>/`.
//! Within a record, a repeated file name with different content gets a
//! numeric suffix; byte-identical repeats are skipped. Files left by
//! earlier runs are overwritten in place.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::api::ApplicationRecord;
use crate::error::{Error, Result};
use crate::extract::ScriptReference;
use crate::sanitize::safe_name;
use crate::utils::io;

fn write_error(path: &Path, err: Error) -> Error {
    let cause = err
        .details
        .get("error")
        .and_then(|v| v.as_str())
        .unwrap_or(&err.message)
        .to_string();
    Error::export_write_failed(path.display().to_string(), cause)
}

fn disambiguate(file_name: &str, index: usize) -> String {
    if index == 0 {
        return file_name.to_string();
    }
    match file_name.rfind('.') {
        Some(pos) => format!("{}_{}{}", &file_name[..pos], index, &file_name[pos..]),
        None => format!("{}_{}", file_name, index),
    }
}

#[derive(Debug)]
pub struct BundleWriter {
    dest: PathBuf,
    record_stems: HashSet<String>,
    // digests of script contents already written, per (record, file name)
    written: HashMap<(String, String), Vec<Vec<u8>>>,
}

impl BundleWriter {
    /// Creates the destination directory and an empty writer over it.
    pub fn create(dest: impl Into<PathBuf>) -> Result<Self> {
        let dest = dest.into();
        fs::create_dir_all(&dest)
            .map_err(|e| Error::export_write_failed(dest.display().to_string(), e.to_string()))?;

        Ok(Self {
            dest,
            record_stems: HashSet::new(),
            written: HashMap::new(),
        })
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Writes the record's raw payload as `<id>.json` at the bundle root.
    pub fn write_record(&mut self, record: &ApplicationRecord) -> Result<PathBuf> {
        let stem = safe_name(&record.id, "record id")?;
        let path = self.dest.join(format!("{}.json", stem));

        let mut json = serde_json::to_string_pretty(&record.raw)
            .map_err(|e| Error::internal_json(e.to_string(), Some(format!("record {}", record.id))))?;
        json.push('\n');

        io::write_file_atomic(&path, &json, "write record").map_err(|e| write_error(&path, e))?;

        self.record_stems.insert(stem);
        log_status!("write", "Wrote {}", path.display());
        Ok(path)
    }

    /// Writes one extracted script under `scripts/<record_id>/`.
    ///
    /// Returns `Ok(None)` when there is nothing to write: the content is
    /// unresolved, or an identical copy already landed in this run.
    pub fn write_script(
        &mut self,
        record_id: &str,
        script: &ScriptReference,
    ) -> Result<Option<PathBuf>> {
        let bytes = match script.content.bytes() {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        let record_stem = safe_name(record_id, "record id")?;
        let file_name = safe_name(&script.file_name, "script file name")?;

        let digest = Sha256::digest(bytes).to_vec();
        let digests = self.written.entry((record_stem.clone(), file_name.clone())).or_default();
        if digests.iter().any(|d| *d == digest) {
            return Ok(None);
        }

        let dir = self.dest.join("scripts").join(&record_stem);
        fs::create_dir_all(&dir)
            .map_err(|e| Error::export_write_failed(dir.display().to_string(), e.to_string()))?;

        let path = dir.join(disambiguate(&file_name, digests.len()));
        io::write_bytes_atomic(&path, bytes, "write script").map_err(|e| write_error(&path, e))?;

        digests.push(digest);
        log_status!("write", "Wrote {}", path.display());
        Ok(Some(path))
    }

    /// Removes bundle entries left by earlier runs whose record was not
    /// written in this one. Failures downgrade to warnings.
    pub fn prune(&self) -> (Vec<String>, Vec<String>) {
        let mut removed = Vec::new();
        let mut warnings = Vec::new();

        let pattern = self.dest.join("*.json").display().to_string();
        let paths = match glob::glob(&pattern) {
            Ok(paths) => paths,
            Err(e) => {
                warnings.push(format!("prune skipped: {}", e));
                return (removed, warnings);
            }
        };

        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warnings.push(format!("prune skipped entry: {}", e));
                    continue;
                }
            };

            let stem = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };

            if self.record_stems.contains(&stem) {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    removed.push(stem.clone());
                    log_status!("prune", "Removed {}", path.display());
                }
                Err(e) => {
                    warnings.push(format!("could not prune {}: {}", path.display(), e));
                    continue;
                }
            }

            let scripts_dir = self.dest.join("scripts").join(&stem);
            if scripts_dir.is_dir() {
                if let Err(e) = fs::remove_dir_all(&scripts_dir) {
                    warnings.push(format!("could not prune {}: {}", scripts_dir.display(), e));
                }
            }
        }

        (removed, warnings)
    }
}
